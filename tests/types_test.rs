use omv_rest::omv::types::*;
use serde_json::json;

#[test]
fn test_rpc_request_shape() {
    let request = RpcRequest::new("System", "getInformation", None);
    let value = serde_json::to_value(&request).unwrap();

    assert_eq!(
        value,
        json!({"service": "System", "method": "getInformation", "params": null})
    );
}

#[test]
fn test_rpc_response_with_error() {
    let json = json!({
        "response": null,
        "error": {"code": 106, "message": "Session expired.", "trace": "#0 ..."}
    });

    let response: RpcResponse = serde_json::from_value(json).expect("Failed to parse RpcResponse");
    assert!(response.response.is_null());
    let error = response.error.unwrap();
    assert_eq!(error.code, Some(106));
    assert_eq!(error.message.as_deref(), Some("Session expired."));
}

#[test]
fn test_rpc_response_with_null_error() {
    let response: RpcResponse = serde_json::from_value(json!({"response": [1, 2], "error": null}))
        .expect("Failed to parse RpcResponse");

    assert!(response.error.is_none());
    assert_eq!(response.response, json!([1, 2]));
}

#[test]
fn test_rpc_response_requires_error_member() {
    let result: Result<RpcResponse, _> = serde_json::from_value(json!({"response": [1, 2]}));

    assert!(result.is_err());
}

#[test]
fn test_rpc_response_requires_response_member() {
    let result: Result<RpcResponse, _> = serde_json::from_value(json!({"error": null}));

    assert!(result.is_err());
}

#[test]
fn test_login_response_truthiness() {
    for (authenticated, expected) in [
        (json!(true), true),
        (json!(1), true),
        (json!("yes"), true),
        (json!(false), false),
        (json!(0), false),
        (json!(""), false),
        (json!(null), false),
    ] {
        let login: LoginResponse =
            serde_json::from_value(json!({ "authenticated": authenticated }))
                .expect("Failed to parse LoginResponse");
        assert_eq!(login.authenticated, expected);
    }

    let login: LoginResponse = serde_json::from_value(json!({})).unwrap();
    assert!(!login.authenticated);
}

#[test]
fn test_deserialize_system_information_minimal() {
    let info: SystemInformation =
        serde_json::from_value(json!({"hostname": "nas", "version": "7.0"}))
            .expect("Failed to parse SystemInformation");

    assert_eq!(info.hostname, "nas");
    assert_eq!(info.cpu_usage, 0.0);
    assert_eq!(info.mem_total, 0);
    assert!(info.uptime.is_null());
    assert!(!info.reboot_required);
}

#[test]
fn test_deserialize_load_average_strings() {
    let load: LoadAverage =
        serde_json::from_value(json!({"1min": "0.5", "5min": 0.25, "15min": null})).unwrap();

    assert_eq!(load.one, 0.5);
    assert_eq!(load.five, 0.25);
    assert_eq!(load.fifteen, 0.0);
}

#[test]
fn test_deserialize_filesystem() {
    let json = json!({
        "devicefile": "/dev/md0",
        "parentdevicefile": "/dev/md0",
        "type": "ext4",
        "size": "1000",
        "available": 250,
        "mounted": 1
    });

    let fs: Filesystem = serde_json::from_value(json).expect("Failed to parse Filesystem");
    assert_eq!(fs.fs_type.as_deref(), Some("ext4"));
    assert_eq!(fs.size, 1000);
    assert_eq!(fs.available, 250);
    assert!(fs.mounted);
    assert!(fs.label.is_none());
}

#[test]
fn test_filesystem_rejects_garbage_size() {
    let json = json!({"devicefile": "/dev/sda1", "size": "lots"});

    let result: Result<Filesystem, _> = serde_json::from_value(json);
    assert!(result.is_err());
}

#[test]
fn test_deserialize_raid_without_members() {
    let raid: RaidDevice =
        serde_json::from_value(json!({"devicefile": "/dev/md0", "name": "md0"})).unwrap();

    assert!(raid.devices.is_empty());
    assert!(raid.state.is_none());
}

#[test]
fn test_deserialize_health_sensor() {
    let sensor: HealthSensor =
        serde_json::from_value(json!({"name": "CPU Fan", "index": 1, "value": "1200"})).unwrap();

    assert_eq!(sensor.value, Some(1200.0));
}

#[test]
fn test_records_accepts_pages_arrays_and_null() {
    let bare: Vec<RaidDevice> = records(&json!([{"devicefile": "/dev/md0"}])).unwrap();
    let paged: Vec<RaidDevice> =
        records(&json!({"total": 1, "data": [{"devicefile": "/dev/md0"}]})).unwrap();
    let empty: Vec<RaidDevice> = records(&json!(null)).unwrap();

    assert_eq!(bare.len(), 1);
    assert_eq!(paged.len(), 1);
    assert!(empty.is_empty());
    assert!(records::<RaidDevice>(&json!({"total": 0})).is_err());
}
