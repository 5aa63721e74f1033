//! Health, host and service snapshot tests
//!
//! Tests that verify sensor selection and the host information accessors.

mod common;

use omv_rest::omv::health::Health;
use omv_rest::omv::services::Services;
use omv_rest::omv::utilization::Utilization;
use serde_json::json;

#[test]
fn test_fans_and_temps_are_selected_by_name() {
    // Given: One fan sensor and one temperature sensor
    let health = Health::from_response(common::health_sensors()).unwrap();

    // Then: Each list holds the matching sensor index
    assert_eq!(health.fans(), vec![1]);
    assert_eq!(health.temps(), vec![2]);
    assert_eq!(health.fan_value(1), Some(1200.0));
    assert_eq!(health.temp_value(2), Some(42.0));
}

#[test]
fn test_name_match_is_case_sensitive() {
    // Given: Sensors with lowercase "fan" and capitalised "Temperature"
    let health = Health::from_response(json!([
        {"name": "chassis fan", "index": 3, "value": 800},
        {"name": "CPU Temperature", "index": 4, "value": 50},
        {"name": "Rear Fan 2", "index": 5, "value": "950"}
    ]))
    .unwrap();

    // Then: Only exact-case substrings match
    assert_eq!(health.fans(), vec![5]);
    assert!(health.temps().is_empty());
    assert_eq!(health.fan_value(5), Some(950.0));
}

#[test]
fn test_unknown_index_is_absent() {
    let health = Health::from_response(common::health_sensors()).unwrap();

    assert_eq!(health.fan_value(42), None);
    assert_eq!(health.temp_value(-1), None);
}

#[test]
fn test_sensor_without_value() {
    // Given: A fan sensor reporting null
    let health = Health::from_response(json!([
        {"name": "CPU Fan", "index": 1, "value": null}
    ]))
    .unwrap();

    // Then: The fan is listed but has no value
    assert_eq!(health.fans(), vec![1]);
    assert_eq!(health.fan_value(1), None);
}

#[test]
fn test_empty_health_payload() {
    let health = Health::from_response(serde_json::Value::Null).unwrap();

    assert!(health.sensors().is_empty());
    assert!(health.fans().is_empty());
    assert!(health.raw().is_null());
}

#[test]
fn test_host_accessors() {
    // Given: System information with string-encoded memory figures
    let host = Utilization::from_response(common::system_information()).unwrap();

    // Then: Values are decoded into their natural types
    assert_eq!(host.hostname(), "nas");
    assert_eq!(host.version(), "6.9.1-1 (Shaitan)");
    assert_eq!(host.processor(), "Intel(R) Celeron(R) J4125 CPU @ 2.00GHz");
    assert_eq!(host.kernel(), "Linux 6.1.0-18-amd64");
    assert_eq!(host.up_time(), &json!(86400));
    assert_eq!(host.cpu_total_load(), 3.5);
    assert_eq!(host.cpu_1min_load(), 0.12);
    assert_eq!(host.cpu_5min_load(), 0.2);
    assert_eq!(host.cpu_15min_load(), 0.25);
    assert_eq!(host.mem_total(), 8_130_224);
    assert_eq!(host.mem_free(), 6_021_904);
    assert_eq!(host.mem_used(), 2_108_320);
    assert!(!host.config_dirty());
    assert!(host.reboot_required());
    assert_eq!(host.pkg_updates_available(), 4);
}

#[test]
fn test_detailed_host_is_flat() {
    let host = Utilization::from_response(common::system_information()).unwrap();

    let detailed = host.detailed_host();
    assert_eq!(detailed["hostname"], "nas");
    assert_eq!(
        detailed["processor"],
        "Intel(R) Celeron(R) J4125 CPU @ 2.00GHz"
    );
    assert_eq!(detailed["loadAverage"]["5min"], 0.2);
    assert_eq!(detailed["memTotal"], "8130224");
}

#[test]
fn test_host_requires_hostname() {
    let result = Utilization::from_response(json!({"version": "7.0"}));

    assert!(result.is_err());
}

#[test]
fn test_services_are_passed_through() {
    let services = Services::from_response(common::services());

    assert_eq!(services.service(), &common::services());
    assert_eq!(services.service()["data"][0]["name"], "ssh");
}
