//! OpenMediaVault RPC Type Definitions
//!
//! Wire envelope types for `rpc.php` and the record types decoded from each
//! telemetry call.
//!
//! # Design Notes
//!
//! - **Raw payloads are kept**: snapshots store the decoded `serde_json::Value`
//!   next to the typed records, so the `detailed_*` views stay a faithful
//!   pass-through of what the appliance sent.
//! - **Lenient numbers**: depending on the OMV release, sizes and counters
//!   arrive either as JSON numbers or as numeric strings. The [`lenient`]
//!   helpers accept both.
//! - **Serde defaults**: optional or release-dependent fields use
//!   `#[serde(default)]` so one missing key does not drop a whole category.
//!
//! # RPC Calls Covered
//!
//! - `System.getInformation` → [`SystemInformation`], [`LoadAverage`]
//! - `FileSystemMgmt.enumerateFilesystems` → [`Filesystem`]
//! - `Smart.enumerateDevices` → [`SmartDevice`]
//! - `RaidMgmt.enumerateDevices` → [`RaidDevice`]
//! - `DiskMgmt.enumerateDevices` → [`DiskDevice`]
//! - `Health.getHealthInfo` → [`HealthSensor`]
//! - `services.getStatus` → opaque JSON

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Appliance error codes that mean the current cookie set is no longer valid.
pub const SESSION_ERROR_CODES: [i64; 7] = [0, 105, 106, 107, 119, 5000, 5001];

pub fn is_session_error(code: i64) -> bool {
    SESSION_ERROR_CODES.contains(&code)
}

/// One RPC call. Always serialized with exactly `service`, `method` and
/// `params`; absent params go out as JSON `null`.
#[derive(Debug, Serialize)]
pub struct RpcRequest<'a> {
    pub service: &'a str,
    pub method: &'a str,
    pub params: Value,
}

impl<'a> RpcRequest<'a> {
    pub fn new(service: &'a str, method: &'a str, params: Option<Value>) -> Self {
        Self {
            service,
            method,
            params: params.unwrap_or(Value::Null),
        }
    }
}

/// Params of a `session.login` call.
#[derive(Debug, Serialize)]
pub struct Credentials<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Response envelope returned by `rpc.php`.
///
/// Both members must be present; `error` may be `null`. A body missing
/// either key is a decode failure.
#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    pub response: Value,
    #[serde(deserialize_with = "present")]
    pub error: Option<RpcErrorBody>,
}

/// Deserializes an `Option` field without serde's implicit `None` for a
/// missing key.
fn present<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(d)
}

#[derive(Debug, Deserialize)]
pub struct RpcErrorBody {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub trace: Option<String>,
}

/// `response` member of a successful `session.login`.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    #[serde(default, deserialize_with = "lenient::truthy")]
    pub authenticated: bool,
    #[serde(default)]
    pub username: Option<String>,
}

/// Host identity and live metrics from `System.getInformation`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemInformation {
    pub hostname: String,
    pub version: String,
    #[serde(default)]
    pub cpu_model_name: String,
    #[serde(default)]
    pub kernel: String,
    #[serde(default)]
    pub time: Value,
    #[serde(default)]
    pub uptime: Value,
    #[serde(default)]
    pub load_average: LoadAverage,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub cpu_usage: f64,
    #[serde(default, deserialize_with = "lenient::u64")]
    pub mem_total: u64,
    #[serde(default, deserialize_with = "lenient::u64")]
    pub mem_free: u64,
    #[serde(default, deserialize_with = "lenient::u64")]
    pub mem_used: u64,
    #[serde(default, deserialize_with = "lenient::truthy")]
    pub config_dirty: bool,
    #[serde(default, deserialize_with = "lenient::truthy")]
    pub reboot_required: bool,
    #[serde(default, deserialize_with = "lenient::u64")]
    pub pkg_updates_available: u64,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct LoadAverage {
    #[serde(rename = "1min", default, deserialize_with = "lenient::f64")]
    pub one: f64,
    #[serde(rename = "5min", default, deserialize_with = "lenient::f64")]
    pub five: f64,
    #[serde(rename = "15min", default, deserialize_with = "lenient::f64")]
    pub fifteen: f64,
}

/// A mounted or known filesystem from `FileSystemMgmt.enumerateFilesystems`.
#[derive(Debug, Clone, Deserialize)]
pub struct Filesystem {
    pub devicefile: String,
    #[serde(default)]
    pub parentdevicefile: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(rename = "type", default)]
    pub fs_type: Option<String>,
    #[serde(default)]
    pub mountpoint: Option<String>,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub size: i64,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub available: i64,
    #[serde(default, deserialize_with = "lenient::truthy")]
    pub mounted: bool,
}

/// A SMART-monitored disk from `Smart.enumerateDevices`.
#[derive(Debug, Clone, Deserialize)]
pub struct SmartDevice {
    pub devicefile: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub serialnumber: Option<String>,
    #[serde(default)]
    pub overallstatus: Option<String>,
    /// Usually a string such as `"35°C"`; kept raw and parsed on demand.
    #[serde(default)]
    pub temperature: Value,
}

/// A software RAID array from `RaidMgmt.enumerateDevices`.
#[derive(Debug, Clone, Deserialize)]
pub struct RaidDevice {
    pub devicefile: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub devices: Vec<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
}

/// A block device from `DiskMgmt.enumerateDevices`.
#[derive(Debug, Clone, Deserialize)]
pub struct DiskDevice {
    pub devicefile: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub serialnumber: Option<String>,
    #[serde(default, deserialize_with = "lenient::u64")]
    pub size: u64,
}

/// One sensor reading from `Health.getHealthInfo`.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthSensor {
    #[serde(default)]
    pub name: String,
    pub index: i64,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub value: Option<f64>,
}

/// Deserializers for fields the appliance sends as numbers, numeric
/// strings, booleans or `null` depending on release.
pub mod lenient {
    use serde::de::{Deserializer, Error};
    use serde::Deserialize;
    use serde_json::Value;

    fn number<E: Error>(value: &Value) -> Result<Option<f64>, E> {
        match value {
            Value::Null => Ok(None),
            Value::Bool(b) => Ok(Some(if *b { 1.0 } else { 0.0 })),
            Value::Number(n) => Ok(n.as_f64()),
            Value::String(s) if s.trim().is_empty() => Ok(None),
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|_| E::custom(format!("expected a number, got {:?}", s))),
            other => Err(E::custom(format!("expected a number, got {}", other))),
        }
    }

    pub fn opt_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        let value = Value::deserialize(d)?;
        number(&value)
    }

    pub fn f64<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        Ok(opt_f64(d)?.unwrap_or_default())
    }

    pub fn i64<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
        let value = Value::deserialize(d)?;
        if let Some(n) = value.as_i64() {
            return Ok(n);
        }
        if let Value::String(s) = &value {
            if let Ok(n) = s.trim().parse::<i64>() {
                return Ok(n);
            }
        }
        Ok(number::<D::Error>(&value)?.unwrap_or_default() as i64)
    }

    pub fn u64<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
        let value = Value::deserialize(d)?;
        if let Some(n) = value.as_u64() {
            return Ok(n);
        }
        if let Value::String(s) = &value {
            if let Ok(n) = s.trim().parse::<u64>() {
                return Ok(n);
            }
        }
        Ok(number::<D::Error>(&value)?.unwrap_or_default().max(0.0) as u64)
    }

    /// Python-style truthiness: `false`, `0`, `""` and `null` are false.
    pub fn truthy<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        let value = Value::deserialize(d)?;
        Ok(match value {
            Value::Null => false,
            Value::Bool(b) => b,
            Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
            Value::String(s) => !s.is_empty(),
            Value::Array(a) => !a.is_empty(),
            Value::Object(o) => !o.is_empty(),
        })
    }
}

/// Decode a list payload. Depending on the call, the appliance returns either
/// a bare array or a `{"total": n, "data": [...]}` page.
pub fn records<T: serde::de::DeserializeOwned>(value: &Value) -> serde_json::Result<Vec<T>> {
    match value {
        Value::Object(page) if page.get("data").is_some_and(Value::is_array) => {
            Vec::<T>::deserialize(&page["data"])
        }
        Value::Null => Ok(Vec::new()),
        other => Vec::<T>::deserialize(other),
    }
}
