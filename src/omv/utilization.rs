//! Host identity and live load/memory figures (`System.getInformation`).

use crate::error::Result;
use crate::omv::types::SystemInformation;
use serde_json::{json, Value};

/// Immutable snapshot of one `System.getInformation` response.
#[derive(Debug, Clone)]
pub struct Utilization {
    raw: Value,
    info: SystemInformation,
}

impl Utilization {
    pub fn from_response(raw: Value) -> Result<Self> {
        let info = serde_json::from_value(raw.clone())?;
        Ok(Self { raw, info })
    }

    pub fn info(&self) -> &SystemInformation {
        &self.info
    }

    /// Flat host mapping, values passed through as the appliance sent them.
    pub fn detailed_host(&self) -> Value {
        let field = |key: &str| self.raw.get(key).cloned().unwrap_or(Value::Null);
        json!({
            "hostname": field("hostname"),
            "version": field("version"),
            "processor": field("cpuModelName"),
            "kernel": field("kernel"),
            "time": field("time"),
            "uptime": field("uptime"),
            "loadAverage": field("loadAverage"),
            "cpuUsage": field("cpuUsage"),
            "memTotal": field("memTotal"),
            "memFree": field("memFree"),
            "memUsed": field("memUsed"),
            "configDirty": field("configDirty"),
            "rebootRequired": field("rebootRequired"),
            "pkgUpdatesAvailable": field("pkgUpdatesAvailable"),
        })
    }

    pub fn hostname(&self) -> &str {
        &self.info.hostname
    }

    pub fn version(&self) -> &str {
        &self.info.version
    }

    pub fn processor(&self) -> &str {
        &self.info.cpu_model_name
    }

    pub fn kernel(&self) -> &str {
        &self.info.kernel
    }

    /// Uptime as reported; seconds on current releases, a preformatted
    /// string on older ones.
    pub fn up_time(&self) -> &Value {
        &self.info.uptime
    }

    pub fn cpu_total_load(&self) -> f64 {
        self.info.cpu_usage
    }

    pub fn cpu_1min_load(&self) -> f64 {
        self.info.load_average.one
    }

    pub fn cpu_5min_load(&self) -> f64 {
        self.info.load_average.five
    }

    pub fn cpu_15min_load(&self) -> f64 {
        self.info.load_average.fifteen
    }

    pub fn mem_total(&self) -> u64 {
        self.info.mem_total
    }

    pub fn mem_free(&self) -> u64 {
        self.info.mem_free
    }

    pub fn mem_used(&self) -> u64 {
        self.info.mem_used
    }

    pub fn config_dirty(&self) -> bool {
        self.info.config_dirty
    }

    pub fn reboot_required(&self) -> bool {
        self.info.reboot_required
    }

    pub fn pkg_updates_available(&self) -> u64 {
        self.info.pkg_updates_available
    }
}
