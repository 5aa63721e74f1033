//! Fan and temperature sensors (`Health.getHealthInfo`).

use crate::error::Result;
use crate::omv::types::{records, HealthSensor};
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct Health {
    raw: Value,
    sensors: Vec<HealthSensor>,
}

impl Health {
    pub fn from_response(raw: Value) -> Result<Self> {
        let sensors = records(&raw)?;
        Ok(Self { raw, sensors })
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn sensors(&self) -> &[HealthSensor] {
        &self.sensors
    }

    /// Indices of sensors whose name contains `Fan` (case-sensitive).
    pub fn fans(&self) -> Vec<i64> {
        self.indices_matching("Fan")
    }

    /// Indices of sensors whose name contains `temperature` (case-sensitive).
    pub fn temps(&self) -> Vec<i64> {
        self.indices_matching("temperature")
    }

    pub fn fan_value(&self, index: i64) -> Option<f64> {
        self.sensor(index)?.value
    }

    pub fn temp_value(&self, index: i64) -> Option<f64> {
        self.sensor(index)?.value
    }

    fn sensor(&self, index: i64) -> Option<&HealthSensor> {
        self.sensors.iter().find(|s| s.index == index)
    }

    fn indices_matching(&self, needle: &str) -> Vec<i64> {
        self.sensors
            .iter()
            .filter(|s| s.name.contains(needle))
            .map(|s| s.index)
            .collect()
    }
}
