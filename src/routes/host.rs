//! Host routes: `/host`, `/services`, `/detailed_host`.

use super::{respond, AppState};
use crate::omv::{format::percent, Connector};
use axum::{extract::State, response::Response};
use serde_json::{json, Value};

/// Uptime arrives as seconds or as a preformatted string.
fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

pub async fn host<C: Connector>(State(state): State<AppState<C>>) -> Response {
    respond("host", state.omv.ensure_utilization().await, |host| {
        json!({
            "hostname": host.hostname(),
            "version": host.version(),
            "processor": host.processor(),
            "kernel": host.kernel(),
            "uptime": display(host.up_time()),
            "cpu_load": percent(host.cpu_total_load()),
            "cpu_load_1min": percent(host.cpu_1min_load()),
            "cpu_load_5min": percent(host.cpu_5min_load()),
            "cpu_load_15min": percent(host.cpu_15min_load()),
            "memory_total": format!("{} KB", host.mem_total()),
            "memory_free": format!("{} KB", host.mem_free()),
            "memory_used": format!("{} KB", host.mem_used()),
            "config_dirty": host.config_dirty(),
            "rebootRequired": host.reboot_required(),
            "pkgUpdatesAvailable": host.pkg_updates_available(),
        })
    })
}

pub async fn detailed_host<C: Connector>(State(state): State<AppState<C>>) -> Response {
    respond("host", state.omv.ensure_utilization().await, |host| {
        host.detailed_host()
    })
}

pub async fn services<C: Connector>(State(state): State<AppState<C>>) -> Response {
    respond("services", state.omv.ensure_services().await, |services| {
        services.service().clone()
    })
}
