//! Storage routes: `/volumes`, `/disks`, `/raids`, `/detailed_storage`.

use super::{respond, AppState};
use crate::omv::{format::percent, Connector};
use axum::{extract::State, response::Response};
use serde_json::{json, Value};

pub async fn volumes<C: Connector>(State(state): State<AppState<C>>) -> Response {
    respond("storage", state.omv.ensure_storage().await, |storage| {
        storage
            .volumes()
            .into_iter()
            .map(|id| {
                json!({
                    "id": id,
                    "status": storage.volume_status(id),
                    "device_type": storage.volume_device_type(id),
                    "mounted": storage.volume_mounted(id),
                    "size_total": storage.volume_size_total_readable(id),
                    "size_used": storage.volume_size_used_readable(id),
                    "size_used_p": storage.volume_percentage_used(id).map(percent),
                    "temp_avg": storage.volume_disk_temp_avg(id),
                    "temp_max": storage.volume_disk_temp_max(id),
                })
            })
            .collect::<Vec<Value>>()
    })
}

pub async fn disks<C: Connector>(State(state): State<AppState<C>>) -> Response {
    respond("storage", state.omv.ensure_storage().await, |storage| {
        storage
            .disks()
            .into_iter()
            .map(|id| {
                json!({
                    "id": id,
                    "name": storage.disk_name(id),
                    "smart_status": storage.disk_smart_status(id),
                    "temp": storage.disk_temp(id),
                    "raid": storage.raid_of_disk(id),
                })
            })
            .collect::<Vec<Value>>()
    })
}

pub async fn raids<C: Connector>(State(state): State<AppState<C>>) -> Response {
    respond("storage", state.omv.ensure_storage().await, |storage| {
        storage
            .raids()
            .into_iter()
            .map(|id| {
                json!({
                    "id": id,
                    "raid_name": storage.raid_name(id),
                    "raid_devices": storage.raid_devices(id),
                })
            })
            .collect::<Vec<Value>>()
    })
}

pub async fn detailed_storage<C: Connector>(State(state): State<AppState<C>>) -> Response {
    respond("storage", state.omv.ensure_storage().await, |storage| {
        storage.detailed_storage().clone()
    })
}
