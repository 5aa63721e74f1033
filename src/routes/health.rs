//! Health routes: `/fans`, `/temps`.

use super::{respond, AppState};
use crate::omv::Connector;
use axum::{extract::State, response::Response};
use serde_json::{json, Value};

pub async fn fans<C: Connector>(State(state): State<AppState<C>>) -> Response {
    respond("health", state.omv.ensure_health().await, |health| {
        health
            .fans()
            .into_iter()
            .map(|id| json!({ "id": id, "fan_speed": health.fan_value(id) }))
            .collect::<Vec<Value>>()
    })
}

pub async fn temps<C: Connector>(State(state): State<AppState<C>>) -> Response {
    respond("health", state.omv.ensure_health().await, |health| {
        health
            .temps()
            .into_iter()
            .map(|id| json!({ "id": id, "temperature": health.temp_value(id) }))
            .collect::<Vec<Value>>()
    })
}
