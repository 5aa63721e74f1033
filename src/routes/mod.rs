//! REST Routes
//!
//! Read-only HTTP view over the telemetry snapshots.
//!
//! # Architecture
//!
//! Handlers follow a consistent pattern:
//! - Ask [`Openmediavault`] for the category snapshot (fetching it on first use)
//! - Map the snapshot into a flat JSON body via [`respond`]
//! - Wrap it in the `{"status_code", "response"}` envelope
//!
//! A category the appliance could not deliver becomes a 502 with a `null`
//! response; absent per-entity values serialize as `null`.
//!
//! The [`ROUTES`] table drives both the `/` index and the generated
//! `/openapi.json` document.

use crate::metrics::MetricsCollector;
use crate::omv::{Connector, Openmediavault};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::error;

pub mod health;
pub mod host;
pub mod storage;

/// Shared handler state.
pub struct AppState<C: Connector> {
    pub omv: Arc<Openmediavault<C>>,
    pub metrics: MetricsCollector,
}

impl<C: Connector> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            omv: Arc::clone(&self.omv),
            metrics: self.metrics.clone(),
        }
    }
}

/// One documented endpoint.
#[derive(Debug, Clone, Copy)]
pub struct RouteInfo {
    pub path: &'static str,
    pub name: &'static str,
    pub tag: Option<&'static str>,
    pub summary: &'static str,
}

pub const TAGS: &[(&str, &str)] = &[
    ("host", "OpenMediaVault host data and services."),
    ("storage", "OpenMediaVault volume, disk and raid data."),
    ("health", "OpenMediaVault health data, fans and temperature."),
];

pub const ROUTES: &[RouteInfo] = &[
    RouteInfo {
        path: "/",
        name: "index",
        tag: None,
        summary: "List available routes",
    },
    RouteInfo {
        path: "/host",
        name: "host",
        tag: Some("host"),
        summary: "Host identity, load and memory",
    },
    RouteInfo {
        path: "/services",
        name: "services",
        tag: Some("host"),
        summary: "Service status records",
    },
    RouteInfo {
        path: "/detailed_host",
        name: "detailed_host",
        tag: Some("host"),
        summary: "Raw host information",
    },
    RouteInfo {
        path: "/volumes",
        name: "volumes",
        tag: Some("storage"),
        summary: "Filesystems with usage and disk temperatures",
    },
    RouteInfo {
        path: "/disks",
        name: "disks",
        tag: Some("storage"),
        summary: "SMART-monitored disks",
    },
    RouteInfo {
        path: "/raids",
        name: "raids",
        tag: Some("storage"),
        summary: "Software RAID arrays",
    },
    RouteInfo {
        path: "/detailed_storage",
        name: "detailed_storage",
        tag: Some("storage"),
        summary: "Raw storage collections",
    },
    RouteInfo {
        path: "/fans",
        name: "fans",
        tag: Some("health"),
        summary: "Fan speed sensors",
    },
    RouteInfo {
        path: "/temps",
        name: "temps",
        tag: Some("health"),
        summary: "Temperature sensors",
    },
    RouteInfo {
        path: "/openapi.json",
        name: "openapi",
        tag: None,
        summary: "OpenAPI description of this API",
    },
    RouteInfo {
        path: "/health",
        name: "health_check",
        tag: None,
        summary: "Bridge health (200 when the appliance answers)",
    },
    RouteInfo {
        path: "/metrics",
        name: "metrics",
        tag: None,
        summary: "Prometheus metrics of the bridge",
    },
];

pub fn router<C: Connector>(state: AppState<C>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/host", get(host::host::<C>))
        .route("/services", get(host::services::<C>))
        .route("/detailed_host", get(host::detailed_host::<C>))
        .route("/volumes", get(storage::volumes::<C>))
        .route("/disks", get(storage::disks::<C>))
        .route("/raids", get(storage::raids::<C>))
        .route("/detailed_storage", get(storage::detailed_storage::<C>))
        .route("/fans", get(health::fans::<C>))
        .route("/temps", get(health::temps::<C>))
        .route("/openapi.json", get(openapi))
        .route("/health", get(health_check::<C>))
        .route("/metrics", get(metrics_handler::<C>))
        .with_state(state)
}

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub status_code: u16,
    pub response: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Render a category snapshot, or a 502 when the category is unavailable.
///
/// # Arguments
///
/// * `category` - Category name used in the error message
/// * `snapshot` - Result of an `ensure_*` call
/// * `render` - Maps the snapshot into the response body
pub fn respond<T, R, F>(category: &str, snapshot: Option<Arc<T>>, render: F) -> Response
where
    R: Serialize,
    F: FnOnce(&T) -> R,
{
    match snapshot {
        Some(snapshot) => Json(Envelope {
            status_code: StatusCode::OK.as_u16(),
            response: render(&snapshot),
            error: None,
        })
        .into_response(),
        None => (
            StatusCode::BAD_GATEWAY,
            Json(Envelope {
                status_code: StatusCode::BAD_GATEWAY.as_u16(),
                response: Value::Null,
                error: Some(format!("{} data unavailable from OpenMediaVault", category)),
            }),
        )
            .into_response(),
    }
}

async fn index() -> impl IntoResponse {
    let routes: Vec<Value> = ROUTES
        .iter()
        .map(|route| json!({ "path": route.path, "name": route.name }))
        .collect();
    Json(routes)
}

/// OpenAPI 3 document generated from [`ROUTES`] and [`TAGS`].
pub fn openapi_document() -> Value {
    let mut paths = Map::new();
    for route in ROUTES {
        let mut operation = json!({
            "operationId": route.name,
            "summary": route.summary,
            "responses": {
                "200": {
                    "description": "Successful Response",
                    "content": { "application/json": { "schema": {} } }
                }
            }
        });
        if let Some(tag) = route.tag {
            operation["tags"] = json!([tag]);
            operation["responses"]["502"] = json!({
                "description": "Data unavailable from the appliance"
            });
        }
        paths.insert(route.path.to_string(), json!({ "get": operation }));
    }

    let tags: Vec<Value> = TAGS
        .iter()
        .map(|(name, description)| json!({ "name": name, "description": description }))
        .collect();

    json!({
        "openapi": "3.0.3",
        "info": {
            "title": "OpenMediaVault REST API",
            "version": env!("CARGO_PKG_VERSION"),
        },
        "tags": tags,
        "paths": paths,
    })
}

async fn openapi() -> impl IntoResponse {
    Json(openapi_document())
}

async fn health_check<C: Connector>(State(state): State<AppState<C>>) -> impl IntoResponse {
    if state.metrics.up.get() == 0.0 {
        // A refresh records its outcome in `omv_up`
        state.omv.refresh_utilization().await;
    }

    if state.metrics.up.get() > 0.0 {
        (StatusCode::OK, "OK")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "OpenMediaVault API unreachable")
    }
}

async fn metrics_handler<C: Connector>(State(state): State<AppState<C>>) -> Response {
    match state.metrics.render() {
        Ok(metrics) => metrics.into_response(),
        Err(e) => {
            error!("Failed to render metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error rendering metrics: {}", e),
            )
                .into_response()
        }
    }
}
