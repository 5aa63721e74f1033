//! Prometheus Metrics Definitions
//!
//! Self-observability for the bridge: how the RPC session to the appliance is
//! behaving. Appliance telemetry itself is served over the REST routes and is
//! not mirrored here.
//!
//! # Metrics
//!
//! - `omv_up` - 1 when the last fetch produced data, 0 otherwise
//! - `omv_rpc_requests_total` - Logical RPC calls by service, method and outcome
//! - `omv_logins_total` - Login attempts by result
//! - `omv_session_resets_total` - Times the session was discarded and rebuilt
//! - `omv_snapshot_fetches_total` - Category fetches/refreshes by result
//!
//! All metrics use the `omv_` namespace prefix.

use prometheus::{Encoder, Gauge, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::Arc;

/// Metrics collector for the bridge
#[derive(Clone)]
pub struct MetricsCollector {
    registry: Arc<Registry>,

    pub up: Arc<Gauge>,
    pub rpc_requests_total: Arc<IntCounterVec>,
    pub logins_total: Arc<IntCounterVec>,
    pub session_resets_total: Arc<IntCounter>,
    pub snapshot_fetches_total: Arc<IntCounterVec>,
}

impl MetricsCollector {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let up = Gauge::with_opts(
            Opts::new(
                "up",
                "Whether the OpenMediaVault RPC API is reachable (1=up, 0=down)",
            )
            .namespace("omv"),
        )?;

        let rpc_requests_total = IntCounterVec::new(
            Opts::new("rpc_requests_total", "Logical RPC calls issued to the appliance")
                .namespace("omv"),
            &["service", "method", "outcome"],
        )?;

        let logins_total = IntCounterVec::new(
            Opts::new("logins_total", "Session login attempts").namespace("omv"),
            &["result"],
        )?;

        let session_resets_total = IntCounter::with_opts(
            Opts::new(
                "session_resets_total",
                "Times the RPC session was discarded and rebuilt",
            )
            .namespace("omv"),
        )?;

        let snapshot_fetches_total = IntCounterVec::new(
            Opts::new(
                "snapshot_fetches_total",
                "Telemetry category fetches and refreshes",
            )
            .namespace("omv"),
            &["category", "result"],
        )?;

        registry.register(Box::new(up.clone()))?;
        registry.register(Box::new(rpc_requests_total.clone()))?;
        registry.register(Box::new(logins_total.clone()))?;
        registry.register(Box::new(session_resets_total.clone()))?;
        registry.register(Box::new(snapshot_fetches_total.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            up: Arc::new(up),
            rpc_requests_total: Arc::new(rpc_requests_total),
            logins_total: Arc::new(logins_total),
            session_resets_total: Arc::new(session_resets_total),
            snapshot_fetches_total: Arc::new(snapshot_fetches_total),
        })
    }

    pub fn record_rpc(&self, service: &str, method: &str, outcome: &str) {
        self.rpc_requests_total
            .with_label_values(&[service, method, outcome])
            .inc();
    }

    pub fn record_login(&self, success: bool) {
        let result = if success { "success" } else { "failure" };
        self.logins_total.with_label_values(&[result]).inc();
    }

    pub fn record_fetch(&self, category: &str, success: bool) {
        let result = if success { "success" } else { "failure" };
        self.snapshot_fetches_total
            .with_label_values(&[category, result])
            .inc();
        self.up.set(if success { 1.0 } else { 0.0 });
    }

    /// Render metrics in Prometheus text format
    pub fn render(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new().expect("Failed to create metrics collector")
    }
}
