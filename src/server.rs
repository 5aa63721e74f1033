//! HTTP Server
//!
//! Assembles the REST router around one shared [`Openmediavault`] client and
//! serves it until Ctrl-C.
//!
//! # Lifecycle
//!
//! 1. Build the client and metrics registry
//! 2. Optionally start the poll loop (`poll.interval_seconds > 0`), which calls
//!    [`Openmediavault::refresh`] on a fixed cadence for every category
//! 3. Serve until a shutdown signal, then issue a best-effort logout

use crate::config::Config;
use crate::metrics::MetricsCollector;
use crate::omv::{Connector, Openmediavault};
use crate::routes::{self, AppState};
use std::sync::Arc;
use tokio::time::{interval, Duration};
use tracing::{info, warn};

pub async fn start(config: Config) -> anyhow::Result<()> {
    let metrics = MetricsCollector::new()?;
    let omv = Arc::new(Openmediavault::new(&config.omv).with_metrics(metrics.clone()));

    let state = AppState {
        omv: Arc::clone(&omv),
        metrics,
    };

    if config.poll.interval_seconds > 0 {
        let poll_omv = Arc::clone(&omv);
        let period = Duration::from_secs(config.poll.interval_seconds);
        tokio::spawn(async move {
            poll_loop(poll_omv, period).await;
        });
    }

    let app = routes::router(state);

    let addr = format!("{}:{}", config.server.addr, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("REST API listening on {}", addr);
    info!("OpenAPI description at http://{}/openapi.json", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down, closing OpenMediaVault session");
    omv.logout().await;

    Ok(())
}

async fn poll_loop<C: Connector>(omv: Arc<Openmediavault<C>>, period: Duration) {
    let mut ticker = interval(period);

    loop {
        ticker.tick().await;
        omv.refresh().await;
        // Categories nobody asked for yet are pulled in on the first tick
        omv.ensure_utilization().await;
        omv.ensure_storage().await;
        omv.ensure_health().await;
        omv.ensure_services().await;
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
