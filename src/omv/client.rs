//! OpenMediaVault Telemetry Client
//!
//! [`Openmediavault`] owns the RPC session and the four telemetry categories.
//! Each category is either [`Cached::Unfetched`] or [`Cached::Fetched`]:
//!
//! - `ensure_*` fetches a category on first use and returns the cached
//!   snapshot afterwards without another RPC round trip.
//! - `refresh_*` re-issues the category's calls and replaces the snapshot.
//!   A failed refresh keeps the previous snapshot.
//! - [`Openmediavault::refresh`] refreshes every category fetched so far.
//!
//! Snapshots are handed out as `Arc`s; derived values are computed on the
//! caller's side without holding any lock.
//!
//! # Example
//!
//! ```no_run
//! use omv_rest::config::OmvConfig;
//! use omv_rest::omv::Openmediavault;
//! use secrecy::SecretString;
//!
//! # async fn example() {
//! let config = OmvConfig {
//!     host: "omv.local".to_string(),
//!     port: 443,
//!     username: "admin".to_string(),
//!     password: SecretString::from("openmediavault"),
//!     use_tls: true,
//!     verify_ssl: false,
//!     rpc_path: "/rpc.php".to_string(),
//! };
//!
//! let omv = Openmediavault::new(&config);
//! if let Some(host) = omv.ensure_utilization().await {
//!     println!("{} runs {}", host.hostname(), host.version());
//! }
//! # }
//! ```

use crate::config::OmvConfig;
use crate::error::Result;
use crate::metrics::MetricsCollector;
use crate::omv::health::Health;
use crate::omv::services::Services;
use crate::omv::session::RpcClient;
use crate::omv::storage::Storage;
use crate::omv::transport::{Connector, HttpConnector};
use crate::omv::utilization::Utilization;
use secrecy::SecretString;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Cache slot of one telemetry category.
#[derive(Debug)]
pub enum Cached<T> {
    Unfetched,
    Fetched(Arc<T>),
}

impl<T> Cached<T> {
    pub fn get(&self) -> Option<Arc<T>> {
        match self {
            Cached::Unfetched => None,
            Cached::Fetched(snapshot) => Some(Arc::clone(snapshot)),
        }
    }

    pub fn is_fetched(&self) -> bool {
        matches!(self, Cached::Fetched(_))
    }
}

impl<T> Default for Cached<T> {
    fn default() -> Self {
        Cached::Unfetched
    }
}

pub struct Openmediavault<C: Connector = HttpConnector> {
    rpc: RpcClient<C>,
    metrics: Option<MetricsCollector>,
    utilization: Mutex<Cached<Utilization>>,
    storage: Mutex<Cached<Storage>>,
    health: Mutex<Cached<Health>>,
    services: Mutex<Cached<Services>>,
}

impl Openmediavault<HttpConnector> {
    pub fn new(config: &OmvConfig) -> Self {
        Self::with_connector(
            HttpConnector::from_config(config),
            config.username.clone(),
            config.password.clone(),
        )
    }
}

impl<C: Connector> Openmediavault<C> {
    pub fn with_connector(connector: C, username: impl Into<String>, password: SecretString) -> Self {
        Self {
            rpc: RpcClient::new(connector, username, password),
            metrics: None,
            utilization: Mutex::new(Cached::Unfetched),
            storage: Mutex::new(Cached::Unfetched),
            health: Mutex::new(Cached::Unfetched),
            services: Mutex::new(Cached::Unfetched),
        }
    }

    pub fn with_metrics(mut self, metrics: MetricsCollector) -> Self {
        self.rpc = self.rpc.with_metrics(metrics.clone());
        self.metrics = Some(metrics);
        self
    }

    pub fn rpc(&self) -> &RpcClient<C> {
        &self.rpc
    }

    pub async fn ensure_utilization(&self) -> Option<Arc<Utilization>> {
        self.load("utilization", &self.utilization, false, || self.fetch_utilization())
            .await
    }

    pub async fn refresh_utilization(&self) -> Option<Arc<Utilization>> {
        self.load("utilization", &self.utilization, true, || self.fetch_utilization())
            .await
    }

    pub async fn ensure_storage(&self) -> Option<Arc<Storage>> {
        self.load("storage", &self.storage, false, || self.fetch_storage())
            .await
    }

    pub async fn refresh_storage(&self) -> Option<Arc<Storage>> {
        self.load("storage", &self.storage, true, || self.fetch_storage())
            .await
    }

    pub async fn ensure_health(&self) -> Option<Arc<Health>> {
        self.load("health", &self.health, false, || self.fetch_health())
            .await
    }

    pub async fn refresh_health(&self) -> Option<Arc<Health>> {
        self.load("health", &self.health, true, || self.fetch_health())
            .await
    }

    pub async fn ensure_services(&self) -> Option<Arc<Services>> {
        self.load("services", &self.services, false, || self.fetch_services())
            .await
    }

    pub async fn refresh_services(&self) -> Option<Arc<Services>> {
        self.load("services", &self.services, true, || self.fetch_services())
            .await
    }

    /// Re-fetch every category that has been fetched at least once.
    pub async fn refresh(&self) {
        if self.utilization.lock().await.is_fetched() {
            self.refresh_utilization().await;
        }
        if self.storage.lock().await.is_fetched() {
            self.refresh_storage().await;
        }
        if self.health.lock().await.is_fetched() {
            self.refresh_health().await;
        }
        if self.services.lock().await.is_fetched() {
            self.refresh_services().await;
        }
    }

    pub async fn logout(&self) -> bool {
        self.rpc.logout().await
    }

    /// Return the cached snapshot, fetching it first when unfetched or when
    /// `force` is set. The slot lock is held across the fetch so concurrent
    /// readers of one category share a single round trip.
    async fn load<T, F, Fut>(
        &self,
        category: &str,
        slot: &Mutex<Cached<T>>,
        force: bool,
        fetch: F,
    ) -> Option<Arc<T>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut cached = slot.lock().await;
        if !force {
            if let Some(snapshot) = cached.get() {
                return Some(snapshot);
            }
        }

        let outcome = fetch().await;
        if let Some(metrics) = &self.metrics {
            metrics.record_fetch(category, outcome.is_ok());
        }

        match outcome {
            Ok(snapshot) => {
                info!("Fetched {} snapshot", category);
                *cached = Cached::Fetched(Arc::new(snapshot));
            }
            Err(e) if cached.is_fetched() => {
                warn!("Failed to refresh {}, keeping previous snapshot: {}", category, e);
            }
            Err(e) => {
                warn!("{} unavailable: {}", category, e);
            }
        }

        cached.get()
    }

    async fn fetch_utilization(&self) -> Result<Utilization> {
        let raw = self.rpc.call("System", "getInformation", None).await?;
        Utilization::from_response(raw)
    }

    async fn fetch_storage(&self) -> Result<Storage> {
        let volumes = self
            .rpc
            .call("FileSystemMgmt", "enumerateFilesystems", None)
            .await?;
        let smart = self.rpc.call("Smart", "enumerateDevices", None).await?;
        let raid = self.rpc.call("RaidMgmt", "enumerateDevices", None).await?;
        let disk = self.rpc.call("DiskMgmt", "enumerateDevices", None).await?;
        Storage::from_collections(volumes, smart, raid, disk)
    }

    async fn fetch_health(&self) -> Result<Health> {
        let raw = self.rpc.call("Health", "getHealthInfo", None).await?;
        Health::from_response(raw)
    }

    async fn fetch_services(&self) -> Result<Services> {
        let raw = self.rpc.call("services", "getStatus", None).await?;
        Ok(Services::from_response(raw))
    }
}
