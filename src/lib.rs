//! OpenMediaVault REST API
//!
//! A read-only REST facade over the OpenMediaVault JSON-RPC management API.
//!
//! # Overview
//!
//! The bridge logs into the appliance's `rpc.php` endpoint with session
//! cookies, pulls host, storage, health and service telemetry on demand, and
//! republishes it as flat JSON documents together with a generated OpenAPI
//! description.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐   HTTP POST rpc.php   ┌──────────────────┐
//! │ OpenMediaVault  │ ◄───────────────────► │     Bridge       │
//! │                 │   JSON-RPC + cookies  │                  │
//! └─────────────────┘                       │  ┌────────────┐  │      HTTP      ┌────────┐
//!                                           │  │ RpcClient  │  │ ◄────────────► │ Client │
//!                                           │  └────────────┘  │  /host /volumes └────────┘
//!                                           │  ┌────────────┐  │  /fans ...
//!                                           │  │ Snapshots  │  │
//!                                           │  └────────────┘  │
//!                                           └──────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`omv`] - RPC session client, snapshots and derived values
//! - [`routes`] - REST handlers and OpenAPI document
//! - [`server`] - HTTP server and optional poll loop
//! - [`metrics`] - Prometheus self-observability
//! - [`config`] - Configuration management
//! - [`error`] - Error types
//!
//! # Quick Start
//!
//! ```no_run
//! use omv_rest::{config::Config, server};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/Default.toml")?;
//!     server::start(config).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod metrics;
pub mod omv;
pub mod routes;
pub mod server;
