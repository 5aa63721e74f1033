pub mod client;
pub mod format;
pub mod health;
pub mod services;
pub mod session;
pub mod storage;
pub mod transport;
pub mod types;
pub mod utilization;

pub use client::{Cached, Openmediavault};
pub use session::{RpcClient, SessionStatus};
pub use transport::{Connection, Connector, CookieJar, HttpConnector, RawResponse};
