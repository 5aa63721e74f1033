use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub omv: OmvConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub poll: PollConfig,
}

/// Connection settings for the appliance RPC endpoint.
///
/// Values are passed through as-is; nothing here checks that the host
/// resolves or that the credentials are well formed.
#[derive(Debug, Deserialize, Clone)]
pub struct OmvConfig {
    pub host: String,
    #[serde(default = "default_omv_port")]
    pub port: u16,
    #[serde(default = "default_username")]
    pub username: String,
    pub password: SecretString,
    #[serde(default = "default_use_tls")]
    pub use_tls: bool,
    /// OpenMediaVault ships a self-signed certificate, so verification is
    /// off unless explicitly enabled.
    #[serde(default = "default_verify_ssl")]
    pub verify_ssl: bool,
    #[serde(default = "default_rpc_path")]
    pub rpc_path: String,
}

impl OmvConfig {
    pub fn rpc_url(&self) -> String {
        let scheme = if self.use_tls { "https" } else { "http" };
        format!("{}://{}:{}{}", scheme, self.host, self.port, self.rpc_path)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_addr")]
    pub addr: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct PollConfig {
    /// Seconds between background refreshes; 0 disables polling.
    #[serde(default)]
    pub interval_seconds: u64,
}

fn default_omv_port() -> u16 {
    80
}

fn default_username() -> String {
    "admin".to_string()
}

fn default_use_tls() -> bool {
    false
}

fn default_verify_ssl() -> bool {
    false
}

fn default_rpc_path() -> String {
    "/rpc.php".to_string()
}

fn default_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        // Load environment variables from .env if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("OMV_REST").separator("__"))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}
