use anyhow::Result;
use clap::Parser;
use omv_rest::{config::Config, server};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/Default.toml")]
    config: String,

    /// OpenMediaVault host (overrides config)
    #[arg(long, env = "OMV_HOST")]
    omv_host: Option<String>,

    /// OpenMediaVault RPC port (overrides config)
    #[arg(long, env = "OMV_PORT")]
    omv_port: Option<u16>,

    /// OpenMediaVault user (overrides config)
    #[arg(long, env = "OMV_USERNAME")]
    omv_username: Option<String>,

    /// OpenMediaVault password (overrides config)
    #[arg(long, env = "OMV_PASSWORD", hide_env_values = true)]
    omv_password: Option<String>,

    /// Port to serve the REST API on (overrides config)
    #[arg(short, long, env = "OMV_REST_PORT")]
    port: Option<u16>,

    /// Address to bind to (overrides config)
    #[arg(short, long, env = "OMV_REST_ADDR")]
    addr: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting OpenMediaVault REST API v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    let mut config = Config::load(&args.config)?;

    if let Some(host) = args.omv_host {
        config.omv.host = host;
    }
    if let Some(port) = args.omv_port {
        config.omv.port = port;
    }
    if let Some(username) = args.omv_username {
        config.omv.username = username;
    }
    if let Some(password) = args.omv_password {
        config.omv.password = secrecy::SecretString::new(password.into());
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(addr) = args.addr {
        config.server.addr = addr;
    }

    info!("Configuration loaded successfully");
    info!("OpenMediaVault RPC endpoint: {}", config.omv.rpc_url());
    if config.omv.use_tls && !config.omv.verify_ssl {
        info!("TLS certificate verification disabled for the appliance");
    }

    if let Err(e) = server::start(config).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
