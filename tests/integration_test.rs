use omv_rest::config::Config;
use omv_rest::omv::{HttpConnector, Openmediavault};

#[test]
fn test_config_load() {
    // This assumes config/Default.toml exists relative to where cargo test is run
    let config_res = Config::load("config/Default.toml");
    assert!(config_res.is_ok(), "Failed to load default config");
}

#[test]
fn test_default_config_points_at_rpc_php() {
    let config = Config::load("config/Default.toml").expect("Failed to load default config");

    assert!(config.omv.rpc_url().ends_with("/rpc.php"));
    assert_eq!(config.server.port, 8000);
}

#[test]
fn test_http_connector_from_config() {
    let mut config = Config::load("config/Default.toml").expect("Failed to load default config");
    config.omv.host = "omv.example".to_string();
    config.omv.port = 443;
    config.omv.use_tls = true;

    let connector = HttpConnector::from_config(&config.omv);

    assert_eq!(connector.url(), "https://omv.example:443/rpc.php");
}

#[tokio::test]
async fn test_client_does_not_connect_until_used() {
    let config = Config::load("config/Default.toml").expect("Failed to load default config");

    let omv = Openmediavault::new(&config.omv);

    let status = omv.rpc().status().await;
    assert!(!status.has_connection);
    assert!(!status.has_cookies);
    assert!(!omv.logout().await);
}
