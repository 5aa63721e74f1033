//! HTTP transport to the appliance's `rpc.php` endpoint
//!
//! The session layer talks to the appliance through two small traits so the
//! login/retry protocol can be driven against a scripted transport in tests:
//!
//! - [`Connector`] opens a fresh [`Connection`] (a new HTTP client with its own
//!   connection pool). The session opens one per login.
//! - [`Connection::post`] sends one JSON body with the session cookies and
//!   returns status, `Set-Cookie` values and body text.
//!
//! Cookies are handled here explicitly instead of through a client-side cookie
//! store: the session decides when the jar is replaced or discarded.

use crate::config::OmvConfig;
use crate::error::{ClientError, Result};
use reqwest::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use std::future::Future;
use tracing::debug;

/// Status, cookies and body of one HTTP exchange.
#[derive(Debug, Clone, Default)]
pub struct RawResponse {
    pub status: u16,
    pub set_cookies: Vec<String>,
    pub body: String,
}

/// Cookie set issued by a successful login.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieJar {
    cookies: Vec<(String, String)>,
}

impl CookieJar {
    /// Builds a jar from raw `Set-Cookie` header values, keeping only the
    /// `name=value` pair of each and letting later values win.
    pub fn from_set_cookie<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut jar = Self::default();
        for header in headers {
            let pair = header.as_ref().split(';').next().unwrap_or_default();
            if let Some((name, value)) = pair.split_once('=') {
                jar.insert(name.trim(), value.trim());
            }
        }
        jar
    }

    pub fn insert(&mut self, name: &str, value: &str) {
        match self.cookies.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.cookies.push((name.to_string(), value.to_string())),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    /// Value for a `Cookie:` request header.
    pub fn header_value(&self) -> String {
        self.cookies
            .iter()
            .map(|(n, v)| format!("{}={}", n, v))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Opens fresh connections to the appliance.
pub trait Connector: Send + Sync + 'static {
    type Connection: Connection;

    fn connect(&self) -> Result<Self::Connection>;
}

/// One open transport handle.
pub trait Connection: Send + Sync + 'static {
    fn post(
        &self,
        body: String,
        cookies: Option<&CookieJar>,
    ) -> impl Future<Output = Result<RawResponse>> + Send;
}

/// reqwest-backed connector for `http(s)://host:port/rpc.php`.
#[derive(Debug, Clone)]
pub struct HttpConnector {
    url: String,
    accept_invalid_certs: bool,
}

impl HttpConnector {
    pub fn new(url: impl Into<String>, accept_invalid_certs: bool) -> Self {
        Self {
            url: url.into(),
            accept_invalid_certs,
        }
    }

    pub fn from_config(config: &OmvConfig) -> Self {
        Self::new(config.rpc_url(), config.use_tls && !config.verify_ssl)
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Connector for HttpConnector {
    type Connection = HttpConnection;

    fn connect(&self) -> Result<HttpConnection> {
        let mut builder = reqwest::Client::builder();

        if self.accept_invalid_certs {
            // Custom TLS connector for self-signed certs
            let tls = native_tls::TlsConnector::builder()
                .danger_accept_invalid_certs(true)
                .danger_accept_invalid_hostnames(true)
                .build()
                .map_err(|e| ClientError::Config(e.to_string()))?;
            builder = builder.use_preconfigured_tls(tls);
        }

        let client = builder.build()?;
        debug!("Opened HTTP transport to {}", self.url);

        Ok(HttpConnection {
            client,
            url: self.url.clone(),
        })
    }
}

pub struct HttpConnection {
    client: reqwest::Client,
    url: String,
}

impl Connection for HttpConnection {
    async fn post(&self, body: String, cookies: Option<&CookieJar>) -> Result<RawResponse> {
        let mut request = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .body(body);

        if let Some(jar) = cookies.filter(|jar| !jar.is_empty()) {
            request = request.header(COOKIE, jar.header_value());
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let set_cookies = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .map(str::to_string)
            .collect();
        let body = response.text().await?;

        Ok(RawResponse {
            status,
            set_cookies,
            body,
        })
    }
}
