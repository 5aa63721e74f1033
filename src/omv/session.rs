//! RPC Session Management
//!
//! This module owns the cookie-authenticated session against `rpc.php`.
//!
//! # Protocol
//!
//! - Every call is one POST of `{"service", "method", "params"}`.
//! - Before a non-login call, the session is rebuilt (fresh transport, then
//!   `session.login`) when there are no cookies yet, no transport yet, or the
//!   error flag is set.
//! - A session-expired error code sets the error flag; the rebuild happens on
//!   the next attempt, not the current one.
//!
//! # Retry Decision Table
//!
//! | first attempt                              | action                        |
//! |--------------------------------------------|-------------------------------|
//! | success                                    | return it                     |
//! | session expired                            | retry once (forces re-login)  |
//! | transport failure, non-200 status, decode  | retry once                    |
//! | other application error                    | return it, flag unchanged     |
//! | login failure                              | return it, flag stays set     |
//!
//! The second attempt's outcome is returned as-is; there is no backoff.

use crate::error::{ClientError, Result};
use crate::metrics::MetricsCollector;
use crate::omv::transport::{Connection, Connector, CookieJar, RawResponse};
use crate::omv::types::{is_session_error, Credentials, LoginResponse, RpcRequest, RpcResponse};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Mutable session state. Only ever touched while the client's lock is held.
struct Session<T> {
    cookies: Option<CookieJar>,
    connection: Option<T>,
    error: bool,
}

impl<T> Session<T> {
    fn new() -> Self {
        Self {
            cookies: None,
            connection: None,
            error: false,
        }
    }

    fn needs_login(&self) -> bool {
        self.cookies.is_none() || self.connection.is_none() || self.error
    }

    fn reset(&mut self) {
        self.cookies = None;
        self.connection = None;
        self.error = false;
    }
}

/// Observable view of the session, for diagnostics and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionStatus {
    pub has_cookies: bool,
    pub has_connection: bool,
    pub error: bool,
}

/// Client for the OpenMediaVault JSON-RPC endpoint.
///
/// The whole logical call (login, send, retry) runs under one async mutex, so
/// concurrent callers are serialized and can never race a login or interleave
/// cookie updates.
pub struct RpcClient<C: Connector> {
    connector: C,
    username: String,
    password: SecretString,
    session: Mutex<Session<C::Connection>>,
    metrics: Option<MetricsCollector>,
}

impl<C: Connector> RpcClient<C> {
    pub fn new(connector: C, username: impl Into<String>, password: SecretString) -> Self {
        Self {
            connector,
            username: username.into(),
            password,
            session: Mutex::new(Session::new()),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: MetricsCollector) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub async fn status(&self) -> SessionStatus {
        let session = self.session.lock().await;
        SessionStatus {
            has_cookies: session.cookies.is_some(),
            has_connection: session.connection.is_some(),
            error: session.error,
        }
    }

    /// Issue one logical RPC call and return its `response` member.
    ///
    /// # Arguments
    ///
    /// * `service` - RPC service name (e.g. `"System"`)
    /// * `method` - RPC method name (e.g. `"getInformation"`)
    /// * `params` - Method params; `None` is sent as JSON `null`
    pub async fn call(&self, service: &str, method: &str, params: Option<Value>) -> Result<Value> {
        let body = serde_json::to_string(&RpcRequest::new(service, method, params))?;
        let mut session = self.session.lock().await;

        let result = match self.post(&mut session, &body).await {
            Err(e) if e.is_retriable() => {
                warn!("{}.{} failed ({}), retrying once", service, method, e);
                self.post(&mut session, &body).await
            }
            other => other,
        };

        if let Some(metrics) = &self.metrics {
            let outcome = match &result {
                Ok(_) => "success",
                Err(e) => e.kind(),
            };
            metrics.record_rpc(service, method, outcome);
        }

        result
    }

    /// Best-effort `session.logout`. Returns whether the appliance accepted it;
    /// the error flag is never touched.
    pub async fn logout(&self) -> bool {
        let session = self.session.lock().await;
        let Some(connection) = session.connection.as_ref() else {
            debug!("No open session, skipping logout");
            return false;
        };

        let body = match serde_json::to_string(&RpcRequest::new("session", "logout", None)) {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to encode logout packet: {}", e);
                return false;
            }
        };

        let outcome = match connection.post(body, session.cookies.as_ref()).await {
            Ok(raw) => decode(raw),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(_) => {
                info!("Logged out of OpenMediaVault");
                true
            }
            Err(e) => {
                debug!("Logout failed: {}", e);
                false
            }
        }
    }

    /// One attempt: rebuild the session if needed, then send the packet.
    async fn post(&self, session: &mut Session<C::Connection>, body: &str) -> Result<Value> {
        if session.needs_login() {
            if session.connection.is_some() {
                if let Some(metrics) = &self.metrics {
                    metrics.session_resets_total.inc();
                }
            }
            session.reset();

            debug!("Creating new session");
            let connection = match self.connector.connect() {
                Ok(connection) => connection,
                Err(e) => {
                    session.error = true;
                    return Err(e);
                }
            };
            session.connection = Some(connection);

            if let Err(e) = self.login(session).await {
                warn!("Login failed, unable to process request: {}", e);
                session.error = true;
                return Err(e);
            }
        }

        let connection = session
            .connection
            .as_ref()
            .ok_or_else(|| ClientError::Config("no open transport".to_string()))?;

        debug!("Sending RPC packet: {}", body);
        let raw = connection
            .post(body.to_string(), session.cookies.as_ref())
            .await?;

        let result = decode(raw);
        if let Err(ClientError::SessionExpired { code, .. }) = &result {
            warn!(
                "Session error {}, will re-authenticate on next request",
                code
            );
            session.error = true;
        }
        result
    }

    async fn login(&self, session: &mut Session<C::Connection>) -> Result<()> {
        let credentials = Credentials {
            username: &self.username,
            password: self.password.expose_secret(),
        };
        let params = serde_json::to_value(&credentials)?;
        let body = serde_json::to_string(&RpcRequest::new("session", "login", Some(params)))?;

        let connection = session
            .connection
            .as_ref()
            .ok_or_else(|| ClientError::Config("no open transport".to_string()))?;

        let outcome = match connection.post(body, None).await {
            Ok(raw) => authenticate(raw),
            Err(e) => Err(ClientError::LoginFailed(e.to_string())),
        };

        if let Some(metrics) = &self.metrics {
            metrics.record_login(outcome.is_ok());
        }

        let cookies = outcome?;
        info!(
            "Authenticated to OpenMediaVault as {} ({} cookies)",
            self.username,
            cookies.len()
        );
        session.cookies = Some(cookies);
        Ok(())
    }
}

/// Interpret a login response: HTTP 200 and a truthy
/// `response.authenticated`, or a login failure.
fn authenticate(raw: RawResponse) -> Result<CookieJar> {
    if raw.status != 200 {
        return Err(ClientError::LoginFailed(format!("HTTP status {}", raw.status)));
    }

    let envelope: RpcResponse = serde_json::from_str(&raw.body)
        .map_err(|e| ClientError::LoginFailed(format!("malformed response: {}", e)))?;

    if let Some(error) = envelope.error {
        return Err(ClientError::LoginFailed(
            error.message.unwrap_or_else(|| "Unknown error".to_string()),
        ));
    }

    let login: LoginResponse = serde_json::from_value(envelope.response)
        .map_err(|e| ClientError::LoginFailed(format!("malformed response: {}", e)))?;

    if !login.authenticated {
        return Err(ClientError::LoginFailed(
            "credentials rejected by appliance".to_string(),
        ));
    }

    Ok(CookieJar::from_set_cookie(&raw.set_cookies))
}

/// Interpret a data response. Pure: the caller decides what a session error
/// does to the session.
fn decode(raw: RawResponse) -> Result<Value> {
    if raw.status != 200 {
        warn!("RPC endpoint returned HTTP {}", raw.status);
        return Err(ClientError::HttpStatus(raw.status));
    }

    let envelope: RpcResponse = serde_json::from_str(&raw.body)?;

    let Some(error) = envelope.error else {
        return Ok(envelope.response);
    };

    let message = error.message.unwrap_or_default();
    match error.code {
        Some(code) if is_session_error(code) => Err(ClientError::SessionExpired { code, message }),
        Some(code) => {
            warn!("RPC error {}: {}", code, message);
            if let Some(trace) = error.trace {
                debug!("RPC error trace: {}", trace);
            }
            Err(ClientError::Application { code, message })
        }
        None => Err(ClientError::Decode(serde::de::Error::custom(format!(
            "error object without code: {}",
            message
        )))),
    }
}
