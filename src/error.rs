use thiserror::Error;

/// Failure classes of a single RPC exchange with the appliance.
///
/// Callers above the session layer never see these as panics; the
/// telemetry accessors turn every variant into an absent value.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected HTTP status {0}")]
    HttpStatus(u16),

    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("session expired (code {code}): {message}")]
    SessionExpired { code: i64, message: String },

    #[error("RPC error (code {code}): {message}")]
    Application { code: i64, message: String },

    #[error("authentication failed: {0}")]
    LoginFailed(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Whether the session layer should make its one extra attempt.
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            ClientError::Transport(_)
                | ClientError::HttpStatus(_)
                | ClientError::Decode(_)
                | ClientError::SessionExpired { .. }
        )
    }

    /// Short label used for the `outcome` metric dimension.
    pub fn kind(&self) -> &'static str {
        match self {
            ClientError::Transport(_) => "transport",
            ClientError::HttpStatus(_) => "http_status",
            ClientError::Decode(_) => "decode",
            ClientError::SessionExpired { .. } => "session_expired",
            ClientError::Application { .. } => "application",
            ClientError::LoginFailed(_) => "login_failed",
            ClientError::Config(_) => "config",
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
