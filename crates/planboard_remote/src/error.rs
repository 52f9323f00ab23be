use planboard_core::StorageError;

pub type ApiResult<T> = Result<T, ApiError>;

/// Route the UI is sent to when the server rejects the bearer token.
pub const LOGIN_ROUTE: &str = "/login";

/// Remote call failure.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server answered 401; the local session has been cleared.
    #[error("session expired; sign in again at {redirect_to}")]
    SessionExpired { redirect_to: &'static str },
    #[error("server responded {status}: {message}")]
    Status { status: u16, message: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("session store failed: {0}")]
    Session(#[from] StorageError),
}

impl ApiError {
    /// Stable code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::SessionExpired { .. } => "session_expired",
            Self::Status { .. } => "http_status",
            Self::Transport(_) => "transport",
            Self::Decode(_) => "decode",
            Self::Session(_) => "session_store",
        }
    }

    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired { .. })
    }
}
