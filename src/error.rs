use thiserror::Error;

use crate::model::role::Role;

pub type Result<T, E = PortalError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum PortalError {
    /// Rejected on the client before any request went out.
    #[error("{0}")]
    Validation(String),

    /// The backend answered with a non-success status.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// 401 from the backend. The session has already been cleared.
    #[error("Session expired. Please log in again.")]
    Unauthorized,

    #[error("Not logged in. Run `hrm-portal login` first.")]
    NotLoggedIn,

    #[error("{0} only")]
    Forbidden(Role),

    #[error("Request timeout. Please try again.")]
    Timeout,

    #[error("Network error. Please check your connection.")]
    Network(#[source] reqwest::Error),

    #[error("Unexpected response from server: {0}")]
    Decode(String),

    #[error("Session storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl PortalError {
    pub fn validation(message: impl Into<String>) -> Self {
        PortalError::Validation(message.into())
    }

    /// Whether the caller should send the user back to the login step.
    pub fn requires_login(&self) -> bool {
        matches!(self, PortalError::Unauthorized | PortalError::NotLoggedIn)
    }
}

impl From<reqwest::Error> for PortalError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            PortalError::Timeout
        } else if e.is_decode() {
            PortalError::Decode(e.to_string())
        } else {
            PortalError::Network(e)
        }
    }
}

impl From<serde_json::Error> for PortalError {
    fn from(e: serde_json::Error) -> Self {
        PortalError::Decode(e.to_string())
    }
}
