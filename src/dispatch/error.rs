use thiserror::Error;

/// Fallback message when the backend reports failure without saying why
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Why a feature request did not produce a payload
///
/// `Clone` so several waiters on one in-flight request observe the same outcome.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DispatchError {
    #[error("Could not connect to the insights backend at {base_url}. Make sure the backend server is running.")]
    Connection { base_url: String },

    #[error("Request timed out after {seconds}s waiting for the insights backend")]
    Timeout { seconds: u64 },

    #[error("{}", http_message(.status, .detail))]
    Http { status: u16, detail: Option<String> },

    /// Application-level failure, message passed through verbatim
    #[error("{0}")]
    Backend(String),

    #[error("Invalid response from backend: {0}")]
    InvalidResponse(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

fn http_message(status: &u16, detail: &Option<String>) -> String {
    match detail {
        Some(detail) => format!("HTTP error! Status: {} ({})", status, detail),
        None => format!("HTTP error! Status: {}", status),
    }
}

impl DispatchError {
    /// Build the error for a body whose status is not `success`
    pub fn from_backend(message: Option<String>) -> Self {
        match message {
            Some(message) if !message.trim().is_empty() => Self::Backend(message),
            _ => Self::Backend(UNKNOWN_ERROR.to_string()),
        }
    }

    /// HTTP status code, when the failure came from one
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the backend could not be reached at all
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Connection { .. } | Self::Timeout { .. })
    }
}
