//! Error types shared by the Portal crates

/// Standard result type for core operations
pub type PortalResult<T> = std::result::Result<T, PortalError>;

/// Errors raised by the session layer and its injected dependencies
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortalError {
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Storage operation failed: {message}")]
    Storage { message: String },

    #[error("Navigation failed: {message}")]
    Navigation { message: String },

    #[error("Document query failed: {message}")]
    Document { message: String },
}

impl PortalError {
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn navigation(message: impl Into<String>) -> Self {
        Self::Navigation {
            message: message.into(),
        }
    }

    pub fn document(message: impl Into<String>) -> Self {
        Self::Document {
            message: message.into(),
        }
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}

impl From<config::ConfigError> for PortalError {
    fn from(err: config::ConfigError) -> Self {
        Self::invalid_config(err.to_string())
    }
}

/// Reasons a stored access token could not be read as user claims
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("no access token stored")]
    Missing,

    #[error("expected 3 dot-separated segments, found {0}")]
    SegmentCount(usize),

    #[error("payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("payload is not a JSON object")]
    NotAnObject,

    #[error("storage unavailable: {0}")]
    Storage(#[from] PortalError),
}
