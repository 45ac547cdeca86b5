//! Errors raised while fetching content or persisting gate state.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Failed to read content: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid content JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Access marker error: {0}")]
    Marker(String),
}

impl ContentError {
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    pub fn marker(err: impl std::fmt::Display) -> Self {
        Self::Marker(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ContentError>;
