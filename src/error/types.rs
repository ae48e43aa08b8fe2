// src/error/types.rs
use crate::domain::{DomainError, ValidationError, ViewMode};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Remote service returned status {status} for {url}")]
    RemoteStatus { status: u16, url: String },

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("{operation} is not available in {mode} view")]
    InvalidTransition {
        operation: &'static str,
        mode: ViewMode,
    },

    #[error("Resource not found")]
    NotFound,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(String),
}

impl AppError {
    /// True for failures of the remote services rather than of local input.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            AppError::Http(_) | AppError::RemoteStatus { .. } | AppError::Decode(_)
        )
    }
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_status_is_transport() {
        let error = AppError::RemoteStatus {
            status: 503,
            url: "http://localhost/books".to_string(),
        };
        assert!(error.is_transport());
        assert_eq!(
            error.to_string(),
            "Remote service returned status 503 for http://localhost/books"
        );
    }

    #[test]
    fn test_invalid_transition_message() {
        let error = AppError::InvalidTransition {
            operation: "submit",
            mode: ViewMode::List,
        };
        assert!(!error.is_transport());
        assert_eq!(error.to_string(), "submit is not available in list view");
    }

    #[test]
    fn test_serializes_as_message() {
        let json = serde_json::to_string(&AppError::NotFound).unwrap();
        assert_eq!(json, "\"Resource not found\"");
    }
}
