// src/application/error_handling.rs
//
// Error Handling for Commands
//
// ARCHITECTURE:
// - Maps internal errors → front-end responses
// - Provides a consistent error format
// - Never exposes transport internals
// - Logs errors for debugging

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Standard error response for front ends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error_type: ErrorType,
    pub message: String,
    pub details: Option<String>,
}

/// Error categories for front ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// The request line could not be understood
    BadRequest,

    /// Resource not found
    NotFound,

    /// Draft failed validation
    Validation,

    /// Domain invariant violation or unknown name
    DomainError,

    /// Intent not available in the current view
    InvalidTransition,

    /// Remote service or search provider failure
    ExternalService,

    /// Bad or missing configuration
    Configuration,

    /// stdin/stdout failure
    Io,

    /// Other/unknown error
    Internal,
}

impl ErrorResponse {
    /// Create error response from AppError
    pub fn from_app_error(error: AppError) -> Self {
        match error {
            AppError::NotFound => Self::new(ErrorType::NotFound, "Resource not found", None),

            AppError::Validation(validation) => Self::new(
                ErrorType::Validation,
                "Book details are not valid",
                Some(validation.to_string()),
            ),

            AppError::Domain(domain_error) => Self::new(
                ErrorType::DomainError,
                "Domain validation failed",
                Some(domain_error.to_string()),
            ),

            error @ AppError::InvalidTransition { .. } => {
                Self::new(ErrorType::InvalidTransition, error.to_string(), None)
            }

            error if error.is_transport() => {
                log::error!("remote service error: {:?}", error);
                Self::new(
                    ErrorType::ExternalService,
                    "Remote service error",
                    Some("Check logs for details".to_string()),
                )
            }

            error @ (AppError::Config(_) | AppError::InvalidUrl { .. }) => {
                log::error!("configuration error: {}", error);
                Self::new(
                    ErrorType::Configuration,
                    "Configuration is not valid",
                    Some(error.to_string()),
                )
            }

            AppError::Io(io_error) => {
                log::error!("IO error: {:?}", io_error);
                Self::new(
                    ErrorType::Io,
                    "Input/output failed",
                    Some(io_error.to_string()),
                )
            }

            other => {
                log::error!("internal error: {}", other);
                Self::new(ErrorType::Internal, other.to_string(), None)
            }
        }
    }

    fn new(error_type: ErrorType, message: impl Into<String>, details: Option<String>) -> Self {
        Self {
            error_type,
            message: message.into(),
            details,
        }
    }

    /// Create bad request error
    pub fn bad_request(details: impl std::fmt::Display) -> Self {
        Self::new(
            ErrorType::BadRequest,
            "Could not parse command",
            Some(details.to_string()),
        )
    }
}

/// Helper trait to convert Results to ErrorResponse
pub trait ToErrorResponse<T> {
    fn to_error_response(self) -> Result<T, ErrorResponse>;
}

impl<T, E> ToErrorResponse<T> for Result<T, E>
where
    E: Into<AppError>,
{
    fn to_error_response(self) -> Result<T, ErrorResponse> {
        self.map_err(|e| ErrorResponse::from_app_error(e.into()))
    }
}
