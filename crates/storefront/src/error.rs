//! Unified error handling for page controllers.
//!
//! Every controller returns `Result<Page<V>, AppError>` or renders the error
//! inline through [`AppError::user_message`]. Nothing is retried.

use kube_ec_core::EmailError;
use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::storage::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Backend call failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Durable storage could not be read or written.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Input rejected before any request was sent.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Payment was processed but refused.
    #[error("Payment declined: {0}")]
    PaymentDeclined(String),
}

impl From<EmailError> for AppError {
    fn from(err: EmailError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl AppError {
    /// Text shown inline on the page.
    ///
    /// Backend failures show the backend's own message; local failures get
    /// a short description without internal detail.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(ApiError::Status { message, .. }) => message.clone(),
            Self::Api(ApiError::Transport(e)) if e.is_timeout() => {
                "The server took too long to respond. Please try again.".to_string()
            }
            Self::Api(ApiError::Transport(_)) => {
                "Could not reach the server. Check your connection and try again.".to_string()
            }
            Self::Api(ApiError::Decode(_) | ApiError::Url(_)) => {
                "The server sent an unexpected response.".to_string()
            }
            Self::Storage(_) => "Could not save your changes on this device.".to_string(),
            Self::Config(e) => e.to_string(),
            Self::Validation(message) | Self::NotFound(message) | Self::PaymentDeclined(message) => {
                message.clone()
            }
        }
    }

    /// Log the error at a level matching its kind.
    pub fn log(&self) {
        match self {
            Self::Validation(_) | Self::NotFound(_) => {
                tracing::debug!(error = %self, "Request rejected");
            }
            Self::Api(ApiError::Status { .. }) | Self::PaymentDeclined(_) => {
                tracing::info!(error = %self, "Backend rejected request");
            }
            _ => tracing::error!(error = %self, "Request error"),
        }
    }
}
