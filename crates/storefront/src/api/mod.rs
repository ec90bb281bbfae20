//! Typed client for the Kube EC REST API.
//!
//! # Architecture
//!
//! - One [`ApiClient`] for every backend resource (auth, products, orders,
//!   payments, users), cheap to clone
//! - Credentials are passed per call; the client holds no session state, so
//!   a token change never affects requests already in flight
//! - Non-success responses are normalized into [`ApiError::Status`] carrying
//!   the backend's message
//!
//! # Example
//!
//! ```rust,ignore
//! use kube_ec_storefront::api::{ApiClient, ProductQuery};
//!
//! let client = ApiClient::new(&config.api)?;
//!
//! let page = client.list_products(&ProductQuery::new(20)).await?;
//! let auth = client.login(&email, password).await?;
//! let orders = client.list_orders(&auth.user.id, 1, 20, &auth.access_token).await?;
//! ```

mod auth;
mod client;
mod orders;
mod payments;
mod products;
pub mod types;
mod users;

pub use client::ApiClient;
pub use types::*;

use thiserror::Error;

/// Errors that can occur when calling the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection, timeout or body read failure.
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    ///
    /// `message` is the backend's own error text when it sent one, otherwise
    /// `HTTP <status>`.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// Success response did not match the expected shape.
    #[error("JSON parse error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The request URL could not be built.
    #[error("Invalid request URL: {0}")]
    Url(String),
}

impl ApiError {
    /// HTTP status of a non-success response.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the backend reported the resource as missing.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}
