//! Sweet Shop API client.
//!
//! # Architecture
//!
//! - The backend is the source of truth - NO local sync, direct API calls
//! - Plain REST/JSON over `reqwest`
//! - In-memory caching via `moka` for the sweet listing (TTL from config),
//!   invalidated after every mutation
//! - Divergent backend payload shapes are normalized in [`wire`] before any
//!   other code sees them
//!
//! # Example
//!
//! ```rust,ignore
//! use sugarplum_storefront::api::SweetShopClient;
//!
//! let client = SweetShopClient::new(&config);
//!
//! // Browse anonymously
//! let sweets = client.list_sweets().await?;
//!
//! // Authenticate, then purchase
//! let session = client.login(&LoginRequest { username, password }).await?;
//! client.purchase(&session.token, &sweets[0].id, 2).await?;
//! ```

mod client;
pub mod types;
pub mod wire;

pub use client::SweetShopClient;
pub use types::*;

use thiserror::Error;

/// Errors that can occur when talking to the Sweet Shop API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connect, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not valid JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Response was valid JSON but matched no known payload shape.
    #[error("Unexpected response shape: {0}")]
    Shape(String),

    /// The bearer token was missing, expired, or revoked.
    #[error("Unauthorized")]
    Unauthorized,

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The backend rejected the request.
    #[error("{message}")]
    Backend {
        /// HTTP status code of the response.
        status: u16,
        /// User-facing message extracted from the error body.
        message: String,
    },
}

impl ApiError {
    /// Whether the session user should be logged out in response.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}
