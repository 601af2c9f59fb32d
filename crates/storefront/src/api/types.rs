//! Domain types for the Sweet Shop API.
//!
//! These are the canonical shapes the rest of the crate works with. Raw
//! backend payloads are normalized into them by [`super::wire`]; nothing
//! outside the adapter layer ever sees a divergent field name.

use serde::{Deserialize, Serialize};

use sugarplum_core::{Price, SweetId, UserId, UserRole};

// =============================================================================
// Catalog Types
// =============================================================================

/// A purchasable catalog item.
///
/// Owned and mutated exclusively by the backend; the storefront holds
/// read-only snapshots refreshed by re-fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sweet {
    /// Backend-issued opaque identifier.
    pub id: SweetId,
    /// Display name.
    pub name: String,
    /// Category label (free-form, e.g. "Chocolate").
    pub category: String,
    /// Unit price.
    pub price: Price,
    /// Units currently available.
    pub quantity: u32,
    /// Optional marketing description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Optional image reference: a full URL or a Cloudinary public id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Body for creating a sweet (admin).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSweet {
    pub name: String,
    pub category: String,
    pub price: Price,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Body for updating a sweet (admin). Only set fields are sent.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SweetPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Server-side search parameters for `GET /sweets/search`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SweetSearchParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<Price>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<Price>,
}

// =============================================================================
// Auth Types
// =============================================================================

/// An account profile as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub role: UserRole,
}

/// A successful authentication: bearer token plus the profile it belongs to.
#[derive(Debug, Clone)]
pub struct AuthSession {
    /// Bearer token for subsequent API calls.
    pub token: String,
    /// The authenticated account.
    pub user: User,
}

/// Outcome of a registration call.
///
/// Some backend versions log the new account in immediately; others only
/// create it and expect a follow-up login.
#[derive(Debug, Clone)]
pub enum RegisterOutcome {
    /// The backend returned a token: the user is logged in.
    LoggedIn(AuthSession),
    /// Account created; the user must log in explicitly.
    Created,
}

/// Login request body.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Registration request body.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}
