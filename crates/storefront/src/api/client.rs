//! Sweet Shop API client implementation.
//!
//! Uses `reqwest` for HTTP with `moka` caching of the sweet listing.
//! Mutations invalidate the cached listing so the next page render
//! re-fetches fresh stock numbers.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde_json::Value;
use tracing::{debug, instrument};

use sugarplum_core::SweetId;

use super::ApiError;
use super::types::{
    AuthSession, LoginRequest, NewSweet, RegisterOutcome, RegisterRequest, Sweet,
    SweetSearchParams, SweetPatch,
};
use super::wire;
use crate::config::StorefrontConfig;

/// Cache key for the full sweet listing.
const SWEETS_CACHE_KEY: &str = "sweets:all";

/// Client for the Sweet Shop API.
///
/// Cheaply cloneable; all clones share one connection pool and one cache.
#[derive(Clone)]
pub struct SweetShopClient {
    inner: Arc<SweetShopClientInner>,
}

struct SweetShopClientInner {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<String, Arc<Vec<Sweet>>>,
}

impl SweetShopClient {
    /// Create a new Sweet Shop API client.
    #[must_use]
    pub fn new(config: &StorefrontConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(config.cache_ttl_secs))
            .build();

        Self {
            inner: Arc::new(SweetShopClientInner {
                client: reqwest::Client::new(),
                base_url: config.api_base_url.clone(),
                cache,
            }),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// Execute a request and normalize the response envelope.
    ///
    /// Maps 401 to [`ApiError::Unauthorized`] and 404 to
    /// [`ApiError::NotFound`]; other non-success statuses become
    /// [`ApiError::Backend`] with the message extracted from the body.
    /// An empty success body parses as JSON null.
    async fn execute(
        &self,
        request: reqwest::RequestBuilder,
        context: &str,
    ) -> Result<Value, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(context.to_string()));
        }
        if !status.is_success() {
            let message = wire::parse_error_message(&body).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            });
            tracing::warn!(
                status = %status,
                context = %context,
                "backend rejected request: {message}"
            );
            return Err(ApiError::Backend {
                status: status.as_u16(),
                message,
            });
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }

    // =========================================================================
    // Sweets
    // =========================================================================

    /// Get the full sweet listing.
    ///
    /// Cached; the cache is invalidated by every mutation on this client.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the payload matches no
    /// known shape.
    #[instrument(skip(self, token))]
    pub async fn list_sweets(&self, token: Option<&str>) -> Result<Arc<Vec<Sweet>>, ApiError> {
        if let Some(sweets) = self.inner.cache.get(SWEETS_CACHE_KEY).await {
            debug!("cache hit for sweet listing");
            return Ok(sweets);
        }

        let mut request = self.inner.client.get(self.endpoint("/sweets"));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let value = self.execute(request, "sweet listing").await?;
        let sweets = Arc::new(wire::parse_sweet_list(&value)?);

        self.inner
            .cache
            .insert(SWEETS_CACHE_KEY.to_string(), Arc::clone(&sweets))
            .await;

        Ok(sweets)
    }

    /// Search sweets on the backend. Never cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the payload matches no
    /// known shape.
    #[instrument(skip(self, token))]
    pub async fn search_sweets(
        &self,
        token: Option<&str>,
        params: &SweetSearchParams,
    ) -> Result<Vec<Sweet>, ApiError> {
        let mut request = self
            .inner
            .client
            .get(self.endpoint("/sweets/search"))
            .query(params);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let value = self.execute(request, "sweet search").await?;
        wire::parse_sweet_list(&value)
    }

    /// Create a sweet (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the request.
    #[instrument(skip(self, token, sweet), fields(name = %sweet.name))]
    pub async fn create_sweet(&self, token: &str, sweet: &NewSweet) -> Result<(), ApiError> {
        let request = self
            .inner
            .client
            .post(self.endpoint("/sweets"))
            .bearer_auth(token)
            .json(sweet);
        self.execute(request, "create sweet").await?;
        self.invalidate_sweets().await;
        Ok(())
    }

    /// Update a sweet (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the sweet does not exist or the backend rejects
    /// the request.
    #[instrument(skip(self, token, patch), fields(sweet_id = %id))]
    pub async fn update_sweet(
        &self,
        token: &str,
        id: &SweetId,
        patch: &SweetPatch,
    ) -> Result<(), ApiError> {
        let request = self
            .inner
            .client
            .put(self.endpoint(&format!("/sweets/{id}")))
            .bearer_auth(token)
            .json(patch);
        self.execute(request, "update sweet").await?;
        self.invalidate_sweets().await;
        Ok(())
    }

    /// Delete a sweet (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the sweet does not exist or the backend rejects
    /// the request.
    #[instrument(skip(self, token), fields(sweet_id = %id))]
    pub async fn delete_sweet(&self, token: &str, id: &SweetId) -> Result<(), ApiError> {
        let request = self
            .inner
            .client
            .delete(self.endpoint(&format!("/sweets/{id}")))
            .bearer_auth(token);
        self.execute(request, "delete sweet").await?;
        self.invalidate_sweets().await;
        Ok(())
    }

    /// Purchase `quantity` units of a sweet.
    ///
    /// One call covers one cart line; checkout issues one call per line.
    ///
    /// # Errors
    ///
    /// Returns an error if stock is insufficient or the backend rejects the
    /// request.
    #[instrument(skip(self, token), fields(sweet_id = %id, quantity))]
    pub async fn purchase(
        &self,
        token: &str,
        id: &SweetId,
        quantity: u32,
    ) -> Result<(), ApiError> {
        let request = self
            .inner
            .client
            .post(self.endpoint(&format!("/sweets/{id}/purchase")))
            .bearer_auth(token)
            .json(&serde_json::json!({ "quantity": quantity }));
        self.execute(request, "purchase").await?;
        self.invalidate_sweets().await;
        Ok(())
    }

    /// Restock a sweet (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the sweet does not exist or the backend rejects
    /// the request.
    #[instrument(skip(self, token), fields(sweet_id = %id, quantity))]
    pub async fn restock(&self, token: &str, id: &SweetId, quantity: u32) -> Result<(), ApiError> {
        let request = self
            .inner
            .client
            .post(self.endpoint(&format!("/sweets/{id}/restock")))
            .bearer_auth(token)
            .json(&serde_json::json!({ "quantity": quantity }));
        self.execute(request, "restock").await?;
        self.invalidate_sweets().await;
        Ok(())
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// Log in with username and password.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] on bad credentials, or a shape
    /// error if the response carries no token.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthSession, ApiError> {
        let req = self
            .inner
            .client
            .post(self.endpoint("/auth/login"))
            .json(request);
        let value = self.execute(req, "login").await?;
        wire::parse_auth_session(&value)
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the registration (e.g.
    /// username taken).
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<RegisterOutcome, ApiError> {
        let req = self
            .inner
            .client
            .post(self.endpoint("/auth/register"))
            .json(request);
        let value = self.execute(req, "register").await?;
        Ok(wire::parse_register_outcome(&value))
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Drop the cached sweet listing so the next read re-fetches.
    pub async fn invalidate_sweets(&self) {
        self.inner.cache.invalidate(SWEETS_CACHE_KEY).await;
    }
}
