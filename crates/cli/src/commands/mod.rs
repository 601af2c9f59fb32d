//! CLI command implementations.

pub mod catalog;
pub mod restock;
pub mod seed;

use secrecy::ExposeSecret;
use thiserror::Error;

use sugarplum_storefront::api::types::LoginRequest;
use sugarplum_storefront::api::{ApiError, SweetShopClient};
use sugarplum_storefront::config::{
    ConfigError, StorefrontConfig, get_required_env, get_validated_secret,
};

/// Errors that can occur during CLI operations.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration problem (missing env var, weak credential).
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Sweet Shop API call failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// The admin credentials were rejected.
    #[error("Admin login rejected; check SUGARPLUM_ADMIN_USERNAME / SUGARPLUM_ADMIN_PASSWORD")]
    AdminLoginRejected,

    /// The admin account is not an admin.
    #[error("Account {0} does not have the ADMIN role")]
    NotAdmin(String),
}

/// Build the API client from environment configuration.
pub fn client() -> Result<SweetShopClient, CliError> {
    dotenvy::dotenv().ok();
    let config = StorefrontConfig::from_env()?;
    Ok(SweetShopClient::new(&config))
}

/// Log in with the admin credentials from the environment.
///
/// Returns the bearer token for mutating calls.
pub async fn admin_token(client: &SweetShopClient) -> Result<String, CliError> {
    let username = get_required_env("SUGARPLUM_ADMIN_USERNAME")?;
    let password = get_validated_secret("SUGARPLUM_ADMIN_PASSWORD")?;

    let session = client
        .login(&LoginRequest {
            username: username.clone(),
            password: password.expose_secret().to_string(),
        })
        .await
        .map_err(|e| match e {
            ApiError::Unauthorized => CliError::AdminLoginRejected,
            other => CliError::Api(other),
        })?;

    if !session.user.role.is_admin() {
        return Err(CliError::NotAdmin(username));
    }

    Ok(session.token)
}
