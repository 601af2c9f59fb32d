//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use sugarplum_core::{UserId, UserRole};

use crate::api::types::{AuthSession, User};

/// Session-stored user identity.
///
/// The bearer token is stored alongside the profile, the way the browser
/// app kept `auth_token` and `user_data` side by side in local storage;
/// the session cookie itself never contains it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Backend account id.
    pub id: UserId,
    /// Display username.
    pub username: String,
    /// Account email.
    pub email: String,
    /// Account role.
    pub role: UserRole,
    /// Bearer token for Sweet Shop API calls.
    pub token: String,
}

impl CurrentUser {
    /// Whether this user may open the admin panel.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl From<AuthSession> for CurrentUser {
    fn from(session: AuthSession) -> Self {
        let AuthSession { token, user } = session;
        let User {
            id,
            username,
            email,
            role,
        } = user;
        Self {
            id,
            username,
            email,
            role,
            token,
        }
    }
}

/// Session keys.
pub mod session_keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";
}
