//! Authentication route handlers.
//!
//! Login and registration proxy to the Sweet Shop API; the returned bearer
//! token and profile are kept in the session. The backend owns credentials
//! and authorization - nothing is verified locally beyond form shape.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use sugarplum_core::Email;

use crate::api::ApiError;
use crate::api::types::{LoginRequest, RegisterOutcome, RegisterRequest};
use crate::filters;
use crate::middleware::{clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::routes::UserView;
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

/// Query parameters for error/success display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub user: Option<UserView>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub user: Option<UserView>,
    pub error: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the login page.
pub async fn login_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    let error = query.error.map(|code| match code.as_str() {
        "session" => "Your session has expired, please sign in again".to_string(),
        other => other.to_string(),
    });
    let success = query.success.map(|code| match code.as_str() {
        "registered" => "Account created, please sign in".to_string(),
        other => other.to_string(),
    });

    LoginTemplate {
        user: None,
        error,
        success,
    }
}

/// Handle login form submission.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    if form.username.is_empty() || form.password.is_empty() {
        return LoginTemplate {
            user: None,
            error: Some("Please fill in all fields".to_string()),
            success: None,
        }
        .into_response();
    }

    let request = LoginRequest {
        username: form.username,
        password: form.password,
    };

    match state.api().login(&request).await {
        Ok(auth) => {
            let user = CurrentUser::from(auth);
            if let Err(e) = set_current_user(&session, &user).await {
                tracing::error!("Failed to set session: {e}");
                return Redirect::to("/auth/login?error=session").into_response();
            }
            Redirect::to("/dashboard").into_response()
        }
        Err(e) => {
            let message = match e {
                ApiError::Unauthorized => "Invalid credentials".to_string(),
                ApiError::Backend { message, .. } => message,
                other => {
                    tracing::error!("login failed: {other}");
                    "Unable to sign in right now, please try again".to_string()
                }
            };
            LoginTemplate {
                user: None,
                error: Some(message),
                success: None,
            }
            .into_response()
        }
    }
}

/// Display the registration page.
pub async fn register_page() -> impl IntoResponse {
    RegisterTemplate {
        user: None,
        error: None,
    }
}

/// Handle registration form submission.
#[instrument(skip(state, session, form))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Response {
    if let Some(message) = validate_register_form(&form) {
        return RegisterTemplate {
            user: None,
            error: Some(message),
        }
        .into_response();
    }

    let request = RegisterRequest {
        username: form.username,
        email: form.email,
        password: form.password,
    };

    match state.api().register(&request).await {
        Ok(RegisterOutcome::LoggedIn(auth)) => {
            let user = CurrentUser::from(auth);
            if let Err(e) = set_current_user(&session, &user).await {
                tracing::error!("Failed to set session: {e}");
                return Redirect::to("/auth/login?error=session").into_response();
            }
            Redirect::to("/dashboard").into_response()
        }
        Ok(RegisterOutcome::Created) => {
            Redirect::to("/auth/login?success=registered").into_response()
        }
        Err(e) => {
            let message = match e {
                ApiError::Backend { message, .. } => message,
                other => {
                    tracing::error!("registration failed: {other}");
                    "Unable to register right now, please try again".to_string()
                }
            };
            RegisterTemplate {
                user: None,
                error: Some(message),
            }
            .into_response()
        }
    }
}

fn validate_register_form(form: &RegisterForm) -> Option<String> {
    if form.username.is_empty() || form.email.is_empty() || form.password.is_empty() {
        return Some("Please fill in all fields".to_string());
    }
    if let Err(e) = Email::parse(&form.email) {
        return Some(e.to_string());
    }
    if form.password != form.password_confirm {
        return Some("Passwords do not match".to_string());
    }
    None
}

/// Handle logout.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_current_user(&session).await {
        tracing::warn!("Failed to clear session on logout: {e}");
    }
    Redirect::to("/").into_response()
}
