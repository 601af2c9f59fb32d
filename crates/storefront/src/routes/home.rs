//! Landing page handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::{IntoResponse, Redirect, Response};

use crate::filters;
use crate::middleware::OptionalAuth;
use crate::routes::UserView;

/// Landing page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub user: Option<UserView>,
}

/// Display the landing page.
///
/// Logged-in visitors go straight to the dashboard, like the original app's
/// index redirect.
pub async fn home(OptionalAuth(user): OptionalAuth) -> Response {
    if user.is_some() {
        return Redirect::to("/dashboard").into_response();
    }

    HomeTemplate { user: None }.into_response()
}
