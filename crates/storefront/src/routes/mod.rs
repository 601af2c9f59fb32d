//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Landing page
//! GET  /health                 - Health check
//! GET  /health/ready           - Readiness check (backend reachability)
//!
//! # Catalog
//! GET  /dashboard              - Catalog page with search and filters
//! GET  /dashboard/grid         - Filtered sweet grid fragment (HTMX)
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add line (returns count badge, triggers cart-updated)
//! POST /cart/update            - Set line quantity (returns cart_items fragment)
//! POST /cart/remove            - Remove line (returns cart_items fragment)
//! POST /cart/address           - Set delivery address
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Checkout
//! GET  /checkout               - Checkout form (auth required)
//! POST /checkout               - Per-line checkout, renders outcome report
//!
//! # Auth
//! GET  /auth/login             - Login page
//! POST /auth/login             - Login action
//! GET  /auth/register          - Register page
//! POST /auth/register          - Register action
//! POST /auth/logout            - Logout action
//!
//! # Admin (admin role required)
//! GET  /admin                  - Admin panel: stats + inventory table
//! POST /admin/sweets           - Create sweet
//! POST /admin/sweets/{id}          - Update sweet
//! POST /admin/sweets/{id}/delete   - Delete sweet
//! POST /admin/sweets/{id}/restock  - Restock sweet
//! ```

pub mod admin;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod home;

use axum::{
    Router,
    routing::{get, post},
};

use crate::models::CurrentUser;
use crate::state::AppState;

/// Header display data shared by every page template.
#[derive(Clone)]
pub struct UserView {
    pub username: String,
    pub is_admin: bool,
}

impl From<&CurrentUser> for UserView {
    fn from(user: &CurrentUser) -> Self {
        Self {
            username: user.username.clone(),
            is_admin: user.is_admin(),
        }
    }
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/address", post(cart::address))
        .route("/count", get(cart::count))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(admin::index))
        .route("/sweets", post(admin::create))
        .route("/sweets/{id}", post(admin::update))
        .route("/sweets/{id}/delete", post(admin::delete))
        .route("/sweets/{id}/restock", post(admin::restock))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Landing page
        .route("/", get(home::home))
        // Catalog
        .route("/dashboard", get(catalog::index))
        .route("/dashboard/grid", get(catalog::grid))
        // Cart
        .nest("/cart", cart_routes())
        // Checkout
        .route(
            "/checkout",
            get(checkout::form).post(checkout::place_order),
        )
        // Auth
        .nest("/auth", auth_routes())
        // Admin panel
        .nest("/admin", admin_routes())
}
