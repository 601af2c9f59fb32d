//! Checkout route handlers.
//!
//! Checkout is per-line and non-atomic: one purchase call per cart line,
//! in cart order, stopping at the first failure. The outcome page reports
//! every line separately so a partial failure is never presented as a
//! total one. Purchased lines leave the cart; failed and unattempted lines
//! stay for retry.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::cart::{CartAction, session::dispatch, session::load_cart, session::save_cart};
use crate::error::AppError;
use crate::filters;
use crate::middleware::{RequireAuth, clear_current_user};
use crate::routes::UserView;
use crate::routes::cart::CartView;
use crate::services::checkout::{
    self, LineStatus, OrderReport, validate_delivery, validate_payment,
};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Checkout form data: delivery details plus mocked payment details.
///
/// The phone field from the form is accepted but unused; the backend has
/// no field for it.
#[derive(Debug, Deserialize)]
pub struct CheckoutForm {
    pub full_name: String,
    pub address: String,
    pub city: String,
    pub zip: String,
    pub card_name: String,
    pub card_number: String,
    pub expiry: String,
    pub cvv: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Checkout form page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/form.html")]
pub struct CheckoutFormTemplate {
    pub user: Option<UserView>,
    pub cart: CartView,
    pub error: Option<String>,
}

/// Per-line outcome display data.
pub struct LineOutcomeView {
    pub name: String,
    pub quantity: u32,
    pub status: String,
    pub failed: bool,
}

/// Checkout result page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/result.html")]
pub struct CheckoutResultTemplate {
    pub user: Option<UserView>,
    pub lines: Vec<LineOutcomeView>,
    pub complete: bool,
    pub partial: bool,
    pub failure_message: Option<String>,
}

fn outcome_views(report: &OrderReport) -> Vec<LineOutcomeView> {
    report
        .lines
        .iter()
        .map(|line| {
            let (status, failed) = match &line.status {
                LineStatus::Purchased => ("Purchased".to_string(), false),
                LineStatus::Failed(message) => (message.clone(), true),
                LineStatus::NotAttempted => ("Not attempted".to_string(), false),
            };
            LineOutcomeView {
                name: line.name.clone(),
                quantity: line.quantity,
                status,
                failed,
            }
        })
        .collect()
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the checkout form.
#[instrument(skip(state, session, user))]
pub async fn form(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
) -> Response {
    let cart = load_cart(&session).await;
    if cart.is_empty() {
        return Redirect::to("/cart").into_response();
    }

    CheckoutFormTemplate {
        user: Some(UserView::from(&user)),
        cart: CartView::build(&state, &cart),
        error: None,
    }
    .into_response()
}

/// Run checkout for every cart line and render the per-line report.
#[instrument(skip(state, session, user, form))]
pub async fn place_order(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    Form(form): Form<CheckoutForm>,
) -> Result<Response, AppError> {
    // Only shoppers purchase; admin accounts manage inventory.
    if user.is_admin() {
        return Err(AppError::BadRequest(
            "Only shopper accounts can purchase items".to_string(),
        ));
    }

    let cart = load_cart(&session).await;
    if cart.is_empty() {
        return Ok(Redirect::to("/cart").into_response());
    }

    // Re-render the form on validation problems instead of failing the
    // request; the user fixes the field and resubmits.
    if let Err(e) = validate_delivery(&form.full_name, &form.address, &form.city, &form.zip)
        .and_then(|()| validate_payment(&form.card_name, &form.card_number, &form.expiry, &form.cvv))
    {
        let template = CheckoutFormTemplate {
            user: Some(UserView::from(&user)),
            cart: CartView::build(&state, &cart),
            error: Some(e.to_string()),
        };
        return Ok(template.into_response());
    }

    // The address is cart state; persist it before talking to the backend
    // so a failed checkout keeps it for the retry.
    let cart = dispatch(
        &session,
        CartAction::SetAddress {
            address: form.address.clone(),
        },
    )
    .await;

    let report = match checkout::place_order(state.api(), &user.token, &cart).await {
        Ok(report) => report,
        Err(e) => {
            // The stored token is stale; drop the login and send the user
            // back through the login page.
            if let Err(clear_err) = clear_current_user(&session).await {
                tracing::warn!("failed to clear session after 401: {clear_err}");
            }
            return Err(AppError::from_api(e));
        }
    };

    // Purchased lines leave the cart; a fully successful order clears it
    // (address included).
    if report.is_complete() {
        let _ = dispatch(&session, CartAction::Clear).await;
    } else {
        let mut cart = cart;
        for sweet_id in report.purchased_ids() {
            cart = crate::cart::reduce(cart, CartAction::RemoveItem { sweet_id });
        }
        save_cart(&session, &cart).await;
    }

    Ok(CheckoutResultTemplate {
        user: Some(UserView::from(&user)),
        lines: outcome_views(&report),
        complete: report.is_complete(),
        partial: report.is_partial(),
        failure_message: report.failure_message().map(ToString::to_string),
    }
    .into_response())
}
