//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The cart itself lives in the session as a serialized blob; every handler
//! loads it, applies one reducer action, and writes it back.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{AppendHeaders, Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use sugarplum_core::SweetId;

use crate::cart::{CartAction, CartState, session::dispatch, session::load_cart};
use crate::filters;
use crate::images::resolve_image_url;
use crate::middleware::OptionalAuth;
use crate::routes::UserView;
use crate::state::AppState;

/// Thumbnail dimensions requested from the image host.
const THUMB_IMAGE_SIZE: u32 = 120;

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub quantity: u32,
    pub max_quantity: u32,
    pub price: String,
    pub line_price: String,
    pub image: Option<String>,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u32,
    pub delivery_address: String,
}

impl CartView {
    /// Project the cart state for rendering.
    pub fn build(state: &AppState, cart: &CartState) -> Self {
        Self {
            items: cart
                .items
                .iter()
                .map(|line| CartItemView {
                    id: line.sweet.id.to_string(),
                    name: line.sweet.name.clone(),
                    quantity: line.quantity,
                    max_quantity: line.sweet.quantity,
                    price: line.sweet.price.to_string(),
                    line_price: filters::format_money(&line.line_total()),
                    image: resolve_image_url(
                        &state.config().cloudinary,
                        line.sweet.image_url.as_deref(),
                        THUMB_IMAGE_SIZE,
                        THUMB_IMAGE_SIZE,
                    ),
                })
                .collect(),
            subtotal: filters::format_money(&cart.total_price()),
            item_count: cart.total_items(),
            delivery_address: cart.delivery_address.clone(),
        }
    }
}

// =============================================================================
// Form Types
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub sweet_id: String,
    pub quantity: Option<u32>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub sweet_id: String,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub sweet_id: String,
}

/// Delivery address form data.
#[derive(Debug, Deserialize)]
pub struct AddressForm {
    pub address: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub user: Option<UserView>,
    pub cart: CartView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display cart page.
#[instrument(skip(state, session, user))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
) -> impl IntoResponse {
    let cart = load_cart(&session).await;

    CartShowTemplate {
        user: user.as_ref().map(UserView::from),
        cart: CartView::build(&state, &cart),
    }
}

/// Add item to cart (HTMX).
///
/// The snapshot stored in the line comes from the current listing; the add
/// silently clamps to the snapshot's stock. Returns the cart count badge
/// with an HTMX trigger so other fragments refresh.
#[instrument(skip(state, session, user))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
    Form(form): Form<AddToCartForm>,
) -> Response {
    let token = user.as_ref().map(|u| u.token.as_str());
    let sweet_id = SweetId::new(form.sweet_id);

    let listing = match state.api().list_sweets(token).await {
        Ok(listing) => listing,
        Err(e) => {
            tracing::error!("failed to load listing for cart add: {e}");
            return (
                StatusCode::BAD_GATEWAY,
                Html("<span class=\"error\">Error adding to cart</span>"),
            )
                .into_response();
        }
    };

    let Some(sweet) = listing.iter().find(|s| s.id == sweet_id).cloned() else {
        return (
            StatusCode::NOT_FOUND,
            Html("<span class=\"error\">This sweet is no longer available</span>"),
        )
            .into_response();
    };

    let cart = dispatch(
        &session,
        CartAction::AddItem {
            sweet,
            quantity: form.quantity.unwrap_or(1),
        },
    )
    .await;

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartCountTemplate {
            count: cart.total_items(),
        },
    )
        .into_response()
}

/// Update cart line quantity (HTMX).
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UpdateCartForm>,
) -> Response {
    let cart = dispatch(
        &session,
        CartAction::UpdateQuantity {
            sweet_id: SweetId::new(form.sweet_id),
            quantity: form.quantity,
        },
    )
    .await;

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::build(&state, &cart),
        },
    )
        .into_response()
}

/// Remove item from cart (HTMX).
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Response {
    let cart = dispatch(
        &session,
        CartAction::RemoveItem {
            sweet_id: SweetId::new(form.sweet_id),
        },
    )
    .await;

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::build(&state, &cart),
        },
    )
        .into_response()
}

/// Set the delivery address.
#[instrument(skip(session))]
pub async fn address(session: Session, Form(form): Form<AddressForm>) -> Response {
    dispatch(
        &session,
        CartAction::SetAddress {
            address: form.address,
        },
    )
    .await;

    Redirect::to("/cart").into_response()
}

/// Get cart count badge (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> impl IntoResponse {
    let cart = load_cart(&session).await;
    CartCountTemplate {
        count: cart.total_items(),
    }
}
