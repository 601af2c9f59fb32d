//! Session persistence for the cart.
//!
//! The cart is stored as a single serialized blob under [`super::STORAGE_KEY`],
//! written through after every mutation. Storage failures are swallowed: the
//! cart keeps working in memory for the rest of the request and persistence
//! resumes whenever the store recovers.

use tower_sessions::Session;

use super::{CartAction, CartState, STORAGE_KEY, reduce};

/// Load the cart from the session.
///
/// Missing or corrupt blobs restore as the empty cart; this never fails.
pub async fn load_cart(session: &Session) -> CartState {
    let blob: Option<String> = match session.get(STORAGE_KEY).await {
        Ok(blob) => blob,
        Err(e) => {
            tracing::warn!("failed to read cart from session: {e}");
            None
        }
    };
    CartState::from_blob(blob.as_deref())
}

/// Persist the cart to the session.
///
/// Write failures are logged and swallowed.
pub async fn save_cart(session: &Session, cart: &CartState) {
    if let Err(e) = session.insert(STORAGE_KEY, cart.to_blob()).await {
        tracing::warn!("failed to persist cart to session: {e}");
    }
}

/// Load, apply one action, and write the result back.
///
/// Returns the resulting state so handlers can render it directly.
pub async fn dispatch(session: &Session, action: CartAction) -> CartState {
    let cart = load_cart(session).await;
    let cart = reduce(cart, action);
    save_cart(session, &cart).await;
    cart
}
