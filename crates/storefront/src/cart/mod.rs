//! The shopping cart store.
//!
//! A cart is an ordered list of (sweet snapshot, quantity) lines, at most
//! one line per sweet, plus a free-text delivery address. All mutations go
//! through the pure reducer [`reduce`]; persistence is a separate concern
//! handled by [`session`]. Quantities are silently clamped to the snapshot's
//! available stock - exceeding stock is corrected, never rejected.

pub mod session;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use sugarplum_core::SweetId;

use crate::api::types::Sweet;

/// Fixed storage key for the serialized cart blob.
pub const STORAGE_KEY: &str = "cart_state_v1";

/// One sweet plus the requested quantity.
///
/// The `sweet` field is a snapshot taken when the line was last touched;
/// its `quantity` field is the available stock used for clamping, not the
/// amount in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub sweet: Sweet,
    pub quantity: u32,
}

impl CartLine {
    /// The line total at the snapshot's unit price.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.sweet.price.times(self.quantity)
    }
}

/// The full cart state, serialized verbatim into storage.
///
/// The wire field names (`items`, `deliveryAddress`) are part of the stored
/// blob's contract and must not change without a new storage key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartState {
    #[serde(default)]
    pub items: Vec<CartLine>,
    #[serde(default, rename = "deliveryAddress")]
    pub delivery_address: String,
}

/// A cart mutation.
///
/// Each action maps `(state, action) -> state'` through [`reduce`] with no
/// other effects; callers persist the result afterwards.
#[derive(Debug, Clone)]
pub enum CartAction {
    /// Add `quantity` units, merging into an existing line if present.
    AddItem { sweet: Sweet, quantity: u32 },
    /// Drop the line for a sweet; no-op when absent.
    RemoveItem { sweet_id: SweetId },
    /// Set a line's quantity; no-op when absent.
    UpdateQuantity { sweet_id: SweetId, quantity: u32 },
    /// Empty the cart and reset the delivery address.
    Clear,
    /// Replace the delivery address verbatim.
    SetAddress { address: String },
}

/// Apply one action to the cart, returning the next state.
#[must_use]
pub fn reduce(state: CartState, action: CartAction) -> CartState {
    let CartState {
        mut items,
        delivery_address,
    } = state;

    match action {
        CartAction::AddItem { sweet, quantity } => {
            add_item(&mut items, sweet, quantity);
            CartState {
                items,
                delivery_address,
            }
        }
        CartAction::RemoveItem { sweet_id } => CartState {
            items: items
                .into_iter()
                .filter(|line| line.sweet.id != sweet_id)
                .collect(),
            delivery_address,
        },
        CartAction::UpdateQuantity { sweet_id, quantity } => {
            if let Some(line) = items.iter_mut().find(|line| line.sweet.id == sweet_id) {
                line.quantity = clamp_quantity(quantity, line.sweet.quantity);
            }
            CartState {
                items,
                delivery_address,
            }
        }
        CartAction::Clear => CartState::default(),
        CartAction::SetAddress { address } => CartState {
            items,
            delivery_address: address,
        },
    }
}

fn add_item(items: &mut Vec<CartLine>, sweet: Sweet, quantity: u32) {
    // A sweet with no stock can never form a line: clamping to [1, 0] is
    // unsatisfiable, so the add is ignored.
    if sweet.quantity == 0 {
        return;
    }

    if let Some(line) = items.iter_mut().find(|line| line.sweet.id == sweet.id) {
        // The stored snapshot is kept; only the clamp uses the incoming
        // snapshot's stock.
        line.quantity = clamp_quantity(line.quantity.saturating_add(quantity), sweet.quantity);
    } else {
        let quantity = clamp_quantity(quantity, sweet.quantity);
        items.push(CartLine { sweet, quantity });
    }
}

/// Clamp a requested quantity to `[1, available]`.
///
/// Callers guarantee `available >= 1`.
fn clamp_quantity(requested: u32, available: u32) -> u32 {
    requested.clamp(1, available.max(1))
}

impl CartState {
    /// Total units across all lines.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.items.iter().map(|line| line.quantity).sum()
    }

    /// Total price across all lines.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.items.iter().map(CartLine::line_total).sum()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Serialize for storage.
    ///
    /// Serialization of this type cannot fail; a cart that somehow cannot
    /// serialize degrades to not being persisted, matching the store's
    /// swallow-on-failure contract.
    #[must_use]
    pub fn to_blob(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Restore from a stored blob.
    ///
    /// Missing or corrupt data falls back to the empty cart; restoring
    /// never fails.
    #[must_use]
    pub fn from_blob(blob: Option<&str>) -> Self {
        blob.and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or_default()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use sugarplum_core::Price;

    fn sweet(id: &str, price: &str, stock: u32) -> Sweet {
        Sweet {
            id: SweetId::new(id),
            name: format!("sweet {id}"),
            category: "Barfi".to_string(),
            price: Price::new(price.parse().unwrap()).unwrap(),
            quantity: stock,
            description: None,
            image_url: None,
        }
    }

    fn line_quantity(state: &CartState, id: &str) -> Option<u32> {
        state
            .items
            .iter()
            .find(|l| l.sweet.id.as_str() == id)
            .map(|l| l.quantity)
    }

    #[test]
    fn test_add_item_inserts_line() {
        let state = reduce(
            CartState::default(),
            CartAction::AddItem {
                sweet: sweet("a", "4.00", 10),
                quantity: 2,
            },
        );
        assert_eq!(state.items.len(), 1);
        assert_eq!(line_quantity(&state, "a"), Some(2));
    }

    #[test]
    fn test_add_item_merges_and_clamps_to_stock() {
        // add 2 then 5 against stock 3 -> clamped to 3, not 7
        let p = sweet("a", "1.00", 3);
        let state = reduce(
            CartState::default(),
            CartAction::AddItem {
                sweet: p.clone(),
                quantity: 2,
            },
        );
        let state = reduce(
            state,
            CartAction::AddItem {
                sweet: p,
                quantity: 5,
            },
        );
        assert_eq!(line_quantity(&state, "a"), Some(3));
    }

    #[test]
    fn test_add_item_never_exceeds_stock_across_sequences() {
        let p = sweet("a", "1.00", 4);
        let mut state = CartState::default();
        for _ in 0..10 {
            state = reduce(
                state,
                CartAction::AddItem {
                    sweet: p.clone(),
                    quantity: 3,
                },
            );
            let q = line_quantity(&state, "a").unwrap();
            assert!((1..=4).contains(&q));
        }
        assert_eq!(line_quantity(&state, "a"), Some(4));
    }

    #[test]
    fn test_add_item_new_line_clamps_to_stock() {
        let state = reduce(
            CartState::default(),
            CartAction::AddItem {
                sweet: sweet("a", "1.00", 2),
                quantity: 9,
            },
        );
        assert_eq!(line_quantity(&state, "a"), Some(2));
    }

    #[test]
    fn test_add_item_out_of_stock_is_ignored() {
        let state = reduce(
            CartState::default(),
            CartAction::AddItem {
                sweet: sweet("a", "1.00", 0),
                quantity: 1,
            },
        );
        assert!(state.is_empty());
    }

    #[test]
    fn test_add_item_keeps_stored_snapshot() {
        // Same id, different price in the second snapshot: the first
        // snapshot wins, only the clamp sees the new stock.
        let first = sweet("a", "2.00", 10);
        let second = sweet("a", "9.99", 10);
        let state = reduce(
            CartState::default(),
            CartAction::AddItem {
                sweet: first,
                quantity: 1,
            },
        );
        let state = reduce(
            state,
            CartAction::AddItem {
                sweet: second,
                quantity: 1,
            },
        );
        let line = state.items.first().unwrap();
        assert_eq!(line.sweet.price.amount(), "2.00".parse::<Decimal>().unwrap());
        assert_eq!(line.quantity, 2);
    }

    #[test]
    fn test_remove_item_then_add_creates_fresh_line() {
        let p = sweet("a", "1.00", 10);
        let state = reduce(
            CartState::default(),
            CartAction::AddItem {
                sweet: p.clone(),
                quantity: 7,
            },
        );
        let state = reduce(
            state,
            CartAction::RemoveItem {
                sweet_id: SweetId::new("a"),
            },
        );
        assert!(state.is_empty());

        let state = reduce(
            state,
            CartAction::AddItem {
                sweet: p,
                quantity: 2,
            },
        );
        // unaffected by the removed line's quantity
        assert_eq!(line_quantity(&state, "a"), Some(2));
    }

    #[test]
    fn test_remove_item_absent_is_noop() {
        let state = reduce(
            CartState::default(),
            CartAction::AddItem {
                sweet: sweet("a", "1.00", 5),
                quantity: 1,
            },
        );
        let next = reduce(
            state.clone(),
            CartAction::RemoveItem {
                sweet_id: SweetId::new("missing"),
            },
        );
        assert_eq!(next, state);
    }

    #[test]
    fn test_update_quantity_clamps_both_ends() {
        let state = reduce(
            CartState::default(),
            CartAction::AddItem {
                sweet: sweet("a", "1.00", 5),
                quantity: 2,
            },
        );

        // above stock
        let high = reduce(
            state.clone(),
            CartAction::UpdateQuantity {
                sweet_id: SweetId::new("a"),
                quantity: 99,
            },
        );
        assert_eq!(line_quantity(&high, "a"), Some(5));

        // below one (the minus button at quantity 1)
        let low = reduce(
            state,
            CartAction::UpdateQuantity {
                sweet_id: SweetId::new("a"),
                quantity: 0,
            },
        );
        assert_eq!(line_quantity(&low, "a"), Some(1));
    }

    #[test]
    fn test_update_quantity_absent_is_noop() {
        let state = CartState::default();
        let next = reduce(
            state.clone(),
            CartAction::UpdateQuantity {
                sweet_id: SweetId::new("ghost"),
                quantity: 3,
            },
        );
        assert_eq!(next, state);
    }

    #[test]
    fn test_clear_resets_lines_and_address() {
        let state = reduce(
            CartState::default(),
            CartAction::AddItem {
                sweet: sweet("a", "1.00", 5),
                quantity: 1,
            },
        );
        let state = reduce(
            state,
            CartAction::SetAddress {
                address: "12 Fort Road".to_string(),
            },
        );
        let state = reduce(state, CartAction::Clear);
        assert!(state.is_empty());
        assert_eq!(state.delivery_address, "");
    }

    #[test]
    fn test_set_address_verbatim() {
        let state = reduce(
            CartState::default(),
            CartAction::SetAddress {
                address: "  12 Fort Road, Kochi  ".to_string(),
            },
        );
        assert_eq!(state.delivery_address, "  12 Fort Road, Kochi  ");
    }

    #[test]
    fn test_totals_match_recomputation() {
        let mut state = CartState::default();
        state = reduce(
            state,
            CartAction::AddItem {
                sweet: sweet("a", "2.50", 10),
                quantity: 3,
            },
        );
        state = reduce(
            state,
            CartAction::AddItem {
                sweet: sweet("b", "15.00", 10),
                quantity: 2,
            },
        );

        assert_eq!(state.total_items(), 5);
        assert_eq!(state.total_price(), "37.50".parse::<Decimal>().unwrap());

        let expected_items: u32 = state.items.iter().map(|l| l.quantity).sum();
        let expected_price: Decimal = state
            .items
            .iter()
            .map(|l| l.sweet.price.times(l.quantity))
            .sum();
        assert_eq!(state.total_items(), expected_items);
        assert_eq!(state.total_price(), expected_price);
    }

    #[test]
    fn test_empty_cart_totals() {
        let state = CartState::default();
        assert_eq!(state.total_items(), 0);
        assert_eq!(state.total_price(), Decimal::ZERO);
    }

    #[test]
    fn test_blob_roundtrip_uses_wire_field_names() {
        let state = reduce(
            CartState::default(),
            CartAction::AddItem {
                sweet: sweet("a", "4.00", 10),
                quantity: 2,
            },
        );
        let state = reduce(
            state,
            CartAction::SetAddress {
                address: "12 Fort Road".to_string(),
            },
        );

        let blob = state.to_blob();
        assert!(blob.contains("\"items\""));
        assert!(blob.contains("\"deliveryAddress\""));
        assert!(blob.contains("\"sweet\""));

        let restored = CartState::from_blob(Some(&blob));
        assert_eq!(restored, state);
    }

    #[test]
    fn test_from_blob_corrupt_falls_back_to_empty() {
        for raw in ["not json", "{\"items\": 7}", "[1,2,3]", ""] {
            let state = CartState::from_blob(Some(raw));
            assert!(state.is_empty(), "blob {raw:?} should restore empty");
            assert_eq!(state.delivery_address, "");
        }
    }

    #[test]
    fn test_from_blob_missing_falls_back_to_empty() {
        let state = CartState::from_blob(None);
        assert_eq!(state, CartState::default());
    }

    #[test]
    fn test_from_blob_tolerates_missing_address_field() {
        let state = CartState::from_blob(Some("{\"items\": []}"));
        assert_eq!(state, CartState::default());
    }
}
