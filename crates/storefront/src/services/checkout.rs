//! Checkout service.
//!
//! Checkout issues one purchase call per cart line, sequentially in cart
//! order. There is no transaction across lines: a purchased line stays
//! purchased even when a later line fails, so the report carries one
//! outcome per line instead of a single success flag. Callers remove the
//! purchased lines from the cart and keep the rest for retry.

use tracing::instrument;

use sugarplum_core::SweetId;

use crate::api::{ApiError, SweetShopClient};
use crate::cart::CartState;

/// What happened to a single cart line during checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineStatus {
    /// The backend accepted the purchase.
    Purchased,
    /// The backend rejected the purchase; checkout stopped here.
    Failed(String),
    /// A previous line failed before this one was attempted.
    NotAttempted,
}

/// Per-line checkout outcome.
#[derive(Debug, Clone)]
pub struct LineOutcome {
    pub sweet_id: SweetId,
    pub name: String,
    pub quantity: u32,
    pub status: LineStatus,
}

/// The full checkout report, one entry per cart line in cart order.
#[derive(Debug, Clone, Default)]
pub struct OrderReport {
    pub lines: Vec<LineOutcome>,
}

impl OrderReport {
    /// Every line was purchased.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.lines
            .iter()
            .all(|line| line.status == LineStatus::Purchased)
    }

    /// No line was purchased.
    #[must_use]
    pub fn is_total_failure(&self) -> bool {
        !self
            .lines
            .iter()
            .any(|line| line.status == LineStatus::Purchased)
    }

    /// A strict subset of lines was purchased.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        !self.is_complete() && !self.is_total_failure()
    }

    /// Ids of the purchased lines, for removal from the cart.
    #[must_use]
    pub fn purchased_ids(&self) -> Vec<SweetId> {
        self.lines
            .iter()
            .filter(|line| line.status == LineStatus::Purchased)
            .map(|line| line.sweet_id.clone())
            .collect()
    }

    /// The message of the failing line, if any.
    #[must_use]
    pub fn failure_message(&self) -> Option<&str> {
        self.lines.iter().find_map(|line| match &line.status {
            LineStatus::Failed(message) => Some(message.as_str()),
            _ => None,
        })
    }
}

/// Execute checkout for every cart line.
///
/// Lines run sequentially in cart order; the first failure stops the
/// sequence and the remaining lines report [`LineStatus::NotAttempted`].
/// Already-purchased lines are not rolled back.
///
/// # Errors
///
/// Returns [`ApiError::Unauthorized`] when the session token is no longer
/// valid; any other backend failure is recorded in the report instead.
#[instrument(skip(client, token, cart), fields(lines = cart.items.len()))]
pub async fn place_order(
    client: &SweetShopClient,
    token: &str,
    cart: &CartState,
) -> Result<OrderReport, ApiError> {
    let mut report = OrderReport::default();
    let mut failed = false;

    for line in &cart.items {
        let status = if failed {
            LineStatus::NotAttempted
        } else {
            match client.purchase(token, &line.sweet.id, line.quantity).await {
                Ok(()) => LineStatus::Purchased,
                Err(ApiError::Unauthorized) => return Err(ApiError::Unauthorized),
                Err(e) => {
                    failed = true;
                    LineStatus::Failed(e.to_string())
                }
            }
        };
        report.lines.push(LineOutcome {
            sweet_id: line.sweet.id.clone(),
            name: line.sweet.name.clone(),
            quantity: line.quantity,
            status,
        });
    }

    Ok(report)
}

// =============================================================================
// Form Validation
// =============================================================================

/// Validation failure with a user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct CheckoutFormError(pub String);

/// Validate the delivery details of the checkout form.
///
/// # Errors
///
/// Returns a user-facing message when a required field is blank.
pub fn validate_delivery(
    full_name: &str,
    address: &str,
    city: &str,
    zip: &str,
) -> Result<(), CheckoutFormError> {
    let all_present = [full_name, address, city, zip]
        .iter()
        .all(|field| !field.trim().is_empty());
    if all_present {
        Ok(())
    } else {
        Err(CheckoutFormError(
            "Please fill in delivery address details".to_string(),
        ))
    }
}

/// Superficially validate the (mocked) payment details.
///
/// The payment processor is simulated, so this only checks plausibility:
/// a name on card, at least 12 card digits, an `MM/YY` expiry, and a CVV of
/// at least 3 digits.
///
/// # Errors
///
/// Returns a user-facing message when the card details look wrong.
pub fn validate_payment(
    card_name: &str,
    card_number: &str,
    expiry: &str,
    cvv: &str,
) -> Result<(), CheckoutFormError> {
    let digits: String = card_number.chars().filter(|c| !c.is_whitespace()).collect();
    let card_ok = !card_name.trim().is_empty()
        && digits.len() >= 12
        && digits.chars().all(|c| c.is_ascii_digit());
    let cvv_ok = cvv.len() >= 3 && cvv.chars().all(|c| c.is_ascii_digit());

    if card_ok && is_valid_expiry(expiry) && cvv_ok {
        Ok(())
    } else {
        Err(CheckoutFormError(
            "Please check your card details".to_string(),
        ))
    }
}

/// `MM/YY` with a month in 01-12.
fn is_valid_expiry(expiry: &str) -> bool {
    let Some((month, year)) = expiry.split_once('/') else {
        return false;
    };
    if month.len() != 2 || year.len() != 2 {
        return false;
    }
    if !year.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    matches!(month.parse::<u8>(), Ok(m) if (1..=12).contains(&m))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(id: &str, status: LineStatus) -> LineOutcome {
        LineOutcome {
            sweet_id: SweetId::new(id),
            name: id.to_string(),
            quantity: 1,
            status,
        }
    }

    #[test]
    fn test_report_complete() {
        let report = OrderReport {
            lines: vec![
                outcome("a", LineStatus::Purchased),
                outcome("b", LineStatus::Purchased),
            ],
        };
        assert!(report.is_complete());
        assert!(!report.is_partial());
        assert!(!report.is_total_failure());
        assert_eq!(report.purchased_ids().len(), 2);
    }

    #[test]
    fn test_report_partial_failure_is_distinct() {
        let report = OrderReport {
            lines: vec![
                outcome("a", LineStatus::Purchased),
                outcome("b", LineStatus::Failed("Insufficient stock".to_string())),
                outcome("c", LineStatus::NotAttempted),
            ],
        };
        assert!(report.is_partial());
        assert!(!report.is_complete());
        assert!(!report.is_total_failure());
        assert_eq!(report.purchased_ids(), vec![SweetId::new("a")]);
        assert_eq!(report.failure_message(), Some("Insufficient stock"));
    }

    #[test]
    fn test_report_total_failure() {
        let report = OrderReport {
            lines: vec![
                outcome("a", LineStatus::Failed("boom".to_string())),
                outcome("b", LineStatus::NotAttempted),
            ],
        };
        assert!(report.is_total_failure());
        assert!(!report.is_partial());
        assert!(report.purchased_ids().is_empty());
    }

    #[test]
    fn test_empty_report_is_complete_and_total_failure() {
        // An empty cart checkout never runs; both predicates hold vacuously.
        let report = OrderReport::default();
        assert!(report.is_complete());
        assert!(report.is_total_failure());
    }

    #[test]
    fn test_validate_delivery() {
        assert!(validate_delivery("Mina", "12 Fort Road", "Kochi", "682001").is_ok());
        assert!(validate_delivery("", "12 Fort Road", "Kochi", "682001").is_err());
        assert!(validate_delivery("Mina", "   ", "Kochi", "682001").is_err());
    }

    #[test]
    fn test_validate_payment() {
        assert!(validate_payment("Mina", "1234 5678 9012 3456", "09/28", "123").is_ok());
        // too few digits
        assert!(validate_payment("Mina", "1234", "09/28", "123").is_err());
        // non-digits in number
        assert!(validate_payment("Mina", "1234 5678 9012 345x", "09/28", "123").is_err());
        // bad expiry month
        assert!(validate_payment("Mina", "123456789012", "13/28", "123").is_err());
        assert!(validate_payment("Mina", "123456789012", "0928", "123").is_err());
        // short cvv
        assert!(validate_payment("Mina", "123456789012", "09/28", "12").is_err());
        // missing name
        assert!(validate_payment(" ", "123456789012", "09/28", "123").is_err());
    }
}
