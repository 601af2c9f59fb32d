//! Type-safe price representation using decimal arithmetic.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum PriceError {
    /// Prices cannot be negative.
    #[error("price cannot be negative: {0}")]
    Negative(Decimal),
}

/// A unit price in rupees.
///
/// Wraps a [`Decimal`] so that arithmetic never loses precision the way
/// floating-point currency math does. The backend sends plain decimal
/// amounts; the wrapper guarantees they are non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if the amount is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from a whole number of paise (hundredths).
    #[must_use]
    pub fn from_cents(cents: u32) -> Self {
        Self(Decimal::new(i64::from(cents), 2))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// The line total for `quantity` units at this price.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Decimal {
        self.0 * Decimal::from(quantity)
    }
}

impl fmt::Display for Price {
    /// Format for display with the rupee sign, e.g. `₹49.50`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "₹{:.2}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_rejects_negative() {
        assert!(Price::new(dec("-0.01")).is_err());
        assert!(Price::new(dec("0")).is_ok());
        assert!(Price::new(dec("4.50")).is_ok());
    }

    #[test]
    fn test_display() {
        let price = Price::new(dec("4.5")).unwrap();
        assert_eq!(price.to_string(), "₹4.50");
        assert_eq!(Price::ZERO.to_string(), "₹0.00");
    }

    #[test]
    fn test_from_cents() {
        assert_eq!(Price::from_cents(450).to_string(), "₹4.50");
        assert_eq!(Price::from_cents(0), Price::ZERO);
    }

    #[test]
    fn test_times() {
        let price = Price::new(dec("2.25")).unwrap();
        assert_eq!(price.times(4), dec("9.00"));
        assert_eq!(price.times(0), dec("0"));
    }

    #[test]
    fn test_serde_is_transparent() {
        let price = Price::new(dec("12.99")).unwrap();
        let json = serde_json::to_string(&price).unwrap();
        let back: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(back, price);
    }
}
