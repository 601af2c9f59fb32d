//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

use rust_decimal::Decimal;

/// Render a decimal amount as a rupee price string.
pub(crate) fn format_money(value: &Decimal) -> String {
    format!("₹{value:.2}")
}

/// Format a decimal amount as a rupee price string.
///
/// Usage in templates: `{{ total|money }}`
#[askama::filter_fn]
pub fn money(value: &Decimal, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format_money(value))
}

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_format_money() {
        let amount: Decimal = "37.5".parse().unwrap();
        assert_eq!(format_money(&amount), "₹37.50");
        assert_eq!(format_money(&Decimal::ZERO), "₹0.00");
    }
}
