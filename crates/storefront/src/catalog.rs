//! Client-side catalog filtering.
//!
//! The dashboard filters the fetched sweet listing in memory: free-text
//! search, category, and a fixed set of price brackets. All functions here
//! are pure; the route layer wires them to query parameters.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::api::types::Sweet;

/// A fixed price-range facet.
///
/// The middle brackets are inclusive at both ends, so a price sitting on a
/// boundary (5, 10, 20) matches both adjacent brackets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum PriceBracket {
    #[default]
    #[serde(rename = "all")]
    All,
    #[serde(rename = "under-5")]
    Under5,
    #[serde(rename = "5-10")]
    From5To10,
    #[serde(rename = "10-20")]
    From10To20,
    #[serde(rename = "over-20")]
    Over20,
}

impl PriceBracket {
    /// The selectable brackets, in display order.
    pub const CHOICES: [Self; 5] = [
        Self::All,
        Self::Under5,
        Self::From5To10,
        Self::From10To20,
        Self::Over20,
    ];

    /// Whether a unit price falls inside this bracket.
    #[must_use]
    pub fn matches(self, price: Decimal) -> bool {
        let five = Decimal::from(5);
        let ten = Decimal::from(10);
        let twenty = Decimal::from(20);
        match self {
            Self::All => true,
            Self::Under5 => price < five,
            Self::From5To10 => price >= five && price <= ten,
            Self::From10To20 => price >= ten && price <= twenty,
            Self::Over20 => price > twenty,
        }
    }

    /// Query-parameter value, matching the serde renames.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Under5 => "under-5",
            Self::From5To10 => "5-10",
            Self::From10To20 => "10-20",
            Self::Over20 => "over-20",
        }
    }

    /// Parse a query-parameter value; anything unrecognized is "all".
    #[must_use]
    pub fn from_param(value: &str) -> Self {
        Self::CHOICES
            .into_iter()
            .find(|bracket| bracket.as_str() == value)
            .unwrap_or_default()
    }

    /// Label for the filter dropdown.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All Prices",
            Self::Under5 => "Under ₹5",
            Self::From5To10 => "₹5 - ₹10",
            Self::From10To20 => "₹10 - ₹20",
            Self::Over20 => "Over ₹20",
        }
    }
}

/// The active filter selections.
#[derive(Debug, Clone, Default)]
pub struct FilterCriteria {
    /// Free-text search term; empty matches everything.
    pub search: String,
    /// Exact category, or `None` for "all".
    pub category: Option<String>,
    /// Selected price bracket.
    pub price: PriceBracket,
}

impl FilterCriteria {
    /// Whether every criterion is pass-through.
    #[must_use]
    pub fn is_all(&self) -> bool {
        self.search.is_empty() && self.category.is_none() && self.price == PriceBracket::All
    }

    fn matches(&self, sweet: &Sweet) -> bool {
        let matches_search = self.search.is_empty() || {
            let term = self.search.to_lowercase();
            sweet.name.to_lowercase().contains(&term)
                || sweet.category.to_lowercase().contains(&term)
        };

        let matches_category = self
            .category
            .as_ref()
            .is_none_or(|category| &sweet.category == category);

        matches_search && matches_category && self.price.matches(sweet.price.amount())
    }
}

/// Derive the visible subset of the catalog.
///
/// A sweet is included only when it passes the search, category, and price
/// criteria together. Input order is preserved; all-pass-through criteria
/// return the input unchanged.
#[must_use]
pub fn filter_catalog(sweets: &[Sweet], criteria: &FilterCriteria) -> Vec<Sweet> {
    sweets
        .iter()
        .filter(|sweet| criteria.matches(sweet))
        .cloned()
        .collect()
}

/// Distinct category names across the catalog, sorted ascending.
///
/// Populates the category filter dropdown.
#[must_use]
pub fn distinct_categories(sweets: &[Sweet]) -> Vec<String> {
    let mut categories: Vec<String> = sweets.iter().map(|s| s.category.clone()).collect();
    categories.sort();
    categories.dedup();
    categories
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sugarplum_core::{Price, SweetId};

    fn sweet(id: &str, name: &str, category: &str, price: &str) -> Sweet {
        Sweet {
            id: SweetId::new(id),
            name: name.to_string(),
            category: category.to_string(),
            price: Price::new(price.parse().unwrap()).unwrap(),
            quantity: 10,
            description: None,
            image_url: None,
        }
    }

    fn catalog() -> Vec<Sweet> {
        vec![
            sweet("1", "Choco", "Chocolate", "4"),
            sweet("2", "Tart", "Tart", "15"),
            sweet("3", "Fudge", "Chocolate", "7.5"),
            sweet("4", "Praline", "Nutty", "25"),
        ]
    }

    fn ids(sweets: &[Sweet]) -> Vec<&str> {
        sweets.iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn test_all_pass_through_returns_input_unchanged() {
        let input = catalog();
        let criteria = FilterCriteria::default();
        assert!(criteria.is_all());
        let result = filter_catalog(&input, &criteria);
        assert_eq!(result, input);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let criteria = FilterCriteria {
            search: "cho".to_string(),
            category: None,
            price: PriceBracket::Under5,
        };
        let once = filter_catalog(&catalog(), &criteria);
        let twice = filter_catalog(&once, &criteria);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_spec_example() {
        // search "cho", category all, price under-5 over {Choco/4, Tart/15}
        let input = vec![
            sweet("1", "Choco", "Chocolate", "4"),
            sweet("2", "Tart", "Tart", "15"),
        ];
        let criteria = FilterCriteria {
            search: "cho".to_string(),
            category: None,
            price: PriceBracket::Under5,
        };
        assert_eq!(ids(&filter_catalog(&input, &criteria)), vec!["1"]);
    }

    #[test]
    fn test_search_matches_name_or_category() {
        let criteria = FilterCriteria {
            search: "chocolate".to_string(),
            ..FilterCriteria::default()
        };
        // "Fudge" matches only via its category
        assert_eq!(ids(&filter_catalog(&catalog(), &criteria)), vec!["1", "3"]);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let criteria = FilterCriteria {
            search: "TART".to_string(),
            ..FilterCriteria::default()
        };
        assert_eq!(ids(&filter_catalog(&catalog(), &criteria)), vec!["2"]);
    }

    #[test]
    fn test_category_is_exact() {
        let criteria = FilterCriteria {
            category: Some("Chocolate".to_string()),
            ..FilterCriteria::default()
        };
        assert_eq!(ids(&filter_catalog(&catalog(), &criteria)), vec!["1", "3"]);

        // categories are not substring-matched
        let criteria = FilterCriteria {
            category: Some("Choc".to_string()),
            ..FilterCriteria::default()
        };
        assert!(filter_catalog(&catalog(), &criteria).is_empty());
    }

    #[test]
    fn test_criteria_combine_with_and() {
        let criteria = FilterCriteria {
            search: "o".to_string(),
            category: Some("Chocolate".to_string()),
            price: PriceBracket::From5To10,
        };
        // Choco fails price, Praline fails category, Fudge passes all
        assert_eq!(ids(&filter_catalog(&catalog(), &criteria)), vec!["3"]);
    }

    #[test]
    fn test_bracket_boundaries_are_inclusive() {
        let five = Decimal::from(5);
        let ten = Decimal::from(10);
        let twenty = Decimal::from(20);

        assert!(!PriceBracket::Under5.matches(five));
        assert!(PriceBracket::From5To10.matches(five));
        assert!(PriceBracket::From5To10.matches(ten));
        assert!(PriceBracket::From10To20.matches(ten));
        assert!(PriceBracket::From10To20.matches(twenty));
        assert!(!PriceBracket::Over20.matches(twenty));
        assert!(PriceBracket::Over20.matches("20.01".parse().unwrap()));
    }

    #[test]
    fn test_bracket_query_values_roundtrip() {
        for bracket in PriceBracket::CHOICES {
            let json = format!("\"{}\"", bracket.as_str());
            let parsed: PriceBracket = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, bracket);
        }
    }

    #[test]
    fn test_from_param_tolerates_unknown_values() {
        assert_eq!(PriceBracket::from_param("under-5"), PriceBracket::Under5);
        assert_eq!(PriceBracket::from_param("5-10"), PriceBracket::From5To10);
        assert_eq!(PriceBracket::from_param("garbage"), PriceBracket::All);
        assert_eq!(PriceBracket::from_param(""), PriceBracket::All);
    }

    #[test]
    fn test_distinct_categories_sorted_dedup() {
        assert_eq!(
            distinct_categories(&catalog()),
            vec!["Chocolate", "Nutty", "Tart"]
        );
    }

    #[test]
    fn test_distinct_categories_empty() {
        assert!(distinct_categories(&[]).is_empty());
    }
}
