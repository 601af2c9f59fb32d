//! Role and stock-level enums.

use serde::{Deserialize, Serialize};

/// Account role as reported by the Sweet Shop API.
///
/// The backend sends screaming-snake values (`"USER"` / `"ADMIN"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    /// Regular shopper: can browse and purchase.
    #[default]
    User,
    /// Store administrator: manages inventory, cannot purchase.
    Admin,
}

impl UserRole {
    /// Whether this role grants access to the inventory admin panel.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "USER"),
            Self::Admin => write!(f, "ADMIN"),
        }
    }
}

/// Stock availability buckets used for badges and admin stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockLevel {
    /// No units available.
    OutOfStock,
    /// Between one and [`StockLevel::LOW_STOCK_THRESHOLD`] units.
    LowStock,
    /// More than the low-stock threshold.
    InStock,
}

impl StockLevel {
    /// Largest quantity still considered "low stock".
    pub const LOW_STOCK_THRESHOLD: u32 = 5;

    /// Classify an available quantity.
    #[must_use]
    pub const fn from_quantity(quantity: u32) -> Self {
        match quantity {
            0 => Self::OutOfStock,
            q if q <= Self::LOW_STOCK_THRESHOLD => Self::LowStock,
            _ => Self::InStock,
        }
    }

    /// Badge label for templates.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::OutOfStock => "Out of Stock",
            Self::LowStock => "Low Stock",
            Self::InStock => "In Stock",
        }
    }
}
