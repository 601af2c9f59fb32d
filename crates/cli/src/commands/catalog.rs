//! Inventory listing command.

use tracing::info;

use sugarplum_core::StockLevel;
use sugarplum_storefront::api::types::{Sweet, SweetSearchParams};

use super::CliError;

/// Print the inventory with stock levels.
///
/// With `name` or `category` set, the backend's search endpoint does the
/// filtering; otherwise the full listing is fetched.
///
/// # Errors
///
/// Returns an error if the listing cannot be fetched.
pub async fn list(name: Option<&str>, category: Option<&str>) -> Result<(), CliError> {
    let client = super::client()?;

    let sweets: Vec<Sweet> = if name.is_some() || category.is_some() {
        let params = SweetSearchParams {
            name: name.map(ToString::to_string),
            category: category.map(ToString::to_string),
            min_price: None,
            max_price: None,
        };
        client.search_sweets(None, &params).await?
    } else {
        client.list_sweets(None).await?.as_ref().clone()
    };

    info!("Inventory ({} sweets)", sweets.len());
    info!("========================");
    for sweet in &sweets {
        let level = StockLevel::from_quantity(sweet.quantity);
        info!(
            "  {:<24} {:<14} {:>8}  qty {:>4}  [{}]  {}",
            sweet.name,
            sweet.category,
            sweet.price.to_string(),
            sweet.quantity,
            level.label(),
            sweet.id,
        );
    }

    Ok(())
}
