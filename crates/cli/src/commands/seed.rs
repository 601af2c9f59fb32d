//! Seed the shop with a demo catalog.
//!
//! Useful for local development against a fresh backend: logs in as the
//! configured admin and creates a small spread of sweets across categories
//! and price brackets.

use tracing::{info, warn};

use sugarplum_core::Price;
use sugarplum_storefront::api::types::NewSweet;

use super::CliError;

/// Name, category, price in paise, quantity, description.
const DEMO_SWEETS: &[(&str, &str, u32, u32, &str)] = &[
    ("Kaju Katli", "Barfi", 450, 40, "Cashew diamonds with silver leaf"),
    ("Besan Laddu", "Laddu", 300, 60, "Roasted gram flour and ghee"),
    ("Motichoor Laddu", "Laddu", 350, 55, "Fine boondi pearls in syrup"),
    ("Jalebi", "Fried", 200, 80, "Crisp spirals soaked in saffron syrup"),
    ("Gulab Jamun", "Syrup", 250, 70, "Soft khoya dumplings in rose syrup"),
    ("Rasmalai", "Syrup", 600, 30, "Chenna discs in cardamom milk"),
    ("Mysore Pak", "Barfi", 500, 35, "Ghee-rich gram flour fudge"),
    ("Dark Chocolate Barfi", "Chocolate", 800, 25, "Single-origin cocoa meets khoya"),
    ("Chocolate Truffle Box", "Chocolate", 1800, 15, "Nine assorted truffles"),
    ("Dry Fruit Halwa", "Halwa", 1200, 20, "Slow-cooked with almonds and figs"),
    ("Saffron Peda", "Peda", 750, 28, "Kesar-infused milk rounds"),
    ("Celebration Hamper", "Hamper", 4500, 8, "A curated box for festivals"),
];

/// Create the demo catalog.
///
/// With `skip_existing`, sweets whose name already appears in the listing
/// are left untouched.
///
/// # Errors
///
/// Returns an error if admin login fails; individual create failures are
/// logged and skipped.
pub async fn run(skip_existing: bool) -> Result<(), CliError> {
    let client = super::client()?;
    let token = super::admin_token(&client).await?;

    let existing: Vec<String> = if skip_existing {
        client
            .list_sweets(Some(&token))
            .await?
            .iter()
            .map(|s| s.name.clone())
            .collect()
    } else {
        Vec::new()
    };

    let mut created = 0usize;
    let mut skipped = 0usize;
    let mut failed = 0usize;

    for &(name, category, paise, quantity, description) in DEMO_SWEETS {
        if existing.iter().any(|n| n == name) {
            skipped += 1;
            continue;
        }

        let sweet = NewSweet {
            name: name.to_string(),
            category: category.to_string(),
            price: Price::from_cents(paise),
            quantity,
            description: Some(description.to_string()),
            image_url: None,
        };

        match client.create_sweet(&token, &sweet).await {
            Ok(()) => {
                created += 1;
                info!("Created {name}");
            }
            Err(e) => {
                failed += 1;
                warn!("Failed to create {name}: {e}");
            }
        }
    }

    info!("Seeding complete!");
    info!("  Created: {created}");
    info!("  Skipped (already exist): {skipped}");
    if failed > 0 {
        warn!("  Failed: {failed}");
    }

    Ok(())
}
