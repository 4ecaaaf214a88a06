//! Sample data for a fresh database

use crate::error::Result;
use crate::inventory::types::NewFoodItem;
use crate::inventory::InventoryStore;
use chrono::Duration;

const CATEGORIES: [&str; 5] = ["Dairy", "Vegetables", "Meat", "Pantry", "Fruits"];

/// (name, grams, days until expiry, notes, index into `CATEGORIES`)
const ITEMS: [(&str, f64, i64, &str, usize); 5] = [
    ("Whole Milk", 1000.0, 5, "Semi-skimmed", 0),
    ("Carrots", 500.0, 10, "", 1),
    ("Chicken Breast", 800.0, 2, "Boneless", 2),
    ("Rice (Basmati)", 2000.0, 365, "Keep sealed", 3),
    ("Apples", 1200.0, 14, "Various", 4),
];

/// Outcome of a seed run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Seeded { categories: usize, items: usize },
    /// The database already held data and was left alone
    Skipped,
}

/// Fill an empty store with sample categories and items.
///
/// Expiry dates are relative to the store clock.
pub async fn seed(store: &InventoryStore) -> Result<SeedOutcome> {
    if !store.is_empty().await? {
        tracing::info!("Database already contains data; skipping seed");
        return Ok(SeedOutcome::Skipped);
    }

    let mut category_ids = Vec::with_capacity(CATEGORIES.len());
    for name in CATEGORIES {
        category_ids.push(store.create_category(name).await?.id);
    }

    let now = store.now();
    for (name, volume, days, notes, category) in ITEMS {
        store
            .create_item(NewFoodItem {
                name: name.to_string(),
                volume,
                volume_unit: "g".to_string(),
                expiry_date: now + Duration::days(days),
                notes: (!notes.is_empty()).then(|| notes.to_string()),
                category_id: category_ids[category],
            })
            .await?;
    }

    tracing::info!(
        categories = CATEGORIES.len(),
        items = ITEMS.len(),
        "Seeded sample inventory"
    );
    Ok(SeedOutcome::Seeded {
        categories: CATEGORIES.len(),
        items: ITEMS.len(),
    })
}
