//! Inventory wire and domain types
//!
//! All types use camelCase JSON serialization. Client payloads carry
//! `quantity`/`unit`, which map onto the stored `volume`/`volumeUnit`.
//! Numeric fields that clients commonly send as strings (`quantity`,
//! `categoryId`, bulk id lists) are kept as raw JSON values until the
//! validator has looked at them.

use crate::error::{Error, Result};
use crate::expiry::{parse_expiry_date, ExpiryStatus};
use crate::validation::parse_positive_id;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default unit when the client does not supply one
pub const DEFAULT_VOLUME_UNIT: &str = "g";

/// A food category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// A category with the number of items it owns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub id: i64,
    pub name: String,
    pub item_count: i64,
}

/// A tracked food item with derived expiry fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodItem {
    pub id: i64,
    pub name: String,
    pub volume: f64,
    pub volume_unit: String,
    pub expiry_date: DateTime<Utc>,
    pub notes: Option<String>,
    pub category_id: i64,
    pub status: ExpiryStatus,
    pub days_until_expiry: i64,
    pub date_added: DateTime<Utc>,
    pub category: Category,
}

/// Request body for creating or renaming a category
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryInput {
    #[serde(default)]
    pub name: Option<String>,
}

/// Request body for creating or updating a food item
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodItemInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub quantity: Option<Value>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub expiry_date: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub category_id: Option<Value>,
}

/// Normalized, validated item ready to insert
#[derive(Debug, Clone, PartialEq)]
pub struct NewFoodItem {
    pub name: String,
    pub volume: f64,
    pub volume_unit: String,
    pub expiry_date: DateTime<Utc>,
    pub notes: Option<String>,
    pub category_id: i64,
}

/// Normalized partial update; `None` leaves the column unchanged.
///
/// `notes: Some(None)` clears the notes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FoodItemPatch {
    pub name: Option<String>,
    pub volume: Option<f64>,
    pub volume_unit: Option<String>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub notes: Option<Option<String>>,
    pub category_id: Option<i64>,
}

impl FoodItemPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn trimmed_notes(notes: Option<&str>) -> Option<String> {
    notes
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
}

fn malformed(field: &str) -> Error {
    Error::Validation(vec![format!("Valid {} is required", field)])
}

impl FoodItemInput {
    /// Normalize a validated create payload
    pub fn to_new_item(&self) -> Result<NewFoodItem> {
        let name = self
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| malformed("name"))?;
        let volume = self
            .quantity
            .as_ref()
            .and_then(Value::as_f64)
            .ok_or_else(|| malformed("quantity"))?;
        let expiry_date = self
            .expiry_date
            .as_deref()
            .and_then(parse_expiry_date)
            .ok_or_else(|| malformed("expiry date"))?;
        let category_id = self
            .category_id
            .as_ref()
            .and_then(parse_positive_id)
            .ok_or_else(|| malformed("category ID"))?;

        Ok(NewFoodItem {
            name: name.to_string(),
            volume,
            volume_unit: self
                .unit
                .as_deref()
                .map(str::trim)
                .filter(|u| !u.is_empty())
                .unwrap_or(DEFAULT_VOLUME_UNIT)
                .to_string(),
            expiry_date,
            notes: trimmed_notes(self.notes.as_deref()),
            category_id,
        })
    }

    /// Normalize a validated partial update payload
    pub fn to_patch(&self) -> Result<FoodItemPatch> {
        let mut patch = FoodItemPatch::default();

        if let Some(name) = &self.name {
            patch.name = Some(name.trim().to_string());
        }
        if let Some(quantity) = &self.quantity {
            patch.volume = Some(quantity.as_f64().ok_or_else(|| malformed("quantity"))?);
        }
        if let Some(unit) = &self.unit {
            patch.volume_unit = Some(unit.trim().to_string());
        }
        if let Some(expiry) = &self.expiry_date {
            patch.expiry_date = Some(parse_expiry_date(expiry).ok_or_else(|| malformed("expiry date"))?);
        }
        if let Some(notes) = &self.notes {
            patch.notes = Some(trimmed_notes(Some(notes)));
        }
        if let Some(category_id) = &self.category_id {
            patch.category_id = Some(parse_positive_id(category_id).ok_or_else(|| malformed("category ID"))?);
        }

        Ok(patch)
    }
}

/// Request body for `POST /api/items/bulk-delete`
///
/// Ids stay as a raw value so a non-array payload gets a precise error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkDeleteItemsRequest {
    #[serde(default)]
    pub item_ids: Option<Value>,
}

/// Request body for `POST /api/categories/bulk-delete`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkDeleteCategoriesRequest {
    #[serde(default)]
    pub category_ids: Option<Value>,
}

/// Request body for `POST /api/categories/force-delete`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForceDeleteRequest {
    #[serde(default)]
    pub category_id: Option<Value>,
    #[serde(default)]
    pub move_to_category_id: Option<Value>,
}

/// Result of a bulk item delete
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemBulkDeleteOutcome {
    pub deleted_ids: Vec<i64>,
    pub not_found_ids: Vec<i64>,
}

/// Result of a bulk category delete
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBulkDeleteOutcome {
    pub deleted_ids: Vec<i64>,
    pub not_found_ids: Vec<i64>,
    pub blocked: Vec<CategorySummary>,
}

/// Result of a force delete
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForceDeleteOutcome {
    pub category: Category,
    pub items_moved: i64,
    pub moved_to_category_id: Option<i64>,
}

/// Counts returned alongside expiring items
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpiringSummary {
    pub total_items: usize,
    pub expiring_items: usize,
    pub expired_items: usize,
    pub urgent_items: usize,
    pub soon_items: usize,
}

/// Items expiring within a window
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpiringReport {
    pub items: Vec<FoodItem>,
    pub summary: ExpiringSummary,
}
