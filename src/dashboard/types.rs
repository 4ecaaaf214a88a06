//! Dashboard response types (camelCase JSON)

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::inventory::types::CategorySummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyMetrics {
    pub total_items: usize,
    pub expiring_soon: usize,
    pub expired_items: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpiringEntry {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub days_left: i64,
    pub expiry_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpiredEntry {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub days_ago: i64,
    pub expiry_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentEntry {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub date_added: DateTime<Utc>,
    pub days_until_expiry: i64,
}

/// Kind of suggestion card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Urgent,
    Warning,
    Tip,
    Success,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    pub message: String,
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<String>>,
}

impl Suggestion {
    pub fn new(kind: SuggestionKind, message: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            action: action.into(),
            items: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WasteTrend {
    pub message: String,
    pub placeholder: bool,
}

/// Response body for `GET /api/dashboard`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub key_metrics: KeyMetrics,
    pub expiring_soon: Vec<ExpiringEntry>,
    pub recently_expired: Vec<ExpiredEntry>,
    pub waste_trend: WasteTrend,
    pub ai_suggestions: Vec<Suggestion>,
    pub categories: Vec<CategorySummary>,
    pub recent_items: Vec<RecentEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionSummary {
    pub total_items: usize,
    pub expired_count: usize,
    pub expiring_soon_count: usize,
    pub fresh_count: usize,
}

/// Response body for `GET /api/dashboard/suggestions`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestionReport {
    pub suggestions: Vec<Suggestion>,
    pub summary: SuggestionSummary,
}
