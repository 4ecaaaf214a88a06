//! Dashboard module - inventory overview and rule-based suggestions
//!
//! Both views are pure functions of an item snapshot and the expiry
//! thresholds; the handler only fetches data and serializes the result.

pub mod handler;
pub mod types;

pub use handler::{dashboard_router, DashboardState};

use crate::expiry::ExpiryThresholds;
use crate::inventory::types::{CategorySummary, FoodItem};
use types::*;

const LIST_LIMIT: usize = 5;
const SUGGESTION_LIMIT: usize = 3;

struct Buckets<'a> {
    expired: Vec<&'a FoodItem>,
    expiring_soon: Vec<&'a FoodItem>,
    fresh: Vec<&'a FoodItem>,
}

impl<'a> Buckets<'a> {
    fn new(items: &'a [FoodItem], thresholds: &ExpiryThresholds) -> Self {
        let mut buckets = Buckets {
            expired: Vec::new(),
            expiring_soon: Vec::new(),
            fresh: Vec::new(),
        };
        for item in items {
            if item.days_until_expiry < 0 {
                buckets.expired.push(item);
            } else if thresholds.is_expiring_soon(item.days_until_expiry) {
                buckets.expiring_soon.push(item);
            } else {
                buckets.fresh.push(item);
            }
        }
        buckets
    }
}

/// Assemble the dashboard view
pub fn build_dashboard(
    items: &[FoodItem],
    categories: Vec<CategorySummary>,
    thresholds: &ExpiryThresholds,
) -> Dashboard {
    let buckets = Buckets::new(items, thresholds);

    let mut expiring = buckets.expiring_soon.clone();
    expiring.sort_by_key(|item| item.days_until_expiry);

    let mut expired = buckets.expired.clone();
    expired.sort_by_key(|item| item.days_until_expiry.abs());

    let mut recent: Vec<&FoodItem> = items.iter().collect();
    recent.sort_by(|a, b| b.date_added.cmp(&a.date_added).then(b.id.cmp(&a.id)));

    Dashboard {
        key_metrics: KeyMetrics {
            total_items: items.len(),
            expiring_soon: buckets.expiring_soon.len(),
            expired_items: buckets.expired.len(),
        },
        expiring_soon: expiring
            .into_iter()
            .take(LIST_LIMIT)
            .map(|item| ExpiringEntry {
                id: item.id,
                name: item.name.clone(),
                category: item.category.name.clone(),
                days_left: item.days_until_expiry,
                expiry_date: item.expiry_date,
            })
            .collect(),
        recently_expired: expired
            .into_iter()
            .take(LIST_LIMIT)
            .map(|item| ExpiredEntry {
                id: item.id,
                name: item.name.clone(),
                category: item.category.name.clone(),
                days_ago: item.days_until_expiry.abs(),
                expiry_date: item.expiry_date,
            })
            .collect(),
        waste_trend: WasteTrend {
            message: "Waste tracking is not available yet".to_string(),
            placeholder: true,
        },
        ai_suggestions: vec![
            Suggestion::new(
                SuggestionKind::Tip,
                "Use expiring milk in smoothies or baking",
                "Get recipes",
            ),
            Suggestion::new(
                SuggestionKind::Tip,
                "Consider freezing fresh vegetables to extend shelf life",
                "Storage tips",
            ),
            Suggestion::new(
                SuggestionKind::Tip,
                "Plan meals around items expiring soon to reduce waste",
                "Meal planning",
            ),
        ],
        categories,
        recent_items: recent
            .into_iter()
            .take(LIST_LIMIT)
            .map(|item| RecentEntry {
                id: item.id,
                name: item.name.clone(),
                category: item.category.name.clone(),
                date_added: item.date_added,
                days_until_expiry: item.days_until_expiry,
            })
            .collect(),
    }
}

fn default_suggestions() -> Vec<Suggestion> {
    vec![
        Suggestion::new(
            SuggestionKind::Tip,
            "Store fruits and vegetables in the refrigerator to extend their shelf life.",
            "Storage tips",
        ),
        Suggestion::new(
            SuggestionKind::Tip,
            "Check your inventory weekly to avoid food waste and save money.",
            "Set reminder",
        ),
        Suggestion::new(
            SuggestionKind::Tip,
            "Consider buying smaller quantities of perishable items to reduce waste.",
            "Shopping tips",
        ),
    ]
}

fn category_contains(item: &FoodItem, needle: &str) -> bool {
    item.category.name.to_lowercase().contains(needle)
}

/// Rule-based suggestions, at most three, falling back to general tips
pub fn build_suggestions(items: &[FoodItem], thresholds: &ExpiryThresholds) -> SuggestionReport {
    let buckets = Buckets::new(items, thresholds);
    let mut suggestions = Vec::new();

    if !buckets.expired.is_empty() {
        suggestions.push(Suggestion::new(
            SuggestionKind::Urgent,
            format!(
                "You have {} expired item(s). Consider composting or disposing them immediately.",
                buckets.expired.len()
            ),
            "Remove expired items",
        ));
    }

    if !buckets.expiring_soon.is_empty() {
        let urgent: Vec<String> = buckets
            .expiring_soon
            .iter()
            .filter(|item| item.days_until_expiry <= thresholds.urgent_days)
            .map(|item| item.name.clone())
            .collect();
        if !urgent.is_empty() {
            let mut warning = Suggestion::new(
                SuggestionKind::Warning,
                format!(
                    "{} item(s) expiring in {} days or less. Plan meals around these items.",
                    urgent.len(),
                    thresholds.urgent_days
                ),
                "View expiring items",
            );
            warning.items = Some(urgent);
            suggestions.push(warning);
        }

        if buckets
            .expiring_soon
            .iter()
            .any(|item| category_contains(item, "dairy"))
        {
            suggestions.push(Suggestion::new(
                SuggestionKind::Tip,
                "Use expiring dairy products in smoothies, baking, or make yogurt-based dips.",
                "Get dairy recipes",
            ));
        }

        if buckets
            .expiring_soon
            .iter()
            .any(|item| category_contains(item, "vegetable"))
        {
            suggestions.push(Suggestion::new(
                SuggestionKind::Tip,
                "Consider making a vegetable stir-fry or soup with your expiring vegetables.",
                "Get vegetable recipes",
            ));
        }
    }

    if !buckets.fresh.is_empty() && buckets.expiring_soon.is_empty() {
        suggestions.push(Suggestion::new(
            SuggestionKind::Success,
            "Great job! All your items are fresh. Consider meal planning to maintain this status.",
            "Plan meals",
        ));
    }

    if items.is_empty() {
        suggestions.push(Suggestion::new(
            SuggestionKind::Info,
            "Start building your inventory by adding your first food items.",
            "Add items",
        ));
    }

    if suggestions.is_empty() {
        suggestions = default_suggestions();
    }
    suggestions.truncate(SUGGESTION_LIMIT);

    SuggestionReport {
        suggestions,
        summary: SuggestionSummary {
            total_items: items.len(),
            expired_count: buckets.expired.len(),
            expiring_soon_count: buckets.expiring_soon.len(),
            fresh_count: buckets.fresh.len(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::types::Category;
    use chrono::{Duration, TimeZone, Utc};

    fn item(id: i64, name: &str, category: &str, days: i64) -> FoodItem {
        let added = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap() + Duration::hours(id);
        FoodItem {
            id,
            name: name.to_string(),
            volume: 1.0,
            volume_unit: "g".to_string(),
            expiry_date: added + Duration::days(days),
            notes: None,
            category_id: 1,
            status: ExpiryThresholds::default().status(days),
            days_until_expiry: days,
            date_added: added,
            category: Category {
                id: 1,
                name: category.to_string(),
            },
        }
    }

    #[test]
    fn test_dashboard_lists() {
        let items = vec![
            item(1, "Milk", "Dairy", 2),
            item(2, "Bread", "Pantry", -1),
            item(3, "Ham", "Meat", -4),
            item(4, "Rice", "Pantry", 200),
            item(5, "Kale", "Vegetables", 7),
            item(6, "Eggs", "Dairy", 0),
        ];
        let dashboard = build_dashboard(&items, Vec::new(), &ExpiryThresholds::default());

        assert_eq!(
            dashboard.key_metrics,
            KeyMetrics {
                total_items: 6,
                expiring_soon: 3,
                expired_items: 2,
            }
        );
        let expiring: Vec<i64> = dashboard.expiring_soon.iter().map(|e| e.days_left).collect();
        assert_eq!(expiring, vec![0, 2, 7]);

        assert_eq!(dashboard.recently_expired[0].name, "Bread");
        assert_eq!(dashboard.recently_expired[0].days_ago, 1);
        assert_eq!(dashboard.recently_expired[1].days_ago, 4);

        assert_eq!(dashboard.recent_items.len(), 5);
        assert_eq!(dashboard.recent_items[0].name, "Eggs");
        assert!(dashboard.waste_trend.placeholder);
        assert_eq!(dashboard.ai_suggestions.len(), 3);
    }

    #[test]
    fn test_dashboard_serialization() {
        let dashboard = build_dashboard(&[item(1, "Milk", "Dairy", 2)], Vec::new(), &ExpiryThresholds::default());
        let json = serde_json::to_value(&dashboard).unwrap();
        assert_eq!(json["keyMetrics"]["expiringSoon"], 1);
        assert_eq!(json["expiringSoon"][0]["daysLeft"], 2);
        assert_eq!(json["aiSuggestions"][0]["type"], "tip");
        assert!(json["aiSuggestions"][0].get("items").is_none());
    }

    #[test]
    fn test_suggestions_for_mixed_inventory() {
        let items = vec![
            item(1, "Milk", "Dairy", 1),
            item(2, "Ham", "Meat", -2),
            item(3, "Carrots", "Vegetables", 5),
        ];
        let report = build_suggestions(&items, &ExpiryThresholds::default());

        let kinds: Vec<SuggestionKind> = report.suggestions.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![SuggestionKind::Urgent, SuggestionKind::Warning, SuggestionKind::Tip]
        );
        assert_eq!(report.suggestions[1].items, Some(vec!["Milk".to_string()]));
        assert!(report.suggestions[2].message.contains("dairy"));
        assert_eq!(
            report.summary,
            SuggestionSummary {
                total_items: 3,
                expired_count: 1,
                expiring_soon_count: 2,
                fresh_count: 0,
            }
        );
    }

    #[test]
    fn test_suggestions_all_fresh() {
        let items = vec![item(1, "Rice", "Pantry", 100)];
        let report = build_suggestions(&items, &ExpiryThresholds::default());
        assert_eq!(report.suggestions.len(), 1);
        assert_eq!(report.suggestions[0].kind, SuggestionKind::Success);
    }

    #[test]
    fn test_suggestions_empty_inventory() {
        let report = build_suggestions(&[], &ExpiryThresholds::default());
        assert_eq!(report.suggestions.len(), 1);
        assert_eq!(report.suggestions[0].kind, SuggestionKind::Info);
        assert_eq!(report.summary.total_items, 0);
    }

    #[test]
    fn test_suggestions_fall_back_to_defaults() {
        // Soon-but-not-urgent pantry item triggers no rule
        let items = vec![item(1, "Flour", "Pantry", 6)];
        let report = build_suggestions(&items, &ExpiryThresholds::default());
        assert_eq!(report.suggestions, default_suggestions());
    }
}
