//! Assistant wire types
//!
//! `ChatResponse` fields use camelCase; `Detection` keeps the snake_case keys
//! the mobile client already reads (`estimated_expiry_days`, ...).

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request body for `POST /api/chat`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

/// An item the assistant flags for attention.
///
/// `urgency` is passed through as the model wrote it (`urgent`, `soon`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpiringSuggestion {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_days")]
    pub days_left: i64,
    #[serde(default = "default_urgency", deserialize_with = "lenient_urgency")]
    pub urgency: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub suggestion: String,
}

fn default_urgency() -> String {
    "soon".to_string()
}

/// A recipe proposal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSuggestion {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub uses_expiring: bool,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub missing_ingredients: Vec<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub instructions: String,
}

/// Something worth buying; `priority` is usually `high`, `medium` or `low`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingSuggestion {
    #[serde(default, deserialize_with = "lenient_text")]
    pub item: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub reason: String,
    #[serde(default = "default_priority", deserialize_with = "lenient_priority")]
    pub priority: String,
}

fn default_priority() -> String {
    "medium".to_string()
}

// =============================================================================
// Lenient field parsing for model output
// =============================================================================

/// Scalars become text; null, arrays and objects do not
fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn label_or(value: Value, default: fn() -> String) -> String {
    scalar_text(value)
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(default)
}

fn lenient_text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(scalar_text(Value::deserialize(d)?).unwrap_or_default())
}

fn lenient_urgency<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(label_or(Value::deserialize(d)?, default_urgency))
}

fn lenient_priority<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(label_or(Value::deserialize(d)?, default_priority))
}

/// Whole days from a number or numeric string; anything else is 0
fn lenient_days<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    let days = match Value::deserialize(d)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => s.trim().parse::<f64>().ok().map(|f| f.round() as i64),
        _ => None,
    };
    Ok(days.unwrap_or_default())
}

fn lenient_strings<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Array(values) => values.into_iter().filter_map(scalar_text).collect(),
        other => scalar_text(other).into_iter().collect(),
    })
}

/// Keep the entries that parse and drop the rest; a non-array is absent
fn lenient_list<'de, D, T>(d: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(d)? {
        Value::Array(values) => Some(
            values
                .into_iter()
                .filter_map(|v| serde_json::from_value(v).ok())
                .collect(),
        ),
        _ => None,
    })
}

fn lenient_reply<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(scalar_text(Value::deserialize(d)?))
}

/// Locally computed inventory counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventorySummary {
    pub total_items: usize,
    pub expiring_count: usize,
    pub expired_count: usize,
}

/// Reply as the model is asked to produce it; every field optional
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelChatReply {
    #[serde(default, deserialize_with = "lenient_reply")]
    pub reply: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub expiring_soon: Option<Vec<ExpiringSuggestion>>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub suggested_recipes: Option<Vec<RecipeSuggestion>>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub shopping_suggestions: Option<Vec<ShoppingSuggestion>>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub inventory_tips: Option<Vec<String>>,
}

/// Response body for `POST /api/chat`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub reply: String,
    pub expiring_soon: Vec<ExpiringSuggestion>,
    pub suggested_recipes: Vec<RecipeSuggestion>,
    pub shopping_suggestions: Vec<ShoppingSuggestion>,
    pub inventory_tips: Vec<String>,
    pub inventory_summary: InventorySummary,
    /// Set when the model reply could not be used and a canned answer was built
    pub degraded: bool,
}

/// Response body for `POST /api/detect`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detection {
    pub label: Option<String>,
    pub confidence: f64,
    pub estimated_expiry_days: Option<i64>,
    pub estimated_volume_ml: Option<f64>,
    pub category: Option<String>,
    pub provider: String,
    pub raw: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_reply_tolerates_missing_fields() {
        let reply: ModelChatReply = serde_json::from_str(r#"{"reply": "Hi"}"#).unwrap();
        assert_eq!(reply.reply.as_deref(), Some("Hi"));
        assert!(reply.expiring_soon.is_none());
        assert!(reply.inventory_tips.is_none());
    }

    #[test]
    fn test_model_reply_partial_entries() {
        let json = r#"{
            "expiringSoon": [{"name": "Milk", "daysLeft": 2, "urgency": "urgent"}],
            "shoppingSuggestions": [{"item": "Bread"}]
        }"#;
        let reply: ModelChatReply = serde_json::from_str(json).unwrap();
        let expiring = reply.expiring_soon.unwrap();
        assert_eq!(expiring[0].urgency, "urgent");
        assert_eq!(expiring[0].suggestion, "");
        let shopping = reply.shopping_suggestions.unwrap();
        assert_eq!(shopping[0].priority, "medium");
    }

    #[test]
    fn test_model_reply_unexpected_values() {
        let json = r#"{
            "reply": "Use the milk.",
            "expiringSoon": [
                {"name": "Milk", "daysLeft": "2", "urgency": "HIGH"},
                {"name": "Eggs", "daysLeft": 1.6, "urgency": null},
                "not an entry"
            ],
            "suggestedRecipes": [{"name": "Pancakes", "ingredients": "Milk", "usesExpiring": true}],
            "shoppingSuggestions": [{"item": "Flour", "priority": "urgent"}],
            "inventoryTips": ["Freeze bread", 3, {"tip": "x"}]
        }"#;
        let reply: ModelChatReply = serde_json::from_str(json).unwrap();

        let expiring = reply.expiring_soon.unwrap();
        assert_eq!(expiring.len(), 2);
        assert_eq!(expiring[0].days_left, 2);
        assert_eq!(expiring[0].urgency, "high");
        assert_eq!(expiring[1].days_left, 2);
        assert_eq!(expiring[1].urgency, "soon");

        let recipes = reply.suggested_recipes.unwrap();
        assert_eq!(recipes[0].ingredients, vec!["Milk".to_string()]);

        let shopping = reply.shopping_suggestions.unwrap();
        assert_eq!(shopping[0].priority, "urgent");

        assert_eq!(
            reply.inventory_tips.unwrap(),
            vec!["Freeze bread".to_string()]
        );
    }

    #[test]
    fn test_model_reply_non_array_lists_are_absent() {
        let reply: ModelChatReply =
            serde_json::from_str(r#"{"reply": 42, "inventoryTips": "Freeze bread"}"#).unwrap();
        assert_eq!(reply.reply.as_deref(), Some("42"));
        assert!(reply.inventory_tips.is_none());
    }

    #[test]
    fn test_chat_response_serialization() {
        let resp = ChatResponse {
            reply: "ok".to_string(),
            expiring_soon: vec![],
            suggested_recipes: vec![RecipeSuggestion {
                name: "Omelette".to_string(),
                ingredients: vec!["Eggs".to_string()],
                uses_expiring: true,
                missing_ingredients: vec![],
                instructions: "Whisk and fry.".to_string(),
            }],
            shopping_suggestions: vec![],
            inventory_tips: vec![],
            inventory_summary: InventorySummary {
                total_items: 3,
                expiring_count: 1,
                expired_count: 0,
            },
            degraded: false,
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"usesExpiring\":true"));
        assert!(json.contains("\"inventorySummary\":{\"totalItems\":3"));
        assert!(json.contains("\"suggestedRecipes\""));
    }

    #[test]
    fn test_detection_keys_are_snake_case() {
        let detection = Detection {
            label: Some("apple".to_string()),
            confidence: 0.9,
            estimated_expiry_days: Some(7),
            estimated_volume_ml: None,
            category: Some("Fruits".to_string()),
            provider: "gemini".to_string(),
            raw: serde_json::json!({}),
        };
        let json = serde_json::to_string(&detection).unwrap();
        assert!(json.contains("\"estimated_expiry_days\":7"));
        assert!(json.contains("\"estimated_volume_ml\":null"));
    }
}
