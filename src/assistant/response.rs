//! Tolerant handling of model replies

use crate::assistant::prompt::InventoryAnalysis;
use crate::assistant::types::*;
use crate::error::{Error, Result};
use serde_json::Value;

/// Reply used when the model gave no usable `reply` text
pub const DEFAULT_REPLY: &str = "I'm here to help with your inventory management!";

/// Reply used when the model could not be reached at all
pub const UNREACHABLE_REPLY: &str =
    "I can't reach the AI assistant right now, but here is what needs attention in your inventory.";

/// Tip attached to every locally built reply
pub const FALLBACK_TIP: &str = "Check your inventory regularly to avoid waste";

const FALLBACK_EXPIRING_LIMIT: usize = 3;

/// Remove a surrounding ```` ```json ```` or ```` ``` ```` fence
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let inner = if let Some(rest) = trimmed.strip_prefix("```json") {
        rest
    } else if let Some(rest) = trimmed.strip_prefix("```") {
        rest
    } else {
        return trimmed;
    };

    let inner = inner.trim_start();
    inner.strip_suffix("```").unwrap_or(inner).trim_end()
}

/// Turn raw model text into a chat response.
///
/// A reply that is not a JSON object degrades to [`fallback_response`] with
/// the raw text as the reply.
pub fn parse_chat_reply(raw: &str, analysis: &InventoryAnalysis<'_>) -> ChatResponse {
    let cleaned = strip_code_fences(raw);
    match serde_json::from_str::<ModelChatReply>(cleaned) {
        Ok(reply) => ChatResponse {
            reply: reply
                .reply
                .filter(|r| !r.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_REPLY.to_string()),
            expiring_soon: reply.expiring_soon.unwrap_or_default(),
            suggested_recipes: reply.suggested_recipes.unwrap_or_default(),
            shopping_suggestions: reply.shopping_suggestions.unwrap_or_default(),
            inventory_tips: reply.inventory_tips.unwrap_or_default(),
            inventory_summary: analysis.summary(),
            degraded: false,
        },
        Err(e) => {
            tracing::warn!(error = %e, "Model reply was not valid JSON; using local fallback");
            fallback_response(raw.trim(), analysis)
        }
    }
}

/// Locally built response from the inventory alone
pub fn fallback_response(reply: &str, analysis: &InventoryAnalysis<'_>) -> ChatResponse {
    let mut expiring: Vec<_> = analysis.expiring_soon.iter().collect();
    expiring.sort_by_key(|(item, _)| item.days_until_expiry);

    let expiring_soon = expiring
        .into_iter()
        .take(FALLBACK_EXPIRING_LIMIT)
        .map(|(item, urgency)| ExpiringSuggestion {
            name: item.name.clone(),
            days_left: item.days_until_expiry,
            urgency: urgency.to_string(),
            suggestion: format!("Use within {} days", item.days_until_expiry),
        })
        .collect();

    ChatResponse {
        reply: if reply.is_empty() {
            DEFAULT_REPLY.to_string()
        } else {
            reply.to_string()
        },
        expiring_soon,
        suggested_recipes: Vec::new(),
        shopping_suggestions: Vec::new(),
        inventory_tips: vec![FALLBACK_TIP.to_string()],
        inventory_summary: analysis.summary(),
        degraded: true,
    }
}

/// Extract a detection from model text.
///
/// The span from the first `{` to the last `}` must parse as a JSON object.
pub fn parse_detection(raw: &str, provider: &str) -> Result<Detection> {
    let start = raw.find('{');
    let end = raw.rfind('}');
    let span = match (start, end) {
        (Some(start), Some(end)) if start < end => &raw[start..=end],
        _ => {
            return Err(Error::Upstream(format!(
                "Invalid model response: {}",
                truncate(raw, 200)
            )))
        }
    };

    let parsed: Value = serde_json::from_str(span)
        .map_err(|e| Error::Upstream(format!("Invalid model response JSON: {}", e)))?;
    if !parsed.is_object() {
        return Err(Error::Upstream("Model response is not a JSON object".to_string()));
    }

    let text = |key: &str| parsed.get(key).and_then(Value::as_str).map(str::to_string);

    Ok(Detection {
        label: text("label"),
        confidence: parsed
            .get("confidence")
            .and_then(Value::as_f64)
            .unwrap_or(0.0),
        estimated_expiry_days: parsed.get("estimated_expiry_days").and_then(|v| {
            v.as_i64().or_else(|| v.as_f64().map(|f| f.round() as i64))
        }),
        estimated_volume_ml: parsed.get("estimated_volume_ml").and_then(Value::as_f64),
        category: text("category"),
        provider: provider.to_string(),
        raw: parsed,
    })
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
