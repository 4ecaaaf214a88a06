//! Prompt construction
//!
//! The chat prompt is a pure function of the inventory snapshot, the
//! thresholds and the user message, so the same inputs always produce the
//! same text.

use crate::assistant::types::InventorySummary;
use crate::expiry::{ExpiryThresholds, Urgency};
use crate::inventory::types::FoodItem;
use serde_json::json;

/// Instruction sent alongside an image for food recognition
pub const DETECTION_PROMPT: &str = "You are a food recognition assistant. Analyze the attached image and RETURN ONLY valid JSON (no extra text) with keys: label (string or null), confidence (number between 0 and 1), estimated_expiry_days (integer, days until expiry), estimated_volume_ml (number, estimated volume in milliliters), and category (string or null). Example: {\"label\":\"apple\",\"confidence\":0.92,\"estimated_expiry_days\":7,\"estimated_volume_ml\":150,\"category\":\"Fruits\"}. If you cannot identify a value, use null or 0 as appropriate.";

const RESPONSE_FORMAT: &str = r#"RESPONSE FORMAT:
Respond ONLY with a valid JSON object (no markdown, no code blocks, no extra text). Use this exact format:
{
  "reply": "Brief conversational response (max 2 sentences)",
  "expiringSoon": [
    {
      "name": "Item name",
      "daysLeft": 2,
      "urgency": "urgent|soon",
      "suggestion": "One specific action"
    }
  ],
  "suggestedRecipes": [
    {
      "name": "Recipe name",
      "ingredients": ["ingredient1", "ingredient2"],
      "usesExpiring": true,
      "missingIngredients": ["missing1"],
      "instructions": "One sentence cooking instruction"
    }
  ],
  "shoppingSuggestions": [
    {
      "item": "Item to buy",
      "reason": "Brief reason",
      "priority": "high|medium|low"
    }
  ],
  "inventoryTips": [
    "One helpful tip"
  ]
}"#;

const CAPABILITIES: &str = "YOUR CAPABILITIES:
1. **Expiry Alerts**: Identify items expiring soon and suggest immediate action
2. **Recipe Suggestions**: Recommend recipes using available items, prioritizing expiring ones
3. **Shopping Lists**: Identify missing ingredients for recipes and suggest what to buy
4. **Inventory Management**: Provide tips for better food storage and waste reduction
5. **Meal Planning**: Suggest meal plans based on available ingredients";

const RULES: &str = "IMPORTANT RULES:
- Always prioritize expiring items in your suggestions
- Keep responses concise and practical
- Limit to 3 expiring items, 2 recipes, 3 shopping items, 2 tips max
- Be specific about quantities and measurements
- If suggesting recipes, check if all ingredients are available
- For missing ingredients, suggest specific items to buy
- Be encouraging and helpful in your tone
- Respond ONLY with valid JSON, no markdown formatting";

/// Inventory split into urgency buckets
#[derive(Debug, Default)]
pub struct InventoryAnalysis<'a> {
    /// Not yet expired and within `soon_days`, with their bucket
    pub expiring_soon: Vec<(&'a FoodItem, Urgency)>,
    pub expired: Vec<&'a FoodItem>,
    pub fresh: Vec<&'a FoodItem>,
}

impl<'a> InventoryAnalysis<'a> {
    /// Bucket items in their given order
    pub fn new(items: &'a [FoodItem], thresholds: &ExpiryThresholds) -> Self {
        let mut analysis = Self::default();
        for item in items {
            match thresholds.urgency(item.days_until_expiry) {
                Urgency::Expired => analysis.expired.push(item),
                Urgency::Fresh => analysis.fresh.push(item),
                urgency => analysis.expiring_soon.push((item, urgency)),
            }
        }
        analysis
    }

    pub fn total(&self) -> usize {
        self.expiring_soon.len() + self.expired.len() + self.fresh.len()
    }

    /// Counts reported back to the client
    pub fn summary(&self) -> InventorySummary {
        InventorySummary {
            total_items: self.total(),
            expiring_count: self.expiring_soon.len(),
            expired_count: self.expired.len(),
        }
    }
}

/// Build the chat prompt
pub fn build_chat_prompt(
    message: &str,
    items: &[FoodItem],
    analysis: &InventoryAnalysis<'_>,
    thresholds: &ExpiryThresholds,
) -> String {
    let listing: Vec<_> = items
        .iter()
        .map(|item| {
            json!({
                "name": item.name,
                "quantity": item.volume,
                "unit": item.volume_unit,
                "category": item.category.name,
                "expiryDate": item.expiry_date.to_rfc3339(),
                "daysUntilExpiry": item.days_until_expiry,
                "status": item.status,
                "notes": item.notes,
            })
        })
        .collect();
    let listing = serde_json::to_string_pretty(&listing).unwrap_or_else(|_| "[]".to_string());

    format!(
        "You are an intelligent kitchen assistant and inventory manager. \
Your role is to help users manage their food inventory, suggest recipes, and provide shopping recommendations.

INVENTORY CONTEXT:
- Total items: {total}
- Items expiring soon (≤{soon} days): {expiring}
- Expired items: {expired}
- Fresh items: {fresh}

DETAILED INVENTORY:
{listing}

{CAPABILITIES}

{RESPONSE_FORMAT}

{RULES}

User message: \"{message}\"

Please analyze the inventory and provide helpful suggestions based on the user's request. Focus on:
1. Items that are expiring soon and need immediate attention
2. Recipe suggestions that use available ingredients
3. Shopping recommendations for missing items
4. Any inventory management tips",
        total = analysis.total(),
        soon = thresholds.soon_days,
        expiring = analysis.expiring_soon.len(),
        expired = analysis.expired.len(),
        fresh = analysis.fresh.len(),
    )
}
