//! Payload validation
//!
//! Each check returns a complete, ordered error list instead of failing on
//! the first problem, so a client can show every issue at once. Patterns and
//! length bounds come from [`ValidationRules`] and are compiled once.

use crate::assistant::types::ChatRequest;
use crate::config::{TextRule, ValidationRules};
use crate::error::{Error, Result};
use crate::expiry::parse_expiry_date;
use crate::inventory::types::{CategoryInput, FoodItemInput};
use regex::Regex;
use serde::Serialize;
use serde_json::Value;

/// Outcome of validating one payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// Convert into a `Result`, carrying the errors on failure
    pub fn into_result(self) -> Result<()> {
        if self.is_valid {
            Ok(())
        } else {
            Err(Error::Validation(self.errors))
        }
    }
}

/// Parse a JSON value as a strictly positive integer id.
///
/// Accepts integers, integral floats and numeric strings.
pub fn parse_positive_id(value: &Value) -> Option<i64> {
    let id = match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f <= i64::MAX as f64)
                .map(|f| f as i64)
        })?,
        Value::String(s) => s.trim().parse::<i64>().ok()?,
        _ => return None,
    };
    (id > 0).then_some(id)
}

struct TextCheck {
    min_length: usize,
    max_length: usize,
    pattern: Regex,
}

impl TextCheck {
    fn compile(field: &str, rule: &TextRule) -> Result<Self> {
        let pattern = Regex::new(&rule.pattern).map_err(|e| {
            Error::Config(format!("Invalid validation pattern for '{}': {}", field, e))
        })?;
        Ok(Self {
            min_length: rule.min_length,
            max_length: rule.max_length,
            pattern,
        })
    }

    fn matches(&self, value: &str) -> bool {
        self.pattern.is_match(value)
    }

    fn too_short(&self, value: &str) -> bool {
        value.chars().count() < self.min_length
    }

    fn too_long(&self, value: &str) -> bool {
        value.chars().count() > self.max_length
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Compiled validator for item, category and chat payloads
pub struct Validator {
    item_name: TextCheck,
    category_name: TextCheck,
    notes: TextCheck,
    chat_message_max_length: usize,
}

impl Validator {
    /// Compile the rule table. An invalid pattern is a configuration error.
    pub fn new(rules: &ValidationRules) -> Result<Self> {
        Ok(Self {
            item_name: TextCheck::compile("item_name", &rules.item_name)?,
            category_name: TextCheck::compile("category_name", &rules.category_name)?,
            notes: TextCheck::compile("notes", &rules.notes)?,
            chat_message_max_length: rules.chat_message_max_length,
        })
    }

    /// Validate a create payload; every required field must be present
    pub fn validate_food_item(&self, input: &FoodItemInput) -> ValidationReport {
        let mut errors = Vec::new();

        match non_blank(input.name.as_deref()) {
            Some(name) => self.check_item_name(name, &mut errors),
            None => errors.push("Name is required".to_string()),
        }

        if !Self::is_positive_quantity(input.quantity.as_ref()) {
            errors.push("Quantity must be a positive number".to_string());
        }

        Self::check_unit(input.unit.as_deref(), &mut errors);

        if input
            .expiry_date
            .as_deref()
            .and_then(parse_expiry_date)
            .is_none()
        {
            errors.push("Valid expiry date is required".to_string());
        }

        if input.category_id.as_ref().and_then(parse_positive_id).is_none() {
            errors.push("Valid category ID is required".to_string());
        }

        self.check_notes(input.notes.as_deref(), &mut errors);

        ValidationReport::from_errors(errors)
    }

    /// Validate a partial update; only fields present in the payload are checked
    pub fn validate_food_item_patch(&self, input: &FoodItemInput) -> ValidationReport {
        let mut errors = Vec::new();

        if let Some(name) = &input.name {
            match non_blank(Some(name)) {
                Some(name) => self.check_item_name(name, &mut errors),
                None => errors.push("Name is required".to_string()),
            }
        }

        if input.quantity.is_some() && !Self::is_positive_quantity(input.quantity.as_ref()) {
            errors.push("Quantity must be a positive number".to_string());
        }

        Self::check_unit(input.unit.as_deref(), &mut errors);

        if let Some(expiry) = &input.expiry_date {
            if parse_expiry_date(expiry).is_none() {
                errors.push("Valid expiry date is required".to_string());
            }
        }

        if let Some(category_id) = &input.category_id {
            if parse_positive_id(category_id).is_none() {
                errors.push("Valid category ID is required".to_string());
            }
        }

        self.check_notes(input.notes.as_deref(), &mut errors);

        ValidationReport::from_errors(errors)
    }

    /// Validate a category create/rename payload
    pub fn validate_category(&self, input: &CategoryInput) -> ValidationReport {
        let mut errors = Vec::new();

        match non_blank(input.name.as_deref()) {
            None => errors.push("Category name is required".to_string()),
            Some(name) => {
                let rule = &self.category_name;
                if !rule.matches(name) {
                    errors.push(
                        "Category name must contain only letters, spaces, and hyphens".to_string(),
                    );
                }
                if rule.too_short(name) {
                    errors.push(format!(
                        "Category name must be at least {} characters long",
                        rule.min_length
                    ));
                }
                if rule.too_long(name) {
                    errors.push(format!(
                        "Category name must be less than {} characters",
                        rule.max_length
                    ));
                }
            }
        }

        ValidationReport::from_errors(errors)
    }

    /// Validate a chat message payload
    pub fn validate_chat_message(&self, input: &ChatRequest) -> ValidationReport {
        let mut errors = Vec::new();
        let message = input.message.as_deref();

        if non_blank(message).is_none() {
            errors.push("Message is required".to_string());
        }

        if let Some(message) = message {
            if message.chars().count() > self.chat_message_max_length {
                errors.push(format!(
                    "Message too long (max {} characters)",
                    self.chat_message_max_length
                ));
            }
        }

        ValidationReport::from_errors(errors)
    }

    fn check_item_name(&self, name: &str, errors: &mut Vec<String>) {
        let rule = &self.item_name;
        if !rule.matches(name) {
            errors.push(
                "Item name must contain only letters, numbers, spaces, hyphens, parentheses, and ampersands"
                    .to_string(),
            );
        }
        if rule.too_short(name) {
            errors.push(format!(
                "Item name must be at least {} characters long",
                rule.min_length
            ));
        }
        if rule.too_long(name) {
            errors.push(format!(
                "Item name must be less than {} characters",
                rule.max_length
            ));
        }
    }

    fn check_notes(&self, notes: Option<&str>, errors: &mut Vec<String>) {
        let Some(notes) = non_blank(notes) else {
            return;
        };
        if !self.notes.matches(notes) {
            errors.push("Notes contain invalid characters".to_string());
        }
        if self.notes.too_long(notes) {
            errors.push(format!(
                "Notes must be less than {} characters",
                self.notes.max_length
            ));
        }
    }

    fn check_unit(unit: Option<&str>, errors: &mut Vec<String>) {
        if let Some(unit) = unit {
            if unit.trim().is_empty() {
                errors.push("Unit must not be empty".to_string());
            }
        }
    }

    fn is_positive_quantity(quantity: Option<&Value>) -> bool {
        quantity
            .and_then(Value::as_f64)
            .map(|q| q.is_finite() && q > 0.0)
            .unwrap_or(false)
    }
}
