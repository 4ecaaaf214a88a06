//! Generative model seam and the assistant gateway
//!
//! ```text
//! chat:   message + inventory → prompt → GenerativeModel → tolerant parse → ChatResponse
//! detect: image bytes + prompt → GenerativeModel → first {...} span → Detection
//! ```

use crate::assistant::prompt::{build_chat_prompt, InventoryAnalysis, DETECTION_PROMPT};
use crate::assistant::response::{
    fallback_response, parse_chat_reply, parse_detection, UNREACHABLE_REPLY,
};
use crate::assistant::types::{ChatResponse, Detection};
use crate::config::{AssistantConfig, GenerationSettings, SafetySetting};
use crate::error::{Error, Result};
use crate::expiry::ExpiryThresholds;
use crate::inventory::types::FoodItem;
use async_trait::async_trait;
use base64::Engine;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

/// One piece of model input
#[derive(Debug, Clone, PartialEq)]
pub enum ContentPart {
    Text(String),
    InlineData { mime_type: String, data: Vec<u8> },
}

/// A single generation call
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub model: String,
    pub parts: Vec<ContentPart>,
    pub generation: GenerationSettings,
    pub safety: Vec<SafetySetting>,
}

/// Text generation backend
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Run one request and return the first candidate's text
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;

    /// Provider name reported on detections
    fn name(&self) -> &str;
}

// =============================================================================
// Gemini over HTTP
// =============================================================================

/// Google Generative Language API client
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

/// Header carrying the API key; the key never appears in a request URL
const API_KEY_HEADER: &str = "x-goog-api-key";

impl GeminiClient {
    pub fn new(config: &AssistantConfig, api_key: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    fn request_body(request: &GenerationRequest) -> Value {
        let parts: Vec<Value> = request
            .parts
            .iter()
            .map(|part| match part {
                ContentPart::Text(text) => json!({ "text": text }),
                ContentPart::InlineData { mime_type, data } => json!({
                    "inlineData": {
                        "mimeType": mime_type,
                        "data": base64::engine::general_purpose::STANDARD.encode(data),
                    }
                }),
            })
            .collect();

        let mut generation = json!({
            "temperature": request.generation.temperature,
            "maxOutputTokens": request.generation.max_output_tokens,
        });
        if let Some(top_k) = request.generation.top_k {
            generation["topK"] = json!(top_k);
        }
        if let Some(top_p) = request.generation.top_p {
            generation["topP"] = json!(top_p);
        }

        let mut body = json!({
            "contents": [{ "parts": parts }],
            "generationConfig": generation,
        });
        if !request.safety.is_empty() {
            body["safetySettings"] = json!(request
                .safety
                .iter()
                .map(|s| json!({ "category": s.category, "threshold": s.threshold }))
                .collect::<Vec<_>>());
        }
        body
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let url = format!("{}/models/{}:generateContent", self.base_url, request.model);
        tracing::debug!(model = %request.model, parts = request.parts.len(), "Calling Gemini");

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, self.api_key.as_str())
            .json(&Self::request_body(request))
            .send()
            .await
            .map_err(|e| Error::Http(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Upstream(format!(
                "Gemini API error: {} {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let result: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| {
                Error::Upstream(format!("Failed to parse Gemini response: {}", e.without_url()))
            })?;

        result
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| Error::Upstream("No content generated by Gemini API".to_string()))
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

// =============================================================================
// Gateway
// =============================================================================

/// Inventory-aware chat and image recognition
pub struct AssistantGateway {
    model: Arc<dyn GenerativeModel>,
    settings: Arc<AssistantConfig>,
}

impl AssistantGateway {
    pub fn new(model: Arc<dyn GenerativeModel>, settings: Arc<AssistantConfig>) -> Self {
        Self { model, settings }
    }

    /// Build a Gemini-backed gateway, or `None` when no API key is set
    pub fn from_config(config: &AssistantConfig) -> Result<Option<Self>> {
        let Some(api_key) = config.resolve_api_key() else {
            tracing::warn!(
                env = %config.api_key_ref,
                "No API key found; assistant endpoints will return 503"
            );
            return Ok(None);
        };

        let client = GeminiClient::new(config, api_key)?;
        Ok(Some(Self::new(Arc::new(client), Arc::new(config.clone()))))
    }

    pub fn settings(&self) -> &AssistantConfig {
        &self.settings
    }

    /// Answer a chat message against an inventory snapshot.
    ///
    /// Never fails: upstream and parse problems yield a degraded response
    /// built from the inventory.
    pub async fn ask(
        &self,
        message: &str,
        items: &[FoodItem],
        thresholds: &ExpiryThresholds,
    ) -> ChatResponse {
        let analysis = InventoryAnalysis::new(items, thresholds);
        let prompt = build_chat_prompt(message, items, &analysis, thresholds);

        let request = GenerationRequest {
            model: self.settings.chat_model.clone(),
            parts: vec![ContentPart::Text(prompt)],
            generation: self.settings.chat.clone(),
            safety: self.settings.safety_settings.clone(),
        };

        match self.model.generate(&request).await {
            Ok(text) => parse_chat_reply(&text, &analysis),
            Err(e) => {
                tracing::warn!(error = %e, model = self.model.name(), "Chat generation failed");
                fallback_response(UNREACHABLE_REPLY, &analysis)
            }
        }
    }

    /// Identify the food in an image
    pub async fn recognize(&self, image: Vec<u8>, mime_type: &str) -> Result<Detection> {
        let request = GenerationRequest {
            model: self.settings.vision_model.clone(),
            parts: vec![
                ContentPart::Text(DETECTION_PROMPT.to_string()),
                ContentPart::InlineData {
                    mime_type: mime_type.to_string(),
                    data: image,
                },
            ],
            generation: self.settings.vision.clone(),
            safety: Vec::new(),
        };

        let text = self.model.generate(&request).await?;
        parse_detection(&text, self.model.name())
    }
}
