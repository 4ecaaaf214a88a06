//! Larder configuration management

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use crate::expiry::ExpiryThresholds;

/// Main Larder configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LarderConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Expiry thresholds (single source for every bucketing decision)
    #[serde(default)]
    pub expiry: ExpiryThresholds,

    /// Validation pattern and length table
    #[serde(default)]
    pub validation: ValidationRules,

    /// Generative model configuration
    #[serde(default)]
    pub assistant: AssistantConfig,
}

impl LarderConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that parse but cannot work
    pub fn validate(&self) -> Result<()> {
        self.expiry
            .check()
            .map_err(|e| Error::Config(format!("Invalid [expiry] section: {}", e)))
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Allowed CORS origins (empty = any)
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            cors_origins: Vec::new(),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// SQLite database file
    pub database_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let base = dirs_next::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("larder");

        Self {
            database_path: base.join("larder.db"),
        }
    }
}

/// Length and character-class rule for a free-text field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextRule {
    pub min_length: usize,
    pub max_length: usize,
    pub pattern: String,
}

/// Validation pattern and length table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationRules {
    pub item_name: TextRule,
    pub category_name: TextRule,
    pub notes: TextRule,
    pub chat_message_max_length: usize,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            item_name: TextRule {
                min_length: 2,
                max_length: 20,
                pattern: r"^[a-zA-Z0-9\s\-()&]+$".to_string(),
            },
            category_name: TextRule {
                min_length: 2,
                max_length: 20,
                pattern: r"^[a-zA-Z\s\-]+$".to_string(),
            },
            notes: TextRule {
                min_length: 0,
                max_length: 100,
                pattern: r"^[a-zA-Z0-9\s\-\(\)&.,!?]+$".to_string(),
            },
            chat_message_max_length: 1000,
        }
    }
}

/// Sampling parameters for one kind of model call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSettings {
    pub temperature: f32,
    #[serde(default)]
    pub top_k: Option<u32>,
    #[serde(default)]
    pub top_p: Option<f32>,
    pub max_output_tokens: u32,
}

/// Content safety threshold for one harm category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetySetting {
    pub category: String,
    pub threshold: String,
}

/// Generative model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Environment variable holding the API key
    pub api_key_ref: String,

    /// API base URL
    pub base_url: String,

    /// Model used for chat
    pub chat_model: String,

    /// Model used for image recognition
    pub vision_model: String,

    /// Chat sampling parameters
    pub chat: GenerationSettings,

    /// Image recognition sampling parameters
    pub vision: GenerationSettings,

    /// Safety settings sent with chat requests
    pub safety_settings: Vec<SafetySetting>,

    /// Outbound request timeout in seconds
    pub request_timeout_secs: u64,

    /// Largest accepted image upload
    pub max_image_bytes: usize,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        let safety_settings = [
            "HARM_CATEGORY_HARASSMENT",
            "HARM_CATEGORY_HATE_SPEECH",
            "HARM_CATEGORY_SEXUALLY_EXPLICIT",
            "HARM_CATEGORY_DANGEROUS_CONTENT",
        ]
        .iter()
        .map(|category| SafetySetting {
            category: category.to_string(),
            threshold: "BLOCK_MEDIUM_AND_ABOVE".to_string(),
        })
        .collect();

        Self {
            api_key_ref: "GEMINI_API_KEY".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            chat_model: "gemini-2.0-flash-exp".to_string(),
            vision_model: "gemini-2.5-flash".to_string(),
            chat: GenerationSettings {
                temperature: 0.3,
                top_k: Some(20),
                top_p: Some(0.8),
                max_output_tokens: 1024,
            },
            vision: GenerationSettings {
                temperature: 0.0,
                top_k: None,
                top_p: None,
                max_output_tokens: 512,
            },
            safety_settings,
            request_timeout_secs: 30,
            max_image_bytes: 10 * 1024 * 1024,
        }
    }
}

impl AssistantConfig {
    /// Resolve the API key from the environment.
    ///
    /// Tries the exact variable name first, then its upper-case form.
    pub fn resolve_api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_ref)
            .or_else(|_| std::env::var(self.api_key_ref.to_uppercase()))
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}
