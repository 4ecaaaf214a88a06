//! Larder - Food inventory backend with expiry tracking and an AI assistant
//!
//! Larder records food items grouped into categories, derives each item's
//! expiry status on the server, and answers questions about the inventory
//! through an external generative model.
//!
//! ## Architecture
//!
//! ```text
//!   client ──► Validator ──► InventoryStore (SQLite) ──► StatusClassifier ──► JSON
//!      │
//!      └────► AssistantGateway ──► GenerativeModel (Gemini) ──► tolerant parse ──► JSON
//! ```
//!
//! ## Modules
//!
//! - [`expiry`]: Day counts, status labels and urgency buckets
//! - [`validation`]: Batched payload validation
//! - [`inventory`]: Category and food item persistence and endpoints
//! - [`assistant`]: Chat and image recognition over a generative model
//! - [`dashboard`]: Overview and rule-based suggestions
//! - [`api`]: Router assembly and HTTP error mapping
//! - [`config`]: Configuration management

pub mod api;
pub mod assistant;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod expiry;
pub mod inventory;
pub mod seed;
pub mod validation;

pub use config::LarderConfig;
pub use error::{Error, Result};
