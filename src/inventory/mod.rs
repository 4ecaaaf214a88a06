//! Inventory module - categories and food items
//!
//! Persists categories and items in SQLite, enforces the rule that a category
//! owning items cannot simply disappear, and serves the CRUD endpoints.

pub mod handler;
pub mod schema;
pub mod store;
pub mod types;

pub use handler::{inventory_router, InventoryState};
pub use store::InventoryStore;
