//! Assistant module - generative-model chat and image recognition
//!
//! Builds prompts from the current inventory, sends them to a
//! [`GenerativeModel`] and turns whatever comes back into a well-formed
//! response. Chat never fails because of the model; recognition does.

pub mod gateway;
pub mod handler;
pub mod prompt;
pub mod response;
pub mod types;

pub use gateway::{AssistantGateway, GeminiClient, GenerativeModel};
pub use handler::{assistant_router, AssistantState};
