//! HTTP request handlers organized by domain

pub mod analyze;
pub mod export;
pub mod history;
pub mod ollama;

// Re-export all handlers for use in router
pub use analyze::*;
pub use export::*;
pub use history::*;
pub use ollama::*;
