pub mod config;
pub mod error;

// Search API access
pub mod github;

// Pagination, shaping and deduplication
pub mod harvest;

// Tabular output
pub mod sink;

pub mod cli;

// Re-exports
pub use config::Settings;
pub use error::{Error, Result};
