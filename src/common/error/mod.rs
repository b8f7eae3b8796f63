//! Unified error types for slidekit.

// Submodule declarations
pub mod conversions;
pub mod types;

// Re-exports
pub use types::{ConfigurationError, Error, Result};
