//! Common types and utilities shared by the object model, the chart
//! geometry engines and the package writers.

// Submodule declarations
pub mod color;
pub mod config;
pub mod error;
pub mod id;
pub mod unit;
pub mod xml;

// Re-exports for convenience
pub use color::RGBColor;
pub use config::{DeckConfig, ExportOptions, OutputTarget, PresentationProperties, ThemeProps};
pub use error::{ConfigurationError, Error, Result};
pub use unit::Length;
