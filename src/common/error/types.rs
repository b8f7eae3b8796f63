//! Unified error types for slidekit.
//!
//! Configuration mistakes are reported synchronously by the call that made
//! them; media, chart and archive failures only surface from export.
use thiserror::Error;

/// Main error type for slidekit operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid caller-supplied configuration
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// A media source could not be turned into bytes
    #[error("Failed to resolve media '{location}': {reason}")]
    MediaResolution { location: String, reason: String },

    /// Native chart encoding failed
    #[error("Chart encoding error: {0}")]
    ChartEncoding(String),

    /// Chart data cannot be laid out
    #[error("Invalid chart data: {0}")]
    InvalidChartData(String),

    /// XML generation error
    #[error("XML error: {0}")]
    Xml(String),

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    Zip(String),

    /// Deck configuration could not be parsed
    #[error("Config error: {0}")]
    Config(String),
}

/// Problems with the values a caller handed to the object model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("unknown layout '{0}'")]
    UnknownLayout(String),

    #[error("layout name must not be empty")]
    EmptyLayoutName,

    #[error("layout '{name}' is already registered")]
    DuplicateLayout { name: String },

    #[error("layout '{name}' has invalid {axis} {value}")]
    InvalidDimension {
        name: String,
        axis: &'static str,
        value: f64,
    },

    #[error("slide master requires a title")]
    MissingMasterTitle,

    #[error("invalid length '{0}'")]
    InvalidLength(String),

    #[error("invalid color '{0}'")]
    InvalidColor(String),

    #[error("{what} index {index} out of range (len {len})")]
    OutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },

    #[error("slide {0} does not exist")]
    UnknownSlide(u32),

    #[error("table has no rows")]
    EmptyTable,
}

/// Result type for slidekit operations.
pub type Result<T> = std::result::Result<T, Error>;
