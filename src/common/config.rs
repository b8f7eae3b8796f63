//! Document properties, export options and YAML deck configuration.
//!
//! Everything a caller can set up front lives here, so nothing in the
//! library has to be inferred from the environment at export time.

use crate::common::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Values written to `docProps/core.xml`, `docProps/app.xml` and
/// `ppt/presentation.xml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PresentationProperties {
    pub author: String,
    pub company: String,
    pub revision: u32,
    pub subject: String,
    pub title: String,
    /// Right-to-left text direction for the whole deck
    pub rtl_mode: bool,
    /// Creation timestamp; the export time is used when absent
    pub created: Option<DateTime<Utc>>,
    pub theme: ThemeProps,
}

impl Default for PresentationProperties {
    fn default() -> Self {
        Self {
            author: "slidekit".to_string(),
            company: "slidekit".to_string(),
            revision: 1,
            subject: "slidekit Presentation".to_string(),
            title: "slidekit Presentation".to_string(),
            rtl_mode: false,
            created: None,
            theme: ThemeProps::default(),
        }
    }
}

/// Theme font faces.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ThemeProps {
    pub head_font_face: String,
    pub body_font_face: String,
}

impl Default for ThemeProps {
    fn default() -> Self {
        Self {
            head_font_face: "Arial".to_string(),
            body_font_face: "Arial".to_string(),
        }
    }
}

/// Where the finished package goes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputTarget {
    /// Return the bytes to the caller
    #[default]
    Buffer,
    /// Write to this path (`.pptx` is appended when missing)
    File(PathBuf),
}

/// Options for a single export run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Deflate archive entries instead of storing them
    pub compression: bool,
    pub output: OutputTarget,
}

impl ExportOptions {
    pub fn buffer() -> Self {
        Self::default()
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            output: OutputTarget::File(path.into()),
            ..Self::default()
        }
    }

    pub fn with_compression(mut self, compression: bool) -> Self {
        self.compression = compression;
        self
    }
}

/// Append `.pptx` to `path` unless it already ends with it.
pub fn normalize_pptx_path(path: &Path) -> PathBuf {
    let has_ext = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("pptx"))
        .unwrap_or(false);
    if has_ext {
        path.to_path_buf()
    } else {
        let mut name = path.as_os_str().to_os_string();
        name.push(".pptx");
        PathBuf::from(name)
    }
}

/// A custom page geometry, in inches.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LayoutDefinition {
    pub name: String,
    pub width: f64,
    pub height: f64,
}

/// Deck-level configuration, usually loaded from YAML.
///
/// ```yaml
/// properties:
///   author: Finance
///   title: Q3 Review
/// layouts:
///   - { name: A4, width: 8.27, height: 11.69 }
/// active_layout: A4
/// export:
///   compression: true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DeckConfig {
    pub properties: PresentationProperties,
    pub layouts: Vec<LayoutDefinition>,
    pub active_layout: Option<String>,
    pub export: ExportOptions,
}

impl DeckConfig {
    /// Parse a deck configuration from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_saphyr::from_str(yaml).map_err(|e| Error::Config(e.to_string()))
    }

    /// Read and parse a YAML deck configuration file.
    pub async fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = tokio::fs::read_to_string(path).await?;
        Self::from_yaml_str(&text)
    }
}
