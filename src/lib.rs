//! slidekit - A Rust library for authoring PowerPoint presentations
//!
//! This library builds an in-memory presentation (slides, layouts, sections
//! and the objects placed on them) and serializes it to an Office Open XML
//! package (.pptx).
//!
//! # Features
//!
//! - **Object model**: Text, shapes, images, tables and charts positioned in
//!   inches, points or percentages of the page
//! - **Layouts**: Built-in page presets plus custom page sizes
//! - **Slide masters**: Named slide layouts with backgrounds, objects and
//!   slide numbers
//! - **Synthesized charts**: Funnel and waterfall charts drawn as shapes
//! - **Native charts**: DrawingML charts with an embedded data workbook
//! - **Async export**: Media is resolved with `tokio`; the package goes to a
//!   buffer or a file
//!
//! # Example - Building a deck
//!
//! ```no_run
//! use slidekit::{ExportOptions, Presentation, TextProps};
//! use slidekit::ooxml::charts::FunnelStep;
//! use slidekit::ooxml::pptx::Chart;
//!
//! # async fn run() -> slidekit::Result<()> {
//! let mut pres = Presentation::new();
//! pres.properties_mut().title = "Quarterly Review".to_string();
//!
//! let slide = pres.add_slide(Default::default());
//! slide.add_text("Pipeline", TextProps::default());
//! slide.add_chart(Chart::Funnel {
//!     steps: vec![FunnelStep::new("Leads", 100.0), FunnelStep::new("Won", 12.0)],
//!     options: Default::default(),
//! })?;
//!
//! pres.export(&ExportOptions::file("review")).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Loading a deck configuration
//!
//! ```no_run
//! use slidekit::{DeckConfig, Presentation};
//!
//! # fn main() -> slidekit::Result<()> {
//! let config = DeckConfig::from_yaml_str("active_layout: LAYOUT_4x3\n")?;
//! let pres = Presentation::from_config(&config)?;
//! assert_eq!(pres.page().name, "screen4x3");
//! # Ok(())
//! # }
//! ```

/// Shared building blocks: errors, units, colors, XML helpers and
/// configuration
pub mod common;

/// OOXML package writing: the OPC layer, charts and presentations
pub mod ooxml;

// Re-export commonly used types for convenience
pub use common::{ConfigurationError, DeckConfig, Error, ExportOptions, Length, OutputTarget, PresentationProperties, RGBColor, Result, ThemeProps};
pub use ooxml::pptx::{
    AddSlideOptions, Chart, ExportOutput, ImageProps, LayoutRegistry, LayoutSpec, MediaSource,
    Position, Presentation, ShapeKind, ShapeProps, Slide, SlideMasterProps, TableProps, TextProps,
};
