//! Chart support for presentations.
//!
//! Two families live here:
//!
//! - Synthesized charts ([`funnel`], [`waterfall`]) are pure layout
//!   functions turning chart data into positioned [`DrawOp`]s. The slide
//!   records them as ordinary text and shape objects.
//! - Native charts ([`native`]) are written as DrawingML chart parts with an
//!   embedded data workbook.
//!
//! # Example
//!
//! ```rust
//! use slidekit::ooxml::charts::funnel::{layout_funnel, FunnelOptions, FunnelStep};
//! use slidekit::ooxml::charts::palette::RandomPalette;
//!
//! let steps = vec![FunnelStep::new("Visits", 100.0), FunnelStep::new("Signups", 40.0)];
//! let mut palette = RandomPalette::seeded(7);
//! let ops = layout_funnel(&steps, &FunnelOptions::default(), &mut palette);
//! assert_eq!(ops.len(), 2);
//! ```

pub mod excel_embed;
pub mod funnel;
pub mod native;
pub mod palette;
pub mod primitive;
pub mod waterfall;
pub mod writer;

pub use funnel::{FunnelAlign, FunnelOptions, FunnelPosition, FunnelStep, ValueKind, layout_funnel};
pub use native::{
    ChartSeries, DrawingChartEncoder, EncodedChart, NativeChart, NativeChartEncoder,
    NativeChartKind, NativeChartOptions,
};
pub use palette::{FixedPalette, PaletteGenerator, RandomPalette, SharedPalette};
pub use primitive::{DrawOp, Frame, TextAlign};
pub use waterfall::{ConnectorPass, WaterfallOptions, WaterfallSeries, connector_pass, layout_waterfall};
