//! Draw operations produced by the chart geometry engines.
//!
//! Coordinates are in inches from the top-left corner of the slide. A slide
//! turns each operation into an ordinary text box or shape.

use crate::common::RGBColor;

/// Position and size of a primitive, in inches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Frame {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }
}

/// Horizontal text alignment inside a primitive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// A positioned primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// A text block, optionally on a filled background
    Text {
        frame: Frame,
        text: String,
        color: RGBColor,
        fill: Option<RGBColor>,
        font_size: f64,
        align: TextAlign,
    },
    /// A filled rectangle
    Rect {
        frame: Frame,
        fill: RGBColor,
        line: Option<RGBColor>,
    },
    /// A straight line from the frame origin to its far corner
    Line { frame: Frame, color: RGBColor },
}

impl DrawOp {
    pub fn frame(&self) -> &Frame {
        match self {
            Self::Text { frame, .. } | Self::Rect { frame, .. } | Self::Line { frame, .. } => frame,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text { .. })
    }

    pub fn is_rect(&self) -> bool {
        matches!(self, Self::Rect { .. })
    }

    pub fn is_line(&self) -> bool {
        matches!(self, Self::Line { .. })
    }
}
