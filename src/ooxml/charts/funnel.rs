//! Funnel chart geometry.
//!
//! A funnel is drawn as a row of unit-wide text blocks, one per step, whose
//! heights shrink (or grow, for a right-positioned funnel) by a fixed amount
//! per step. The slide is treated as 10 inches wide when centering.

use crate::common::RGBColor;
use crate::ooxml::charts::palette::PaletteGenerator;
use crate::ooxml::charts::primitive::{DrawOp, Frame, TextAlign};

const SLIDE_WIDTH: f64 = 10.0;
const STEP_WIDTH: f64 = 1.0;
const HEIGHT_STEP: f64 = 0.3;
const Y_STEP: f64 = 0.2;
const ALIGN_NUDGE: f64 = 0.5;

/// How a step value is labelled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValueKind {
    #[default]
    Number,
    Percent,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunnelStep {
    pub name: String,
    pub value: f64,
    pub kind: ValueKind,
}

impl FunnelStep {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
            kind: ValueKind::Number,
        }
    }

    pub fn percent(name: impl Into<String>, value: f64) -> Self {
        Self {
            kind: ValueKind::Percent,
            ..Self::new(name, value)
        }
    }

    fn label(&self) -> String {
        match self.kind {
            ValueKind::Number => format!("{}", self.value),
            ValueKind::Percent => format!("{}%", self.value),
        }
    }
}

/// Horizontal placement of the whole funnel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FunnelAlign {
    Left,
    #[default]
    Center,
    Right,
    /// Start at the caller-supplied `x`
    Default,
}

/// Which side the wide end of the funnel sits on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FunnelPosition {
    #[default]
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunnelOptions {
    pub align: FunnelAlign,
    pub position: FunnelPosition,
    /// Start X for [`FunnelAlign::Default`]
    pub x: f64,
    /// Y anchor of the first step
    pub y: f64,
    /// Height of the tallest step
    pub h: f64,
    /// Per-step fills; missing entries are drawn from the palette
    pub colors: Vec<RGBColor>,
    pub text_color: RGBColor,
    pub font_size: f64,
}

impl Default for FunnelOptions {
    fn default() -> Self {
        Self {
            align: FunnelAlign::default(),
            position: FunnelPosition::default(),
            x: 0.5,
            y: 1.5,
            h: 2.0,
            colors: Vec::new(),
            text_color: RGBColor::BLACK,
            font_size: 12.0,
        }
    }
}

/// Lay out a funnel chart.
///
/// Steps are sorted by value (descending, or ascending when the funnel is
/// positioned right) and emitted left to right as filled text blocks.
pub fn layout_funnel(
    steps: &[FunnelStep],
    options: &FunnelOptions,
    palette: &mut dyn PaletteGenerator,
) -> Vec<DrawOp> {
    if steps.is_empty() {
        return Vec::new();
    }

    let right = options.position == FunnelPosition::Right;
    let mut sorted: Vec<&FunnelStep> = steps.iter().collect();
    if right {
        sorted.sort_by(|a, b| a.value.total_cmp(&b.value));
    } else {
        sorted.sort_by(|a, b| b.value.total_cmp(&a.value));
    }

    let count = sorted.len();
    let start_x = start_x(count, options);

    let mut heights: Vec<f64> = (0..count)
        .map(|i| options.h - HEIGHT_STEP * i as f64)
        .collect();
    let (mut y, y_step) = if right {
        heights.reverse();
        (options.y + 1.0, -Y_STEP)
    } else {
        (options.y, Y_STEP)
    };

    let align = match options.align {
        FunnelAlign::Center => TextAlign::Center,
        FunnelAlign::Right => TextAlign::Right,
        FunnelAlign::Left | FunnelAlign::Default => TextAlign::Left,
    };

    let mut ops = Vec::with_capacity(count);
    for (i, (step, height)) in sorted.iter().zip(heights).enumerate() {
        let fill = options
            .colors
            .get(i)
            .copied()
            .unwrap_or_else(|| palette.next_color());
        ops.push(DrawOp::Text {
            frame: Frame::new(start_x + STEP_WIDTH * i as f64, y, STEP_WIDTH, height),
            text: step.label(),
            color: options.text_color,
            fill: Some(fill),
            font_size: options.font_size,
            align,
        });
        y += y_step;
    }
    ops
}

fn start_x(count: usize, options: &FunnelOptions) -> f64 {
    let chart_width = STEP_WIDTH * count as f64;
    let x = match options.align {
        FunnelAlign::Center => (SLIDE_WIDTH - chart_width) / 2.0,
        FunnelAlign::Left => 0.0,
        FunnelAlign::Right => SLIDE_WIDTH - chart_width,
        FunnelAlign::Default => options.x,
    };
    let nudge = match options.align {
        FunnelAlign::Left => ALIGN_NUDGE,
        FunnelAlign::Right => -ALIGN_NUDGE,
        FunnelAlign::Center | FunnelAlign::Default => 0.0,
    };
    x + nudge
}
