//! Waterfall chart geometry.
//!
//! The chart is anchored at (0.5, 0.5) inches. Y-axis ticks are spaced
//! 0.4 inches apart; categories are spaced 2 inches apart starting at x = 2.
//! Each bar spans the change from the running total to its value, and thin
//! connector lines join neighbouring bar tops.

use crate::common::RGBColor;
use crate::common::error::{Error, Result};
use crate::ooxml::charts::primitive::{DrawOp, Frame, TextAlign};

const ORIGIN: f64 = 0.5;
const TICK_SPACING: f64 = 0.4;
const AXIS_X: f64 = 1.5;
const AXIS_TOP: f64 = 0.3;
const AXIS_THICKNESS: f64 = 0.02;
const FIRST_CATEGORY_X: f64 = 2.0;
const CATEGORY_SPACING: f64 = 2.0;
const BAR_WIDTH: f64 = 1.0;
const LABEL_WIDTH: f64 = 1.0;
const LABEL_HEIGHT: f64 = 0.3;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WaterfallSeries {
    /// Y-axis tick values, in any order
    pub y_ticks: Vec<f64>,
    /// One label per bar
    pub x_labels: Vec<String>,
    /// Target running total after each bar
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WaterfallOptions {
    /// Bar fill
    pub color: RGBColor,
    pub font_size: f64,
}

impl Default for WaterfallOptions {
    fn default() -> Self {
        Self {
            color: RGBColor::BLACK,
            font_size: 12.0,
        }
    }
}

/// Placement of the connector lines between bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectorPass {
    /// Each connector follows the bar it starts from
    Interleaved,
    /// All connectors are drawn after the last bar
    Trailing,
    None,
}

/// Pick the connector pass from the trend between the second and third
/// values.
pub fn connector_pass(values: &[f64]) -> ConnectorPass {
    if values.len() < 3 {
        return ConnectorPass::None;
    }
    let trend = values[1] - values[2];
    if trend < 0.0 {
        ConnectorPass::Interleaved
    } else if trend > 0.0 {
        ConnectorPass::Trailing
    } else {
        ConnectorPass::None
    }
}

/// Vertical scale derived from the Y ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct WaterfallScale {
    /// Ticks sorted descending
    pub ticks: Vec<f64>,
    /// Value units per inch
    pub tick_unit: f64,
    /// Y of the zero line, in inches
    pub zero_line_y: f64,
}

impl WaterfallScale {
    /// Build the scale, rejecting tick sets that cannot define one.
    pub fn from_ticks(ticks: &[f64]) -> Result<Self> {
        if ticks.len() < 2 {
            return Err(Error::InvalidChartData(format!(
                "waterfall needs at least 2 y ticks, got {}",
                ticks.len()
            )));
        }
        if ticks.iter().any(|t| !t.is_finite()) {
            return Err(Error::InvalidChartData(
                "waterfall y ticks must be finite".to_string(),
            ));
        }

        let mut sorted = ticks.to_vec();
        sorted.sort_by(|a, b| b.total_cmp(a));

        let step = sorted[0] - sorted[1];
        if step == 0.0 {
            return Err(Error::InvalidChartData(format!(
                "waterfall top ticks are equal ({})",
                sorted[0]
            )));
        }

        let max = sorted[0];
        let min = sorted[sorted.len() - 1];
        let tick_unit = step / TICK_SPACING;
        let zero_line_y =
            ORIGIN + (max / (max - min)) * (sorted.len() - 1) as f64 * TICK_SPACING;

        Ok(Self {
            ticks: sorted,
            tick_unit,
            zero_line_y,
        })
    }
}

/// Geometry of one bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaterfallBar {
    pub x: f64,
    /// Top edge, in inches
    pub y: f64,
    pub height: f64,
    pub delta: f64,
    /// Running total after this bar
    pub cumulative: f64,
}

/// Compute the bars for `series` on `scale`.
pub fn layout_bars(series: &WaterfallSeries, scale: &WaterfallScale) -> Vec<WaterfallBar> {
    let mut cumulative = 0.0;
    series
        .values
        .iter()
        .enumerate()
        .map(|(i, value)| {
            let delta = value - cumulative;
            let height = delta.abs() / scale.tick_unit;
            let base = scale.zero_line_y - cumulative / scale.tick_unit;
            let y = if delta >= 0.0 { base - height } else { base };
            cumulative += delta;
            WaterfallBar {
                x: category_x(i),
                y,
                height,
                delta,
                cumulative,
            }
        })
        .collect()
}

/// Lay out a waterfall chart: Y ruler, X ruler, bars and connectors.
pub fn layout_waterfall(series: &WaterfallSeries, options: &WaterfallOptions) -> Result<Vec<DrawOp>> {
    let scale = WaterfallScale::from_ticks(&series.y_ticks)?;
    if series.values.iter().any(|v| !v.is_finite()) {
        return Err(Error::InvalidChartData(
            "waterfall values must be finite".to_string(),
        ));
    }
    if series.values.len() > series.x_labels.len() {
        return Err(Error::InvalidChartData(format!(
            "{} waterfall values but only {} x labels",
            series.values.len(),
            series.x_labels.len()
        )));
    }

    let mut ops = Vec::new();
    push_y_ruler(&mut ops, &scale, options);
    push_x_ruler(&mut ops, &series.x_labels, &scale, options);

    let bars = layout_bars(series, &scale);
    let pass = connector_pass(&series.values);
    for (i, bar) in bars.iter().enumerate() {
        ops.push(DrawOp::Rect {
            frame: Frame::new(bar.x, bar.y, BAR_WIDTH, bar.height),
            fill: options.color,
            line: Some(RGBColor::BLACK),
        });
        if pass == ConnectorPass::Interleaved
            && let Some(next) = bars.get(i + 1)
        {
            ops.push(connector(bar, next));
        }
    }
    if pass == ConnectorPass::Trailing {
        for pair in bars.windows(2) {
            ops.push(connector(&pair[0], &pair[1]));
        }
    }

    log::trace!(bars = bars.len(), ops = ops.len(); "Laid out waterfall");
    Ok(ops)
}

fn category_x(index: usize) -> f64 {
    FIRST_CATEGORY_X + CATEGORY_SPACING * index as f64
}

fn connector(from: &WaterfallBar, to: &WaterfallBar) -> DrawOp {
    DrawOp::Line {
        frame: Frame::new(from.x + BAR_WIDTH, from.y, to.x - from.x - BAR_WIDTH, 0.0),
        color: RGBColor::BLACK,
    }
}

fn push_y_ruler(ops: &mut Vec<DrawOp>, scale: &WaterfallScale, options: &WaterfallOptions) {
    for (i, tick) in scale.ticks.iter().enumerate() {
        ops.push(DrawOp::Text {
            frame: Frame::new(ORIGIN, ORIGIN + TICK_SPACING * i as f64, LABEL_WIDTH, LABEL_HEIGHT),
            text: format!("{}", tick),
            color: RGBColor::BLACK,
            fill: None,
            font_size: options.font_size,
            align: TextAlign::Left,
        });
    }
    let last_label_y = ORIGIN + TICK_SPACING * (scale.ticks.len() - 1) as f64;
    ops.push(DrawOp::Rect {
        frame: Frame::new(AXIS_X, AXIS_TOP, AXIS_THICKNESS, last_label_y),
        fill: RGBColor::BLACK,
        line: None,
    });
}

fn push_x_ruler(
    ops: &mut Vec<DrawOp>,
    labels: &[String],
    scale: &WaterfallScale,
    options: &WaterfallOptions,
) {
    let axis_y = scale.zero_line_y + AXIS_TOP;
    for (i, label) in labels.iter().enumerate() {
        ops.push(DrawOp::Text {
            frame: Frame::new(category_x(i), axis_y + ORIGIN, LABEL_WIDTH, LABEL_HEIGHT),
            text: label.clone(),
            color: RGBColor::BLACK,
            fill: None,
            font_size: options.font_size,
            align: TextAlign::Left,
        });
    }
    if let Some(last) = labels.len().checked_sub(1) {
        ops.push(DrawOp::Rect {
            frame: Frame::new(AXIS_X, axis_y, category_x(last) - ORIGIN, AXIS_THICKNESS),
            fill: RGBColor::BLACK,
            line: None,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    fn series(values: &[f64]) -> WaterfallSeries {
        WaterfallSeries {
            y_ticks: (0..=10).map(|i| i as f64 * 10.0).collect(),
            x_labels: (1..=values.len()).map(|i| i.to_string()).collect(),
            values: values.to_vec(),
        }
    }

    #[test]
    fn test_scale_from_ticks() {
        let scale = WaterfallScale::from_ticks(&series(&[]).y_ticks).unwrap();
        assert_approx_eq!(f64, scale.tick_unit, 25.0, epsilon = 1e-9);
        assert_eq!(scale.ticks[0], 100.0);
        // max / (max - min) = 1, ten tick gaps of 0.4
        assert_approx_eq!(f64, scale.zero_line_y, 4.5, epsilon = 1e-9);
    }

    #[test]
    fn test_first_bar_scenario() {
        let input = series(&[55.0, 80.0, 90.0]);
        let scale = WaterfallScale::from_ticks(&input.y_ticks).unwrap();
        let bars = layout_bars(&input, &scale);

        assert_approx_eq!(f64, bars[0].delta, 55.0);
        assert_approx_eq!(f64, bars[0].height, 2.2, epsilon = 1e-9);
        assert_approx_eq!(f64, bars[0].cumulative, 55.0);
        assert_approx_eq!(f64, bars[0].y, 4.5 - 2.2, epsilon = 1e-9);
        assert_approx_eq!(f64, bars[1].height, 1.0, epsilon = 1e-9);
        assert_approx_eq!(f64, bars[1].y, 4.5 - 2.2 - 1.0, epsilon = 1e-9);
        assert_approx_eq!(f64, bars[2].x, 6.0);
    }

    #[test]
    fn test_negative_delta_hangs_from_running_total() {
        let input = series(&[80.0, 50.0]);
        let scale = WaterfallScale::from_ticks(&input.y_ticks).unwrap();
        let bars = layout_bars(&input, &scale);
        assert_approx_eq!(f64, bars[1].delta, -30.0);
        assert_approx_eq!(f64, bars[1].y, 4.5 - 80.0 / 25.0, epsilon = 1e-9);
        assert_approx_eq!(f64, bars[1].height, 1.2, epsilon = 1e-9);
    }

    #[test]
    fn test_connector_policy() {
        assert_eq!(connector_pass(&[55.0, 80.0, 90.0]), ConnectorPass::Interleaved);
        assert_eq!(connector_pass(&[55.0, 90.0, 80.0]), ConnectorPass::Trailing);
        assert_eq!(connector_pass(&[55.0, 80.0, 80.0]), ConnectorPass::None);
        assert_eq!(connector_pass(&[55.0, 80.0]), ConnectorPass::None);
        assert_eq!(connector_pass(&[]), ConnectorPass::None);
    }

    #[test]
    fn test_interleaved_and_trailing_share_bar_tops() {
        let rising = layout_waterfall(&series(&[55.0, 80.0, 90.0]), &WaterfallOptions::default())
            .unwrap();
        let falling = layout_waterfall(&series(&[55.0, 90.0, 80.0]), &WaterfallOptions::default())
            .unwrap();

        let lines = |ops: &[DrawOp]| -> Vec<Frame> {
            ops.iter().filter(|op| op.is_line()).map(|op| *op.frame()).collect()
        };
        let rising_lines = lines(&rising);
        let falling_lines = lines(&falling);
        assert_eq!(rising_lines.len(), 2);
        assert_eq!(falling_lines.len(), 2);

        // Both passes anchor the first connector at the top of bar one.
        for frames in [&rising_lines, &falling_lines] {
            assert_approx_eq!(f64, frames[0].x, 3.0);
            assert_approx_eq!(f64, frames[0].y, 4.5 - 2.2, epsilon = 1e-9);
            assert_approx_eq!(f64, frames[0].w, 1.0);
            assert_approx_eq!(f64, frames[0].h, 0.0);
        }

        // Interleaved: bar, line, bar, line, bar. Trailing: bar, bar, bar, line, line.
        let tail: Vec<bool> = rising.iter().rev().take(5).map(DrawOp::is_line).collect();
        assert_eq!(tail, [false, true, false, true, false]);
        let tail: Vec<bool> = falling.iter().rev().take(5).map(DrawOp::is_line).collect();
        assert_eq!(tail, [true, true, false, false, false]);
    }

    #[test]
    fn test_rulers() {
        let ops = layout_waterfall(&series(&[55.0, 80.0, 90.0]), &WaterfallOptions::default())
            .unwrap();
        // 11 tick labels, y axis, 3 x labels, x axis, 3 bars, 2 connectors
        assert_eq!(ops.len(), 11 + 1 + 3 + 1 + 3 + 2);

        match &ops[0] {
            DrawOp::Text { frame, text, .. } => {
                assert_eq!(text, "100");
                assert_approx_eq!(f64, frame.x, 0.5);
                assert_approx_eq!(f64, frame.y, 0.5);
            },
            other => panic!("unexpected op {:?}", other),
        }
        let y_axis = ops[11].frame();
        assert_approx_eq!(f64, y_axis.x, 1.5);
        assert_approx_eq!(f64, y_axis.y, 0.3);
        assert_approx_eq!(f64, y_axis.w, 0.02);
        assert_approx_eq!(f64, y_axis.h, 4.5, epsilon = 1e-9);

        let x_label = ops[12].frame();
        assert_approx_eq!(f64, x_label.x, 2.0);
        assert_approx_eq!(f64, x_label.y, 4.5 + 0.8, epsilon = 1e-9);

        let x_axis = ops[15].frame();
        assert_approx_eq!(f64, x_axis.y, 4.8, epsilon = 1e-9);
        assert_approx_eq!(f64, x_axis.w, 6.0 - 0.5);
        assert_approx_eq!(f64, x_axis.h, 0.02);
    }

    #[test]
    fn test_invalid_ticks() {
        let mut input = series(&[1.0]);
        input.y_ticks = vec![10.0];
        assert!(matches!(
            layout_waterfall(&input, &WaterfallOptions::default()),
            Err(Error::InvalidChartData(_))
        ));

        input.y_ticks = vec![50.0, 50.0, 0.0];
        assert!(matches!(
            layout_waterfall(&input, &WaterfallOptions::default()),
            Err(Error::InvalidChartData(_))
        ));

        input.y_ticks = vec![f64::NAN, 0.0];
        assert!(layout_waterfall(&input, &WaterfallOptions::default()).is_err());
    }

    #[test]
    fn test_values_need_labels() {
        let mut input = series(&[1.0, 2.0]);
        input.x_labels.pop();
        assert!(matches!(
            layout_waterfall(&input, &WaterfallOptions::default()),
            Err(Error::InvalidChartData(_))
        ));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_cumulative_tracks_values(values in prop::collection::vec(-100f64..100.0, 1..12)) {
                let input = series(&values);
                let scale = WaterfallScale::from_ticks(&input.y_ticks).unwrap();
                let bars = layout_bars(&input, &scale);
                prop_assert_eq!(bars.len(), values.len());
                for (bar, value) in bars.iter().zip(&values) {
                    prop_assert!((bar.cumulative - value).abs() < 1e-9);
                    prop_assert!(bar.height >= 0.0);
                }
            }

            #[test]
            fn prop_connectors_never_exceed_gaps(values in prop::collection::vec(0f64..100.0, 0..12)) {
                let ops = layout_waterfall(&series(&values), &WaterfallOptions::default()).unwrap();
                let lines = ops.iter().filter(|op| op.is_line()).count();
                prop_assert!(lines <= values.len().saturating_sub(1));
                prop_assert_eq!(ops.iter().filter(|op| op.is_rect()).count(), values.len() + 2 - usize::from(values.is_empty()));
            }
        }
    }
}
