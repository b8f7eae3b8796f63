//! Slide object model: positioned text, images, shapes, tables and charts.
//!
//! Option structs hold what the caller asked for. Positions are resolved to
//! EMU against the owning slide's page size when the object is added, and the
//! resolved [`EmuRect`] is what the writers see.

use crate::common::RGBColor;
use crate::common::error::Result;
use crate::common::unit::{EMUS_PER_INCH, Length, inches_to_emu};
use crate::ooxml::charts::primitive::TextAlign;
use crate::ooxml::pptx::layout::LayoutSpec;
use crate::ooxml::pptx::media::MediaSource;

/// A rectangle in EMU.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmuRect {
    pub x: i64,
    pub y: i64,
    pub cx: i64,
    pub cy: i64,
}

impl EmuRect {
    pub const fn new(x: i64, y: i64, cx: i64, cy: i64) -> Self {
        Self { x, y, cx, cy }
    }
}

/// Caller-supplied position and size.
///
/// Missing values default to a frame one inch in from the top-left corner,
/// spanning the page width less two inches, one inch tall.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Position {
    pub x: Option<Length>,
    pub y: Option<Length>,
    pub w: Option<Length>,
    pub h: Option<Length>,
}

impl Position {
    pub fn new(
        x: impl Into<Length>,
        y: impl Into<Length>,
        w: impl Into<Length>,
        h: impl Into<Length>,
    ) -> Self {
        Self {
            x: Some(x.into()),
            y: Some(y.into()),
            w: Some(w.into()),
            h: Some(h.into()),
        }
    }

    /// Parse four length strings such as `"50%"`, `"2in"` or `"72pt"`.
    pub fn parse(x: &str, y: &str, w: &str, h: &str) -> Result<Self> {
        Ok(Self {
            x: Some(x.parse()?),
            y: Some(y.parse()?),
            w: Some(w.parse()?),
            h: Some(h.parse()?),
        })
    }

    /// Resolve against a page. Percent x/w use the page width, percent y/h the
    /// page height. Negative extents clamp to zero.
    pub fn resolve(&self, page: &LayoutSpec) -> EmuRect {
        let default_w = (page.width - 2 * EMUS_PER_INCH).max(EMUS_PER_INCH);
        EmuRect {
            x: self.x.map_or(EMUS_PER_INCH, |l| l.to_emu(page.width)),
            y: self.y.map_or(EMUS_PER_INCH, |l| l.to_emu(page.height)),
            cx: self.w.map_or(default_w, |l| l.to_emu(page.width)).max(0),
            cy: self.h.map_or(EMUS_PER_INCH, |l| l.to_emu(page.height)).max(0),
        }
    }
}

/// Vertical text anchoring inside a frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VerticalAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

impl VerticalAlign {
    pub(crate) fn xml_value(self) -> &'static str {
        match self {
            Self::Top => "t",
            Self::Middle => "ctr",
            Self::Bottom => "b",
        }
    }
}

/// Text insets in inches, `[top, right, bottom, left]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margin(pub [f64; 4]);

impl Margin {
    pub const fn uniform(inches: f64) -> Self {
        Self([inches; 4])
    }

    /// Insets in EMU, in `lIns`, `tIns`, `rIns`, `bIns` order.
    pub(crate) fn insets_emu(&self) -> [i64; 4] {
        let [top, right, bottom, left] = self.0;
        [
            inches_to_emu(left),
            inches_to_emu(top),
            inches_to_emu(right),
            inches_to_emu(bottom),
        ]
    }
}

/// Options for a text box.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextProps {
    pub position: Position,
    pub font_face: Option<String>,
    /// Points
    pub font_size: Option<f64>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub color: Option<RGBColor>,
    pub fill: Option<RGBColor>,
    pub align: TextAlign,
    pub valign: VerticalAlign,
    /// Inner insets; the default body insets apply when unset
    pub margin: Option<Margin>,
}

/// Preset geometries supported for shapes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ShapeKind {
    #[default]
    Rect,
    RoundRect,
    Ellipse,
    Line,
    Triangle,
}

impl ShapeKind {
    /// DrawingML preset geometry name.
    pub fn preset(self) -> &'static str {
        match self {
            Self::Rect => "rect",
            Self::RoundRect => "roundRect",
            Self::Ellipse => "ellipse",
            Self::Line => "line",
            Self::Triangle => "triangle",
        }
    }
}

/// Options for a preset shape.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShapeProps {
    pub position: Position,
    pub fill: Option<RGBColor>,
    pub line: Option<RGBColor>,
    /// Points
    pub line_width: Option<f64>,
    /// Degrees clockwise
    pub rotation: f64,
    /// Optional text drawn inside the shape
    pub text: Option<String>,
    pub text_props: TextProps,
}

/// Options for a picture.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageProps {
    pub position: Position,
    pub source: MediaSource,
    pub alt_text: Option<String>,
}

impl ImageProps {
    pub fn new(source: MediaSource, position: Position) -> Self {
        Self {
            position,
            source,
            alt_text: None,
        }
    }
}

/// Style overrides for a table row or cell.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CellStyle {
    pub bold: Option<bool>,
    pub color: Option<RGBColor>,
    pub fill: Option<RGBColor>,
    pub font_size: Option<f64>,
    pub align: Option<TextAlign>,
}

impl CellStyle {
    /// Overlay `other` on top of `self`.
    pub fn merged(self, other: &CellStyle) -> CellStyle {
        CellStyle {
            bold: other.bold.or(self.bold),
            color: other.color.or(self.color),
            fill: other.fill.or(self.fill),
            font_size: other.font_size.or(self.font_size),
            align: other.align.or(self.align),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableCell {
    pub text: String,
    pub style: CellStyle,
}

impl TableCell {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: CellStyle::default(),
        }
    }

    pub fn with_style(mut self, style: CellStyle) -> Self {
        self.style = style;
        self
    }
}

impl From<&str> for TableCell {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for TableCell {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

pub type TableRow = Vec<TableCell>;

/// Options for a table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableProps {
    pub position: Position,
    /// Column widths in inches; the frame width is split evenly when empty
    pub col_widths: Vec<f64>,
    /// Row height in inches
    pub row_height: Option<f64>,
    pub font_face: Option<String>,
    pub font_size: Option<f64>,
    pub color: Option<RGBColor>,
    pub fill: Option<RGBColor>,
    pub border_color: Option<RGBColor>,
    /// Repeat the first row on every page when the table is split
    pub repeat_header: bool,
    /// Upper bound of rows per slide when paging (header included)
    pub rows_per_slide: Option<usize>,
}

pub(crate) const DEFAULT_ROW_HEIGHT_IN: f64 = 0.4;

impl TableProps {
    pub(crate) fn row_height_emu(&self) -> i64 {
        inches_to_emu(self.row_height.unwrap_or(DEFAULT_ROW_HEIGHT_IN))
    }
}

/// A resolved table ready for writing.
#[derive(Debug, Clone, PartialEq)]
pub struct TableObject {
    pub rows: Vec<TableRow>,
    pub props: TableProps,
    /// Per-row styles, applied beneath per-cell styles
    pub row_styles: Vec<CellStyle>,
    pub frame: EmuRect,
}

impl TableObject {
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Column widths in EMU, summing to the frame width when not given.
    pub fn column_widths(&self) -> Vec<i64> {
        let cols = self.column_count();
        if cols == 0 {
            return Vec::new();
        }
        if !self.props.col_widths.is_empty() {
            return (0..cols)
                .map(|i| {
                    let last = self.props.col_widths.last().copied().unwrap_or(1.0);
                    inches_to_emu(self.props.col_widths.get(i).copied().unwrap_or(last))
                })
                .collect();
        }
        let each = self.frame.cx / cols as i64;
        (0..cols).map(|_| each).collect()
    }
}

/// Background of a slide or layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Background {
    Color(RGBColor),
    Image(MediaSource),
}

/// A background after media has been assigned a relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackgroundFill {
    Color(RGBColor),
    Image { r_id: u32 },
}

/// An object placed on a slide or layout, in z-order.
#[derive(Debug, Clone, PartialEq)]
pub enum SlideObject {
    Text {
        text: String,
        props: TextProps,
        frame: EmuRect,
    },
    Image {
        props: ImageProps,
        frame: EmuRect,
        r_id: u32,
    },
    Shape {
        kind: ShapeKind,
        props: ShapeProps,
        frame: EmuRect,
    },
    Table(TableObject),
    Chart {
        frame: EmuRect,
        r_id: u32,
        title: Option<String>,
    },
}

impl SlideObject {
    pub fn frame(&self) -> &EmuRect {
        match self {
            Self::Text { frame, .. }
            | Self::Image { frame, .. }
            | Self::Shape { frame, .. }
            | Self::Chart { frame, .. } => frame,
            Self::Table(table) => &table.frame,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> LayoutSpec {
        LayoutSpec::new("screen16x9", 9_144_000, 5_143_500)
    }

    #[test]
    fn test_percent_resolves_per_axis() {
        let pos = Position::parse("50%", "50%", "10%", "2in").unwrap();
        let rect = pos.resolve(&page());
        assert_eq!(rect.x, 4_572_000);
        assert_eq!(rect.y, 2_571_750);
        assert_eq!(rect.cx, 914_400);
        assert_eq!(rect.cy, 1_828_800);
    }

    #[test]
    fn test_default_frame() {
        let rect = Position::default().resolve(&page());
        assert_eq!(rect, EmuRect::new(914_400, 914_400, 7_315_200, 914_400));
    }

    #[test]
    fn test_negative_extents_clamp_to_zero() {
        let rect = Position::new(1.0, 1.0, -0.5, -2.0).resolve(&page());
        assert_eq!(rect, EmuRect::new(914_400, 914_400, 0, 0));
    }

    #[test]
    fn test_mixed_units() {
        let rect = Position::parse("72pt", "2.54cm", "25.4mm", "12700emu")
            .unwrap()
            .resolve(&page());
        assert_eq!(rect, EmuRect::new(914_400, 914_400, 914_400, 12_700));
        assert!(Position::parse("1in", "abc", "1", "1").is_err());
    }

    #[test]
    fn test_cell_style_merge() {
        let row = CellStyle {
            bold: Some(true),
            fill: Some(RGBColor::WHITE),
            ..Default::default()
        };
        let cell = CellStyle {
            fill: Some(RGBColor::BLACK),
            ..Default::default()
        };
        let merged = row.merged(&cell);
        assert_eq!(merged.bold, Some(true));
        assert_eq!(merged.fill, Some(RGBColor::BLACK));
    }

    #[test]
    fn test_column_widths() {
        let mut table = TableObject {
            rows: vec![vec!["a".into(), "b".into(), "c".into()]],
            props: TableProps::default(),
            row_styles: Vec::new(),
            frame: EmuRect::new(0, 0, 3_000_000, 400_000),
        };
        assert_eq!(table.column_widths(), vec![1_000_000; 3]);

        table.props.col_widths = vec![1.0, 2.0];
        assert_eq!(table.column_widths(), vec![914_400, 1_828_800, 1_828_800]);
    }

    #[test]
    fn test_margin_insets_order() {
        let margin = Margin([0.1, 0.2, 0.3, 0.4]);
        assert_eq!(margin.insets_emu(), [365_760, 91_440, 182_880, 274_320]);
        assert_eq!(Margin::uniform(1.0).insets_emu(), [914_400; 4]);
    }

    #[test]
    fn test_shape_presets() {
        assert_eq!(ShapeKind::RoundRect.preset(), "roundRect");
        assert_eq!(ShapeKind::Triangle.preset(), "triangle");
        assert_eq!(VerticalAlign::Middle.xml_value(), "ctr");
    }
}
