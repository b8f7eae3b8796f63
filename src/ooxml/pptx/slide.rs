//! Slides and the object canvas they share with slide layouts.
//!
//! A [`Canvas`] is an append-only list of objects plus the relationships
//! (images and native charts) those objects need in the package. Slides
//! reserve `rId1` for their layout and `rId2` for their notes slide; layouts
//! reserve `rId1` for the master.

use crate::common::RGBColor;
use crate::common::error::{ConfigurationError, Result};
use crate::ooxml::charts::funnel::{FunnelOptions, FunnelStep, layout_funnel};
use crate::ooxml::charts::native::NativeChart;
use crate::ooxml::charts::palette::SharedPalette;
use crate::ooxml::charts::primitive::DrawOp;
use crate::ooxml::charts::waterfall::{WaterfallOptions, WaterfallSeries, layout_waterfall};
use crate::ooxml::pptx::layout::LayoutSpec;
use crate::ooxml::pptx::master::SlideNumberProps;
use crate::ooxml::pptx::media::MediaSource;
use crate::ooxml::pptx::objects::{
    Background, BackgroundFill, CellStyle, ImageProps, Position, ShapeKind, ShapeProps,
    SlideObject, TableObject, TableProps, TableRow, TextProps, VerticalAlign,
};

/// First relationship id available to objects on a slide.
pub const SLIDE_FIRST_OBJECT_RID: u32 = 3;

/// Slide ids start above the range reserved by the format.
pub const SLIDE_ID_OFFSET: u32 = 255;

/// An image the package must carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRel {
    pub r_id: u32,
    pub source: MediaSource,
    /// File name under `ppt/media/`
    pub target: String,
}

/// A native chart the package must carry.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRel {
    pub r_id: u32,
    pub chart: NativeChart,
}

/// Objects and their package relationships, in call order.
#[derive(Debug, Clone)]
pub struct Canvas {
    page: LayoutSpec,
    owner: String,
    objects: Vec<SlideObject>,
    media: Vec<MediaRel>,
    charts: Vec<ChartRel>,
    background: Option<BackgroundFill>,
    next_r_id: u32,
}

impl Canvas {
    /// # Arguments
    /// * `page` - Page geometry positions resolve against
    /// * `owner` - Tag used in media file names (`image-<owner>-<n>.<ext>`)
    /// * `first_r_id` - First relationship id free for objects
    pub(crate) fn new(page: LayoutSpec, owner: impl Into<String>, first_r_id: u32) -> Self {
        Self {
            page,
            owner: owner.into(),
            objects: Vec::new(),
            media: Vec::new(),
            charts: Vec::new(),
            background: None,
            next_r_id: first_r_id,
        }
    }

    pub fn page(&self) -> &LayoutSpec {
        &self.page
    }

    pub fn objects(&self) -> &[SlideObject] {
        &self.objects
    }

    pub fn media(&self) -> &[MediaRel] {
        &self.media
    }

    pub fn charts(&self) -> &[ChartRel] {
        &self.charts
    }

    pub fn background(&self) -> Option<&BackgroundFill> {
        self.background.as_ref()
    }

    fn allocate_r_id(&mut self) -> u32 {
        let r_id = self.next_r_id;
        self.next_r_id += 1;
        r_id
    }

    fn push_media(&mut self, source: MediaSource) -> u32 {
        let r_id = self.allocate_r_id();
        let target = format!(
            "image-{}-{}.{}",
            self.owner,
            self.media.len() + 1,
            source.extension()
        );
        self.media.push(MediaRel {
            r_id,
            source,
            target,
        });
        r_id
    }

    pub(crate) fn push_text(&mut self, text: impl Into<String>, props: TextProps) {
        let frame = props.position.resolve(&self.page);
        self.objects.push(SlideObject::Text {
            text: text.into(),
            props,
            frame,
        });
    }

    pub(crate) fn push_image(&mut self, props: ImageProps) {
        let frame = props.position.resolve(&self.page);
        let r_id = self.push_media(props.source.clone());
        self.objects.push(SlideObject::Image { props, frame, r_id });
    }

    pub(crate) fn push_shape(&mut self, kind: ShapeKind, props: ShapeProps) {
        let frame = props.position.resolve(&self.page);
        self.objects.push(SlideObject::Shape { kind, props, frame });
    }

    pub(crate) fn push_table(&mut self, rows: Vec<TableRow>, props: TableProps) -> Result<usize> {
        if rows.is_empty() {
            return Err(ConfigurationError::EmptyTable.into());
        }
        let mut frame = props.position.resolve(&self.page);
        if props.position.h.is_none() {
            frame.cy = props.row_height_emu() * rows.len() as i64;
        }
        let row_styles = vec![CellStyle::default(); rows.len()];
        self.objects.push(SlideObject::Table(TableObject {
            rows,
            props,
            row_styles,
            frame,
        }));
        Ok(self.objects.len() - 1)
    }

    pub(crate) fn push_native_chart(&mut self, chart: NativeChart, position: Position) {
        let frame = position.resolve(&self.page);
        let r_id = self.allocate_r_id();
        let title = chart.options.title.clone();
        self.charts.push(ChartRel { r_id, chart });
        self.objects.push(SlideObject::Chart { frame, r_id, title });
    }

    /// Record geometry-engine output as ordinary text and shape objects.
    pub(crate) fn push_draw_ops(&mut self, ops: Vec<DrawOp>) {
        for op in ops {
            match op {
                DrawOp::Text {
                    frame,
                    text,
                    color,
                    fill,
                    font_size,
                    align,
                } => self.push_text(
                    text,
                    TextProps {
                        position: Position::new(frame.x, frame.y, frame.w, frame.h),
                        font_size: Some(font_size),
                        color: Some(color),
                        fill,
                        align,
                        valign: VerticalAlign::Middle,
                        ..Default::default()
                    },
                ),
                DrawOp::Rect { frame, fill, line } => self.push_shape(
                    ShapeKind::Rect,
                    ShapeProps {
                        position: Position::new(frame.x, frame.y, frame.w, frame.h),
                        fill: Some(fill),
                        line,
                        ..Default::default()
                    },
                ),
                DrawOp::Line { frame, color } => self.push_shape(
                    ShapeKind::Line,
                    ShapeProps {
                        position: Position::new(frame.x, frame.y, frame.w, frame.h),
                        line: Some(color),
                        line_width: Some(1.0),
                        ..Default::default()
                    },
                ),
            }
        }
    }

    pub(crate) fn set_background(&mut self, background: Background) {
        let fill = match background {
            Background::Color(color) => BackgroundFill::Color(color),
            Background::Image(source) => BackgroundFill::Image {
                r_id: self.push_media(source),
            },
        };
        self.background = Some(fill);
    }

    fn table_mut(&mut self, index: usize) -> Option<&mut TableObject> {
        match self.objects.get_mut(index) {
            Some(SlideObject::Table(table)) => Some(table),
            _ => None,
        }
    }
}

/// Chart requests accepted by [`Slide::add_chart`].
#[derive(Debug, Clone, PartialEq)]
pub enum Chart {
    /// Synthesized from text blocks
    Funnel {
        steps: Vec<FunnelStep>,
        options: FunnelOptions,
    },
    /// Synthesized from rectangles, lines and labels
    Waterfall {
        series: WaterfallSeries,
        options: WaterfallOptions,
    },
    /// Written as a chart part with an embedded workbook
    Native { chart: NativeChart, position: Position },
}

/// A single slide.
#[derive(Debug, Clone)]
pub struct Slide {
    number: u32,
    layout_index: usize,
    canvas: Canvas,
    notes: String,
    hidden: bool,
    slide_number: Option<SlideNumberProps>,
    palette: SharedPalette,
}

impl Slide {
    pub(crate) fn new(
        number: u32,
        page: LayoutSpec,
        layout_index: usize,
        slide_number: Option<SlideNumberProps>,
        palette: SharedPalette,
    ) -> Self {
        Self {
            number,
            layout_index,
            canvas: Canvas::new(page, number.to_string(), SLIDE_FIRST_OBJECT_RID),
            notes: String::new(),
            hidden: false,
            slide_number,
            palette,
        }
    }

    /// 1-based slide number.
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Id written to `p:sldId`.
    pub fn id(&self) -> u32 {
        SLIDE_ID_OFFSET + self.number
    }

    /// Page geometry the slide was created with.
    pub fn layout(&self) -> &LayoutSpec {
        self.canvas.page()
    }

    /// Index of the slide layout this slide is based on.
    pub fn layout_index(&self) -> usize {
        self.layout_index
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn objects(&self) -> &[SlideObject] {
        self.canvas.objects()
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn slide_number(&self) -> Option<&SlideNumberProps> {
        self.slide_number.as_ref()
    }

    pub fn add_text(&mut self, text: impl Into<String>, props: TextProps) -> &mut Self {
        self.canvas.push_text(text, props);
        self
    }

    pub fn add_image(&mut self, props: ImageProps) -> &mut Self {
        self.canvas.push_image(props);
        self
    }

    pub fn add_shape(&mut self, kind: ShapeKind, props: ShapeProps) -> &mut Self {
        self.canvas.push_shape(kind, props);
        self
    }

    /// Add a table and return a handle for styling it.
    ///
    /// Fails with [`ConfigurationError::EmptyTable`] when `rows` is empty.
    pub fn add_table(&mut self, rows: Vec<TableRow>, props: TableProps) -> Result<TableHandle<'_>> {
        let index = self.canvas.push_table(rows, props)?;
        let len = self.canvas.objects.len();
        match self.canvas.table_mut(index) {
            Some(table) => Ok(TableHandle { table }),
            None => Err(ConfigurationError::OutOfRange {
                what: "object",
                index,
                len,
            }
            .into()),
        }
    }

    /// Add a chart.
    ///
    /// Funnels and waterfalls are laid out immediately and stored as plain
    /// objects; native charts are encoded at export.
    pub fn add_chart(&mut self, chart: Chart) -> Result<&mut Self> {
        match chart {
            Chart::Funnel { steps, options } => {
                let ops = {
                    let mut palette = self.palette.lock();
                    layout_funnel(&steps, &options, &mut **palette)
                };
                self.canvas.push_draw_ops(ops);
            },
            Chart::Waterfall { series, options } => {
                let ops = layout_waterfall(&series, &options)?;
                self.canvas.push_draw_ops(ops);
            },
            Chart::Native { chart, position } => {
                self.canvas.push_native_chart(chart, position);
            },
        }
        Ok(self)
    }

    /// Append speaker notes; repeated calls add paragraphs.
    pub fn add_notes(&mut self, text: impl AsRef<str>) -> &mut Self {
        if !self.notes.is_empty() {
            self.notes.push('\n');
        }
        self.notes.push_str(text.as_ref());
        self
    }

    pub fn set_background(&mut self, background: Background) -> &mut Self {
        self.canvas.set_background(background);
        self
    }

    /// Convenience for a solid background.
    pub fn set_background_color(&mut self, color: RGBColor) -> &mut Self {
        self.set_background(Background::Color(color))
    }

    pub fn set_slide_number(&mut self, props: SlideNumberProps) -> &mut Self {
        self.slide_number = Some(props);
        self
    }

    /// Hidden slides are skipped in slide show mode.
    pub fn set_hidden(&mut self, hidden: bool) -> &mut Self {
        self.hidden = hidden;
        self
    }
}

/// Styling access to a table that was just added.
#[derive(Debug)]
pub struct TableHandle<'a> {
    table: &'a mut TableObject,
}

impl TableHandle<'_> {
    pub fn row_count(&self) -> usize {
        self.table.rows.len()
    }

    /// Apply a style to every cell of a row.
    pub fn style_row(&mut self, index: usize, style: CellStyle) -> Result<&mut Self> {
        let len = self.table.row_styles.len();
        let slot = self
            .table
            .row_styles
            .get_mut(index)
            .ok_or(ConfigurationError::OutOfRange {
                what: "row",
                index,
                len,
            })?;
        *slot = slot.merged(&style);
        Ok(self)
    }

    /// Apply a style to one cell.
    pub fn style_cell(&mut self, row: usize, col: usize, style: CellStyle) -> Result<&mut Self> {
        let rows = self.table.rows.len();
        let cells = self
            .table
            .rows
            .get_mut(row)
            .ok_or(ConfigurationError::OutOfRange {
                what: "row",
                index: row,
                len: rows,
            })?;
        let cols = cells.len();
        let cell = cells.get_mut(col).ok_or(ConfigurationError::OutOfRange {
            what: "column",
            index: col,
            len: cols,
        })?;
        cell.style = cell.style.merged(&style);
        Ok(self)
    }
}
