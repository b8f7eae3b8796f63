//! Slide masters, slide layouts and slide-number placeholders.
//!
//! The package always carries one slide master. Every named layout defined
//! through [`SlideMasterProps`] becomes a `slideLayoutN.xml` part under it;
//! layout 1 is the built-in `DEFAULT` layout.

use crate::common::RGBColor;
use crate::common::error::{ConfigurationError, Result};
use crate::common::unit::Length;
use crate::ooxml::pptx::layout::LayoutSpec;
use crate::ooxml::pptx::objects::{
    Background, ImageProps, Margin, Position, ShapeKind, ShapeProps, TextProps,
};
use crate::ooxml::pptx::slide::Canvas;

/// Name of the layout every presentation starts with.
pub const DEFAULT_LAYOUT_NAME: &str = "DEFAULT";

/// Placeholder index shared by the master, layout and slide `sldNum` shapes.
pub const SLIDE_NUMBER_IDX: u32 = 12;

/// Layouts reserve `rId1` for the slide master.
pub(crate) const LAYOUT_FIRST_OBJECT_RID: u32 = 2;

/// Default page margin in inches.
pub const DEFAULT_MARGIN_IN: f64 = 0.5;

/// Where and how the slide number is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideNumberProps {
    pub position: Position,
    pub color: Option<RGBColor>,
    pub font_face: Option<String>,
    /// Points
    pub font_size: Option<f64>,
}

impl Default for SlideNumberProps {
    fn default() -> Self {
        Self {
            position: Position {
                x: Some(Length::Inches(0.3)),
                y: Some(Length::Percent(90.0)),
                w: Some(Length::Inches(0.8)),
                h: Some(Length::Inches(0.4)),
            },
            color: None,
            font_face: None,
            font_size: None,
        }
    }
}

/// An object drawn on every slide that uses a layout.
#[derive(Debug, Clone, PartialEq)]
pub enum MasterObject {
    Text { text: String, props: TextProps },
    Shape { kind: ShapeKind, props: ShapeProps },
    Image(ImageProps),
}

/// Definition of a named slide layout.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SlideMasterProps {
    /// Layout name, referenced later by `AddSlideOptions::master_name`
    pub title: String,
    pub background: Option<Background>,
    pub objects: Vec<MasterObject>,
    pub margin: Option<Margin>,
    pub slide_number: Option<SlideNumberProps>,
}

impl SlideMasterProps {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

/// A slide layout, as stored in the presentation.
#[derive(Debug, Clone)]
pub struct SlideLayoutDef {
    name: String,
    canvas: Canvas,
    margin: Margin,
    slide_number: Option<SlideNumberProps>,
}

impl SlideLayoutDef {
    /// The built-in first layout.
    pub(crate) fn default_layout(page: LayoutSpec) -> Self {
        Self {
            name: DEFAULT_LAYOUT_NAME.to_string(),
            canvas: Canvas::new(page, "layout1", LAYOUT_FIRST_OBJECT_RID),
            margin: Margin::uniform(DEFAULT_MARGIN_IN),
            slide_number: None,
        }
    }

    /// Build layout number `number` (1-based) from caller props.
    ///
    /// Fails with [`ConfigurationError::MissingMasterTitle`] when the title is
    /// empty.
    pub(crate) fn from_props(number: usize, page: LayoutSpec, props: SlideMasterProps) -> Result<Self> {
        if props.title.is_empty() {
            return Err(ConfigurationError::MissingMasterTitle.into());
        }

        let mut canvas = Canvas::new(page, format!("layout{}", number), LAYOUT_FIRST_OBJECT_RID);
        if let Some(background) = props.background {
            canvas.set_background(background);
        }
        for object in props.objects {
            match object {
                MasterObject::Text { text, props } => canvas.push_text(text, props),
                MasterObject::Shape { kind, props } => canvas.push_shape(kind, props),
                MasterObject::Image(props) => canvas.push_image(props),
            }
        }

        Ok(Self {
            name: props.title,
            canvas,
            margin: props.margin.unwrap_or(Margin::uniform(DEFAULT_MARGIN_IN)),
            slide_number: props.slide_number,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn margin(&self) -> &Margin {
        &self.margin
    }

    pub fn slide_number(&self) -> Option<&SlideNumberProps> {
        self.slide_number.as_ref()
    }

    pub(crate) fn set_slide_number(&mut self, props: SlideNumberProps) {
        self.slide_number = Some(props);
    }
}

/// The single slide master.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MasterSlide {
    slide_number: Option<SlideNumberProps>,
}

impl MasterSlide {
    pub fn slide_number(&self) -> Option<&SlideNumberProps> {
        self.slide_number.as_ref()
    }

    /// Adopt `props` unless slide numbers are already configured.
    pub(crate) fn adopt_slide_number(&mut self, props: &SlideNumberProps) {
        if self.slide_number.is_none() {
            self.slide_number = Some(props.clone());
        }
    }
}
