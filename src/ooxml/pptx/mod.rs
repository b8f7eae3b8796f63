//! PowerPoint (.pptx) presentation authoring.
//!
//! The object model ([`Presentation`], [`Slide`], [`SlideLayoutDef`]) is
//! mutated synchronously; [`Presentation::export`] hands it to the
//! [`writer::PackageAssembler`], which resolves media, encodes native charts
//! and archives the package.
//!
//! # Example
//!
//! ```rust,no_run
//! use slidekit::ooxml::pptx::{AddSlideOptions, Presentation, SlideMasterProps};
//! use slidekit::ExportOptions;
//!
//! # async fn run() -> slidekit::Result<()> {
//! let mut pres = Presentation::new();
//! pres.define_slide_master(SlideMasterProps::new("TITLE_SLIDE"))?;
//! pres.add_section("Intro", None);
//! pres.add_slide(AddSlideOptions::master("TITLE_SLIDE"))
//!     .add_notes("Welcome everyone");
//! pres.export(&ExportOptions::buffer()).await?;
//! # Ok(())
//! # }
//! ```

pub mod layout;
pub mod master;
pub mod media;
pub mod objects;
pub mod presentation;
pub mod sections;
pub mod slide;
pub mod table_pager;
pub mod writer;

pub use layout::{DEFAULT_LAYOUT, LayoutRegistry, LayoutSpec};
pub use master::{MasterObject, MasterSlide, SlideLayoutDef, SlideMasterProps, SlideNumberProps};
pub use media::{DefaultMediaResolver, MediaResolver, MediaSource};
pub use objects::{
    Background, CellStyle, ImageProps, Margin, Position, ShapeKind, ShapeProps, TableCell,
    TableProps, TableRow, TextProps, VerticalAlign,
};
pub use presentation::{AddSlideOptions, ExportOutput, Presentation};
pub use sections::{Section, SectionKind};
pub use slide::{Chart, Slide, TableHandle};
pub use writer::{ExportStage, PackageAssembler};
