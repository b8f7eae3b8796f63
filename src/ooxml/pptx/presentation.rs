//! The presentation document: slides, sections, layouts and export.

use crate::common::config::{DeckConfig, ExportOptions, OutputTarget, PresentationProperties};
use crate::common::error::{ConfigurationError, Result};
use crate::ooxml::charts::native::{DrawingChartEncoder, NativeChartEncoder};
use crate::ooxml::charts::palette::{PaletteGenerator, RandomPalette, SharedPalette, shared};
use crate::ooxml::pptx::layout::{LayoutRegistry, LayoutSpec};
use crate::ooxml::pptx::master::{MasterSlide, SlideLayoutDef, SlideMasterProps};
use crate::ooxml::pptx::media::{DefaultMediaResolver, MediaResolver};
use crate::ooxml::pptx::sections::{Section, SectionList};
use crate::ooxml::pptx::slide::Slide;
use crate::ooxml::pptx::writer::package::{PackageAssembler, write_package_file};
use std::path::PathBuf;

/// Options for [`Presentation::add_slide`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddSlideOptions {
    /// Slide layout defined through [`Presentation::define_slide_master`]
    pub master_name: Option<String>,
    /// Section to attach the slide to
    pub section_title: Option<String>,
}

impl AddSlideOptions {
    pub fn master(name: impl Into<String>) -> Self {
        Self {
            master_name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn section(title: impl Into<String>) -> Self {
        Self {
            section_title: Some(title.into()),
            ..Self::default()
        }
    }
}

/// What an export produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutput {
    /// The package bytes
    Buffer(Vec<u8>),
    /// Path of the written package
    File(PathBuf),
}

/// A presentation being built.
///
/// Mutation is synchronous; [`export`](Self::export) borrows the document
/// immutably, so it cannot change while a package is assembled.
///
/// # Examples
///
/// ```no_run
/// use slidekit::{ExportOptions, Presentation, TextProps};
///
/// # async fn run() -> slidekit::Result<()> {
/// let mut pres = Presentation::new();
/// pres.add_slide(Default::default())
///     .add_text("Hello", TextProps::default());
/// pres.export(&ExportOptions::file("hello.pptx")).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Presentation {
    properties: PresentationProperties,
    layouts: LayoutRegistry,
    slides: Vec<Slide>,
    sections: SectionList,
    master: MasterSlide,
    slide_layouts: Vec<SlideLayoutDef>,
    palette: SharedPalette,
}

impl Presentation {
    /// Create an empty presentation with a randomly seeded palette.
    pub fn new() -> Self {
        Self::with_palette(RandomPalette::from_entropy())
    }

    /// Create an empty presentation drawing funnel fills from `palette`.
    pub fn with_palette(palette: impl PaletteGenerator + 'static) -> Self {
        let layouts = LayoutRegistry::new();
        let default_layout = SlideLayoutDef::default_layout(layouts.active().clone());
        Self {
            properties: PresentationProperties::default(),
            layouts,
            slides: Vec::new(),
            sections: SectionList::new(),
            master: MasterSlide::default(),
            slide_layouts: vec![default_layout],
            palette: shared(palette),
        }
    }

    /// Build a presentation from a deck configuration.
    ///
    /// Layouts go through the same validation as
    /// [`define_layout`](Self::define_layout).
    pub fn from_config(config: &DeckConfig) -> Result<Self> {
        let mut pres = Self::new();
        pres.properties = config.properties.clone();
        for layout in &config.layouts {
            pres.define_layout(&layout.name, layout.width, layout.height)?;
        }
        if let Some(name) = &config.active_layout {
            pres.select_layout(name)?;
        }
        Ok(pres)
    }

    pub fn properties(&self) -> &PresentationProperties {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut PresentationProperties {
        &mut self.properties
    }

    pub fn layouts(&self) -> &LayoutRegistry {
        &self.layouts
    }

    pub fn layouts_mut(&mut self) -> &mut LayoutRegistry {
        &mut self.layouts
    }

    /// Register a custom page size in inches.
    pub fn define_layout(&mut self, name: &str, width_in: f64, height_in: f64) -> Result<&LayoutSpec> {
        self.layouts.register_layout(name, width_in, height_in)
    }

    /// Switch the page size used by slides created from now on.
    pub fn select_layout(&mut self, name: &str) -> Result<&LayoutSpec> {
        self.layouts.select_layout(name)
    }

    /// The page size written to `presentation.xml`.
    pub fn page(&self) -> &LayoutSpec {
        self.layouts.active()
    }

    /// Add a section, at `order` when given, otherwise last.
    pub fn add_section(&mut self, title: &str, order: Option<usize>) -> &mut Self {
        self.sections.add(title, order);
        self
    }

    /// Append a new slide and return it.
    pub fn add_slide(&mut self, options: AddSlideOptions) -> &mut Slide {
        let layout_index = match options.master_name.as_deref() {
            None => 0,
            Some(name) => match self.slide_layouts.iter().position(|l| l.name() == name) {
                Some(index) => index,
                None => {
                    log::warn!("Unknown slide master '{}', using the default layout", name);
                    0
                },
            },
        };

        let number = self.slides.len() as u32 + 1;
        let slide_number = self.slide_layouts[layout_index].slide_number().cloned();
        let slide = Slide::new(
            number,
            self.layouts.active().clone(),
            layout_index,
            slide_number,
            self.palette.clone(),
        );
        log::trace!(slide = number, layout = layout_index; "Added slide");

        self.sections.attach(number, options.section_title.as_deref());
        let index = self.slides.len();
        self.slides.push(slide);
        &mut self.slides[index]
    }

    /// Define a named slide layout usable by later [`add_slide`](Self::add_slide)
    /// calls.
    pub fn define_slide_master(&mut self, props: SlideMasterProps) -> Result<&SlideLayoutDef> {
        let number = self.slide_layouts.len() + 1;
        let layout = SlideLayoutDef::from_props(number, self.layouts.active().clone(), props)?;
        if let Some(props) = layout.slide_number() {
            self.master.adopt_slide_number(props);
        }
        log::debug!(layout = number; "Defined slide master '{}'", layout.name());

        let index = self.slide_layouts.len();
        self.slide_layouts.push(layout);
        Ok(&self.slide_layouts[index])
    }

    pub fn slide(&self, number: u32) -> Option<&Slide> {
        let index = (number as usize).checked_sub(1)?;
        self.slides.get(index)
    }

    pub fn slide_mut(&mut self, number: u32) -> Option<&mut Slide> {
        let index = (number as usize).checked_sub(1)?;
        self.slides.get_mut(index)
    }

    /// Like [`slide_mut`](Self::slide_mut), failing with
    /// [`ConfigurationError::UnknownSlide`].
    pub(crate) fn require_slide_mut(&mut self, number: u32) -> Result<&mut Slide> {
        self.slide_mut(number)
            .ok_or_else(|| ConfigurationError::UnknownSlide(number).into())
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn sections(&self) -> &[Section] {
        self.sections.sections()
    }

    pub(crate) fn section_list(&self) -> &SectionList {
        &self.sections
    }

    pub fn slide_layouts(&self) -> &[SlideLayoutDef] {
        &self.slide_layouts
    }

    pub fn master(&self) -> &MasterSlide {
        &self.master
    }

    /// Assemble the package with the default media resolver and chart
    /// encoder.
    pub async fn export(&self, options: &ExportOptions) -> Result<ExportOutput> {
        self.export_with(&DefaultMediaResolver, &DrawingChartEncoder, options)
            .await
    }

    /// Assemble the package with caller-supplied collaborators.
    pub async fn export_with<R, E>(&self, resolver: &R, encoder: &E, options: &ExportOptions) -> Result<ExportOutput>
    where
        R: MediaResolver + Sync,
        E: NativeChartEncoder + Sync,
    {
        let mut assembler = PackageAssembler::new(self, resolver, encoder);
        let bytes = assembler.run(options.compression).await?;

        match &options.output {
            OutputTarget::Buffer => Ok(ExportOutput::Buffer(bytes)),
            OutputTarget::File(path) => {
                let path = write_package_file(path, &bytes).await?;
                log::debug!(bytes = bytes.len(); "Wrote {}", path.display());
                Ok(ExportOutput::File(path))
            },
        }
    }
}

impl Default for Presentation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::Error;
    use crate::common::RGBColor;
    use crate::ooxml::charts::palette::FixedPalette;
    use crate::ooxml::pptx::master::SlideNumberProps;

    fn pres() -> Presentation {
        Presentation::with_palette(FixedPalette::new(vec![RGBColor::new(10, 20, 30)]))
    }

    #[test]
    fn test_slide_numbers_are_monotonic() {
        let mut pres = pres();
        assert_eq!(pres.add_slide(AddSlideOptions::default()).number(), 1);
        assert_eq!(pres.add_slide(AddSlideOptions::default()).number(), 2);
        assert_eq!(pres.slide(2).unwrap().id(), 257);
        assert!(pres.slide(0).is_none());
        assert!(pres.slide(3).is_none());
    }

    #[test]
    fn test_slides_keep_layout_of_creation() {
        let mut pres = pres();
        pres.add_slide(AddSlideOptions::default());
        pres.define_layout("A4", 8.27, 11.69).unwrap();
        pres.select_layout("A4").unwrap();
        pres.add_slide(AddSlideOptions::default());

        assert_eq!(pres.slide(1).unwrap().layout().name, "screen16x9");
        assert_eq!(pres.slide(2).unwrap().layout().name, "A4");
        assert!(matches!(
            pres.select_layout("Letter"),
            Err(Error::Configuration(ConfigurationError::UnknownLayout(_)))
        ));
    }

    #[test]
    fn test_master_name_resolution() {
        let mut pres = pres();
        pres.define_slide_master(SlideMasterProps::new("TITLE")).unwrap();
        assert_eq!(pres.add_slide(AddSlideOptions::master("TITLE")).layout_index(), 1);
        assert_eq!(pres.add_slide(AddSlideOptions::master("NOPE")).layout_index(), 0);
        assert_eq!(pres.slide_layouts().len(), 2);
        assert_eq!(pres.slide_layouts()[0].name(), "DEFAULT");
    }

    #[test]
    fn test_define_slide_master_requires_title() {
        let mut pres = pres();
        assert!(matches!(
            pres.define_slide_master(SlideMasterProps::default()),
            Err(Error::Configuration(ConfigurationError::MissingMasterTitle))
        ));
        assert_eq!(pres.slide_layouts().len(), 1);
    }

    #[test]
    fn test_slide_number_flows_from_layout() {
        let mut pres = pres();
        let props = SlideMasterProps {
            slide_number: Some(SlideNumberProps::default()),
            ..SlideMasterProps::new("NUMBERED")
        };
        pres.define_slide_master(props).unwrap();
        assert!(pres.master().slide_number().is_some());

        assert!(pres.add_slide(AddSlideOptions::master("NUMBERED")).slide_number().is_some());
        assert!(pres.add_slide(AddSlideOptions::default()).slide_number().is_none());
    }

    #[test]
    fn test_sections_through_add_slide() {
        let mut pres = pres();
        pres.add_slide(AddSlideOptions::default());
        pres.add_section("Intro", None);
        pres.add_slide(AddSlideOptions::section("Intro"));
        pres.add_slide(AddSlideOptions::default());

        let sections = pres.sections();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].slide_numbers, vec![2]);
        assert_eq!(sections[1].title, "Default-1");
        assert_eq!(sections[1].slide_numbers, vec![3]);
    }

    #[test]
    fn test_from_config() {
        let config = DeckConfig::from_yaml_str(
            "properties: { title: Deck }\nlayouts:\n  - { name: A4, width: 8.27, height: 11.69 }\nactive_layout: A4\n",
        )
        .unwrap();
        let pres = Presentation::from_config(&config).unwrap();
        assert_eq!(pres.properties().title, "Deck");
        assert_eq!(pres.page().name, "A4");

        let bad = DeckConfig::from_yaml_str("active_layout: Missing\n").unwrap();
        assert!(Presentation::from_config(&bad).is_err());
    }

    #[test]
    fn test_presentation_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<Presentation>();
    }
}
