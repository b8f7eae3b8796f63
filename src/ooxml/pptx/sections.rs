//! Presentation sections.
//!
//! Sections group slides in the slide sorter. Once any section exists, every
//! new slide lands in one: either the section the caller names, or a
//! trailing `Default-<k>` section.

use crate::common::error::Result;
use crate::common::id::guid_from_rng;
use crate::common::xml::escape_xml;
use crate::ooxml::opc::constants::namespace;
use crate::ooxml::pptx::slide::SLIDE_ID_OFFSET;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fmt::Write as FmtWrite;

/// Extension URI under which the section list is stored.
const SECTION_LIST_EXT_URI: &str = "{521415D9-36F7-43E2-AB2F-B90AF26B5E84}";

/// Seed for section ids; identical build sequences yield identical ids.
const SECTION_ID_SEED: u64 = 0x5EC7_1D5;

/// Who created a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    /// Added through `add_section`
    User,
    /// Created implicitly to hold slides added after a user section
    Default,
}

/// A section in a presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub kind: SectionKind,
    /// Section ID (GUID format)
    pub id: String,
    /// Numbers of the slides in this section
    pub slide_numbers: Vec<u32>,
}

impl Section {
    fn new(title: impl Into<String>, kind: SectionKind, ids: &mut StdRng) -> Self {
        Self {
            title: title.into(),
            kind,
            id: guid_from_rng(ids),
            slide_numbers: Vec::new(),
        }
    }

    /// Generate the `p14:section` element.
    pub fn to_xml(&self) -> Result<String> {
        let mut xml = String::with_capacity(256);

        write!(
            xml,
            r#"<p14:section name="{}" id="{}">"#,
            escape_xml(&self.title),
            escape_xml(&self.id)
        )?;

        xml.push_str("<p14:sldIdLst>");
        for number in &self.slide_numbers {
            write!(xml, r#"<p14:sldId id="{}"/>"#, SLIDE_ID_OFFSET + number)?;
        }
        xml.push_str("</p14:sldIdLst>");

        xml.push_str("</p14:section>");

        Ok(xml)
    }
}

/// Ordered sections of a presentation.
#[derive(Debug, Clone)]
pub struct SectionList {
    sections: Vec<Section>,
    ids: StdRng,
}

impl Default for SectionList {
    fn default() -> Self {
        Self {
            sections: Vec::new(),
            ids: StdRng::seed_from_u64(SECTION_ID_SEED),
        }
    }
}

impl SectionList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn find(&self, title: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.title == title)
    }

    /// Insert a user section.
    ///
    /// `order` is clamped to the list length; `None` appends. An empty title
    /// is skipped with a warning.
    pub(crate) fn add(&mut self, title: &str, order: Option<usize>) -> bool {
        if title.is_empty() {
            log::warn!("Ignoring section with an empty title");
            return false;
        }
        let section = Section::new(title, SectionKind::User, &mut self.ids);
        let index = order.unwrap_or(self.sections.len()).min(self.sections.len());
        self.sections.insert(index, section);
        true
    }

    /// Place a newly created slide.
    pub(crate) fn attach(&mut self, slide_number: u32, section_title: Option<&str>) {
        if let Some(title) = section_title {
            match self.sections.iter_mut().find(|s| s.title == title) {
                Some(section) => section.slide_numbers.push(slide_number),
                None => {
                    log::warn!(slide = slide_number; "Unknown section '{}', slide left unsectioned", title)
                },
            }
            return;
        }

        let needs_default = match self.sections.last() {
            None => return,
            Some(last) => last.kind == SectionKind::User,
        };
        if needs_default {
            let k = self
                .sections
                .iter()
                .filter(|s| s.kind == SectionKind::Default)
                .count()
                + 1;
            let section = Section::new(format!("Default-{}", k), SectionKind::Default, &mut self.ids);
            self.sections.push(section);
        }
        if let Some(last) = self.sections.last_mut() {
            last.slide_numbers.push(slide_number);
        }
    }

    /// Generate the `p:extLst` carrying the section list, or an empty string
    /// when there are no sections.
    pub fn to_xml(&self) -> Result<String> {
        if self.sections.is_empty() {
            return Ok(String::new());
        }

        let mut xml = String::with_capacity(1024);

        xml.push_str("<p:extLst>");
        write!(xml, r#"<p:ext uri="{}">"#, SECTION_LIST_EXT_URI)?;
        write!(xml, r#"<p14:sectionLst xmlns:p14="{}">"#, namespace::PML_2010)?;

        for section in &self.sections {
            xml.push_str(&section.to_xml()?);
        }

        xml.push_str("</p14:sectionLst>");
        xml.push_str("</p:ext>");
        xml.push_str("</p:extLst>");

        Ok(xml)
    }
}
