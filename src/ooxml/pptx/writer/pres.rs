/// Presentation-level parts: `presentation.xml`, its properties parts and the
/// document property parts under `docProps/`.
use super::master::SLIDE_MASTER_ID;
use super::slide::write_pml_namespaces;
use crate::common::config::PresentationProperties;
use crate::common::error::Result;
use crate::common::xml::{XML_DECLARATION, escape_xml};
use crate::ooxml::opc::constants::relationship_type as rt;
use crate::ooxml::opc::rel::Relationships;
use crate::ooxml::pptx::layout::{LayoutRegistry, LayoutSpec};
use crate::ooxml::pptx::sections::SectionList;
use crate::ooxml::pptx::slide::Slide;
use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt::Write as FmtWrite;

const EXTENDED_PROPERTIES_NS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/extended-properties";
const DOC_PROPS_VTYPES_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes";
const CORE_PROPERTIES_NS: &str = "http://schemas.openxmlformats.org/package/2006/metadata/core-properties";

/// Notes page size (portrait letter), in EMU.
const NOTES_SIZE: (i64, i64) = (6_858_000, 9_144_000);

/// Relationship ids of `presentation.xml`.
///
/// The master comes first, then one id per slide, then the fixed parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PresentationRelIds {
    pub slide_count: u32,
}

impl PresentationRelIds {
    pub(crate) const MASTER: u32 = 1;

    pub(crate) fn slide(&self, number: u32) -> u32 {
        1 + number
    }

    pub(crate) fn notes_master(&self) -> u32 {
        self.slide_count + 2
    }

    pub(crate) fn pres_props(&self) -> u32 {
        self.slide_count + 3
    }

    pub(crate) fn view_props(&self) -> u32 {
        self.slide_count + 4
    }

    pub(crate) fn theme(&self) -> u32 {
        self.slide_count + 5
    }

    pub(crate) fn table_styles(&self) -> u32 {
        self.slide_count + 6
    }
}

/// Generate `presentation.xml`.
pub(crate) fn presentation_xml(
    slides: &[Slide],
    page: &LayoutSpec,
    sections: &SectionList,
    properties: &PresentationProperties,
) -> Result<String> {
    let ids = PresentationRelIds {
        slide_count: slides.len() as u32,
    };
    let mut xml = String::with_capacity(2048);

    xml.push_str(XML_DECLARATION);
    xml.push_str("<p:presentation");
    write_pml_namespaces(&mut xml)?;
    if properties.rtl_mode {
        xml.push_str(r#" rtl="1""#);
    }
    xml.push_str(r#" saveSubsetFonts="1" autoCompressPictures="0">"#);

    xml.push_str("<p:sldMasterIdLst>");
    write!(
        xml,
        r#"<p:sldMasterId id="{}" r:id="rId{}"/>"#,
        SLIDE_MASTER_ID,
        PresentationRelIds::MASTER
    )?;
    xml.push_str("</p:sldMasterIdLst>");

    xml.push_str("<p:notesMasterIdLst>");
    write!(xml, r#"<p:notesMasterId r:id="rId{}"/>"#, ids.notes_master())?;
    xml.push_str("</p:notesMasterIdLst>");

    if !slides.is_empty() {
        xml.push_str("<p:sldIdLst>");
        for slide in slides {
            write!(
                xml,
                r#"<p:sldId id="{}" r:id="rId{}"/>"#,
                slide.id(),
                ids.slide(slide.number())
            )?;
        }
        xml.push_str("</p:sldIdLst>");
    }

    write!(xml, r#"<p:sldSz cx="{}" cy="{}""#, page.width, page.height)?;
    if LayoutRegistry::is_preset(page) {
        write!(xml, r#" type="{}""#, page.name)?;
    }
    xml.push_str("/>");
    write!(xml, r#"<p:notesSz cx="{}" cy="{}"/>"#, NOTES_SIZE.0, NOTES_SIZE.1)?;

    xml.push_str("<p:defaultTextStyle>");
    xml.push_str(r#"<a:defPPr><a:defRPr lang="en-US"/></a:defPPr>"#);
    for level in 1..=9 {
        write!(
            xml,
            r#"<a:lvl{0}pPr marL="{1}" algn="l" defTabSz="914400" rtl="{2}" eaLnBrk="1" latinLnBrk="0" hangingPunct="1">"#,
            level,
            (level - 1) * 457_200,
            u8::from(properties.rtl_mode)
        )?;
        xml.push_str(r#"<a:defRPr sz="1800" kern="1200"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill>"#);
        xml.push_str(r#"<a:latin typeface="+mn-lt"/><a:ea typeface="+mn-ea"/><a:cs typeface="+mn-cs"/></a:defRPr>"#);
        write!(xml, "</a:lvl{}pPr>", level)?;
    }
    xml.push_str("</p:defaultTextStyle>");

    xml.push_str(&sections.to_xml()?);

    xml.push_str("</p:presentation>");

    Ok(xml)
}

/// Generate `presentation.xml.rels`.
pub(crate) fn presentation_rels_xml(slides: &[Slide]) -> String {
    let ids = PresentationRelIds {
        slide_count: slides.len() as u32,
    };
    let mut rels = Relationships::new();
    rels.add(
        PresentationRelIds::MASTER,
        rt::SLIDE_MASTER,
        "slideMasters/slideMaster1.xml",
    );
    for slide in slides {
        rels.add(
            ids.slide(slide.number()),
            rt::SLIDE,
            format!("slides/slide{}.xml", slide.number()),
        );
    }
    rels.add(ids.notes_master(), rt::NOTES_MASTER, "notesMasters/notesMaster1.xml");
    rels.add(ids.pres_props(), rt::PRES_PROPS, "presProps.xml");
    rels.add(ids.view_props(), rt::VIEW_PROPS, "viewProps.xml");
    rels.add(ids.theme(), rt::THEME, "theme/theme1.xml");
    rels.add(ids.table_styles(), rt::TABLE_STYLES, "tableStyles.xml");
    rels.to_xml()
}

/// Generate the package root `_rels/.rels`.
pub(crate) fn root_rels_xml() -> String {
    let mut rels = Relationships::new();
    rels.add(1, rt::OFFICE_DOCUMENT, "ppt/presentation.xml");
    rels.add(2, rt::CORE_PROPERTIES, "docProps/core.xml");
    rels.add(3, rt::EXTENDED_PROPERTIES, "docProps/app.xml");
    rels.to_xml()
}

pub(crate) fn pres_props_xml() -> Result<String> {
    let mut xml = String::with_capacity(256);
    xml.push_str(XML_DECLARATION);
    xml.push_str("<p:presentationPr");
    write_pml_namespaces(&mut xml)?;
    xml.push_str("/>");
    Ok(xml)
}

pub(crate) fn view_props_xml() -> Result<String> {
    let mut xml = String::with_capacity(1024);
    xml.push_str(XML_DECLARATION);
    xml.push_str("<p:viewPr");
    write_pml_namespaces(&mut xml)?;
    xml.push('>');
    xml.push_str(r#"<p:normalViewPr horzBarState="maximized">"#);
    xml.push_str(r#"<p:restoredLeft sz="15611"/><p:restoredTop sz="94610"/>"#);
    xml.push_str("</p:normalViewPr>");
    xml.push_str("<p:slideViewPr>");
    xml.push_str(r#"<p:cSldViewPr snapToGrid="0" snapToObjects="1">"#);
    xml.push_str(r#"<p:cViewPr varScale="1"><p:scale><a:sx n="100" d="100"/><a:sy n="100" d="100"/></p:scale><p:origin x="0" y="0"/></p:cViewPr>"#);
    xml.push_str("<p:guideLst/>");
    xml.push_str("</p:cSldViewPr>");
    xml.push_str("</p:slideViewPr>");
    xml.push_str("<p:notesTextViewPr>");
    xml.push_str(r#"<p:cViewPr><p:scale><a:sx n="1" d="1"/><a:sy n="1" d="1"/></p:scale><p:origin x="0" y="0"/></p:cViewPr>"#);
    xml.push_str("</p:notesTextViewPr>");
    xml.push_str(r#"<p:gridSpacing cx="76200" cy="76200"/>"#);
    xml.push_str("</p:viewPr>");
    Ok(xml)
}

pub(crate) fn table_styles_xml() -> Result<String> {
    let mut xml = String::with_capacity(256);
    xml.push_str(XML_DECLARATION);
    write!(
        xml,
        r#"<a:tblStyleLst xmlns:a="{}" def="{{5C22544A-7EE6-4342-B048-85BDC9FD1C3A}}"/>"#,
        crate::ooxml::opc::constants::namespace::DML_MAIN
    )?;
    Ok(xml)
}

/// Generate `docProps/app.xml`, listing fonts, the theme and slide titles.
pub(crate) fn app_xml(slides: &[Slide], properties: &PresentationProperties) -> Result<String> {
    let mut fonts: Vec<&str> = vec![properties.theme.head_font_face.as_str()];
    if properties.theme.body_font_face != properties.theme.head_font_face {
        fonts.push(&properties.theme.body_font_face);
    }
    let hidden = slides.iter().filter(|s| s.is_hidden()).count();
    let notes = slides.iter().filter(|s| !s.notes().is_empty()).count();

    let mut xml = String::with_capacity(2048);
    xml.push_str(XML_DECLARATION);
    write!(
        xml,
        r#"<Properties xmlns="{}" xmlns:vt="{}">"#,
        EXTENDED_PROPERTIES_NS, DOC_PROPS_VTYPES_NS
    )?;
    xml.push_str("<TotalTime>0</TotalTime>");
    xml.push_str("<Words>0</Words>");
    xml.push_str("<Application>Microsoft Office PowerPoint</Application>");
    xml.push_str("<PresentationFormat>On-screen Show</PresentationFormat>");
    xml.push_str("<Paragraphs>0</Paragraphs>");
    write!(xml, "<Slides>{}</Slides>", slides.len())?;
    write!(xml, "<Notes>{}</Notes>", notes)?;
    write!(xml, "<HiddenSlides>{}</HiddenSlides>", hidden)?;
    xml.push_str("<MMClips>0</MMClips>");
    xml.push_str("<ScaleCrop>false</ScaleCrop>");

    xml.push_str("<HeadingPairs>");
    xml.push_str(r#"<vt:vector size="6" baseType="variant">"#);
    for (heading, count) in [
        ("Fonts Used", fonts.len()),
        ("Theme", 1),
        ("Slide Titles", slides.len()),
    ] {
        write!(
            xml,
            "<vt:variant><vt:lpstr>{}</vt:lpstr></vt:variant><vt:variant><vt:i4>{}</vt:i4></vt:variant>",
            heading, count
        )?;
    }
    xml.push_str("</vt:vector>");
    xml.push_str("</HeadingPairs>");

    xml.push_str("<TitlesOfParts>");
    write!(
        xml,
        r#"<vt:vector size="{}" baseType="lpstr">"#,
        fonts.len() + 1 + slides.len()
    )?;
    for font in &fonts {
        write!(xml, "<vt:lpstr>{}</vt:lpstr>", escape_xml(font))?;
    }
    xml.push_str("<vt:lpstr>Office Theme</vt:lpstr>");
    for slide in slides {
        write!(xml, "<vt:lpstr>Slide {}</vt:lpstr>", slide.number())?;
    }
    xml.push_str("</vt:vector>");
    xml.push_str("</TitlesOfParts>");

    write!(xml, "<Company>{}</Company>", escape_xml(&properties.company))?;
    xml.push_str("<LinksUpToDate>false</LinksUpToDate>");
    xml.push_str("<SharedDoc>false</SharedDoc>");
    xml.push_str("<HyperlinksChanged>false</HyperlinksChanged>");
    xml.push_str("<AppVersion>16.0000</AppVersion>");
    xml.push_str("</Properties>");

    Ok(xml)
}

/// Generate `docProps/core.xml`.
///
/// # Arguments
/// * `now` - Modification time, and creation time when the properties carry
///   none
pub(crate) fn core_xml(properties: &PresentationProperties, now: DateTime<Utc>) -> Result<String> {
    let created = properties
        .created
        .unwrap_or(now)
        .to_rfc3339_opts(SecondsFormat::Secs, true);
    let modified = now.to_rfc3339_opts(SecondsFormat::Secs, true);

    let mut xml = String::with_capacity(1024);
    xml.push_str(XML_DECLARATION);
    write!(
        xml,
        r#"<cp:coreProperties xmlns:cp="{}" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
        CORE_PROPERTIES_NS
    )?;
    write!(xml, "<dc:title>{}</dc:title>", escape_xml(&properties.title))?;
    write!(xml, "<dc:subject>{}</dc:subject>", escape_xml(&properties.subject))?;
    write!(xml, "<dc:creator>{}</dc:creator>", escape_xml(&properties.author))?;
    write!(
        xml,
        "<cp:lastModifiedBy>{}</cp:lastModifiedBy>",
        escape_xml(&properties.author)
    )?;
    write!(xml, "<cp:revision>{}</cp:revision>", properties.revision)?;
    write!(
        xml,
        r#"<dcterms:created xsi:type="dcterms:W3CDTF">{}</dcterms:created>"#,
        created
    )?;
    write!(
        xml,
        r#"<dcterms:modified xsi:type="dcterms:W3CDTF">{}</dcterms:modified>"#,
        modified
    )?;
    xml.push_str("</cp:coreProperties>");

    Ok(xml)
}
