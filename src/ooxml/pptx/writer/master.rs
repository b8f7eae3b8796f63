/// Slide layout, slide master and notes master parts.
use super::shape::{ShapeTree, write_background};
use super::slide::{add_canvas_rels, write_pml_namespaces};
use crate::common::error::Result;
use crate::common::xml::{XML_DECLARATION, escape_xml};
use crate::ooxml::opc::constants::relationship_type as rt;
use crate::ooxml::opc::rel::Relationships;
use crate::ooxml::pptx::layout::LayoutSpec;
use crate::ooxml::pptx::master::{SlideLayoutDef, SlideNumberProps};
use std::fmt::Write as FmtWrite;

/// `p:sldMasterId` of the only slide master.
pub(crate) const SLIDE_MASTER_ID: u32 = 2_147_483_648;

/// Placeholder text PowerPoint shows for the slide number field on masters.
const SLIDE_NUMBER_FIELD_TEXT: &str = "\u{2039}#\u{203A}";

const CLR_MAP: &str = r#"bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink""#;

const SCHEME_BACKGROUND: &str =
    r#"<p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg>"#;

/// Generate `slideLayoutN.xml`.
///
/// # Arguments
/// * `slide_number` - Effective slide-number props for this layout, which
///   for the default layout may come from the master
/// * `page` - Presentation page size, used to place the slide number
pub(crate) fn layout_xml(
    layout: &SlideLayoutDef,
    slide_number: Option<&SlideNumberProps>,
    page: &LayoutSpec,
    rtl: bool,
) -> Result<String> {
    let mut xml = String::with_capacity(2048);

    xml.push_str(XML_DECLARATION);
    xml.push_str("<p:sldLayout");
    write_pml_namespaces(&mut xml)?;
    xml.push_str(r#" preserve="1">"#);

    write!(xml, r#"<p:cSld name="{}">"#, escape_xml(layout.name()))?;
    write_background(&mut xml, layout.canvas().background())?;

    let mut tree = ShapeTree::open(&mut xml, rtl);
    tree.objects(layout.canvas().objects())?;
    if let Some(props) = slide_number {
        tree.slide_number(props, page, SLIDE_NUMBER_FIELD_TEXT)?;
    }
    tree.close();

    xml.push_str("</p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
    xml.push_str("</p:sldLayout>");

    Ok(xml)
}

/// Generate `slideLayoutN.xml.rels`: the master, then layout media.
pub(crate) fn layout_rels_xml(layout: &SlideLayoutDef, chart_numbers: &[usize]) -> String {
    let mut rels = Relationships::new();
    rels.add(1, rt::SLIDE_MASTER, "../slideMasters/slideMaster1.xml");
    add_canvas_rels(&mut rels, layout.canvas(), chart_numbers);
    rels.to_xml()
}

/// Generate `slideMaster1.xml`.
pub(crate) fn master_xml(
    layout_count: usize,
    slide_number: Option<&SlideNumberProps>,
    page: &LayoutSpec,
    rtl: bool,
) -> Result<String> {
    let mut xml = String::with_capacity(4096);

    xml.push_str(XML_DECLARATION);
    xml.push_str("<p:sldMaster");
    write_pml_namespaces(&mut xml)?;
    xml.push('>');

    xml.push_str("<p:cSld>");
    xml.push_str(SCHEME_BACKGROUND);
    let mut tree = ShapeTree::open(&mut xml, rtl);
    if let Some(props) = slide_number {
        tree.slide_number(props, page, SLIDE_NUMBER_FIELD_TEXT)?;
    }
    tree.close();
    xml.push_str("</p:cSld>");

    write!(xml, "<p:clrMap {}/>", CLR_MAP)?;

    xml.push_str("<p:sldLayoutIdLst>");
    for index in 0..layout_count {
        write!(
            xml,
            r#"<p:sldLayoutId id="{}" r:id="rId{}"/>"#,
            SLIDE_MASTER_ID as usize + index + 1,
            index + 1
        )?;
    }
    xml.push_str("</p:sldLayoutIdLst>");

    xml.push_str("<p:txStyles>");
    xml.push_str("<p:titleStyle>");
    write!(xml, r#"<a:lvl1pPr algn="l" rtl="{}">"#, u8::from(rtl))?;
    xml.push_str(r#"<a:defRPr sz="4400" kern="1200"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill>"#);
    xml.push_str(r#"<a:latin typeface="+mj-lt"/><a:ea typeface="+mj-ea"/><a:cs typeface="+mj-cs"/></a:defRPr>"#);
    xml.push_str("</a:lvl1pPr>");
    xml.push_str("</p:titleStyle>");
    xml.push_str("<p:bodyStyle>");
    write!(xml, r#"<a:lvl1pPr marL="0" algn="l" rtl="{}">"#, u8::from(rtl))?;
    xml.push_str(r#"<a:defRPr sz="2000" kern="1200"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill>"#);
    xml.push_str(r#"<a:latin typeface="+mn-lt"/><a:ea typeface="+mn-ea"/><a:cs typeface="+mn-cs"/></a:defRPr>"#);
    xml.push_str("</a:lvl1pPr>");
    xml.push_str("</p:bodyStyle>");
    xml.push_str("<p:otherStyle>");
    xml.push_str(r#"<a:defPPr><a:defRPr lang="en-US"/></a:defPPr>"#);
    xml.push_str("</p:otherStyle>");
    xml.push_str("</p:txStyles>");

    xml.push_str("</p:sldMaster>");

    Ok(xml)
}

/// Generate `slideMaster1.xml.rels`: every layout, then the theme.
pub(crate) fn master_rels_xml(layout_count: usize) -> String {
    let mut rels = Relationships::new();
    for number in 1..=layout_count {
        rels.push(rt::SLIDE_LAYOUT, format!("../slideLayouts/slideLayout{}.xml", number));
    }
    rels.push(rt::THEME, "../theme/theme1.xml");
    rels.to_xml()
}

/// Generate `notesMaster1.xml`.
pub(crate) fn notes_master_xml() -> Result<String> {
    let mut xml = String::with_capacity(1024);

    xml.push_str(XML_DECLARATION);
    xml.push_str("<p:notesMaster");
    write_pml_namespaces(&mut xml)?;
    xml.push('>');

    xml.push_str("<p:cSld>");
    xml.push_str(SCHEME_BACKGROUND);
    ShapeTree::open(&mut xml, false).close();
    xml.push_str("</p:cSld>");

    write!(xml, "<p:clrMap {}/>", CLR_MAP)?;
    xml.push_str("<p:notesStyle>");
    xml.push_str(r#"<a:lvl1pPr marL="0" algn="l" rtl="0"><a:defRPr sz="1200" kern="1200">"#);
    xml.push_str(r#"<a:solidFill><a:schemeClr val="tx1"/></a:solidFill>"#);
    xml.push_str(r#"<a:latin typeface="+mn-lt"/></a:defRPr></a:lvl1pPr>"#);
    xml.push_str("</p:notesStyle>");

    xml.push_str("</p:notesMaster>");

    Ok(xml)
}

/// Generate `notesMaster1.xml.rels`.
pub(crate) fn notes_master_rels_xml() -> String {
    let mut rels = Relationships::new();
    rels.add(1, rt::THEME, "../theme/theme1.xml");
    rels.to_xml()
}
