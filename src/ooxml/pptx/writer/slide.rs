/// Slide and notes slide parts.
use super::shape::{ShapeTree, write_background};
use crate::common::error::Result;
use crate::common::xml::{XML_DECLARATION, escape_xml};
use crate::ooxml::opc::constants::{namespace, relationship_type as rt};
use crate::ooxml::opc::rel::Relationships;
use crate::ooxml::pptx::slide::{Canvas, Slide};
use std::fmt::Write as FmtWrite;

/// Open tag attributes shared by every PresentationML part.
pub(crate) fn write_pml_namespaces(xml: &mut String) -> Result<()> {
    write!(
        xml,
        r#" xmlns:a="{}" xmlns:r="{}" xmlns:p="{}""#,
        namespace::DML_MAIN,
        namespace::OFC_RELATIONSHIPS,
        namespace::PML_MAIN
    )?;
    Ok(())
}

/// Add the media and chart relationships of `canvas`.
///
/// # Arguments
/// * `chart_numbers` - Global chart number of each entry in `canvas.charts()`
pub(crate) fn add_canvas_rels(rels: &mut Relationships, canvas: &Canvas, chart_numbers: &[usize]) {
    for media in canvas.media() {
        rels.add(media.r_id, rt::IMAGE, format!("../media/{}", media.target));
    }
    for (chart, number) in canvas.charts().iter().zip(chart_numbers) {
        rels.add(chart.r_id, rt::CHART, format!("../charts/chart{}.xml", number));
    }
}

/// Generate `slideN.xml`.
pub(crate) fn slide_xml(slide: &Slide, rtl: bool) -> Result<String> {
    let mut xml = String::with_capacity(4096);

    xml.push_str(XML_DECLARATION);
    xml.push_str("<p:sld");
    write_pml_namespaces(&mut xml)?;
    if slide.is_hidden() {
        xml.push_str(r#" show="0""#);
    }
    xml.push('>');

    write!(xml, r#"<p:cSld name="Slide {}">"#, slide.number())?;
    write_background(&mut xml, slide.canvas().background())?;

    let mut tree = ShapeTree::open(&mut xml, rtl);
    tree.objects(slide.objects())?;
    if let Some(props) = slide.slide_number() {
        tree.slide_number(props, slide.layout(), &slide.number().to_string())?;
    }
    tree.close();

    xml.push_str("</p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
    xml.push_str("</p:sld>");

    Ok(xml)
}

/// Generate `slideN.xml.rels`: layout, notes slide, then object targets.
pub(crate) fn slide_rels_xml(slide: &Slide, chart_numbers: &[usize]) -> String {
    let mut rels = Relationships::new();
    rels.add(
        1,
        rt::SLIDE_LAYOUT,
        format!("../slideLayouts/slideLayout{}.xml", slide.layout_index() + 1),
    );
    rels.add(
        2,
        rt::NOTES_SLIDE,
        format!("../notesSlides/notesSlide{}.xml", slide.number()),
    );
    add_canvas_rels(&mut rels, slide.canvas(), chart_numbers);
    rels.to_xml()
}

/// Generate `notesSlideN.xml`. Every slide gets one, notes or not.
pub(crate) fn notes_xml(slide: &Slide) -> Result<String> {
    let mut xml = String::with_capacity(2048);

    xml.push_str(XML_DECLARATION);
    xml.push_str("<p:notes");
    write_pml_namespaces(&mut xml)?;
    xml.push('>');
    let mut placeholders = String::with_capacity(1024);
    placeholders.push_str("<p:sp>");
    placeholders.push_str("<p:nvSpPr>");
    placeholders.push_str(r#"<p:cNvPr id="2" name="Slide Image Placeholder 1"/>"#);
    placeholders.push_str(r#"<p:cNvSpPr><a:spLocks noGrp="1" noRot="1" noChangeAspect="1"/></p:cNvSpPr>"#);
    placeholders.push_str(r#"<p:nvPr><p:ph type="sldImg"/></p:nvPr>"#);
    placeholders.push_str("</p:nvSpPr>");
    placeholders.push_str("<p:spPr/>");
    placeholders.push_str("</p:sp>");

    placeholders.push_str("<p:sp>");
    placeholders.push_str("<p:nvSpPr>");
    placeholders.push_str(r#"<p:cNvPr id="3" name="Notes Placeholder 2"/>"#);
    placeholders.push_str(r#"<p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr>"#);
    placeholders.push_str(r#"<p:nvPr><p:ph type="body" idx="1"/></p:nvPr>"#);
    placeholders.push_str("</p:nvSpPr>");
    placeholders.push_str("<p:spPr/>");
    placeholders.push_str("<p:txBody>");
    placeholders.push_str("<a:bodyPr/>");
    placeholders.push_str("<a:lstStyle/>");
    for line in slide.notes().split('\n') {
        placeholders.push_str("<a:p>");
        if !line.is_empty() {
            placeholders.push_str(r#"<a:r><a:rPr lang="en-US" dirty="0"/>"#);
            write!(placeholders, "<a:t>{}</a:t>", escape_xml(line))?;
            placeholders.push_str("</a:r>");
        }
        placeholders.push_str(r#"<a:endParaRPr lang="en-US" dirty="0"/>"#);
        placeholders.push_str("</a:p>");
    }
    placeholders.push_str("</p:txBody>");
    placeholders.push_str("</p:sp>");

    xml.push_str("<p:cSld>");
    let mut tree = ShapeTree::open(&mut xml, false);
    tree.push_raw(&placeholders);
    tree.close();
    xml.push_str("</p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
    xml.push_str("</p:notes>");

    Ok(xml)
}

/// Generate `notesSlideN.xml.rels`.
pub(crate) fn notes_rels_xml(slide: &Slide) -> String {
    let mut rels = Relationships::new();
    rels.add(1, rt::NOTES_MASTER, "../notesMasters/notesMaster1.xml");
    rels.add(2, rt::SLIDE, format!("../slides/slide{}.xml", slide.number()));
    rels.to_xml()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::RGBColor;
    use crate::ooxml::charts::native::{ChartSeries, NativeChart, NativeChartKind};
    use crate::ooxml::charts::palette::{FixedPalette, shared};
    use crate::ooxml::pptx::layout::LayoutSpec;
    use crate::ooxml::pptx::master::SlideNumberProps;
    use crate::ooxml::pptx::media::MediaSource;
    use crate::ooxml::pptx::objects::{ImageProps, Position, TextProps};
    use crate::ooxml::pptx::slide::Chart;

    fn slide(number: u32) -> Slide {
        Slide::new(
            number,
            LayoutSpec::new("screen16x9", 9_144_000, 5_143_500),
            1,
            None,
            shared(FixedPalette::new(vec![RGBColor::WHITE])),
        )
    }

    #[test]
    fn test_slide_xml() {
        let mut slide = slide(3);
        slide
            .add_text("Title", TextProps::default())
            .set_background_color(RGBColor::new(0xE0, 0xE9, 0xFD))
            .set_slide_number(SlideNumberProps::default())
            .set_hidden(true);

        let xml = slide_xml(&slide, false).unwrap();
        assert!(xml.starts_with(XML_DECLARATION));
        assert!(xml.contains(r#" show="0""#));
        assert!(xml.contains(r#"<a:srgbClr val="E0E9FD"/>"#));
        assert!(xml.contains("<a:t>Title</a:t>"));
        assert!(xml.contains(r#"type="sldNum""#));
        assert!(xml.contains("<a:t>3</a:t>"));
        assert!(xml.find("<p:bg>").unwrap() < xml.find("<p:spTree>").unwrap());
    }

    #[test]
    fn test_slide_rels() {
        let mut slide = slide(2);
        slide.add_image(ImageProps::new(MediaSource::path("a.png"), Position::default()));
        slide
            .add_chart(Chart::Native {
                chart: NativeChart::new(
                    NativeChartKind::Bar,
                    vec![ChartSeries::new("s", vec!["a".into()], vec![1.0])],
                ),
                position: Position::default(),
            })
            .unwrap();

        let xml = slide_rels_xml(&slide, &[7]);
        assert!(xml.contains(r#"Id="rId1""#));
        assert!(xml.contains("../slideLayouts/slideLayout2.xml"));
        assert!(xml.contains("../notesSlides/notesSlide2.xml"));
        assert!(xml.contains(r#"Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="../media/image-2-1.png""#));
        assert!(xml.contains("../charts/chart7.xml"));
    }

    #[test]
    fn test_notes_always_written() {
        let mut slide = slide(1);
        let empty = notes_xml(&slide).unwrap();
        assert!(empty.contains(r#"<p:ph type="body" idx="1"/>"#));
        assert!(empty.ends_with("</p:notes>"));

        slide.add_notes("first <point>").add_notes("second");
        let xml = notes_xml(&slide).unwrap();
        assert!(xml.contains("first &lt;point&gt;"));
        assert_eq!(xml.matches("<a:p>").count(), 2);
        assert!(notes_rels_xml(&slide).contains("../slides/slide1.xml"));
    }
}
