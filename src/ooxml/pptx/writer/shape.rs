/// Shape tree serialization for slides, layouts and the master.
use crate::common::RGBColor;
use crate::common::error::Result;
use crate::common::unit::{EMUS_PER_PT, pt_to_centipoints, pt_to_emu_f64};
use crate::common::xml::escape_xml;
use crate::ooxml::charts::primitive::TextAlign;
use crate::ooxml::opc::constants::namespace;
use crate::ooxml::pptx::layout::LayoutSpec;
use crate::ooxml::pptx::master::{SLIDE_NUMBER_IDX, SlideNumberProps};
use crate::ooxml::pptx::objects::{
    BackgroundFill, EmuRect, ImageProps, ShapeKind, ShapeProps, SlideObject, TableObject,
    TextProps,
};
use std::fmt::Write as FmtWrite;

const TABLE_URI: &str = "http://schemas.openxmlformats.org/drawingml/2006/table";
const SLIDE_NUMBER_FIELD_ID: &str = "{F7021451-1387-4CA6-816F-3879F97B5CBC}";
const DEFAULT_BORDER: RGBColor = RGBColor::new(0x66, 0x66, 0x66);

fn algn(align: TextAlign) -> &'static str {
    match align {
        TextAlign::Left => "l",
        TextAlign::Center => "ctr",
        TextAlign::Right => "r",
    }
}

/// Write `<a:solidFill>` for `color`.
pub(crate) fn write_solid_fill(xml: &mut String, color: RGBColor) -> Result<()> {
    write!(xml, r#"<a:solidFill><a:srgbClr val="{}"/></a:solidFill>"#, color.to_hex())?;
    Ok(())
}

fn write_xfrm(xml: &mut String, frame: &EmuRect, rotation: f64) -> Result<()> {
    let rot = (rotation * 60_000.0).round() as i64;
    if rot != 0 {
        write!(xml, r#"<a:xfrm rot="{}">"#, rot)?;
    } else {
        xml.push_str("<a:xfrm>");
    }
    write!(xml, r#"<a:off x="{}" y="{}"/>"#, frame.x, frame.y)?;
    write!(xml, r#"<a:ext cx="{}" cy="{}"/>"#, frame.cx, frame.cy)?;
    xml.push_str("</a:xfrm>");
    Ok(())
}

/// Write the `p:bg` element of a slide or layout.
pub(crate) fn write_background(xml: &mut String, background: Option<&BackgroundFill>) -> Result<()> {
    let Some(background) = background else {
        return Ok(());
    };
    xml.push_str("<p:bg><p:bgPr>");
    match background {
        BackgroundFill::Color(color) => write_solid_fill(xml, *color)?,
        BackgroundFill::Image { r_id } => {
            xml.push_str(r#"<a:blipFill dpi="0" rotWithShape="1">"#);
            write!(xml, r#"<a:blip r:embed="rId{}"/>"#, r_id)?;
            xml.push_str("<a:srcRect/><a:stretch><a:fillRect/></a:stretch>");
            xml.push_str("</a:blipFill>");
        },
    }
    xml.push_str("<a:effectLst/>");
    xml.push_str("</p:bgPr></p:bg>");
    Ok(())
}

/// Run properties shared by text boxes, shape text and table cells.
#[derive(Debug, Clone, Copy, Default)]
struct RunStyle<'a> {
    font_face: Option<&'a str>,
    font_size: Option<f64>,
    bold: bool,
    italic: bool,
    underline: bool,
    color: Option<RGBColor>,
}

impl<'a> RunStyle<'a> {
    fn from_text_props(props: &'a TextProps) -> Self {
        Self {
            font_face: props.font_face.as_deref(),
            font_size: props.font_size,
            bold: props.bold,
            italic: props.italic,
            underline: props.underline,
            color: props.color,
        }
    }

    fn write(&self, xml: &mut String, tag: &str) -> Result<()> {
        write!(xml, r#"<a:{} lang="en-US""#, tag)?;
        if let Some(size) = self.font_size {
            write!(xml, r#" sz="{}""#, pt_to_centipoints(size))?;
        }
        if self.bold {
            xml.push_str(r#" b="1""#);
        }
        if self.italic {
            xml.push_str(r#" i="1""#);
        }
        if self.underline {
            xml.push_str(r#" u="sng""#);
        }
        xml.push_str(r#" dirty="0""#);

        if self.color.is_none() && self.font_face.is_none() {
            xml.push_str("/>");
            return Ok(());
        }
        xml.push('>');
        if let Some(color) = self.color {
            write_solid_fill(xml, color)?;
        }
        if let Some(face) = self.font_face {
            write!(xml, r#"<a:latin typeface="{}"/>"#, escape_xml(face))?;
            write!(xml, r#"<a:cs typeface="{}"/>"#, escape_xml(face))?;
        }
        write!(xml, "</a:{}>", tag)?;
        Ok(())
    }
}

/// Write one `a:p` per line of `text`.
fn write_paragraphs(xml: &mut String, text: &str, align: TextAlign, rtl: bool, run: &RunStyle<'_>) -> Result<()> {
    for line in text.split('\n') {
        xml.push_str("<a:p>");
        write!(xml, r#"<a:pPr algn="{}""#, algn(align))?;
        if rtl {
            xml.push_str(r#" rtl="1""#);
        }
        xml.push_str("/>");
        if !line.is_empty() {
            xml.push_str("<a:r>");
            run.write(xml, "rPr")?;
            write!(xml, "<a:t>{}</a:t>", escape_xml(line))?;
            xml.push_str("</a:r>");
        }
        run.write(xml, "endParaRPr")?;
        xml.push_str("</a:p>");
    }
    Ok(())
}

fn write_text_body(xml: &mut String, text: &str, props: &TextProps, rtl: bool) -> Result<()> {
    xml.push_str("<p:txBody>");
    xml.push_str(r#"<a:bodyPr wrap="square""#);
    if let Some(margin) = props.margin {
        let [l, t, r, b] = margin.insets_emu();
        write!(xml, r#" lIns="{}" tIns="{}" rIns="{}" bIns="{}""#, l, t, r, b)?;
    }
    write!(xml, r#" rtlCol="{}" anchor="{}"/>"#, u8::from(rtl), props.valign.xml_value())?;
    xml.push_str("<a:lstStyle/>");
    write_paragraphs(xml, text, props.align, rtl, &RunStyle::from_text_props(props))?;
    xml.push_str("</p:txBody>");
    Ok(())
}

/// Writes the `p:spTree` of one part, numbering shapes as it goes.
pub(crate) struct ShapeTree<'a> {
    xml: &'a mut String,
    next_id: u32,
    rtl: bool,
}

impl<'a> ShapeTree<'a> {
    /// Open the tree and write the group shape properties.
    pub(crate) fn open(xml: &'a mut String, rtl: bool) -> Self {
        xml.push_str("<p:spTree>");
        xml.push_str("<p:nvGrpSpPr>");
        xml.push_str(r#"<p:cNvPr id="1" name=""/>"#);
        xml.push_str("<p:cNvGrpSpPr/>");
        xml.push_str("<p:nvPr/>");
        xml.push_str("</p:nvGrpSpPr>");
        xml.push_str("<p:grpSpPr>");
        xml.push_str(r#"<a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/>"#);
        xml.push_str(r#"<a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm>"#);
        xml.push_str("</p:grpSpPr>");
        Self {
            xml,
            next_id: 2,
            rtl,
        }
    }

    pub(crate) fn close(self) {
        self.xml.push_str("</p:spTree>");
    }

    /// Append pre-built shape XML whose ids start at 2.
    pub(crate) fn push_raw(&mut self, fragment: &str) {
        self.xml.push_str(fragment);
    }

    fn allocate_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub(crate) fn objects(&mut self, objects: &[SlideObject]) -> Result<()> {
        for object in objects {
            self.object(object)?;
        }
        Ok(())
    }

    pub(crate) fn object(&mut self, object: &SlideObject) -> Result<()> {
        match object {
            SlideObject::Text { text, props, frame } => self.text_box(text, props, frame),
            SlideObject::Shape { kind, props, frame } => self.shape(*kind, props, frame),
            SlideObject::Image { props, frame, r_id } => self.picture(props, frame, *r_id),
            SlideObject::Table(table) => self.table(table),
            SlideObject::Chart { frame, r_id, title } => self.chart_frame(frame, *r_id, title.as_deref()),
        }
    }

    fn text_box(&mut self, text: &str, props: &TextProps, frame: &EmuRect) -> Result<()> {
        let id = self.allocate_id();
        let xml = &mut *self.xml;

        xml.push_str("<p:sp>");
        xml.push_str("<p:nvSpPr>");
        write!(xml, r#"<p:cNvPr id="{}" name="Text {}"/>"#, id, id - 1)?;
        xml.push_str(r#"<p:cNvSpPr txBox="1"/>"#);
        xml.push_str("<p:nvPr/>");
        xml.push_str("</p:nvSpPr>");

        xml.push_str("<p:spPr>");
        write_xfrm(xml, frame, 0.0)?;
        xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#);
        match props.fill {
            Some(fill) => write_solid_fill(xml, fill)?,
            None => xml.push_str("<a:noFill/>"),
        }
        xml.push_str("</p:spPr>");

        write_text_body(xml, text, props, self.rtl)?;
        xml.push_str("</p:sp>");
        Ok(())
    }

    fn shape(&mut self, kind: ShapeKind, props: &ShapeProps, frame: &EmuRect) -> Result<()> {
        let id = self.allocate_id();
        let xml = &mut *self.xml;

        xml.push_str("<p:sp>");
        xml.push_str("<p:nvSpPr>");
        write!(xml, r#"<p:cNvPr id="{}" name="{} {}"/>"#, id, kind.preset(), id - 1)?;
        xml.push_str("<p:cNvSpPr/>");
        xml.push_str("<p:nvPr/>");
        xml.push_str("</p:nvSpPr>");

        xml.push_str("<p:spPr>");
        write_xfrm(xml, frame, props.rotation)?;
        write!(xml, r#"<a:prstGeom prst="{}"><a:avLst/></a:prstGeom>"#, kind.preset())?;
        match props.fill {
            Some(fill) if kind != ShapeKind::Line => write_solid_fill(xml, fill)?,
            _ => xml.push_str("<a:noFill/>"),
        }
        if props.line.is_some() || props.line_width.is_some() {
            let width = props.line_width.map_or(EMUS_PER_PT, pt_to_emu_f64);
            write!(xml, r#"<a:ln w="{}">"#, width)?;
            write_solid_fill(xml, props.line.unwrap_or(RGBColor::BLACK))?;
            xml.push_str("</a:ln>");
        }
        xml.push_str("</p:spPr>");

        if let Some(text) = props.text.as_deref() {
            write_text_body(xml, text, &props.text_props, self.rtl)?;
        }
        xml.push_str("</p:sp>");
        Ok(())
    }

    fn picture(&mut self, props: &ImageProps, frame: &EmuRect, r_id: u32) -> Result<()> {
        let id = self.allocate_id();
        let xml = &mut *self.xml;

        xml.push_str("<p:pic>");
        xml.push_str("<p:nvPicPr>");
        write!(
            xml,
            r#"<p:cNvPr id="{}" name="Picture {}" descr="{}"/>"#,
            id,
            id - 1,
            escape_xml(props.alt_text.as_deref().unwrap_or(""))
        )?;
        xml.push_str(r#"<p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr>"#);
        xml.push_str("<p:nvPr/>");
        xml.push_str("</p:nvPicPr>");

        xml.push_str("<p:blipFill>");
        write!(xml, r#"<a:blip r:embed="rId{}"/>"#, r_id)?;
        xml.push_str("<a:stretch><a:fillRect/></a:stretch>");
        xml.push_str("</p:blipFill>");

        xml.push_str("<p:spPr>");
        write_xfrm(xml, frame, 0.0)?;
        xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#);
        xml.push_str("</p:spPr>");
        xml.push_str("</p:pic>");
        Ok(())
    }

    fn graphic_frame_start(&mut self, name: &str, frame: &EmuRect, locks: &str) -> Result<u32> {
        let id = self.allocate_id();
        let xml = &mut *self.xml;

        xml.push_str("<p:graphicFrame>");
        xml.push_str("<p:nvGraphicFramePr>");
        write!(xml, r#"<p:cNvPr id="{}" name="{} {}"/>"#, id, name, id - 1)?;
        write!(xml, "<p:cNvGraphicFramePr>{}</p:cNvGraphicFramePr>", locks)?;
        xml.push_str("<p:nvPr/>");
        xml.push_str("</p:nvGraphicFramePr>");
        write!(
            xml,
            r#"<p:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></p:xfrm>"#,
            frame.x, frame.y, frame.cx, frame.cy
        )?;
        Ok(id)
    }

    fn table(&mut self, table: &TableObject) -> Result<()> {
        self.graphic_frame_start("Table", &table.frame, r#"<a:graphicFrameLocks noGrp="1"/>"#)?;
        let rtl = self.rtl;
        let xml = &mut *self.xml;

        write!(xml, r#"<a:graphic><a:graphicData uri="{}">"#, TABLE_URI)?;
        xml.push_str(r#"<a:tbl><a:tblPr firstRow="1" bandRow="1"/>"#);

        let widths = table.column_widths();
        xml.push_str("<a:tblGrid>");
        for width in &widths {
            write!(xml, r#"<a:gridCol w="{}"/>"#, width)?;
        }
        xml.push_str("</a:tblGrid>");

        let row_height = table.props.row_height_emu();
        let border = table.props.border_color.unwrap_or(DEFAULT_BORDER);
        let empty = Default::default();

        for (row_index, row) in table.rows.iter().enumerate() {
            let row_style = table.row_styles.get(row_index).copied().unwrap_or_default();
            write!(xml, r#"<a:tr h="{}">"#, row_height)?;

            for col in 0..widths.len() {
                let cell = row.get(col).unwrap_or(&empty);
                let style = row_style.merged(&cell.style);
                let run = RunStyle {
                    font_face: table.props.font_face.as_deref(),
                    font_size: style.font_size.or(table.props.font_size),
                    bold: style.bold.unwrap_or(false),
                    color: style.color.or(table.props.color),
                    ..Default::default()
                };

                xml.push_str("<a:tc>");
                xml.push_str("<a:txBody><a:bodyPr/><a:lstStyle/>");
                write_paragraphs(xml, &cell.text, style.align.unwrap_or_default(), rtl, &run)?;
                xml.push_str("</a:txBody>");

                xml.push_str(r#"<a:tcPr anchor="ctr">"#);
                for side in ["lnL", "lnR", "lnT", "lnB"] {
                    write!(xml, r#"<a:{} w="{}">"#, side, EMUS_PER_PT)?;
                    write_solid_fill(xml, border)?;
                    write!(xml, "</a:{}>", side)?;
                }
                if let Some(fill) = style.fill.or(table.props.fill) {
                    write_solid_fill(xml, fill)?;
                }
                xml.push_str("</a:tcPr>");
                xml.push_str("</a:tc>");
            }
            xml.push_str("</a:tr>");
        }

        xml.push_str("</a:tbl>");
        xml.push_str("</a:graphicData></a:graphic>");
        xml.push_str("</p:graphicFrame>");
        Ok(())
    }

    fn chart_frame(&mut self, frame: &EmuRect, r_id: u32, title: Option<&str>) -> Result<()> {
        let id = self.graphic_frame_start("Chart", frame, "")?;
        let xml = &mut *self.xml;

        write!(xml, r#"<a:graphic><a:graphicData uri="{}">"#, namespace::DML_CHART)?;
        write!(
            xml,
            r#"<c:chart xmlns:c="{}" xmlns:r="{}" r:id="rId{}"/>"#,
            namespace::DML_CHART,
            namespace::OFC_RELATIONSHIPS,
            r_id
        )?;
        xml.push_str("</a:graphicData></a:graphic>");
        xml.push_str("</p:graphicFrame>");

        log::trace!(shape = id; "Chart frame {}", title.unwrap_or(""));
        Ok(())
    }

    /// Write the `sldNum` placeholder.
    ///
    /// # Arguments
    /// * `text` - Cached field text: the slide number, or `‹#›` on masters
    ///   and layouts
    pub(crate) fn slide_number(&mut self, props: &SlideNumberProps, page: &LayoutSpec, text: &str) -> Result<()> {
        let id = self.allocate_id();
        let frame = props.position.resolve(page);
        let xml = &mut *self.xml;

        xml.push_str("<p:sp>");
        xml.push_str("<p:nvSpPr>");
        write!(xml, r#"<p:cNvPr id="{}" name="Slide Number Placeholder {}"/>"#, id, id - 1)?;
        xml.push_str(r#"<p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr>"#);
        write!(xml, r#"<p:nvPr><p:ph type="sldNum" sz="quarter" idx="{}"/></p:nvPr>"#, SLIDE_NUMBER_IDX)?;
        xml.push_str("</p:nvSpPr>");

        xml.push_str("<p:spPr>");
        write_xfrm(xml, &frame, 0.0)?;
        xml.push_str("</p:spPr>");

        let run = RunStyle {
            font_face: props.font_face.as_deref(),
            font_size: props.font_size,
            color: props.color,
            ..Default::default()
        };
        xml.push_str("<p:txBody>");
        xml.push_str(r#"<a:bodyPr/>"#);
        xml.push_str("<a:lstStyle><a:lvl1pPr>");
        run.write(xml, "defRPr")?;
        xml.push_str("</a:lvl1pPr></a:lstStyle>");
        xml.push_str("<a:p>");
        write!(xml, r#"<a:fld id="{}" type="slidenum">"#, SLIDE_NUMBER_FIELD_ID)?;
        run.write(xml, "rPr")?;
        write!(xml, "<a:t>{}</a:t>", escape_xml(text))?;
        xml.push_str("</a:fld>");
        xml.push_str(r#"<a:endParaRPr lang="en-US"/>"#);
        xml.push_str("</a:p>");
        xml.push_str("</p:txBody>");
        xml.push_str("</p:sp>");
        Ok(())
    }
}
