/// Theme part (`ppt/theme/theme1.xml`).
///
/// Colors follow the stock Office scheme; only the heading and body font
/// faces come from [`ThemeProps`].
use crate::common::config::ThemeProps;
use crate::common::error::Result;
use crate::common::xml::{XML_DECLARATION, escape_xml};
use crate::ooxml::opc::constants::namespace;
use std::fmt::Write as FmtWrite;

/// Scheme slot name and its RGB value.
const COLOR_SCHEME: [(&str, &str); 12] = [
    ("dk1", "000000"),
    ("lt1", "FFFFFF"),
    ("dk2", "44546A"),
    ("lt2", "E7E6E6"),
    ("accent1", "4472C4"),
    ("accent2", "ED7D31"),
    ("accent3", "A5A5A5"),
    ("accent4", "FFC000"),
    ("accent5", "5B9BD5"),
    ("accent6", "70AD47"),
    ("hlink", "0563C1"),
    ("folHlink", "954F72"),
];

const FILL_STYLES: &str = concat!(
    r#"<a:fillStyleLst>"#,
    r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
    r#"<a:gradFill rotWithShape="1"><a:gsLst><a:gs pos="0"><a:schemeClr val="phClr"><a:tint val="50000"/><a:satMod val="300000"/></a:schemeClr></a:gs><a:gs pos="100000"><a:schemeClr val="phClr"><a:tint val="15000"/><a:satMod val="350000"/></a:schemeClr></a:gs></a:gsLst><a:lin ang="16200000" scaled="1"/></a:gradFill>"#,
    r#"<a:gradFill rotWithShape="1"><a:gsLst><a:gs pos="0"><a:schemeClr val="phClr"><a:shade val="100000"/><a:satMod val="130000"/></a:schemeClr></a:gs><a:gs pos="100000"><a:schemeClr val="phClr"><a:shade val="100000"/><a:satMod val="350000"/></a:schemeClr></a:gs></a:gsLst><a:lin ang="16200000" scaled="0"/></a:gradFill>"#,
    r#"</a:fillStyleLst>"#,
);

const LINE_STYLES: &str = concat!(
    r#"<a:lnStyleLst>"#,
    r#"<a:ln w="9525" cap="flat" cmpd="sng" algn="ctr"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:prstDash val="solid"/></a:ln>"#,
    r#"<a:ln w="25400" cap="flat" cmpd="sng" algn="ctr"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:prstDash val="solid"/></a:ln>"#,
    r#"<a:ln w="38100" cap="flat" cmpd="sng" algn="ctr"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:prstDash val="solid"/></a:ln>"#,
    r#"</a:lnStyleLst>"#,
);

const EFFECT_STYLES: &str = concat!(
    r#"<a:effectStyleLst>"#,
    r#"<a:effectStyle><a:effectLst/></a:effectStyle>"#,
    r#"<a:effectStyle><a:effectLst/></a:effectStyle>"#,
    r#"<a:effectStyle><a:effectLst><a:outerShdw blurRad="57150" dist="19050" dir="5400000" algn="ctr" rotWithShape="0"><a:srgbClr val="000000"><a:alpha val="63000"/></a:srgbClr></a:outerShdw></a:effectLst></a:effectStyle>"#,
    r#"</a:effectStyleLst>"#,
);

const BACKGROUND_FILL_STYLES: &str = concat!(
    r#"<a:bgFillStyleLst>"#,
    r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
    r#"<a:solidFill><a:schemeClr val="phClr"><a:tint val="95000"/><a:satMod val="170000"/></a:schemeClr></a:solidFill>"#,
    r#"<a:gradFill rotWithShape="1"><a:gsLst><a:gs pos="0"><a:schemeClr val="phClr"><a:tint val="93000"/><a:satMod val="150000"/></a:schemeClr></a:gs><a:gs pos="100000"><a:schemeClr val="phClr"><a:shade val="63000"/><a:satMod val="120000"/></a:schemeClr></a:gs></a:gsLst><a:lin ang="5400000" scaled="0"/></a:gradFill>"#,
    r#"</a:bgFillStyleLst>"#,
);

fn write_font(xml: &mut String, tag: &str, face: &str) -> Result<()> {
    write!(xml, "<a:{}>", tag)?;
    write!(xml, r#"<a:latin typeface="{}"/>"#, escape_xml(face))?;
    xml.push_str(r#"<a:ea typeface=""/><a:cs typeface=""/>"#);
    write!(xml, "</a:{}>", tag)?;
    Ok(())
}

/// Generate `theme1.xml`.
pub(crate) fn theme_xml(theme: &ThemeProps) -> Result<String> {
    let mut xml = String::with_capacity(4096);

    xml.push_str(XML_DECLARATION);
    write!(xml, r#"<a:theme xmlns:a="{}" name="Office Theme">"#, namespace::DML_MAIN)?;
    xml.push_str("<a:themeElements>");

    xml.push_str(r#"<a:clrScheme name="Office">"#);
    for (slot, rgb) in COLOR_SCHEME {
        write!(xml, r#"<a:{0}><a:srgbClr val="{1}"/></a:{0}>"#, slot, rgb)?;
    }
    xml.push_str("</a:clrScheme>");

    xml.push_str(r#"<a:fontScheme name="Office">"#);
    write_font(&mut xml, "majorFont", &theme.head_font_face)?;
    write_font(&mut xml, "minorFont", &theme.body_font_face)?;
    xml.push_str("</a:fontScheme>");

    xml.push_str(r#"<a:fmtScheme name="Office">"#);
    xml.push_str(FILL_STYLES);
    xml.push_str(LINE_STYLES);
    xml.push_str(EFFECT_STYLES);
    xml.push_str(BACKGROUND_FILL_STYLES);
    xml.push_str("</a:fmtScheme>");

    xml.push_str("</a:themeElements>");
    xml.push_str("<a:objectDefaults/>");
    xml.push_str("<a:extraClrSchemeLst/>");
    xml.push_str("</a:theme>");

    Ok(xml)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_fonts() {
        let theme = ThemeProps {
            head_font_face: "Georgia".into(),
            body_font_face: "Segoe \"UI\"".into(),
        };
        let xml = theme_xml(&theme).unwrap();
        assert!(xml.contains(r#"<a:majorFont><a:latin typeface="Georgia"/>"#));
        assert!(xml.contains(r#"<a:minorFont><a:latin typeface="Segoe &quot;UI&quot;"/>"#));
        assert!(xml.contains(r#"<a:accent6><a:srgbClr val="70AD47"/></a:accent6>"#));
        assert_eq!(xml.matches("<a:effectStyle>").count(), 3);
    }
}
