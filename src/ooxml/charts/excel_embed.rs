//! Excel workbook embedding for chart data.
//!
//! Generates a minimal XLSX file holding the data behind a native chart, so
//! the consuming application can open the chart's data for editing.

use crate::common::error::Result;
use crate::common::xml::{XML_DECLARATION, escape_xml};
use crate::ooxml::charts::native::NativeChart;
use crate::ooxml::opc::constants::{content_type as ct, namespace, relationship_type as rt};
use crate::ooxml::opc::phys_pkg::PhysPkgWriter;
use crate::ooxml::opc::rel::Relationships;
use std::fmt::Write;

/// Name of the only worksheet; chart formulas point at it.
pub const SHEET_NAME: &str = "Sheet1";

const SML_MAIN: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";

/// Generate a workbook containing the chart data.
///
/// # Example Layout
/// ```text
///     |    A     |    B     |    C     |
/// ----+----------+----------+----------+
///   1 |          | Series 1 | Series 2 |
///   2 | Cat 1    |   10.0   |   15.0   |
///   3 | Cat 2    |   20.0   |   25.0   |
/// ```
pub fn generate_chart_workbook(chart: &NativeChart) -> Result<Vec<u8>> {
    let mut writer = PhysPkgWriter::new(true);

    writer.write("[Content_Types].xml", generate_content_types().as_bytes())?;

    let mut root_rels = Relationships::new();
    root_rels.add(1, rt::OFFICE_DOCUMENT, "xl/workbook.xml");
    writer.write("_rels/.rels", root_rels.to_xml().as_bytes())?;

    writer.write("xl/workbook.xml", generate_workbook_xml().as_bytes())?;

    let mut workbook_rels = Relationships::new();
    workbook_rels.add(1, rt::WORKSHEET, "worksheets/sheet1.xml");
    workbook_rels.add(2, rt::STYLES, "styles.xml");
    writer.write("xl/_rels/workbook.xml.rels", workbook_rels.to_xml().as_bytes())?;

    let sheet = generate_worksheet_xml(chart)?;
    writer.write("xl/worksheets/sheet1.xml", sheet.as_bytes())?;
    writer.write("xl/styles.xml", generate_styles_xml().as_bytes())?;

    writer.finish_to_bytes()
}

fn generate_content_types() -> String {
    format!(
        concat!(
            "{decl}<Types xmlns=\"{ns}\">",
            "<Default Extension=\"rels\" ContentType=\"{rels}\"/>",
            "<Default Extension=\"xml\" ContentType=\"{xml}\"/>",
            "<Override PartName=\"/xl/workbook.xml\" ContentType=\"{main}\"/>",
            "<Override PartName=\"/xl/worksheets/sheet1.xml\" ContentType=\"{sheet}\"/>",
            "<Override PartName=\"/xl/styles.xml\" ContentType=\"{styles}\"/>",
            "</Types>"
        ),
        decl = XML_DECLARATION,
        ns = namespace::OPC_CONTENT_TYPES,
        rels = ct::OPC_RELATIONSHIPS,
        xml = ct::XML,
        main = ct::SML_SHEET_MAIN,
        sheet = ct::SML_WORKSHEET,
        styles = ct::SML_STYLES,
    )
}

fn generate_workbook_xml() -> String {
    format!(
        r#"{}<workbook xmlns="{}" xmlns:r="{}"><sheets><sheet name="{}" sheetId="1" r:id="rId1"/></sheets></workbook>"#,
        XML_DECLARATION,
        SML_MAIN,
        namespace::OFC_RELATIONSHIPS,
        SHEET_NAME
    )
}

fn generate_styles_xml() -> String {
    let mut xml = String::from(XML_DECLARATION);
    xml.push_str(r#"<styleSheet xmlns=""#);
    xml.push_str(SML_MAIN);
    xml.push_str(r#"">"#);
    xml.push_str(r#"<fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts>"#);
    xml.push_str(r#"<fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills>"#);
    xml.push_str(r#"<borders count="1"><border/></borders>"#);
    xml.push_str(r#"<cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>"#);
    xml.push_str(r#"<cellXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/></cellXfs>"#);
    xml.push_str("</styleSheet>");
    xml
}

/// Categories in column A, one series per following column, names in row 1.
fn generate_worksheet_xml(chart: &NativeChart) -> Result<String> {
    let mut xml = String::with_capacity(4096);

    xml.push_str(XML_DECLARATION);
    write!(xml, r#"<worksheet xmlns="{}"><sheetData>"#, SML_MAIN)?;

    xml.push_str(r#"<row r="1">"#);
    for (col_idx, series) in chart.series.iter().enumerate() {
        write!(
            xml,
            r#"<c r="{}1" t="inlineStr"><is><t>{}</t></is></c>"#,
            column_letter(col_idx + 1),
            escape_xml(&series.name)
        )?;
    }
    xml.push_str("</row>");

    let categories = chart.categories();
    for row_idx in 0..chart.row_count() {
        let row_num = row_idx + 2;
        write!(xml, r#"<row r="{}">"#, row_num)?;

        if let Some(category) = categories.get(row_idx) {
            write!(
                xml,
                r#"<c r="A{}" t="inlineStr"><is><t>{}</t></is></c>"#,
                row_num,
                escape_xml(category)
            )?;
        }

        for (col_idx, series) in chart.series.iter().enumerate() {
            if let Some(value) = series.values.get(row_idx) {
                write!(
                    xml,
                    r#"<c r="{}{}"><v>{}</v></c>"#,
                    column_letter(col_idx + 1),
                    row_num,
                    value
                )?;
            }
        }

        xml.push_str("</row>");
    }

    xml.push_str("</sheetData></worksheet>");
    Ok(xml)
}

/// Convert a 0-based column index to a column letter (0=A, 25=Z, 26=AA).
pub(crate) fn column_letter(col: usize) -> String {
    let mut result = String::new();
    let mut n = col;

    loop {
        result.insert(0, (b'A' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::charts::native::{ChartSeries, NativeChartKind};
    use std::io::Read;

    fn two_series() -> NativeChart {
        NativeChart::new(
            NativeChartKind::Bar,
            vec![
                ChartSeries::new("Sales", vec!["Q1".into(), "Q2".into()], vec![100.0, 200.0]),
                ChartSeries::new("R&D", Vec::new(), vec![50.0, 75.5]),
            ],
        )
    }

    #[test]
    fn test_column_letter() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(1), "B");
        assert_eq!(column_letter(25), "Z");
        assert_eq!(column_letter(26), "AA");
        assert_eq!(column_letter(27), "AB");
    }

    #[test]
    fn test_worksheet_layout() {
        let xml = generate_worksheet_xml(&two_series()).unwrap();
        assert!(xml.contains(r#"<c r="B1" t="inlineStr"><is><t>Sales</t></is></c>"#));
        assert!(xml.contains("R&amp;D"));
        assert!(xml.contains(r#"<c r="A3" t="inlineStr"><is><t>Q2</t></is></c>"#));
        assert!(xml.contains(r#"<c r="C3"><v>75.5</v></c>"#));
    }

    #[test]
    fn test_workbook_contains_sheet() {
        let bytes = generate_chart_workbook(&two_series()).unwrap();
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 6);
        let mut sheet = String::new();
        archive
            .by_name("xl/worksheets/sheet1.xml")
            .unwrap()
            .read_to_string(&mut sheet)
            .unwrap();
        assert!(sheet.contains("<sheetData>"));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn series_strategy() -> impl Strategy<Value = ChartSeries> {
            (
                "[a-zA-Z][a-zA-Z0-9 ]{0,20}",
                prop::collection::vec("[a-zA-Z0-9]{1,10}", 1..10),
                prop::collection::vec(-1000.0f64..1000.0f64, 1..10),
            )
                .prop_map(|(name, labels, values)| ChartSeries::new(name, labels, values))
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(64))]

            #[test]
            fn prop_workbook_is_valid_zip(series in prop::collection::vec(series_strategy(), 1..5)) {
                let chart = NativeChart::new(NativeChartKind::Line, series);
                let bytes = generate_chart_workbook(&chart).unwrap();
                prop_assert_eq!(&bytes[0..4], &[0x50, 0x4B, 0x03, 0x04]);
                prop_assert!(zip::ZipArchive::new(std::io::Cursor::new(bytes)).is_ok());
            }
        }
    }
}
