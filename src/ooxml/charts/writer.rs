//! Chart XML writer.
//!
//! Produces the `c:chartSpace` part for a [`NativeChart`]. Series data is
//! written both as a formula into the embedded workbook and as a cached copy,
//! so the chart renders without opening the workbook.

use crate::common::RGBColor;
use crate::common::xml::{XML_DECLARATION, escape_xml, xml_bool};
use crate::ooxml::charts::excel_embed::{SHEET_NAME, column_letter};
use crate::ooxml::charts::native::{ChartSeries, NativeChart, NativeChartKind};
use crate::ooxml::opc::constants::namespace;
use std::io::Write;

const CAT_AX_ID: u32 = 1;
const VAL_AX_ID: u32 = 2;

/// Write a chart to XML.
pub fn write_chart<W: Write>(writer: &mut W, chart: &NativeChart) -> std::io::Result<()> {
    write!(writer, "{}", XML_DECLARATION)?;
    write!(
        writer,
        r#"<c:chartSpace xmlns:c="{}" xmlns:a="{}" xmlns:r="{}">"#,
        namespace::DML_CHART,
        namespace::DML_MAIN,
        namespace::OFC_RELATIONSHIPS
    )?;

    write!(writer, r#"<c:date1904 val="0"/>"#)?;
    write!(writer, r#"<c:lang val="en-US"/>"#)?;
    write!(writer, r#"<c:roundedCorners val="0"/>"#)?;

    write!(writer, "<c:chart>")?;

    if let Some(ref title) = chart.options.title {
        write_title(writer, title)?;
    }
    write!(
        writer,
        r#"<c:autoTitleDeleted val="{}"/>"#,
        xml_bool(chart.options.title.is_none())
    )?;

    write_plot_area(writer, chart)?;

    if chart.options.show_legend {
        write_legend(writer)?;
    }

    write!(writer, r#"<c:plotVisOnly val="1"/>"#)?;
    write!(writer, r#"<c:dispBlanksAs val="gap"/>"#)?;
    write!(writer, "</c:chart>")?;

    write!(writer, r#"<c:externalData r:id="rId1">"#)?;
    write!(writer, r#"<c:autoUpdate val="0"/>"#)?;
    write!(writer, "</c:externalData>")?;

    write!(writer, "</c:chartSpace>")?;

    Ok(())
}

fn write_title<W: Write>(writer: &mut W, title: &str) -> std::io::Result<()> {
    write!(writer, "<c:title>")?;
    write!(writer, "<c:tx><c:rich>")?;
    write!(writer, "<a:bodyPr/><a:lstStyle/>")?;
    write!(writer, "<a:p><a:pPr><a:defRPr/></a:pPr>")?;
    write!(
        writer,
        r#"<a:r><a:rPr lang="en-US"/><a:t>{}</a:t></a:r>"#,
        escape_xml(title)
    )?;
    write!(writer, "</a:p></c:rich></c:tx>")?;
    write!(writer, r#"<c:overlay val="0"/>"#)?;
    write!(writer, "</c:title>")?;

    Ok(())
}

fn write_plot_area<W: Write>(writer: &mut W, chart: &NativeChart) -> std::io::Result<()> {
    write!(writer, "<c:plotArea>")?;
    write!(writer, "<c:layout/>")?;

    match chart.kind {
        NativeChartKind::Bar | NativeChartKind::Column => write_bar_chart(writer, chart)?,
        NativeChartKind::Line => write_line_chart(writer, chart)?,
        NativeChartKind::Area => write_area_chart(writer, chart)?,
        NativeChartKind::Pie => write_pie_chart(writer, chart)?,
        NativeChartKind::Doughnut => write_doughnut_chart(writer, chart)?,
    }

    if chart.kind.has_axes() {
        // Horizontal bars swap the axis positions.
        let (cat_pos, val_pos) = if chart.kind == NativeChartKind::Bar {
            ("l", "b")
        } else {
            ("b", "l")
        };
        write_category_axis(writer, cat_pos)?;
        write_value_axis(writer, val_pos, !chart.options.show_value_axis)?;
    }

    write!(writer, "</c:plotArea>")?;

    Ok(())
}

fn write_bar_chart<W: Write>(writer: &mut W, chart: &NativeChart) -> std::io::Result<()> {
    let direction = if chart.kind == NativeChartKind::Bar {
        "bar"
    } else {
        "col"
    };

    write!(writer, "<c:barChart>")?;
    write!(writer, r#"<c:barDir val="{}"/>"#, direction)?;
    write!(writer, r#"<c:grouping val="clustered"/>"#)?;
    write!(writer, r#"<c:varyColors val="0"/>"#)?;

    for (idx, series) in chart.series.iter().enumerate() {
        write_series(writer, chart, idx, series)?;
    }

    write_data_labels_default(writer)?;
    write!(writer, r#"<c:gapWidth val="{}"/>"#, chart.options.gap_width)?;
    write_axis_ids(writer)?;
    write!(writer, "</c:barChart>")?;

    Ok(())
}

fn write_line_chart<W: Write>(writer: &mut W, chart: &NativeChart) -> std::io::Result<()> {
    write!(writer, "<c:lineChart>")?;
    write!(writer, r#"<c:grouping val="standard"/>"#)?;
    write!(writer, r#"<c:varyColors val="0"/>"#)?;

    for (idx, series) in chart.series.iter().enumerate() {
        write_series(writer, chart, idx, series)?;
    }

    write_data_labels_default(writer)?;
    write!(writer, r#"<c:marker val="1"/>"#)?;
    write_axis_ids(writer)?;
    write!(writer, "</c:lineChart>")?;

    Ok(())
}

fn write_area_chart<W: Write>(writer: &mut W, chart: &NativeChart) -> std::io::Result<()> {
    write!(writer, "<c:areaChart>")?;
    write!(writer, r#"<c:grouping val="standard"/>"#)?;
    write!(writer, r#"<c:varyColors val="0"/>"#)?;

    for (idx, series) in chart.series.iter().enumerate() {
        write_series(writer, chart, idx, series)?;
    }

    write_data_labels_default(writer)?;
    write_axis_ids(writer)?;
    write!(writer, "</c:areaChart>")?;

    Ok(())
}

fn write_pie_chart<W: Write>(writer: &mut W, chart: &NativeChart) -> std::io::Result<()> {
    write!(writer, "<c:pieChart>")?;
    write!(writer, r#"<c:varyColors val="1"/>"#)?;

    for (idx, series) in chart.series.iter().enumerate() {
        write_series(writer, chart, idx, series)?;
    }

    write_data_labels_default(writer)?;
    write!(writer, r#"<c:firstSliceAng val="0"/>"#)?;
    write!(writer, "</c:pieChart>")?;

    Ok(())
}

fn write_doughnut_chart<W: Write>(writer: &mut W, chart: &NativeChart) -> std::io::Result<()> {
    write!(writer, "<c:doughnutChart>")?;
    write!(writer, r#"<c:varyColors val="1"/>"#)?;

    for (idx, series) in chart.series.iter().enumerate() {
        write_series(writer, chart, idx, series)?;
    }

    write_data_labels_default(writer)?;
    write!(writer, r#"<c:firstSliceAng val="0"/>"#)?;
    write!(
        writer,
        r#"<c:holeSize val="{}"/>"#,
        chart.options.hole_size.clamp(10, 90)
    )?;
    write!(writer, "</c:doughnutChart>")?;

    Ok(())
}

fn write_series<W: Write>(
    writer: &mut W,
    chart: &NativeChart,
    idx: usize,
    series: &ChartSeries,
) -> std::io::Result<()> {
    let column = column_letter(idx + 1);
    let colors = &chart.options.colors;
    let point_colored = !chart.kind.has_axes();

    write!(writer, "<c:ser>")?;
    write!(writer, r#"<c:idx val="{}"/>"#, idx)?;
    write!(writer, r#"<c:order val="{}"/>"#, idx)?;

    write!(writer, "<c:tx><c:strRef>")?;
    write!(writer, "<c:f>{}!${}$1</c:f>", SHEET_NAME, column)?;
    write!(writer, r#"<c:strCache><c:ptCount val="1"/>"#)?;
    write!(
        writer,
        r#"<c:pt idx="0"><c:v>{}</c:v></c:pt>"#,
        escape_xml(&series.name)
    )?;
    write!(writer, "</c:strCache></c:strRef></c:tx>")?;

    if !point_colored && let Some(color) = colors.get(idx) {
        write_series_shape(writer, chart.kind, *color)?;
    }

    if chart.kind == NativeChartKind::Bar || chart.kind == NativeChartKind::Column {
        write!(writer, r#"<c:invertIfNegative val="0"/>"#)?;
    }

    if chart.kind == NativeChartKind::Line {
        write!(writer, r#"<c:marker><c:symbol val="none"/></c:marker>"#)?;
    }

    if point_colored {
        for (point, color) in colors.iter().take(series.values.len()).enumerate() {
            write!(writer, "<c:dPt>")?;
            write!(writer, r#"<c:idx val="{}"/>"#, point)?;
            write!(writer, r#"<c:bubble3D val="0"/>"#)?;
            write!(
                writer,
                r#"<c:spPr><a:solidFill><a:srgbClr val="{}"/></a:solidFill></c:spPr>"#,
                color.to_hex()
            )?;
            write!(writer, "</c:dPt>")?;
        }
    }

    write_categories(writer, chart.categories(), chart.row_count())?;
    write_values(writer, &column, &series.values, chart.row_count())?;

    if chart.kind == NativeChartKind::Line {
        write!(writer, r#"<c:smooth val="0"/>"#)?;
    }

    write!(writer, "</c:ser>")?;

    Ok(())
}

fn write_series_shape<W: Write>(
    writer: &mut W,
    kind: NativeChartKind,
    color: RGBColor,
) -> std::io::Result<()> {
    write!(writer, "<c:spPr>")?;
    if kind == NativeChartKind::Line {
        write!(
            writer,
            r#"<a:ln w="28575" cap="rnd"><a:solidFill><a:srgbClr val="{}"/></a:solidFill></a:ln>"#,
            color.to_hex()
        )?;
    } else {
        write!(
            writer,
            r#"<a:solidFill><a:srgbClr val="{}"/></a:solidFill>"#,
            color.to_hex()
        )?;
    }
    write!(writer, "</c:spPr>")?;
    Ok(())
}

fn write_categories<W: Write>(
    writer: &mut W,
    categories: &[String],
    rows: usize,
) -> std::io::Result<()> {
    write!(writer, "<c:cat><c:strRef>")?;
    write!(writer, "<c:f>{}!$A$2:$A${}</c:f>", SHEET_NAME, rows + 1)?;
    write!(writer, "<c:strCache>")?;
    write!(writer, r#"<c:ptCount val="{}"/>"#, categories.len())?;
    for (i, val) in categories.iter().enumerate() {
        write!(
            writer,
            r#"<c:pt idx="{}"><c:v>{}</c:v></c:pt>"#,
            i,
            escape_xml(val)
        )?;
    }
    write!(writer, "</c:strCache>")?;
    write!(writer, "</c:strRef></c:cat>")?;
    Ok(())
}

fn write_values<W: Write>(
    writer: &mut W,
    column: &str,
    values: &[f64],
    rows: usize,
) -> std::io::Result<()> {
    write!(writer, "<c:val><c:numRef>")?;
    write!(
        writer,
        "<c:f>{}!${}$2:${}${}</c:f>",
        SHEET_NAME,
        column,
        column,
        rows + 1
    )?;
    write!(writer, "<c:numCache>")?;
    write!(writer, "<c:formatCode>General</c:formatCode>")?;
    write!(writer, r#"<c:ptCount val="{}"/>"#, values.len())?;
    for (i, val) in values.iter().enumerate() {
        write!(writer, r#"<c:pt idx="{}"><c:v>{}</c:v></c:pt>"#, i, val)?;
    }
    write!(writer, "</c:numCache>")?;
    write!(writer, "</c:numRef></c:val>")?;
    Ok(())
}

fn write_data_labels_default<W: Write>(writer: &mut W) -> std::io::Result<()> {
    write!(writer, "<c:dLbls>")?;
    write!(writer, r#"<c:showLegendKey val="0"/>"#)?;
    write!(writer, r#"<c:showVal val="0"/>"#)?;
    write!(writer, r#"<c:showCatName val="0"/>"#)?;
    write!(writer, r#"<c:showSerName val="0"/>"#)?;
    write!(writer, r#"<c:showPercent val="0"/>"#)?;
    write!(writer, r#"<c:showBubbleSize val="0"/>"#)?;
    write!(writer, "</c:dLbls>")?;
    Ok(())
}

fn write_axis_ids<W: Write>(writer: &mut W) -> std::io::Result<()> {
    write!(
        writer,
        r#"<c:axId val="{}"/><c:axId val="{}"/>"#,
        CAT_AX_ID, VAL_AX_ID
    )
}

fn write_axis_common<W: Write>(
    writer: &mut W,
    axis_id: u32,
    cross_axis_id: u32,
    position: &str,
    deleted: bool,
    gridlines: bool,
) -> std::io::Result<()> {
    write!(writer, r#"<c:axId val="{}"/>"#, axis_id)?;
    write!(writer, r#"<c:scaling><c:orientation val="minMax"/></c:scaling>"#)?;
    write!(writer, r#"<c:delete val="{}"/>"#, xml_bool(deleted))?;
    write!(writer, r#"<c:axPos val="{}"/>"#, position)?;
    if gridlines {
        write!(writer, "<c:majorGridlines/>")?;
    }
    write!(writer, r#"<c:numFmt formatCode="General" sourceLinked="1"/>"#)?;
    write!(writer, r#"<c:majorTickMark val="out"/>"#)?;
    write!(writer, r#"<c:minorTickMark val="none"/>"#)?;
    write!(writer, r#"<c:tickLblPos val="nextTo"/>"#)?;
    write!(writer, r#"<c:crossAx val="{}"/>"#, cross_axis_id)?;
    write!(writer, r#"<c:crosses val="autoZero"/>"#)?;
    Ok(())
}

fn write_category_axis<W: Write>(writer: &mut W, position: &str) -> std::io::Result<()> {
    write!(writer, "<c:catAx>")?;
    write_axis_common(writer, CAT_AX_ID, VAL_AX_ID, position, false, false)?;
    write!(writer, r#"<c:auto val="1"/>"#)?;
    write!(writer, r#"<c:lblAlgn val="ctr"/>"#)?;
    write!(writer, r#"<c:lblOffset val="100"/>"#)?;
    write!(writer, r#"<c:noMultiLvlLbl val="0"/>"#)?;
    write!(writer, "</c:catAx>")?;
    Ok(())
}

fn write_value_axis<W: Write>(writer: &mut W, position: &str, deleted: bool) -> std::io::Result<()> {
    write!(writer, "<c:valAx>")?;
    write_axis_common(writer, VAL_AX_ID, CAT_AX_ID, position, deleted, true)?;
    write!(writer, r#"<c:crossBetween val="between"/>"#)?;
    write!(writer, "</c:valAx>")?;
    Ok(())
}

fn write_legend<W: Write>(writer: &mut W) -> std::io::Result<()> {
    write!(writer, "<c:legend>")?;
    write!(writer, r#"<c:legendPos val="r"/>"#)?;
    write!(writer, r#"<c:overlay val="0"/>"#)?;
    write!(writer, "</c:legend>")?;
    Ok(())
}
