//! Native (DrawingML) charts.
//!
//! Unlike funnels and waterfalls, these are stored as real chart parts with
//! an embedded workbook holding the data, so the consuming application can
//! edit them.

use crate::common::RGBColor;
use crate::common::error::{Error, Result};
use crate::ooxml::charts::{excel_embed, writer};

/// Chart kinds the default encoder knows how to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NativeChartKind {
    /// Horizontal bars
    Bar,
    /// Vertical bars
    #[default]
    Column,
    Line,
    Area,
    Pie,
    Doughnut,
}

impl NativeChartKind {
    /// Pie and doughnut charts have no axes.
    pub fn has_axes(self) -> bool {
        !matches!(self, Self::Pie | Self::Doughnut)
    }
}

/// One named data series.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartSeries {
    pub name: String,
    /// Category labels; only the first series' labels are written
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartSeries {
    pub fn new(name: impl Into<String>, labels: Vec<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            labels,
            values,
        }
    }
}

/// Presentation options for a native chart.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeChartOptions {
    pub title: Option<String>,
    pub show_legend: bool,
    /// Series colors (points, for pie and doughnut). Missing entries fall
    /// back to the application theme.
    pub colors: Vec<RGBColor>,
    /// Space between bar clusters, in percent of a bar width
    pub gap_width: u32,
    /// Doughnut hole size, in percent
    pub hole_size: u32,
    pub show_value_axis: bool,
}

impl Default for NativeChartOptions {
    fn default() -> Self {
        Self {
            title: None,
            show_legend: false,
            colors: Vec::new(),
            gap_width: 150,
            hole_size: 50,
            show_value_axis: true,
        }
    }
}

/// Chart data plus options.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NativeChart {
    pub kind: NativeChartKind,
    pub series: Vec<ChartSeries>,
    pub options: NativeChartOptions,
}

impl NativeChart {
    pub fn new(kind: NativeChartKind, series: Vec<ChartSeries>) -> Self {
        Self {
            kind,
            series,
            options: NativeChartOptions::default(),
        }
    }

    pub fn with_options(mut self, options: NativeChartOptions) -> Self {
        self.options = options;
        self
    }

    /// Category labels used for every series.
    pub fn categories(&self) -> &[String] {
        self.series
            .first()
            .map(|s| s.labels.as_slice())
            .unwrap_or(&[])
    }

    /// Number of data rows in the embedded sheet.
    pub fn row_count(&self) -> usize {
        self.series
            .iter()
            .map(|s| s.values.len().max(s.labels.len()))
            .max()
            .unwrap_or(0)
    }
}

/// Output of a chart encoder: the chart part and its data workbook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedChart {
    pub xml: Vec<u8>,
    pub workbook: Vec<u8>,
}

/// Turns a [`NativeChart`] into package parts.
pub trait NativeChartEncoder {
    /// Encode one chart.
    ///
    /// # Arguments
    /// * `chart` - The chart to encode
    /// * `number` - Global chart number, used for the chart part and workbook names
    fn encode(&self, chart: &NativeChart, number: usize) -> Result<EncodedChart>;
}

/// Default encoder writing DrawingML chart XML and a minimal XLSX workbook.
#[derive(Debug, Clone, Copy, Default)]
pub struct DrawingChartEncoder;

impl NativeChartEncoder for DrawingChartEncoder {
    fn encode(&self, chart: &NativeChart, number: usize) -> Result<EncodedChart> {
        if chart.series.is_empty() {
            return Err(Error::ChartEncoding(format!(
                "chart {} has no data series",
                number
            )));
        }
        if let Some(series) = chart
            .series
            .iter()
            .find(|s| s.values.iter().any(|v| !v.is_finite()))
        {
            return Err(Error::ChartEncoding(format!(
                "series '{}' of chart {} contains a non-finite value",
                series.name, number
            )));
        }

        let mut xml = Vec::with_capacity(4096);
        writer::write_chart(&mut xml, chart)
            .map_err(|e| Error::ChartEncoding(format!("chart {}: {}", number, e)))?;
        let workbook = excel_embed::generate_chart_workbook(chart)
            .map_err(|e| Error::ChartEncoding(format!("workbook {}: {}", number, e)))?;

        log::debug!(
            number = number,
            series = chart.series.len(),
            rows = chart.row_count();
            "Encoded native chart"
        );
        Ok(EncodedChart { xml, workbook })
    }
}
