//! Package assembly: turns a [`Presentation`] into a complete PPTX archive.
//!
//! Assembly runs in stages. Media is resolved first (the only step that
//! suspends), native charts are encoded next, then every part is generated
//! and the parts are archived in one pass. Any failure discards the parts
//! produced so far.

use super::{master, pres, slide, theme};
use crate::common::config::normalize_pptx_path;
use crate::common::error::{Error, Result};
use crate::ooxml::charts::native::NativeChartEncoder;
use crate::ooxml::opc::constants::{content_type as ct, relationship_type as rt};
use crate::ooxml::opc::pkgwriter::{PackageWriter, Part};
use crate::ooxml::opc::rel::Relationships;
use crate::ooxml::pptx::master::SlideNumberProps;
use crate::ooxml::pptx::media::MediaResolver;
use crate::ooxml::pptx::presentation::Presentation;
use crate::ooxml::pptx::slide::Canvas;
use chrono::Utc;
use std::path::{Path, PathBuf};

/// Directory entries written ahead of the parts.
const PACKAGE_DIRECTORIES: [&str; 19] = [
    "_rels/",
    "docProps/",
    "ppt/",
    "ppt/_rels/",
    "ppt/charts/",
    "ppt/charts/_rels/",
    "ppt/embeddings/",
    "ppt/media/",
    "ppt/slideLayouts/",
    "ppt/slideLayouts/_rels/",
    "ppt/slideMasters/",
    "ppt/slideMasters/_rels/",
    "ppt/slides/",
    "ppt/slides/_rels/",
    "ppt/theme/",
    "ppt/notesMasters/",
    "ppt/notesMasters/_rels/",
    "ppt/notesSlides/",
    "ppt/notesSlides/_rels/",
];

/// Where a [`PackageAssembler`] is in its run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportStage {
    #[default]
    Idle,
    EncodingMedia,
    EncodingCharts,
    AssemblingParts,
    Serialized,
}

impl ExportStage {
    pub fn as_str(self) -> &'static str {
        match self {
            ExportStage::Idle => "idle",
            ExportStage::EncodingMedia => "encoding-media",
            ExportStage::EncodingCharts => "encoding-charts",
            ExportStage::AssemblingParts => "assembling-parts",
            ExportStage::Serialized => "serialized",
        }
    }
}

/// Encoded native charts plus the global number of every chart, per canvas.
struct EncodedCharts {
    parts: Vec<Part>,
    numbers: Vec<Vec<usize>>,
}

/// Builds the package for one presentation.
///
/// The assembler borrows the presentation, so the document cannot change
/// while its package is being produced.
pub struct PackageAssembler<'a, R, E> {
    pres: &'a Presentation,
    resolver: &'a R,
    encoder: &'a E,
    stage: ExportStage,
}

impl<'a, R, E> PackageAssembler<'a, R, E>
where
    R: MediaResolver + Sync,
    E: NativeChartEncoder + Sync,
{
    pub fn new(pres: &'a Presentation, resolver: &'a R, encoder: &'a E) -> Self {
        Self {
            pres,
            resolver,
            encoder,
            stage: ExportStage::Idle,
        }
    }

    pub fn stage(&self) -> ExportStage {
        self.stage
    }

    fn advance(&mut self, next: ExportStage) {
        log::debug!(from = self.stage.as_str(), to = next.as_str(); "Export stage");
        self.stage = next;
    }

    /// Produce the package bytes.
    ///
    /// # Arguments
    /// * `compress` - Deflate members instead of storing them
    pub async fn run(&mut self, compress: bool) -> Result<Vec<u8>> {
        self.advance(ExportStage::EncodingMedia);
        let media = self.encode_media().await?;

        self.advance(ExportStage::EncodingCharts);
        let charts = self.encode_charts()?;

        self.advance(ExportStage::AssemblingParts);
        let mut parts = self.assemble_parts(&charts.numbers)?;
        let media_count = media.len();
        let chart_count = charts.numbers.iter().map(Vec::len).sum::<usize>();
        parts.extend(media);
        parts.extend(charts.parts);

        let bytes = PackageWriter::to_bytes(&parts, &PACKAGE_DIRECTORIES, compress)?;
        self.advance(ExportStage::Serialized);
        log::debug!(
            slides = self.pres.slide_count(),
            layouts = self.pres.slide_layouts().len(),
            media = media_count,
            charts = chart_count,
            bytes = bytes.len();
            "Package assembled"
        );

        Ok(bytes)
    }

    async fn encode_media(&self) -> Result<Vec<Part>> {
        let mut parts = Vec::new();
        for canvas in canvases(self.pres) {
            for media in canvas.media() {
                let bytes = self
                    .resolver
                    .resolve(&media.source)
                    .await
                    .map_err(|e| match e {
                        Error::MediaResolution { .. } => e,
                        other => Error::MediaResolution {
                            location: media.source.location(),
                            reason: other.to_string(),
                        },
                    })?;
                let partname = format!("ppt/media/{}", media.target);
                log::trace!(bytes = bytes.len(); "Encoded {}", partname);
                parts.push(Part::new(partname, media.source.content_type(), bytes));
            }
        }
        Ok(parts)
    }

    fn encode_charts(&self) -> Result<EncodedCharts> {
        let mut parts = Vec::new();
        let mut numbers = Vec::new();
        let mut number = 0;

        for canvas in canvases(self.pres) {
            let mut canvas_numbers = Vec::with_capacity(canvas.charts().len());
            for chart in canvas.charts() {
                number += 1;
                let encoded = self.encoder.encode(&chart.chart, number).map_err(|e| match e {
                    Error::ChartEncoding(_) => e,
                    other => Error::ChartEncoding(format!("chart {}: {}", number, other)),
                })?;
                let workbook = format!("Microsoft_Excel_Worksheet{}.xlsx", number);

                let mut rels = Relationships::new();
                rels.add(1, rt::PACKAGE, format!("../embeddings/{}", workbook));

                parts.push(Part::new(format!("ppt/charts/chart{}.xml", number), ct::DML_CHART, encoded.xml));
                parts.push(Part::rels(
                    format!("ppt/charts/_rels/chart{}.xml.rels", number),
                    rels.to_xml(),
                ));
                parts.push(Part::new(format!("ppt/embeddings/{}", workbook), ct::SML_SHEET, encoded.workbook));
                log::trace!(chart = number; "Encoded chart");
                canvas_numbers.push(number);
            }
            numbers.push(canvas_numbers);
        }

        Ok(EncodedCharts { parts, numbers })
    }

    /// Slide-number props the master and the default layout display: the
    /// master's own, else those of the first slide showing a number.
    fn effective_slide_number(&self) -> Option<&'a SlideNumberProps> {
        let doc = self.pres;
        doc.master()
            .slide_number()
            .or_else(|| doc.slides().iter().find_map(|s| s.slide_number()))
    }

    fn assemble_parts(&self, chart_numbers: &[Vec<usize>]) -> Result<Vec<Part>> {
        let doc = self.pres;
        let props = doc.properties();
        let rtl = props.rtl_mode;
        let page = doc.page();
        let slides = doc.slides();
        let layouts = doc.slide_layouts();
        let slide_number = self.effective_slide_number();
        let (layout_charts, slide_charts) = chart_numbers.split_at(layouts.len().min(chart_numbers.len()));

        let mut parts = Vec::with_capacity(16 + 4 * slides.len() + 2 * layouts.len());

        parts.push(Part::rels("_rels/.rels", pres::root_rels_xml()));
        parts.push(Part::new(
            "docProps/app.xml",
            ct::OFC_EXTENDED_PROPERTIES,
            pres::app_xml(slides, props)?,
        ));
        parts.push(Part::new(
            "docProps/core.xml",
            ct::OPC_CORE_PROPERTIES,
            pres::core_xml(props, Utc::now())?,
        ));

        parts.push(Part::new(
            "ppt/presentation.xml",
            ct::PML_PRESENTATION_MAIN,
            pres::presentation_xml(slides, page, doc.section_list(), props)?,
        ));
        parts.push(Part::rels(
            "ppt/_rels/presentation.xml.rels",
            pres::presentation_rels_xml(slides),
        ));
        parts.push(Part::new("ppt/presProps.xml", ct::PML_PRES_PROPS, pres::pres_props_xml()?));
        parts.push(Part::new("ppt/viewProps.xml", ct::PML_VIEW_PROPS, pres::view_props_xml()?));
        parts.push(Part::new(
            "ppt/tableStyles.xml",
            ct::PML_TABLE_STYLES,
            pres::table_styles_xml()?,
        ));
        parts.push(Part::new(
            "ppt/theme/theme1.xml",
            ct::OFC_THEME,
            theme::theme_xml(&props.theme)?,
        ));

        for (index, layout) in layouts.iter().enumerate() {
            let number = index + 1;
            let shown = match index {
                0 => layout.slide_number().or(slide_number),
                _ => layout.slide_number(),
            };
            let charts = layout_charts.get(index).map(Vec::as_slice).unwrap_or(&[]);
            parts.push(Part::new(
                format!("ppt/slideLayouts/slideLayout{}.xml", number),
                ct::PML_SLIDE_LAYOUT,
                master::layout_xml(layout, shown, page, rtl)?,
            ));
            parts.push(Part::rels(
                format!("ppt/slideLayouts/_rels/slideLayout{}.xml.rels", number),
                master::layout_rels_xml(layout, charts),
            ));
        }

        parts.push(Part::new(
            "ppt/slideMasters/slideMaster1.xml",
            ct::PML_SLIDE_MASTER,
            master::master_xml(layouts.len(), slide_number, page, rtl)?,
        ));
        parts.push(Part::rels(
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            master::master_rels_xml(layouts.len()),
        ));
        parts.push(Part::new(
            "ppt/notesMasters/notesMaster1.xml",
            ct::PML_NOTES_MASTER,
            master::notes_master_xml()?,
        ));
        parts.push(Part::rels(
            "ppt/notesMasters/_rels/notesMaster1.xml.rels",
            master::notes_master_rels_xml(),
        ));

        for (index, s) in slides.iter().enumerate() {
            let number = s.number();
            let charts = slide_charts.get(index).map(Vec::as_slice).unwrap_or(&[]);
            parts.push(Part::new(
                format!("ppt/slides/slide{}.xml", number),
                ct::PML_SLIDE,
                slide::slide_xml(s, rtl)?,
            ));
            parts.push(Part::rels(
                format!("ppt/slides/_rels/slide{}.xml.rels", number),
                slide::slide_rels_xml(s, charts),
            ));
            parts.push(Part::new(
                format!("ppt/notesSlides/notesSlide{}.xml", number),
                ct::PML_NOTES_SLIDE,
                slide::notes_xml(s)?,
            ));
            parts.push(Part::rels(
                format!("ppt/notesSlides/_rels/notesSlide{}.xml.rels", number),
                slide::notes_rels_xml(s),
            ));
        }

        for part in &parts {
            log::trace!(bytes = part.blob.len(); "Assembled {}", part.partname);
        }

        Ok(parts)
    }
}

/// Layout canvases first, then slide canvases.
fn canvases(pres: &Presentation) -> impl Iterator<Item = &Canvas> {
    pres.slide_layouts()
        .iter()
        .map(|layout| layout.canvas())
        .chain(pres.slides().iter().map(|slide| slide.canvas()))
}

/// Write package bytes to `path` (with `.pptx` appended when missing).
///
/// The bytes go to a hidden sibling first and are renamed into place, so a
/// failed write never leaves a truncated package behind.
pub(crate) async fn write_package_file(path: &Path, bytes: &[u8]) -> Result<PathBuf> {
    let target = normalize_pptx_path(path);
    let file_name = target
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp = target.with_file_name(format!(".{}.{}.tmp", file_name, std::process::id()));

    if let Err(e) = tokio::fs::write(&temp, bytes).await {
        let _ = tokio::fs::remove_file(&temp).await;
        return Err(e.into());
    }
    if let Err(e) = tokio::fs::rename(&temp, &target).await {
        let _ = tokio::fs::remove_file(&temp).await;
        return Err(e.into());
    }

    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::RGBColor;
    use crate::ooxml::charts::native::{
        ChartSeries, DrawingChartEncoder, EncodedChart, NativeChart, NativeChartKind,
    };
    use crate::ooxml::charts::palette::FixedPalette;
    use crate::ooxml::pptx::media::{DefaultMediaResolver, MediaSource};
    use crate::ooxml::pptx::objects::{ImageProps, Position, TextProps};
    use crate::ooxml::pptx::slide::Chart;
    use parking_lot::Mutex;
    use std::io::Read;

    const PNG_SIGNATURE_B64: &str = "iVBORw0KGgo=";

    fn pres() -> Presentation {
        Presentation::with_palette(FixedPalette::new(vec![RGBColor::BLACK]))
    }

    fn bar_chart() -> Chart {
        Chart::Native {
            chart: NativeChart::new(
                NativeChartKind::Bar,
                vec![ChartSeries::new("Sales", vec!["Q1".into(), "Q2".into()], vec![1.0, 2.0])],
            ),
            position: Position::default(),
        }
    }

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut content = String::new();
        file.read_to_string(&mut content).unwrap();
        content
    }

    fn names(bytes: &[u8]) -> Vec<String> {
        let archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
        archive.file_names().map(str::to_string).collect()
    }

    /// Records the chart numbers it was asked to encode.
    #[derive(Default)]
    struct RecordingEncoder {
        numbers: Mutex<Vec<usize>>,
    }

    impl NativeChartEncoder for RecordingEncoder {
        fn encode(&self, _chart: &NativeChart, number: usize) -> Result<EncodedChart> {
            self.numbers.lock().push(number);
            Ok(EncodedChart {
                xml: b"<c:chartSpace/>".to_vec(),
                workbook: vec![0x50, 0x4B],
            })
        }
    }

    /// Fails every resolution with a non-media error.
    struct BrokenResolver;

    impl MediaResolver for BrokenResolver {
        fn resolve(&self, _source: &MediaSource) -> impl Future<Output = Result<Vec<u8>>> + Send {
            async { Err(Error::Xml("boom".into())) }
        }
    }

    /// Fails every chart with an I/O error.
    struct BrokenEncoder;

    impl NativeChartEncoder for BrokenEncoder {
        fn encode(&self, _chart: &NativeChart, _number: usize) -> Result<EncodedChart> {
            Err(Error::Io(std::io::Error::other("disk full")))
        }
    }

    #[tokio::test]
    async fn test_stages_advance_to_serialized() {
        let pres = pres();
        let mut assembler = PackageAssembler::new(&pres, &DefaultMediaResolver, &DrawingChartEncoder);
        assert_eq!(assembler.stage(), ExportStage::Idle);

        let bytes = assembler.run(false).await.unwrap();
        assert_eq!(assembler.stage(), ExportStage::Serialized);

        let names = names(&bytes);
        assert!(names.iter().any(|n| n == "ppt/slideLayouts/slideLayout1.xml"));
        assert!(names.iter().any(|n| n == "ppt/slideMasters/slideMaster1.xml"));
        assert!(!names.iter().any(|n| n.starts_with("ppt/slides/slide")));
    }

    #[tokio::test]
    async fn test_media_and_notes_parts() {
        let mut pres = pres();
        pres.add_slide(Default::default())
            .add_image(ImageProps::new(MediaSource::data(PNG_SIGNATURE_B64), Position::default()));

        let mut assembler = PackageAssembler::new(&pres, &DefaultMediaResolver, &DrawingChartEncoder);
        let bytes = assembler.run(true).await.unwrap();
        let names = names(&bytes);

        assert!(names.iter().any(|n| n == "ppt/media/image-1-1.png"));
        assert!(names.iter().any(|n| n == "ppt/notesSlides/notesSlide1.xml"));
        assert!(names.iter().any(|n| n == "ppt/notesSlides/_rels/notesSlide1.xml.rels"));
        assert!(read_part(&bytes, "[Content_Types].xml").contains(r#"<Default Extension="png""#));
    }

    #[tokio::test]
    async fn test_charts_are_numbered_globally() {
        let mut pres = pres();
        pres.add_slide(Default::default()).add_chart(bar_chart()).unwrap();
        pres.add_slide(Default::default());
        pres.add_slide(Default::default())
            .add_chart(bar_chart())
            .unwrap()
            .add_chart(bar_chart())
            .unwrap();

        let encoder = RecordingEncoder::default();
        let mut assembler = PackageAssembler::new(&pres, &DefaultMediaResolver, &encoder);
        let bytes = assembler.run(false).await.unwrap();

        assert_eq!(*encoder.numbers.lock(), vec![1, 2, 3]);
        let rels = read_part(&bytes, "ppt/slides/_rels/slide3.xml.rels");
        assert!(rels.contains("../charts/chart2.xml"));
        assert!(rels.contains("../charts/chart3.xml"));
        let chart_rels = read_part(&bytes, "ppt/charts/_rels/chart3.xml.rels");
        assert!(chart_rels.contains("../embeddings/Microsoft_Excel_Worksheet3.xlsx"));
    }

    #[tokio::test]
    async fn test_media_failure_is_media_resolution() {
        let mut pres = pres();
        pres.add_slide(Default::default())
            .add_image(ImageProps::new(MediaSource::path("/nonexistent/logo.png"), Position::default()));

        let mut assembler = PackageAssembler::new(&pres, &BrokenResolver, &DrawingChartEncoder);
        let err = assembler.run(false).await.unwrap_err();
        match err {
            Error::MediaResolution { location, reason } => {
                assert_eq!(location, "/nonexistent/logo.png");
                assert!(reason.contains("boom"));
            },
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(assembler.stage(), ExportStage::EncodingMedia);
    }

    #[tokio::test]
    async fn test_encoder_failure_is_chart_encoding() {
        let mut pres = pres();
        pres.add_slide(Default::default()).add_chart(bar_chart()).unwrap();

        let mut assembler = PackageAssembler::new(&pres, &DefaultMediaResolver, &BrokenEncoder);
        let err = assembler.run(false).await.unwrap_err();
        match err {
            Error::ChartEncoding(reason) => {
                assert!(reason.starts_with("chart 1: "));
                assert!(reason.contains("disk full"));
            },
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(assembler.stage(), ExportStage::EncodingCharts);
    }

    #[tokio::test]
    async fn test_slide_number_reaches_master_and_default_layout() {
        let mut pres = pres();
        pres.add_slide(Default::default()).add_text("plain", TextProps::default());
        pres.add_slide(Default::default())
            .set_slide_number(SlideNumberProps::default());

        let mut assembler = PackageAssembler::new(&pres, &DefaultMediaResolver, &DrawingChartEncoder);
        let bytes = assembler.run(false).await.unwrap();

        assert!(read_part(&bytes, "ppt/slideMasters/slideMaster1.xml").contains(r#"type="sldNum""#));
        assert!(read_part(&bytes, "ppt/slideLayouts/slideLayout1.xml").contains(r#"type="sldNum""#));
        assert!(!read_part(&bytes, "ppt/slides/slide1.xml").contains("sldNum"));
        assert!(read_part(&bytes, "ppt/slides/slide2.xml").contains("<a:t>2</a:t>"));
    }

    #[tokio::test]
    async fn test_write_package_file_appends_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_package_file(&dir.path().join("deck"), b"PK").await.unwrap();
        assert_eq!(path, dir.path().join("deck.pptx"));
        assert_eq!(std::fs::read(&path).unwrap(), b"PK");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
