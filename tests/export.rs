//! End-to-end export tests: build decks through the public API and read the
//! packages back.

use quick_xml::Reader;
use quick_xml::events::Event;
use slidekit::ooxml::charts::{ChartSeries, FunnelStep, NativeChart, NativeChartKind, WaterfallSeries};
use slidekit::ooxml::pptx::{
    AddSlideOptions, Background, Chart, ExportOutput, MasterObject, Position, ShapeKind,
    ShapeProps, SlideMasterProps, SlideNumberProps, TableCell, TableProps, TableRow, TextProps,
};
use slidekit::{Error, ExportOptions, Presentation, RGBColor};
use std::io::{Cursor, Read};
use zip::{CompressionMethod, ZipArchive};

fn buffer(output: ExportOutput) -> Vec<u8> {
    match output {
        ExportOutput::Buffer(bytes) => bytes,
        ExportOutput::File(path) => panic!("expected a buffer, got {}", path.display()),
    }
}

fn part_names(bytes: &[u8]) -> Vec<String> {
    let archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
    names.sort();
    names
}

fn read_part(bytes: &[u8], name: &str) -> String {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut file = archive.by_name(name).unwrap();
    let mut content = String::new();
    file.read_to_string(&mut content).unwrap();
    content
}

fn assert_well_formed(name: &str, xml: &str) {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().check_end_names = true;
    loop {
        match reader.read_event() {
            Ok(Event::Eof) => break,
            Ok(_) => {},
            Err(e) => panic!("{} is not well-formed: {}", name, e),
        }
    }
}

fn assert_package_well_formed(bytes: &[u8]) {
    for name in part_names(bytes) {
        if name.ends_with(".xml") || name.ends_with(".rels") {
            assert_well_formed(&name, &read_part(bytes, &name));
        }
    }
}

fn count_matching(names: &[String], prefix: &str) -> usize {
    names
        .iter()
        .filter(|n| n.starts_with(prefix) && n.ends_with(".xml"))
        .count()
}

fn rows(n: usize) -> Vec<TableRow> {
    let mut rows = vec![vec![TableCell::new("Region"), TableCell::new("Revenue")]];
    for i in 1..n {
        rows.push(vec![TableCell::new(format!("R{}", i)), TableCell::new(format!("{}", i * 10))]);
    }
    rows
}

fn full_deck() -> Presentation {
    let mut pres = Presentation::new();
    pres.properties_mut().title = "Quarterly <Review>".to_string();

    let mut master = SlideMasterProps::new("BRANDED");
    master.background = Some(Background::Color(RGBColor::new(0x1F, 0x2A, 0x44)));
    master.objects.push(MasterObject::Text {
        text: "Confidential".to_string(),
        props: TextProps::default(),
    });
    master.slide_number = Some(SlideNumberProps::default());
    pres.define_slide_master(master).unwrap();

    pres.add_section("Overview", None);
    pres.add_slide(AddSlideOptions::master("BRANDED"))
        .add_text("Agenda & goals\nSecond line", TextProps::default())
        .add_shape(
            ShapeKind::RoundRect,
            ShapeProps {
                position: Position::new(1.0, 2.0, 3.0, 1.0),
                fill: Some(RGBColor::new(0xFF, 0xC0, 0x00)),
                text: Some("Callout".to_string()),
                ..Default::default()
            },
        )
        .add_notes("Open with the headline number");

    pres.add_section("Numbers", None);
    pres.add_slide(AddSlideOptions::section("Numbers"))
        .add_chart(Chart::Funnel {
            steps: vec![
                FunnelStep::new("Visits", 100.0),
                FunnelStep::new("Trials", 80.0),
                FunnelStep::new("Paid", 13.0),
            ],
            options: Default::default(),
        })
        .unwrap();
    pres.add_slide(Default::default())
        .add_chart(Chart::Waterfall {
            series: WaterfallSeries {
                y_ticks: (0..=10).map(|t| f64::from(t) * 10.0).collect(),
                x_labels: vec!["Q1".into(), "Q2".into(), "Q3".into()],
                values: vec![55.0, 80.0, 90.0],
            },
            options: Default::default(),
        })
        .unwrap()
        .add_chart(Chart::Native {
            chart: NativeChart::new(
                NativeChartKind::Column,
                vec![ChartSeries::new("Revenue", vec!["Q1".into(), "Q2".into()], vec![3.5, 4.25])],
            ),
            position: Position::new(5.0, 1.0, 4.0, 3.0),
        })
        .unwrap()
        .set_hidden(true);

    pres.add_slide(Default::default());
    pres.add_table_paged(4, rows(30), TableProps {
        repeat_header: true,
        rows_per_slide: Some(12),
        ..Default::default()
    })
    .unwrap();

    pres
}

#[tokio::test]
async fn test_zero_slide_package() {
    let pres = Presentation::new();
    let bytes = buffer(pres.export(&ExportOptions::buffer()).await.unwrap());
    let names = part_names(&bytes);

    assert_eq!(count_matching(&names, "ppt/slideLayouts/slideLayout"), 1);
    assert_eq!(count_matching(&names, "ppt/slideMasters/slideMaster"), 1);
    assert_eq!(count_matching(&names, "ppt/slides/slide"), 0);
    assert!(names.iter().any(|n| n == "[Content_Types].xml"));
    assert!(names.iter().any(|n| n == "ppt/notesMasters/notesMaster1.xml"));
    assert!(names.iter().any(|n| n == "ppt/slides/"));
    assert_package_well_formed(&bytes);
}

#[tokio::test]
async fn test_full_deck_is_well_formed() {
    let pres = full_deck();
    assert_eq!(pres.slide_count(), 6);

    let bytes = buffer(pres.export(&ExportOptions::buffer()).await.unwrap());
    let names = part_names(&bytes);
    assert_package_well_formed(&bytes);

    assert_eq!(count_matching(&names, "ppt/slides/slide"), 6);
    assert_eq!(count_matching(&names, "ppt/notesSlides/notesSlide"), 6);
    assert_eq!(count_matching(&names, "ppt/slideLayouts/slideLayout"), 2);
    assert!(names.iter().any(|n| n == "ppt/charts/chart1.xml"));
    assert!(names.iter().any(|n| n == "ppt/embeddings/Microsoft_Excel_Worksheet1.xlsx"));

    let content_types = read_part(&bytes, "[Content_Types].xml");
    assert!(content_types.contains(r#"<Override PartName="/ppt/slides/slide6.xml""#));
    assert!(content_types.contains(r#"<Default Extension="xlsx""#));

    let presentation = read_part(&bytes, "ppt/presentation.xml");
    assert!(presentation.contains(r#"<p:sldId id="261" r:id="rId7"/>"#));
    assert!(presentation.contains(r#"<p14:section name="Overview""#));
    assert!(presentation.contains(r#"<p:sldSz cx="9144000" cy="5143500" type="screen16x9"/>"#));

    let slide1_rels = read_part(&bytes, "ppt/slides/_rels/slide1.xml.rels");
    assert!(slide1_rels.contains("../slideLayouts/slideLayout2.xml"));
    assert!(read_part(&bytes, "ppt/slides/slide1.xml").contains(r#"type="sldNum""#));
    assert!(read_part(&bytes, "ppt/slides/slide3.xml").contains(r#" show="0""#));
    assert!(read_part(&bytes, "ppt/notesSlides/notesSlide1.xml").contains("Open with the headline number"));
    assert!(read_part(&bytes, "docProps/core.xml").contains("Quarterly &lt;Review&gt;"));
    assert!(read_part(&bytes, "docProps/app.xml").contains("<Slides>6</Slides>"));
}

#[tokio::test]
async fn test_long_funnel_has_no_negative_extents() {
    let mut pres = Presentation::new();
    let steps = (0..9)
        .map(|i| FunnelStep::new(format!("Stage {}", i + 1), f64::from(100 - i * 10)))
        .collect();
    pres.add_slide(Default::default())
        .add_chart(Chart::Funnel {
            steps,
            options: Default::default(),
        })
        .unwrap();

    let bytes = buffer(pres.export(&ExportOptions::buffer()).await.unwrap());
    let slide = read_part(&bytes, "ppt/slides/slide1.xml");
    assert!(slide.matches("<a:ext ").count() >= 9);
    assert!(!slide.contains(r#"cx="-"#), "negative width in {}", slide);
    assert!(!slide.contains(r#"cy="-"#), "negative height in {}", slide);
}

#[tokio::test]
async fn test_export_twice_yields_same_parts() {
    let pres = full_deck();
    let first = buffer(pres.export(&ExportOptions::buffer()).await.unwrap());
    let second = buffer(pres.export(&ExportOptions::buffer()).await.unwrap());
    assert_eq!(part_names(&first), part_names(&second));
}

#[tokio::test]
async fn test_identical_decks_share_section_ids() {
    let first = buffer(full_deck().export(&ExportOptions::buffer()).await.unwrap());
    let second = buffer(full_deck().export(&ExportOptions::buffer()).await.unwrap());
    assert_eq!(
        read_part(&first, "ppt/presentation.xml"),
        read_part(&second, "ppt/presentation.xml")
    );
}

#[tokio::test]
async fn test_compression_option() {
    let mut pres = Presentation::new();
    pres.add_slide(Default::default()).add_text("Hi", TextProps::default());

    for (compress, method) in [(false, CompressionMethod::Stored), (true, CompressionMethod::Deflated)] {
        let bytes = buffer(
            pres.export(&ExportOptions::buffer().with_compression(compress))
                .await
                .unwrap(),
        );
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let slide = archive.by_name("ppt/slides/slide1.xml").unwrap();
        assert_eq!(slide.compression(), method);
    }
}

#[tokio::test]
async fn test_file_output_appends_extension() {
    let dir = tempfile::tempdir().unwrap();
    let mut pres = Presentation::new();
    pres.add_slide(Default::default()).add_text("Saved", TextProps::default());

    let output = pres
        .export(&ExportOptions::file(dir.path().join("deck")))
        .await
        .unwrap();
    let expected = dir.path().join("deck.pptx");
    assert_eq!(output, ExportOutput::File(expected.clone()));

    let bytes = std::fs::read(&expected).unwrap();
    assert!(part_names(&bytes).iter().any(|n| n == "ppt/slides/slide1.xml"));
}

#[tokio::test]
async fn test_media_failure_leaves_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut pres = Presentation::new();
    pres.add_slide(Default::default()).add_image(slidekit::ImageProps::new(
        slidekit::MediaSource::path(dir.path().join("missing.png")),
        Position::default(),
    ));

    let err = pres
        .export(&ExportOptions::file(dir.path().join("deck.pptx")))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::MediaResolution { .. }));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
