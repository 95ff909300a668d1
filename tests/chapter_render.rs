//! End-to-end chapter rendering into a temporary directory.
//!
//! Run: cargo test --test chapter_render

#![allow(clippy::unwrap_used)]

use std::fs;

use trueno_multivar::chapter::{self, DOCUMENT};
use trueno_multivar::config::{ChapterConfig, ImageFormat};
use trueno_multivar::datasets;
use trueno_multivar::grammar::{Aes, GGPlot, Geom};
use trueno_multivar::Error;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

fn config(dir: &tempfile::TempDir, format: ImageFormat) -> ChapterConfig {
    ChapterConfig {
        out_dir: dir.path().join("chapter"),
        format,
        width: 480,
        height: 360,
        ..ChapterConfig::default()
    }
}

#[test]
fn every_figure_is_a_png() {
    let dir = tempfile::tempdir().unwrap();
    let report = chapter::render(&config(&dir, ImageFormat::Png)).unwrap();

    assert_eq!(report.figures.len(), chapter::lessons().len());
    for figure in &report.figures {
        let bytes = fs::read(figure).unwrap();
        assert!(bytes.len() > PNG_SIGNATURE.len(), "{} is empty", figure.display());
        assert_eq!(bytes[..8], PNG_SIGNATURE, "{} is not a PNG", figure.display());
    }

    let md = fs::read_to_string(&report.document).unwrap();
    assert!(report.document.ends_with(DOCUMENT));
    for lesson in chapter::lessons() {
        assert!(md.contains(&lesson.file_name(ImageFormat::Png)));
    }
    assert!(md.contains("## Meeting Videos"));
}

#[test]
fn svg_chapter_with_meeting_details() {
    let dir = tempfile::tempdir().unwrap();
    let settings = ChapterConfig {
        video_url: Some("https://www.youtube.com/embed/cohort1".to_string()),
        chat_log: Some("00:12:40 Why ncol = 1 here?\n".to_string()),
        ..config(&dir, ImageFormat::Svg)
    };
    let report = chapter::render(&settings).unwrap();

    let wrap =
        report.figures.iter().find(|p| p.to_string_lossy().contains("06-wrap-by-rank")).unwrap();
    let svg = fs::read_to_string(wrap).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("Salary histograms by rank"));
    assert!(svg.contains("AsstProf"));

    let md = fs::read_to_string(&report.document).unwrap();
    assert!(md.contains("https://www.youtube.com/embed/cohort1"));
    assert!(md.contains("00:12:40 Why ncol = 1 here?"));
}

#[test]
fn config_file_drives_render() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("from-config");
    let path = dir.path().join("config.yaml");
    let yaml = format!("out_dir: {}\nformat: svg\nwidth: 400\nheight: 300\n", out.display());
    fs::write(&path, yaml).unwrap();

    let settings = ChapterConfig::load(&path).unwrap();
    let figure = chapter::render_figure(&chapter::lessons()[1], &settings).unwrap_err();
    // render_figure does not create the directory
    assert!(matches!(figure, Error::Io(_)));

    fs::create_dir_all(&out).unwrap();
    let figure = chapter::render_figure(&chapter::lessons()[1], &settings).unwrap();
    assert_eq!(figure, out.join("02-shape-by-sex.svg"));
}

#[test]
fn data_dir_supplies_the_tables() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("rdata");
    fs::create_dir_all(&data).unwrap();
    let manifest = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
    fs::copy(manifest.join("salaries.csv"), data.join("Salaries.csv")).unwrap();

    let settings = ChapterConfig { data_dir: Some(data.clone()), ..config(&dir, ImageFormat::Svg) };
    fs::create_dir_all(&settings.out_dir).unwrap();
    let figure = chapter::render_figure(&chapter::lessons()[0], &settings).unwrap();
    assert!(fs::read_to_string(figure).unwrap().contains("AssocProf"));

    // gapminder.csv was never exported
    let asia = chapter::lessons().into_iter().find(|l| l.slug.contains("asia")).unwrap();
    let err = chapter::render_figure(&asia, &settings).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn out_dir_that_is_a_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("chapter");
    fs::write(&blocker, "not a directory").unwrap();
    let err = chapter::render(&config(&dir, ImageFormat::Png)).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn plot_errors_surface_before_writing() {
    let salaries = datasets::load("Salaries").unwrap();

    let err = GGPlot::new()
        .data(salaries.clone())
        .aes(Aes::new().x("yrs.since.phd").y("income"))
        .geom(Geom::point())
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::UnknownColumn(ref c) if c == "income"));

    let err = GGPlot::new()
        .data(salaries)
        .aes(Aes::new().x("yrs.since.phd").y("salary"))
        .geom(Geom::point())
        .dimensions(0, 300)
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::InvalidDimensions { width: 0, height: 300 }));

    assert!(matches!(datasets::load("iris"), Err(Error::UnknownDataset { .. })));
}
