//! End-to-end tests: documents on disk in, HTML decks out.
//!
//! Every test writes its input into a fresh temp directory, so the suite
//! needs no fixtures and no network. Chart.js is only referenced by URL.
//!
//! Run with:
//!   cargo test --test e2e -- --nocapture

use doc2deck::{
    convert, convert_to_file, inspect, plan_file, ChartType, ClassifierVersion, Degradation,
    Doc2DeckError, DocFormat, PresentationConfig, SlideType,
};
use std::path::{Path, PathBuf};

// ── Test helpers ─────────────────────────────────────────────────────────────

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

/// Assert the page passes basic structural checks.
fn assert_deck_shape(html: &str, slides: usize, context: &str) {
    assert!(
        html.starts_with("<!DOCTYPE html>"),
        "[{context}] page must start with a doctype"
    );
    assert_eq!(
        html.matches("\" data-slide=\"").count(),
        slides,
        "[{context}] wrong number of slide containers"
    );
    assert_eq!(
        html.matches("class=\"slide active\"").count(),
        1,
        "[{context}] exactly one slide starts active"
    );
    assert!(html.contains("prevBtn"), "[{context}] navigation is missing");
    assert!(
        html.contains(&format!("<span id=\"totalSlides\">{slides}</span>")),
        "[{context}] slide counter is wrong"
    );
}

const REPORT: &str = "\
# Annual Report

## Revenue
2020: 100
2021: 120
2022: 150

## Market Share
Mobile: 45%
Desktop: 35%
Tablet: 20%

## Key Findings
- Revenue grew 50% over three years
- Mobile is now the largest channel
";

// ── Scenarios ────────────────────────────────────────────────────────────────

#[test]
fn test_markdown_report_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "report.md", REPORT);
    let output = dir.path().join("presentation.html");

    let out = convert_to_file(&input, &output, &PresentationConfig::default()).unwrap();
    let html = std::fs::read_to_string(&output).unwrap();

    assert_eq!(out.document.title, "Annual Report");
    assert_eq!(out.plan.slides[0].slide_type, SlideType::Title);
    assert_eq!(
        out.plan.slides.last().unwrap().slide_type,
        SlideType::Conclusions
    );
    assert_deck_shape(&html, out.plan.len(), "report");

    let types: Vec<ChartType> = out.charts.iter().map(|c| c.chart_type).collect();
    assert_eq!(types, vec![ChartType::Line, ChartType::Doughnut]);
    assert!(html.contains(r#""labels":["2020","2021","2022"]"#));
    assert!(html.contains(r#""data":[100,120,150]"#));
    assert!(html.contains("Mobile is now the largest channel"));
    assert!(out.degradations.is_empty());
}

#[test]
fn test_slide_numbers_are_sequential() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "report.md", REPORT);

    let plan = plan_file(&input, &PresentationConfig::default()).unwrap();
    for (i, slide) in plan.slides.iter().enumerate() {
        assert_eq!(slide.slide_number, i + 1);
    }
}

#[test]
fn test_json_percentages_become_doughnut() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(
        dir.path(),
        "survey.json",
        r#"{
            "title": "Survey",
            "data_points": [
                {"label": "A", "value": 30, "unit": "%"},
                {"label": "B", "value": 70, "unit": "%"}
            ]
        }"#,
    );

    let out = convert(&input, &PresentationConfig::default()).unwrap();
    assert_eq!(out.document.format, DocFormat::Json);
    assert_eq!(out.charts.len(), 1);
    assert_eq!(out.charts[0].chart_type, ChartType::Doughnut);
    assert!(out.html.contains("\"type\":\"doughnut\""));
    assert!(out.html.contains("Key Metrics"));
}

#[test]
fn test_conversion_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "report.md", REPORT);
    let config = PresentationConfig::default();

    let a = convert(&input, &config).unwrap();
    let b = convert(&input, &config).unwrap();
    assert_eq!(a.html, b.html);
    assert_eq!(a.plan, b.plan);
}

#[test]
fn test_missing_template_falls_back_to_builtin() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "report.md", REPORT);
    let config = PresentationConfig::builder()
        .template_path(dir.path().join("missing.hbs"))
        .build()
        .unwrap();

    let out = convert(&input, &config).unwrap();
    assert_deck_shape(&out.html, out.plan.len(), "fallback");
    assert!(out
        .degradations
        .iter()
        .any(|d| matches!(d, Degradation::TemplateFallback { .. })));
}

#[test]
fn test_custom_template_receives_all_variables() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "report.md", REPORT);
    let template = write(
        dir.path(),
        "theme.hbs",
        "<html lang=\"{{lang}}\"><title>{{title}}</title><p>{{total_slides}}</p>{{{slides}}}<script src=\"{{chart_library_url}}\"></script><script>{{{scripts}}}</script></html>",
    );
    let config = PresentationConfig::builder()
        .template_path(template)
        .lang("de")
        .build()
        .unwrap();

    let out = convert(&input, &config).unwrap();
    assert!(out.html.starts_with("<html lang=\"de\"><title>Annual Report</title>"));
    assert!(out.html.contains(&format!("<p>{}</p>", out.plan.len())));
    assert!(out.html.contains("new Chart(document.getElementById('chart1')"));
    assert!(out.degradations.is_empty());
}

#[test]
fn test_missing_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let err = convert(dir.path().join("nope.md"), &PresentationConfig::default()).unwrap_err();
    assert!(matches!(err, Doc2DeckError::FileNotFound { .. }), "got: {err}");
}

#[test]
fn test_binary_input_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("image.png");
    std::fs::write(&path, [0x89, b'P', b'N', b'G', 0x00, 0x00, 0xff, 0xfe]).unwrap();

    let err = convert(&path, &PresentationConfig::default()).unwrap_err();
    assert!(
        matches!(
            err,
            Doc2DeckError::NotUtf8 { .. } | Doc2DeckError::UnsupportedFormat { .. }
        ),
        "got: {err}"
    );
}

#[test]
fn test_declared_json_that_does_not_parse_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "broken.json", "{ \"title\": ");
    let err = convert(&input, &PresentationConfig::default()).unwrap_err();
    assert!(matches!(err, Doc2DeckError::InvalidJson { .. }));
}

#[test]
fn test_plain_text_report() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(
        dir.path(),
        "notes.txt",
        "Channel Mix:\nMobile: 45%\nDesktop: 55%\n",
    );

    let doc = inspect(&input).unwrap();
    assert_eq!(doc.format, DocFormat::Text);
    let out = convert(&input, &PresentationConfig::default()).unwrap();
    assert_eq!(out.charts[0].chart_type, ChartType::Doughnut);
}

#[test]
fn test_data_slide_cap() {
    let dir = tempfile::tempdir().unwrap();
    let mut doc = String::from("# Many Tables\n");
    for i in 0..12 {
        doc.push_str(&format!("\n## Region {i}\nNorth: {}\nSouth: {}\n", i + 1, i + 2));
    }
    let input = write(dir.path(), "many.md", &doc);
    let config = PresentationConfig::builder()
        .max_data_slides(3)
        .build()
        .unwrap();

    let plan = plan_file(&input, &config).unwrap();
    assert_eq!(plan.count(SlideType::DataVisualization), 3);
}

#[test]
fn test_legacy_pipeline_runs() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "report.md", REPORT);
    let config = PresentationConfig::builder()
        .classifier(ClassifierVersion::Legacy)
        .build()
        .unwrap();

    let out = convert(&input, &config).unwrap();
    assert_eq!(out.stats.data_slides, 2);
    assert_deck_shape(&out.html, out.plan.len(), "legacy");
}
