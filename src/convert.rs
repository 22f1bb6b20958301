//! Conversion entry points.
//!
//! Every entry point runs the same synchronous chain, stopping early where
//! its caller needs less:
//!
//! ```text
//! read ─► detect format ─► parse ─► plan ─► generate ─► (write)
//!  inspect ───────────────────┘       │
//!  plan_file ─────────────────────────┘
//! ```
//!
//! Only input problems and output write failures are returned as `Err`;
//! everything else is absorbed into
//! [`ConversionOutput::degradations`](crate::output::ConversionOutput::degradations).

use crate::config::PresentationConfig;
use crate::document::{DocFormat, Document};
use crate::error::Doc2DeckError;
use crate::output::{ConversionOutput, ConversionStats};
use crate::pipeline::parse::{parse_with_diagnostics, Parsed};
use crate::pipeline::{assemble, input, plan};
use crate::slides::SlidePlan;
use std::io::Write;
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// Convert a Markdown, JSON or plain-text file into an HTML deck.
///
/// The format comes from the file extension (`.md`, `.markdown`, `.json`),
/// or is sniffed from the content when the extension says nothing.
///
/// # Errors
/// Returns `Err(Doc2DeckError)` only for fatal errors:
/// - File not found / permission denied
/// - Binary or non-UTF-8 content
/// - A `.json` file that is not JSON
pub fn convert(
    input_path: impl AsRef<Path>,
    config: &PresentationConfig,
) -> Result<ConversionOutput, Doc2DeckError> {
    let start = Instant::now();
    let path = input_path.as_ref();
    info!("Starting conversion: {}", path.display());
    let parsed = load(path)?;
    build_output(parsed, config, start)
}

/// Convert document text held in memory.
///
/// `hint` plays the part of a file extension: `Some` forces the format,
/// `None` sniffs it from the content.
pub fn convert_str(
    content: &str,
    hint: Option<DocFormat>,
    config: &PresentationConfig,
) -> Result<ConversionOutput, Doc2DeckError> {
    let start = Instant::now();
    let format = input::detect_format(hint, content);
    let parsed = parse_with_diagnostics(content, format, hint.is_some())?;
    build_output(parsed, config, start)
}

/// Convert a file and write the HTML to `output_path`.
///
/// Uses atomic write (temp file in the target directory + rename) so an
/// interrupted run never leaves a truncated deck behind.
pub fn convert_to_file(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &PresentationConfig,
) -> Result<ConversionOutput, Doc2DeckError> {
    let output = convert(input_path, config)?;
    let path = output_path.as_ref();
    write_atomic(path, &output.html)?;
    info!("Wrote {} ({} bytes)", path.display(), output.html.len());
    Ok(output)
}

/// Parse a file without planning or rendering.
pub fn inspect(input_path: impl AsRef<Path>) -> Result<Document, Doc2DeckError> {
    load(input_path.as_ref()).map(|p| p.document)
}

/// Parse and plan a file without rendering.
pub fn plan_file(
    input_path: impl AsRef<Path>,
    config: &PresentationConfig,
) -> Result<SlidePlan, Doc2DeckError> {
    let parsed = load(input_path.as_ref())?;
    Ok(plan::plan(&parsed.document, config))
}

// ── Internal helpers ─────────────────────────────────────────────────────

fn load(path: &Path) -> Result<Parsed, Doc2DeckError> {
    let source = input::read_source(path)?;
    let format = input::detect_format(source.declared, &source.content);
    parse_with_diagnostics(&source.content, format, source.declared.is_some())
}

fn build_output(
    parsed: Parsed,
    config: &PresentationConfig,
    start: Instant,
) -> Result<ConversionOutput, Doc2DeckError> {
    let Parsed {
        document,
        mut degradations,
    } = parsed;

    let plan = plan::plan(&document, config);
    let deck = assemble::generate(&plan, config)?;
    degradations.extend(deck.degradations);

    let stats = ConversionStats::collect(
        &document,
        &plan,
        &deck.charts,
        &degradations,
        start.elapsed().as_millis() as u64,
    );
    info!(
        "Conversion complete: {} slides ({} charts), {} degradations, {}ms",
        stats.slides, stats.charts, stats.degradations, stats.duration_ms
    );

    Ok(ConversionOutput {
        html: deck.html,
        document,
        plan,
        charts: deck.charts,
        stats,
        degradations,
    })
}

/// Write `contents` to `path` through a temp file in the same directory.
fn write_atomic(path: &Path, contents: &str) -> Result<(), Doc2DeckError> {
    let failed = |source: std::io::Error| Doc2DeckError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(failed)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(failed)?;
    tmp.write_all(contents.as_bytes()).map_err(failed)?;
    tmp.persist(path).map_err(|e| failed(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slides::{ChartType, SlideType};

    #[test]
    fn test_convert_str_revenue() {
        let out = convert_str(
            "## Revenue\n2020: 100\n2021: 120\n2022: 150",
            None,
            &PresentationConfig::default(),
        )
        .unwrap();
        assert_eq!(out.document.format, DocFormat::Markdown);
        assert_eq!(out.plan.slides[0].slide_type, SlideType::Title);
        assert_eq!(out.stats.data_slides, 1);
        assert_eq!(out.charts[0].chart_type, ChartType::Line);
    }

    #[test]
    fn test_convert_to_file_writes_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let input_path = dir.path().join("report.md");
        std::fs::write(&input_path, "# Report\n## Share\nMobile: 60%\nDesktop: 40%\n").unwrap();
        let output_path = dir.path().join("nested/deck.html");

        let out = convert_to_file(&input_path, &output_path, &PresentationConfig::default())
            .unwrap();
        let written = std::fs::read_to_string(&output_path).unwrap();
        assert_eq!(written, out.html);
        let leftovers = std::fs::read_dir(dir.path().join("nested")).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn test_missing_input_is_fatal() {
        let err = convert("/no/such/report.md", &PresentationConfig::default()).unwrap_err();
        assert!(matches!(err, Doc2DeckError::FileNotFound { .. }));
    }

    #[test]
    fn test_inspect_and_plan_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "Overview:\nMobile: 45%\nDesktop: 55%\n").unwrap();

        let doc = inspect(&path).unwrap();
        assert_eq!(doc.format, DocFormat::Text);
        assert_eq!(doc.data_points.len(), 2);

        let plan = plan_file(&path, &PresentationConfig::default()).unwrap();
        assert_eq!(plan.slides[1].chart_type, Some(ChartType::Doughnut));
    }
}
