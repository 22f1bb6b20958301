//! CLI binary for doc2deck.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `PresentationConfig` and prints results.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use doc2deck::{
    convert_to_file, inspect, plan_file, ClassifierVersion, Document, PresentationConfig,
    SlidePlan,
};
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}

fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}

fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}

fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Basic conversion (writes presentation.html)
  doc2deck convert report.md

  # Explicit output path
  doc2deck convert report.md deck.html
  doc2deck convert data.json -o out/deck.html

  # Keyword-list chart selection of the older generator
  doc2deck convert report.md --use-old-pipeline

  # Custom page template (Handlebars)
  doc2deck convert report.md --template my-theme.hbs

  # Show what the parser found, without rendering
  doc2deck inspect report.md
  doc2deck inspect report.md --json

  # Show the slide plan and chosen charts
  doc2deck plan report.md

INPUT FORMATS:
  .md / .markdown   headings (#, ##, ...) become sections
  .json             {"title", "sections", "data_points", "conclusions"}
  anything else     sniffed: JSON, then Markdown, else plain text

TEMPLATE VARIABLES:
  {{title}} {{lang}} {{total_slides}} {{chart_library_url}}
  {{{styles}}} {{{slides}}} {{{navigation_script}}} {{{scripts}}}

ENVIRONMENT VARIABLES:
  RUST_LOG                  Override log filter (e.g. doc2deck=debug)
  DOC2DECK_OUTPUT           Default output path
  DOC2DECK_TEMPLATE         Default page template
  DOC2DECK_OLD_PIPELINE     Use the legacy chart strategy
"#;

/// Turn Markdown, JSON and plain-text reports into HTML slide decks.
#[derive(Parser, Debug)]
#[command(
    name = "doc2deck",
    version,
    about = "Turn Markdown, JSON and plain-text reports into HTML slide decks with charts",
    long_about = "Parse a report into sections, numbers and conclusions, choose a chart for \
each section from the shape and wording of its data, and write a single self-contained HTML \
presentation with keyboard navigation. Chart.js is loaded from a CDN.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "DOC2DECK_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "DOC2DECK_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a document into an HTML presentation.
    Convert(ConvertArgs),

    /// Parse a document and print its sections, data points and conclusions.
    Inspect {
        /// Document to parse.
        input: PathBuf,

        /// Print the parsed document as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Parse and plan a document; print the slides without rendering.
    Plan {
        /// Document to plan.
        input: PathBuf,

        /// Print the slide plan as JSON.
        #[arg(long)]
        json: bool,

        /// Use the keyword-list chart strategy of the older generator.
        #[arg(long, env = "DOC2DECK_OLD_PIPELINE")]
        use_old_pipeline: bool,
    },
}

#[derive(clap::Args, Debug)]
struct ConvertArgs {
    /// Markdown, JSON or plain-text document.
    input: PathBuf,

    /// Where to write the HTML (default: presentation.html).
    output: Option<PathBuf>,

    /// Output path; takes precedence over the positional one.
    #[arg(short, long = "output", env = "DOC2DECK_OUTPUT")]
    output_flag: Option<PathBuf>,

    /// Use the keyword-list chart strategy of the older generator.
    #[arg(long, env = "DOC2DECK_OLD_PIPELINE")]
    use_old_pipeline: bool,

    /// Print the conversion result (plan, charts, stats) as JSON instead of the path.
    #[arg(long, env = "DOC2DECK_JSON")]
    json: bool,

    /// Handlebars page template replacing the built-in one.
    #[arg(long, env = "DOC2DECK_TEMPLATE")]
    template: Option<PathBuf>,

    /// Maximum number of chart slides.
    #[arg(long, env = "DOC2DECK_MAX_DATA_SLIDES", default_value_t = 8)]
    max_data_slides: usize,

    /// Points drawn per chart (1–50).
    #[arg(long, env = "DOC2DECK_CHART_POINTS", default_value_t = 10,
          value_parser = clap::value_parser!(u16).range(1..=50))]
    chart_points: u16,

    /// Subtitle on the title slide.
    #[arg(long, env = "DOC2DECK_SUBTITLE")]
    subtitle: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Command::Convert(args) => run_convert(&args, cli.quiet),
        Command::Inspect { input, json } => {
            let doc = inspect(&input)
                .with_context(|| format!("Failed to parse {}", input.display()))?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&doc).context("Failed to serialise document")?
                );
            } else {
                print_document(&input, &doc);
            }
            Ok(())
        }
        Command::Plan {
            input,
            json,
            use_old_pipeline,
        } => {
            let config = PresentationConfig::builder()
                .classifier(classifier_for(use_old_pipeline))
                .build()
                .context("Invalid configuration")?;
            let plan = plan_file(&input, &config)
                .with_context(|| format!("Failed to plan {}", input.display()))?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&plan).context("Failed to serialise plan")?
                );
            } else {
                print_plan(&plan);
            }
            Ok(())
        }
    }
}

fn run_convert(args: &ConvertArgs, quiet: bool) -> Result<()> {
    let config = build_config(args)?;
    let output_path = args
        .output_flag
        .clone()
        .or_else(|| args.output.clone())
        .unwrap_or_else(|| PathBuf::from("presentation.html"));

    let output =
        convert_to_file(&args.input, &output_path, &config).context("Conversion failed")?;
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&output).context("Failed to serialise output")?
        );
    } else {
        println!("{}", absolute(&output_path).display());
    }

    if !quiet {
        for d in &output.degradations {
            eprintln!("{}  {}", yellow("⚠"), d);
        }
        eprintln!(
            "{}  {} slides  {} charts  {}ms  →  {}",
            if output.degradations.is_empty() {
                green("✔")
            } else {
                cyan("✔")
            },
            output.stats.slides,
            output.stats.charts,
            output.stats.duration_ms,
            bold(&output_path.display().to_string()),
        );
        eprintln!(
            "   {} sections  /  {} data points  /  {} conclusions",
            dim(&output.stats.sections.to_string()),
            dim(&output.stats.data_points.to_string()),
            dim(&output.stats.conclusions.to_string()),
        );
    }
    Ok(())
}

/// Map CLI args to `PresentationConfig`.
fn build_config(args: &ConvertArgs) -> Result<PresentationConfig> {
    let mut builder = PresentationConfig::builder()
        .classifier(classifier_for(args.use_old_pipeline))
        .max_data_slides(args.max_data_slides)
        .max_chart_points(usize::from(args.chart_points));

    if let Some(ref subtitle) = args.subtitle {
        builder = builder.subtitle(subtitle.clone());
    }
    if let Some(ref template) = args.template {
        builder = builder.template_path(template.clone());
    }

    builder.build().context("Invalid configuration")
}

fn classifier_for(use_old_pipeline: bool) -> ClassifierVersion {
    if use_old_pipeline {
        ClassifierVersion::Legacy
    } else {
        ClassifierVersion::Layered
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

fn print_document(input: &Path, doc: &Document) {
    println!("File:         {}", input.display());
    println!("Title:        {}", doc.title);
    println!("Format:       {}", doc.format);
    println!("Sections:     {}", doc.section_count());
    println!("Data points:  {}", doc.data_points.len());
    println!("Conclusions:  {}", doc.conclusions.len());

    for section in doc.iter_sections() {
        let indent = "  ".repeat(section.level.saturating_sub(1));
        println!("  {indent}{}", bold(&section.title));
    }
    for point in &doc.data_points {
        let category = point.category.as_deref().unwrap_or("-");
        println!(
            "  {} = {}  {}",
            point.label,
            point.display_value(),
            dim(category)
        );
    }
}

fn print_plan(plan: &SlidePlan) {
    println!("{}  ({} slides)", bold(&plan.title), plan.len());
    for slide in &plan.slides {
        let visual = match (slide.chart_type, slide.conceptual_type) {
            (Some(chart), _) => format!("{chart} chart, {} points", slide.data_points.len()),
            (None, Some(kind)) => format!("{kind} diagram"),
            (None, None) => String::new(),
        };
        println!(
            "{:>3}. {:<18} {}  {}",
            slide.slide_number,
            format!("{:?}", slide.slide_type),
            slide.title,
            dim(&visual)
        );
    }
}
