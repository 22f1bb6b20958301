//! # doc2deck
//!
//! Turn Markdown, JSON and plain-text reports into self-contained HTML
//! slide decks with charts.
//!
//! ## Why this crate?
//!
//! Reports are full of numbers stated in prose: "revenue grew 25%",
//! `Mobile: 45%`, a pipe table of quarterly sales. Turning them into a deck
//! by hand means copying every number into a charting tool. This crate
//! finds the numbers, picks a chart that suits each section's data, and
//! writes one HTML file with navigation, styling and chart code inlined.
//! The only external reference is the Chart.js script.
//!
//! ## Pipeline Overview
//!
//! ```text
//! document (.md / .json / .txt)
//!  │
//!  ├─ 1. Input     read, validate UTF-8, detect format
//!  ├─ 2. Parse     section tree + data points + conclusions
//!  ├─ 3. Classify  structure → semantics → decision tree (or a diagram)
//!  ├─ 4. Plan      title, summary, one slide per section, conclusions
//!  └─ 5. Generate  slide markup + Chart.js configs in one page template
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use doc2deck::{convert_to_file, PresentationConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PresentationConfig::default();
//!     let output = convert_to_file("report.md", "presentation.html", &config)?;
//!     eprintln!("{} slides, {} charts", output.stats.slides, output.stats.charts);
//!     for d in &output.degradations {
//!         eprintln!("note: {d}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `doc2deck` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! doc2deck = { version = "0.1", default-features = false }
//! ```
//!
//! ## Chart selection
//!
//! | Data | Chart |
//! |------|-------|
//! | `x`/`y` fields (plus `z`/`size`) | scatter (bubble) |
//! | `min`/`max` fields | box plot |
//! | `source`/`target` fields | flow diagram |
//! | `row`/`column` fields, or more than 20 points | heatmap |
//! | up to 5 percentages | doughnut |
//! | levels / tiers | pyramid (≤ 5) or treemap |
//! | years, quarters, months | line (step, polar area with modifiers) |
//! | anything else | bar, after the category, radar, quadrant and ranking rules |
//!
//! Sections without numbers get a diagram (pyramid, progression, emphasis,
//! cycle, comparison, framework) when their wording suggests one.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod document;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod slides;
pub mod templates;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ClassifierVersion, PresentationConfig, PresentationConfigBuilder};
pub use convert::{convert, convert_str, convert_to_file, inspect, plan_file};
pub use document::{Conclusion, DataPoint, DataValue, DocFormat, Document, Section};
pub use error::{Degradation, Doc2DeckError};
pub use output::{ConversionOutput, ConversionStats};
pub use pipeline::assemble::{generate, GeneratedDeck};
pub use pipeline::classify::{classify, ChartStrategy, Classifier, SectionContext};
pub use pipeline::parse::parse;
pub use pipeline::plan::plan;
pub use pipeline::render::ChartSpec;
pub use slides::{ChartType, ConceptualType, SlidePlan, SlideSpec, SlideType, Visualization};
