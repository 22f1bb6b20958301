//! Error types for the doc2deck library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`Doc2DeckError`] is **fatal**: the conversion cannot proceed at all
//!   (missing input file, binary content, unwritable output). Returned as
//!   `Err(Doc2DeckError)` from the top-level `convert*` functions.
//!
//! * [`Degradation`] is **non-fatal**: one fragment of the input or one slide
//!   could not be handled as intended (a malformed JSON entry, a chart whose
//!   data has the wrong shape, a missing custom template), so a simpler
//!   rendering was used instead. Collected in
//!   [`crate::output::ConversionOutput::degradations`] so callers can see
//!   exactly what was simplified without losing the whole deck.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the doc2deck library.
///
/// Per-fragment and per-slide problems use [`Degradation`] and are stored in
/// [`crate::output::ConversionOutput`] rather than propagated here.
#[derive(Debug, Error)]
pub enum Doc2DeckError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Input file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file was read but its bytes are not valid UTF-8.
    #[error("Input '{path}' is not valid UTF-8 text")]
    NotUtf8 { path: PathBuf },

    /// The content is not a text document at all (e.g. a binary file).
    #[error("Unsupported input '{path}': {detail}")]
    UnsupportedFormat { path: PathBuf, detail: String },

    /// A document declared as JSON could not be parsed.
    #[error("Invalid JSON document: {detail}")]
    InvalidJson { detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output HTML file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Rendering errors ──────────────────────────────────────────────────
    /// The built-in page template failed to render.
    ///
    /// Custom templates never produce this error; they fall back to the
    /// built-in one and record a [`Degradation::TemplateFallback`].
    #[error("Built-in template failed to render: {0}")]
    TemplateRender(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal problem with one fragment of the input or one slide.
///
/// The conversion always continues; the affected part is skipped or drawn in
/// a simpler form.
#[derive(Debug, Clone, PartialEq, Error, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Degradation {
    /// One JSON section, data point or conclusion was unusable and skipped.
    #[error("Skipped malformed {entry} #{index}: {detail}")]
    MalformedEntry {
        entry: String,
        index: usize,
        detail: String,
    },

    /// Content looked like JSON but did not parse; it was read as plain text.
    #[error("Content looked like JSON but could not be parsed ({detail}); read as plain text")]
    JsonSniffFallback { detail: String },

    /// The custom page template could not be used.
    #[error("Template '{path}' unusable ({detail}); using the built-in template")]
    TemplateFallback { path: PathBuf, detail: String },

    /// A chart could not be drawn as planned and a simpler chart was used.
    #[error("Slide {slide}: {from} chart unusable ({reason}); drawn as {to}")]
    ChartFallback {
        slide: usize,
        from: String,
        to: String,
        reason: String,
    },

    /// No chart could be drawn; the data was listed as text.
    #[error("Slide {slide}: no drawable data ({reason}); listed as text")]
    TextFallback { slide: usize, reason: String },
}
