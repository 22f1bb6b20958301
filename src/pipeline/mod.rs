//! Pipeline stages for document-to-deck conversion.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets the
//! chart-selection strategy be swapped without touching parsing or
//! rendering.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ parse ──▶ plan ──▶ assemble
//! (path)    (tree)    (slides)  (HTML)
//!             │          │         │
//!          extract    classify   render + chart
//! ```
//!
//! 1. [`input`]: read the file, reject binary or non-UTF-8 content,
//!    detect the format
//! 2. [`parse`]: build the section tree; [`extract`] pulls data points
//!    and conclusions out of section bodies
//! 3. [`plan`]: decide the slides; [`classify`] picks a chart or
//!    diagram for each section
//! 4. [`assemble`]: render every slide ([`render`]), synthesise chart
//!    configurations ([`chart`]) and fill the page template
//!
//! [`lexicon`] holds the keyword vocabularies shared by the stages.

pub mod assemble;
pub mod chart;
pub mod classify;
pub mod extract;
pub mod input;
pub mod lexicon;
pub mod parse;
pub mod plan;
pub mod render;
