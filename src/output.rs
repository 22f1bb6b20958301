//! Result types returned by the conversion entry points.

use crate::document::Document;
use crate::error::Degradation;
use crate::pipeline::render::ChartSpec;
use crate::slides::{SlidePlan, SlideType};
use serde::Serialize;

/// Everything produced by one conversion.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionOutput {
    /// The finished HTML page.
    #[serde(skip_serializing)]
    pub html: String,
    /// The parsed document the deck was planned from.
    pub document: Document,
    /// The slides, in presentation order.
    pub plan: SlidePlan,
    /// Canvas charts with their Chart.js configurations.
    pub charts: Vec<ChartSpec>,
    pub stats: ConversionStats,
    /// Non-fatal problems met while parsing and rendering.
    pub degradations: Vec<Degradation>,
}

/// Counts and timings for one conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConversionStats {
    pub sections: usize,
    pub data_points: usize,
    pub conclusions: usize,
    pub slides: usize,
    pub data_slides: usize,
    pub conceptual_slides: usize,
    pub charts: usize,
    pub degradations: usize,
    pub duration_ms: u64,
}

impl ConversionStats {
    pub(crate) fn collect(
        document: &Document,
        plan: &SlidePlan,
        charts: &[ChartSpec],
        degradations: &[Degradation],
        duration_ms: u64,
    ) -> Self {
        Self {
            sections: document.section_count(),
            data_points: document.data_points.len(),
            conclusions: document.conclusions.len(),
            slides: plan.len(),
            data_slides: plan.count(SlideType::DataVisualization),
            conceptual_slides: plan.count(SlideType::Conceptual),
            charts: charts.len(),
            degradations: degradations.len(),
            duration_ms,
        }
    }
}
