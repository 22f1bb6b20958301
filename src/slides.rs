//! Slide plan types: what the deck will contain, before any markup exists.
//!
//! The planner produces a [`SlidePlan`]; the generator turns it into HTML.
//! Keeping the plan as plain data means `doc2deck plan --json` can show
//! exactly which slides and chart types were chosen without rendering.

use crate::document::DataPoint;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The role a slide plays in the deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlideType {
    Title,
    ExecutiveSummary,
    DataVisualization,
    Conceptual,
    Content,
    Conclusions,
}

/// Every chart kind the classifier can choose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartType {
    Bar,
    Line,
    Pie,
    Doughnut,
    Radar,
    PolarArea,
    Bubble,
    Scatter,
    Step,
    Heatmap,
    Sankey,
    Boxplot,
    Treemap,
    Pyramid,
    Quadrant,
}

impl ChartType {
    /// Every variant, in declaration order.
    pub const ALL: [ChartType; 15] = [
        ChartType::Bar,
        ChartType::Line,
        ChartType::Pie,
        ChartType::Doughnut,
        ChartType::Radar,
        ChartType::PolarArea,
        ChartType::Bubble,
        ChartType::Scatter,
        ChartType::Step,
        ChartType::Heatmap,
        ChartType::Sankey,
        ChartType::Boxplot,
        ChartType::Treemap,
        ChartType::Pyramid,
        ChartType::Quadrant,
    ];

    /// Identifier used in plans, logs and CSS classes.
    pub fn as_str(self) -> &'static str {
        match self {
            ChartType::Bar => "bar",
            ChartType::Line => "line",
            ChartType::Pie => "pie",
            ChartType::Doughnut => "doughnut",
            ChartType::Radar => "radar",
            ChartType::PolarArea => "polarArea",
            ChartType::Bubble => "bubble",
            ChartType::Scatter => "scatter",
            ChartType::Step => "step",
            ChartType::Heatmap => "heatmap",
            ChartType::Sankey => "sankey",
            ChartType::Boxplot => "boxplot",
            ChartType::Treemap => "treemap",
            ChartType::Pyramid => "pyramid",
            ChartType::Quadrant => "quadrant",
        }
    }

    /// Human-readable name for chart badges.
    pub fn display_name(self) -> &'static str {
        match self {
            ChartType::Bar => "Bar Chart",
            ChartType::Line => "Line Chart",
            ChartType::Pie => "Pie Chart",
            ChartType::Doughnut => "Doughnut Chart",
            ChartType::Radar => "Radar Chart",
            ChartType::PolarArea => "Polar Area Chart",
            ChartType::Bubble => "Bubble Chart",
            ChartType::Scatter => "Scatter Plot",
            ChartType::Step => "Step Chart",
            ChartType::Heatmap => "Heatmap",
            ChartType::Sankey => "Flow Diagram",
            ChartType::Boxplot => "Box Plot",
            ChartType::Treemap => "Treemap",
            ChartType::Pyramid => "Pyramid Chart",
            ChartType::Quadrant => "Strategic Matrix",
        }
    }

    /// `true` for kinds drawn as inline HTML rather than on a canvas.
    pub fn is_html_drawn(self) -> bool {
        matches!(
            self,
            ChartType::Heatmap | ChartType::Sankey | ChartType::Boxplot | ChartType::Treemap
        )
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Diagram kinds for sections that carry ideas rather than numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConceptualType {
    Pyramid,
    Progression,
    Emphasis,
    Cycle,
    Comparison,
    Framework,
}

impl ConceptualType {
    pub fn as_str(self) -> &'static str {
        match self {
            ConceptualType::Pyramid => "pyramid",
            ConceptualType::Progression => "progression",
            ConceptualType::Emphasis => "emphasis",
            ConceptualType::Cycle => "cycle",
            ConceptualType::Comparison => "comparison",
            ConceptualType::Framework => "framework",
        }
    }
}

impl fmt::Display for ConceptualType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The outcome of classifying one section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "type", rename_all = "snake_case")]
pub enum Visualization {
    Chart(ChartType),
    Diagram(ConceptualType),
}

/// Page arrangement for a slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Layout {
    TitleCenter,
    BulletPoints,
    TwoColumn,
    FullWidth,
    ConclusionsGrid,
}

impl Layout {
    /// CSS class applied to the slide body.
    pub fn css_class(self) -> &'static str {
        match self {
            Layout::TitleCenter => "title-center",
            Layout::BulletPoints => "bullet-points",
            Layout::TwoColumn => "two-column",
            Layout::FullWidth => "full-width",
            Layout::ConclusionsGrid => "conclusions-grid",
        }
    }
}

/// One planned slide.
///
/// Construct through the per-type constructors ([`SlideSpec::title`],
/// [`SlideSpec::data_visualization`], …) so that `chart_type` is set exactly
/// for data slides and `conceptual_type` exactly for conceptual slides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideSpec {
    pub slide_type: SlideType,
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart_type: Option<ChartType>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data_points: Vec<DataPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conceptual_type: Option<ConceptualType>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_points: Vec<String>,
    /// Conclusions slide only: the numbered recommendation list.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recommendations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<Layout>,
    /// Title of the section this slide was built from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_section: Option<String>,
    /// 1-based position in the deck, set by [`SlidePlan::push`].
    #[serde(default)]
    pub slide_number: usize,
}

impl SlideSpec {
    fn base(slide_type: SlideType, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            slide_type,
            title: title.into(),
            content: content.into(),
            chart_type: None,
            data_points: Vec::new(),
            conceptual_type: None,
            key_points: Vec::new(),
            recommendations: Vec::new(),
            layout: None,
            source_section: None,
            slide_number: 0,
        }
    }

    pub fn title(title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        let mut s = Self::base(SlideType::Title, title, subtitle);
        s.layout = Some(Layout::TitleCenter);
        s
    }

    pub fn executive_summary(key_points: Vec<String>) -> Self {
        let mut s = Self::base(SlideType::ExecutiveSummary, "Executive Summary", "");
        s.key_points = key_points;
        s.layout = Some(Layout::BulletPoints);
        s
    }

    pub fn data_visualization(
        section: &str,
        content: impl Into<String>,
        chart_type: ChartType,
        data_points: Vec<DataPoint>,
        key_points: Vec<String>,
    ) -> Self {
        let mut s = Self::base(SlideType::DataVisualization, section, content);
        s.chart_type = Some(chart_type);
        s.data_points = data_points;
        s.key_points = key_points;
        s.layout = Some(Layout::TwoColumn);
        s.source_section = Some(section.to_string());
        s
    }

    /// Chart for points that belong to no document section, titled after
    /// their category group.
    pub fn metric_group(group: &str, chart_type: ChartType, data_points: Vec<DataPoint>) -> Self {
        let mut s = Self::base(SlideType::DataVisualization, group, "");
        s.chart_type = Some(chart_type);
        s.data_points = data_points;
        s.layout = Some(Layout::TwoColumn);
        s
    }

    pub fn conceptual(
        section: &str,
        content: impl Into<String>,
        conceptual_type: ConceptualType,
        key_points: Vec<String>,
    ) -> Self {
        let mut s = Self::base(SlideType::Conceptual, section, content);
        s.conceptual_type = Some(conceptual_type);
        s.key_points = key_points;
        s.layout = Some(Layout::FullWidth);
        s.source_section = Some(section.to_string());
        s
    }

    pub fn content(section: &str, content: impl Into<String>) -> Self {
        let mut s = Self::base(SlideType::Content, section, content);
        s.layout = Some(Layout::FullWidth);
        s.source_section = Some(section.to_string());
        s
    }

    pub fn conclusions(cards: Vec<String>, recommendations: Vec<String>) -> Self {
        let mut s = Self::base(SlideType::Conclusions, "Conclusions & Recommendations", "");
        s.key_points = cards;
        s.recommendations = recommendations;
        s.layout = Some(Layout::ConclusionsGrid);
        s
    }
}

/// The ordered list of slides for one deck.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlidePlan {
    pub title: String,
    pub slides: Vec<SlideSpec>,
}

impl SlidePlan {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            slides: Vec::new(),
        }
    }

    /// Append a slide, numbering it after the slides already present.
    pub fn push(&mut self, mut slide: SlideSpec) {
        slide.slide_number = self.slides.len() + 1;
        self.slides.push(slide);
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Number of slides of the given type.
    pub fn count(&self, slide_type: SlideType) -> usize {
        self.slides
            .iter()
            .filter(|s| s.slide_type == slide_type)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_numbers_slides_in_order() {
        let mut plan = SlidePlan::new("Deck");
        plan.push(SlideSpec::title("Deck", "sub"));
        plan.push(SlideSpec::content("Intro", "text"));
        plan.push(SlideSpec::conclusions(vec![], vec![]));
        let numbers: Vec<usize> = plan.slides.iter().map(|s| s.slide_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn test_constructors_set_exactly_one_visual_kind() {
        let d = SlideSpec::data_visualization("Rev", "", ChartType::Line, vec![], vec![]);
        assert_eq!(d.chart_type, Some(ChartType::Line));
        assert_eq!(d.conceptual_type, None);

        let g = SlideSpec::metric_group("Key Metrics", ChartType::Bar, vec![]);
        assert_eq!(g.chart_type, Some(ChartType::Bar));
        assert_eq!(g.source_section, None);

        let c = SlideSpec::conceptual("Plan", "", ConceptualType::Cycle, vec![]);
        assert_eq!(c.chart_type, None);
        assert_eq!(c.conceptual_type, Some(ConceptualType::Cycle));

        let t = SlideSpec::content("Notes", "body");
        assert!(t.chart_type.is_none() && t.conceptual_type.is_none());
    }

    #[test]
    fn test_chart_type_serde_uses_chartjs_names() {
        let json = serde_json::to_string(&ChartType::PolarArea).unwrap();
        assert_eq!(json, "\"polarArea\"");
        for kind in ChartType::ALL {
            let round: ChartType =
                serde_json::from_str(&format!("\"{}\"", kind.as_str())).unwrap();
            assert_eq!(round, kind);
        }
    }

    #[test]
    fn test_html_drawn_kinds() {
        let html: Vec<ChartType> = ChartType::ALL
            .into_iter()
            .filter(|c| c.is_html_drawn())
            .collect();
        assert_eq!(
            html,
            vec![
                ChartType::Heatmap,
                ChartType::Sankey,
                ChartType::Boxplot,
                ChartType::Treemap
            ]
        );
    }
}
