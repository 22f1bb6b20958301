//! Slide planning: decide which slides the deck gets, in which order.
//!
//! The plan is built in one forward pass and slides are only ever appended:
//!
//! 1. a Title slide, always first;
//! 2. an Executive Summary when the document has conclusions;
//! 3. one slide per section, in document order (parents before children):
//!    a chart when the section has data points, a diagram when its wording
//!    suggests one, plain content when it has enough text, nothing otherwise;
//! 4. charts for data points that belong to no section;
//! 5. a Conclusions slide when the document has conclusions.
//!
//! Sections titled as findings or conclusions are skipped in step 3; their
//! bullets already feed steps 2 and 5.

use crate::config::PresentationConfig;
use crate::document::{Conclusion, DataPoint, Document};
use crate::pipeline::classify::{Classifier, SectionContext};
use crate::pipeline::extract::is_conclusion_title;
use crate::pipeline::lexicon::RECOMMENDATION;
use crate::slides::{SlidePlan, SlideSpec, SlideType, Visualization};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use tracing::{debug, info};

/// Title of the slide holding data points that belong to no section.
pub const UNSECTIONED_TITLE: &str = "Key Metrics";

const MAX_INSIGHTS: usize = 3;
const MAX_CONCEPT_POINTS: usize = 5;

/// Plans a deck for one document under one configuration.
pub struct SlidePlanner<'a> {
    config: &'a PresentationConfig,
    classifier: Classifier,
}

impl<'a> SlidePlanner<'a> {
    pub fn new(config: &'a PresentationConfig) -> Self {
        Self {
            config,
            classifier: Classifier::from_config(config),
        }
    }

    pub fn plan(&self, doc: &Document) -> SlidePlan {
        let mut plan = SlidePlan::new(doc.title.clone());
        plan.push(SlideSpec::title(&doc.title, &self.config.subtitle));

        if !doc.conclusions.is_empty() {
            let items = doc
                .conclusions
                .iter()
                .take(self.config.max_summary_items)
                .map(|c| c.text.clone())
                .collect();
            plan.push(SlideSpec::executive_summary(items));
        }

        let by_section = doc.points_by_section();
        let section_titles: HashSet<&str> = doc.iter_sections().map(|s| s.title.as_str()).collect();
        let mut consumed: HashSet<&str> = HashSet::new();
        let mut charts = 0usize;

        for section in doc.iter_sections() {
            if is_conclusion_title(&section.title) {
                debug!("'{}': left to the conclusions slides", section.title);
                continue;
            }

            let points: Vec<DataPoint> = if consumed.insert(section.title.as_str()) {
                by_section
                    .get(section.title.as_str())
                    .map(|ps| ps.iter().map(|p| (*p).clone()).collect())
                    .unwrap_or_default()
            } else {
                Vec::new()
            };
            let context = SectionContext::new(&section.title, &section.content);

            match self.classifier.classify(&points, &context) {
                Some(Visualization::Chart(chart)) => {
                    if charts < self.config.max_data_slides {
                        charts += 1;
                        plan.push(SlideSpec::data_visualization(
                            &section.title,
                            section.content.trim(),
                            chart,
                            points,
                            insights(&section.title, &section.content),
                        ));
                    } else {
                        debug!(
                            "'{}': chart cap of {} reached",
                            section.title, self.config.max_data_slides
                        );
                        self.push_content(&mut plan, &section.title, &section.content);
                    }
                }
                Some(Visualization::Diagram(kind)) if !section.is_blank() => {
                    plan.push(SlideSpec::conceptual(
                        &section.title,
                        section.content.trim(),
                        kind,
                        concept_points(&section.content),
                    ));
                }
                _ => self.push_content(&mut plan, &section.title, &section.content),
            }
        }

        for (group, points) in unsectioned_points(doc, &section_titles) {
            if charts >= self.config.max_data_slides {
                debug!("{} unsectioned points dropped at the chart cap", points.len());
                break;
            }
            let context = SectionContext::new(&group, "");
            if let Some(Visualization::Chart(chart)) = self.classifier.classify(&points, &context) {
                charts += 1;
                plan.push(SlideSpec::metric_group(&group, chart, points));
            }
        }

        if !doc.conclusions.is_empty() {
            let cards = doc
                .conclusions
                .iter()
                .take(self.config.max_conclusion_cards)
                .map(|c| c.text.clone())
                .collect();
            plan.push(SlideSpec::conclusions(
                cards,
                recommendations(&doc.conclusions, self.config.max_recommendations),
            ));
        }

        info!(
            "Planned {} slides ({} charts, {} diagrams, {} content) with the {} classifier",
            plan.len(),
            plan.count(SlideType::DataVisualization),
            plan.count(SlideType::Conceptual),
            plan.count(SlideType::Content),
            self.classifier.strategy_name()
        );
        plan
    }

    fn push_content(&self, plan: &mut SlidePlan, title: &str, content: &str) {
        let body = content.trim();
        if body.chars().count() >= self.config.min_content_chars {
            plan.push(SlideSpec::content(title, body));
        } else {
            debug!("'{title}': too little text for a slide");
        }
    }
}

/// Plan a deck with the given configuration.
pub fn plan(doc: &Document, config: &PresentationConfig) -> SlidePlan {
    SlidePlanner::new(config).plan(doc)
}

// ── Slide text helpers ───────────────────────────────────────────────────

static RE_LIST_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:[-*+•]|\d{1,2}[.)])\s+").unwrap());

fn strip_marker(line: &str) -> String {
    RE_LIST_MARKER.replace(line, "").replace("**", "").trim().to_string()
}

/// Up to three sentences longer than 20 characters from a section body.
pub fn insights(title: &str, content: &str) -> Vec<String> {
    let found: Vec<String> = content
        .lines()
        .filter(|l| !l.trim_start().starts_with('|'))
        .map(strip_marker)
        .filter(|l| l.chars().count() > 20)
        .take(MAX_INSIGHTS)
        .collect();
    if found.is_empty() {
        vec![format!("Key insights from {title}")]
    } else {
        found
    }
}

/// Up to five diagram entries: list items, or lines of 10–100 characters.
pub fn concept_points(content: &str) -> Vec<String> {
    content
        .lines()
        .filter_map(|line| {
            let is_item = RE_LIST_MARKER.is_match(line);
            let text = strip_marker(line);
            let len = text.chars().count();
            let keep = !text.is_empty() && (is_item || (10..=100).contains(&len));
            keep.then_some(text)
        })
        .take(MAX_CONCEPT_POINTS)
        .collect()
}

/// Conclusions filed under a recommendation heading, or the first ones.
fn recommendations(conclusions: &[Conclusion], limit: usize) -> Vec<String> {
    let tagged: Vec<String> = conclusions
        .iter()
        .filter(|c| c.category.as_deref().is_some_and(|cat| RECOMMENDATION.matches(cat)))
        .take(limit)
        .map(|c| c.text.clone())
        .collect();
    if !tagged.is_empty() {
        return tagged;
    }
    conclusions.iter().take(limit).map(|c| c.text.clone()).collect()
}

/// Points whose category names no section, grouped by category in order of
/// first appearance.
fn unsectioned_points(doc: &Document, sections: &HashSet<&str>) -> Vec<(String, Vec<DataPoint>)> {
    let mut groups: Vec<(String, Vec<DataPoint>)> = Vec::new();
    for point in &doc.data_points {
        let group = match point.category.as_deref() {
            Some(c) if sections.contains(c) => continue,
            Some(c) => c.to_string(),
            None => UNSECTIONED_TITLE.to_string(),
        };
        match groups.iter_mut().find(|(g, _)| *g == group) {
            Some((_, points)) => points.push(point.clone()),
            None => groups.push((group, vec![point.clone()])),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::parse::{parse_json, parse_markdown};
    use crate::slides::{ChartType, ConceptualType};

    fn default_plan(md: &str) -> SlidePlan {
        plan(&parse_markdown(md), &PresentationConfig::default())
    }

    #[test]
    fn test_title_slide_always_first() {
        let p = default_plan("");
        assert_eq!(p.slides[0].slide_type, SlideType::Title);
        assert_eq!(p.slides[0].title, "Untitled");
        assert_eq!(p.len(), 1);
    }

    #[test]
    fn test_revenue_section_becomes_line_chart() {
        let p = default_plan("## Revenue\n2020: 100\n2021: 120\n2022: 150");
        let charts: Vec<&SlideSpec> = p
            .slides
            .iter()
            .filter(|s| s.slide_type == SlideType::DataVisualization)
            .collect();
        assert_eq!(charts.len(), 1);
        assert_eq!(charts[0].title, "Revenue");
        assert_eq!(charts[0].chart_type, Some(ChartType::Line));
        assert_eq!(charts[0].data_points.len(), 3);
        assert_eq!(charts[0].source_section.as_deref(), Some("Revenue"));
    }

    #[test]
    fn test_summary_and_conclusions_bracket_the_body() {
        let md = "# Report\n## Sales\nNorth: 10\nSouth: 20\n## Key Findings\n- North lags behind\n- South leads the way\n";
        let p = default_plan(md);
        let kinds: Vec<SlideType> = p.slides.iter().map(|s| s.slide_type).collect();
        assert_eq!(
            kinds,
            vec![
                SlideType::Title,
                SlideType::ExecutiveSummary,
                SlideType::DataVisualization,
                SlideType::Conclusions
            ]
        );
        assert_eq!(p.slides[1].key_points.len(), 2);
        assert_eq!(p.slides[3].recommendations.len(), 2);
    }

    #[test]
    fn test_chart_cap_degrades_to_content() {
        let mut md = String::from("# Deck\n");
        for i in 0..10 {
            md.push_str(&format!(
                "## Metric {i}\nAlpha: {i}\nBeta: {}\nThis section has a fairly long explanatory sentence.\n",
                i + 1
            ));
        }
        let p = default_plan(&md);
        assert_eq!(p.count(SlideType::DataVisualization), 8);
        assert_eq!(p.count(SlideType::Content), 2);
    }

    #[test]
    fn test_conceptual_section_gets_points() {
        let md = "# Deck\n## Rollout roadmap\n- Pilot with two teams\n- Expand to the region\n- Go global\n";
        let p = default_plan(md);
        let slide = &p.slides[1];
        assert_eq!(slide.slide_type, SlideType::Conceptual);
        assert_eq!(slide.conceptual_type, Some(ConceptualType::Progression));
        assert_eq!(slide.key_points.len(), 3);
        assert_eq!(slide.key_points[2], "Go global");
    }

    #[test]
    fn test_blank_conceptual_title_is_skipped() {
        let p = default_plan("# Deck\n## Roadmap\n");
        assert_eq!(p.len(), 1);
    }

    #[test]
    fn test_short_prose_is_skipped() {
        let p = default_plan("# Deck\n## Background\nToo short.\n");
        assert_eq!(p.len(), 1);
    }

    #[test]
    fn test_json_points_without_sections_are_charted() {
        let parsed = parse_json(
            r#"{"title": "Poll", "data_points": [
                {"label": "A", "value": 30, "unit": "%"},
                {"label": "B", "value": 70, "unit": "%"}]}"#,
        )
        .unwrap();
        let p = plan(&parsed.document, &PresentationConfig::default());
        assert_eq!(p.slides[1].title, UNSECTIONED_TITLE);
        assert_eq!(p.slides[1].chart_type, Some(ChartType::Doughnut));
        assert_eq!(p.slides[1].source_section, None);
    }

    #[test]
    fn test_category_groups_name_no_source_section() {
        let parsed = parse_json(
            r#"{"title": "Mix", "sections": [{"title": "Overview", "content": "North: 5\nSouth: 9"}],
                "data_points": [
                {"label": "North", "value": 5, "category": "Overview"},
                {"label": "South", "value": 9, "category": "Overview"},
                {"label": "Web", "value": 40, "category": "Channels"},
                {"label": "Store", "value": 25, "category": "Channels"}]}"#,
        )
        .unwrap();
        let p = plan(&parsed.document, &PresentationConfig::default());
        let charts: Vec<(&str, Option<&str>)> = p
            .slides
            .iter()
            .filter(|s| s.slide_type == SlideType::DataVisualization)
            .map(|s| (s.title.as_str(), s.source_section.as_deref()))
            .collect();
        assert_eq!(charts, vec![("Overview", Some("Overview")), ("Channels", None)]);
    }

    #[test]
    fn test_duplicate_titles_chart_once() {
        let md = "# D\n## Sales\nA: 1\nB: 2\n## Sales\nC: 3\n";
        let p = default_plan(md);
        assert_eq!(p.count(SlideType::DataVisualization), 1);
        assert_eq!(p.slides[1].data_points.len(), 3);
    }

    #[test]
    fn test_insights_fallback() {
        assert_eq!(insights("Revenue", "2020: 1\n"), vec!["Key insights from Revenue"]);
        let got = insights("R", "- Revenue grew strongly in every region\n");
        assert_eq!(got, vec!["Revenue grew strongly in every region"]);
    }

    #[test]
    fn test_recommendations_prefer_tagged_conclusions() {
        let cs = vec![
            Conclusion::new("Finding one").with_category("Findings"),
            Conclusion::new("Do this").with_category("Recommendations"),
        ];
        assert_eq!(recommendations(&cs, 5), vec!["Do this"]);
    }
}
