//! Per-slide markup renderers.
//!
//! ## Chart ids without global state
//!
//! Every canvas chart needs a document-unique id (`chart1`, `chart2`, …)
//! that the initialisation script later looks up. The ids come from a
//! [`RenderContext`] that lives for exactly one generation call: the next id
//! is derived from the number of charts already recorded in it. Rendering
//! the same plan twice therefore yields the same ids, and two decks
//! generated concurrently never share a counter.
//!
//! ## Fallback chain
//!
//! A chart whose data has the wrong shape is never fatal:
//!
//! 1. the planned chart, if its shape checks pass;
//! 2. otherwise a bar chart ([`Degradation::ChartFallback`]);
//! 3. otherwise a plain list of the values ([`Degradation::TextFallback`]).

use crate::config::PresentationConfig;
use crate::document::DataPoint;
use crate::error::Degradation;
use crate::pipeline::chart::{build_chart_config, palette_color, ShapeError};
use crate::pipeline::plan::concept_points;
use crate::slides::{ChartType, ConceptualType, Layout, SlideSpec, SlideType};
use handlebars::html_escape;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::warn;

/// Upper bound on points drawn by the HTML charts.
const MAX_HTML_CHART_POINTS: usize = 100;

/// A canvas chart placed in the deck.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    /// Canvas element id.
    pub id: String,
    pub slide_number: usize,
    /// The chart actually drawn, after any fallback.
    pub chart_type: ChartType,
    /// Chart.js configuration object.
    pub config: serde_json::Value,
}

/// Accumulates chart configurations and degradations for one deck.
pub struct RenderContext<'a> {
    config: &'a PresentationConfig,
    charts: Vec<ChartSpec>,
    degradations: Vec<Degradation>,
}

impl<'a> RenderContext<'a> {
    pub fn new(config: &'a PresentationConfig) -> Self {
        Self {
            config,
            charts: Vec::new(),
            degradations: Vec::new(),
        }
    }

    pub fn charts(&self) -> &[ChartSpec] {
        &self.charts
    }

    pub fn degradations(&self) -> &[Degradation] {
        &self.degradations
    }

    pub fn into_parts(self) -> (Vec<ChartSpec>, Vec<Degradation>) {
        (self.charts, self.degradations)
    }

    fn next_chart_id(&self) -> String {
        format!("chart{}", self.charts.len() + 1)
    }

    fn degrade(&mut self, degradation: Degradation) {
        warn!("{degradation}");
        self.degradations.push(degradation);
    }

    /// Render one slide to its `<div class="slide">` fragment.
    pub fn render_slide(&mut self, slide: &SlideSpec) -> String {
        let body = match slide.slide_type {
            SlideType::Title => render_title(slide),
            SlideType::ExecutiveSummary => render_summary(slide),
            SlideType::DataVisualization => self.render_data(slide),
            SlideType::Conceptual => render_conceptual(slide),
            SlideType::Content => render_content(slide),
            SlideType::Conclusions => render_conclusions(slide),
        };
        let active = if slide.slide_number == 1 { " active" } else { "" };
        format!(
            "<div class=\"slide{active}\" data-slide=\"{}\">\n{body}</div>\n",
            slide.slide_number
        )
    }

    // ── Data slides ───────────────────────────────────────────────────────

    fn render_data(&mut self, slide: &SlideSpec) -> String {
        let planned = slide.chart_type.unwrap_or(ChartType::Bar);
        let (drawn, chart_html) = self.draw_with_fallback(slide, planned);
        let badge = drawn.map_or("Data", ChartType::display_name);
        let kind = drawn.map_or("text", ChartType::as_str);

        let mut html = header(&slide.title);
        html.push_str(&format!(
            "<div class=\"slide-content {}\">\n",
            layout_class(slide, Layout::TwoColumn)
        ));
        html.push_str(&format!(
            "<div class=\"column chart-container {kind}-chart\">\n<span class=\"chart-type-badge\">{badge}</span>\n{chart_html}</div>\n"
        ));
        html.push_str("<div class=\"column\">\n<h3 class=\"section-header\">Key Insights</h3>\n");
        html.push_str(&bullet_list("bullet-points", &slide.key_points));
        html.push_str("</div>\n</div>\n");
        html
    }

    fn draw_with_fallback(
        &mut self,
        slide: &SlideSpec,
        planned: ChartType,
    ) -> (Option<ChartType>, String) {
        let reason = match self.draw(slide, planned) {
            Ok(html) => return (Some(planned), html),
            Err(reason) => reason,
        };

        let reason = if planned == ChartType::Bar {
            reason
        } else {
            self.degrade(Degradation::ChartFallback {
                slide: slide.slide_number,
                from: planned.to_string(),
                to: ChartType::Bar.to_string(),
                reason: reason.to_string(),
            });
            match self.draw(slide, ChartType::Bar) {
                Ok(html) => return (Some(ChartType::Bar), html),
                Err(reason) => reason,
            }
        };

        self.degrade(Degradation::TextFallback {
            slide: slide.slide_number,
            reason: reason.to_string(),
        });
        (None, render_value_list(&slide.data_points))
    }

    fn draw(&mut self, slide: &SlideSpec, chart: ChartType) -> Result<String, ShapeError> {
        let points = &slide.data_points;
        if chart.is_html_drawn() {
            let points = &points[..points.len().min(MAX_HTML_CHART_POINTS)];
            return match chart {
                ChartType::Heatmap => render_heatmap(points),
                ChartType::Sankey => render_sankey(points),
                ChartType::Boxplot => render_boxplot(points),
                _ => render_treemap(points),
            };
        }

        let config = build_chart_config(chart, points, self.config.max_chart_points)?;
        let id = self.next_chart_id();
        let html = format!("<canvas id=\"{id}\"></canvas>\n");
        let quadrant = if chart == ChartType::Quadrant {
            QUADRANT_GUIDES
        } else {
            ""
        };
        self.charts.push(ChartSpec {
            id,
            slide_number: slide.slide_number,
            chart_type: chart,
            config,
        });
        Ok(format!("{html}{quadrant}"))
    }
}

const QUADRANT_GUIDES: &str = "<div class=\"quadrant-guides\"><span>Question Marks</span><span>Stars</span><span>Dogs</span><span>Cash Cows</span></div>\n";

// ── Text helpers ─────────────────────────────────────────────────────────

static RE_BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());

static RE_LIST_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:[-*+•]|\d{1,2}[.)])\s+(?P<text>.+)$").unwrap());

/// Escape user text and turn `**bold**` into `<strong>`.
pub fn inline(text: &str) -> String {
    let escaped = html_escape(text.trim());
    RE_BOLD.replace_all(&escaped, "<strong>$1</strong>").into_owned()
}

fn header(title: &str) -> String {
    format!(
        "<div class=\"header-bar\">\n<h1 class=\"slide-title\">{}</h1>\n</div>\n",
        inline(title)
    )
}

fn layout_class(slide: &SlideSpec, default: Layout) -> &'static str {
    slide.layout.unwrap_or(default).css_class()
}

fn bullet_list(class: &str, items: &[String]) -> String {
    let mut html = format!("<ul class=\"{class}\">\n");
    for item in items {
        html.push_str(&format!("<li>{}</li>\n", inline(item)));
    }
    html.push_str("</ul>\n");
    html
}

/// Body text: list items become a list, other lines paragraphs.
fn render_body(content: &str) -> String {
    let mut html = String::new();
    let mut open_list = false;
    for line in content.lines().filter(|l| !l.trim().is_empty()) {
        match RE_LIST_ITEM.captures(line) {
            Some(caps) => {
                if !open_list {
                    html.push_str("<ul class=\"bullet-points\">\n");
                    open_list = true;
                }
                html.push_str(&format!("<li>{}</li>\n", inline(&caps["text"])));
            }
            None => {
                if open_list {
                    html.push_str("</ul>\n");
                    open_list = false;
                }
                html.push_str(&format!("<p class=\"body-text\">{}</p>\n", inline(line)));
            }
        }
    }
    if open_list {
        html.push_str("</ul>\n");
    }
    html
}

fn render_value_list(points: &[DataPoint]) -> String {
    if points.is_empty() {
        return "<p class=\"body-text\">No data available</p>\n".to_string();
    }
    let mut html = String::from("<ul class=\"value-list\">\n");
    for p in points {
        html.push_str(&format!(
            "<li><strong>{}</strong>: {}</li>\n",
            inline(&p.label),
            inline(&p.display_value())
        ));
    }
    html.push_str("</ul>\n");
    html
}

fn fmt_num(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v:.2}")
    }
}

// ── Simple slides ────────────────────────────────────────────────────────

fn render_title(slide: &SlideSpec) -> String {
    format!(
        "<div class=\"title-slide {}\">\n<h1 class=\"title\">{}</h1>\n<h2 class=\"subtitle\">{}</h2>\n</div>\n",
        layout_class(slide, Layout::TitleCenter),
        inline(&slide.title),
        inline(&slide.content)
    )
}

fn render_summary(slide: &SlideSpec) -> String {
    let mut html = header(&slide.title);
    html.push_str(&format!(
        "<div class=\"slide-content {}\">\n<ul class=\"key-points\">\n",
        layout_class(slide, Layout::BulletPoints)
    ));
    for point in &slide.key_points {
        html.push_str(&format!("<li class=\"key-point\">{}</li>\n", inline(point)));
    }
    html.push_str("</ul>\n</div>\n");
    html
}

fn render_content(slide: &SlideSpec) -> String {
    let mut html = header(&slide.title);
    html.push_str(&format!(
        "<div class=\"slide-content {}\">\n",
        layout_class(slide, Layout::FullWidth)
    ));
    html.push_str(&render_body(&slide.content));
    html.push_str("</div>\n");
    html
}

fn render_conclusions(slide: &SlideSpec) -> String {
    let mut html = header(&slide.title);
    html.push_str(&format!(
        "<div class=\"slide-content {}\">\n<div class=\"conclusions-grid\">\n",
        layout_class(slide, Layout::ConclusionsGrid)
    ));
    for (i, card) in slide.key_points.iter().enumerate() {
        html.push_str(&format!(
            "<div class=\"conclusion-card\">\n<h3 class=\"card-title\">Conclusion {}</h3>\n<p class=\"card-text\">{}</p>\n</div>\n",
            i + 1,
            inline(card)
        ));
    }
    html.push_str("</div>\n");
    if !slide.recommendations.is_empty() {
        html.push_str("<div class=\"recommendations-box\">\n<h3 class=\"section-header accent-text\">Key Recommendations</h3>\n<ol class=\"numbered-list\">\n");
        for rec in &slide.recommendations {
            html.push_str(&format!("<li>{}</li>\n", inline(rec)));
        }
        html.push_str("</ol>\n</div>\n");
    }
    html.push_str("</div>\n");
    html
}

// ── Conceptual diagrams ──────────────────────────────────────────────────

fn render_conceptual(slide: &SlideSpec) -> String {
    let kind = slide.conceptual_type.unwrap_or(ConceptualType::Emphasis);
    let points = if slide.key_points.is_empty() {
        concept_points(&slide.content)
    } else {
        slide.key_points.clone()
    };

    let mut html = header(&slide.title);
    html.push_str(&format!(
        "<div class=\"slide-content {}\">\n<span class=\"chart-type-badge\">{}</span>\n",
        layout_class(slide, Layout::FullWidth),
        diagram_name(kind)
    ));
    html.push_str(&render_diagram(kind, &points));
    html.push_str("</div>\n");
    html
}

fn diagram_name(kind: ConceptualType) -> &'static str {
    match kind {
        ConceptualType::Pyramid => "Pyramid",
        ConceptualType::Progression => "Progression",
        ConceptualType::Emphasis => "Key Points",
        ConceptualType::Cycle => "Cycle",
        ConceptualType::Comparison => "Comparison",
        ConceptualType::Framework => "Framework",
    }
}

/// Draw a diagram of `kind` from its entries.
pub fn render_diagram(kind: ConceptualType, points: &[String]) -> String {
    if points.is_empty() {
        return format!(
            "<p class=\"body-text\">No content available for {kind} visualization</p>\n"
        );
    }
    match kind {
        ConceptualType::Pyramid => render_pyramid(points),
        ConceptualType::Progression => render_progression(points),
        ConceptualType::Emphasis => render_emphasis(points),
        ConceptualType::Cycle => render_cycle(points),
        ConceptualType::Comparison => render_comparison(points),
        ConceptualType::Framework => render_framework(points),
    }
}

fn render_pyramid(points: &[String]) -> String {
    let mut html = String::from("<div class=\"pyramid-container\">\n");
    for (i, point) in points.iter().enumerate() {
        let width = 100usize.saturating_sub(i * 15).max(25);
        html.push_str(&format!(
            "<div class=\"pyramid-level\" style=\"width: {width}%; background-color: {};\">\n<div class=\"pyramid-text\">{}</div>\n</div>\n",
            palette_color(i),
            inline(point)
        ));
    }
    html.push_str("</div>\n");
    html
}

fn render_progression(points: &[String]) -> String {
    let mut html = String::from("<div class=\"progression-container\">\n");
    for (i, point) in points.iter().enumerate() {
        html.push_str(&format!(
            "<div class=\"progression-step\">\n<div class=\"step-number\">{}</div>\n<div class=\"step-content\">{}</div>\n",
            i + 1,
            inline(point)
        ));
        if i + 1 < points.len() {
            html.push_str("<div class=\"step-arrow\">→</div>\n");
        }
        html.push_str("</div>\n");
    }
    html.push_str("</div>\n");
    html
}

fn render_emphasis(points: &[String]) -> String {
    let mut html = String::from("<div class=\"emphasis-container\">\n");
    for (i, point) in points.iter().enumerate() {
        html.push_str(&format!(
            "<div class=\"emphasis-box\" style=\"animation-delay: {:.1}s;\">\n<div class=\"emphasis-icon\">✦</div>\n<div class=\"emphasis-text\">{}</div>\n</div>\n",
            (i + 1) as f64 * 0.1,
            inline(point)
        ));
    }
    html.push_str("</div>\n");
    html
}

fn render_cycle(points: &[String]) -> String {
    let mut html = String::from("<div class=\"cycle-container\">\n<div class=\"cycle-center\">Core</div>\n");
    let step = 360.0 / points.len() as f64;
    for (i, point) in points.iter().enumerate() {
        let angle = step * i as f64;
        html.push_str(&format!(
            "<div class=\"cycle-node\" style=\"transform: rotate({angle:.1}deg) translate(120px) rotate(-{angle:.1}deg); background-color: {};\">\n<div class=\"cycle-text\">{}</div>\n</div>\n",
            palette_color(i),
            inline(point)
        ));
    }
    html.push_str("</div>\n");
    html
}

fn render_comparison(points: &[String]) -> String {
    let (left, right) = points.split_at(points.len() / 2);
    let column = |heading: &str, side: &str, items: &[String]| {
        let mut col = format!(
            "<div class=\"comparison-column\">\n<h4 class=\"comparison-header\">{heading}</h4>\n"
        );
        for item in items {
            col.push_str(&format!(
                "<div class=\"comparison-item {side}\">{}</div>\n",
                inline(item)
            ));
        }
        col.push_str("</div>\n");
        col
    };
    format!(
        "<div class=\"comparison-container\">\n{}<div class=\"comparison-divider\">VS</div>\n{}</div>\n",
        column("Before", "left", left),
        column("After", "right", right)
    )
}

fn render_framework(points: &[String]) -> String {
    let mut html = String::from("<div class=\"framework-container\">\n");
    for (i, point) in points.iter().enumerate() {
        html.push_str(&format!(
            "<div class=\"framework-item\">\n<div class=\"framework-label\">{}</div>\n<div class=\"framework-content\">{}</div>\n</div>\n",
            i + 1,
            inline(point)
        ));
    }
    html.push_str("</div>\n");
    html
}

// ── HTML-drawn charts ────────────────────────────────────────────────────

fn numeric(points: &[DataPoint]) -> Result<Vec<f64>, ShapeError> {
    let values: Vec<f64> = points.iter().filter_map(|p| p.value.as_f64()).collect();
    if values.is_empty() {
        Err(ShapeError::NoNumericValues)
    } else {
        Ok(values)
    }
}

fn require_str(p: &DataPoint, field: &'static str) -> Result<String, ShapeError> {
    p.field_str(field).ok_or_else(|| ShapeError::MissingField {
        label: p.label.clone(),
        field,
    })
}

fn require_f64(p: &DataPoint, field: &'static str) -> Result<f64, ShapeError> {
    p.field_f64(field).ok_or_else(|| ShapeError::MissingField {
        label: p.label.clone(),
        field,
    })
}

/// Cell shade for `v` within `[min, max]`, light to dark.
fn shade(v: f64, min: f64, max: f64) -> String {
    let t = if max > min { (v - min) / (max - min) } else { 1.0 };
    format!("rgba(85, 110, 230, {:.2})", 0.15 + 0.85 * t)
}

fn render_heatmap(points: &[DataPoint]) -> Result<String, ShapeError> {
    let values = numeric(points)?;
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let matrix = points
        .iter()
        .all(|p| p.field_str("row").is_some() && p.field_str("column").is_some());
    let mut html = String::new();

    if matrix {
        let mut rows: Vec<String> = Vec::new();
        let mut cols: Vec<String> = Vec::new();
        let mut cells: Vec<(String, String, f64)> = Vec::new();
        for p in points {
            let row = require_str(p, "row")?;
            let col = require_str(p, "column")?;
            if !rows.contains(&row) {
                rows.push(row.clone());
            }
            if !cols.contains(&col) {
                cols.push(col.clone());
            }
            if let Some(v) = p.value.as_f64() {
                cells.push((row, col, v));
            }
        }
        html.push_str("<table class=\"heatmap\">\n<tr><th></th>");
        for col in &cols {
            html.push_str(&format!("<th>{}</th>", inline(col)));
        }
        html.push_str("</tr>\n");
        for row in &rows {
            html.push_str(&format!("<tr><th>{}</th>", inline(row)));
            for col in &cols {
                match cells.iter().rev().find(|(r, c, _)| r == row && c == col) {
                    Some((_, _, v)) => html.push_str(&format!(
                        "<td class=\"heatmap-cell\" style=\"background-color: {};\">{}</td>",
                        shade(*v, min, max),
                        fmt_num(*v)
                    )),
                    None => html.push_str("<td class=\"heatmap-cell empty\"></td>"),
                }
            }
            html.push_str("</tr>\n");
        }
        html.push_str("</table>\n");
    } else {
        html.push_str("<div class=\"heatmap-grid\">\n");
        for p in points {
            let Some(v) = p.value.as_f64() else { continue };
            html.push_str(&format!(
                "<div class=\"heatmap-cell\" style=\"background-color: {};\"><span class=\"cell-label\">{}</span><span class=\"cell-value\">{}</span></div>\n",
                shade(v, min, max),
                inline(&p.label),
                inline(&p.display_value())
            ));
        }
        html.push_str("</div>\n");
    }
    html.push_str("<p class=\"chart-caption\">Light (low) to dark (high)</p>\n");
    Ok(html)
}

fn render_sankey(points: &[DataPoint]) -> Result<String, ShapeError> {
    let mut flows = Vec::with_capacity(points.len());
    for p in points {
        let source = require_str(p, "source")?;
        let target = require_str(p, "target")?;
        flows.push((source, target, p.value.as_f64()));
    }
    let values = numeric(points)?;
    let max = values.iter().copied().fold(0.0_f64, f64::max);

    let mut html = String::from("<div class=\"flow-diagram\">\n");
    for (i, (source, target, value)) in flows.iter().enumerate() {
        let Some(v) = value else { continue };
        let width = if max > 0.0 { (v / max * 100.0).max(2.0) } else { 2.0 };
        html.push_str(&format!(
            "<div class=\"flow-row\"><span class=\"flow-node\">{}</span><div class=\"flow-track\"><div class=\"flow-bar\" style=\"width: {width:.1}%; background-color: {};\">{}</div></div><span class=\"flow-node\">{}</span></div>\n",
            inline(source),
            palette_color(i),
            fmt_num(*v),
            inline(target)
        ));
    }
    html.push_str("</div>\n");
    Ok(html)
}

fn render_boxplot(points: &[DataPoint]) -> Result<String, ShapeError> {
    let mut boxes = Vec::with_capacity(points.len());
    for p in points {
        let lo = require_f64(p, "min")?;
        let hi = require_f64(p, "max")?;
        boxes.push((p, lo.min(hi), lo.max(hi)));
    }
    if boxes.is_empty() {
        return Err(ShapeError::NoNumericValues);
    }
    let lo = boxes.iter().map(|b| b.1).fold(f64::INFINITY, f64::min);
    let hi = boxes.iter().map(|b| b.2).fold(f64::NEG_INFINITY, f64::max);
    let span = if hi > lo { hi - lo } else { 1.0 };
    let pos = |v: f64| (v - lo) / span * 100.0;

    let mut html = String::from("<div class=\"boxplot\">\n");
    for (i, (p, min, max)) in boxes.iter().enumerate() {
        html.push_str(&format!(
            "<div class=\"box-row\"><span class=\"box-label\">{}</span><div class=\"box-track\"><div class=\"box-whisker\" style=\"left: {:.1}%; width: {:.1}%;\"></div>",
            inline(&p.label),
            pos(*min),
            pos(*max) - pos(*min)
        ));
        if let (Some(q1), Some(q3)) = (p.field_f64("q1"), p.field_f64("q3")) {
            html.push_str(&format!(
                "<div class=\"box-body\" style=\"left: {:.1}%; width: {:.1}%; background-color: {};\"></div>",
                pos(q1.min(q3)),
                (pos(q3) - pos(q1)).abs(),
                palette_color(i)
            ));
        }
        if let Some(median) = p.field_f64("median") {
            html.push_str(&format!(
                "<div class=\"box-median\" style=\"left: {:.1}%;\"></div>",
                pos(median)
            ));
        }
        html.push_str(&format!(
            "</div><span class=\"box-range\">{} to {}</span></div>\n",
            fmt_num(*min),
            fmt_num(*max)
        ));
    }
    html.push_str("</div>\n");
    Ok(html)
}

fn render_treemap(points: &[DataPoint]) -> Result<String, ShapeError> {
    let tiles: Vec<(&DataPoint, f64)> = points
        .iter()
        .filter_map(|p| p.value.as_f64().filter(|v| *v > 0.0).map(|v| (p, v)))
        .collect();
    if tiles.is_empty() {
        return Err(ShapeError::NoNumericValues);
    }
    let mut html = String::from("<div class=\"treemap\">\n");
    for (i, (p, v)) in tiles.iter().enumerate() {
        html.push_str(&format!(
            "<div class=\"treemap-tile\" style=\"flex-grow: {}; background-color: {};\"><span class=\"tile-label\">{}</span><span class=\"tile-value\">{}</span></div>\n",
            fmt_num(*v),
            palette_color(i),
            inline(&p.label),
            inline(&p.display_value())
        ));
    }
    html.push_str("</div>\n");
    Ok(html)
}
