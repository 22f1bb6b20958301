//! Chart and diagram selection.
//!
//! ## Two paths
//!
//! A section either carries numbers or it does not:
//!
//! * **Numeric path**: a [`ChartStrategy`] picks a [`ChartType`] for the
//!   section's data points. Only ever invoked with at least one point.
//! * **Conceptual path**: [`classify_conceptual`] maps the section's wording
//!   to a [`ConceptualType`] diagram, or to nothing.
//!
//! ## The layered strategy
//!
//! [`LayeredStrategy`] decides in three layers, and the first decisive
//! layer wins:
//!
//! 1. **Structure** ([`analyze_structure`]): fields on the points that only
//!    one chart can show: `x`/`y` pairs, `min`/`max` ranges,
//!    `source`/`target` flows, `row`/`column` grids, more than 20 points.
//! 2. **Semantics** ([`analyze_semantics`]): what the labels are about
//!    (time, categories, levels, places, money, performance).
//! 3. **Decision tree** ([`decide`]): ordered rules over both, consulting
//!    the section title and body for modifiers such as "seasonal" or
//!    "portfolio".
//!
//! [`KeywordStrategy`] is the flat keyword-list cascade the first generator
//! used. It is kept selectable through
//! [`ClassifierVersion::Legacy`](crate::config::ClassifierVersion::Legacy)
//! so decks built with it can be reproduced.

use crate::config::{ClassifierVersion, PresentationConfig};
use crate::document::DataPoint;
use crate::pipeline::lexicon::{self, Lexicon};
use crate::slides::{ChartType, ConceptualType, Visualization};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// The section a set of points came from.
#[derive(Debug, Clone, Copy, Default)]
pub struct SectionContext<'a> {
    pub title: &'a str,
    pub content: &'a str,
}

impl<'a> SectionContext<'a> {
    pub fn new(title: &'a str, content: &'a str) -> Self {
        Self { title, content }
    }

    fn matches(&self, lexicon: &Lexicon) -> bool {
        lexicon.matches(self.title) || lexicon.matches(self.content)
    }
}

/// A numeric chart-selection strategy.
pub trait ChartStrategy: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Choose a chart for a non-empty set of points.
    fn choose(&self, points: &[DataPoint], context: &SectionContext<'_>) -> ChartType;
}

/// Classifier entry point combining a numeric strategy with the conceptual path.
#[derive(Clone)]
pub struct Classifier {
    strategy: Arc<dyn ChartStrategy>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(ClassifierVersion::Layered)
    }
}

impl Classifier {
    pub fn new(version: ClassifierVersion) -> Self {
        let strategy: Arc<dyn ChartStrategy> = match version {
            ClassifierVersion::Layered => Arc::new(LayeredStrategy),
            ClassifierVersion::Legacy => Arc::new(KeywordStrategy),
        };
        Self { strategy }
    }

    pub fn with_strategy(strategy: Arc<dyn ChartStrategy>) -> Self {
        Self { strategy }
    }

    /// A pre-built strategy in the config wins over its version setting.
    pub fn from_config(config: &PresentationConfig) -> Self {
        match &config.chart_strategy {
            Some(strategy) => Self::with_strategy(Arc::clone(strategy)),
            None => Self::new(config.classifier),
        }
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Choose how to visualise a section.
    ///
    /// Sections with points always get a chart. Sections without points get
    /// a diagram when their wording suggests one, and `None` otherwise.
    pub fn classify(
        &self,
        points: &[DataPoint],
        context: &SectionContext<'_>,
    ) -> Option<Visualization> {
        if points.is_empty() {
            return classify_conceptual(context).map(Visualization::Diagram);
        }
        let chart = self.strategy.choose(points, context);
        debug!(
            "'{}': {} points → {} ({})",
            context.title,
            points.len(),
            chart,
            self.strategy.name()
        );
        Some(Visualization::Chart(chart))
    }
}

/// Classify with the default layered strategy.
pub fn classify(points: &[DataPoint], context: &SectionContext<'_>) -> Option<Visualization> {
    Classifier::default().classify(points, context)
}

// ── Conceptual path ──────────────────────────────────────────────────────

/// Map a section's wording to a diagram kind.
///
/// Vocabularies are tried in a fixed order (hierarchy, progression,
/// emphasis, cycle, comparison, framework) and the first hit wins.
pub fn classify_conceptual(context: &SectionContext<'_>) -> Option<ConceptualType> {
    let families: [(&Lexicon, ConceptualType); 6] = [
        (&lexicon::HIERARCHY, ConceptualType::Pyramid),
        (&lexicon::PROGRESSION, ConceptualType::Progression),
        (&lexicon::EMPHASIS, ConceptualType::Emphasis),
        (&lexicon::CYCLE, ConceptualType::Cycle),
        (&lexicon::COMPARISON, ConceptualType::Comparison),
        (&lexicon::FRAMEWORK, ConceptualType::Framework),
    ];
    families
        .into_iter()
        .find(|(lex, _)| context.matches(lex))
        .map(|(_, kind)| kind)
}

// ── Layer 1: structure ───────────────────────────────────────────────────

/// Above this many points a grid reads better than any axis chart.
pub const DENSE_POINT_COUNT: usize = 20;

/// Shape hints carried by the points themselves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StructuralTraits {
    pub has_xy: bool,
    pub has_xyz: bool,
    pub has_ranges: bool,
    pub has_flow: bool,
    pub has_matrix: bool,
    pub is_dense: bool,
}

pub fn analyze_structure(points: &[DataPoint]) -> StructuralTraits {
    let all = |f: &dyn Fn(&DataPoint) -> bool| !points.is_empty() && points.iter().all(f);

    let has_xy = all(&|p| p.field_f64("x").is_some() && p.field_f64("y").is_some());
    let has_size = all(&|p| {
        p.field_f64("z").is_some() || p.field_f64("size").is_some() || p.field_f64("r").is_some()
    });
    StructuralTraits {
        has_xy,
        has_xyz: has_xy && has_size,
        has_ranges: all(&|p| p.field_f64("min").is_some() && p.field_f64("max").is_some()),
        has_flow: all(&|p| p.field_str("source").is_some() && p.field_str("target").is_some()),
        has_matrix: all(&|p| p.field_str("row").is_some() && p.field_str("column").is_some()),
        is_dense: points.len() > DENSE_POINT_COUNT,
    }
}

// ── Layer 2: semantics ───────────────────────────────────────────────────

/// What the labels are about.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SemanticTraits {
    pub temporal: bool,
    pub categorical: bool,
    pub hierarchical: bool,
    pub geographic: bool,
    pub financial: bool,
    pub performance: bool,
    /// Share of points whose unit is `%`.
    pub percentage_ratio: f64,
}

static RE_YEAR_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|[^\d])(?:1[89]|2[01])\d{2}(?:[^\d]|$)").unwrap());

static RE_QUARTER_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:^|[^a-z])q[1-4](?:[^\d]|$)").unwrap());

/// `true` when a label names a point in time (year, quarter, month, …).
pub fn is_temporal_label(label: &str) -> bool {
    RE_YEAR_TOKEN.is_match(label)
        || RE_QUARTER_TOKEN.is_match(label)
        || lexicon::TEMPORAL_WORDS.matches(label)
}

pub fn analyze_semantics(points: &[DataPoint]) -> SemanticTraits {
    if points.is_empty() {
        return SemanticTraits::default();
    }
    let n = points.len();
    let text: String = points
        .iter()
        .map(|p| format!("{} {}", p.label, p.unit.as_deref().unwrap_or("")))
        .collect::<Vec<_>>()
        .join(" | ");

    let temporal_labels = points.iter().filter(|p| is_temporal_label(&p.label)).count();
    let temporal = temporal_labels * 2 >= n;
    let numeric_labels = points
        .iter()
        .any(|p| p.label.trim().parse::<f64>().is_ok());

    SemanticTraits {
        temporal,
        categorical: lexicon::CATEGORICAL.matches(&text) || (!temporal && !numeric_labels),
        hierarchical: lexicon::HIERARCHICAL.matches(&text),
        geographic: lexicon::GEOGRAPHIC.matches(&text),
        financial: lexicon::FINANCIAL.matches(&text),
        performance: lexicon::PERFORMANCE.matches(&text),
        percentage_ratio: points.iter().filter(|p| p.is_percentage()).count() as f64 / n as f64,
    }
}

// ── Layer 3: decision tree ───────────────────────────────────────────────

/// Apply the ordered decision rules.
pub fn decide(
    structure: &StructuralTraits,
    semantics: &SemanticTraits,
    points: &[DataPoint],
    context: &SectionContext<'_>,
) -> ChartType {
    let n = points.len();
    let labels = points
        .iter()
        .map(|p| p.label.as_str())
        .collect::<Vec<_>>()
        .join(" | ");
    let mentions = |lex: &Lexicon| context.matches(lex) || lex.matches(&labels);

    // ── Rule 1: structural shapes ─────────────────────────────────────────
    if structure.has_xyz {
        return ChartType::Bubble;
    }
    if structure.has_xy {
        return ChartType::Scatter;
    }
    if structure.has_ranges {
        return ChartType::Boxplot;
    }
    if structure.has_flow {
        return ChartType::Sankey;
    }
    if structure.has_matrix || structure.is_dense {
        return ChartType::Heatmap;
    }

    // ── Rule 2: a few shares of one whole ─────────────────────────────────
    if n <= 5 && points.iter().all(DataPoint::is_percentage) {
        return ChartType::Doughnut;
    }

    // ── Rule 3: hierarchy ─────────────────────────────────────────────────
    if semantics.hierarchical {
        return if n <= 5 {
            ChartType::Pyramid
        } else {
            ChartType::Treemap
        };
    }

    // ── Rule 4: time ──────────────────────────────────────────────────────
    if semantics.temporal {
        if context.matches(&lexicon::STEPWISE) {
            return ChartType::Step;
        }
        if context.matches(&lexicon::CYCLICAL) {
            return ChartType::PolarArea;
        }
        return ChartType::Line;
    }

    // ── Rule 5: categories ────────────────────────────────────────────────
    if semantics.categorical {
        if n <= 5 && semantics.percentage_ratio >= 0.6 {
            return ChartType::Doughnut;
        }
        if n <= 8 && semantics.percentage_ratio >= 0.5 {
            return ChartType::Pie;
        }
        if n > 10 {
            return ChartType::Bar;
        }
    }

    // ── Rule 6: several dimensions of one subject ─────────────────────────
    if (3..=8).contains(&n) && mentions(&lexicon::MULTI_DIMENSIONAL) {
        return ChartType::Radar;
    }

    // ── Rule 7: strategic positioning ─────────────────────────────────────
    let positioned = points
        .iter()
        .all(|p| p.field_f64("share").is_some() && p.field_f64("growth").is_some());
    if positioned && mentions(&lexicon::STRATEGIC) {
        return ChartType::Quadrant;
    }

    // ── Rule 8: rankings ──────────────────────────────────────────────────
    if mentions(&lexicon::RANKING) {
        return if n <= 8 {
            ChartType::PolarArea
        } else {
            ChartType::Bar
        };
    }

    // ── Rule 9: trends without dates ──────────────────────────────────────
    if lexicon::TREND.matches(&labels) && !semantics.geographic {
        return ChartType::Line;
    }

    ChartType::Bar
}

/// Structure → semantics → decision tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayeredStrategy;

impl ChartStrategy for LayeredStrategy {
    fn name(&self) -> &'static str {
        "layered"
    }

    fn choose(&self, points: &[DataPoint], context: &SectionContext<'_>) -> ChartType {
        let structure = analyze_structure(points);
        let semantics = analyze_semantics(points);
        debug!(?structure, ?semantics, "'{}': classifier traits", context.title);
        decide(&structure, &semantics, points, context)
    }
}

// ── Legacy keyword cascade ───────────────────────────────────────────────

const LEGACY_RANKING: &[&str] = &[
    "排名", "rank", "level", "tier", "priority", "等级", "优先级", "top", "best", "market share",
];
const LEGACY_FLOW: &[&str] = &[
    "转化", "漏斗", "flow", "journey", "process", "stage", "阶段", "流程", "step", "funnel",
];
const LEGACY_DISTRIBUTION: &[&str] = &[
    "分布", "distribution", "spread", "range", "variance", "outlier", "deviation", "scatter",
];
const LEGACY_TIME: &[&str] = &[
    "q1", "q2", "q3", "q4", "季度", "月", "年", "week", "month", "year", "周期", "season",
    "季节", "循环", "阶梯", "discrete",
];
const LEGACY_CYCLIC: &[&str] = &["周期", "season", "循环", "polar", "arc"];
const LEGACY_KPI: &[&str] = &[
    "kpi", "target", "goal", "目标", "达标", "achieve", "budget", "actual", "forecast", "预测",
];
const LEGACY_MULTI_DIM: &[&str] = &[
    "雷达", "radar", "spider", "多维", "dimension", "skill", "能力", "feature", "competitor",
    "matrix",
];
const LEGACY_PROPORTION: &[&str] = &[
    "占比", "share", "composition", "breakdown", "构成", "分配", "split", "mix", "portion",
];
const LEGACY_TREND: &[&str] = &[
    "趋势", "growth", "增长", "trend", "change", "increase", "decrease", "变化", "上升", "下降",
];
const LEGACY_COMPARISON: &[&str] = &[
    "对比", "compare", "vs", "versus", "difference", "差异", "regional", "region", "区域",
];
const LEGACY_STRATEGY: &[&str] = &[
    "bcg", "portfolio", "strategy", "战略", "positioning", "定位", "投资",
];

static RE_LEGACY_TIME_SERIES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\d{4}|q[1-4]|jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec|一月|二月|三月|四月|五月|六月|七月|八月|九月|十月|十一月|十二月",
    )
    .unwrap()
});

/// Flat keyword lists over the lower-cased labels, first hit wins.
///
/// Matching is by plain substring, as the first generator did, so `"step"`
/// also fires inside `"steps"` and `"footstep"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordStrategy;

impl ChartStrategy for KeywordStrategy {
    fn name(&self) -> &'static str {
        "legacy-keywords"
    }

    fn choose(&self, points: &[DataPoint], _context: &SectionContext<'_>) -> ChartType {
        let n = points.len();
        let text = points
            .iter()
            .map(|p| p.label.to_lowercase())
            .collect::<Vec<_>>()
            .join(" ");
        let any = |words: &[&str]| words.iter().any(|w| text.contains(w));
        let percent_count = points.iter().filter(|p| p.is_percentage()).count();

        if any(LEGACY_RANKING) {
            return if n <= 8 {
                ChartType::PolarArea
            } else {
                ChartType::Bar
            };
        }
        if any(LEGACY_FLOW) {
            return if text.contains("funnel") || text.contains("漏斗") {
                ChartType::Bar
            } else {
                ChartType::Line
            };
        }
        if any(LEGACY_DISTRIBUTION) {
            return if n >= 5 {
                ChartType::Bubble
            } else {
                ChartType::PolarArea
            };
        }
        if any(LEGACY_TIME) {
            return if any(LEGACY_CYCLIC) {
                ChartType::PolarArea
            } else {
                ChartType::Line
            };
        }
        if any(LEGACY_KPI) {
            return ChartType::Bar;
        }
        if any(LEGACY_MULTI_DIM) {
            return ChartType::Radar;
        }
        let mostly_percent = n <= 7 && percent_count as f64 >= n as f64 * 0.6;
        if mostly_percent || any(LEGACY_PROPORTION) {
            return if n <= 5 {
                ChartType::Doughnut
            } else {
                ChartType::Pie
            };
        }
        if any(LEGACY_TREND) {
            return ChartType::Line;
        }
        let long_labels = points.iter().any(|p| p.label.chars().count() > 15);
        if any(LEGACY_COMPARISON) || long_labels {
            return ChartType::Bar;
        }
        if any(LEGACY_STRATEGY) {
            return ChartType::Scatter;
        }
        if n <= 5 && percent_count == n {
            return ChartType::Doughnut;
        }
        if RE_LEGACY_TIME_SERIES.is_match(&text) {
            return ChartType::Line;
        }
        ChartType::Bar
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pct(label: &str, v: f64) -> DataPoint {
        DataPoint::new(label, v).with_unit("%")
    }

    fn num(label: &str, v: f64) -> DataPoint {
        DataPoint::new(label, v)
    }

    fn chart(points: &[DataPoint], title: &str, content: &str) -> ChartType {
        match classify(points, &SectionContext::new(title, content)) {
            Some(Visualization::Chart(c)) => c,
            other => panic!("expected a chart, got {other:?}"),
        }
    }

    #[test]
    fn test_small_percentage_sets_are_doughnuts() {
        let points = vec![pct("A", 30.0), pct("B", 70.0)];
        assert_eq!(chart(&points, "", ""), ChartType::Doughnut);
    }

    #[test]
    fn test_years_make_a_line() {
        let points = vec![num("2020", 100.0), num("2021", 120.0), num("2022", 150.0)];
        assert_eq!(chart(&points, "Revenue", ""), ChartType::Line);
    }

    #[test]
    fn test_age_groups_are_not_a_time_series() {
        let points = vec![num("青年", 100.0), num("中年", 200.0), num("老年", 80.0)];
        assert_eq!(chart(&points, "用户画像", ""), ChartType::Bar);
        let dated = vec![num("2022年", 1.0), num("2023年", 2.0), num("2024年", 3.0)];
        assert_eq!(chart(&dated, "营收", ""), ChartType::Line);
    }

    #[test]
    fn test_quarters_with_seasonal_context() {
        let points = vec![num("Q1", 1.0), num("Q2", 2.0), num("Q3", 3.0), num("Q4", 2.0)];
        assert_eq!(
            chart(&points, "Seasonal demand", ""),
            ChartType::PolarArea
        );
        assert_eq!(
            chart(&points, "Tiered pricing", "discrete price points"),
            ChartType::Step
        );
    }

    #[test]
    fn test_structural_fields_win() {
        let xy: Vec<DataPoint> = (0..3)
            .map(|i| {
                num(&format!("p{i}"), 1.0)
                    .with_field("x", json!(i))
                    .with_field("y", json!(i * 2))
            })
            .collect();
        assert_eq!(chart(&xy, "", ""), ChartType::Scatter);

        let bubbles: Vec<DataPoint> = xy
            .iter()
            .cloned()
            .map(|p| p.with_field("size", json!(4)))
            .collect();
        assert_eq!(chart(&bubbles, "", ""), ChartType::Bubble);

        let flows = vec![num("a", 5.0)
            .with_field("source", json!("Visit"))
            .with_field("target", json!("Signup"))];
        assert_eq!(chart(&flows, "", ""), ChartType::Sankey);

        let ranges = vec![num("a", 5.0)
            .with_field("min", json!(1))
            .with_field("max", json!(9))];
        assert_eq!(chart(&ranges, "", ""), ChartType::Boxplot);
    }

    #[test]
    fn test_dense_sets_become_heatmaps() {
        let points: Vec<DataPoint> = (0..25).map(|i| num(&format!("cell {i}"), i as f64)).collect();
        assert_eq!(chart(&points, "", ""), ChartType::Heatmap);
    }

    #[test]
    fn test_hierarchy() {
        let points = vec![num("Level 1", 10.0), num("Level 2", 30.0), num("Level 3", 60.0)];
        assert_eq!(chart(&points, "", ""), ChartType::Pyramid);
        let many: Vec<DataPoint> = (1..=7).map(|i| num(&format!("Tier {i}"), 1.0)).collect();
        assert_eq!(chart(&many, "", ""), ChartType::Treemap);
    }

    #[test]
    fn test_radar_needs_keyword_and_size() {
        let points = vec![
            num("Speed", 7.0),
            num("Quality", 8.0),
            num("Price", 5.0),
            num("Support", 6.0),
        ];
        assert_eq!(chart(&points, "Competitor capabilities", ""), ChartType::Radar);
        assert_eq!(chart(&points, "Scores", ""), ChartType::Bar);
    }

    #[test]
    fn test_quadrant_needs_share_and_growth() {
        let points = vec![
            num("Alpha", 1.0)
                .with_field("share", json!(40))
                .with_field("growth", json!(12)),
            num("Beta", 1.0)
                .with_field("share", json!(10))
                .with_field("growth", json!(30)),
        ];
        assert_eq!(chart(&points, "Portfolio review", ""), ChartType::Quadrant);
        assert_ne!(chart(&points, "Products", ""), ChartType::Quadrant);
    }

    #[test]
    fn test_categorical_shares() {
        let points: Vec<DataPoint> = ["North", "South", "East", "West", "Central", "Online"]
            .iter()
            .map(|l| pct(l, 10.0))
            .collect();
        assert_eq!(chart(&points, "", ""), ChartType::Pie);
    }

    #[test]
    fn test_ranking() {
        let points = vec![num("Top seller", 9.0), num("Runner up", 7.0), num("Third", 4.0)];
        assert_eq!(chart(&points, "Product ranking", ""), ChartType::PolarArea);
    }

    #[test]
    fn test_default_is_bar() {
        let points = vec![num("Apples", 4.0), num("Pears", 6.0)];
        assert_eq!(chart(&points, "Fruit", ""), ChartType::Bar);
    }

    #[test]
    fn test_empty_points_take_conceptual_path() {
        struct Panics;
        impl ChartStrategy for Panics {
            fn name(&self) -> &'static str {
                "panics"
            }
            fn choose(&self, _: &[DataPoint], _: &SectionContext<'_>) -> ChartType {
                panic!("numeric path must not run without points")
            }
        }
        let classifier = Classifier::with_strategy(Arc::new(Panics));
        let ctx = SectionContext::new("Implementation roadmap", "Phase one, then phase two");
        assert_eq!(
            classifier.classify(&[], &ctx),
            Some(Visualization::Diagram(ConceptualType::Progression))
        );
        assert_eq!(
            classifier.classify(&[], &SectionContext::new("Background", "Plain prose")),
            None
        );
    }

    #[test]
    fn test_conceptual_order() {
        let ctx = |t| SectionContext::new(t, "");
        assert_eq!(
            classify_conceptual(&ctx("Organization structure")),
            Some(ConceptualType::Pyramid)
        );
        assert_eq!(
            classify_conceptual(&ctx("Key takeaways")),
            Some(ConceptualType::Emphasis)
        );
        assert_eq!(
            classify_conceptual(&ctx("Feedback loop")),
            Some(ConceptualType::Cycle)
        );
        assert_eq!(
            classify_conceptual(&ctx("Before and after")),
            Some(ConceptualType::Comparison)
        );
        assert_eq!(
            classify_conceptual(&ctx("Golden circle")),
            Some(ConceptualType::Framework)
        );
        assert_eq!(
            classify_conceptual(&ctx("用户金字塔")),
            Some(ConceptualType::Pyramid)
        );
    }

    #[test]
    fn test_legacy_strategy() {
        let s = KeywordStrategy;
        let ctx = SectionContext::default();
        assert_eq!(
            s.choose(&[num("Top brand", 1.0), num("Second", 2.0)], &ctx),
            ChartType::PolarArea
        );
        assert_eq!(
            s.choose(&[num("Sales funnel entry", 1.0)], &ctx),
            ChartType::Bar
        );
        assert_eq!(s.choose(&[num("2021", 1.0)], &ctx), ChartType::Line);
        assert_eq!(
            s.choose(&[pct("A", 40.0), pct("B", 60.0)], &ctx),
            ChartType::Doughnut
        );
        assert_eq!(s.choose(&[num("Apples", 1.0)], &ctx), ChartType::Bar);
    }

    #[test]
    fn test_classifier_from_config_prefers_strategy_object() {
        let config = PresentationConfig::builder()
            .classifier(ClassifierVersion::Layered)
            .chart_strategy(Arc::new(KeywordStrategy))
            .build()
            .unwrap();
        assert_eq!(
            Classifier::from_config(&config).strategy_name(),
            "legacy-keywords"
        );
        let config = PresentationConfig::builder()
            .classifier(ClassifierVersion::Legacy)
            .build()
            .unwrap();
        assert_eq!(
            Classifier::from_config(&config).strategy_name(),
            "legacy-keywords"
        );
        assert_eq!(Classifier::default().strategy_name(), "layered");
    }
}
