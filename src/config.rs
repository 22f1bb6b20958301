//! Configuration types for document-to-deck conversion.
//!
//! All conversion behaviour is controlled through [`PresentationConfig`],
//! built via its [`PresentationConfigBuilder`]. Keeping every knob in one
//! struct makes it easy to share a config across threads and to diff two
//! runs to understand why their decks differ.

use crate::error::Doc2DeckError;
use crate::pipeline::classify::ChartStrategy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Default Chart.js bundle referenced by the generated page.
pub const DEFAULT_CHART_LIBRARY_URL: &str = "https://cdn.jsdelivr.net/npm/chart.js";

/// Configuration for a conversion.
///
/// Built via [`PresentationConfig::builder()`] or using
/// [`PresentationConfig::default()`].
///
/// # Example
/// ```rust
/// use doc2deck::{ClassifierVersion, PresentationConfig};
///
/// let config = PresentationConfig::builder()
///     .classifier(ClassifierVersion::Legacy)
///     .max_data_slides(4)
///     .build()
///     .unwrap();
/// assert_eq!(config.max_data_slides, 4);
/// ```
#[derive(Clone)]
pub struct PresentationConfig {
    /// Which chart-selection strategy to use. Default: [`ClassifierVersion::Layered`].
    pub classifier: ClassifierVersion,

    /// Pre-constructed chart strategy. Takes precedence over `classifier`.
    pub chart_strategy: Option<Arc<dyn ChartStrategy>>,

    /// Maximum number of data-visualization slides. Default: 8.
    ///
    /// Sections with data beyond the cap become plain content slides when
    /// they have enough text, and are left out otherwise.
    pub max_data_slides: usize,

    /// Bullets on the executive-summary slide. Default: 5.
    pub max_summary_items: usize,

    /// Cards on the conclusions slide. Default: 6.
    pub max_conclusion_cards: usize,

    /// Items in the recommendation list. Default: 5.
    pub max_recommendations: usize,

    /// Points drawn per canvas chart. Default: 10.
    ///
    /// Labels on a bar or doughnut stop being legible well before twenty
    /// entries; the first points in document order are kept.
    pub max_chart_points: usize,

    /// Minimum body length (in characters) for a plain content slide. Default: 40.
    pub min_content_chars: usize,

    /// Subtitle shown under the deck title. Default: "Data Analysis & Insights".
    pub subtitle: String,

    /// External Handlebars page template. If None, uses the built-in one.
    pub template_path: Option<PathBuf>,

    /// Script URL for the chart library. Default: [`DEFAULT_CHART_LIBRARY_URL`].
    pub chart_library_url: String,

    /// Value of the page's `lang` attribute. Default: "en".
    pub lang: String,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            classifier: ClassifierVersion::default(),
            chart_strategy: None,
            max_data_slides: 8,
            max_summary_items: 5,
            max_conclusion_cards: 6,
            max_recommendations: 5,
            max_chart_points: 10,
            min_content_chars: 40,
            subtitle: "Data Analysis & Insights".to_string(),
            template_path: None,
            chart_library_url: DEFAULT_CHART_LIBRARY_URL.to_string(),
            lang: "en".to_string(),
        }
    }
}

impl fmt::Debug for PresentationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PresentationConfig")
            .field("classifier", &self.classifier)
            .field(
                "chart_strategy",
                &self.chart_strategy.as_ref().map(|s| s.name()),
            )
            .field("max_data_slides", &self.max_data_slides)
            .field("max_summary_items", &self.max_summary_items)
            .field("max_conclusion_cards", &self.max_conclusion_cards)
            .field("max_recommendations", &self.max_recommendations)
            .field("max_chart_points", &self.max_chart_points)
            .field("min_content_chars", &self.min_content_chars)
            .field("subtitle", &self.subtitle)
            .field("template_path", &self.template_path)
            .field("chart_library_url", &self.chart_library_url)
            .field("lang", &self.lang)
            .finish()
    }
}

impl PresentationConfig {
    /// Create a new builder for `PresentationConfig`.
    pub fn builder() -> PresentationConfigBuilder {
        PresentationConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`PresentationConfig`].
#[derive(Debug)]
pub struct PresentationConfigBuilder {
    config: PresentationConfig,
}

impl PresentationConfigBuilder {
    pub fn classifier(mut self, version: ClassifierVersion) -> Self {
        self.config.classifier = version;
        self
    }

    pub fn chart_strategy(mut self, strategy: Arc<dyn ChartStrategy>) -> Self {
        self.config.chart_strategy = Some(strategy);
        self
    }

    pub fn max_data_slides(mut self, n: usize) -> Self {
        self.config.max_data_slides = n;
        self
    }

    pub fn max_summary_items(mut self, n: usize) -> Self {
        self.config.max_summary_items = n;
        self
    }

    pub fn max_conclusion_cards(mut self, n: usize) -> Self {
        self.config.max_conclusion_cards = n;
        self
    }

    pub fn max_recommendations(mut self, n: usize) -> Self {
        self.config.max_recommendations = n;
        self
    }

    pub fn max_chart_points(mut self, n: usize) -> Self {
        self.config.max_chart_points = n.clamp(1, 50);
        self
    }

    pub fn min_content_chars(mut self, n: usize) -> Self {
        self.config.min_content_chars = n;
        self
    }

    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.config.subtitle = subtitle.into();
        self
    }

    pub fn template_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.template_path = Some(path.into());
        self
    }

    pub fn chart_library_url(mut self, url: impl Into<String>) -> Self {
        self.config.chart_library_url = url.into();
        self
    }

    pub fn lang(mut self, lang: impl Into<String>) -> Self {
        self.config.lang = lang.into();
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<PresentationConfig, Doc2DeckError> {
        let c = &self.config;
        if c.max_chart_points == 0 {
            return Err(Doc2DeckError::InvalidConfig(
                "max_chart_points must be ≥ 1".into(),
            ));
        }
        if c.chart_library_url.trim().is_empty() {
            return Err(Doc2DeckError::InvalidConfig(
                "chart_library_url must not be empty".into(),
            ));
        }
        if c.lang.trim().is_empty() {
            return Err(Doc2DeckError::InvalidConfig("lang must not be empty".into()));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Which chart-selection strategy classifies numeric sections.
///
/// | Version | Behaviour |
/// |---------|-----------|
/// | `Layered` | structure → field semantics → decision tree (default) |
/// | `Legacy` | flat keyword lists over labels, as the first generator did |
///
/// Both versions share the same conceptual-diagram mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierVersion {
    #[default]
    Layered,
    Legacy,
}
