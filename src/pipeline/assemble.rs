//! Generator: renders a [`SlidePlan`] into one self-contained HTML page.
//!
//! ## Page template
//!
//! The page is a Handlebars template filled with the slide markup, the
//! stylesheet, the navigation script and the chart initialisation script
//! (see [`crate::templates`] for the variables). A custom template from
//! [`PresentationConfig::template_path`] is tried first; when it cannot be
//! read or fails to render, the built-in template is used and a
//! [`Degradation::TemplateFallback`] is recorded.
//!
//! Generation holds no state between calls: the same plan and config always
//! produce byte-identical HTML.

use crate::config::PresentationConfig;
use crate::error::{Degradation, Doc2DeckError};
use crate::pipeline::render::{ChartSpec, RenderContext};
use crate::slides::SlidePlan;
use crate::templates::{DEFAULT_STYLES, DEFAULT_TEMPLATE, NAV_SCRIPT};
use handlebars::Handlebars;
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info, warn};

/// A rendered deck.
#[derive(Debug, Clone)]
pub struct GeneratedDeck {
    pub html: String,
    /// Canvas charts in the order they appear.
    pub charts: Vec<ChartSpec>,
    pub degradations: Vec<Degradation>,
}

/// Variables handed to the page template.
#[derive(Debug, Serialize)]
struct PageContext<'a> {
    title: &'a str,
    lang: &'a str,
    total_slides: usize,
    chart_library_url: &'a str,
    styles: &'a str,
    slides: String,
    navigation_script: &'a str,
    scripts: String,
}

/// Render every slide of `plan` and wrap them in the page template.
pub fn generate(plan: &SlidePlan, config: &PresentationConfig) -> Result<GeneratedDeck, Doc2DeckError> {
    let mut ctx = RenderContext::new(config);
    let mut slides = String::new();
    for slide in &plan.slides {
        slides.push_str(&ctx.render_slide(slide));
    }
    let (charts, mut degradations) = ctx.into_parts();

    let page = PageContext {
        title: &plan.title,
        lang: &config.lang,
        total_slides: plan.len(),
        chart_library_url: &config.chart_library_url,
        styles: DEFAULT_STYLES,
        slides,
        navigation_script: NAV_SCRIPT,
        scripts: chart_script(&charts)?,
    };
    let html = render_page(&page, config.template_path.as_deref(), &mut degradations)?;

    info!(
        "Generated {} slides, {} charts, {} bytes of HTML",
        plan.len(),
        charts.len(),
        html.len()
    );
    Ok(GeneratedDeck {
        html,
        charts,
        degradations,
    })
}

/// The chart initialisation script, run once the page has loaded.
///
/// Configurations are embedded as JSON with `</` escaped so that a label
/// can never close the surrounding `<script>` element.
pub fn chart_script(charts: &[ChartSpec]) -> Result<String, Doc2DeckError> {
    if charts.is_empty() {
        return Ok(String::new());
    }
    let mut js = String::from(
        "document.addEventListener('DOMContentLoaded', function () {\n    if (typeof Chart === 'undefined') {\n        console.warn('Chart.js did not load; charts are not drawn.');\n        return;\n    }\n",
    );
    for chart in charts {
        let config = serde_json::to_string(&chart.config)
            .map_err(|e| Doc2DeckError::Internal(format!("chart {}: {e}", chart.id)))?
            .replace("</", "<\\/");
        js.push_str(&format!(
            "    new Chart(document.getElementById('{}'), {config});\n",
            chart.id
        ));
    }
    js.push_str("});");
    Ok(js)
}

fn render_page(
    page: &PageContext<'_>,
    template_path: Option<&Path>,
    degradations: &mut Vec<Degradation>,
) -> Result<String, Doc2DeckError> {
    let hbs = Handlebars::new();

    if let Some(path) = template_path {
        match render_custom(&hbs, path, page) {
            Ok(html) => {
                debug!("Rendered with template {}", path.display());
                return Ok(html);
            }
            Err(detail) => {
                let d = Degradation::TemplateFallback {
                    path: path.to_path_buf(),
                    detail,
                };
                warn!("{d}");
                degradations.push(d);
            }
        }
    }

    hbs.render_template(DEFAULT_TEMPLATE, page)
        .map_err(|e| Doc2DeckError::TemplateRender(e.to_string()))
}

fn render_custom(hbs: &Handlebars<'_>, path: &Path, page: &PageContext<'_>) -> Result<String, String> {
    let source = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    hbs.render_template(&source, page).map_err(|e| e.to_string())
}
