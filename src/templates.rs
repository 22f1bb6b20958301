//! Built-in page template, stylesheet and navigation script.
//!
//! [`DEFAULT_TEMPLATE`] is a Handlebars template. A custom template passed
//! through [`crate::PresentationConfig::template_path`] receives the same
//! variables:
//!
//! | Variable | Escaped | Content |
//! |----------|---------|---------|
//! | `title` | yes | deck title |
//! | `lang` | yes | `<html lang>` value |
//! | `total_slides` | yes | number of slides |
//! | `chart_library_url` | yes | Chart.js script URL |
//! | `styles` | no (`{{{ }}}`) | stylesheet body |
//! | `slides` | no | concatenated slide markup |
//! | `navigation_script` | no | slide navigation JavaScript |
//! | `scripts` | no | chart initialisation JavaScript |

/// The page skeleton: navigation chrome around the slides.
pub const DEFAULT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="{{lang}}">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{{title}}</title>
<script src="{{chart_library_url}}"></script>
<style>
{{{styles}}}
</style>
</head>
<body>
<nav class="navbar">
<div class="nav-title">{{title}}</div>
<div class="nav-controls">
<button class="nav-btn" id="prevBtn" onclick="navigate(-1)" disabled>&larr; Prev</button>
<span class="slide-counter">Slide <span id="currentSlide">1</span> of <span id="totalSlides">{{total_slides}}</span></span>
<button class="nav-btn" id="nextBtn" onclick="navigate(1)">Next &rarr;</button>
<button class="nav-btn" onclick="toggleFullscreen()">&#x26F6;</button>
</div>
</nav>
<main class="slides-container">
{{{slides}}}
</main>
<script>
{{{navigation_script}}}
</script>
<script>
{{{scripts}}}
</script>
</body>
</html>
"#;

/// Slide navigation: buttons, arrow keys and fullscreen.
pub const NAV_SCRIPT: &str = r#"let currentSlide = 1;
let totalSlides = 0;

function init() {
    totalSlides = document.querySelectorAll('.slide').length;
    document.getElementById('totalSlides').textContent = totalSlides;
    document.addEventListener('keydown', handleKeyPress);
    updateNavButtons();
}

function navigate(direction) {
    const next = currentSlide + direction;
    if (next < 1 || next > totalSlides) {
        return;
    }
    document.querySelector(`.slide[data-slide="${currentSlide}"]`).classList.remove('active');
    currentSlide = next;
    document.querySelector(`.slide[data-slide="${currentSlide}"]`).classList.add('active');
    document.getElementById('currentSlide').textContent = currentSlide;
    updateNavButtons();
}

function handleKeyPress(e) {
    if (e.key === 'ArrowRight' || e.key === ' ' || e.key === 'PageDown') {
        e.preventDefault();
        navigate(1);
    } else if (e.key === 'ArrowLeft' || e.key === 'PageUp') {
        navigate(-1);
    } else if (e.key === 'Home') {
        navigate(1 - currentSlide);
    } else if (e.key === 'End') {
        navigate(totalSlides - currentSlide);
    } else if (e.key === 'Escape' && document.fullscreenElement) {
        document.exitFullscreen();
    }
}

function updateNavButtons() {
    document.getElementById('prevBtn').disabled = currentSlide === 1;
    document.getElementById('nextBtn').disabled = currentSlide === totalSlides;
}

function toggleFullscreen() {
    if (!document.fullscreenElement) {
        document.documentElement.requestFullscreen();
    } else {
        document.exitFullscreen();
    }
}

document.addEventListener('DOMContentLoaded', init);"#;

/// Stylesheet for every class the slide renderers emit.
pub const DEFAULT_STYLES: &str = r#":root {
    --primary-accent: #F85d42;
    --deep-blue: #556EE6;
    --green: #34c38f;
    --blue: #50a5f1;
    --yellow: #f1b44c;
    --text-primary: #2a3042;
    --text-secondary: #74788d;
    --background: #f8f8fb;
    --card: #ffffff;
}
* { box-sizing: border-box; margin: 0; padding: 0; }
body {
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", "PingFang SC", "Microsoft YaHei", sans-serif;
    background: var(--background);
    color: var(--text-primary);
    overflow: hidden;
}
.navbar {
    position: fixed; top: 0; left: 0; right: 0; height: 56px; z-index: 10;
    display: flex; align-items: center; justify-content: space-between;
    padding: 0 24px; background: var(--card); box-shadow: 0 2px 8px rgba(0, 0, 0, 0.06);
}
.nav-title { font-weight: 600; white-space: nowrap; overflow: hidden; text-overflow: ellipsis; }
.nav-controls { display: flex; align-items: center; gap: 12px; }
.nav-btn {
    border: none; border-radius: 6px; padding: 8px 14px; cursor: pointer;
    background: var(--deep-blue); color: #fff; font-size: 14px;
}
.nav-btn:disabled { opacity: 0.4; cursor: default; }
.slide-counter { color: var(--text-secondary); font-size: 14px; }
.slides-container { position: absolute; top: 56px; bottom: 0; left: 0; right: 0; }
.slide { display: none; height: 100%; padding: 32px 48px; overflow-y: auto; }
.slide.active { display: block; }
.header-bar { border-left: 6px solid var(--primary-accent); padding-left: 16px; margin-bottom: 24px; }
.slide-title { font-size: 32px; }
.slide-content.two-column { display: grid; grid-template-columns: 3fr 2fr; gap: 32px; }
.column { min-width: 0; }
.title-slide {
    height: 100%; display: flex; flex-direction: column; justify-content: center; align-items: center;
    text-align: center; gap: 16px;
}
.title-slide .title { font-size: 48px; }
.title-slide .subtitle { font-size: 24px; font-weight: 400; color: var(--text-secondary); }
.key-points { list-style: none; display: flex; flex-direction: column; gap: 16px; }
.key-point {
    background: var(--card); border-radius: 8px; padding: 16px 20px; font-size: 20px;
    border-left: 4px solid var(--deep-blue);
}
.section-header { font-size: 20px; margin-bottom: 12px; }
.accent-text { color: var(--primary-accent); }
.bullet-points { padding-left: 20px; display: flex; flex-direction: column; gap: 10px; font-size: 18px; }
.body-text { font-size: 18px; line-height: 1.6; margin-bottom: 12px; }
.chart-container { position: relative; height: 420px; background: var(--card); border-radius: 12px; padding: 40px 16px 16px; }
.chart-type-badge {
    position: absolute; top: 10px; left: 16px; font-size: 12px; padding: 2px 10px;
    border-radius: 10px; background: var(--background); color: var(--text-secondary);
}
.slide-content > .chart-type-badge { position: static; display: inline-block; margin-bottom: 16px; }
.chart-caption { text-align: center; font-size: 13px; color: var(--text-secondary); margin-top: 8px; }
.value-list { padding-left: 20px; font-size: 18px; line-height: 1.8; }
.quadrant-guides {
    position: absolute; inset: 40px 16px 16px; display: grid; grid-template-columns: 1fr 1fr;
    pointer-events: none; color: var(--text-secondary); font-size: 12px; opacity: 0.6;
}
.quadrant-guides span { padding: 6px; }
.heatmap { border-collapse: separate; border-spacing: 3px; margin: 0 auto; }
.heatmap th { font-size: 13px; color: var(--text-secondary); padding: 4px 8px; }
.heatmap-cell { min-width: 56px; height: 44px; text-align: center; color: #fff; font-weight: 600; border-radius: 4px; }
.heatmap-cell.empty { background: var(--background); }
.heatmap-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(90px, 1fr)); gap: 4px; }
.heatmap-grid .heatmap-cell { display: flex; flex-direction: column; justify-content: center; padding: 4px; height: 64px; }
.cell-label { font-size: 11px; font-weight: 400; }
.flow-diagram { display: flex; flex-direction: column; gap: 12px; }
.flow-row { display: grid; grid-template-columns: 120px 1fr 120px; align-items: center; gap: 8px; }
.flow-node { font-weight: 600; font-size: 14px; }
.flow-track { background: var(--background); border-radius: 6px; }
.flow-bar { color: #fff; font-size: 13px; padding: 6px 8px; border-radius: 6px; white-space: nowrap; }
.boxplot { display: flex; flex-direction: column; gap: 16px; }
.box-row { display: grid; grid-template-columns: 120px 1fr 110px; align-items: center; gap: 8px; }
.box-track { position: relative; height: 28px; }
.box-whisker { position: absolute; top: 13px; height: 2px; background: var(--text-secondary); }
.box-body { position: absolute; top: 4px; height: 20px; border-radius: 3px; opacity: 0.8; }
.box-median { position: absolute; top: 2px; width: 3px; height: 24px; background: var(--text-primary); }
.box-range { font-size: 13px; color: var(--text-secondary); }
.treemap { display: flex; flex-wrap: wrap; gap: 4px; height: 100%; }
.treemap-tile {
    flex-basis: 120px; min-height: 80px; color: #fff; border-radius: 6px; padding: 10px;
    display: flex; flex-direction: column; justify-content: space-between;
}
.tile-label { font-weight: 600; }
.pyramid-container { display: flex; flex-direction: column; align-items: center; gap: 8px; }
.pyramid-level { color: #fff; text-align: center; padding: 16px; border-radius: 6px; margin: 0 auto; }
.progression-container { display: flex; align-items: stretch; gap: 12px; flex-wrap: wrap; }
.progression-step { display: flex; align-items: center; gap: 12px; }
.step-number {
    width: 40px; height: 40px; border-radius: 50%; background: var(--deep-blue); color: #fff;
    display: flex; align-items: center; justify-content: center; font-weight: 700;
}
.step-content { background: var(--card); padding: 14px 18px; border-radius: 8px; max-width: 220px; }
.step-arrow { font-size: 28px; color: var(--text-secondary); }
.emphasis-container { display: grid; grid-template-columns: repeat(auto-fit, minmax(240px, 1fr)); gap: 16px; }
.emphasis-box { background: var(--card); border-top: 4px solid var(--primary-accent); border-radius: 8px; padding: 20px; }
.emphasis-icon { color: var(--primary-accent); font-size: 24px; margin-bottom: 8px; }
.cycle-container { position: relative; width: 360px; height: 360px; margin: 0 auto; }
.cycle-center {
    position: absolute; top: 50%; left: 50%; transform: translate(-50%, -50%);
    width: 96px; height: 96px; border-radius: 50%; background: var(--text-primary); color: #fff;
    display: flex; align-items: center; justify-content: center; font-weight: 700;
}
.cycle-node {
    position: absolute; top: 50%; left: 50%; width: 110px; margin: -40px 0 0 -55px; min-height: 80px;
    border-radius: 12px; color: #fff; padding: 8px; font-size: 13px;
    display: flex; align-items: center; justify-content: center; text-align: center;
}
.comparison-container { display: grid; grid-template-columns: 1fr auto 1fr; gap: 24px; align-items: start; }
.comparison-header { font-size: 18px; margin-bottom: 12px; }
.comparison-item { background: var(--card); padding: 12px 16px; border-radius: 8px; margin-bottom: 10px; }
.comparison-item.left { border-left: 4px solid var(--text-secondary); }
.comparison-item.right { border-left: 4px solid var(--green); }
.comparison-divider { align-self: center; font-weight: 800; font-size: 24px; color: var(--primary-accent); }
.framework-container { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 16px; }
.framework-item { background: var(--card); border-radius: 8px; padding: 16px; display: flex; gap: 12px; }
.framework-label { font-weight: 800; color: var(--deep-blue); font-size: 22px; }
.conclusions-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(260px, 1fr)); gap: 16px; margin-bottom: 24px; }
.conclusion-card { background: var(--card); border-radius: 8px; padding: 18px; border-top: 4px solid var(--green); }
.card-title { font-size: 16px; color: var(--text-secondary); margin-bottom: 8px; }
.recommendations-box { background: var(--card); border-radius: 8px; padding: 20px; }
.numbered-list { padding-left: 24px; display: flex; flex-direction: column; gap: 8px; font-size: 17px; }
@media (max-width: 900px) {
    .slide { padding: 20px; }
    .slide-content.two-column, .comparison-container { grid-template-columns: 1fr; }
}"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_has_navigation_chrome() {
        for needle in ["prevBtn", "nextBtn", "currentSlide", "totalSlides", "{{{slides}}}"] {
            assert!(DEFAULT_TEMPLATE.contains(needle), "missing {needle}");
        }
    }

    #[test]
    fn test_template_compiles() {
        let mut hbs = handlebars::Handlebars::new();
        hbs.register_template_string("page", DEFAULT_TEMPLATE).unwrap();
    }
}
