//! Chart.js configuration synthesis for canvas-drawn charts.
//!
//! [`build_chart_config`] turns a chart type and its data points into the
//! `{type, data, options}` object handed to `new Chart(...)`. Labels and
//! values are taken verbatim from the points; only the first
//! `max_points` are drawn. Colours come from a fixed palette by index, and
//! axes and legend from a per-type table, so the same input always gives
//! the same configuration.
//!
//! The four HTML-drawn kinds (heatmap, sankey, boxplot, treemap) have no
//! canvas configuration; see [`crate::pipeline::render`].

use crate::document::{number_to_json, DataPoint};
use crate::slides::ChartType;
use serde_json::{json, Map, Value};
use thiserror::Error;

/// Series colours, assigned by point index and cycled.
pub const PALETTE: [&str; 5] = ["#556EE6", "#34c38f", "#50a5f1", "#f1b44c", "#F85d42"];

const BUBBLE_MIN_RADIUS: f64 = 5.0;
const BUBBLE_MAX_RADIUS: f64 = 20.0;

/// Why a set of points cannot feed a chart type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShapeError {
    #[error("no numeric values")]
    NoNumericValues,

    #[error("point '{label}' has no '{field}' field")]
    MissingField { label: String, field: &'static str },

    #[error("needs at least {min} points, got {got}")]
    TooFewPoints { min: usize, got: usize },

    #[error("point '{label}' is negative and cannot be a share of a whole")]
    NegativeShare { label: String },

    #[error("{0} charts are drawn as HTML, not on a canvas")]
    NotCanvas(ChartType),
}

/// Palette colour for the `i`-th series entry.
pub fn palette_color(i: usize) -> &'static str {
    PALETTE[i % PALETTE.len()]
}

/// `#rrggbb` → `rgba(r, g, b, alpha)`. Anything else is returned unchanged.
pub fn with_alpha(hex: &str, alpha: f64) -> String {
    let digits = hex.trim_start_matches('#');
    let channel = |i: usize| {
        digits
            .get(i..i + 2)
            .and_then(|c| u8::from_str_radix(c, 16).ok())
    };
    match (digits.len(), channel(0), channel(2), channel(4)) {
        (6, Some(r), Some(g), Some(b)) => format!("rgba({r}, {g}, {b}, {alpha})"),
        _ => hex.to_string(),
    }
}

/// The Chart.js `type` a chart is drawn as, or `None` for HTML-drawn kinds.
pub fn chart_js_type(chart: ChartType) -> Option<&'static str> {
    match chart {
        ChartType::Bar | ChartType::Pyramid => Some("bar"),
        ChartType::Line | ChartType::Step => Some("line"),
        ChartType::Pie => Some("pie"),
        ChartType::Doughnut => Some("doughnut"),
        ChartType::Radar => Some("radar"),
        ChartType::PolarArea => Some("polarArea"),
        ChartType::Bubble => Some("bubble"),
        ChartType::Scatter | ChartType::Quadrant => Some("scatter"),
        ChartType::Heatmap | ChartType::Sankey | ChartType::Boxplot | ChartType::Treemap => None,
    }
}

fn is_arc(chart: ChartType) -> bool {
    matches!(
        chart,
        ChartType::Pie | ChartType::Doughnut | ChartType::PolarArea
    )
}

/// Build the Chart.js configuration for `chart` from the first `max_points`
/// points.
pub fn build_chart_config(
    chart: ChartType,
    points: &[DataPoint],
    max_points: usize,
) -> Result<Value, ShapeError> {
    let js_type = chart_js_type(chart).ok_or(ShapeError::NotCanvas(chart))?;
    let points = &points[..points.len().min(max_points)];
    check_shape(chart, points)?;

    let labels: Vec<Value> = points.iter().map(|p| Value::String(p.label.clone())).collect();
    let dataset = build_dataset(chart, points);

    Ok(json!({
        "type": js_type,
        "data": {
            "labels": labels,
            "datasets": [dataset],
        },
        "options": build_options(chart),
    }))
}

fn check_shape(chart: ChartType, points: &[DataPoint]) -> Result<(), ShapeError> {
    match chart {
        ChartType::Quadrant => {
            for p in points {
                for field in ["share", "growth"] {
                    if p.field_f64(field).is_none() {
                        return Err(ShapeError::MissingField {
                            label: p.label.clone(),
                            field,
                        });
                    }
                }
            }
            if points.is_empty() {
                return Err(ShapeError::NoNumericValues);
            }
            return Ok(());
        }
        ChartType::Scatter if points.iter().all(|p| p.field_f64("x").is_some() && p.field_f64("y").is_some()) => {
            return if points.is_empty() {
                Err(ShapeError::NoNumericValues)
            } else {
                Ok(())
            };
        }
        _ => {}
    }

    if !points.iter().any(|p| p.value.as_f64().is_some()) {
        return Err(ShapeError::NoNumericValues);
    }
    if chart == ChartType::Radar && points.len() < 3 {
        return Err(ShapeError::TooFewPoints {
            min: 3,
            got: points.len(),
        });
    }
    if is_arc(chart) {
        if let Some(p) = points.iter().find(|p| p.value.as_f64().is_some_and(|v| v < 0.0)) {
            return Err(ShapeError::NegativeShare {
                label: p.label.clone(),
            });
        }
    }
    Ok(())
}

// ── Datasets ─────────────────────────────────────────────────────────────

fn values(points: &[DataPoint]) -> Vec<Value> {
    points
        .iter()
        .map(|p| p.value.as_f64().map_or(Value::Null, number_to_json))
        .collect()
}

fn colors(n: usize, alpha: Option<f64>) -> Vec<Value> {
    (0..n)
        .map(|i| {
            let c = palette_color(i);
            Value::String(alpha.map_or_else(|| c.to_string(), |a| with_alpha(c, a)))
        })
        .collect()
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Bubble radii scaled into 5–20 px from `z`/`size`/`r` fields or, failing
/// those, from the values themselves.
fn bubble_radii(points: &[DataPoint]) -> Vec<f64> {
    let sizes: Vec<f64> = points
        .iter()
        .map(|p| {
            p.field_f64("z")
                .or_else(|| p.field_f64("size"))
                .or_else(|| p.field_f64("r"))
                .or_else(|| p.value.as_f64())
                .unwrap_or(0.0)
        })
        .collect();
    let min = sizes.iter().copied().fold(f64::INFINITY, f64::min);
    let max = sizes.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    sizes
        .iter()
        .map(|s| {
            if max > min {
                round1(BUBBLE_MIN_RADIUS + (s - min) / (max - min) * (BUBBLE_MAX_RADIUS - BUBBLE_MIN_RADIUS))
            } else {
                (BUBBLE_MIN_RADIUS + BUBBLE_MAX_RADIUS) / 2.0
            }
        })
        .collect()
}

fn xy(p: &DataPoint, index: usize) -> (Value, Value) {
    let x = p
        .field_f64("x")
        .map_or_else(|| Value::from(index as i64), number_to_json);
    let y = p
        .field_f64("y")
        .or_else(|| p.value.as_f64())
        .map_or(Value::Null, number_to_json);
    (x, y)
}

fn build_dataset(chart: ChartType, points: &[DataPoint]) -> Value {
    let n = points.len();
    let mut ds = Map::new();
    ds.insert("label".into(), json!("Value"));

    match chart {
        ChartType::Line | ChartType::Step => {
            let color = palette_color(0);
            ds.insert("data".into(), Value::Array(values(points)));
            ds.insert("borderColor".into(), json!(color));
            ds.insert("backgroundColor".into(), json!(with_alpha(color, 0.2)));
            ds.insert("pointBackgroundColor".into(), Value::Array(colors(n, None)));
            ds.insert("borderWidth".into(), json!(2));
            ds.insert("fill".into(), json!(true));
            ds.insert("pointRadius".into(), json!(5));
            ds.insert("pointHoverRadius".into(), json!(7));
            if chart == ChartType::Step {
                ds.insert("stepped".into(), json!(true));
            } else {
                ds.insert("tension".into(), json!(0.3));
            }
        }
        ChartType::Radar => {
            let color = palette_color(0);
            ds.insert("data".into(), Value::Array(values(points)));
            ds.insert("backgroundColor".into(), json!(with_alpha(color, 0.2)));
            ds.insert("borderColor".into(), json!(color));
            ds.insert("pointBackgroundColor".into(), json!(color));
            ds.insert("borderWidth".into(), json!(2));
        }
        ChartType::Bubble => {
            let radii = bubble_radii(points);
            let data = points
                .iter()
                .zip(radii)
                .enumerate()
                .map(|(i, (p, r))| {
                    let (x, y) = xy(p, i);
                    json!({"x": x, "y": y, "r": number_to_json(r)})
                })
                .collect();
            ds.insert("data".into(), Value::Array(data));
            ds.insert("backgroundColor".into(), Value::Array(colors(n, Some(0.7))));
            ds.insert("borderColor".into(), Value::Array(colors(n, None)));
        }
        ChartType::Scatter => {
            let data = points
                .iter()
                .enumerate()
                .map(|(i, p)| {
                    let (x, y) = xy(p, i);
                    json!({"x": x, "y": y})
                })
                .collect();
            ds.insert("data".into(), Value::Array(data));
            ds.insert("backgroundColor".into(), Value::Array(colors(n, Some(0.7))));
            ds.insert("borderColor".into(), Value::Array(colors(n, None)));
            ds.insert("pointRadius".into(), json!(6));
        }
        ChartType::Quadrant => {
            let data = points
                .iter()
                .map(|p| {
                    json!({
                        "x": p.field_f64("share").map_or(Value::Null, number_to_json),
                        "y": p.field_f64("growth").map_or(Value::Null, number_to_json),
                    })
                })
                .collect();
            ds.insert("data".into(), Value::Array(data));
            ds.insert("backgroundColor".into(), Value::Array(colors(n, Some(0.7))));
            ds.insert("borderColor".into(), Value::Array(colors(n, None)));
            ds.insert("pointRadius".into(), json!(8));
        }
        ChartType::Pie | ChartType::Doughnut | ChartType::PolarArea => {
            ds.insert("data".into(), Value::Array(values(points)));
            ds.insert("backgroundColor".into(), Value::Array(colors(n, None)));
            ds.insert("borderColor".into(), json!("#ffffff"));
            ds.insert("borderWidth".into(), json!(2));
        }
        // Bar and pyramid; HTML-drawn kinds never get here.
        _ => {
            ds.insert("data".into(), Value::Array(values(points)));
            ds.insert("backgroundColor".into(), Value::Array(colors(n, Some(0.7))));
            ds.insert("borderColor".into(), Value::Array(colors(n, None)));
            ds.insert("borderWidth".into(), json!(0));
            ds.insert("borderRadius".into(), json!(4));
        }
    }
    Value::Object(ds)
}

// ── Options ──────────────────────────────────────────────────────────────

/// Axis families from the per-type lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axes {
    /// Category axis along x, values on y.
    Category,
    /// Category axis along y (horizontal bars).
    CategoryHorizontal,
    /// Two value axes.
    Numeric,
    /// One radial value axis.
    Radial,
    /// No axes at all.
    Hidden,
}

fn axes_for(chart: ChartType) -> Axes {
    match chart {
        ChartType::Bar | ChartType::Line | ChartType::Step => Axes::Category,
        ChartType::Pyramid => Axes::CategoryHorizontal,
        ChartType::Scatter | ChartType::Bubble | ChartType::Quadrant => Axes::Numeric,
        ChartType::Radar => Axes::Radial,
        _ => Axes::Hidden,
    }
}

fn shows_legend(chart: ChartType) -> bool {
    matches!(
        chart,
        ChartType::Pie | ChartType::Doughnut | ChartType::PolarArea | ChartType::Radar
    )
}

fn value_axis() -> Value {
    json!({
        "beginAtZero": true,
        "grid": {"color": "#e0e0e0"},
        "ticks": {"font": {"size": 12}},
    })
}

fn category_axis() -> Value {
    json!({
        "grid": {"display": false},
        "ticks": {"font": {"size": 11}},
    })
}

fn titled(mut axis: Value, title: &str) -> Value {
    if let Value::Object(map) = &mut axis {
        map.insert("title".into(), json!({"display": true, "text": title}));
    }
    axis
}

fn build_options(chart: ChartType) -> Value {
    let mut options = json!({
        "responsive": true,
        "maintainAspectRatio": false,
        "plugins": {
            "legend": {
                "display": shows_legend(chart),
                "position": "bottom",
            },
            "tooltip": {
                "backgroundColor": "rgba(0, 0, 0, 0.8)",
                "padding": 12,
                "titleFont": {"size": 14, "weight": "bold"},
                "bodyFont": {"size": 13},
            },
        },
    });

    let scales = match axes_for(chart) {
        Axes::Category => Some(json!({"x": category_axis(), "y": value_axis()})),
        Axes::CategoryHorizontal => Some(json!({"x": value_axis(), "y": category_axis()})),
        Axes::Numeric if chart == ChartType::Quadrant => Some(json!({
            "x": titled(value_axis(), "Market Share"),
            "y": titled(value_axis(), "Growth Rate"),
        })),
        Axes::Numeric => Some(json!({"x": value_axis(), "y": value_axis()})),
        Axes::Radial => Some(json!({
            "r": {
                "beginAtZero": true,
                "grid": {"color": "#e0e0e0"},
                "angleLines": {"color": "#e0e0e0"},
                "pointLabels": {"font": {"size": 12}},
            }
        })),
        Axes::Hidden => None,
    };

    if let Value::Object(map) = &mut options {
        if let Some(scales) = scales {
            map.insert("scales".into(), scales);
        }
        if chart == ChartType::Pyramid {
            map.insert("indexAxis".into(), json!("y"));
        }
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;

    fn years() -> Vec<DataPoint> {
        vec![
            DataPoint::new("2020", 100.0),
            DataPoint::new("2021", 120.0),
            DataPoint::new("2022", 150.0),
        ]
    }

    #[test]
    fn test_line_config_takes_points_verbatim() {
        let cfg = build_chart_config(ChartType::Line, &years(), 10).unwrap();
        assert_eq!(cfg["type"], "line");
        assert_eq!(cfg["data"]["labels"], json!(["2020", "2021", "2022"]));
        assert_eq!(cfg["data"]["datasets"][0]["data"], json!([100, 120, 150]));
        assert_eq!(cfg["data"]["datasets"][0]["tension"], json!(0.3));
        assert_eq!(cfg["options"]["plugins"]["legend"]["display"], json!(false));
        assert!(cfg["options"]["scales"]["y"]["beginAtZero"].as_bool().unwrap());
    }

    #[test]
    fn test_points_are_truncated() {
        let points: Vec<DataPoint> = (0..15)
            .map(|i| DataPoint::new(format!("P{i}"), i as f64))
            .collect();
        let cfg = build_chart_config(ChartType::Bar, &points, 10).unwrap();
        assert_eq!(cfg["data"]["labels"].as_array().unwrap().len(), 10);
        let bg = cfg["data"]["datasets"][0]["backgroundColor"].as_array().unwrap();
        assert_eq!(bg[0], bg[5]);
    }

    #[test]
    fn test_arc_charts_show_legend_without_axes() {
        let points = vec![
            DataPoint::new("A", 30.0).with_unit("%"),
            DataPoint::new("B", 70.0).with_unit("%"),
        ];
        let cfg = build_chart_config(ChartType::Doughnut, &points, 10).unwrap();
        assert_eq!(cfg["options"]["plugins"]["legend"]["display"], json!(true));
        assert!(cfg["options"].get("scales").is_none());
        assert_eq!(cfg["data"]["datasets"][0]["backgroundColor"][1], json!("#34c38f"));
    }

    #[test]
    fn test_step_and_pyramid_variants() {
        let step = build_chart_config(ChartType::Step, &years(), 10).unwrap();
        assert_eq!(step["type"], "line");
        assert_eq!(step["data"]["datasets"][0]["stepped"], json!(true));

        let pyramid = build_chart_config(ChartType::Pyramid, &years(), 10).unwrap();
        assert_eq!(pyramid["type"], "bar");
        assert_eq!(pyramid["options"]["indexAxis"], json!("y"));
    }

    #[test]
    fn test_bubble_radii_are_deterministic() {
        let cfg = build_chart_config(ChartType::Bubble, &years(), 10).unwrap();
        let data = cfg["data"]["datasets"][0]["data"].as_array().unwrap();
        assert_eq!(data[0]["r"], json!(5));
        assert_eq!(data[2]["r"], json!(20));
        assert_eq!(data[1]["x"], json!(1));
        assert_eq!(data[1]["y"], json!(120));
    }

    #[test]
    fn test_quadrant_requires_share_and_growth() {
        let ok = vec![DataPoint::new("Stars", 1.0)
            .with_field("share", json!(40))
            .with_field("growth", json!(12))];
        let cfg = build_chart_config(ChartType::Quadrant, &ok, 10).unwrap();
        assert_eq!(cfg["type"], "scatter");
        assert_eq!(cfg["data"]["datasets"][0]["data"][0], json!({"x": 40, "y": 12}));

        let bad = vec![DataPoint::new("Dogs", 1.0).with_field("share", json!(5))];
        let err = build_chart_config(ChartType::Quadrant, &bad, 10).unwrap_err();
        assert_eq!(
            err,
            ShapeError::MissingField {
                label: "Dogs".into(),
                field: "growth"
            }
        );
    }

    #[test]
    fn test_shape_errors() {
        let text = vec![DataPoint::new("Ages", "18-35")];
        assert_eq!(
            build_chart_config(ChartType::Bar, &text, 10),
            Err(ShapeError::NoNumericValues)
        );
        assert_eq!(
            build_chart_config(ChartType::Radar, &years()[..2], 10),
            Err(ShapeError::TooFewPoints { min: 3, got: 2 })
        );
        let negative = vec![DataPoint::new("Loss", -5.0)];
        assert!(matches!(
            build_chart_config(ChartType::Pie, &negative, 10),
            Err(ShapeError::NegativeShare { .. })
        ));
        assert_eq!(
            build_chart_config(ChartType::Heatmap, &years(), 10),
            Err(ShapeError::NotCanvas(ChartType::Heatmap))
        );
    }

    #[test]
    fn test_with_alpha() {
        assert_eq!(with_alpha("#556EE6", 0.7), "rgba(85, 110, 230, 0.7)");
        assert_eq!(with_alpha("red", 0.5), "red");
    }
}
