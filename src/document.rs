//! The parsed, format-independent view of an input document.
//!
//! Every parser (Markdown, JSON, plain text) produces the same
//! [`Document`]: a title, a tree of [`Section`]s, the [`DataPoint`]s found in
//! the text and the [`Conclusion`]s worth repeating on the closing slides.
//!
//! ## Why an owned tree?
//!
//! Sections own their subsections outright. Nothing points back up the tree,
//! so there are no cycles to manage and a `Document` can be cloned, sent
//! across threads or serialised with `--json` as-is. Data points refer to
//! their section by title (`category`) rather than by reference; see
//! [`Document::points_by_section`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Which parser produced a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocFormat {
    Markdown,
    Json,
    Text,
}

impl fmt::Display for DocFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DocFormat::Markdown => "markdown",
            DocFormat::Json => "json",
            DocFormat::Text => "text",
        })
    }
}

/// A complete parsed document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    pub format: DocFormat,
    /// Top-level sections in document order.
    pub sections: Vec<Section>,
    pub data_points: Vec<DataPoint>,
    pub conclusions: Vec<Conclusion>,
    /// The unmodified input text.
    #[serde(skip_serializing)]
    #[serde(default)]
    pub raw_content: String,
}

impl Document {
    /// Walk every section, parents before children, in document order.
    pub fn iter_sections(&self) -> SectionIter<'_> {
        SectionIter::new(&self.sections)
    }

    /// Total number of sections at every depth.
    pub fn section_count(&self) -> usize {
        self.iter_sections().count()
    }

    /// Group data points by the section title they were found under.
    ///
    /// Points without a category are left out. Two sections sharing a title
    /// share one bucket.
    pub fn points_by_section(&self) -> BTreeMap<&str, Vec<&DataPoint>> {
        let mut map: BTreeMap<&str, Vec<&DataPoint>> = BTreeMap::new();
        for point in &self.data_points {
            if let Some(category) = point.category.as_deref() {
                map.entry(category).or_default().push(point);
            }
        }
        map
    }
}

/// Pre-order iterator over a section tree.
pub struct SectionIter<'a> {
    stack: Vec<&'a Section>,
}

impl<'a> SectionIter<'a> {
    /// Walk a forest of root sections.
    pub fn new(roots: &'a [Section]) -> Self {
        Self {
            stack: roots.iter().rev().collect(),
        }
    }
}

impl<'a> Iterator for SectionIter<'a> {
    type Item = &'a Section;

    fn next(&mut self) -> Option<Self::Item> {
        let section = self.stack.pop()?;
        self.stack.extend(section.subsections.iter().rev());
        Some(section)
    }
}

/// A titled block of content, possibly with nested subsections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    /// Body text with blank lines removed, one source line per line.
    #[serde(default)]
    pub content: String,
    /// Heading depth: 1 for `#`, 2 for `##`, and so on.
    #[serde(default = "default_level")]
    pub level: usize,
    #[serde(default)]
    pub subsections: Vec<Section>,
}

fn default_level() -> usize {
    1
}

impl Section {
    pub fn new(title: impl Into<String>, level: usize) -> Self {
        Self {
            title: title.into(),
            content: String::new(),
            level,
            subsections: Vec::new(),
        }
    }

    /// Append one line of body text.
    pub fn push_line(&mut self, line: &str) {
        self.content.push_str(line);
        self.content.push('\n');
    }

    /// `true` when the body holds nothing but whitespace.
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }
}

/// A numeric or textual value attached to a [`DataPoint`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataValue {
    Number(f64),
    Text(String),
}

impl DataValue {
    /// The numeric value, if there is one.
    ///
    /// Text values that read as plain numbers (`"42"`, `" 3.5 "`) count as
    /// numeric; ranges such as `"18-35"` do not.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DataValue::Number(n) if n.is_finite() => Some(*n),
            DataValue::Number(_) => None,
            DataValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        }
    }

    /// JSON form used in chart configurations.
    ///
    /// Whole numbers are emitted as integers so `100.0` reads as `100`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            DataValue::Number(n) => number_to_json(*n),
            DataValue::Text(s) => serde_json::Value::String(s.clone()),
        }
    }
}

/// JSON number for `n`, as an integer when it has no fractional part.
pub(crate) fn number_to_json(n: f64) -> serde_json::Value {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 9.0e15 {
        serde_json::Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null)
    }
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataValue::Number(n) => write!(f, "{n}"),
            DataValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for DataValue {
    fn from(n: f64) -> Self {
        DataValue::Number(n)
    }
}

impl From<&str> for DataValue {
    fn from(s: &str) -> Self {
        DataValue::Text(s.to_string())
    }
}

/// A labelled value found in (or supplied with) the document.
///
/// Any JSON keys beyond `label`, `value`, `unit` and `category` are kept in
/// [`fields`](Self::fields). The classifier inspects them for structural
/// hints such as `x`/`y`, `min`/`max` or `source`/`target`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub label: String,
    pub value: DataValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Title of the section the point belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(flatten)]
    pub fields: BTreeMap<String, serde_json::Value>,
}

impl DataPoint {
    pub fn new(label: impl Into<String>, value: impl Into<DataValue>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            unit: None,
            category: None,
            fields: BTreeMap::new(),
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.fields.insert(key.into(), value);
        self
    }

    /// Look up an extra field by name, ignoring ASCII case.
    pub fn field(&self, key: &str) -> Option<&serde_json::Value> {
        self.fields
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    }

    /// An extra field as a number; numeric strings are accepted.
    pub fn field_f64(&self, key: &str) -> Option<f64> {
        match self.field(key)? {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// An extra field as non-empty text; numbers are stringified.
    pub fn field_str(&self, key: &str) -> Option<String> {
        match self.field(key)? {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn has_field(&self, key: &str) -> bool {
        self.field(key).is_some_and(|v| !v.is_null())
    }

    /// `true` when the unit is a percent sign.
    pub fn is_percentage(&self) -> bool {
        matches!(self.unit.as_deref().map(str::trim), Some("%") | Some("％"))
    }

    /// Value followed by its unit, e.g. `45%` or `$1.2M`.
    pub fn display_value(&self) -> String {
        match self.unit.as_deref() {
            Some(u) if u.starts_with(['$', '€', '£', '¥']) => {
                let (symbol, suffix) = u.split_at(u.chars().next().map_or(0, char::len_utf8));
                format!("{symbol}{}{suffix}", self.value)
            }
            Some("%") => format!("{}%", self.value),
            Some(u) => format!("{} {u}", self.value),
            None => self.value.to_string(),
        }
    }
}

/// A finding or recommendation worth repeating on the closing slides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conclusion {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
}

impl Conclusion {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: None,
            priority: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tree() -> Document {
        let mut a = Section::new("A", 1);
        let mut a1 = Section::new("A.1", 2);
        a1.subsections.push(Section::new("A.1.a", 3));
        a.subsections.push(a1);
        a.subsections.push(Section::new("A.2", 2));
        Document {
            title: "T".into(),
            format: DocFormat::Markdown,
            sections: vec![a, Section::new("B", 1)],
            data_points: vec![],
            conclusions: vec![],
            raw_content: String::new(),
        }
    }

    #[test]
    fn test_iter_sections_is_preorder() {
        let doc = tree();
        let titles: Vec<&str> = doc.iter_sections().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "A.1", "A.1.a", "A.2", "B"]);
        assert_eq!(doc.section_count(), 5);
    }

    #[test]
    fn test_points_by_section_merges_duplicate_titles() {
        let mut doc = tree();
        doc.data_points = vec![
            DataPoint::new("x", 1.0).with_category("Sales"),
            DataPoint::new("y", 2.0).with_category("Sales"),
            DataPoint::new("z", 3.0),
        ];
        let map = doc.points_by_section();
        assert_eq!(map.len(), 1);
        assert_eq!(map["Sales"].len(), 2);
    }

    #[test]
    fn test_data_value_untagged_serde() {
        let n: DataValue = serde_json::from_value(json!(30)).unwrap();
        assert_eq!(n, DataValue::Number(30.0));
        let t: DataValue = serde_json::from_value(json!("18-35")).unwrap();
        assert_eq!(t, DataValue::Text("18-35".into()));
        assert_eq!(t.as_f64(), None);
        assert_eq!(DataValue::Text(" 42 ".into()).as_f64(), Some(42.0));
    }

    #[test]
    fn test_to_json_prefers_integers() {
        assert_eq!(DataValue::Number(100.0).to_json(), json!(100));
        assert_eq!(DataValue::Number(2.5).to_json(), json!(2.5));
        assert_eq!(DataValue::Text("n/a".into()).to_json(), json!("n/a"));
    }

    #[test]
    fn test_data_point_keeps_extra_fields() {
        let p: DataPoint = serde_json::from_value(json!({
            "label": "Widgets", "value": 12, "X": 3, "source": "EU"
        }))
        .unwrap();
        assert_eq!(p.field_f64("x"), Some(3.0));
        assert_eq!(p.field_str("source").as_deref(), Some("EU"));
        assert!(!p.has_field("target"));
    }

    #[test]
    fn test_display_value() {
        assert_eq!(DataPoint::new("a", 45.0).with_unit("%").display_value(), "45%");
        assert_eq!(
            DataPoint::new("a", 1.2).with_unit("$M").display_value(),
            "$1.2M"
        );
        assert_eq!(
            DataPoint::new("a", 3.0).with_unit("万元").display_value(),
            "3 万元"
        );
    }
}
