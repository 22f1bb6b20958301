//! Parsers: Markdown, JSON and plain text into one [`Document`] shape.
//!
//! ## Section tree construction
//!
//! Markdown headings arrive as a flat sequence of `(level, title)` pairs.
//! [`SectionTreeBuilder`] turns them into a tree with a stack of open
//! sections: before opening a heading of depth `d`, every open section of
//! depth `>= d` is closed and attached to its parent (or to the roots when
//! the stack empties). Closing by depth rather than by exact nesting means
//! skipped levels (`#` then `###`) still nest under the nearest shallower
//! heading.
//!
//! ## Failure policy
//!
//! A single malformed fragment never fails the whole document. Unusable
//! JSON entries are skipped and reported as [`Degradation::MalformedEntry`];
//! the only fatal parse error is a file that declares itself JSON but is not
//! JSON at all.

use crate::document::{Conclusion, DataPoint, DocFormat, Document, Section, SectionIter};
use crate::error::{Degradation, Doc2DeckError};
use crate::pipeline::extract;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, info, warn};

/// Title used when a document offers nothing better.
pub const UNTITLED: &str = "Untitled";

/// Name of the implicit first section of a plain-text document.
pub const DEFAULT_TEXT_SECTION: &str = "Content";

/// A parsed document plus the non-fatal problems met while parsing it.
#[derive(Debug, Clone)]
pub struct Parsed {
    pub document: Document,
    pub degradations: Vec<Degradation>,
}

/// Parse `content` with the parser for `format`.
pub fn parse(content: &str, format: DocFormat) -> Result<Document, Doc2DeckError> {
    parse_with_diagnostics(content, format, true).map(|p| p.document)
}

/// Parse and keep the degradations.
///
/// `format_declared` says whether `format` came from the file name. Content
/// that was only sniffed as JSON falls back to plain text when it does not
/// parse; declared JSON that does not parse is an error.
pub fn parse_with_diagnostics(
    content: &str,
    format: DocFormat,
    format_declared: bool,
) -> Result<Parsed, Doc2DeckError> {
    let normalised = content.replace("\r\n", "\n").replace('\r', "\n");
    let parsed = match format {
        DocFormat::Markdown => Parsed {
            document: parse_markdown(&normalised),
            degradations: Vec::new(),
        },
        DocFormat::Text => Parsed {
            document: parse_text(&normalised),
            degradations: Vec::new(),
        },
        DocFormat::Json => match parse_json(&normalised) {
            Ok(parsed) => parsed,
            Err(e) if !format_declared => {
                let degradation = Degradation::JsonSniffFallback {
                    detail: e.to_string(),
                };
                warn!("{degradation}");
                Parsed {
                    document: parse_text(&normalised),
                    degradations: vec![degradation],
                }
            }
            Err(e) => return Err(e),
        },
    };

    let mut parsed = parsed;
    parsed.document.raw_content = content.to_string();
    info!(
        "Parsed {} document '{}': {} sections, {} data points, {} conclusions",
        parsed.document.format,
        parsed.document.title,
        parsed.document.section_count(),
        parsed.document.data_points.len(),
        parsed.document.conclusions.len()
    );
    Ok(parsed)
}

// ── Section tree ─────────────────────────────────────────────────────────

/// Stack-based builder for a heading tree.
#[derive(Debug, Default)]
pub struct SectionTreeBuilder {
    roots: Vec<Section>,
    open: Vec<Section>,
}

impl SectionTreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new section at `level`, closing any at the same depth or deeper.
    pub fn open(&mut self, title: impl Into<String>, level: usize) {
        while self.open.last().is_some_and(|s| s.level >= level) {
            self.close_top();
        }
        self.open.push(Section::new(title, level));
    }

    /// The innermost open section, if any.
    pub fn current(&mut self) -> Option<&mut Section> {
        self.open.last_mut()
    }

    fn close_top(&mut self) {
        if let Some(done) = self.open.pop() {
            match self.open.last_mut() {
                Some(parent) => parent.subsections.push(done),
                None => self.roots.push(done),
            }
        }
    }

    /// Close everything still open and return the root sections.
    pub fn finish(mut self) -> Vec<Section> {
        while !self.open.is_empty() {
            self.close_top();
        }
        self.roots
    }
}

/// Scan every section's body for data points and conclusions.
fn collect_from_sections(sections: &[Section]) -> (Vec<DataPoint>, Vec<Conclusion>) {
    let mut points = Vec::new();
    for section in SectionIter::new(sections) {
        let found = extract::extract_data_points(&section.title, &section.content);
        if !found.is_empty() {
            debug!("Section '{}': {} data points", section.title, found.len());
        }
        points.extend(found);
    }
    let conclusions = extract::extract_conclusions(SectionIter::new(sections));
    (points, conclusions)
}

// ── Markdown ─────────────────────────────────────────────────────────────

static RE_ATX_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(#{1,6})[ \t]+(.+?)(?:[ \t]+#+)?[ \t]*$").unwrap());

static RE_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[ \t]{0,3}(```|~~~)").unwrap());

/// Parse Markdown: ATX headings build the tree, other non-blank lines are
/// body text of the innermost open heading.
///
/// Lines before the first heading belong to no section and are dropped.
/// Lines inside fenced code blocks are never headings.
pub fn parse_markdown(content: &str) -> Document {
    let mut builder = SectionTreeBuilder::new();
    let mut first_h1: Option<String> = None;
    let mut first_heading: Option<String> = None;
    let mut fence: Option<&str> = None;
    let mut dropped_preamble = 0usize;

    for line in content.lines() {
        if let Some(caps) = RE_FENCE.captures(line) {
            let marker = caps.get(1).map_or("", |m| m.as_str());
            fence = match fence {
                Some(open) if open == marker => None,
                Some(open) => Some(open),
                None => Some(marker),
            };
        } else if fence.is_none() {
            if let Some(caps) = RE_ATX_HEADING.captures(line) {
                let level = caps[1].len();
                let title = caps[2].replace("**", "").trim().to_string();
                if level == 1 && first_h1.is_none() {
                    first_h1 = Some(title.clone());
                }
                if first_heading.is_none() {
                    first_heading = Some(title.clone());
                }
                builder.open(title, level);
                continue;
            }
        }

        if line.trim().is_empty() {
            continue;
        }
        match builder.current() {
            Some(section) => section.push_line(line),
            None => dropped_preamble += 1,
        }
    }

    if dropped_preamble > 0 {
        debug!("Dropped {dropped_preamble} preamble lines before the first heading");
    }

    let sections = builder.finish();
    let (data_points, conclusions) = collect_from_sections(&sections);
    Document {
        title: first_h1
            .or(first_heading)
            .unwrap_or_else(|| UNTITLED.to_string()),
        format: DocFormat::Markdown,
        sections,
        data_points,
        conclusions,
        raw_content: String::new(),
    }
}

// ── Plain text ───────────────────────────────────────────────────────────

/// Parse plain text: a line ending in a colon opens a new top-level section.
///
/// Text before the first such line goes to an implicit
/// [`DEFAULT_TEXT_SECTION`], which is kept only if it has content.
pub fn parse_text(content: &str) -> Document {
    let mut sections: Vec<Section> = Vec::new();
    let mut current = Section::new(DEFAULT_TEXT_SECTION, 1);

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let heading = trimmed
            .strip_suffix(':')
            .or_else(|| trimmed.strip_suffix('：'))
            .map(str::trim)
            .filter(|t| !t.is_empty());
        match heading {
            Some(title) => {
                let finished = std::mem::replace(&mut current, Section::new(title, 1));
                if !finished.is_blank() || finished.title != DEFAULT_TEXT_SECTION {
                    sections.push(finished);
                }
            }
            None => current.push_line(trimmed),
        }
    }
    if !current.is_blank() || current.title != DEFAULT_TEXT_SECTION {
        sections.push(current);
    }

    let (data_points, conclusions) = collect_from_sections(&sections);
    Document {
        title: sections
            .first()
            .map(|s| s.title.clone())
            .unwrap_or_else(|| UNTITLED.to_string()),
        format: DocFormat::Text,
        sections,
        data_points,
        conclusions,
        raw_content: String::new(),
    }
}

// ── JSON ─────────────────────────────────────────────────────────────────

/// Parse the JSON document format:
/// `{"title", "sections": [...], "data_points": [...], "conclusions": [...]}`.
///
/// Data points and conclusions are taken as given; sections are not scanned
/// for further numbers. A top-level field of the wrong type (`"title": 42`,
/// `"data_points": null`) is dropped with a degradation, like a bad entry.
pub fn parse_json(content: &str) -> Result<Parsed, Doc2DeckError> {
    let raw: Value = serde_json::from_str(content).map_err(|e| Doc2DeckError::InvalidJson {
        detail: e.to_string(),
    })?;
    let mut root = match raw {
        Value::Object(map) => map,
        other => {
            return Err(Doc2DeckError::InvalidJson {
                detail: format!("expected an object at the top level, found {}", json_kind(&other)),
            })
        }
    };

    let mut degradations = Vec::new();
    let title = match root.remove("title") {
        Some(Value::String(t)) => Some(t.trim().to_string()).filter(|t| !t.is_empty()),
        None | Some(Value::Null) => None,
        Some(other) => {
            malformed_field("title", "a string", &other, &mut degradations);
            None
        }
    };
    let sections = entry_list(&mut root, "sections", &mut degradations);
    let data_points = entry_list(&mut root, "data_points", &mut degradations);
    let conclusions = entry_list(&mut root, "conclusions", &mut degradations);

    let sections = typed_entries::<Section>(sections, "section", &mut degradations);
    let data_points = typed_entries::<DataPoint>(data_points, "data point", &mut degradations);
    let conclusions = typed_entries::<Conclusion>(conclusions, "conclusion", &mut degradations);

    Ok(Parsed {
        document: Document {
            title: title.unwrap_or_else(|| UNTITLED.to_string()),
            format: DocFormat::Json,
            sections,
            data_points,
            conclusions,
            raw_content: String::new(),
        },
        degradations,
    })
}

/// The array under `key`. Absent means empty; anything but an array is
/// reported and treated as empty.
fn entry_list(
    root: &mut serde_json::Map<String, Value>,
    key: &str,
    degradations: &mut Vec<Degradation>,
) -> Vec<Value> {
    match root.remove(key) {
        None => Vec::new(),
        Some(Value::Array(items)) => items,
        Some(other) => {
            malformed_field(key, "an array", &other, degradations);
            Vec::new()
        }
    }
}

fn malformed_field(key: &str, expected: &str, found: &Value, degradations: &mut Vec<Degradation>) {
    let d = Degradation::MalformedEntry {
        entry: format!("field '{key}'"),
        index: 0,
        detail: format!("expected {expected}, found {}", json_kind(found)),
    };
    warn!("{d}");
    degradations.push(d);
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn typed_entries<T: serde::de::DeserializeOwned>(
    values: Vec<Value>,
    entry: &str,
    degradations: &mut Vec<Degradation>,
) -> Vec<T> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value::<T>(value) {
            Ok(item) => Some(item),
            Err(e) => {
                let d = Degradation::MalformedEntry {
                    entry: entry.to_string(),
                    index,
                    detail: e.to_string(),
                };
                warn!("{d}");
                degradations.push(d);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DataValue;

    #[test]
    fn test_tree_builder_nests_by_depth() {
        let mut b = SectionTreeBuilder::new();
        b.open("A", 1);
        b.open("A.1", 2);
        b.open("A.1.a", 3);
        b.open("A.2", 2);
        b.open("B", 1);
        let roots = b.finish();
        assert_eq!(roots.len(), 2);
        assert_eq!(roots[0].subsections.len(), 2);
        assert_eq!(roots[0].subsections[0].subsections[0].title, "A.1.a");
        assert!(roots[1].subsections.is_empty());
    }

    #[test]
    fn test_tree_builder_skipped_levels() {
        let mut b = SectionTreeBuilder::new();
        b.open("Top", 1);
        b.open("Deep", 3);
        b.open("Mid", 2);
        let roots = b.finish();
        let titles: Vec<&str> = roots[0]
            .subsections
            .iter()
            .map(|s| s.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Deep", "Mid"]);
    }

    #[test]
    fn test_markdown_revenue_section() {
        let doc = parse_markdown("## Revenue\n2020: 100\n2021: 120\n2022: 150");
        assert_eq!(doc.title, "Revenue");
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.data_points.len(), 3);
        assert_eq!(doc.data_points[2].value, DataValue::Number(150.0));
        assert!(doc
            .data_points
            .iter()
            .all(|p| p.category.as_deref() == Some("Revenue")));
    }

    #[test]
    fn test_markdown_title_prefers_h1() {
        let doc = parse_markdown("## Intro\ntext\n# Real Title\n## Next\n");
        assert_eq!(doc.title, "Real Title");
    }

    #[test]
    fn test_markdown_untitled_without_headings() {
        let doc = parse_markdown("just a line\n");
        assert_eq!(doc.title, UNTITLED);
        assert!(doc.sections.is_empty());
    }

    #[test]
    fn test_markdown_fenced_code_is_not_a_heading() {
        let doc = parse_markdown("# Doc\n```\n# comment in code\n```\n## Real\nbody\n");
        let titles: Vec<&str> = doc.iter_sections().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Doc", "Real"]);
        assert!(doc.sections[0].content.contains("# comment in code"));
    }

    #[test]
    fn test_markdown_hash_inside_heading_text_is_kept() {
        let doc = parse_markdown("# Languages\n## C#\nA: 1\n## F# ##\n### Closed ###\n");
        let titles: Vec<&str> = doc.iter_sections().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Languages", "C#", "F#", "Closed"]);
    }

    #[test]
    fn test_markdown_collects_conclusions() {
        let doc = parse_markdown("# R\n## Conclusions\n- First finding here\n- Second one\n");
        assert_eq!(doc.conclusions.len(), 2);
        assert_eq!(doc.conclusions[0].text, "First finding here");
    }

    #[test]
    fn test_plain_text_sections() {
        let doc = parse_text("Intro line one\nOverview:\nMobile: 45%\nDesktop: 55%\nNotes:\n");
        let titles: Vec<&str> = doc.sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Content", "Overview", "Notes"]);
        assert_eq!(doc.title, "Content");
        assert_eq!(doc.data_points.len(), 2);
        assert_eq!(doc.data_points[0].category.as_deref(), Some("Overview"));
    }

    #[test]
    fn test_plain_text_skips_empty_default_section() {
        let doc = parse_text("Findings:\n- It works\n");
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.title, "Findings");
        assert_eq!(doc.conclusions.len(), 1);
    }

    #[test]
    fn test_json_document() {
        let json = r#"{
            "title": "Survey",
            "sections": [{"title": "Method", "content": "Online panel", "level": 2}],
            "data_points": [
                {"label": "A", "value": 30, "unit": "%"},
                {"label": "B", "value": 70, "unit": "%"}
            ],
            "conclusions": [{"text": "B wins", "priority": "high"}]
        }"#;
        let parsed = parse_json(json).unwrap();
        let doc = parsed.document;
        assert_eq!(doc.title, "Survey");
        assert_eq!(doc.sections[0].level, 2);
        assert_eq!(doc.data_points.len(), 2);
        assert_eq!(doc.conclusions[0].priority.as_deref(), Some("high"));
        assert!(parsed.degradations.is_empty());
    }

    #[test]
    fn test_json_skips_malformed_entries() {
        let json = r#"{"data_points": [{"label": "ok", "value": 1}, {"value": 2}, {"label": "x", "value": true}]}"#;
        let parsed = parse_json(json).unwrap();
        assert_eq!(parsed.document.data_points.len(), 1);
        assert_eq!(parsed.degradations.len(), 2);
        assert_eq!(parsed.document.title, UNTITLED);
    }

    #[test]
    fn test_json_null_list_is_treated_as_empty() {
        let parsed = parse_json(r#"{"title": "T", "data_points": null}"#).unwrap();
        assert_eq!(parsed.document.title, "T");
        assert!(parsed.document.data_points.is_empty());
        assert_eq!(parsed.degradations.len(), 1);
        assert!(matches!(
            &parsed.degradations[0],
            Degradation::MalformedEntry { entry, .. } if entry == "field 'data_points'"
        ));
    }

    #[test]
    fn test_json_non_string_title_keeps_the_data() {
        let parsed =
            parse_json(r#"{"title": 42, "data_points": [{"label": "A", "value": 1}]}"#).unwrap();
        assert_eq!(parsed.document.title, UNTITLED);
        assert_eq!(parsed.document.data_points.len(), 1);
        assert_eq!(parsed.degradations.len(), 1);
        assert!(matches!(
            &parsed.degradations[0],
            Degradation::MalformedEntry { entry, detail, .. }
                if entry == "field 'title'" && detail.contains("a number")
        ));
    }

    #[test]
    fn test_json_sections_of_the_wrong_type_are_dropped() {
        let parsed = parse_json(
            r#"{"sections": "oops", "conclusions": {"a": 1}, "data_points": [{"label": "A", "value": 2}]}"#,
        )
        .unwrap();
        assert!(parsed.document.sections.is_empty());
        assert!(parsed.document.conclusions.is_empty());
        assert_eq!(parsed.document.data_points.len(), 1);
        assert_eq!(parsed.degradations.len(), 2);
    }

    #[test]
    fn test_json_missing_lists_are_not_degradations() {
        let parsed = parse_json(r#"{"title": "Only a title"}"#).unwrap();
        assert_eq!(parsed.document.title, "Only a title");
        assert!(parsed.degradations.is_empty());
    }

    #[test]
    fn test_json_top_level_array_is_invalid() {
        let err = parse_json("[1, 2]").unwrap_err();
        assert!(
            matches!(&err, Doc2DeckError::InvalidJson { detail } if detail.contains("an array")),
            "got: {err}"
        );
    }

    #[test]
    fn test_declared_json_that_fails_is_fatal() {
        let err = parse_with_diagnostics("{ nope", DocFormat::Json, true).unwrap_err();
        assert!(matches!(err, Doc2DeckError::InvalidJson { .. }));
    }

    #[test]
    fn test_sniffed_json_that_fails_falls_back_to_text() {
        let parsed = parse_with_diagnostics("{ nope\nRevenue: 10", DocFormat::Json, false).unwrap();
        assert_eq!(parsed.document.format, DocFormat::Text);
        assert!(matches!(
            parsed.degradations[0],
            Degradation::JsonSniffFallback { .. }
        ));
    }

    #[test]
    fn test_crlf_is_normalised() {
        let doc = parse("# T\r\n## S\r\nA: 1\r\n", DocFormat::Markdown).unwrap();
        assert_eq!(doc.data_points.len(), 1);
        assert_eq!(doc.raw_content, "# T\r\n## S\r\nA: 1\r\n");
    }
}
