//! Data-point and conclusion extraction from free text.
//!
//! ## Why a registry of scanners?
//!
//! Reports state numbers in many ways: `Revenue: $1.2M`, a pipe table, "gross
//! margin of 35%", "users aged 18-35 years". One regex for all of them would
//! be unreadable and impossible to tune. Instead each phrasing gets its own
//! small scanner, and [`SCANNERS`] lists them in priority order.
//!
//! [`scan_text`] runs every scanner over the text. A match is accepted only
//! if its byte span does not overlap a match that an earlier scanner already
//! accepted, so `Gross margin: 35%` yields one point, not a labelled value
//! plus a margin plus a bare percentage. Accepted matches are then returned
//! in document order, which is the order charts draw them in.
//!
//! ## Filters applied after scanning
//!
//! 1. Percentages whose value lies in 1900–2100 are almost always years
//!    followed by a stray `%` and are discarded.
//! 2. Repeated `(label, value)` pairs are dropped after the first.

use crate::document::{Conclusion, DataPoint, DataValue, Section};
use crate::pipeline::lexicon::CONCLUSION_TITLES;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashSet;
use std::ops::Range;
use tracing::debug;

/// Which scanner produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanKind {
    LabeledValue,
    TableRow,
    MarginRatio,
    MarketShare,
    GrowthRate,
    AgeRange,
    CurrencyMagnitude,
    Percentage,
}

/// One candidate data point and where it was found.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanMatch {
    pub kind: ScanKind,
    /// Byte range of the matched text within the scanned string.
    pub span: Range<usize>,
    pub point: DataPoint,
}

/// A named scanning rule.
pub struct Scanner {
    pub kind: ScanKind,
    pub name: &'static str,
    pub scan: fn(&str) -> Vec<ScanMatch>,
}

/// All scanners, highest priority first.
pub static SCANNERS: [Scanner; 8] = [
    Scanner {
        kind: ScanKind::LabeledValue,
        name: "labeled_value",
        scan: scan_labeled_values,
    },
    Scanner {
        kind: ScanKind::TableRow,
        name: "table_row",
        scan: scan_table_rows,
    },
    Scanner {
        kind: ScanKind::MarginRatio,
        name: "margin_ratio",
        scan: scan_margins,
    },
    Scanner {
        kind: ScanKind::MarketShare,
        name: "market_share",
        scan: scan_market_share,
    },
    Scanner {
        kind: ScanKind::GrowthRate,
        name: "growth_rate",
        scan: scan_growth,
    },
    Scanner {
        kind: ScanKind::AgeRange,
        name: "age_range",
        scan: scan_age_ranges,
    },
    Scanner {
        kind: ScanKind::CurrencyMagnitude,
        name: "currency_magnitude",
        scan: scan_currency,
    },
    Scanner {
        kind: ScanKind::Percentage,
        name: "percentage",
        scan: scan_percentages,
    },
];

/// Run every scanner over `text` and resolve overlaps.
pub fn scan_text(text: &str) -> Vec<ScanMatch> {
    let mut accepted: Vec<ScanMatch> = Vec::new();

    for scanner in &SCANNERS {
        for m in (scanner.scan)(text) {
            if accepted.iter().any(|a| overlaps(&a.span, &m.span)) {
                continue;
            }
            if is_year_artefact(&m.point) {
                debug!(
                    "{}: discarding '{}' = {} (looks like a year)",
                    scanner.name, m.point.label, m.point.value
                );
                continue;
            }
            accepted.push(m);
        }
    }

    accepted.sort_by_key(|m| m.span.start);

    let mut seen = HashSet::new();
    accepted.retain(|m| seen.insert((m.point.label.to_lowercase(), m.point.value.to_string())));
    accepted
}

/// Extract the data points of one section, tagged with its title.
pub fn extract_data_points(section_title: &str, content: &str) -> Vec<DataPoint> {
    scan_text(content)
        .into_iter()
        .map(|m| m.point.with_category(section_title))
        .collect()
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

fn is_year_artefact(point: &DataPoint) -> bool {
    point.is_percentage()
        && point
            .value
            .as_f64()
            .is_some_and(|v| (1900.0..=2100.0).contains(&v))
}

// ── Shared helpers ───────────────────────────────────────────────────────

/// Parse `1,234.5` style numbers.
fn parse_number(s: &str) -> Option<f64> {
    let cleaned: String = s.chars().filter(|c| *c != ',' && !c.is_whitespace()).collect();
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

const EDGE_PUNCT: &[char] = &[
    ':', '：', ',', '，', ';', '；', '(', '（', ')', '）', '-', '–', '—', '=', '*', '_', '|', '.',
    '。', '、',
];

static RE_BULLET_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:[-*+•]\s+|\d{1,2}[.)]\s+)").unwrap());

/// Strip bullet markers, emphasis markers and edge punctuation.
fn clean_label(raw: &str) -> String {
    let s = RE_BULLET_PREFIX.replace(raw, "");
    let s = s.replace("**", "").replace("__", "");
    let s = s.trim_matches(|c: char| c.is_whitespace() || EDGE_PUNCT.contains(&c));
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keep at most `max_words` words from the end, and at most 40 characters.
fn tail_words(s: &str, max_words: usize) -> String {
    let words: Vec<&str> = s.split_whitespace().collect();
    let start = words.len().saturating_sub(max_words);
    let joined = words[start..].join(" ");
    let count = joined.chars().count();
    if count > 40 {
        joined.chars().skip(count - 40).collect()
    } else {
        joined
    }
}

fn head_words(s: &str, max_words: usize) -> String {
    let joined = s.split_whitespace().take(max_words).collect::<Vec<_>>().join(" ");
    joined.chars().take(40).collect()
}

/// Label a match from the words around it on the same line.
///
/// Prefers the text before the match ("Mobile traffic reached 45%"),
/// then the text after it ("45% of visits"), then `fallback`.
fn context_label(text: &str, span: &Range<usize>, fallback: &str) -> String {
    let line_start = text[..span.start].rfind('\n').map_or(0, |i| i + 1);
    let line_end = text[span.end..]
        .find('\n')
        .map_or(text.len(), |i| span.end + i);

    let before = &text[line_start..span.start];
    let before = before
        .rsplit(['.', '。', ';', '；', ',', '，'])
        .next()
        .unwrap_or(before);
    let label = tail_words(&clean_label(before), 5);
    if !label.is_empty() {
        return clean_label(&label);
    }

    let after = &text[span.end..line_end];
    let after = after.split(['.', '。', ';', '；', ',', '，']).next().unwrap_or(after);
    let label = head_words(&clean_label(after), 5);
    let label = label
        .strip_prefix("of ")
        .map(str::to_string)
        .unwrap_or(label);
    if !label.is_empty() {
        return clean_label(&label);
    }

    fallback.to_string()
}

/// Normalise a magnitude suffix to `K`, `M` or `B`; CJK units pass through.
fn normalise_magnitude(raw: &str) -> String {
    match raw.to_ascii_lowercase().as_str() {
        "k" | "thousand" => "K".into(),
        "m" | "million" => "M".into(),
        "b" | "bn" | "billion" => "B".into(),
        "％" => "%".into(),
        other => other.to_string(),
    }
}

/// Combine an optional currency symbol and an optional suffix into a unit.
fn compose_unit(currency: Option<&str>, suffix: Option<&str>) -> Option<String> {
    let suffix = suffix.map(normalise_magnitude);
    match (currency, suffix) {
        (Some(c), Some(s)) if s != "%" => Some(format!("{c}{s}")),
        (_, Some(s)) => Some(s),
        (Some(c), None) => Some(c.to_string()),
        (None, None) => None,
    }
}

fn span_of(caps: &Captures<'_>) -> Range<usize> {
    caps.get(0).map_or(0..0, |m| m.range())
}

fn group<'t>(caps: &Captures<'t>, name: &str) -> Option<&'t str> {
    caps.name(name).map(|m| m.as_str())
}

// ── Scanner 1: `Label: value` lines ──────────────────────────────────────

static RE_LABELED_VALUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?mi)^[ \t]*(?:[-*+•][ \t]+|\d{1,2}[.)][ \t]+)?(?P<label>[^:：\n|]{1,60}?)[ \t]*[:：][ \t]*(?P<cur>[$€£¥])?[ \t]*(?P<num>[-+]?\d[\d,]*(?:\.\d+)?)[ \t]*(?P<unit>%|％|billion|million|thousand|bn|[kmb]|亿元|万元|亿|万|元)?[ \t]*$",
    )
    .unwrap()
});

fn scan_labeled_values(text: &str) -> Vec<ScanMatch> {
    RE_LABELED_VALUE
        .captures_iter(text)
        .filter_map(|caps| {
            let label = clean_label(group(&caps, "label")?);
            if label.is_empty() {
                return None;
            }
            let value = parse_number(group(&caps, "num")?)?;
            let mut point = DataPoint::new(label, value);
            point.unit = compose_unit(group(&caps, "cur"), group(&caps, "unit"));
            Some(ScanMatch {
                kind: ScanKind::LabeledValue,
                span: span_of(&caps),
                point,
            })
        })
        .collect()
}

// ── Scanner 2: Markdown table rows ───────────────────────────────────────

static RE_TABLE_ROW: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^[ \t]*\|[ \t]*(?P<label>[^|\n]*?[^|\s][^|\n]*?)[ \t]*\|[ \t]*(?P<cur>[$€£¥])?[ \t]*(?P<num>[-+]?\d[\d,]*(?:\.\d+)?)[ \t]*(?P<unit>%|％|[kKmMbB]|亿元|万元)?[ \t]*\|",
    )
    .unwrap()
});

fn scan_table_rows(text: &str) -> Vec<ScanMatch> {
    RE_TABLE_ROW
        .captures_iter(text)
        .filter_map(|caps| {
            let label = clean_label(group(&caps, "label")?);
            if label.is_empty() {
                return None;
            }
            let value = parse_number(group(&caps, "num")?)?;
            let mut point = DataPoint::new(label, value);
            point.unit = compose_unit(group(&caps, "cur"), group(&caps, "unit"));
            Some(ScanMatch {
                kind: ScanKind::TableRow,
                span: span_of(&caps),
                point,
            })
        })
        .collect()
}

// ── Scanner 3: margin ratios ─────────────────────────────────────────────

static RE_MARGIN_EN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?P<kind>gross|net|operating|profit|ebitda)(?:\s+profit)?\s+margins?\s*(?:of|is|was|at|reached|[:：=])?\s*(?P<num>\d+(?:\.\d+)?)\s*[%％]",
    )
    .unwrap()
});

static RE_MARGIN_ZH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?P<kind>毛利率|净利率|利润率)\s*[：:为]?\s*(?P<num>\d+(?:\.\d+)?)\s*[%％]").unwrap()
});

fn scan_margins(text: &str) -> Vec<ScanMatch> {
    let english = RE_MARGIN_EN.captures_iter(text).filter_map(|caps| {
        let kind = group(&caps, "kind")?;
        let label = format!("{} margin", capitalise(&kind.to_lowercase()));
        percent_match(ScanKind::MarginRatio, &caps, label)
    });
    let chinese = RE_MARGIN_ZH.captures_iter(text).filter_map(|caps| {
        let label = group(&caps, "kind")?.to_string();
        percent_match(ScanKind::MarginRatio, &caps, label)
    });
    english.chain(chinese).collect()
}

fn percent_match(kind: ScanKind, caps: &Captures<'_>, label: String) -> Option<ScanMatch> {
    let value = parse_number(group(caps, "num")?)?;
    Some(ScanMatch {
        kind,
        span: span_of(caps),
        point: DataPoint::new(label, value).with_unit("%"),
    })
}

fn capitalise(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ── Scanner 4: market share ──────────────────────────────────────────────

static RE_SHARE_EN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\bmarket\s+share\s*(?:of|is|was|at|reached|[:：=])?\s*(?P<num>\d+(?:\.\d+)?)\s*[%％]",
    )
    .unwrap()
});

static RE_SHARE_ZH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"市场份额\s*[：:]?\s*(?:达到|为)?\s*(?P<num>\d+(?:\.\d+)?)\s*[%％]").unwrap()
});

fn scan_market_share(text: &str) -> Vec<ScanMatch> {
    let english = RE_SHARE_EN
        .captures_iter(text)
        .filter_map(|caps| percent_match(ScanKind::MarketShare, &caps, "Market share".into()));
    let chinese = RE_SHARE_ZH
        .captures_iter(text)
        .filter_map(|caps| percent_match(ScanKind::MarketShare, &caps, "市场份额".into()));
    english.chain(chinese).collect()
}

// ── Scanner 5: growth rates ──────────────────────────────────────────────

static RE_GROWTH_EN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:grew|growth(?:\s+rate)?|increased|rose)\s*(?:of|by|at|was|is|[:：=])?\s*(?P<num>\d+(?:\.\d+)?)\s*[%％]",
    )
    .unwrap()
});

static RE_GROWTH_ZH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"增长(?:率)?\s*[：:]?\s*(?:了|为)?\s*(?P<num>\d+(?:\.\d+)?)\s*[%％]").unwrap()
});

fn scan_growth(text: &str) -> Vec<ScanMatch> {
    let english = RE_GROWTH_EN.captures_iter(text).filter_map(|caps| {
        let span = span_of(&caps);
        let subject = subject_before(text, span.start);
        let label = if subject.is_empty() {
            "Growth rate".to_string()
        } else {
            format!("{subject} growth")
        };
        percent_match(ScanKind::GrowthRate, &caps, label)
    });
    let chinese = RE_GROWTH_ZH.captures_iter(text).filter_map(|caps| {
        let span = span_of(&caps);
        let label = format!("{}增长", subject_before(text, span.start));
        percent_match(ScanKind::GrowthRate, &caps, label)
    });
    english.chain(chinese).collect()
}

/// The last few words before `pos` on the same line, up to a clause break.
fn subject_before(text: &str, pos: usize) -> String {
    let line_start = text[..pos].rfind('\n').map_or(0, |i| i + 1);
    let before = &text[line_start..pos];
    let clause = before
        .rsplit(['.', '。', ';', '；', ',', '，'])
        .next()
        .unwrap_or(before);
    clean_label(&tail_words(&clean_label(clause), 3))
}

// ── Scanner 6: age ranges ────────────────────────────────────────────────

static RE_AGE_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?P<lo>\d{1,3})\s*(?:-|–|~|to)\s*(?P<hi>\d{1,3})\s*(?P<unit>years?\s+old|years?|yrs?|岁)",
    )
    .unwrap()
});

fn scan_age_ranges(text: &str) -> Vec<ScanMatch> {
    RE_AGE_RANGE
        .captures_iter(text)
        .filter_map(|caps| {
            let lo: u32 = group(&caps, "lo")?.parse().ok()?;
            let hi: u32 = group(&caps, "hi")?.parse().ok()?;
            if lo > hi || hi > 120 {
                return None;
            }
            let span = span_of(&caps);
            let unit = if group(&caps, "unit")? == "岁" {
                "岁"
            } else {
                "years"
            };
            let label = context_label(text, &span, "Age range");
            Some(ScanMatch {
                kind: ScanKind::AgeRange,
                span,
                point: DataPoint::new(label, DataValue::Text(format!("{lo}-{hi}"))).with_unit(unit),
            })
        })
        .collect()
}

// ── Scanner 7: currency and magnitudes ───────────────────────────────────

static RE_CURRENCY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?P<cur>[$€£¥])\s?(?P<num>\d[\d,]*(?:\.\d+)?)(?:\s?(?P<mag>billion|million|thousand|bn|[kmb])\b)?",
    )
    .unwrap()
});

static RE_MAGNITUDE_ZH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?P<num>\d+(?:\.\d+)?)\s*(?P<mag>亿元|万元|亿|万)").unwrap());

fn scan_currency(text: &str) -> Vec<ScanMatch> {
    let symbols = RE_CURRENCY.captures_iter(text).filter_map(|caps| {
        let value = parse_number(group(&caps, "num")?)?;
        let span = span_of(&caps);
        let mut point = DataPoint::new(context_label(text, &span, "Amount"), value);
        point.unit = compose_unit(group(&caps, "cur"), group(&caps, "mag"));
        Some(ScanMatch {
            kind: ScanKind::CurrencyMagnitude,
            span,
            point,
        })
    });
    let chinese = RE_MAGNITUDE_ZH.captures_iter(text).filter_map(|caps| {
        let value = parse_number(group(&caps, "num")?)?;
        let span = span_of(&caps);
        let point = DataPoint::new(context_label(text, &span, "金额"), value)
            .with_unit(group(&caps, "mag")?);
        Some(ScanMatch {
            kind: ScanKind::CurrencyMagnitude,
            span,
            point,
        })
    });
    symbols.chain(chinese).collect()
}

// ── Scanner 8: bare percentages ──────────────────────────────────────────

static RE_PERCENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?P<num>\d+(?:\.\d+)?)\s*(?:%|％|percent\b)").unwrap()
});

fn scan_percentages(text: &str) -> Vec<ScanMatch> {
    RE_PERCENT
        .captures_iter(text)
        .filter_map(|caps| {
            let span = span_of(&caps);
            let label = context_label(text, &span, "Share");
            percent_match(ScanKind::Percentage, &caps, label)
        })
        .collect()
}

// ── Conclusions ──────────────────────────────────────────────────────────

static RE_BULLET_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:[-*+•]|\d{1,2}[.)])\s+(?P<text>.+)$").unwrap());

/// `true` when a section title names findings, results or recommendations.
pub fn is_conclusion_title(title: &str) -> bool {
    CONCLUSION_TITLES.matches(title)
}

/// One conclusion per bulleted line of every conclusion-titled section.
pub fn extract_conclusions<'a>(sections: impl IntoIterator<Item = &'a Section>) -> Vec<Conclusion> {
    let mut out = Vec::new();
    for section in sections {
        if !is_conclusion_title(&section.title) {
            continue;
        }
        for line in section.content.lines() {
            let Some(caps) = RE_BULLET_LINE.captures(line) else {
                continue;
            };
            let text = clean_label(&caps["text"]);
            if text.chars().count() < 3 {
                continue;
            }
            out.push(Conclusion::new(text).with_category(section.title.clone()));
        }
    }
    out
}
