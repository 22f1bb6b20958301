//! Keyword vocabularies shared by the extractor, classifier and planner.
//!
//! Each vocabulary compiles to one case-insensitive regex. ASCII words are
//! matched on word boundaries (with an optional plural `s`/`es`) so that
//! `key` does not fire inside `monkey` and `vs` not inside `canvas`. CJK
//! words have no word boundaries and are matched as plain substrings.

use once_cell::sync::Lazy;
use regex::Regex;

/// A compiled set of keywords.
#[derive(Debug)]
pub struct Lexicon {
    re: Regex,
}

impl Lexicon {
    pub fn new(words: &[&str]) -> Self {
        Self::with_patterns(words, &[])
    }

    /// Keywords plus raw regex alternatives, for terms that only mean
    /// something next to a number (`2023年`, `3月`).
    pub fn with_patterns(words: &[&str], patterns: &[&str]) -> Self {
        let alternatives: Vec<String> = words
            .iter()
            .map(|w| {
                let escaped = regex::escape(w);
                if w.is_ascii() {
                    format!(r"\b{escaped}(?:s|es)?\b")
                } else {
                    escaped
                }
            })
            .chain(patterns.iter().map(|p| p.to_string()))
            .collect();
        let pattern = format!("(?i)(?:{})", alternatives.join("|"));
        Self {
            re: Regex::new(&pattern).unwrap(),
        }
    }

    /// `true` when any keyword occurs in `text`.
    pub fn matches(&self, text: &str) -> bool {
        self.re.is_match(text)
    }
}

// ── Section roles ────────────────────────────────────────────────────────

/// Titles of sections whose bullets are conclusions, and which the planner
/// leaves to the summary and conclusions slides.
pub static CONCLUSION_TITLES: Lazy<Lexicon> = Lazy::new(|| {
    Lexicon::new(&[
        "conclusion", "finding", "result", "summary", "recommendation", "insight",
        "takeaway", "结论", "建议", "洞察", "总结",
    ])
});

/// Conclusion categories that read as recommendations.
pub static RECOMMENDATION: Lazy<Lexicon> = Lazy::new(|| {
    Lexicon::new(&[
        "recommendation", "recommend", "action", "next step", "proposal", "建议", "行动",
    ])
});

// ── Conceptual diagrams (checked in this order) ──────────────────────────

pub static HIERARCHY: Lazy<Lexicon> = Lazy::new(|| {
    Lexicon::new(&[
        "hierarchy", "level", "tier", "pyramid", "structure", "organization",
        "层级", "金字塔", "架构", "组织",
    ])
});

pub static PROGRESSION: Lazy<Lexicon> = Lazy::new(|| {
    Lexicon::new(&[
        "progression", "step", "phase", "process", "journey", "roadmap", "timeline",
        "递进", "步骤", "阶段", "流程", "路径",
    ])
});

pub static EMPHASIS: Lazy<Lexicon> = Lazy::new(|| {
    Lexicon::new(&[
        "emphasis", "key", "important", "core", "highlight", "takeaway",
        "强调", "关键", "重点", "核心", "亮点",
    ])
});

pub static CYCLE: Lazy<Lexicon> = Lazy::new(|| {
    Lexicon::new(&[
        "cycle", "loop", "iteration", "continuous", "feedback",
        "循环", "闭环", "迭代", "持续", "反馈",
    ])
});

pub static COMPARISON: Lazy<Lexicon> = Lazy::new(|| {
    Lexicon::new(&[
        "comparison", "versus", "vs", "before", "after", "pros", "cons",
        "对比", "比较", "前后", "优劣",
    ])
});

pub static FRAMEWORK: Lazy<Lexicon> = Lazy::new(|| {
    Lexicon::new(&[
        "framework", "model", "principle", "5w1h", "star", "golden circle",
        "框架", "模型", "法则", "黄金圈",
    ])
});

// ── Field semantics ──────────────────────────────────────────────────────

/// Bare `年` and `月` are not time words on their own (`青年`, `月活`), so
/// they only count after a number or as a named month.
pub static TEMPORAL_WORDS: Lazy<Lexicon> = Lazy::new(|| {
    Lexicon::with_patterns(
        &[
            "year", "month", "quarter", "week", "date", "day", "jan", "feb", "mar", "apr",
            "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec", "january", "february",
            "march", "april", "june", "july", "august", "september", "october", "november",
            "december", "季度", "上半年", "下半年",
        ],
        &[
            r"\d{2,4}\s*年",
            r"\d{1,2}\s*月",
            r"(?:^|[^一二三四五六七八九十])(?:[一二三四五六七八九]|十[一二]?)月",
            r"第[一二三四1-4]季度",
        ],
    )
});

pub static CATEGORICAL: Lazy<Lexicon> = Lazy::new(|| {
    Lexicon::new(&[
        "category", "type", "status", "department", "region", "segment", "channel",
        "product", "country", "类别", "类型", "状态", "部门", "地区", "渠道",
    ])
});

pub static HIERARCHICAL: Lazy<Lexicon> = Lazy::new(|| {
    Lexicon::new(&[
        "hierarchy", "level", "tier", "tree", "parent", "pyramid", "层级", "级别", "金字塔",
    ])
});

pub static GEOGRAPHIC: Lazy<Lexicon> = Lazy::new(|| {
    Lexicon::new(&[
        "map", "location", "country", "city", "province", "state", "地图", "城市", "国家", "省",
    ])
});

pub static FINANCIAL: Lazy<Lexicon> = Lazy::new(|| {
    Lexicon::new(&[
        "revenue", "profit", "cost", "margin", "budget", "price", "sales", "income",
        "收入", "利润", "成本", "毛利", "预算", "销售",
    ])
});

pub static PERFORMANCE: Lazy<Lexicon> = Lazy::new(|| {
    Lexicon::new(&[
        "kpi", "metric", "score", "rating", "efficiency", "target", "指标", "评分", "绩效",
    ])
});

// ── Decision-tree modifiers ──────────────────────────────────────────────

pub static STEPWISE: Lazy<Lexicon> = Lazy::new(|| {
    Lexicon::new(&["stepwise", "stepped", "discrete", "tiered pricing", "阶梯", "离散"])
});

pub static CYCLICAL: Lazy<Lexicon> = Lazy::new(|| {
    Lexicon::new(&["cyclical", "seasonal", "periodic", "seasonality", "周期", "季节"])
});

pub static MULTI_DIMENSIONAL: Lazy<Lexicon> = Lazy::new(|| {
    Lexicon::new(&[
        "radar", "spider", "dimension", "skill", "capability", "capabilities", "ability",
        "abilities", "competency", "competencies", "competitor", "多维", "能力", "雷达",
    ])
});

pub static STRATEGIC: Lazy<Lexicon> = Lazy::new(|| {
    Lexicon::new(&[
        "portfolio", "matrix", "positioning", "quadrant", "bcg", "战略", "象限", "定位",
    ])
});

pub static RANKING: Lazy<Lexicon> = Lazy::new(|| {
    Lexicon::new(&["rank", "ranking", "top", "best", "leader", "排名", "排行", "优先级"])
});

pub static TREND: Lazy<Lexicon> = Lazy::new(|| {
    Lexicon::new(&[
        "growth", "trend", "increase", "decrease", "change", "趋势", "增长", "下降", "变化",
    ])
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_words_respect_boundaries() {
        assert!(EMPHASIS.matches("Key challenges"));
        assert!(!EMPHASIS.matches("monkey business"));
        assert!(COMPARISON.matches("Build vs buy"));
        assert!(!COMPARISON.matches("canvas sizes"));
    }

    #[test]
    fn test_plural_forms_match() {
        assert!(PROGRESSION.matches("Next steps"));
        assert!(CONCLUSION_TITLES.matches("Key Findings"));
        assert!(CYCLE.matches("feedback loops"));
    }

    #[test]
    fn test_case_insensitive() {
        assert!(FRAMEWORK.matches("The GOLDEN CIRCLE"));
        assert!(STRATEGIC.matches("BCG view"));
    }

    #[test]
    fn test_cjk_time_words_need_a_number() {
        assert!(TEMPORAL_WORDS.matches("2023年"));
        assert!(TEMPORAL_WORDS.matches("3 月"));
        assert!(TEMPORAL_WORDS.matches("十二月"));
        assert!(TEMPORAL_WORDS.matches("第二季度"));
        for label in ["青年", "中年", "老年", "月活", "年龄"] {
            assert!(!TEMPORAL_WORDS.matches(label), "{label} is not a time label");
        }
    }

    #[test]
    fn test_cjk_words_match_as_substrings() {
        assert!(HIERARCHY.matches("用户金字塔分析"));
        assert!(CONCLUSION_TITLES.matches("关键洞察"));
        assert!(TREND.matches("营收增长"));
    }
}
