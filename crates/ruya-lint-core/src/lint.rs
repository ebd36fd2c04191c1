//! SEO precheck engine.
//!
//! Runs the four rule-set checks (length, focus density, LSI caps, banned
//! patterns) over an article and returns a [`DiagnosticReport`]. Every check
//! is computed on every call, so the editor sees all violations at once.
//! The input text is only read.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ConfigResult;
use crate::rules::{self, RuleSet};
use crate::text;

/// Measured values behind the verdicts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Metrics {
    /// Words in the article.
    pub word_count: usize,
    /// Inclusive `[low, high]` word-count range for the length category.
    pub target_range: [usize; 2],
    /// Focus keyword density, in percent (2 decimals).
    pub focus_density_pct: f64,
    /// Focus keyword occurrences.
    pub focus_count: usize,
    /// Occurrences of each LSI term, in input order.
    pub lsi_counts: Vec<TermCount>,
    /// Banned patterns that matched, in rule set order.
    pub banned_hits: Vec<String>,
}

/// Occurrence count of one LSI term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TermCount {
    /// The term as supplied.
    pub term: String,
    /// Case-insensitive literal occurrences.
    pub count: usize,
}

/// Pass/fail verdict for each check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Checks {
    /// Word count lies inside the target range.
    pub length_ok: bool,
    /// Focus density lies inside the configured bounds.
    pub focus_density_ok: bool,
    /// No LSI term exceeds the occurrence cap.
    pub lsi_ok: bool,
    /// No banned pattern matched.
    pub no_banned: bool,
}

impl Checks {
    /// `true` when every check passed.
    pub const fn all_ok(&self) -> bool {
        self.length_ok && self.focus_density_ok && self.lsi_ok && self.no_banned
    }
}

/// Snapshot of one precheck run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DiagnosticReport {
    /// Measured values.
    pub metrics: Metrics,
    /// Verdicts.
    pub checks: Checks,
}

impl DiagnosticReport {
    /// Look up the reported count of an LSI term (first entry if duplicated).
    pub fn lsi_count(&self, term: &str) -> Option<usize> {
        self.metrics
            .lsi_counts
            .iter()
            .find(|tc| tc.term == term)
            .map(|tc| tc.count)
    }
}

/// Trim user-supplied LSI terms and drop the blank ones.
///
/// `check` counts whatever it is given, so callers taking terms from a
/// comma-separated field run them through here first.
pub fn clean_terms<S: AsRef<str>>(terms: &[S]) -> Vec<String> {
    terms
        .iter()
        .map(|t| t.as_ref().trim())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Check an article against a rule set.
///
/// # Arguments
///
/// * `text`: the article text.
/// * `focus_keyword`: the primary search term; empty disables matching.
/// * `lsi_terms`: related terms, each capped at `lsi_max_occurrence`.
/// * `length_category`: a key of the rule set's `length_map`.
/// * `rules`: the compiled rule set.
///
/// # Errors
///
/// Returns [`ConfigError::UnknownLengthCategory`](crate::ConfigError::UnknownLengthCategory)
/// when `length_category` is not configured.
#[tracing::instrument(skip(text, lsi_terms, rules), fields(text_len = text.len()))]
pub fn check<S: AsRef<str>>(
    text: &str,
    focus_keyword: &str,
    lsi_terms: &[S],
    length_category: &str,
    rules: &RuleSet,
) -> ConfigResult<DiagnosticReport> {
    // --- length ---
    let target = rules.target_for(length_category)?;
    let (low, high) = rules::target_range(target);
    let word_count = text::word_count(text);
    let length_ok = (low..=high).contains(&word_count);

    // --- focus density ---
    let density = text::keyword_density(text, focus_keyword);
    let focus_density_ok = density.density_pct >= rules.focus_density_min_pct()
        && density.density_pct <= rules.focus_density_max_pct();

    // --- LSI caps ---
    let lsi_counts: Vec<TermCount> = lsi_terms
        .iter()
        .map(|term| {
            let term = term.as_ref();
            TermCount {
                term: term.to_string(),
                count: text::count_occurrences(text, term),
            }
        })
        .collect();
    let lsi_ok = lsi_counts
        .iter()
        .all(|tc| tc.count <= rules.lsi_max_occurrence());

    // --- banned patterns ---
    let banned_hits = rules.banned_hits(text);
    let no_banned = banned_hits.is_empty();

    let checks = Checks {
        length_ok,
        focus_density_ok,
        lsi_ok,
        no_banned,
    };
    tracing::debug!(
        word_count,
        density = density.density_pct,
        banned = banned_hits.len(),
        pass = checks.all_ok(),
        "precheck complete"
    );

    Ok(DiagnosticReport {
        metrics: Metrics {
            word_count,
            target_range: [low, high],
            focus_density_pct: density.density_pct,
            focus_count: density.occurrences,
            lsi_counts,
            banned_hits,
        },
        checks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuleSetConfig;
    use crate::error::ConfigError;

    const NO_TERMS: &[&str] = &[];

    fn rules(config: RuleSetConfig) -> RuleSet {
        config.compile().unwrap()
    }

    fn tiny_rules() -> RuleSet {
        rules(RuleSetConfig {
            length_map: [("tiny".to_string(), 10)].into(),
            focus_density_min_pct: 5.0,
            focus_density_max_pct: 20.0,
            lsi_max_occurrence: 2,
            banned_regex: vec![],
        })
    }

    /// `n` filler words.
    fn words(n: usize) -> String {
        vec!["كلمة"; n].join(" ")
    }

    #[test]
    fn length_bounds_are_inclusive() {
        let rules = rules(RuleSetConfig {
            focus_density_min_pct: 0.0,
            ..Default::default()
        });
        for (n, ok) in [(719, false), (720, true), (880, true), (881, false)] {
            let report = check(&words(n), "", NO_TERMS, "short", &rules).unwrap();
            assert_eq!(report.metrics.word_count, n);
            assert_eq!(report.metrics.target_range, [720, 880]);
            assert_eq!(report.checks.length_ok, ok, "word count {n}");
        }
    }

    #[test]
    fn unknown_category_is_config_error() {
        let err = check("نص", "", NO_TERMS, "huge", &tiny_rules()).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownLengthCategory { .. }));
    }

    #[test]
    fn report_is_exhaustive() {
        // Too short AND keyword absent AND LSI over cap AND banned hit.
        let rules = rules(RuleSetConfig {
            length_map: [("tiny".to_string(), 100)].into(),
            lsi_max_occurrence: 0,
            banned_regex: vec!["منقول".to_string()],
            ..Default::default()
        });
        let report = check("مقال منقول عن الماء", "حلم", &["الماء"], "tiny", &rules).unwrap();
        assert!(!report.checks.length_ok);
        assert!(!report.checks.focus_density_ok);
        assert!(!report.checks.lsi_ok);
        assert!(!report.checks.no_banned);
        assert_eq!(report.metrics.banned_hits, vec!["منقول"]);
        assert_eq!(report.lsi_count("الماء"), Some(1));
    }

    #[test]
    fn focus_density_bounds_are_inclusive() {
        // 1 of 10 words = 10%, 1 of 20 = 5%, 2 of 10 = 20%
        let rules = tiny_rules();
        let text = format!("حلم {}", words(9));
        assert!(check(&text, "حلم", NO_TERMS, "tiny", &rules).unwrap().checks.focus_density_ok);

        let rules = rules_with_min_max(5.0, 5.0);
        let text = format!("حلم {}", words(19));
        let report = check(&text, "حلم", NO_TERMS, "tiny", &rules).unwrap();
        assert_eq!(report.metrics.focus_density_pct, 5.0);
        assert!(report.checks.focus_density_ok);

        let rules = rules_with_min_max(20.0, 20.0);
        let text = format!("حلم حلم {}", words(8));
        assert!(check(&text, "حلم", NO_TERMS, "tiny", &rules).unwrap().checks.focus_density_ok);
    }

    fn rules_with_min_max(min: f64, max: f64) -> RuleSet {
        rules(RuleSetConfig {
            length_map: [("tiny".to_string(), 10)].into(),
            focus_density_min_pct: min,
            focus_density_max_pct: max,
            ..Default::default()
        })
    }

    #[test]
    fn zero_density_passes_only_with_zero_minimum() {
        let text = words(10);
        let strict = rules_with_min_max(0.5, 2.5);
        assert!(!check(&text, "حلم", NO_TERMS, "tiny", &strict).unwrap().checks.focus_density_ok);

        let lax = rules_with_min_max(0.0, 2.5);
        assert!(check(&text, "حلم", NO_TERMS, "tiny", &lax).unwrap().checks.focus_density_ok);
    }

    #[test]
    fn lsi_cap_equality_passes() {
        let text = "الماء الماء نهر";
        let report = check(text, "", &["الماء"], "tiny", &tiny_rules()).unwrap();
        assert_eq!(report.lsi_count("الماء"), Some(2));
        assert!(report.checks.lsi_ok);
    }

    #[test]
    fn lsi_cap_plus_one_fails_and_keeps_count() {
        let text = "الماء الماء الماء نهر";
        let report = check(text, "", &["نهر", "الماء"], "tiny", &tiny_rules()).unwrap();
        assert_eq!(report.lsi_count("الماء"), Some(3));
        assert_eq!(report.lsi_count("نهر"), Some(1));
        assert!(!report.checks.lsi_ok);
    }

    #[test]
    fn lsi_terms_keep_order_and_duplicates() {
        let terms = ["b", "a", "b"];
        let report = check("a b b", "", &terms, "tiny", &tiny_rules()).unwrap();
        let listed: Vec<_> = report
            .metrics
            .lsi_counts
            .iter()
            .map(|tc| (tc.term.as_str(), tc.count))
            .collect();
        assert_eq!(listed, vec![("b", 2), ("a", 1), ("b", 2)]);
    }

    #[test]
    fn lsi_terms_are_literal_and_case_insensitive() {
        let report = check("A.B a.b axb", "", &["a.b"], "tiny", &tiny_rules()).unwrap();
        assert_eq!(report.lsi_count("a.b"), Some(2));
    }

    #[test]
    fn empty_inputs_produce_zero_results() {
        let report = check("", "", NO_TERMS, "tiny", &tiny_rules()).unwrap();
        assert_eq!(report.metrics.word_count, 0);
        assert_eq!(report.metrics.focus_count, 0);
        assert_eq!(report.metrics.focus_density_pct, 0.0);
        assert!(report.metrics.lsi_counts.is_empty());
        assert!(report.checks.lsi_ok);
        assert!(report.checks.no_banned);
    }

    #[test]
    fn clean_terms_trims_and_drops_blanks() {
        let raw = ["الماء", " المنام", "", "  ", "البحر "];
        assert_eq!(clean_terms(&raw), ["الماء", "المنام", "البحر"]);
        assert!(clean_terms::<&str>(&[]).is_empty());
    }

    #[test]
    fn repeated_checks_are_identical() {
        let rules = tiny_rules();
        let text = "رؤية الماء في المنام خير، والماء الصافي بشارة";
        let first = check(text, "الماء", &["المنام"], "tiny", &rules).unwrap();
        let second = check(text, "الماء", &["المنام"], "tiny", &rules).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn all_ok_requires_every_check() {
        let rules = rules_with_min_max(0.0, 100.0);
        let report = check(&words(10), "", NO_TERMS, "tiny", &rules).unwrap();
        assert!(report.checks.all_ok());

        let report = check(&words(3), "", NO_TERMS, "tiny", &rules).unwrap();
        assert!(!report.checks.all_ok());
    }

    #[test]
    fn report_serializes_with_metrics_and_checks() {
        let report = check("حلم", "حلم", &["ماء"], "tiny", &tiny_rules()).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["metrics"]["word_count"], 1);
        assert_eq!(json["metrics"]["target_range"][0], 9);
        assert_eq!(json["metrics"]["lsi_counts"][0]["term"], "ماء");
        assert_eq!(json["checks"]["no_banned"], true);
    }
}
