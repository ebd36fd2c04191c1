//! Compiled SEO rule set.
//!
//! A [`RuleSet`] is built once from a [`RuleSetConfig`] at startup. Every
//! banned pattern is compiled up front, so a malformed expression is a
//! configuration error and never reaches a check. The compiled set is
//! immutable and can be shared across threads.

use std::collections::BTreeMap;

use regex::Regex;

use crate::config::RuleSetConfig;
use crate::error::{ConfigError, ConfigResult};

/// Immutable, validated rule set.
#[derive(Debug, Clone)]
pub struct RuleSet {
    length_map: BTreeMap<String, usize>,
    focus_density_min_pct: f64,
    focus_density_max_pct: f64,
    lsi_max_occurrence: usize,
    banned: Vec<BannedPattern>,
}

/// A banned pattern with its source text kept for reporting.
#[derive(Debug, Clone)]
struct BannedPattern {
    source: String,
    regex: Regex,
}

impl RuleSet {
    /// Compile a rule set document.
    ///
    /// Fails on the first banned pattern the regex engine rejects.
    pub fn compile(config: &RuleSetConfig) -> ConfigResult<Self> {
        let banned = config
            .banned_regex
            .iter()
            .map(|pattern| {
                Regex::new(pattern)
                    .map(|regex| BannedPattern {
                        source: pattern.clone(),
                        regex,
                    })
                    .map_err(|source| ConfigError::InvalidPattern {
                        pattern: pattern.clone(),
                        source,
                    })
            })
            .collect::<ConfigResult<Vec<_>>>()?;

        tracing::debug!(
            categories = config.length_map.len(),
            banned = banned.len(),
            "rule set compiled"
        );

        Ok(Self {
            length_map: config.length_map.clone(),
            focus_density_min_pct: config.focus_density_min_pct,
            focus_density_max_pct: config.focus_density_max_pct,
            lsi_max_occurrence: config.lsi_max_occurrence,
            banned,
        })
    }

    /// Target word count for a length category.
    pub fn target_for(&self, category: &str) -> ConfigResult<usize> {
        self.length_map
            .get(category)
            .copied()
            .ok_or_else(|| ConfigError::UnknownLengthCategory {
                category: category.to_string(),
                available: self.categories().collect::<Vec<_>>().join(", "),
            })
    }

    /// Configured length categories, sorted.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.length_map.keys().map(String::as_str)
    }

    /// Lowest acceptable focus density, in percent.
    pub const fn focus_density_min_pct(&self) -> f64 {
        self.focus_density_min_pct
    }

    /// Highest acceptable focus density, in percent.
    pub const fn focus_density_max_pct(&self) -> f64 {
        self.focus_density_max_pct
    }

    /// Maximum occurrences allowed per LSI term.
    pub const fn lsi_max_occurrence(&self) -> usize {
        self.lsi_max_occurrence
    }

    /// Banned pattern sources that match anywhere in `text`, in rule set order.
    pub fn banned_hits(&self, text: &str) -> Vec<String> {
        self.banned
            .iter()
            .filter(|p| p.regex.is_match(text))
            .map(|p| p.source.clone())
            .collect()
    }
}

/// Acceptable word-count range for a target: `[floor(0.9 t), ceil(1.1 t)]`.
///
/// Integer arithmetic keeps the bounds exact (800 -> [720, 880]) and the
/// upper bound saturates instead of overflowing.
pub const fn target_range(target: usize) -> (usize, usize) {
    let tenth = target.div_ceil(10);
    (target - tenth, target.saturating_add(tenth))
}
