//! Text metrics.
//!
//! Word counting and keyword density over arbitrary Unicode text. Arabic
//! letters are word characters; combining marks (harakat) are not, so they
//! split a vocalized word the same way punctuation does.

use regex::{Regex, RegexBuilder};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Maximal runs of letters, digits and underscore.
static WORD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\p{L}\p{N}_]+").expect("valid regex"));

/// Count words as maximal runs of word characters.
///
/// Letters, digits and `_` are word characters; everything else, combining
/// marks included, separates words.
pub fn word_count(text: &str) -> usize {
    WORD_PATTERN.find_iter(text).count()
}

/// Keyword density of a text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Density {
    /// Occurrences per hundred words, rounded to 2 decimals.
    pub density_pct: f64,
    /// Number of case-insensitive literal matches of the keyword.
    pub occurrences: usize,
    /// Word count of the text.
    pub word_count: usize,
}

/// Compute the density of `keyword` in `text`.
///
/// The keyword is matched literally (regex metacharacters are escaped) and
/// case-insensitively. An empty keyword yields zero occurrences without
/// scanning the text.
#[tracing::instrument(skip(text), fields(text_len = text.len()))]
pub fn keyword_density(text: &str, keyword: &str) -> Density {
    let words = word_count(text);
    if keyword.is_empty() {
        return Density {
            density_pct: 0.0,
            occurrences: 0,
            word_count: words,
        };
    }

    let occurrences = count_occurrences(text, keyword);
    let density_pct = round2(occurrences as f64 / words.max(1) as f64 * 100.0);

    Density {
        density_pct,
        occurrences,
        word_count: words,
    }
}

/// Count non-overlapping, case-insensitive literal matches of `term`.
///
/// Returns 0 for an empty term.
pub fn count_occurrences(text: &str, term: &str) -> usize {
    if term.is_empty() {
        return 0;
    }

    match RegexBuilder::new(&regex::escape(term))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => re.find_iter(text).count(),
        Err(e) => {
            // Escaped input only fails on the compiled size limit.
            tracing::warn!(term_len = term.len(), error = %e, "falling back to lowercase scan");
            text.to_lowercase().matches(&term.to_lowercase()).count()
        }
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
