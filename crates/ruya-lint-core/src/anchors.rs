//! Internal-link insertion.
//!
//! Turns editor-supplied phrases into Markdown links inside an article.
//! Anchors are applied one at a time, in order, each against the text left
//! by the previous ones. A phrase that is not found verbatim falls back to
//! its first six words; a phrase that still cannot be found is reported as
//! skipped rather than treated as an error.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::AnchorTableError;

/// Marker appended to applied entries that used the fallback window.
pub const PARTIAL_MARKER: &str = "(partial)";

/// Number of leading words in the fallback window.
const FALLBACK_WINDOW_WORDS: usize = 6;

/// One row of the anchor table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Anchor {
    /// Text to turn into a link.
    pub phrase: String,
    /// Link target.
    pub url: String,
}

impl Anchor {
    /// Build an anchor from a phrase and a URL.
    pub fn new(phrase: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            phrase: phrase.into(),
            url: url.into(),
        }
    }
}

/// Outcome of applying an anchor table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AnchorResult {
    /// The article with links inserted.
    pub updated_text: String,
    /// Linked phrases in application order; fallback windows carry
    /// [`PARTIAL_MARKER`].
    pub applied: Vec<String>,
    /// Phrases that could not be located.
    pub skipped: Vec<String>,
}

/// Insert Markdown links for each anchor into `text`.
///
/// For every anchor, in order:
/// - rows with a blank phrase or URL are ignored;
/// - the first verbatim (case-sensitive) occurrence of the phrase becomes
///   `[phrase](url)`;
/// - otherwise, for phrases of six or more words, the first six words joined
///   by single spaces are tried the same way and recorded with
///   [`PARTIAL_MARKER`];
/// - otherwise the phrase is recorded as skipped and the text is unchanged.
///
/// Each substitution edits the working text seen by later anchors.
#[tracing::instrument(skip_all, fields(text_len = text.len(), anchors = anchors.len()))]
pub fn apply(text: &str, anchors: &[Anchor]) -> AnchorResult {
    let mut updated = text.to_string();
    let mut applied = Vec::new();
    let mut skipped = Vec::new();

    for anchor in anchors {
        let phrase = anchor.phrase.trim();
        let url = anchor.url.trim();
        if phrase.is_empty() || url.is_empty() {
            continue;
        }

        if let Some(linked) = link_first(&updated, phrase, url) {
            updated = linked;
            applied.push(phrase.to_string());
            continue;
        }

        let words: Vec<&str> = phrase.split_whitespace().collect();
        let window = (words.len() >= FALLBACK_WINDOW_WORDS)
            .then(|| words[..FALLBACK_WINDOW_WORDS].join(" "));

        match window.and_then(|w| link_first(&updated, &w, url).map(|linked| (w, linked))) {
            Some((window, linked)) => {
                tracing::debug!(%window, "anchor applied to fallback window");
                updated = linked;
                applied.push(format!("{window} {PARTIAL_MARKER}"));
            }
            None => {
                tracing::debug!(phrase, "anchor phrase not found");
                skipped.push(phrase.to_string());
            }
        }
    }

    tracing::debug!(
        applied = applied.len(),
        skipped = skipped.len(),
        "anchors processed"
    );

    AnchorResult {
        updated_text: updated,
        applied,
        skipped,
    }
}

/// Replace the first occurrence of `needle` with a Markdown link.
fn link_first(haystack: &str, needle: &str, url: &str) -> Option<String> {
    haystack
        .contains(needle)
        .then(|| haystack.replacen(needle, &format!("[{needle}]({url})"), 1))
}

/// Encoding of an anchor table file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// A JSON array of `{"phrase", "url"}` objects.
    Json,
    /// A YAML sequence of `phrase`/`url` mappings.
    Yaml,
    /// One `phrase<TAB>url` pair per line.
    Tsv,
}

impl TableFormat {
    /// Guess the format from a file extension (TSV when unrecognized).
    pub fn from_extension(ext: Option<&str>) -> Self {
        match ext.map(str::to_ascii_lowercase).as_deref() {
            Some("json") => Self::Json,
            Some("yaml" | "yml") => Self::Yaml,
            _ => Self::Tsv,
        }
    }
}

/// Parse an anchor table.
///
/// Missing `phrase`/`url` fields become empty strings, which [`apply`]
/// ignores. TSV lines without a tab yield an anchor with an empty URL.
pub fn parse_table(content: &str, format: TableFormat) -> Result<Vec<Anchor>, AnchorTableError> {
    let anchors: Vec<Anchor> = match format {
        TableFormat::Json => serde_json::from_str(content)?,
        TableFormat::Yaml => serde_yaml::from_str::<Option<Vec<Anchor>>>(content)?.unwrap_or_default(),
        TableFormat::Tsv => content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| match line.split_once('\t') {
                Some((phrase, url)) => Anchor::new(phrase, url),
                None => Anchor::new(line, ""),
            })
            .collect(),
    };
    Ok(anchors)
}
