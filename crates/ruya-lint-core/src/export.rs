//! Article export envelopes.

use serde::{Deserialize, Serialize};

/// Output encoding for a finished article.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// The article as-is.
    #[default]
    Markdown,
    /// `{"article": ...}` pretty JSON.
    Json,
}

#[derive(Serialize)]
struct Envelope<'a> {
    article: &'a str,
}

/// Wrap an article in a pretty-printed `{"article": ...}` object.
///
/// Non-ASCII text is written as-is, not escaped.
pub fn to_json(article: &str) -> String {
    // Serializing a struct of one &str cannot fail.
    serde_json::to_string_pretty(&Envelope { article }).unwrap_or_default()
}

/// Render an article in the given format.
pub fn render(article: &str, format: Format) -> String {
    match format {
        Format::Markdown => article.to_string(),
        Format::Json => to_json(article),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_keeps_arabic_unescaped() {
        let out = to_json("تفسير حلم المطر");
        assert_eq!(out, "{\n  \"article\": \"تفسير حلم المطر\"\n}");
    }

    #[test]
    fn json_round_trips_quotes_and_newlines() {
        let article = "سطر \"أول\"\nسطر ثان";
        let value: serde_json::Value = serde_json::from_str(&to_json(article)).unwrap();
        assert_eq!(value["article"], article);
    }

    #[test]
    fn markdown_is_passthrough() {
        assert_eq!(render("# عنوان", Format::Markdown), "# عنوان");
        assert!(render("# عنوان", Format::Json).starts_with('{'));
    }
}
