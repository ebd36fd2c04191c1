//! Competitor page text extraction.
//!
//! Works on HTML that has already been fetched and saved; fetching is left
//! to the caller. Only paragraph text is kept, and very short paragraphs
//! (navigation labels, captions, bylines) are dropped.

use scraper::{Html, Selector};

/// Paragraphs need more than this many words to be kept.
const MIN_PARAGRAPH_WORDS: usize = 4;

/// Extracted text is truncated to this many characters.
pub const MAX_EXTRACT_CHARS: usize = 15_000;

/// Extract the body text of a competitor page.
///
/// Each `<p>` element's text fragments are trimmed and joined by single
/// spaces. Paragraphs with more than four whitespace-separated words are
/// joined with newlines, and the result is cut at [`MAX_EXTRACT_CHARS`]
/// characters.
#[tracing::instrument(skip_all, fields(html_len = html.len()))]
pub fn extract_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let selector = match Selector::parse("p") {
        Ok(selector) => selector,
        Err(e) => {
            tracing::warn!(error = ?e, "paragraph selector rejected");
            return String::new();
        }
    };

    let paragraphs: Vec<String> = document
        .select(&selector)
        .map(|p| {
            p.text()
                .map(str::trim)
                .filter(|fragment| !fragment.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|p| p.split_whitespace().count() > MIN_PARAGRAPH_WORDS)
        .collect();

    tracing::debug!(kept = paragraphs.len(), "competitor paragraphs extracted");
    paragraphs
        .join("\n")
        .chars()
        .take(MAX_EXTRACT_CHARS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_long_paragraphs_only() {
        let html = r#"<html><body>
            <nav><p>الرئيسية</p></nav>
            <p>رؤية المطر في المنام تدل على الخير والرزق الواسع</p>
            <p>اقرأ أيضا</p>
            <div><p>ومن رأى أنه يشرب <b>ماء</b> صافيا فهو خير له</p></div>
        </body></html>"#;
        let text = extract_text(html);
        assert_eq!(
            text,
            "رؤية المطر في المنام تدل على الخير والرزق الواسع\nومن رأى أنه يشرب ماء صافيا فهو خير له"
        );
    }

    #[test]
    fn exactly_four_words_is_dropped() {
        assert_eq!(extract_text("<p>one two three four</p>"), "");
        assert_eq!(extract_text("<p>one two three four five</p>"), "one two three four five");
    }

    #[test]
    fn ignores_text_outside_paragraphs() {
        let html = "<h1>عنوان طويل جدا عن تفسير الأحلام</h1><div>نص طويل خارج الفقرات هنا</div>";
        assert_eq!(extract_text(html), "");
    }

    #[test]
    fn truncates_by_characters() {
        let paragraph = format!("<p>{}</p>", vec!["حلم"; 6000].join(" "));
        let text = extract_text(&paragraph);
        assert_eq!(text.chars().count(), MAX_EXTRACT_CHARS);
    }

    #[test]
    fn empty_document_yields_empty_text() {
        assert_eq!(extract_text(""), "");
    }
}
