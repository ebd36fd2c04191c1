//! Markdown processing utilities.
//!
//! Articles come back from the rewriter and the anchor applier as Markdown.
//! pulldown-cmark gives a proper CommonMark parse for the two things callers
//! need: the visible prose (so link URLs do not inflate word counts) and the
//! list of links already in the article.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A Markdown link found in an article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Link {
    /// Visible link text.
    pub text: String,
    /// Link destination.
    pub url: String,
}

fn parser_options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH
}

/// Strip Markdown formatting, returning the visible prose.
///
/// Drops code blocks, inline code, HTML and YAML frontmatter. Keeps heading
/// text (headings are part of an article's word count), link text, list
/// items and emphasis text without markers.
#[tracing::instrument(skip_all, fields(input_len = text.len()))]
pub fn strip_to_prose(text: &str) -> String {
    let text = strip_frontmatter(text);
    let mut result = String::with_capacity(text.len());
    let mut in_code_block = false;

    for event in Parser::new_ext(text, parser_options()) {
        match event {
            Event::Start(Tag::CodeBlock(_)) => in_code_block = true,
            Event::End(TagEnd::CodeBlock) => in_code_block = false,
            Event::Text(t) if !in_code_block => result.push_str(&t),
            Event::SoftBreak | Event::HardBreak => result.push(' '),
            Event::End(TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::Item) => {
                result.push('\n');
            }
            _ => {}
        }
    }

    result
}

/// List the links in a Markdown article, in document order.
#[tracing::instrument(skip_all, fields(input_len = text.len()))]
pub fn links(text: &str) -> Vec<Link> {
    let mut found = Vec::new();
    let mut current: Option<(String, String)> = None;

    for event in Parser::new_ext(text, parser_options()) {
        match event {
            Event::Start(Tag::Link { dest_url, .. }) => {
                current = Some((String::new(), dest_url.to_string()));
            }
            Event::Text(t) | Event::Code(t) => {
                if let Some((ref mut link_text, _)) = current {
                    link_text.push_str(&t);
                }
            }
            Event::End(TagEnd::Link) => {
                if let Some((text, url)) = current.take() {
                    found.push(Link { text, url });
                }
            }
            _ => {}
        }
    }

    found
}

/// Skip YAML frontmatter delimited by `---` lines.
fn strip_frontmatter(text: &str) -> &str {
    let trimmed = text.trim_start();
    let Some(after_opening) = trimmed.strip_prefix("---") else {
        return text;
    };
    let Some(close_pos) = after_opening.find("\n---") else {
        return text;
    };

    let remainder = &after_opening[close_pos + 4..];
    remainder.strip_prefix('\n').unwrap_or(remainder)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_keeps_link_text_and_drops_url() {
        let result = strip_to_prose("تفسير [الأحلام](https://x.test/ahlam) رائع");
        assert!(result.contains("الأحلام"));
        assert!(!result.contains("https"));
    }

    #[test]
    fn strip_keeps_headings() {
        let result = strip_to_prose("# تفسير حلم المطر\n\nنص المقال.");
        assert!(result.contains("تفسير حلم المطر"));
        assert!(result.contains("نص المقال."));
    }

    #[test]
    fn strip_removes_code_and_frontmatter() {
        let input = "---\ntitle: حلم\n---\n\nنص.\n\n```\nlet x = 1;\n```\n\nوأيضا `code` هنا.";
        let result = strip_to_prose(input);
        assert!(!result.contains("title"));
        assert!(!result.contains("let x"));
        assert!(!result.contains("code"));
        assert!(result.contains("نص."));
        assert!(result.contains("هنا."));
    }

    #[test]
    fn strip_removes_emphasis_markers() {
        let result = strip_to_prose("رؤية **الذهب** و*الفضة*");
        assert!(result.contains("الذهب"));
        assert!(!result.contains('*'));
    }

    #[test]
    fn links_are_listed_in_order() {
        let text = "[الأحلام](/ahlam) ثم [رؤية **البحر**](https://x.test/sea) ونص.";
        let found = links(text);
        assert_eq!(
            found,
            vec![
                Link {
                    text: "الأحلام".to_string(),
                    url: "/ahlam".to_string(),
                },
                Link {
                    text: "رؤية البحر".to_string(),
                    url: "https://x.test/sea".to_string(),
                },
            ]
        );
    }

    #[test]
    fn no_links_in_plain_text() {
        assert!(links("نص بلا روابط").is_empty());
        assert!(links("").is_empty());
    }

    #[test]
    fn frontmatter_without_close_is_kept() {
        assert_eq!(strip_frontmatter("---\nno close"), "---\nno close");
    }
}
