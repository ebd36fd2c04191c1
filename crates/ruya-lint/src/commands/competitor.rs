//! Competitor command: summarize saved competitor pages.

use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::{OwoColorize, Stream};
use serde::Serialize;
use tracing::{debug, instrument};

use ruya_lint_core::{competitor, text};

use super::read_input_file;

/// Arguments for the `competitor` subcommand.
#[derive(Args, Debug)]
pub struct CompetitorArgs {
    /// Saved HTML pages.
    #[arg(required = true)]
    pub files: Vec<Utf8PathBuf>,

    /// Focus keyword to measure on each page.
    #[arg(long)]
    pub focus: Option<String>,

    /// Also print the extracted text of each page.
    #[arg(long)]
    pub text: bool,
}

#[derive(Serialize)]
struct PageSummary {
    file: String,
    word_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    focus_density_pct: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    focus_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

/// Extract and measure the body text of each page.
#[instrument(name = "cmd_competitor", skip_all, fields(pages = args.files.len()))]
pub fn cmd_competitor(
    args: CompetitorArgs,
    global_json: bool,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    debug!(focus = ?args.focus, "executing competitor command");

    let mut pages = Vec::with_capacity(args.files.len());
    for file in &args.files {
        let html = read_input_file(file, max_input_bytes)?;
        let extracted = competitor::extract_text(&html);
        let density = args
            .focus
            .as_deref()
            .map(|focus| text::keyword_density(&extracted, focus));
        pages.push(PageSummary {
            file: file.to_string(),
            word_count: text::word_count(&extracted),
            focus_density_pct: density.map(|d| d.density_pct),
            focus_count: density.map(|d| d.occurrences),
            text: args.text.then_some(extracted),
        });
    }

    if global_json {
        println!("{}", serde_json::to_string_pretty(&pages)?);
        return Ok(());
    }

    for page in &pages {
        match (page.focus_density_pct, page.focus_count) {
            (Some(pct), Some(count)) => println!(
                "{} {} words, focus {:.2}% ({count}x)",
                page.file.if_supports_color(Stream::Stdout, |t| t.bold()),
                page.word_count,
                pct,
            ),
            _ => println!(
                "{} {} words",
                page.file.if_supports_color(Stream::Stdout, |t| t.bold()),
                page.word_count
            ),
        }
        if let Some(ref body) = page.text {
            println!("{body}");
            println!();
        }
    }

    Ok(())
}
