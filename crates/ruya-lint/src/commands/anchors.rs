//! Anchors command: insert internal links from an anchor table.
//!
//! The updated article goes to `--output` when given, otherwise to stdout
//! (with the summary on stderr so the article can be piped).

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::{OwoColorize, Stream};
use serde::Serialize;
use tracing::{debug, instrument};

use ruya_lint_core::anchors::{self, TableFormat};
use ruya_lint_core::export::{self, Format};
use ruya_lint_core::markdown;

use super::read_input_file;

/// Arguments for the `anchors` subcommand.
#[derive(Args, Debug)]
pub struct AnchorsArgs {
    /// Article to link.
    pub file: Utf8PathBuf,

    /// Anchor table (.json, .yaml/.yml, or phrase<TAB>url lines).
    #[arg(long)]
    pub table: Utf8PathBuf,

    /// Write the updated article here instead of stdout.
    #[arg(short, long)]
    pub output: Option<Utf8PathBuf>,

    /// Encoding of the updated article.
    #[arg(long, value_enum, default_value_t)]
    pub format: Format,
}

#[derive(Serialize)]
struct AnchorsSummary {
    applied: Vec<String>,
    skipped: Vec<String>,
    link_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    article: Option<String>,
}

/// Apply an anchor table to an article.
#[instrument(name = "cmd_anchors", skip_all, fields(file = %args.file, table = %args.table))]
pub fn cmd_anchors(
    args: AnchorsArgs,
    global_json: bool,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    debug!(output = ?args.output, format = ?args.format, "executing anchors command");

    let content = read_input_file(&args.file, max_input_bytes)?;
    let table = read_input_file(&args.table, max_input_bytes)?;
    let table_format = TableFormat::from_extension(args.table.extension());
    let anchor_rows = anchors::parse_table(&table, table_format)
        .with_context(|| format!("failed to parse anchor table {}", args.table))?;

    let result = anchors::apply(&content, &anchor_rows);
    let link_count = markdown::links(&result.updated_text).len();
    let rendered = export::render(&result.updated_text, args.format);

    if let Some(ref out) = args.output {
        std::fs::write(out.as_std_path(), &rendered)
            .with_context(|| format!("failed to write {out}"))?;
    }

    if global_json {
        let summary = AnchorsSummary {
            applied: result.applied,
            skipped: result.skipped,
            link_count,
            output: args.output.as_ref().map(ToString::to_string),
            article: args.output.is_none().then_some(rendered),
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let stream = if args.output.is_some() {
        Stream::Stdout
    } else {
        Stream::Stderr
    };
    let mut lines = vec![format!(
        "{} {} applied, {} skipped, {} links in article",
        "anchors:".if_supports_color(stream, |t| t.cyan()),
        result.applied.len().if_supports_color(stream, |t| t.green()),
        result.skipped.len().if_supports_color(stream, |t| t.yellow()),
        link_count,
    )];
    lines.extend(result.skipped.iter().map(|s| {
        format!("  {} {s}", "skipped:".if_supports_color(stream, |t| t.dimmed()))
    }));

    match args.output {
        Some(ref out) => {
            for line in &lines {
                println!("{line}");
            }
            println!("{} {out}", "wrote".if_supports_color(stream, |t| t.dimmed()));
        }
        None => {
            print!("{rendered}");
            for line in &lines {
                eprintln!("{line}");
            }
        }
    }

    Ok(())
}
