//! Check command: run the SEO rule set over an article.
//!
//! This is the CLI counterpart of the `check_article` MCP tool.

use anyhow::{Context, bail};
use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::{OwoColorize, Stream};
use tracing::{debug, instrument};

use ruya_lint_core::config::Config;
use ruya_lint_core::lint::{self, DiagnosticReport};
use ruya_lint_core::markdown;

use super::read_input_file;

/// Arguments for the `check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Article to check.
    pub file: Utf8PathBuf,

    /// Focus keyword.
    #[arg(long)]
    pub focus: String,

    /// LSI terms, comma-separated.
    #[arg(long, value_delimiter = ',')]
    pub lsi: Vec<String>,

    /// Length category (defaults to `default_length` from config).
    #[arg(long)]
    pub length: Option<String>,

    /// Check the visible prose only (drops link URLs, code and frontmatter).
    #[arg(long)]
    pub strip_markdown: bool,
}

/// Check an article and fail when any rule is violated.
#[instrument(name = "cmd_check", skip_all, fields(file = %args.file))]
pub fn cmd_check(
    args: CheckArgs,
    global_json: bool,
    config: &Config,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    let length = args.length.as_deref().unwrap_or(&config.default_length);
    let lsi = lint::clean_terms(&args.lsi);
    debug!(focus = %args.focus, length, lsi = lsi.len(), "executing check command");

    let rules = config.rules.compile().context("invalid rule set")?;
    let content = read_input_file(&args.file, max_input_bytes)?;
    let text = if args.strip_markdown {
        markdown::strip_to_prose(&content)
    } else {
        content
    };

    let report = lint::check(&text, &args.focus, &lsi, length, &rules)?;

    if global_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&args, &report, rules.lsi_max_occurrence());
    }

    let failed = failed_checks(&report);
    if failed > 0 {
        bail!("{} failed {failed} of 4 checks", args.file);
    }
    Ok(())
}

fn failed_checks(report: &DiagnosticReport) -> usize {
    let c = &report.checks;
    [c.length_ok, c.focus_density_ok, c.lsi_ok, c.no_banned]
        .iter()
        .filter(|ok| !**ok)
        .count()
}

fn status(ok: bool) -> String {
    if ok {
        "PASS".if_supports_color(Stream::Stdout, |t| t.green()).to_string()
    } else {
        "FAIL".if_supports_color(Stream::Stdout, |t| t.red()).to_string()
    }
}

fn print_report(args: &CheckArgs, report: &DiagnosticReport, lsi_max: usize) {
    let m = &report.metrics;
    let c = &report.checks;

    println!("{}", args.file.if_supports_color(Stream::Stdout, |t| t.bold()));
    println!(
        "  {} {} {} words (target {}-{})",
        "length:".if_supports_color(Stream::Stdout, |t| t.cyan()),
        status(c.length_ok),
        m.word_count,
        m.target_range[0],
        m.target_range[1],
    );
    println!(
        "  {} {} {:.2}% ({} x \"{}\")",
        "focus:".if_supports_color(Stream::Stdout, |t| t.cyan()),
        status(c.focus_density_ok),
        m.focus_density_pct,
        m.focus_count,
        args.focus,
    );
    println!(
        "  {} {} (max {} each)",
        "lsi:".if_supports_color(Stream::Stdout, |t| t.cyan()),
        status(c.lsi_ok),
        lsi_max
    );
    for tc in &m.lsi_counts {
        let count = if tc.count > lsi_max {
            tc.count.if_supports_color(Stream::Stdout, |t| t.red()).to_string()
        } else {
            tc.count.to_string()
        };
        println!("    {}: {}", tc.term, count);
    }
    println!(
        "  {} {}",
        "banned:".if_supports_color(Stream::Stdout, |t| t.cyan()),
        status(c.no_banned)
    );
    for hit in &m.banned_hits {
        println!("    {}", hit.if_supports_color(Stream::Stdout, |t| t.yellow()));
    }
}
