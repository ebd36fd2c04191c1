//! Density command: focus keyword density of an article.

use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::{OwoColorize, Stream};
use tracing::{debug, instrument};

use ruya_lint_core::text;

use super::read_input_file;

/// Arguments for the `density` subcommand.
#[derive(Args, Debug)]
pub struct DensityArgs {
    /// Article to measure.
    pub file: Utf8PathBuf,

    /// Keyword to count.
    #[arg(long)]
    pub keyword: String,
}

/// Print keyword density, occurrences and word count.
#[instrument(name = "cmd_density", skip_all, fields(file = %args.file))]
pub fn cmd_density(
    args: DensityArgs,
    global_json: bool,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    debug!(keyword = %args.keyword, "executing density command");

    let content = read_input_file(&args.file, max_input_bytes)?;
    let density = text::keyword_density(&content, &args.keyword);

    if global_json {
        println!("{}", serde_json::to_string_pretty(&density)?);
    } else {
        println!(
            "{}: {:.2}% ({} of {} words)",
            args.keyword.if_supports_color(Stream::Stdout, |t| t.bold()),
            density.density_pct,
            density.occurrences,
            density.word_count,
        );
    }

    Ok(())
}
