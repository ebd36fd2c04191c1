//! Recover-json command: dig the JSON object out of a saved LLM reply.

use anyhow::bail;
use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::{OwoColorize, Stream};
use tracing::{debug, instrument};

use ruya_lint_core::llm;

use super::read_input_file;

/// Arguments for the `recover-json` subcommand.
#[derive(Args, Debug)]
pub struct RecoverJsonArgs {
    /// File holding the raw model reply.
    pub file: Utf8PathBuf,

    /// Exit non-zero when no JSON could be recovered.
    #[arg(long)]
    pub strict: bool,
}

/// Print the recovered JSON and the size of its fix plan.
#[instrument(name = "cmd_recover_json", skip_all, fields(file = %args.file))]
pub fn cmd_recover_json(
    args: RecoverJsonArgs,
    global_json: bool,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    let reply = read_input_file(&args.file, max_input_bytes)?;
    let value = llm::recover_json(&reply);
    let unrecovered = llm::is_unrecovered(&value);
    let fixes = llm::fix_plan(&value).len();
    debug!(unrecovered, fixes, "executing recover-json command");

    println!("{}", serde_json::to_string_pretty(&value)?);
    if !global_json {
        if unrecovered {
            eprintln!(
                "{} no JSON object recovered",
                "WARN:".if_supports_color(Stream::Stderr, |t| t.yellow())
            );
        } else {
            eprintln!(
                "{} {fixes}",
                "fix plan entries:".if_supports_color(Stream::Stderr, |t| t.dimmed())
            );
        }
    }

    if args.strict && unrecovered {
        bail!("{} holds no recoverable JSON", args.file);
    }
    Ok(())
}
