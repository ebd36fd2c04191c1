//! Serve command: run the MCP server on stdio.

use anyhow::Context;
use clap::Args;
use rmcp::{ServiceExt, transport::stdio};
use tracing::{info, instrument};

use ruya_lint_core::config::Config;

use crate::server::ProjectServer;

/// Arguments for the `serve` subcommand.
#[derive(Args, Debug, Default)]
pub struct ServeArgs {}

/// Serve the MCP tools over stdin/stdout until the client disconnects.
#[instrument(name = "cmd_serve", skip_all)]
pub async fn cmd_serve(
    _args: ServeArgs,
    max_input_bytes: Option<usize>,
    config: Config,
) -> anyhow::Result<()> {
    let server = ProjectServer::from_config(&config, max_input_bytes)
        .context("failed to build MCP server from configuration")?;

    info!("MCP server ready, serving on stdio");
    let service = server.serve(stdio()).await.inspect_err(|e| {
        tracing::error!(error = %e, "MCP server error");
    })?;

    service.waiting().await?;
    info!("MCP server shut down");
    Ok(())
}
