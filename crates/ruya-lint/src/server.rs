//! MCP (Model Context Protocol) server implementation.
//!
//! Exposes the SEO checks to AI assistants and editor pipelines over stdio,
//! so a rewriting agent can check its own draft before handing it back.
//!
//! # Architecture
//!
//! The MCP server is a presentation layer over the same core library the CLI
//! commands use. Each `#[tool]` method delegates to `ruya_lint_core` and
//! returns pretty-printed JSON. The rule set is compiled once, when the
//! server is built, and shared by every call.

use std::sync::Arc;

use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::schemars;
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};
use serde::Serialize;

use ruya_lint_core::anchors::{self, Anchor};
use ruya_lint_core::config::Config;
use ruya_lint_core::error::ConfigResult;
use ruya_lint_core::rules::RuleSet;
use ruya_lint_core::{competitor, lint, llm, markdown, text};

/// Parameters for the `get_info` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct GetInfoParams {
    /// Output format: "text" or "json"
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "text".to_string()
}

/// Parameters for the `check_article` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct CheckArticleParams {
    /// The article text.
    pub text: String,
    /// The focus keyword.
    pub focus_keyword: String,
    /// Related (LSI) terms, each capped by the rule set.
    #[serde(default)]
    pub lsi_terms: Vec<String>,
    /// Length category; the server's default when omitted.
    pub length_category: Option<String>,
    /// Check the visible prose only (drops link URLs, code and frontmatter).
    #[serde(default)]
    pub strip_markdown: bool,
}

/// Parameters for the `keyword_density` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct KeywordDensityParams {
    /// The text to measure.
    pub text: String,
    /// The keyword to count.
    pub keyword: String,
}

/// Parameters for the `apply_anchors` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct ApplyAnchorsParams {
    /// The article text.
    pub text: String,
    /// Phrase/URL pairs, applied in order.
    pub anchors: Vec<Anchor>,
}

/// Parameters for the `recover_json` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct RecoverJsonParams {
    /// The raw model reply.
    pub reply: String,
}

/// Parameters for the `extract_competitor_text` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct ExtractCompetitorTextParams {
    /// The page HTML.
    pub html: String,
    /// Optional focus keyword to measure on the extracted text.
    pub focus_keyword: Option<String>,
}

#[derive(Serialize)]
struct AnchorsOutput {
    #[serde(flatten)]
    result: anchors::AnchorResult,
    link_count: usize,
}

#[derive(Serialize)]
struct RecoveredOutput {
    value: serde_json::Value,
    recovered: bool,
    fix_count: usize,
}

#[derive(Serialize)]
struct CompetitorOutput {
    text: String,
    word_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    density: Option<text::Density>,
}

fn to_json<T: Serialize>(value: &T) -> Result<String, McpError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))
}

/// MCP server exposing the SEO checks.
///
/// Each `#[tool]` method in the `#[tool_router]` impl block is automatically
/// registered and callable via the MCP protocol.
#[derive(Clone)]
pub struct ProjectServer {
    tool_router: rmcp::handler::server::router::tool::ToolRouter<Self>,
    rules: Arc<RuleSet>,
    default_length: String,
    max_input_bytes: Option<usize>,
}

#[tool_router]
impl ProjectServer {
    /// Build a server from loaded configuration.
    ///
    /// Fails when the configured rule set does not compile.
    pub fn from_config(config: &Config, max_input_bytes: Option<usize>) -> ConfigResult<Self> {
        Ok(Self {
            tool_router: Self::tool_router(),
            rules: Arc::new(config.rules.compile()?),
            default_length: config.default_length.clone(),
            max_input_bytes,
        })
    }

    fn check_size(&self, field: &str, value: &str) -> Result<(), McpError> {
        match self.max_input_bytes {
            Some(max) if value.len() > max => Err(McpError::invalid_params(
                format!("{field} is {} bytes (limit: {max} bytes)", value.len()),
                None,
            )),
            _ => Ok(()),
        }
    }

    /// Get project information.
    #[tool(description = "Get project name, version, and description")]
    #[tracing::instrument(skip(self), fields(otel.kind = "server"))]
    fn get_info(
        &self,
        #[allow(unused_variables)] Parameters(params): Parameters<GetInfoParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "get_info", format = %params.format, "executing MCP tool");

        let info = serde_json::json!({
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "description": env!("CARGO_PKG_DESCRIPTION"),
            "length_categories": self.rules.categories().collect::<Vec<_>>(),
            "default_length": self.default_length,
        });

        let text = if params.format == "json" {
            to_json(&info)?
        } else {
            format!(
                "{} v{}\n{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION"),
                env!("CARGO_PKG_DESCRIPTION"),
            )
        };

        tracing::info!(tool = "get_info", "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    /// Run the SEO rule set over an article.
    #[tool(
        description = "Check an Arabic article against the SEO rule set: word count vs. length target, focus keyword density, LSI term caps, and banned patterns. Returns metrics and pass/fail per check."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn check_article(
        &self,
        #[allow(unused_variables)] Parameters(params): Parameters<CheckArticleParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(
            tool = "check_article",
            strip_md = params.strip_markdown,
            lsi = params.lsi_terms.len(),
            "executing MCP tool"
        );
        self.check_size("text", &params.text)?;

        let length = params
            .length_category
            .as_deref()
            .unwrap_or(&self.default_length);
        let prose = if params.strip_markdown {
            markdown::strip_to_prose(&params.text)
        } else {
            params.text
        };

        let lsi_terms = lint::clean_terms(&params.lsi_terms);
        let report = lint::check(
            &prose,
            &params.focus_keyword,
            &lsi_terms,
            length,
            &self.rules,
        )
        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;

        tracing::info!(
            tool = "check_article",
            pass = report.checks.all_ok(),
            "MCP tool completed"
        );
        Ok(CallToolResult::success(vec![Content::text(to_json(
            &report,
        )?)]))
    }

    /// Measure keyword density.
    #[tool(description = "Keyword density of a text: occurrences per hundred words, occurrence count, and word count.")]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn keyword_density(
        &self,
        #[allow(unused_variables)] Parameters(params): Parameters<KeywordDensityParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "keyword_density", "executing MCP tool");
        self.check_size("text", &params.text)?;

        let density = text::keyword_density(&params.text, &params.keyword);

        tracing::info!(
            tool = "keyword_density",
            density = density.density_pct,
            "MCP tool completed"
        );
        Ok(CallToolResult::success(vec![Content::text(to_json(
            &density,
        )?)]))
    }

    /// Insert internal links.
    #[tool(
        description = "Insert Markdown links for phrase/URL anchors into an article. Applied in order, first occurrence only; long phrases fall back to their first six words. Returns the updated text, applied and skipped phrases, and the article's link count."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn apply_anchors(
        &self,
        #[allow(unused_variables)] Parameters(params): Parameters<ApplyAnchorsParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(
            tool = "apply_anchors",
            anchors = params.anchors.len(),
            "executing MCP tool"
        );
        self.check_size("text", &params.text)?;

        let result = anchors::apply(&params.text, &params.anchors);
        let link_count = markdown::links(&result.updated_text).len();

        tracing::info!(
            tool = "apply_anchors",
            applied = result.applied.len(),
            skipped = result.skipped.len(),
            "MCP tool completed"
        );
        Ok(CallToolResult::success(vec![Content::text(to_json(
            &AnchorsOutput { result, link_count },
        )?)]))
    }

    /// Recover JSON from a model reply.
    #[tool(
        description = "Recover the JSON object from an LLM reply that wraps it in prose or code fences. Returns the value, whether recovery succeeded, and the number of entries in its `fixes` list."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn recover_json(
        &self,
        #[allow(unused_variables)] Parameters(params): Parameters<RecoverJsonParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "recover_json", "executing MCP tool");
        self.check_size("reply", &params.reply)?;

        let value = llm::recover_json(&params.reply);
        let output = RecoveredOutput {
            recovered: !llm::is_unrecovered(&value),
            fix_count: llm::fix_plan(&value).len(),
            value,
        };

        tracing::info!(
            tool = "recover_json",
            recovered = output.recovered,
            "MCP tool completed"
        );
        Ok(CallToolResult::success(vec![Content::text(to_json(
            &output,
        )?)]))
    }

    /// Extract a competitor page's body text.
    #[tool(
        description = "Extract the paragraph text of a competitor page from its HTML (paragraphs over four words, up to 15000 characters). Optionally measures a focus keyword on the result."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn extract_competitor_text(
        &self,
        #[allow(unused_variables)] Parameters(params): Parameters<ExtractCompetitorTextParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "extract_competitor_text", "executing MCP tool");
        self.check_size("html", &params.html)?;

        let extracted = competitor::extract_text(&params.html);
        let output = CompetitorOutput {
            word_count: text::word_count(&extracted),
            density: params
                .focus_keyword
                .as_deref()
                .map(|k| text::keyword_density(&extracted, k)),
            text: extracted,
        };

        tracing::info!(
            tool = "extract_competitor_text",
            words = output.word_count,
            "MCP tool completed"
        );
        Ok(CallToolResult::success(vec![Content::text(to_json(
            &output,
        )?)]))
    }
}

#[tool_handler]
impl ServerHandler for ProjectServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(format!(
                "{} MCP server. Use check_article before publishing an Arabic dream article and apply_anchors to add internal links.",
                env!("CARGO_PKG_NAME"),
            )),
        }
    }
}
