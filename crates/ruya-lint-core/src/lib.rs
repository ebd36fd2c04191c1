//! Core library for ruya-lint.
//!
//! SEO quality gate for Arabic dream-interpretation articles: text metrics,
//! a configurable rule engine, and internal-link insertion. Used by the
//! `ruya-lint` CLI and MCP server, and by any downstream consumers.
//!
//! # Modules
//!
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//! - [`text`] - Word counts, keyword density, occurrence counts
//! - [`rules`] - Compiled rule sets
//! - [`lint`] - The precheck engine
//! - [`anchors`] - Internal-link insertion
//! - [`markdown`] - Prose extraction and link inventory
//! - [`competitor`] - Competitor page text extraction
//! - [`llm`] - Lenient recovery of JSON from model replies
//! - [`export`] - Article export envelopes
//!
//! # Quick Start
//!
//! ```no_run
//! use ruya_lint_core::{ConfigLoader, lint};
//!
//! let (config, _sources) = ConfigLoader::new()
//!     .with_user_config(true)
//!     .load()
//!     .expect("Failed to load configuration");
//! let rules = config.rules.compile().expect("valid rules");
//!
//! let report = lint::check("نص المقال", "حلم", &["المطر"], "short", &rules)
//!     .expect("known length category");
//! println!("all checks passed: {}", report.checks.all_ok());
//! ```
#![deny(unsafe_code)]

pub mod anchors;
pub mod competitor;
pub mod config;
pub mod error;
pub mod export;
pub mod lint;
pub mod llm;
pub mod markdown;
pub mod rules;
pub mod text;

pub use anchors::{Anchor, AnchorResult};
pub use config::{Config, ConfigLoader, LogLevel, RuleSetConfig};
pub use error::{AnchorTableError, ConfigError, ConfigResult};
pub use lint::DiagnosticReport;
pub use rules::RuleSet;

/// Input files larger than this are refused unless the limit is disabled.
pub const DEFAULT_MAX_INPUT_BYTES: usize = 5 * 1024 * 1024;
