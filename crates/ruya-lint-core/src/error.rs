//! Error types for ruya-lint-core.

use thiserror::Error;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),

    /// Configuration file not found after searching all locations.
    #[error("no configuration file found")]
    NotFound,

    /// The requested length category is not present in `length_map`.
    #[error("unknown length category: {category}. Use: {available}")]
    UnknownLengthCategory {
        /// The category that was requested.
        category: String,
        /// Comma-separated list of configured categories.
        available: String,
    },

    /// A `banned_regex` entry is not a valid regular expression.
    #[error("invalid banned pattern {pattern:?}: {source}")]
    InvalidPattern {
        /// The offending pattern string.
        pattern: String,
        /// The underlying regex compilation error.
        #[source]
        source: regex::Error,
    },
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while reading an anchor table.
#[derive(Error, Debug)]
pub enum AnchorTableError {
    /// The table is not a valid JSON array of anchors.
    #[error("invalid JSON anchor table: {0}")]
    Json(#[from] serde_json::Error),

    /// The table is not a valid YAML sequence of anchors.
    #[error("invalid YAML anchor table: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
