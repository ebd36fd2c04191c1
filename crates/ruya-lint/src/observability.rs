//! Logging setup: human-readable stderr output plus an optional JSONL file.
//!
//! The file sink is resolved in this order:
//! 1. `RUYA_LINT_LOG_PATH` (a single, non-rotating file)
//! 2. `RUYA_LINT_LOG_DIR` (daily-rotated `ruya-lint.jsonl`)
//! 3. `log_dir` from the configuration file
//! 4. the platform data directory
//!
//! A log location that cannot be created disables the file sink; logging to
//! stderr always works.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const LOG_PATH_ENV: &str = "RUYA_LINT_LOG_PATH";
const LOG_DIR_ENV: &str = "RUYA_LINT_LOG_DIR";
const LOG_FILE_NAME: &str = "ruya-lint.jsonl";

/// Where log records go.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservabilityConfig {
    /// Explicit log file; wins over `log_dir`.
    pub log_path: Option<PathBuf>,
    /// Directory for daily-rotated JSONL logs.
    pub log_dir: Option<PathBuf>,
}

impl ObservabilityConfig {
    /// Resolve the log sink from the environment, then `config_log_dir`,
    /// then the platform default.
    pub fn from_env_with_overrides(config_log_dir: Option<PathBuf>) -> Self {
        Self::resolve(
            non_empty_env(LOG_PATH_ENV),
            non_empty_env(LOG_DIR_ENV),
            config_log_dir,
        )
    }

    fn resolve(
        env_path: Option<PathBuf>,
        env_dir: Option<PathBuf>,
        config_log_dir: Option<PathBuf>,
    ) -> Self {
        if env_path.is_some() {
            return Self {
                log_path: env_path,
                log_dir: None,
            };
        }
        Self {
            log_path: None,
            log_dir: env_dir.or(config_log_dir).or_else(default_log_dir),
        }
    }
}

fn non_empty_env(key: &str) -> Option<PathBuf> {
    std::env::var_os(key)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

fn default_log_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "ruya-lint").map(|dirs| dirs.data_local_dir().join("logs"))
}

/// Keeps the background log writer alive; drop it last.
pub struct ObservabilityGuard {
    _file: Option<WorkerGuard>,
}

/// Build the log filter from CLI flags and the configured level.
///
/// `-q` and `-v` win over `RUST_LOG`, which wins over the configured level.
pub fn env_filter(quiet: bool, verbose: u8, config_level: &str) -> EnvFilter {
    match (quiet, verbose) {
        (true, _) => EnvFilter::new("error"),
        (false, 1) => EnvFilter::new("debug"),
        (false, v) if v >= 2 => EnvFilter::new("trace"),
        _ => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config_level)),
    }
}

/// Install the global subscriber.
pub fn init_observability(
    config: &ObservabilityConfig,
    filter: EnvFilter,
) -> anyhow::Result<ObservabilityGuard> {
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let (file_layer, file_guard) = match file_writer(config) {
        Some((writer, guard)) => {
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()?;

    Ok(ObservabilityGuard { _file: file_guard })
}

fn file_writer(
    config: &ObservabilityConfig,
) -> Option<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    let appender = if let Some(ref path) = config.log_path {
        let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
        let dir = dir.unwrap_or_else(|| Path::new("."));
        let file_name = path.file_name()?;
        std::fs::create_dir_all(dir).ok()?;
        tracing_appender::rolling::never(dir, file_name)
    } else {
        let dir = config.log_dir.as_ref()?;
        std::fs::create_dir_all(dir).ok()?;
        tracing_appender::rolling::daily(dir, LOG_FILE_NAME)
    };
    Some(tracing_appender::non_blocking(appender))
}
