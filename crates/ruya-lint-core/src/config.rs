//! Configuration loading and discovery.
//!
//! The configuration carries the SEO rule set (length targets, density
//! bounds, LSI caps, banned patterns) together with logging and input-size
//! settings. Sources are layered with figment:
//! 1. Built-in defaults
//! 2. User config from the XDG config directory
//! 3. Project config found by walking up from the current directory
//! 4. Explicit files (`--config`)
//! 5. `RUYA_LINT_*` environment variables
//!
//! # Supported formats
//!
//! - TOML (`.toml`)
//! - YAML (`.yaml`, `.yml`)
//! - JSON (`.json`)
//!
//! # Config file locations (in order of precedence, highest first):
//! - `ruya-lint.<ext>` in current directory or any parent
//! - `.ruya-lint.<ext>` in current directory or any parent
//! - `ruya.<ext>` in current directory or any parent
//! - `.ruya.<ext>` in current directory or any parent
//! - `~/.config/ruya-lint/config.<ext>` (user config)
//!
//! # Example
//! ```no_run
//! use camino::Utf8PathBuf;
//! use ruya_lint_core::config::ConfigLoader;
//!
//! let cwd = Utf8PathBuf::try_from(std::env::current_dir().unwrap()).unwrap();
//! let (config, _sources) = ConfigLoader::new()
//!     .with_project_search(&cwd)
//!     .load()
//!     .unwrap();
//! let rules = config.rules.compile().unwrap();
//! assert!(rules.target_for("medium").is_ok());
//! ```

use std::collections::BTreeMap;

use camino::{Utf8Path, Utf8PathBuf};
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::rules::RuleSet;

/// The SEO rule set document, as written in config files.
///
/// Keys mirror the editor-facing `rules` document: `length_map`,
/// `focus_density_min_pct`, `focus_density_max_pct`, `lsi_max_occurrence`
/// and `banned_regex`. Call [`RuleSetConfig::compile`] to validate the
/// patterns and obtain an immutable [`RuleSet`].
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RuleSetConfig {
    /// Length category label -> target word count.
    pub length_map: BTreeMap<String, usize>,
    /// Lowest acceptable focus keyword density, in percent (inclusive).
    pub focus_density_min_pct: f64,
    /// Highest acceptable focus keyword density, in percent (inclusive).
    pub focus_density_max_pct: f64,
    /// Maximum occurrences allowed for each LSI term.
    pub lsi_max_occurrence: usize,
    /// Regular expressions that must not match anywhere in the article.
    pub banned_regex: Vec<String>,
}

impl Default for RuleSetConfig {
    fn default() -> Self {
        Self {
            length_map: BTreeMap::from([
                ("short".to_string(), 800),
                ("medium".to_string(), 1200),
                ("long".to_string(), 1700),
            ]),
            focus_density_min_pct: 0.5,
            focus_density_max_pct: 2.5,
            lsi_max_occurrence: 3,
            banned_regex: Vec::new(),
        }
    }
}

impl RuleSetConfig {
    /// Validate the banned patterns and build an immutable [`RuleSet`].
    pub fn compile(&self) -> ConfigResult<RuleSet> {
        RuleSet::compile(self)
    }
}

/// The configuration for ruya-lint.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Log level for the application (e.g., "debug", "info", "warn", "error").
    pub log_level: LogLevel,
    /// Directory for JSONL log files (falls back to platform defaults if unset).
    pub log_dir: Option<Utf8PathBuf>,
    /// Length category used when a command does not name one.
    pub default_length: String,
    /// Maximum input size in bytes (default: 5 MiB).
    pub max_input_bytes: Option<usize>,
    /// Disable the input size limit entirely.
    pub disable_input_limit: bool,
    /// The SEO rule set.
    pub rules: RuleSetConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            log_dir: None,
            default_length: "medium".to_string(),
            max_input_bytes: None,
            disable_input_limit: false,
            rules: RuleSetConfig::default(),
        }
    }
}

/// Log level configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Verbose output for debugging and development.
    Debug,
    /// Standard operational information (default).
    #[default]
    Info,
    /// Warnings about potential issues.
    Warn,
    /// Errors that indicate failures.
    Error,
}

impl LogLevel {
    /// Returns the log level as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Metadata about which configuration sources were loaded.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigSources {
    /// Project config files found by walking up, ordered low→high precedence.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub project_files: Vec<Utf8PathBuf>,
    /// User config file from XDG config directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_file: Option<Utf8PathBuf>,
    /// Explicit config files loaded (e.g., from `--config` flag).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub explicit_files: Vec<Utf8PathBuf>,
}

impl ConfigSources {
    /// Returns the highest-precedence config file that was loaded.
    ///
    /// Precedence: explicit files > project files > user file.
    pub fn primary_file(&self) -> Option<&Utf8Path> {
        self.explicit_files
            .last()
            .map(Utf8PathBuf::as_path)
            .or_else(|| self.project_files.last().map(Utf8PathBuf::as_path))
            .or(self.user_file.as_deref())
    }
}

/// Supported configuration file extensions (in order of preference).
const CONFIG_EXTENSIONS: &[&str] = &["toml", "yaml", "yml", "json"];

/// Application name for XDG directory lookup.
const APP_NAME: &str = "ruya-lint";

/// Config file base names, lowest precedence first.
const APP_NAMES: &[&str] = &["ruya", "ruya-lint"];

/// Builder for loading configuration from multiple sources.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    project_search_root: Option<Utf8PathBuf>,
    include_user_config: bool,
    boundary_marker: Option<String>,
    explicit_files: Vec<Utf8PathBuf>,
}

impl ConfigLoader {
    /// Create a new config loader with default settings.
    pub fn new() -> Self {
        Self {
            project_search_root: None,
            include_user_config: true,
            boundary_marker: Some(".git".to_string()),
            explicit_files: Vec::new(),
        }
    }

    /// Set the starting directory for project config search.
    pub fn with_project_search<P: AsRef<Utf8Path>>(mut self, path: P) -> Self {
        self.project_search_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set whether to include user config from `~/.config/ruya-lint/`.
    pub const fn with_user_config(mut self, include: bool) -> Self {
        self.include_user_config = include;
        self
    }

    /// Stop the upward search at a directory containing `marker` (default `.git`).
    pub fn with_boundary_marker<S: Into<String>>(mut self, marker: S) -> Self {
        self.boundary_marker = Some(marker.into());
        self
    }

    /// Search all the way to the filesystem root.
    pub fn without_boundary_marker(mut self) -> Self {
        self.boundary_marker = None;
        self
    }

    /// Add an explicit config file. Later files take precedence.
    pub fn with_file<P: AsRef<Utf8Path>>(mut self, path: P) -> Self {
        self.explicit_files.push(path.as_ref().to_path_buf());
        self
    }

    /// Load configuration, merging all discovered sources.
    ///
    /// Nested keys can be set from the environment with a double underscore,
    /// e.g. `RUYA_LINT_RULES__LSI_MAX_OCCURRENCE=5`.
    #[tracing::instrument(skip(self), fields(search_root = ?self.project_search_root))]
    pub fn load(self) -> ConfigResult<(Config, ConfigSources)> {
        tracing::debug!("loading configuration");
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
        let mut sources = ConfigSources::default();

        if self.include_user_config
            && let Some(user_config) = self.find_user_config()
        {
            figment = Self::merge_file(figment, &user_config);
            sources.user_file = Some(user_config);
        }

        if let Some(ref root) = self.project_search_root {
            let project_configs = self.find_project_configs(root);
            for pc in &project_configs {
                figment = Self::merge_file(figment, pc);
            }
            sources.project_files = project_configs;
        }

        for file in &self.explicit_files {
            figment = Self::merge_file(figment, file);
        }
        sources.explicit_files = self.explicit_files;

        figment = figment.merge(Env::prefixed("RUYA_LINT_").split("__").lowercase(true));

        let config: Config = figment
            .extract()
            .map_err(|e| ConfigError::Deserialize(Box::new(e)))?;
        tracing::info!(
            log_level = config.log_level.as_str(),
            length_categories = config.rules.length_map.len(),
            banned_patterns = config.rules.banned_regex.len(),
            "configuration loaded"
        );
        Ok((config, sources))
    }

    /// Load configuration, returning an error if no config file is found.
    pub fn load_or_error(self) -> ConfigResult<(Config, ConfigSources)> {
        let has_user = self.include_user_config && self.find_user_config().is_some();
        let has_project = self
            .project_search_root
            .as_ref()
            .is_some_and(|root| !self.find_project_configs(root).is_empty());
        let has_explicit = !self.explicit_files.is_empty();

        if !has_user && !has_project && !has_explicit {
            return Err(ConfigError::NotFound);
        }

        self.load()
    }

    /// Walk up from `start` and return every config file in the closest
    /// directory that has any, ordered low-to-high precedence.
    fn find_project_configs(&self, start: &Utf8Path) -> Vec<Utf8PathBuf> {
        let mut current = Some(start.to_path_buf());

        while let Some(dir) = current {
            let mut found = Vec::new();

            for app_name in APP_NAMES {
                for ext in CONFIG_EXTENSIONS {
                    let dotfile = dir.join(format!(".{app_name}.{ext}"));
                    if dotfile.is_file() {
                        found.push(dotfile);
                    }
                }
                for ext in CONFIG_EXTENSIONS {
                    let regular = dir.join(format!("{app_name}.{ext}"));
                    if regular.is_file() {
                        found.push(regular);
                    }
                }
            }

            if !found.is_empty() {
                return found;
            }

            // Checked after the config files so a config next to the marker is found.
            if let Some(ref marker) = self.boundary_marker
                && dir.join(marker).exists()
                && dir != start
            {
                break;
            }

            current = dir.parent().map(Utf8Path::to_path_buf);
        }

        Vec::new()
    }

    fn find_user_config(&self) -> Option<Utf8PathBuf> {
        let config_dir = user_config_dir()?;
        CONFIG_EXTENSIONS
            .iter()
            .map(|ext| config_dir.join(format!("config.{ext}")))
            .find(|path| path.is_file())
    }

    fn merge_file(figment: Figment, path: &Utf8Path) -> Figment {
        match path.extension() {
            Some("yaml" | "yml") => figment.merge(Yaml::file_exact(path.as_str())),
            Some("json") => figment.merge(Json::file_exact(path.as_str())),
            _ => figment.merge(Toml::file_exact(path.as_str())),
        }
    }
}

/// Get the user config directory path.
///
/// Returns `~/.config/ruya-lint/` on Linux, `~/Library/Application Support/ruya-lint/`
/// on macOS, and equivalent on other platforms.
pub fn user_config_dir() -> Option<Utf8PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("", "", APP_NAME)?;
    Utf8PathBuf::from_path_buf(proj_dirs.config_dir().to_path_buf()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Serializes tests that mutate environment variables.
    static TEST_ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn load_file(contents: &str, name: &str) -> Config {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(name);
        fs::write(&path, contents).unwrap();
        let path = Utf8PathBuf::try_from(path).unwrap();

        let (config, _sources) = ConfigLoader::new()
            .with_user_config(false)
            .without_boundary_marker()
            .with_file(&path)
            .load()
            .unwrap();
        config
    }

    #[test]
    fn default_config_has_three_lengths() {
        let config = Config::default();
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.default_length, "medium");
        assert_eq!(config.rules.length_map.get("short"), Some(&800));
        assert_eq!(config.rules.length_map.get("medium"), Some(&1200));
        assert_eq!(config.rules.length_map.get("long"), Some(&1700));
        assert!(config.rules.banned_regex.is_empty());
    }

    #[test]
    fn loader_builds_with_defaults() {
        let _lock = TEST_ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        let (config, sources) = ConfigLoader::new()
            .with_user_config(false)
            .without_boundary_marker()
            .load()
            .unwrap();
        assert_eq!(config.rules, RuleSetConfig::default());
        assert!(sources.primary_file().is_none());
    }

    #[test]
    fn rules_load_from_json_document() {
        let config = load_file(
            r#"{
  "rules": {
    "length_map": {"قصير": 800, "متوسط": 1200},
    "focus_density_min_pct": 0.8,
    "focus_density_max_pct": 1.8,
    "lsi_max_occurrence": 4,
    "banned_regex": ["(?i)click here", "\\d{3}-\\d{4}"]
  }
}"#,
            "rules.json",
        );
        let rules = &config.rules;
        assert_eq!(rules.length_map.get("قصير"), Some(&800));
        assert_eq!(rules.focus_density_min_pct, 0.8);
        assert_eq!(rules.focus_density_max_pct, 1.8);
        assert_eq!(rules.lsi_max_occurrence, 4);
        assert_eq!(rules.banned_regex, vec!["(?i)click here", r"\d{3}-\d{4}"]);
    }

    #[test]
    fn rules_load_from_toml() {
        let config = load_file(
            r#"
default_length = "long"

[rules]
lsi_max_occurrence = 2
banned_regex = ["lorem"]
"#,
            "ruya.toml",
        );
        assert_eq!(config.default_length, "long");
        assert_eq!(config.rules.lsi_max_occurrence, 2);
        assert_eq!(config.rules.banned_regex, vec!["lorem"]);
        // untouched keys keep their defaults
        assert_eq!(config.rules.focus_density_max_pct, 2.5);
    }

    #[test]
    fn rules_deserialize_from_yaml() {
        let yaml = r"
rules:
  length_map:
    short: 500
  banned_regex:
    - 'مقال\s+منقول'
";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.rules.length_map.len(), 1);
        assert_eq!(config.rules.banned_regex.len(), 1);
    }

    #[test]
    fn later_file_overrides_earlier() {
        let tmp = TempDir::new().unwrap();
        let base = tmp.path().join("base.toml");
        fs::write(&base, "[rules]\nlsi_max_occurrence = 7\n").unwrap();
        let over = tmp.path().join("override.yaml");
        fs::write(&over, "rules:\n  lsi_max_occurrence: 9\n").unwrap();

        let (config, sources) = ConfigLoader::new()
            .with_user_config(false)
            .with_file(Utf8PathBuf::try_from(base).unwrap())
            .with_file(Utf8PathBuf::try_from(over).unwrap())
            .load()
            .unwrap();

        assert_eq!(config.rules.lsi_max_occurrence, 9);
        assert_eq!(sources.explicit_files.len(), 2);
        assert!(sources.primary_file().unwrap().as_str().ends_with("override.yaml"));
    }

    #[test]
    fn project_config_discovery() {
        let tmp = TempDir::new().unwrap();
        let project_dir = tmp.path().join("project");
        let sub_dir = project_dir.join("articles").join("2024");
        fs::create_dir_all(&sub_dir).unwrap();
        fs::write(project_dir.join(".ruya-lint.toml"), r#"log_level = "debug""#).unwrap();

        let (config, sources) = ConfigLoader::new()
            .with_user_config(false)
            .without_boundary_marker()
            .with_project_search(Utf8PathBuf::try_from(sub_dir).unwrap())
            .load()
            .unwrap();

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(sources.project_files.len(), 1);
    }

    #[test]
    fn boundary_marker_stops_search() {
        let tmp = TempDir::new().unwrap();
        let parent = tmp.path().join("parent");
        let child = parent.join("child");
        let work = child.join("work");
        fs::create_dir_all(&work).unwrap();
        fs::write(parent.join(".ruya-lint.toml"), r#"log_level = "warn""#).unwrap();
        fs::create_dir(child.join(".git")).unwrap();

        let (config, sources) = ConfigLoader::new()
            .with_user_config(false)
            .with_boundary_marker(".git")
            .with_project_search(Utf8PathBuf::try_from(work).unwrap())
            .load()
            .unwrap();

        assert_eq!(config.log_level, LogLevel::Info);
        assert!(sources.project_files.is_empty());
    }

    #[test]
    fn ruya_lint_overrides_ruya_in_same_directory() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".ruya.toml"), "[rules]\nlsi_max_occurrence = 1\n").unwrap();
        fs::write(tmp.path().join("ruya-lint.toml"), "[rules]\nlsi_max_occurrence = 6\n").unwrap();

        let (config, sources) = ConfigLoader::new()
            .with_user_config(false)
            .without_boundary_marker()
            .with_project_search(Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap())
            .load()
            .unwrap();

        assert_eq!(config.rules.lsi_max_occurrence, 6);
        assert_eq!(sources.project_files.len(), 2);
    }

    #[test]
    fn load_or_error_fails_when_no_config() {
        let result = ConfigLoader::new()
            .with_user_config(false)
            .without_boundary_marker()
            .load_or_error();
        assert!(matches!(result, Err(ConfigError::NotFound)));
    }

    #[test]
    fn malformed_value_is_a_deserialize_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.toml");
        fs::write(&path, "[rules]\nlsi_max_occurrence = \"many\"\n").unwrap();

        let result = ConfigLoader::new()
            .with_user_config(false)
            .with_file(Utf8PathBuf::try_from(path).unwrap())
            .load();
        assert!(matches!(result, Err(ConfigError::Deserialize(_))));
    }

    #[test]
    #[allow(unsafe_code)]
    fn env_var_adds_nested_length_category() {
        let _lock = TEST_ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());

        // SAFETY: Test environment; the mutex serializes env access across tests.
        unsafe {
            std::env::set_var("RUYA_LINT_RULES__LENGTH_MAP__PILLAR", "3000");
        }

        let result = ConfigLoader::new()
            .with_user_config(false)
            .without_boundary_marker()
            .load();

        // SAFETY: Cleanup after test.
        unsafe {
            std::env::remove_var("RUYA_LINT_RULES__LENGTH_MAP__PILLAR");
        }

        let config = result.unwrap().0;
        assert_eq!(config.rules.length_map.get("pillar"), Some(&3000));
        assert_eq!(config.rules.length_map.get("medium"), Some(&1200));
    }

    #[test]
    fn compile_rejects_invalid_pattern() {
        let rules = RuleSetConfig {
            banned_regex: vec!["(unclosed".to_string()],
            ..Default::default()
        };
        let err = rules.compile().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPattern { ref pattern, .. } if pattern == "(unclosed"));
    }
}
