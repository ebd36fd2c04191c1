//! Info command implementation

use std::collections::BTreeMap;

use clap::Args;
use ruya_lint_core::config::{Config, ConfigSources};
use owo_colors::{OwoColorize, Stream, Style};
use serde::Serialize;
use tracing::{debug, instrument};

/// Arguments for the `info` subcommand.
#[derive(Args, Debug, Default)]
pub struct InfoArgs {
    // No subcommand-specific arguments; uses global --json flag
}

#[derive(Serialize)]
struct PackageInfo {
    name: &'static str,
    version: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    description: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    repository: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    homepage: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    license: &'static str,
}

impl PackageInfo {
    const fn new() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            description: env!("CARGO_PKG_DESCRIPTION"),
            repository: env!("CARGO_PKG_REPOSITORY"),
            homepage: env!("CARGO_PKG_HOMEPAGE"),
            license: env!("CARGO_PKG_LICENSE"),
        }
    }
}

#[derive(Serialize)]
struct ConfigInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    config_file: Option<String>,
    log_level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    log_dir: Option<String>,
    default_length: String,
    length_map: BTreeMap<String, usize>,
    focus_density_min_pct: f64,
    focus_density_max_pct: f64,
    lsi_max_occurrence: usize,
    banned_patterns: usize,
}

impl ConfigInfo {
    fn from_config(config: &Config, sources: &ConfigSources) -> Self {
        let rules = &config.rules;
        Self {
            config_file: sources.primary_file().map(|p| p.to_string()),
            log_level: config.log_level.as_str().to_string(),
            log_dir: config.log_dir.as_ref().map(|p| p.to_string()),
            default_length: config.default_length.clone(),
            length_map: rules.length_map.clone(),
            focus_density_min_pct: rules.focus_density_min_pct,
            focus_density_max_pct: rules.focus_density_max_pct,
            lsi_max_occurrence: rules.lsi_max_occurrence,
            banned_patterns: rules.banned_regex.len(),
        }
    }
}

#[derive(Serialize)]
struct FullInfo {
    #[serde(flatten)]
    package: PackageInfo,
    config: ConfigInfo,
}

/// Print package information
///
/// # Arguments
/// * `global_json` - Global `--json` flag from CLI
/// * `config` - Loaded configuration
/// * `sources` - Config source metadata from loading
#[instrument(name = "cmd_info", skip_all, fields(json_output))]
pub fn cmd_info(
    _args: InfoArgs,
    global_json: bool,
    config: &Config,
    sources: &ConfigSources,
) -> anyhow::Result<()> {
    let info = PackageInfo::new();

    debug!(json_output = global_json, "executing info command");

    let config_info = ConfigInfo::from_config(config, sources);
    let full_info = FullInfo {
        package: info,
        config: config_info,
    };

    if global_json {
        println!("{}", serde_json::to_string_pretty(&full_info)?);
    } else {
        let pkg = &full_info.package;
        let cfg = &full_info.config;
        println!(
            "{} {}",
            pkg.name.if_supports_color(Stream::Stdout, |t| t.bold()),
            pkg.version.if_supports_color(Stream::Stdout, |t| t.green())
        );
        if !pkg.description.is_empty() {
            println!("{}", pkg.description);
        }
        if !pkg.license.is_empty() {
            field("License", &pkg.license);
        }
        if !pkg.repository.is_empty() {
            field(
                "Repository",
                pkg.repository.if_supports_color(Stream::Stdout, |t| t.cyan()),
            );
        }
        if !pkg.homepage.is_empty() {
            field(
                "Homepage",
                pkg.homepage.if_supports_color(Stream::Stdout, |t| t.cyan()),
            );
        }

        heading("Configuration");
        match cfg.config_file {
            Some(ref path) => field(
                "Config file",
                path.if_supports_color(Stream::Stdout, |t| t.cyan()),
            ),
            None => field(
                "Config file",
                "none loaded".if_supports_color(Stream::Stdout, |t| t.yellow()),
            ),
        }
        field("Log level", &cfg.log_level);
        if let Some(ref dir) = cfg.log_dir {
            field("Log directory", dir);
        }

        heading("Rule Set");
        field("Default length", &cfg.default_length);
        for (category, target) in &cfg.length_map {
            let (low, high) = ruya_lint_core::rules::target_range(*target);
            field(
                &format!("Length {category}"),
                format!("{target} words ({low}-{high})"),
            );
        }
        field(
            "Focus density",
            format!(
                "{:.1}%-{:.1}%",
                cfg.focus_density_min_pct, cfg.focus_density_max_pct
            ),
        );
        field("LSI max occurrence", cfg.lsi_max_occurrence);
        field("Banned patterns", cfg.banned_patterns);
    }

    Ok(())
}

fn heading(title: &str) {
    let style = Style::new().bold().underline();
    println!();
    println!("{}", title.if_supports_color(Stream::Stdout, |t| t.style(style)));
}

fn field(label: &str, value: impl std::fmt::Display) {
    println!(
        "{}: {value}",
        label.if_supports_color(Stream::Stdout, |t| t.dimmed())
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config::default()
    }

    fn test_sources() -> ConfigSources {
        ConfigSources::default()
    }

    #[test]
    fn test_cmd_info_text_succeeds() {
        assert!(cmd_info(InfoArgs::default(), false, &test_config(), &test_sources()).is_ok());
    }

    #[test]
    fn test_cmd_info_json_via_global() {
        assert!(cmd_info(InfoArgs::default(), true, &test_config(), &test_sources()).is_ok());
    }

    #[test]
    fn test_config_info_no_file() {
        let config = Config::default();
        let sources = ConfigSources::default();
        let info = ConfigInfo::from_config(&config, &sources);
        assert!(info.config_file.is_none());
        assert_eq!(info.log_level, "info");
        assert_eq!(info.default_length, "medium");
        assert_eq!(info.length_map.get("long"), Some(&1700));
        assert_eq!(info.banned_patterns, 0);
    }
}
