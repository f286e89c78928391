//! Configuration management for herakles-threaddump-analyzer.
//!
//! This module handles loading, merging, and validating configuration from
//! files and CLI arguments. It supports YAML, JSON, and TOML formats.
//! Configuration only affects report rendering and logging, never parsing.

use crate::cli::{Args, ConfigFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

// Default configuration constants
pub use crate::report::{DEFAULT_STACK_PREVIEW, DEFAULT_TOP_CPU};

/// Analyzer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Number of threads shown in the CPU consumers section
    #[serde(alias = "top-cpu")]
    pub top_cpu: Option<usize>,

    /// Frames shown per stack trace when truncation is on
    #[serde(alias = "stack-preview-frames")]
    pub stack_preview_frames: Option<usize>,

    // Logging
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            top_cpu: Some(DEFAULT_TOP_CPU),
            stack_preview_frames: Some(DEFAULT_STACK_PREVIEW),
            log_level: Some("warn".into()),
        }
    }
}

/// Validate effective config (used by --check-config and at startup)
pub fn validate_effective_config(cfg: &Config) -> Result<(), Box<dyn std::error::Error>> {
    if cfg.top_cpu == Some(0) {
        return Err("top_cpu must be at least 1".into());
    }
    if cfg.stack_preview_frames == Some(0) {
        return Err("stack_preview_frames must be at least 1".into());
    }
    if let Some(level) = cfg.log_level.as_deref() {
        match level {
            "off" | "error" | "warn" | "info" | "debug" | "trace" => {}
            other => {
                return Err(format!(
                    "Invalid log_level '{}', expected off/error/warn/info/debug/trace",
                    other
                )
                .into());
            }
        }
    }
    Ok(())
}

/// Resolves configuration from CLI args, config file, and defaults.
/// This enforces precedence: CLI (if provided) > config file > default.
pub fn resolve_config(args: &Args) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = if args.no_config {
        Config::default()
    } else {
        load_config(args.config.as_deref().and_then(|p| p.to_str()))?
    };

    // Only override if the user supplied the value on the CLI.
    if let Some(top_cpu) = args.top_cpu {
        config.top_cpu = Some(top_cpu);
    }

    Ok(config)
}

/// Configuration loading with multiple format support
pub fn load_config(path: Option<&str>) -> Result<Config, Box<dyn std::error::Error>> {
    let path = if let Some(p) = path {
        PathBuf::from(p)
    } else {
        // Try default locations
        let defaults = [
            "/etc/herakles/threaddump-analyzer.yaml",
            "/etc/herakles/threaddump-analyzer.yml",
            "/etc/herakles/threaddump-analyzer.json",
            "./herakles-threaddump-analyzer.yaml",
            "./herakles-threaddump-analyzer.yml",
            "./herakles-threaddump-analyzer.json",
        ];

        defaults
            .iter()
            .find(|p| Path::new(p).exists())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(""))
    };

    if !path.exists() || path.to_string_lossy().is_empty() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path)?;

    match path.extension().and_then(|s| s.to_str()) {
        Some("json") => {
            let config: Config = serde_json::from_str(&content)?;
            info!("Loaded JSON configuration from: {}", path.display());
            Ok(config)
        }
        Some("toml") => {
            let config: Config = toml::from_str(&content)?;
            info!("Loaded TOML configuration from: {}", path.display());
            Ok(config)
        }
        _ => {
            // Default to YAML
            let config: Config = serde_yaml::from_str(&content)?;
            info!("Loaded YAML configuration from: {}", path.display());
            Ok(config)
        }
    }
}

/// Shows configuration in requested format
pub fn show_config(config: &Config, format: ConfigFormat) -> Result<(), Box<dyn std::error::Error>> {
    let output = match format {
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        ConfigFormat::Toml => toml::to_string_pretty(config)?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
    };

    println!("{output}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let cfg = Config::default();
        assert!(validate_effective_config(&cfg).is_ok());
        assert_eq!(cfg.top_cpu, Some(DEFAULT_TOP_CPU));
        assert_eq!(cfg.stack_preview_frames, Some(DEFAULT_STACK_PREVIEW));
    }

    #[test]
    fn test_zero_top_cpu_rejected() {
        let cfg = Config {
            top_cpu: Some(0),
            ..Config::default()
        };
        assert!(validate_effective_config(&cfg).is_err());
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let cfg = Config {
            log_level: Some("verbose".into()),
            ..Config::default()
        };
        assert!(validate_effective_config(&cfg).is_err());
    }

    #[test]
    fn test_load_config_yaml_with_aliases() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("cfg.yaml");
        fs::write(&path, "top-cpu: 5\nstack-preview-frames: 7\n").expect("write config");

        let cfg = load_config(path.to_str()).expect("load config");
        assert_eq!(cfg.top_cpu, Some(5));
        assert_eq!(cfg.stack_preview_frames, Some(7));
    }

    #[test]
    fn test_load_config_toml() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("cfg.toml");
        fs::write(&path, "top_cpu = 4\n").expect("write config");

        let cfg = load_config(path.to_str()).expect("load config");
        assert_eq!(cfg.top_cpu, Some(4));
    }
}
