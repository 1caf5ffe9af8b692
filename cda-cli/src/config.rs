use anyhow::{Context, Result};
use cda_parser::extractor::{DEFAULT_UA, ResolverConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cli::OutputFormat;

const APP_NAME: &str = "cda2url";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Default output format
    pub default_output_format: OutputFormat,

    /// Default request timeout in seconds
    pub default_timeout: u64,

    /// Default number of retries
    pub default_retries: u32,

    /// User agent string for requests
    pub user_agent: Option<String>,

    /// Enable colored output
    pub colored_output: bool,

    /// Default proxy URL (supports http, https, socks5)
    pub default_proxy: Option<String>,

    /// Default proxy username (if proxy requires authentication)
    pub default_proxy_username: Option<String>,

    /// Default proxy password (if proxy requires authentication)
    pub default_proxy_password: Option<String>,

    /// Validation and decoding settings
    pub resolver: ResolverConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_output_format: OutputFormat::Pretty,
            default_timeout: 30,
            default_retries: 3,
            user_agent: Some(DEFAULT_UA.to_string()),
            colored_output: true,
            default_proxy: None,
            default_proxy_username: None,
            default_proxy_password: None,
            resolver: ResolverConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        match config_path {
            Some(path) => {
                if path.exists() {
                    let content = std::fs::read_to_string(path)
                        .context("Failed to read configuration file")?;
                    toml::from_str(&content).context("Failed to parse configuration file")
                } else {
                    Ok(Self::default())
                }
            }
            None => {
                // Use confy for default location
                confy::load(APP_NAME, None).context("Failed to load configuration")
            }
        }
    }

    /// Get default configuration file path
    pub fn default_config_path() -> Option<PathBuf> {
        confy::get_configuration_file_path(APP_NAME, None).ok()
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let toml_string =
            toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        std::fs::write(path, toml_string).context("Failed to write configuration file")?;

        Ok(())
    }

    /// Reset configuration to defaults and save
    pub fn reset(config_path: Option<&Path>) -> Result<()> {
        let path = config_path
            .map(|p| p.to_path_buf())
            .or_else(Self::default_config_path)
            .context("No configuration path available")?;

        Self::default().save(&path)
    }

    /// Show current configuration as a formatted string
    pub fn show(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration for display")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cda_parser::decode::RotationBackend;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.default_output_format, OutputFormat::Pretty);
        assert_eq!(config.default_retries, 3);
        assert!(config.resolver.verify_identifier_checksum);
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cda2url.toml");
        std::fs::write(
            &path,
            "default_output_format = \"json\"\n\n[resolver]\nstrict_percent_decoding = false\nrotation_backend = \"swar\"\n",
        )
        .unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.default_output_format, OutputFormat::Json);
        assert_eq!(config.default_timeout, 30);
        assert!(!config.resolver.strict_percent_decoding);
        assert!(config.resolver.assume_manifest_auto_quality);
        assert_eq!(config.resolver.rotation_backend, Some(RotationBackend::Swar));
    }

    #[test]
    fn test_reset_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cda2url.toml");
        AppConfig::reset(Some(&path)).unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.default_timeout, 30);
        assert_eq!(config.user_agent.as_deref(), Some(DEFAULT_UA));
        assert!(config.show().unwrap().contains("[resolver]"));
    }
}
