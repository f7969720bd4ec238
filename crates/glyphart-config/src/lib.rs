//! # glyphart Configuration
//!
//! Layered settings for the glyphart command line.
//!
//! Configuration sources (in priority order):
//! 1. CLI arguments
//! 2. Environment variables (`GLYPHART_RENDER__ALIGN=center`)
//! 3. User config (`~/.config/glyphart/config.toml`)
//! 4. Built-in defaults

use std::path::{Path, PathBuf};

use anyhow::Context;
use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use glyphart_core::{Align, ExportFormat, WidthPolicy, BUILTIN_BANNER};
use serde::{Deserialize, Serialize};

/// Prefix of environment variables read into the configuration
pub const ENV_PREFIX: &str = "GLYPHART_";

/// Get the configuration directory
pub fn config_dir() -> PathBuf {
    ProjectDirs::from("dev", "glyphart", "glyphart")
        .map(|d| d.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.config/glyphart"))
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Rendering defaults
    pub render: RenderConfig,
    /// Banner discovery
    pub banners: BannersConfig,
    /// File output
    pub output: OutputConfig,
}

/// Rendering defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Banner used when none is named on the command line
    pub banner: String,
    /// Line alignment
    pub align: Align,
    /// Target width; unset means the terminal width
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<usize>,
    /// Whether too-narrow widths are an error or ignored
    pub width_policy: WidthPolicy,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            banner: BUILTIN_BANNER.to_string(),
            align: Align::Left,
            width: None,
            width_policy: WidthPolicy::Strict,
        }
    }
}

/// Where extra banners come from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BannersConfig {
    /// Directory of `*.txt` banner files
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    /// Rows per glyph in those files
    pub height: usize,
}

impl Default for BannersConfig {
    fn default() -> Self {
        Self {
            dir: None,
            height: 8,
        }
    }
}

/// File output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Format of files written with `--output` when no format is given
    pub format: ExportFormat,
    /// Extension added to output paths that have none
    pub default_extension: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: ExportFormat::Txt,
            default_extension: "txt".to_string(),
        }
    }
}

/// Loads and saves the configuration file
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: Config,
    config_path: PathBuf,
}

impl ConfigManager {
    /// Load from the default location
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(config_dir().join("config.toml"))
    }

    /// Load from `path`; a missing file yields the defaults plus environment
    pub fn load_from(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let config_path = path.into();
        let config = Self::extract(&config_path, ENV_PREFIX)?;
        Ok(Self {
            config,
            config_path,
        })
    }

    fn extract(path: &Path, env_prefix: &str) -> anyhow::Result<Config> {
        let mut figment = Figment::new();
        if path.exists() {
            tracing::debug!("Loading configuration from {:?}", path);
            figment = figment.merge(Toml::file(path));
        } else {
            tracing::debug!("No configuration file at {:?}, using defaults", path);
        }
        figment = figment.merge(Env::prefixed(env_prefix).split("__"));

        figment
            .extract()
            .with_context(|| format!("Invalid configuration in {:?}", path))
    }

    /// Get current configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Path the configuration is read from and saved to
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Update configuration
    pub fn update<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Config),
    {
        f(&mut self.config);
    }

    /// Save configuration to file
    pub fn save(&self) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(&self.config)?;

        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&self.config_path, content)
            .with_context(|| format!("Failed to write {:?}", self.config_path))?;
        tracing::info!("Configuration saved to {:?}", self.config_path);
        Ok(())
    }
}
