//! Configuration management for uwu-markdown
//!
//! Handles loading, saving, and managing application configuration.
//! The superset of behaviours seen across the editor variants is gated by
//! `FeatureFlags` instead of living in parallel copies.

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application identifier following reverse-DNS convention
pub const APP_ID: &str = "dev.uwu.Markdown";

/// Height of the fixed navigation bar in layout units
pub const DEFAULT_NAVBAR_HEIGHT: f64 = 64.0;

/// Gap left between the navigation bar and a heading scrolled into view
pub const DEFAULT_OUTLINE_SCROLL_MARGIN: f64 = 20.0;

/// How far past a heading's top edge the scroll offset may lag and still count as reached
pub const DEFAULT_ACTIVE_THRESHOLD: f64 = 100.0;

/// Input pane width bounds, in percent of the container
pub const MIN_PANE_PERCENT: f64 = 20.0;
pub const MAX_PANE_PERCENT: f64 = 80.0;

/// Copy button feedback duration in milliseconds
pub const DEFAULT_COPY_FEEDBACK_MS: u64 = 2000;

/// Autosave interval in milliseconds
pub const DEFAULT_AUTOSAVE_INTERVAL_MS: u64 = 1000;

/// One display refresh at 60 Hz
pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 16;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Optional behaviours
    pub features: FeatureFlags,

    /// Layout measurements and thresholds
    pub layout: LayoutConfig,

    /// Editing surface timings
    pub editor: EditorConfig,
}

impl Config {
    /// Load configuration from the default location or return defaults
    pub fn load() -> ConfigResult<Self> {
        let path = Self::config_dir()?.join("config.json");
        if !path.exists() {
            log::debug!("No configuration at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::LoadError {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config =
            serde_json::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> ConfigResult<()> {
        let dir = Self::config_dir()?;
        std::fs::create_dir_all(&dir).map_err(|e| ConfigError::SaveError(e.to_string()))?;
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SaveError(e.to_string()))?;
        std::fs::write(dir.join("config.json"), content)
            .map_err(|e| ConfigError::SaveError(e.to_string()))
    }

    /// Reject values the layout math cannot work with
    pub fn validate(&self) -> ConfigResult<()> {
        let layout = &self.layout;
        if !(0.0..=100.0).contains(&layout.min_pane_percent)
            || !(0.0..=100.0).contains(&layout.max_pane_percent)
            || layout.min_pane_percent > layout.max_pane_percent
        {
            return Err(ConfigError::InvalidValue {
                key: "layout.min_pane_percent/max_pane_percent".to_string(),
                reason: format!(
                    "expected 0 <= min <= max <= 100, got {} and {}",
                    layout.min_pane_percent, layout.max_pane_percent
                ),
            });
        }
        if self.editor.autosave_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "editor.autosave_interval_ms".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Get the configuration directory path
    pub fn config_dir() -> ConfigResult<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_ID))
            .ok_or(ConfigError::DirectoryError)
    }

    /// Get the data directory path (for persisted documents)
    pub fn data_dir() -> ConfigResult<PathBuf> {
        dirs::data_dir()
            .map(|p| p.join(APP_ID))
            .ok_or(ConfigError::DirectoryError)
    }
}

/// Optional behaviours of the editing surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureFlags {
    /// Build and show the table of contents panel
    pub table_of_contents: bool,

    /// Persist document text and title to key-value storage
    pub persistence: bool,

    /// Navbar mode and scroll-to-top visibility driven by scroll position
    pub scroll_chrome: bool,

    /// Allow hiding the input pane
    pub toggle_editor: bool,

    /// What to show when the document is empty
    pub fallback: FallbackMode,

    /// How code block ids are generated
    pub block_ids: BlockIdStrategy,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            table_of_contents: true,
            persistence: false,
            scroll_chrome: true,
            toggle_editor: false,
            fallback: FallbackMode::default(),
            block_ids: BlockIdStrategy::default(),
        }
    }
}

/// Empty-input behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FallbackMode {
    /// Run a sample document through the whole pipeline
    #[default]
    ParsedSample,
    /// Commit a fixed welcome fragment without parsing
    StaticWelcome,
}

/// Code block identifier generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BlockIdStrategy {
    /// Fresh random token per block per render
    #[default]
    Random,
    /// `code-{n}` by document position, stable across edits that keep block order
    Positional,
}

/// Layout measurements and thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Fixed navigation bar height
    pub navbar_height: f64,

    /// Extra gap below the navbar when jumping to a heading
    pub outline_scroll_margin: f64,

    /// Active heading lead distance
    pub active_heading_threshold: f64,

    /// Lower bound of the input pane width in percent
    pub min_pane_percent: f64,

    /// Upper bound of the input pane width in percent
    pub max_pane_percent: f64,

    /// Fraction of the hero height after which the navbar appears
    pub navbar_threshold_ratio: f64,

    /// Fraction of the hero height after which scroll-to-top appears
    pub scroll_to_top_ratio: f64,

    /// Emulated display refresh interval
    pub frame_interval_ms: u64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            navbar_height: DEFAULT_NAVBAR_HEIGHT,
            outline_scroll_margin: DEFAULT_OUTLINE_SCROLL_MARGIN,
            active_heading_threshold: DEFAULT_ACTIVE_THRESHOLD,
            min_pane_percent: MIN_PANE_PERCENT,
            max_pane_percent: MAX_PANE_PERCENT,
            navbar_threshold_ratio: 0.05,
            scroll_to_top_ratio: 0.5,
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
        }
    }
}

/// Editing surface timings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// How long copy feedback stays visible
    pub copy_feedback_ms: u64,

    /// Autosave period
    pub autosave_interval_ms: u64,

    /// Title used when the user has not set one
    pub default_title: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            copy_feedback_ms: DEFAULT_COPY_FEEDBACK_MS,
            autosave_interval_ms: DEFAULT_AUTOSAVE_INTERVAL_MS,
            default_title: "untitled".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.features.table_of_contents);
        assert!(!config.features.persistence);
        assert_eq!(config.features.fallback, FallbackMode::ParsedSample);
        assert_eq!(config.layout.min_pane_percent, 20.0);
        assert_eq!(config.layout.max_pane_percent, 80.0);
        assert_eq!(config.editor.autosave_interval_ms, 1000);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let json = r#"{ "features": { "fallback": "static_welcome" } }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.features.fallback, FallbackMode::StaticWelcome);
        assert!(config.features.table_of_contents);
        assert_eq!(config.layout.navbar_height, DEFAULT_NAVBAR_HEIGHT);
    }

    #[test]
    fn test_validate_rejects_inverted_pane_bounds() {
        let mut config = Config::default();
        config.layout.min_pane_percent = 90.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_load_from_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            Config::load_from(&dir.path().join("config.json")),
            Err(ConfigError::LoadError { .. })
        ));
    }

    #[test]
    fn test_load_from_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "layout": { "navbar_height": 48.0 } }"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.layout.navbar_height, 48.0);
        assert_eq!(config.layout.max_pane_percent, MAX_PANE_PERCENT);
        assert_eq!(config.features, FeatureFlags::default());
    }
}
