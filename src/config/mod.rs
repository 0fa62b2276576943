//! Configuration management for the dialog registry
//!
//! This module handles loading, parsing, and validating registry settings
//! from TOML files: the viewport used to center new dialogs, the defaults
//! applied to unset dialog options, and the policy deciding what counts as
//! an unset option.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main configuration struct containing all registry settings
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RegistryConfig {
    /// Initial viewport dimensions
    #[serde(default)]
    pub viewport: ViewportConfig,

    /// Defaults for dialogs created without explicit options
    #[serde(default)]
    pub defaults: DialogDefaults,

    /// Option normalisation settings
    #[serde(default)]
    pub options: OptionsConfig,
}

/// Viewport the registry centers new dialogs in (CSS pixels)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ViewportConfig {
    pub width: f64,
    pub height: f64,
}

/// Display metadata and geometry applied when options leave them unset
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DialogDefaults {
    /// Title shown when the caller gives none
    pub title: String,

    /// Icon reference shown when the caller gives none
    #[serde(default)]
    pub icon: String,

    /// Default dialog width (pixels)
    pub width: f64,

    /// Default dialog height (pixels)
    pub height: f64,

    /// Size bounds for dialogs whose options leave them unset (`0.0` means unbounded)
    #[serde(default)]
    pub min_width: f64,
    #[serde(default)]
    pub min_height: f64,
    #[serde(default)]
    pub max_width: f64,
    #[serde(default)]
    pub max_height: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct OptionsConfig {
    /// How unset option and delta fields are detected
    #[serde(default)]
    pub fallback: FallbackPolicy,
}

/// Rule deciding whether an option value counts as "unset".
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FallbackPolicy {
    /// A field is applied iff it is present.
    #[default]
    Presence,
    /// `0`, `NaN`, `""` and `false` are treated like absent fields.
    ///
    /// An explicit zero width or position cannot be expressed, and capability
    /// flags given as `false` revert to their `true` default.
    Falsy,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 1920.0,
            height: 1080.0,
        }
    }
}

impl Default for DialogDefaults {
    fn default() -> Self {
        Self {
            title: "Window".to_string(),
            icon: String::new(),
            width: 800.0,
            height: 500.0,
            min_width: 0.0,
            min_height: 0.0,
            max_width: 0.0,
            max_height: 0.0,
        }
    }
}

impl RegistryConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Expand ~ to home directory
        let expanded_path = if path.to_string_lossy().starts_with('~') {
            let home = std::env::var("HOME").context("Failed to get HOME environment variable")?;
            Path::new(&home).join(path.strip_prefix("~").unwrap_or(path))
        } else {
            path.to_path_buf()
        };

        let contents = fs::read_to_string(&expanded_path)
            .with_context(|| format!("Failed to read config file: {}", expanded_path.display()))?;

        let config: RegistryConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", expanded_path.display()))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let ViewportConfig { width, height } = self.viewport;
        if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
            anyhow::bail!("Invalid viewport {}x{}: dimensions must be positive", width, height);
        }

        let defaults = &self.defaults;
        if !(defaults.width.is_finite() && defaults.width > 0.0) {
            anyhow::bail!("Invalid default width {}: must be positive", defaults.width);
        }
        if !(defaults.height.is_finite() && defaults.height > 0.0) {
            anyhow::bail!("Invalid default height {}: must be positive", defaults.height);
        }

        validate_bounds("width", defaults.min_width, defaults.max_width)?;
        validate_bounds("height", defaults.min_height, defaults.max_height)?;

        Ok(())
    }

    /// Save configuration to a TOML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        fs::write(path, contents).context("Failed to write configuration file")?;

        Ok(())
    }

    /// Merge a partial configuration into this one
    /// Sections of the partial config that differ from the defaults override this config
    pub fn merge_partial(mut self, partial: RegistryConfig) -> Self {
        let default_config = RegistryConfig::default();

        if partial.viewport != default_config.viewport {
            self.viewport = partial.viewport;
        }
        if partial.defaults != default_config.defaults {
            self.defaults = partial.defaults;
        }
        if partial.options != default_config.options {
            self.options = partial.options;
        }

        self
    }
}

fn validate_bounds(axis: &str, min: f64, max: f64) -> Result<()> {
    for (name, value) in [("min", min), ("max", max)] {
        if !(value.is_finite() && value >= 0.0) {
            anyhow::bail!("Invalid default {}_{} {}: must be zero or positive", name, axis, value);
        }
    }
    if min > 0.0 && max > 0.0 && min > max {
        anyhow::bail!("Invalid default {} bounds: min {} exceeds max {}", axis, min, max);
    }
    Ok(())
}
