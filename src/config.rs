//! Application configuration module.
//!
//! Handles loading, validating, and merging the `image-conv.toml` file. Stock
//! defaults are serialized to a TOML value, the user file is merged on top,
//! and the result is deserialized and validated. The file is optional: with
//! no file present the stock defaults apply unchanged.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [render]
//! background = "#1a1a2e"   # Backdrop painted under the scaled image
//! filter = "lanczos3"      # nearest | triangle | catmull-rom | gaussian | lanczos3
//!
//! [output]
//! directory = "."          # Where downloads are written
//!
//! [[presets]]
//! name = "instagram"
//! width = 1080
//! height = 1080
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse: override just the values you want. Tables merge
//! key by key; arrays replace. Declaring any `[[presets]]` therefore replaces
//! the whole stock preset list.
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{Background, RenderSettings, ResampleFilter};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "image-conv.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Application configuration.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Surface and resampling settings.
    pub render: RenderConfig,
    /// Where downloads land.
    pub output: OutputConfig,
    /// Named dimension shortcuts.
    pub presets: Vec<Preset>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            render: RenderConfig::default(),
            output: OutputConfig::default(),
            presets: default_presets(),
        }
    }
}

impl AppConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for preset in &self.presets {
            if preset.name.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "presets.name must not be empty".into(),
                ));
            }
            if preset.width == 0 || preset.height == 0 {
                return Err(ConfigError::Validation(format!(
                    "preset '{}' must have width and height of at least 1",
                    preset.name
                )));
            }
            // Lookups ignore case, so names must be unique ignoring case too.
            if !seen.insert(preset.name.trim().to_lowercase()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate preset name '{}'",
                    preset.name
                )));
            }
        }
        if self.output.directory.trim().is_empty() {
            return Err(ConfigError::Validation(
                "output.directory must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Look up a preset by name (case-insensitive).
    pub fn find_preset(&self, name: &str) -> Option<&Preset> {
        self.presets
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            background: self.render.background,
            filter: self.render.filter,
        }
    }
}

/// Surface and resampling settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Backdrop color, `#rrggbb`. Shows through transparent source pixels.
    pub background: Background,
    /// Resampling filter used when stretching the source.
    pub filter: ResampleFilter,
}

/// Download destination settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Directory downloads are written to.
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: ".".to_string(),
        }
    }
}

/// A named, literal width × height pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Preset {
    pub name: String,
    pub width: u32,
    pub height: u32,
}

impl Preset {
    pub fn new(name: &str, width: u32, height: u32) -> Self {
        Self {
            name: name.to_string(),
            width,
            height,
        }
    }
}

fn default_presets() -> Vec<Preset> {
    vec![
        Preset::new("instagram", 1080, 1080),
        Preset::new("story", 1080, 1920),
        Preset::new("hd", 1280, 720),
        Preset::new("full-hd", 1920, 1080),
        Preset::new("twitter", 1200, 675),
        Preset::new("thumbnail", 150, 150),
    ]
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(AppConfig::default())
        .map_err(|e| ConfigError::Validation(format!("stock defaults do not serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay (arrays included) replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<AppConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: AppConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from the given file path.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result. A missing file yields the stock defaults.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `image-conv.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# image-conv Configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Rendering
# ---------------------------------------------------------------------------
[render]
# Backdrop painted before the image is drawn. Visible wherever the source
# is transparent, and keeps JPEG output from turning transparency black.
background = "#1a1a2e"

# Resampling filter: nearest, triangle, catmull-rom, gaussian, lanczos3.
filter = "lanczos3"

# ---------------------------------------------------------------------------
# Output
# ---------------------------------------------------------------------------
[output]
# Directory resized images are written to, named conv-{width}x{height}.{ext}.
directory = "."

# ---------------------------------------------------------------------------
# Presets
# ---------------------------------------------------------------------------
# Named width x height shortcuts for `image-conv resize --preset NAME`.
# Declaring any preset replaces this whole list.

[[presets]]
name = "instagram"
width = 1080
height = 1080

[[presets]]
name = "story"
width = 1080
height = 1920

[[presets]]
name = "hd"
width = 1280
height = 720

[[presets]]
name = "full-hd"
width = 1920
height = 1080

[[presets]]
name = "twitter"
width = 1200
height = 675

[[presets]]
name = "thumbnail"
width = 150
height = 150
"##
}
