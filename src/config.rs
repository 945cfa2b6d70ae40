//! Engine configuration.
//!
//! Config is a small JSON document; every field falls back to its default so
//! a partial file only overrides what it names.
use crate::alloc::{DurationRange, PackerSettings, PickerSettings};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Current schema version for engine config files.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

const CONFIG_DIR_NAME: &str = "reel-pack";
const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub schema_version: u32,
    /// Cut lengths for the batch `pack` loop.
    pub duration_range: DurationRange,
    /// Cut lengths for the single-window `fill` entry point.
    pub fill_duration_range: DurationRange,
    pub max_random_tries: usize,
    pub min_separation_factor: f64,
    pub gap_jitter_fraction: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let picker = PickerSettings::default();
        Self {
            schema_version: CONFIG_SCHEMA_VERSION,
            duration_range: DurationRange::new(2.0, 4.0),
            fill_duration_range: DurationRange::new(3.0, 4.0),
            max_random_tries: picker.max_random_tries,
            min_separation_factor: picker.min_separation_factor,
            gap_jitter_fraction: picker.gap_jitter_fraction,
            seed: None,
        }
    }
}

impl EngineConfig {
    pub fn picker_settings(&self) -> PickerSettings {
        PickerSettings {
            max_random_tries: self.max_random_tries,
            min_separation_factor: self.min_separation_factor,
            gap_jitter_fraction: self.gap_jitter_fraction,
        }
    }

    /// Settings for the batch packing loop.
    pub fn pack_settings(&self) -> PackerSettings {
        PackerSettings {
            durations: self.duration_range,
            picker: self.picker_settings(),
        }
    }

    /// Settings for the single-window entry point.
    pub fn fill_settings(&self) -> PackerSettings {
        PackerSettings {
            durations: self.fill_duration_range,
            picker: self.picker_settings(),
        }
    }
}

/// Render the default config as pretty JSON.
pub fn config_stub() -> Result<String> {
    serde_json::to_string_pretty(&EngineConfig::default()).context("serialize config stub")
}

pub fn validate_config(config: &EngineConfig) -> Result<()> {
    if config.schema_version != CONFIG_SCHEMA_VERSION {
        return Err(anyhow!(
            "unsupported config schema_version {}",
            config.schema_version
        ));
    }
    validate_range(&config.duration_range, "duration_range")?;
    validate_range(&config.fill_duration_range, "fill_duration_range")?;
    if config.max_random_tries == 0 {
        return Err(anyhow!("max_random_tries must be at least 1"));
    }
    validate_fraction(config.min_separation_factor, "min_separation_factor")?;
    validate_fraction(config.gap_jitter_fraction, "gap_jitter_fraction")?;
    Ok(())
}

fn validate_range(range: &DurationRange, field: &str) -> Result<()> {
    if !(range.min.is_finite() && range.min > 0.0) {
        return Err(anyhow!("{field}.min must be positive (got {})", range.min));
    }
    if !range.max.is_finite() || range.max < range.min {
        return Err(anyhow!(
            "{field}.max must be at least {field}.min (got {}..{})",
            range.min,
            range.max
        ));
    }
    Ok(())
}

fn validate_fraction(value: f64, field: &str) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(anyhow!("{field} must be within 0..=1 (got {value})"));
    }
    Ok(())
}

/// User-level config location, when the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

pub fn load_config(path: &Path) -> Result<EngineConfig> {
    let bytes = std::fs::read(path).with_context(|| format!("read config {}", path.display()))?;
    let config: EngineConfig =
        serde_json::from_slice(&bytes).context("parse engine config JSON")?;
    validate_config(&config).with_context(|| format!("validate config {}", path.display()))?;
    Ok(config)
}

/// Explicit path first, then the user config if present, then defaults.
pub fn resolve_config(explicit: Option<&Path>) -> Result<EngineConfig> {
    if let Some(path) = explicit {
        return load_config(path);
    }
    match default_config_path().filter(|path| path.is_file()) {
        Some(path) => {
            tracing::debug!(path = %path.display(), "using user config");
            load_config(&path)
        }
        None => Ok(EngineConfig::default()),
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
