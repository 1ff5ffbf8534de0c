//! Display configuration - bar scales and stat presentation rules

use crate::config::{load_toml, parse_toml, ConfigError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// How comparison bars are scaled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarScale {
    /// Value that fills a bar completely (stats are on a 1-5 scale)
    #[serde(default = "default_bar_max")]
    pub default_max: f64,
    /// Per-stat full-bar values
    #[serde(default = "default_overrides")]
    pub overrides: BTreeMap<String, f64>,
    /// Stats drawn as a plain bar instead of five segments
    #[serde(default = "default_unsegmented")]
    pub unsegmented: Vec<String>,
}

impl Default for BarScale {
    fn default() -> Self {
        BarScale {
            default_max: default_bar_max(),
            overrides: default_overrides(),
            unsegmented: default_unsegmented(),
        }
    }
}

impl BarScale {
    /// Full-bar value for a stat
    pub fn max_for(&self, stat: &str) -> f64 {
        self.overrides.get(stat).copied().unwrap_or(self.default_max)
    }

    pub fn is_segmented(&self, stat: &str) -> bool {
        !self.unsegmented.iter().any(|s| s == stat)
    }

    /// Bar fill in percent of the full-bar value
    pub fn fill_percent(&self, stat: &str, value: f64) -> f64 {
        value / self.max_for(stat) * 100.0
    }
}

fn default_bar_max() -> f64 {
    5.0
}
fn default_overrides() -> BTreeMap<String, f64> {
    BTreeMap::from([("weight".to_string(), 20.0)])
}
fn default_unsegmented() -> Vec<String> {
    vec!["weight".to_string()]
}

/// Presentation settings shared by every renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default)]
    pub bars: BarScale,
    /// Stats that never sum across head and chest
    #[serde(default = "default_non_stacking")]
    pub non_stacking: Vec<String>,
    /// Decimal places for displayed stat values
    #[serde(default = "default_decimals")]
    pub decimals: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            bars: BarScale::default(),
            non_stacking: default_non_stacking(),
            decimals: default_decimals(),
        }
    }
}

fn default_non_stacking() -> Vec<String> {
    vec!["physical".to_string()]
}
fn default_decimals() -> u32 {
    1
}

impl DisplayConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.bars.default_max.is_finite() && self.bars.default_max > 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "bars.default_max must be positive, got {}",
                self.bars.default_max
            )));
        }
        for (stat, max) in &self.bars.overrides {
            if !(max.is_finite() && *max > 0.0) {
                return Err(ConfigError::ValidationError(format!(
                    "bars.overrides.{stat} must be positive, got {max}"
                )));
            }
        }
        if self.decimals > 6 {
            return Err(ConfigError::ValidationError(format!(
                "decimals must be at most 6, got {}",
                self.decimals
            )));
        }
        Ok(())
    }
}

/// Load and validate display settings from a TOML file
pub fn load_display_config(path: &Path) -> Result<DisplayConfig, ConfigError> {
    let config: DisplayConfig = load_toml(path)?;
    config.validate()?;
    Ok(config)
}

/// Parse and validate display settings from a TOML string
pub fn parse_display_config(content: &str) -> Result<DisplayConfig, ConfigError> {
    let config: DisplayConfig = parse_toml(content)?;
    config.validate()?;
    Ok(config)
}
