//! AdjustedStat - A base stat with percent and absolute upgrade bonuses

use crate::effects::StatModifier;
use serde::{Deserialize, Serialize};

/// Represents a stat adjusted by installed upgrades
///
/// Final value is calculated as:
/// `base × (1 + percent / 100) + absolute`
///
/// - `base`: The value from the armor record
/// - `percent`: Sum of all percent bonuses, in whole percent (15 = +15%)
/// - `absolute`: Sum of all flat bonuses
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AdjustedStat {
    pub base: f64,
    pub percent: f64,
    pub absolute: f64,
}

impl AdjustedStat {
    /// Create an AdjustedStat with the given base and no bonuses
    pub fn with_base(base: f64) -> Self {
        AdjustedStat {
            base,
            percent: 0.0,
            absolute: 0.0,
        }
    }

    /// Create an AdjustedStat from a base and aggregated modifier
    pub fn from_modifier(base: f64, modifier: &StatModifier) -> Self {
        AdjustedStat {
            base,
            percent: modifier.percent,
            absolute: modifier.absolute,
        }
    }

    /// Calculate final value: base × (1 + percent / 100) + absolute
    pub fn compute(&self) -> f64 {
        self.base * (1.0 + self.percent / 100.0) + self.absolute
    }

    /// Whether any upgrade bonus applies
    pub fn is_modified(&self) -> bool {
        self.percent != 0.0 || self.absolute != 0.0
    }
}

/// Effective value of a stat given its base and aggregated modifier
pub fn effective_value(base: f64, modifier: &StatModifier) -> f64 {
    AdjustedStat::from_modifier(base, modifier).compute()
}
