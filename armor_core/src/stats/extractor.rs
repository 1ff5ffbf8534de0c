//! Stat extraction - armor record → ordered stat sheet, with upgrades applied

use crate::dataset::{ArmorPiece, META_FIELDS};
use crate::effects::{AdjustedStat, EffectTotals};
use crate::stats::sheet::{RawStat, StatSheet};
use serde::Serialize;

/// Stats of a piece, identity and bookkeeping fields excluded
///
/// With `ordered_keys` the sheet holds exactly those keys that the piece
/// has, in the given order. Without it, dataset order is kept.
pub fn extract_stats(piece: &ArmorPiece, ordered_keys: Option<&[&str]>) -> StatSheet {
    let is_stat = |key: &str| !META_FIELDS.contains(&key);

    match ordered_keys {
        Some(keys) => keys
            .iter()
            .filter(|key| is_stat(**key))
            .filter_map(|key| piece.stats.get(key).map(|v| (key.to_string(), v.clone())))
            .collect(),
        None => piece
            .stats
            .iter()
            .filter(|(key, _)| is_stat(*key))
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect(),
    }
}

/// A numeric stat with the upgrade bonuses that apply to it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffectiveStat {
    pub key: String,
    pub adjusted: AdjustedStat,
}

impl EffectiveStat {
    pub fn value(&self) -> f64 {
        self.adjusted.compute()
    }
}

/// Every numeric stat of a sheet with its aggregated bonuses
///
/// Non-numeric stats are skipped. Bonuses for stats the sheet does not
/// carry are not reported.
pub fn effective_stats(sheet: &StatSheet, totals: &EffectTotals) -> Vec<EffectiveStat> {
    sheet
        .iter()
        .filter_map(|(key, raw)| {
            let base = raw.as_number()?;
            let adjusted = match totals.get(key) {
                Some(modifier) => AdjustedStat::from_modifier(base, modifier),
                None => AdjustedStat::with_base(base),
            };
            Some(EffectiveStat {
                key: key.to_string(),
                adjusted,
            })
        })
        .collect()
}

/// A new sheet with upgrade bonuses folded into the numeric stats
///
/// Stats untouched by any bonus keep their raw form (so `"13.0 kg"` stays
/// a string); modified stats become plain numbers.
pub fn apply_effects(sheet: &StatSheet, totals: &EffectTotals) -> StatSheet {
    sheet
        .iter()
        .map(|(key, raw)| {
            let value = match (raw.as_number(), totals.get(key)) {
                (Some(base), Some(modifier)) => {
                    let adjusted = AdjustedStat::from_modifier(base, modifier);
                    if adjusted.is_modified() {
                        RawStat::Number(adjusted.compute())
                    } else {
                        raw.clone()
                    }
                }
                _ => raw.clone(),
            };
            (key.to_string(), value)
        })
        .collect()
}
