//! Comparison rows - paired bar values for two column sheets

use crate::config::BarScale;
use crate::stats::sheet::StatSheet;
use serde::Serialize;

/// One stat compared across columns A and B
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub stat: String,
    pub a: f64,
    pub b: f64,
    /// Bar fill in percent of the stat's full-bar value
    pub a_pct: f64,
    pub b_pct: f64,
    /// Drawn as five segments (1-5 scale) rather than a plain bar
    pub segmented: bool,
}

impl ComparisonRow {
    /// B minus A
    pub fn delta(&self) -> f64 {
        self.b - self.a
    }
}

/// Build one row per stat present in either sheet
///
/// A's keys come first in A's order, then keys only B has. Missing or
/// non-numeric values count as 0.
pub fn comparison_rows(a: &StatSheet, b: &StatSheet, scale: &BarScale) -> Vec<ComparisonRow> {
    let mut keys: Vec<&str> = a.keys().collect();
    keys.extend(b.keys().filter(|k| !a.contains(k)));

    keys.into_iter()
        .map(|stat| {
            let a_value = a.number(stat).unwrap_or(0.0);
            let b_value = b.number(stat).unwrap_or(0.0);
            ComparisonRow {
                stat: stat.to_string(),
                a: a_value,
                b: b_value,
                a_pct: scale.fill_percent(stat, a_value),
                b_pct: scale.fill_percent(stat, b_value),
                segmented: scale.is_segmented(stat),
            }
        })
        .collect()
}
