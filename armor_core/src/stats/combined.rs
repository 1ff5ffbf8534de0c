//! Head + chest combination into one column sheet

use crate::stats::sheet::{RawStat, StatSheet};
use serde::Serialize;

/// One stat of a combined head + chest column
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CombinedStat {
    /// Summed (numeric) or chosen (text) value
    Single(RawStat),
    /// Non-stacking stat, reported per location
    PerLocation {
        head: Option<f64>,
        chest: Option<f64>,
    },
}

/// Stats of a head and chest piece shown together
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CombinedSheet {
    entries: Vec<(String, CombinedStat)>,
}

impl CombinedSheet {
    pub fn get(&self, key: &str) -> Option<&CombinedStat> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CombinedStat)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flatten into a plain sheet; per-location stats become
    /// `"<stat> (head)"` and `"<stat> (chest)"` entries
    pub fn to_sheet(&self) -> StatSheet {
        let mut sheet = StatSheet::new();
        for (key, stat) in &self.entries {
            match stat {
                CombinedStat::Single(raw) => sheet.insert(key.as_str(), raw.clone()),
                CombinedStat::PerLocation { head, chest } => {
                    if let Some(head) = head {
                        sheet.insert(format!("{key} (head)"), RawStat::Number(*head));
                    }
                    if let Some(chest) = chest {
                        sheet.insert(format!("{key} (chest)"), RawStat::Number(*chest));
                    }
                }
            }
        }
        sheet
    }
}

/// Combine a head and a chest sheet
///
/// Numeric stats are summed, treating a missing side as 0. Stats listed in
/// `non_stacking` are never summed and keep both values. When neither side
/// is numeric the chest value wins over the head value. Key order is the
/// head's, then chest-only keys.
pub fn combine_head_chest(head: &StatSheet, chest: &StatSheet, non_stacking: &[String]) -> CombinedSheet {
    let mut keys: Vec<&str> = head.keys().collect();
    keys.extend(chest.keys().filter(|k| !head.contains(k)));

    let entries = keys
        .into_iter()
        .filter_map(|key| {
            let h = head.get(key);
            let c = chest.get(key);

            let stat = if non_stacking.iter().any(|s| s == key) {
                CombinedStat::PerLocation {
                    head: h.and_then(RawStat::as_number),
                    chest: c.and_then(RawStat::as_number),
                }
            } else {
                let hn = h.and_then(RawStat::as_number);
                let cn = c.and_then(RawStat::as_number);
                if hn.is_some() || cn.is_some() {
                    CombinedStat::Single(RawStat::Number(hn.unwrap_or(0.0) + cn.unwrap_or(0.0)))
                } else {
                    CombinedStat::Single(c.or(h)?.clone())
                }
            };
            Some((key.to_string(), stat))
        })
        .collect();

    CombinedSheet { entries }
}
