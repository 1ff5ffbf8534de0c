//! ArmorPiece - An immutable armor record from the dataset

use crate::dataset::upgrade::{
    first_present, number_from_value, string_from_value, RawUpgrade, Upgrade,
};
use crate::stats::sheet::{RawStat, StatSheet};
use crate::types::ArmorKind;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// Fields of a dataset record that are not stats
pub const META_FIELDS: &[&str] = &[
    "id",
    "name",
    "type",
    "upgrades",
    "upgradeList",
    "icon",
    "Icon",
    "values",
    "Values",
];

/// One armor item (helmet, vest or full suit)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArmorPiece {
    pub id: String,
    pub name: String,
    pub kind: ArmorKind,
    /// Stats in dataset order, meta fields excluded
    pub stats: StatSheet,
    pub upgrades: Vec<Upgrade>,
}

impl ArmorPiece {
    /// Create a piece with no stats or upgrades
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: ArmorKind) -> Self {
        ArmorPiece {
            id: id.into(),
            name: name.into(),
            kind,
            stats: StatSheet::new(),
            upgrades: Vec::new(),
        }
    }

    pub fn with_stat(mut self, key: &str, value: impl Into<RawStat>) -> Self {
        self.stats.insert(key, value.into());
        self
    }

    pub fn with_upgrade(mut self, upgrade: Upgrade) -> Self {
        self.upgrades.push(upgrade);
        self
    }

    pub fn upgrade(&self, upgrade_id: &str) -> Option<&Upgrade> {
        self.upgrades.iter().find(|u| u.id == upgrade_id)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawArmorPiece {
    id: Value,
    #[serde(default)]
    name: Option<Value>,
    #[serde(rename = "type", default)]
    kind: Option<Value>,
    #[serde(default)]
    upgrades: Option<Value>,
    #[serde(rename = "upgradeList", default)]
    upgrade_list: Option<Value>,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

impl From<RawArmorPiece> for ArmorPiece {
    fn from(raw: RawArmorPiece) -> Self {
        let id = match raw.id {
            Value::String(s) => s,
            other => other.to_string(),
        };

        let kind = raw
            .kind
            .and_then(|v| serde_json::from_value::<ArmorKind>(v).ok())
            .unwrap_or_default();

        let stats = raw
            .rest
            .into_iter()
            .filter(|(key, _)| !META_FIELDS.contains(&key.as_str()))
            .filter_map(|(key, value)| raw_stat(value).map(|v| (key, v)))
            .collect();

        let entries = match first_present(raw.upgrades, raw.upgrade_list) {
            Some(Value::Array(entries)) => entries,
            Some(other) => {
                warn!(piece = %id, upgrades = %other, "upgrade list is not an array");
                Vec::new()
            }
            None => Vec::new(),
        };

        let upgrades = entries
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<RawUpgrade>(value) {
                Ok(upgrade) => Some(Upgrade::from(upgrade)),
                Err(e) => {
                    warn!(piece = %id, error = %e, "skipping malformed upgrade entry");
                    None
                }
            })
            .collect();

        ArmorPiece {
            name: raw
                .name
                .as_ref()
                .and_then(string_from_value)
                .unwrap_or_else(|| id.clone()),
            id,
            kind,
            stats,
            upgrades,
        }
    }
}

fn raw_stat(value: Value) -> Option<RawStat> {
    match value {
        Value::Number(_) => number_from_value(&value).map(RawStat::Number),
        Value::String(s) => Some(RawStat::Text(s)),
        Value::Bool(b) => Some(RawStat::Text(b.to_string())),
        // Nested structures are never stats
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
