//! Upgrade and Effect records attached to an armor piece

use crate::stats::sheet::parse_loose_number;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::trace;

/// Raw part-type tag an upgrade targets
///
/// The dataset spells these as `EUpgradeTargetPartType::<Name>`; which body
/// zone each tag lands in depends on the armor layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PartType {
    Stock,
    Barrel,
    Handguard,
    Body,
    PistolGrip,
}

impl PartType {
    const TAG_PREFIX: &'static str = "EUpgradeTargetPartType::";

    /// Parse a dataset tag, with or without the enum prefix
    pub fn from_tag(tag: &str) -> Option<PartType> {
        let name = tag.trim();
        let name = name.strip_prefix(Self::TAG_PREFIX).unwrap_or(name);
        match name {
            "Stock" => Some(PartType::Stock),
            "Barrel" => Some(PartType::Barrel),
            "Handguard" => Some(PartType::Handguard),
            "Body" => Some(PartType::Body),
            "PistolGrip" => Some(PartType::PistolGrip),
            _ => None,
        }
    }
}

/// A single stat modifier granted by an upgrade
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Effect {
    /// Target stat key; effects without one never aggregate
    pub stat: Option<String>,
    pub is_percent: bool,
    /// Magnitude, `None` when the dataset value is not a number
    pub max: Option<f64>,
    /// Display text, e.g. "Strike Protection"
    pub text: Option<String>,
    pub id: Option<String>,
}

impl Effect {
    /// Magnitude used for aggregation (unparsable counts as zero)
    pub fn magnitude(&self) -> f64 {
        self.max.unwrap_or(0.0)
    }

    /// Label such as "Strike Protection 20%"
    pub fn label(&self) -> Option<String> {
        let text = self.text.as_deref().unwrap_or("");
        let label = match self.max {
            Some(max) => {
                let suffix = if self.is_percent { "%" } else { "" };
                format!("{} {}{}", text, max, suffix)
            }
            None => text.to_string(),
        };
        let label = label.trim();
        (!label.is_empty()).then(|| label.to_string())
    }
}

/// An upgrade that can be installed on an armor piece
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Upgrade {
    pub id: String,
    /// Target part, `None` when the tag is missing or unknown
    pub part: Option<PartType>,
    /// Explicit 0-based column, when the dataset provides a readable one
    pub horizontal_position: Option<i64>,
    /// Explicit vertical position text (e.g. "EUpgradeVerticalPosition::Top")
    pub vertical_position: Option<String>,
    pub effects: Vec<Effect>,
    /// Upgrade ids that this upgrade disables while selected
    pub blocking: Vec<String>,
    /// Upgrade ids of which at least one must be selected first
    pub required: Vec<String>,
    pub cost: f64,
}

impl Upgrade {
    /// Create an upgrade with no position data, effects or constraints
    pub fn new(id: impl Into<String>, part: PartType) -> Self {
        Upgrade {
            id: id.into(),
            part: Some(part),
            horizontal_position: None,
            vertical_position: None,
            effects: Vec::new(),
            blocking: Vec::new(),
            required: Vec::new(),
            cost: 0.0,
        }
    }

    /// Id used for position fallback parsing
    pub fn position_id(&self) -> &str {
        if !self.id.is_empty() {
            return &self.id;
        }
        self.effects
            .first()
            .and_then(|e| e.id.as_deref())
            .unwrap_or("")
    }

    pub fn requires(&self, upgrade_id: &str) -> bool {
        self.required.iter().any(|r| r == upgrade_id)
    }

    pub fn blocks(&self, upgrade_id: &str) -> bool {
        self.blocking.iter().any(|b| b == upgrade_id)
    }

    /// Human-friendly label built from the effects, falling back to the id
    pub fn display_label(&self) -> String {
        let labels: Vec<String> = self.effects.iter().filter_map(Effect::label).collect();
        if labels.is_empty() {
            self.id.clone()
        } else {
            labels.join(" / ")
        }
    }
}

// ----------------------------------------------------------------------------
// Dataset shapes
// ----------------------------------------------------------------------------

/// Both spellings of a field are kept apart and merged after parsing, so a
/// record carrying both never fails as a duplicate.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawUpgrade {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    effects: Option<Value>,
    #[serde(default)]
    values: Option<Value>,
    #[serde(rename = "Values", default)]
    values_upper: Option<Value>,
    #[serde(default)]
    blocking: Option<Value>,
    #[serde(rename = "BlockingUpgradePrototypeSIDs", default)]
    blocking_sids: Option<Value>,
    #[serde(default)]
    required: Option<Value>,
    #[serde(rename = "RequiredUpgradePrototypeSIDs", default)]
    required_sids: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct RawUpgradeValues {
    #[serde(rename = "UpgradeTargetPart")]
    target_part: Option<Value>,
    #[serde(rename = "HorizontalPosition")]
    horizontal: Option<Value>,
    #[serde(rename = "VerticalPosition")]
    vertical: Option<Value>,
    #[serde(rename = "BaseCost")]
    base_cost_upper: Option<Value>,
    #[serde(rename = "baseCost")]
    base_cost: Option<Value>,
    #[serde(rename = "Cost")]
    cost_upper: Option<Value>,
    cost: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct RawEffect {
    #[serde(rename = "effectedStat")]
    effected_stat: Option<Value>,
    #[serde(rename = "isPercent", default)]
    is_percent: Option<Value>,
    max: Option<Value>,
    text: Option<Value>,
    id: Option<Value>,
}

impl From<RawUpgrade> for Upgrade {
    fn from(raw: RawUpgrade) -> Self {
        let id = raw.id.as_ref().and_then(string_from_value).unwrap_or_default();

        let values = match first_present(raw.values, raw.values_upper) {
            Some(value @ Value::Object(_)) => serde_json::from_value::<RawUpgradeValues>(value)
                .unwrap_or_else(|e| {
                    trace!(upgrade = %id, error = %e, "ignoring malformed upgrade values");
                    RawUpgradeValues::default()
                }),
            Some(other) => {
                trace!(upgrade = %id, values = %other, "upgrade values are not an object");
                RawUpgradeValues::default()
            }
            None => RawUpgradeValues::default(),
        };

        let part = values.target_part.as_ref().and_then(Value::as_str).and_then(PartType::from_tag);
        if part.is_none() {
            trace!(upgrade = %id, tag = ?values.target_part, "upgrade has no known target part");
        }

        let horizontal_position = values.horizontal.as_ref().and_then(leading_int);
        let vertical_position = values.vertical.as_ref().and_then(|v| match v {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        });

        let cost = [
            &values.base_cost_upper,
            &values.base_cost,
            &values.cost_upper,
            &values.cost,
        ]
        .into_iter()
        .find_map(|v| v.as_ref().filter(|v| !v.is_null()))
        .and_then(number_from_value)
        .unwrap_or(0.0);

        let effects = match raw.effects {
            Some(Value::Array(entries)) => entries
                .into_iter()
                .filter_map(|v| match serde_json::from_value::<RawEffect>(v) {
                    Ok(effect) => Some(effect.into()),
                    Err(e) => {
                        trace!(upgrade = %id, error = %e, "skipping malformed effect");
                        None
                    }
                })
                .collect(),
            _ => Vec::new(),
        };

        Upgrade {
            blocking: id_list(first_present(raw.blocking, raw.blocking_sids)),
            required: id_list(first_present(raw.required, raw.required_sids)),
            id,
            part,
            horizontal_position,
            vertical_position,
            effects,
            cost,
        }
    }
}

impl From<RawEffect> for Effect {
    fn from(raw: RawEffect) -> Self {
        Effect {
            stat: raw
                .effected_stat
                .as_ref()
                .and_then(string_from_value)
                .filter(|s| !s.is_empty()),
            is_percent: matches!(raw.is_percent, Some(Value::Bool(true))),
            max: raw.max.as_ref().and_then(strict_number),
            text: raw.text.as_ref().and_then(string_from_value),
            id: raw.id.as_ref().and_then(string_from_value),
        }
    }
}

/// First of two spellings that is present and not null
pub(crate) fn first_present(first: Option<Value>, second: Option<Value>) -> Option<Value> {
    first.filter(|v| !v.is_null()).or(second.filter(|v| !v.is_null()))
}

/// Upgrade ids from a JSON array; anything else reads as no ids
fn id_list(value: Option<Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(string_from_value).collect(),
        _ => Vec::new(),
    }
}

pub(crate) fn string_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Effect magnitudes accept plain numbers only; decorated strings count as 0
fn strict_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|n| n.is_finite()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

/// Read a number from a JSON number or a decorated numeric string
pub(crate) fn number_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|n| n.is_finite()),
        Value::String(s) => parse_loose_number(s),
        _ => None,
    }
}

/// Read a leading integer (`2`, `"2"`, `" 2nd"`), truncating floats
pub(crate) fn leading_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let s = s.trim_start();
            let (sign, digits) = match s.strip_prefix('-') {
                Some(rest) => (-1, rest),
                None => (1, s.strip_prefix('+').unwrap_or(s)),
            };
            let end = digits
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(digits.len());
            digits[..end].parse::<i64>().ok().map(|n| sign * n)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> Upgrade {
        serde_json::from_value::<RawUpgrade>(value).unwrap().into()
    }

    #[test]
    fn test_part_type_tags() {
        assert_eq!(
            PartType::from_tag("EUpgradeTargetPartType::PistolGrip"),
            Some(PartType::PistolGrip)
        );
        assert_eq!(PartType::from_tag("Barrel"), Some(PartType::Barrel));
        assert_eq!(PartType::from_tag("EUpgradeTargetPartType::Scope"), None);
    }

    #[test]
    fn test_parse_full_upgrade() {
        let upgrade = parse(json!({
            "id": "Exo_Thermal_2_1",
            "effects": [
                { "effectedStat": "thermal", "isPercent": true, "max": 15, "text": "Thermal protection" },
                { "text": "Cosmetic only" }
            ],
            "values": {
                "UpgradeTargetPart": "EUpgradeTargetPartType::Body",
                "HorizontalPosition": "1",
                "VerticalPosition": "EUpgradeVerticalPosition::Top",
                "BaseCost": "1,500 RU"
            },
            "BlockingUpgradePrototypeSIDs": ["Exo_Electric_2_1"],
            "RequiredUpgradePrototypeSIDs": ["Exo_Base_1_1"]
        }));

        assert_eq!(upgrade.part, Some(PartType::Body));
        assert_eq!(upgrade.horizontal_position, Some(1));
        assert_eq!(upgrade.vertical_position.as_deref(), Some("EUpgradeVerticalPosition::Top"));
        assert!((upgrade.cost - 1500.0).abs() < f64::EPSILON);
        assert!(upgrade.blocks("Exo_Electric_2_1"));
        assert!(upgrade.requires("Exo_Base_1_1"));
        assert_eq!(upgrade.effects.len(), 2);
        assert_eq!(upgrade.effects[1].stat, None);
        assert_eq!(upgrade.display_label(), "Thermal protection 15% / Cosmetic only");
    }

    #[test]
    fn test_malformed_fields_degrade() {
        let upgrade = parse(json!({
            "id": "Odd_1_1",
            "effects": [ { "effectedStat": "psi", "max": "lots" }, 42 ],
            "values": { "HorizontalPosition": "left", "cost": "free" }
        }));

        assert_eq!(upgrade.part, None);
        assert_eq!(upgrade.horizontal_position, None);
        assert_eq!(upgrade.cost, 0.0);
        assert_eq!(upgrade.effects.len(), 1);
        assert_eq!(upgrade.effects[0].magnitude(), 0.0);
    }

    #[test]
    fn test_null_fields_fall_back_to_defaults() {
        let upgrade = parse(json!({
            "id": "Null_1_1",
            "blocking": null,
            "required": null,
            "effects": [ { "effectedStat": "psi", "isPercent": null, "max": 2 } ],
            "values": null
        }));

        assert!(upgrade.blocking.is_empty());
        assert!(upgrade.required.is_empty());
        assert_eq!(upgrade.effects.len(), 1);
        assert!(!upgrade.effects[0].is_percent);
        assert_eq!(upgrade.effects[0].magnitude(), 2.0);
    }

    #[test]
    fn test_wrong_types_fall_back_to_defaults() {
        let upgrade = parse(json!({
            "id": "Odd_2_1",
            "blocking": "Other_1_1",
            "required": [ "Base_1_1", 7, null ],
            "effects": { "effectedStat": "psi" },
            "values": [ 1, 2 ]
        }));

        assert!(upgrade.blocking.is_empty());
        assert_eq!(upgrade.required, vec!["Base_1_1".to_string(), "7".to_string()]);
        assert!(upgrade.effects.is_empty());
        assert_eq!(upgrade.part, None);
    }

    #[test]
    fn test_both_spellings_prefer_first() {
        let upgrade = parse(json!({
            "id": "Both_1_1",
            "values": { "UpgradeTargetPart": "EUpgradeTargetPartType::Body" },
            "Values": { "UpgradeTargetPart": "EUpgradeTargetPartType::Stock" },
            "blocking": [ "A_1_1" ],
            "BlockingUpgradePrototypeSIDs": [ "B_1_1" ],
            "required": null,
            "RequiredUpgradePrototypeSIDs": [ "C_1_1" ]
        }));

        assert_eq!(upgrade.part, Some(PartType::Body));
        assert_eq!(upgrade.blocking, vec!["A_1_1".to_string()]);
        assert_eq!(upgrade.required, vec!["C_1_1".to_string()]);
    }

    #[test]
    fn test_decorated_magnitude_counts_as_zero() {
        let upgrade = parse(json!({
            "id": "Pct_1_1",
            "effects": [
                { "effectedStat": "psi", "isPercent": true, "max": "15%" },
                { "effectedStat": "thermal", "max": " 2.5 " }
            ]
        }));

        assert_eq!(upgrade.effects[0].max, None);
        assert_eq!(upgrade.effects[0].magnitude(), 0.0);
        assert_eq!(upgrade.effects[1].max, Some(2.5));
    }

    #[test]
    fn test_cost_field_precedence() {
        let upgrade = parse(json!({
            "id": "u",
            "values": { "cost": 10, "BaseCost": 30 }
        }));
        assert!((upgrade.cost - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_leading_int() {
        assert_eq!(leading_int(&json!(2)), Some(2));
        assert_eq!(leading_int(&json!(2.9)), Some(2));
        assert_eq!(leading_int(&json!(" 3rd")), Some(3));
        assert_eq!(leading_int(&json!("-1")), Some(-1));
        assert_eq!(leading_int(&json!("x1")), None);
        assert_eq!(leading_int(&json!(null)), None);
    }

    #[test]
    fn test_position_id_falls_back_to_effect() {
        let upgrade = parse(json!({
            "effects": [ { "id": "Helmet_Psy_3_2", "effectedStat": "psi", "max": 5 } ]
        }));
        assert_eq!(upgrade.position_id(), "Helmet_Psy_3_2");
    }
}
