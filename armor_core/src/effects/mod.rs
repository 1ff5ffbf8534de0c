//! Effect aggregation - sums upgrade modifiers per target stat
//!
//! Percent and absolute bonuses are kept in separate channels; they only
//! meet when an effective stat is computed (see [`AdjustedStat`]).

mod adjusted;

pub use adjusted::{effective_value, AdjustedStat};

use crate::dataset::{Effect, Upgrade};
use serde::Serialize;
use std::collections::BTreeMap;

/// Summed bonuses for one stat
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatModifier {
    /// Sum of percent bonuses (15 = +15%)
    pub percent: f64,
    /// Sum of flat bonuses
    pub absolute: f64,
    /// Display text of the first effect seen for this stat
    pub label: Option<String>,
}

/// Accumulates effects from selected upgrades, keyed by target stat
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EffectTotals {
    stats: BTreeMap<String, StatModifier>,
}

impl EffectTotals {
    pub fn new() -> Self {
        EffectTotals::default()
    }

    /// Add one effect; effects without a target stat are ignored
    pub fn add_effect(&mut self, effect: &Effect) {
        let Some(stat) = effect.stat.as_deref() else {
            return;
        };
        let entry = self
            .stats
            .entry(stat.to_string())
            .or_insert_with(|| StatModifier {
                label: effect.text.clone(),
                ..StatModifier::default()
            });
        if effect.is_percent {
            entry.percent += effect.magnitude();
        } else {
            entry.absolute += effect.magnitude();
        }
    }

    /// Add every effect of an upgrade
    pub fn add_upgrade(&mut self, upgrade: &Upgrade) {
        for effect in &upgrade.effects {
            self.add_effect(effect);
        }
    }

    pub fn get(&self, stat: &str) -> Option<&StatModifier> {
        self.stats.get(stat)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StatModifier)> {
        self.stats.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }
}

/// Aggregate the effects of a set of upgrades
pub fn aggregate<'a>(upgrades: impl IntoIterator<Item = &'a Upgrade>) -> EffectTotals {
    let mut totals = EffectTotals::new();
    for upgrade in upgrades {
        totals.add_upgrade(upgrade);
    }
    totals
}

/// Total cost of a set of upgrades, rounded to the nearest whole unit
pub fn total_cost<'a>(upgrades: impl IntoIterator<Item = &'a Upgrade>) -> i64 {
    let total: f64 = upgrades
        .into_iter()
        .map(|u| u.cost)
        .filter(|c| c.is_finite())
        .sum();
    total.round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::PartType;

    fn effect(stat: Option<&str>, is_percent: bool, max: f64) -> Effect {
        Effect {
            stat: stat.map(str::to_string),
            is_percent,
            max: Some(max),
            text: Some("Protection".to_string()),
            id: None,
        }
    }

    fn upgrade_with(id: &str, effects: Vec<Effect>, cost: f64) -> Upgrade {
        let mut upgrade = Upgrade::new(id, PartType::Body);
        upgrade.effects = effects;
        upgrade.cost = cost;
        upgrade
    }

    #[test]
    fn test_percent_channel_sums() {
        let a = upgrade_with("a", vec![effect(Some("thermal"), true, 10.0)], 0.0);
        let b = upgrade_with("b", vec![effect(Some("thermal"), true, 5.0)], 0.0);

        let totals = aggregate([&a, &b]);
        let thermal = totals.get("thermal").unwrap();
        assert!((thermal.percent - 15.0).abs() < f64::EPSILON);
        assert_eq!(thermal.absolute, 0.0);
        assert_eq!(totals.len(), 1);
    }

    #[test]
    fn test_channels_stay_separate() {
        let a = upgrade_with(
            "a",
            vec![effect(Some("physical"), true, 20.0), effect(Some("physical"), false, 1.5)],
            0.0,
        );
        let b = upgrade_with("b", vec![effect(Some("physical"), false, 0.5)], 0.0);

        let totals = aggregate([&a, &b]);
        let physical = totals.get("physical").unwrap();
        assert!((physical.percent - 20.0).abs() < f64::EPSILON);
        assert!((physical.absolute - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_effects_without_stat_are_ignored() {
        let a = upgrade_with("a", vec![effect(None, true, 99.0)], 0.0);
        let totals = aggregate([&a]);
        assert!(totals.is_empty());
    }

    #[test]
    fn test_unparsable_magnitude_counts_as_zero() {
        let mut broken = effect(Some("psi"), false, 0.0);
        broken.max = None;
        let a = upgrade_with("a", vec![broken], 0.0);

        let totals = aggregate([&a]);
        assert_eq!(totals.get("psi").map(|m| m.absolute), Some(0.0));
    }

    #[test]
    fn test_total_cost_rounds() {
        let a = upgrade_with("a", vec![], 50.4);
        let b = upgrade_with("b", vec![], 30.3);
        assert_eq!(total_cost([&a, &b]), 81);
        assert_eq!(total_cost(std::iter::empty::<&Upgrade>()), 0);
    }
}
