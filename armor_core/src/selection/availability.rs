//! Availability - blocked / requires / selectable state of every upgrade cell

use crate::dataset::Upgrade;
use crate::selection::{CellId, ColumnState, SelectionKey};
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Interaction state of one upgrade cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UpgradeStatus {
    /// A selected upgrade in the same column lists this one as blocked
    Blocked { by: Vec<String> },
    /// None of the required upgrades is selected yet
    RequiresUnmet { one_of: Vec<String> },
    Selectable,
    Selected,
}

/// Status of every upgrade cell in a column
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Availability {
    #[serde(serialize_with = "cells_as_list")]
    statuses: BTreeMap<CellId, UpgradeStatus>,
}

/// JSON map keys must be strings, so cells serialize as a flat list
fn cells_as_list<S: Serializer>(
    statuses: &BTreeMap<CellId, UpgradeStatus>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    #[derive(Serialize)]
    struct Entry<'a> {
        #[serde(flatten)]
        cell: &'a CellId,
        #[serde(flatten)]
        status: &'a UpgradeStatus,
    }
    serializer.collect_seq(statuses.iter().map(|(cell, status)| Entry { cell, status }))
}

impl Availability {
    pub fn get(&self, piece_id: &str, upgrade_id: &str) -> Option<&UpgradeStatus> {
        self.statuses.get(&CellId::new(piece_id, upgrade_id))
    }

    /// Status by bare upgrade id (first piece that has it)
    pub fn status_of(&self, upgrade_id: &str) -> Option<&UpgradeStatus> {
        self.statuses
            .iter()
            .find(|(cell, _)| cell.upgrade == upgrade_id)
            .map(|(_, status)| status)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CellId, &UpgradeStatus)> {
        self.statuses.iter()
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }

    /// Number of cells matching a predicate
    pub fn count(&self, predicate: impl Fn(&UpgradeStatus) -> bool) -> usize {
        self.statuses.values().filter(|s| predicate(*s)).count()
    }
}

impl ColumnState {
    /// Recompute the status of every cell in this column
    ///
    /// A selected upgrade that has become blocked (because a later selection
    /// blocks it) is removed from the selection. The pass repeats until no
    /// such removal happens, so statuses never reflect blocks held by an
    /// upgrade that was just removed. Removal does not cascade to upgrades
    /// that required the removed one.
    pub fn compute_availability(&mut self) -> Availability {
        self.prune_stale();

        loop {
            let (availability, forced) = self.availability_pass();
            if forced.is_empty() {
                return availability;
            }
            for key in forced {
                debug!(key = %key, "force-deselecting blocked upgrade");
                self.selected.remove(&key);
            }
        }
    }

    fn availability_pass(&self) -> (Availability, Vec<SelectionKey>) {
        let selected: Vec<(&str, &Upgrade)> = self.selected_upgrades().collect();
        let selected_ids: BTreeSet<&str> = selected.iter().map(|(_, u)| u.id.as_str()).collect();

        // blocked id → ids of the selected upgrades blocking it
        let mut blocked_by: BTreeMap<&str, Vec<String>> = BTreeMap::new();
        for (_, upgrade) in &selected {
            for blocked in &upgrade.blocking {
                let blockers = blocked_by.entry(blocked.as_str()).or_default();
                if !blockers.contains(&upgrade.id) {
                    blockers.push(upgrade.id.clone());
                }
            }
        }

        let mut statuses = BTreeMap::new();
        let mut forced = Vec::new();

        for (piece_id, upgrade) in self.cells() {
            let key = self.key_for(piece_id, &upgrade.id);
            let is_selected = self.selected.contains(&key);
            let requirement_met = upgrade.required.is_empty()
                || upgrade.required.iter().any(|r| selected_ids.contains(r.as_str()));

            let status = if let Some(by) = blocked_by.get(upgrade.id.as_str()) {
                if is_selected {
                    forced.push(key);
                }
                UpgradeStatus::Blocked { by: by.clone() }
            } else if !requirement_met {
                UpgradeStatus::RequiresUnmet {
                    one_of: upgrade.required.clone(),
                }
            } else if is_selected {
                UpgradeStatus::Selected
            } else {
                UpgradeStatus::Selectable
            };

            statuses.insert(CellId::new(piece_id, &upgrade.id), status);
        }

        (Availability { statuses }, forced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{ArmorPiece, PartType};
    use crate::types::{ArmorKind, Column};

    fn upgrade(id: &str, blocking: &[&str], required: &[&str]) -> Upgrade {
        let mut upgrade = Upgrade::new(id, PartType::Body);
        upgrade.blocking = blocking.iter().map(|s| s.to_string()).collect();
        upgrade.required = required.iter().map(|s| s.to_string()).collect();
        upgrade
    }

    fn column_with(upgrades: Vec<Upgrade>) -> ColumnState {
        let mut piece = ArmorPiece::new("suit", "Suit", ArmorKind::FullBody);
        piece.upgrades = upgrades;
        let mut state = ColumnState::new(Column::A);
        state.set_pieces(vec![piece]);
        state
    }

    fn select(state: &mut ColumnState, id: &str) {
        let key = state.key_for("suit", id);
        state.selected.insert(key);
    }

    #[test]
    fn test_all_selectable_without_selection() {
        let mut state = column_with(vec![
            upgrade("Base_1_1", &["Alt_1_2"], &[]),
            upgrade("Alt_1_2", &[], &[]),
        ]);
        let availability = state.compute_availability();
        assert_eq!(availability.len(), 2);
        assert_eq!(availability.count(|s| *s == UpgradeStatus::Selectable), 2);
    }

    #[test]
    fn test_blocker_flags_target() {
        let mut state = column_with(vec![
            upgrade("Base_1_1", &["Alt_1_2"], &[]),
            upgrade("Alt_1_2", &[], &[]),
        ]);
        select(&mut state, "Base_1_1");

        let availability = state.compute_availability();
        assert_eq!(availability.status_of("Base_1_1"), Some(&UpgradeStatus::Selected));
        assert_eq!(
            availability.status_of("Alt_1_2"),
            Some(&UpgradeStatus::Blocked { by: vec!["Base_1_1".to_string()] })
        );
    }

    #[test]
    fn test_blocked_selection_is_removed() {
        let mut state = column_with(vec![
            upgrade("Base_1_1", &["Alt_1_2"], &[]),
            upgrade("Alt_1_2", &[], &[]),
        ]);
        select(&mut state, "Alt_1_2");
        select(&mut state, "Base_1_1");

        let availability = state.compute_availability();
        assert!(!state.is_selected("suit", "Alt_1_2"));
        assert!(state.is_selected("suit", "Base_1_1"));
        assert!(matches!(availability.status_of("Alt_1_2"), Some(UpgradeStatus::Blocked { .. })));
    }

    #[test]
    fn test_forced_removal_releases_its_own_blocks() {
        // Heavy blocks Light; Light blocks Pad. Once Heavy knocks Light out,
        // Pad must no longer show as blocked.
        let mut state = column_with(vec![
            upgrade("Heavy_1_1", &["Light_2_1"], &[]),
            upgrade("Light_2_1", &["Pad_3_1"], &[]),
            upgrade("Pad_3_1", &[], &[]),
        ]);
        select(&mut state, "Light_2_1");
        select(&mut state, "Heavy_1_1");

        let availability = state.compute_availability();
        assert_eq!(availability.status_of("Pad_3_1"), Some(&UpgradeStatus::Selectable));
        assert_eq!(state.selection().len(), 1);
    }

    #[test]
    fn test_requirements_use_or_semantics() {
        let mut state = column_with(vec![
            upgrade("First_1_1", &[], &[]),
            upgrade("Second_2_1", &[], &[]),
            upgrade("Top_3_1", &[], &["First_1_1", "Second_2_1"]),
        ]);

        let availability = state.compute_availability();
        assert_eq!(
            availability.status_of("Top_3_1"),
            Some(&UpgradeStatus::RequiresUnmet {
                one_of: vec!["First_1_1".to_string(), "Second_2_1".to_string()]
            })
        );

        select(&mut state, "Second_2_1");
        let availability = state.compute_availability();
        assert_eq!(availability.status_of("Top_3_1"), Some(&UpgradeStatus::Selectable));
    }

    #[test]
    fn test_serializes_as_cell_list() {
        let mut state = column_with(vec![
            upgrade("Base_1_1", &["Alt_1_2"], &[]),
            upgrade("Alt_1_2", &[], &[]),
        ]);
        select(&mut state, "Base_1_1");

        let json = serde_json::to_value(state.compute_availability()).unwrap();
        let cells = json["statuses"].as_array().unwrap();
        assert_eq!(cells.len(), 2);
        let alt = cells.iter().find(|c| c["upgrade"] == "Alt_1_2").unwrap();
        assert_eq!(alt["piece"], "suit");
        assert_eq!(alt["status"], "blocked");
        assert_eq!(alt["by"][0], "Base_1_1");
    }

    #[test]
    fn test_blocked_wins_over_requires() {
        let mut state = column_with(vec![
            upgrade("Guard_1_1", &["Top_3_1"], &[]),
            upgrade("Top_3_1", &[], &["Other_2_1"]),
            upgrade("Other_2_1", &[], &[]),
        ]);
        select(&mut state, "Guard_1_1");

        let availability = state.compute_availability();
        assert!(matches!(availability.status_of("Top_3_1"), Some(UpgradeStatus::Blocked { .. })));
    }
}
