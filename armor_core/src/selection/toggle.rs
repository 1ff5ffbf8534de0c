//! Toggle - validated select / deselect of one upgrade cell

use crate::effects::EffectTotals;
use crate::selection::{Availability, ColumnState, SelectionKey, UpgradeStatus};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Why a toggle attempt left the selection unchanged
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToggleRefusal {
    #[error("{upgrade} is blocked by {}", by.join(", "))]
    Blocked { upgrade: String, by: Vec<String> },

    #[error("{upgrade} requires one of {}", one_of.join(", "))]
    RequiresUnmet { upgrade: String, one_of: Vec<String> },

    #[error("{upgrade} is required by {}", dependents.join(", "))]
    RequiredBy {
        upgrade: String,
        dependents: Vec<String>,
    },

    #[error("no upgrade {upgrade} in this column")]
    UnknownUpgrade { upgrade: String },
}

/// Result of an accepted toggle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToggleOutcome {
    /// Whether the upgrade is selected after the toggle
    pub selected: bool,
    pub availability: Availability,
    pub effects: EffectTotals,
    pub cost: i64,
}

impl ColumnState {
    /// Select or deselect one upgrade, enforcing blocking and requirements
    ///
    /// `piece` narrows the lookup when several displayed pieces could hold
    /// the same upgrade id; `None` takes the first cell with that id.
    pub fn toggle_upgrade(
        &mut self,
        piece: Option<&str>,
        upgrade_id: &str,
    ) -> Result<ToggleOutcome, ToggleRefusal> {
        let availability = self.compute_availability();

        let Some((piece_id, upgrade)) = self.locate(piece, upgrade_id) else {
            debug!(column = self.column.name(), upgrade = upgrade_id, "toggle refused: unknown upgrade");
            return Err(ToggleRefusal::UnknownUpgrade {
                upgrade: upgrade_id.to_string(),
            });
        };
        let piece_id = piece_id.to_string();
        let upgrade_id = upgrade.id.clone();

        match availability.get(&piece_id, &upgrade_id) {
            Some(UpgradeStatus::Blocked { by }) => {
                debug!(column = self.column.name(), upgrade = %upgrade_id, "toggle refused: blocked");
                return Err(ToggleRefusal::Blocked {
                    upgrade: upgrade_id,
                    by: by.clone(),
                });
            }
            Some(UpgradeStatus::RequiresUnmet { one_of }) => {
                debug!(column = self.column.name(), upgrade = %upgrade_id, "toggle refused: requirement unmet");
                return Err(ToggleRefusal::RequiresUnmet {
                    upgrade: upgrade_id,
                    one_of: one_of.clone(),
                });
            }
            _ => {}
        }

        let key = self.key_for(&piece_id, &upgrade_id);
        let selected = if self.selected.contains(&key) {
            let dependents = self.dependents_of(&key);
            if !dependents.is_empty() {
                debug!(column = self.column.name(), upgrade = %upgrade_id, "toggle refused: still required");
                return Err(ToggleRefusal::RequiredBy {
                    upgrade: upgrade_id,
                    dependents,
                });
            }
            self.selected.remove(&key);
            false
        } else {
            self.selected.insert(key);
            true
        };

        let availability = self.compute_availability();
        Ok(ToggleOutcome {
            selected,
            availability,
            effects: self.aggregate_effects(),
            cost: self.total_cost(),
        })
    }

    /// Ids of other selected upgrades whose required list names this key's upgrade
    fn dependents_of(&self, key: &SelectionKey) -> Vec<String> {
        self.selected
            .iter()
            .filter(|other| *other != key)
            .filter_map(|other| self.resolve(other))
            .filter(|(_, upgrade)| upgrade.requires(&key.upgrade))
            .map(|(_, upgrade)| upgrade.id.clone())
            .collect()
    }
}
