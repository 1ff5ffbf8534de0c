//! Per-column upgrade selection state
//!
//! A [`ColumnState`] owns the pieces shown in one comparison column, their
//! zone grids, and the set of selected upgrades. It is the only place the
//! selection is mutated: through [`ColumnState::set_pieces`] (which clears
//! it), [`ColumnState::toggle_upgrade`], and the forced deselection done by
//! [`ColumnState::compute_availability`].

mod availability;
mod key;
mod toggle;

pub use availability::{Availability, UpgradeStatus};
pub use key::{CellId, SelectionKey};
pub use toggle::{ToggleOutcome, ToggleRefusal};

use crate::dataset::{ArmorPiece, Upgrade};
use crate::effects::{self, EffectTotals};
use crate::grid::{build_zone_grids, ZoneGrids};
use crate::types::Column;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// A displayed piece together with its upgrade grids
#[derive(Debug, Clone)]
pub struct PieceGrids {
    pub piece: ArmorPiece,
    pub grids: ZoneGrids,
}

impl PieceGrids {
    pub fn new(piece: ArmorPiece) -> Self {
        let grids = build_zone_grids(&piece);
        PieceGrids { piece, grids }
    }
}

/// Pieces, grids and selection for one comparison column
#[derive(Debug, Clone)]
pub struct ColumnState {
    column: Column,
    pieces: Vec<PieceGrids>,
    selected: BTreeSet<SelectionKey>,
}

impl ColumnState {
    pub fn new(column: Column) -> Self {
        ColumnState {
            column,
            pieces: Vec::new(),
            selected: BTreeSet::new(),
        }
    }

    pub fn column(&self) -> Column {
        self.column
    }

    /// Replace the displayed pieces; clears the selection
    pub fn set_pieces(&mut self, pieces: Vec<ArmorPiece>) {
        if !self.selected.is_empty() {
            debug!(column = self.column.name(), cleared = self.selected.len(), "pieces changed, clearing selection");
        }
        self.selected.clear();
        self.pieces = pieces.into_iter().map(PieceGrids::new).collect();
    }

    pub fn pieces(&self) -> impl Iterator<Item = &ArmorPiece> {
        self.pieces.iter().map(|p| &p.piece)
    }

    pub fn piece_grids(&self) -> &[PieceGrids] {
        &self.pieces
    }

    pub fn grids_for(&self, piece_id: &str) -> Option<&ZoneGrids> {
        self.pieces
            .iter()
            .find(|p| p.piece.id == piece_id)
            .map(|p| &p.grids)
    }

    pub fn selection(&self) -> &BTreeSet<SelectionKey> {
        &self.selected
    }

    /// Canonical key for a cell of this column
    pub fn key_for(&self, piece_id: &str, upgrade_id: &str) -> SelectionKey {
        let piece = (self.pieces.len() > 1).then_some(piece_id);
        SelectionKey::new(self.column, piece, upgrade_id)
    }

    pub fn is_selected(&self, piece_id: &str, upgrade_id: &str) -> bool {
        self.selected.contains(&self.key_for(piece_id, upgrade_id))
    }

    /// Every live upgrade cell as (piece id, upgrade)
    pub fn cells(&self) -> impl Iterator<Item = (&str, &Upgrade)> {
        self.pieces.iter().flat_map(|p| {
            let piece_id = p.piece.id.as_str();
            p.grids.cells().map(move |cell| (piece_id, cell.upgrade))
        })
    }

    /// Find a live cell, optionally restricted to one piece
    pub fn locate(&self, piece: Option<&str>, upgrade_id: &str) -> Option<(&str, &Upgrade)> {
        self.cells()
            .filter(|(piece_id, _)| piece.map_or(true, |p| p == *piece_id))
            .find(|(_, upgrade)| upgrade.id == upgrade_id)
    }

    /// Resolve a selection key to its live cell
    pub fn resolve(&self, key: &SelectionKey) -> Option<(&str, &Upgrade)> {
        if key.column != self.column {
            return None;
        }
        self.locate(key.piece.as_deref(), &key.upgrade)
    }

    /// Selected upgrades that still resolve, as (piece id, upgrade)
    pub fn selected_upgrades(&self) -> impl Iterator<Item = (&str, &Upgrade)> {
        self.selected.iter().filter_map(move |key| self.resolve(key))
    }

    /// Sum effects of all selected upgrades in this column
    pub fn aggregate_effects(&self) -> EffectTotals {
        effects::aggregate(self.selected_upgrades().map(|(_, u)| u))
    }

    /// Sum effects of selected upgrades, per owning piece
    pub fn aggregate_effects_by_piece(&self) -> BTreeMap<String, EffectTotals> {
        let mut by_piece: BTreeMap<String, EffectTotals> = BTreeMap::new();
        for (piece_id, upgrade) in self.selected_upgrades() {
            by_piece
                .entry(piece_id.to_string())
                .or_default()
                .add_upgrade(upgrade);
        }
        by_piece
    }

    /// Rounded cost of all selected upgrades in this column
    pub fn total_cost(&self) -> i64 {
        effects::total_cost(self.selected_upgrades().map(|(_, u)| u))
    }

    /// Drop selection keys that no longer resolve to a live cell
    fn prune_stale(&mut self) {
        let stale: Vec<SelectionKey> = self
            .selected
            .iter()
            .filter(|key| self.resolve(key).is_none())
            .cloned()
            .collect();
        for key in stale {
            debug!(key = %key, "pruning stale selection");
            self.selected.remove(&key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Effect, PartType};
    use crate::types::ArmorKind;

    fn thermal_upgrade(id: &str, percent: f64, cost: f64) -> Upgrade {
        let mut upgrade = Upgrade::new(id, PartType::Body);
        upgrade.effects.push(Effect {
            stat: Some("thermal".to_string()),
            is_percent: true,
            max: Some(percent),
            text: Some("Thermal".to_string()),
            id: None,
        });
        upgrade.cost = cost;
        upgrade
    }

    fn suit() -> ArmorPiece {
        ArmorPiece::new("suit", "Suit", ArmorKind::FullBody)
            .with_stat("thermal", 2.0)
            .with_upgrade(thermal_upgrade("Suit_1_1", 10.0, 50.0))
            .with_upgrade(thermal_upgrade("Suit_2_1", 5.0, 30.0))
    }

    #[test]
    fn test_single_piece_keys_omit_piece() {
        let mut state = ColumnState::new(Column::A);
        state.set_pieces(vec![suit()]);
        assert_eq!(state.key_for("suit", "Suit_1_1").piece, None);
    }

    #[test]
    fn test_multi_piece_keys_carry_piece() {
        let helm = ArmorPiece::new("helm", "Helm", ArmorKind::Head);
        let vest = ArmorPiece::new("vest", "Vest", ArmorKind::Chest);
        let mut state = ColumnState::new(Column::B);
        state.set_pieces(vec![helm, vest]);
        assert_eq!(
            state.key_for("vest", "Vest_1_1"),
            SelectionKey::new(Column::B, Some("vest"), "Vest_1_1")
        );
    }

    #[test]
    fn test_set_pieces_clears_selection() {
        let mut state = ColumnState::new(Column::A);
        state.set_pieces(vec![suit()]);
        let key = state.key_for("suit", "Suit_1_1");
        state.selected.insert(key);
        assert_eq!(state.selection().len(), 1);

        state.set_pieces(vec![suit()]);
        assert!(state.selection().is_empty());
    }

    #[test]
    fn test_aggregation_skips_stale_keys() {
        let mut state = ColumnState::new(Column::A);
        state.set_pieces(vec![suit()]);
        let key = state.key_for("suit", "Suit_1_1");
        state.selected.insert(key);
        let key = state.key_for("suit", "Gone_9_9");
        state.selected.insert(key);

        let totals = state.aggregate_effects();
        assert!((totals.get("thermal").unwrap().percent - 10.0).abs() < f64::EPSILON);
        assert_eq!(state.total_cost(), 50);

        state.prune_stale();
        assert_eq!(state.selection().len(), 1);
    }

    #[test]
    fn test_effects_by_piece() {
        let mut state = ColumnState::new(Column::A);
        state.set_pieces(vec![suit()]);
        let key = state.key_for("suit", "Suit_1_1");
        state.selected.insert(key);
        let key = state.key_for("suit", "Suit_2_1");
        state.selected.insert(key);

        let by_piece = state.aggregate_effects_by_piece();
        assert_eq!(by_piece.len(), 1);
        assert!((by_piece["suit"].get("thermal").unwrap().percent - 15.0).abs() < f64::EPSILON);
    }
}
