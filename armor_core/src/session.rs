//! ComparisonSession - the selection context for both comparison columns
//!
//! Every engine operation goes through a session: it owns what each column
//! shows, the grids built for those pieces, and the per-column selections.
//! Columns never see each other's selections.

use crate::config::DisplayConfig;
use crate::dataset::ArmorPiece;
use crate::effects::EffectTotals;
use crate::selection::{
    Availability, ColumnState, PieceGrids, SelectionKey, ToggleOutcome, ToggleRefusal,
};
use crate::stats::{
    apply_effects, combine_head_chest, comparison_rows, extract_stats, ComparisonRow, StatSheet,
};
use crate::types::Column;
use std::collections::{BTreeMap, BTreeSet};

/// Both columns of an armor comparison
#[derive(Debug, Clone)]
pub struct ComparisonSession {
    columns: [ColumnState; 2],
    display: DisplayConfig,
}

impl Default for ComparisonSession {
    fn default() -> Self {
        ComparisonSession::new(DisplayConfig::default())
    }
}

impl ComparisonSession {
    pub fn new(display: DisplayConfig) -> Self {
        ComparisonSession {
            columns: [ColumnState::new(Column::A), ColumnState::new(Column::B)],
            display,
        }
    }

    pub fn display(&self) -> &DisplayConfig {
        &self.display
    }

    pub fn column(&self, column: Column) -> &ColumnState {
        &self.columns[column.index()]
    }

    fn column_mut(&mut self, column: Column) -> &mut ColumnState {
        &mut self.columns[column.index()]
    }

    /// Show new pieces in a column, in slot order (head before chest)
    ///
    /// Rebuilds the column's grids and clears its selection.
    pub fn set_pieces(&mut self, column: Column, pieces: Vec<ArmorPiece>) {
        self.column_mut(column).set_pieces(pieces);
    }

    pub fn pieces(&self, column: Column) -> Vec<&ArmorPiece> {
        self.column(column).pieces().collect()
    }

    pub fn grids(&self, column: Column) -> &[PieceGrids] {
        self.column(column).piece_grids()
    }

    pub fn selection(&self, column: Column) -> &BTreeSet<SelectionKey> {
        self.column(column).selection()
    }

    pub fn compute_availability(&mut self, column: Column) -> Availability {
        self.column_mut(column).compute_availability()
    }

    pub fn toggle_upgrade(
        &mut self,
        column: Column,
        piece: Option<&str>,
        upgrade_id: &str,
    ) -> Result<ToggleOutcome, ToggleRefusal> {
        self.column_mut(column).toggle_upgrade(piece, upgrade_id)
    }

    pub fn aggregate_effects(&self, column: Column) -> EffectTotals {
        self.column(column).aggregate_effects()
    }

    pub fn aggregate_effects_by_piece(&self, column: Column) -> BTreeMap<String, EffectTotals> {
        self.column(column).aggregate_effects_by_piece()
    }

    pub fn total_cost(&self, column: Column) -> i64 {
        self.column(column).total_cost()
    }

    /// Stats of a column with its selected upgrades applied
    ///
    /// Effects apply to the piece that owns the upgrade. A head and a chest
    /// piece are then combined; showing the same piece twice does not double
    /// it. `None` when the column shows nothing.
    pub fn effective_sheet(&self, column: Column) -> Option<StatSheet> {
        let state = self.column(column);
        let by_piece = state.aggregate_effects_by_piece();
        let empty = EffectTotals::new();

        let sheets: Vec<(&str, StatSheet)> = state
            .pieces()
            .map(|piece| {
                let totals = by_piece.get(&piece.id).unwrap_or(&empty);
                (piece.id.as_str(), apply_effects(&extract_stats(piece, None), totals))
            })
            .collect();

        match sheets.as_slice() {
            [] => None,
            [(_, only)] => Some(only.clone()),
            [(head_id, head), (chest_id, chest), ..] => {
                if head_id == chest_id {
                    Some(head.clone())
                } else {
                    Some(combine_head_chest(head, chest, &self.display.non_stacking).to_sheet())
                }
            }
        }
    }

    /// Bar rows for the current state of both columns
    ///
    /// Empty until both columns show something.
    pub fn comparison_rows(&self) -> Vec<ComparisonRow> {
        match (self.effective_sheet(Column::A), self.effective_sheet(Column::B)) {
            (Some(a), Some(b)) => comparison_rows(&a, &b, &self.display.bars),
            _ => Vec::new(),
        }
    }
}
