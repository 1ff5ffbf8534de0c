//! Application state

use armor_core::config::load_display_config;
use armor_core::prelude::*;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Compare,
    ColumnA,
    ColumnB,
    Help,
}

impl Tab {
    pub fn all() -> &'static [Tab] {
        &[Tab::Compare, Tab::ColumnA, Tab::ColumnB, Tab::Help]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Tab::Compare => "Compare",
            Tab::ColumnA => "Column A",
            Tab::ColumnB => "Column B",
            Tab::Help => "Help",
        }
    }

    /// Column edited by this tab, if any
    pub fn column(&self) -> Option<Column> {
        match self {
            Tab::ColumnA => Some(Column::A),
            Tab::ColumnB => Some(Column::B),
            Tab::Compare | Tab::Help => None,
        }
    }
}

/// What one column shows and where its cursor is
#[derive(Debug, Clone)]
pub struct ColumnView {
    pub mode: ColumnMode,
    /// Chosen candidate per slot of the mode
    pub piece_index: Vec<usize>,
    /// Slot that ←/→ cycles
    pub active_slot: usize,
    /// Index into the column's upgrade cells
    pub cursor: usize,
}

impl ColumnView {
    pub fn new(mode: ColumnMode) -> Self {
        ColumnView {
            mode,
            piece_index: vec![0; mode.piece_kinds().len()],
            active_slot: 0,
            cursor: 0,
        }
    }
}

/// Upgrade cell under a column cursor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorCell {
    pub piece: String,
    pub upgrade: String,
}

const MAX_MESSAGES: usize = 200;

pub struct App {
    pub current_tab: Tab,
    pub dataset: Dataset,
    pub session: ComparisonSession,
    pub views: [ColumnView; 2],
    pub availability: [Availability; 2],
    pub messages: Vec<String>,
    pub compare_scroll: usize,
}

impl App {
    pub fn new() -> Self {
        App::with_dataset(Self::load_dataset(), Self::load_display())
    }

    /// Build an app over an already loaded dataset
    pub fn with_dataset(dataset: Dataset, display: DisplayConfig) -> Self {
        let mut app = App {
            current_tab: Tab::Compare,
            dataset,
            session: ComparisonSession::new(display),
            views: [
                ColumnView::new(ColumnMode::FullBody),
                ColumnView::new(ColumnMode::HeadChest),
            ],
            availability: [Availability::default(), Availability::default()],
            messages: Vec::new(),
            compare_scroll: 0,
        };
        for column in Column::all() {
            app.refresh_column(*column);
        }
        app
    }

    fn load_dataset() -> Dataset {
        let paths = [
            "armor_tui/data/armor_full.json",
            "data/armor_full.json",
            "../armor_tui/data/armor_full.json",
        ];

        for path in paths {
            let path = Path::new(path);
            if !path.exists() {
                continue;
            }
            match Dataset::load(path) {
                Ok(dataset) => return dataset,
                Err(e) => warn!(path = %path.display(), error = %e, "failed to load dataset"),
            }
        }

        warn!("no armor_full.json found, starting with an empty dataset");
        Dataset::default()
    }

    fn load_display() -> DisplayConfig {
        let paths = ["armor_tui/config/display.toml", "config/display.toml"];

        for path in paths {
            let path = Path::new(path);
            if !path.exists() {
                continue;
            }
            match load_display_config(path) {
                Ok(config) => {
                    info!(path = %path.display(), "loaded display config");
                    return config;
                }
                Err(e) => warn!(path = %path.display(), error = %e, "ignoring display config"),
            }
        }

        DisplayConfig::default()
    }

    pub fn next_tab(&mut self) {
        let tabs = Tab::all();
        let current_idx = tabs.iter().position(|t| *t == self.current_tab).unwrap_or(0);
        let next_idx = (current_idx + 1) % tabs.len();
        self.current_tab = tabs[next_idx];
    }

    pub fn prev_tab(&mut self) {
        let tabs = Tab::all();
        let current_idx = tabs.iter().position(|t| *t == self.current_tab).unwrap_or(0);
        let prev_idx = if current_idx == 0 {
            tabs.len() - 1
        } else {
            current_idx - 1
        };
        self.current_tab = tabs[prev_idx];
    }

    pub fn set_tab(&mut self, index: usize) {
        let tabs = Tab::all();
        if index < tabs.len() {
            self.current_tab = tabs[index];
        }
    }

    pub fn view(&self, column: Column) -> &ColumnView {
        &self.views[column.index()]
    }

    pub fn availability(&self, column: Column) -> &Availability {
        &self.availability[column.index()]
    }

    /// Candidate pieces for one slot of a column
    pub fn slot_candidates(&self, column: Column, slot: usize) -> Vec<&ArmorPiece> {
        self.dataset
            .candidates(self.view(column).mode)
            .into_iter()
            .nth(slot)
            .unwrap_or_default()
    }

    /// Upgrade cells of a column in cursor order
    pub fn cursor_cells(&self, column: Column) -> Vec<CursorCell> {
        self.session
            .column(column)
            .cells()
            .map(|(piece, upgrade)| CursorCell {
                piece: piece.to_string(),
                upgrade: upgrade.id.clone(),
            })
            .collect()
    }

    pub fn cursor_cell(&self, column: Column) -> Option<CursorCell> {
        let cursor = self.view(column).cursor;
        self.cursor_cells(column).into_iter().nth(cursor)
    }

    /// Push the pieces chosen in a column's view into the session
    fn refresh_column(&mut self, column: Column) {
        let view = self.view(column);
        let pieces: Vec<ArmorPiece> = (0..view.mode.piece_kinds().len())
            .filter_map(|slot| {
                let index = view.piece_index.get(slot).copied().unwrap_or(0);
                self.slot_candidates(column, slot).get(index).map(|p| (*p).clone())
            })
            .collect();

        self.session.set_pieces(column, pieces);
        self.availability[column.index()] = self.session.compute_availability(column);
        self.views[column.index()].cursor = 0;
    }

    pub fn cycle_mode(&mut self) {
        let Some(column) = self.current_tab.column() else {
            return;
        };
        let mode = self.view(column).mode.next();
        self.views[column.index()] = ColumnView::new(mode);
        self.refresh_column(column);
        self.log(format!("Column {}: showing {}", column.name(), mode.name()));
    }

    pub fn switch_slot(&mut self) {
        let Some(column) = self.current_tab.column() else {
            return;
        };
        let view = &mut self.views[column.index()];
        let slots = view.mode.piece_kinds().len();
        view.active_slot = (view.active_slot + 1) % slots.max(1);
    }

    /// Step the active slot's piece forwards or backwards
    fn cycle_piece(&mut self, forward: bool) {
        let Some(column) = self.current_tab.column() else {
            return;
        };
        let slot = self.view(column).active_slot;
        let count = self.slot_candidates(column, slot).len();
        if count == 0 {
            return;
        }

        let view = &mut self.views[column.index()];
        let Some(index) = view.piece_index.get_mut(slot) else {
            return;
        };
        *index = if forward {
            (*index + 1) % count
        } else {
            (*index + count - 1) % count
        };
        self.refresh_column(column);
    }

    pub fn on_up(&mut self) {
        match self.current_tab.column() {
            Some(column) => {
                let view = &mut self.views[column.index()];
                view.cursor = view.cursor.saturating_sub(1);
            }
            None => self.compare_scroll = self.compare_scroll.saturating_sub(1),
        }
    }

    pub fn on_down(&mut self) {
        match self.current_tab.column() {
            Some(column) => {
                let count = self.cursor_cells(column).len();
                let view = &mut self.views[column.index()];
                if view.cursor < count.saturating_sub(1) {
                    view.cursor += 1;
                }
            }
            None if self.current_tab == Tab::Compare => {
                let last = self.session.comparison_rows().len().saturating_sub(1);
                self.compare_scroll = (self.compare_scroll + 1).min(last);
            }
            None => {}
        }
    }

    pub fn on_left(&mut self) {
        self.cycle_piece(false);
    }

    pub fn on_right(&mut self) {
        self.cycle_piece(true);
    }

    /// Toggle the upgrade under the cursor
    pub fn toggle_current(&mut self) {
        let Some(column) = self.current_tab.column() else {
            return;
        };
        let Some(cell) = self.cursor_cell(column) else {
            return;
        };

        match self
            .session
            .toggle_upgrade(column, Some(cell.piece.as_str()), &cell.upgrade)
        {
            Ok(outcome) => {
                let verb = if outcome.selected { "Selected" } else { "Removed" };
                self.log(format!(
                    "{} {} in column {} (upgrade cost {})",
                    verb,
                    cell.upgrade,
                    column.name(),
                    outcome.cost
                ));
                self.availability[column.index()] = outcome.availability;
            }
            Err(refusal) => self.log(format!("Column {}: {}", column.name(), refusal)),
        }
    }

    fn log(&mut self, message: String) {
        self.messages.push(message);
        if self.messages.len() > MAX_MESSAGES {
            self.messages.remove(0);
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use armor_core::UpgradeStatus;

    const SAMPLE: &str = r#"[
        { "id": "suit", "name": "Suit", "type": "full body", "thermal": 2, "physical": 3,
          "upgrades": [
            { "id": "Suit_1_1",
              "Values": { "UpgradeTargetPart": "EUpgradeTargetPartType::Body", "Cost": 50 },
              "BlockingUpgradePrototypeSIDs": ["Suit_1_2"],
              "effects": [{ "effectedStat": "thermal", "isPercent": true, "max": 10 }] },
            { "id": "Suit_1_2",
              "Values": { "UpgradeTargetPart": "EUpgradeTargetPartType::Body", "Cost": 30 } }
          ] },
        { "id": "helm", "name": "Helm", "type": "head", "psi": 2 },
        { "id": "helm2", "name": "Helm II", "type": "head", "psi": 3 },
        { "id": "vest", "name": "Vest", "type": "chest", "physical": 2 }
    ]"#;

    fn app() -> App {
        let dataset = Dataset::from_json_str(SAMPLE).unwrap();
        App::with_dataset(dataset, DisplayConfig::default())
    }

    #[test]
    fn test_initial_columns() {
        let app = app();
        assert_eq!(app.session.pieces(Column::A).len(), 1);
        assert_eq!(app.session.pieces(Column::B).len(), 2);
        assert!(!app.session.comparison_rows().is_empty());
    }

    #[test]
    fn test_tab_navigation() {
        let mut app = app();
        app.next_tab();
        assert_eq!(app.current_tab, Tab::ColumnA);
        app.prev_tab();
        app.prev_tab();
        assert_eq!(app.current_tab, Tab::Help);
        app.set_tab(2);
        assert_eq!(app.current_tab, Tab::ColumnB);
    }

    #[test]
    fn test_toggle_under_cursor_and_refusal() {
        let mut app = app();
        app.set_tab(1);

        app.toggle_current();
        assert_eq!(app.session.total_cost(Column::A), 50);
        assert!(matches!(
            app.availability(Column::A).status_of("Suit_1_2"),
            Some(UpgradeStatus::Blocked { .. })
        ));

        app.on_down();
        app.toggle_current();
        assert_eq!(app.session.selection(Column::A).len(), 1);
        assert!(app.messages.last().unwrap().contains("blocked"));
    }

    #[test]
    fn test_cycle_piece_clears_selection() {
        let mut app = app();
        app.set_tab(2);
        assert_eq!(app.session.pieces(Column::B)[0].id, "helm");

        app.on_right();
        assert_eq!(app.session.pieces(Column::B)[0].id, "helm2");
        app.on_right();
        assert_eq!(app.session.pieces(Column::B)[0].id, "helm");

        app.switch_slot();
        app.on_left();
        assert_eq!(app.session.pieces(Column::B)[1].id, "vest");
    }

    #[test]
    fn test_compare_scroll_stops_at_last_row() {
        let mut app = app();
        let rows = app.session.comparison_rows().len();
        assert!(rows > 1);

        for _ in 0..rows + 10 {
            app.on_down();
        }
        assert_eq!(app.compare_scroll, rows - 1);

        app.on_up();
        assert_eq!(app.compare_scroll, rows - 2);
    }

    #[test]
    fn test_cycle_mode() {
        let mut app = app();
        app.set_tab(1);
        app.cycle_mode();
        assert_eq!(app.view(Column::A).mode, ColumnMode::HeadChest);
        assert_eq!(app.session.pieces(Column::A).len(), 2);
        app.cycle_mode();
        assert_eq!(app.view(Column::A).mode, ColumnMode::Chest);
        assert_eq!(app.session.pieces(Column::A)[0].id, "vest");
    }
}
