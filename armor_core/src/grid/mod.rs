//! Upgrade grids - placement of a piece's upgrades into body-zone grids
//!
//! Placement rules:
//! - the armor layout decides which zones exist, their shape, and which
//!   zone each part-type tag lands in
//! - within a (zone, column) group, bottom entries go to row 2 and
//!   unspecified entries to row 1; a top entry goes to row 0 only when the
//!   group also has a bottom entry, otherwise it sits in the middle row
//! - rows and columns are clamped to the zone's shape
//! - a later upgrade in an occupied cell replaces the earlier one

mod position;
mod zone;

pub use position::{parse_position_from_id, resolve_position, UpgradePosition, VerticalSlot};
pub use zone::{GridShape, HeadSlot, Zone, ZoneLayout};

use crate::dataset::{ArmorPiece, Upgrade};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::trace;

/// Fixed-shape grid of optional upgrades for one zone
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneGrid {
    pub zone: Zone,
    rows: Vec<Vec<Option<Upgrade>>>,
}

impl ZoneGrid {
    /// Create an empty grid of the given shape
    pub fn empty(zone: Zone, shape: GridShape) -> Self {
        ZoneGrid {
            zone,
            rows: vec![vec![None; shape.cols]; shape.rows],
        }
    }

    pub fn rows(&self) -> &[Vec<Option<Upgrade>>] {
        &self.rows
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&Upgrade> {
        self.rows.get(row)?.get(col)?.as_ref()
    }

    pub fn shape(&self) -> GridShape {
        GridShape {
            rows: self.rows.len(),
            cols: self.rows.first().map_or(0, Vec::len),
        }
    }

    /// Number of occupied cells
    pub fn placed_count(&self) -> usize {
        self.rows.iter().flatten().filter(|c| c.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.placed_count() == 0
    }

    /// Occupied cells as (row, col, upgrade)
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, &Upgrade)> {
        self.rows.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter_map(move |(c, cell)| cell.as_ref().map(|u| (r, c, u)))
        })
    }

    /// Write an upgrade into a cell, clamping to the grid's shape
    fn place(&mut self, row: usize, column: i64, upgrade: Upgrade) {
        let row = row.min(self.rows.len().saturating_sub(1));
        let Some(cells) = self.rows.get_mut(row) else {
            return;
        };
        let max_col = cells.len().saturating_sub(1) as i64;
        let col = column.clamp(0, max_col) as usize;
        if let Some(cell) = cells.get_mut(col) {
            if let Some(previous) = cell.as_ref() {
                trace!(zone = self.zone.name(), row, col, replaced = %previous.id, by = %upgrade.id, "cell overwritten");
            }
            *cell = Some(upgrade);
        }
    }
}

/// One placed upgrade with its location
#[derive(Debug, Clone, Copy)]
pub struct PlacedCell<'a> {
    pub zone: Zone,
    pub row: usize,
    pub col: usize,
    pub upgrade: &'a Upgrade,
}

/// All zone grids of one armor piece
///
/// Zones that don't exist for the piece's layout are absent; zones that
/// exist but received no upgrades are present and empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneGrids {
    pub layout: ZoneLayout,
    grids: BTreeMap<Zone, ZoneGrid>,
}

impl ZoneGrids {
    pub fn get(&self, zone: Zone) -> Option<&ZoneGrid> {
        self.grids.get(&zone)
    }

    /// Existing grids in display order
    pub fn iter(&self) -> impl Iterator<Item = &ZoneGrid> {
        self.layout.zones().iter().filter_map(move |z| self.grids.get(z))
    }

    /// Grids with at least one upgrade, in display order
    pub fn non_empty(&self) -> impl Iterator<Item = &ZoneGrid> {
        self.iter().filter(|g| !g.is_empty())
    }

    /// Every placed upgrade in display order
    pub fn cells(&self) -> impl Iterator<Item = PlacedCell<'_>> {
        self.iter().flat_map(|grid| {
            grid.cells().map(move |(row, col, upgrade)| PlacedCell {
                zone: grid.zone,
                row,
                col,
                upgrade,
            })
        })
    }

    /// Find a placed upgrade by id
    pub fn find(&self, upgrade_id: &str) -> Option<&Upgrade> {
        self.cells()
            .map(|c| c.upgrade)
            .find(|u| u.id == upgrade_id)
    }

    pub fn zone_count(&self) -> usize {
        self.grids.len()
    }
}

/// Build the zone grids for one armor piece
pub fn build_zone_grids(piece: &ArmorPiece) -> ZoneGrids {
    let layout = ZoneLayout::for_kind(piece.kind);

    let mut grids: BTreeMap<Zone, ZoneGrid> = layout
        .zones()
        .iter()
        .filter_map(|zone| layout.shape(*zone).map(|shape| (*zone, ZoneGrid::empty(*zone, shape))))
        .collect();

    // Group by (zone, column); groups and their entries keep dataset order
    let mut groups: Vec<((Zone, i64), Vec<(&Upgrade, VerticalSlot)>)> = Vec::new();
    for upgrade in &piece.upgrades {
        let Some(part) = upgrade.part else {
            trace!(piece = %piece.id, upgrade = %upgrade.id, "dropping upgrade without target part");
            continue;
        };
        let zone = layout.zone_for(part);
        if !grids.contains_key(&zone) {
            trace!(piece = %piece.id, upgrade = %upgrade.id, zone = zone.name(), "dropping upgrade for absent zone");
            continue;
        }
        let position = resolve_position(upgrade);
        let key = (zone, position.column);
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, entries)) => entries.push((upgrade, position.slot)),
            None => groups.push((key, vec![(upgrade, position.slot)])),
        }
    }

    for ((zone, column), entries) in groups {
        let has_bottom = entries.iter().any(|(_, s)| *s == VerticalSlot::Bottom);
        let Some(grid) = grids.get_mut(&zone) else {
            continue;
        };
        for (upgrade, slot) in entries {
            let row = match slot {
                VerticalSlot::Top if has_bottom => 0,
                VerticalSlot::Top => 1,
                VerticalSlot::Bottom => 2,
                VerticalSlot::Unspecified => 1,
            };
            grid.place(row, column, upgrade.clone());
        }
    }

    ZoneGrids { layout, grids }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::PartType;
    use crate::types::ArmorKind;

    fn upgrade(id: &str, part: PartType) -> Upgrade {
        Upgrade::new(id, part)
    }

    #[test]
    fn test_chest_has_no_head_zone() {
        let piece = ArmorPiece::new("vest", "Vest", ArmorKind::Chest)
            .with_upgrade(upgrade("Vest_Head_1_1", PartType::Stock));
        let grids = build_zone_grids(&piece);

        assert!(grids.get(Zone::Head).is_none());
        assert_eq!(grids.zone_count(), 4);
        assert_eq!(grids.cells().count(), 0);
    }

    #[test]
    fn test_top_without_bottom_goes_to_middle() {
        let piece = ArmorPiece::new("suit", "Suit", ArmorKind::FullBody)
            .with_upgrade(upgrade("Suit_Chest_2_1", PartType::Body));
        let grids = build_zone_grids(&piece);

        let chest = grids.get(Zone::Chest).unwrap();
        assert_eq!(chest.get(1, 1).map(|u| u.id.as_str()), Some("Suit_Chest_2_1"));
        assert!(chest.get(0, 1).is_none());
    }

    #[test]
    fn test_top_with_bottom_sibling_stays_on_top() {
        let piece = ArmorPiece::new("suit", "Suit", ArmorKind::FullBody)
            .with_upgrade(upgrade("Suit_Chest_2_1", PartType::Body))
            .with_upgrade(upgrade("Suit_Chest_2_2", PartType::Body));
        let grids = build_zone_grids(&piece);

        let chest = grids.get(Zone::Chest).unwrap();
        assert_eq!(chest.get(0, 1).map(|u| u.id.as_str()), Some("Suit_Chest_2_1"));
        assert_eq!(chest.get(2, 1).map(|u| u.id.as_str()), Some("Suit_Chest_2_2"));
    }

    #[test]
    fn test_bottom_in_other_column_does_not_lift_top() {
        let piece = ArmorPiece::new("suit", "Suit", ArmorKind::FullBody)
            .with_upgrade(upgrade("Suit_Chest_2_1", PartType::Body))
            .with_upgrade(upgrade("Suit_Chest_3_2", PartType::Body));
        let grids = build_zone_grids(&piece);

        let chest = grids.get(Zone::Chest).unwrap();
        assert!(chest.get(1, 1).is_some());
        assert!(chest.get(2, 2).is_some());
    }

    #[test]
    fn test_single_slot_zone_clamps_position() {
        let piece = ArmorPiece::new("suit", "Suit", ArmorKind::FullBody)
            .with_upgrade(upgrade("Suit_Hood_3_2", PartType::Stock));
        let grids = build_zone_grids(&piece);

        let head = grids.get(Zone::Head).unwrap();
        assert_eq!(head.shape(), GridShape::SINGLE);
        assert_eq!(head.get(0, 0).map(|u| u.id.as_str()), Some("Suit_Hood_3_2"));
    }

    #[test]
    fn test_helmet_crown_is_single_slot() {
        let piece = ArmorPiece::new("helm", "Helm", ArmorKind::Head)
            .with_upgrade(upgrade("Helm_Crown_2_1", PartType::Stock))
            .with_upgrade(upgrade("Helm_Nose_3_2", PartType::Body));
        let grids = build_zone_grids(&piece);

        assert_eq!(grids.get(Zone::Crown).unwrap().placed_count(), 1);
        assert_eq!(
            grids.get(Zone::Nose).unwrap().get(2, 2).map(|u| u.id.as_str()),
            Some("Helm_Nose_3_2")
        );
        let order: Vec<Zone> = grids.non_empty().map(|g| g.zone).collect();
        assert_eq!(order, vec![Zone::Crown, Zone::Nose]);
    }

    #[test]
    fn test_last_write_wins() {
        let mut first = upgrade("First", PartType::Handguard);
        first.horizontal_position = Some(0);
        let mut second = upgrade("Second", PartType::Handguard);
        second.horizontal_position = Some(0);

        let piece = ArmorPiece::new("suit", "Suit", ArmorKind::FullBody)
            .with_upgrade(first)
            .with_upgrade(second);
        let grids = build_zone_grids(&piece);

        let shoulder = grids.get(Zone::Shoulder).unwrap();
        assert_eq!(shoulder.placed_count(), 1);
        assert_eq!(shoulder.get(1, 0).map(|u| u.id.as_str()), Some("Second"));
    }

    #[test]
    fn test_negative_and_large_columns_clamp() {
        let mut left = upgrade("Left", PartType::PistolGrip);
        left.horizontal_position = Some(-4);
        let mut right = upgrade("Right", PartType::PistolGrip);
        right.horizontal_position = Some(9);

        let piece = ArmorPiece::new("suit", "Suit", ArmorKind::FullBody)
            .with_upgrade(left)
            .with_upgrade(right);
        let grids = build_zone_grids(&piece);

        let hip = grids.get(Zone::Hip).unwrap();
        assert_eq!(hip.get(1, 0).map(|u| u.id.as_str()), Some("Left"));
        assert_eq!(hip.get(1, 2).map(|u| u.id.as_str()), Some("Right"));
    }

    #[test]
    fn test_unmapped_upgrades_are_dropped() {
        let mut stray = upgrade("Stray_1_1", PartType::Body);
        stray.part = None;
        let piece = ArmorPiece::new("suit", "Suit", ArmorKind::FullBody).with_upgrade(stray);

        let grids = build_zone_grids(&piece);
        assert_eq!(grids.cells().count(), 0);
        assert!(grids.find("Stray_1_1").is_none());
    }
}
