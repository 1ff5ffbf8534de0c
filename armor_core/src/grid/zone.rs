//! Body zones, zone tables and grid shapes per armor layout

use crate::dataset::PartType;
use crate::types::ArmorKind;
use serde::Serialize;

/// Named upgrade zone on an armor piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Zone {
    // Body pieces
    Head,
    Neck,
    Shoulder,
    Chest,
    Hip,
    // Head pieces
    Crown,
    Nose,
    Chin,
    Eyebrow,
    Cheek,
}

impl Zone {
    pub fn name(&self) -> &'static str {
        match self {
            Zone::Head => "Head",
            Zone::Neck => "Neck",
            Zone::Shoulder => "Shoulder",
            Zone::Chest => "Chest",
            Zone::Hip => "Hip",
            Zone::Crown => "Crown",
            Zone::Nose => "Nose",
            Zone::Chin => "Chin",
            Zone::Eyebrow => "Eyebrow",
            Zone::Cheek => "Cheek",
        }
    }
}

/// Rows × columns of a zone grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridShape {
    pub rows: usize,
    pub cols: usize,
}

impl GridShape {
    pub const SINGLE: GridShape = GridShape { rows: 1, cols: 1 };
    pub const FULL: GridShape = GridShape { rows: 3, cols: 3 };

    pub fn capacity(&self) -> usize {
        self.rows * self.cols
    }
}

/// How a body piece treats its "Head" zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum HeadSlot {
    /// Chest pieces have no head zone at all
    Absent,
    /// Full-body suits have a single head slot
    Single,
    /// Unknown body types get the default grid
    Full,
}

/// Zone table and shape rules for a kind of armor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ZoneLayout {
    HeadPiece,
    BodyPiece { head_slot: HeadSlot },
}

impl ZoneLayout {
    pub fn for_kind(kind: ArmorKind) -> Self {
        match kind {
            ArmorKind::Head => ZoneLayout::HeadPiece,
            ArmorKind::Chest => ZoneLayout::BodyPiece {
                head_slot: HeadSlot::Absent,
            },
            ArmorKind::FullBody => ZoneLayout::BodyPiece {
                head_slot: HeadSlot::Single,
            },
            ArmorKind::Other => ZoneLayout::BodyPiece {
                head_slot: HeadSlot::Full,
            },
        }
    }

    /// Zone a part type lands in for this layout
    pub fn zone_for(&self, part: PartType) -> Zone {
        match self {
            ZoneLayout::HeadPiece => match part {
                PartType::Stock => Zone::Crown,
                PartType::Barrel => Zone::Chin,
                PartType::Handguard => Zone::Eyebrow,
                PartType::Body => Zone::Nose,
                PartType::PistolGrip => Zone::Cheek,
            },
            ZoneLayout::BodyPiece { .. } => match part {
                PartType::Stock => Zone::Head,
                PartType::Barrel => Zone::Neck,
                PartType::Handguard => Zone::Shoulder,
                PartType::Body => Zone::Chest,
                PartType::PistolGrip => Zone::Hip,
            },
        }
    }

    /// Zones of this layout in display order
    pub fn zones(&self) -> &'static [Zone] {
        match self {
            ZoneLayout::HeadPiece => &[Zone::Crown, Zone::Nose, Zone::Chin, Zone::Eyebrow, Zone::Cheek],
            ZoneLayout::BodyPiece { .. } => &[Zone::Head, Zone::Neck, Zone::Shoulder, Zone::Chest, Zone::Hip],
        }
    }

    /// Grid shape of a zone, `None` when the zone doesn't exist here
    pub fn shape(&self, zone: Zone) -> Option<GridShape> {
        if !self.zones().contains(&zone) {
            return None;
        }
        match (self, zone) {
            (ZoneLayout::HeadPiece, Zone::Crown) => Some(GridShape::SINGLE),
            (ZoneLayout::BodyPiece { head_slot }, Zone::Head) => match head_slot {
                HeadSlot::Absent => None,
                HeadSlot::Single => Some(GridShape::SINGLE),
                HeadSlot::Full => Some(GridShape::FULL),
            },
            _ => Some(GridShape::FULL),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_head_piece_shapes() {
        let layout = ZoneLayout::for_kind(ArmorKind::Head);
        assert_eq!(layout.shape(Zone::Crown), Some(GridShape::SINGLE));
        assert_eq!(layout.shape(Zone::Cheek), Some(GridShape::FULL));
        assert_eq!(layout.shape(Zone::Chest), None);
    }

    #[test]
    fn test_body_head_zone_by_kind() {
        assert_eq!(
            ZoneLayout::for_kind(ArmorKind::FullBody).shape(Zone::Head),
            Some(GridShape::SINGLE)
        );
        assert_eq!(ZoneLayout::for_kind(ArmorKind::Chest).shape(Zone::Head), None);
        assert_eq!(
            ZoneLayout::for_kind(ArmorKind::Other).shape(Zone::Head),
            Some(GridShape::FULL)
        );
        assert_eq!(
            ZoneLayout::for_kind(ArmorKind::Chest).shape(Zone::Hip),
            Some(GridShape::FULL)
        );
    }

    #[test]
    fn test_zone_tables() {
        let helmet = ZoneLayout::HeadPiece;
        assert_eq!(helmet.zone_for(PartType::Body), Zone::Nose);
        assert_eq!(helmet.zone_for(PartType::Barrel), Zone::Chin);

        let suit = ZoneLayout::for_kind(ArmorKind::FullBody);
        assert_eq!(suit.zone_for(PartType::Handguard), Zone::Shoulder);
        assert_eq!(suit.zone_for(PartType::Stock), Zone::Head);
    }
}
