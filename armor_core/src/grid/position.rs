//! Upgrade position resolution (column + vertical slot)

use crate::dataset::Upgrade;
use serde::Serialize;

/// Vertical slot an upgrade asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum VerticalSlot {
    Top,
    Bottom,
    Unspecified,
}

impl VerticalSlot {
    /// Read an explicit vertical position field
    pub fn from_field(text: &str) -> Option<VerticalSlot> {
        if text.contains("Top") {
            Some(VerticalSlot::Top)
        } else if text.contains("Down") || text.contains("Bottom") {
            Some(VerticalSlot::Bottom)
        } else {
            None
        }
    }

    fn from_digit(digit: u32) -> VerticalSlot {
        match digit {
            1 => VerticalSlot::Top,
            2 => VerticalSlot::Bottom,
            _ => VerticalSlot::Unspecified,
        }
    }
}

/// Resolved placement request for an upgrade (before zone clamping)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UpgradePosition {
    /// 0-based column; may be negative or too large until clamped
    pub column: i64,
    pub slot: VerticalSlot,
}

/// Position encoded in an id suffix `..._<col>_<vert>` (column 1-based)
pub fn parse_position_from_id(id: &str) -> Option<(i64, VerticalSlot)> {
    let bytes = id.as_bytes();
    let n = bytes.len();
    if n < 4 {
        return None;
    }
    let tail = &bytes[n - 4..];
    if tail[0] != b'_' || tail[2] != b'_' || !tail[1].is_ascii_digit() || !tail[3].is_ascii_digit() {
        return None;
    }
    let col = (tail[1] - b'0') as i64;
    let vert = (tail[3] - b'0') as u32;
    Some((col - 1, VerticalSlot::from_digit(vert)))
}

/// Resolve where an upgrade wants to go
///
/// Explicit position fields win; the id suffix fills whatever they leave
/// open; the column defaults to 0 and the slot to unspecified.
pub fn resolve_position(upgrade: &Upgrade) -> UpgradePosition {
    let column = upgrade.horizontal_position;
    let slot = upgrade
        .vertical_position
        .as_deref()
        .and_then(VerticalSlot::from_field);

    let from_id = if column.is_none() || slot.is_none() {
        parse_position_from_id(upgrade.position_id())
    } else {
        None
    };

    UpgradePosition {
        column: column.or(from_id.map(|(c, _)| c)).unwrap_or(0),
        slot: slot
            .or(from_id.map(|(_, s)| s))
            .unwrap_or(VerticalSlot::Unspecified),
    }
}
