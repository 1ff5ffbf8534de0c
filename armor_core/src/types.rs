//! Core types shared across the armor comparison engine

use serde::{Deserialize, Serialize};

/// Comparison column (left = A, right = B)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Column {
    A,
    B,
}

impl Column {
    /// Get both columns in display order
    pub fn all() -> &'static [Column] {
        &[Column::A, Column::B]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Column::A => "A",
            Column::B => "B",
        }
    }

    /// Slot index used for per-column storage
    pub fn index(self) -> usize {
        match self {
            Column::A => 0,
            Column::B => 1,
        }
    }
}

/// Armor type as tagged in the dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ArmorKind {
    #[serde(rename = "head")]
    Head,
    #[serde(rename = "chest")]
    Chest,
    #[serde(rename = "full body")]
    FullBody,
    /// Any type string the dataset uses that we don't know about
    #[default]
    #[serde(other)]
    Other,
}

impl ArmorKind {
    pub fn name(&self) -> &'static str {
        match self {
            ArmorKind::Head => "head",
            ArmorKind::Chest => "chest",
            ArmorKind::FullBody => "full body",
            ArmorKind::Other => "other",
        }
    }
}

/// Which armor slots a comparison column shows
///
/// A column either shows a single full-body suit, a single head or chest
/// piece, or a head and a chest piece side by side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnMode {
    FullBody,
    HeadChest,
    Chest,
    Head,
}

impl ColumnMode {
    /// All modes in selector order
    pub fn all() -> &'static [ColumnMode] {
        &[
            ColumnMode::FullBody,
            ColumnMode::HeadChest,
            ColumnMode::Chest,
            ColumnMode::Head,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            ColumnMode::FullBody => "full body",
            ColumnMode::HeadChest => "head/chest",
            ColumnMode::Chest => "chest",
            ColumnMode::Head => "head",
        }
    }

    /// Piece kinds shown by this mode, one per slot
    pub fn piece_kinds(&self) -> &'static [ArmorKind] {
        match self {
            ColumnMode::FullBody => &[ArmorKind::FullBody],
            ColumnMode::HeadChest => &[ArmorKind::Head, ArmorKind::Chest],
            ColumnMode::Chest => &[ArmorKind::Chest],
            ColumnMode::Head => &[ArmorKind::Head],
        }
    }

    pub fn next(self) -> ColumnMode {
        let modes = ColumnMode::all();
        let idx = modes.iter().position(|m| *m == self).unwrap_or(0);
        modes[(idx + 1) % modes.len()]
    }
}
