//! SelectionKey - identity of a selected upgrade

use crate::types::Column;
use serde::Serialize;
use std::fmt;

/// Identifies one selected upgrade: (column, owning piece, upgrade)
///
/// The piece is only recorded when the column shows more than one piece;
/// with a single piece the upgrade id alone is unambiguous.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SelectionKey {
    pub column: Column,
    pub piece: Option<String>,
    pub upgrade: String,
}

impl SelectionKey {
    pub fn new(column: Column, piece: Option<&str>, upgrade: &str) -> Self {
        SelectionKey {
            column,
            piece: piece.map(str::to_string),
            upgrade: upgrade.to_string(),
        }
    }
}

impl fmt::Display for SelectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.piece {
            Some(piece) => write!(f, "{}:{}:{}", self.column.name(), piece, self.upgrade),
            None => write!(f, "{}:{}", self.column.name(), self.upgrade),
        }
    }
}

/// Location of an upgrade cell within a column: (piece id, upgrade id)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct CellId {
    pub piece: String,
    pub upgrade: String,
}

impl CellId {
    pub fn new(piece: &str, upgrade: &str) -> Self {
        CellId {
            piece: piece.to_string(),
            upgrade: upgrade.to_string(),
        }
    }
}
