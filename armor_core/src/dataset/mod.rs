//! Armor dataset loading
//!
//! The dataset is a JSON array of armor records. Whole-document problems
//! (unreadable file, invalid JSON) are errors; malformed individual fields
//! degrade to defaults so that something can always be displayed.

mod piece;
mod upgrade;

pub use piece::{ArmorPiece, META_FIELDS};
pub use upgrade::{Effect, PartType, Upgrade};

use crate::types::{ArmorKind, ColumnMode};
use piece::RawArmorPiece;
use serde_json::Value;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

/// Dataset loading error
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Failed to read dataset file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse dataset JSON: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// All armor pieces, read-only after loading
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pieces: Vec<ArmorPiece>,
}

impl Dataset {
    pub fn new(pieces: Vec<ArmorPiece>) -> Self {
        Dataset { pieces }
    }

    /// Load a dataset from a JSON file
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let content = fs::read_to_string(path)?;
        let dataset = Self::from_json_str(&content)?;
        info!(path = %path.display(), pieces = dataset.len(), "loaded armor dataset");
        Ok(dataset)
    }

    /// Parse a dataset from a JSON string
    pub fn from_json_str(content: &str) -> Result<Self, DatasetError> {
        let records: Vec<Value> = serde_json::from_str(content)?;

        let pieces = records
            .into_iter()
            .filter_map(|record| match serde_json::from_value::<RawArmorPiece>(record) {
                Ok(raw) => Some(ArmorPiece::from(raw)),
                Err(e) => {
                    warn!(error = %e, "skipping malformed armor record");
                    None
                }
            })
            .collect();

        Ok(Dataset { pieces })
    }

    pub fn pieces(&self) -> &[ArmorPiece] {
        &self.pieces
    }

    pub fn find(&self, id: &str) -> Option<&ArmorPiece> {
        self.pieces.iter().find(|p| p.id == id)
    }

    /// Pieces of one kind, in dataset order
    pub fn of_kind(&self, kind: ArmorKind) -> Vec<&ArmorPiece> {
        self.pieces.iter().filter(|p| p.kind == kind).collect()
    }

    /// Candidate pieces for every slot of a column mode
    pub fn candidates(&self, mode: ColumnMode) -> Vec<Vec<&ArmorPiece>> {
        mode.piece_kinds().iter().map(|k| self.of_kind(*k)).collect()
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        { "id": "sunrise", "name": "Sunrise Suit", "type": "full body", "thermal": 2, "physical": 2 },
        { "id": "gorka", "name": "Gorka Helmet", "type": "head", "psi": 1 },
        { "id": "vest", "name": "Berill Vest", "type": "chest", "physical": 3 },
        { "name": "missing id" }
    ]"#;

    #[test]
    fn test_parse_dataset() {
        let dataset = Dataset::from_json_str(SAMPLE).unwrap();
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.find("gorka").map(|p| p.kind), Some(ArmorKind::Head));
        assert_eq!(dataset.of_kind(ArmorKind::Chest).len(), 1);
    }

    #[test]
    fn test_candidates_per_slot() {
        let dataset = Dataset::from_json_str(SAMPLE).unwrap();
        let slots = dataset.candidates(ColumnMode::HeadChest);
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0][0].id, "gorka");
        assert_eq!(slots[1][0].id, "vest");
    }

    #[test]
    fn test_odd_records_keep_their_piece() {
        let dataset = Dataset::from_json_str(
            r#"[
                { "id": "helm", "type": "head",
                  "upgrades": [ { "id": "Helm_1_1", "blocking": null, "required": null,
                                  "values": {}, "Values": {},
                                  "effects": [ { "effectedStat": "psi", "isPercent": null, "max": 1 } ] } ],
                  "upgradeList": [] }
            ]"#,
        )
        .unwrap();

        let helm = dataset.find("helm").unwrap();
        assert_eq!(helm.upgrades.len(), 1);
        assert_eq!(helm.upgrades[0].effects.len(), 1);
    }

    #[test]
    fn test_invalid_document_is_an_error() {
        assert!(matches!(
            Dataset::from_json_str("{ not json"),
            Err(DatasetError::ParseError(_))
        ));
        assert!(Dataset::load(Path::new("/nonexistent/armor.json")).is_err());
    }
}
