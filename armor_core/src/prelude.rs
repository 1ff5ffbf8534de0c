//! Prelude module for convenient imports
//!
//! ```rust
//! use armor_core::prelude::*;
//! ```

// Core types
pub use crate::types::{ArmorKind, Column, ColumnMode};
pub use crate::dataset::{ArmorPiece, Dataset, Upgrade};

// Engine
pub use crate::grid::{build_zone_grids, Zone, ZoneGrids};
pub use crate::selection::{Availability, ToggleRefusal, UpgradeStatus};
pub use crate::session::ComparisonSession;

// Stats
pub use crate::effects::EffectTotals;
pub use crate::stats::{extract_stats, ComparisonRow, StatSheet};

// Config
pub use crate::config::DisplayConfig;
