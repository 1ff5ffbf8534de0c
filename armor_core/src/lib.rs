//! armor_core - Upgrade grid and stat comparison engine for armor items
//!
//! This library provides:
//! - Dataset: Lenient loading of armor records and their upgrades
//! - Grid Builder: Placement of a piece's upgrades into body-zone grids
//! - Availability: Blocking and prerequisite rules for upgrade selection
//! - Effect Aggregation: Percent and absolute bonuses per stat
//! - Stat Extraction: Ordered stat sheets, head/chest combination, comparison rows

pub mod config;
pub mod dataset;
pub mod effects;
pub mod grid;
pub mod prelude;
pub mod selection;
pub mod session;
pub mod stats;
pub mod types;

// Re-export core types for convenience
pub use config::{ConfigError, DisplayConfig};
pub use dataset::{ArmorPiece, Dataset, DatasetError, Effect, PartType, Upgrade};
pub use effects::{AdjustedStat, EffectTotals, StatModifier};
pub use grid::{build_zone_grids, Zone, ZoneGrid, ZoneGrids, ZoneLayout};
pub use selection::{Availability, SelectionKey, ToggleOutcome, ToggleRefusal, UpgradeStatus};
pub use session::ComparisonSession;
pub use stats::{extract_stats, ComparisonRow, RawStat, StatSheet};
pub use types::{ArmorKind, Column, ColumnMode};
