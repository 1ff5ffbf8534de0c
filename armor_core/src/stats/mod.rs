//! Stat extraction, head/chest combination and comparison rows

mod combined;
mod comparison;
mod extractor;
pub(crate) mod sheet;

pub use combined::{combine_head_chest, CombinedSheet, CombinedStat};
pub use comparison::{comparison_rows, ComparisonRow};
pub use extractor::{apply_effects, effective_stats, extract_stats, EffectiveStat};
pub use sheet::{parse_loose_number, RawStat, StatSheet};

/// Round to a fixed number of decimal places
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert!((round_to(3.14159, 1) - 3.1).abs() < f64::EPSILON);
        assert!((round_to(2.25, 0) - 2.0).abs() < f64::EPSILON);
        assert!((round_to(-1.26, 1) - -1.3).abs() < f64::EPSILON);
        assert!((round_to(7.0, 3) - 7.0).abs() < f64::EPSILON);
    }
}
