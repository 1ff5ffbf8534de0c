//! StatSheet - Ordered stat name → raw value mapping

use serde::Serialize;

/// A stat value as it appears in the dataset
///
/// Most stats are plain numbers, but some records carry strings with units
/// such as `"13.0 kg"`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawStat {
    Number(f64),
    Text(String),
}

impl RawStat {
    /// Numeric reading of this value, if any
    pub fn as_number(&self) -> Option<f64> {
        match self {
            RawStat::Number(n) if n.is_finite() => Some(*n),
            RawStat::Number(_) => None,
            RawStat::Text(s) => parse_loose_number(s),
        }
    }

    pub fn is_numeric(&self) -> bool {
        self.as_number().is_some()
    }
}

impl From<f64> for RawStat {
    fn from(n: f64) -> Self {
        RawStat::Number(n)
    }
}

impl From<&str> for RawStat {
    fn from(s: &str) -> Self {
        RawStat::Text(s.to_string())
    }
}

/// Parse a number out of a decorated string (`"13.0 kg"` → 13.0)
///
/// Everything except digits, `.` and `-` is stripped, then the longest
/// numeric prefix of what remains is read.
pub fn parse_loose_number(s: &str) -> Option<f64> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    (1..=cleaned.len())
        .rev()
        .find_map(|end| cleaned[..end].parse::<f64>().ok())
        .filter(|n| n.is_finite())
}

/// Stats of one armor piece in their natural order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatSheet {
    entries: Vec<(String, RawStat)>,
}

impl StatSheet {
    pub fn new() -> Self {
        StatSheet::default()
    }

    /// Insert or replace a stat, keeping the position of an existing key
    pub fn insert(&mut self, key: impl Into<String>, value: RawStat) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&RawStat> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Numeric value of a stat, if present and numeric
    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(RawStat::as_number)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawStat)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, RawStat)> for StatSheet {
    fn from_iter<T: IntoIterator<Item = (String, RawStat)>>(iter: T) -> Self {
        let mut sheet = StatSheet::new();
        for (k, v) in iter {
            sheet.insert(k, v);
        }
        sheet
    }
}
