use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Raw form entry: a number, free text from an input box, or nothing at all.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
    #[default]
    Missing,
}

impl RawValue {
    /// Numeric reading of the entry. Unparsable or non-finite input reads as `None`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            RawValue::Number(value) => Some(*value).filter(|value| value.is_finite()),
            RawValue::Text(text) => parse_number(text),
            RawValue::Missing => None,
        }
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl From<Option<f64>> for RawValue {
    fn from(value: Option<f64>) -> Self {
        value.map(RawValue::Number).unwrap_or(RawValue::Missing)
    }
}

fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let trimmed = trimmed.strip_suffix('%').unwrap_or(trimmed).trim_end();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Declared valid range of a scored field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldRange {
    pub min: f64,
    pub max: f64,
}

impl FieldRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn clamp(self, value: f64) -> f64 {
        normalize(value, self.min, self.max)
    }

    pub fn clamp_raw(self, value: Option<f64>) -> f64 {
        normalize_raw(value, self.min, self.max)
    }
}

pub const PILLAR_RANGE: FieldRange = FieldRange::new(0.0, 5.0);
pub const NPS_RANGE: FieldRange = FieldRange::new(-100.0, 100.0);
pub const SATISFACTION_RANGE: FieldRange = FieldRange::new(0.0, 10.0);
pub const PERCENT_RANGE: FieldRange = FieldRange::new(0.0, 100.0);
pub const MINUTES_RANGE: FieldRange = FieldRange::new(0.0, f64::MAX);
pub const UNBOUNDED_RANGE: FieldRange = FieldRange::new(f64::MIN, f64::MAX);
pub const COUNT_RANGE: FieldRange = FieldRange::new(0.0, u32::MAX as f64);
pub const FEATURE_RATING_RANGE: FieldRange = FieldRange::new(0.0, 5.0);
pub const SCORE_RANGE: FieldRange = FieldRange::new(0.0, 10.0);

/// Clamp `raw` into `[min, max]`.
///
/// Reversed bounds are reordered and a NaN bound leaves that side open. NaN input is treated as
/// missing and resolves to the lowest valid value: zero when the range contains it, otherwise the
/// lower bound.
pub fn normalize(raw: f64, min: f64, max: f64) -> f64 {
    normalize_raw(Some(raw).filter(|value| !value.is_nan()), min, max)
}

/// Same as [`normalize`] for entries that may be absent altogether.
pub fn normalize_raw(raw: Option<f64>, min: f64, max: f64) -> f64 {
    let (lo, hi) = ordered_bounds(min, max);
    match raw {
        Some(value) => value.max(lo).min(hi),
        None if lo > 0.0 || hi < 0.0 => lo,
        None => 0.0,
    }
}

/// Serde reader for a scored field entered by hand.
///
/// Numbers and numeric text pass through; null or unparsable text becomes NaN, which the scorers
/// resolve to the field's lowest valid value.
pub(crate) fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = RawValue::deserialize(deserializer)?;
    Ok(raw.as_number().unwrap_or(f64::NAN))
}

/// Serde reader for a whole-number count. Fractions round, negatives and garbage read as 0.
pub(crate) fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = RawValue::deserialize(deserializer)?;
    Ok(COUNT_RANGE.clamp_raw(raw.as_number().map(f64::round)) as u32)
}

/// Serde reader for feature ratings keyed by feature name, read like [`lenient_number`].
pub(crate) fn lenient_ratings<'de, D>(deserializer: D) -> Result<BTreeMap<String, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, RawValue>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(feature, value)| (feature, value.as_number().unwrap_or(f64::NAN)))
        .collect())
}

fn ordered_bounds(min: f64, max: f64) -> (f64, f64) {
    let lo = if min.is_nan() { f64::NEG_INFINITY } else { min };
    let hi = if max.is_nan() { f64::INFINITY } else { max };
    if lo <= hi {
        (lo, hi)
    } else {
        (hi, lo)
    }
}
