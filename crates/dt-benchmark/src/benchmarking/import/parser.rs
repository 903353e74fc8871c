use super::mapping::normalize_name;
use super::MetricImportError;
use crate::benchmarking::normalizer::RawValue;
use serde::{Deserialize, Deserializer};
use std::io::Read;

#[derive(Debug)]
pub(crate) struct MetricRow {
    pub(crate) line: u64,
    pub(crate) category: String,
    pub(crate) normalized_category: String,
    pub(crate) key: String,
    pub(crate) normalized_key: String,
    pub(crate) value: RawValue,
    pub(crate) min: Option<f64>,
    pub(crate) max: Option<f64>,
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<MetricRow>, MetricImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();

    for (index, record) in csv_reader.deserialize::<CsvRow>().enumerate() {
        let row = record?;
        // Header occupies line 1.
        let line = index as u64 + 2;

        let min = parse_bound(line, "Min", row.min.as_deref())?;
        let max = parse_bound(line, "Max", row.max.as_deref())?;

        rows.push(MetricRow {
            line,
            normalized_category: normalize_name(&row.category),
            normalized_key: normalize_name(&row.key),
            category: row.category,
            key: row.key,
            value: row.value.map(RawValue::Text).unwrap_or_default(),
            min,
            max,
        });
    }

    Ok(rows)
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Category")]
    category: String,
    #[serde(rename = "Key")]
    key: String,
    #[serde(rename = "Value", default, deserialize_with = "empty_string_as_none")]
    value: Option<String>,
    #[serde(rename = "Min", default, deserialize_with = "empty_string_as_none")]
    min: Option<String>,
    #[serde(rename = "Max", default, deserialize_with = "empty_string_as_none")]
    max: Option<String>,
}

fn parse_bound(
    line: u64,
    column: &'static str,
    value: Option<&str>,
) -> Result<Option<f64>, MetricImportError> {
    match value {
        None => Ok(None),
        Some(raw) => match RawValue::from(raw).as_number() {
            Some(bound) => Ok(Some(bound)),
            None => Err(MetricImportError::InvalidBound {
                line,
                column,
                value: raw.to_string(),
            }),
        },
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
