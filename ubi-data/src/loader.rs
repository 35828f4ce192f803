use std::fs::File;
use std::io::Read;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use ubi_core::TaxBracket;

/// Errors that can occur when loading tax bracket data.
#[derive(Debug, Error)]
pub enum TaxBracketLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("cannot open bracket file: {0}")]
    Io(#[from] std::io::Error),
}

impl From<csv::Error> for TaxBracketLoaderError {
    fn from(err: csv::Error) -> Self {
        TaxBracketLoaderError::CsvParse(err.to_string())
    }
}

/// A single record from a tax brackets CSV file.
///
/// - `min_income`: lower bound of the bracket (inclusive)
/// - `max_income`: upper bound (exclusive); empty for the top bracket
/// - `base_tax`: tax accumulated by all lower brackets at `min_income`
/// - `rate`: marginal rate as a decimal (e.g. 0.325 for 32.5%)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TaxBracketRecord {
    #[serde(deserialize_with = "deserialize_decimal")]
    pub min_income: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub max_income: Option<Decimal>,
    #[serde(deserialize_with = "deserialize_decimal")]
    pub base_tax: Decimal,
    #[serde(deserialize_with = "deserialize_decimal")]
    pub rate: Decimal,
}

impl From<&TaxBracketRecord> for TaxBracket {
    fn from(record: &TaxBracketRecord) -> Self {
        TaxBracket::new(
            record.min_income,
            record.max_income,
            record.base_tax,
            record.rate,
        )
    }
}

// Parsed from the raw field text; going through serde's number path would
// round through f64.
fn deserialize_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    s.trim().parse::<Decimal>().map_err(serde::de::Error::custom)
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loader for tax bracket schedules stored as CSV.
///
/// Rows are returned in file order. Structural checks (contiguity,
/// continuity, rate range) are left to [`ubi_core::PolicyConfig::new`] so
/// that every source of brackets is validated the same way.
pub struct TaxBracketLoader;

impl TaxBracketLoader {
    /// Parse bracket records from any reader (a file, a byte slice).
    pub fn parse<R: Read>(reader: R) -> Result<Vec<TaxBracketRecord>, TaxBracketLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: TaxBracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Parse a reader straight into [`TaxBracket`]s.
    pub fn load<R: Read>(reader: R) -> Result<Vec<TaxBracket>, TaxBracketLoaderError> {
        let records = Self::parse(reader)?;
        Ok(records.iter().map(TaxBracket::from).collect())
    }

    /// Read and parse a bracket file from disk.
    pub fn load_file(path: &Path) -> Result<Vec<TaxBracket>, TaxBracketLoaderError> {
        let file = File::open(path)?;
        let brackets = Self::load(file)?;
        debug!(path = %path.display(), count = brackets.len(), "loaded tax brackets");
        Ok(brackets)
    }
}
