//! Loader for state-wise market prices.
//!
//! ## JSON Format
//!
//! The file is a single object mapping crop names to objects that map
//! state names to a price per quintal. A `null` price means the state is
//! listed but has no figure for that crop.
//!
//! ```json
//! {
//!   "Wheat": { "Punjab": 2700, "Bihar": null, "Haryana": 2650.5 },
//!   "Maize": { "Karnataka": 2210 }
//! }
//! ```
//!
//! Crops and states keep the order they have in the file; the calculator
//! relies on that order to break revenue ties.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use crop_core::{StatePriceTable, StatePrices};
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when loading state price data.
#[derive(Debug, Error)]
pub enum StatePriceLoadError {
    #[error("cannot read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON parse error: {0}")]
    JsonParse(String),

    #[error("state price data must be a JSON object keyed by crop")]
    NotAnObject,

    #[error("prices for crop '{0}' must be a JSON object keyed by state")]
    InvalidCrop(String),

    #[error("price for '{crop}' in '{state}' must be a number or null, got {value}")]
    InvalidPrice {
        crop: String,
        state: String,
        value: String,
    },

    #[error("price for '{crop}' in '{state}' must not be negative, got {price}")]
    NegativePrice {
        crop: String,
        state: String,
        price: Decimal,
    },
}

impl From<serde_json::Error> for StatePriceLoadError {
    fn from(err: serde_json::Error) -> Self {
        StatePriceLoadError::JsonParse(err.to_string())
    }
}

/// Loader for the state price table.
pub struct StatePriceLoader;

impl StatePriceLoader {
    /// Parse a state price table from any reader.
    pub fn parse<R: Read>(reader: R) -> Result<StatePriceTable, StatePriceLoadError> {
        let value: Value = serde_json::from_reader(reader)?;
        let crops = value.as_object().ok_or(StatePriceLoadError::NotAnObject)?;

        let mut table = StatePriceTable::new();
        for (crop, states) in crops {
            let states = states
                .as_object()
                .ok_or_else(|| StatePriceLoadError::InvalidCrop(crop.clone()))?;
            table.insert(crop.as_str(), parse_crop(crop, states)?);
        }

        debug!(crops = table.len(), "parsed state price table");
        Ok(table)
    }

    /// Read and parse a state price table from disk.
    pub fn load_from_file(path: &Path) -> Result<StatePriceTable, StatePriceLoadError> {
        let file = File::open(path).map_err(|source| StatePriceLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(BufReader::new(file))
    }
}

fn parse_crop(
    crop: &str,
    states: &Map<String, Value>,
) -> Result<StatePrices, StatePriceLoadError> {
    let mut prices = StatePrices::new();
    for (state, value) in states {
        let price = match value {
            Value::Null => None,
            Value::Number(n) => Some(number_to_decimal(crop, state, n)?),
            other => {
                return Err(StatePriceLoadError::InvalidPrice {
                    crop: crop.to_string(),
                    state: state.clone(),
                    value: other.to_string(),
                });
            }
        };
        prices.insert(state.as_str(), price);
    }
    Ok(prices)
}

fn number_to_decimal(
    crop: &str,
    state: &str,
    n: &serde_json::Number,
) -> Result<Decimal, StatePriceLoadError> {
    let text = n.to_string();
    let price = text
        .parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| StatePriceLoadError::InvalidPrice {
            crop: crop.to_string(),
            state: state.to_string(),
            value: text.clone(),
        })?;

    if price < Decimal::ZERO {
        return Err(StatePriceLoadError::NegativePrice {
            crop: crop.to_string(),
            state: state.to_string(),
            price,
        });
    }
    Ok(price)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const TEST_JSON: &str = r#"{
        "Wheat": { "Punjab": 2700, "Bihar": null, "Haryana": 2650.5 },
        "Maize": { "Karnataka": 2210, "Bihar": 2150 },
        "Jute": {}
    }"#;

    #[test]
    fn test_parse_keeps_file_order() {
        let table = StatePriceLoader::parse(TEST_JSON.as_bytes()).expect("Failed to parse JSON");

        let crops: Vec<_> = table.iter().map(|(crop, _)| crop).collect();
        assert_eq!(crops, vec!["Wheat", "Maize", "Jute"]);

        let wheat = table.get("Wheat").unwrap();
        let states: Vec<_> = wheat.iter().map(|p| p.state.as_str()).collect();
        assert_eq!(states, vec!["Punjab", "Bihar", "Haryana"]);
    }

    #[test]
    fn test_parse_prices_and_nulls() {
        let table = StatePriceLoader::parse(TEST_JSON.as_bytes()).expect("Failed to parse JSON");
        let wheat = table.get("Wheat").unwrap();

        assert_eq!(wheat.get("Punjab"), Some(Some(dec!(2700))));
        assert_eq!(wheat.get("Bihar"), Some(None));
        assert_eq!(wheat.get("Haryana"), Some(Some(dec!(2650.5))));
    }

    #[test]
    fn test_parse_empty_crop_object() {
        let table = StatePriceLoader::parse(TEST_JSON.as_bytes()).expect("Failed to parse JSON");

        assert!(table.get("Jute").unwrap().is_empty());
    }

    #[test]
    fn test_parse_scientific_notation() {
        let table = StatePriceLoader::parse(r#"{"Copra": {"Kerala": 1.2e4}}"#.as_bytes())
            .expect("Failed to parse JSON");

        assert_eq!(
            table.get("Copra").unwrap().price("Kerala"),
            Some(dec!(12000))
        );
    }

    #[test]
    fn test_parse_rejects_top_level_array() {
        let err = StatePriceLoader::parse("[]".as_bytes()).expect_err("Should reject array");

        assert!(matches!(err, StatePriceLoadError::NotAnObject));
    }

    #[test]
    fn test_parse_rejects_non_object_crop() {
        let err = StatePriceLoader::parse(r#"{"Wheat": [2700]}"#.as_bytes())
            .expect_err("Should reject crop array");

        match err {
            StatePriceLoadError::InvalidCrop(crop) => assert_eq!(crop, "Wheat"),
            other => panic!("expected InvalidCrop, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_string_price() {
        let err = StatePriceLoader::parse(r#"{"Wheat": {"Punjab": "2700"}}"#.as_bytes())
            .expect_err("Should reject string price");

        assert_eq!(
            err.to_string(),
            r#"price for 'Wheat' in 'Punjab' must be a number or null, got "2700""#
        );
    }

    #[test]
    fn test_parse_rejects_negative_price() {
        let err = StatePriceLoader::parse(r#"{"Wheat": {"Punjab": -5}}"#.as_bytes())
            .expect_err("Should reject negative price");

        assert!(matches!(
            err,
            StatePriceLoadError::NegativePrice { ref crop, ref state, price }
                if crop == "Wheat" && state == "Punjab" && price == dec!(-5)
        ));
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        let err = StatePriceLoader::parse(r#"{"Wheat": "#.as_bytes())
            .expect_err("Should reject malformed JSON");

        assert!(matches!(err, StatePriceLoadError::JsonParse(_)));
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let err = StatePriceLoader::load_from_file(Path::new("/this/path/does/not/exist.json"))
            .expect_err("Should fail for missing file");

        assert!(err.to_string().contains("/this/path/does/not/exist.json"));
    }
}
