use std::collections::HashSet;
use std::io::Read;

use crop_core::MspTable;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading MSP data.
#[derive(Debug, Error)]
pub enum MspLoadError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("row {row}: crop name is empty")]
    EmptyCrop { row: usize },

    #[error("row {row}: MSP for '{crop}' must not be negative, got {msp}")]
    NegativeMsp {
        row: usize,
        crop: String,
        msp: Decimal,
    },

    #[error("row {row}: crop '{crop}' is listed more than once")]
    DuplicateCrop { row: usize, crop: String },
}

impl From<csv::Error> for MspLoadError {
    fn from(err: csv::Error) -> Self {
        MspLoadError::CsvParse(err.to_string())
    }
}

/// Minimum support prices announced for the current season, Rs. per quintal.
const BUILTIN_MSP: [(&str, Decimal); 22] = [
    ("Bajra", dec!(2775)),
    ("Barley", dec!(1980)),
    ("Jowar", dec!(3699)),
    ("Maize", dec!(2400)),
    ("Paddy (Common)", dec!(2369)),
    ("Ragi", dec!(4886)),
    ("Wheat", dec!(2585)),
    ("Cotton", dec!(7710)),
    ("Copra", dec!(12027)),
    ("Groundnut", dec!(7263)),
    ("Mustard", dec!(6200)),
    ("Sesamum", dec!(9846)),
    ("Soyabean", dec!(5328)),
    ("Arhar", dec!(8000)),
    ("Gram", dec!(5875)),
    ("Urad", dec!(7800)),
    ("Moong", dec!(8768)),
    ("Masur", dec!(7000)),
    ("Safflower", dec!(6540)),
    ("Onion", dec!(1499.98)),
    ("Potato", dec!(783.36)),
    ("Tomato", dec!(3139.63)),
];

/// The MSP table compiled into the binary, used when no CSV is configured.
pub fn builtin_msp_table() -> MspTable {
    BUILTIN_MSP
        .iter()
        .map(|(crop, msp)| (crop.to_string(), *msp))
        .collect()
}

/// A single record from an MSP CSV file.
///
/// - `crop`: crop name exactly as used in requests (e.g. `Paddy (Common)`)
/// - `msp_per_quintal`: minimum support price per 100 kg
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct MspRecord {
    pub crop: String,
    pub msp_per_quintal: Decimal,
}

/// Loader for MSP tables stored as CSV.
///
/// ```
/// use crop_data::MspLoader;
/// use rust_decimal_macros::dec;
///
/// let csv = "crop,msp_per_quintal\nWheat,2585\nPotato,783.36\n";
/// let table = MspLoader::load(csv.as_bytes()).unwrap();
///
/// assert_eq!(table.get("Potato"), Some(dec!(783.36)));
/// ```
pub struct MspLoader;

impl MspLoader {
    /// Parse MSP records from a CSV reader, validating each row.
    ///
    /// Whitespace around cells is ignored. Rows are returned in file order.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<MspRecord>, MspLoadError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();
        let mut seen = HashSet::new();

        for (index, result) in csv_reader.deserialize().enumerate() {
            let record: MspRecord = result?;
            let row = index + 1;

            if record.crop.is_empty() {
                return Err(MspLoadError::EmptyCrop { row });
            }
            if record.msp_per_quintal < Decimal::ZERO {
                return Err(MspLoadError::NegativeMsp {
                    row,
                    crop: record.crop,
                    msp: record.msp_per_quintal,
                });
            }
            if !seen.insert(record.crop.clone()) {
                return Err(MspLoadError::DuplicateCrop {
                    row,
                    crop: record.crop,
                });
            }
            records.push(record);
        }

        Ok(records)
    }

    /// Parse a CSV reader straight into an [`MspTable`].
    pub fn load<R: Read>(reader: R) -> Result<MspTable, MspLoadError> {
        let records = Self::parse(reader)?;
        Ok(records
            .into_iter()
            .map(|r| (r.crop, r.msp_per_quintal))
            .collect())
    }
}
