use std::fs::File;
use std::path::{Path, PathBuf};

use crop_core::ReferenceData;
use thiserror::Error;
use tracing::{info, warn};

use crate::msp::{MspLoadError, MspLoader, builtin_msp_table};
use crate::state_prices::{StatePriceLoadError, StatePriceLoader};

/// Errors that can occur while assembling [`ReferenceData`].
#[derive(Debug, Error)]
pub enum ReferenceLoadError {
    #[error("cannot open MSP file '{path}': {source}")]
    MspFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid MSP file '{path}': {source}")]
    Msp {
        path: PathBuf,
        #[source]
        source: MspLoadError,
    },

    #[error(transparent)]
    StatePrices(#[from] StatePriceLoadError),
}

/// Where the reference tables come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceSources {
    /// JSON file with state-wise market prices.
    pub state_prices: PathBuf,
    /// Optional CSV overriding the built-in MSP table.
    pub msp: Option<PathBuf>,
}

/// Loads both reference tables. Call once at start-up.
pub fn load_reference_data(sources: &ReferenceSources) -> Result<ReferenceData, ReferenceLoadError> {
    let msp = match &sources.msp {
        Some(path) => load_msp_file(path)?,
        None => builtin_msp_table(),
    };
    let state_prices = StatePriceLoader::load_from_file(&sources.state_prices)?;

    let data = ReferenceData::new(msp, state_prices);
    let report = CoverageReport::from_reference(&data);
    info!(
        msp_crops = data.msp.len(),
        priced_crops = data.state_prices.len(),
        states = report.states,
        "loaded reference data"
    );
    for crop in &report.crops_without_prices {
        warn!(crop = %crop, "crop has an MSP but no state price data");
    }
    for crop in &report.crops_without_msp {
        warn!(crop = %crop, "crop has state price data but no MSP");
    }

    Ok(data)
}

fn load_msp_file(path: &Path) -> Result<crop_core::MspTable, ReferenceLoadError> {
    let file = File::open(path).map_err(|source| ReferenceLoadError::MspFile {
        path: path.to_path_buf(),
        source,
    })?;
    MspLoader::load(file).map_err(|source| ReferenceLoadError::Msp {
        path: path.to_path_buf(),
        source,
    })
}

/// Summary of how well the two reference tables line up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverageReport {
    pub msp_crops: usize,
    pub priced_crops: usize,
    /// Distinct states across all crops.
    pub states: usize,
    /// State entries listed with a `null` price.
    pub null_prices: usize,
    pub crops_without_prices: Vec<String>,
    pub crops_without_msp: Vec<String>,
}

impl CoverageReport {
    pub fn from_reference(data: &ReferenceData) -> Self {
        let crops_without_prices = data
            .msp
            .iter()
            .filter(|e| data.state_prices.get(&e.crop).is_none())
            .map(|e| e.crop.clone())
            .collect();
        let crops_without_msp = data
            .state_prices
            .iter()
            .filter(|(crop, _)| !data.msp.contains(crop))
            .map(|(crop, _)| crop.to_string())
            .collect();
        let null_prices = data
            .state_prices
            .iter()
            .map(|(_, prices)| prices.iter().filter(|p| p.price.is_none()).count())
            .sum();

        Self {
            msp_crops: data.msp.len(),
            priced_crops: data.state_prices.len(),
            states: data.all_states().len(),
            null_prices,
            crops_without_prices,
            crops_without_msp,
        }
    }

    /// `true` when every crop appears in both tables.
    pub fn is_complete(&self) -> bool {
        self.crops_without_prices.is_empty() && self.crops_without_msp.is_empty()
    }
}
