use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use crop_core::PricingCalculator;
use crop_core::api::{CLIENT_ERROR_STATUS, handle_json};
use crop_data::load_reference_data;
use serde_json::{Map, Value};
use tracing::debug;

use crate::config::AppConfig;

/// Status reported alongside a successful response body.
pub const OK_STATUS: u16 = 200;

/// Fields of a calculation given as command-line flags.
///
/// Numbers are kept as text so they go through the same parsing as a
/// JSON request (`"10,000"` is accepted).
#[derive(Debug, Clone, Default, PartialEq, Eq, Args)]
pub struct CalculateArgs {
    /// Crop name, e.g. `Wheat`.
    #[arg(long)]
    pub crop: String,

    /// Total production cost.
    #[arg(long, allow_hyphen_values = true)]
    pub cost: String,

    /// Total quantity harvested, in kilograms.
    #[arg(long, allow_hyphen_values = true)]
    pub quantity: String,

    /// Desired profit margin, in percent.
    #[arg(long, allow_hyphen_values = true)]
    pub profit: String,

    /// State to compare against.
    #[arg(long)]
    pub state: Option<String>,
}

impl CalculateArgs {
    /// Builds the JSON request body these flags stand for.
    pub fn to_request_body(&self) -> String {
        let mut body = Map::new();
        body.insert("crop".to_string(), Value::from(self.crop.as_str()));
        body.insert("cost".to_string(), Value::from(self.cost.as_str()));
        body.insert("quantity".to_string(), Value::from(self.quantity.as_str()));
        body.insert("profit".to_string(), Value::from(self.profit.as_str()));
        if let Some(state) = &self.state {
            body.insert("state".to_string(), Value::from(state.as_str()));
        }
        Value::Object(body).to_string()
    }
}

/// A rendered response: the status a transport would send and the JSON text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    pub fn is_success(&self) -> bool {
        self.status == OK_STATUS
    }
}

/// Loads the reference tables named by `config` and wraps them in a calculator.
pub fn build_calculator(config: &AppConfig) -> Result<PricingCalculator> {
    let sources = config.reference_sources();
    debug!(
        state_prices = %sources.state_prices.display(),
        msp = ?sources.msp,
        "loading reference data"
    );
    let data = load_reference_data(&sources).with_context(|| {
        format!(
            "Failed to load reference data from '{}'",
            sources.state_prices.display()
        )
    })?;
    Ok(PricingCalculator::new(Arc::new(data)))
}

/// Answers one JSON request body with pretty-printed JSON.
pub fn respond(
    calculator: &PricingCalculator,
    body: &str,
) -> Result<Response> {
    let (status, rendered) = match handle_json(calculator, body) {
        Ok(response) => (OK_STATUS, serde_json::to_string_pretty(&response)),
        Err(error) => (CLIENT_ERROR_STATUS, serde_json::to_string_pretty(&error)),
    };
    Ok(Response {
        status,
        body: rendered.context("Failed to render response")?,
    })
}

pub fn list_crops(calculator: &PricingCalculator) -> Vec<String> {
    calculator
        .reference()
        .crops()
        .into_iter()
        .map(str::to_string)
        .collect()
}

pub fn list_states(calculator: &PricingCalculator) -> Vec<String> {
    calculator
        .reference()
        .all_states()
        .into_iter()
        .map(str::to_string)
        .collect()
}
