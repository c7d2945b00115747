//! JSON request/response boundary for the pricing calculator.
//!
//! ## Request
//!
//! | Field      | Required | Type                      | Notes |
//! |------------|----------|---------------------------|-------|
//! | `crop`     | yes      | string                    | e.g. `"Wheat"` |
//! | `cost`     | yes      | number or numeric string  | total production cost |
//! | `quantity` | yes      | number or numeric string  | kilograms, must be nonzero |
//! | `profit`   | yes      | number or numeric string  | desired margin in percent |
//! | `state`    | no       | string or null            | empty means "no state selected" |
//!
//! ## Response
//!
//! On success every monetary value is a JSON number rounded to two places,
//! `states` echoes the crop's per-quintal source prices and `top_states` is
//! a list of `[state, revenue]` pairs. On failure the body is
//! `{"error": "..."}` and the caller should answer with [`CLIENT_ERROR_STATUS`].
//!
//! ```
//! use std::sync::Arc;
//!
//! use crop_core::PricingCalculator;
//! use crop_core::api::handle_json;
//! use crop_core::models::ReferenceData;
//!
//! let calculator = PricingCalculator::new(Arc::new(ReferenceData::default()));
//!
//! let response = handle_json(&calculator, r#"{"crop": "Wheat", "cost": "10000", "quantity": 500, "profit": 10}"#)
//!     .unwrap();
//! assert_eq!(response.cost_per_kg, 20.0);
//! assert_eq!(response.advice, "No state price data available.");
//!
//! let error = handle_json(&calculator, r#"{"crop": "Wheat", "cost": 1, "quantity": 0, "profit": 10}"#)
//!     .unwrap_err();
//! assert!(error.error.contains("nonzero"));
//! ```

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::calculations::{PricingCalculator, PricingError};
use crate::models::{CalculationRequest, CalculationResult, SelectedStateRevenue, StatePrices};

/// Status a transport should attach to an [`ErrorResponse`].
pub const CLIENT_ERROR_STATUS: u16 = 400;

/// Text sent in place of a revenue figure when the selected state has no price.
pub const REVENUE_UNAVAILABLE: &str = "Revenue not available for this state.";

/// Errors raised while turning a JSON body into a [`CalculationRequest`]
/// or while calculating it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("malformed JSON: {0}")]
    MalformedJson(String),

    #[error("request body must be a JSON object")]
    NotAnObject,

    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("field '{field}' must be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("field '{field}' is not a valid number: '{input}'")]
    NotNumeric { field: &'static str, input: String },

    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Parses a JSON body into a [`CalculationRequest`].
///
/// # Errors
///
/// Any [`RequestError`] other than [`RequestError::Pricing`].
pub fn parse_request(body: &str) -> Result<CalculationRequest, RequestError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| RequestError::MalformedJson(e.to_string()))?;
    request_from_value(&value)
}

/// Builds a [`CalculationRequest`] from an already parsed JSON value.
pub fn request_from_value(value: &Value) -> Result<CalculationRequest, RequestError> {
    let object = value.as_object().ok_or(RequestError::NotAnObject)?;

    let crop = match required(object, "crop")? {
        Value::String(s) => s.trim().to_string(),
        _ => {
            return Err(RequestError::WrongType {
                field: "crop",
                expected: "a string",
            });
        }
    };
    let total_cost = decimal_field(object, "cost")?;
    let total_quantity_kg = decimal_field(object, "quantity")?;
    let profit_percent = decimal_field(object, "profit")?;

    let selected_state = match object.get("state") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(Value::String(s)) => Some(s.trim().to_string()),
        Some(_) => {
            return Err(RequestError::WrongType {
                field: "state",
                expected: "a string",
            });
        }
    };

    Ok(CalculationRequest {
        crop,
        total_cost,
        total_quantity_kg,
        profit_percent,
        selected_state,
    })
}

fn required<'a>(
    object: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a Value, RequestError> {
    match object.get(field) {
        None | Some(Value::Null) => Err(RequestError::MissingField(field)),
        Some(value) => Ok(value),
    }
}

fn decimal_field(
    object: &Map<String, Value>,
    field: &'static str,
) -> Result<Decimal, RequestError> {
    match required(object, field)? {
        Value::Number(n) => parse_decimal(field, &n.to_string()),
        Value::String(s) => parse_decimal(field, s),
        _ => Err(RequestError::WrongType {
            field,
            expected: "a number or numeric string",
        }),
    }
}

/// Comma digit grouping: western (`1,234,567`) or Indian (`12,34,567`).
/// The last group always has three digits, so a decimal comma such as
/// `1,5` never matches.
static DIGIT_GROUPS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(\d{1,3}(,\d{3})+|\d{1,2}(,\d{2})*,\d{3})(\.\d+)?$")
        .expect("digit grouping pattern is valid")
});

/// Parses a number, tolerating surrounding whitespace, comma digit
/// grouping and scientific notation.
fn parse_decimal(
    field: &'static str,
    input: &str,
) -> Result<Decimal, RequestError> {
    let not_numeric = || RequestError::NotNumeric {
        field,
        input: input.to_string(),
    };

    let trimmed = input.trim();
    let normalized = if trimmed.contains(',') {
        if !DIGIT_GROUPS.is_match(trimmed) {
            return Err(not_numeric());
        }
        trimmed.replace(',', "")
    } else {
        trimmed.to_string()
    };
    normalized
        .parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(&normalized))
        .map_err(|_| not_numeric())
}

/// `selected_state_revenue` as it appears on the wire: a number, or the
/// unavailable message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SelectedRevenueBody {
    Amount(f64),
    Unavailable(String),
}

/// Successful response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResponse {
    pub cost_per_kg: f64,
    pub required_price: f64,
    pub total_revenue: f64,
    pub msp: f64,
    /// Per-kg price in the selected state. `null` only when no state is
    /// selected or it has no price; a listed price of zero is `0.0`.
    pub market: Option<f64>,
    pub selected_state_revenue: Option<SelectedRevenueBody>,
    pub states: Map<String, Value>,
    pub state_revenues: Map<String, Value>,
    pub advice: String,
    pub top_states: Vec<(String, f64)>,
}

impl From<&CalculationResult> for CalculationResponse {
    fn from(result: &CalculationResult) -> Self {
        Self {
            cost_per_kg: to_number(result.cost_per_kg),
            required_price: to_number(result.required_price_per_kg),
            total_revenue: to_number(result.total_revenue),
            msp: to_number(result.msp_per_kg),
            market: result.selected_state_price_per_kg.map(to_number),
            selected_state_revenue: result.selected_state_revenue.map(|r| match r {
                SelectedStateRevenue::Revenue(amount) => {
                    SelectedRevenueBody::Amount(to_number(amount))
                }
                SelectedStateRevenue::Unavailable => {
                    SelectedRevenueBody::Unavailable(REVENUE_UNAVAILABLE.to_string())
                }
            }),
            states: states_object(&result.state_prices),
            state_revenues: result
                .state_revenues
                .iter()
                .map(|r| (r.state.clone(), Value::from(to_number(r.revenue))))
                .collect(),
            advice: result.advice.to_string(),
            top_states: result
                .top_states
                .iter()
                .map(|r| (r.state.clone(), to_number(r.revenue)))
                .collect(),
        }
    }
}

/// Failure response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<&RequestError> for ErrorResponse {
    fn from(err: &RequestError) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}

/// Parses, calculates and renders one request.
///
/// Every failure is folded into an [`ErrorResponse`]; nothing is retried
/// and no partial result is returned.
pub fn handle_json(
    calculator: &PricingCalculator,
    body: &str,
) -> Result<CalculationResponse, ErrorResponse> {
    calculate_json(calculator, body).map_err(|err| {
        warn!(error = %err, "rejected calculation request");
        ErrorResponse::from(&err)
    })
}

fn calculate_json(
    calculator: &PricingCalculator,
    body: &str,
) -> Result<CalculationResponse, RequestError> {
    let request = parse_request(body)?;
    debug!(crop = %request.crop, state = ?request.selected_state, "handling calculation request");
    let result = calculator.calculate(&request)?;
    Ok(CalculationResponse::from(&result))
}

fn states_object(prices: &StatePrices) -> Map<String, Value> {
    prices
        .iter()
        .map(|p| {
            let value = p.price.map_or(Value::Null, |price| Value::from(to_number(price)));
            (p.state.clone(), value)
        })
        .collect()
}

fn to_number(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}
