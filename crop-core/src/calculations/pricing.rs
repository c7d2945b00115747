//! Sale price and market comparison for a harvested crop.
//!
//! Given the total production cost, quantity and desired margin, the
//! calculator derives the price per kilogram the farmer has to ask for,
//! then compares the harvest's value against the crop's minimum support
//! price (MSP) and the market price in every state that reports one.
//!
//! # Derivation
//!
//! | Step | Value |
//! |------|-------|
//! | 1 | cost per kg = total cost / quantity |
//! | 2 | required price per kg = cost per kg × (1 + profit % / 100) |
//! | 3 | total revenue = required price per kg × quantity |
//! | 4 | MSP per kg = MSP per quintal / 100 (0 when the crop has no MSP) |
//! | 5 | revenue per state = state price per quintal / 100 × quantity |
//! | 6 | best state = highest revenue, earliest listed state on ties |
//! | 7 | top states = three highest revenues, listing order on ties |
//!
//! Intermediate values keep full precision; results are rounded half-up to
//! two decimal places when the [`CalculationResult`] is assembled.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use rust_decimal_macros::dec;
//! use crop_core::calculations::PricingCalculator;
//! use crop_core::models::{
//!     CalculationRequest, MspTable, ReferenceData, SelectedStateRevenue, StatePriceTable,
//!     StatePrices,
//! };
//!
//! let mut msp = MspTable::new();
//! msp.insert("Wheat", dec!(2585));
//!
//! let mut wheat = StatePrices::new();
//! wheat.insert("Punjab", Some(dec!(2700)));
//! let mut state_prices = StatePriceTable::new();
//! state_prices.insert("Wheat", wheat);
//!
//! let calculator = PricingCalculator::new(Arc::new(ReferenceData::new(msp, state_prices)));
//! let result = calculator
//!     .calculate(&CalculationRequest {
//!         crop: "Wheat".to_string(),
//!         total_cost: dec!(10000),
//!         total_quantity_kg: dec!(500),
//!         profit_percent: dec!(10),
//!         selected_state: Some("Punjab".to_string()),
//!     })
//!     .unwrap();
//!
//! assert_eq!(result.cost_per_kg, dec!(20.00));
//! assert_eq!(result.required_price_per_kg, dec!(22.00));
//! assert_eq!(result.total_revenue, dec!(11000.00));
//! assert_eq!(result.msp_per_kg, dec!(25.85));
//! assert_eq!(result.selected_state_price_per_kg, Some(dec!(27.00)));
//! assert_eq!(
//!     result.selected_state_revenue,
//!     Some(SelectedStateRevenue::Revenue(dec!(13500.00)))
//! );
//! ```

use std::sync::Arc;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, warn};

use crate::calculations::common::{per_kg, round_half_up};
use crate::models::{
    CalculationRequest, CalculationResult, ReferenceData, SaleAdvice, SelectedStateRevenue,
    StatePrices, StateRevenue,
};

/// Number of states reported in [`CalculationResult::top_states`].
pub const TOP_STATES_LIMIT: usize = 3;

/// Errors that can occur during a pricing calculation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PricingError {
    /// A request value is outside its valid range.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The quantity is zero, so no per-kg figure exists.
    #[error("division error: total quantity must be nonzero")]
    DivisionError,
}

/// Pricing calculator bound to a set of reference tables.
///
/// The tables are shared, so cloning a calculator is cheap and clones may
/// be used from any number of threads.
#[derive(Debug, Clone)]
pub struct PricingCalculator {
    reference: Arc<ReferenceData>,
}

impl PricingCalculator {
    pub fn new(reference: Arc<ReferenceData>) -> Self {
        Self { reference }
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    /// Runs the full calculation for one request.
    ///
    /// Unknown crops and states are not errors: a crop without an MSP gets
    /// an MSP of zero, and a crop without market data gets no state
    /// revenues and [`SaleAdvice::NoData`].
    ///
    /// # Errors
    ///
    /// - [`PricingError::DivisionError`] if the quantity is zero.
    /// - [`PricingError::InvalidInput`] if the cost or quantity is negative,
    ///   the profit percent is below -100, or a value overflows.
    pub fn calculate(
        &self,
        request: &CalculationRequest,
    ) -> Result<CalculationResult, PricingError> {
        validate(request)?;
        let quantity = request.total_quantity_kg;

        // Steps 1-3: cost side
        let cost_per_kg = self.cost_per_kg(request.total_cost, quantity)?;
        let required_price_per_kg = self.required_price_per_kg(cost_per_kg, request.profit_percent)?;
        let total_revenue = checked_mul(required_price_per_kg, quantity, "total revenue")?;

        debug!(
            crop = %request.crop,
            cost_per_kg = %cost_per_kg,
            required_price_per_kg = %required_price_per_kg,
            total_revenue = %total_revenue,
            "derived cost-side figures"
        );

        // Step 4: MSP
        let msp_per_kg = self.msp_per_kg(&request.crop);

        // Step 5: market side
        let state_prices = self.state_prices(&request.crop);
        let state_revenues = self.state_revenues(&state_prices, quantity)?;

        let selected_state = request
            .selected_state
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let selected_state_price_per_kg = selected_state
            .and_then(|state| state_prices.price(state))
            .map(per_kg);
        let selected_state_revenue =
            selected_state.map(|state| self.selected_state_revenue(state, &state_revenues));

        // Steps 6-7: ranking
        let best_state = best_state(&state_revenues).map(|s| s.state.clone());
        let advice = advice(selected_state, best_state.as_deref(), &state_revenues);
        let top_states = top_states(&state_revenues);

        Ok(CalculationResult {
            cost_per_kg: round_half_up(cost_per_kg),
            required_price_per_kg: round_half_up(required_price_per_kg),
            total_revenue: round_half_up(total_revenue),
            msp_per_kg: round_half_up(msp_per_kg),
            selected_state_price_per_kg: selected_state_price_per_kg.map(round_half_up),
            selected_state_revenue,
            state_prices,
            state_revenues,
            best_state,
            advice,
            top_states,
        })
    }

    /// Production cost of one kilogram (step 1).
    fn cost_per_kg(
        &self,
        total_cost: Decimal,
        quantity: Decimal,
    ) -> Result<Decimal, PricingError> {
        if quantity.is_zero() {
            return Err(PricingError::DivisionError);
        }
        total_cost
            .checked_div(quantity)
            .ok_or_else(|| overflow("cost per kg"))
    }

    /// Price per kilogram that covers cost plus the desired margin (step 2).
    fn required_price_per_kg(
        &self,
        cost_per_kg: Decimal,
        profit_percent: Decimal,
    ) -> Result<Decimal, PricingError> {
        let markup = Decimal::ONE + profit_percent / Decimal::ONE_HUNDRED;
        checked_mul(cost_per_kg, markup, "required price per kg")
    }

    /// MSP converted to a per-kg figure (step 4).
    fn msp_per_kg(
        &self,
        crop: &str,
    ) -> Decimal {
        match self.reference.msp.get(crop) {
            Some(msp) => per_kg(msp),
            None => {
                warn!(crop = %crop, "crop has no minimum support price; using 0");
                Decimal::ZERO
            }
        }
    }

    /// Market prices for the crop, empty when there is no data (step 5).
    fn state_prices(
        &self,
        crop: &str,
    ) -> StatePrices {
        match self.reference.state_prices.get(crop) {
            Some(prices) => prices.clone(),
            None => {
                warn!(crop = %crop, "crop has no state market prices");
                StatePrices::new()
            }
        }
    }

    /// Revenue for every state that reports a price, in listing order.
    fn state_revenues(
        &self,
        state_prices: &StatePrices,
        quantity: Decimal,
    ) -> Result<Vec<StateRevenue>, PricingError> {
        state_prices
            .priced()
            .map(|(state, price)| {
                let revenue = checked_mul(per_kg(price), quantity, "state revenue")?;
                Ok(StateRevenue {
                    state: state.to_string(),
                    revenue: round_half_up(revenue),
                })
            })
            .collect()
    }

    fn selected_state_revenue(
        &self,
        selected_state: &str,
        state_revenues: &[StateRevenue],
    ) -> SelectedStateRevenue {
        match state_revenues.iter().find(|r| r.state == selected_state) {
            Some(r) => SelectedStateRevenue::Revenue(r.revenue),
            None => {
                warn!(
                    state = %selected_state,
                    "selected state has no market price for this crop"
                );
                SelectedStateRevenue::Unavailable
            }
        }
    }
}

/// Rejects requests whose values make no sense for a sale.
fn validate(request: &CalculationRequest) -> Result<(), PricingError> {
    if request.total_cost < Decimal::ZERO {
        return Err(PricingError::InvalidInput(format!(
            "cost must not be negative, got {}",
            request.total_cost
        )));
    }
    if request.total_quantity_kg < Decimal::ZERO {
        return Err(PricingError::InvalidInput(format!(
            "quantity must not be negative, got {}",
            request.total_quantity_kg
        )));
    }
    if request.profit_percent < -Decimal::ONE_HUNDRED {
        return Err(PricingError::InvalidInput(format!(
            "profit must be at least -100 percent, got {}",
            request.profit_percent
        )));
    }
    if request.profit_percent < Decimal::ZERO {
        warn!(
            profit_percent = %request.profit_percent,
            "negative profit percent; required price is below cost"
        );
    }
    Ok(())
}

/// Highest revenue, keeping the earliest listed state on ties.
fn best_state(state_revenues: &[StateRevenue]) -> Option<&StateRevenue> {
    state_revenues.iter().fold(None, |best, candidate| match best {
        Some(current) if current.revenue >= candidate.revenue => Some(current),
        _ => Some(candidate),
    })
}

fn advice(
    selected_state: Option<&str>,
    best_state: Option<&str>,
    state_revenues: &[StateRevenue],
) -> SaleAdvice {
    let Some(best) = best_state else {
        return SaleAdvice::NoData;
    };
    let best = best.to_string();

    match selected_state {
        None => SaleAdvice::BestState { best },
        Some(selected) if !state_revenues.iter().any(|r| r.state == selected) => {
            SaleAdvice::SelectedUnavailable {
                selected: selected.to_string(),
                best,
            }
        }
        Some(selected) if selected == best => SaleAdvice::GoodChoice {
            selected: selected.to_string(),
        },
        Some(selected) => SaleAdvice::ConsiderBest {
            selected: selected.to_string(),
            best,
        },
    }
}

/// Up to [`TOP_STATES_LIMIT`] states by revenue, highest first.
fn top_states(state_revenues: &[StateRevenue]) -> Vec<StateRevenue> {
    let mut ranked = state_revenues.to_vec();
    // stable: equal revenues keep listing order
    ranked.sort_by(|a, b| b.revenue.cmp(&a.revenue));
    ranked.truncate(TOP_STATES_LIMIT);
    ranked
}

fn checked_mul(
    a: Decimal,
    b: Decimal,
    what: &str,
) -> Result<Decimal, PricingError> {
    a.checked_mul(b).ok_or_else(|| overflow(what))
}

fn overflow(what: &str) -> PricingError {
    PricingError::InvalidInput(format!("{what} is out of range"))
}
