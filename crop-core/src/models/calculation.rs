use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::StatePrices;

/// Inputs for one pricing calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationRequest {
    pub crop: String,
    /// Total cost of producing the whole quantity.
    pub total_cost: Decimal,
    pub total_quantity_kg: Decimal,
    /// Desired margin over cost, in percent (10 means 10%).
    pub profit_percent: Decimal,
    pub selected_state: Option<String>,
}

/// Revenue for the state the farmer picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectedStateRevenue {
    /// Revenue at the state's market price, rounded to two places.
    Revenue(Decimal),
    /// The state has no price for this crop. Not the same as zero revenue.
    Unavailable,
}

impl SelectedStateRevenue {
    pub fn amount(&self) -> Option<Decimal> {
        match self {
            Self::Revenue(amount) => Some(*amount),
            Self::Unavailable => None,
        }
    }
}

/// Projected revenue from selling the whole quantity in one state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateRevenue {
    pub state: String,
    pub revenue: Decimal,
}

/// Recommendation comparing the selected state with the best one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaleAdvice {
    /// No state has a price for the crop.
    NoData,
    /// No state was selected.
    BestState { best: String },
    /// The selected state has no price for the crop.
    SelectedUnavailable { selected: String, best: String },
    /// The selected state is the best one.
    GoodChoice { selected: String },
    /// Another state pays more than the selected one.
    ConsiderBest { selected: String, best: String },
}

impl fmt::Display for SaleAdvice {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::NoData => write!(f, "No state price data available."),
            Self::BestState { best } => write!(f, "Best state to sell: {best}"),
            Self::SelectedUnavailable { selected, best } => write!(
                f,
                "Revenue not available for {selected}. Best state to sell: {best}"
            ),
            Self::GoodChoice { selected } => {
                write!(f, "Good choice! {selected} gives maximum revenue.")
            }
            Self::ConsiderBest { selected, best } => write!(
                f,
                "Selected state {selected} revenue is lower. Consider selling in {best} for max revenue."
            ),
        }
    }
}

/// Output of [`PricingCalculator::calculate`](crate::calculations::PricingCalculator::calculate).
///
/// Every monetary field is rounded to two decimal places; `state_prices`
/// holds the untouched per-quintal source figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub cost_per_kg: Decimal,
    pub required_price_per_kg: Decimal,
    pub total_revenue: Decimal,
    /// Zero when the crop has no MSP.
    pub msp_per_kg: Decimal,
    /// Market price per kg in the selected state, when it has one.
    pub selected_state_price_per_kg: Option<Decimal>,
    /// `None` when no state was selected.
    pub selected_state_revenue: Option<SelectedStateRevenue>,
    pub state_prices: StatePrices,
    /// One entry per priced state, in source order.
    pub state_revenues: Vec<StateRevenue>,
    pub best_state: Option<String>,
    pub advice: SaleAdvice,
    /// At most three states, highest revenue first.
    pub top_states: Vec<StateRevenue>,
}
