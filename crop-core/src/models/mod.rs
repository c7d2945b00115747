mod calculation;
mod reference;

pub use calculation::{
    CalculationRequest, CalculationResult, SaleAdvice, SelectedStateRevenue, StateRevenue,
};
pub use reference::{MspEntry, MspTable, ReferenceData, StatePrice, StatePriceTable, StatePrices};
