pub mod api;
pub mod calculations;
pub mod models;

pub use calculations::{PricingCalculator, PricingError};
pub use models::*;
