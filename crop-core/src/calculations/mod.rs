//! Pricing calculations for crop sales.
//!
//! This module provides the sale price derivation and the state market
//! comparison, plus the rounding and unit helpers they share.

pub mod common;
pub mod pricing;

pub use pricing::{PricingCalculator, PricingError, TOP_STATES_LIMIT};
