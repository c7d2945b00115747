pub mod msp;
pub mod reference;
pub mod state_prices;

pub use msp::{MspLoadError, MspLoader, MspRecord, builtin_msp_table};
pub use reference::{CoverageReport, ReferenceLoadError, ReferenceSources, load_reference_data};
pub use state_prices::{StatePriceLoadError, StatePriceLoader};
