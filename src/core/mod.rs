pub mod config;
pub mod engine;
pub mod error;
pub mod rates;

// Flat public surface for the rate engine.
pub use config::RateSchedule;
pub use engine::{parse_property_value, CalculationResult, Program, RateEngine};
pub use rates::{BracketMode, RateTable};
