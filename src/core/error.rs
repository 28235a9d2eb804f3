/// Failures raised by the rate engine.
///
/// Ineligible values for a buyer program are not errors: those calculations
/// fall back to the next applicable program or to no program at all.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum EngineError {
    /// Property value is non-numeric, zero, negative or non-finite.
    #[error("invalid property value: {0}")]
    InvalidValue(String),
    /// A rate table or engine parameter does not describe a total, well-formed schedule.
    #[error("rate configuration integrity error: {0}")]
    ConfigurationIntegrity(String),
}
