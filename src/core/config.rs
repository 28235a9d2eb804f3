use super::error::EngineError;
use super::rates::RateBracket;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::io::Read;

/// Titles office (land registration) fee: a base plus a charge per whole
/// thousand dollars of value, capped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RegistrationFeeSchedule {
    #[schemars(with = "f64")]
    pub base: Decimal,
    /// Charged for every whole $1,000 of the property value
    #[schemars(with = "f64")]
    pub per_thousand: Decimal,
    #[schemars(with = "f64")]
    pub cap: Decimal,
}

/// Scalar parameters of the engine, fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EngineConfig {
    pub registration: RegistrationFeeSchedule,
    /// Highest value eligible for principal place of residence rates
    #[schemars(with = "f64")]
    pub residence_ceiling: Decimal,
    /// First home buyers pay no duty up to and including this value
    #[schemars(with = "f64")]
    pub exemption_ceiling: Decimal,
    /// First home buyer concession phases out at this value
    #[schemars(with = "f64")]
    pub concession_ceiling: Decimal,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        let integrity = |msg: &str| Err(EngineError::ConfigurationIntegrity(msg.to_string()));
        let fee = &self.registration;
        if [fee.base, fee.per_thousand, fee.cap]
            .iter()
            .any(|amount| amount.is_sign_negative())
        {
            return integrity("registration fee amounts must not be negative");
        }
        if fee.cap < fee.base {
            return integrity("registration fee cap is below the base fee");
        }
        if self.residence_ceiling <= Decimal::ZERO || self.exemption_ceiling <= Decimal::ZERO {
            return integrity("program ceilings must be positive");
        }
        if self.concession_ceiling <= self.exemption_ceiling {
            return integrity("concession ceiling must be above the exemption ceiling");
        }
        Ok(())
    }
}

/// Complete rate configuration: both bracket tables plus the engine parameters.
///
/// This is the document accepted by `--rates`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RateSchedule {
    /// Name shown in reports, e.g. "Victoria 2025"
    pub jurisdiction: String,
    /// General rates, must cover every value
    pub standard: Vec<RateBracket>,
    /// Principal place of residence rates, must end at `config.residence_ceiling`
    pub residence: Vec<RateBracket>,
    #[serde(flatten)]
    pub config: EngineConfig,
}

impl RateSchedule {
    /// Victorian land transfer duty and titles office fees, 2025.
    pub fn victoria_2025() -> Self {
        RateSchedule {
            jurisdiction: "Victoria 2025".to_string(),
            standard: vec![
                RateBracket::marginal(dec!(0), Some(dec!(25000)), dec!(0.014), dec!(0)),
                RateBracket::marginal(dec!(25001), Some(dec!(130000)), dec!(0.024), dec!(350)),
                RateBracket::marginal(dec!(130001), Some(dec!(960000)), dec!(0.06), dec!(2870)),
                RateBracket::flat(dec!(960001), Some(dec!(2000000)), dec!(0.055)),
                RateBracket::marginal(dec!(2000001), None, dec!(0.065), dec!(110000)),
            ],
            residence: vec![
                RateBracket::marginal(dec!(0), Some(dec!(25000)), dec!(0.014), dec!(0)),
                RateBracket::marginal(dec!(25001), Some(dec!(130000)), dec!(0.024), dec!(350)),
                RateBracket::marginal(dec!(130001), Some(dec!(440000)), dec!(0.05), dec!(2870))
                    .with_note(
                        "Reduced rate of 5% (instead of 6%) for amounts between $130,001 - $440,000.",
                    ),
                RateBracket::marginal(dec!(440001), Some(dec!(550000)), dec!(0.06), dec!(18370))
                    .with_note(
                        "Special calculation: $18,370 + 6% for amounts between $440,001 - $550,000.",
                    ),
            ],
            config: EngineConfig {
                registration: RegistrationFeeSchedule {
                    base: dec!(101.50),
                    per_thousand: dec!(2.34),
                    cap: dec!(3611.00),
                },
                residence_ceiling: dec!(550000),
                exemption_ceiling: dec!(600000),
                concession_ceiling: dec!(750000),
            },
        }
    }

    pub fn read_json<R: Read>(reader: R) -> anyhow::Result<Self> {
        let schedule: RateSchedule = serde_json::from_reader(reader)?;
        Ok(schedule)
    }
}
