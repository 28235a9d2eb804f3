use super::config::{EngineConfig, RateSchedule};
use super::error::EngineError;
use super::rates::RateTable;
use crate::money::{cents, compact_aud};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::Serialize;
use std::str::FromStr;

const RESIDENCE_APPLIED: &str = "Principal Place of Residence rates applied.";
const RESIDENCE_FALLBACK_NOTE: &str = "Reduced rates applied for eligible brackets.";

/// Buyer program that reduced the duty, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, JsonSchema)]
pub enum Program {
    #[default]
    None,
    /// First home buyer, no duty at all
    Exemption,
    /// First home buyer, duty phased in between the two ceilings
    Concession,
    /// Principal place of residence rates
    ResidenceDiscount,
}

/// Duty outcome of a buyer program, before the registration fee is added.
///
/// Amounts are in whole cents. `standard_duty == duty_payable + savings`, and
/// a program that saves nothing is reported as [`Program::None`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DutyAssessment {
    pub standard_duty: Decimal,
    pub duty_payable: Decimal,
    pub savings: Decimal,
    pub applied_program: Program,
    pub program_description: Option<String>,
}

impl DutyAssessment {
    /// No program: the standard duty is charged.
    pub fn standard(standard_duty: Decimal) -> Self {
        let standard_duty = cents(standard_duty);
        DutyAssessment {
            standard_duty,
            duty_payable: standard_duty,
            savings: cents(Decimal::ZERO),
            applied_program: Program::None,
            program_description: None,
        }
    }

    pub fn discounted(
        standard_duty: Decimal,
        duty_payable: Decimal,
        program: Program,
        description: String,
    ) -> Self {
        let standard_duty = cents(standard_duty);
        let duty_payable = cents(duty_payable);
        let savings = standard_duty - duty_payable;
        if savings <= Decimal::ZERO {
            log::debug!("{:?} saves nothing at duty {}", program, standard_duty);
            return Self::standard(standard_duty);
        }
        DutyAssessment {
            standard_duty,
            duty_payable,
            savings,
            applied_program: program,
            program_description: Some(description),
        }
    }
}

/// Everything owed on a purchase.
///
/// Serialised as-is by `calc --json`; amounts are decimal strings in cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct CalculationResult {
    #[schemars(with = "String")]
    pub property_value: Decimal,
    #[schemars(with = "String")]
    pub duty_payable: Decimal,
    #[schemars(with = "String")]
    pub registration_fee: Decimal,
    /// `duty_payable + registration_fee`
    #[schemars(with = "String")]
    pub total: Decimal,
    pub applied_program: Program,
    pub program_description: Option<String>,
    /// Duty that would be owed with no program applied
    #[schemars(with = "String")]
    pub standard_duty: Decimal,
    /// `standard_duty - duty_payable`, never negative
    #[schemars(with = "String")]
    pub savings: Decimal,
}

impl CalculationResult {
    fn new(property_value: Decimal, assessment: DutyAssessment, registration_fee: Decimal) -> Self {
        let registration_fee = cents(registration_fee);
        CalculationResult {
            property_value,
            duty_payable: assessment.duty_payable,
            registration_fee,
            total: assessment.duty_payable + registration_fee,
            applied_program: assessment.applied_program,
            program_description: assessment.program_description,
            standard_duty: assessment.standard_duty,
            savings: assessment.savings,
        }
    }
}

/// Stamp duty and titles office fee calculator over an immutable rate schedule.
#[derive(Debug, Clone)]
pub struct RateEngine {
    jurisdiction: String,
    standard: RateTable,
    residence: RateTable,
    config: EngineConfig,
}

impl RateEngine {
    pub fn from_schedule(schedule: RateSchedule) -> Result<Self, EngineError> {
        schedule.config.validate()?;
        let standard = RateTable::unrestricted("standard", schedule.standard)?;
        let residence = RateTable::restricted(
            "residence",
            schedule.residence,
            schedule.config.residence_ceiling,
        )?;
        Ok(RateEngine {
            jurisdiction: schedule.jurisdiction,
            standard,
            residence,
            config: schedule.config,
        })
    }

    pub fn victoria_2025() -> Self {
        Self::from_schedule(RateSchedule::victoria_2025())
            .expect("built-in Victoria schedule is well formed")
    }

    pub fn jurisdiction(&self) -> &str {
        &self.jurisdiction
    }

    pub fn standard_table(&self) -> &RateTable {
        &self.standard
    }

    pub fn residence_table(&self) -> &RateTable {
        &self.residence
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The schedule this engine was built from.
    pub fn schedule(&self) -> RateSchedule {
        RateSchedule {
            jurisdiction: self.jurisdiction.clone(),
            standard: self.standard.brackets().to_vec(),
            residence: self.residence.brackets().to_vec(),
            config: self.config.clone(),
        }
    }

    /// Base fee plus the per-thousand charge on whole thousands, capped.
    pub fn compute_registration_fee(&self, value: Decimal) -> Decimal {
        let fee = &self.config.registration;
        let whole_thousands = (value / dec!(1000)).floor();
        (fee.base + whole_thousands * fee.per_thousand).min(fee.cap)
    }

    pub fn compute_residence_discount(&self, value: Decimal) -> DutyAssessment {
        let standard_duty = self.standard.compute_duty(value);
        if value > self.config.residence_ceiling {
            log::debug!(
                "{} is above the residence ceiling {}, standard rates apply",
                value,
                self.config.residence_ceiling
            );
            return DutyAssessment::standard(standard_duty);
        }

        let residence_duty = self.residence.compute_duty(value);
        let note = self
            .residence
            .lookup_bracket(value)
            .ok()
            .and_then(|bracket| bracket.note.as_deref())
            .unwrap_or(RESIDENCE_FALLBACK_NOTE);
        DutyAssessment::discounted(
            standard_duty,
            residence_duty,
            Program::ResidenceDiscount,
            format!("{RESIDENCE_APPLIED} {note}"),
        )
    }

    pub fn compute_first_home_buyer_benefit(&self, value: Decimal) -> DutyAssessment {
        let exemption_ceiling = self.config.exemption_ceiling;
        let concession_ceiling = self.config.concession_ceiling;
        let standard_duty = self.standard.compute_duty(value);

        if value <= exemption_ceiling {
            return DutyAssessment::discounted(
                standard_duty,
                Decimal::ZERO,
                Program::Exemption,
                format!(
                    "Full stamp duty exemption applied for first home buyers on properties up to {}.",
                    compact_aud(exemption_ceiling)
                ),
            );
        }

        if value <= concession_ceiling {
            let fraction = (value - exemption_ceiling) / (concession_ceiling - exemption_ceiling);
            let duty = (standard_duty * fraction).max(Decimal::ZERO);
            log::debug!("first home buyer concession fraction {} of {}", fraction, standard_duty);
            return DutyAssessment::discounted(
                standard_duty,
                duty,
                Program::Concession,
                format!(
                    "First home buyer concession applied for properties between {} and {}.",
                    compact_aud(exemption_ceiling + Decimal::ONE),
                    compact_aud(concession_ceiling)
                ),
            );
        }

        log::debug!("{} is above the concession ceiling, trying residence rates", value);
        self.compute_residence_discount(value)
    }

    /// Duty, fee and total for a purchase.
    ///
    /// First home buyer status takes precedence over residence status; a first
    /// home buyer above the concession ceiling is still assessed for residence
    /// rates.
    pub fn calculate(
        &self,
        value: Decimal,
        is_first_home_buyer: bool,
        is_residence: bool,
    ) -> Result<CalculationResult, EngineError> {
        let value = check_positive(value)?;

        let assessment = if is_first_home_buyer {
            self.compute_first_home_buyer_benefit(value)
        } else if is_residence {
            self.compute_residence_discount(value)
        } else {
            DutyAssessment::standard(self.standard.compute_duty(value))
        };
        let registration_fee = self.compute_registration_fee(value);

        Ok(CalculationResult::new(value, assessment, registration_fee))
    }
}

/// Parse user input such as `600000`, `$600,000` or `6e5` into a property value.
pub fn parse_property_value(input: &str) -> Result<Decimal, EngineError> {
    let cleaned: String = input
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',' && *c != '_' && !c.is_whitespace())
        .collect();
    let value = Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .map_err(|_| EngineError::InvalidValue(format!("'{}' is not a number", input.trim())))?;
    check_positive(value)
}

fn check_positive(value: Decimal) -> Result<Decimal, EngineError> {
    if value <= Decimal::ZERO {
        return Err(EngineError::InvalidValue(format!(
            "{value} must be greater than zero"
        )));
    }
    Ok(value)
}
