pub mod batch;
pub mod calc;
pub mod rates;
pub mod schema;
pub mod share;

use crate::core::{parse_property_value, CalculationResult, Program, RateEngine, RateSchedule};
use anyhow::Context;
use clap::Args;
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Build the engine from a JSON rate schedule, or the built-in Victoria 2025 rates.
pub fn load_engine(rates: Option<&Path>) -> anyhow::Result<RateEngine> {
    let Some(path) = rates else {
        return Ok(RateEngine::victoria_2025());
    };
    let file = File::open(path)
        .with_context(|| format!("Failed to open rate schedule {}", path.display()))?;
    let schedule = RateSchedule::read_json(BufReader::new(file))
        .with_context(|| format!("Failed to parse rate schedule {}", path.display()))?;
    log::info!("Loaded {} rates from {}", schedule.jurisdiction, path.display());
    let engine = RateEngine::from_schedule(schedule)?;
    Ok(engine)
}

/// A property purchase as entered on the command line.
#[derive(Args, Debug, Clone)]
pub struct PurchaseArgs {
    /// Property value in AUD (e.g. 600000 or "$600,000")
    #[arg(allow_hyphen_values = true)]
    value: String,

    /// Buyer is a first home buyer
    #[arg(short, long)]
    first_home_buyer: bool,

    /// Property will be the buyer's principal place of residence
    #[arg(short, long)]
    residence: bool,
}

impl PurchaseArgs {
    pub fn calculate(&self, engine: &RateEngine) -> anyhow::Result<CalculationResult> {
        let value = parse_property_value(&self.value).context("Please enter a valid property value")?;
        let result = engine.calculate(value, self.first_home_buyer, self.residence)?;
        Ok(result)
    }

    pub fn first_home_buyer(&self) -> bool {
        self.first_home_buyer
    }

    pub fn residence(&self) -> bool {
        self.residence
    }
}

/// Flat, display-ready row of a batch calculation, echoing the input flags.
#[derive(Debug, Clone, Serialize)]
pub struct ResultRow {
    pub property_value: String,
    pub first_home_buyer: bool,
    pub principal_residence: bool,
    pub stamp_duty: String,
    pub titles_office_fee: String,
    pub total: String,
    pub program: Program,
    pub savings: String,
    pub description: Option<String>,
}

impl ResultRow {
    pub fn new(result: &CalculationResult, first_home_buyer: bool, principal_residence: bool) -> Self {
        ResultRow {
            property_value: format!("{:.2}", result.property_value),
            first_home_buyer,
            principal_residence,
            stamp_duty: format!("{:.2}", result.duty_payable),
            titles_office_fee: format!("{:.2}", result.registration_fee),
            total: format!("{:.2}", result.total),
            program: result.applied_program,
            savings: format!("{:.2}", result.savings),
            description: result.program_description.clone(),
        }
    }
}

/// Heading used when a program is shown alongside a result.
pub fn program_heading(program: Program) -> Option<&'static str> {
    match program {
        Program::None => None,
        Program::Exemption => Some("Exemption Applied"),
        Program::Concession => Some("Concession Applied"),
        Program::ResidenceDiscount => Some("Discount Applied"),
    }
}

pub fn disclaimer(jurisdiction: &str) -> String {
    format!(
        "This calculator provides estimates based on {jurisdiction} government rates. \
         Actual fees may vary. Please consult with a conveyancer or solicitor for precise calculations."
    )
}
