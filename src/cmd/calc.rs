//! Calc command - stamp duty and titles office fee for one purchase

use super::{disclaimer, program_heading, PurchaseArgs};
use crate::core::{CalculationResult, RateEngine};
use crate::money::display_aud;
use clap::Args;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct CalcCommand {
    #[command(flatten)]
    purchase: PurchaseArgs,

    /// Output as JSON instead of a formatted table
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Tabled)]
struct LineItem {
    #[tabled(rename = "Item")]
    item: &'static str,
    #[tabled(rename = "Amount (AUD)")]
    amount: String,
}

impl CalcCommand {
    pub fn exec(&self, engine: &RateEngine) -> anyhow::Result<()> {
        let result = self.purchase.calculate(engine)?;
        log::debug!("{:?}", result);

        if self.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            print_result(&result, engine.jurisdiction());
        }
        Ok(())
    }
}

fn print_result(result: &CalculationResult, jurisdiction: &str) {
    println!();
    println!("STAMP DUTY ({jurisdiction})");
    println!();

    if let (Some(heading), Some(description)) = (
        program_heading(result.applied_program),
        result.program_description.as_deref(),
    ) {
        println!("{}", heading.to_uppercase());
        println!("  {description}");
        println!("  Savings: {}", display_aud(result.savings));
        println!();
    }

    let rows = vec![
        LineItem {
            item: "Property Value",
            amount: display_aud(result.property_value),
        },
        LineItem {
            item: "Stamp Duty",
            amount: display_aud(result.duty_payable),
        },
        LineItem {
            item: "Titles Office Fee",
            amount: display_aud(result.registration_fee),
        },
        LineItem {
            item: "Total Fees",
            amount: display_aud(result.total),
        },
    ];
    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
        .to_string();
    println!("{table}");
    println!();
    println!("{}", disclaimer(jurisdiction));
}
