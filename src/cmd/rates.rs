//! Rates command - show the rate schedule the engine is using

use crate::core::{BracketMode, RateEngine, RateTable};
use crate::money::display_aud;
use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct RatesCommand {
    /// Output the schedule as JSON (usable as a --rates file)
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Tabled)]
struct BracketRow {
    #[tabled(rename = "From")]
    lower: String,
    #[tabled(rename = "To")]
    upper: String,
    #[tabled(rename = "Rate")]
    rate: String,
    #[tabled(rename = "Base")]
    base: String,
    #[tabled(rename = "Applies To")]
    mode: &'static str,
}

impl RatesCommand {
    pub fn exec(&self, engine: &RateEngine) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(&engine.schedule())?);
            return Ok(());
        }

        let config = engine.config();
        println!();
        println!("RATE SCHEDULE ({})", engine.jurisdiction());
        println!();
        print_table("General rates", engine.standard_table());
        print_table("Principal place of residence rates", engine.residence_table());

        let fee = &config.registration;
        println!("Titles office fee");
        println!(
            "  {} plus {} per whole $1,000, capped at {}",
            display_aud(fee.base),
            display_aud(fee.per_thousand),
            display_aud(fee.cap)
        );
        println!();
        println!("First home buyers");
        println!("  Exempt up to {}", display_aud(config.exemption_ceiling));
        println!("  Concession up to {}", display_aud(config.concession_ceiling));
        println!();
        Ok(())
    }
}

fn print_table(title: &str, table: &RateTable) {
    match table.ceiling() {
        Some(ceiling) => println!("{title} (up to {})", display_aud(ceiling)),
        None => println!("{title}"),
    }
    let rows: Vec<_> = table
        .brackets()
        .iter()
        .map(|bracket| BracketRow {
            lower: display_aud(bracket.lower),
            upper: bracket
                .upper
                .map_or_else(|| "and above".to_string(), display_aud),
            rate: format_percent(bracket.rate),
            base: display_aud(bracket.base),
            mode: match bracket.mode {
                BracketMode::Marginal => "excess over From",
                BracketMode::FlatRate => "entire value",
            },
        })
        .collect();
    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(0..4)).with(Alignment::right()))
        .to_string();
    println!("{table}");
    println!();
}

fn format_percent(rate: Decimal) -> String {
    format!("{}%", (rate * dec!(100)).normalize())
}
