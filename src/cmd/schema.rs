//! Schema command - print expected input and output formats

use super::batch::BatchRecord;
use crate::core::{CalculationResult, RateSchedule};
use clap::Args;
use schemars::schema_for;

/// One CSV column, generated by `#[derive(CsvSchema)]`.
#[derive(Debug, Clone, Copy)]
pub struct CsvField {
    pub name: &'static str,
    pub required: bool,
    pub kind: &'static str,
    pub description: &'static str,
}

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format
    #[arg(value_enum, default_value = "rates-schema")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for the --rates schedule file
    RatesSchema,
    /// JSON Schema for a calculation result
    ResultSchema,
    /// CSV header row for batch input
    CsvHeader,
    /// Batch CSV column descriptions
    CsvFields,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::RatesSchema => {
                let schema = schema_for!(RateSchedule);
                println!("{}", serde_json::to_string_pretty(&schema)?);
            }
            SchemaFormat::ResultSchema => {
                let schema = schema_for!(CalculationResult);
                println!("{}", serde_json::to_string_pretty(&schema)?);
            }
            SchemaFormat::CsvHeader => println!("{}", BatchRecord::csv_header()),
            SchemaFormat::CsvFields => print_csv_fields(),
        }
        Ok(())
    }
}

fn print_csv_fields() {
    println!("Batch CSV Input Format");
    println!("======================");
    println!();
    for field in BatchRecord::csv_schema() {
        let req = if field.required { "required" } else { "optional" };
        println!(
            "{:20} ({:8}, {:7})  {}",
            field.name, req, field.kind, field.description
        );
    }
    println!();
    println!("Flags accept true/false, yes/no, y/n or 1/0; an empty cell is false");
}
