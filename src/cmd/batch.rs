//! Batch command - calculate many purchases from CSV

use super::schema::CsvField;
use super::ResultRow;
use crate::core::{parse_property_value, RateEngine};
use anyhow::Context;
use clap::Args;
use serde::{Deserialize, Deserializer};
use stampc_derive::CsvSchema;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct BatchCommand {
    /// CSV file of purchases, or "-" for stdin
    #[arg(short, long)]
    input: PathBuf,

    /// Output as JSON instead of CSV
    #[arg(long)]
    json: bool,
}

/// One purchase to calculate.
#[derive(Debug, Clone, Deserialize, CsvSchema)]
pub struct BatchRecord {
    /// Property value in AUD
    pub value: String,
    /// Buyer is a first home buyer
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub first_home_buyer: bool,
    /// Property will be the buyer's principal place of residence
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub principal_residence: bool,
}

impl BatchCommand {
    pub fn exec(&self, engine: &RateEngine) -> anyhow::Result<()> {
        let records = if self.input.as_os_str() == "-" {
            read_records(io::stdin().lock())?
        } else {
            let file = File::open(&self.input)
                .with_context(|| format!("Failed to open {}", self.input.display()))?;
            read_records(BufReader::new(file))?
        };
        log::info!("Read {} csv records", records.len());

        let rows = calculate_all(engine, &records)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&rows)?);
        } else {
            let mut wtr = csv::Writer::from_writer(io::stdout());
            for row in &rows {
                wtr.serialize(row)?;
            }
            wtr.flush()?;
        }
        Ok(())
    }
}

pub fn read_records<R: Read>(reader: R) -> anyhow::Result<Vec<BatchRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();
    for (i, result) in rdr.deserialize::<BatchRecord>().enumerate() {
        let record = result.with_context(|| format!("Invalid CSV record {}", i + 1))?;
        records.push(record);
    }
    Ok(records)
}

/// Every record must calculate, otherwise the whole batch fails.
pub fn calculate_all(engine: &RateEngine, records: &[BatchRecord]) -> anyhow::Result<Vec<ResultRow>> {
    records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let value = parse_property_value(&record.value)
                .with_context(|| format!("Invalid property value in record {}", i + 1))?;
            let result = engine.calculate(value, record.first_home_buyer, record.principal_residence)?;
            Ok(ResultRow::new(
                &result,
                record.first_home_buyer,
                record.principal_residence,
            ))
        })
        .collect()
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "false" | "no" | "n" | "0" => Ok(false),
        "true" | "yes" | "y" | "1" => Ok(true),
        other => Err(serde::de::Error::custom(format!("invalid flag '{other}'"))),
    }
}
