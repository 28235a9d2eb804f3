mod cmd;
mod core;
mod money;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "stampc",
    version,
    about = "Calculate Victorian stamp duty and titles office fees"
)]
struct Cli {
    /// JSON rate schedule to use instead of the built-in Victoria 2025 rates
    #[arg(long, global = true)]
    rates: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Calculate duty and fees for one purchase
    Calc(cmd::calc::CalcCommand),
    /// Calculate duty and fees for every purchase in a CSV file
    Batch(cmd::batch::BatchCommand),
    /// Compose an e-mail or SMS with the results
    Share(cmd::share::ShareCommand),
    /// Show the rate schedule in use
    Rates(cmd::rates::RatesCommand),
    /// Print input and output formats
    Schema(cmd::schema::SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    if let Command::Schema(schema) = &cli.command {
        return schema.exec();
    }

    let engine = cmd::load_engine(cli.rates.as_deref())?;
    match &cli.command {
        Command::Calc(calc) => calc.exec(&engine),
        Command::Batch(batch) => batch.exec(&engine),
        Command::Share(share) => share.exec(&engine),
        Command::Rates(rates) => rates.exec(&engine),
        Command::Schema(schema) => schema.exec(),
    }
}
