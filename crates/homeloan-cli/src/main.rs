mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::bond::{AmortizationArgs, BondArgs, ExtraPaymentArgs};
use commands::eligibility::{AffordabilityArgs, EligibilityArgs};
use commands::transfer::TransferCostArgs;

/// Home-loan bond, transfer cost and eligibility calculations
#[derive(Parser)]
#[command(
    name = "homeloan",
    version,
    about = "Home-loan bond, transfer cost and eligibility calculations",
    long_about = "A CLI for home-loan calculations with decimal precision. Supports bond \
                  repayments, amortisation schedules, extra-payment payoff, transfer duty \
                  and fees, eligibility screening and affordability."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Monthly repayment and totals for a bond
    Bond(BondArgs),
    /// Monthly or yearly amortisation schedule
    Amortization(AmortizationArgs),
    /// Time and interest saved by a fixed extra monthly payment
    ExtraPayment(ExtraPaymentArgs),
    /// Transfer duty, conveyancing and bond registration costs
    TransferCosts(TransferCostArgs),
    /// Screen an applicant profile against a lending policy
    Eligibility(EligibilityArgs),
    /// Maximum repayment, loan and purchase price for an income
    Affordability(AffordabilityArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Bond(args) => commands::bond::run_bond(args),
        Commands::Amortization(args) => commands::bond::run_amortization(args),
        Commands::ExtraPayment(args) => commands::bond::run_extra_payment(args),
        Commands::TransferCosts(args) => commands::transfer::run_transfer_costs(args),
        Commands::Eligibility(args) => commands::eligibility::run_eligibility(args),
        Commands::Affordability(args) => commands::eligibility::run_affordability(args),
        Commands::Version => {
            println!("homeloan {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
