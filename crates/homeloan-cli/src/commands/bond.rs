use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use homeloan_core::annuity::annuity;
use homeloan_core::result::{
    calculate_additional_payment, calculate_bond, AdditionalPaymentInput, BondInput,
};
use homeloan_core::schedule::amortization::{generate, ScheduleFrequency};
use homeloan_core::{with_metadata, LoanParameters};

use crate::input;

/// Arguments for the bond repayment calculation
#[derive(Args)]
pub struct BondArgs {
    /// Purchase price of the property
    #[arg(long)]
    pub purchase_price: Option<Decimal>,

    /// Cash deposit paid upfront
    #[arg(long)]
    pub deposit: Option<Decimal>,

    /// Nominal annual interest rate in percent (e.g. 11.75)
    #[arg(long, alias = "rate")]
    pub annual_rate_percent: Option<Decimal>,

    /// Loan term in years
    #[arg(long, alias = "term")]
    pub term_years: Option<u32>,

    /// Aggregate the schedule by loan year
    #[arg(long)]
    pub yearly: bool,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the amortisation schedule
#[derive(Args)]
pub struct AmortizationArgs {
    /// Amount financed
    #[arg(long)]
    pub loan_amount: Option<Decimal>,

    /// Nominal annual interest rate in percent
    #[arg(long, alias = "rate")]
    pub annual_rate_percent: Option<Decimal>,

    /// Loan term in years
    #[arg(long, alias = "term")]
    pub term_years: Option<u32>,

    /// Aggregate the schedule by loan year
    #[arg(long)]
    pub yearly: bool,

    /// Path to JSON input file with loan parameters
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the extra payment simulation
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ExtraPaymentArgs {
    /// Amount financed
    #[arg(long)]
    pub loan_amount: Option<Decimal>,

    /// Nominal annual interest rate in percent
    #[arg(long, alias = "rate")]
    pub annual_rate_percent: Option<Decimal>,

    /// Loan term in years
    #[arg(long, alias = "term")]
    pub term_years: Option<u32>,

    /// Extra amount paid with every monthly instalment
    #[arg(long, alias = "extra")]
    pub extra_monthly_amount: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

fn frequency(yearly: bool) -> ScheduleFrequency {
    if yearly {
        ScheduleFrequency::Yearly
    } else {
        ScheduleFrequency::Monthly
    }
}

pub fn run_bond(args: BondArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let bond_input: BondInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        BondInput {
            purchase_price: args
                .purchase_price
                .ok_or("--purchase-price is required (or provide --input)")?,
            deposit: args.deposit.unwrap_or(Decimal::ZERO),
            annual_rate_percent: args
                .annual_rate_percent
                .ok_or("--annual-rate-percent is required (or provide --input)")?,
            term_years: args
                .term_years
                .ok_or("--term-years is required (or provide --input)")?,
            frequency: frequency(args.yearly),
        }
    };

    let result = calculate_bond(&bond_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_amortization(args: AmortizationArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan: LoanParameters = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        LoanParameters::new(
            args.loan_amount
                .ok_or("--loan-amount is required (or provide --input)")?,
            args.annual_rate_percent
                .ok_or("--annual-rate-percent is required (or provide --input)")?,
            args.term_years
                .ok_or("--term-years is required (or provide --input)")?,
        )
    };

    let frequency = frequency(args.yearly);
    let summary = annuity(&loan)?;
    let schedule = generate(&loan, frequency)?;
    let assumptions = serde_json::json!({
        "frequency": frequency,
        "monthly_payment": summary.monthly_payment.round_dp(2).to_string(),
    });
    let output = with_metadata(
        "Annuity amortisation schedule",
        &assumptions,
        Vec::new(),
        schedule,
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_extra_payment(args: ExtraPaymentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let extra_input: AdditionalPaymentInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        AdditionalPaymentInput {
            loan_amount: args
                .loan_amount
                .ok_or("--loan-amount is required (or provide --input)")?,
            annual_rate_percent: args
                .annual_rate_percent
                .ok_or("--annual-rate-percent is required (or provide --input)")?,
            term_years: args
                .term_years
                .ok_or("--term-years is required (or provide --input)")?,
            extra_monthly_amount: args
                .extra_monthly_amount
                .ok_or("--extra-monthly-amount is required (or provide --input)")?,
        }
    };

    let result = calculate_additional_payment(&extra_input)?;
    Ok(serde_json::to_value(result)?)
}
