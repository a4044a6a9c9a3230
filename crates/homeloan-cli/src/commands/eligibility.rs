use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use homeloan_core::eligibility::affordability::AffordabilityInput;
use homeloan_core::eligibility::policy::EligibilityPolicy;
use homeloan_core::eligibility::profile::EligibilityProfile;
use homeloan_core::result::{calculate_affordability, calculate_eligibility};

use crate::input;

/// Arguments for eligibility screening
#[derive(Args)]
pub struct EligibilityArgs {
    /// Path to JSON applicant profile
    #[arg(long)]
    pub input: Option<String>,

    /// YAML file overriding the default lending policy
    #[arg(long)]
    pub config: Option<String>,
}

/// Arguments for affordability assessment
#[derive(Args)]
pub struct AffordabilityArgs {
    /// Gross monthly income
    #[arg(long)]
    pub gross_monthly_income: Option<Decimal>,

    /// Other monthly income (rental, maintenance, ...)
    #[arg(long)]
    pub other_monthly_income: Option<Decimal>,

    /// Monthly living expenses
    #[arg(long)]
    pub monthly_expenses: Option<Decimal>,

    /// Instalments already paid on existing debt
    #[arg(long)]
    pub existing_monthly_debt_service: Option<Decimal>,

    /// Nominal annual interest rate in percent
    #[arg(long, alias = "rate")]
    pub annual_rate_percent: Option<Decimal>,

    /// Loan term in years
    #[arg(long, alias = "term", default_value = "20")]
    pub term_years: u32,

    /// Cash deposit available
    #[arg(long)]
    pub deposit_amount: Option<Decimal>,

    /// Maximum instalment as a share of income (e.g. 0.3)
    #[arg(long)]
    pub max_repayment_ratio: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_eligibility(args: EligibilityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let policy: EligibilityPolicy = input::config::load_yaml(args.config.as_deref())?;

    let profile: EligibilityProfile = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        return Err("--input <profile.json> or stdin required for eligibility screening".into());
    };

    let result = calculate_eligibility(&profile, &policy)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_affordability(args: AffordabilityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let afford_input: AffordabilityInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        AffordabilityInput {
            gross_monthly_income: args
                .gross_monthly_income
                .ok_or("--gross-monthly-income is required (or provide --input)")?,
            other_monthly_income: args.other_monthly_income.unwrap_or(Decimal::ZERO),
            monthly_expenses: args
                .monthly_expenses
                .ok_or("--monthly-expenses is required (or provide --input)")?,
            existing_monthly_debt_service: args
                .existing_monthly_debt_service
                .unwrap_or(Decimal::ZERO),
            annual_rate_percent: args
                .annual_rate_percent
                .ok_or("--annual-rate-percent is required (or provide --input)")?,
            term_years: args.term_years,
            deposit_amount: args.deposit_amount.unwrap_or(Decimal::ZERO),
            max_repayment_ratio: args.max_repayment_ratio,
        }
    };

    let result = calculate_affordability(&afford_input)?;
    Ok(serde_json::to_value(result)?)
}
