use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use homeloan_core::result::calculate_transfer_costs;
use homeloan_core::transfer::costs::{TransferCostConfig, TransferCostInput};

use crate::input;

/// Arguments for transfer duty and fee calculation
#[derive(Args)]
pub struct TransferCostArgs {
    /// Purchase price of the property
    #[arg(long)]
    pub purchase_price: Option<Decimal>,

    /// Bond amount; omit for a cash purchase
    #[arg(long)]
    pub loan_amount: Option<Decimal>,

    /// YAML file overriding fee rates or the duty table
    #[arg(long)]
    pub config: Option<String>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_transfer_costs(args: TransferCostArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let config: TransferCostConfig = input::config::load_yaml(args.config.as_deref())?;

    let cost_input: TransferCostInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        TransferCostInput {
            purchase_price: args
                .purchase_price
                .ok_or("--purchase-price is required (or provide --input)")?,
            loan_amount: args.loan_amount,
        }
    };

    let result = calculate_transfer_costs(&cost_input, &config)?;
    Ok(serde_json::to_value(result)?)
}
