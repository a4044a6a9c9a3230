use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::HomeLoanError;
use crate::transfer::duty::DutySchedule;
use crate::types::{Money, Rate};
use crate::HomeLoanResult;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Amount a percentage fee is charged on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeBase {
    PurchasePrice,
    LoanAmount,
}

/// Fee schedule for property transfer and bond registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferCostConfig {
    pub duty_schedule: DutySchedule,
    /// Conveyancing attorney fee rate.
    pub attorney_fee_rate: Rate,
    pub attorney_fee_base: FeeBase,
    pub bond_registration_fee_rate: Rate,
    pub bond_registration_fee_base: FeeBase,
    /// Flat deeds office levy.
    pub deeds_office_fee: Money,
    /// VAT charged on the attorney and bond registration fees.
    pub vat_rate: Rate,
}

impl Default for TransferCostConfig {
    fn default() -> Self {
        Self {
            duty_schedule: DutySchedule::default(),
            attorney_fee_rate: dec!(0.01),
            attorney_fee_base: FeeBase::PurchasePrice,
            bond_registration_fee_rate: dec!(0.01),
            bond_registration_fee_base: FeeBase::LoanAmount,
            deeds_office_fee: dec!(2_000),
            vat_rate: dec!(0.15),
        }
    }
}

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferCostInput {
    pub purchase_price: Money,
    /// Bond amount; `None` or zero for a cash purchase.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loan_amount: Option<Money>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferCostBreakdown {
    pub purchase_price: Money,
    pub loan_amount: Money,
    pub deposit: Money,
    pub transfer_duty: Money,
    pub marginal_duty_rate: Rate,
    pub attorney_fee: Money,
    pub bond_registration_fee: Money,
    pub deeds_office_fee: Money,
    pub vat: Money,
    pub total_costs: Money,
    /// Deposit plus all transfer and registration costs.
    pub cash_required: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Transfer duty plus ancillary fees for a purchase.
pub fn transfer_costs(
    input: &TransferCostInput,
    config: &TransferCostConfig,
) -> HomeLoanResult<TransferCostBreakdown> {
    validate_input(input)?;
    validate_config(config)?;

    let price = input.purchase_price;
    let loan = input.loan_amount.unwrap_or(Decimal::ZERO);

    let bracket = config.duty_schedule.bracket_for(price)?;
    let duty = bracket.duty_at(price);

    let attorney_fee = base_amount(config.attorney_fee_base, price, loan) * config.attorney_fee_rate;
    // No bond, nothing to register
    let bond_registration_fee = if loan.is_zero() {
        Decimal::ZERO
    } else {
        base_amount(config.bond_registration_fee_base, price, loan)
            * config.bond_registration_fee_rate
    };
    let vat = (attorney_fee + bond_registration_fee) * config.vat_rate;

    let total_costs = duty + attorney_fee + bond_registration_fee + config.deeds_office_fee + vat;
    let deposit = price - loan;

    Ok(TransferCostBreakdown {
        purchase_price: price,
        loan_amount: loan,
        deposit,
        transfer_duty: duty,
        marginal_duty_rate: bracket.marginal_rate,
        attorney_fee,
        bond_registration_fee,
        deeds_office_fee: config.deeds_office_fee,
        vat,
        total_costs,
        cash_required: deposit + total_costs,
    })
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn base_amount(base: FeeBase, price: Money, loan: Money) -> Money {
    match base {
        FeeBase::PurchasePrice => price,
        FeeBase::LoanAmount => loan,
    }
}

fn validate_input(input: &TransferCostInput) -> HomeLoanResult<()> {
    if input.purchase_price < Decimal::ZERO {
        return Err(HomeLoanError::invalid(
            "purchase_price",
            "Purchase price cannot be negative",
        ));
    }
    if let Some(loan) = input.loan_amount {
        if loan < Decimal::ZERO {
            return Err(HomeLoanError::invalid(
                "loan_amount",
                "Loan amount cannot be negative",
            ));
        }
        if loan > input.purchase_price {
            return Err(HomeLoanError::invalid(
                "loan_amount",
                "Loan amount cannot exceed the purchase price",
            ));
        }
    }
    Ok(())
}

fn validate_config(config: &TransferCostConfig) -> HomeLoanResult<()> {
    let rates = [
        ("attorney_fee_rate", config.attorney_fee_rate),
        ("bond_registration_fee_rate", config.bond_registration_fee_rate),
        ("vat_rate", config.vat_rate),
    ];
    for (field, rate) in rates {
        if rate < Decimal::ZERO || rate >= Decimal::ONE {
            return Err(HomeLoanError::invalid(
                field,
                "Fee rates must be between 0 and 1",
            ));
        }
    }
    if config.deeds_office_fee < Decimal::ZERO {
        return Err(HomeLoanError::invalid(
            "deeds_office_fee",
            "Deeds office fee cannot be negative",
        ));
    }
    Ok(())
}
