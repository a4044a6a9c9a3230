//! Calculator facades and the shared result contract.
//!
//! Each facade runs one engine calculation and returns a
//! [`CalculationResult`] holding the inputs verbatim, the structured outputs
//! and a flattened, presentation-agnostic `display_results` list.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::annuity::{annuity, AnnuitySummary};
use crate::eligibility::affordability::{assess_affordability, AffordabilityInput, AffordabilityOutcome};
use crate::eligibility::evaluator::{evaluate, EligibilityVerdict};
use crate::eligibility::policy::EligibilityPolicy;
use crate::eligibility::profile::EligibilityProfile;
use crate::error::HomeLoanError;
use crate::schedule::amortization::{generate, AmortizationSchedule, ScheduleFrequency};
use crate::schedule::payoff::{simulate_extra_payment, PayoffOutcome};
use crate::transfer::costs::{transfer_costs, TransferCostBreakdown, TransferCostConfig, TransferCostInput};
use crate::types::{with_metadata, ComputationOutput, LoanParameters, Money, Percent};
use crate::HomeLoanResult;

// ---------------------------------------------------------------------------
// Result contract
// ---------------------------------------------------------------------------

/// Key under which a calculation is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CalculationType {
    Bond,
    Transfer,
    Eligibility,
    AdditionalPayment,
    Affordability,
}

impl CalculationType {
    pub fn key(self) -> &'static str {
        match self {
            CalculationType::Bond => "bond",
            CalculationType::Transfer => "transfer",
            CalculationType::Eligibility => "eligibility",
            CalculationType::AdditionalPayment => "additional-payment",
            CalculationType::Affordability => "affordability",
        }
    }
}

/// One human-readable line of a result summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayResult {
    pub label: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
}

impl DisplayResult {
    fn new(label: &str, value: String) -> Self {
        Self {
            label: label.into(),
            value,
            tooltip: None,
        }
    }

    fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }
}

/// Structured outputs, tagged with the calculation that produced them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum CalculationOutputs {
    Bond(BondOutput),
    Transfer(TransferCostBreakdown),
    Eligibility(EligibilityVerdict),
    AdditionalPayment(PayoffOutcome),
    Affordability(AffordabilityOutcome),
}

impl CalculationOutputs {
    pub fn calculation_type(&self) -> CalculationType {
        match self {
            CalculationOutputs::Bond(_) => CalculationType::Bond,
            CalculationOutputs::Transfer(_) => CalculationType::Transfer,
            CalculationOutputs::Eligibility(_) => CalculationType::Eligibility,
            CalculationOutputs::AdditionalPayment(_) => CalculationType::AdditionalPayment,
            CalculationOutputs::Affordability(_) => CalculationType::Affordability,
        }
    }
}

/// Everything an external collaborator needs from one engine call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationResult {
    pub calculation_type: CalculationType,
    pub inputs: serde_json::Value,
    pub outputs: CalculationOutputs,
    pub display_results: Vec<DisplayResult>,
}

impl CalculationResult {
    fn new(
        inputs: &impl Serialize,
        outputs: CalculationOutputs,
        display_results: Vec<DisplayResult>,
    ) -> HomeLoanResult<Self> {
        Ok(Self {
            calculation_type: outputs.calculation_type(),
            inputs: serde_json::to_value(inputs)?,
            outputs,
            display_results,
        })
    }
}

// ---------------------------------------------------------------------------
// Bond calculator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BondInput {
    pub purchase_price: Money,
    #[serde(default)]
    pub deposit: Money,
    pub annual_rate_percent: Percent,
    pub term_years: u32,
    #[serde(default)]
    pub frequency: ScheduleFrequency,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BondOutput {
    pub loan: LoanParameters,
    pub annuity: AnnuitySummary,
    pub schedule: AmortizationSchedule,
}

/// Monthly repayment, totals and amortisation schedule for a purchase.
pub fn calculate_bond(input: &BondInput) -> HomeLoanResult<ComputationOutput<CalculationResult>> {
    if input.purchase_price < Decimal::ZERO {
        return Err(HomeLoanError::invalid(
            "purchase_price",
            "Purchase price cannot be negative",
        ));
    }
    if input.deposit < Decimal::ZERO {
        return Err(HomeLoanError::invalid("deposit", "Deposit cannot be negative"));
    }
    if input.deposit > input.purchase_price {
        return Err(HomeLoanError::invalid(
            "deposit",
            "Deposit cannot exceed the purchase price",
        ));
    }

    let mut warnings = Vec::new();
    if input.deposit.is_zero() {
        warnings.push("No deposit supplied; the full purchase price is financed".to_string());
    }

    let loan = LoanParameters::new(
        input.purchase_price - input.deposit,
        input.annual_rate_percent,
        input.term_years,
    );
    let summary = annuity(&loan)?;
    let schedule = generate(&loan, input.frequency)?;

    let display = vec![
        DisplayResult::new("Loan amount", format_currency(loan.principal)),
        DisplayResult::new("Monthly repayment", format_currency(summary.monthly_payment))
            .with_tooltip(format!(
                "Fixed instalment over {} months at {}",
                summary.number_of_payments,
                format_percent(loan.annual_rate_percent)
            )),
        DisplayResult::new("Total interest", format_currency(summary.total_interest)),
        DisplayResult::new("Total repayment", format_currency(summary.total_repayment)),
        DisplayResult::new("Number of payments", summary.number_of_payments.to_string()),
    ];

    let assumptions = serde_json::json!({
        "compounding": "monthly",
        "frequency": input.frequency,
    });
    let outputs = CalculationOutputs::Bond(BondOutput {
        loan,
        annuity: summary,
        schedule,
    });

    Ok(with_metadata(
        "Annuity bond repayment with amortisation schedule",
        &assumptions,
        warnings,
        CalculationResult::new(input, outputs, display)?,
    ))
}

// ---------------------------------------------------------------------------
// Additional payment calculator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdditionalPaymentInput {
    pub loan_amount: Money,
    pub annual_rate_percent: Percent,
    pub term_years: u32,
    pub extra_monthly_amount: Money,
}

/// Time and interest saved by paying a fixed extra amount every month.
pub fn calculate_additional_payment(
    input: &AdditionalPaymentInput,
) -> HomeLoanResult<ComputationOutput<CalculationResult>> {
    let loan = LoanParameters::new(input.loan_amount, input.annual_rate_percent, input.term_years);
    let outcome = simulate_extra_payment(&loan, input.extra_monthly_amount)?;

    let mut warnings = Vec::new();
    if input.extra_monthly_amount <= Decimal::ZERO {
        warnings.push("Extra monthly amount is not positive; the loan is not accelerated".to_string());
    }

    let standard_payment = outcome.schedule.payment - input.extra_monthly_amount;
    let display = vec![
        DisplayResult::new("Standard monthly repayment", format_currency(standard_payment)),
        DisplayResult::new(
            "Repayment with extra payment",
            format_currency(outcome.schedule.payment),
        ),
        DisplayResult::new("Payoff time", format_months(outcome.months_to_payoff))
            .with_tooltip(format!(
                "Contractual term is {}",
                format_months(outcome.standard_months)
            )),
        DisplayResult::new(
            "Time saved",
            format_months(u32::try_from(outcome.months_saved.max(0)).unwrap_or(0)),
        ),
        DisplayResult::new("Total interest", format_currency(outcome.total_interest_paid)),
        DisplayResult::new("Interest saved", format_currency(outcome.interest_saved)),
    ];

    let assumptions = serde_json::json!({
        "extra_payment_timing": "monthly, with each instalment",
        "iteration_cap_months": loan.number_of_payments().saturating_mul(4),
    });

    Ok(with_metadata(
        "Accelerated payoff simulation",
        &assumptions,
        warnings,
        CalculationResult::new(input, CalculationOutputs::AdditionalPayment(outcome), display)?,
    ))
}

// ---------------------------------------------------------------------------
// Transfer cost calculator
// ---------------------------------------------------------------------------

/// Transfer duty and ancillary fees under `config`.
pub fn calculate_transfer_costs(
    input: &TransferCostInput,
    config: &TransferCostConfig,
) -> HomeLoanResult<ComputationOutput<CalculationResult>> {
    let breakdown = transfer_costs(input, config)?;

    let mut warnings = Vec::new();
    if breakdown.loan_amount.is_zero() {
        warnings.push("No loan amount supplied; costs assume a cash purchase".to_string());
    }

    let display = vec![
        DisplayResult::new("Transfer duty", format_currency(breakdown.transfer_duty)).with_tooltip(
            format!(
                "Marginal duty rate {}",
                format_percent(breakdown.marginal_duty_rate * Decimal::ONE_HUNDRED)
            ),
        ),
        DisplayResult::new("Conveyancing fee", format_currency(breakdown.attorney_fee)),
        DisplayResult::new(
            "Bond registration fee",
            format_currency(breakdown.bond_registration_fee),
        ),
        DisplayResult::new("Deeds office fee", format_currency(breakdown.deeds_office_fee)),
        DisplayResult::new("VAT", format_currency(breakdown.vat)),
        DisplayResult::new("Total costs", format_currency(breakdown.total_costs)),
        DisplayResult::new("Cash required", format_currency(breakdown.cash_required))
            .with_tooltip("Deposit plus all transfer and registration costs"),
    ];

    let assumptions = serde_json::json!({
        "attorney_fee_base": config.attorney_fee_base,
        "bond_registration_fee_base": config.bond_registration_fee_base,
        "vat_rate": config.vat_rate.to_string(),
    });

    Ok(with_metadata(
        "Progressive transfer duty with ancillary fees",
        &assumptions,
        warnings,
        CalculationResult::new(input, CalculationOutputs::Transfer(breakdown), display)?,
    ))
}

// ---------------------------------------------------------------------------
// Eligibility calculator
// ---------------------------------------------------------------------------

/// Eligibility verdict with reasons, notes and a suggested offer.
pub fn calculate_eligibility(
    profile: &EligibilityProfile,
    policy: &EligibilityPolicy,
) -> HomeLoanResult<ComputationOutput<CalculationResult>> {
    let verdict = evaluate(profile, policy)?;

    let outcome = if verdict.eligible {
        "Eligible"
    } else {
        "Not eligible"
    };
    let mut display = vec![
        DisplayResult::new("Outcome", outcome.to_string()),
        DisplayResult::new("Loan requested", format_currency(verdict.loan_amount_requested)),
        DisplayResult::new("Loan-to-value", format_percent(verdict.loan_to_value_percent)),
        DisplayResult::new("Debt-to-income", format_percent(verdict.debt_to_income_percent))
            .with_tooltip("Expenses, existing debt and the projected bond instalment over income"),
    ];
    if let Some(amount) = verdict.suggested_loan_amount {
        display.push(DisplayResult::new("Suggested loan amount", format_currency(amount)));
    }
    if let Some(payment) = verdict.suggested_monthly_payment {
        display.push(
            DisplayResult::new("Suggested monthly repayment", format_currency(payment))
                .with_tooltip(format!(
                    "At a reference rate of {}",
                    format_percent(policy.reference_rate_percent)
                )),
        );
    }
    display.extend(
        verdict
            .blocking_reasons
            .iter()
            .map(|r| DisplayResult::new("Reason", r.message.clone())),
    );
    display.extend(
        verdict
            .advisory_notes
            .iter()
            .map(|n| DisplayResult::new("Note", n.message.clone())),
    );

    let assumptions = serde_json::json!({
        "reference_rate_percent": policy.reference_rate_percent.to_string(),
        "max_debt_to_income_percent": policy.max_debt_to_income_percent.to_string(),
        "max_loan_to_value_percent": policy.max_loan_to_value_percent.to_string(),
    });

    Ok(with_metadata(
        "Independent lending rule evaluation",
        &assumptions,
        Vec::new(),
        CalculationResult::new(profile, CalculationOutputs::Eligibility(verdict), display)?,
    ))
}

// ---------------------------------------------------------------------------
// Affordability calculator
// ---------------------------------------------------------------------------

/// Maximum repayment, loan and purchase price an income supports.
pub fn calculate_affordability(
    input: &AffordabilityInput,
) -> HomeLoanResult<ComputationOutput<CalculationResult>> {
    let outcome = assess_affordability(input)?;

    let mut warnings = Vec::new();
    if outcome.max_monthly_repayment.is_zero() {
        warnings.push("Expenses and existing debt leave no room for a bond repayment".to_string());
    }

    let display = vec![
        DisplayResult::new(
            "Maximum monthly repayment",
            format_currency(outcome.max_monthly_repayment),
        )
        .with_tooltip(format!(
            "Capped at {} of income",
            format_percent(outcome.repayment_ratio * Decimal::ONE_HUNDRED)
        )),
        DisplayResult::new("Maximum loan amount", format_currency(outcome.max_loan_amount)),
        DisplayResult::new(
            "Maximum purchase price",
            format_currency(outcome.max_purchase_price),
        ),
    ];

    let assumptions = serde_json::json!({
        "repayment_ratio": outcome.repayment_ratio.to_string(),
    });

    Ok(with_metadata(
        "Affordability from income and obligations",
        &assumptions,
        warnings,
        CalculationResult::new(input, CalculationOutputs::Affordability(outcome), display)?,
    ))
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// `R 1 234 567.89` style currency with space-grouped thousands.
pub fn format_currency(amount: Money) -> String {
    let rounded = amount.round_dp(2);
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }
    format!("{sign}R {grouped}.{cents}")
}

pub fn format_percent(value: Percent) -> String {
    format!("{:.2}%", value.round_dp(2))
}

/// `16 years 8 months` style duration.
pub fn format_months(months: u32) -> String {
    let (years, rem) = (months / 12, months % 12);
    let plural = |n: u32, unit: &str| {
        if n == 1 {
            format!("1 {unit}")
        } else {
            format!("{n} {unit}s")
        }
    };
    match (years, rem) {
        (0, m) => plural(m, "month"),
        (y, 0) => plural(y, "year"),
        (y, m) => format!("{} {}", plural(y, "year"), plural(m, "month")),
    }
}
