use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::annuity::monthly_payment;
use crate::eligibility::policy::EligibilityPolicy;
use crate::eligibility::profile::EligibilityProfile;
use crate::eligibility::rules::{failing_rules, BlockingReason, RuleContext};
use crate::types::{LoanParameters, Money, Percent};
use crate::HomeLoanResult;

/// DTI reported for applications with no income at all.
const UNDEFINED_DEBT_TO_INCOME: Decimal = dec!(999);

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvisoryTopic {
    HighLoanToValue,
    HighDebtToIncome,
    CounterOffer,
}

/// Non-blocking hint attached to an eligible application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisoryNote {
    pub topic: AdvisoryTopic,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityVerdict {
    pub eligible: bool,
    pub blocking_reasons: Vec<BlockingReason>,
    pub advisory_notes: Vec<AdvisoryNote>,
    pub loan_amount_requested: Money,
    pub loan_to_value_percent: Percent,
    pub debt_to_income_percent: Percent,
    pub total_monthly_income: Money,
    pub estimated_monthly_debt_service: Money,
    pub projected_monthly_payment: Money,
    pub suggested_loan_amount: Option<Money>,
    pub suggested_monthly_payment: Option<Money>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Evaluate a profile against a lending policy.
///
/// Fails only on structurally invalid input; an applicant who does not
/// qualify gets `eligible == false` and one blocking reason per failed rule.
pub fn evaluate(
    profile: &EligibilityProfile,
    policy: &EligibilityPolicy,
) -> HomeLoanResult<EligibilityVerdict> {
    profile.validate()?;
    policy.validate()?;

    let total_income = profile.total_monthly_income();
    let debt_service =
        profile.existing_monthly_debt_service + policy.debt_service.estimate(&profile.existing_debts)?;

    let requested = profile.requested_loan_amount();
    let projected = payment_at_reference_rate(requested, profile, policy)?;

    let obligations = profile.monthly_expenses + debt_service + projected;
    let dti = if total_income.is_zero() {
        UNDEFINED_DEBT_TO_INCOME
    } else {
        obligations / total_income * Decimal::ONE_HUNDRED
    };
    let ltv = requested / profile.property_price * Decimal::ONE_HUNDRED;

    let ctx = RuleContext {
        profile,
        policy,
        total_monthly_income: total_income,
        loan_to_value_percent: ltv,
        debt_to_income_percent: dti,
    };
    let blocking_reasons = failing_rules(&ctx);
    let eligible = blocking_reasons.is_empty();

    let mut advisory_notes = Vec::new();
    let mut suggested_loan_amount = None;
    let mut suggested_monthly_payment = None;

    if eligible {
        if ltv > policy.advisory_loan_to_value_percent {
            advisory_notes.push(AdvisoryNote {
                topic: AdvisoryTopic::HighLoanToValue,
                message: format!(
                    "A deposit that brings the loan-to-value to {}% or less may secure a better interest rate.",
                    policy.advisory_loan_to_value_percent
                ),
            });
        }
        if dti > policy.advisory_debt_to_income_percent {
            advisory_notes.push(AdvisoryNote {
                topic: AdvisoryTopic::HighDebtToIncome,
                message: format!(
                    "Monthly obligations take {}% of income; reducing other debt would improve affordability.",
                    dti.round_dp(2)
                ),
            });
        }

        let in_counter_offer_band = dti > policy.counter_offer_debt_to_income_percent
            && dti <= policy.counter_offer_max_debt_to_income_percent;
        let suggested = if in_counter_offer_band {
            let reduced = requested * policy.counter_offer_factor;
            advisory_notes.push(AdvisoryNote {
                topic: AdvisoryTopic::CounterOffer,
                message: format!(
                    "Debt-to-income above {}% limits the offer to {}% of the requested amount.",
                    policy.counter_offer_debt_to_income_percent,
                    (policy.counter_offer_factor * Decimal::ONE_HUNDRED).normalize()
                ),
            });
            reduced
        } else {
            requested
        };

        suggested_monthly_payment = Some(payment_at_reference_rate(suggested, profile, policy)?);
        suggested_loan_amount = Some(suggested);
    }

    debug!(
        eligible,
        blocking = blocking_reasons.len(),
        dti = %dti.round_dp(2),
        ltv = %ltv.round_dp(2),
        "eligibility evaluated"
    );

    Ok(EligibilityVerdict {
        eligible,
        blocking_reasons,
        advisory_notes,
        loan_amount_requested: requested,
        loan_to_value_percent: ltv,
        debt_to_income_percent: dti,
        total_monthly_income: total_income,
        estimated_monthly_debt_service: debt_service,
        projected_monthly_payment: projected,
        suggested_loan_amount,
        suggested_monthly_payment,
    })
}

/// [`evaluate`] under the default lending policy.
pub fn evaluate_default(profile: &EligibilityProfile) -> HomeLoanResult<EligibilityVerdict> {
    evaluate(profile, &EligibilityPolicy::default())
}

fn payment_at_reference_rate(
    amount: Money,
    profile: &EligibilityProfile,
    policy: &EligibilityPolicy,
) -> HomeLoanResult<Money> {
    monthly_payment(&LoanParameters::new(
        amount,
        policy.reference_rate_percent,
        profile.loan_term_years,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
