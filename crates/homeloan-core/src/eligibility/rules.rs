//! Independent lending rules.
//!
//! Each rule looks at the same precomputed context and either passes or
//! yields one blocking message. No rule reads another rule's outcome, so
//! the order in [`EligibilityRule::ALL`] only fixes the reporting order.

use serde::{Deserialize, Serialize};

use crate::eligibility::policy::EligibilityPolicy;
use crate::eligibility::profile::{EligibilityProfile, EmploymentStatus, ResidencyType};
use crate::types::{Money, Percent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EligibilityRule {
    MinimumAge,
    MaximumAge,
    AgeAtMaturity,
    MinimumIncome,
    MaximumLoanToValue,
    MaximumDebtToIncome,
    MinimumCreditTier,
    AdverseCreditHistory,
    Employment,
    Residency,
}

/// A failed rule, tagged with the rule that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockingReason {
    pub rule: EligibilityRule,
    pub message: String,
}

/// Ratios and totals shared by every rule.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub profile: &'a EligibilityProfile,
    pub policy: &'a EligibilityPolicy,
    pub total_monthly_income: Money,
    pub loan_to_value_percent: Percent,
    pub debt_to_income_percent: Percent,
}

impl EligibilityRule {
    /// Every rule, in reporting order.
    pub const ALL: [EligibilityRule; 10] = [
        EligibilityRule::MinimumAge,
        EligibilityRule::MaximumAge,
        EligibilityRule::AgeAtMaturity,
        EligibilityRule::MinimumIncome,
        EligibilityRule::MaximumLoanToValue,
        EligibilityRule::MaximumDebtToIncome,
        EligibilityRule::MinimumCreditTier,
        EligibilityRule::AdverseCreditHistory,
        EligibilityRule::Employment,
        EligibilityRule::Residency,
    ];

    /// `Some(reason)` when the applicant fails this rule.
    pub fn check(self, ctx: &RuleContext<'_>) -> Option<BlockingReason> {
        let profile = ctx.profile;
        let policy = ctx.policy;

        let message = match self {
            EligibilityRule::MinimumAge => (profile.age < policy.min_age).then(|| {
                format!(
                    "Applicants must be at least {} years old (age {}).",
                    policy.min_age, profile.age
                )
            }),
            EligibilityRule::MaximumAge => (profile.age > policy.max_age).then(|| {
                format!(
                    "Applicants older than {} do not qualify for a new home loan (age {}).",
                    policy.max_age, profile.age
                )
            }),
            EligibilityRule::AgeAtMaturity => {
                let at_maturity = profile.age.saturating_add(profile.loan_term_years);
                (at_maturity > policy.max_age_at_maturity).then(|| {
                    format!(
                        "The loan must be repaid by age {}; a {}-year term ends at age {at_maturity}.",
                        policy.max_age_at_maturity, profile.loan_term_years
                    )
                })
            }
            EligibilityRule::MinimumIncome => {
                (ctx.total_monthly_income < policy.min_monthly_income).then(|| {
                    format!(
                        "Total monthly income of {} is below the minimum of {}.",
                        ctx.total_monthly_income.round_dp(2),
                        policy.min_monthly_income
                    )
                })
            }
            EligibilityRule::MaximumLoanToValue => {
                (ctx.loan_to_value_percent > policy.max_loan_to_value_percent).then(|| {
                    format!(
                        "Loan-to-value of {}% exceeds the maximum of {}%.",
                        ctx.loan_to_value_percent.round_dp(2),
                        policy.max_loan_to_value_percent
                    )
                })
            }
            EligibilityRule::MaximumDebtToIncome => {
                (ctx.debt_to_income_percent > policy.max_debt_to_income_percent).then(|| {
                    format!(
                        "Debt-to-income of {}% exceeds the maximum of {}%.",
                        ctx.debt_to_income_percent.round_dp(2),
                        policy.max_debt_to_income_percent
                    )
                })
            }
            EligibilityRule::MinimumCreditTier => {
                (profile.credit_tier < policy.min_credit_tier).then(|| {
                    format!(
                        "A {} credit record is below the required {} standing.",
                        profile.credit_tier.label(),
                        policy.min_credit_tier.label()
                    )
                })
            }
            EligibilityRule::AdverseCreditHistory => adverse_history(profile),
            EligibilityRule::Employment => employment(profile, policy),
            EligibilityRule::Residency => residency(profile, policy),
        };

        message.map(|message| BlockingReason {
            rule: self,
            message,
        })
    }
}

fn adverse_history(profile: &EligibilityProfile) -> Option<String> {
    let flags: Vec<&str> = [
        (profile.missed_payments, "missed payments"),
        (profile.judgments, "judgments"),
        (profile.bankruptcy, "bankruptcy"),
    ]
    .into_iter()
    .filter_map(|(present, label)| present.then_some(label))
    .collect();

    (!flags.is_empty()).then(|| {
        format!(
            "Adverse credit history on record ({}).",
            flags.join(", ")
        )
    })
}

fn employment(profile: &EligibilityProfile, policy: &EligibilityPolicy) -> Option<String> {
    let required = match profile.employment_status {
        EmploymentStatus::Unemployed => {
            return Some("Applicants must be employed or have a verifiable income.".into());
        }
        EmploymentStatus::Retired => return None,
        EmploymentStatus::SelfEmployed => policy.min_self_employed_duration,
        EmploymentStatus::Permanent | EmploymentStatus::Contract => {
            policy.min_employment_duration
        }
    };

    (profile.employment_duration < required).then(|| {
        format!(
            "Time in current employment ({}) is shorter than the required {}.",
            profile.employment_duration.label(),
            required.label()
        )
    })
}

fn residency(profile: &EligibilityProfile, policy: &EligibilityPolicy) -> Option<String> {
    if profile.citizen {
        return None;
    }
    match profile.residency_type {
        ResidencyType::Citizen | ResidencyType::PermanentResident => None,
        ResidencyType::TemporaryResident if policy.allow_temporary_residents => None,
        ResidencyType::TemporaryResident => {
            Some("Temporary residents do not qualify under the current lending policy.".into())
        }
        ResidencyType::NonResident => {
            Some("Applicants must be citizens or permanent residents.".into())
        }
    }
}

/// Rules the profile fails, in reporting order.
pub fn failing_rules(ctx: &RuleContext<'_>) -> Vec<BlockingReason> {
    EligibilityRule::ALL
        .iter()
        .filter_map(|rule| rule.check(ctx))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use crate::eligibility::profile::{CreditTier, EmploymentDuration, ExistingDebts};
    use rust_decimal_macros::dec;

    fn profile() -> EligibilityProfile {
        EligibilityProfile {
            age: 35,
            gross_monthly_income: dec!(50_000),
            other_monthly_income: Decimal::ZERO,
            monthly_expenses: dec!(10_000),
            existing_monthly_debt_service: Decimal::ZERO,
            existing_debts: ExistingDebts::default(),
            property_price: dec!(1_500_000),
            deposit_amount: dec!(150_000),
            loan_term_years: 20,
            credit_tier: CreditTier::Good,
            employment_status: EmploymentStatus::Permanent,
            employment_duration: EmploymentDuration::OverTwoYears,
            citizen: true,
            residency_type: ResidencyType::Citizen,
            missed_payments: false,
            judgments: false,
            bankruptcy: false,
        }
    }

    fn context<'a>(
        profile: &'a EligibilityProfile,
        policy: &'a EligibilityPolicy,
    ) -> RuleContext<'a> {
        RuleContext {
            profile,
            policy,
            total_monthly_income: profile.total_monthly_income(),
            loan_to_value_percent: dec!(90),
            debt_to_income_percent: dec!(30),
        }
    }

    #[test]
    fn test_clean_profile_passes_every_rule() {
        let p = profile();
        let policy = EligibilityPolicy::default();
        assert!(failing_rules(&context(&p, &policy)).is_empty());
    }

    #[test]
    fn test_adverse_flags_collapse_into_one_reason() {
        let mut p = profile();
        p.judgments = true;
        p.bankruptcy = true;
        let policy = EligibilityPolicy::default();
        let reasons = failing_rules(&context(&p, &policy));
        assert_eq!(reasons.len(), 1);
        assert_eq!(reasons[0].rule, EligibilityRule::AdverseCreditHistory);
        assert!(reasons[0].message.contains("judgments, bankruptcy"));
    }

    #[test]
    fn test_self_employed_needs_longer_track_record() {
        let mut p = profile();
        p.employment_status = EmploymentStatus::SelfEmployed;
        p.employment_duration = EmploymentDuration::SixToTwelveMonths;
        let policy = EligibilityPolicy::default();
        let reasons = failing_rules(&context(&p, &policy));
        assert_eq!(reasons[0].rule, EligibilityRule::Employment);

        p.employment_status = EmploymentStatus::Contract;
        assert!(failing_rules(&context(&p, &policy)).is_empty());
    }

    #[test]
    fn test_retired_has_no_duration_requirement() {
        let mut p = profile();
        p.employment_status = EmploymentStatus::Retired;
        p.employment_duration = EmploymentDuration::UnderSixMonths;
        let policy = EligibilityPolicy::default();
        assert!(EligibilityRule::Employment.check(&context(&p, &policy)).is_none());
    }

    #[test]
    fn test_residency_policy() {
        let mut p = profile();
        p.citizen = false;
        p.residency_type = ResidencyType::TemporaryResident;
        let mut policy = EligibilityPolicy::default();
        assert!(EligibilityRule::Residency.check(&context(&p, &policy)).is_some());

        policy.allow_temporary_residents = true;
        assert!(EligibilityRule::Residency.check(&context(&p, &policy)).is_none());

        p.residency_type = ResidencyType::NonResident;
        assert!(EligibilityRule::Residency.check(&context(&p, &policy)).is_some());

        p.residency_type = ResidencyType::PermanentResident;
        assert!(EligibilityRule::Residency.check(&context(&p, &policy)).is_none());
    }

    #[test]
    fn test_age_at_maturity() {
        let mut p = profile();
        p.age = 60;
        p.loan_term_years = 20;
        let policy = EligibilityPolicy::default();
        let reasons = failing_rules(&context(&p, &policy));
        assert_eq!(reasons.len(), 1);
        assert_eq!(reasons[0].rule, EligibilityRule::AgeAtMaturity);
    }

    #[test]
    fn test_age_at_maturity_saturates() {
        let mut p = profile();
        p.age = u32::MAX;
        let policy = EligibilityPolicy::default();
        let reason = EligibilityRule::AgeAtMaturity.check(&context(&p, &policy));
        assert!(reason.is_some());
    }

    #[test]
    fn test_reasons_follow_reporting_order() {
        let mut p = profile();
        p.age = 16;
        p.credit_tier = CreditTier::Poor;
        p.employment_status = EmploymentStatus::Unemployed;
        let policy = EligibilityPolicy::default();
        let rules: Vec<_> = failing_rules(&context(&p, &policy))
            .into_iter()
            .map(|r| r.rule)
            .collect();
        assert_eq!(
            rules,
            vec![
                EligibilityRule::MinimumAge,
                EligibilityRule::MinimumCreditTier,
                EligibilityRule::Employment,
            ]
        );
    }
}
