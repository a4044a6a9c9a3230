use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::annuity::monthly_payment;
use crate::error::HomeLoanError;
use crate::types::{LoanParameters, Money, Rate};
use crate::HomeLoanResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Granularity of a generated schedule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleFrequency {
    #[default]
    Monthly,
    /// Twelve monthly periods summed into one row per loan year.
    Yearly,
}

impl ScheduleFrequency {
    pub fn periods_per_year(self) -> u32 {
        match self {
            ScheduleFrequency::Monthly => 12,
            ScheduleFrequency::Yearly => 1,
        }
    }
}

impl TryFrom<u32> for ScheduleFrequency {
    type Error = HomeLoanError;

    fn try_from(periods_per_year: u32) -> Result<Self, Self::Error> {
        match periods_per_year {
            12 => Ok(ScheduleFrequency::Monthly),
            1 => Ok(ScheduleFrequency::Yearly),
            other => Err(HomeLoanError::invalid(
                "periods_per_year",
                format!("Expected 12 (monthly) or 1 (yearly), got {other}"),
            )),
        }
    }
}

/// One row of an amortisation schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationPeriod {
    /// 1-based month or year.
    pub index: u32,
    pub payment: Money,
    pub principal_component: Money,
    pub interest_component: Money,
    pub ending_balance: Money,
    pub cumulative_principal: Money,
    pub cumulative_interest: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub frequency: ScheduleFrequency,
    /// Scheduled monthly payment (including any extra payment).
    pub payment: Money,
    pub periods: Vec<AmortizationPeriod>,
    pub total_principal: Money,
    pub total_interest: Money,
    pub total_paid: Money,
}

impl AmortizationSchedule {
    /// Build a schedule from monthly rows, aggregating into loan years when
    /// `frequency` is yearly. A trailing partial year becomes its own row.
    pub(crate) fn from_monthly(
        frequency: ScheduleFrequency,
        payment: Money,
        monthly: Vec<AmortizationPeriod>,
    ) -> Self {
        let total_principal = monthly
            .last()
            .map(|p| p.cumulative_principal)
            .unwrap_or(Decimal::ZERO);
        let total_interest = monthly
            .last()
            .map(|p| p.cumulative_interest)
            .unwrap_or(Decimal::ZERO);

        let periods = match frequency {
            ScheduleFrequency::Monthly => monthly,
            ScheduleFrequency::Yearly => aggregate_yearly(&monthly),
        };

        Self {
            frequency,
            payment,
            periods,
            total_principal,
            total_interest,
            total_paid: total_principal + total_interest,
        }
    }

    /// Balance after the last period; zero for a fully repaid schedule.
    pub fn final_balance(&self) -> Money {
        self.periods
            .last()
            .map(|p| p.ending_balance)
            .unwrap_or(Decimal::ZERO)
    }
}

// ---------------------------------------------------------------------------
// Lazy monthly iterator
// ---------------------------------------------------------------------------

/// Month-by-month amortisation of a standard annuity loan.
///
/// Finite (exactly `term_years * 12` items) and restartable: clone the
/// iterator before consuming it to replay the schedule from month one.
#[derive(Debug, Clone)]
pub struct MonthlyPeriods {
    principal: Money,
    payment: Money,
    monthly_rate: Rate,
    total_months: u32,
    month: u32,
    balance: Money,
    cumulative_principal: Money,
    cumulative_interest: Money,
}

impl MonthlyPeriods {
    pub fn payment(&self) -> Money {
        self.payment
    }
}

impl Iterator for MonthlyPeriods {
    type Item = AmortizationPeriod;

    fn next(&mut self) -> Option<Self::Item> {
        if self.month >= self.total_months {
            return None;
        }
        self.month += 1;

        let interest = self.balance * self.monthly_rate;
        let is_final = self.month == self.total_months;

        // The final month takes whatever principal is still owed so that the
        // schedule repays exactly the amount financed.
        let principal = if is_final {
            self.principal - self.cumulative_principal
        } else {
            self.payment - interest
        };

        self.cumulative_interest += interest;
        if is_final {
            self.cumulative_principal = self.principal;
            self.balance = Decimal::ZERO;
        } else {
            self.cumulative_principal += principal;
            self.balance = (self.balance - principal).max(Decimal::ZERO);
        }

        Some(AmortizationPeriod {
            index: self.month,
            payment: principal + interest,
            principal_component: principal,
            interest_component: interest,
            ending_balance: self.balance,
            cumulative_principal: self.cumulative_principal,
            cumulative_interest: self.cumulative_interest,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.total_months - self.month) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for MonthlyPeriods {}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Lazy monthly schedule for a standard annuity loan.
pub fn periods(params: &LoanParameters) -> HomeLoanResult<MonthlyPeriods> {
    let payment = monthly_payment(params)?;

    Ok(MonthlyPeriods {
        principal: params.principal,
        payment,
        monthly_rate: params.monthly_rate(),
        total_months: params.number_of_payments(),
        month: 0,
        balance: params.principal,
        cumulative_principal: Decimal::ZERO,
        cumulative_interest: Decimal::ZERO,
    })
}

/// Full amortisation schedule, monthly or aggregated by loan year.
pub fn generate(
    params: &LoanParameters,
    frequency: ScheduleFrequency,
) -> HomeLoanResult<AmortizationSchedule> {
    let iter = periods(params)?;
    let payment = iter.payment();
    let schedule = AmortizationSchedule::from_monthly(frequency, payment, iter.collect());

    debug!(
        principal = %params.principal,
        periods = schedule.periods.len(),
        total_interest = %schedule.total_interest,
        "amortisation schedule generated"
    );

    Ok(schedule)
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn aggregate_yearly(monthly: &[AmortizationPeriod]) -> Vec<AmortizationPeriod> {
    monthly
        .chunks(12)
        .zip(1u32..)
        .map(|(months, year)| {
            let (payment, principal, interest) = months.iter().fold(
                (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO),
                |(pay, prin, int), m| {
                    (
                        pay + m.payment,
                        prin + m.principal_component,
                        int + m.interest_component,
                    )
                },
            );
            // chunks() never yields an empty slice
            let last = &months[months.len() - 1];
            AmortizationPeriod {
                index: year,
                payment,
                principal_component: principal,
                interest_component: interest,
                ending_balance: last.ending_balance,
                cumulative_principal: last.cumulative_principal,
                cumulative_interest: last.cumulative_interest,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
