//! Progressive transfer duty on a property purchase price.
//!
//! Duty is levied on marginal slices of the price: each bracket carries the
//! cumulative duty owed up to its lower bound plus a marginal rate on the
//! part of the price inside the bracket.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::HomeLoanError;
use crate::types::{Money, Rate};
use crate::HomeLoanResult;

/// Largest allowed gap between a bracket's base amount and the duty the
/// previous bracket yields at the shared boundary.
const CONTINUITY_TOLERANCE: Decimal = dec!(0.01);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One `[lower_bound, upper_bound)` slice of the duty table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferDutyBracket {
    pub lower_bound: Money,
    /// `None` for the open-ended top bracket.
    pub upper_bound: Option<Money>,
    /// Cumulative duty owed at `lower_bound`.
    pub base_amount: Money,
    pub marginal_rate: Rate,
}

impl TransferDutyBracket {
    pub fn new(
        lower_bound: Money,
        upper_bound: Option<Money>,
        base_amount: Money,
        marginal_rate: Rate,
    ) -> Self {
        Self {
            lower_bound,
            upper_bound,
            base_amount,
            marginal_rate,
        }
    }

    pub fn contains(&self, price: Money) -> bool {
        price >= self.lower_bound && self.upper_bound.map_or(true, |upper| price < upper)
    }

    /// Duty for a price evaluated with this bracket's formula.
    pub fn duty_at(&self, price: Money) -> Money {
        self.base_amount + (price - self.lower_bound) * self.marginal_rate
    }
}

/// Validated, ordered duty table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TransferDutyBracket>", into = "Vec<TransferDutyBracket>")]
pub struct DutySchedule {
    brackets: Vec<TransferDutyBracket>,
}

impl DutySchedule {
    /// Validate and build a schedule. Brackets must start at zero, be
    /// contiguous and non-overlapping, leave only the last one open-ended,
    /// and have base amounts continuous with the preceding bracket.
    pub fn new(brackets: Vec<TransferDutyBracket>) -> HomeLoanResult<Self> {
        let first = brackets
            .first()
            .ok_or_else(|| HomeLoanError::InvalidSchedule("no brackets supplied".into()))?;
        if !first.lower_bound.is_zero() {
            return Err(HomeLoanError::InvalidSchedule(format!(
                "first bracket must start at 0, starts at {}",
                first.lower_bound
            )));
        }

        for (i, bracket) in brackets.iter().enumerate() {
            if bracket.marginal_rate < Decimal::ZERO || bracket.base_amount < Decimal::ZERO {
                return Err(HomeLoanError::InvalidSchedule(format!(
                    "bracket {i} has a negative rate or base amount"
                )));
            }
            let is_last = i + 1 == brackets.len();
            match (bracket.upper_bound, is_last) {
                (None, false) => {
                    return Err(HomeLoanError::InvalidSchedule(format!(
                        "bracket {i} is open-ended but is not the last bracket"
                    )));
                }
                (Some(upper), _) if upper <= bracket.lower_bound => {
                    return Err(HomeLoanError::InvalidSchedule(format!(
                        "bracket {i} upper bound {upper} does not exceed lower bound {}",
                        bracket.lower_bound
                    )));
                }
                _ => {}
            }
        }

        for (i, pair) in brackets.windows(2).enumerate() {
            let (prev, next) = (&pair[0], &pair[1]);
            if prev.upper_bound != Some(next.lower_bound) {
                return Err(HomeLoanError::InvalidSchedule(format!(
                    "bracket {} must start where bracket {i} ends",
                    i + 1
                )));
            }
            let carried = prev.duty_at(next.lower_bound);
            if (carried - next.base_amount).abs() > CONTINUITY_TOLERANCE {
                return Err(HomeLoanError::InvalidSchedule(format!(
                    "bracket {} base amount {} is discontinuous with {carried}",
                    i + 1,
                    next.base_amount
                )));
            }
        }

        Ok(Self { brackets })
    }

    pub fn brackets(&self) -> &[TransferDutyBracket] {
        &self.brackets
    }

    /// Bracket whose `[lower, upper)` range contains the price.
    pub fn bracket_for(&self, purchase_price: Money) -> HomeLoanResult<&TransferDutyBracket> {
        validate_price(purchase_price)?;
        self.brackets
            .iter()
            .find(|b| b.contains(purchase_price))
            .ok_or_else(|| {
                HomeLoanError::InvalidSchedule(format!(
                    "no bracket covers purchase price {purchase_price}"
                ))
            })
    }

    pub fn duty(&self, purchase_price: Money) -> HomeLoanResult<Money> {
        Ok(self.bracket_for(purchase_price)?.duty_at(purchase_price))
    }
}

impl Default for DutySchedule {
    /// Transfer duty thresholds effective from 1 March 2023.
    fn default() -> Self {
        let b = TransferDutyBracket::new;
        Self {
            brackets: vec![
                b(dec!(0), Some(dec!(1_000_000)), dec!(0), dec!(0)),
                b(dec!(1_000_000), Some(dec!(1_375_000)), dec!(0), dec!(0.03)),
                b(dec!(1_375_000), Some(dec!(1_925_000)), dec!(11_250), dec!(0.06)),
                b(dec!(1_925_000), Some(dec!(2_475_000)), dec!(44_250), dec!(0.08)),
                b(dec!(2_475_000), Some(dec!(11_000_000)), dec!(88_250), dec!(0.11)),
                b(dec!(11_000_000), None, dec!(1_026_000), dec!(0.13)),
            ],
        }
    }
}

impl TryFrom<Vec<TransferDutyBracket>> for DutySchedule {
    type Error = HomeLoanError;

    fn try_from(brackets: Vec<TransferDutyBracket>) -> Result<Self, Self::Error> {
        DutySchedule::new(brackets)
    }
}

impl From<DutySchedule> for Vec<TransferDutyBracket> {
    fn from(schedule: DutySchedule) -> Self {
        schedule.brackets
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Transfer duty on `purchase_price` under the default duty table.
pub fn transfer_duty(purchase_price: Money) -> HomeLoanResult<Money> {
    DutySchedule::default().duty(purchase_price)
}

fn validate_price(purchase_price: Money) -> HomeLoanResult<()> {
    if purchase_price < Decimal::ZERO {
        return Err(HomeLoanError::invalid(
            "purchase_price",
            "Purchase price cannot be negative",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_schedule_is_valid() {
        let schedule = DutySchedule::default();
        let rebuilt = DutySchedule::new(schedule.brackets().to_vec()).unwrap();
        assert_eq!(rebuilt, schedule);
    }

    #[test]
    fn test_no_duty_at_threshold() {
        assert_eq!(transfer_duty(dec!(1_000_000)).unwrap(), Decimal::ZERO);
        assert_eq!(transfer_duty(dec!(850_000)).unwrap(), Decimal::ZERO);
        assert_eq!(transfer_duty(Decimal::ZERO).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_second_and_third_bracket() {
        // 3% of 375k above the threshold
        assert_eq!(transfer_duty(dec!(1_375_000)).unwrap(), dec!(11_250));
        // 11,250 + 6% of 125k
        assert_eq!(transfer_duty(dec!(1_500_000)).unwrap(), dec!(18_750));
    }

    #[test]
    fn test_top_bracket() {
        // 1,026,000 + 13% of 1m
        assert_eq!(transfer_duty(dec!(12_000_000)).unwrap(), dec!(1_156_000));
    }

    #[test]
    fn test_continuity_at_every_boundary() {
        let schedule = DutySchedule::default();
        for pair in schedule.brackets().windows(2) {
            let boundary = pair[1].lower_bound;
            let below = schedule.duty(boundary - dec!(0.01)).unwrap();
            let at = schedule.duty(boundary).unwrap();
            assert!(at >= below);
            assert!(at - below <= dec!(0.01) * pair[0].marginal_rate + dec!(0.0000001));
        }
    }

    #[test]
    fn test_duty_is_non_decreasing() {
        let mut previous = Decimal::ZERO;
        let mut price = Decimal::ZERO;
        while price <= dec!(13_000_000) {
            let duty = transfer_duty(price).unwrap();
            assert!(duty >= previous, "duty fell at {price}");
            previous = duty;
            price += dec!(125_000);
        }
    }

    #[test]
    fn test_negative_price_rejected() {
        match transfer_duty(dec!(-1)).unwrap_err() {
            HomeLoanError::InvalidInput { field, .. } => assert_eq!(field, "purchase_price"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_gap_rejected() {
        let err = DutySchedule::new(vec![
            TransferDutyBracket::new(dec!(0), Some(dec!(100)), dec!(0), dec!(0)),
            TransferDutyBracket::new(dec!(200), None, dec!(0), dec!(0.1)),
        ])
        .unwrap_err();
        assert!(matches!(err, HomeLoanError::InvalidSchedule(_)));
    }

    #[test]
    fn test_discontinuous_base_rejected() {
        let err = DutySchedule::new(vec![
            TransferDutyBracket::new(dec!(0), Some(dec!(100)), dec!(0), dec!(0.1)),
            TransferDutyBracket::new(dec!(100), None, dec!(50), dec!(0.2)),
        ])
        .unwrap_err();
        assert!(matches!(err, HomeLoanError::InvalidSchedule(_)));
    }

    #[test]
    fn test_open_ended_middle_bracket_rejected() {
        let err = DutySchedule::new(vec![
            TransferDutyBracket::new(dec!(0), None, dec!(0), dec!(0.1)),
            TransferDutyBracket::new(dec!(100), None, dec!(10), dec!(0.2)),
        ])
        .unwrap_err();
        assert!(matches!(err, HomeLoanError::InvalidSchedule(_)));
    }

    #[test]
    fn test_bounded_table_rejects_price_beyond_top() {
        let schedule = DutySchedule::new(vec![TransferDutyBracket::new(
            dec!(0),
            Some(dec!(100)),
            dec!(0),
            dec!(0.1),
        )])
        .unwrap();
        assert_eq!(schedule.duty(dec!(50)).unwrap(), dec!(5));
        assert!(schedule.duty(dec!(100)).is_err());
    }

    #[test]
    fn test_schedule_deserialises_with_validation() {
        let json = r#"[
            {"lower_bound": "0", "upper_bound": "500", "base_amount": "0", "marginal_rate": "0"},
            {"lower_bound": "500", "upper_bound": null, "base_amount": "0", "marginal_rate": "0.05"}
        ]"#;
        let schedule: DutySchedule = serde_json::from_str(json).unwrap();
        assert_eq!(schedule.duty(dec!(700)).unwrap(), dec!(10));

        let broken = r#"[{"lower_bound": "10", "upper_bound": null, "base_amount": "0", "marginal_rate": "0"}]"#;
        assert!(serde_json::from_str::<DutySchedule>(broken).is_err());
    }
}
