use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::decimal::{Money, Rate};
use crate::errors::{BudgetError, Result};
use crate::interest::{days_inclusive, InterestCalculation, InterestOutcome};
use crate::types::Transactions;

/// Average Daily Balance method, compounded daily (like American Express).
///
/// Each day the day's transactions post first, then one day of interest is
/// added to the balance. The interest reported on the statement is the
/// average of the daily balances times the APR for the number of days in the
/// period, and the projected end balance carries one further day of interest
/// on that amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdbCompoundedDaily {
    apr: Rate,
}

impl AdbCompoundedDaily {
    pub fn new(apr: Rate) -> Self {
        Self { apr }
    }
}

impl InterestCalculation for AdbCompoundedDaily {
    fn apr(&self) -> Rate {
        self.apr
    }

    fn calculate(
        &self,
        principal: Money,
        start_date: NaiveDate,
        end_date: NaiveDate,
        transactions: &Transactions,
    ) -> Result<InterestOutcome> {
        let overflow = || BudgetError::ArithmeticOverflow {
            operation: "compounding daily interest",
        };
        let daily_rate = self.apr.daily_rate();
        let mut balance = principal;
        let mut balance_total = Money::ZERO;
        let mut num_days: u32 = 0;

        for day in days_inclusive(start_date, end_date) {
            num_days += 1;
            if let Some(amount) = transactions.get(&day) {
                balance = balance.checked_add(*amount).ok_or_else(overflow)?;
            }
            let accrued = balance.checked_mul(daily_rate).ok_or_else(overflow)?;
            balance = balance.checked_add(accrued).ok_or_else(overflow)?;
            balance_total = balance_total.checked_add(balance).ok_or_else(overflow)?;
        }

        if num_days == 0 {
            return Ok(InterestOutcome {
                end_balance: principal,
                interest_paid: Money::ZERO,
            });
        }

        let days = Decimal::from(num_days);
        let average_daily_balance = balance_total / days;
        let interest = average_daily_balance
            .checked_mul(self.apr.as_decimal())
            .and_then(|m| m.checked_mul(days))
            .map(|m| m / Decimal::from(365))
            .ok_or_else(overflow)?;
        let carried = interest.checked_mul(daily_rate).ok_or_else(overflow)?;
        balance = balance.checked_add(carried).ok_or_else(overflow)?;

        Ok(InterestOutcome {
            end_balance: balance,
            interest_paid: interest,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_full_year() {
        let calc = AdbCompoundedDaily::new(Rate::from_decimal(dec!(0.1000)));
        let start = date(2017, 1, 1);
        let res = calc.calculate(
            Money::from_decimal(dec!(100.00)),
            start,
            start + Duration::days(365),
            &Transactions::new(),
        )
        .unwrap();

        assert_eq!(res.end_balance.round_dp(10), Money::from_decimal(dec!(110.5487464695)));
        assert_eq!(res.interest_paid.round_dp(10), Money::from_decimal(dec!(10.5487456779)));
    }

    #[test]
    fn test_transactions_post_before_accrual() {
        let calc = AdbCompoundedDaily::new(Rate::from_decimal(dec!(0.1000)));
        let start = date(2017, 1, 1);
        let end = start + Duration::days(365);
        let mut transactions = Transactions::new();
        transactions.insert(date(2017, 6, 1), Money::from_decimal(dec!(-50.00)));
        transactions.insert(end - Duration::days(1), Money::from_decimal(dec!(50.00)));

        let res = calc
            .calculate(Money::from_decimal(dec!(100.00)), start, end, &transactions)
            .unwrap();

        assert_eq!(res.end_balance.round_dp(10), Money::from_decimal(dec!(107.5420752170)));
        assert_eq!(res.interest_paid.round_dp(10), Money::from_decimal(dec!(7.5420746511)));
    }

    #[test]
    fn test_transactions_outside_period_ignored() {
        let calc = AdbCompoundedDaily::new(Rate::from_decimal(dec!(0.1824)));
        let start = date(2017, 1, 1);
        let end = date(2017, 1, 31);
        let mut outside = Transactions::new();
        outside.insert(date(2016, 12, 31), Money::from_major(-500));
        outside.insert(date(2017, 2, 1), Money::from_major(-500));

        let with = calc.calculate(Money::from_major(1000), start, end, &outside).unwrap();
        let without = calc
            .calculate(Money::from_major(1000), start, end, &Transactions::new())
            .unwrap();
        assert_eq!(with, without);
    }

    #[test]
    fn test_one_month_statement() {
        let calc = AdbCompoundedDaily::new(Rate::from_decimal(dec!(0.1824)));
        let res = calc.calculate(
            Money::from_major(1000),
            date(2017, 1, 1),
            date(2017, 1, 31),
            &Transactions::new(),
        )
        .unwrap();
        assert_eq!(res.end_balance.round_dp(8), Money::from_decimal(dec!(1015.61599612)));
        assert_eq!(res.interest_paid.round_dp(8), Money::from_decimal(dec!(15.61599223)));
    }

    #[test]
    fn test_interest_never_decreases_with_apr() {
        let start = date(2017, 3, 1);
        let end = date(2017, 3, 31);
        let mut transactions = Transactions::new();
        transactions.insert(date(2017, 3, 15), Money::from_major(-200));

        let mut last = Money::ZERO;
        for apr in [dec!(0), dec!(0.01), dec!(0.0999), dec!(0.1824), dec!(0.2999)] {
            let res = AdbCompoundedDaily::new(Rate::from_decimal(apr)).calculate(
                Money::from_major(2500),
                start,
                end,
                &transactions,
            )
            .unwrap();
            assert!(res.interest_paid >= last);
            last = res.interest_paid;
        }
    }

    #[test]
    fn test_zero_length_window() {
        let calc = AdbCompoundedDaily::new(Rate::from_decimal(dec!(0.20)));
        let res = calc.calculate(
            Money::from_major(100),
            date(2017, 2, 1),
            date(2017, 1, 31),
            &Transactions::new(),
        )
        .unwrap();
        assert_eq!(res.end_balance, Money::from_major(100));
        assert_eq!(res.interest_paid, Money::ZERO);
    }

    #[test]
    fn test_runaway_balance_is_an_overflow_error() {
        let calc = AdbCompoundedDaily::new(Rate::from_decimal(dec!(0.80)));
        let err = calc
            .calculate(
                Money::from_decimal(Decimal::MAX / dec!(2)),
                date(2017, 1, 1),
                date(2017, 1, 31),
                &Transactions::new(),
            )
            .unwrap_err();
        assert!(matches!(err, BudgetError::ArithmeticOverflow { .. }));
    }
}
