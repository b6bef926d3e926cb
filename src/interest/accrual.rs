use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::decimal::{Money, Rate};
use crate::errors::{BudgetError, Result};
use crate::interest::{days_inclusive, InterestCalculation, InterestOutcome};
use crate::types::Transactions;

/// Simple interest, charged once on the balance at the end of the period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimpleInterest {
    apr: Rate,
}

impl SimpleInterest {
    pub fn new(apr: Rate) -> Self {
        Self { apr }
    }
}

impl InterestCalculation for SimpleInterest {
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
            operation: "accruing simple interest",
        };
        let mut balance = principal;
        let mut num_days: u32 = 0;

        for day in days_inclusive(start_date, end_date) {
            num_days += 1;
            if let Some(amount) = transactions.get(&day) {
                balance = balance.checked_add(*amount).ok_or_else(overflow)?;
            }
        }

        let interest = balance
            .checked_mul(self.apr.as_decimal())
            .and_then(|m| m.checked_mul(Decimal::from(num_days)))
            .map(|m| m / Decimal::from(365))
            .ok_or_else(overflow)?;

        Ok(InterestOutcome {
            end_balance: balance.checked_add(interest).ok_or_else(overflow)?,
            interest_paid: interest,
        })
    }
}
