use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;

use crate::decimal::{Money, Rate};
use crate::errors::Result;
use crate::interest::{days_inclusive, InterestCalculation, InterestOutcome, MinimumPaymentFormula};
use crate::types::Transactions;

/// charges the same interest amount every period; the amount doubles as the APR
/// so rate-ordered methods can still rank statements
#[derive(Debug, Default)]
pub struct FixedInterest {
    pub amount: Money,
    pub calls: Arc<AtomicUsize>,
}

impl FixedInterest {
    pub fn new(amount: Money) -> Self {
        Self {
            amount,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl InterestCalculation for FixedInterest {
    fn apr(&self) -> Rate {
        Rate::from_decimal(self.amount.as_decimal())
    }

    fn calculate(
        &self,
        principal: Money,
        start_date: NaiveDate,
        end_date: NaiveDate,
        transactions: &Transactions,
    ) -> Result<InterestOutcome> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let balance = days_inclusive(start_date, end_date)
            .filter_map(|d| transactions.get(&d))
            .fold(principal, |bal, amount| bal + *amount);
        Ok(InterestOutcome {
            end_balance: balance + self.amount,
            interest_paid: self.amount,
        })
    }
}

/// minimum payment that ignores the statement
#[derive(Debug, Clone, Copy)]
pub struct FixedMinimum(pub Money);

impl MinimumPaymentFormula for FixedMinimum {
    fn calculate(&self, _balance: Money, _interest: Money) -> Money {
        self.0
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn money(s: &str) -> Money {
    Money::from_str_exact(s).unwrap()
}
