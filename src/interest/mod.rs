pub mod accrual;
pub mod compound;
pub mod min_payment;

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{BudgetError, Result};
use crate::types::Transactions;

pub use accrual::SimpleInterest;
pub use compound::AdbCompoundedDaily;
pub use min_payment::{
    MinPaymentAmEx, MinPaymentCiti, MinPaymentDiscover, MinPaymentKind, MinimumPaymentFormula,
};

/// result of running an interest calculation over one statement period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestOutcome {
    pub end_balance: Money,
    pub interest_paid: Money,
}

/// trait for statement interest calculations
pub trait InterestCalculation: fmt::Debug + Send + Sync {
    fn apr(&self) -> Rate;

    /// Run the calculation from `start_date` through `end_date` inclusive.
    /// Transactions dated outside that window are ignored. A balance that
    /// grows past what a decimal can hold is an
    /// [`BudgetError::ArithmeticOverflow`].
    fn calculate(
        &self,
        principal: Money,
        start_date: NaiveDate,
        end_date: NaiveDate,
        transactions: &Transactions,
    ) -> Result<InterestOutcome>;
}

/// registry of the interest calculations an account can be configured with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InterestKind {
    AdbCompoundedDaily,
    SimpleInterest,
}

impl InterestKind {
    pub fn all() -> &'static [InterestKind] {
        &[InterestKind::AdbCompoundedDaily, InterestKind::SimpleInterest]
    }

    pub fn name(&self) -> &'static str {
        match self {
            InterestKind::AdbCompoundedDaily => "AdbCompoundedDaily",
            InterestKind::SimpleInterest => "SimpleInterest",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            InterestKind::AdbCompoundedDaily => "Average Daily Balance Compounded Daily (AmEx)",
            InterestKind::SimpleInterest => "Interest charged once on the balance at end of period",
        }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| BudgetError::UnknownStrategy {
                family: "interest calculation",
                name: name.to_string(),
            })
    }

    /// build the calculation for a given APR
    pub fn with_apr(&self, apr: Rate) -> Arc<dyn InterestCalculation> {
        match self {
            InterestKind::AdbCompoundedDaily => Arc::new(AdbCompoundedDaily::new(apr)),
            InterestKind::SimpleInterest => Arc::new(SimpleInterest::new(apr)),
        }
    }
}

impl fmt::Display for InterestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// iterate the days of a statement window, both ends included
pub(crate) fn days_inclusive(
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> impl Iterator<Item = NaiveDate> {
    start_date.iter_days().take_while(move |d| *d <= end_date)
}
