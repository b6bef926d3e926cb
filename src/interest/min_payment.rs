use std::fmt;
use std::sync::Arc;

use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::{BudgetError, Result};

/// issuer rule for the minimum payment due on a statement
pub trait MinimumPaymentFormula: fmt::Debug + Send + Sync {
    /// `balance` is the amount owed on the statement, `interest` the interest
    /// charged during the statement period
    fn calculate(&self, balance: Money, interest: Money) -> Money;
}

/// Interest plus 1% of the balance, or $35, whichever is greater.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MinPaymentAmEx;

impl MinimumPaymentFormula for MinPaymentAmEx {
    fn calculate(&self, balance: Money, interest: Money) -> Money {
        (interest + balance.percent_of(dec!(0.01))).max(Money::from_major(35))
    }
}

/// Greatest of $35, 2% of the new balance, or $20 plus interest charged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MinPaymentDiscover;

impl MinimumPaymentFormula for MinPaymentDiscover {
    fn calculate(&self, balance: Money, interest: Money) -> Money {
        Money::from_major(35)
            .max(balance.percent_of(dec!(0.02)))
            .max(Money::from_major(20) + interest)
    }
}

/// Greatest of $25, 1% of the new balance plus interest, or 1.5% of the new
/// balance rounded to the nearest dollar. Balances under $25 are also a
/// candidate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MinPaymentCiti;

impl MinimumPaymentFormula for MinPaymentCiti {
    fn calculate(&self, balance: Money, interest: Money) -> Money {
        let floor = Money::from_major(25);
        let mut amount = floor
            .max(balance.percent_of(dec!(0.01)) + interest)
            .max(balance.percent_of(dec!(0.015)).round_to_dollar());
        if balance < floor {
            amount = amount.max(balance);
        }
        amount
    }
}

/// registry of minimum payment formulas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MinPaymentKind {
    AmEx,
    Discover,
    Citi,
}

impl MinPaymentKind {
    pub fn all() -> &'static [MinPaymentKind] {
        &[MinPaymentKind::AmEx, MinPaymentKind::Discover, MinPaymentKind::Citi]
    }

    pub fn name(&self) -> &'static str {
        match self {
            MinPaymentKind::AmEx => "MinPaymentAmEx",
            MinPaymentKind::Discover => "MinPaymentDiscover",
            MinPaymentKind::Citi => "MinPaymentCiti",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            MinPaymentKind::AmEx => "AmEx - Greatest of Interest Plus 1% of Principal, or $35",
            MinPaymentKind::Discover => {
                "Discover - Greatest of 2% of Principal, or $20 plus Interest, or $35"
            }
            MinPaymentKind::Citi => {
                "Citi - Greatest of 1.5% of Principal, or 1% of Principal plus interest, or $25, or Principal"
            }
        }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| BudgetError::UnknownStrategy {
                family: "minimum payment formula",
                name: name.to_string(),
            })
    }

    pub fn formula(&self) -> Arc<dyn MinimumPaymentFormula> {
        match self {
            MinPaymentKind::AmEx => Arc::new(MinPaymentAmEx),
            MinPaymentKind::Discover => Arc::new(MinPaymentDiscover),
            MinPaymentKind::Citi => Arc::new(MinPaymentCiti),
        }
    }
}

impl fmt::Display for MinPaymentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
