use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;

/// budget identifier as assigned by the persistence layer
pub type BudgetId = u32;

/// balance adjustments keyed by the day they post; negative amounts are
/// payments or credits
pub type Transactions = BTreeMap<NaiveDate, Money>;

/// budget as seen by the balancer; owned and persisted by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: BudgetId,
    pub name: String,
    /// periodic budgets reset each pay period, standing budgets carry a balance
    pub is_periodic: bool,
    pub is_active: bool,
    /// excluded from balancing even when periodic and active
    pub skip_balance: bool,
    /// only meaningful for standing budgets
    pub current_balance: Money,
}

impl Budget {
    pub fn periodic(id: BudgetId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            is_periodic: true,
            is_active: true,
            skip_balance: false,
            current_balance: Money::ZERO,
        }
    }

    pub fn standing(id: BudgetId, name: impl Into<String>, current_balance: Money) -> Self {
        Self {
            id,
            name: name.into(),
            is_periodic: false,
            is_active: true,
            skip_balance: false,
            current_balance,
        }
    }

    /// whether this budget takes part in intra-period balancing
    pub fn is_balanced(&self) -> bool {
        self.is_periodic && self.is_active && !self.skip_balance
    }
}

/// one budget-to-budget transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub from_id: BudgetId,
    pub to_id: BudgetId,
    pub amount: Money,
}

impl Transfer {
    pub fn new(from_id: BudgetId, to_id: BudgetId, amount: Money) -> Self {
        Self { from_id, to_id, amount }
    }
}

/// months and total paid to retire one account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoffResult {
    pub months: u32,
    pub total_paid: Money,
}
