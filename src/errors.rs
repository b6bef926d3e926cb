use chrono::NaiveDate;
use thiserror::Error;

use crate::budgets::BalancePlan;
use crate::decimal::Money;
use crate::types::BudgetId;

#[derive(Error, Debug)]
pub enum BudgetError {
    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("unknown {family}: {name}")]
    UnknownStrategy {
        family: &'static str,
        name: String,
    },

    #[error("max total payment of {max_total} is less than sum of minimum payments ({minimum_sum})")]
    MaxPaymentBelowMinimums {
        max_total: Money,
        minimum_sum: Money,
    },

    #[error("payoff strategy returned {actual} payments for {expected} statements")]
    PaymentCountMismatch {
        expected: usize,
        actual: usize,
    },

    #[error("payoff does not converge: balances remain after {months} months")]
    PayoffDidNotConverge {
        months: u32,
    },

    #[error("arithmetic overflow while {operation}")]
    ArithmeticOverflow {
        operation: &'static str,
    },

    #[error("budget {budget_id} not balanced: {remaining} remaining")]
    BudgetNotBalanced {
        budget_id: BudgetId,
        remaining: Money,
    },

    #[error("balancer {phase} phase did not converge after {steps} steps")]
    BalancerDidNotConverge {
        phase: &'static str,
        steps: usize,
    },

    #[error("budget balance plan changed since it was approved")]
    PlanChanged {
        expected: Box<BalancePlan>,
        actual: Box<BalancePlan>,
    },

    #[error("pay period ending {end_date} has not ended (today is {today})")]
    PayPeriodNotEnded {
        end_date: NaiveDate,
        today: NaiveDate,
    },

    #[error("unknown budget: {budget_id}")]
    UnknownBudget {
        budget_id: BudgetId,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BudgetError>;
