pub mod billing;
pub mod budgets;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod interest;
pub mod payoff;
pub mod statement;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

// re-export key types
pub use billing::{BillingPeriod, Cadence};
pub use budgets::{BalancePlan, BalancerState, BudgetBalance, BudgetBalancer, PayPeriod, PeriodBalances};
pub use config::{BalancerConfig, PaymentSettings, ScheduledAmount, SimulationConfig};
pub use decimal::{Money, Rate};
pub use errors::{BudgetError, Result};
pub use interest::{
    AdbCompoundedDaily, InterestCalculation, InterestKind, InterestOutcome, MinPaymentAmEx,
    MinPaymentCiti, MinPaymentDiscover, MinPaymentKind, MinimumPaymentFormula, SimpleInterest,
};
pub use payoff::{
    calculate_payoffs, calculate_payoffs_with_config, AccountPayoff, CreditAccount,
    MethodProjection, PaymentLimits, PayoffMethod, PayoffMethodKind, PayoffProjection,
    PayoffStrategy,
};
pub use statement::{CcStatement, CcStatementBuilder};
pub use types::{Budget, BudgetId, PayoffResult, Transactions, Transfer};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
