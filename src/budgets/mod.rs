pub mod balancer;
pub mod pay_period;

pub use balancer::{BalancePlan, BalancerState, BudgetBalance, BudgetBalancer, PeriodBalances};
pub use pay_period::PayPeriod;
