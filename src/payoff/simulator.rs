use log::{debug, info, warn};

use crate::config::SimulationConfig;
use crate::decimal::Money;
use crate::errors::{BudgetError, Result};
use crate::payoff::PayoffStrategy;
use crate::statement::CcStatement;
use crate::types::PayoffResult;

struct Progress {
    statement: CcStatement,
    months: u32,
    total_paid: Money,
    done: bool,
}

/// Simulate paying off every statement with `method`, using the default
/// iteration ceiling.
///
/// Returns one `(months, total paid)` result per statement, in input order.
pub fn calculate_payoffs(
    method: &dyn PayoffStrategy,
    statements: &[CcStatement],
) -> Result<Vec<PayoffResult>> {
    calculate_payoffs_with_config(method, statements, &SimulationConfig::default())
}

/// Simulate paying off every statement with `method`.
///
/// Each billing period the method is asked for one payment per open
/// statement. A statement whose principal is already at or below zero closes
/// without a payment; one whose principal is covered by its payment closes
/// after paying exactly the principal; anything else pays and advances to the
/// next billing period. Fails with [`BudgetError::PayoffDidNotConverge`] once
/// `config.max_months` periods have been simulated with statements still open,
/// or earlier if a balance grows past what a decimal can hold.
pub fn calculate_payoffs_with_config(
    method: &dyn PayoffStrategy,
    statements: &[CcStatement],
    config: &SimulationConfig,
) -> Result<Vec<PayoffResult>> {
    debug!("calculating payoff via {:?} for {} statements", method, statements.len());

    let mut progress: Vec<Progress> = statements
        .iter()
        .map(|s| Progress {
            statement: s.clone(),
            months: 0,
            total_paid: Money::ZERO,
            done: false,
        })
        .collect();

    let mut periods: u32 = 0;
    loop {
        let open: Vec<usize> = (0..progress.len()).filter(|&i| !progress[i].done).collect();
        if open.is_empty() {
            break;
        }
        if periods >= config.max_months {
            return Err(BudgetError::PayoffDidNotConverge { months: periods });
        }
        periods += 1;

        let payments = {
            let current: Vec<&CcStatement> = open.iter().map(|&i| &progress[i].statement).collect();
            method.find_payments(&current)?
        };
        if payments.len() != open.len() {
            return Err(BudgetError::PaymentCountMismatch {
                expected: open.len(),
                actual: payments.len(),
            });
        }

        for (idx, payment) in open.into_iter().zip(payments) {
            let entry = &mut progress[idx];
            let principal = entry.statement.principal();
            if !principal.is_positive() {
                entry.done = true;
                continue;
            }
            entry.months += 1;
            if principal <= payment {
                entry.total_paid += principal;
                entry.done = true;
                continue;
            }
            entry.total_paid += payment;
            entry.statement = match entry.statement.pay(payment) {
                Ok(next) => next,
                Err(BudgetError::ArithmeticOverflow { operation }) => {
                    warn!(
                        "balance overflowed while {} after {} periods, payoff via {:?} diverges",
                        operation, periods, method
                    );
                    return Err(BudgetError::PayoffDidNotConverge { months: periods });
                }
                Err(e) => return Err(e),
            };
        }
    }

    let results: Vec<PayoffResult> = progress
        .into_iter()
        .map(|p| PayoffResult {
            months: p.months,
            total_paid: p.total_paid,
        })
        .collect();
    info!("payoff via {:?} finished after {} periods", method, periods);
    Ok(results)
}
