use std::sync::Arc;

use chrono::NaiveDate;
use log::debug;

use crate::billing::BillingPeriod;
use crate::decimal::{Money, Rate};
use crate::errors::{BudgetError, Result};
use crate::interest::{InterestCalculation, InterestKind, MinPaymentKind, MinimumPaymentFormula};
use crate::types::Transactions;

/// One credit card statement: a billing period with its principal and
/// interest fully resolved.
///
/// Statements are immutable. Advancing a simulation always produces a new
/// statement for the following billing period via [`CcStatement::pay`] or
/// [`CcStatement::next_with_transactions`].
#[derive(Debug, Clone)]
pub struct CcStatement {
    interest_calc: Arc<dyn InterestCalculation>,
    min_payment_formula: Arc<dyn MinimumPaymentFormula>,
    billing_period: BillingPeriod,
    orig_principal: Money,
    transactions: Transactions,
    principal: Money,
    interest: Money,
}

impl CcStatement {
    /// statement whose end balance and interest are calculated from the
    /// starting principal
    pub fn new(
        interest_calc: Arc<dyn InterestCalculation>,
        principal: Money,
        min_payment_formula: Arc<dyn MinimumPaymentFormula>,
        billing_period: BillingPeriod,
        transactions: Transactions,
    ) -> Result<Self> {
        Self::resolve(
            interest_calc,
            principal,
            min_payment_formula,
            billing_period,
            transactions,
            None,
            None,
        )
    }

    pub fn builder() -> CcStatementBuilder {
        CcStatementBuilder::new()
    }

    fn resolve(
        interest_calc: Arc<dyn InterestCalculation>,
        orig_principal: Money,
        min_payment_formula: Arc<dyn MinimumPaymentFormula>,
        billing_period: BillingPeriod,
        transactions: Transactions,
        end_balance: Option<Money>,
        interest_amount: Option<Money>,
    ) -> Result<Self> {
        let (principal, interest) = match (end_balance, interest_amount) {
            (Some(balance), Some(interest)) => (balance, interest),
            _ => {
                let outcome = interest_calc.calculate(
                    orig_principal,
                    billing_period.start_date(),
                    billing_period.end_date(),
                    &transactions,
                )?;
                (
                    end_balance.unwrap_or(outcome.end_balance),
                    interest_amount.unwrap_or(outcome.interest_paid),
                )
            }
        };

        debug!(
            "statement {} principal={} interest={} (from {})",
            billing_period, principal, interest, orig_principal
        );

        Ok(Self {
            interest_calc,
            min_payment_formula,
            billing_period,
            orig_principal,
            transactions,
            principal,
            interest,
        })
    }

    /// balance owed at the end of the statement period
    pub fn principal(&self) -> Money {
        self.principal
    }

    /// interest charged during the statement period
    pub fn interest(&self) -> Money {
        self.interest
    }

    /// principal the period started from
    pub fn orig_principal(&self) -> Money {
        self.orig_principal
    }

    pub fn billing_period(&self) -> &BillingPeriod {
        &self.billing_period
    }

    pub fn transactions(&self) -> &Transactions {
        &self.transactions
    }

    pub fn start_date(&self) -> NaiveDate {
        self.billing_period.start_date()
    }

    pub fn end_date(&self) -> NaiveDate {
        self.billing_period.end_date()
    }

    pub fn apr(&self) -> Rate {
        self.interest_calc.apr()
    }

    /// minimum payment due for this statement; recomputed on every call
    pub fn minimum_payment(&self) -> Money {
        self.min_payment_formula
            .calculate(self.principal, self.interest)
    }

    /// statement for the next billing period, starting from this statement's
    /// principal with `transactions` applied
    pub fn next_with_transactions(&self, transactions: Transactions) -> Result<CcStatement> {
        Self::resolve(
            Arc::clone(&self.interest_calc),
            self.principal,
            Arc::clone(&self.min_payment_formula),
            self.billing_period.next_period(),
            transactions,
            None,
            None,
        )
    }

    /// statement for the next billing period with a payment of `amount` made on
    /// that period's payment date
    pub fn pay(&self, amount: Money) -> Result<CcStatement> {
        let mut transactions = Transactions::new();
        transactions.insert(self.billing_period.next_period().payment_date(), -amount);
        self.next_with_transactions(transactions)
    }
}

/// builder for statements, including ones seeded from an observed real
/// statement whose balance and interest are already known
#[derive(Debug, Default)]
pub struct CcStatementBuilder {
    interest_calc: Option<Arc<dyn InterestCalculation>>,
    min_payment_formula: Option<Arc<dyn MinimumPaymentFormula>>,
    billing_period: Option<BillingPeriod>,
    principal: Money,
    transactions: Transactions,
    end_balance: Option<Money>,
    interest_amount: Option<Money>,
}

impl CcStatementBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn interest_calculation(mut self, calc: Arc<dyn InterestCalculation>) -> Self {
        self.interest_calc = Some(calc);
        self
    }

    pub fn interest_kind(self, kind: InterestKind, apr: Rate) -> Self {
        self.interest_calculation(kind.with_apr(apr))
    }

    pub fn min_payment_formula(mut self, formula: Arc<dyn MinimumPaymentFormula>) -> Self {
        self.min_payment_formula = Some(formula);
        self
    }

    pub fn min_payment_kind(self, kind: MinPaymentKind) -> Self {
        self.min_payment_formula(kind.formula())
    }

    pub fn billing_period(mut self, period: BillingPeriod) -> Self {
        self.billing_period = Some(period);
        self
    }

    pub fn principal(mut self, principal: Money) -> Self {
        self.principal = principal;
        self
    }

    pub fn transactions(mut self, transactions: Transactions) -> Self {
        self.transactions = transactions;
        self
    }

    pub fn transaction(mut self, date: NaiveDate, amount: Money) -> Self {
        *self.transactions.entry(date).or_insert(Money::ZERO) += amount;
        self
    }

    /// known ending balance; skips calculating it
    pub fn end_balance(mut self, balance: Money) -> Self {
        self.end_balance = Some(balance);
        self
    }

    /// known interest charged; skips calculating it
    pub fn interest_amount(mut self, interest: Money) -> Self {
        self.interest_amount = Some(interest);
        self
    }

    pub fn build(self) -> Result<CcStatement> {
        let interest_calc = self.interest_calc.ok_or(BudgetError::InvalidConfiguration {
            message: "statement requires an interest calculation".to_string(),
        })?;
        let min_payment_formula =
            self.min_payment_formula
                .ok_or(BudgetError::InvalidConfiguration {
                    message: "statement requires a minimum payment formula".to_string(),
                })?;
        let billing_period = self.billing_period.ok_or(BudgetError::InvalidConfiguration {
            message: "statement requires a billing period".to_string(),
        })?;

        CcStatement::resolve(
            interest_calc,
            self.principal,
            min_payment_formula,
            billing_period,
            self.transactions,
            self.end_balance,
            self.interest_amount,
        )
    }
}
