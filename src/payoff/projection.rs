use std::collections::BTreeMap;

use chrono::NaiveDate;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::billing::BillingPeriod;
use crate::config::{PaymentSettings, SimulationConfig};
use crate::decimal::{Money, Rate};
use crate::errors::Result;
use crate::interest::{InterestKind, MinPaymentKind};
use crate::payoff::{calculate_payoffs_with_config, PaymentLimits, PayoffMethod, PayoffMethodKind};
use crate::statement::CcStatement;

pub type AccountId = u32;

/// a credit account with its most recent observed balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditAccount {
    pub id: AccountId,
    pub name: String,
    /// ledger balance; amounts owed are usually negative
    pub balance: Money,
    pub apr: Rate,
    pub interest: InterestKind,
    pub min_payment: MinPaymentKind,
    /// date the balance was observed
    pub statement_date: NaiveDate,
}

/// payoff of one account under one method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountPayoff {
    pub payoff_months: u32,
    pub total_payments: Money,
    pub total_interest: Money,
}

/// outcome of one payoff method across all accounts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodProjection {
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<BTreeMap<AccountId, AccountPayoff>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Compares every user-facing payoff method over a set of credit accounts.
///
/// Each account is seeded as a statement whose end balance is the observed
/// balance with no interest. Every method gets the sum of the current minimum
/// payments as its monthly total, adjusted by the enabled increases and
/// onetimes in the payment settings.
#[derive(Debug, Clone)]
pub struct PayoffProjection {
    statements: BTreeMap<AccountId, CcStatement>,
    settings: PaymentSettings,
    config: SimulationConfig,
}

impl PayoffProjection {
    pub fn new(accounts: &[CreditAccount], settings: PaymentSettings) -> Result<Self> {
        let mut statements = BTreeMap::new();
        for acct in accounts {
            let balance = acct.balance.abs();
            let stmt = CcStatement::builder()
                .interest_kind(acct.interest, acct.apr)
                .min_payment_kind(acct.min_payment)
                .billing_period(BillingPeriod::for_statement_date(acct.statement_date))
                .principal(balance)
                .end_balance(balance)
                .interest_amount(Money::ZERO)
                .build()?;
            statements.insert(acct.id, stmt);
        }
        debug!("payoff projection over {} accounts", statements.len());
        Ok(Self {
            statements,
            settings,
            config: SimulationConfig::default(),
        })
    }

    pub fn with_config(mut self, config: SimulationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn statements(&self) -> &BTreeMap<AccountId, CcStatement> {
        &self.statements
    }

    /// minimum payment due on each account's latest statement
    pub fn min_payments(&self) -> BTreeMap<AccountId, Money> {
        self.statements
            .iter()
            .map(|(id, stmt)| (*id, stmt.minimum_payment()))
            .collect()
    }

    /// runs every user-facing method; a failing method records its error
    pub fn calculate_payoffs(&self) -> BTreeMap<PayoffMethodKind, MethodProjection> {
        let max_total: Money = self.min_payments().values().sum();
        let limits = PaymentLimits::from_settings(max_total, &self.settings);

        let mut res = BTreeMap::new();
        for kind in PayoffMethodKind::all().iter().filter(|k| k.show_in_ui()) {
            let method = PayoffMethod::new(*kind, limits.clone());
            let projection = match self.calc_payoff_method(&method) {
                Ok(results) => MethodProjection {
                    description: kind.description().to_string(),
                    results: Some(results),
                    error: None,
                },
                Err(e) => {
                    warn!("payoff method {} failed: {}", kind, e);
                    MethodProjection {
                        description: kind.description().to_string(),
                        results: None,
                        error: Some(e.to_string()),
                    }
                }
            };
            res.insert(*kind, projection);
        }
        info!("projected {} payoff methods, max total {}", res.len(), max_total);
        res
    }

    fn calc_payoff_method(&self, method: &PayoffMethod) -> Result<BTreeMap<AccountId, AccountPayoff>> {
        let statements: Vec<CcStatement> = self.statements.values().cloned().collect();
        let payoffs = calculate_payoffs_with_config(method, &statements, &self.config)?;

        Ok(self
            .statements
            .iter()
            .zip(payoffs)
            .map(|((id, stmt), result)| {
                (
                    *id,
                    AccountPayoff {
                        payoff_months: result.months,
                        total_payments: result.total_paid,
                        total_interest: result.total_paid - stmt.principal(),
                    },
                )
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScheduledAmount;
    use crate::test_support::{date, money};
    use rust_decimal_macros::dec;

    fn accounts() -> Vec<CreditAccount> {
        vec![
            CreditAccount {
                id: 3,
                name: "CreditOne".to_string(),
                balance: money("-952.06"),
                apr: Rate::from_decimal(dec!(0.0100)),
                interest: InterestKind::AdbCompoundedDaily,
                min_payment: MinPaymentKind::AmEx,
                statement_date: date(2017, 7, 31),
            },
            CreditAccount {
                id: 4,
                name: "CreditTwo".to_string(),
                balance: money("-5498.65"),
                apr: Rate::from_decimal(dec!(0.1000)),
                interest: InterestKind::AdbCompoundedDaily,
                min_payment: MinPaymentKind::Discover,
                statement_date: date(2017, 7, 31),
            },
        ]
    }

    fn assert_payoff(p: &AccountPayoff, months: u32, total: &str, principal: &str) {
        assert_eq!(p.payoff_months, months);
        assert!((p.total_payments - money(total)).abs() < money("0.0001"));
        assert_eq!(p.total_interest, p.total_payments - money(principal));
    }

    #[test]
    fn test_min_payments() {
        let proj = PayoffProjection::new(&accounts(), PaymentSettings::new()).unwrap();
        assert_eq!(
            proj.min_payments(),
            BTreeMap::from([(3, money("35")), (4, money("109.9730"))])
        );
        assert_eq!(proj.statements()[&3].principal(), money("952.06"));
        assert_eq!(proj.statements()[&4].interest(), Money::ZERO);
    }

    #[test]
    fn test_calculate_payoffs() {
        let proj = PayoffProjection::new(&accounts(), PaymentSettings::new()).unwrap();
        let res = proj.calculate_payoffs();

        assert_eq!(res.len(), 5);
        assert!(!res.contains_key(&PayoffMethodKind::FixedPayment));

        let min = res[&PayoffMethodKind::MinPayment].results.as_ref().unwrap();
        assert_payoff(&min[&3], 28, "962.9988625702", "952.06");
        assert_payoff(&min[&4], 162, "8664.861877369", "5498.65");

        let snowball = &res[&PayoffMethodKind::LowestBalanceFirst];
        assert_eq!(snowball.description, "Lowest to Highest Balance (a.k.a. Snowball Method)");
        let snowball = snowball.results.as_ref().unwrap();
        assert_payoff(&snowball[&3], 21, "960.9178327498", "952.06");
        assert_payoff(&snowball[&4], 56, "6988.237124948", "5498.65");

        let avalanche = res[&PayoffMethodKind::HighestInterestRateFirst]
            .results
            .as_ref()
            .unwrap();
        assert_payoff(&avalanche[&3], 28, "962.9988625702", "952.06");
        assert_payoff(&avalanche[&4], 55, "6956.345228060", "5498.65");
    }

    #[test]
    fn test_settings_onetime_applies() {
        let settings = PaymentSettings {
            increases: vec![],
            onetimes: vec![ScheduledAmount::new(date(2017, 8, 10), money("500"))],
        };
        let proj = PayoffProjection::new(&accounts(), settings).unwrap();
        let res = proj.calculate_payoffs();
        let snowball = res[&PayoffMethodKind::LowestBalanceFirst].results.as_ref().unwrap();
        assert_payoff(&snowball[&3], 12, "954.4512712167", "952.06");
        assert_payoff(&snowball[&4], 51, "6817.521075876", "5498.65");
    }

    #[test]
    fn test_failing_method_records_error() {
        let settings = PaymentSettings {
            increases: vec![ScheduledAmount::new(date(2017, 8, 1), money("10"))],
            onetimes: vec![],
        };
        let proj = PayoffProjection::new(&accounts(), settings).unwrap();
        let res = proj.calculate_payoffs();

        assert!(res[&PayoffMethodKind::MinPayment].results.is_some());
        let failed = &res[&PayoffMethodKind::LowestBalanceFirst];
        assert!(failed.results.is_none());
        let error = failed.error.as_deref().unwrap();
        assert!(error.starts_with("max total payment of 10 is less than sum of minimum payments"));
    }
}
