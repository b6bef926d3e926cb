pub mod projection;
pub mod simulator;

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::billing::BillingPeriod;
use crate::config::PaymentSettings;
use crate::decimal::Money;
use crate::errors::{BudgetError, Result};
use crate::statement::CcStatement;

pub use projection::{AccountPayoff, CreditAccount, MethodProjection, PayoffProjection};
pub use simulator::{calculate_payoffs, calculate_payoffs_with_config};

/// decides how much to pay on each statement for one billing cycle
pub trait PayoffStrategy: fmt::Debug + Send + Sync {
    /// one payment per statement, in the same order as `statements`
    fn find_payments(&self, statements: &[&CcStatement]) -> Result<Vec<Money>>;
}

/// Total payment budget for a payoff, with scheduled changes.
///
/// An increase replaces the monthly total from its date onward; the most
/// recent increase on or before a payment date wins. A onetime adds to the
/// single month whose payment window contains its date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentLimits {
    max_total: Money,
    increases: BTreeMap<NaiveDate, Money>,
    onetimes: BTreeMap<NaiveDate, Money>,
}

impl PaymentLimits {
    pub fn new(max_total: Money) -> Self {
        Self {
            max_total,
            ..Self::default()
        }
    }

    /// limits using the enabled entries of persisted settings
    pub fn from_settings(max_total: Money, settings: &PaymentSettings) -> Self {
        Self {
            max_total,
            increases: settings.active_increases(),
            onetimes: settings.active_onetimes(),
        }
    }

    pub fn with_increases(mut self, increases: BTreeMap<NaiveDate, Money>) -> Self {
        self.increases = increases;
        self
    }

    pub fn with_onetimes(mut self, onetimes: BTreeMap<NaiveDate, Money>) -> Self {
        self.onetimes = onetimes;
        self
    }

    pub fn with_increase(mut self, date: NaiveDate, new_total: Money) -> Self {
        self.increases.insert(date, new_total);
        self
    }

    pub fn with_onetime(mut self, date: NaiveDate, amount: Money) -> Self {
        *self.onetimes.entry(date).or_insert(Money::ZERO) += amount;
        self
    }

    pub fn max_total(&self) -> Money {
        self.max_total
    }

    pub fn increases(&self) -> &BTreeMap<NaiveDate, Money> {
        &self.increases
    }

    pub fn onetimes(&self) -> &BTreeMap<NaiveDate, Money> {
        &self.onetimes
    }

    /// total available for the payment made during `period`
    pub fn max_total_for_period(&self, period: &BillingPeriod) -> Money {
        let payment_date = period.payment_date();
        let window_start = period.previous_period().payment_date();

        let mut res = match self.increases.range(..=payment_date).next_back() {
            Some((date, amount)) => {
                debug!(
                    "increase to {} starting {} applies to period {}",
                    amount, date, period
                );
                *amount
            }
            None => self.max_total,
        };

        for (date, amount) in self.onetimes.range(window_start..=payment_date) {
            if *date > window_start {
                debug!("onetime of {} on {} in period {}", amount, date, period);
                res += *amount;
            }
        }

        debug!(
            "period {} max_total={} max_total_for_period={}",
            period, self.max_total, res
        );
        res
    }

    /// Limit for the next payment on `statements`. Payments are posted in the
    /// billing period following the statements, so that period's payment date
    /// selects the increases and onetimes.
    pub fn max_total_for_statements(&self, statements: &[&CcStatement]) -> Money {
        match statements.first() {
            Some(stmt) => self.max_total_for_period(&stmt.billing_period().next_period()),
            None => self.max_total,
        }
    }
}

/// ordering key used to pick the account that absorbs the extra payment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    LowestBalance,
    HighestBalance,
    LowestApr,
    HighestApr,
}

impl Target {
    /// index of the target; ties go to the first statement
    fn select(&self, statements: &[&CcStatement]) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (idx, stmt) in statements.iter().enumerate() {
            let better = match best {
                None => true,
                Some(b) => {
                    let cur = statements[b];
                    match self {
                        Target::LowestBalance => stmt.principal() < cur.principal(),
                        Target::HighestBalance => stmt.principal() > cur.principal(),
                        Target::LowestApr => stmt.apr() < cur.apr(),
                        Target::HighestApr => stmt.apr() > cur.apr(),
                    }
                }
            };
            if better {
                best = Some(idx);
            }
        }
        best
    }
}

/// registry of payoff methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PayoffMethodKind {
    FixedPayment,
    HighestBalanceFirst,
    HighestInterestRateFirst,
    LowestBalanceFirst,
    LowestInterestRateFirst,
    MinPayment,
}

impl PayoffMethodKind {
    /// every method, sorted by name
    pub fn all() -> &'static [PayoffMethodKind] {
        &[
            PayoffMethodKind::FixedPayment,
            PayoffMethodKind::HighestBalanceFirst,
            PayoffMethodKind::HighestInterestRateFirst,
            PayoffMethodKind::LowestBalanceFirst,
            PayoffMethodKind::LowestInterestRateFirst,
            PayoffMethodKind::MinPayment,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            PayoffMethodKind::FixedPayment => "FixedPaymentMethod",
            PayoffMethodKind::HighestBalanceFirst => "HighestBalanceFirstMethod",
            PayoffMethodKind::HighestInterestRateFirst => "HighestInterestRateFirstMethod",
            PayoffMethodKind::LowestBalanceFirst => "LowestBalanceFirstMethod",
            PayoffMethodKind::LowestInterestRateFirst => "LowestInterestRateFirstMethod",
            PayoffMethodKind::MinPayment => "MinPaymentMethod",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PayoffMethodKind::FixedPayment => "TESTING ONLY - Fixed Payment for All Statements",
            PayoffMethodKind::HighestBalanceFirst => "Highest to Lowest Balance",
            PayoffMethodKind::HighestInterestRateFirst => {
                "Highest to Lowest Interest Rate (a.k.a. Avalanche Method)"
            }
            PayoffMethodKind::LowestBalanceFirst => {
                "Lowest to Highest Balance (a.k.a. Snowball Method)"
            }
            PayoffMethodKind::LowestInterestRateFirst => "Lowest to Highest Interest Rate",
            PayoffMethodKind::MinPayment => "Minimum Payment Only",
        }
    }

    /// the fixed payment method is a testing aid and hidden from users
    pub fn show_in_ui(&self) -> bool {
        !matches!(self, PayoffMethodKind::FixedPayment)
    }

    pub fn from_name(name: &str) -> Result<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| BudgetError::UnknownStrategy {
                family: "payoff method",
                name: name.to_string(),
            })
    }

    fn target(&self) -> Option<Target> {
        match self {
            PayoffMethodKind::HighestBalanceFirst => Some(Target::HighestBalance),
            PayoffMethodKind::HighestInterestRateFirst => Some(Target::HighestApr),
            PayoffMethodKind::LowestBalanceFirst => Some(Target::LowestBalance),
            PayoffMethodKind::LowestInterestRateFirst => Some(Target::LowestApr),
            PayoffMethodKind::FixedPayment | PayoffMethodKind::MinPayment => None,
        }
    }
}

impl fmt::Display for PayoffMethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// a payoff method paired with its payment limits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayoffMethod {
    kind: PayoffMethodKind,
    limits: PaymentLimits,
}

impl PayoffMethod {
    pub fn new(kind: PayoffMethodKind, limits: PaymentLimits) -> Self {
        Self { kind, limits }
    }

    /// pay exactly each statement's minimum
    pub fn min_payment() -> Self {
        Self::new(PayoffMethodKind::MinPayment, PaymentLimits::default())
    }

    /// pay `amount` on every statement
    pub fn fixed_payment(amount: Money) -> Self {
        Self::new(PayoffMethodKind::FixedPayment, PaymentLimits::new(amount))
    }

    pub fn highest_balance_first(limits: PaymentLimits) -> Self {
        Self::new(PayoffMethodKind::HighestBalanceFirst, limits)
    }

    pub fn highest_interest_rate_first(limits: PaymentLimits) -> Self {
        Self::new(PayoffMethodKind::HighestInterestRateFirst, limits)
    }

    pub fn lowest_balance_first(limits: PaymentLimits) -> Self {
        Self::new(PayoffMethodKind::LowestBalanceFirst, limits)
    }

    pub fn lowest_interest_rate_first(limits: PaymentLimits) -> Self {
        Self::new(PayoffMethodKind::LowestInterestRateFirst, limits)
    }

    pub fn kind(&self) -> PayoffMethodKind {
        self.kind
    }

    pub fn limits(&self) -> &PaymentLimits {
        &self.limits
    }

    fn targeted_payments(&self, target: Target, statements: &[&CcStatement]) -> Result<Vec<Money>> {
        let minimums: Vec<Money> = statements.iter().map(|s| s.minimum_payment()).collect();
        let Some(target_idx) = target.select(statements) else {
            return Ok(minimums);
        };

        let max_total = self.limits.max_total_for_statements(statements);
        let minimum_sum: Money = minimums.iter().sum();
        if minimum_sum > max_total {
            return Err(BudgetError::MaxPaymentBelowMinimums {
                max_total,
                minimum_sum,
            });
        }

        let target_payment = max_total - (minimum_sum - minimums[target_idx]);
        Ok(minimums
            .into_iter()
            .enumerate()
            .map(|(idx, min)| if idx == target_idx { target_payment } else { min })
            .collect())
    }
}

impl PayoffStrategy for PayoffMethod {
    fn find_payments(&self, statements: &[&CcStatement]) -> Result<Vec<Money>> {
        match self.kind {
            PayoffMethodKind::MinPayment => {
                Ok(statements.iter().map(|s| s.minimum_payment()).collect())
            }
            PayoffMethodKind::FixedPayment => {
                Ok(vec![self.limits.max_total(); statements.len()])
            }
            kind => match kind.target() {
                Some(target) => self.targeted_payments(target, statements),
                None => Ok(statements.iter().map(|s| s.minimum_payment()).collect()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Rate;
    use crate::interest::{InterestKind, MinPaymentKind};
    use crate::test_support::{date, money};
    use rust_decimal_macros::dec;

    fn stmt(apr: &str, balance: &str, statement_date: NaiveDate) -> CcStatement {
        CcStatement::builder()
            .interest_kind(
                InterestKind::AdbCompoundedDaily,
                Rate::from_decimal(money(apr).as_decimal()),
            )
            .min_payment_kind(MinPaymentKind::AmEx)
            .billing_period(BillingPeriod::for_statement_date(statement_date))
            .principal(money(balance))
            .end_balance(money(balance))
            .interest_amount(Money::ZERO)
            .build()
            .unwrap()
    }

    fn statements() -> Vec<CcStatement> {
        vec![
            stmt("0.1824", "2000", date(2017, 7, 31)),
            stmt("0.2999", "500", date(2017, 7, 31)),
            stmt("0.0999", "8000", date(2017, 7, 31)),
            stmt("0.2999", "500", date(2017, 7, 31)),
        ]
    }

    fn refs(stmts: &[CcStatement]) -> Vec<&CcStatement> {
        stmts.iter().collect()
    }

    #[test]
    fn test_increase_replaces_total() {
        let limits = PaymentLimits::new(money("1000"))
            .with_increase(date(2017, 8, 1), money("1200"))
            .with_increase(date(2018, 2, 1), money("1500"));

        let july = BillingPeriod::calendar_month(date(2017, 7, 1));
        assert_eq!(limits.max_total_for_period(&july), money("1000"));
        let aug = july.next_period();
        assert_eq!(limits.max_total_for_period(&aug), money("1200"));
        let jan = BillingPeriod::calendar_month(date(2018, 1, 1));
        assert_eq!(limits.max_total_for_period(&jan), money("1200"));
        assert_eq!(limits.max_total_for_period(&jan.next_period()), money("1500"));
    }

    #[test]
    fn test_onetime_applies_to_single_window() {
        let limits = PaymentLimits::new(money("1000"))
            .with_increase(date(2017, 8, 1), money("1200"))
            .with_onetime(date(2017, 9, 1), money("300"));

        // august pays on the 16th; september's window is (aug 16, sep 15]
        let aug = BillingPeriod::calendar_month(date(2017, 8, 1));
        assert_eq!(aug.payment_date(), date(2017, 8, 16));
        assert_eq!(limits.max_total_for_period(&aug), money("1200"));
        assert_eq!(limits.max_total_for_period(&aug.next_period()), money("1500"));
        assert_eq!(
            limits.max_total_for_period(&aug.next_period().next_period()),
            money("1200")
        );
    }

    #[test]
    fn test_onetime_on_window_start_belongs_to_previous_period() {
        let aug = BillingPeriod::calendar_month(date(2017, 8, 1));
        let limits = PaymentLimits::new(money("100")).with_onetime(date(2017, 8, 16), money("50"));
        assert_eq!(limits.max_total_for_period(&aug), money("150"));
        assert_eq!(limits.max_total_for_period(&aug.next_period()), money("100"));
    }

    #[test]
    fn test_limits_from_settings_skip_disabled() {
        let settings = PaymentSettings::from_json(
            r#"{"increases": [{"enabled": false, "date": "2017-08-01", "amount": "5000"}],
                "onetimes": [{"enabled": true, "date": "2017-08-10", "amount": "500"}]}"#,
        )
        .unwrap();
        let limits = PaymentLimits::from_settings(money("100"), &settings);
        assert!(limits.increases().is_empty());
        let aug = BillingPeriod::calendar_month(date(2017, 8, 1));
        assert_eq!(limits.max_total_for_period(&aug), money("600"));
    }

    #[test]
    fn test_min_payment_method() {
        let stmts = statements();
        let res = PayoffMethod::min_payment().find_payments(&refs(&stmts)).unwrap();
        assert_eq!(res, vec![money("35"), money("35"), money("80"), money("35")]);
    }

    #[test]
    fn test_fixed_payment_method() {
        let stmts = statements();
        let res = PayoffMethod::fixed_payment(money("12.34"))
            .find_payments(&refs(&stmts))
            .unwrap();
        assert_eq!(res, vec![money("12.34"); 4]);
    }

    #[test]
    fn test_targeted_methods_pick_one_account() {
        let stmts = statements();
        let limits = PaymentLimits::new(money("500"));
        let cases = [
            (PayoffMethodKind::LowestBalanceFirst, 1),
            (PayoffMethodKind::HighestBalanceFirst, 2),
            (PayoffMethodKind::LowestInterestRateFirst, 2),
            (PayoffMethodKind::HighestInterestRateFirst, 1),
        ];
        for (kind, target) in cases {
            let res = PayoffMethod::new(kind, limits.clone())
                .find_payments(&refs(&stmts))
                .unwrap();
            let minimums = [money("35"), money("35"), money("80"), money("35")];
            for (idx, pay) in res.iter().enumerate() {
                if idx == target {
                    assert_eq!(*pay, money("500") - money("185") + minimums[idx], "{}", kind);
                } else {
                    assert_eq!(*pay, minimums[idx], "{}", kind);
                }
            }
        }
    }

    #[test]
    fn test_targeted_allocation_conserves_total() {
        let stmts = statements();
        for total in [dec!(185), dec!(185.01), dec!(999.99), dec!(12345.6789)] {
            for kind in PayoffMethodKind::all().iter().filter(|k| k.target().is_some()) {
                let res = PayoffMethod::new(*kind, PaymentLimits::new(Money::from_decimal(total)))
                    .find_payments(&refs(&stmts))
                    .unwrap();
                let sum: Money = res.iter().sum();
                assert_eq!(sum, Money::from_decimal(total));
                for (pay, s) in res.iter().zip(stmts.iter()) {
                    assert!(*pay >= s.minimum_payment());
                }
            }
        }
    }

    #[test]
    fn test_max_below_minimums_is_an_error() {
        let stmts = statements();
        let err = PayoffMethod::lowest_balance_first(PaymentLimits::new(money("184.99")))
            .find_payments(&refs(&stmts))
            .unwrap_err();
        match err {
            BudgetError::MaxPaymentBelowMinimums {
                max_total,
                minimum_sum,
            } => {
                assert_eq!(max_total, money("184.99"));
                assert_eq!(minimum_sum, money("185"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_registry() {
        for kind in PayoffMethodKind::all() {
            assert_eq!(PayoffMethodKind::from_name(kind.name()).unwrap(), *kind);
        }
        let visible: Vec<_> = PayoffMethodKind::all()
            .iter()
            .filter(|k| k.show_in_ui())
            .collect();
        assert_eq!(visible.len(), 5);
        assert!(!PayoffMethodKind::FixedPayment.show_in_ui());
        assert!(matches!(
            PayoffMethodKind::from_name("Snowball"),
            Err(BudgetError::UnknownStrategy { .. })
        ));
    }
}
