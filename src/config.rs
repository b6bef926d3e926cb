use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::Result;

/// a dated extra payment amount, as stored in payment settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledAmount {
    pub enabled: bool,
    pub date: NaiveDate,
    pub amount: Money,
}

impl ScheduledAmount {
    pub fn new(date: NaiveDate, amount: Money) -> Self {
        Self {
            enabled: true,
            date,
            amount,
        }
    }

    pub fn disabled(date: NaiveDate, amount: Money) -> Self {
        Self {
            enabled: false,
            date,
            amount,
        }
    }
}

/// Persisted payoff payment settings.
///
/// `increases` raise the total monthly payment from their date onward;
/// `onetimes` add a lump sum to a single month. Disabled entries are kept so
/// they survive a round trip but never affect a calculation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSettings {
    #[serde(default)]
    pub increases: Vec<ScheduledAmount>,
    #[serde(default)]
    pub onetimes: Vec<ScheduledAmount>,
}

impl PaymentSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// canonical JSON, both lists sorted by date
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.sorted())?)
    }

    pub fn sorted(&self) -> Self {
        let mut increases = self.increases.clone();
        let mut onetimes = self.onetimes.clone();
        increases.sort_by_key(|s| s.date);
        onetimes.sort_by_key(|s| s.date);
        Self {
            increases,
            onetimes,
        }
    }

    /// enabled increases by date; a later entry for the same date wins
    pub fn active_increases(&self) -> BTreeMap<NaiveDate, Money> {
        self.increases
            .iter()
            .filter(|s| s.enabled)
            .map(|s| (s.date, s.amount))
            .collect()
    }

    /// enabled one-time payments by date; entries sharing a date are summed
    pub fn active_onetimes(&self) -> BTreeMap<NaiveDate, Money> {
        let mut res = BTreeMap::new();
        for s in self.onetimes.iter().filter(|s| s.enabled) {
            *res.entry(s.date).or_insert(Money::ZERO) += s.amount;
        }
        res
    }
}

/// payoff simulator bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// billing periods simulated before giving up on a payoff
    pub max_months: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self { max_months: 1200 }
    }
}

/// budget balancer bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalancerConfig {
    /// transfers planned per phase before giving up
    pub max_steps: usize,
}

impl Default for BalancerConfig {
    fn default() -> Self {
        Self { max_steps: 10_000 }
    }
}
