use std::collections::BTreeMap;

use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::budgets::PayPeriod;
use crate::config::BalancerConfig;
use crate::decimal::Money;
use crate::errors::{BudgetError, Result};
use crate::types::{Budget, BudgetId, Transfer};

/// remaining amounts for a pay period, as computed by the caller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodBalances {
    /// remaining amount per periodic budget
    pub remaining: BTreeMap<BudgetId, Money>,
    /// remaining amount for the pay period as a whole
    pub overall_remaining: Money,
}

impl PeriodBalances {
    /// balances whose overall remaining is the sum of the per-budget amounts
    pub fn new(remaining: BTreeMap<BudgetId, Money>) -> Self {
        let overall_remaining = remaining.values().sum();
        Self {
            remaining,
            overall_remaining,
        }
    }

    pub fn with_overall_remaining(mut self, overall_remaining: Money) -> Self {
        self.overall_remaining = overall_remaining;
        self
    }
}

/// Snapshot of a balancing run. Each step returns a new state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalancerState {
    pub remaining: BTreeMap<BudgetId, Money>,
    pub transfers: Vec<Transfer>,
    pub standing_balance: Money,
}

impl BalancerState {
    pub fn new(remaining: BTreeMap<BudgetId, Money>, standing_balance: Money) -> Self {
        Self {
            remaining,
            transfers: Vec::new(),
            standing_balance,
        }
    }

    fn max_entry(&self) -> Option<(BudgetId, Money)> {
        let mut best: Option<(BudgetId, Money)> = None;
        for (id, v) in &self.remaining {
            if best.map_or(true, |(_, b)| *v > b) {
                best = Some((*id, *v));
            }
        }
        best
    }

    fn min_entry(&self) -> Option<(BudgetId, Money)> {
        let mut best: Option<(BudgetId, Money)> = None;
        for (id, v) in &self.remaining {
            if best.map_or(true, |(_, b)| *v < b) {
                best = Some((*id, *v));
            }
        }
        best
    }

    fn with_transfer(&self, transfer: Transfer) -> Self {
        debug!(
            "transfer {} from budget {} to budget {}",
            transfer.amount, transfer.from_id, transfer.to_id
        );
        let mut next = self.clone();
        next.transfers.push(transfer);
        next
    }

    /// One pairwise step: move money from the largest surplus to the largest
    /// deficit until one of them is zero. `None` once every remaining amount
    /// shares a sign, or when the standing budget is overdrawn.
    pub fn pairwise_step(&self) -> Option<BalancerState> {
        if self.standing_balance.is_negative() {
            return None;
        }
        let (max_id, max_v) = self.max_entry()?;
        let (min_id, min_v) = self.min_entry()?;
        if !max_v.is_positive() || !min_v.is_negative() {
            return None;
        }

        let amount = max_v.min(-min_v);
        let mut next = self.with_transfer(Transfer::new(max_id, min_id, amount));
        next.remaining.insert(max_id, max_v - amount);
        next.remaining.insert(min_id, min_v + amount);
        Some(next)
    }

    /// One standing budget step: sweep the largest surplus into the standing
    /// budget, or once there are no surpluses, cover the largest deficit from
    /// it. A deficit larger than the standing balance is covered partially.
    /// `None` when nothing is left to move or the standing budget is empty.
    pub fn standing_step(&self, standing_id: BudgetId) -> Option<BalancerState> {
        let (max_id, max_v) = self.max_entry()?;
        if max_v.is_positive() {
            let mut next = self.with_transfer(Transfer::new(max_id, standing_id, max_v));
            next.remaining.insert(max_id, Money::ZERO);
            next.standing_balance += max_v;
            return Some(next);
        }

        let (min_id, min_v) = self.min_entry()?;
        if !min_v.is_negative() || !self.standing_balance.is_positive() {
            return None;
        }
        let amount = (-min_v).min(self.standing_balance);
        if amount < -min_v {
            warn!(
                "standing budget {} can only cover {} of {} for budget {}",
                standing_id, amount, -min_v, min_id
            );
        }
        let mut next = self.with_transfer(Transfer::new(standing_id, min_id, amount));
        next.remaining.insert(min_id, min_v + amount);
        next.standing_balance -= amount;
        Some(next)
    }
}

fn run_phase<F>(state: BalancerState, phase: &'static str, max_steps: usize, step: F) -> Result<BalancerState>
where
    F: Fn(&BalancerState) -> Option<BalancerState>,
{
    let mut state = state;
    for _ in 0..max_steps {
        match step(&state) {
            Some(next) => state = next,
            None => return Ok(state),
        }
    }
    match step(&state) {
        None => Ok(state),
        Some(_) => Err(BudgetError::BalancerDidNotConverge {
            phase,
            steps: max_steps,
        }),
    }
}

/// one budget's remaining amount before and after balancing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetBalance {
    pub before: Money,
    pub after: Money,
    pub name: String,
}

/// Proposed transfers for balancing a pay period.
///
/// Equality is numeric, so a plan read back from JSON with differently scaled
/// amounts still matches the plan it was written from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalancePlan {
    pub pp_start_date: NaiveDate,
    /// transfers between budgets and the standing budget, in order
    pub transfers: Vec<Transfer>,
    /// participating budgets that had something remaining
    pub budgets: BTreeMap<BudgetId, BudgetBalance>,
    pub standing_id: BudgetId,
    pub standing_name: String,
    pub standing_before: Money,
    /// standing balance after `transfers`
    pub standing_after: Money,
    /// pay period remaining before any transfer
    pub overall_before: Money,
    /// final transfer between the standing and catch-all budgets that zeroes
    /// the pay period
    pub period_transfer: Option<Transfer>,
    /// amount the standing budget could not cover
    pub shortfall: Option<Money>,
}

impl BalancePlan {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// every transfer to make, the period transfer last
    pub fn all_transfers(&self) -> Vec<Transfer> {
        self.transfers
            .iter()
            .copied()
            .chain(self.period_transfer)
            .collect()
    }

    /// standing balance once the period transfer is made too
    pub fn standing_final(&self) -> Money {
        match self.period_transfer {
            Some(t) if t.to_id == self.standing_id => self.standing_after + t.amount,
            Some(t) if t.from_id == self.standing_id => self.standing_after - t.amount,
            _ => self.standing_after,
        }
    }

    /// pay period remaining once every transfer is made; zero unless there
    /// was a shortfall
    pub fn overall_after(&self) -> Money {
        self.all_transfers()
            .iter()
            .fold(self.overall_before, |acc, t| {
                if t.to_id == self.standing_id {
                    acc - t.amount
                } else if t.from_id == self.standing_id {
                    acc + t.amount
                } else {
                    acc
                }
            })
    }
}

/// Balances the periodic budgets of a finished pay period.
///
/// Surpluses are first matched against deficits budget to budget. Whatever is
/// left is swept into, or covered from, the standing budget. Finally one
/// transfer between the standing budget and the catch-all budget zeroes the
/// pay period as a whole.
#[derive(Debug, Clone)]
pub struct BudgetBalancer {
    pay_period: PayPeriod,
    budgets: BTreeMap<BudgetId, Budget>,
    standing_id: BudgetId,
    catch_all_id: BudgetId,
    config: BalancerConfig,
}

impl BudgetBalancer {
    /// `budgets` must include the standing and catch-all budgets. Fails if the
    /// pay period has not ended yet.
    pub fn new(
        pay_period: PayPeriod,
        budgets: Vec<Budget>,
        standing_id: BudgetId,
        catch_all_id: BudgetId,
        time_provider: &SafeTimeProvider,
    ) -> Result<Self> {
        let today = time_provider.now().date_naive();
        if !pay_period.is_in_past(today) {
            return Err(BudgetError::PayPeriodNotEnded {
                end_date: pay_period.end_date(),
                today,
            });
        }

        let budgets: BTreeMap<BudgetId, Budget> = budgets.into_iter().map(|b| (b.id, b)).collect();

        let standing = budgets
            .get(&standing_id)
            .ok_or(BudgetError::UnknownBudget { budget_id: standing_id })?;
        if standing.is_periodic {
            return Err(BudgetError::InvalidConfiguration {
                message: format!("standing budget {} is periodic", standing_id),
            });
        }
        let catch_all = budgets
            .get(&catch_all_id)
            .ok_or(BudgetError::UnknownBudget { budget_id: catch_all_id })?;
        if !catch_all.is_periodic {
            return Err(BudgetError::InvalidConfiguration {
                message: format!("catch-all budget {} is not periodic", catch_all_id),
            });
        }

        Ok(Self {
            pay_period,
            budgets,
            standing_id,
            catch_all_id,
            config: BalancerConfig::default(),
        })
    }

    pub fn with_config(mut self, config: BalancerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn pay_period(&self) -> &PayPeriod {
        &self.pay_period
    }

    /// periodic, active budgets not excluded from balancing
    pub fn budgets_to_balance(&self) -> impl Iterator<Item = &Budget> {
        self.budgets.values().filter(|b| b.is_balanced())
    }

    fn standing(&self) -> Result<&Budget> {
        self.budgets
            .get(&self.standing_id)
            .ok_or(BudgetError::UnknownBudget {
                budget_id: self.standing_id,
            })
    }

    /// Plan the transfers that balance the pay period. Pure: the same inputs
    /// always produce the same plan.
    pub fn plan(&self, balances: &PeriodBalances) -> Result<BalancePlan> {
        if let Some(id) = balances
            .remaining
            .keys()
            .find(|id| !self.budgets.contains_key(*id))
        {
            return Err(BudgetError::UnknownBudget { budget_id: *id });
        }

        let to_balance: BTreeMap<BudgetId, Money> = self
            .budgets_to_balance()
            .filter_map(|b| {
                balances
                    .remaining
                    .get(&b.id)
                    .filter(|v| !v.is_zero())
                    .map(|v| (b.id, *v))
            })
            .collect();
        let standing = self.standing()?;
        debug!(
            "balancing {} budgets for {}; standing {} balance {}",
            to_balance.len(),
            self.pay_period,
            standing.id,
            standing.current_balance
        );

        let state = BalancerState::new(to_balance.clone(), standing.current_balance);
        let state = run_phase(state, "pairwise", self.config.max_steps, |s| s.pairwise_step())?;
        let state = run_phase(state, "standing", self.config.max_steps, |s| {
            s.standing_step(self.standing_id)
        })?;

        if let Some((id, v)) = state.remaining.iter().find(|(_, v)| !v.is_zero()) {
            return Err(BudgetError::BudgetNotBalanced {
                budget_id: *id,
                remaining: *v,
            });
        }

        let (period_transfer, shortfall) = self.overall_balance(&state, balances.overall_remaining);

        let budgets = to_balance
            .iter()
            .map(|(id, before)| {
                let name = self
                    .budgets
                    .get(id)
                    .map(|b| b.name.clone())
                    .unwrap_or_default();
                let after = state.remaining.get(id).copied().unwrap_or(Money::ZERO);
                (
                    *id,
                    BudgetBalance {
                        before: *before,
                        after,
                        name,
                    },
                )
            })
            .collect();

        let plan = BalancePlan {
            pp_start_date: self.pay_period.start_date(),
            transfers: state.transfers,
            budgets,
            standing_id: standing.id,
            standing_name: standing.name.clone(),
            standing_before: standing.current_balance,
            standing_after: state.standing_balance,
            overall_before: balances.overall_remaining,
            period_transfer,
            shortfall,
        };
        info!(
            "planned {} transfers for {}; standing {} -> {}",
            plan.all_transfers().len(),
            self.pay_period,
            plan.standing_before,
            plan.standing_final()
        );
        Ok(plan)
    }

    /// final standing/catch-all transfer that zeroes the pay period
    fn overall_balance(
        &self,
        state: &BalancerState,
        overall_remaining: Money,
    ) -> (Option<Transfer>, Option<Money>) {
        let overall_after = state.transfers.iter().fold(overall_remaining, |acc, t| {
            if t.to_id == self.standing_id {
                acc - t.amount
            } else if t.from_id == self.standing_id {
                acc + t.amount
            } else {
                acc
            }
        });

        if overall_after.is_positive() {
            debug!("pay period has {} left over", overall_after);
            return (
                Some(Transfer::new(self.catch_all_id, self.standing_id, overall_after)),
                None,
            );
        }
        if !overall_after.is_negative() {
            return (None, None);
        }

        let needed = -overall_after;
        let available = state.standing_balance.max(Money::ZERO);
        let amount = needed.min(available);
        let shortfall = if amount < needed {
            warn!(
                "standing budget {} has {} to cover a pay period overage of {}",
                self.standing_id, available, needed
            );
            Some(needed - amount)
        } else {
            None
        };
        let transfer = amount
            .is_positive()
            .then(|| Transfer::new(self.standing_id, self.catch_all_id, amount));
        (transfer, shortfall)
    }

    /// Re-plan from current balances and return the transfers to make, but
    /// only if the result still matches the `approved` plan.
    pub fn apply(&self, approved: &BalancePlan, balances: &PeriodBalances) -> Result<Vec<Transfer>> {
        let actual = self.plan(balances)?;
        if actual != *approved {
            warn!("balance plan for {} changed since approval", self.pay_period);
            return Err(BudgetError::PlanChanged {
                expected: Box::new(approved.clone()),
                actual: Box::new(actual),
            });
        }
        Ok(actual.all_transfers())
    }
}
