/// balance the budgets of a finished pay period
use std::collections::BTreeMap;

use biweekly_budget_rs::chrono::{NaiveDate, TimeZone, Utc};
use biweekly_budget_rs::{
    Budget, BudgetBalancer, Money, PayPeriod, PeriodBalances, SafeTimeProvider, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let now = Utc
        .with_ymd_and_hms(2017, 1, 20, 9, 0, 0)
        .single()
        .ok_or("bad time")?;
    let time = SafeTimeProvider::new(TimeSource::Test(now));

    let anchor = NaiveDate::from_ymd_opt(2016, 12, 4).ok_or("bad date")?;
    let last_week = NaiveDate::from_ymd_opt(2017, 1, 10).ok_or("bad date")?;
    let pay_period = PayPeriod::period_for_date(anchor, last_week);

    let budgets = vec![
        Budget::periodic(1, "Groceries"),
        Budget::periodic(2, "Gas"),
        Budget::periodic(3, "Dining"),
        Budget::periodic(4, "Periodic"),
        Budget::standing(9, "Savings", Money::from_major(200)),
    ];
    let balancer = BudgetBalancer::new(pay_period, budgets, 9, 4, &time)?;

    let balances = PeriodBalances::new(BTreeMap::from([
        (1, Money::from_major(120)),
        (2, Money::from_major(-50)),
        (3, Money::from_major(-95)),
    ]));

    let plan = balancer.plan(&balances)?;
    println!("{}", plan.to_json()?);

    // the plan would be shown for approval here; applying re-checks it
    for t in balancer.apply(&plan, &balances)? {
        println!("move {} from budget {} to budget {}", t.amount, t.from_id, t.to_id);
    }

    Ok(())
}
