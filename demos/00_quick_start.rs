/// quick start - project a card payoff paying only the minimum
use biweekly_budget_rs::chrono::NaiveDate;
use biweekly_budget_rs::{
    calculate_payoffs, BillingPeriod, CcStatement, InterestKind, MinPaymentKind, Money,
    PayoffMethod, Rate,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let statement_date = NaiveDate::from_ymd_opt(2017, 7, 31).ok_or("bad date")?;

    // statement with an observed balance; no need to recalculate it
    let stmt = CcStatement::builder()
        .interest_kind(InterestKind::AdbCompoundedDaily, Rate::from_bps(1824))
        .min_payment_kind(MinPaymentKind::AmEx)
        .billing_period(BillingPeriod::for_statement_date(statement_date))
        .principal(Money::from_major(2_500))
        .end_balance(Money::from_major(2_500))
        .interest_amount(Money::from_minor(3_812, 2))
        .build()?;

    println!("minimum payment due: {}", stmt.minimum_payment().round_dp(2));

    let res = calculate_payoffs(&PayoffMethod::min_payment(), &[stmt])?;
    println!(
        "paid off in {} months, {} total",
        res[0].months,
        res[0].total_paid.round_dp(2)
    );

    Ok(())
}
