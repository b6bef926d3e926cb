/// scheduled increases and one-time payments from persisted settings
use biweekly_budget_rs::chrono::NaiveDate;
use biweekly_budget_rs::{
    calculate_payoffs, BillingPeriod, CcStatement, InterestKind, MinPaymentKind, Money,
    PaymentLimits, PaymentSettings, PayoffMethod, Rate, ScheduledAmount,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).ok_or("bad date");

    let mut settings = PaymentSettings::from_json(
        r#"{"increases": [{"enabled": true, "date": "2017-11-01", "amount": "400"}]}"#,
    )?;
    settings
        .onetimes
        .push(ScheduledAmount::new(date(2017, 12, 20)?, Money::from_major(1_000)));
    settings
        .onetimes
        .push(ScheduledAmount::disabled(date(2017, 9, 1)?, Money::from_major(5_000)));

    // canonical form, sorted by date
    println!("{}", settings.to_json()?);

    let period = BillingPeriod::for_statement_date(date(2017, 8, 20)?);
    let stmts = vec![
        CcStatement::builder()
            .interest_kind(InterestKind::AdbCompoundedDaily, Rate::from_bps(2199))
            .min_payment_kind(MinPaymentKind::Citi)
            .billing_period(period)
            .principal(Money::from_major(4_200))
            .build()?,
        CcStatement::builder()
            .interest_kind(InterestKind::SimpleInterest, Rate::from_bps(1499))
            .min_payment_kind(MinPaymentKind::Discover)
            .billing_period(period)
            .principal(Money::from_major(1_300))
            .build()?,
    ];

    let limits = PaymentLimits::from_settings(Money::from_major(250), &settings);
    let method = PayoffMethod::highest_interest_rate_first(limits);
    for (idx, res) in calculate_payoffs(&method, &stmts)?.iter().enumerate() {
        println!(
            "statement {}: {} months, {} paid",
            idx,
            res.months,
            res.total_paid.round_dp(2)
        );
    }

    Ok(())
}
