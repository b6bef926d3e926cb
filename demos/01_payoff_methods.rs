/// compare every payoff method across two cards
use biweekly_budget_rs::chrono::NaiveDate;
use biweekly_budget_rs::{CreditAccount, InterestKind, MinPaymentKind, Money, PaymentSettings, PayoffProjection, Rate};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let statement_date = NaiveDate::from_ymd_opt(2017, 7, 31).ok_or("bad date")?;
    let accounts = vec![
        CreditAccount {
            id: 1,
            name: "Rewards Card".to_string(),
            balance: Money::from_minor(-95_206, 2),
            apr: Rate::from_percentage(1),
            interest: InterestKind::AdbCompoundedDaily,
            min_payment: MinPaymentKind::AmEx,
            statement_date,
        },
        CreditAccount {
            id: 2,
            name: "Store Card".to_string(),
            balance: Money::from_minor(-549_865, 2),
            apr: Rate::from_percentage(10),
            interest: InterestKind::AdbCompoundedDaily,
            min_payment: MinPaymentKind::Discover,
            statement_date,
        },
    ];

    let projection = PayoffProjection::new(&accounts, PaymentSettings::new())?;
    for (id, min) in projection.min_payments() {
        println!("account {} minimum payment {}", id, min.round_dp(2));
    }

    for (kind, outcome) in projection.calculate_payoffs() {
        println!("{} - {}", kind, outcome.description);
        match (outcome.results, outcome.error) {
            (Some(results), _) => {
                for (id, payoff) in results {
                    println!(
                        "  account {}: {} months, {} paid, {} interest",
                        id,
                        payoff.payoff_months,
                        payoff.total_payments.round_dp(2),
                        payoff.total_interest.round_dp(2)
                    );
                }
            }
            (None, Some(error)) => println!("  failed: {}", error),
            (None, None) => {}
        }
    }

    Ok(())
}
