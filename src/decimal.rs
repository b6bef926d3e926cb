use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};
use std::str::FromStr;

/// Money type carrying full decimal precision.
///
/// Unlike a ledger amount, intermediate values in the interest recurrences are
/// never quantized; rounding only happens through [`Money::round_dp`] or
/// [`Money::round_to_dollar`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);
    pub const ONE: Money = Money(Decimal::ONE);

    /// create from decimal
    pub fn from_decimal(d: Decimal) -> Self {
        Money(d)
    }

    /// create from string with exact parsing
    pub fn from_str_exact(s: &str) -> Result<Self, rust_decimal::Error> {
        Ok(Money(Decimal::from_str_exact(s)?))
    }

    /// create from integer amount (whole dollars)
    pub fn from_major(amount: i64) -> Self {
        Money(Decimal::from(amount))
    }

    /// create from minor amount (cents)
    pub fn from_minor(amount: i64, scale: u32) -> Self {
        Money(Decimal::new(amount, scale))
    }

    /// get underlying decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// round to specified decimal places (banker's rounding)
    pub fn round_dp(&self, dp: u32) -> Self {
        Money(self.0.round_dp(dp))
    }

    /// round to the nearest whole dollar, ties to even
    pub fn round_to_dollar(&self) -> Self {
        Money(self.0.round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven))
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// strictly greater than zero
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// strictly less than zero
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    pub fn min(self, other: Self) -> Self {
        Money(self.0.min(other.0))
    }

    pub fn max(self, other: Self) -> Self {
        Money(self.0.max(other.0))
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Money)
    }

    pub fn checked_mul(self, other: Decimal) -> Option<Self> {
        self.0.checked_mul(other).map(Money)
    }

    pub fn checked_div(self, other: Decimal) -> Option<Self> {
        self.0.checked_div(other).map(Money)
    }

    /// apply a fractional rate (0.01 = 1%)
    pub fn percent_of(&self, fraction: Decimal) -> Self {
        Money(self.0 * fraction)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::from_str_exact(s)
    }
}

impl From<Decimal> for Money {
    fn from(d: Decimal) -> Self {
        Money::from_decimal(d)
    }
}

impl From<i32> for Money {
    fn from(i: i32) -> Self {
        Money::from_major(i as i64)
    }
}

impl From<u32> for Money {
    fn from(i: u32) -> Self {
        Money::from_major(i as i64)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Money) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Money) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money(-self.0)
    }
}

impl Mul<Decimal> for Money {
    type Output = Money;

    fn mul(self, other: Decimal) -> Money {
        Money(self.0 * other)
    }
}

impl Div<Decimal> for Money {
    type Output = Money;

    fn div(self, other: Decimal) -> Money {
        Money(self.0 / other)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + *m)
    }
}

/// annual percentage rate stored as a fraction (0.1824 = 18.24%)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Rate(Decimal);

impl Rate {
    pub const ZERO: Rate = Rate(Decimal::ZERO);
    pub const ONE: Rate = Rate(Decimal::ONE);

    /// create from decimal (e.g., 0.05 for 5%)
    pub fn from_decimal(d: Decimal) -> Self {
        Rate(d)
    }

    /// create from percentage (e.g., 5 for 5%)
    pub fn from_percentage(p: u32) -> Self {
        Rate(Decimal::from(p) / Decimal::from(100))
    }

    /// create from basis points (e.g., 500 for 5%)
    pub fn from_bps(bps: u32) -> Self {
        Rate(Decimal::from(bps) / Decimal::from(10000))
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    pub fn as_percentage(&self) -> Decimal {
        self.0 * Decimal::from(100)
    }

    /// daily periodic rate; always a 365 day year, leap years included
    pub fn daily_rate(&self) -> Decimal {
        self.0 / Decimal::from(365)
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percentage())
    }
}

impl From<Decimal> for Rate {
    fn from(d: Decimal) -> Self {
        Rate::from_decimal(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_keeps_full_precision() {
        let m = Money::from_str_exact("100.123456789012").unwrap();
        assert_eq!(m.to_string(), "100.123456789012");

        let third = Money::from_major(1) / dec!(3);
        assert!(third.as_decimal().scale() > 8);
    }

    #[test]
    fn test_round_to_dollar_is_half_even() {
        assert_eq!(Money::from_decimal(dec!(150.5)).round_to_dollar(), Money::from_major(150));
        assert_eq!(Money::from_decimal(dec!(151.5)).round_to_dollar(), Money::from_major(152));
        assert_eq!(Money::from_decimal(dec!(150.51)).round_to_dollar(), Money::from_major(151));
    }

    #[test]
    fn test_sign_checks_exclude_zero() {
        assert!(!Money::ZERO.is_positive());
        assert!(!Money::ZERO.is_negative());
        assert!(Money::from_minor(1, 2).is_positive());
        assert!((-Money::from_minor(1, 2)).is_negative());
    }

    #[test]
    fn test_sum() {
        let amounts = vec![Money::from_major(10), Money::from_minor(550, 2), Money::from_major(-3)];
        let total: Money = amounts.iter().sum();
        assert_eq!(total, Money::from_decimal(dec!(12.50)));
    }

    #[test]
    fn test_checked_ops_report_overflow() {
        let big = Money::from_decimal(Decimal::MAX);
        assert_eq!(big.checked_add(Money::ONE), None);
        assert_eq!(big.checked_mul(dec!(2)), None);
        assert_eq!(Money::ONE.checked_div(Decimal::ZERO), None);
        assert_eq!(
            Money::from_major(10).checked_mul(dec!(0.5)),
            Some(Money::from_major(5))
        );
    }

    #[test]
    fn test_daily_rate() {
        let apr = Rate::from_decimal(dec!(0.365));
        assert_eq!(apr.daily_rate(), dec!(0.001));
        assert_eq!(Rate::from_bps(1824).as_decimal(), dec!(0.1824));
    }

    #[test]
    fn test_serializes_as_string() {
        let m = Money::from_decimal(dec!(109.9730));
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "\"109.9730\"");
        let back: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
    }
}
