use std::fmt;

use chrono::{Duration, NaiveDate};
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};

/// days in a pay period
pub const PERIOD_LENGTH_DAYS: i64 = 14;

/// two-week window over which budgets are tracked and balanced
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PayPeriod {
    start_date: NaiveDate,
}

impl PayPeriod {
    pub fn new(start_date: NaiveDate) -> Self {
        Self { start_date }
    }

    /// Pay period containing `date`, where `anchor_start` is the start date of
    /// any known pay period. Works for dates before the anchor too.
    pub fn period_for_date(anchor_start: NaiveDate, date: NaiveDate) -> Self {
        let offset = (date - anchor_start).num_days().div_euclid(PERIOD_LENGTH_DAYS);
        Self::new(anchor_start + Duration::days(offset * PERIOD_LENGTH_DAYS))
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// last day of the period, inclusive
    pub fn end_date(&self) -> NaiveDate {
        self.start_date + Duration::days(PERIOD_LENGTH_DAYS - 1)
    }

    pub fn next(&self) -> Self {
        Self::new(self.start_date + Duration::days(PERIOD_LENGTH_DAYS))
    }

    pub fn previous(&self) -> Self {
        Self::new(self.start_date - Duration::days(PERIOD_LENGTH_DAYS))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date()
    }

    /// whether the period ended before `today`
    pub fn is_in_past(&self, today: NaiveDate) -> bool {
        self.end_date() < today
    }

    pub fn has_ended(&self, time_provider: &SafeTimeProvider) -> bool {
        self.is_in_past(time_provider.now().date_naive())
    }
}

impl fmt::Display for PayPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<PayPeriod {} - {}>", self.start_date, self.end_date())
    }
}
