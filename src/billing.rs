use std::fmt;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::{BudgetError, Result};

/// how a billing period recurs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cadence {
    /// whole calendar months
    CalendarMonth,
    /// a fixed number of days, repeated back to back
    FixedLength,
}

/// one statement cycle, both ends inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingPeriod {
    start_date: NaiveDate,
    end_date: NaiveDate,
    cadence: Cadence,
}

impl BillingPeriod {
    /// calendar-month period for a statement dated `statement_date`
    ///
    /// Statements dated before the 15th close out the previous month; later
    /// ones belong to the month they fall in.
    pub fn for_statement_date(statement_date: NaiveDate) -> Self {
        if statement_date.day() < 15 {
            let end_date = first_of_month(statement_date) - Duration::days(1);
            Self::calendar_month(first_of_month(end_date))
        } else {
            Self::calendar_month(first_of_month(statement_date))
        }
    }

    /// calendar-month period running from `start_date` to the end of its month
    pub fn calendar_month(start_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date: last_of_month(start_date),
            cadence: Cadence::CalendarMonth,
        }
    }

    /// fixed-length period; successors keep the same number of days
    pub fn fixed(start_date: NaiveDate, end_date: NaiveDate) -> Result<Self> {
        if end_date < start_date {
            return Err(BudgetError::InvalidConfiguration {
                message: format!(
                    "billing period end {} precedes start {}",
                    end_date, start_date
                ),
            });
        }
        Ok(Self {
            start_date,
            end_date,
            cadence: Cadence::FixedLength,
        })
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn cadence(&self) -> Cadence {
        self.cadence
    }

    /// number of days in the period, counting both ends
    pub fn num_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// mid-period date on which simulated payments post
    pub fn payment_date(&self) -> NaiveDate {
        let span = (self.end_date - self.start_date).num_days();
        self.start_date + Duration::days(span / 2)
    }

    pub fn next_period(&self) -> Self {
        let start_date = self.end_date + Duration::days(1);
        match self.cadence {
            Cadence::CalendarMonth => Self::calendar_month(start_date),
            Cadence::FixedLength => Self {
                start_date,
                end_date: start_date + Duration::days(self.num_days() - 1),
                cadence: Cadence::FixedLength,
            },
        }
    }

    pub fn previous_period(&self) -> Self {
        let end_date = self.start_date - Duration::days(1);
        match self.cadence {
            Cadence::CalendarMonth => Self::calendar_month(first_of_month(end_date)),
            Cadence::FixedLength => Self {
                start_date: end_date - Duration::days(self.num_days() - 1),
                end_date,
                cadence: Cadence::FixedLength,
            },
        }
    }
}

impl fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start_date, self.end_date)
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.day0() as i64)
}

fn last_of_month(date: NaiveDate) -> NaiveDate {
    // 32 days past the 1st always lands in the following month
    let next = first_of_month(date) + Duration::days(32);
    next - Duration::days(next.day() as i64)
}
