//! Core recurring expense domain types.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{Error, currency::Currency};

/// Database identifier for a recurring expense.
pub type RecurringExpenseId = i64;

/// A validated day of the month (1-31) on which a charge occurs.
///
/// No clamping is done for short months. A charge on day 31 never comes due
/// in a 30 day month; that matches the observed behavior of the checker and
/// is deliberate (see DESIGN.md).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DayOfMonth(u8);

impl DayOfMonth {
    /// Create a day of the month.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidDayOfMonth] if `day` is outside 1-31.
    pub fn new(day: u8) -> Result<Self, Error> {
        if (1..=31).contains(&day) {
            Ok(Self(day))
        } else {
            Err(Error::InvalidDayOfMonth(day))
        }
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for DayOfMonth {
    type Error = Error;

    fn try_from(day: u8) -> Result<Self, Self::Error> {
        DayOfMonth::new(day)
    }
}

impl From<DayOfMonth> for u8 {
    fn from(day: DayOfMonth) -> u8 {
        day.0
    }
}

impl Display for DayOfMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How often a recurring expense repeats.
///
/// Stored and displayed, but the checker only implements the monthly
/// semantics: every definition is charged against the current calendar month
/// on its day-of-month regardless of this field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceInterval {
    Daily,
    Weekly,
    #[default]
    Monthly,
    Yearly,
}

impl RecurrenceInterval {
    /// All intervals, in form drop-down order.
    pub const ALL: [RecurrenceInterval; 4] = [
        RecurrenceInterval::Monthly,
        RecurrenceInterval::Weekly,
        RecurrenceInterval::Daily,
        RecurrenceInterval::Yearly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecurrenceInterval::Daily => "daily",
            RecurrenceInterval::Weekly => "weekly",
            RecurrenceInterval::Monthly => "monthly",
            RecurrenceInterval::Yearly => "yearly",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RecurrenceInterval::Daily => "Daily",
            RecurrenceInterval::Weekly => "Weekly",
            RecurrenceInterval::Monthly => "Monthly",
            RecurrenceInterval::Yearly => "Yearly",
        }
    }

    pub(crate) fn from_sql(raw: &str, column_index: usize) -> Result<Self, rusqlite::Error> {
        match raw {
            "daily" => Ok(RecurrenceInterval::Daily),
            "weekly" => Ok(RecurrenceInterval::Weekly),
            "monthly" => Ok(RecurrenceInterval::Monthly),
            "yearly" => Ok(RecurrenceInterval::Yearly),
            other => Err(rusqlite::Error::FromSqlConversionFailure(
                column_index,
                rusqlite::types::Type::Text,
                format!("unknown recurrence interval {other:?}").into(),
            )),
        }
    }
}

/// A recurring charge, e.g. a software subscription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringExpense {
    pub id: RecurringExpenseId,
    /// Display name, also used to recognize already-posted charges.
    pub name: String,
    /// The charge amount in `currency`.
    pub amount: f64,
    pub currency: Currency,
    /// The day of the month on which the charge occurs.
    pub day_of_month: DayOfMonth,
    /// The category label charges are posted under.
    pub category: String,
    /// Paused definitions are never materialized.
    pub is_active: bool,
    pub interval: RecurrenceInterval,
}

/// The fields needed to create or update a recurring expense.
#[derive(Debug, Clone, PartialEq)]
pub struct RecurringExpenseDraft {
    pub name: String,
    pub amount: f64,
    pub currency: Currency,
    pub day_of_month: DayOfMonth,
    pub category: String,
    pub is_active: bool,
    pub interval: RecurrenceInterval,
}
