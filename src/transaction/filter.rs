//! Date windows for the transactions page and dashboard filters.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use time::{Date, Duration, Month};

/// A preset date window, anchored to "today".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateWindow {
    // The serde snake_case rule keeps digits attached to the previous word
    // ("last7_days"), so the digit variants are renamed by hand to match
    // [DateWindow::as_str].
    #[serde(rename = "last_7_days")]
    Last7Days,
    ThisMonth,
    LastMonth,
    #[serde(rename = "last_3_months")]
    Last3Months,
    #[serde(rename = "last_6_months")]
    Last6Months,
    ThisYear,
    #[default]
    All,
}

impl DateWindow {
    /// All windows, in drop-down order.
    pub const ALL: [DateWindow; 7] = [
        DateWindow::Last7Days,
        DateWindow::ThisMonth,
        DateWindow::LastMonth,
        DateWindow::Last3Months,
        DateWindow::Last6Months,
        DateWindow::ThisYear,
        DateWindow::All,
    ];

    /// The value used in query strings, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            DateWindow::Last7Days => "last_7_days",
            DateWindow::ThisMonth => "this_month",
            DateWindow::LastMonth => "last_month",
            DateWindow::Last3Months => "last_3_months",
            DateWindow::Last6Months => "last_6_months",
            DateWindow::ThisYear => "this_year",
            DateWindow::All => "all",
        }
    }

    /// The label shown in the filter drop-down.
    pub fn label(&self) -> &'static str {
        match self {
            DateWindow::Last7Days => "Last 7 Days",
            DateWindow::ThisMonth => "This Month",
            DateWindow::LastMonth => "Last Month",
            DateWindow::Last3Months => "Last 3 Months",
            DateWindow::Last6Months => "Last 6 Months",
            DateWindow::ThisYear => "This Year",
            DateWindow::All => "All Time",
        }
    }

    /// The inclusive date range this window covers, or `None` for all time.
    pub fn range(&self, today: Date) -> Option<RangeInclusive<Date>> {
        match self {
            DateWindow::Last7Days => Some(today - Duration::days(7)..=today),
            DateWindow::ThisMonth => Some(month_bounds(today)),
            DateWindow::LastMonth => {
                let last_month_end = start_of_month(today) - Duration::days(1);
                Some(month_bounds(last_month_end))
            }
            DateWindow::Last3Months => {
                Some(start_of_month_months_back(today, 3)..=end_of_month(today))
            }
            DateWindow::Last6Months => {
                Some(start_of_month_months_back(today, 6)..=end_of_month(today))
            }
            DateWindow::ThisYear => {
                let year_start = Date::from_calendar_date(today.year(), Month::January, 1)
                    .expect("January 1st is valid in every year");
                Some(year_start..=today)
            }
            DateWindow::All => None,
        }
    }
}

/// The first day of the month `date` falls in.
pub(crate) fn start_of_month(date: Date) -> Date {
    date.replace_day(1).expect("day 1 is valid in every month")
}

/// The last day of the month `date` falls in.
pub(crate) fn end_of_month(date: Date) -> Date {
    date.replace_day(date.month().length(date.year()))
        .expect("month length is a valid day")
}

/// The calendar month `date` falls in, as an inclusive date range.
pub(crate) fn month_bounds(date: Date) -> RangeInclusive<Date> {
    start_of_month(date)..=end_of_month(date)
}

fn start_of_month_months_back(date: Date, months: u32) -> Date {
    let mut year = date.year();
    let mut month = date.month();

    for _ in 0..months {
        if month == Month::January {
            year -= 1;
        }
        month = month.previous();
    }

    Date::from_calendar_date(year, month, 1).expect("day 1 is valid in every month")
}

#[cfg(test)]
mod date_window_tests {
    use time::macros::date;

    use super::{DateWindow, month_bounds};

    #[test]
    fn this_month_covers_the_whole_month() {
        let range = DateWindow::ThisMonth.range(date!(2024 - 06 - 15)).unwrap();

        assert_eq!(range, date!(2024 - 06 - 01)..=date!(2024 - 06 - 30));
    }

    #[test]
    fn last_month_handles_january() {
        let range = DateWindow::LastMonth.range(date!(2024 - 01 - 15)).unwrap();

        assert_eq!(range, date!(2023 - 12 - 01)..=date!(2023 - 12 - 31));
    }

    #[test]
    fn last_three_months_starts_at_a_month_boundary() {
        let range = DateWindow::Last3Months.range(date!(2024 - 06 - 15)).unwrap();

        assert_eq!(range, date!(2024 - 03 - 01)..=date!(2024 - 06 - 30));
    }

    #[test]
    fn last_six_months_crosses_year_boundary() {
        let range = DateWindow::Last6Months.range(date!(2024 - 03 - 10)).unwrap();

        assert_eq!(range, date!(2023 - 09 - 01)..=date!(2024 - 03 - 31));
    }

    #[test]
    fn this_year_starts_in_january() {
        let range = DateWindow::ThisYear.range(date!(2024 - 06 - 15)).unwrap();

        assert_eq!(range, date!(2024 - 01 - 01)..=date!(2024 - 06 - 15));
    }

    #[test]
    fn all_time_has_no_range() {
        assert_eq!(DateWindow::All.range(date!(2024 - 06 - 15)), None);
    }

    #[test]
    fn month_bounds_handles_leap_february() {
        assert_eq!(
            month_bounds(date!(2024 - 02 - 10)),
            date!(2024 - 02 - 01)..=date!(2024 - 02 - 29)
        );
        assert_eq!(
            month_bounds(date!(2023 - 02 - 10)),
            date!(2023 - 02 - 01)..=date!(2023 - 02 - 28)
        );
    }
}
