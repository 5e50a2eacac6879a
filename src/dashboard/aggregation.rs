//! USD summary statistics over a set of transactions.

use time::Date;

use crate::{
    currency::convert_to_usd,
    transaction::{TransactionKind, TransactionListRow},
};

/// A seller should be worried after this many days without a sale.
pub(super) const STALE_SALES_THRESHOLD_DAYS: i64 = 10;

/// Income and expense totals in USD plus the most recent sale date.
#[derive(Debug, PartialEq, Default)]
pub(super) struct DashboardStats {
    pub income_usd: f64,
    pub expense_usd: f64,
    pub last_sale_date: Option<Date>,
}

impl DashboardStats {
    pub(super) fn profit(&self) -> f64 {
        self.income_usd - self.expense_usd
    }

    /// Profit as a percentage of income, or zero when there is no income.
    pub(super) fn margin_percent(&self) -> f64 {
        if self.income_usd > 0.0 {
            self.profit() / self.income_usd * 100.0
        } else {
            0.0
        }
    }

    /// Days since the most recent income transaction, if there is one.
    pub(super) fn days_since_last_sale(&self, today: Date) -> Option<i64> {
        self.last_sale_date
            .map(|last_sale| (today - last_sale).whole_days())
    }

    /// Whether the stale-sales banner should show.
    pub(super) fn sales_are_stale(&self, today: Date) -> bool {
        self.days_since_last_sale(today)
            .is_some_and(|days| days > STALE_SALES_THRESHOLD_DAYS)
    }
}

/// Fold the rows into USD totals.
///
/// Every amount is converted with the exchange rate stored on its record,
/// falling back to the fixed TRY rate for old TRY records without one.
pub(super) fn summarize(rows: &[TransactionListRow]) -> DashboardStats {
    let mut stats = DashboardStats::default();

    for row in rows {
        let transaction = &row.transaction;
        let amount_usd = convert_to_usd(
            transaction.amount,
            transaction.currency,
            transaction.exchange_rate,
        );

        match transaction.kind {
            TransactionKind::Income => {
                stats.income_usd += amount_usd;

                if stats
                    .last_sale_date
                    .is_none_or(|last_sale| transaction.date > last_sale)
                {
                    stats.last_sale_date = Some(transaction.date);
                }
            }
            TransactionKind::Expense => stats.expense_usd += amount_usd,
        }
    }

    stats
}
