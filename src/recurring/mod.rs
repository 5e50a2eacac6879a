//! Recurring expense definitions and the checker that posts them to the
//! ledger once per month.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod list;
mod materialize;
mod toggle;

pub use create::{create_subscription_endpoint, get_new_subscription_page};
pub use db::{
    create_recurring_expense, create_recurring_expense_table, delete_recurring_expense,
    get_active_recurring_expenses, get_all_recurring_expenses, get_recurring_expense,
    toggle_recurring_expense_active, update_recurring_expense,
};
pub use delete::delete_subscription_endpoint;
pub use domain::{
    DayOfMonth, RecurrenceInterval, RecurringExpense, RecurringExpenseDraft, RecurringExpenseId,
};
pub use edit::{get_edit_subscription_page, update_subscription_endpoint};
pub use list::get_subscriptions_page;
pub use materialize::{
    AUTO_RECURRING_MARKER, MaterializationReport, RecurringLedger, SqliteRecurringLedger,
    materialize_due,
};
pub use toggle::toggle_subscription_endpoint;

#[cfg(test)]
pub(crate) use db::test_helpers::subscription_draft;
