//! Database operations for recurring expenses.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    currency::parse_sql_currency,
    recurring::{
        DayOfMonth, RecurrenceInterval, RecurringExpense, RecurringExpenseDraft,
        RecurringExpenseId,
    },
};

/// Create a recurring expense and return it with its generated ID.
pub fn create_recurring_expense(
    draft: RecurringExpenseDraft,
    connection: &Connection,
) -> Result<RecurringExpense, Error> {
    connection.execute(
        "INSERT INTO recurring_expense (name, amount, currency, day_of_month, category, is_active, interval)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
        (
            &draft.name,
            draft.amount,
            draft.currency.code(),
            draft.day_of_month.get(),
            &draft.category,
            draft.is_active,
            draft.interval.as_str(),
        ),
    )?;

    let id = connection.last_insert_rowid();

    Ok(RecurringExpense {
        id,
        name: draft.name,
        amount: draft.amount,
        currency: draft.currency,
        day_of_month: draft.day_of_month,
        category: draft.category,
        is_active: draft.is_active,
        interval: draft.interval,
    })
}

/// Retrieve a single recurring expense by ID.
pub fn get_recurring_expense(
    id: RecurringExpenseId,
    connection: &Connection,
) -> Result<RecurringExpense, Error> {
    connection
        .prepare(
            "SELECT id, name, amount, currency, day_of_month, category, is_active, interval
             FROM recurring_expense WHERE id = :id;",
        )?
        .query_one(&[(":id", &id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all recurring expenses, newest first.
pub fn get_all_recurring_expenses(connection: &Connection) -> Result<Vec<RecurringExpense>, Error> {
    connection
        .prepare(
            "SELECT id, name, amount, currency, day_of_month, category, is_active, interval
             FROM recurring_expense ORDER BY created_at DESC, id DESC;",
        )?
        .query_map([], map_row)?
        .map(|maybe_expense| maybe_expense.map_err(|error| error.into()))
        .collect()
}

/// Retrieve the active recurring expenses in insertion order.
///
/// This is the definition list the materialization checker runs over.
pub fn get_active_recurring_expenses(
    connection: &Connection,
) -> Result<Vec<RecurringExpense>, Error> {
    connection
        .prepare(
            "SELECT id, name, amount, currency, day_of_month, category, is_active, interval
             FROM recurring_expense WHERE is_active = 1;",
        )?
        .query_map([], map_row)?
        .map(|maybe_expense| maybe_expense.map_err(|error| error.into()))
        .collect()
}

/// Update a recurring expense. Returns an error if it doesn't exist.
pub fn update_recurring_expense(
    id: RecurringExpenseId,
    draft: RecurringExpenseDraft,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE recurring_expense
         SET name = ?1, amount = ?2, currency = ?3, day_of_month = ?4, category = ?5,
             is_active = ?6, interval = ?7
         WHERE id = ?8",
        (
            &draft.name,
            draft.amount,
            draft.currency.code(),
            draft.day_of_month.get(),
            &draft.category,
            draft.is_active,
            draft.interval.as_str(),
            id,
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingRecurringExpense);
    }

    Ok(())
}

/// Flip a recurring expense between active and paused.
pub fn toggle_recurring_expense_active(
    id: RecurringExpenseId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE recurring_expense SET is_active = 1 - is_active WHERE id = ?1",
        [id],
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingRecurringExpense);
    }

    Ok(())
}

/// Delete a recurring expense by ID. Returns an error if it doesn't exist.
pub fn delete_recurring_expense(
    id: RecurringExpenseId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected =
        connection.execute("DELETE FROM recurring_expense WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingRecurringExpense);
    }

    Ok(())
}

/// Initialize the recurring expense table.
pub fn create_recurring_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS recurring_expense (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            amount REAL NOT NULL,
            currency TEXT NOT NULL,
            day_of_month INTEGER NOT NULL,
            category TEXT NOT NULL,
            is_active INTEGER NOT NULL DEFAULT 1,
            interval TEXT NOT NULL DEFAULT 'monthly',
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        (),
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<RecurringExpense, rusqlite::Error> {
    let id = row.get(0)?;
    let name = row.get(1)?;
    let amount = row.get(2)?;
    let raw_currency: String = row.get(3)?;
    let currency = parse_sql_currency(&raw_currency, 3)?;
    let raw_day: u8 = row.get(4)?;
    let day_of_month = DayOfMonth::new(raw_day).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(
            4,
            rusqlite::types::Type::Integer,
            format!("{error}").into(),
        )
    })?;
    let category = row.get(5)?;
    let is_active = row.get(6)?;
    let raw_interval: String = row.get(7)?;
    let interval = RecurrenceInterval::from_sql(&raw_interval, 7)?;

    Ok(RecurringExpense {
        id,
        name,
        amount,
        currency,
        day_of_month,
        category,
        is_active,
        interval,
    })
}

#[cfg(test)]
pub(crate) mod test_helpers {
    use crate::{
        currency::Currency,
        recurring::{DayOfMonth, RecurrenceInterval, RecurringExpenseDraft},
    };

    /// A monthly USD subscription draft for tests.
    pub(crate) fn subscription_draft(name: &str, amount: f64, day_of_month: u8) -> RecurringExpenseDraft {
        RecurringExpenseDraft {
            name: name.to_string(),
            amount,
            currency: Currency::Usd,
            day_of_month: DayOfMonth::new(day_of_month).unwrap(),
            category: "Software".to_string(),
            is_active: true,
            interval: RecurrenceInterval::Monthly,
        }
    }
}
