//! Database initialization.
//!
//! Each feature module owns the DDL for its table; this module stitches them
//! together so a new database file is ready after one call.

use rusqlite::{Connection, Transaction as SqlTransaction};

use crate::{
    Error, business_model::create_business_model_table, category::create_category_table,
    idea::create_product_idea_table, recurring::create_recurring_expense_table,
    store::create_store_table, transaction::create_transaction_table,
};

/// Create all application tables if they do not exist yet.
///
/// The tables are created inside a single exclusive transaction so a
/// partially initialized database is never left behind.
///
/// # Errors
/// Returns an [Error::SqlError] if any of the DDL statements fail.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    // SQLite leaves foreign key enforcement off unless asked. This must run
    // outside the DDL transaction below.
    connection.pragma_update(None, "foreign_keys", true)?;

    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    create_store_table(&transaction)?;
    create_business_model_table(&transaction)?;
    create_category_table(&transaction)?;
    create_transaction_table(&transaction)?;
    create_recurring_expense_table(&transaction)?;
    create_product_idea_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

#[cfg(test)]
mod initialize_tests {
    use rusqlite::Connection;

    use super::initialize;

    #[test]
    fn creates_all_tables() {
        let connection =
            Connection::open_in_memory().expect("Could not initialise in-memory SQLite database");

        initialize(&connection).expect("Could not initialize database");

        let table_count: u32 = connection
            .query_row(
                "SELECT COUNT(1) FROM sqlite_master WHERE type = 'table' AND name IN
                ('store', 'business_model', 'category', 'transaction', 'recurring_expense', 'product_idea')",
                [],
                |row| row.get(0),
            )
            .expect("Could not query sqlite_master");

        assert_eq!(table_count, 6);
    }

    #[test]
    fn is_idempotent() {
        let connection =
            Connection::open_in_memory().expect("Could not initialise in-memory SQLite database");

        initialize(&connection).expect("Could not initialize database");
        initialize(&connection).expect("Second initialize should be a no-op");
    }
}
