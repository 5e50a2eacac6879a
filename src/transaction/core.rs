//! Defines the core data models and database queries for transactions.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    business_model::ModelId,
    currency::{Currency, parse_sql_currency},
    store::StoreId,
};

// ============================================================================
// MODELS
// ============================================================================

/// Database identifier for a transaction.
pub type TransactionId = i64;

/// Whether money came in or went out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }

    /// The label shown in tables.
    pub fn label(&self) -> &'static str {
        match self {
            TransactionKind::Income => "Income",
            TransactionKind::Expense => "Expense",
        }
    }

    pub(crate) fn from_sql(raw: &str, column_index: usize) -> Result<Self, rusqlite::Error> {
        match raw {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(rusqlite::Error::FromSqlConversionFailure(
                column_index,
                rusqlite::types::Type::Text,
                format!("unknown transaction kind {other:?}").into(),
            )),
        }
    }
}

/// An event where money was either spent or earned.
///
/// The amount is stored in its original currency; `exchange_rate` carries the
/// quote-currency-per-USD rate recorded at creation time so reporting can
/// convert to USD later. Transactions are never mutated, only created and
/// deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// Whether this is income or an expense.
    pub kind: TransactionKind,
    /// The amount of money, always positive, in `currency`.
    pub amount: f64,
    /// The currency the amount was recorded in.
    pub currency: Currency,
    /// Units of `currency` per USD at recording time, if a conversion applies.
    pub exchange_rate: Option<f64>,
    /// The category label, e.g. "Software" or "Sales".
    pub category: String,
    /// A text description of what the transaction was for.
    pub description: Option<String>,
    /// When the transaction happened.
    pub date: Date,
    /// The store this transaction belongs to, if any.
    pub store_id: Option<StoreId>,
    /// The business model this transaction belongs to, if any.
    pub business_model_id: Option<ModelId>,
}

/// The fields needed to record a new transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub kind: TransactionKind,
    pub amount: f64,
    pub currency: Currency,
    pub exchange_rate: Option<f64>,
    pub category: String,
    pub description: Option<String>,
    pub date: Date,
    pub store_id: Option<StoreId>,
    pub business_model_id: Option<ModelId>,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction in the database.
///
/// # Errors
/// This function will return an:
/// - [Error::InvalidForeignKey] if the store or business model ID does not
///   refer to a real row,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    new_transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\"
             (kind, amount, currency, exchange_rate, category, description, date, store_id, business_model_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             RETURNING id, kind, amount, currency, exchange_rate, category, description, date, store_id, business_model_id",
        )?
        .query_one(
            (
                new_transaction.kind.as_str(),
                new_transaction.amount,
                new_transaction.currency.code(),
                new_transaction.exchange_rate,
                &new_transaction.category,
                &new_transaction.description,
                new_transaction.date,
                new_transaction.store_id,
                new_transaction.business_model_id,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, kind, amount, currency, exchange_rate, category, description, date, store_id, business_model_id
             FROM \"transaction\" WHERE id = :id",
        )?
        .query_one(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Delete a transaction by ID. Returns an error if the transaction doesn't exist.
pub fn delete_transaction(id: TransactionId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM \"transaction\" WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingTransaction);
    }

    Ok(())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                kind TEXT NOT NULL,
                amount REAL NOT NULL,
                currency TEXT NOT NULL,
                exchange_rate REAL,
                category TEXT NOT NULL,
                description TEXT,
                date TEXT NOT NULL,
                store_id INTEGER,
                business_model_id INTEGER,
                created_at TEXT NOT NULL DEFAULT (datetime('now')),
                FOREIGN KEY(store_id) REFERENCES store(id) ON UPDATE CASCADE ON DELETE SET NULL,
                FOREIGN KEY(business_model_id) REFERENCES business_model(id) ON UPDATE CASCADE ON DELETE SET NULL
                )",
        (),
    )?;

    // Composite index used by the duplicate check for recurring expenses and
    // the date-windowed list queries.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_date_category ON \"transaction\"(date, category);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_kind: String = row.get(1)?;
    let kind = TransactionKind::from_sql(&raw_kind, 1)?;
    let amount = row.get(2)?;
    let raw_currency: String = row.get(3)?;
    let currency = parse_sql_currency(&raw_currency, 3)?;
    let exchange_rate = row.get(4)?;
    let category = row.get(5)?;
    let description = row.get(6)?;
    let date = row.get(7)?;
    let store_id = row.get(8)?;
    let business_model_id = row.get(9)?;

    Ok(Transaction {
        id,
        kind,
        amount,
        currency,
        exchange_rate,
        category,
        description,
        date,
        store_id,
        business_model_id,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
pub(crate) mod test_helpers {
    use time::Date;

    use crate::currency::Currency;

    use super::{NewTransaction, TransactionKind};

    /// A minimal expense draft for tests that only care about a few fields.
    pub(crate) fn expense_draft(amount: f64, category: &str, date: Date) -> NewTransaction {
        NewTransaction {
            kind: TransactionKind::Expense,
            amount,
            currency: Currency::Usd,
            exchange_rate: Some(1.0),
            category: category.to_string(),
            description: None,
            date,
            store_id: None,
            business_model_id: None,
        }
    }
}
