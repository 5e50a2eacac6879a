//! Database query helpers for the transactions page and dashboard.

use std::ops::RangeInclusive;

use rusqlite::Connection;
use time::Date;

use crate::{
    Error,
    business_model::ModelId,
    store::StoreId,
    transaction::{Transaction, TransactionKind, map_transaction_row},
};

/// The filters the transactions page pushes into the list query.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Inclusive date range; `None` means all time.
    pub window: Option<RangeInclusive<Date>>,
    /// Restrict to income or expenses; `None` means both.
    pub kind: Option<TransactionKind>,
    /// Restrict to one store.
    pub store_id: Option<StoreId>,
    /// Restrict to one business model.
    pub business_model_id: Option<ModelId>,
}

/// A transaction with its store and business model names joined in for display.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionListRow {
    pub transaction: Transaction,
    pub store_name: Option<String>,
    pub business_model_name: Option<String>,
}

/// Get transactions matching `filter`, newest first.
///
/// Results are sorted by date and then ID descending so the order stays
/// stable across inserts that share a date.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails or a row cannot be mapped.
pub fn get_transactions_filtered(
    filter: &TransactionFilter,
    connection: &Connection,
) -> Result<Vec<TransactionListRow>, Error> {
    let mut clauses: Vec<&str> = Vec::new();
    let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

    if let Some(window) = &filter.window {
        clauses.push("t.date BETWEEN ? AND ?");
        params.push(Box::new(*window.start()));
        params.push(Box::new(*window.end()));
    }

    if let Some(kind) = filter.kind {
        clauses.push("t.kind = ?");
        params.push(Box::new(kind.as_str()));
    }

    if let Some(store_id) = filter.store_id {
        clauses.push("t.store_id = ?");
        params.push(Box::new(store_id));
    }

    if let Some(business_model_id) = filter.business_model_id {
        clauses.push("t.business_model_id = ?");
        params.push(Box::new(business_model_id));
    }

    let where_clause = if clauses.is_empty() {
        String::new()
    } else {
        format!("WHERE {} ", clauses.join(" AND "))
    };

    let query = format!(
        "SELECT t.id, t.kind, t.amount, t.currency, t.exchange_rate, t.category, t.description, \
        t.date, t.store_id, t.business_model_id, store.name, business_model.name \
        FROM \"transaction\" t \
        LEFT JOIN store ON t.store_id = store.id \
        LEFT JOIN business_model ON t.business_model_id = business_model.id \
        {}ORDER BY t.date DESC, t.id DESC",
        where_clause
    );

    connection
        .prepare(&query)?
        .query_map(
            rusqlite::params_from_iter(params.iter().map(|param| param.as_ref())),
            |row| {
                let transaction = map_transaction_row(row)?;
                let store_name = row.get(10)?;
                let business_model_name = row.get(11)?;

                Ok(TransactionListRow {
                    transaction,
                    store_name,
                    business_model_name,
                })
            },
        )?
        .map(|row_result| row_result.map_err(Error::from))
        .collect()
}

#[cfg(test)]
mod query_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        currency::Currency,
        db::initialize,
        store::{StoreName, create_store},
        transaction::{
            NewTransaction, TransactionKind, core::test_helpers::expense_draft, create_transaction,
        },
    };

    use super::{TransactionFilter, get_transactions_filtered};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn returns_rows_newest_first() {
        let conn = get_test_connection();
        create_transaction(expense_draft(1.0, "Software", date!(2024 - 06 - 01)), &conn).unwrap();
        create_transaction(expense_draft(2.0, "Software", date!(2024 - 06 - 10)), &conn).unwrap();
        create_transaction(expense_draft(3.0, "Software", date!(2024 - 06 - 05)), &conn).unwrap();

        let rows = get_transactions_filtered(&TransactionFilter::default(), &conn).unwrap();

        let dates: Vec<_> = rows.iter().map(|row| row.transaction.date).collect();
        assert_eq!(
            dates,
            vec![
                date!(2024 - 06 - 10),
                date!(2024 - 06 - 05),
                date!(2024 - 06 - 01)
            ]
        );
    }

    #[test]
    fn filters_by_window() {
        let conn = get_test_connection();
        create_transaction(expense_draft(1.0, "Software", date!(2024 - 05 - 31)), &conn).unwrap();
        create_transaction(expense_draft(2.0, "Software", date!(2024 - 06 - 01)), &conn).unwrap();
        create_transaction(expense_draft(3.0, "Software", date!(2024 - 06 - 30)), &conn).unwrap();
        create_transaction(expense_draft(4.0, "Software", date!(2024 - 07 - 01)), &conn).unwrap();

        let filter = TransactionFilter {
            window: Some(date!(2024 - 06 - 01)..=date!(2024 - 06 - 30)),
            ..Default::default()
        };
        let rows = get_transactions_filtered(&filter, &conn).unwrap();

        assert_eq!(rows.len(), 2, "got {} rows, want 2", rows.len());
    }

    #[test]
    fn filters_by_kind() {
        let conn = get_test_connection();
        create_transaction(expense_draft(1.0, "Software", date!(2024 - 06 - 01)), &conn).unwrap();
        create_transaction(
            NewTransaction {
                kind: TransactionKind::Income,
                ..expense_draft(100.0, "Sales", date!(2024 - 06 - 02))
            },
            &conn,
        )
        .unwrap();

        let filter = TransactionFilter {
            kind: Some(TransactionKind::Income),
            ..Default::default()
        };
        let rows = get_transactions_filtered(&filter, &conn).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].transaction.kind, TransactionKind::Income);
    }

    #[test]
    fn filters_by_store_and_joins_name() {
        let conn = get_test_connection();
        let store = create_store(
            StoreName::new_unchecked("Cozy Prints"),
            "Etsy",
            Currency::Usd,
            &conn,
        )
        .unwrap();
        let mut with_store = expense_draft(1.0, "Software", date!(2024 - 06 - 01));
        with_store.store_id = Some(store.id);
        create_transaction(with_store, &conn).unwrap();
        create_transaction(expense_draft(2.0, "Software", date!(2024 - 06 - 02)), &conn).unwrap();

        let filter = TransactionFilter {
            store_id: Some(store.id),
            ..Default::default()
        };
        let rows = get_transactions_filtered(&filter, &conn).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].store_name.as_deref(), Some("Cozy Prints"));
        assert_eq!(rows[0].business_model_name, None);
    }
}
