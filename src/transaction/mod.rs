//! Income and expense records, the heart of the ledger.

mod core;
mod create_endpoint;
mod create_page;
mod delete_endpoint;
mod filter;
pub(crate) mod form;
mod query;
mod transactions_page;

pub use core::{
    NewTransaction, Transaction, TransactionId, TransactionKind, create_transaction,
    create_transaction_table, delete_transaction, get_transaction, map_transaction_row,
};
pub use create_endpoint::create_transaction_endpoint;
pub use create_page::get_create_transaction_page;
pub use delete_endpoint::delete_transaction_endpoint;
pub use filter::DateWindow;
pub(crate) use filter::month_bounds;
pub use query::{TransactionFilter, TransactionListRow, get_transactions_filtered};
pub use transactions_page::get_transactions_page;
pub(crate) use transactions_page::transaction_table_row;

#[cfg(test)]
pub(crate) use core::test_helpers::expense_draft;
