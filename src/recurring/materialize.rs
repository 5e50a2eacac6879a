//! The recurring expense materialization checker.
//!
//! Once per process start (the dashboard holds the latch) the checker walks
//! every active recurring expense definition and posts an expense transaction
//! for each one that is due this month and not already in the ledger.
//!
//! Duplicate detection is re-derived from transaction history on every run: a
//! definition is considered posted for the month when an expense in the same
//! category, dated inside the current calendar month, mentions the
//! definition's name in its description. Nothing is written back to the
//! definition itself.
//!
//! The duplicate check and the insert are two separate statements with no
//! transaction around them, so two processes racing through the checker at
//! the same time can both pass the check and double-post. Single-operator
//! deployments make this acceptable; see DESIGN.md before relying on it.

use std::ops::RangeInclusive;

use rusqlite::Connection;
use time::Date;

use crate::{
    Error,
    currency::exchange_rate_for,
    recurring::{RecurringExpense, get_active_recurring_expenses},
    transaction::{
        NewTransaction, TransactionId, TransactionKind, create_transaction, month_bounds,
    },
};

/// The description marker that tags auto-posted charges, both for duplicate
/// detection and for highlighting rows in the UI.
pub const AUTO_RECURRING_MARKER: &str = "(auto-recurring)";

/// What a materialization run did.
#[derive(Debug, Default, PartialEq)]
pub struct MaterializationReport {
    /// Names of the definitions that were posted this call, in processing
    /// order. Shown to the user as a notification.
    pub materialized: Vec<String>,
    /// How many definitions were skipped because their duplicate check or
    /// insert failed. Those definitions get another chance on the next run.
    pub skipped_errors: usize,
}

/// The ledger operations the checker needs.
///
/// Production uses [SqliteRecurringLedger]; tests inject fakes to simulate
/// per-operation store failures.
pub trait RecurringLedger {
    /// The active recurring expense definitions, in storage order.
    fn active_definitions(&self) -> Result<Vec<RecurringExpense>, Error>;

    /// IDs of expense transactions in `period` whose category equals
    /// `category` and whose description contains `name_fragment`
    /// (case-insensitive).
    fn matching_expenses(
        &self,
        category: &str,
        name_fragment: &str,
        period: &RangeInclusive<Date>,
    ) -> Result<Vec<TransactionId>, Error>;

    /// Record a transaction in the ledger.
    fn insert_transaction(&self, draft: NewTransaction) -> Result<(), Error>;
}

/// Post an expense for every active definition that is due and missing this
/// month.
///
/// A definition is due once `today` has reached its day-of-month. Charges are
/// dated `today` (not the nominal charge day), carry the fixed exchange rate
/// for their currency, and keep the amount in the definition's own currency.
///
/// # Errors
///
/// Returns an error only if the definition listing itself fails; in that case
/// nothing is posted. Failures while checking or posting a single definition
/// are logged, counted in the report, and do not abort the batch.
pub fn materialize_due(
    today: Date,
    ledger: &impl RecurringLedger,
) -> Result<MaterializationReport, Error> {
    let definitions = ledger.active_definitions()?;
    let period = month_bounds(today);

    let mut report = MaterializationReport::default();

    for definition in definitions {
        // Not yet due this period.
        if definition.day_of_month.get() > today.day() {
            continue;
        }

        let matches =
            match ledger.matching_expenses(&definition.category, &definition.name, &period) {
                Ok(matches) => matches,
                Err(error) => {
                    tracing::error!(
                        "Duplicate check failed for recurring expense '{}', skipping it this run: {error}",
                        definition.name
                    );
                    report.skipped_errors += 1;
                    continue;
                }
            };

        // Already posted this month.
        if !matches.is_empty() {
            continue;
        }

        let draft = draft_for(&definition, today);

        match ledger.insert_transaction(draft) {
            Ok(()) => report.materialized.push(definition.name),
            Err(error) => {
                tracing::error!(
                    "Could not post recurring expense '{}', skipping it this run: {error}",
                    definition.name
                );
                report.skipped_errors += 1;
            }
        }
    }

    Ok(report)
}

fn draft_for(definition: &RecurringExpense, today: Date) -> NewTransaction {
    NewTransaction {
        kind: TransactionKind::Expense,
        amount: definition.amount,
        currency: definition.currency,
        exchange_rate: Some(exchange_rate_for(definition.currency)),
        category: definition.category.clone(),
        description: Some(format!("{} {}", definition.name, AUTO_RECURRING_MARKER)),
        date: today,
        store_id: None,
        business_model_id: None,
    }
}

/// The production ledger backed by the application database.
pub struct SqliteRecurringLedger<'a> {
    pub connection: &'a Connection,
}

impl RecurringLedger for SqliteRecurringLedger<'_> {
    fn active_definitions(&self) -> Result<Vec<RecurringExpense>, Error> {
        get_active_recurring_expenses(self.connection)
    }

    fn matching_expenses(
        &self,
        category: &str,
        name_fragment: &str,
        period: &RangeInclusive<Date>,
    ) -> Result<Vec<TransactionId>, Error> {
        self.connection
            .prepare(
                "SELECT id FROM \"transaction\"
                 WHERE kind = 'expense'
                   AND category = ?1
                   AND date BETWEEN ?2 AND ?3
                   AND description IS NOT NULL
                   AND instr(lower(description), lower(?4)) > 0",
            )?
            .query_map(
                (category, period.start(), period.end(), name_fragment),
                |row| row.get(0),
            )?
            .map(|maybe_id| maybe_id.map_err(Error::from))
            .collect()
    }

    fn insert_transaction(&self, draft: NewTransaction) -> Result<(), Error> {
        create_transaction(draft, self.connection).map(|_| ())
    }
}
