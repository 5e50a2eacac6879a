//! The transactions listing page with its filter bar and summary cards.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error, endpoints,
    business_model::{BusinessModel, get_all_business_models},
    html::{
        BADGE_STYLE, BUTTON_DELETE_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE,
        PAGE_CONTAINER_STYLE, STAT_CARD_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, base,
        format_currency,
    },
    navigation::NavBar,
    recurring::AUTO_RECURRING_MARKER,
    store::{Store, get_all_stores},
    timezone::local_today,
    transaction::{
        DateWindow, TransactionFilter, TransactionKind, TransactionListRow,
        get_transactions_filtered,
    },
};

/// The state needed for the transactions page.
#[derive(Debug, Clone)]
pub struct TransactionsPageState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub local_timezone: String,
}

impl FromRef<AppState> for TransactionsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The filter query parameters. Selects submit "all" for no filter, which
/// parses to `None` for the ID fields.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionsQuery {
    pub range: Option<DateWindow>,
    pub kind: Option<String>,
    pub store: Option<String>,
    pub model: Option<String>,
}

/// The raw amount totals over the filtered rows.
///
/// These are sums of face values, not USD conversions, mirroring what the
/// summary cards display.
#[derive(Debug, PartialEq)]
struct Summary {
    income: f64,
    expense: f64,
}

impl Summary {
    fn of(rows: &[TransactionListRow]) -> Self {
        let mut summary = Summary {
            income: 0.0,
            expense: 0.0,
        };

        for row in rows {
            match row.transaction.kind {
                TransactionKind::Income => summary.income += row.transaction.amount,
                TransactionKind::Expense => summary.expense += row.transaction.amount,
            }
        }

        summary
    }

    fn net(&self) -> f64 {
        self.income - self.expense
    }
}

fn parse_id_filter(raw: Option<&str>) -> Option<i64> {
    raw.filter(|value| *value != "all")
        .and_then(|value| value.parse().ok())
}

fn parse_kind_filter(raw: Option<&str>) -> Option<TransactionKind> {
    match raw {
        Some("income") => Some(TransactionKind::Income),
        Some("expense") => Some(TransactionKind::Expense),
        _ => None,
    }
}

/// Render the transactions page.
pub async fn get_transactions_page(
    State(state): State<TransactionsPageState>,
    Query(query): Query<TransactionsQuery>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)
        .ok_or_else(|| Error::InvalidTimezoneError(state.local_timezone.clone()))?;

    let window_preset = query.range.unwrap_or(DateWindow::ThisMonth);
    let filter = TransactionFilter {
        window: window_preset.range(today),
        kind: parse_kind_filter(query.kind.as_deref()),
        store_id: parse_id_filter(query.store.as_deref()),
        business_model_id: parse_id_filter(query.model.as_deref()),
    };

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let rows = get_transactions_filtered(&filter, &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve transactions: {error}"))?;
    let stores = get_all_stores(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve stores: {error}"))?;
    let models = get_all_business_models(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve business models: {error}"))?;

    let summary = Summary::of(&rows);

    Ok(transactions_view(&rows, &summary, &query, window_preset, &stores, &models).into_response())
}

fn filter_bar(
    query: &TransactionsQuery,
    window_preset: DateWindow,
    stores: &[Store],
    models: &[BusinessModel],
) -> Markup {
    let kind = query.kind.as_deref().unwrap_or("all");
    let store = query.store.as_deref().unwrap_or("all");
    let model = query.model.as_deref().unwrap_or("all");

    html!(
        form
            method="get"
            action=(endpoints::TRANSACTIONS_VIEW)
            class="grid grid-cols-2 gap-4 lg:grid-cols-5 items-end w-full"
        {
            div
            {
                label for="range" class=(FORM_LABEL_STYLE) { "Date Range" }

                select name="range" id="range" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for window in DateWindow::ALL {
                        @if window == window_preset {
                            option value=(window.as_str()) selected { (window.label()) }
                        } @else {
                            option value=(window.as_str()) { (window.label()) }
                        }
                    }
                }
            }

            div
            {
                label for="kind" class=(FORM_LABEL_STYLE) { "Type" }

                select name="kind" id="kind" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for (value, label) in [("all", "All"), ("income", "Income"), ("expense", "Expense")] {
                        @if value == kind {
                            option value=(value) selected { (label) }
                        } @else {
                            option value=(value) { (label) }
                        }
                    }
                }
            }

            div
            {
                label for="store" class=(FORM_LABEL_STYLE) { "Store" }

                select name="store" id="store" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @if store == "all" {
                        option value="all" selected { "All" }
                    } @else {
                        option value="all" { "All" }
                    }

                    @for store_entry in stores {
                        @if store == store_entry.id.to_string() {
                            option value=(store_entry.id) selected { (store_entry.name) }
                        } @else {
                            option value=(store_entry.id) { (store_entry.name) }
                        }
                    }
                }
            }

            div
            {
                label for="model" class=(FORM_LABEL_STYLE) { "Business Model" }

                select name="model" id="model" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @if model == "all" {
                        option value="all" selected { "All" }
                    } @else {
                        option value="all" { "All" }
                    }

                    @for model_entry in models {
                        @if model == model_entry.id.to_string() {
                            option value=(model_entry.id) selected { (model_entry.name) }
                        } @else {
                            option value=(model_entry.id) { (model_entry.name) }
                        }
                    }
                }
            }

            button
                type="submit"
                class="px-4 py-2 bg-blue-500 dark:bg-blue-600 hover:bg-blue-600
                hover:dark:bg-blue-700 text-white rounded"
            {
                "Apply"
            }
        }
    )
}

fn summary_cards(summary: &Summary) -> Markup {
    use crate::currency::Currency;

    let net = summary.net();
    let net_color = if net >= 0.0 {
        "text-green-600 dark:text-green-400"
    } else {
        "text-red-600 dark:text-red-400"
    };

    html!(
        div class="grid grid-cols-1 gap-4 md:grid-cols-3 w-full"
        {
            div class=(STAT_CARD_STYLE)
            {
                p class="text-xs font-medium text-gray-500 dark:text-gray-400" { "Income" }
                p class="mt-1 text-2xl font-bold text-green-600 dark:text-green-400"
                {
                    (format_currency(summary.income, Currency::Usd))
                }
            }

            div class=(STAT_CARD_STYLE)
            {
                p class="text-xs font-medium text-gray-500 dark:text-gray-400" { "Expenses" }
                p class="mt-1 text-2xl font-bold text-red-600 dark:text-red-400"
                {
                    (format_currency(summary.expense, Currency::Usd))
                }
            }

            div class=(STAT_CARD_STYLE)
            {
                p class="text-xs font-medium text-gray-500 dark:text-gray-400" { "Net" }
                p class={ "mt-1 text-2xl font-bold " (net_color) }
                {
                    (format_currency(net, Currency::Usd))
                }
            }
        }
    )
}

pub(crate) fn transaction_table_row(row: &TransactionListRow) -> Markup {
    let transaction = &row.transaction;
    let is_auto_recurring = transaction
        .description
        .as_deref()
        .is_some_and(|description| description.contains(AUTO_RECURRING_MARKER));

    let row_style = if is_auto_recurring {
        "bg-yellow-50 border-b border-l-4 border-l-yellow-400 dark:bg-yellow-900/20 dark:border-gray-700"
    } else {
        "bg-white border-b dark:bg-gray-800 dark:border-gray-700"
    };

    let amount_style = if is_auto_recurring {
        "text-yellow-600 dark:text-yellow-400"
    } else {
        match transaction.kind {
            TransactionKind::Income => "text-green-600 dark:text-green-400",
            TransactionKind::Expense => "text-red-600 dark:text-red-400",
        }
    };

    let sign = match transaction.kind {
        TransactionKind::Income => "+",
        TransactionKind::Expense => "-",
    };

    let delete_url = endpoints::format_endpoint(endpoints::DELETE_TRANSACTION, transaction.id);

    html!(
        tr class=(row_style)
        {
            td class=(TABLE_CELL_STYLE) { (transaction.date) }

            td class=(TABLE_CELL_STYLE) { (row.store_name.as_deref().unwrap_or("-")) }

            td class=(TABLE_CELL_STYLE) { (row.business_model_name.as_deref().unwrap_or("-")) }

            td class=(TABLE_CELL_STYLE)
            {
                span class=(BADGE_STYLE) { (transaction.category) }
            }

            td class={ (TABLE_CELL_STYLE) " truncate max-w-[200px]" }
            {
                (transaction.description.as_deref().unwrap_or("-"))
            }

            td class={ (TABLE_CELL_STYLE) " text-right font-bold " (amount_style) }
            {
                (sign) (format_currency(transaction.amount, transaction.currency))
            }

            td class={ (TABLE_CELL_STYLE) " text-right" }
            {
                button
                    type="button"
                    hx-delete=(delete_url)
                    hx-confirm="Are you sure you want to delete this transaction?"
                    hx-target="closest tr"
                    hx-swap="delete"
                    hx-target-error="#alert-container"
                    class=(BUTTON_DELETE_STYLE)
                {
                    "Delete"
                }
            }
        }
    )
}

fn transactions_view(
    rows: &[TransactionListRow],
    summary: &Summary,
    query: &TransactionsQuery,
    window_preset: DateWindow,
    stores: &[Store],
    models: &[BusinessModel],
) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 lg:max-w-5xl lg:w-full lg:mx-auto"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Transactions" }

                    a href=(endpoints::NEW_TRANSACTION_VIEW) class=(LINK_STYLE)
                    {
                        "New Transaction"
                    }
                }

                (filter_bar(query, window_preset, stores, models))

                (summary_cards(summary))

                section class="dark:bg-gray-800"
                {
                    table class="w-full text-sm text-left rtl:text-right
                        text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Store" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Model" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                                th scope="col" class={ (TABLE_CELL_STYLE) " text-right" } { "Amount" }
                                th scope="col" class={ (TABLE_CELL_STYLE) " text-right" } { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for row in rows {
                                (transaction_table_row(row))
                            }

                            @if rows.is_empty() {
                                tr
                                {
                                    td
                                        colspan="7"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        "No transactions match the selected filters."
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Transactions", &[], &content)
}
