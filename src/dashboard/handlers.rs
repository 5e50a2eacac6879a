//! Dashboard HTTP handler and view rendering.
//!
//! Rendering the dashboard is also what triggers the recurring expense check:
//! the first request after process start runs the checker, guarded by an
//! explicit one-shot flag owned by [AppState] rather than by the checker
//! itself, so re-renders never repeat the duplicate-check traffic.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error, endpoints,
    currency::Currency,
    dashboard::aggregation::{DashboardStats, summarize},
    html::{
        FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, STAT_CARD_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, base, format_currency,
    },
    navigation::NavBar,
    recurring::{MaterializationReport, SqliteRecurringLedger, materialize_due},
    timezone::local_today,
    transaction::{
        DateWindow, TransactionFilter, TransactionListRow, get_transactions_filtered,
        transaction_table_row,
    },
};

/// How many recent transactions the dashboard table shows.
const RECENT_TRANSACTIONS_LIMIT: usize = 10;

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Europe/Istanbul".
    pub local_timezone: String,
    /// One-shot flag so the recurring expense check runs at most once per
    /// process.
    pub recurring_check_done: Arc<AtomicBool>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
            recurring_check_done: state.recurring_check_done.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub range: Option<DateWindow>,
}

/// Display the financial overview.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)
        .ok_or_else(|| Error::InvalidTimezoneError(state.local_timezone.clone()))?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    // Post any recurring expenses that came due, once per process. A failed
    // run never takes the dashboard down with it.
    let report = if !state.recurring_check_done.swap(true, Ordering::SeqCst) {
        let ledger = SqliteRecurringLedger {
            connection: &connection,
        };

        match materialize_due(today, &ledger) {
            Ok(report) => Some(report),
            Err(error) => {
                tracing::error!("Recurring expense check failed, skipping this run: {error}");
                None
            }
        }
    } else {
        None
    };

    let window_preset = query.range.unwrap_or(DateWindow::All);
    let filter = TransactionFilter {
        window: window_preset.range(today),
        ..Default::default()
    };
    let rows = get_transactions_filtered(&filter, &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve transactions: {error}"))?;

    let stats = summarize(&rows);

    Ok(dashboard_view(&rows, &stats, report.as_ref(), window_preset, today).into_response())
}

fn materialization_notice(report: &MaterializationReport) -> Markup {
    html!(
        div
            class="rounded-lg border border-blue-200 bg-blue-50 p-4 text-sm
            text-blue-800 dark:border-blue-800 dark:bg-blue-900/20 dark:text-blue-300"
        {
            p class="font-medium"
            {
                (report.materialized.len()) " recurring expense(s) posted for this month: "
                (report.materialized.join(", "))
            }

            @if report.skipped_errors > 0 {
                p class="mt-1 text-xs text-blue-700 dark:text-blue-400"
                {
                    (report.skipped_errors) " definition(s) were skipped because of store \
                    errors and will be retried on the next start. See the server logs."
                }
            }
        }
    )
}

fn stale_sales_banner(days_since_last_sale: i64) -> Markup {
    html!(
        div
            class="rounded-r-lg border-l-4 border-red-500 bg-red-50 p-4
            dark:bg-red-900/20"
        {
            p class="font-bold text-red-700 dark:text-red-400"
            {
                "No sales for " (days_since_last_sale) " days!"
            }

            p class="text-sm text-red-600 dark:text-red-300"
            {
                "The stores may not be getting traffic. Check your ads or list a new product."
            }
        }
    )
}

fn stat_cards(stats: &DashboardStats) -> Markup {
    let profit = stats.profit();
    let profit_color = if profit >= 0.0 {
        "text-green-600 dark:text-green-400"
    } else {
        "text-red-600 dark:text-red-400"
    };

    html!(
        div class="grid grid-cols-1 gap-4 md:grid-cols-3 w-full"
        {
            div class=(STAT_CARD_STYLE)
            {
                p class="text-xs font-medium text-gray-500 dark:text-gray-400" { "Net Profit" }

                p class={ "mt-1 text-3xl font-bold " (profit_color) }
                {
                    (format_currency(profit, Currency::Usd))
                }

                p class="text-xs text-gray-500 dark:text-gray-400"
                {
                    (format!("{:.1}", stats.margin_percent())) "% margin"
                }
            }

            div class=(STAT_CARD_STYLE)
            {
                p class="text-xs font-medium text-gray-500 dark:text-gray-400" { "Total Income" }
                p class="mt-1 text-2xl font-bold text-green-600 dark:text-green-400"
                {
                    (format_currency(stats.income_usd, Currency::Usd))
                }
            }

            div class=(STAT_CARD_STYLE)
            {
                p class="text-xs font-medium text-gray-500 dark:text-gray-400" { "Total Expenses" }
                p class="mt-1 text-2xl font-bold text-red-600 dark:text-red-400"
                {
                    (format_currency(stats.expense_usd, Currency::Usd))
                }
            }
        }
    )
}

fn period_filter(window_preset: DateWindow) -> Markup {
    html!(
        form
            method="get"
            action=(endpoints::DASHBOARD_VIEW)
            class="flex items-end gap-4"
        {
            div
            {
                label for="range" class=(FORM_LABEL_STYLE) { "Period" }

                select name="range" id="range" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for window in DateWindow::ALL {
                        // The dashboard never offers "last month" on its own;
                        // the transactions page covers that.
                        @if window != DateWindow::LastMonth {
                            @if window == window_preset {
                                option value=(window.as_str()) selected { (window.label()) }
                            } @else {
                                option value=(window.as_str()) { (window.label()) }
                            }
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

fn dashboard_view(
    rows: &[TransactionListRow],
    stats: &DashboardStats,
    report: Option<&MaterializationReport>,
    window_preset: DateWindow,
    today: time::Date,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();
    let recent_rows = &rows[..rows.len().min(RECENT_TRANSACTIONS_LIMIT)];

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 lg:max-w-5xl lg:w-full lg:mx-auto"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    div
                    {
                        h1 class="text-xl font-bold" { "Overview" }
                        p class="text-sm text-gray-500 dark:text-gray-400"
                        {
                            "Today: " (today)
                        }
                    }

                    a href=(endpoints::NEW_TRANSACTION_VIEW) class=(LINK_STYLE)
                    {
                        "New Transaction"
                    }
                }

                @if let Some(report) = report {
                    @if !report.materialized.is_empty() || report.skipped_errors > 0 {
                        (materialization_notice(report))
                    }
                }

                @if stats.sales_are_stale(today) {
                    @if let Some(days) = stats.days_since_last_sale(today) {
                        (stale_sales_banner(days))
                    }
                }

                (period_filter(window_preset))

                (stat_cards(stats))

                section class="dark:bg-gray-800"
                {
                    h2 class="text-lg font-semibold py-2" { "Recent Transactions" }

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
                            @for row in recent_rows {
                                (transaction_table_row(row))
                            }

                            @if recent_rows.is_empty() {
                                tr
                                {
                                    td
                                        colspan="7"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        "No transactions recorded yet."
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Dashboard", &[], &content)
}

#[cfg(test)]
mod dashboard_page_tests {
    use std::sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    };

    use axum::extract::{Query, State};
    use rusqlite::Connection;
    use time::{Duration, OffsetDateTime};

    use crate::{
        db::initialize,
        recurring::{create_recurring_expense, subscription_draft},
        test_utils::{assert_valid_html, parse_html_document},
        transaction::{NewTransaction, TransactionKind, create_transaction, expense_draft},
    };

    use super::{DashboardQuery, DashboardState, get_dashboard_page};

    fn get_test_state() -> DashboardState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        DashboardState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: "Etc/UTC".to_string(),
            recurring_check_done: Arc::new(AtomicBool::new(false)),
        }
    }

    fn count_transactions(state: &DashboardState) -> u32 {
        state
            .db_connection
            .lock()
            .unwrap()
            .query_row("SELECT COUNT(1) FROM \"transaction\"", [], |row| row.get(0))
            .unwrap()
    }

    #[tokio::test]
    async fn first_render_posts_due_recurring_expenses_and_shows_notice() {
        let state = get_test_state();
        {
            let connection = state.db_connection.lock().unwrap();
            create_recurring_expense(subscription_draft("Canva", 12.99, 1), &connection).unwrap();
        }

        let response = get_dashboard_page(State(state.clone()), Query(DashboardQuery::default()))
            .await
            .unwrap();

        assert!(state.recurring_check_done.load(Ordering::SeqCst));
        assert_eq!(count_transactions(&state), 1);

        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert!(html.html().contains("Canva"));
        assert!(html.html().contains("recurring expense(s) posted"));
    }

    #[tokio::test]
    async fn second_render_does_not_run_the_check_again() {
        let state = get_test_state();
        {
            let connection = state.db_connection.lock().unwrap();
            create_recurring_expense(subscription_draft("Canva", 12.99, 1), &connection).unwrap();
        }

        get_dashboard_page(State(state.clone()), Query(DashboardQuery::default()))
            .await
            .unwrap();
        let second = get_dashboard_page(State(state.clone()), Query(DashboardQuery::default()))
            .await
            .unwrap();

        assert_eq!(count_transactions(&state), 1);

        // The second render must not re-show the notification either.
        let html = parse_html_document(second).await;
        assert!(!html.html().contains("recurring expense(s) posted"));
    }

    #[tokio::test]
    async fn no_notice_when_nothing_was_due() {
        let state = get_test_state();

        let response = get_dashboard_page(State(state), Query(DashboardQuery::default()))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        assert!(!html.html().contains("recurring expense(s) posted"));
    }

    #[tokio::test]
    async fn stale_sales_banner_shows_after_ten_days() {
        let state = get_test_state();
        let today = OffsetDateTime::now_utc().date();
        {
            let connection = state.db_connection.lock().unwrap();
            create_transaction(
                NewTransaction {
                    kind: TransactionKind::Income,
                    ..expense_draft(100.0, "Sales", today - Duration::days(15))
                },
                &connection,
            )
            .unwrap();
        }

        let response = get_dashboard_page(State(state), Query(DashboardQuery::default()))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        assert!(html.html().contains("No sales for 15 days!"));
    }

    #[tokio::test]
    async fn no_banner_with_recent_sales() {
        let state = get_test_state();
        let today = OffsetDateTime::now_utc().date();
        {
            let connection = state.db_connection.lock().unwrap();
            create_transaction(
                NewTransaction {
                    kind: TransactionKind::Income,
                    ..expense_draft(100.0, "Sales", today)
                },
                &connection,
            )
            .unwrap();
        }

        let response = get_dashboard_page(State(state), Query(DashboardQuery::default()))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        assert!(!html.html().contains("No sales for"));
    }
}
