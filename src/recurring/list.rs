//! Recurring expenses listing page.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    currency::Currency,
    html::{
        BADGE_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, STAT_CARD_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, edit_delete_action_links, format_currency,
    },
    navigation::NavBar,
    recurring::{RecurringExpense, get_all_recurring_expenses},
};

/// The state needed for the recurring expenses listing page.
#[derive(Debug, Clone)]
pub struct SubscriptionsPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SubscriptionsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the recurring expenses listing page.
pub async fn get_subscriptions_page(
    State(state): State<SubscriptionsPageState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let subscriptions = get_all_recurring_expenses(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve recurring expenses: {error}"))?;

    Ok(subscriptions_view(&subscriptions).into_response())
}

/// The sum of all active definitions' amounts, face value.
///
/// Mixed currencies are summed as-is, the same simplification the monthly
/// total card always made.
fn active_monthly_total(subscriptions: &[RecurringExpense]) -> f64 {
    subscriptions
        .iter()
        .filter(|subscription| subscription.is_active)
        .map(|subscription| subscription.amount)
        .sum()
}

fn subscriptions_view(subscriptions: &[RecurringExpense]) -> Markup {
    let nav_bar = NavBar::new(endpoints::SUBSCRIPTIONS_VIEW).into_html();
    let active_count = subscriptions.iter().filter(|s| s.is_active).count();
    let monthly_total = active_monthly_total(subscriptions);

    let table_row = |subscription: &RecurringExpense| {
        let edit_url = endpoints::format_endpoint(endpoints::EDIT_SUBSCRIPTION_VIEW, subscription.id);
        let delete_url = endpoints::format_endpoint(endpoints::DELETE_SUBSCRIPTION, subscription.id);
        let toggle_url = endpoints::format_endpoint(endpoints::TOGGLE_SUBSCRIPTION, subscription.id);
        let confirm_message =
            format!("Are you sure you want to delete '{}'?", subscription.name);

        let status_style = if subscription.is_active {
            "px-3 py-1 rounded-full text-xs font-medium bg-green-100 text-green-700 \
            hover:bg-green-200 dark:bg-green-900/40 dark:text-green-300"
        } else {
            "px-3 py-1 rounded-full text-xs font-medium bg-gray-100 text-gray-500 \
            hover:bg-gray-200 dark:bg-gray-700 dark:text-gray-400"
        };

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE)
                {
                    span class="font-medium text-gray-900 dark:text-white" { (subscription.name) }
                }

                td class=(TABLE_CELL_STYLE)
                {
                    span class="font-bold text-red-600 dark:text-red-400"
                    {
                        (format_currency(subscription.amount, subscription.currency))
                    }
                }

                td class=(TABLE_CELL_STYLE)
                {
                    span class=(BADGE_STYLE) { "Day " (subscription.day_of_month) }
                }

                td class=(TABLE_CELL_STYLE)
                {
                    span class=(BADGE_STYLE) { (subscription.category) }
                }

                td class=(TABLE_CELL_STYLE) { (subscription.interval.label()) }

                td class=(TABLE_CELL_STYLE)
                {
                    button
                        type="button"
                        hx-post=(toggle_url)
                        hx-target-error="#alert-container"
                        class=(status_style)
                    {
                        @if subscription.is_active { "Active" } @else { "Paused" }
                    }
                }

                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4"
                    {
                        (edit_delete_action_links(
                            &edit_url,
                            &delete_url,
                            &confirm_message,
                            "closest tr",
                            "delete",
                        ))
                    }
                }
            }
        )
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 lg:max-w-5xl lg:w-full lg:mx-auto"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Recurring Expenses" }

                    a href=(endpoints::NEW_SUBSCRIPTION_VIEW) class=(LINK_STYLE)
                    {
                        "Create Recurring Expense"
                    }
                }

                div class=(STAT_CARD_STYLE)
                {
                    p class="text-xs font-medium text-gray-500 dark:text-gray-400"
                    {
                        "Monthly Total"
                    }

                    p class="mt-1 text-3xl font-bold text-red-600 dark:text-red-400"
                    {
                        (format_currency(monthly_total, Currency::Usd))
                    }

                    p class="mt-1 text-xs text-gray-500 dark:text-gray-400"
                    {
                        (active_count) " active recurring expense(s). Due charges are posted \
                        automatically when the dashboard first loads."
                    }
                }

                section class="dark:bg-gray-800"
                {
                    table class="w-full text-sm text-left rtl:text-right
                        text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Charge Day" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Interval" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Status" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for subscription in subscriptions {
                                (table_row(subscription))
                            }

                            @if subscriptions.is_empty() {
                                tr
                                {
                                    td
                                        colspan="7"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        "No recurring expenses yet. "
                                        a href=(endpoints::NEW_SUBSCRIPTION_VIEW) class=(LINK_STYLE)
                                        {
                                            "Create your first one"
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Recurring Expenses", &[], &content)
}
