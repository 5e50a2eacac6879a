//! Recurring expense creation page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error, endpoints,
    category::{Category, get_categories_for},
    currency::Currency,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
        currency_select,
    },
    navigation::NavBar,
    recurring::{
        DayOfMonth, RecurrenceInterval, RecurringExpenseDraft, create_recurring_expense,
    },
    transaction::TransactionKind,
};

/// The state needed for the recurring expense form pages.
#[derive(Debug, Clone)]
pub struct SubscriptionFormState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SubscriptionFormState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for creating or editing a recurring expense.
#[derive(Debug, Deserialize)]
pub struct SubscriptionFormData {
    pub name: String,
    pub amount: f64,
    pub currency: Currency,
    pub day_of_month: u8,
    pub category: String,
    pub interval: RecurrenceInterval,
    /// Comes from a checkbox, so it either has a string value or is not set.
    #[serde(default)]
    pub is_active: Option<String>,
}

impl SubscriptionFormData {
    /// Validate the form into a draft.
    pub(super) fn into_draft(self) -> Result<RecurringExpenseDraft, Error> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(Error::EmptyRecurringName);
        }

        let day_of_month = DayOfMonth::new(self.day_of_month)?;

        Ok(RecurringExpenseDraft {
            name: name.to_string(),
            amount: self.amount,
            currency: self.currency,
            day_of_month,
            category: self.category,
            is_active: self.is_active.is_some(),
            interval: self.interval,
        })
    }
}

/// Render the recurring expense creation page.
pub async fn get_new_subscription_page(
    State(state): State<SubscriptionFormState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let categories = get_categories_for(TransactionKind::Expense, &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve categories: {error}"))?;

    Ok(new_subscription_view(&categories, "").into_response())
}

/// Handle recurring expense creation form submission.
pub async fn create_subscription_endpoint(
    State(state): State<SubscriptionFormState>,
    Form(form): Form<SubscriptionFormData>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let draft = match form.into_draft() {
        Ok(draft) => draft,
        Err(error) => {
            let categories =
                get_categories_for(TransactionKind::Expense, &connection).unwrap_or_default();
            return new_subscription_view(&categories, &format!("Error: {error}"))
                .into_response();
        }
    };

    match create_recurring_expense(draft, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::SUBSCRIPTIONS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a recurring expense: {error}");

            error.into_alert_response()
        }
    }
}

/// The values the shared form fields are rendered with.
pub(super) struct SubscriptionFormValues<'a> {
    pub name: &'a str,
    pub amount: Option<f64>,
    pub currency: Currency,
    pub day_of_month: u8,
    pub category: &'a str,
    pub interval: RecurrenceInterval,
    pub is_active: bool,
}

impl Default for SubscriptionFormValues<'_> {
    fn default() -> Self {
        Self {
            name: "",
            amount: None,
            currency: Currency::Usd,
            day_of_month: 1,
            category: "",
            interval: RecurrenceInterval::Monthly,
            is_active: true,
        }
    }
}

pub(super) fn subscription_form_fields(
    values: &SubscriptionFormValues<'_>,
    categories: &[Category],
    error_message: &str,
) -> Markup {
    let amount_str = values.amount.map(|amount| format!("{amount:.2}"));

    html! {
        div
        {
            label
                for="name"
                class=(FORM_LABEL_STYLE)
            {
                "Name"
            }

            input
                id="name"
                type="text"
                name="name"
                value=(values.name)
                placeholder="Canva"
                required
                autofocus
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="amount"
                class=(FORM_LABEL_STYLE)
            {
                "Amount"
            }

            input
                name="amount"
                id="amount"
                type="number"
                step="0.01"
                min="0.01"
                placeholder="0.01"
                value=[amount_str.as_deref()]
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        (currency_select(values.currency))

        div
        {
            label
                for="day_of_month"
                class=(FORM_LABEL_STYLE)
            {
                "Charge Day (1-31)"
            }

            input
                name="day_of_month"
                id="day_of_month"
                type="number"
                min="1"
                max="31"
                value=(values.day_of_month)
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="category"
                class=(FORM_LABEL_STYLE)
            {
                "Category"
            }

            select
                name="category"
                id="category"
                required
                class=(FORM_TEXT_INPUT_STYLE)
            {
                @if values.category.is_empty() {
                    option value="" { "Select a category" }
                }

                @for category in categories {
                    @if category.name.as_ref() == values.category {
                        option value=(category.name) selected { (category.name) }
                    } @else {
                        option value=(category.name) { (category.name) }
                    }
                }
            }
        }

        div
        {
            label
                for="interval"
                class=(FORM_LABEL_STYLE)
            {
                "Interval"
            }

            select
                name="interval"
                id="interval"
                class=(FORM_TEXT_INPUT_STYLE)
            {
                @for interval in RecurrenceInterval::ALL {
                    @if interval == values.interval {
                        option value=(interval.as_str()) selected { (interval.label()) }
                    } @else {
                        option value=(interval.as_str()) { (interval.label()) }
                    }
                }
            }
        }

        div class="flex items-center gap-x-3"
        {
            input
                type="checkbox"
                name="is_active"
                id="is_active"
                checked[values.is_active]
                class="rounded-xs";

            label
                for="is_active"
                class="block text-sm font-medium text-gray-900 dark:text-white"
            {
                "Active"
            }
        }

        @if !error_message.is_empty() {
            p class="text-red-600 dark:text-red-400"
            {
                (error_message)
            }
        }
    }
}

fn new_subscription_view(categories: &[Category], error_message: &str) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_SUBSCRIPTION_VIEW).into_html();

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { "New Recurring Expense" }

            form
                hx-post=(endpoints::POST_SUBSCRIPTION)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                (subscription_form_fields(&Default::default(), categories, error_message))

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Create Recurring Expense" }
            }
        }
    };

    base("New Recurring Expense", &[], &content)
}

#[cfg(test)]
mod new_subscription_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use rusqlite::Connection;

    use crate::{
        db::initialize,
        endpoints,
        test_utils::{
            assert_form_input, assert_form_select, assert_form_submit_button, assert_hx_endpoint,
            assert_valid_html, must_get_form, parse_html_document,
        },
    };

    use super::{SubscriptionFormState, get_new_subscription_page};

    #[tokio::test]
    async fn render_page() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let state = SubscriptionFormState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_new_subscription_page(State(state)).await.unwrap();

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::POST_SUBSCRIPTION, "hx-post");
        assert_form_input(&form, "name", "text");
        assert_form_input(&form, "amount", "number");
        assert_form_input(&form, "day_of_month", "number");
        assert_form_select(&form, "category");
        assert_form_select(&form, "interval");
        assert_form_submit_button(&form);
    }
}
