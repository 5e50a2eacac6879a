//! Recurring expense edit page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use maud::{Markup, html};

use crate::{
    Error, endpoints,
    category::{Category, get_categories_for},
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base},
    navigation::NavBar,
    recurring::{
        RecurringExpense, RecurringExpenseId,
        create::{
            SubscriptionFormData, SubscriptionFormState, SubscriptionFormValues,
            subscription_form_fields,
        },
        get_recurring_expense, update_recurring_expense,
    },
    transaction::TransactionKind,
};

/// Render the recurring expense edit page.
pub async fn get_edit_subscription_page(
    State(state): State<SubscriptionFormState>,
    Path(subscription_id): Path<RecurringExpenseId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let subscription = get_recurring_expense(subscription_id, &connection)?;
    let categories = get_categories_for(TransactionKind::Expense, &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve categories: {error}"))?;

    Ok(edit_subscription_view(&subscription, &categories, "").into_response())
}

/// Handle recurring expense edit form submission.
pub async fn update_subscription_endpoint(
    State(state): State<SubscriptionFormState>,
    Path(subscription_id): Path<RecurringExpenseId>,
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
            let subscription = match get_recurring_expense(subscription_id, &connection) {
                Ok(subscription) => subscription,
                Err(error) => return error.into_alert_response(),
            };
            let categories =
                get_categories_for(TransactionKind::Expense, &connection).unwrap_or_default();
            return edit_subscription_view(&subscription, &categories, &format!("Error: {error}"))
                .into_response();
        }
    };

    match update_recurring_expense(subscription_id, draft, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::SUBSCRIPTIONS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => error.into_alert_response(),
    }
}

fn edit_subscription_view(
    subscription: &RecurringExpense,
    categories: &[Category],
    error_message: &str,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::SUBSCRIPTIONS_VIEW).into_html();
    let update_url = endpoints::format_endpoint(endpoints::PUT_SUBSCRIPTION, subscription.id);

    let values = SubscriptionFormValues {
        name: &subscription.name,
        amount: Some(subscription.amount),
        currency: subscription.currency,
        day_of_month: subscription.day_of_month.get(),
        category: &subscription.category,
        interval: subscription.interval,
        is_active: subscription.is_active,
    };

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { "Edit Recurring Expense" }

            form
                hx-put=(update_url)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                (subscription_form_fields(&values, categories, error_message))

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save Changes" }
            }
        }
    };

    base("Edit Recurring Expense", &[], &content)
}

#[cfg(test)]
mod edit_subscription_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use axum_extra::extract::Form;
    use rusqlite::Connection;

    use crate::{
        Error,
        currency::Currency,
        db::initialize,
        endpoints,
        recurring::{
            DayOfMonth, RecurrenceInterval, create::{SubscriptionFormData, SubscriptionFormState},
            create_recurring_expense, db::test_helpers::subscription_draft, get_recurring_expense,
        },
        test_utils::{assert_hx_redirect, assert_valid_html, must_get_form, parse_html_document},
    };

    use super::{get_edit_subscription_page, update_subscription_endpoint};

    fn get_test_state() -> (SubscriptionFormState, crate::recurring::RecurringExpense) {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let subscription =
            create_recurring_expense(subscription_draft("Canva", 12.99, 10), &connection).unwrap();

        (
            SubscriptionFormState {
                db_connection: Arc::new(Mutex::new(connection)),
            },
            subscription,
        )
    }

    #[tokio::test]
    async fn edit_page_shows_current_values() {
        let (state, subscription) = get_test_state();

        let response = get_edit_subscription_page(State(state), Path(subscription.id))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert!(form.html().contains("Canva"));
        assert!(form.html().contains("12.99"));
    }

    #[tokio::test]
    async fn edit_page_returns_not_found_for_missing_subscription() {
        let (state, subscription) = get_test_state();

        let result = get_edit_subscription_page(State(state), Path(subscription.id + 42)).await;

        assert_eq!(result.unwrap_err(), Error::NotFound);
    }

    #[tokio::test]
    async fn update_changes_all_fields() {
        let (state, subscription) = get_test_state();
        let form = SubscriptionFormData {
            name: "Canva Pro".to_string(),
            amount: 19.99,
            currency: Currency::Eur,
            day_of_month: 15,
            category: "Design".to_string(),
            interval: RecurrenceInterval::Yearly,
            is_active: None,
        };

        let response =
            update_subscription_endpoint(State(state.clone()), Path(subscription.id), Form(form))
                .await
                .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::SUBSCRIPTIONS_VIEW);

        let connection = state.db_connection.lock().unwrap();
        let updated = get_recurring_expense(subscription.id, &connection).unwrap();
        assert_eq!(updated.name, "Canva Pro");
        assert_eq!(updated.amount, 19.99);
        assert_eq!(updated.currency, Currency::Eur);
        assert_eq!(updated.day_of_month, DayOfMonth::new(15).unwrap());
        assert_eq!(updated.category, "Design");
        assert_eq!(updated.interval, RecurrenceInterval::Yearly);
        assert!(!updated.is_active);
    }
}
