//! Endpoint to flip a recurring expense between active and paused.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    recurring::{RecurringExpenseId, toggle_recurring_expense_active},
};

/// The state needed for toggling a recurring expense.
#[derive(Debug, Clone)]
pub struct ToggleSubscriptionState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ToggleSubscriptionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Flip a recurring expense and send the client back to the list page.
pub async fn toggle_subscription_endpoint(
    State(state): State<ToggleSubscriptionState>,
    Path(subscription_id): Path<RecurringExpenseId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match toggle_recurring_expense_active(subscription_id, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::SUBSCRIPTIONS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => error.into_alert_response(),
    }
}

#[cfg(test)]
mod toggle_subscription_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use rusqlite::Connection;

    use crate::{
        endpoints,
        recurring::{
            create_recurring_expense, create_recurring_expense_table,
            db::test_helpers::subscription_draft, get_recurring_expense,
        },
        test_utils::assert_hx_redirect,
    };

    use super::{ToggleSubscriptionState, toggle_subscription_endpoint};

    #[tokio::test]
    async fn toggling_pauses_an_active_subscription() {
        let connection = Connection::open_in_memory().unwrap();
        create_recurring_expense_table(&connection).unwrap();
        let subscription =
            create_recurring_expense(subscription_draft("Canva", 12.99, 10), &connection).unwrap();
        let state = ToggleSubscriptionState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = toggle_subscription_endpoint(State(state.clone()), Path(subscription.id))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::SUBSCRIPTIONS_VIEW);
        assert!(
            !get_recurring_expense(subscription.id, &state.db_connection.lock().unwrap())
                .unwrap()
                .is_active
        );
    }

    #[tokio::test]
    async fn toggling_missing_subscription_returns_not_found() {
        let connection = Connection::open_in_memory().unwrap();
        create_recurring_expense_table(&connection).unwrap();
        let state = ToggleSubscriptionState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = toggle_subscription_endpoint(State(state), Path(42))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
