//! Recurring expense delete endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{AppState, Error, recurring::{RecurringExpenseId, delete_recurring_expense}};

/// The state needed for deleting a recurring expense.
#[derive(Debug, Clone)]
pub struct DeleteSubscriptionState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteSubscriptionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Delete a recurring expense. Returns an empty OK response so htmx removes the row.
pub async fn delete_subscription_endpoint(
    State(state): State<DeleteSubscriptionState>,
    Path(subscription_id): Path<RecurringExpenseId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_recurring_expense(subscription_id, &connection) {
        Ok(()) => StatusCode::OK.into_response(),
        Err(error) => error.into_alert_response(),
    }
}
