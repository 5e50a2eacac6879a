//! Defines the endpoint for creating a new transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error, endpoints,
    business_model::ModelId,
    currency::{Currency, exchange_rate_for},
    store::StoreId,
    timezone::local_today,
    transaction::{NewTransaction, TransactionKind, create_transaction},
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Europe/Istanbul".
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The form data for creating a transaction.
#[derive(Debug, Deserialize)]
pub struct TransactionForm {
    /// Whether this is income or an expense.
    pub kind: TransactionKind,
    /// The value of the transaction in its original currency.
    pub amount: f64,
    /// The currency the amount was entered in.
    pub currency: Currency,
    /// The category label picked from the drop-down.
    pub category: String,
    /// Text detailing the transaction.
    #[serde(default)]
    pub description: Option<String>,
    /// The date when the transaction occurred.
    pub date: Date,
    /// The store this transaction belongs to, if any.
    #[serde(default)]
    pub store_id: Option<StoreId>,
    /// The business model this transaction belongs to, if any.
    #[serde(default)]
    pub business_model_id: Option<ModelId>,
}

/// A route handler for creating a new transaction, redirects to transactions view on success.
///
/// The exchange rate stored on the record is fixed at creation time from the
/// selected currency, the same way the recurring expense checker does it.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let today = match local_today(&state.local_timezone) {
        Some(today) => today,
        None => {
            return Error::InvalidTimezoneError(state.local_timezone.clone())
                .into_alert_response();
        }
    };

    if form.date > today {
        return Error::FutureDate(form.date).into_alert_response();
    }

    let description = form
        .description
        .as_deref()
        .map(str::trim)
        .filter(|description| !description.is_empty())
        .map(str::to_string);

    let new_transaction = NewTransaction {
        kind: form.kind,
        amount: form.amount,
        currency: form.currency,
        exchange_rate: Some(exchange_rate_for(form.currency)),
        category: form.category,
        description,
        date: form.date,
        store_id: form.store_id,
        business_model_id: form.business_model_id,
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_transaction(new_transaction, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Could not create transaction: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod create_transaction_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode, response::IntoResponse};
    use axum_extra::extract::Form;
    use rusqlite::Connection;
    use time::{Duration, OffsetDateTime, macros::date};

    use crate::{
        currency::{Currency, USD_TRY_RATE},
        db::initialize,
        endpoints,
        test_utils::assert_hx_redirect,
        transaction::{TransactionKind, get_transaction},
    };

    use super::{CreateTransactionState, TransactionForm, create_transaction_endpoint};

    fn get_test_state() -> CreateTransactionState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        CreateTransactionState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: "Etc/UTC".to_string(),
        }
    }

    fn base_form() -> TransactionForm {
        TransactionForm {
            kind: TransactionKind::Expense,
            amount: 12.99,
            currency: Currency::Usd,
            category: "Software".to_string(),
            description: Some("Canva".to_string()),
            date: date!(2024 - 06 - 15),
            store_id: None,
            business_model_id: None,
        }
    }

    #[tokio::test]
    async fn can_create_transaction() {
        let state = get_test_state();

        let response = create_transaction_endpoint(State(state.clone()), Form(base_form()))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::TRANSACTIONS_VIEW);

        let connection = state.db_connection.lock().unwrap();
        let transaction = get_transaction(1, &connection).unwrap();
        assert_eq!(transaction.amount, 12.99);
        assert_eq!(transaction.category, "Software");
        assert_eq!(transaction.exchange_rate, Some(1.0));
    }

    #[tokio::test]
    async fn try_amounts_store_the_fixed_rate() {
        let state = get_test_state();
        let form = TransactionForm {
            currency: Currency::Try,
            amount: 1000.0,
            ..base_form()
        };

        create_transaction_endpoint(State(state.clone()), Form(form)).await;

        let connection = state.db_connection.lock().unwrap();
        let transaction = get_transaction(1, &connection).unwrap();
        // The amount stays in the original currency, only the rate is stored.
        assert_eq!(transaction.amount, 1000.0);
        assert_eq!(transaction.exchange_rate, Some(USD_TRY_RATE));
    }

    #[tokio::test]
    async fn blank_description_is_stored_as_null() {
        let state = get_test_state();
        let form = TransactionForm {
            description: Some("  ".to_string()),
            ..base_form()
        };

        create_transaction_endpoint(State(state.clone()), Form(form)).await;

        let connection = state.db_connection.lock().unwrap();
        let transaction = get_transaction(1, &connection).unwrap();
        assert_eq!(transaction.description, None);
    }

    #[tokio::test]
    async fn future_dates_are_rejected() {
        let state = get_test_state();
        let tomorrow = (OffsetDateTime::now_utc() + Duration::days(1)).date();
        let form = TransactionForm {
            date: tomorrow,
            ..base_form()
        };

        let response = create_transaction_endpoint(State(state.clone()), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let connection = state.db_connection.lock().unwrap();
        let count: u32 = connection
            .query_row("SELECT COUNT(1) FROM \"transaction\"", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
