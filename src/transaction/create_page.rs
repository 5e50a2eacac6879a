//! The page for recording a new transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::html;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error, endpoints,
    business_model::get_business_models_for,
    category::get_categories_for,
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base},
    navigation::NavBar,
    store::get_all_stores,
    timezone::local_today,
    transaction::{
        TransactionKind,
        form::{TransactionFormDefaults, transaction_form_fields},
    },
};

/// The state needed for the new transaction page.
#[derive(Debug, Clone)]
pub struct NewTransactionPageState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub local_timezone: String,
}

impl FromRef<AppState> for NewTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

#[derive(Deserialize)]
pub struct NewTransactionQuery {
    /// Preselected transaction kind; the kind radios reload the page with
    /// this set so the drop-downs can be filtered server side.
    pub kind: Option<TransactionKind>,
}

/// Render the new transaction page.
pub async fn get_create_transaction_page(
    State(state): State<NewTransactionPageState>,
    Query(query): Query<NewTransactionQuery>,
) -> Result<Response, Error> {
    let kind = query.kind.unwrap_or(TransactionKind::Expense);

    let today = local_today(&state.local_timezone)
        .ok_or_else(|| Error::InvalidTimezoneError(state.local_timezone.clone()))?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let categories = get_categories_for(kind, &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve categories: {error}"))?;
    let stores = get_all_stores(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve stores: {error}"))?;
    let models = get_business_models_for(kind, &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve business models: {error}"))?;

    let nav_bar = NavBar::new(endpoints::NEW_TRANSACTION_VIEW).into_html();
    let defaults = TransactionFormDefaults {
        kind,
        date: today,
        max_date: today,
    };

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { "New Transaction" }

            form
                id="transaction-form"
                hx-post=(endpoints::TRANSACTIONS_API)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                (transaction_form_fields(&defaults, &categories, &stores, &models))

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Record Transaction" }
            }
        }
    };

    Ok(base("New Transaction", &[], &content).into_response())
}
