//! Store delete endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{AppState, Error, store::{StoreId, delete_store}};

/// The state needed for deleting a store.
#[derive(Debug, Clone)]
pub struct DeleteStoreState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteStoreState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Delete a store. Returns an empty OK response so htmx removes the row.
pub async fn delete_store_endpoint(
    State(state): State<DeleteStoreState>,
    Path(store_id): Path<StoreId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_store(store_id, &connection) {
        Ok(()) => StatusCode::OK.into_response(),
        Err(error) => error.into_alert_response(),
    }
}

#[cfg(test)]
mod delete_store_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use rusqlite::Connection;

    use crate::{
        Error,
        currency::Currency,
        store::{StoreName, create_store, create_store_table, get_store},
    };

    use super::{DeleteStoreState, delete_store_endpoint};

    fn get_test_state() -> DeleteStoreState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        create_store_table(&connection).expect("Could not create store table");

        DeleteStoreState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn deletes_store() {
        let state = get_test_state();
        let store = {
            let connection = state.db_connection.lock().unwrap();
            create_store(
                StoreName::new_unchecked("Cozy Prints"),
                "Etsy",
                Currency::Usd,
                &connection,
            )
            .unwrap()
        };

        let response = delete_store_endpoint(State(state.clone()), Path(store.id))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            get_store(store.id, &state.db_connection.lock().unwrap()),
            Err(Error::NotFound)
        );
    }

    #[tokio::test]
    async fn deleting_missing_store_returns_not_found() {
        let state = get_test_state();

        let response = delete_store_endpoint(State(state), Path(42))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
