//! Product idea delete endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{AppState, Error, idea::{IdeaId, delete_idea}};

/// The state needed for deleting an idea.
#[derive(Debug, Clone)]
pub struct DeleteIdeaState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteIdeaState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Delete an idea. Returns an empty OK response so htmx removes the row.
pub async fn delete_idea_endpoint(
    State(state): State<DeleteIdeaState>,
    Path(idea_id): Path<IdeaId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_idea(idea_id, &connection) {
        Ok(()) => StatusCode::OK.into_response(),
        Err(error) => error.into_alert_response(),
    }
}

#[cfg(test)]
mod delete_idea_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use rusqlite::Connection;

    use crate::{
        Error,
        db::initialize,
        idea::{
            create_idea,
            db::test_helpers::{idea_draft, insert_test_store},
            get_idea,
        },
    };

    use super::{DeleteIdeaState, delete_idea_endpoint};

    #[tokio::test]
    async fn deletes_idea() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let store = insert_test_store(&connection);
        let idea = create_idea(idea_draft(store.id, "Clay earrings", 8), &connection).unwrap();
        let state = DeleteIdeaState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = delete_idea_endpoint(State(state.clone()), Path(idea.id))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            get_idea(idea.id, &state.db_connection.lock().unwrap()),
            Err(Error::NotFound)
        );
    }

    #[tokio::test]
    async fn deleting_missing_idea_returns_not_found() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let state = DeleteIdeaState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = delete_idea_endpoint(State(state), Path(42))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
