//! Store edit page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base},
    navigation::NavBar,
    store::{
        Store, StoreFormData, StoreId, StoreName, create::store_form_fields, get_store,
        update_store,
    },
};

/// The state needed for editing a store.
#[derive(Debug, Clone)]
pub struct EditStoreState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditStoreState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the store edit page.
pub async fn get_edit_store_page(
    State(state): State<EditStoreState>,
    Path(store_id): Path<StoreId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let store = get_store(store_id, &connection)?;

    Ok(edit_store_view(&store, "").into_response())
}

/// Handle store edit form submission.
pub async fn update_store_endpoint(
    State(state): State<EditStoreState>,
    Path(store_id): Path<StoreId>,
    Form(form): Form<StoreFormData>,
) -> Response {
    let name = match StoreName::new(&form.name) {
        Ok(name) => name,
        Err(error) => {
            let store = Store {
                id: store_id,
                name: StoreName::new_unchecked(&form.name),
                platform: form.platform,
                currency: form.currency,
            };
            return edit_store_view(&store, &format!("Error: {error}")).into_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_store(store_id, name, &form.platform, form.currency, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::STORES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => error.into_alert_response(),
    }
}

fn edit_store_view(store: &Store, error_message: &str) -> Markup {
    let nav_bar = NavBar::new(endpoints::STORES_VIEW).into_html();
    let update_url = endpoints::format_endpoint(endpoints::PUT_STORE, store.id);

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { "Edit Store" }

            form
                hx-put=(update_url)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                (store_form_fields(
                    store.name.as_ref(),
                    &store.platform,
                    store.currency,
                    error_message,
                ))

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save Changes" }
            }
        }
    };

    base("Edit Store", &[], &content)
}

#[cfg(test)]
mod edit_store_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Form,
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use rusqlite::Connection;

    use crate::{
        Error,
        currency::Currency,
        endpoints,
        store::{
            StoreName, create_store, create_store_table, domain::StoreFormData, get_store,
        },
        test_utils::{assert_hx_redirect, assert_valid_html, must_get_form, parse_html_document},
    };

    use super::{EditStoreState, get_edit_store_page, update_store_endpoint};

    fn get_test_state() -> (EditStoreState, crate::store::Store) {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        create_store_table(&connection).expect("Could not create store table");
        let store = create_store(
            StoreName::new_unchecked("Cozy Prints"),
            "Etsy",
            Currency::Usd,
            &connection,
        )
        .expect("Could not create test store");

        (
            EditStoreState {
                db_connection: Arc::new(Mutex::new(connection)),
            },
            store,
        )
    }

    #[tokio::test]
    async fn edit_page_shows_current_values() {
        let (state, store) = get_test_state();

        let response = get_edit_store_page(State(state), Path(store.id)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert!(form.html().contains("Cozy Prints"));
    }

    #[tokio::test]
    async fn edit_page_returns_not_found_for_missing_store() {
        let (state, store) = get_test_state();

        let result = get_edit_store_page(State(state), Path(store.id + 42)).await;

        assert_eq!(result.unwrap_err(), Error::NotFound);
    }

    #[tokio::test]
    async fn update_changes_all_fields() {
        let (state, store) = get_test_state();
        let form = StoreFormData {
            name: "Atelier TR".to_string(),
            platform: "Shopify".to_string(),
            currency: Currency::Try,
        };

        let response = update_store_endpoint(State(state.clone()), Path(store.id), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::STORES_VIEW);

        let connection = state.db_connection.lock().unwrap();
        let updated = get_store(store.id, &connection).unwrap();
        assert_eq!(updated.name, StoreName::new_unchecked("Atelier TR"));
        assert_eq!(updated.platform, "Shopify");
        assert_eq!(updated.currency, Currency::Try);
    }
}
