//! Stores listing page.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    html::{
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, edit_delete_action_links,
    },
    navigation::NavBar,
    store::{Store, get_all_stores},
};

/// The state needed for the stores listing page.
#[derive(Debug, Clone)]
pub struct StoresPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for StoresPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the stores listing page.
pub async fn get_stores_page(State(state): State<StoresPageState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let stores = get_all_stores(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve stores: {error}"))?;

    Ok(stores_view(&stores).into_response())
}

fn stores_view(stores: &[Store]) -> Markup {
    let nav_bar = NavBar::new(endpoints::STORES_VIEW).into_html();

    let table_row = |store: &Store| {
        let edit_url = endpoints::format_endpoint(endpoints::EDIT_STORE_VIEW, store.id);
        let delete_url = endpoints::format_endpoint(endpoints::DELETE_STORE, store.id);
        let confirm_message = format!(
            "Are you sure you want to delete '{}'? Transactions recorded against it keep \
            no store association.",
            store.name
        );

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE)
                {
                    span class="font-medium text-gray-900 dark:text-white" { (store.name) }
                }

                td class=(TABLE_CELL_STYLE) { (store.platform) }

                td class=(TABLE_CELL_STYLE) { (store.currency.code()) }

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
            section class="space-y-4"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Stores" }

                    a href=(endpoints::NEW_STORE_VIEW) class=(LINK_STYLE)
                    {
                        "Create Store"
                    }
                }

                section class="dark:bg-gray-800 lg:max-w-5xl lg:w-full lg:mx-auto"
                {
                    table class="w-full text-sm text-left rtl:text-right
                        text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Platform" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Currency" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for store in stores {
                                (table_row(store))
                            }

                            @if stores.is_empty() {
                                tr
                                {
                                    td
                                        colspan="4"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        "No stores created yet. "
                                        a href=(endpoints::NEW_STORE_VIEW) class=(LINK_STYLE)
                                        {
                                            "Create your first store"
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

    base("Stores", &[], &content)
}

#[cfg(test)]
mod stores_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use rusqlite::Connection;

    use crate::{
        currency::Currency,
        store::{StoreName, create_store, create_store_table},
        test_utils::{assert_valid_html, parse_html_document},
    };

    use super::{StoresPageState, get_stores_page};

    fn get_test_state() -> StoresPageState {
        let connection = Connection::open_in_memory().unwrap();
        create_store_table(&connection).expect("Could not create store table");

        StoresPageState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn lists_stores() {
        let state = get_test_state();
        {
            let connection = state.db_connection.lock().unwrap();
            create_store(
                StoreName::new_unchecked("Cozy Prints"),
                "Etsy",
                Currency::Usd,
                &connection,
            )
            .unwrap();
        }

        let response = get_stores_page(State(state)).await.unwrap();

        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert!(html.html().contains("Cozy Prints"));
        assert!(html.html().contains("Etsy"));
    }
}
