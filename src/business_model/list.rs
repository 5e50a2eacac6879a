//! Business models listing page.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    business_model::{BusinessModel, get_all_business_models},
    html::{
        BADGE_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE,
        TABLE_ROW_STYLE, base, edit_delete_action_links,
    },
    navigation::NavBar,
};

/// The state needed for the business models listing page.
#[derive(Debug, Clone)]
pub struct ModelsPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ModelsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the business models listing page.
pub async fn get_models_page(State(state): State<ModelsPageState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let models = get_all_business_models(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve business models: {error}"))?;

    Ok(models_view(&models).into_response())
}

fn models_view(models: &[BusinessModel]) -> Markup {
    let nav_bar = NavBar::new(endpoints::MODELS_VIEW).into_html();

    let table_row = |model: &BusinessModel| {
        let edit_url = endpoints::format_endpoint(endpoints::EDIT_MODEL_VIEW, model.id);
        let delete_url = endpoints::format_endpoint(endpoints::DELETE_MODEL, model.id);
        let confirm_message = format!("Are you sure you want to delete '{}'?", model.name);

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE)
                {
                    span class="font-medium text-gray-900 dark:text-white" { (model.name) }
                }

                td class=(TABLE_CELL_STYLE)
                {
                    (model.description.as_deref().unwrap_or("-"))
                }

                td class=(TABLE_CELL_STYLE)
                {
                    span class=(BADGE_STYLE) { (model.kind.label()) }
                }

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
                    h1 class="text-xl font-bold" { "Business Models" }

                    a href=(endpoints::NEW_MODEL_VIEW) class=(LINK_STYLE)
                    {
                        "Create Business Model"
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
                                th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Generates" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for model in models {
                                (table_row(model))
                            }

                            @if models.is_empty() {
                                tr
                                {
                                    td
                                        colspan="4"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        "No business models created yet. "
                                        a href=(endpoints::NEW_MODEL_VIEW) class=(LINK_STYLE)
                                        {
                                            "Create your first business model"
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

    base("Business Models", &[], &content)
}

#[cfg(test)]
mod models_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use rusqlite::Connection;

    use crate::{
        business_model::{ModelKind, ModelName, create_business_model, create_business_model_table},
        test_utils::{assert_valid_html, parse_html_document},
    };

    use super::{ModelsPageState, get_models_page};

    #[tokio::test]
    async fn lists_models() {
        let connection = Connection::open_in_memory().unwrap();
        create_business_model_table(&connection).expect("Could not create business model table");
        create_business_model(
            ModelName::new_unchecked("POD"),
            Some("Print on demand"),
            ModelKind::Both,
            &connection,
        )
        .unwrap();
        let state = ModelsPageState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_models_page(State(state)).await.unwrap();

        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert!(html.html().contains("POD"));
        assert!(html.html().contains("Print on demand"));
    }
}
