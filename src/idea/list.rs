//! Product ideas listing page.

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
    idea::{IdeaListRow, get_ideas_with_store_names},
    navigation::NavBar,
};

/// The state needed for the ideas listing page.
#[derive(Debug, Clone)]
pub struct IdeasPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for IdeasPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the ideas listing page, highest expectation score first.
pub async fn get_ideas_page(State(state): State<IdeasPageState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let ideas = get_ideas_with_store_names(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve ideas: {error}"))?;

    Ok(ideas_view(&ideas).into_response())
}

fn ideas_view(ideas: &[IdeaListRow]) -> Markup {
    let nav_bar = NavBar::new(endpoints::IDEAS_VIEW).into_html();

    let table_row = |row: &IdeaListRow| {
        let edit_url = endpoints::format_endpoint(endpoints::EDIT_IDEA_VIEW, row.idea.id);
        let delete_url = endpoints::format_endpoint(endpoints::DELETE_IDEA, row.idea.id);
        let confirm_message = format!("Are you sure you want to delete '{}'?", row.idea.title);

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE)
                {
                    span class="font-medium text-gray-900 dark:text-white" { (row.idea.title) }

                    @if let Some(description) = &row.idea.description {
                        p class="text-xs text-gray-500 dark:text-gray-400 truncate max-w-[240px]"
                        {
                            (description)
                        }
                    }
                }

                td class=(TABLE_CELL_STYLE) { (row.store_name) }

                td class=(TABLE_CELL_STYLE)
                {
                    span class=(row.idea.expectation_score.badge_class())
                    {
                        (row.idea.expectation_score) "/10"
                    }
                }

                td class=(TABLE_CELL_STYLE)
                {
                    span class=(row.idea.status.badge_class()) { (row.idea.status.label()) }
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
            section class="space-y-4 lg:max-w-5xl lg:w-full lg:mx-auto"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Ideas" }

                    a href=(endpoints::NEW_IDEA_VIEW) class=(LINK_STYLE)
                    {
                        "Create Idea"
                    }
                }

                section class="dark:bg-gray-800"
                {
                    table class="w-full text-sm text-left rtl:text-right
                        text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Idea" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Store" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Score" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Status" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for row in ideas {
                                (table_row(row))
                            }

                            @if ideas.is_empty() {
                                tr
                                {
                                    td
                                        colspan="5"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        "No ideas recorded yet. "
                                        a href=(endpoints::NEW_IDEA_VIEW) class=(LINK_STYLE)
                                        {
                                            "Capture your first idea"
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

    base("Ideas", &[], &content)
}

#[cfg(test)]
mod ideas_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use rusqlite::Connection;

    use crate::{
        db::initialize,
        idea::{
            create_idea,
            db::test_helpers::{idea_draft, insert_test_store},
        },
        test_utils::{assert_valid_html, parse_html_document},
    };

    use super::{IdeasPageState, get_ideas_page};

    #[tokio::test]
    async fn lists_ideas_with_scores() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let store = insert_test_store(&connection);
        create_idea(idea_draft(store.id, "Clay earrings", 8), &connection).unwrap();
        let state = IdeasPageState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_ideas_page(State(state)).await.unwrap();

        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let text = html.html();
        assert!(text.contains("Clay earrings"));
        assert!(text.contains("Cozy Prints"));
        assert!(text.contains("8"));
    }
}
