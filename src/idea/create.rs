//! Product idea creation page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error, endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
    },
    idea::{ExpectationScore, IdeaDraft, IdeaStatus, create_idea},
    navigation::NavBar,
    store::{Store, StoreId, get_all_stores},
};

/// The state needed for the idea form pages.
#[derive(Debug, Clone)]
pub struct IdeaFormState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for IdeaFormState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for creating or editing a product idea.
#[derive(Debug, Deserialize)]
pub struct IdeaFormData {
    pub store_id: StoreId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub expectation_score: i64,
    pub status: IdeaStatus,
}

impl IdeaFormData {
    /// Validate the form into a draft.
    pub(super) fn into_draft(self) -> Result<IdeaDraft, Error> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(Error::EmptyIdeaTitle);
        }

        let expectation_score = ExpectationScore::new(self.expectation_score)?;

        let description = self
            .description
            .as_deref()
            .map(str::trim)
            .filter(|description| !description.is_empty())
            .map(str::to_string);

        Ok(IdeaDraft {
            store_id: self.store_id,
            title: title.to_string(),
            description,
            expectation_score,
            status: self.status,
        })
    }
}

/// Render the idea creation page.
pub async fn get_new_idea_page(State(state): State<IdeaFormState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let stores = get_all_stores(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve stores: {error}"))?;

    Ok(new_idea_view(&stores, "").into_response())
}

/// Handle idea creation form submission.
pub async fn create_idea_endpoint(
    State(state): State<IdeaFormState>,
    Form(form): Form<IdeaFormData>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let draft = match form.into_draft() {
        Ok(draft) => draft,
        Err(error) => {
            let stores = get_all_stores(&connection).unwrap_or_default();
            return new_idea_view(&stores, &format!("Error: {error}")).into_response();
        }
    };

    match create_idea(draft, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::IDEAS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating an idea: {error}");

            error.into_alert_response()
        }
    }
}

/// The values the shared form fields are rendered with.
pub(super) struct IdeaFormValues<'a> {
    pub store_id: Option<StoreId>,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub expectation_score: i64,
    pub status: IdeaStatus,
}

impl Default for IdeaFormValues<'_> {
    fn default() -> Self {
        Self {
            store_id: None,
            title: "",
            description: None,
            expectation_score: 5,
            status: IdeaStatus::Idea,
        }
    }
}

pub(super) fn idea_form_fields(
    values: &IdeaFormValues<'_>,
    stores: &[Store],
    error_message: &str,
) -> Markup {
    html! {
        div
        {
            label
                for="store_id"
                class=(FORM_LABEL_STYLE)
            {
                "Store"
            }

            select
                name="store_id"
                id="store_id"
                required
                class=(FORM_TEXT_INPUT_STYLE)
            {
                @if values.store_id.is_none() {
                    option value="" { "Select a store" }
                }

                @for store in stores {
                    @if Some(store.id) == values.store_id {
                        option value=(store.id) selected { (store.name) }
                    } @else {
                        option value=(store.id) { (store.name) }
                    }
                }
            }
        }

        div
        {
            label
                for="title"
                class=(FORM_LABEL_STYLE)
            {
                "Title"
            }

            input
                id="title"
                type="text"
                name="title"
                value=(values.title)
                placeholder="Idea title"
                required
                autofocus
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="description"
                class=(FORM_LABEL_STYLE)
            {
                "Description"
            }

            input
                id="description"
                type="text"
                name="description"
                value=[values.description]
                placeholder="Optional description"
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="expectation_score"
                class=(FORM_LABEL_STYLE)
            {
                "Expectation Score (1-10)"
            }

            input
                name="expectation_score"
                id="expectation_score"
                type="number"
                min="1"
                max="10"
                value=(values.expectation_score)
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="status"
                class=(FORM_LABEL_STYLE)
            {
                "Status"
            }

            select
                name="status"
                id="status"
                class=(FORM_TEXT_INPUT_STYLE)
            {
                @for status in IdeaStatus::ALL {
                    @if status == values.status {
                        option value=(status.as_str()) selected { (status.label()) }
                    } @else {
                        option value=(status.as_str()) { (status.label()) }
                    }
                }
            }
        }

        @if !error_message.is_empty() {
            p class="text-red-600 dark:text-red-400"
            {
                (error_message)
            }
        }
    }
}

fn new_idea_view(stores: &[Store], error_message: &str) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_IDEA_VIEW).into_html();

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { "New Idea" }

            form
                hx-post=(endpoints::POST_IDEA)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                (idea_form_fields(&Default::default(), stores, error_message))

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Create Idea" }
            }
        }
    };

    base("New Idea", &[], &content)
}

#[cfg(test)]
mod new_idea_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use rusqlite::Connection;

    use crate::{
        db::initialize,
        endpoints,
        test_utils::{
            assert_form_input, assert_form_select, assert_form_submit_button, assert_hx_endpoint,
            assert_valid_html, must_get_form, parse_html_document,
        },
    };

    use super::{IdeaFormState, get_new_idea_page};

    #[tokio::test]
    async fn render_page() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let state = IdeaFormState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_new_idea_page(State(state)).await.unwrap();

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::POST_IDEA, "hx-post");
        assert_form_select(&form, "store_id");
        assert_form_input(&form, "title", "text");
        assert_form_input(&form, "expectation_score", "number");
        assert_form_select(&form, "status");
        assert_form_submit_button(&form);
    }
}
