//! Product idea edit page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    Error, endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base},
    idea::{
        Idea, IdeaId,
        create::{IdeaFormData, IdeaFormState, IdeaFormValues, idea_form_fields},
        get_idea, update_idea,
    },
    navigation::NavBar,
    store::{Store, get_all_stores},
};

/// Render the idea edit page.
pub async fn get_edit_idea_page(
    State(state): State<IdeaFormState>,
    Path(idea_id): Path<IdeaId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let idea = get_idea(idea_id, &connection)?;
    let stores = get_all_stores(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve stores: {error}"))?;

    Ok(edit_idea_view(&idea, &stores, "").into_response())
}

/// Handle idea edit form submission.
pub async fn update_idea_endpoint(
    State(state): State<IdeaFormState>,
    Path(idea_id): Path<IdeaId>,
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
            let idea = match get_idea(idea_id, &connection) {
                Ok(idea) => idea,
                Err(error) => return error.into_alert_response(),
            };
            let stores = get_all_stores(&connection).unwrap_or_default();
            return edit_idea_view(&idea, &stores, &format!("Error: {error}")).into_response();
        }
    };

    match update_idea(idea_id, draft, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::IDEAS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => error.into_alert_response(),
    }
}

fn edit_idea_view(idea: &Idea, stores: &[Store], error_message: &str) -> Markup {
    let nav_bar = NavBar::new(endpoints::IDEAS_VIEW).into_html();
    let update_url = endpoints::format_endpoint(endpoints::PUT_IDEA, idea.id);

    let values = IdeaFormValues {
        store_id: Some(idea.store_id),
        title: &idea.title,
        description: idea.description.as_deref(),
        expectation_score: idea.expectation_score.get() as i64,
        status: idea.status,
    };

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { "Edit Idea" }

            form
                hx-put=(update_url)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                (idea_form_fields(&values, stores, error_message))

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save Changes" }
            }
        }
    };

    base("Edit Idea", &[], &content)
}
