//! Business model edit page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    business_model::{
        BusinessModel, ModelFormData, ModelId, ModelName, create::model_form_fields,
        get_business_model, update_business_model,
    },
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base},
    navigation::NavBar,
};

/// The state needed for editing a business model.
#[derive(Debug, Clone)]
pub struct EditModelState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditModelState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the business model edit page.
pub async fn get_edit_model_page(
    State(state): State<EditModelState>,
    Path(model_id): Path<ModelId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let model = get_business_model(model_id, &connection)?;

    Ok(edit_model_view(&model, "").into_response())
}

/// Handle business model edit form submission.
pub async fn update_model_endpoint(
    State(state): State<EditModelState>,
    Path(model_id): Path<ModelId>,
    Form(form): Form<ModelFormData>,
) -> Response {
    let name = match ModelName::new(&form.name) {
        Ok(name) => name,
        Err(error) => {
            let model = BusinessModel {
                id: model_id,
                name: ModelName::new_unchecked(&form.name),
                description: form.description,
                kind: form.kind,
            };
            return edit_model_view(&model, &format!("Error: {error}")).into_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let description = form.description.as_deref().filter(|s| !s.trim().is_empty());

    match update_business_model(model_id, name, description, form.kind, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::MODELS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => error.into_alert_response(),
    }
}

fn edit_model_view(model: &BusinessModel, error_message: &str) -> Markup {
    let nav_bar = NavBar::new(endpoints::MODELS_VIEW).into_html();
    let update_url = endpoints::format_endpoint(endpoints::PUT_MODEL, model.id);

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { "Edit Business Model" }

            form
                hx-put=(update_url)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                (model_form_fields(
                    model.name.as_ref(),
                    model.description.as_deref(),
                    model.kind,
                    error_message,
                ))

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save Changes" }
            }
        }
    };

    base("Edit Business Model", &[], &content)
}
