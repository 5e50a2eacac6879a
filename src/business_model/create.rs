//! Business model creation page and endpoint.

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

use crate::{
    AppState, Error, endpoints,
    business_model::{ModelFormData, ModelKind, ModelName, create_business_model},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
    },
    navigation::NavBar,
};

/// The state needed for creating a business model.
#[derive(Debug, Clone)]
pub struct CreateModelEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateModelEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the business model creation page.
pub async fn get_new_model_page() -> Response {
    new_model_view().into_response()
}

/// Handle business model creation form submission.
pub async fn create_model_endpoint(
    State(state): State<CreateModelEndpointState>,
    Form(new_model): Form<ModelFormData>,
) -> Response {
    let name = match ModelName::new(&new_model.name) {
        Ok(name) => name,
        Err(error) => {
            return new_model_form_view(&format!("Error: {error}")).into_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let description = new_model.description.as_deref().filter(|s| !s.trim().is_empty());

    match create_business_model(name, description, new_model.kind, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::MODELS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a business model: {error}");

            error.into_alert_response()
        }
    }
}

pub(super) fn model_form_fields(
    name: &str,
    description: Option<&str>,
    kind: ModelKind,
    error_message: &str,
) -> Markup {
    html! {
        div
        {
            label
                for="name"
                class=(FORM_LABEL_STYLE)
            {
                "Model Name"
            }

            input
                id="name"
                type="text"
                name="name"
                value=(name)
                placeholder="POD"
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
                value=[description]
                placeholder="Optional description"
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="kind"
                class=(FORM_LABEL_STYLE)
            {
                "Generates"
            }

            select
                name="kind"
                id="kind"
                class=(FORM_TEXT_INPUT_STYLE)
            {
                @for model_kind in ModelKind::ALL {
                    @if model_kind == kind {
                        option value=(model_kind.as_str()) selected { (model_kind.label()) }
                    } @else {
                        option value=(model_kind.as_str()) { (model_kind.label()) }
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

fn new_model_view() -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_MODEL_VIEW).into_html();
    let form = new_model_form_view("");

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("Create Business Model", &[], &content)
}

fn new_model_form_view(error_message: &str) -> Markup {
    html! {
        form
            hx-post=(endpoints::POST_MODEL)
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            (model_form_fields("", None, ModelKind::Both, error_message))

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Create Business Model" }
        }
    }
}


#[cfg(test)]
mod create_model_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode, response::IntoResponse};
    use axum_extra::extract::Form;
    use rusqlite::Connection;

    use crate::{
        business_model::{
            BusinessModel, ModelKind, ModelName, create::CreateModelEndpointState,
            create_business_model_table, create_model_endpoint, domain::ModelFormData,
            get_business_model,
        },
        endpoints,
        test_utils::{
            assert_form_error_message, assert_hx_redirect, must_get_form, parse_html_fragment,
        },
    };

    fn get_model_state() -> CreateModelEndpointState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        create_business_model_table(&connection).expect("Could not create business model table");

        CreateModelEndpointState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn can_create_model() {
        let state = get_model_state();
        let want = BusinessModel {
            id: 1,
            name: ModelName::new_unchecked("POD"),
            description: None,
            kind: ModelKind::Both,
        };
        let form = ModelFormData {
            name: "POD".to_string(),
            description: None,
            kind: ModelKind::Both,
        };

        let response = create_model_endpoint(State(state.clone()), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::MODELS_VIEW);
        assert_eq!(
            Ok(want),
            get_business_model(1, &state.db_connection.lock().unwrap())
        );
    }

    #[tokio::test]
    async fn blank_description_is_stored_as_null() {
        let state = get_model_state();
        let form = ModelFormData {
            name: "Digital".to_string(),
            description: Some("   ".to_string()),
            kind: ModelKind::Income,
        };

        create_model_endpoint(State(state.clone()), Form(form)).await;

        let model = get_business_model(1, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(model.description, None);
    }

    #[tokio::test]
    async fn create_model_fails_on_empty_name() {
        let state = get_model_state();
        let form = ModelFormData {
            name: "".to_string(),
            description: None,
            kind: ModelKind::Both,
        };

        let response = create_model_endpoint(State(state), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        let form = must_get_form(&html);
        assert_form_error_message(&form, "Error: Business model name cannot be empty");
    }
}
