//! Store creation page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    currency::Currency,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
        currency_select,
    },
    navigation::NavBar,
    store::{StoreFormData, StoreName, create_store},
};

/// The state needed for creating a store.
#[derive(Debug, Clone)]
pub struct CreateStoreEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateStoreEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the store creation page.
pub async fn get_new_store_page() -> Response {
    new_store_view().into_response()
}

/// Handle store creation form submission.
pub async fn create_store_endpoint(
    State(state): State<CreateStoreEndpointState>,
    Form(new_store): Form<StoreFormData>,
) -> Response {
    let name = match StoreName::new(&new_store.name) {
        Ok(name) => name,
        Err(error) => {
            return new_store_form_view(&format!("Error: {error}")).into_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_store(name, &new_store.platform, new_store.currency, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::STORES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a store: {error}");

            error.into_alert_response()
        }
    }
}

pub(super) fn store_form_fields(
    name: &str,
    platform: &str,
    currency: Currency,
    error_message: &str,
) -> Markup {
    html! {
        div
        {
            label
                for="name"
                class=(FORM_LABEL_STYLE)
            {
                "Store Name"
            }

            input
                id="name"
                type="text"
                name="name"
                value=(name)
                placeholder="Store Name"
                required
                autofocus
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="platform"
                class=(FORM_LABEL_STYLE)
            {
                "Platform"
            }

            input
                id="platform"
                type="text"
                name="platform"
                value=(platform)
                placeholder="Etsy"
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        (currency_select(currency))

        @if !error_message.is_empty() {
            p class="text-red-600 dark:text-red-400"
            {
                (error_message)
            }
        }
    }
}

fn new_store_view() -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_STORE_VIEW).into_html();
    let form = new_store_form_view("");

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("Create Store", &[], &content)
}

fn new_store_form_view(error_message: &str) -> Markup {
    html! {
        form
            hx-post=(endpoints::POST_STORE)
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            (store_form_fields("", "", Currency::Usd, error_message))

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Create Store" }
        }
    }
}
