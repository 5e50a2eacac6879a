//! Shopledger is a self-hosted bookkeeping dashboard for e-commerce sellers.
//!
//! It records income and expense transactions across stores and business
//! models, auto-posts recurring expenses once per month, and keeps a list of
//! product ideas ranked by expectation score. The whole UI sits behind a
//! 4-digit access code.
//!
//! This library provides a REST API that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use time::Date;
use tokio::signal;

mod alert;
mod app_state;
mod auth;
mod business_model;
mod category;
mod currency;
mod dashboard;
mod db;
mod endpoints;
mod html;
mod idea;
mod internal_server_error;
mod navigation;
mod not_found;
mod recurring;
mod routing;
mod shared_templates;
mod store;
mod timezone;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use auth::AccessPin;
pub use db::initialize as initialize_db;
pub use routing::build_router;

use crate::{
    alert::AlertTemplate,
    internal_server_error::{InternalServerErrorPageTemplate, render_internal_server_error},
    not_found::get_404_not_found_response,
    shared_templates::render,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The access code entered at the gate did not match the configured one,
    /// or the configured code is not four digits.
    #[error("invalid access code")]
    InvalidPin,

    /// The session cookie is missing from the cookie jar in the request.
    #[error("no session cookie in the cookie jar")]
    CookieMissing,

    /// There was an error parsing the date in the session cookie or creating
    /// the new expiry date time.
    ///
    /// Callers should pass in the original error as a string and the date
    /// string that caused the error.
    #[error("could not format expiry cookie date-time string \"{1}\": {0}")]
    InvalidDateFormat(String, String),

    /// An empty string was used for a category name.
    #[error("Category name cannot be empty")]
    EmptyCategoryName,

    /// An empty string was used for a store name.
    #[error("Store name cannot be empty")]
    EmptyStoreName,

    /// An empty string was used for a business model name.
    #[error("Business model name cannot be empty")]
    EmptyModelName,

    /// An empty string was used for a product idea title.
    #[error("Idea title cannot be empty")]
    EmptyIdeaTitle,

    /// An empty string was used for a recurring expense name.
    #[error("Recurring expense name cannot be empty")]
    EmptyRecurringName,

    /// A recurring expense was given a charge day outside 1-31.
    #[error("{0} is not a valid day of the month")]
    InvalidDayOfMonth(u8),

    /// A product idea was given an expectation score outside 1-10.
    #[error("{0} is not a valid expectation score, must be between 1 and 10")]
    InvalidScore(i64),

    /// A string could not be parsed as one of the supported currency codes.
    #[error("{0} is not a supported currency code")]
    InvalidCurrency(String),

    /// A date in the future was used to create a transaction.
    ///
    /// Transactions record events that have already happened, therefore future
    /// dates are not allowed.
    #[error("{0} is a date in the future, which is not allowed")]
    FutureDate(Date),

    /// A store or business model ID on a record did not refer to a real row.
    #[error("a referenced store or business model does not exist")]
    InvalidForeignKey,

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// Tried to update a store that does not exist
    #[error("tried to update a store that is not in the database")]
    UpdateMissingStore,

    /// Tried to delete a store that does not exist
    #[error("tried to delete a store that is not in the database")]
    DeleteMissingStore,

    /// Tried to update a business model that does not exist
    #[error("tried to update a business model that is not in the database")]
    UpdateMissingModel,

    /// Tried to delete a business model that does not exist
    #[error("tried to delete a business model that is not in the database")]
    DeleteMissingModel,

    /// Tried to update a category that does not exist
    #[error("tried to update a category that is not in the database")]
    UpdateMissingCategory,

    /// Tried to delete a category that does not exist
    #[error("tried to delete a category that is not in the database")]
    DeleteMissingCategory,

    /// Tried to update a recurring expense that does not exist
    #[error("tried to update a recurring expense that is not in the database")]
    UpdateMissingRecurringExpense,

    /// Tried to delete a recurring expense that does not exist
    #[error("tried to delete a recurring expense that is not in the database")]
    DeleteMissingRecurringExpense,

    /// Tried to update a product idea that does not exist
    #[error("tried to update a product idea that is not in the database")]
    UpdateMissingIdea,

    /// Tried to delete a product idea that does not exist
    #[error("tried to delete a product idea that is not in the database")]
    DeleteMissingIdea,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 787 occurs when a FOREIGN KEY constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(_))
                if sql_error.extended_code == 787 =>
            {
                Error::InvalidForeignKey
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidTimezoneError(timezone) => {
                render_internal_server_error(InternalServerErrorPageTemplate {
                    description: "Invalid Timezone Settings",
                    fix: &format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                    ),
                })
            }
            Error::DatabaseLockError => render_internal_server_error(Default::default()),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                render_internal_server_error(Default::default())
            }
        }
    }
}

impl Error {
    fn into_alert_response(self) -> Response {
        match self {
            Error::InvalidTimezoneError(timezone) => render(
                StatusCode::INTERNAL_SERVER_ERROR,
                AlertTemplate::error(
                    "Invalid Timezone Settings",
                    &format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                    ),
                ),
            ),
            Error::FutureDate(date) => render(
                StatusCode::BAD_REQUEST,
                AlertTemplate::error(
                    "Invalid transaction date",
                    &format!(
                        "{date} is a date in the future, which is not allowed. Change the date to \
                        today or earlier."
                    ),
                ),
            ),
            Error::InvalidForeignKey => render(
                StatusCode::BAD_REQUEST,
                AlertTemplate::error(
                    "Invalid store or business model",
                    "The selected store or business model could not be found. \
                    Try refreshing the page and submitting the form again.",
                ),
            ),
            Error::DeleteMissingTransaction => render(
                StatusCode::NOT_FOUND,
                AlertTemplate::error(
                    "Could not delete transaction",
                    "The transaction could not be found. \
                    Try refreshing the page to see if the transaction has already been deleted.",
                ),
            ),
            Error::UpdateMissingStore => render(
                StatusCode::NOT_FOUND,
                AlertTemplate::error("Could not update store", "The store could not be found."),
            ),
            Error::DeleteMissingStore => render(
                StatusCode::NOT_FOUND,
                AlertTemplate::error(
                    "Could not delete store",
                    "The store could not be found. \
                    Try refreshing the page to see if the store has already been deleted.",
                ),
            ),
            Error::UpdateMissingModel => render(
                StatusCode::NOT_FOUND,
                AlertTemplate::error(
                    "Could not update business model",
                    "The business model could not be found.",
                ),
            ),
            Error::DeleteMissingModel => render(
                StatusCode::NOT_FOUND,
                AlertTemplate::error(
                    "Could not delete business model",
                    "The business model could not be found. \
                    Try refreshing the page to see if it has already been deleted.",
                ),
            ),
            Error::UpdateMissingCategory => render(
                StatusCode::NOT_FOUND,
                AlertTemplate::error(
                    "Could not update category",
                    "The category could not be found.",
                ),
            ),
            Error::DeleteMissingCategory => render(
                StatusCode::NOT_FOUND,
                AlertTemplate::error(
                    "Could not delete category",
                    "The category could not be found. \
                    Try refreshing the page to see if the category has already been deleted.",
                ),
            ),
            Error::UpdateMissingRecurringExpense => render(
                StatusCode::NOT_FOUND,
                AlertTemplate::error(
                    "Could not update recurring expense",
                    "The recurring expense could not be found.",
                ),
            ),
            Error::DeleteMissingRecurringExpense => render(
                StatusCode::NOT_FOUND,
                AlertTemplate::error(
                    "Could not delete recurring expense",
                    "The recurring expense could not be found. \
                    Try refreshing the page to see if it has already been deleted.",
                ),
            ),
            Error::UpdateMissingIdea => render(
                StatusCode::NOT_FOUND,
                AlertTemplate::error("Could not update idea", "The idea could not be found."),
            ),
            Error::DeleteMissingIdea => render(
                StatusCode::NOT_FOUND,
                AlertTemplate::error(
                    "Could not delete idea",
                    "The idea could not be found. \
                    Try refreshing the page to see if the idea has already been deleted.",
                ),
            ),
            _ => render(
                StatusCode::INTERNAL_SERVER_ERROR,
                AlertTemplate::error(
                    "Something went wrong",
                    "An unexpected error occurred, check the server logs for more details.",
                ),
            ),
        }
    }
}
