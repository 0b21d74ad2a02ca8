//! Budget Tracker is a web app for recording incomes and categorized expenses
//! and seeing where the money went each month.
//!
//! This library provides a REST API that directly serves HTML pages. The
//! monthly aggregation lives in [cashflow] and does not depend on the web or
//! storage layers.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod auth;
pub mod cashflow;
pub mod category;
mod dashboard;
mod database_id;
mod db;
mod endpoints;
mod home;
mod html;
mod income;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod routing;
mod timezone;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use auth::{PasswordHash, User, UserID, Username, ValidatedPassword};
pub use cashflow::DataValidationError;
pub use db::initialize as initialize_db;
pub use income::Income;
pub use logging::logging_middleware;
pub use routing::build_router;
pub use transaction::Transaction;

use crate::{alert::Alert, internal_server_error::InternalServerError, not_found::NotFound};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
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
    /// The user provided an invalid combination of username and password.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// The auth token cookie is missing from the cookie jar in the request.
    #[error("no auth token in the cookie jar")]
    CookieMissing,

    /// The auth token cookie could not be decoded.
    #[error("invalid auth token: {0}")]
    InvalidToken(String),

    /// The auth token has passed its expiry date time.
    #[error("the auth token has expired")]
    TokenExpired,

    /// The expiry of the auth token could not be computed.
    #[error("could not compute the auth token expiry")]
    InvalidExpiry,

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// An empty string was used as a username.
    #[error("Username cannot be empty")]
    EmptyUsername,

    /// The username is already taken by another user.
    #[error("the username \"{0}\" is already taken")]
    DuplicateUsername(String),

    /// A stored or submitted record failed validation.
    #[error(transparent)]
    DataValidation(#[from] DataValidationError),

    /// A submitted amount was negative.
    #[error("amount must not be negative, got {0}")]
    NegativeAmount(rust_decimal::Decimal),

    /// A submitted amount was larger than [cashflow::MAX_AMOUNT].
    #[error("amount must not be more than {max}, got {0}", max = cashflow::MAX_AMOUNT)]
    AmountTooLarge(rust_decimal::Decimal),

    /// A period string was not in the form "YYYY-MM" or named an invalid month.
    #[error("\"{0}\" is not a valid period, expected a year and month such as 2026-01")]
    InvalidPeriod(String),

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

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// Tried to delete an income that does not exist
    #[error("tried to delete an income that is not in the database")]
    DeleteMissingIncome,

    /// Tried to update an income that does not exist
    #[error("tried to update an income that is not in the database")]
    UpdateMissingIncome,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    && desc.ends_with("user.username") =>
            {
                Error::DuplicateUsername(String::new())
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            // Row mappers box validation errors so they survive the trip through rusqlite.
            rusqlite::Error::FromSqlConversionFailure(index, column_type, source) => {
                match source.downcast::<DataValidationError>() {
                    Ok(validation_error) => Error::DataValidation(*validation_error),
                    Err(source) => {
                        let error =
                            rusqlite::Error::FromSqlConversionFailure(index, column_type, source);
                        tracing::error!("an unhandled SQL error occurred: {}", error);
                        Error::SqlError(error)
                    }
                }
            }
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
            Error::NotFound => NotFound.into_response(),
            Error::InvalidPeriod(period) => InternalServerError {
                status: StatusCode::BAD_REQUEST,
                header: "400",
                description: "Invalid Period",
                fix: &format!(
                    "\"{period}\" is not a valid period. Periods are written as a year and \
                    month, for example 2026-01."
                ),
                link: None,
            }
            .into_response(),
            Error::DataValidation(error) => {
                tracing::error!("Stored data failed validation: {error}");
                let edit_url = error.record().map(|record| record.edit_url());
                InternalServerError {
                    description: "Invalid Data",
                    fix: &format!(
                        "The monthly summary could not be calculated because {error}. \
                        Edit or delete the record and try again."
                    ),
                    link: edit_url.as_deref().map(|edit_url| ("Edit Record", edit_url)),
                    ..Default::default()
                }
                .into_response()
            }
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
                ..Default::default()
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Render the error as an alert fragment for HTMX requests.
    fn into_alert_response(self) -> Response {
        match self {
            Error::InvalidTimezoneError(timezone) => Alert::Error {
                message: "Invalid Timezone Settings".to_owned(),
                details: format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response_with_status(StatusCode::INTERNAL_SERVER_ERROR),
            Error::DataValidation(error) => Alert::Error {
                message: "Invalid data".to_owned(),
                details: capitalize(&error.to_string()),
            }
            .into_response_with_status(StatusCode::BAD_REQUEST),
            Error::NegativeAmount(amount) => Alert::Error {
                message: "Invalid amount".to_owned(),
                details: format!("Amounts cannot be negative, got {amount}."),
            }
            .into_response_with_status(StatusCode::BAD_REQUEST),
            Error::AmountTooLarge(amount) => Alert::Error {
                message: "Invalid amount".to_owned(),
                details: format!(
                    "Amounts cannot be more than {}, got {amount}.",
                    cashflow::MAX_AMOUNT
                ),
            }
            .into_response_with_status(StatusCode::BAD_REQUEST),
            Error::UpdateMissingTransaction => Alert::Error {
                message: "Could not update transaction".to_owned(),
                details: "The transaction could not be found.".to_owned(),
            }
            .into_response_with_status(StatusCode::NOT_FOUND),
            Error::DeleteMissingTransaction => Alert::Error {
                message: "Could not delete transaction".to_owned(),
                details: "The transaction could not be found. \
                    Try refreshing the page to see if the transaction has already been deleted."
                    .to_owned(),
            }
            .into_response_with_status(StatusCode::NOT_FOUND),
            Error::UpdateMissingIncome => Alert::Error {
                message: "Could not update income".to_owned(),
                details: "The income could not be found.".to_owned(),
            }
            .into_response_with_status(StatusCode::NOT_FOUND),
            Error::DeleteMissingIncome => Alert::Error {
                message: "Could not delete income".to_owned(),
                details: "The income could not be found. \
                    Try refreshing the page to see if the income has already been deleted."
                    .to_owned(),
            }
            .into_response_with_status(StatusCode::NOT_FOUND),
            error => {
                tracing::error!("An unexpected error occurred: {error}");
                Alert::Error {
                    message: "Something went wrong".to_owned(),
                    details: "An unexpected error occurred, check the server logs for more details."
                        .to_owned(),
                }
                .into_response_with_status(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();

    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
