//! Ledgerbook is a personal ledger of income and expense transactions.
//!
//! This library provides a JSON API over a SQLite-backed transaction store,
//! along with CSV import and export.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde::Serialize;
use tokio::signal;

mod app_state;
mod category;
mod csv_io;
mod database_id;
mod db;
pub mod endpoints;
mod ledger;
mod logging;
mod routing;
pub mod stores;
mod summary;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::{AppState, SQLiteLedger};
pub use category::{
    Category, EXPENSE_CATEGORIES, FALLBACK_EXPENSE_CATEGORY, UnknownCategory, expense_category_names,
};
pub use csv_io::{CSV_HEADER, ImportSummary, export_csv, import_csv};
pub use database_id::{DatabaseId, TransactionId};
pub use db::initialize as initialize_db;
pub use ledger::{
    Field, Ledger, TransactionFilterParams, TransactionInput, ValidationError, parse_iso_date,
};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use transaction::{NewTransaction, Transaction, TransactionType, UnknownTransactionType};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("Could not install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(error) => {
                tracing::error!("Could not install terminate signal handler: {error}");
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
    /// The caller's input was incomplete or invalid and nothing was stored.
    #[error("invalid transaction: {0}")]
    Validation(#[from] ValidationError),

    /// The store rejected a write because a CHECK or NOT NULL constraint
    /// failed.
    ///
    /// Input that went through [Ledger] should never cause this, so it
    /// usually points to a bug in the caller.
    #[error("a database constraint failed: {0}")]
    ConstraintViolation(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the ID is
    /// correct and that the resource has not been deleted.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The CSV text had issues that prevented it from being parsed at all.
    #[error("Could not parse the CSV file: {0}")]
    InvalidCSV(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// A transaction's tags could not be encoded for storage.
    #[error("could not encode tags as JSON: {0}")]
    TagEncodingError(String),
}

impl Error {
    /// Whether the error came from the storage layer rather than from the
    /// caller's input.
    ///
    /// Storage faults mean later writes are likely to fail too.
    pub fn is_storage_fault(&self) -> bool {
        matches!(
            self,
            Error::SqlError(_) | Error::DatabaseLockError | Error::TagEncodingError(_)
        )
    }
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::SqliteFailure(sql_error, desc)
                if sql_error.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_CHECK
                    || sql_error.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_NOTNULL =>
            {
                Error::ConstraintViolation(desc.unwrap_or_else(|| sql_error.to_string()))
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

/// The JSON body sent to the client when a request fails.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(ErrorBody { error: message })).into_response()
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::Validation(error) => {
                error_response(StatusCode::UNPROCESSABLE_ENTITY, error.to_string())
            }
            Error::NotFound => error_response(
                StatusCode::NOT_FOUND,
                "The transaction could not be found. \
                It may have already been deleted."
                    .to_owned(),
            ),
            Error::InvalidCSV(reason) => error_response(
                StatusCode::BAD_REQUEST,
                format!("Could not parse the CSV file: {reason}"),
            ),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred, check the server logs for more details."
                        .to_owned(),
                )
            }
        }
    }
}
