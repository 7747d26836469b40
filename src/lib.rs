//! Sales Insights is a small web service for summarising product sales.
//!
//! This library loads a seed dataset of product transactions into a SQLite
//! database and provides a JSON API with monthly aggregations over it: summary
//! statistics, a price histogram, a category breakdown and a combined view.

#![warn(missing_docs)]

use std::{
    io,
    net::{SocketAddr, TcpListener},
    time::Duration,
};

use axum::{
    Json,
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde::{Deserialize, Serialize};
use tokio::signal;

mod app_state;
mod db;
mod endpoints;
mod logging;
mod not_found;
mod report;
mod routing;
mod seed;
#[cfg(test)]
mod test_utils;
mod transaction;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use report::{CategoryCount, CombinedData, MonthQuery, PriceRangeCount, Statistics};
pub use routing::build_router;
pub use seed::{DEFAULT_SEED_URL, LoadReport, SkippedRecord, fetch_seed_records, load_seed_records};
pub use transaction::{
    Transaction, TransactionId, count_transactions, insert_transaction, reset_transaction_table,
};

/// Bind a TCP listener on 127.0.0.1 at `port`, where 0 picks any free port.
///
/// The listener is set to non-blocking mode so that it can be handed to tokio.
///
/// # Returns
/// The listener and the URL the server can be reached at, built from the
/// address that was actually bound, e.g. "http://127.0.0.1:3000".
///
/// # Errors
/// Returns an error if the port cannot be bound.
pub fn bind_local_listener(port: u16) -> io::Result<(TcpListener, String)> {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], port)))?;
    listener.set_nonblocking(true)?;
    let addr = listener.local_addr()?;

    Ok((listener, format!("http://{addr}")))
}

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
    /// The seed dataset could not be fetched from the remote source.
    ///
    /// This covers network errors, non-2xx responses and bodies that are not
    /// a JSON array.
    #[error("could not fetch the seed data: {0}")]
    SeedFetch(String),

    /// A record in the seed dataset has an ID that already exists in the database.
    ///
    /// The load is rolled back when this happens, so the database is left as
    /// it was before the load started.
    #[error("the transaction ID {0} already exists in the database")]
    DuplicateId(i64),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// A database task on the blocking thread pool panicked or was cancelled.
    #[error("the database task did not complete: {0}")]
    TaskFailed(String),

    /// The query string of a request could not be parsed, e.g. `?month=01&month=02`.
    #[error("invalid query string: {0}")]
    InvalidQuery(String),

    /// A request or response body could not be read.
    #[error("could not read the body: {0}")]
    BodyRead(String),

    /// One of the parts of a composed aggregation failed.
    ///
    /// The string holds the underlying error and should only be logged on the
    /// server.
    #[error("could not compute the aggregation: {0}")]
    Aggregation(String),
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::InvalidQuery(rejection.body_text())
    }
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", value);
        Error::SqlError(value)
    }
}

/// The JSON body sent to the client when a request fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// A short, client-safe description of what went wrong.
    pub error: String,
}

impl ErrorBody {
    /// The body for errors that should not be shown to the client in detail.
    pub fn internal_server_error() -> Self {
        Self {
            error: "Internal Server Error".to_owned(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // None of the error details are intended to be shown to the client.
        tracing::error!("An unexpected error occurred: {}", self);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody::internal_server_error()),
        )
            .into_response()
    }
}
