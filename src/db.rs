//! Database setup and the bridge between async handlers and the SQLite connection.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{Error, transaction::create_transaction_table};

/// Create the tables for the domain models if they do not already exist.
///
/// # Errors
/// Returns an error if a table cannot be created.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    create_transaction_table(connection)
}

/// Run `query` against the shared connection on tokio's blocking thread pool.
///
/// The connection lock is held for the duration of `query` only, so several
/// calls may be awaited together (e.g., with [tokio::try_join]) and will take
/// turns on the connection.
///
/// # Errors
/// Returns:
/// - [Error::DatabaseLockError] if the connection mutex is poisoned,
/// - [Error::TaskFailed] if the blocking task panicked or was cancelled,
/// - or whatever error `query` returns.
pub(crate) async fn with_connection<T, F>(
    db_connection: Arc<Mutex<Connection>>,
    query: F,
) -> Result<T, Error>
where
    T: Send + 'static,
    F: FnOnce(&Connection) -> Result<T, Error> + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let connection = db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        query(&connection)
    })
    .await
    .inspect_err(|error| tracing::error!("database task did not complete: {error}"))
    .map_err(|error| Error::TaskFailed(error.to_string()))?
}
