//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{Error, db::initialize};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,

    /// The client for outgoing HTTP requests: the seed data fetch and the
    /// loopback requests of the combined endpoint.
    pub http_client: reqwest::Client,

    /// The URL of the JSON document with the seed dataset.
    pub seed_url: String,

    /// The URL this server can be reached at, e.g. "http://127.0.0.1:3000".
    pub base_url: String,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    /// A trailing slash on `base_url` is removed.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_connection: Connection, seed_url: &str, base_url: &str) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            db_connection: Arc::new(Mutex::new(db_connection)),
            http_client: reqwest::Client::new(),
            seed_url: seed_url.to_owned(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }
}
