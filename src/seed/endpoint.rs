//! The HTTP trigger that fetches the seed dataset and loads it into the database.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error, ErrorBody,
    db::with_connection,
    seed::{LoadReport, fetch_seed_records, load_seed_records},
};

/// The state needed for loading the seed dataset.
#[derive(Debug, Clone)]
pub struct SeedState {
    /// The database connection for storing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The client used to fetch the seed dataset.
    pub http_client: reqwest::Client,
    /// Where to fetch the seed dataset from.
    pub seed_url: String,
}

impl FromRef<AppState> for SeedState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            http_client: state.http_client.clone(),
            seed_url: state.seed_url.clone(),
        }
    }
}

/// The JSON body sent to the client when the database was initialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageBody {
    /// A short description of what happened.
    pub message: String,
}

/// Route handler that fetches the seed dataset and loads it into the database.
pub async fn initialize_database(State(state): State<SeedState>) -> Response {
    match fetch_and_load(state).await {
        Ok(_) => Json(MessageBody {
            message: "Database initialized successfully".to_owned(),
        })
        .into_response(),
        Err(error) => {
            tracing::error!("Failed to initialize database with seed data: {error}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    error: "Failed to initialize database with seed data.".to_owned(),
                }),
            )
                .into_response()
        }
    }
}

async fn fetch_and_load(state: SeedState) -> Result<LoadReport, Error> {
    let records = fetch_seed_records(&state.http_client, &state.seed_url).await?;
    tracing::debug!(
        "Fetched {} seed records from {}",
        records.len(),
        state.seed_url
    );

    with_connection(state.db_connection, move |connection| {
        load_seed_records(records, connection)
    })
    .await
}
