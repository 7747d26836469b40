//! Fetches the seed dataset from its remote source.

use serde_json::Value;

use crate::Error;

/// Where the seed dataset of product transactions is published.
pub const DEFAULT_SEED_URL: &str = "https://s3.amazonaws.com/roxiler.com/product_transaction.json";

/// Fetch the seed dataset at `url` as a list of raw JSON records.
///
/// The records are not decoded here so that a single malformed record can be
/// skipped when loading instead of failing the whole dataset.
///
/// # Errors
/// Returns [Error::SeedFetch] if the request fails, the server responds with
/// a non-2xx status, or the body is not a JSON array.
pub async fn fetch_seed_records(client: &reqwest::Client, url: &str) -> Result<Vec<Value>, Error> {
    let response = client
        .get(url)
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .inspect_err(|error| tracing::error!("Error fetching seed data from {url}: {error}"))
        .map_err(|error| Error::SeedFetch(error.to_string()))?;

    response
        .json::<Vec<Value>>()
        .await
        .inspect_err(|error| tracing::error!("Seed data from {url} is not a JSON array: {error}"))
        .map_err(|error| Error::SeedFetch(error.to_string()))
}
