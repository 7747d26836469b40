//! The combined report, assembled from the server's own report endpoints.

use axum::{
    Json,
    extract::{FromRef, State},
};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::{AppState, Error, endpoints, report::models::MonthQuery};

/// The state needed for requesting the other report endpoints.
#[derive(Debug, Clone)]
pub struct CombinedState {
    /// The client for the loopback requests.
    pub http_client: reqwest::Client,
    /// The URL of this server, e.g. "http://127.0.0.1:3000".
    pub base_url: String,
}

impl FromRef<AppState> for CombinedState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            http_client: state.http_client.clone(),
            base_url: state.base_url.clone(),
        }
    }
}

/// The statistics, bar chart and pie chart of a month in one response.
///
/// Each field holds the response body of the corresponding endpoint verbatim.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedData {
    /// The response of the statistics endpoint.
    pub statistics: Box<RawValue>,
    /// The response of the bar chart endpoint.
    pub bar_chart: Box<RawValue>,
    /// The response of the pie chart endpoint.
    pub pie_chart: Box<RawValue>,
}

/// Get the statistics, bar chart and pie chart of a month.
///
/// The three reports are requested from this server concurrently. If any of
/// them fails the whole request fails.
pub async fn get_combined_data(
    State(state): State<CombinedState>,
    query: MonthQuery,
) -> Result<Json<CombinedData>, Error> {
    let (statistics, bar_chart, pie_chart) = tokio::try_join!(
        fetch_report(&state, endpoints::STATISTICS, &query),
        fetch_report(&state, endpoints::BAR_CHART, &query),
        fetch_report(&state, endpoints::PIE_CHART, &query),
    )
    .inspect_err(|error| tracing::error!("Error fetching combined data: {error}"))?;

    Ok(Json(CombinedData {
        statistics,
        bar_chart,
        pie_chart,
    }))
}

async fn fetch_report(
    state: &CombinedState,
    endpoint: &str,
    query: &MonthQuery,
) -> Result<Box<RawValue>, Error> {
    let url = format!("{}{endpoint}", state.base_url);

    let mut request = state.http_client.get(&url);
    if let Some(month) = &query.month {
        request = request.query(&[("month", month)]);
    }

    let body = request
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .inspect_err(|error| tracing::error!("Request to {url} failed: {error}"))
        .map_err(|error| Error::Aggregation(error.to_string()))?
        .text()
        .await
        .map_err(|error| Error::Aggregation(error.to_string()))?;

    RawValue::from_string(body)
        .inspect_err(|error| tracing::error!("Response from {url} is not JSON: {error}"))
        .map_err(|error| Error::Aggregation(error.to_string()))
}
