//! Report HTTP handlers for the statistics, bar chart and pie chart.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    db::with_connection,
    report::{
        aggregation::count_by_price_band,
        models::{CategoryCount, MonthQuery, PriceRangeCount, Statistics},
        query::{count_items, count_items_by_category, get_prices, get_total_sale_amount},
    },
};

/// The state needed for the report handlers.
#[derive(Debug, Clone)]
pub struct ReportState {
    /// The database connection for querying transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ReportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Get the total sale amount and the number of sold and unsold items in a month.
///
/// The three figures are independent reads that are awaited together.
pub async fn get_statistics(
    State(state): State<ReportState>,
    query: MonthQuery,
) -> Result<Json<Statistics>, Error> {
    let connection = &state.db_connection;
    let month = &query.month;

    let (total_sale_amount, total_sold_items, total_not_sold_items) = tokio::try_join!(
        query_month(connection, month, get_total_sale_amount),
        query_month(connection, month, |month, connection| {
            count_items(month, true, connection)
        }),
        query_month(connection, month, |month, connection| {
            count_items(month, false, connection)
        }),
    )
    .inspect_err(|error| tracing::error!("could not get statistics for {month:?}: {error}"))?;

    Ok(Json(Statistics {
        total_sale_amount,
        total_sold_items,
        total_not_sold_items,
    }))
}

/// Get the number of items in each price band in a month.
pub async fn get_bar_chart(
    State(state): State<ReportState>,
    query: MonthQuery,
) -> Result<Json<Vec<PriceRangeCount>>, Error> {
    let prices = query_month(&state.db_connection, &query.month, get_prices)
        .await
        .inspect_err(|error| tracing::error!("could not get prices for {:?}: {error}", query.month))?;

    Ok(Json(count_by_price_band(&prices)))
}

/// Get the number of items in each category in a month.
pub async fn get_pie_chart(
    State(state): State<ReportState>,
    query: MonthQuery,
) -> Result<Json<Vec<CategoryCount>>, Error> {
    let categories = query_month(&state.db_connection, &query.month, count_items_by_category)
        .await
        .inspect_err(|error| {
            tracing::error!("could not get category counts for {:?}: {error}", query.month)
        })?;

    Ok(Json(categories))
}

/// Run a month-filtered `query` on the blocking thread pool.
async fn query_month<T, F>(
    db_connection: &Arc<Mutex<Connection>>,
    month: &Option<String>,
    query: F,
) -> Result<T, Error>
where
    T: Send + 'static,
    F: FnOnce(Option<&str>, &Connection) -> Result<T, Error> + Send + 'static,
{
    let month = month.clone();

    with_connection(db_connection.clone(), move |connection| {
        query(month.as_deref(), connection)
    })
    .await
}
