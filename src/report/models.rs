//! The request and response types of the report endpoints.

use axum::extract::{FromRequestParts, Query};
use serde::{Deserialize, Serialize};

use crate::Error;

/// The query string shared by the report endpoints, e.g. `?month=03`.
///
/// `month` is compared against the two-digit month of `dateOfSale`. When it is
/// missing the comparison is against `NULL`, so no rows match.
///
/// Used directly as an extractor. A query string that cannot be parsed is
/// rejected with [Error::InvalidQuery], so it gets the same JSON error
/// response as any other failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRequestParts)]
#[from_request(via(Query), rejection(Error))]
pub struct MonthQuery {
    /// The two-digit month, "01" to "12".
    pub month: Option<String>,
}

/// Sales totals for the transactions in a month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// The sum of the prices of all matching transactions, sold or not.
    pub total_sale_amount: f64,
    /// The number of matching transactions that were sold.
    pub total_sold_items: u32,
    /// The number of matching transactions that were not sold.
    pub total_not_sold_items: u32,
}

/// The number of transactions in a price band, one bar of the bar chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRangeCount {
    /// The label of the band, e.g. "101-200" or "901-above".
    pub price_range: String,
    /// The number of transactions whose price falls in the band.
    pub count: u32,
}

/// The number of transactions in a category, one slice of the pie chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    /// The category label.
    pub category: String,
    /// The number of matching transactions in the category.
    pub item_count: u32,
}
