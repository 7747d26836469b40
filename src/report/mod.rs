//! Report module
//!
//! Provides the monthly aggregations over the product transactions: summary
//! statistics, a price histogram (bar chart), a category breakdown (pie chart)
//! and a combined view of all three.

mod aggregation;
mod combined;
mod handlers;
mod models;
mod query;

pub use combined::{CombinedData, get_combined_data};
pub use handlers::{get_bar_chart, get_pie_chart, get_statistics};
pub use models::{CategoryCount, MonthQuery, PriceRangeCount, Statistics};
