//! The API endpoints URIs.

/// The route that fetches the seed dataset and loads it into the database.
pub const INITIALIZE_DATABASE: &str = "/initialize_database";
/// The route for the sales summary of a month.
pub const STATISTICS: &str = "/statistics";
/// The route for the price histogram of a month.
pub const BAR_CHART: &str = "/bar-chart";
/// The route for the item count per category of a month.
pub const PIE_CHART: &str = "/pie-chart";
/// The route that combines the statistics, bar chart and pie chart of a month.
pub const COMBINED_DATA: &str = "/combined-data";
