//! Database queries for the monthly reports.
//!
//! Every query filters on the month of `date_of_sale` with SQLite's
//! `strftime('%m', ...)`, so a month matches across all years. Date-times with
//! a UTC offset are normalised to UTC before the month is extracted.

use rusqlite::Connection;

use crate::{Error, report::models::CategoryCount};

/// Gets the sum of the prices of the transactions in `month`, or zero if there are none.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub(super) fn get_total_sale_amount(
    month: Option<&str>,
    connection: &Connection,
) -> Result<f64, Error> {
    connection
        .prepare(
            "SELECT COALESCE(SUM(price), 0.0)
            FROM product_transaction
            WHERE strftime('%m', date_of_sale) = ?1",
        )?
        .query_one([month], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Counts the transactions in `month` that were sold (`sold = true`) or not sold.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub(super) fn count_items(
    month: Option<&str>,
    sold: bool,
    connection: &Connection,
) -> Result<u32, Error> {
    connection
        .prepare(
            "SELECT COUNT(*)
            FROM product_transaction
            WHERE strftime('%m', date_of_sale) = ?1 AND sold = ?2",
        )?
        .query_one((month, sold), |row| row.get(0))
        .map_err(|error| error.into())
}

/// Gets the price of every transaction in `month` that has a numeric price.
///
/// Rows whose price is NULL or text are left out, they fall in no price band.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub(super) fn get_prices(month: Option<&str>, connection: &Connection) -> Result<Vec<f64>, Error> {
    let mut stmt = connection.prepare(
        "SELECT price
        FROM product_transaction
        WHERE strftime('%m', date_of_sale) = ?1 AND typeof(price) IN ('integer', 'real')",
    )?;

    stmt.query_map([month], |row| row.get(0))?
        .collect::<Result<Vec<f64>, rusqlite::Error>>()
        .map_err(|error| error.into())
}

/// Counts the transactions in `month` per category.
///
/// Only categories with at least one transaction in `month` are returned.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub(super) fn count_items_by_category(
    month: Option<&str>,
    connection: &Connection,
) -> Result<Vec<CategoryCount>, Error> {
    let mut stmt = connection.prepare(
        "SELECT category, COUNT(*) AS item_count
        FROM product_transaction
        WHERE strftime('%m', date_of_sale) = ?1 AND category IS NOT NULL
        GROUP BY category",
    )?;

    stmt.query_map([month], |row| {
        Ok(CategoryCount {
            category: row.get(0)?,
            item_count: row.get(1)?,
        })
    })?
    .collect::<Result<Vec<CategoryCount>, rusqlite::Error>>()
    .map_err(|error| error.into())
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use super::{count_items, count_items_by_category, get_prices, get_total_sale_amount};
    use crate::{
        report::models::CategoryCount,
        test_utils::{get_test_connection, insert_transactions, sample_transaction},
    };

    fn get_populated_connection() -> Connection {
        let conn = get_test_connection();
        insert_transactions(
            &[
                sample_transaction(1, 50.0, true, "electronics", "2022-01-10T10:00:00+05:30"),
                sample_transaction(2, 150.0, false, "jewelery", "2021-01-27T20:29:54+05:30"),
                sample_transaction(3, 300.0, true, "electronics", "2022-02-10T10:00:00Z"),
                sample_transaction(4, 25.5, true, "books", "2022-01-31T12:00:00Z"),
                sample_transaction(5, 999.0, false, "books", "2022-12-01T12:00:00Z"),
            ],
            &conn,
        );
        conn
    }

    #[test]
    fn total_sale_amount_sums_every_matching_row() {
        let conn = get_populated_connection();

        let total = get_total_sale_amount(Some("01"), &conn).unwrap();

        assert_eq!(total, 225.5);
    }

    #[test]
    fn total_sale_amount_is_zero_without_matching_rows() {
        let conn = get_populated_connection();

        assert_eq!(get_total_sale_amount(Some("06"), &conn), Ok(0.0));
        assert_eq!(get_total_sale_amount(None, &conn), Ok(0.0));
    }

    #[test]
    fn month_matches_across_years() {
        let conn = get_populated_connection();

        let prices = get_prices(Some("01"), &conn).unwrap();

        // 150.0 was sold in 2021, the others in 2022.
        assert_eq!(prices.len(), 3);
        assert!(prices.contains(&150.0));
    }

    #[test]
    fn counts_sold_and_not_sold_items() {
        let conn = get_populated_connection();

        assert_eq!(count_items(Some("01"), true, &conn), Ok(2));
        assert_eq!(count_items(Some("01"), false, &conn), Ok(1));
        assert_eq!(count_items(Some("12"), true, &conn), Ok(0));
        assert_eq!(count_items(Some("12"), false, &conn), Ok(1));
    }

    #[test]
    fn missing_month_matches_nothing() {
        let conn = get_populated_connection();

        assert_eq!(count_items(None, true, &conn), Ok(0));
        assert_eq!(count_items(None, false, &conn), Ok(0));
        assert_eq!(get_prices(None, &conn), Ok(vec![]));
        assert_eq!(count_items_by_category(None, &conn), Ok(vec![]));
    }

    #[test]
    fn single_digit_month_matches_nothing() {
        let conn = get_populated_connection();

        assert_eq!(get_prices(Some("1"), &conn), Ok(vec![]));
    }

    #[test]
    fn groups_items_by_category() {
        let conn = get_populated_connection();

        let mut got = count_items_by_category(Some("01"), &conn).unwrap();
        got.sort_by(|a, b| a.category.cmp(&b.category));

        assert_eq!(
            got,
            vec![
                CategoryCount {
                    category: "books".to_owned(),
                    item_count: 1
                },
                CategoryCount {
                    category: "electronics".to_owned(),
                    item_count: 1
                },
                CategoryCount {
                    category: "jewelery".to_owned(),
                    item_count: 1
                },
            ]
        );
    }

    #[test]
    fn category_counts_sum_to_matching_rows() {
        let conn = get_populated_connection();

        for month in ["01", "02", "06", "12"] {
            let category_total: u32 = count_items_by_category(Some(month), &conn)
                .unwrap()
                .iter()
                .map(|category| category.item_count)
                .sum();
            let row_count = get_prices(Some(month), &conn).unwrap().len() as u32;

            assert_eq!(category_total, row_count, "month {month}");
        }
    }

    #[test]
    fn queries_fail_without_table() {
        let conn = Connection::open_in_memory().unwrap();

        assert!(get_total_sale_amount(Some("01"), &conn).is_err());
        assert!(count_items(Some("01"), true, &conn).is_err());
        assert!(get_prices(Some("01"), &conn).is_err());
        assert!(count_items_by_category(Some("01"), &conn).is_err());
    }
}
