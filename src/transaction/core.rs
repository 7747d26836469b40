//! Defines the core data model and database queries for product transactions.

use rusqlite::{Connection, params_from_iter, types::Value as SqlValue};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::Error;

// ============================================================================
// MODELS
// ============================================================================

/// Alias for the integer type used for transaction IDs.
///
/// IDs come from the seed dataset, the database never generates them.
pub type TransactionId = i64;

/// A product listing and whether it was sold.
///
/// The JSON representation uses the same camelCase field names as the seed
/// dataset, e.g. `dateOfSale`. Every field except `id` may be missing from a
/// seed record, in which case it is stored as NULL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction, as given by the seed dataset.
    pub id: TransactionId,
    /// The name of the product.
    pub title: Option<String>,
    /// The price of the product.
    ///
    /// Prices are expected to be non-negative but this is not enforced.
    pub price: Option<f64>,
    /// A free-form text description of the product.
    pub description: Option<String>,
    /// The category label, e.g. "electronics" or "men's clothing".
    pub category: Option<String>,
    /// Whether the product was sold.
    pub sold: Option<bool>,
    /// When the product was sold (or listed), as an ISO-8601 date-time string.
    ///
    /// The string is stored verbatim. SQLite's date functions are used to
    /// extract the month when querying.
    pub date_of_sale: Option<String>,
}

impl Transaction {
    fn to_row(&self) -> [SqlValue; 7] {
        [
            SqlValue::Integer(self.id),
            self.title.clone().into(),
            self.price.into(),
            self.description.clone().into(),
            self.category.clone().into(),
            self.sold.into(),
            self.date_of_sale.clone().into(),
        ]
    }
}

/// The seed record fields in column order.
const SEED_FIELDS: [&str; 7] = [
    "id",
    "title",
    "price",
    "description",
    "category",
    "sold",
    "dateOfSale",
];

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the transaction table in the database if it does not exist.
///
/// Only `id` is constrained, every other column accepts NULL.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS product_transaction (
                id INTEGER PRIMARY KEY,
                title TEXT,
                price REAL,
                description TEXT,
                category TEXT,
                sold BOOLEAN,
                date_of_sale TEXT
                )",
        (),
    )?;

    Ok(())
}

/// Drop the transaction table and all of its rows, then create it again.
///
/// This is the only supported way to reset the data.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn reset_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute("DROP TABLE IF EXISTS product_transaction", ())?;
    create_transaction_table(connection)
}

/// Insert a transaction into the database.
///
/// # Errors
/// This function will return a:
/// - [Error::DuplicateId] if a transaction with the same ID already exists,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn insert_transaction(transaction: &Transaction, connection: &Connection) -> Result<(), Error> {
    insert_row(transaction.to_row(), connection)
}

/// Insert a seed record into the database without checking its fields.
///
/// Each field is bound as the SQLite value closest to its JSON value: `null`
/// and missing fields as NULL, booleans as 0 or 1, numbers as INTEGER or REAL,
/// strings as TEXT and arrays or objects as their JSON text. Unknown fields
/// such as `image` are ignored. Whether the row is accepted is up to SQLite,
/// e.g. a text `id` that is not an integer is rejected.
///
/// # Errors
/// This function will return a:
/// - [Error::DuplicateId] if a transaction with the same ID already exists,
/// - or [Error::SqlError] if SQLite rejects the row for some other reason.
pub fn insert_seed_record(record: &Map<String, Value>, connection: &Connection) -> Result<(), Error> {
    let row = SEED_FIELDS.map(|field| record.get(field).map_or(SqlValue::Null, json_to_sql));

    insert_row(row, connection)
}

fn json_to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(value) => SqlValue::Integer(i64::from(*value)),
        Value::Number(number) => match number.as_i64() {
            Some(integer) => SqlValue::Integer(integer),
            None => number.as_f64().map_or(SqlValue::Null, SqlValue::Real),
        },
        Value::String(text) => SqlValue::Text(text.clone()),
        Value::Array(_) | Value::Object(_) => SqlValue::Text(value.to_string()),
    }
}

/// The statement is cached on the connection, so inserting many rows in a
/// loop reuses the same prepared statement.
fn insert_row(row: [SqlValue; 7], connection: &Connection) -> Result<(), Error> {
    connection
        .prepare_cached(
            "INSERT INTO product_transaction (id, title, price, description, category, sold, date_of_sale)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )?
        .execute(params_from_iter(row.iter()))
        .map_err(|error| {
            match is_key_conflict(&error).then(|| to_transaction_id(&row[0])).flatten() {
                Some(id) => Error::DuplicateId(id),
                None => error.into(),
            }
        })?;

    Ok(())
}

fn is_key_conflict(error: &rusqlite::Error) -> bool {
    matches!(
        error,
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                    | rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                ..
            },
            _,
        )
    )
}

/// The integer SQLite stores for a bound `id`, following its rowid conversion rules.
fn to_transaction_id(value: &SqlValue) -> Option<TransactionId> {
    match value {
        SqlValue::Integer(id) => Some(*id),
        SqlValue::Real(id) if id.fract() == 0.0 => Some(*id as TransactionId),
        SqlValue::Text(id) => id.trim().parse().ok(),
        _ => None,
    }
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a [Error::SqlError] if `id` does not refer to a
/// transaction or there is some other SQL error.
#[cfg(test)]
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, title, price, description, category, sold, date_of_sale
             FROM product_transaction WHERE id = :id",
        )?
        .query_one(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM product_transaction;", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Map a database row to a Transaction.
#[cfg(test)]
fn map_transaction_row(row: &rusqlite::Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let title = row.get(1)?;
    let price = row.get(2)?;
    let description = row.get(3)?;
    let category = row.get(4)?;
    let sold = row.get(5)?;
    let date_of_sale = row.get(6)?;

    Ok(Transaction {
        id,
        title,
        price,
        description,
        category,
        sold,
        date_of_sale,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod database_tests {
    use serde_json::json;

    use super::insert_seed_record;
    use crate::{
        Error,
        test_utils::{get_test_connection, sample_transaction},
        transaction::{
            Transaction, count_transactions, get_transaction, insert_transaction,
            reset_transaction_table,
        },
    };

    #[test]
    fn insert_succeeds() {
        let conn = get_test_connection();
        let want = sample_transaction(1, 12.3, true, "electronics", "2021-11-27T20:29:54+05:30");

        insert_transaction(&want, &conn).expect("Could not insert transaction");

        let got = get_transaction(1, &conn).expect("Could not get transaction");
        assert_eq!(want, got);
    }

    #[test]
    fn insert_keeps_id_from_dataset() {
        let conn = get_test_connection();
        let transaction = sample_transaction(42, 1.0, false, "jewelery", "2022-03-01T10:00:00Z");

        insert_transaction(&transaction, &conn).expect("Could not insert transaction");

        assert!(get_transaction(42, &conn).is_ok());
        assert!(get_transaction(1, &conn).is_err());
    }

    #[test]
    fn insert_fails_on_duplicate_id() {
        let conn = get_test_connection();
        let transaction = sample_transaction(7, 10.0, true, "electronics", "2022-01-05T10:00:00Z");
        insert_transaction(&transaction, &conn).expect("Could not insert transaction");

        let duplicate = insert_transaction(&transaction, &conn);

        assert_eq!(duplicate, Err(Error::DuplicateId(7)));
    }

    #[test]
    fn get_count() {
        let conn = get_test_connection();
        let want_count = 20;
        for id in 1..=want_count {
            insert_transaction(
                &sample_transaction(id, id as f64, true, "books", "2022-01-05T10:00:00Z"),
                &conn,
            )
            .expect("Could not insert transaction");
        }

        let got_count = count_transactions(&conn).expect("Could not get count");

        assert_eq!(want_count as u32, got_count);
    }

    #[test]
    fn reset_table_removes_all_rows() {
        let conn = get_test_connection();
        insert_transaction(
            &sample_transaction(1, 5.0, false, "books", "2022-01-05T10:00:00Z"),
            &conn,
        )
        .expect("Could not insert transaction");

        reset_transaction_table(&conn).expect("Could not reset table");

        assert_eq!(count_transactions(&conn), Ok(0));
    }

    #[test]
    fn deserializes_seed_json() {
        let json = r#"{
            "id": 1,
            "title": "Fjallraven  - Foldsack No. 1 Backpack, Fits 15 Laptops",
            "price": 329.85,
            "description": "Your perfect pack for everyday use and walks in the forest.",
            "category": "men's clothing",
            "image": "https://fakestoreapi.com/img/81fPKd-2AYL._AC_SL1500_.jpg",
            "sold": false,
            "dateOfSale": "2021-11-27T20:29:54+05:30"
        }"#;

        let got: Transaction = serde_json::from_str(json).unwrap();

        assert_eq!(got.id, 1);
        assert_eq!(got.price, Some(329.85));
        assert_eq!(got.category.as_deref(), Some("men's clothing"));
        assert_eq!(got.sold, Some(false));
        assert_eq!(got.date_of_sale.as_deref(), Some("2021-11-27T20:29:54+05:30"));
    }

    #[test]
    fn insert_seed_record_stores_missing_and_null_fields_as_null() {
        let conn = get_test_connection();
        let record = json!({
            "id": 3,
            "title": "Gold Bracelet",
            "price": 6950,
            "category": null,
            "sold": true,
            "dateOfSale": "2022-01-27T20:29:54+05:30"
        });

        insert_seed_record(record.as_object().unwrap(), &conn).expect("Could not insert record");

        let got = get_transaction(3, &conn).expect("Could not get transaction");
        assert_eq!(
            got,
            Transaction {
                id: 3,
                title: Some("Gold Bracelet".to_owned()),
                price: Some(6950.0),
                description: None,
                category: None,
                sold: Some(true),
                date_of_sale: Some("2022-01-27T20:29:54+05:30".to_owned()),
            }
        );
    }

    #[test]
    fn insert_seed_record_stores_booleans_as_integers() {
        let conn = get_test_connection();

        insert_seed_record(json!({"id": 1, "sold": true}).as_object().unwrap(), &conn).unwrap();
        insert_seed_record(json!({"id": 2, "sold": false}).as_object().unwrap(), &conn).unwrap();

        let sold: Vec<i64> = conn
            .prepare("SELECT sold FROM product_transaction ORDER BY id")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(sold, vec![1, 0]);
    }

    #[test]
    fn insert_seed_record_fails_on_non_integer_id() {
        let conn = get_test_connection();

        let result = insert_seed_record(json!({"id": "abc", "price": 1.0}).as_object().unwrap(), &conn);

        assert!(matches!(result, Err(Error::SqlError(_))), "got {result:?}");
        assert_eq!(count_transactions(&conn), Ok(0));
    }

    #[test]
    fn insert_seed_record_fails_on_duplicate_id() {
        let conn = get_test_connection();
        insert_seed_record(json!({"id": 5}).as_object().unwrap(), &conn).unwrap();

        let result = insert_seed_record(json!({"id": "5"}).as_object().unwrap(), &conn);

        assert_eq!(result, Err(Error::DuplicateId(5)));
    }
}
