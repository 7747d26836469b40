//! Bulk inserts the seed dataset into the database.

use rusqlite::Connection;
use serde_json::Value;

use crate::{
    Error,
    transaction::{TransactionId, create_transaction_table, insert_seed_record},
};

/// A seed record that was not inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRecord {
    /// The position of the record in the seed dataset.
    pub index: usize,
    /// The ID of the record, if it had a readable one.
    pub id: Option<TransactionId>,
    /// Why the record was skipped.
    pub reason: String,
}

/// The outcome of loading the seed dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    /// The number of rows inserted.
    pub inserted: usize,
    /// The records that could not be inserted, in dataset order.
    pub skipped: Vec<SkippedRecord>,
}

/// Insert `records` into the transaction table, creating the table if needed.
///
/// All rows are written in a single SQL transaction. The fields of a record
/// are not checked before insertion: missing fields are stored as NULL and
/// SQLite decides what it accepts. Records that are not JSON objects, or that
/// the database rejects, are logged and skipped. A record whose ID already
/// exists fails the whole load and nothing is written.
///
/// # Errors
/// This function will return a:
/// - [Error::DuplicateId] with the first ID that already exists,
/// - or [Error::SqlError] if the table cannot be created or the SQL transaction
///   cannot be started or committed.
pub fn load_seed_records(records: Vec<Value>, connection: &Connection) -> Result<LoadReport, Error> {
    create_transaction_table(connection)
        .inspect_err(|error| tracing::error!("could not create transaction table: {error}"))?;

    let tx = connection
        .unchecked_transaction()
        .inspect_err(|error| tracing::error!("could not start transaction: {error}"))?;

    let mut report = LoadReport::default();

    for (index, record) in records.iter().enumerate() {
        let Some(fields) = record.as_object() else {
            tracing::warn!("Skipping seed record {index}: not a JSON object");
            report.skipped.push(SkippedRecord {
                index,
                id: None,
                reason: "the record is not a JSON object".to_owned(),
            });
            continue;
        };
        let id = fields.get("id").and_then(Value::as_i64);

        match insert_seed_record(fields, &tx) {
            Ok(()) => report.inserted += 1,
            // Dropping `tx` rolls back the rows inserted so far.
            Err(Error::DuplicateId(id)) => {
                tracing::error!("Seed record {index} has the existing ID {id}, aborting load");
                return Err(Error::DuplicateId(id));
            }
            Err(error) => {
                tracing::error!("Error inserting seed record {index} (id {id:?}): {error}");
                report.skipped.push(SkippedRecord {
                    index,
                    id,
                    reason: error.to_string(),
                });
            }
        }
    }

    tx.commit()
        .inspect_err(|error| tracing::error!("could not commit transaction: {error}"))?;

    tracing::info!(
        "Loaded {} seed records, skipped {}",
        report.inserted,
        report.skipped.len()
    );

    Ok(report)
}
