//! Seed data loading
//!
//! Fetches the remote dataset of product transactions and bulk inserts it
//! into the database, either through the `/initialize_database` route or the
//! `load_seed_data` binary.

mod endpoint;
mod fetch;
mod load;

pub use endpoint::initialize_database;
pub use fetch::{DEFAULT_SEED_URL, fetch_seed_records};
pub use load::{LoadReport, SkippedRecord, load_seed_records};
