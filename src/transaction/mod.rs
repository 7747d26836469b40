//! Product transactions, the only domain model in the application.
//!
//! This module contains the `Transaction` model and the database functions
//! for creating, resetting and populating its table.

mod core;

pub use core::{
    Transaction, TransactionId, count_transactions, create_transaction_table, insert_seed_record,
    insert_transaction, reset_transaction_table,
};

#[cfg(test)]
pub use core::get_transaction;
