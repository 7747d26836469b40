#![allow(missing_docs)]

pub(crate) mod db;
pub(crate) mod http;

pub(crate) use db::{get_test_connection, insert_transactions, sample_transaction};
pub(crate) use http::{serve_json, spawn_app, spawn_server};
