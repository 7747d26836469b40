use rusqlite::Connection;

use crate::{
    db::initialize,
    transaction::{Transaction, insert_transaction},
};

pub(crate) fn get_test_connection() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    initialize(&conn).unwrap();
    conn
}

pub(crate) fn sample_transaction(
    id: i64,
    price: f64,
    sold: bool,
    category: &str,
    date_of_sale: &str,
) -> Transaction {
    Transaction {
        id,
        title: Some(format!("Product #{id}")),
        price: Some(price),
        description: Some(format!("A {category} product")),
        category: Some(category.to_owned()),
        sold: Some(sold),
        date_of_sale: Some(date_of_sale.to_owned()),
    }
}

#[track_caller]
pub(crate) fn insert_transactions(transactions: &[Transaction], connection: &Connection) {
    for transaction in transactions {
        insert_transaction(transaction, connection).expect("Could not insert transaction");
    }
}
