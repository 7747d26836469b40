use std::error::Error;

use clap::Parser;
use rusqlite::Connection;

use sales_insights::{
    DEFAULT_SEED_URL, count_transactions, fetch_seed_records, initialize_db, load_seed_records,
    reset_transaction_table,
};

/// A utility for loading the seed dataset into the database of sales_insights
/// without starting the server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long, default_value = "products.db")]
    db_path: String,

    /// URL of the JSON document with the seed dataset.
    #[arg(long, default_value = DEFAULT_SEED_URL)]
    seed_url: String,

    /// Drop all existing transactions before loading.
    #[arg(long)]
    reset: bool,
}

/// Fetch the seed dataset and insert it into the database.
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    println!("Opening database at {:#?}", args.db_path);
    let conn = Connection::open(&args.db_path)?;
    initialize_db(&conn)?;

    if args.reset {
        println!("Dropping existing transactions...");
        reset_transaction_table(&conn)?;
    }

    println!("Fetching seed data from {}...", args.seed_url);
    let records = fetch_seed_records(&reqwest::Client::new(), &args.seed_url).await?;

    println!("Loading {} records...", records.len());
    let report = load_seed_records(records, &conn)?;

    for skipped in &report.skipped {
        eprintln!(
            "Skipped record {} (id {:?}): {}",
            skipped.index, skipped.id, skipped.reason
        );
    }

    println!(
        "Success! Inserted {} records, skipped {}. The database now has {} transactions.",
        report.inserted,
        report.skipped.len(),
        count_transactions(&conn)?
    );

    Ok(())
}
