use std::error::Error;
use std::path::Path;
use std::process::exit;
use std::sync::{Arc, Mutex};

use clap::Parser;
use rusqlite::Connection;

use ledgerbook_rs::{Ledger, TransactionInput, import_csv, stores::sqlite::SQLiteTransactionStore};

/// A utility for creating a test database for the REST API server of ledgerbook_rs.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// A CSV file to import instead of the built-in sample transactions.
    #[arg(long)]
    csv: Option<String>,
}

/// Type, amount, category, description, tags and date of each sample transaction.
const SAMPLE_TRANSACTIONS: [(&str, f64, &str, &str, &[&str], &str); 8] = [
    ("income", 4200.0, "Income", "Salary", &["work"], "2024-01-31"),
    ("expense", 1850.0, "Housing", "Rent", &[], "2024-01-01"),
    ("expense", 86.4, "Groceries", "Weekly shop", &["food"], "2024-01-06"),
    ("expense", 12.5, "Eat out", "Lunch with the team", &["food", "work"], "2024-01-10"),
    ("expense", 143.27, "Utilities", "Power bill", &["monthly"], "2024-01-15"),
    ("expense", 49.99, "Entertainment", "Streaming and music", &["monthly"], "2024-01-18"),
    ("income", 250.0, "Income", "Sold old bike", &[], "2024-01-20"),
    ("expense", 35.0, "Transportation", "Bus pass top up", &[], "2024-01-22"),
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;
    let ledger = Ledger::new(SQLiteTransactionStore::new(Arc::new(Mutex::new(conn))));
    ledger.initialize()?;

    match args.csv {
        Some(csv_path) => {
            println!("Importing transactions from {csv_path:?}...");
            let text = std::fs::read_to_string(&csv_path)?;
            let summary = import_csv(&text, &ledger)?;
            println!(
                "Imported {} transactions, skipped {} rows.",
                summary.imported_count, summary.error_count
            );
        }
        None => {
            println!("Creating sample transactions...");
            for (type_, amount, category, description, tags, date) in SAMPLE_TRANSACTIONS {
                ledger.record_transaction(TransactionInput {
                    id: None,
                    type_: Some(type_.to_owned()),
                    amount: Some(amount),
                    category: Some(category.to_owned()),
                    description: Some(description.to_owned()),
                    tags: tags.iter().map(|tag| tag.to_string()).collect(),
                    date: Some(date.to_owned()),
                })?;
            }
        }
    }

    println!("Success!");

    Ok(())
}
