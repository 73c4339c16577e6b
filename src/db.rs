//! Sets up the application's database.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{Error, stores::sqlite::transaction::create_transaction_table};

/// Create the tables for the domain models if they do not exist yet.
///
/// Safe to call every time the application starts.
///
/// # Errors
/// Returns an [Error::SqlError] if the database cannot be written to.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
