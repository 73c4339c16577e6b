//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::{Error, ledger::Ledger, stores::sqlite::SQLiteTransactionStore};

/// The ledger the server uses, backed by SQLite.
pub type SQLiteLedger = Ledger<SQLiteTransactionStore>;

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The ledger that every route handler reads and writes through.
    pub ledger: SQLiteLedger,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_connection: Connection) -> Result<Self, Error> {
        let connection = Arc::new(Mutex::new(db_connection));
        let ledger = Ledger::new(SQLiteTransactionStore::new(connection));

        ledger.initialize()?;

        Ok(Self { ledger })
    }
}

impl FromRef<AppState> for SQLiteLedger {
    fn from_ref(state: &AppState) -> Self {
        state.ledger.clone()
    }
}
