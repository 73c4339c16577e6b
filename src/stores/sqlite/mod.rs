//! Contains the SQLite backed store implementations.

pub mod transaction;

pub use transaction::SQLiteTransactionStore;
