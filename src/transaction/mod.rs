//! Transactions and the route handlers that manage them.
//!
//! - [Transaction] is a stored income or expense, [NewTransaction] is a
//!   validated one that has not been stored yet.
//! - The endpoints validate caller input through the [Ledger](crate::ledger::Ledger).

mod core;
mod create_transaction_endpoint;
mod delete_transaction_endpoint;
mod list_transactions_endpoint;
mod update_transaction_endpoint;

pub use core::{NewTransaction, Transaction, TransactionType, UnknownTransactionType};
pub use create_transaction_endpoint::create_transaction_endpoint;
pub use delete_transaction_endpoint::delete_transaction_endpoint;
pub use list_transactions_endpoint::list_transactions_endpoint;
pub use update_transaction_endpoint::update_transaction_endpoint;
