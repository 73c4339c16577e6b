//! Defines the endpoint for deleting a transaction.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::{Error, SQLiteLedger, database_id::TransactionId};

/// A route handler for deleting a transaction.
///
/// Responds with `true` if the transaction was deleted, or `false` if it did
/// not exist.
pub async fn delete_transaction_endpoint(
    State(ledger): State<SQLiteLedger>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Json<bool>, Error> {
    let removed = ledger.remove_transaction(transaction_id)?;

    Ok(Json(removed))
}
