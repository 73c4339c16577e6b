//! Defines the endpoint for creating a new transaction.

use axum::{Json, extract::State, http::StatusCode};

use crate::{Error, SQLiteLedger, ledger::TransactionInput, transaction::Transaction};

/// A route handler for creating a new transaction.
///
/// Responds with `201 Created` and the stored transaction, including its new ID.
pub async fn create_transaction_endpoint(
    State(ledger): State<SQLiteLedger>,
    Json(input): Json<TransactionInput>,
) -> Result<(StatusCode, Json<Transaction>), Error> {
    let transaction = ledger.record_transaction(input)?;

    tracing::debug!("Created transaction {}", transaction.id);

    Ok((StatusCode::CREATED, Json(transaction)))
}
