//! Defines the endpoint for overwriting an existing transaction.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    Error, SQLiteLedger,
    database_id::TransactionId,
    ledger::{Field, TransactionInput, ValidationError},
    transaction::Transaction,
};

/// A route handler for overwriting the transaction `transaction_id`.
///
/// The ID in the path is the one that is updated. An ID in the body is allowed
/// only if it matches the path.
pub async fn update_transaction_endpoint(
    State(ledger): State<SQLiteLedger>,
    Path(transaction_id): Path<TransactionId>,
    Json(mut input): Json<TransactionInput>,
) -> Result<Json<Transaction>, Error> {
    match input.id {
        Some(body_id) if body_id != transaction_id => {
            return Err(ValidationError::UnexpectedField(Field::Id).into());
        }
        _ => input.id = Some(transaction_id),
    }

    let transaction = ledger.amend_transaction(input)?;

    Ok(Json(transaction))
}
