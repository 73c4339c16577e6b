//! Defines the endpoint for listing and searching transactions.

use axum::{
    Json,
    extract::{Query, State},
};

use crate::{Error, SQLiteLedger, ledger::TransactionFilterParams, transaction::Transaction};

/// A route handler for listing transactions, most recent first.
///
/// The optional `category`, `search`, `from` and `to` query parameters narrow
/// the list down. Without any of them every transaction is returned.
pub async fn list_transactions_endpoint(
    State(ledger): State<SQLiteLedger>,
    Query(params): Query<TransactionFilterParams>,
) -> Result<Json<Vec<Transaction>>, Error> {
    let filter = params.into_filter()?;
    let transactions = ledger.search_transactions(&filter)?;

    Ok(Json(transactions))
}
