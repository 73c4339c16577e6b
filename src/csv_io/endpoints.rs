//! Route handlers for downloading and uploading transactions as CSV.

use axum::{
    Json,
    extract::State,
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::IntoResponse,
};

use crate::{
    Error, SQLiteLedger,
    csv_io::{ImportSummary, export_csv, import_csv},
};

/// A route handler that responds with every transaction as a CSV file.
pub async fn export_endpoint(
    State(ledger): State<SQLiteLedger>,
) -> Result<impl IntoResponse, Error> {
    let transactions = ledger.list_transactions()?;

    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8"),
            (CONTENT_DISPOSITION, "attachment; filename=\"transactions.csv\""),
        ],
        export_csv(&transactions),
    ))
}

/// A route handler that imports the CSV text in the request body.
///
/// Rows that fail validation are skipped and counted, see [import_csv].
pub async fn import_endpoint(
    State(ledger): State<SQLiteLedger>,
    text: String,
) -> Result<Json<ImportSummary>, Error> {
    import_csv(&text, &ledger).map(Json)
}
