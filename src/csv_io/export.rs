//! Renders transactions as CSV text.

use crate::{
    csv_io::{CSV_HEADER, TAG_SEPARATOR},
    transaction::Transaction,
};

/// Render `transactions` as CSV text, one line per transaction after the header.
///
/// `Description` and `Tags` are always quoted. `Amount` is signed: negative
/// for expenses.
pub fn export_csv(transactions: &[Transaction]) -> String {
    let mut text = CSV_HEADER.join(",");
    text.push('\n');

    for transaction in transactions {
        text.push_str(&format_row(transaction));
        text.push('\n');
    }

    text
}

fn format_row(transaction: &Transaction) -> String {
    format!(
        "{},{},{},{},{:.2},{}",
        transaction.date,
        transaction.type_,
        transaction.category,
        quote(&transaction.description),
        transaction.type_.signed_amount(transaction.amount),
        quote(&transaction.tags.join(TAG_SEPARATOR)),
    )
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}
