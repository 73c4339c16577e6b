//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/transactions/{transaction_id}', use [format_endpoint].

/// The route for listing, searching and creating transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route for updating or deleting a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route for the income, expense and balance totals.
pub const TOTALS: &str = "/api/totals";
/// The route for the list of expense categories.
pub const CATEGORIES: &str = "/api/categories";
/// The route for the amount spent in each expense category.
pub const CATEGORY_SUMMARY: &str = "/api/categories/summary";
/// The route for downloading all transactions as CSV.
pub const EXPORT: &str = "/api/export";
/// The route for uploading transactions as CSV.
pub const IMPORT: &str = "/api/import";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// Assumes the parameter is the last path segment wrapped in braces.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    match endpoint_path.rfind('{') {
        Some(start) => format!("{}{id}", &endpoint_path[..start]),
        None => endpoint_path.to_owned(),
    }
}
