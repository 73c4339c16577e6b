//! Route handlers for the totals, the category list and the per-category summary.

use axum::{Json, extract::State};

use crate::{
    Error, SQLiteLedger,
    category::Category,
    stores::{CategorySummary, Totals},
};

/// A route handler for the income, expense and balance totals.
pub async fn get_totals_endpoint(
    State(ledger): State<SQLiteLedger>,
) -> Result<Json<Totals>, Error> {
    ledger.totals().map(Json)
}

/// A route handler for the expense categories, in display order.
pub async fn get_categories_endpoint(
    State(ledger): State<SQLiteLedger>,
) -> Json<&'static [Category]> {
    Json(ledger.categories())
}

/// A route handler for the amount spent in each expense category.
///
/// Every expense category is present, categories with no expenses are zero.
pub async fn get_category_summary_endpoint(
    State(ledger): State<SQLiteLedger>,
) -> Result<Json<CategorySummary>, Error> {
    ledger.category_summary().map(Json)
}
