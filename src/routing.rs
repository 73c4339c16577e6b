//! Application router configuration.

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde_json::json;

use crate::{
    AppState,
    csv_io::{export_endpoint, import_endpoint},
    endpoints,
    logging::logging_middleware,
    summary::{get_categories_endpoint, get_category_summary_endpoint, get_totals_endpoint},
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, list_transactions_endpoint,
        update_transaction_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            endpoints::TRANSACTIONS,
            get(list_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            put(update_transaction_endpoint).delete(delete_transaction_endpoint),
        )
        .route(endpoints::TOTALS, get(get_totals_endpoint))
        .route(endpoints::CATEGORIES, get(get_categories_endpoint))
        .route(
            endpoints::CATEGORY_SUMMARY,
            get(get_category_summary_endpoint),
        )
        .route(endpoints::EXPORT, get(export_endpoint))
        .route(endpoints::IMPORT, post(import_endpoint))
        .fallback(get_404_not_found)
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}

async fn get_404_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"error": "There is nothing at this address."})),
    )
        .into_response()
}
