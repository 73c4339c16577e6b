#![allow(missing_docs)]

use axum::http::StatusCode;
use axum_test::{TestResponse, TestServer};
use rusqlite::Connection;
use serde_json::{Value, json};

use crate::{AppState, build_router};

pub(crate) fn get_test_app_state() -> AppState {
    let connection = Connection::open_in_memory().expect("Could not open database in memory.");

    AppState::new(connection).expect("Could not create app state.")
}

pub(crate) fn get_test_server(state: AppState) -> TestServer {
    TestServer::try_new(build_router(state)).expect("Could not create test server.")
}

/// The JSON for an expense of 50 on milk.
pub(crate) fn milk_json() -> Value {
    json!({
        "type": "expense",
        "amount": 50.0,
        "category": "Groceries",
        "description": "milk",
        "tags": ["food"],
        "date": "2024-01-15",
    })
}

#[track_caller]
pub(crate) fn assert_error_response(response: &TestResponse, status: StatusCode) {
    response.assert_status(status);

    let body = response.json::<Value>();
    assert!(
        body["error"].is_string(),
        "want an error message, got {body}"
    );
}
