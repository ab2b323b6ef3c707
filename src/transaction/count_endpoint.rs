//! Defines the endpoint for the total number of transactions.

use axum::{
    Json,
    extract::State,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};

use crate::{AppState, transaction::service};

/// A route handler that responds with the total number of stored
/// transactions as a bare JSON integer.
pub async fn get_transaction_count_endpoint(State(state): State<AppState>, uri: Uri) -> Response {
    match service::transaction_count(&state.transaction_store) {
        Ok(count) => (StatusCode::OK, Json(count)).into_response(),
        Err(error) => error.into_response_with_path(uri.path()),
    }
}
