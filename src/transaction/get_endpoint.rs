//! Defines the endpoint for fetching a single transaction by its ID.

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};

use crate::{
    AppState,
    transaction::{TransactionId, service},
};

/// A route handler for fetching the transaction with the given ID.
///
/// Responds with 404 when no such transaction exists.
pub async fn get_transaction_endpoint(
    State(state): State<AppState>,
    uri: Uri,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    match service::get_transaction(&state.transaction_store, transaction_id) {
        Ok(transaction) => (StatusCode::OK, Json(transaction)).into_response(),
        Err(error) => error.into_response_with_path(uri.path()),
    }
}
