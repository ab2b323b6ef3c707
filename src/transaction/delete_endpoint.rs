//! Defines the endpoint for deleting a transaction.

use axum::{
    extract::{Path, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};

use crate::{
    AppState,
    transaction::{TransactionId, service},
};

/// A route handler for deleting the transaction with the given ID.
///
/// Responds with 204 on success and 404 when no such transaction exists.
pub async fn delete_transaction_endpoint(
    State(state): State<AppState>,
    uri: Uri,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    match service::delete_transaction(&state.transaction_store, transaction_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error.into_response_with_path(uri.path()),
    }
}
