//! Defines the endpoint for partially updating a transaction.

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};

use crate::{
    AppState,
    transaction::{TransactionId, UpdateTransactionRequest, service},
};

/// A route handler for partially updating the transaction with the given ID.
///
/// Only the fields present in the request body overwrite stored values; the
/// ID and any omitted field are preserved. Responds with 404 when no such
/// transaction exists and 400 when a supplied amount is not positive.
pub async fn update_transaction_endpoint(
    State(state): State<AppState>,
    uri: Uri,
    Path(transaction_id): Path<TransactionId>,
    Json(request): Json<UpdateTransactionRequest>,
) -> Response {
    match service::update_transaction(&state.transaction_store, transaction_id, request) {
        Ok(transaction) => (StatusCode::OK, Json(transaction)).into_response(),
        Err(error) => error.into_response_with_path(uri.path()),
    }
}
