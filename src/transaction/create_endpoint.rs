//! Defines the endpoint for creating a new transaction.

use axum::{
    Json,
    extract::State,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};

use crate::{
    AppState,
    transaction::{CreateTransactionRequest, service},
};

/// A route handler for creating a new transaction.
///
/// Responds with 201 and the created record on success, 400 when the amount
/// is missing or not positive, and 409 when the request matches an existing
/// transaction within the duplicate detection window.
pub async fn create_transaction_endpoint(
    State(state): State<AppState>,
    uri: Uri,
    Json(request): Json<CreateTransactionRequest>,
) -> Response {
    match service::create_transaction(&state.transaction_store, state.duplicate_window, request) {
        Ok(transaction) => (StatusCode::CREATED, Json(transaction)).into_response(),
        Err(error) => error.into_response_with_path(uri.path()),
    }
}

#[cfg(test)]
mod tests {
    use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
    use rust_decimal_macros::dec;

    use crate::{
        AppState, endpoints,
        transaction::{CreateTransactionRequest, TransactionType},
    };

    use super::create_transaction_endpoint;

    fn expense_request(amount: &str) -> CreateTransactionRequest {
        CreateTransactionRequest {
            amount: Some(amount.parse().unwrap()),
            description: "test transaction".to_owned(),
            transaction_type: TransactionType::Expense,
        }
    }

    #[tokio::test]
    async fn responds_with_created_and_persists_the_record() {
        let state = AppState::default();

        let response = create_transaction_endpoint(
            State(state.clone()),
            endpoints::TRANSACTIONS.parse().unwrap(),
            Json(expense_request("12.30")),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::CREATED);

        let stored = state.transaction_store.get(1).unwrap().unwrap();
        assert_eq!(stored.amount, dec!(12.30));
        assert_eq!(stored.description, "test transaction");
    }

    #[tokio::test]
    async fn responds_with_bad_request_for_negative_amount() {
        let state = AppState::default();

        let response = create_transaction_endpoint(
            State(state.clone()),
            endpoints::TRANSACTIONS.parse().unwrap(),
            Json(expense_request("-5.00")),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(state.transaction_store.count().unwrap(), 0);
    }

    #[tokio::test]
    async fn responds_with_conflict_for_duplicate_within_window() {
        let state = AppState::default();

        let first = create_transaction_endpoint(
            State(state.clone()),
            endpoints::TRANSACTIONS.parse().unwrap(),
            Json(expense_request("100.50")),
        )
        .await
        .into_response();
        assert_eq!(first.status(), StatusCode::CREATED);

        let second = create_transaction_endpoint(
            State(state.clone()),
            endpoints::TRANSACTIONS.parse().unwrap(),
            Json(expense_request("100.50")),
        )
        .await
        .into_response();

        assert_eq!(second.status(), StatusCode::CONFLICT);
        assert_eq!(state.transaction_store.count().unwrap(), 1);
    }
}
