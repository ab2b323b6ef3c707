//! Defines the endpoint for listing transactions with filtering and
//! pagination.

use axum::{
    Json,
    extract::{Query, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::{
    AppState, Error,
    transaction::{TransactionFilter, service},
};

/// The page number used when a request does not specify one.
const DEFAULT_PAGE: u64 = 0;
/// The page size used when a request does not specify one.
const DEFAULT_PAGE_SIZE: u64 = 20;

/// The query parameters accepted by the transaction listing.
///
/// `type` and the date bounds arrive as strings and are validated by the
/// handler so that a bad value produces the service's own validation error
/// rather than a generic deserialization failure.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTransactionsQuery {
    /// The zero-based page number. Defaults to 0.
    #[serde(default)]
    pub page: Option<u64>,
    /// The maximum number of records per page. Defaults to 20.
    #[serde(default)]
    pub size: Option<u64>,
    /// Keep only transactions of this type, e.g. "EXPENSE".
    #[serde(default, rename = "type")]
    pub transaction_type: Option<String>,
    /// The inclusive lower bound on the amount.
    #[serde(default)]
    pub min_amount: Option<Decimal>,
    /// The inclusive upper bound on the amount.
    #[serde(default)]
    pub max_amount: Option<Decimal>,
    /// The inclusive lower bound on the timestamp, RFC 3339 formatted.
    #[serde(default)]
    pub start_date: Option<String>,
    /// The inclusive upper bound on the timestamp, RFC 3339 formatted.
    #[serde(default)]
    pub end_date: Option<String>,
}

fn parse_query_date(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<OffsetDateTime>, Error> {
    value
        .map(|text| {
            OffsetDateTime::parse(text, &Rfc3339).map_err(|_| Error::InvalidTimestamp {
                field,
                value: text.to_owned(),
            })
        })
        .transpose()
}

/// A route handler for listing transactions.
///
/// Optional filters apply in order: type exact match, amount range
/// (inclusive), timestamp range (inclusive). The filtered results are then
/// paginated most recent first; a page past the end of the results is empty,
/// not an error.
pub async fn list_transactions_endpoint(
    State(state): State<AppState>,
    uri: Uri,
    Query(query): Query<ListTransactionsQuery>,
) -> Response {
    let listing = build_filter(&query).and_then(|filter| {
        service::list_transactions(
            &state.transaction_store,
            &filter,
            query.page.unwrap_or(DEFAULT_PAGE),
            query.size.unwrap_or(DEFAULT_PAGE_SIZE),
        )
    });

    match listing {
        Ok(transactions) => (StatusCode::OK, Json(transactions)).into_response(),
        Err(error) => error.into_response_with_path(uri.path()),
    }
}

fn build_filter(query: &ListTransactionsQuery) -> Result<TransactionFilter, Error> {
    let transaction_type = query
        .transaction_type
        .as_deref()
        .map(str::parse)
        .transpose()?;

    Ok(TransactionFilter {
        transaction_type,
        min_amount: query.min_amount,
        max_amount: query.max_amount,
        start_date: parse_query_date("startDate", query.start_date.as_deref())?,
        end_date: parse_query_date("endDate", query.end_date.as_deref())?,
    })
}
