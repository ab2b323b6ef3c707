//! Defines the app level error type and its conversion to JSON error responses.

use std::collections::BTreeMap;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::Serialize;
use time::OffsetDateTime;

use crate::transaction::{TransactionId, TransactionType};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A transaction amount was missing or not greater than zero.
    #[error("transaction amount must be greater than zero")]
    InvalidAmount(Option<Decimal>),

    /// A create request matched an existing transaction within the duplicate
    /// detection window.
    ///
    /// The message carries the amount, description, and type so that the
    /// caller can tell which input was rejected.
    #[error(
        "duplicate transaction detected: amount={amount}, description={description}, type={transaction_type}"
    )]
    DuplicateTransaction {
        /// The amount of the rejected create request.
        amount: Decimal,
        /// The description of the rejected create request.
        description: String,
        /// The type of the rejected create request.
        transaction_type: TransactionType,
    },

    /// The operation targeted a transaction ID that is not in the store.
    ///
    /// Clients should check that the ID is correct and that the transaction
    /// has not already been deleted.
    #[error("no transaction with ID {0}")]
    TransactionNotFound(TransactionId),

    /// A `type` query parameter did not name a valid transaction type.
    #[error("\"{0}\" is not a valid transaction type")]
    InvalidTransactionType(String),

    /// An amount range query had a minimum greater than its maximum.
    #[error("minimum amount {min} is greater than maximum amount {max}")]
    InvalidAmountRange {
        /// The lower bound of the rejected range.
        min: Decimal,
        /// The upper bound of the rejected range.
        max: Decimal,
    },

    /// A date range query had a start after its end.
    #[error("start date {start} is after end date {end}")]
    InvalidDateRange {
        /// The lower bound of the rejected range.
        start: OffsetDateTime,
        /// The upper bound of the rejected range.
        end: OffsetDateTime,
    },

    /// A pagination query asked for pages of size zero.
    #[error("page size must be greater than zero")]
    InvalidPageSize,

    /// A date query parameter could not be parsed as an RFC 3339 timestamp.
    #[error("could not parse {field} value \"{value}\" as an RFC 3339 date-time")]
    InvalidTimestamp {
        /// The name of the offending query parameter.
        field: &'static str,
        /// The value that failed to parse.
        value: String,
    },

    /// Could not acquire the transaction store lock.
    ///
    /// The error detail should only be logged on the server. Clients see a
    /// generic internal server error instead.
    #[error("could not acquire the transaction store lock")]
    StoreLock,
}

impl Error {
    /// The HTTP status code the error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::DuplicateTransaction { .. } => StatusCode::CONFLICT,
            Error::TransactionNotFound(_) => StatusCode::NOT_FOUND,
            Error::StoreLock => StatusCode::INTERNAL_SERVER_ERROR,
            Error::InvalidAmount(_)
            | Error::InvalidTransactionType(_)
            | Error::InvalidAmountRange { .. }
            | Error::InvalidDateRange { .. }
            | Error::InvalidPageSize
            | Error::InvalidTimestamp { .. } => StatusCode::BAD_REQUEST,
        }
    }

    /// The category label reported in the `error` field of the response body.
    fn error_label(&self) -> &'static str {
        match self {
            Error::InvalidAmount(_) => "Invalid Amount",
            Error::DuplicateTransaction { .. } => "Duplicate Transaction",
            Error::TransactionNotFound(_) => "Resource Not Found",
            Error::InvalidTransactionType(_) => "Invalid Type",
            Error::InvalidAmountRange { .. } => "Invalid Amount Range",
            Error::InvalidDateRange { .. } => "Invalid Date Range",
            Error::InvalidPageSize => "Invalid Size",
            Error::InvalidTimestamp { .. } => "Invalid Date",
            Error::StoreLock => "Internal Server Error",
        }
    }

    /// The field-to-message mapping included for validation failures.
    fn field_errors(&self) -> Option<BTreeMap<String, String>> {
        let (field, message) = match self {
            Error::InvalidAmount(_) => ("amount", self.to_string()),
            Error::InvalidTransactionType(_) => ("type", self.to_string()),
            Error::InvalidTimestamp { field, .. } => (*field, self.to_string()),
            _ => return None,
        };

        Some(BTreeMap::from([(field.to_owned(), message)]))
    }

    /// Convert the error into a JSON error response for a request to `path`.
    ///
    /// Internal faults are logged and replaced with a generic message so that
    /// no internal detail leaks to the caller.
    pub fn into_response_with_path(self, path: &str) -> Response {
        let status = self.status_code();

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("internal error while handling {path}: {self}");
            "An unexpected error occurred. Try again later or check the logs on the server."
                .to_owned()
        } else {
            self.to_string()
        };

        let body = ErrorBody {
            status: status.as_u16(),
            error: self.error_label(),
            message,
            path: path.to_owned(),
            timestamp: OffsetDateTime::now_utc(),
            field_errors: self.field_errors(),
        };

        (status, Json(body)).into_response()
    }
}

/// The JSON body returned for all error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// The HTTP status code, repeated in the body.
    pub status: u16,
    /// A short category label, e.g. "Duplicate Transaction".
    pub error: &'static str,
    /// A human-readable description of what went wrong.
    pub message: String,
    /// The path of the request that failed.
    pub path: String,
    /// When the error response was produced.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    /// A field-to-message mapping, present for validation failures only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<BTreeMap<String, String>>,
}
