//! The transaction record and the request shapes for creating and updating one.

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::Error;

/// Alias for the integer type used for transaction IDs.
pub type TransactionId = i64;

/// The category of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    /// Money coming in, e.g. a salary payment.
    Income,
    /// Money going out, e.g. a grocery shop.
    Expense,
    /// Money moved between accounts.
    Transfer,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionType::Income => "INCOME",
            TransactionType::Expense => "EXPENSE",
            TransactionType::Transfer => "TRANSFER",
        };

        write!(f, "{label}")
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "INCOME" => Ok(TransactionType::Income),
            "EXPENSE" => Ok(TransactionType::Expense),
            "TRANSFER" => Ok(TransactionType::Transfer),
            _ => Err(Error::InvalidTransactionType(text.to_owned())),
        }
    }
}

/// A financial transaction record.
///
/// Records are flat: an amount, a free-text description, a type, and the
/// time the record was created. Identity is defined by `id` alone, which the
/// store assigns once at creation and never reuses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The unique ID of the transaction.
    pub id: TransactionId,
    /// The value of the transaction. Always greater than zero for records
    /// accepted into the store.
    pub amount: Decimal,
    /// Free text detailing the transaction. May be empty.
    pub description: String,
    /// The category of the transaction.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// When the transaction was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

/// The request body for creating a transaction.
///
/// `amount` is optional so that a missing amount surfaces as
/// [Error::InvalidAmount] rather than a generic deserialization failure.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTransactionRequest {
    /// The value of the transaction. Must be greater than zero.
    pub amount: Option<Decimal>,
    /// Free text detailing the transaction.
    #[serde(default)]
    pub description: String,
    /// The category of the transaction.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
}

/// The request body for partially updating a transaction.
///
/// Each field is an explicit presence marker: `None` means "leave the stored
/// value unchanged", never "clear it". The ID of a transaction cannot be
/// changed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTransactionRequest {
    /// Replaces the stored amount when present. Must be greater than zero.
    pub amount: Option<Decimal>,
    /// Replaces the stored description when present.
    pub description: Option<String>,
    /// Replaces the stored type when present.
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,
}
