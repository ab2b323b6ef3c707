//! Business rules for transactions.
//!
//! These functions are the only writers to the [TransactionStore]: they
//! validate input, run duplicate detection, and translate request shapes
//! into stored records. All validation happens before any store mutation,
//! so a rejected request never leaves a partial write behind.

use rust_decimal::Decimal;
use time::{Duration, OffsetDateTime};

use crate::{
    Error,
    transaction::{
        CreateTransactionRequest, Transaction, TransactionId, TransactionStore, TransactionType,
        UpdateTransactionRequest,
    },
};

/// Validate a create request and persist a new transaction.
///
/// The amount must be present and greater than zero. A request that matches
/// an existing record (same amount by decimal value, same description
/// including case, same type) with a timestamp within the trailing
/// `duplicate_window` is rejected as a duplicate.
///
/// Note that the duplicate check and the save are two separate store calls,
/// so two identical concurrent creates can both pass the check and both
/// succeed. Duplicate detection is a heuristic, not an exactness guarantee.
pub fn create_transaction(
    store: &TransactionStore,
    duplicate_window: Duration,
    request: CreateTransactionRequest,
) -> Result<Transaction, Error> {
    let amount = match request.amount {
        Some(amount) if amount > Decimal::ZERO => amount,
        other => return Err(Error::InvalidAmount(other)),
    };

    let duplicates = store.find_potential_duplicates(
        amount,
        &request.description,
        request.transaction_type,
        duplicate_window,
    )?;

    if !duplicates.is_empty() {
        return Err(Error::DuplicateTransaction {
            amount,
            description: request.description,
            transaction_type: request.transaction_type,
        });
    }

    store.save(Transaction {
        id: store.next_id(),
        amount,
        description: request.description,
        transaction_type: request.transaction_type,
        timestamp: OffsetDateTime::now_utc(),
    })
}

/// All transactions, unfiltered, in no particular order.
pub fn get_all_transactions(store: &TransactionStore) -> Result<Vec<Transaction>, Error> {
    store.get_all()
}

/// The transaction with `id`.
///
/// # Errors
///
/// Returns [Error::TransactionNotFound] when no such transaction exists.
pub fn get_transaction(
    store: &TransactionStore,
    id: TransactionId,
) -> Result<Transaction, Error> {
    store.get(id)?.ok_or(Error::TransactionNotFound(id))
}

/// Apply a partial update to the transaction with `id`.
///
/// Only the fields present in `request` overwrite stored values; the ID and
/// any omitted field are preserved. A present amount must be greater than
/// zero.
pub fn update_transaction(
    store: &TransactionStore,
    id: TransactionId,
    request: UpdateTransactionRequest,
) -> Result<Transaction, Error> {
    if let Some(amount) = request.amount
        && amount <= Decimal::ZERO
    {
        return Err(Error::InvalidAmount(Some(amount)));
    }

    let mut transaction = get_transaction(store, id)?;

    if let Some(amount) = request.amount {
        transaction.amount = amount;
    }
    if let Some(description) = request.description {
        transaction.description = description;
    }
    if let Some(transaction_type) = request.transaction_type {
        transaction.transaction_type = transaction_type;
    }

    store.save(transaction)
}

/// Delete the transaction with `id`.
///
/// # Errors
///
/// Returns [Error::TransactionNotFound] when the store reports that no
/// removal occurred.
pub fn delete_transaction(store: &TransactionStore, id: TransactionId) -> Result<(), Error> {
    match store.delete(id)? {
        true => Ok(()),
        false => Err(Error::TransactionNotFound(id)),
    }
}

/// All transactions of the given type.
pub fn get_transactions_by_type(
    store: &TransactionStore,
    transaction_type: TransactionType,
) -> Result<Vec<Transaction>, Error> {
    store.get_by_type(transaction_type)
}

/// All transactions with an amount within the inclusive bounds.
///
/// # Errors
///
/// Returns [Error::InvalidAmountRange] when both bounds are given and the
/// minimum exceeds the maximum.
pub fn get_transactions_by_amount_range(
    store: &TransactionStore,
    min_amount: Option<Decimal>,
    max_amount: Option<Decimal>,
) -> Result<Vec<Transaction>, Error> {
    if let (Some(min), Some(max)) = (min_amount, max_amount)
        && min > max
    {
        return Err(Error::InvalidAmountRange { min, max });
    }

    store.get_by_amount_range(min_amount, max_amount)
}

/// All transactions with a timestamp within the inclusive bounds.
///
/// # Errors
///
/// Returns [Error::InvalidDateRange] when both bounds are given and the
/// start is after the end.
pub fn get_transactions_by_date_range(
    store: &TransactionStore,
    start_date: Option<OffsetDateTime>,
    end_date: Option<OffsetDateTime>,
) -> Result<Vec<Transaction>, Error> {
    if let (Some(start), Some(end)) = (start_date, end_date)
        && start > end
    {
        return Err(Error::InvalidDateRange { start, end });
    }

    store.get_by_date_range(start_date, end_date)
}

/// The page of transactions at `page` (zero-based) with up to `size` records,
/// most recent first.
///
/// # Errors
///
/// Returns [Error::InvalidPageSize] when `size` is zero.
pub fn get_transactions_with_pagination(
    store: &TransactionStore,
    page: u64,
    size: u64,
) -> Result<Vec<Transaction>, Error> {
    if size == 0 {
        return Err(Error::InvalidPageSize);
    }

    store.get_page(page.saturating_mul(size), size)
}

/// The total number of stored transactions.
pub fn transaction_count(store: &TransactionStore) -> Result<u64, Error> {
    store.count()
}

/// The optional predicates a transaction listing can be narrowed by.
#[derive(Debug, Default, Clone)]
pub struct TransactionFilter {
    /// Keep only transactions of this type.
    pub transaction_type: Option<TransactionType>,
    /// Keep only transactions with an amount of at least this value.
    pub min_amount: Option<Decimal>,
    /// Keep only transactions with an amount of at most this value.
    pub max_amount: Option<Decimal>,
    /// Keep only transactions recorded at or after this time.
    pub start_date: Option<OffsetDateTime>,
    /// Keep only transactions recorded at or before this time.
    pub end_date: Option<OffsetDateTime>,
}

/// List transactions for the GET collection endpoint.
///
/// Filters apply in order over the full unfiltered listing: type, then
/// amount range (inclusive), then date range (inclusive). Pagination then
/// slices the filtered list sorted most recent first; a page past the end of
/// the results is empty, not an error.
pub fn list_transactions(
    store: &TransactionStore,
    filter: &TransactionFilter,
    page: u64,
    size: u64,
) -> Result<Vec<Transaction>, Error> {
    if let (Some(min), Some(max)) = (filter.min_amount, filter.max_amount)
        && min > max
    {
        return Err(Error::InvalidAmountRange { min, max });
    }
    if let (Some(start), Some(end)) = (filter.start_date, filter.end_date)
        && start > end
    {
        return Err(Error::InvalidDateRange { start, end });
    }
    if size == 0 {
        return Err(Error::InvalidPageSize);
    }

    let mut transactions: Vec<Transaction> = get_all_transactions(store)?
        .into_iter()
        .filter(|transaction| {
            filter
                .transaction_type
                .is_none_or(|t| transaction.transaction_type == t)
        })
        .filter(|transaction| {
            filter.min_amount.is_none_or(|min| transaction.amount >= min)
                && filter.max_amount.is_none_or(|max| transaction.amount <= max)
        })
        .filter(|transaction| {
            filter
                .start_date
                .is_none_or(|start| transaction.timestamp >= start)
                && filter.end_date.is_none_or(|end| transaction.timestamp <= end)
        })
        .collect();

    transactions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    Ok(transactions
        .into_iter()
        .skip(page.saturating_mul(size) as usize)
        .take(size as usize)
        .collect())
}
