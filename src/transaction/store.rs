//! The in-memory transaction store.
//!
//! The store owns the authoritative map of transaction ID to transaction and
//! is the only place records live. All operations are safe to call from
//! concurrent requests: each save or delete is a single atomic map operation,
//! and reads work on snapshot copies. There is deliberately no atomicity
//! across a read-then-write sequence spanning two calls.

use std::{
    collections::HashMap,
    sync::{
        Arc, RwLock, RwLockReadGuard, RwLockWriteGuard,
        atomic::{AtomicI64, Ordering},
    },
};

use rust_decimal::Decimal;
use time::{Duration, OffsetDateTime};

use crate::{
    Error,
    transaction::{Transaction, TransactionId, TransactionType},
};

/// Hands out unique, monotonically increasing transaction IDs.
///
/// IDs are never reused, even after the transaction they were assigned to is
/// deleted. The generator is owned by the store but can be constructed with
/// an explicit starting ID so that tests can pin down the IDs they expect.
#[derive(Debug)]
pub struct IdGenerator {
    next_id: AtomicI64,
}

impl IdGenerator {
    /// Create a generator whose first handed-out ID is `first_id`.
    pub fn new(first_id: TransactionId) -> Self {
        Self {
            next_id: AtomicI64::new(first_id),
        }
    }

    /// Take the next ID. Each call returns a strictly greater ID than the last.
    pub fn next_id(&self) -> TransactionId {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Thread-safe storage and retrieval of [Transaction] records.
///
/// Cloning the store produces another handle to the same underlying map, so
/// it can be shared freely across request handlers.
///
/// The store trusts its caller on business rules: it does not re-validate
/// amounts. Validation lives in [crate::transaction::service].
#[derive(Debug, Clone)]
pub struct TransactionStore {
    transactions: Arc<RwLock<HashMap<TransactionId, Transaction>>>,
    id_generator: Arc<IdGenerator>,
}

impl TransactionStore {
    /// Create an empty store whose IDs start at 1.
    pub fn new() -> Self {
        Self::with_id_generator(IdGenerator::default())
    }

    /// Create an empty store that assigns IDs from `id_generator`.
    pub fn with_id_generator(id_generator: IdGenerator) -> Self {
        Self {
            transactions: Arc::new(RwLock::new(HashMap::new())),
            id_generator: Arc::new(id_generator),
        }
    }

    /// Take the next unique transaction ID.
    pub fn next_id(&self) -> TransactionId {
        self.id_generator.next_id()
    }

    fn read_lock(
        &self,
    ) -> Result<RwLockReadGuard<'_, HashMap<TransactionId, Transaction>>, Error> {
        self.transactions.read().map_err(|_| Error::StoreLock)
    }

    fn write_lock(
        &self,
    ) -> Result<RwLockWriteGuard<'_, HashMap<TransactionId, Transaction>>, Error> {
        self.transactions.write().map_err(|_| Error::StoreLock)
    }

    /// Insert or overwrite the record keyed by its ID, returning the record.
    ///
    /// Saving again with the same ID replaces the prior field values.
    pub fn save(&self, transaction: Transaction) -> Result<Transaction, Error> {
        self.write_lock()?
            .insert(transaction.id, transaction.clone());

        Ok(transaction)
    }

    /// Retrieve the record with `id`, or `None` if there is no such record.
    pub fn get(&self, id: TransactionId) -> Result<Option<Transaction>, Error> {
        Ok(self.read_lock()?.get(&id).cloned())
    }

    /// A snapshot copy of all current records, in no particular order.
    pub fn get_all(&self) -> Result<Vec<Transaction>, Error> {
        Ok(self.read_lock()?.values().cloned().collect())
    }

    /// Remove the record with `id`, reporting whether a removal occurred.
    ///
    /// Absence is signalled through the returned `bool`, not an error.
    pub fn delete(&self, id: TransactionId) -> Result<bool, Error> {
        Ok(self.write_lock()?.remove(&id).is_some())
    }

    /// All records whose type equals `transaction_type`.
    pub fn get_by_type(
        &self,
        transaction_type: TransactionType,
    ) -> Result<Vec<Transaction>, Error> {
        Ok(self
            .read_lock()?
            .values()
            .filter(|transaction| transaction.transaction_type == transaction_type)
            .cloned()
            .collect())
    }

    /// All records whose amount lies within the inclusive bounds.
    ///
    /// Either bound may be `None`, meaning no restriction on that side.
    pub fn get_by_amount_range(
        &self,
        min_amount: Option<Decimal>,
        max_amount: Option<Decimal>,
    ) -> Result<Vec<Transaction>, Error> {
        Ok(self
            .read_lock()?
            .values()
            .filter(|transaction| {
                min_amount.is_none_or(|min| transaction.amount >= min)
                    && max_amount.is_none_or(|max| transaction.amount <= max)
            })
            .cloned()
            .collect())
    }

    /// All records whose timestamp lies within the inclusive bounds.
    ///
    /// Either bound may be `None`, meaning no restriction on that side.
    pub fn get_by_date_range(
        &self,
        start_date: Option<OffsetDateTime>,
        end_date: Option<OffsetDateTime>,
    ) -> Result<Vec<Transaction>, Error> {
        Ok(self
            .read_lock()?
            .values()
            .filter(|transaction| {
                start_date.is_none_or(|start| transaction.timestamp >= start)
                    && end_date.is_none_or(|end| transaction.timestamp <= end)
            })
            .cloned()
            .collect())
    }

    /// Up to `limit` records starting at `offset`, most recent first.
    ///
    /// Records are sorted by timestamp descending before the offset is
    /// applied. An offset past the end of the records yields an empty list.
    pub fn get_page(&self, offset: u64, limit: u64) -> Result<Vec<Transaction>, Error> {
        let mut transactions: Vec<Transaction> = self.read_lock()?.values().cloned().collect();
        transactions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        Ok(transactions
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    /// The total number of stored records.
    pub fn count(&self) -> Result<u64, Error> {
        Ok(self.read_lock()?.len() as u64)
    }

    /// Records that look like duplicates of the given create input.
    ///
    /// A record matches when its amount equals `amount` by decimal value
    /// (100.50 matches 100.500), its description equals `description`
    /// exactly (including case), its type equals `transaction_type`, and its
    /// timestamp falls within `[now - window, now]` inclusive. The window is
    /// anchored at call time, so a record older than the window can never
    /// match no matter how large the window is.
    pub fn find_potential_duplicates(
        &self,
        amount: Decimal,
        description: &str,
        transaction_type: TransactionType,
        window: Duration,
    ) -> Result<Vec<Transaction>, Error> {
        let now = OffsetDateTime::now_utc();
        let window_start = now - window;

        Ok(self
            .read_lock()?
            .values()
            .filter(|transaction| {
                transaction.amount == amount
                    && transaction.description == description
                    && transaction.transaction_type == transaction_type
                    && transaction.timestamp >= window_start
                    && transaction.timestamp <= now
            })
            .cloned()
            .collect())
    }
}

impl Default for TransactionStore {
    fn default() -> Self {
        Self::new()
    }
}


#[cfg(test)]
mod store_tests {
    use std::thread;

    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use time::{Duration, OffsetDateTime, macros::datetime};

    use crate::transaction::{Transaction, TransactionType};

    use super::{IdGenerator, TransactionStore};

    fn transaction(
        store: &TransactionStore,
        amount: Decimal,
        description: &str,
        transaction_type: TransactionType,
        timestamp: OffsetDateTime,
    ) -> Transaction {
        Transaction {
            id: store.next_id(),
            amount,
            description: description.to_owned(),
            transaction_type,
            timestamp,
        }
    }

    fn save_expense(store: &TransactionStore, amount: Decimal, description: &str) -> Transaction {
        let record = transaction(
            store,
            amount,
            description,
            TransactionType::Expense,
            OffsetDateTime::now_utc(),
        );

        store.save(record).unwrap()
    }

    #[test]
    fn ids_are_monotonic_and_not_reused_after_delete() {
        let store = TransactionStore::new();

        let first = save_expense(&store, dec!(1.00), "first");
        let second = save_expense(&store, dec!(2.00), "second");
        assert!(second.id > first.id);

        assert!(store.delete(second.id).unwrap());
        let third = save_expense(&store, dec!(3.00), "third");

        assert!(third.id > second.id);
    }

    #[test]
    fn get_returns_saved_record_and_none_after_delete() {
        let store = TransactionStore::new();
        let saved = save_expense(&store, dec!(12.30), "groceries");

        assert_eq!(store.get(saved.id).unwrap(), Some(saved.clone()));

        assert!(store.delete(saved.id).unwrap());
        assert_eq!(store.get(saved.id).unwrap(), None);
    }

    #[test]
    fn delete_reports_false_for_missing_id() {
        let store = TransactionStore::new();

        assert!(!store.delete(999).unwrap());
    }

    #[test]
    fn save_with_same_id_replaces_fields() {
        let store = TransactionStore::new();
        let saved = save_expense(&store, dec!(10.00), "draft");

        let updated = Transaction {
            description: "final".to_owned(),
            ..saved.clone()
        };
        store.save(updated.clone()).unwrap();

        assert_eq!(store.get(saved.id).unwrap(), Some(updated));
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn get_by_type_only_returns_matching_records() {
        let store = TransactionStore::new();
        let now = OffsetDateTime::now_utc();
        let income = store
            .save(transaction(
                &store,
                dec!(500.00),
                "salary",
                TransactionType::Income,
                now,
            ))
            .unwrap();
        save_expense(&store, dec!(20.00), "lunch");

        let got = store.get_by_type(TransactionType::Income).unwrap();

        assert_eq!(got, vec![income]);
    }

    #[test]
    fn amount_range_is_inclusive_and_bounds_are_optional() {
        let store = TransactionStore::new();
        save_expense(&store, dec!(5.00), "five");
        save_expense(&store, dec!(10.00), "ten");
        save_expense(&store, dec!(15.00), "fifteen");

        let got = store
            .get_by_amount_range(Some(dec!(5.00)), Some(dec!(10.00)))
            .unwrap();
        assert_eq!(got.len(), 2);
        assert!(
            got.iter()
                .all(|t| t.amount >= dec!(5.00) && t.amount <= dec!(10.00))
        );

        let no_min = store.get_by_amount_range(None, Some(dec!(10.00))).unwrap();
        assert_eq!(no_min.len(), 2);

        let unbounded = store.get_by_amount_range(None, None).unwrap();
        assert_eq!(unbounded.len(), 3);
    }

    #[test]
    fn date_range_is_inclusive_on_both_ends() {
        let store = TransactionStore::new();
        let make = |timestamp| {
            store
                .save(transaction(
                    &store,
                    dec!(1.00),
                    "t",
                    TransactionType::Expense,
                    timestamp,
                ))
                .unwrap()
        };
        make(datetime!(2024-06-01 00:00 UTC));
        make(datetime!(2024-06-15 00:00 UTC));
        make(datetime!(2024-06-30 00:00 UTC));

        let got = store
            .get_by_date_range(
                Some(datetime!(2024-06-01 00:00 UTC)),
                Some(datetime!(2024-06-15 00:00 UTC)),
            )
            .unwrap();

        assert_eq!(got.len(), 2);
    }

    #[test]
    fn pages_are_sorted_most_recent_first() {
        let store = TransactionStore::new();
        let base = datetime!(2024-06-01 00:00 UTC);
        for hours in 0..5 {
            store
                .save(transaction(
                    &store,
                    dec!(1.00),
                    "t",
                    TransactionType::Expense,
                    base + Duration::hours(hours),
                ))
                .unwrap();
        }

        let page = store.get_page(0, 5).unwrap();

        let timestamps: Vec<_> = page.iter().map(|t| t.timestamp).collect();
        let mut sorted = timestamps.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(timestamps, sorted);
    }

    #[test]
    fn pages_cover_every_record_exactly_once() {
        let store = TransactionStore::new();
        let base = datetime!(2024-06-01 00:00 UTC);
        for hours in 0..6 {
            store
                .save(transaction(
                    &store,
                    dec!(1.00),
                    "t",
                    TransactionType::Expense,
                    base + Duration::hours(hours),
                ))
                .unwrap();
        }

        let mut seen = Vec::new();
        for page in 0..3 {
            seen.extend(store.get_page(page * 2, 2).unwrap());
        }

        seen.sort_by_key(|t| t.id);
        seen.dedup_by_key(|t| t.id);
        assert_eq!(seen.len(), 6);
    }

    #[test]
    fn page_offset_past_the_end_is_empty() {
        let store = TransactionStore::new();
        save_expense(&store, dec!(1.00), "only");

        assert!(store.get_page(5, 10).unwrap().is_empty());
    }

    #[test]
    fn duplicates_match_on_decimal_value_not_representation() {
        let store = TransactionStore::new();
        save_expense(&store, dec!(100.50), "lunch");

        let got = store
            .find_potential_duplicates(
                dec!(100.500),
                "lunch",
                TransactionType::Expense,
                Duration::minutes(5),
            )
            .unwrap();

        assert_eq!(got.len(), 1);
    }

    #[test]
    fn duplicates_are_case_sensitive_on_description() {
        let store = TransactionStore::new();
        save_expense(&store, dec!(100.50), "lunch");

        let got = store
            .find_potential_duplicates(
                dec!(100.50),
                "Lunch",
                TransactionType::Expense,
                Duration::minutes(5),
            )
            .unwrap();

        assert!(got.is_empty());
    }

    #[test]
    fn duplicates_require_exact_amount_and_type() {
        let store = TransactionStore::new();
        save_expense(&store, dec!(100.50), "lunch");

        let different_amount = store
            .find_potential_duplicates(
                dec!(100.51),
                "lunch",
                TransactionType::Expense,
                Duration::minutes(5),
            )
            .unwrap();
        assert!(different_amount.is_empty());

        let different_type = store
            .find_potential_duplicates(
                dec!(100.50),
                "lunch",
                TransactionType::Transfer,
                Duration::minutes(5),
            )
            .unwrap();
        assert!(different_type.is_empty());
    }

    #[test]
    fn records_older_than_the_window_never_match() {
        let store = TransactionStore::new();
        let record = transaction(
            &store,
            dec!(100.50),
            "lunch",
            TransactionType::Expense,
            OffsetDateTime::now_utc() - Duration::minutes(10),
        );
        store.save(record).unwrap();

        let got = store
            .find_potential_duplicates(
                dec!(100.50),
                "lunch",
                TransactionType::Expense,
                Duration::minutes(5),
            )
            .unwrap();

        assert!(got.is_empty());
    }

    #[test]
    fn concurrent_saves_assign_distinct_ids() {
        let store = TransactionStore::with_id_generator(IdGenerator::new(1));

        thread::scope(|scope| {
            for _ in 0..8 {
                let store = store.clone();
                scope.spawn(move || {
                    for _ in 0..50 {
                        let record = transaction(
                            &store,
                            dec!(1.00),
                            "concurrent",
                            TransactionType::Expense,
                            OffsetDateTime::now_utc(),
                        );
                        store.save(record).unwrap();
                    }
                });
            }
        });

        assert_eq!(store.count().unwrap(), 400);
    }
}
