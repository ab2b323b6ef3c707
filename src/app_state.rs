//! Implements a struct that holds the state of the REST server.

use time::Duration;

use crate::transaction::TransactionStore;

/// How far back the duplicate detection window reaches when no other length
/// is configured.
pub const DEFAULT_DUPLICATE_WINDOW: Duration = Duration::minutes(5);

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The in-memory store holding all transaction records.
    pub transaction_store: TransactionStore,

    /// How far back from "now" a matching transaction counts as a duplicate.
    ///
    /// Read-only after startup; the one tunable of the service.
    pub duplicate_window: Duration,
}

impl AppState {
    /// Create a new [AppState] with an empty transaction store.
    pub fn new(duplicate_window: Duration) -> Self {
        Self {
            transaction_store: TransactionStore::new(),
            duplicate_window,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DEFAULT_DUPLICATE_WINDOW)
    }
}
