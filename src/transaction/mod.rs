//! Transaction records and everything that operates on them:
//!
//! - The [Transaction] model and the create/update request shapes
//! - The in-memory [TransactionStore] and its [IdGenerator]
//! - The [service] functions enforcing the business rules
//! - Route handlers for the transaction endpoints

mod count_endpoint;
mod create_endpoint;
mod delete_endpoint;
mod get_endpoint;
mod list_endpoint;
mod models;
pub mod service;
mod store;
mod update_endpoint;

pub use count_endpoint::get_transaction_count_endpoint;
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use get_endpoint::get_transaction_endpoint;
pub use list_endpoint::list_transactions_endpoint;
pub use models::{
    CreateTransactionRequest, Transaction, TransactionId, TransactionType,
    UpdateTransactionRequest,
};
pub use service::TransactionFilter;
pub use store::{IdGenerator, TransactionStore};
pub use update_endpoint::update_transaction_endpoint;
