//! Transactions module - the immutable transaction log and its sum type.

mod transactions_constants;
mod transactions_model;
mod transactions_traits;


pub use transactions_constants::*;
pub use transactions_model::{NewTransaction, Transaction, TransactionKind, TransactionType};
pub use transactions_traits::TransactionRepositoryTrait;
