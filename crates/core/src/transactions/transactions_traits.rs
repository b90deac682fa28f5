use crate::errors::Result;
use crate::transactions::Transaction;

/// Append-only transaction log.
pub trait TransactionRepositoryTrait: Send + Sync {
    fn append(&self, transaction: Transaction) -> Result<()>;
    /// All transactions for one asset in one portfolio, in insertion order.
    fn list_for_asset(&self, portfolio_id: &str, asset_id: &str) -> Result<Vec<Transaction>>;
}
