use rust_decimal::Decimal;

use super::holdings_calculator::AppliedTransaction;
use super::holdings_model::Holding;
use crate::errors::Result;
use crate::transactions::NewTransaction;

/// Storage for holdings. Implementations must make `replace_holding`
/// atomic: readers see either the old holding with its lots or the new one.
pub trait HoldingRepositoryTrait: Send + Sync {
    /// Fails with `Error::HoldingNotFound` when the id is unknown.
    fn get_by_id(&self, holding_id: &str) -> Result<Holding>;
    fn find(&self, portfolio_id: &str, asset_id: &str) -> Result<Option<Holding>>;
    fn list(&self, portfolio_id: &str) -> Result<Vec<Holding>>;
    /// Inserts or replaces the holding, lots included, in one write.
    fn replace_holding(&self, holding: Holding) -> Result<Holding>;
    /// Removes the holding. Removing an unknown id is not an error.
    fn delete(&self, holding_id: &str) -> Result<()>;
}

pub trait HoldingsServiceTrait: Send + Sync {
    fn get_holdings(&self, portfolio_id: &str) -> Result<Vec<Holding>>;
    fn get_holding(&self, holding_id: &str) -> Result<Holding>;

    /// Validates and applies a new transaction, then stores the updated
    /// holding and appends the transaction to the log.
    ///
    /// A transaction dated before the latest logged one is applied by
    /// replaying the log, so the stored holding always equals
    /// `rebuild_holding`. The holding is written first; if that write fails
    /// the log is untouched, and if the append fails the previous holding is
    /// restored. Should the restore fail too, the error is logged and
    /// `rebuild_holding` brings the holding back in line with the log.
    fn record_transaction(&self, new_transaction: NewTransaction) -> Result<AppliedTransaction>;

    /// Recomputes a holding from the stored transaction log.
    fn rebuild_holding(&self, portfolio_id: &str, asset_id: &str) -> Result<Holding>;

    /// Re-prices the holding from its asset's current price.
    fn refresh_valuation(&self, holding_id: &str) -> Result<Holding>;

    fn set_ownership_percentage(&self, holding_id: &str, percentage: Decimal) -> Result<Holding>;
}
