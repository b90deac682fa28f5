use chrono::Utc;
use log::{debug, error, warn};
use rust_decimal::Decimal;
use std::sync::Arc;

use super::holdings_calculator::{AppliedTransaction, HoldingsCalculator};
use super::holdings_model::{validate_ownership_percentage, Holding};
use super::holdings_traits::{HoldingRepositoryTrait, HoldingsServiceTrait};
use crate::assets::AssetServiceTrait;
use crate::errors::{Error, Result};
use crate::transactions::{creates_lot, NewTransaction, TransactionRepositoryTrait};

pub struct HoldingsService {
    holding_repository: Arc<dyn HoldingRepositoryTrait>,
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    asset_service: Arc<dyn AssetServiceTrait>,
    calculator: HoldingsCalculator,
}

impl HoldingsService {
    pub fn new(
        holding_repository: Arc<dyn HoldingRepositoryTrait>,
        transaction_repository: Arc<dyn TransactionRepositoryTrait>,
        asset_service: Arc<dyn AssetServiceTrait>,
    ) -> Self {
        Self {
            holding_repository,
            transaction_repository,
            asset_service,
            calculator: HoldingsCalculator::new(),
        }
    }

    /// Marks the holding to its asset's stored price, when there is one.
    fn mark_to_asset_price(&self, holding: &mut Holding) -> Result<()> {
        let asset = self.asset_service.get_asset_by_id(&holding.asset_id)?;
        match asset.current_price {
            Some(price) => holding.revalue(price),
            None => debug!(
                "Asset {} has no current price; holding {} keeps its last valuation",
                asset.symbol, holding.id
            ),
        }
        Ok(())
    }

    /// Puts back the holding as it was before a write whose log append failed.
    fn restore_holding(&self, previous: Option<Holding>, holding_id: &str) {
        let restored = match previous {
            Some(holding) => self.holding_repository.replace_holding(holding).map(|_| ()),
            None => self.holding_repository.delete(holding_id),
        };
        if let Err(err) = restored {
            error!(
                "Failed to restore holding {} after log append failed: {}. Rebuild it to resync.",
                holding_id, err
            );
        }
    }
}

impl HoldingsServiceTrait for HoldingsService {
    fn get_holdings(&self, portfolio_id: &str) -> Result<Vec<Holding>> {
        self.holding_repository.list(portfolio_id)
    }

    fn get_holding(&self, holding_id: &str) -> Result<Holding> {
        self.holding_repository.get_by_id(holding_id)
    }

    fn record_transaction(&self, new_transaction: NewTransaction) -> Result<AppliedTransaction> {
        let transaction = new_transaction.into_transaction()?;
        let portfolio_id = transaction.portfolio_id.clone();
        let asset_id = transaction.asset_id.clone();
        // Unknown assets fail here, before anything is written.
        self.asset_service.get_asset_by_id(&asset_id)?;

        let previous = self.holding_repository.find(&portfolio_id, &asset_id)?;
        if previous.is_none() && !creates_lot(transaction.transaction_type().as_str()) {
            return Err(Error::HoldingNotFound(Holding::holding_id(
                &portfolio_id,
                &asset_id,
            )));
        }

        let history = self
            .transaction_repository
            .list_for_asset(&portfolio_id, &asset_id)?;
        let mut applied = if history.iter().any(|logged| logged.date > transaction.date) {
            // Backdated: replay the whole log so the result equals a rebuild.
            debug!(
                "Transaction {} predates the latest logged one; replaying {} transactions",
                transaction.id,
                history.len() + 1
            );
            let mut replayed = history;
            replayed.push(transaction.clone());
            let mut applied = self.calculator.replay_transaction(
                &portfolio_id,
                &asset_id,
                &replayed,
                &transaction.id,
            )?;
            if let Some(existing) = &previous {
                applied.holding.ownership_percentage = existing.ownership_percentage;
            }
            applied
        } else {
            let current = match &previous {
                Some(holding) => holding.clone(),
                None => Holding::new(&portfolio_id, &asset_id, transaction.date),
            };
            self.calculator.apply_transaction(&current, &transaction)?
        };
        self.mark_to_asset_price(&mut applied.holding)?;

        debug!(
            "Recording {} {} for holding {}",
            transaction.transaction_type(),
            transaction.id,
            applied.holding.id
        );
        // Holding first: a failed write leaves the log untouched.
        let stored = self.holding_repository.replace_holding(applied.holding)?;
        if let Err(err) = self.transaction_repository.append(transaction) {
            self.restore_holding(previous, &stored.id);
            return Err(err);
        }
        applied.holding = stored;
        Ok(applied)
    }

    fn rebuild_holding(&self, portfolio_id: &str, asset_id: &str) -> Result<Holding> {
        let transactions = self
            .transaction_repository
            .list_for_asset(portfolio_id, asset_id)?;
        let mut holding = self
            .calculator
            .rebuild_holding(portfolio_id, asset_id, &transactions)?;

        // Ownership is holding metadata, not transaction history.
        if let Some(existing) = self.holding_repository.find(portfolio_id, asset_id)? {
            holding.ownership_percentage = existing.ownership_percentage;
        }
        self.mark_to_asset_price(&mut holding)?;
        self.holding_repository.replace_holding(holding)
    }

    fn refresh_valuation(&self, holding_id: &str) -> Result<Holding> {
        let mut holding = self.holding_repository.get_by_id(holding_id)?;
        self.mark_to_asset_price(&mut holding)?;
        holding.last_updated = Utc::now();
        self.holding_repository.replace_holding(holding)
    }

    fn set_ownership_percentage(&self, holding_id: &str, percentage: Decimal) -> Result<Holding> {
        validate_ownership_percentage(percentage)?;
        let mut holding = self.holding_repository.get_by_id(holding_id)?;
        if percentage.is_zero() {
            warn!("Holding {} set to zero ownership", holding_id);
        }
        holding.ownership_percentage = percentage;
        holding.last_updated = Utc::now();
        self.holding_repository.replace_holding(holding)
    }
}
