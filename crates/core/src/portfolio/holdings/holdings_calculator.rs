use log::{debug, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result, ValidationError};
use crate::portfolio::holdings::holdings_model::Holding;
use crate::portfolio::lots::{
    consume_lots, CostBasisMethod, LotKind, SaleOutcome, SaleRequest, TaxLot,
};
use crate::tax::{bargain_element, rsu_net_shares};
use crate::transactions::{Transaction, TransactionKind};

/// Result of applying one transaction: the replacement holding and, for
/// sells, the consumption outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedTransaction {
    pub holding: Holding,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale: Option<SaleOutcome>,
}

/// Folds transactions into holdings.
///
/// The calculator never mutates the holding it is given. Each call builds
/// the next holding value, so a failed transaction leaves the previous one
/// intact and the caller decides whether to store the result.
#[derive(Debug, Clone, Copy, Default)]
pub struct HoldingsCalculator;

impl HoldingsCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Applies a single transaction to `holding` and returns the new holding.
    pub fn apply_transaction(
        &self,
        holding: &Holding,
        transaction: &Transaction,
    ) -> Result<AppliedTransaction> {
        if transaction.portfolio_id != holding.portfolio_id
            || transaction.asset_id != holding.asset_id
        {
            return Err(ValidationError::InvalidInput(format!(
                "Transaction {} ({}/{}) does not belong to holding {}",
                transaction.id, transaction.portfolio_id, transaction.asset_id, holding.id
            ))
            .into());
        }
        transaction.validate()?;

        let mut next = holding.clone();
        let mut sale = None;
        let previous_price = holding.implied_price();
        let mut mark_price = previous_price;
        let date = transaction.effective_date();

        match &transaction.kind {
            TransactionKind::Buy { quantity, price }
            | TransactionKind::TransferIn { quantity, price }
            | TransactionKind::Reinvestment { quantity, price } => {
                next.lots
                    .push(TaxLot::new(transaction.id.clone(), *quantity, *price, date));
                mark_price = Some(*price);
            }
            TransactionKind::EsppPurchase {
                quantity,
                purchase_price,
                market_price,
                grant_date,
                discount_percent,
            } => {
                let bargain = bargain_element(*market_price, *purchase_price, *quantity)?;
                let lot = TaxLot::new(transaction.id.clone(), *quantity, *purchase_price, date)
                    .with_kind(LotKind::Espp {
                        grant_date: *grant_date,
                        discount_percent: *discount_percent,
                        market_price_at_purchase: *market_price,
                        bargain_element: bargain.per_share,
                    });
                debug!(
                    "ESPP purchase {}: {} shares, bargain element {}",
                    transaction.id, quantity, bargain.total
                );
                next.lots.push(lot);
                mark_price = Some(*market_price);
            }
            TransactionKind::RsuVest {
                gross_shares,
                shares_withheld,
                vesting_price,
            } => {
                let vest = rsu_net_shares(*gross_shares, *shares_withheld, *vesting_price)?;
                if vest.net_shares.is_zero() {
                    warn!(
                        "RSU vest {} withheld all {} shares; no lot created",
                        transaction.id, gross_shares
                    );
                } else {
                    let lot = TaxLot::new(
                        transaction.id.clone(),
                        vest.net_shares,
                        vest.cost_basis_per_share,
                        date,
                    )
                    .with_kind(LotKind::Rsu {
                        vesting_date: date,
                        gross_shares: *gross_shares,
                        shares_withheld: *shares_withheld,
                    });
                    next.lots.push(lot);
                }
                mark_price = Some(*vesting_price);
            }
            TransactionKind::Sell {
                quantity,
                price,
                method,
            } => {
                let outcome = consume_lots(
                    &holding.id,
                    &holding.lots,
                    &SaleRequest {
                        quantity: *quantity,
                        price: *price,
                        date,
                        method: method.clone(),
                    },
                )?;
                next.lots = outcome.lots.clone();
                next.disposals.extend(outcome.disposals.iter().cloned());
                sale = Some(outcome);
                mark_price = Some(*price);
            }
            TransactionKind::TransferOut { quantity } => {
                // Moves shares out without a taxable disposal.
                let outcome = consume_lots(
                    &holding.id,
                    &holding.lots,
                    &SaleRequest {
                        quantity: *quantity,
                        price: Decimal::ZERO,
                        date,
                        method: CostBasisMethod::Fifo,
                    },
                )?;
                next.lots = outcome.lots;
            }
            TransactionKind::Split { ratio } => {
                debug!(
                    "Applying split ratio {} to {} lots of holding {}",
                    ratio,
                    next.lots.len(),
                    next.id
                );
                for lot in next.lots.iter_mut() {
                    lot.apply_split(*ratio);
                }
                mark_price = previous_price.map(|p| p / *ratio);
            }
            TransactionKind::Dividend { .. }
            | TransactionKind::Fee { .. }
            | TransactionKind::Tax { .. }
            | TransactionKind::Spinoff
            | TransactionKind::Merger => {
                debug!(
                    "Transaction {} ({}) recorded for holding {}; lots unchanged",
                    transaction.id,
                    transaction.transaction_type(),
                    holding.id
                );
            }
        }

        next.recalculate_aggregates();
        next.revalue(mark_price.unwrap_or(Decimal::ZERO));
        next.last_updated = transaction.date;

        Ok(AppliedTransaction {
            holding: next,
            sale,
        })
    }

    /// Rebuilds a holding from its full history, in date order.
    ///
    /// Stops at the first transaction that fails; no partial holding is returned.
    pub fn rebuild_holding(
        &self,
        portfolio_id: &str,
        asset_id: &str,
        transactions: &[Transaction],
    ) -> Result<Holding> {
        Ok(self
            .replay(portfolio_id, asset_id, transactions, None)?
            .holding)
    }

    /// Rebuilds a holding from `transactions` and returns it with the sale
    /// outcome of `transaction_id`. Used for transactions dated before the
    /// latest one already applied.
    pub fn replay_transaction(
        &self,
        portfolio_id: &str,
        asset_id: &str,
        transactions: &[Transaction],
        transaction_id: &str,
    ) -> Result<AppliedTransaction> {
        self.replay(portfolio_id, asset_id, transactions, Some(transaction_id))
    }

    fn replay(
        &self,
        portfolio_id: &str,
        asset_id: &str,
        transactions: &[Transaction],
        target: Option<&str>,
    ) -> Result<AppliedTransaction> {
        // Stable: same-instant transactions keep log order.
        let mut ordered: Vec<&Transaction> = transactions.iter().collect();
        ordered.sort_by_key(|tx| tx.date);

        let created_at = ordered.first().map(|tx| tx.date).ok_or_else(|| {
            Error::HoldingNotFound(format!(
                "No transactions for asset {} in portfolio {}",
                asset_id, portfolio_id
            ))
        })?;

        let mut holding = Holding::new(portfolio_id, asset_id, created_at);
        let mut sale = None;
        for transaction in ordered {
            let applied = self.apply_transaction(&holding, transaction)?;
            if target == Some(transaction.id.as_str()) {
                sale = applied.sale;
            }
            holding = applied.holding;
        }
        Ok(AppliedTransaction { holding, sale })
    }
}
