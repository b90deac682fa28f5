use chrono::{DateTime, NaiveDate, Utc};
use log::warn;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{FULL_OWNERSHIP_PCT, QUANTITY_THRESHOLD};
use crate::errors::{Result, ValidationError};
use crate::portfolio::lots::{LotDisposal, TaxLot};
use crate::tax::{classify_mixed, HoldingPeriod};

pub fn is_quantity_significant(quantity: &Decimal) -> bool {
    let threshold =
        Decimal::from_str_radix(QUANTITY_THRESHOLD, 10).unwrap_or_else(|_| Decimal::new(1, 8));
    quantity.abs() >= threshold
}

fn default_ownership_percentage() -> Decimal {
    Decimal::from(FULL_OWNERSHIP_PCT)
}

/// Aggregate position in one asset within one portfolio.
///
/// Every aggregate field is derived from `lots` (and `disposals` for the
/// realized gain) by `recalculate_aggregates`; nothing here is hand-edited.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub id: String,
    pub portfolio_id: String,
    pub asset_id: String,

    /// Sum of lot remaining quantities.
    pub quantity: Decimal,
    /// Sum of remaining quantity × purchase price over all lots.
    pub cost_basis: Decimal,
    pub average_cost: Decimal,

    // Valuation at the last known price, gross of ownership
    pub current_value: Decimal,
    pub unrealized_gain: Decimal,
    pub unrealized_gain_pct: Decimal,

    /// Share of the asset owned, 0-100. Fractional real estate uses < 100.
    #[serde(default = "default_ownership_percentage")]
    pub ownership_percentage: Decimal,

    #[serde(default)]
    pub lots: Vec<TaxLot>,
    #[serde(default)]
    pub disposals: Vec<LotDisposal>,
    #[serde(default)]
    pub realized_gain: Decimal,

    pub last_updated: DateTime<Utc>,
}

impl Holding {
    /// An empty holding, ready for its first lot.
    pub fn new(portfolio_id: &str, asset_id: &str, created_at: DateTime<Utc>) -> Self {
        Holding {
            id: Self::holding_id(portfolio_id, asset_id),
            portfolio_id: portfolio_id.to_string(),
            asset_id: asset_id.to_string(),
            quantity: Decimal::ZERO,
            cost_basis: Decimal::ZERO,
            average_cost: Decimal::ZERO,
            current_value: Decimal::ZERO,
            unrealized_gain: Decimal::ZERO,
            unrealized_gain_pct: Decimal::ZERO,
            ownership_percentage: default_ownership_percentage(),
            lots: Vec::new(),
            disposals: Vec::new(),
            realized_gain: Decimal::ZERO,
            last_updated: created_at,
        }
    }

    /// Deterministic id: one holding per (portfolio, asset).
    pub fn holding_id(portfolio_id: &str, asset_id: &str) -> String {
        format!("HLD-{}-{}", portfolio_id, asset_id)
    }

    /// Lots with quantity left to sell.
    pub fn open_lots(&self) -> impl Iterator<Item = &TaxLot> {
        self.lots.iter().filter(|lot| !lot.is_exhausted())
    }

    /// Recomputes quantity, cost basis, average cost and realized gain from
    /// lots and disposals. Valuation fields keep the previous per-unit price.
    pub fn recalculate_aggregates(&mut self) {
        let price = self.implied_price();

        self.quantity = self.lots.iter().map(|lot| lot.remaining_quantity).sum();
        self.cost_basis = self.lots.iter().map(TaxLot::cost_basis).sum();
        self.realized_gain = self.disposals.iter().map(|d| d.realized_gain).sum();

        if self.quantity.is_sign_positive() && is_quantity_significant(&self.quantity) {
            self.average_cost = self.cost_basis / self.quantity;
        } else {
            if !self.quantity.is_zero() {
                warn!(
                    "Holding {} quantity ({}) became insignificant. Average cost zeroed.",
                    self.id, self.quantity
                );
            }
            self.average_cost = Decimal::ZERO;
        }

        self.revalue(price.unwrap_or(Decimal::ZERO));
    }

    /// Marks the holding to `price` per unit.
    pub fn revalue(&mut self, price: Decimal) {
        self.current_value = self.quantity * price;
        self.unrealized_gain = self.current_value - self.cost_basis;
        self.unrealized_gain_pct = if self.cost_basis > Decimal::ZERO {
            self.unrealized_gain / self.cost_basis * Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        };
    }

    /// Per-unit price implied by the stored valuation. `None` for an empty holding.
    pub fn implied_price(&self) -> Option<Decimal> {
        if self.quantity.is_zero() {
            return None;
        }
        Some(self.current_value / self.quantity)
    }

    /// Current value scaled by the ownership percentage.
    pub fn net_value(&self) -> Result<Decimal> {
        calculate_net_value(self.current_value, Some(self.ownership_percentage))
    }

    pub fn holding_period(&self, reference: NaiveDate) -> HoldingPeriod {
        classify_mixed(self.open_lots(), reference)
    }
}

/// `value × ownership_pct / 100`. `None` means full ownership.
pub fn calculate_net_value(value: Decimal, ownership_pct: Option<Decimal>) -> Result<Decimal> {
    let Some(pct) = ownership_pct else {
        return Ok(value);
    };
    validate_ownership_percentage(pct)?;
    Ok(value * pct / Decimal::ONE_HUNDRED)
}

pub fn validate_ownership_percentage(pct: Decimal) -> Result<()> {
    if pct < Decimal::ZERO || pct > Decimal::ONE_HUNDRED {
        return Err(ValidationError::InvalidOwnershipPercentage(pct).into());
    }
    Ok(())
}
