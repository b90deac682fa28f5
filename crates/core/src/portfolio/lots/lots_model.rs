use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::tax::HoldingPeriod;

/// Flat lot classification label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LotType {
    #[default]
    Standard,
    Espp,
    Rsu,
}

/// Compensation metadata carried by a lot, tagged by lot type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "lotType", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum LotKind {
    #[default]
    Standard,
    Espp {
        grant_date: NaiveDate,
        discount_percent: Decimal,
        market_price_at_purchase: Decimal,
        /// Per-share discount: market price at purchase minus price paid.
        bargain_element: Decimal,
    },
    Rsu {
        vesting_date: NaiveDate,
        gross_shares: Decimal,
        shares_withheld: Decimal,
    },
}

impl LotKind {
    pub fn lot_type(&self) -> LotType {
        match self {
            LotKind::Standard => LotType::Standard,
            LotKind::Espp { .. } => LotType::Espp,
            LotKind::Rsu { .. } => LotType::Rsu,
        }
    }
}

/// One purchase event contributing to a holding.
///
/// Lots are never removed: an exhausted lot (remaining quantity zero) stays in
/// the holding for realized-gain reporting.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaxLot {
    /// Id of the transaction that created the lot.
    pub id: String,
    pub quantity: Decimal,
    /// Price per unit paid (ESPP: discounted price, RSU: vesting FMV).
    /// Split-adjusted, so it may carry rounding; `total_cost` is exact.
    pub purchase_price: Decimal,
    /// Cost of `quantity` units as purchased. Splits leave it unchanged.
    pub total_cost: Decimal,
    pub purchase_date: NaiveDate,
    /// Monotonically non-decreasing.
    pub sold_quantity: Decimal,
    /// Always `quantity - sold_quantity`, never negative.
    pub remaining_quantity: Decimal,
    #[serde(flatten)]
    pub kind: LotKind,
}

impl TaxLot {
    pub fn new(
        id: impl Into<String>,
        quantity: Decimal,
        purchase_price: Decimal,
        purchase_date: NaiveDate,
    ) -> Self {
        TaxLot {
            id: id.into(),
            quantity,
            purchase_price,
            total_cost: quantity * purchase_price,
            purchase_date,
            sold_quantity: Decimal::ZERO,
            remaining_quantity: quantity,
            kind: LotKind::Standard,
        }
    }

    pub fn with_kind(mut self, kind: LotKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn lot_type(&self) -> LotType {
        self.kind.lot_type()
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining_quantity.is_zero()
    }

    /// Cost basis of the remaining quantity, pro rata of `total_cost`.
    pub fn cost_basis(&self) -> Decimal {
        if self.remaining_quantity.is_zero() {
            return Decimal::ZERO;
        }
        if self.remaining_quantity == self.quantity {
            return self.total_cost;
        }
        self.total_cost * self.remaining_quantity / self.quantity
    }

    /// Marks `quantity` units as sold. Callers validate against
    /// `remaining_quantity` before calling.
    pub(crate) fn consume(&mut self, quantity: Decimal) {
        debug_assert!(quantity <= self.remaining_quantity);
        self.sold_quantity += quantity;
        self.remaining_quantity = self.quantity - self.sold_quantity;
    }

    /// Scales unit counts by `ratio` and re-derives the per-unit price from
    /// `total_cost`. Compensation metadata keeps the values recorded at
    /// grant/vest.
    pub(crate) fn apply_split(&mut self, ratio: Decimal) {
        self.quantity *= ratio;
        self.sold_quantity *= ratio;
        self.remaining_quantity = self.quantity - self.sold_quantity;
        if !self.quantity.is_zero() {
            self.purchase_price = self.total_cost / self.quantity;
        }
    }
}

/// How a sale selects the lots it draws from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CostBasisMethod {
    #[default]
    Fifo,
    Lifo,
    SpecificLot(Vec<LotSelection>),
}

/// Caller-chosen quantity to draw from one lot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LotSelection {
    pub lot_id: String,
    pub quantity: Decimal,
}

impl LotSelection {
    pub fn new(lot_id: impl Into<String>, quantity: Decimal) -> Self {
        Self {
            lot_id: lot_id.into(),
            quantity,
        }
    }
}

/// One portion of a lot consumed by a sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LotDisposal {
    pub lot_id: String,
    pub lot_type: LotType,
    pub quantity: Decimal,
    pub purchase_price: Decimal,
    pub purchase_date: NaiveDate,
    pub sale_price: Decimal,
    pub sale_date: NaiveDate,
    pub cost_basis: Decimal,
    pub proceeds: Decimal,
    /// `proceeds - cost_basis`, unrounded. Equals
    /// `(sale_price - purchase_price) × quantity` for lots never split.
    pub realized_gain: Decimal,
    pub holding_period: HoldingPeriod,
}
