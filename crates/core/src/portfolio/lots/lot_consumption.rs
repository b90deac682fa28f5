//! Lot-consumption engine.
//!
//! Selects which lots a sale draws from and by how much. The engine never
//! mutates its input: it plans the consumption against the caller's lots,
//! validates the plan, and only then builds a fresh lot vector. A failed
//! sale therefore leaves nothing partially consumed.
//!
//! Only lots purchased on or before the sale date are held at that date;
//! later lots are invisible to the sale.

use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::lots_model::{CostBasisMethod, LotDisposal, LotSelection, TaxLot};
use crate::errors::{ensure_non_negative, LotError, Result};
use crate::tax::{classify, HoldingPeriod};

/// A sale to apply against a holding's lots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRequest {
    pub quantity: Decimal,
    pub price: Decimal,
    pub date: NaiveDate,
    #[serde(default)]
    pub method: CostBasisMethod,
}

/// Result of a successful sale: the replacement lot list plus one disposal
/// per consumed lot portion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleOutcome {
    pub lots: Vec<TaxLot>,
    pub disposals: Vec<LotDisposal>,
    pub proceeds: Decimal,
    pub cost_basis: Decimal,
    pub realized_gain: Decimal,
    pub short_term_gain: Decimal,
    pub long_term_gain: Decimal,
}

/// Total quantity still available across all lots.
pub fn available_quantity(lots: &[TaxLot]) -> Decimal {
    lots.iter().map(|lot| lot.remaining_quantity).sum()
}

/// Quantity held on `date`: remaining units of lots purchased on or before it.
pub fn available_quantity_on(lots: &[TaxLot], date: NaiveDate) -> Decimal {
    lots.iter()
        .filter(|lot| lot.purchase_date <= date)
        .map(|lot| lot.remaining_quantity)
        .sum()
}

/// Consumes lots for a sale under the request's cost-basis method.
///
/// Fails with `InsufficientQuantity` when the lots cannot cover the sale, and
/// with `LotNotFound`, `LotOverConsumed` or `SelectionMismatch` when a
/// specific-lot selection is invalid.
pub fn consume_lots(
    holding_id: &str,
    lots: &[TaxLot],
    request: &SaleRequest,
) -> Result<SaleOutcome> {
    ensure_non_negative("quantity", request.quantity)?;
    ensure_non_negative("price", request.price)?;
    if request.quantity.is_zero() {
        return Err(
            LotError::InvalidTransaction("Sale quantity must be positive".to_string()).into(),
        );
    }

    let available = available_quantity_on(lots, request.date);
    if available < request.quantity {
        return Err(LotError::InsufficientQuantity {
            holding_id: holding_id.to_string(),
            requested: request.quantity,
            available,
        }
        .into());
    }

    let plan = match &request.method {
        CostBasisMethod::Fifo => plan_ordered(lots, request, false),
        CostBasisMethod::Lifo => plan_ordered(lots, request, true),
        CostBasisMethod::SpecificLot(selections) => {
            plan_specific(holding_id, lots, selections, request)?
        }
    };

    // Plan is validated; build the replacement lots.
    let mut next_lots = lots.to_vec();
    let mut disposals = Vec::with_capacity(plan.len());
    let mut proceeds_total = Decimal::ZERO;
    let mut cost_basis_total = Decimal::ZERO;
    let mut short_term_gain = Decimal::ZERO;
    let mut long_term_gain = Decimal::ZERO;

    for (index, quantity) in plan {
        let lot = &mut next_lots[index];
        let cost_before = lot.cost_basis();
        lot.consume(quantity);

        // Difference of pro-rata costs, so a fully sold lot books exactly its total cost.
        let cost_basis = cost_before - lot.cost_basis();
        let proceeds = quantity * request.price;
        let realized_gain = proceeds - cost_basis;
        let holding_period = classify(lot.purchase_date, request.date);

        proceeds_total += proceeds;
        cost_basis_total += cost_basis;
        match holding_period {
            HoldingPeriod::Long => long_term_gain += realized_gain,
            _ => short_term_gain += realized_gain,
        }

        debug!(
            "Holding {}: consumed {} from lot {} ({} remaining), gain {}",
            holding_id, quantity, lot.id, lot.remaining_quantity, realized_gain
        );

        disposals.push(LotDisposal {
            lot_id: lot.id.clone(),
            lot_type: lot.lot_type(),
            quantity,
            purchase_price: lot.purchase_price,
            purchase_date: lot.purchase_date,
            sale_price: request.price,
            sale_date: request.date,
            cost_basis,
            proceeds,
            realized_gain,
            holding_period,
        });
    }

    Ok(SaleOutcome {
        lots: next_lots,
        disposals,
        proceeds: proceeds_total,
        cost_basis: cost_basis_total,
        realized_gain: short_term_gain + long_term_gain,
        short_term_gain,
        long_term_gain,
    })
}

/// FIFO (or LIFO when `newest_first`) plan over non-exhausted lots held on
/// the sale date. Ties on purchase date keep the stored lot order.
fn plan_ordered(
    lots: &[TaxLot],
    request: &SaleRequest,
    newest_first: bool,
) -> Vec<(usize, Decimal)> {
    let mut order: Vec<usize> = (0..lots.len())
        .filter(|&i| !lots[i].is_exhausted() && lots[i].purchase_date <= request.date)
        .collect();
    order.sort_by_key(|&i| (lots[i].purchase_date, i));
    if newest_first {
        order.reverse();
    }

    let mut plan = Vec::new();
    let mut left = request.quantity;
    for index in order {
        if left <= Decimal::ZERO {
            break;
        }
        let take = left.min(lots[index].remaining_quantity);
        plan.push((index, take));
        left -= take;
    }
    plan
}

fn plan_specific(
    holding_id: &str,
    lots: &[TaxLot],
    selections: &[LotSelection],
    request: &SaleRequest,
) -> Result<Vec<(usize, Decimal)>> {
    // Lots bought after the sale date cannot be selected.
    let index_by_id: HashMap<&str, usize> = lots
        .iter()
        .enumerate()
        .filter(|(_, lot)| lot.purchase_date <= request.date)
        .map(|(i, lot)| (lot.id.as_str(), i))
        .collect();

    // Merge duplicate selections, keeping first-seen order.
    let mut plan: Vec<(usize, Decimal)> = Vec::with_capacity(selections.len());
    for selection in selections {
        ensure_non_negative("quantity", selection.quantity)?;
        let index = *index_by_id
            .get(selection.lot_id.as_str())
            .ok_or_else(|| LotError::LotNotFound {
                holding_id: holding_id.to_string(),
                lot_id: selection.lot_id.clone(),
            })?;
        match plan.iter_mut().find(|(i, _)| *i == index) {
            Some((_, qty)) => *qty += selection.quantity,
            None => plan.push((index, selection.quantity)),
        }
    }

    for (index, selected) in &plan {
        let lot = &lots[*index];
        if *selected > lot.remaining_quantity {
            return Err(LotError::LotOverConsumed {
                lot_id: lot.id.clone(),
                requested: *selected,
                remaining: lot.remaining_quantity,
            }
            .into());
        }
    }

    let selected: Decimal = plan.iter().map(|(_, qty)| *qty).sum();
    if selected != request.quantity {
        return Err(LotError::SelectionMismatch {
            selected,
            requested: request.quantity,
        }
        .into());
    }

    plan.retain(|(_, qty)| !qty.is_zero());
    Ok(plan)
}
