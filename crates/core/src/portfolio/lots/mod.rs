//! Tax lots and the lot-consumption engine.

mod lot_consumption;
mod lots_model;

#[cfg(test)]
mod lot_consumption_tests;

pub use lot_consumption::{
    available_quantity, available_quantity_on, consume_lots, SaleOutcome, SaleRequest,
};
pub use lots_model::{CostBasisMethod, LotDisposal, LotKind, LotSelection, LotType, TaxLot};
