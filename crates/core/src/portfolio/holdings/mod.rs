//! Holdings: the holding model, the transaction reducer and the service that stores results.

mod holdings_calculator;
mod holdings_model;
mod holdings_service;
mod holdings_traits;


pub use holdings_calculator::{AppliedTransaction, HoldingsCalculator};
pub use holdings_model::{
    calculate_net_value, is_quantity_significant, validate_ownership_percentage, Holding,
};
pub use holdings_service::HoldingsService;
pub use holdings_traits::{HoldingRepositoryTrait, HoldingsServiceTrait};
