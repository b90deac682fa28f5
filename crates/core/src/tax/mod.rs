//! Tax module - holding periods, compensation instruments, and exposure estimates.
//!
//! Everything here is a pure function over supplied holdings, lots and
//! prices. Nothing is persisted; callers recompute on demand.

mod compensation;
mod exposure;
mod holding_period;

#[cfg(test)]
mod exposure_tests;
#[cfg(test)]
mod holding_period_tests;

pub use compensation::{
    bargain_element, check_espp_disposition, espp_disposition_for_lot, rsu_net_shares,
    BargainElement, DispositionStatus, EsppDisposition, RsuNetShares,
};
pub use exposure::{
    build_lot_breakdown, calculate_tax_exposure, detect_aging_lots, estimate_liability,
    summarize_realized_gains, AgingLot, LotBreakdown, PriceMap, RealizedGainsSummary, TaxContext,
    TaxExposureMetrics,
};
pub use holding_period::{
    classify, classify_mixed, days_held, days_until_long_term, long_term_date, HoldingPeriod,
};
