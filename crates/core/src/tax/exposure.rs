//! Tax exposure, aging lots and realized-gain summaries.
//!
//! Gains and losses are bucketed by holding period. Losses are stored as
//! negative numbers, so `net = gains + losses` in every bucket. Estimated
//! liability only taxes positive net gains; losses never produce a negative
//! liability and are not offset across the short/long boundary.

use chrono::{Datelike, NaiveDate};
use log::{debug, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::compensation::{espp_disposition_for_lot, EsppDisposition};
use super::holding_period::{
    classify, days_held, days_until_long_term, long_term_date, HoldingPeriod,
};
use crate::assets::Asset;
use crate::constants::DEFAULT_AGING_WINDOW_DAYS;
use crate::errors::Result;
use crate::portfolio::holdings::Holding;
use crate::portfolio::lots::{LotType, TaxLot};
use crate::settings::TaxSettings;

/// Current price per asset id, as supplied by the price feed.
pub type PriceMap = HashMap<String, Decimal>;

/// Inputs shared by one exposure calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxContext {
    pub tax_settings: TaxSettings,
    pub aging_window_days: i64,
    pub reference_date: NaiveDate,
}

impl TaxContext {
    pub fn new(tax_settings: TaxSettings, reference_date: NaiveDate) -> Self {
        Self {
            tax_settings,
            aging_window_days: DEFAULT_AGING_WINDOW_DAYS,
            reference_date,
        }
    }

    pub fn with_aging_window(mut self, days: i64) -> Self {
        self.aging_window_days = days;
        self
    }
}

/// Unrealized exposure across every open lot. Derived, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxExposureMetrics {
    pub short_term_gains: Decimal,
    /// Negative or zero.
    pub short_term_losses: Decimal,
    pub long_term_gains: Decimal,
    /// Negative or zero.
    pub long_term_losses: Decimal,
    pub net_short_term: Decimal,
    pub net_long_term: Decimal,
    pub total_unrealized_gain: Decimal,
    pub estimated_liability: Decimal,
    pub effective_tax_rate: Decimal,
    pub aging_lot_count: usize,
}

#[derive(Debug, Default)]
struct GainBuckets {
    short_term_gains: Decimal,
    short_term_losses: Decimal,
    long_term_gains: Decimal,
    long_term_losses: Decimal,
}

impl GainBuckets {
    fn add(&mut self, period: HoldingPeriod, gain: Decimal) {
        let long = period.is_long_term();
        match (long, gain.is_sign_negative()) {
            (false, false) => self.short_term_gains += gain,
            (false, true) => self.short_term_losses += gain,
            (true, false) => self.long_term_gains += gain,
            (true, true) => self.long_term_losses += gain,
        }
    }

    fn net_short_term(&self) -> Decimal {
        self.short_term_gains + self.short_term_losses
    }

    fn net_long_term(&self) -> Decimal {
        self.long_term_gains + self.long_term_losses
    }

    fn liability(&self, settings: &TaxSettings) -> Decimal {
        estimate_liability(self.net_short_term(), self.net_long_term(), settings)
    }
}

/// `max(net_st, 0) × st_rate + max(net_lt, 0) × lt_rate`.
pub fn estimate_liability(
    net_short_term: Decimal,
    net_long_term: Decimal,
    settings: &TaxSettings,
) -> Decimal {
    net_short_term.max(Decimal::ZERO) * settings.short_term_rate
        + net_long_term.max(Decimal::ZERO) * settings.long_term_rate
}

fn is_aging(lot: &TaxLot, reference: NaiveDate, window_days: i64) -> bool {
    if classify(lot.purchase_date, reference).is_long_term() {
        return false;
    }
    let remaining = days_until_long_term(lot.purchase_date, reference);
    (0..=window_days).contains(&remaining)
}

/// Live price for the holding's asset, else the price implied by its stored valuation.
fn resolve_price(holding: &Holding, prices: &PriceMap) -> Option<Decimal> {
    prices
        .get(&holding.asset_id)
        .copied()
        .or_else(|| holding.implied_price())
}

/// Single pass over every open lot of every holding.
pub fn calculate_tax_exposure(
    holdings: &[Holding],
    prices: &PriceMap,
    context: &TaxContext,
) -> TaxExposureMetrics {
    let reference = context.reference_date;
    let mut buckets = GainBuckets::default();
    let mut aging_lot_count = 0;

    for holding in holdings {
        let Some(price) = resolve_price(holding, prices) else {
            continue;
        };
        for lot in holding.open_lots() {
            let unrealized = lot.remaining_quantity * price - lot.cost_basis();
            buckets.add(classify(lot.purchase_date, reference), unrealized);
            if is_aging(lot, reference, context.aging_window_days) {
                aging_lot_count += 1;
            }
        }
    }

    let net_short_term = buckets.net_short_term();
    let net_long_term = buckets.net_long_term();
    let total_unrealized_gain = net_short_term + net_long_term;
    let estimated_liability = buckets.liability(&context.tax_settings);
    let effective_tax_rate = if total_unrealized_gain > Decimal::ZERO {
        estimated_liability / total_unrealized_gain
    } else {
        Decimal::ZERO
    };

    TaxExposureMetrics {
        short_term_gains: buckets.short_term_gains,
        short_term_losses: buckets.short_term_losses,
        long_term_gains: buckets.long_term_gains,
        long_term_losses: buckets.long_term_losses,
        net_short_term,
        net_long_term,
        total_unrealized_gain,
        estimated_liability,
        effective_tax_rate,
        aging_lot_count,
    }
}

/// A short-term lot that turns long-term within the warning window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgingLot {
    pub holding_id: String,
    pub asset_id: String,
    pub symbol: String,
    pub lot_id: String,
    pub remaining_quantity: Decimal,
    pub purchase_date: NaiveDate,
    pub days_held: i64,
    pub days_remaining: i64,
    pub long_term_date: NaiveDate,
    pub cost_basis: Decimal,
    pub current_value: Decimal,
    pub unrealized_gain: Decimal,
}

/// Finds open short-term lots with `365 - days_held` in `[0, window_days]`.
///
/// Prices come from the asset's current price, falling back to the price
/// implied by the holding's stored valuation. Holdings whose asset is not
/// in `assets` are skipped.
pub fn detect_aging_lots(
    holdings: &[Holding],
    assets: &[Asset],
    window_days: i64,
    reference: NaiveDate,
) -> Vec<AgingLot> {
    let assets_by_id: HashMap<&str, &Asset> = assets.iter().map(|a| (a.id.as_str(), a)).collect();
    let mut aging = Vec::new();

    for holding in holdings {
        let Some(asset) = assets_by_id.get(holding.asset_id.as_str()) else {
            warn!(
                "Holding {} references unknown asset {}; skipped for aging lots",
                holding.id, holding.asset_id
            );
            continue;
        };
        let Some(price) = asset.current_price.or_else(|| holding.implied_price()) else {
            continue;
        };

        for lot in holding.open_lots() {
            if !is_aging(lot, reference, window_days) {
                continue;
            }
            let cost_basis = lot.cost_basis();
            let current_value = lot.remaining_quantity * price;
            aging.push(AgingLot {
                holding_id: holding.id.clone(),
                asset_id: holding.asset_id.clone(),
                symbol: asset.symbol.clone(),
                lot_id: lot.id.clone(),
                remaining_quantity: lot.remaining_quantity,
                purchase_date: lot.purchase_date,
                days_held: days_held(lot.purchase_date, reference),
                days_remaining: days_until_long_term(lot.purchase_date, reference),
                long_term_date: long_term_date(lot.purchase_date),
                cost_basis,
                current_value,
                unrealized_gain: current_value - cost_basis,
            });
        }
    }

    debug!("Found {} aging lots within {} days", aging.len(), window_days);
    aging
}

/// Per-lot view of one holding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LotBreakdown {
    pub lot_id: String,
    pub lot_type: LotType,
    pub quantity: Decimal,
    pub remaining_quantity: Decimal,
    pub purchase_price: Decimal,
    pub purchase_date: NaiveDate,
    pub cost_basis: Decimal,
    pub current_value: Decimal,
    pub unrealized_gain: Decimal,
    pub unrealized_gain_pct: Decimal,
    pub holding_period: HoldingPeriod,
    pub days_held: i64,
    /// `None` once the lot is long-term.
    pub days_until_long_term: Option<i64>,
    /// Disposition if the lot were sold on the reference date. ESPP lots only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub espp_disposition: Option<EsppDisposition>,
}

/// Breaks an open holding down by lot, valued at `price` (or the holding's
/// implied price when `None`).
pub fn build_lot_breakdown(
    holding: &Holding,
    price: Option<Decimal>,
    reference: NaiveDate,
) -> Result<Vec<LotBreakdown>> {
    let price = price
        .or_else(|| holding.implied_price())
        .unwrap_or(Decimal::ZERO);

    holding
        .open_lots()
        .map(|lot| -> Result<LotBreakdown> {
            let cost_basis = lot.cost_basis();
            let current_value = lot.remaining_quantity * price;
            let unrealized_gain = current_value - cost_basis;
            let holding_period = classify(lot.purchase_date, reference);
            Ok(LotBreakdown {
                lot_id: lot.id.clone(),
                lot_type: lot.lot_type(),
                quantity: lot.quantity,
                remaining_quantity: lot.remaining_quantity,
                purchase_price: lot.purchase_price,
                purchase_date: lot.purchase_date,
                cost_basis,
                current_value,
                unrealized_gain,
                unrealized_gain_pct: if cost_basis > Decimal::ZERO {
                    unrealized_gain / cost_basis * Decimal::ONE_HUNDRED
                } else {
                    Decimal::ZERO
                },
                holding_period,
                days_held: days_held(lot.purchase_date, reference),
                days_until_long_term: (!holding_period.is_long_term())
                    .then(|| days_until_long_term(lot.purchase_date, reference)),
                espp_disposition: espp_disposition_for_lot(lot, reference)?,
            })
        })
        .collect()
}

/// Realized gains from retained disposals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealizedGainsSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    pub short_term_gains: Decimal,
    pub short_term_losses: Decimal,
    pub long_term_gains: Decimal,
    pub long_term_losses: Decimal,
    pub net_short_term: Decimal,
    pub net_long_term: Decimal,
    pub total_realized_gain: Decimal,
    pub total_proceeds: Decimal,
    pub total_cost_basis: Decimal,
    pub estimated_liability: Decimal,
    pub disposal_count: usize,
}

/// Sums every disposal, or only those sold in `year`.
pub fn summarize_realized_gains(
    holdings: &[Holding],
    tax_settings: &TaxSettings,
    year: Option<i32>,
) -> RealizedGainsSummary {
    let mut buckets = GainBuckets::default();
    let mut summary = RealizedGainsSummary {
        year,
        ..Default::default()
    };

    let disposals = holdings
        .iter()
        .flat_map(|h| h.disposals.iter())
        .filter(|d| year.map_or(true, |y| d.sale_date.year() == y));
    for disposal in disposals {
        buckets.add(disposal.holding_period, disposal.realized_gain);
        summary.total_proceeds += disposal.proceeds;
        summary.total_cost_basis += disposal.cost_basis;
        summary.disposal_count += 1;
    }

    summary.net_short_term = buckets.net_short_term();
    summary.net_long_term = buckets.net_long_term();
    summary.total_realized_gain = summary.net_short_term + summary.net_long_term;
    summary.estimated_liability = buckets.liability(tax_settings);
    summary.short_term_gains = buckets.short_term_gains;
    summary.short_term_losses = buckets.short_term_losses;
    summary.long_term_gains = buckets.long_term_gains;
    summary.long_term_losses = buckets.long_term_losses;
    summary
}
