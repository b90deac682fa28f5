use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::constants::LONG_TERM_HOLDING_DAYS;
use crate::portfolio::lots::TaxLot;
use crate::utils::time_utils::days_between;

/// Capital-gains holding period of a lot or a group of lots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoldingPeriod {
    Short,
    Long,
    /// Only produced when aggregating lots of differing ages.
    Mixed,
}

impl HoldingPeriod {
    pub fn is_long_term(&self) -> bool {
        matches!(self, HoldingPeriod::Long)
    }
}

/// Calendar days from purchase to `reference`. Negative for future purchases.
pub fn days_held(purchase_date: NaiveDate, reference: NaiveDate) -> i64 {
    days_between(purchase_date, reference)
}

/// Long when held at least 365 calendar days, short otherwise.
pub fn classify(purchase_date: NaiveDate, reference: NaiveDate) -> HoldingPeriod {
    if days_held(purchase_date, reference) >= LONG_TERM_HOLDING_DAYS {
        HoldingPeriod::Long
    } else {
        HoldingPeriod::Short
    }
}

/// Classifies a set of lots. An empty set is short.
pub fn classify_mixed<'a, I>(lots: I, reference: NaiveDate) -> HoldingPeriod
where
    I: IntoIterator<Item = &'a TaxLot>,
{
    let mut has_short = false;
    let mut has_long = false;
    for lot in lots {
        match classify(lot.purchase_date, reference) {
            HoldingPeriod::Long => has_long = true,
            _ => has_short = true,
        }
        if has_short && has_long {
            return HoldingPeriod::Mixed;
        }
    }
    if has_long {
        HoldingPeriod::Long
    } else {
        HoldingPeriod::Short
    }
}

/// Days left until the lot turns long-term. Zero or negative once it has.
pub fn days_until_long_term(purchase_date: NaiveDate, reference: NaiveDate) -> i64 {
    LONG_TERM_HOLDING_DAYS - days_held(purchase_date, reference)
}

/// First date on which a lot bought on `purchase_date` is long-term.
pub fn long_term_date(purchase_date: NaiveDate) -> NaiveDate {
    purchase_date + Duration::days(LONG_TERM_HOLDING_DAYS)
}
