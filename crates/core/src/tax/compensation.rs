//! ESPP and RSU rules.
//!
//! ESPP: a sale is a qualifying disposition only when it happens on or after
//! both `grant + 2 years` and `purchase + 1 year`. RSU: the employee receives
//! gross shares minus the shares withheld for tax, with a cost basis equal to
//! the fair market value at vest.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{ESPP_GRANT_HOLDING_MONTHS, ESPP_PURCHASE_HOLDING_MONTHS};
use crate::errors::{ensure_non_negative, Result, ValidationError};
use crate::portfolio::lots::{LotKind, TaxLot};
use crate::utils::time_utils::{add_months, days_between};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispositionStatus {
    Qualifying,
    Disqualifying,
}

/// Outcome of an ESPP disposition check for one sale date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EsppDisposition {
    pub status: DispositionStatus,
    pub grant_date: NaiveDate,
    pub purchase_date: NaiveDate,
    pub sale_date: NaiveDate,
    pub two_years_from_grant: NaiveDate,
    pub one_year_from_purchase: NaiveDate,
    pub grant_requirement_met: bool,
    pub purchase_requirement_met: bool,
    /// Clamped to zero once the requirement is met.
    pub days_until_grant_requirement: i64,
    /// Clamped to zero once the requirement is met.
    pub days_until_purchase_requirement: i64,
}

impl EsppDisposition {
    pub fn is_qualifying(&self) -> bool {
        self.status == DispositionStatus::Qualifying
    }

    /// Earliest sale date that would be qualifying.
    pub fn qualifying_date(&self) -> NaiveDate {
        self.two_years_from_grant.max(self.one_year_from_purchase)
    }
}

/// Classifies an ESPP sale. Fails when the grant date is not strictly
/// before the purchase date.
pub fn check_espp_disposition(
    grant_date: NaiveDate,
    purchase_date: NaiveDate,
    sale_date: NaiveDate,
) -> Result<EsppDisposition> {
    if grant_date >= purchase_date {
        return Err(ValidationError::InvalidDispositionDates {
            grant_date,
            purchase_date,
        }
        .into());
    }

    let two_years_from_grant = add_months(grant_date, ESPP_GRANT_HOLDING_MONTHS);
    let one_year_from_purchase = add_months(purchase_date, ESPP_PURCHASE_HOLDING_MONTHS);
    let grant_requirement_met = sale_date >= two_years_from_grant;
    let purchase_requirement_met = sale_date >= one_year_from_purchase;

    let status = if grant_requirement_met && purchase_requirement_met {
        DispositionStatus::Qualifying
    } else {
        DispositionStatus::Disqualifying
    };

    Ok(EsppDisposition {
        status,
        grant_date,
        purchase_date,
        sale_date,
        two_years_from_grant,
        one_year_from_purchase,
        grant_requirement_met,
        purchase_requirement_met,
        days_until_grant_requirement: days_between(sale_date, two_years_from_grant).max(0),
        days_until_purchase_requirement: days_between(sale_date, one_year_from_purchase).max(0),
    })
}

/// Disposition for an ESPP lot sold on `sale_date`; `None` for other lot types.
pub fn espp_disposition_for_lot(
    lot: &TaxLot,
    sale_date: NaiveDate,
) -> Result<Option<EsppDisposition>> {
    match &lot.kind {
        LotKind::Espp { grant_date, .. } => {
            check_espp_disposition(*grant_date, lot.purchase_date, sale_date).map(Some)
        }
        _ => Ok(None),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BargainElement {
    pub per_share: Decimal,
    pub total: Decimal,
}

/// ESPP discount received: market price at purchase minus the price paid.
///
/// Not clamped: a purchase above market yields a negative bargain element.
pub fn bargain_element(
    market_price: Decimal,
    purchase_price: Decimal,
    quantity: Decimal,
) -> Result<BargainElement> {
    ensure_non_negative("marketPrice", market_price)?;
    ensure_non_negative("purchasePrice", purchase_price)?;
    ensure_non_negative("quantity", quantity)?;

    let per_share = market_price - purchase_price;
    Ok(BargainElement {
        per_share,
        total: per_share * quantity,
    })
}

/// Shares actually delivered by an RSU vest.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RsuNetShares {
    pub gross_shares: Decimal,
    pub shares_withheld: Decimal,
    pub net_shares: Decimal,
    pub cost_basis_per_share: Decimal,
    pub total_cost_basis: Decimal,
}

pub fn rsu_net_shares(
    gross_shares: Decimal,
    shares_withheld: Decimal,
    vesting_price: Decimal,
) -> Result<RsuNetShares> {
    ensure_non_negative("grossShares", gross_shares)?;
    ensure_non_negative("sharesWithheld", shares_withheld)?;
    ensure_non_negative("vestingPrice", vesting_price)?;
    if shares_withheld > gross_shares {
        return Err(ValidationError::InvalidWithholding {
            withheld: shares_withheld,
            vested: gross_shares,
        }
        .into());
    }

    let net_shares = gross_shares - shares_withheld;
    Ok(RsuNetShares {
        gross_shares,
        shares_withheld,
        net_shares,
        cost_basis_per_share: vesting_price,
        total_cost_basis: net_shares * vesting_price,
    })
}
