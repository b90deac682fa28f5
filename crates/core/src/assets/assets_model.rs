//! Asset domain models.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Investable instrument category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AssetType {
    #[default]
    Stock,
    Etf,
    Crypto,
    Bond,
    RealEstate,
    Commodity,
    Cash,
    Other,
}

impl AssetType {
    /// Returns the storage string representation (snake_case).
    pub const fn as_str(&self) -> &'static str {
        match self {
            AssetType::Stock => "stock",
            AssetType::Etf => "etf",
            AssetType::Crypto => "crypto",
            AssetType::Bond => "bond",
            AssetType::RealEstate => "real_estate",
            AssetType::Commodity => "commodity",
            AssetType::Cash => "cash",
            AssetType::Other => "other",
        }
    }

    /// Returns a human-readable display name for the asset type.
    pub const fn display_name(&self) -> &'static str {
        match self {
            AssetType::Stock => "Stocks",
            AssetType::Etf => "ETFs",
            AssetType::Crypto => "Crypto",
            AssetType::Bond => "Bonds",
            AssetType::RealEstate => "Real Estate",
            AssetType::Commodity => "Commodities",
            AssetType::Cash => "Cash",
            AssetType::Other => "Other",
        }
    }

    pub fn is_cash(&self) -> bool {
        matches!(self, AssetType::Cash)
    }
}

impl std::fmt::Display for AssetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How the asset is priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValuationMethod {
    #[default]
    Auto, // Priced by the external price feed
    Manual, // User-entered values only
}

impl ValuationMethod {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ValuationMethod::Auto => "AUTO",
            ValuationMethod::Manual => "MANUAL",
        }
    }
}

impl std::fmt::Display for ValuationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Rental income metadata for income-producing property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RentalInfo {
    pub is_rental: bool,
    pub monthly_rent: Decimal,
}

/// Domain model representing an asset.
///
/// One asset exists per distinct symbol or manually tracked item. Price and
/// rental metadata change through `AssetService`; the record is never deleted
/// while a holding references it.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    pub symbol: String,
    pub name: Option<String>,
    pub asset_type: AssetType,
    pub currency: String,

    // Valuation
    pub current_price: Option<Decimal>,
    pub valuation_method: ValuationMethod,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rental: Option<RentalInfo>,
    /// Overrides the region inferred from the listing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Asset {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.symbol)
    }

    pub fn is_manual(&self) -> bool {
        self.valuation_method == ValuationMethod::Manual
    }

    /// Monthly rent when the asset is flagged as a rental.
    pub fn monthly_rent(&self) -> Option<Decimal> {
        self.rental
            .as_ref()
            .filter(|r| r.is_rental)
            .map(|r| r.monthly_rent)
    }
}

/// Annual rental yield in percent: `(monthly_rent × 12) / current_value × 100`.
///
/// Returns `None` when `current_value` is zero or negative; the yield is
/// undefined there rather than zero.
pub fn calculate_yield(monthly_rent: Decimal, current_value: Decimal) -> Option<Decimal> {
    if current_value <= Decimal::ZERO {
        return None;
    }
    Some(monthly_rent * Decimal::from(12) / current_value * Decimal::ONE_HUNDRED)
}
