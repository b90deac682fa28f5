use std::collections::HashMap;

use rust_decimal::Decimal;

use super::assets_model::{Asset, RentalInfo};
use crate::errors::Result;

/// Trait defining the contract for Asset service operations.
pub trait AssetServiceTrait: Send + Sync {
    fn get_assets(&self) -> Result<Vec<Asset>>;
    fn get_asset_by_id(&self, asset_id: &str) -> Result<Asset>;
    /// Sets a user-entered price. Only valid for MANUAL assets.
    fn update_manual_price(&self, asset_id: &str, price: Decimal) -> Result<Asset>;
    /// Sets a feed price for one asset. Only valid for AUTO assets.
    fn set_market_price(&self, asset_id: &str, price: Decimal) -> Result<Asset>;
    /// Applies already-fetched feed prices to every AUTO asset in the map.
    /// Returns the number of assets updated.
    fn apply_price_refresh(&self, prices: &HashMap<String, Decimal>) -> Result<usize>;
    fn update_rental_info(&self, asset_id: &str, rental: Option<RentalInfo>) -> Result<Asset>;
    /// Annual rental yield in percent for the given valuation, if the asset is a rental.
    fn rental_yield(&self, asset_id: &str, current_value: Decimal) -> Result<Option<Decimal>>;
}

/// Trait defining the contract for Asset repository operations.
pub trait AssetRepositoryTrait: Send + Sync {
    /// Returns `Error::AssetNotFound` when the id does not resolve.
    fn get_by_id(&self, asset_id: &str) -> Result<Asset>;
    fn list(&self) -> Result<Vec<Asset>>;
    /// Replaces the stored asset with the same id.
    fn update(&self, asset: Asset) -> Result<Asset>;
}
