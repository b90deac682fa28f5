use log::{debug, warn};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;

use super::assets_model::{calculate_yield, Asset, RentalInfo, ValuationMethod};
use super::assets_traits::{AssetRepositoryTrait, AssetServiceTrait};
use crate::errors::{ensure_non_negative, Result, ValidationError};

/// Service for managing asset prices and rental metadata.
pub struct AssetService {
    asset_repository: Arc<dyn AssetRepositoryTrait>,
}

impl AssetService {
    pub fn new(asset_repository: Arc<dyn AssetRepositoryTrait>) -> Self {
        Self { asset_repository }
    }

    fn require_method(asset: &Asset, expected: ValuationMethod) -> Result<()> {
        if asset.valuation_method != expected {
            return Err(ValidationError::UnsupportedValuationMethod {
                asset_id: asset.id.clone(),
                expected: expected.to_string(),
                actual: asset.valuation_method.to_string(),
            }
            .into());
        }
        Ok(())
    }

    fn store_price(&self, mut asset: Asset, price: Decimal) -> Result<Asset> {
        asset.current_price = Some(price);
        asset.updated_at = Utc::now().naive_utc();
        self.asset_repository.update(asset)
    }
}

impl AssetServiceTrait for AssetService {
    fn get_assets(&self) -> Result<Vec<Asset>> {
        self.asset_repository.list()
    }

    fn get_asset_by_id(&self, asset_id: &str) -> Result<Asset> {
        self.asset_repository.get_by_id(asset_id)
    }

    fn update_manual_price(&self, asset_id: &str, price: Decimal) -> Result<Asset> {
        ensure_non_negative("price", price)?;
        let asset = self.asset_repository.get_by_id(asset_id)?;
        Self::require_method(&asset, ValuationMethod::Manual)?;
        debug!("Manual price for {} set to {}", asset.symbol, price);
        self.store_price(asset, price)
    }

    fn set_market_price(&self, asset_id: &str, price: Decimal) -> Result<Asset> {
        ensure_non_negative("price", price)?;
        let asset = self.asset_repository.get_by_id(asset_id)?;
        Self::require_method(&asset, ValuationMethod::Auto)?;
        self.store_price(asset, price)
    }

    fn apply_price_refresh(&self, prices: &HashMap<String, Decimal>) -> Result<usize> {
        // Validate the whole batch before writing anything.
        for (asset_id, price) in prices {
            ensure_non_negative(&format!("price[{}]", asset_id), *price)?;
        }

        let mut updated = 0;
        for asset in self.asset_repository.list()? {
            let Some(price) = prices.get(&asset.id) else {
                continue;
            };
            if asset.is_manual() {
                debug!(
                    "Skipping feed price for manually valued asset {}",
                    asset.symbol
                );
                continue;
            }
            self.store_price(asset, *price)?;
            updated += 1;
        }

        if updated < prices.len() {
            warn!(
                "Price refresh applied {} of {} prices; the rest were unknown or manual assets",
                updated,
                prices.len()
            );
        }
        Ok(updated)
    }

    fn update_rental_info(&self, asset_id: &str, rental: Option<RentalInfo>) -> Result<Asset> {
        if let Some(info) = &rental {
            ensure_non_negative("monthlyRent", info.monthly_rent)?;
        }
        let mut asset = self.asset_repository.get_by_id(asset_id)?;
        asset.rental = rental;
        asset.updated_at = Utc::now().naive_utc();
        self.asset_repository.update(asset)
    }

    fn rental_yield(&self, asset_id: &str, current_value: Decimal) -> Result<Option<Decimal>> {
        let asset = self.asset_repository.get_by_id(asset_id)?;
        Ok(asset
            .monthly_rent()
            .and_then(|rent| calculate_yield(rent, current_value)))
    }
}
