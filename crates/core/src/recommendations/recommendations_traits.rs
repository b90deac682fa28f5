use chrono::NaiveDate;
use log::warn;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

use super::recommendations_model::{Recommendation, RecommendationConfig};
use crate::assets::{Asset, AssetType};
use crate::errors::Result;
use crate::portfolio::holdings::Holding;

/// Inputs shared by every rule in one `generate` call.
pub struct RecommendationContext<'a> {
    pub holdings: &'a [Holding],
    pub assets: &'a [Asset],
    pub total_value: Decimal,
    pub reference_date: NaiveDate,
    pub config: &'a RecommendationConfig,
    /// Net-of-ownership value per asset type, built once.
    pub value_by_type: BTreeMap<AssetType, Decimal>,
}

impl<'a> RecommendationContext<'a> {
    pub fn new(
        holdings: &'a [Holding],
        assets: &'a [Asset],
        total_value: Decimal,
        reference_date: NaiveDate,
        config: &'a RecommendationConfig,
    ) -> Result<Self> {
        let types_by_id: HashMap<&str, AssetType> =
            assets.iter().map(|a| (a.id.as_str(), a.asset_type)).collect();

        let mut value_by_type = BTreeMap::new();
        for holding in holdings {
            let Some(asset_type) = types_by_id.get(holding.asset_id.as_str()) else {
                warn!(
                    "Holding {} references unknown asset {}; excluded from allocation",
                    holding.id,
                    holding.asset_id
                );
                continue;
            };
            *value_by_type.entry(*asset_type).or_insert(Decimal::ZERO) += holding.net_value()?;
        }

        Ok(Self {
            holdings,
            assets,
            total_value,
            reference_date,
            config,
            value_by_type,
        })
    }

    /// Share of total value held in `asset_type`. `None` when total value is not positive.
    pub fn share_of(&self, asset_type: AssetType) -> Option<Decimal> {
        if self.total_value <= Decimal::ZERO {
            return None;
        }
        let value = self
            .value_by_type
            .get(&asset_type)
            .copied()
            .unwrap_or(Decimal::ZERO);
        Some(value / self.total_value)
    }
}

/// One independent recommendation rule.
pub trait RecommendationRule: Send + Sync {
    /// Stable rule name, used in logs.
    fn name(&self) -> &'static str;

    fn evaluate(&self, ctx: &RecommendationContext<'_>) -> Vec<Recommendation>;
}
