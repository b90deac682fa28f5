//! Concentration rule.
//!
//! One recommendation per non-cash asset type whose share exceeds the threshold.

use serde_json::json;

use super::display_pct;
use crate::recommendations::recommendations_model::{Recommendation, RecommendationType, Severity};
use crate::recommendations::recommendations_traits::{RecommendationContext, RecommendationRule};

pub struct ConcentrationRule;

impl RecommendationRule for ConcentrationRule {
    fn name(&self) -> &'static str {
        "concentration"
    }

    fn evaluate(&self, ctx: &RecommendationContext<'_>) -> Vec<Recommendation> {
        let threshold = ctx.config.concentration_threshold;

        ctx.value_by_type
            .iter()
            .filter(|(asset_type, _)| !asset_type.is_cash())
            .filter_map(|(asset_type, value)| {
                let share = ctx.share_of(*asset_type)?;
                if share <= threshold {
                    return None;
                }
                Some(Recommendation::new(
                    format!("{}:{}", RecommendationType::Concentration, asset_type),
                    RecommendationType::Concentration,
                    Severity::from_excess(share, threshold),
                    format!("{} concentration", asset_type.display_name()),
                    format!(
                        "{} make up {}% of your portfolio, above the {}% limit per asset type.",
                        asset_type.display_name(),
                        display_pct(share),
                        display_pct(threshold)
                    ),
                    json!({
                        "assetType": asset_type,
                        "share": share,
                        "threshold": threshold,
                        "value": value,
                    }),
                ))
            })
            .collect()
    }
}
