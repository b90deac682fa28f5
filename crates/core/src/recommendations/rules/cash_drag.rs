//! Cash drag rule.
//!
//! Flags a portfolio whose cash share of total value exceeds the threshold.

use serde_json::json;

use super::display_pct;
use crate::assets::AssetType;
use crate::recommendations::recommendations_model::{Recommendation, RecommendationType, Severity};
use crate::recommendations::recommendations_traits::{RecommendationContext, RecommendationRule};

pub struct CashDragRule;

impl RecommendationRule for CashDragRule {
    fn name(&self) -> &'static str {
        "cash_drag"
    }

    fn evaluate(&self, ctx: &RecommendationContext<'_>) -> Vec<Recommendation> {
        let threshold = ctx.config.cash_drag_threshold;
        let Some(share) = ctx.share_of(AssetType::Cash) else {
            return Vec::new();
        };
        if share <= threshold {
            return Vec::new();
        }

        let severity = Severity::from_excess(share, threshold);
        vec![Recommendation::new(
            RecommendationType::CashDrag.as_str(),
            RecommendationType::CashDrag,
            severity,
            "High cash allocation",
            format!(
                "Cash is {}% of your portfolio, above the {}% target. Idle cash may lag inflation.",
                display_pct(share),
                display_pct(threshold)
            ),
            json!({
                "cashShare": share,
                "threshold": threshold,
                "cashValue": ctx.value_by_type.get(&AssetType::Cash),
            }),
        )]
    }
}
