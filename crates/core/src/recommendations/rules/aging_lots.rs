//! Aging-lot rule.
//!
//! Summarizes short-term lots that turn long-term within the configured window.

use rust_decimal::Decimal;
use serde_json::json;

use crate::constants::DISPLAY_DECIMAL_PRECISION;
use crate::recommendations::recommendations_model::{Recommendation, RecommendationType, Severity};
use crate::recommendations::recommendations_traits::{RecommendationContext, RecommendationRule};
use crate::tax::detect_aging_lots;

pub struct AgingLotsRule;

impl AgingLotsRule {
    fn severity(earliest_days_remaining: i64) -> Severity {
        match earliest_days_remaining {
            d if d <= 7 => Severity::High,
            d if d <= 14 => Severity::Medium,
            _ => Severity::Low,
        }
    }
}

impl RecommendationRule for AgingLotsRule {
    fn name(&self) -> &'static str {
        "aging_lots"
    }

    fn evaluate(&self, ctx: &RecommendationContext<'_>) -> Vec<Recommendation> {
        let aging = detect_aging_lots(
            ctx.holdings,
            ctx.assets,
            ctx.config.aging_window_days,
            ctx.reference_date,
        );
        let Some(earliest) = aging.iter().map(|lot| lot.days_remaining).min() else {
            return Vec::new();
        };

        let total_unrealized_gain: Decimal = aging.iter().map(|lot| lot.unrealized_gain).sum();
        let lot_ids: Vec<&str> = aging.iter().map(|lot| lot.lot_id.as_str()).collect();
        let count = aging.len();

        let title = if count == 1 {
            "1 lot nears long-term status".to_string()
        } else {
            format!("{} lots near long-term status", count)
        };

        vec![Recommendation::new(
            format!("{}:aging_lots", RecommendationType::TaxOptimization),
            RecommendationType::TaxOptimization,
            Self::severity(earliest),
            title,
            format!(
                "The earliest turns long-term in {} days; waiting may lower tax on {} of gains.",
                earliest,
                total_unrealized_gain.round_dp(DISPLAY_DECIMAL_PRECISION)
            ),
            json!({
                "count": count,
                "earliestDaysRemaining": earliest,
                "totalUnrealizedGain": total_unrealized_gain,
                "lotIds": lot_ids,
            }),
        )]
    }
}
