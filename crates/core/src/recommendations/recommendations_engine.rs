use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;

use super::recommendations_model::{Recommendation, RecommendationConfig};
use super::recommendations_traits::{RecommendationContext, RecommendationRule};
use super::rules::{AgingLotsRule, CashDragRule, ConcentrationRule};
use crate::assets::Asset;
use crate::errors::Result;
use crate::portfolio::holdings::Holding;

/// Runs independent rules over a portfolio. Stateless between calls.
pub struct RecommendationEngine {
    config: RecommendationConfig,
    rules: Vec<Box<dyn RecommendationRule>>,
}

impl RecommendationEngine {
    /// Engine with the built-in cash drag, concentration and aging-lot rules.
    pub fn new(config: RecommendationConfig) -> Self {
        Self::with_rules(
            config,
            vec![
                Box::new(CashDragRule),
                Box::new(ConcentrationRule),
                Box::new(AgingLotsRule),
            ],
        )
    }

    pub fn with_rules(
        config: RecommendationConfig,
        rules: Vec<Box<dyn RecommendationRule>>,
    ) -> Self {
        Self { config, rules }
    }

    pub fn config(&self) -> &RecommendationConfig {
        &self.config
    }

    /// Evaluates every rule. Output order follows rule order; it implies no priority.
    pub fn generate(
        &self,
        holdings: &[Holding],
        assets: &[Asset],
        total_value: Decimal,
        reference_date: NaiveDate,
    ) -> Result<Vec<Recommendation>> {
        let ctx = RecommendationContext::new(
            holdings,
            assets,
            total_value,
            reference_date,
            &self.config,
        )?;

        let mut recommendations = Vec::new();
        for rule in &self.rules {
            let found = rule.evaluate(&ctx);
            debug!("Rule {} produced {} recommendations", rule.name(), found.len());
            recommendations.extend(found);
        }
        Ok(recommendations)
    }
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::new(RecommendationConfig::default())
    }
}
