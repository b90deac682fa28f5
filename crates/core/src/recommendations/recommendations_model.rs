use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{
    DEFAULT_AGING_WINDOW_DAYS, DEFAULT_CASH_DRAG_THRESHOLD, DEFAULT_CONCENTRATION_THRESHOLD,
};
use crate::errors::{Result, ValidationError};

// =============================================================================
// Severity
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    #[default]
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }

    /// Scales with how far `share` exceeds `threshold`: high at twice the
    /// threshold, medium at one and a half times, low otherwise.
    pub fn from_excess(share: Decimal, threshold: Decimal) -> Self {
        if threshold <= Decimal::ZERO {
            return Severity::High;
        }
        let ratio = share / threshold;
        if ratio >= Decimal::TWO {
            Severity::High
        } else if ratio >= Decimal::new(15, 1) {
            Severity::Medium
        } else {
            Severity::Low
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Recommendation
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationType {
    CashDrag,
    Concentration,
    TaxOptimization,
}

impl RecommendationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationType::CashDrag => "cash_drag",
            RecommendationType::Concentration => "concentration",
            RecommendationType::TaxOptimization => "tax_optimization",
        }
    }
}

impl std::fmt::Display for RecommendationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An actionable finding, displayed as-is by the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// Stable per rule and subject, e.g. `concentration:stock`.
    pub id: String,
    #[serde(rename = "type")]
    pub recommendation_type: RecommendationType,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    /// Type-specific payload for programmatic use.
    pub metadata: Value,
}

impl Recommendation {
    pub fn new(
        id: impl Into<String>,
        recommendation_type: RecommendationType,
        severity: Severity,
        title: impl Into<String>,
        description: impl Into<String>,
        metadata: Value,
    ) -> Self {
        Self {
            id: id.into(),
            recommendation_type,
            severity,
            title: title.into(),
            description: description.into(),
            metadata,
        }
    }
}

// =============================================================================
// Config
// =============================================================================

/// Thresholds used by the recommendation rules.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationConfig {
    /// Maximum share of total value per non-cash asset type (default: 0.15)
    pub concentration_threshold: Decimal,

    /// Maximum share of total value held as cash (default: 0.20)
    pub cash_drag_threshold: Decimal,

    /// Days before the long-term date at which a lot is flagged (default: 30)
    pub aging_window_days: i64,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            concentration_threshold: DEFAULT_CONCENTRATION_THRESHOLD,
            cash_drag_threshold: DEFAULT_CASH_DRAG_THRESHOLD,
            aging_window_days: DEFAULT_AGING_WINDOW_DAYS,
        }
    }
}

impl RecommendationConfig {
    /// Thresholds must be fractions in `(0, 1]`; the window must not be negative.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("concentrationThreshold", self.concentration_threshold),
            ("cashDragThreshold", self.cash_drag_threshold),
        ] {
            if value <= Decimal::ZERO || value > Decimal::ONE {
                return Err(ValidationError::InvalidInput(format!(
                    "'{}' must be in (0, 1], got {}",
                    field, value
                ))
                .into());
            }
        }
        if self.aging_window_days < 0 {
            return Err(ValidationError::InvalidInput(format!(
                "'agingWindowDays' must not be negative, got {}",
                self.aging_window_days
            ))
            .into());
        }
        Ok(())
    }
}
