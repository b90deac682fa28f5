use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ValidationError};
use crate::recommendations::RecommendationConfig;

/// Marginal rates applied to net unrealized or realized gains.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaxSettings {
    /// Fraction, e.g. 0.24 for 24%.
    pub short_term_rate: Decimal,
    pub long_term_rate: Decimal,
}

impl Default for TaxSettings {
    fn default() -> Self {
        Self {
            short_term_rate: dec!(0.24),
            long_term_rate: dec!(0.15),
        }
    }
}

impl TaxSettings {
    pub fn new(short_term_rate: Decimal, long_term_rate: Decimal) -> Result<Self> {
        let settings = Self {
            short_term_rate,
            long_term_rate,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Both rates must be fractions in `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("shortTermRate", self.short_term_rate),
            ("longTermRate", self.long_term_rate),
        ] {
            if value < Decimal::ZERO || value > Decimal::ONE {
                return Err(ValidationError::InvalidTaxRate {
                    field: field.to_string(),
                    value,
                }
                .into());
            }
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub tax: TaxSettings,
    #[serde(default)]
    pub recommendations: RecommendationConfig,
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        self.tax.validate()?;
        self.recommendations.validate()
    }
}

/// Partial update; `None` keeps the stored section.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub tax: Option<TaxSettings>,
    pub recommendations: Option<RecommendationConfig>,
}
