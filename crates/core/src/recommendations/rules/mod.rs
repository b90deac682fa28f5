//! Built-in recommendation rules.

pub mod aging_lots;
pub mod cash_drag;
pub mod concentration;

pub use aging_lots::AgingLotsRule;
pub use cash_drag::CashDragRule;
pub use concentration::ConcentrationRule;

use rust_decimal::Decimal;

use crate::constants::DISPLAY_DECIMAL_PRECISION;

/// Formats a fraction as a display percentage, e.g. `0.2345` -> `23.45`.
pub(crate) fn display_pct(fraction: Decimal) -> Decimal {
    (fraction * Decimal::ONE_HUNDRED).round_dp(DISPLAY_DECIMAL_PRECISION)
}
