use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Decimal precision for display
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Quantity threshold for significant positions
pub const QUANTITY_THRESHOLD: &str = "0.00000001";

/// Calendar days a lot must be held to count as long-term.
pub const LONG_TERM_HOLDING_DAYS: i64 = 365;

/// ESPP qualifying disposition: months that must pass after the offering grant date.
pub const ESPP_GRANT_HOLDING_MONTHS: u32 = 24;

/// ESPP qualifying disposition: months that must pass after the purchase date.
pub const ESPP_PURCHASE_HOLDING_MONTHS: u32 = 12;

/// Default ownership percentage for holdings.
pub const FULL_OWNERSHIP_PCT: i64 = 100;

/// Default aging-lot warning window in days.
pub const DEFAULT_AGING_WINDOW_DAYS: i64 = 30;

/// Default concentration threshold per asset type, as a fraction of total value.
pub const DEFAULT_CONCENTRATION_THRESHOLD: Decimal = dec!(0.15);

/// Default cash-drag threshold, as a fraction of total value.
pub const DEFAULT_CASH_DRAG_THRESHOLD: Decimal = dec!(0.20);
