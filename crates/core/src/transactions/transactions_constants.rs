/// Transaction types
///
/// Each constant is the storage label of one supported transaction category.

/// Purchase of an asset. Appends one lot.
pub const TRANSACTION_TYPE_BUY: &str = "buy";

/// Disposal of an asset. Consumes lots under the chosen cost-basis method.
pub const TRANSACTION_TYPE_SELL: &str = "sell";

/// Cash dividend. Lots are unchanged.
pub const TRANSACTION_TYPE_DIVIDEND: &str = "dividend";

/// Stock split or reverse split. Scales lot quantities and per-share prices.
pub const TRANSACTION_TYPE_SPLIT: &str = "split";

/// Asset moved in from another account. Appends one lot at the carried-over basis.
pub const TRANSACTION_TYPE_TRANSFER_IN: &str = "transfer_in";

/// Asset moved out to another account. Consumes lots FIFO without a taxable disposal.
pub const TRANSACTION_TYPE_TRANSFER_OUT: &str = "transfer_out";

/// Stand-alone fee. Lots are unchanged.
pub const TRANSACTION_TYPE_FEE: &str = "fee";

/// Tax paid. Lots are unchanged.
pub const TRANSACTION_TYPE_TAX: &str = "tax";

/// Spinoff record. Recorded for history; lots are unchanged.
pub const TRANSACTION_TYPE_SPINOFF: &str = "spinoff";

/// Merger record. Recorded for history; lots are unchanged.
pub const TRANSACTION_TYPE_MERGER: &str = "merger";

/// Dividend reinvestment. Appends one lot.
pub const TRANSACTION_TYPE_REINVESTMENT: &str = "reinvestment";

/// Employee stock purchase plan purchase. Appends one ESPP lot at the discounted price.
pub const TRANSACTION_TYPE_ESPP_PURCHASE: &str = "espp_purchase";

/// Restricted stock unit vest. Appends one RSU lot of net shares at vesting FMV.
pub const TRANSACTION_TYPE_RSU_VEST: &str = "rsu_vest";

/// Transaction types that create a lot.
pub const LOT_CREATING_TRANSACTION_TYPES: [&str; 5] = [
    TRANSACTION_TYPE_BUY,
    TRANSACTION_TYPE_TRANSFER_IN,
    TRANSACTION_TYPE_REINVESTMENT,
    TRANSACTION_TYPE_ESPP_PURCHASE,
    TRANSACTION_TYPE_RSU_VEST,
];

/// Checks if a transaction type appends a lot to its holding.
pub fn creates_lot(transaction_type: &str) -> bool {
    LOT_CREATING_TRANSACTION_TYPES.contains(&transaction_type)
}
