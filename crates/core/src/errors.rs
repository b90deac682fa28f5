//! Core error types for lotbook.
//!
//! Every error here is a local validation failure. Storage implementations
//! convert their own failures into `Error::Repository`.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the lotbook core.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Lot accounting failed: {0}")]
    Lot(#[from] LotError),

    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    #[error("Holding not found: {0}")]
    HoldingNotFound(String),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Errors raised while consuming or creating tax lots.
#[derive(Error, Debug, PartialEq)]
pub enum LotError {
    #[error("Insufficient quantity in {holding_id}: requested {requested}, available {available}")]
    InsufficientQuantity {
        holding_id: String,
        requested: Decimal,
        available: Decimal,
    },

    #[error("Lot {lot_id} not found in holding {holding_id}")]
    LotNotFound { holding_id: String, lot_id: String },

    #[error("Lot {lot_id} has {remaining} remaining but {requested} was selected")]
    LotOverConsumed {
        lot_id: String,
        requested: Decimal,
        remaining: Decimal,
    },

    #[error("Selected lot quantities sum to {selected}, sale requires {requested}")]
    SelectionMismatch {
        selected: Decimal,
        requested: Decimal,
    },

    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),
}

/// Validation errors for user input.
#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Ownership percentage {0} must be between 0 and 100")]
    InvalidOwnershipPercentage(Decimal),

    #[error("'{field}' must not be negative, got {value}")]
    NegativeAmount { field: String, value: Decimal },

    #[error("Shares withheld ({withheld}) exceed gross shares vested ({vested})")]
    InvalidWithholding { withheld: Decimal, vested: Decimal },

    #[error("ESPP grant date {grant_date} must be before purchase date {purchase_date}")]
    InvalidDispositionDates {
        grant_date: NaiveDate,
        purchase_date: NaiveDate,
    },

    #[error("Asset {asset_id} uses {actual} valuation, operation requires {expected}")]
    UnsupportedValuationMethod {
        asset_id: String,
        expected: String,
        actual: String,
    },

    #[error("Tax rate '{field}' must be between 0 and 1, got {value}")]
    InvalidTaxRate { field: String, value: Decimal },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),
}

impl ValidationError {
    pub fn negative(field: impl Into<String>, value: Decimal) -> Self {
        Self::NegativeAmount {
            field: field.into(),
            value,
        }
    }
}

/// Rejects negative values for fields that must be non-negative.
pub fn ensure_non_negative(
    field: &str,
    value: Decimal,
) -> std::result::Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::negative(field, value));
    }
    Ok(())
}

// === From implementations for common error types ===

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
