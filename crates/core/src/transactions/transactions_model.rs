//! Transaction domain models.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::{ensure_non_negative, LotError, Result, ValidationError};
use crate::portfolio::lots::CostBasisMethod;
use crate::transactions::transactions_constants::*;

/// Flat transaction type label, as stored and displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Buy,
    Sell,
    Dividend,
    Split,
    TransferIn,
    TransferOut,
    Fee,
    Tax,
    Spinoff,
    Merger,
    Reinvestment,
    EsppPurchase,
    RsuVest,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Buy => TRANSACTION_TYPE_BUY,
            TransactionType::Sell => TRANSACTION_TYPE_SELL,
            TransactionType::Dividend => TRANSACTION_TYPE_DIVIDEND,
            TransactionType::Split => TRANSACTION_TYPE_SPLIT,
            TransactionType::TransferIn => TRANSACTION_TYPE_TRANSFER_IN,
            TransactionType::TransferOut => TRANSACTION_TYPE_TRANSFER_OUT,
            TransactionType::Fee => TRANSACTION_TYPE_FEE,
            TransactionType::Tax => TRANSACTION_TYPE_TAX,
            TransactionType::Spinoff => TRANSACTION_TYPE_SPINOFF,
            TransactionType::Merger => TRANSACTION_TYPE_MERGER,
            TransactionType::Reinvestment => TRANSACTION_TYPE_REINVESTMENT,
            TransactionType::EsppPurchase => TRANSACTION_TYPE_ESPP_PURCHASE,
            TransactionType::RsuVest => TRANSACTION_TYPE_RSU_VEST,
        }
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            TRANSACTION_TYPE_BUY => Ok(TransactionType::Buy),
            TRANSACTION_TYPE_SELL => Ok(TransactionType::Sell),
            TRANSACTION_TYPE_DIVIDEND => Ok(TransactionType::Dividend),
            TRANSACTION_TYPE_SPLIT => Ok(TransactionType::Split),
            TRANSACTION_TYPE_TRANSFER_IN => Ok(TransactionType::TransferIn),
            TRANSACTION_TYPE_TRANSFER_OUT => Ok(TransactionType::TransferOut),
            TRANSACTION_TYPE_FEE => Ok(TransactionType::Fee),
            TRANSACTION_TYPE_TAX => Ok(TransactionType::Tax),
            TRANSACTION_TYPE_SPINOFF => Ok(TransactionType::Spinoff),
            TRANSACTION_TYPE_MERGER => Ok(TransactionType::Merger),
            TRANSACTION_TYPE_REINVESTMENT => Ok(TransactionType::Reinvestment),
            TRANSACTION_TYPE_ESPP_PURCHASE => Ok(TransactionType::EsppPurchase),
            TRANSACTION_TYPE_RSU_VEST => Ok(TransactionType::RsuVest),
            _ => Err(format!("Unknown transaction type: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Type-specific payload of a transaction. Each variant carries only the
/// fields that matter for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum TransactionKind {
    Buy {
        quantity: Decimal,
        price: Decimal,
    },
    Sell {
        quantity: Decimal,
        price: Decimal,
        #[serde(default)]
        method: CostBasisMethod,
    },
    Dividend {
        amount: Decimal,
    },
    Split {
        /// New shares per old share (2 for a 2:1 split, 0.1 for a 1:10 reverse split).
        ratio: Decimal,
    },
    TransferIn {
        quantity: Decimal,
        /// Carried-over cost per unit.
        price: Decimal,
    },
    TransferOut {
        quantity: Decimal,
    },
    Fee {
        amount: Decimal,
    },
    Tax {
        amount: Decimal,
    },
    Spinoff,
    Merger,
    Reinvestment {
        quantity: Decimal,
        price: Decimal,
    },
    EsppPurchase {
        quantity: Decimal,
        /// Discounted price actually paid per share.
        purchase_price: Decimal,
        /// Fair market value per share on the purchase date.
        market_price: Decimal,
        grant_date: NaiveDate,
        discount_percent: Decimal,
    },
    RsuVest {
        gross_shares: Decimal,
        shares_withheld: Decimal,
        /// Fair market value per share on the vesting date.
        vesting_price: Decimal,
    },
}

impl TransactionKind {
    pub fn transaction_type(&self) -> TransactionType {
        match self {
            TransactionKind::Buy { .. } => TransactionType::Buy,
            TransactionKind::Sell { .. } => TransactionType::Sell,
            TransactionKind::Dividend { .. } => TransactionType::Dividend,
            TransactionKind::Split { .. } => TransactionType::Split,
            TransactionKind::TransferIn { .. } => TransactionType::TransferIn,
            TransactionKind::TransferOut { .. } => TransactionType::TransferOut,
            TransactionKind::Fee { .. } => TransactionType::Fee,
            TransactionKind::Tax { .. } => TransactionType::Tax,
            TransactionKind::Spinoff => TransactionType::Spinoff,
            TransactionKind::Merger => TransactionType::Merger,
            TransactionKind::Reinvestment { .. } => TransactionType::Reinvestment,
            TransactionKind::EsppPurchase { .. } => TransactionType::EsppPurchase,
            TransactionKind::RsuVest { .. } => TransactionType::RsuVest,
        }
    }
}

/// Immutable historical record. Corrections are new transactions, never edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub portfolio_id: String,
    pub asset_id: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub fees: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(flatten)]
    pub kind: TransactionKind,
}

impl Transaction {
    pub fn transaction_type(&self) -> TransactionType {
        self.kind.transaction_type()
    }

    /// Calendar date used for lot purchase dates and holding periods.
    pub fn effective_date(&self) -> NaiveDate {
        self.date.date_naive()
    }

    /// Units moved by this transaction. RSU vests report net shares.
    pub fn quantity(&self) -> Decimal {
        match &self.kind {
            TransactionKind::Buy { quantity, .. }
            | TransactionKind::Sell { quantity, .. }
            | TransactionKind::TransferIn { quantity, .. }
            | TransactionKind::TransferOut { quantity }
            | TransactionKind::Reinvestment { quantity, .. }
            | TransactionKind::EsppPurchase { quantity, .. } => *quantity,
            TransactionKind::RsuVest {
                gross_shares,
                shares_withheld,
                ..
            } => *gross_shares - *shares_withheld,
            _ => Decimal::ZERO,
        }
    }

    /// Per-unit price. ESPP reports the discounted price paid, RSU the vesting FMV.
    pub fn price(&self) -> Decimal {
        match &self.kind {
            TransactionKind::Buy { price, .. }
            | TransactionKind::Sell { price, .. }
            | TransactionKind::TransferIn { price, .. }
            | TransactionKind::Reinvestment { price, .. } => *price,
            TransactionKind::EsppPurchase { purchase_price, .. } => *purchase_price,
            TransactionKind::RsuVest { vesting_price, .. } => *vesting_price,
            _ => Decimal::ZERO,
        }
    }

    /// Gross amount before fees: quantity × price for trades, the cash amount otherwise.
    pub fn total_amount(&self) -> Decimal {
        match &self.kind {
            TransactionKind::Dividend { amount }
            | TransactionKind::Fee { amount }
            | TransactionKind::Tax { amount } => *amount,
            TransactionKind::Split { .. }
            | TransactionKind::Spinoff
            | TransactionKind::Merger
            | TransactionKind::TransferOut { .. } => Decimal::ZERO,
            _ => self.quantity() * self.price(),
        }
    }

    /// Validates every numeric field before the transaction touches any lot.
    pub fn validate(&self) -> Result<()> {
        ensure_non_negative("fees", self.fees)?;
        match &self.kind {
            TransactionKind::Buy { quantity, price }
            | TransactionKind::TransferIn { quantity, price }
            | TransactionKind::Reinvestment { quantity, price }
            | TransactionKind::Sell {
                quantity, price, ..
            } => {
                ensure_non_negative("quantity", *quantity)?;
                ensure_non_negative("price", *price)?;
                ensure_positive_quantity(&self.id, *quantity)?;
            }
            TransactionKind::TransferOut { quantity } => {
                ensure_non_negative("quantity", *quantity)?;
                ensure_positive_quantity(&self.id, *quantity)?;
            }
            TransactionKind::Dividend { amount }
            | TransactionKind::Fee { amount }
            | TransactionKind::Tax { amount } => {
                ensure_non_negative("amount", *amount)?;
            }
            TransactionKind::Split { ratio } => {
                if *ratio <= Decimal::ZERO {
                    return Err(LotError::InvalidTransaction(format!(
                        "Split ratio must be positive, got {} for transaction {}",
                        ratio, self.id
                    ))
                    .into());
                }
            }
            TransactionKind::Spinoff | TransactionKind::Merger => {}
            TransactionKind::EsppPurchase {
                quantity,
                purchase_price,
                market_price,
                grant_date,
                discount_percent,
            } => {
                ensure_non_negative("quantity", *quantity)?;
                ensure_non_negative("purchasePrice", *purchase_price)?;
                ensure_non_negative("marketPrice", *market_price)?;
                ensure_non_negative("discountPercent", *discount_percent)?;
                if *discount_percent > Decimal::ONE_HUNDRED {
                    return Err(ValidationError::InvalidInput(format!(
                        "discountPercent must be between 0 and 100, got {}",
                        discount_percent
                    ))
                    .into());
                }
                ensure_positive_quantity(&self.id, *quantity)?;
                if *grant_date >= self.effective_date() {
                    return Err(ValidationError::InvalidDispositionDates {
                        grant_date: *grant_date,
                        purchase_date: self.effective_date(),
                    }
                    .into());
                }
            }
            TransactionKind::RsuVest {
                gross_shares,
                shares_withheld,
                vesting_price,
            } => {
                ensure_non_negative("grossShares", *gross_shares)?;
                ensure_non_negative("sharesWithheld", *shares_withheld)?;
                ensure_non_negative("vestingPrice", *vesting_price)?;
                if shares_withheld > gross_shares {
                    return Err(ValidationError::InvalidWithholding {
                        withheld: *shares_withheld,
                        vested: *gross_shares,
                    }
                    .into());
                }
            }
        }
        Ok(())
    }
}

fn ensure_positive_quantity(transaction_id: &str, quantity: Decimal) -> Result<()> {
    if quantity.is_zero() {
        return Err(LotError::InvalidTransaction(format!(
            "Transaction {} has zero quantity",
            transaction_id
        ))
        .into());
    }
    Ok(())
}

/// Input model for recording a new transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub id: Option<String>,
    pub portfolio_id: String,
    pub asset_id: String,
    pub date: DateTime<Utc>,
    pub fees: Option<Decimal>,
    pub notes: Option<String>,
    #[serde(flatten)]
    pub kind: TransactionKind,
}

impl NewTransaction {
    /// Assigns an id when none was supplied and validates the result.
    pub fn into_transaction(self) -> Result<Transaction> {
        if self.portfolio_id.trim().is_empty() {
            return Err(
                ValidationError::InvalidInput("Portfolio ID cannot be empty".to_string()).into(),
            );
        }
        if self.asset_id.trim().is_empty() {
            return Err(
                ValidationError::InvalidInput("Asset ID cannot be empty".to_string()).into(),
            );
        }
        let transaction = Transaction {
            id: self.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            portfolio_id: self.portfolio_id,
            asset_id: self.asset_id,
            date: self.date,
            fees: self.fees.unwrap_or(Decimal::ZERO),
            notes: self.notes,
            kind: self.kind,
        };
        transaction.validate()?;
        Ok(transaction)
    }
}
