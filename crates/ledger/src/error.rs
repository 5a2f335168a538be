//! Ledger error types.

use common::{ItemId, TransactionId};
use rust_decimal::Decimal;
use store::{ItemField, StoreError};
use thiserror::Error;

/// Broad classification of a [`LedgerError`], for callers that only need
/// to decide how to react.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or out-of-range input.
    Validation,
    /// A referenced item or transaction does not exist.
    NotFound,
    /// A sale asked for more units than are on hand.
    InsufficientStock,
    /// The store failed or stayed contended; the operation had no effect.
    Storage,
}

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Item name is empty.
    #[error("Item name is required")]
    EmptyName,

    /// Quantity outside the accepted range.
    #[error("Invalid quantity: {quantity} ({reason})")]
    InvalidQuantity { quantity: i64, reason: &'static str },

    /// Applying the movement would overflow the stored quantity.
    #[error("Quantity overflow for item {item_id}: {current} + {quantity}")]
    QuantityOverflow {
        item_id: ItemId,
        current: i64,
        quantity: i64,
    },

    /// Payment amount outside what the payments relation can hold exactly.
    #[error("Invalid amount: {amount} ({reason})")]
    InvalidAmount {
        amount: Decimal,
        reason: &'static str,
    },

    /// Field name outside the updatable set.
    #[error("Unknown field '{field}' (expected name, contact_info, description or quantity)")]
    UnknownField { field: String },

    /// Field that only the transaction ledger may change.
    #[error("Field '{field}' can only change through purchase and sale transactions")]
    LedgerManagedField { field: ItemField },

    /// Item not found.
    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),

    /// Transaction not found.
    #[error("Transaction not found: {0}")]
    TransactionNotFound(TransactionId),

    /// Sale exceeds on-hand quantity.
    #[error("Insufficient stock for item {item_id}: available {available}, requested {requested}")]
    InsufficientStock {
        item_id: ItemId,
        available: i64,
        requested: i64,
    },

    /// An error occurred in the store.
    #[error("Store error: {0}")]
    Store(StoreError),
}

impl LedgerError {
    /// Returns the error's classification.
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::EmptyName
            | LedgerError::InvalidQuantity { .. }
            | LedgerError::QuantityOverflow { .. }
            | LedgerError::InvalidAmount { .. }
            | LedgerError::UnknownField { .. }
            | LedgerError::LedgerManagedField { .. } => ErrorKind::Validation,
            LedgerError::ItemNotFound(_) | LedgerError::TransactionNotFound(_) => {
                ErrorKind::NotFound
            }
            LedgerError::InsufficientStock { .. } => ErrorKind::InsufficientStock,
            LedgerError::Store(_) => ErrorKind::Storage,
        }
    }
}

impl From<StoreError> for LedgerError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::ItemNotFound(item_id) => LedgerError::ItemNotFound(item_id),
            other => LedgerError::Store(other),
        }
    }
}

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
