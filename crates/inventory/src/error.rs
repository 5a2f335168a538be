//! Errors returned by the operation surface.

use ledger::{ErrorKind, LedgerError};
use reports::ReportError;
use store::StoreError;
use thiserror::Error;

/// Any error an [`crate::Inventory`] operation can return.
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Report(#[from] ReportError),

    /// Opening or migrating the store failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl InventoryError {
    /// Returns the error's classification.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Ledger(e) => e.kind(),
            Self::Report(e) if e.is_validation() => ErrorKind::Validation,
            Self::Report(_) | Self::Store(_) => ErrorKind::Storage,
        }
    }
}

/// Result type for inventory operations.
pub type Result<T> = std::result::Result<T, InventoryError>;
