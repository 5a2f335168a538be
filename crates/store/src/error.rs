use thiserror::Error;

use crate::{ItemId, ParseEnumError};

/// Errors that can occur when interacting with the inventory store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The referenced item row does not exist.
    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),

    /// A stock movement was computed against a quantity that has since changed.
    #[error(
        "Quantity conflict for item {item_id}: expected quantity {expected}, found {actual}"
    )]
    QuantityConflict {
        item_id: ItemId,
        expected: i64,
        actual: i64,
    },

    /// A stored enum column holds a value outside its enumeration.
    #[error("Invalid column value: {0}")]
    InvalidColumnValue(#[from] ParseEnumError),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
