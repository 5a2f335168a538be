//! Report error types.

use thiserror::Error;

/// Errors that can occur while generating a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The requested report kind is not one of the known projections.
    #[error("Unknown report kind: '{0}'")]
    UnknownKind(String),

    /// An error occurred in the store.
    #[error("Store error: {0}")]
    Store(#[from] store::StoreError),
}

impl ReportError {
    /// Returns true if the error was caused by caller input rather than
    /// the store.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::UnknownKind(_))
    }
}

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;
