//! Inventory ledger and consistency engine.
//!
//! This crate owns the rules that keep item stock levels, the transaction
//! history and the audit trail mutually consistent:
//! - [`ItemRegistry`] creates and reads items and applies audited field edits
//! - [`TransactionLedger`] appends purchases and sales and moves stock with them
//! - [`PaymentRecorder`] appends payments against existing transactions
//!
//! Every multi-row write is committed by the store as one atomic unit, so a
//! failed operation leaves no partial state behind.

mod audit;
pub mod error;
pub mod payments;
pub mod registry;
pub mod transactions;

pub use error::{ErrorKind, LedgerError, Result};
pub use payments::{AMOUNT_SCALE, PaymentRecorder};
pub use registry::ItemRegistry;
pub use transactions::{MAX_CONFLICT_ATTEMPTS, TransactionLedger, next_quantity};
