//! Identifier types shared across the inventory ledger crates.

mod types;

pub use types::{ItemId, PaymentId, TransactionId, UpdateId};
