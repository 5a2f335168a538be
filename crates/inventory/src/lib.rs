//! Inventory tracking core.
//!
//! [`Inventory`] is the operation surface an interactive shell drives:
//! it takes already-parsed arguments and returns typed results or a typed
//! [`InventoryError`], never text. Rendering and prompting stay with the
//! caller.

pub mod config;
pub mod error;
pub mod service;
pub mod telemetry;

pub use common::{ItemId, PaymentId, TransactionId, UpdateId};
pub use config::Config;
pub use error::{InventoryError, Result};
pub use ledger::ErrorKind;
pub use reports::{Report, ReportKind};
pub use service::Inventory;
pub use store::{
    InMemoryStore, InventoryStore, Item, ItemField, Payment, PaymentMethod, PaymentStatus,
    PostgresStore, StockAction, StockTransaction, StoreConfig, UpdateRecord,
};
