pub mod config;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod record;
pub mod store;

pub use common::{ItemId, PaymentId, TransactionId, UpdateId};
pub use config::StoreConfig;
pub use error::{Result, StoreError};
pub use memory::InMemoryStore;
pub use postgres::PostgresStore;
pub use record::{
    Item, ItemField, NewItem, NewPayment, ParseEnumError, Payment, PaymentMethod, PaymentStatus,
    StockAction, StockMovement, StockTransaction, TextField, UpdateRecord,
};
pub use store::{InventoryStore, StoreExt};
