//! The shell-facing operation surface.

use common::{ItemId, PaymentId, TransactionId};
use ledger::{ItemRegistry, PaymentRecorder, TransactionLedger};
use reports::{Report, ReportKind, ReportProjector};
use rust_decimal::Decimal;
use store::{
    InMemoryStore, InventoryStore, Item, PaymentMethod, PaymentStatus, PostgresStore,
    StockAction, StockTransaction, StoreConfig, UpdateRecord,
};

use crate::error::Result;

/// One inventory over one store handle.
///
/// Every component holds a clone of the same handle; there is no other
/// shared state, so two `Inventory` values over different stores are fully
/// independent.
pub struct Inventory<S: InventoryStore> {
    store: S,
    registry: ItemRegistry<S>,
    ledger: TransactionLedger<S>,
    payments: PaymentRecorder<S>,
    projector: ReportProjector<S>,
}

impl Inventory<PostgresStore> {
    /// Opens a Postgres-backed inventory and creates the relations if they
    /// do not exist yet.
    #[tracing::instrument(skip(config), fields(max_connections = config.max_connections))]
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        let store = PostgresStore::connect(config).await?;
        store.run_migrations().await?;
        tracing::info!("inventory schema ready");
        Ok(Self::new(store))
    }

    /// Closes the underlying connection pool.
    pub async fn close(&self) {
        self.store.close().await;
    }
}

impl Inventory<InMemoryStore> {
    /// Creates an empty inventory that lives only as long as the process.
    pub fn in_memory() -> Self {
        Self::new(InMemoryStore::new())
    }
}

impl<S: InventoryStore + Clone> Inventory<S> {
    /// Creates an inventory over an already opened store.
    pub fn new(store: S) -> Self {
        Self {
            registry: ItemRegistry::new(store.clone()),
            ledger: TransactionLedger::new(store.clone()),
            payments: PaymentRecorder::new(store.clone()),
            projector: ReportProjector::new(store.clone()),
            store,
        }
    }
}

impl<S: InventoryStore> Inventory<S> {
    /// Returns the underlying store handle.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Creates an item and returns its identifier.
    #[tracing::instrument(skip(self, name, contact_info, description))]
    pub async fn create_item(
        &self,
        name: impl Into<String>,
        contact_info: impl Into<String>,
        description: impl Into<String>,
        quantity: i64,
    ) -> Result<ItemId> {
        Ok(self
            .registry
            .create_item(name, contact_info, description, quantity)
            .await?)
    }

    /// Loads an item by id.
    #[tracing::instrument(skip(self))]
    pub async fn get_item(&self, item_id: ItemId) -> Result<Item> {
        Ok(self.registry.get_item(item_id).await?)
    }

    /// Sets one named field of an item, recording the change.
    #[tracing::instrument(skip(self, new_value))]
    pub async fn update_field(
        &self,
        item_id: ItemId,
        field: &str,
        new_value: impl Into<String>,
    ) -> Result<UpdateRecord> {
        Ok(self.registry.update_field(item_id, field, new_value).await?)
    }

    /// Records a purchase or sale and moves the item's stock with it.
    #[tracing::instrument(skip(self, description))]
    pub async fn record_transaction(
        &self,
        item_id: ItemId,
        action: StockAction,
        quantity: i64,
        description: impl Into<String>,
    ) -> Result<TransactionId> {
        Ok(self
            .ledger
            .record_transaction(item_id, action, quantity, description)
            .await?)
    }

    /// Records a payment against a transaction.
    #[tracing::instrument(skip(self))]
    pub async fn record_payment(
        &self,
        transaction_id: TransactionId,
        amount: Decimal,
        method: PaymentMethod,
        status: PaymentStatus,
    ) -> Result<PaymentId> {
        Ok(self
            .payments
            .record_payment(transaction_id, amount, method, status)
            .await?)
    }

    /// Generates a read-only report.
    #[tracing::instrument(skip(self))]
    pub async fn generate_report(&self, kind: ReportKind) -> Result<Report> {
        Ok(self.projector.generate_report(kind).await?)
    }

    /// Returns the audit trail of an item, oldest change first.
    #[tracing::instrument(skip(self))]
    pub async fn history(&self, item_id: ItemId) -> Result<Vec<UpdateRecord>> {
        Ok(self.registry.history(item_id).await?)
    }

    /// Returns the transactions recorded against an item, oldest first.
    #[tracing::instrument(skip(self))]
    pub async fn transactions_for_item(&self, item_id: ItemId) -> Result<Vec<StockTransaction>> {
        Ok(self.ledger.transactions_for_item(item_id).await?)
    }
}
