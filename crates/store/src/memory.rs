use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::{
    InventoryStore, Item, ItemId, NewItem, NewPayment, Payment, PaymentId, Result, StockMovement,
    StockTransaction, StoreError, TextField, TransactionId, UpdateId, UpdateRecord,
};

#[derive(Default)]
struct Tables {
    items: BTreeMap<ItemId, Item>,
    transactions: Vec<StockTransaction>,
    updates: Vec<UpdateRecord>,
    payments: Vec<Payment>,
    last_item_id: i64,
}

/// In-memory store implementation.
///
/// All four relations live behind a single lock, so every compound write
/// runs under one write guard and is atomic with respect to readers and
/// other writers. Provides the same interface as the PostgreSQL
/// implementation.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of rows in each relation as
    /// `(items, transactions, updates, payments)`.
    pub async fn row_counts(&self) -> (usize, usize, usize, usize) {
        let tables = self.tables.read().await;
        (
            tables.items.len(),
            tables.transactions.len(),
            tables.updates.len(),
            tables.payments.len(),
        )
    }

    /// Clears all relations and resets identifier sequences.
    pub async fn clear(&self) {
        *self.tables.write().await = Tables::default();
    }
}

#[async_trait]
impl InventoryStore for InMemoryStore {
    async fn insert_item(&self, item: NewItem) -> Result<Item> {
        let mut tables = self.tables.write().await;

        tables.last_item_id += 1;
        let item = Item {
            id: ItemId::new(tables.last_item_id),
            name: item.name,
            contact_info: item.contact_info,
            description: item.description,
            quantity: item.quantity,
        };
        tables.items.insert(item.id, item.clone());

        Ok(item)
    }

    async fn get_item(&self, item_id: ItemId) -> Result<Option<Item>> {
        Ok(self.tables.read().await.items.get(&item_id).cloned())
    }

    async fn list_items(&self) -> Result<Vec<Item>> {
        Ok(self.tables.read().await.items.values().cloned().collect())
    }

    async fn record_stock_movement(&self, movement: StockMovement) -> Result<StockTransaction> {
        let mut tables = self.tables.write().await;

        let item = tables
            .items
            .get_mut(&movement.item_id)
            .ok_or(StoreError::ItemNotFound(movement.item_id))?;

        if item.quantity != movement.expected_quantity {
            return Err(StoreError::QuantityConflict {
                item_id: movement.item_id,
                expected: movement.expected_quantity,
                actual: item.quantity,
            });
        }
        item.quantity = movement.new_quantity;

        let transaction = StockTransaction {
            id: TransactionId::new(tables.transactions.len() as i64 + 1),
            item_id: movement.item_id,
            action: movement.action,
            quantity: movement.quantity,
            timestamp: Utc::now(),
            description: movement.description,
        };
        tables.transactions.push(transaction.clone());

        Ok(transaction)
    }

    async fn update_item_text(
        &self,
        item_id: ItemId,
        field: TextField,
        new_value: String,
    ) -> Result<UpdateRecord> {
        let mut tables = self.tables.write().await;

        let item = tables
            .items
            .get_mut(&item_id)
            .ok_or(StoreError::ItemNotFound(item_id))?;
        let old_value = item.text(field).to_string();
        item.set_text(field, new_value.clone());

        let update = UpdateRecord {
            id: UpdateId::new(tables.updates.len() as i64 + 1),
            item_id,
            field: field.into(),
            old_value,
            new_value,
            timestamp: Utc::now(),
        };
        tables.updates.push(update.clone());

        Ok(update)
    }

    async fn get_transaction(
        &self,
        transaction_id: TransactionId,
    ) -> Result<Option<StockTransaction>> {
        let tables = self.tables.read().await;
        Ok(tables
            .transactions
            .iter()
            .find(|t| t.id == transaction_id)
            .cloned())
    }

    async fn list_transactions(&self) -> Result<Vec<StockTransaction>> {
        Ok(self.tables.read().await.transactions.clone())
    }

    async fn list_transactions_for_item(&self, item_id: ItemId) -> Result<Vec<StockTransaction>> {
        let tables = self.tables.read().await;
        Ok(tables
            .transactions
            .iter()
            .filter(|t| t.item_id == item_id)
            .cloned()
            .collect())
    }

    async fn list_updates(&self) -> Result<Vec<UpdateRecord>> {
        Ok(self.tables.read().await.updates.clone())
    }

    async fn list_updates_for_item(&self, item_id: ItemId) -> Result<Vec<UpdateRecord>> {
        let tables = self.tables.read().await;
        Ok(tables
            .updates
            .iter()
            .filter(|u| u.item_id == item_id)
            .cloned()
            .collect())
    }

    async fn insert_payment(&self, payment: NewPayment) -> Result<Payment> {
        let mut tables = self.tables.write().await;

        let payment = Payment {
            id: PaymentId::new(tables.payments.len() as i64 + 1),
            transaction_id: payment.transaction_id,
            amount: payment.amount,
            method: payment.method,
            status: payment.status,
        };
        tables.payments.push(payment.clone());

        Ok(payment)
    }

    async fn list_payments(&self) -> Result<Vec<Payment>> {
        Ok(self.tables.read().await.payments.clone())
    }
}
