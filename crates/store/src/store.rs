use async_trait::async_trait;

use crate::{
    Item, ItemId, NewItem, NewPayment, Payment, Result, StockMovement, StockTransaction,
    TextField, TransactionId, UpdateRecord,
};

/// Core trait for inventory store implementations.
///
/// The store owns the four relations (items, transactions, updates,
/// payments). Compound writes are atomic: either every row they touch is
/// visible afterwards or none is. All implementations must be thread-safe
/// (Send + Sync).
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Inserts a new item and returns it with its assigned id.
    async fn insert_item(&self, item: NewItem) -> Result<Item>;

    /// Retrieves an item by id.
    ///
    /// Returns None if the item doesn't exist.
    async fn get_item(&self, item_id: ItemId) -> Result<Option<Item>>;

    /// Retrieves all items, ordered by id.
    async fn list_items(&self) -> Result<Vec<Item>>;

    /// Applies a stock movement and appends its transaction row.
    ///
    /// The quantity update is a compare-and-set: it fails with
    /// `QuantityConflict` if the stored quantity is no longer
    /// `movement.expected_quantity`, and with `ItemNotFound` if the item
    /// row is missing. The transaction timestamp is assigned inside the
    /// atomic unit.
    async fn record_stock_movement(&self, movement: StockMovement) -> Result<StockTransaction>;

    /// Overwrites one text field of an item and appends the audit row
    /// holding the previous and new value.
    async fn update_item_text(
        &self,
        item_id: ItemId,
        field: TextField,
        new_value: String,
    ) -> Result<UpdateRecord>;

    /// Retrieves a transaction by id.
    async fn get_transaction(
        &self,
        transaction_id: TransactionId,
    ) -> Result<Option<StockTransaction>>;

    /// Retrieves all transactions, ordered by id.
    async fn list_transactions(&self) -> Result<Vec<StockTransaction>>;

    /// Retrieves the transactions of one item, ordered by id.
    async fn list_transactions_for_item(&self, item_id: ItemId) -> Result<Vec<StockTransaction>>;

    /// Retrieves all audit rows, ordered by id.
    async fn list_updates(&self) -> Result<Vec<UpdateRecord>>;

    /// Retrieves the audit rows of one item, ordered by id.
    async fn list_updates_for_item(&self, item_id: ItemId) -> Result<Vec<UpdateRecord>>;

    /// Appends a payment row.
    async fn insert_payment(&self, payment: NewPayment) -> Result<Payment>;

    /// Retrieves all payments, ordered by id.
    async fn list_payments(&self) -> Result<Vec<Payment>>;
}

/// Extension trait providing convenience methods for inventory stores.
#[async_trait]
pub trait StoreExt: InventoryStore {
    /// Checks if an item exists.
    async fn item_exists(&self, item_id: ItemId) -> Result<bool> {
        Ok(self.get_item(item_id).await?.is_some())
    }

    /// Checks if a transaction exists.
    async fn transaction_exists(&self, transaction_id: TransactionId) -> Result<bool> {
        Ok(self.get_transaction(transaction_id).await?.is_some())
    }
}

// Blanket implementation for all InventoryStore implementations
impl<T: InventoryStore + ?Sized> StoreExt for T {}
