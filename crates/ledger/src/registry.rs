//! Item registry: creation, lookup and audited edits of items.

use common::ItemId;
use store::{InventoryStore, Item, NewItem, UpdateRecord};

use crate::audit::{UpdateAuditor, parse_field};
use crate::error::{LedgerError, Result};

/// Service for managing item records.
///
/// The registry never changes `quantity` after creation; stock moves only
/// through the [`crate::TransactionLedger`].
pub struct ItemRegistry<S: InventoryStore> {
    store: S,
    auditor: UpdateAuditor<S>,
}

impl<S: InventoryStore + Clone> ItemRegistry<S> {
    /// Creates a new registry over the given store.
    pub fn new(store: S) -> Self {
        Self {
            auditor: UpdateAuditor::new(store.clone()),
            store,
        }
    }
}

impl<S: InventoryStore> ItemRegistry<S> {
    /// Creates an item and returns its identifier.
    ///
    /// Fails if `name` is empty or `quantity` is negative.
    #[tracing::instrument(skip(self, name, contact_info, description))]
    pub async fn create_item(
        &self,
        name: impl Into<String>,
        contact_info: impl Into<String>,
        description: impl Into<String>,
        quantity: i64,
    ) -> Result<ItemId> {
        let name = name.into();
        if name.is_empty() {
            return Err(LedgerError::EmptyName);
        }
        if quantity < 0 {
            return Err(LedgerError::InvalidQuantity {
                quantity,
                reason: "must not be negative",
            });
        }

        let item = self
            .store
            .insert_item(NewItem {
                name,
                contact_info: contact_info.into(),
                description: description.into(),
                quantity,
            })
            .await?;

        tracing::debug!(item_id = %item.id, quantity, "item created");
        Ok(item.id)
    }

    /// Loads an item by id.
    #[tracing::instrument(skip(self))]
    pub async fn get_item(&self, item_id: ItemId) -> Result<Item> {
        self.store
            .get_item(item_id)
            .await?
            .ok_or(LedgerError::ItemNotFound(item_id))
    }

    /// Returns all items, ordered by id.
    #[tracing::instrument(skip(self))]
    pub async fn list_items(&self) -> Result<Vec<Item>> {
        Ok(self.store.list_items().await?)
    }

    /// Sets one field of an item and records the change in the audit trail.
    ///
    /// `field` must be one of `name`, `contact_info`, `description` or
    /// `quantity`; any other name fails with [`LedgerError::UnknownField`]
    /// before the store is touched. `quantity` is recognized but rejected
    /// with [`LedgerError::LedgerManagedField`].
    #[tracing::instrument(skip(self, new_value))]
    pub async fn update_field(
        &self,
        item_id: ItemId,
        field: &str,
        new_value: impl Into<String>,
    ) -> Result<UpdateRecord> {
        let field = parse_field(field)?;
        self.auditor.apply(item_id, field, new_value.into()).await
    }

    /// Returns the audit trail of an item, oldest change first.
    #[tracing::instrument(skip(self))]
    pub async fn history(&self, item_id: ItemId) -> Result<Vec<UpdateRecord>> {
        self.get_item(item_id).await?;
        self.auditor.history(item_id).await
    }
}
