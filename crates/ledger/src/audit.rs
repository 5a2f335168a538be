//! Audited field edits.
//!
//! Every accepted edit writes the new value and an audit row holding the
//! previous and new value in one atomic unit, so neither can be observed
//! without the other.

use common::ItemId;
use store::{InventoryStore, ItemField, UpdateRecord};

use crate::error::{LedgerError, Result};

/// Resolves a caller-supplied field name against the updatable set.
pub(crate) fn parse_field(field: &str) -> Result<ItemField> {
    field.parse().map_err(|_| LedgerError::UnknownField {
        field: field.to_string(),
    })
}

/// Applies field edits for the registry; not reachable any other way.
pub(crate) struct UpdateAuditor<S: InventoryStore> {
    store: S,
}

impl<S: InventoryStore> UpdateAuditor<S> {
    pub(crate) fn new(store: S) -> Self {
        Self { store }
    }

    /// Validates and applies one edit.
    ///
    /// Rejected edits return before the store is touched.
    pub(crate) async fn apply(
        &self,
        item_id: ItemId,
        field: ItemField,
        new_value: String,
    ) -> Result<UpdateRecord> {
        let text_field = field
            .text_field()
            .ok_or(LedgerError::LedgerManagedField { field })?;

        if field == ItemField::Name && new_value.is_empty() {
            return Err(LedgerError::EmptyName);
        }

        let update = self
            .store
            .update_item_text(item_id, text_field, new_value)
            .await?;

        metrics::counter!("ledger_item_updates_total", "field" => field.as_str()).increment(1);
        tracing::debug!(
            %item_id,
            update_id = %update.id,
            field = field.as_str(),
            "item field updated"
        );

        Ok(update)
    }

    /// Returns the audit rows for an item, oldest first.
    pub(crate) async fn history(&self, item_id: ItemId) -> Result<Vec<UpdateRecord>> {
        Ok(self.store.list_updates_for_item(item_id).await?)
    }
}
