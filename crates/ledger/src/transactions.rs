//! Transaction ledger: the only path through which item stock changes.

use common::{ItemId, TransactionId};
use store::{InventoryStore, Item, StockAction, StockMovement, StockTransaction, StoreError};

use crate::error::{LedgerError, Result};

/// How many times a movement is recomputed when a concurrent writer
/// changed the item's quantity between read and commit.
pub const MAX_CONFLICT_ATTEMPTS: u32 = 3;

/// Computes an item's quantity after a movement.
///
/// Purchases add `quantity`; sales subtract it and are rejected outright
/// when fewer than `quantity` units are on hand. `quantity` must be
/// positive.
pub fn next_quantity(item: &Item, action: StockAction, quantity: i64) -> Result<i64> {
    if quantity <= 0 {
        return Err(LedgerError::InvalidQuantity {
            quantity,
            reason: "must be greater than 0",
        });
    }

    match action {
        StockAction::Purchase => {
            item.quantity
                .checked_add(quantity)
                .ok_or(LedgerError::QuantityOverflow {
                    item_id: item.id,
                    current: item.quantity,
                    quantity,
                })
        }
        StockAction::Sale => {
            if item.quantity < quantity {
                return Err(LedgerError::InsufficientStock {
                    item_id: item.id,
                    available: item.quantity,
                    requested: quantity,
                });
            }
            Ok(item.quantity - quantity)
        }
    }
}

/// Service for recording purchases and sales.
///
/// Each recorded transaction moves the item's quantity and appends the
/// immutable transaction row in one atomic unit. The quantity update is a
/// compare-and-set against the value the movement was computed from, so
/// interleaved writers can never lose an update.
pub struct TransactionLedger<S: InventoryStore> {
    store: S,
}

impl<S: InventoryStore> TransactionLedger<S> {
    /// Creates a new ledger over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Records a purchase or sale against an item.
    ///
    /// Fails without side effects when the item is missing, `quantity` is
    /// not positive, or a sale exceeds the quantity on hand. The resulting
    /// stock level is not returned; re-read the item to observe it.
    #[tracing::instrument(skip(self, description))]
    pub async fn record_transaction(
        &self,
        item_id: ItemId,
        action: StockAction,
        quantity: i64,
        description: impl Into<String>,
    ) -> Result<TransactionId> {
        if quantity <= 0 {
            return Err(LedgerError::InvalidQuantity {
                quantity,
                reason: "must be greater than 0",
            });
        }
        let description = description.into();

        let mut attempt = 0;
        loop {
            attempt += 1;

            let item = self
                .store
                .get_item(item_id)
                .await?
                .ok_or(LedgerError::ItemNotFound(item_id))?;

            let new_quantity = next_quantity(&item, action, quantity).inspect_err(|e| {
                if let LedgerError::InsufficientStock { available, .. } = e {
                    metrics::counter!("ledger_sales_rejected_total").increment(1);
                    tracing::warn!(available, requested = quantity, "sale rejected");
                }
            })?;

            let movement = StockMovement {
                item_id,
                action,
                quantity,
                expected_quantity: item.quantity,
                new_quantity,
                description: description.clone(),
            };

            match self.store.record_stock_movement(movement).await {
                Ok(transaction) => {
                    metrics::counter!(
                        "ledger_transactions_recorded_total",
                        "action" => action.as_str()
                    )
                    .increment(1);
                    tracing::debug!(
                        transaction_id = %transaction.id,
                        from = item.quantity,
                        to = new_quantity,
                        "transaction recorded"
                    );
                    return Ok(transaction.id);
                }
                Err(StoreError::QuantityConflict { actual, .. })
                    if attempt < MAX_CONFLICT_ATTEMPTS =>
                {
                    metrics::counter!("ledger_quantity_conflicts_total").increment(1);
                    tracing::warn!(
                        attempt,
                        expected = item.quantity,
                        actual,
                        "quantity changed concurrently, retrying"
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Returns the transactions recorded against an item, oldest first.
    #[tracing::instrument(skip(self))]
    pub async fn transactions_for_item(&self, item_id: ItemId) -> Result<Vec<StockTransaction>> {
        if self.store.get_item(item_id).await?.is_none() {
            return Err(LedgerError::ItemNotFound(item_id));
        }
        Ok(self.store.list_transactions_for_item(item_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use store::{InMemoryStore, NewItem};

    use super::*;
    use crate::ErrorKind;

    fn item(quantity: i64) -> Item {
        Item {
            id: ItemId::new(1),
            name: "Widget".to_string(),
            contact_info: String::new(),
            description: String::new(),
            quantity,
        }
    }

    #[test]
    fn purchase_adds_to_stock() {
        assert_eq!(next_quantity(&item(10), StockAction::Purchase, 5).unwrap(), 15);
    }

    #[test]
    fn sale_of_exact_stock_empties_item() {
        assert_eq!(next_quantity(&item(15), StockAction::Sale, 15).unwrap(), 0);
    }

    #[test]
    fn oversized_sale_is_insufficient_stock() {
        let err = next_quantity(&item(15), StockAction::Sale, 20).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InsufficientStock {
                available: 15,
                requested: 20,
                ..
            }
        ));
    }

    #[test]
    fn non_positive_quantities_are_invalid() {
        for quantity in [0, -3] {
            for action in [StockAction::Purchase, StockAction::Sale] {
                let err = next_quantity(&item(10), action, quantity).unwrap_err();
                assert_eq!(err.kind(), ErrorKind::Validation);
            }
        }
    }

    #[test]
    fn purchase_overflow_is_rejected() {
        let err = next_quantity(&item(i64::MAX), StockAction::Purchase, 1).unwrap_err();
        assert!(matches!(err, LedgerError::QuantityOverflow { .. }));
    }

    async fn ledger_with_item(
        quantity: i64,
    ) -> (TransactionLedger<InMemoryStore>, InMemoryStore, ItemId) {
        let store = InMemoryStore::new();
        let item = store
            .insert_item(NewItem {
                name: "Widget".to_string(),
                contact_info: "x@y.com".to_string(),
                description: "d".to_string(),
                quantity,
            })
            .await
            .unwrap();
        (TransactionLedger::new(store.clone()), store, item.id)
    }

    #[tokio::test]
    async fn sale_within_stock_decrements_quantity() {
        let (ledger, store, id) = ledger_with_item(10).await;

        let tx_id = ledger
            .record_transaction(id, StockAction::Sale, 4, "order")
            .await
            .unwrap();

        assert_eq!(tx_id, TransactionId::new(1));
        assert_eq!(store.get_item(id).await.unwrap().unwrap().quantity, 6);
        let recorded = ledger.transactions_for_item(id).await.unwrap();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].action, StockAction::Sale);
        assert_eq!(recorded[0].description, "order");
    }

    #[tokio::test]
    async fn rejected_sale_leaves_item_identical() {
        let (ledger, store, id) = ledger_with_item(3).await;
        let before = store.get_item(id).await.unwrap().unwrap();

        let err = ledger
            .record_transaction(id, StockAction::Sale, 4, "too many")
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InsufficientStock);
        assert_eq!(store.get_item(id).await.unwrap().unwrap(), before);
        assert!(store.list_transactions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_item_is_not_found() {
        let (ledger, store, _) = ledger_with_item(3).await;

        let err = ledger
            .record_transaction(ItemId::new(77), StockAction::Purchase, 1, "")
            .await
            .unwrap_err();

        assert!(matches!(err, LedgerError::ItemNotFound(id) if id == ItemId::new(77)));
        assert!(store.list_transactions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn zero_quantity_is_rejected_before_store_access() {
        let (ledger, store, id) = ledger_with_item(3).await;

        let err = ledger
            .record_transaction(id, StockAction::Purchase, 0, "")
            .await
            .unwrap_err();

        assert!(matches!(err, LedgerError::InvalidQuantity { quantity: 0, .. }));
        assert_eq!(store.row_counts().await, (1, 0, 0, 0));
    }

    #[tokio::test]
    async fn transactions_for_missing_item_is_not_found() {
        let (ledger, _, _) = ledger_with_item(0).await;
        let err = ledger
            .transactions_for_item(ItemId::new(2))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
