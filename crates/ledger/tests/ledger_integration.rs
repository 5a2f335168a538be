//! Integration tests for the ledger services.
//!
//! These tests drive the registry, ledger and payment recorder together
//! over one store and check that stock, history and audit trail stay
//! consistent.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use common::{ItemId, TransactionId};
use ledger::{
    ErrorKind, ItemRegistry, LedgerError, MAX_CONFLICT_ATTEMPTS, PaymentRecorder,
    TransactionLedger,
};
use rust_decimal::Decimal;
use store::{
    InMemoryStore, InventoryStore, Item, NewItem, NewPayment, Payment, PaymentMethod,
    PaymentStatus, StockAction, StockMovement, StockTransaction, StoreError, TextField,
    UpdateRecord,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

struct Services {
    store: InMemoryStore,
    registry: ItemRegistry<InMemoryStore>,
    ledger: TransactionLedger<InMemoryStore>,
    payments: PaymentRecorder<InMemoryStore>,
}

fn services() -> Services {
    init_tracing();
    let store = InMemoryStore::new();
    Services {
        registry: ItemRegistry::new(store.clone()),
        ledger: TransactionLedger::new(store.clone()),
        payments: PaymentRecorder::new(store.clone()),
        store,
    }
}

mod stock_scenario {
    use super::*;

    #[tokio::test]
    async fn restock_then_oversell_then_sell_out() {
        let s = services();

        let id = s
            .registry
            .create_item("Widget", "x@y.com", "d", 10)
            .await
            .unwrap();
        assert_eq!(id, ItemId::new(1));

        s.ledger
            .record_transaction(id, StockAction::Purchase, 5, "restock")
            .await
            .unwrap();
        assert_eq!(s.registry.get_item(id).await.unwrap().quantity, 15);

        let before = s.registry.get_item(id).await.unwrap();
        let err = s
            .ledger
            .record_transaction(id, StockAction::Sale, 20, "bulk order")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientStock);
        assert_eq!(s.registry.get_item(id).await.unwrap(), before);

        s.ledger
            .record_transaction(id, StockAction::Sale, 15, "order")
            .await
            .unwrap();
        assert_eq!(s.registry.get_item(id).await.unwrap().quantity, 0);

        let items = s.registry.list_items().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 0);

        let history = s.ledger.transactions_for_item(id).await.unwrap();
        let descriptions: Vec<_> = history.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(descriptions, ["restock", "order"]);
    }

    #[tokio::test]
    async fn quantity_always_matches_replayed_history() {
        let s = services();
        let initial = 7;
        let id = s.registry.create_item("Bolt", "", "", initial).await.unwrap();

        let moves = [
            (StockAction::Sale, 3),
            (StockAction::Sale, 5),
            (StockAction::Purchase, 12),
            (StockAction::Sale, 16),
            (StockAction::Sale, 1),
            (StockAction::Purchase, 1),
            (StockAction::Sale, 2),
            (StockAction::Sale, 1),
        ];

        for (action, quantity) in moves {
            let result = s.ledger.record_transaction(id, action, quantity, "").await;
            let current = s.registry.get_item(id).await.unwrap().quantity;
            assert!(current >= 0);
            if let Err(e) = result {
                assert_eq!(e.kind(), ErrorKind::InsufficientStock);
            }
        }

        let replayed = s
            .ledger
            .transactions_for_item(id)
            .await
            .unwrap()
            .iter()
            .fold(initial, |q, t| match t.action {
                StockAction::Purchase => q + t.quantity,
                StockAction::Sale => q - t.quantity,
            });

        assert_eq!(s.registry.get_item(id).await.unwrap().quantity, replayed);
        // 7 -3 =4, -5 rejected, +12 =16, -16 =0, -1 rejected, +1 =1, -2 rejected, -1 =0
        assert_eq!(replayed, 0);
        assert_eq!(s.store.list_transactions().await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn items_move_independently() {
        let s = services();
        let a = s.registry.create_item("A", "", "", 1).await.unwrap();
        let b = s.registry.create_item("B", "", "", 1).await.unwrap();

        s.ledger
            .record_transaction(a, StockAction::Purchase, 9, "")
            .await
            .unwrap();

        assert_eq!(s.registry.get_item(a).await.unwrap().quantity, 10);
        assert_eq!(s.registry.get_item(b).await.unwrap().quantity, 1);
    }
}

mod audit_trail {
    use super::*;

    #[tokio::test]
    async fn every_edit_produces_exactly_one_audit_row() {
        let s = services();
        let id = s
            .registry
            .create_item("Widget", "x@y.com", "d", 10)
            .await
            .unwrap();

        let edits = [
            ("name", "Sprocket"),
            ("contact_info", "sales@y.com"),
            ("name", "Gear"),
            ("description", ""),
        ];

        for (i, (field, value)) in edits.into_iter().enumerate() {
            let before = s.registry.get_item(id).await.unwrap();
            let update = s.registry.update_field(id, field, value).await.unwrap();

            let expected_old = match field {
                "name" => before.name,
                "contact_info" => before.contact_info,
                _ => before.description,
            };
            assert_eq!(update.old_value, expected_old);
            assert_eq!(update.new_value, value);
            assert_eq!(s.registry.history(id).await.unwrap().len(), i + 1);
        }

        let item = s.registry.get_item(id).await.unwrap();
        assert_eq!(item.name, "Gear");
        assert_eq!(item.contact_info, "sales@y.com");
        assert_eq!(item.description, "");
        assert_eq!(item.quantity, 10);
    }

    #[tokio::test]
    async fn rejected_edits_leave_no_trace() {
        let s = services();
        let id = s.registry.create_item("Widget", "", "", 3).await.unwrap();
        let before = s.registry.get_item(id).await.unwrap();

        for (field, value) in [("price", "9"), ("quantity", "100"), ("name", "")] {
            let err = s.registry.update_field(id, field, value).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation);
        }

        assert_eq!(s.registry.get_item(id).await.unwrap(), before);
        assert!(s.registry.history(id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn stock_movements_are_not_audit_rows() {
        let s = services();
        let id = s.registry.create_item("Widget", "", "", 3).await.unwrap();

        s.ledger
            .record_transaction(id, StockAction::Purchase, 2, "")
            .await
            .unwrap();

        assert!(s.registry.history(id).await.unwrap().is_empty());
    }
}

mod payments {
    use super::*;

    #[tokio::test]
    async fn payment_references_recorded_sale() {
        let s = services();
        let id = s.registry.create_item("Widget", "", "", 3).await.unwrap();
        let tx = s
            .ledger
            .record_transaction(id, StockAction::Sale, 1, "order")
            .await
            .unwrap();

        let first = s
            .payments
            .record_payment(tx, Decimal::new(500, 2), PaymentMethod::Cash, PaymentStatus::Paid)
            .await
            .unwrap();
        let second = s
            .payments
            .record_payment(
                tx,
                Decimal::new(99999, 2),
                PaymentMethod::Credit,
                PaymentStatus::Pending,
            )
            .await
            .unwrap();

        assert!(first < second);
        assert_eq!(s.store.list_payments().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn payment_for_unknown_transaction_is_not_found() {
        let s = services();

        let err = s
            .payments
            .record_payment(
                TransactionId::new(1),
                Decimal::ONE,
                PaymentMethod::Cash,
                PaymentStatus::Paid,
            )
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}

/// Store wrapper that lets another writer bump an item's quantity right
/// before the first `conflicts` stock movements commit.
#[derive(Clone)]
struct ContendedStore {
    inner: InMemoryStore,
    conflicts: Arc<AtomicU32>,
}

#[async_trait]
impl InventoryStore for ContendedStore {
    async fn insert_item(&self, item: NewItem) -> store::Result<Item> {
        self.inner.insert_item(item).await
    }

    async fn get_item(&self, item_id: ItemId) -> store::Result<Option<Item>> {
        self.inner.get_item(item_id).await
    }

    async fn list_items(&self) -> store::Result<Vec<Item>> {
        self.inner.list_items().await
    }

    async fn record_stock_movement(
        &self,
        movement: StockMovement,
    ) -> store::Result<StockTransaction> {
        let remaining = self.conflicts.load(Ordering::SeqCst);
        if remaining > 0 {
            self.conflicts.store(remaining - 1, Ordering::SeqCst);
            let current = movement.expected_quantity;
            self.inner
                .record_stock_movement(StockMovement {
                    item_id: movement.item_id,
                    action: StockAction::Purchase,
                    quantity: 1,
                    expected_quantity: current,
                    new_quantity: current + 1,
                    description: "concurrent restock".to_string(),
                })
                .await?;
        }
        self.inner.record_stock_movement(movement).await
    }

    async fn update_item_text(
        &self,
        item_id: ItemId,
        field: TextField,
        new_value: String,
    ) -> store::Result<UpdateRecord> {
        self.inner.update_item_text(item_id, field, new_value).await
    }

    async fn get_transaction(
        &self,
        transaction_id: TransactionId,
    ) -> store::Result<Option<StockTransaction>> {
        self.inner.get_transaction(transaction_id).await
    }

    async fn list_transactions(&self) -> store::Result<Vec<StockTransaction>> {
        self.inner.list_transactions().await
    }

    async fn list_transactions_for_item(
        &self,
        item_id: ItemId,
    ) -> store::Result<Vec<StockTransaction>> {
        self.inner.list_transactions_for_item(item_id).await
    }

    async fn list_updates(&self) -> store::Result<Vec<UpdateRecord>> {
        self.inner.list_updates().await
    }

    async fn list_updates_for_item(&self, item_id: ItemId) -> store::Result<Vec<UpdateRecord>> {
        self.inner.list_updates_for_item(item_id).await
    }

    async fn insert_payment(&self, payment: NewPayment) -> store::Result<Payment> {
        self.inner.insert_payment(payment).await
    }

    async fn list_payments(&self) -> store::Result<Vec<Payment>> {
        self.inner.list_payments().await
    }
}

mod contention {
    use super::*;

    async fn contended(conflicts: u32) -> (ContendedStore, ItemId) {
        init_tracing();
        let store = ContendedStore {
            inner: InMemoryStore::new(),
            conflicts: Arc::new(AtomicU32::new(conflicts)),
        };
        let id = ItemRegistry::new(store.clone())
            .create_item("Widget", "", "", 10)
            .await
            .unwrap();
        (store, id)
    }

    #[tokio::test]
    async fn conflict_is_retried_against_fresh_quantity() {
        let (store, id) = contended(1).await;
        let ledger = TransactionLedger::new(store.clone());

        ledger
            .record_transaction(id, StockAction::Sale, 4, "order")
            .await
            .unwrap();

        // 10 + 1 (concurrent restock) - 4
        let item = store.get_item(id).await.unwrap().unwrap();
        assert_eq!(item.quantity, 7);
        assert_eq!(store.list_transactions().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn persistent_conflict_gives_up_without_partial_state() {
        let (store, id) = contended(MAX_CONFLICT_ATTEMPTS).await;
        let ledger = TransactionLedger::new(store.clone());

        let err = ledger
            .record_transaction(id, StockAction::Sale, 4, "order")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            LedgerError::Store(StoreError::QuantityConflict { .. })
        ));
        assert_eq!(err.kind(), ErrorKind::Storage);

        // Only the competing restocks landed
        let committed = store.list_transactions().await.unwrap();
        assert_eq!(committed.len(), MAX_CONFLICT_ATTEMPTS as usize);
        assert!(committed.iter().all(|t| t.action == StockAction::Purchase));
        let item = store.get_item(id).await.unwrap().unwrap();
        assert_eq!(item.quantity, 10 + i64::from(MAX_CONFLICT_ATTEMPTS));
    }
}
