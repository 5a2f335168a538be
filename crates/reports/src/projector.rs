//! Report projector.

use store::InventoryStore;

use crate::{Report, ReportKind, Result};

/// Builds reports by reading the store; never writes.
pub struct ReportProjector<S: InventoryStore> {
    store: S,
}

impl<S: InventoryStore> ReportProjector<S> {
    /// Creates a new projector over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Generates the report for `kind`.
    #[tracing::instrument(skip(self))]
    pub async fn generate_report(&self, kind: ReportKind) -> Result<Report> {
        let report = match kind {
            ReportKind::Overview => Report::Overview(self.store.list_items().await?),
            ReportKind::Transactions => {
                Report::Transactions(self.store.list_transactions().await?)
            }
            ReportKind::Payments => Report::Payments(self.store.list_payments().await?),
            ReportKind::Updates => Report::Updates(self.store.list_updates().await?),
        };

        tracing::debug!(records = report.len(), "report generated");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use store::{InMemoryStore, NewItem};

    use super::*;

    #[tokio::test]
    async fn empty_store_yields_empty_reports() {
        let projector = ReportProjector::new(InMemoryStore::new());

        for kind in ReportKind::ALL {
            let report = projector.generate_report(kind).await.unwrap();
            assert_eq!(report.kind(), kind);
            assert!(report.is_empty());
        }
    }

    #[tokio::test]
    async fn overview_lists_items_by_id() {
        let store = InMemoryStore::new();
        for name in ["B", "A"] {
            store
                .insert_item(NewItem {
                    name: name.to_string(),
                    contact_info: String::new(),
                    description: String::new(),
                    quantity: 1,
                })
                .await
                .unwrap();
        }
        let projector = ReportProjector::new(store);

        let Report::Overview(items) = projector
            .generate_report(ReportKind::Overview)
            .await
            .unwrap()
        else {
            panic!("expected overview report");
        };

        let names: Vec<_> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["B", "A"]);
    }
}
