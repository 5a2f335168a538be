use serde::Serialize;
use store::{Item, Payment, StockTransaction, UpdateRecord};

use crate::ReportKind;

/// A generated report: the full contents of one relation, ordered by
/// ascending id.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "records", rename_all = "snake_case")]
pub enum Report {
    Overview(Vec<Item>),
    Transactions(Vec<StockTransaction>),
    Payments(Vec<Payment>),
    Updates(Vec<UpdateRecord>),
}

impl Report {
    /// Returns the kind this report was generated for.
    pub fn kind(&self) -> ReportKind {
        match self {
            Self::Overview(_) => ReportKind::Overview,
            Self::Transactions(_) => ReportKind::Transactions,
            Self::Payments(_) => ReportKind::Payments,
            Self::Updates(_) => ReportKind::Updates,
        }
    }

    /// Returns a human-readable heading for the report.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Overview(_) => "Inventory Overview",
            Self::Transactions(_) => "Transaction Report",
            Self::Payments(_) => "Payment Report",
            Self::Updates(_) => "Update History",
        }
    }

    /// Returns the number of records in the report.
    pub fn len(&self) -> usize {
        match self {
            Self::Overview(items) => items.len(),
            Self::Transactions(transactions) => transactions.len(),
            Self::Payments(payments) => payments.len(),
            Self::Updates(updates) => updates.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
