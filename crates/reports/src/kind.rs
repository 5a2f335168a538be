use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::ReportError;

/// The projections a report can be generated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    /// Every item with its current stock level.
    Overview,
    /// Every stock transaction.
    Transactions,
    /// Every payment.
    Payments,
    /// The field-level audit trail.
    Updates,
}

impl ReportKind {
    pub const ALL: [ReportKind; 4] = [
        ReportKind::Overview,
        ReportKind::Transactions,
        ReportKind::Payments,
        ReportKind::Updates,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Transactions => "transactions",
            Self::Payments => "payments",
            Self::Updates => "updates",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportKind {
    type Err = ReportError;

    /// Parses a report kind; singular and plural forms are both accepted,
    /// case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "overview" => Ok(Self::Overview),
            "transaction" | "transactions" => Ok(Self::Transactions),
            "payment" | "payments" => Ok(Self::Payments),
            "update" | "updates" => Ok(Self::Updates),
            _ => Err(ReportError::UnknownKind(s.to_string())),
        }
    }
}
