//! Read-only report projections.
//!
//! Each [`ReportKind`] selects one relation of the store; the
//! [`ReportProjector`] loads it in ascending id order and wraps it in a
//! [`Report`]. No aggregation, filtering or pagination is applied.

pub mod error;
pub mod kind;
pub mod projector;
pub mod report;

pub use error::{ReportError, Result};
pub use kind::ReportKind;
pub use projector::ReportProjector;
pub use report::Report;
