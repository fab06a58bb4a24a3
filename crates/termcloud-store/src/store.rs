//! The corpus store seam consumed by the engine.

use termcloud_core::Result;

use crate::types::{ResponseRow, RowPredicate};

/// Trait for corpus backends.
///
/// The engine only ever issues a count followed by one or more page fetches,
/// so implementations can stay simple: no cursors, no transactions across
/// calls. Pages are ordered by row id so repeated fetches over an unchanged
/// dataset are stable.
pub trait CorpusStore: Send + Sync {
    /// Whether the dataset exists at all.
    fn exists(&self, dataset_id: &str) -> Result<bool>;

    /// Number of rows matching the predicate.
    fn count(&self, dataset_id: &str, predicate: &RowPredicate) -> Result<u64>;

    /// Fetch one page of matching rows, ordered by row id.
    fn fetch_page(
        &self,
        dataset_id: &str,
        predicate: &RowPredicate,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<ResponseRow>>;
}
