//! Corpus loading.
//!
//! Translates a request's filters into one bounded retrieval plan: a count
//! query, then either a single fetch or fixed-size pages with a cooperative
//! yield between pages so long loads do not starve concurrent requests.

use std::sync::Arc;

use tracing::debug;

use termcloud_core::types::{TenantInfo, WordCloudRequest};
use termcloud_core::{EngineConfig, Error, Result};
use termcloud_store::{CorpusStore, ResponseRow, RowPredicate};

/// Concatenated corpus text plus retrieval metadata for one dataset.
#[derive(Debug, Clone, Default)]
pub struct LoadedCorpus {
    /// Selected text columns of every contributing row, space-joined.
    pub text: String,
    /// Sampled from the first matching row.
    pub tenant: TenantInfo,
    /// Rows matching the predicate, including rows empty in the selected
    /// columns.
    pub total_matching_rows: u64,
    /// Rows that contributed at least one non-empty selected column.
    pub contributing_rows: u64,
}

/// Loads corpora from a `CorpusStore` under the configured thresholds.
pub struct CorpusLoader {
    store: Arc<dyn CorpusStore>,
    chunk_threshold: u64,
    page_size: u64,
}

impl CorpusLoader {
    pub fn new(store: Arc<dyn CorpusStore>, config: &EngineConfig) -> Self {
        Self {
            store,
            chunk_threshold: config.chunk_threshold,
            page_size: config.page_size.max(1),
        }
    }

    /// Load the corpus for one dataset under the request's filters.
    pub async fn load(
        &self,
        dataset_id: &str,
        request: &WordCloudRequest,
    ) -> Result<LoadedCorpus> {
        if !self.store.exists(dataset_id)? {
            return Err(Error::NotFound(format!("dataset {}", dataset_id)));
        }

        let predicate = RowPredicate::from_request(request);
        let total = self.store.count(dataset_id, &predicate)?;
        if total == 0 {
            return Ok(LoadedCorpus::default());
        }

        let mut corpus = LoadedCorpus {
            total_matching_rows: total,
            ..Default::default()
        };

        if total <= self.chunk_threshold {
            let rows = self.store.fetch_page(dataset_id, &predicate, 0, total)?;
            self.accumulate(&mut corpus, &rows, request);
        } else {
            debug!(
                "Chunked load for dataset {}: {} rows in pages of {}",
                dataset_id, total, self.page_size
            );
            let mut offset = 0;
            while offset < total {
                let rows =
                    self.store
                        .fetch_page(dataset_id, &predicate, offset, self.page_size)?;
                if rows.is_empty() {
                    break;
                }
                offset += rows.len() as u64;
                self.accumulate(&mut corpus, &rows, request);
                // Let other requests make progress between pages.
                tokio::task::yield_now().await;
            }
        }

        debug!(
            "Loaded dataset {}: {} matching rows, {} contributed text ({} chars)",
            dataset_id,
            corpus.total_matching_rows,
            corpus.contributing_rows,
            corpus.text.len()
        );
        Ok(corpus)
    }

    /// Append the selected text columns of each row; sample tenant info from
    /// the first matching row seen.
    fn accumulate(
        &self,
        corpus: &mut LoadedCorpus,
        rows: &[ResponseRow],
        request: &WordCloudRequest,
    ) {
        for row in rows {
            if corpus.tenant.org_name.is_none()
                && corpus.tenant.user_id.is_none()
                && corpus.tenant.tenant_name.is_none()
            {
                corpus.tenant = TenantInfo {
                    org_name: row.org_name.clone(),
                    user_id: row.user_id.clone(),
                    tenant_name: row.tenant_name.clone(),
                };
            }

            let mut contributed = false;
            for (column, text) in [(1u8, &row.question_text), (2u8, &row.response_text)] {
                if !request.selected_columns.contains(&column) {
                    continue;
                }
                if let Some(value) = text.as_deref() {
                    let trimmed = value.trim();
                    if !trimmed.is_empty() {
                        if !corpus.text.is_empty() {
                            corpus.text.push(' ');
                        }
                        corpus.text.push_str(trimmed);
                        contributed = true;
                    }
                }
            }
            if contributed {
                corpus.contributing_rows += 1;
            }
        }
    }
}
