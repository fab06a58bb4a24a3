//! The word-cloud engine: the single entry point composing loader, noise
//! filter, classifier registry, assembler, aggregator, and cache.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use termcloud_classify::{
    partition::classify_parallel, ClassifierRegistry, Lexicon, NoiseFilter, WordCounts,
};
use termcloud_core::types::{TenantInfo, WordCloudRequest, WordCloudResult};
use termcloud_core::{EngineConfig, Error, Result};
use termcloud_store::CorpusStore;

use crate::assemble::{finalize, rank_and_tag};
use crate::cache::RequestCache;
use crate::loader::CorpusLoader;

/// Floor for the widened per-dataset term cap used before a multi-dataset
/// merge, so premature truncation cannot starve the merged ranking.
const MIN_PER_DATASET_CAP: usize = 150;

/// Word-cloud generation engine. Safe to share across concurrent callers.
pub struct WordCloudEngine {
    loader: CorpusLoader,
    registry: Arc<ClassifierRegistry>,
    noise: NoiseFilter,
    lexicon: Arc<Lexicon>,
    cache: RequestCache,
    config: EngineConfig,
}

impl WordCloudEngine {
    /// Engine with the built-in lexicon.
    pub fn new(store: Arc<dyn CorpusStore>, config: EngineConfig) -> Self {
        Self::with_lexicon(store, config, Lexicon::builtin())
    }

    /// Engine with a caller-supplied lexicon.
    pub fn with_lexicon(
        store: Arc<dyn CorpusStore>,
        config: EngineConfig,
        lexicon: Lexicon,
    ) -> Self {
        let lexicon = Arc::new(lexicon);
        Self {
            loader: CorpusLoader::new(store, &config),
            registry: Arc::new(ClassifierRegistry::new(Arc::clone(&lexicon))),
            noise: NoiseFilter::new(Arc::clone(&lexicon)),
            cache: RequestCache::new(config.cache_capacity, config.cache_ttl()),
            lexicon,
            config,
        }
    }

    /// Generate (or recall) the word cloud for a request.
    pub async fn generate(&self, request: &WordCloudRequest) -> Result<WordCloudResult> {
        let start = Instant::now();

        if request.dataset_ids.is_empty() {
            return Err(Error::Config(
                "request must name at least one dataset".into(),
            ));
        }

        if let Some(mut hit) = self.cache.get(request) {
            hit.generation_time_ms = start.elapsed().as_millis() as u64;
            debug!("Cache hit for mode={} ({} words)", hit.mode, hit.word_count);
            return Ok(hit);
        }

        let mut result = match request.dataset_ids.iter().next() {
            Some(dataset_id) if request.dataset_ids.len() == 1 => {
                self.run_single(dataset_id, request).await?
            }
            _ => self.run_multi(request).await?,
        };

        result.generation_time_ms = start.elapsed().as_millis() as u64;
        self.cache.put(request, result.clone());

        info!(
            "Generated word cloud: mode={}, datasets={}, words={}, rows={}, {}ms",
            result.mode,
            result.dataset_ids.len(),
            result.word_count,
            result.total_questions_considered,
            result.generation_time_ms
        );
        Ok(result)
    }

    /// Drop memoized results for one dataset, or all of them.
    pub fn invalidate_cache(&self, dataset_id: Option<&str>) {
        self.cache.invalidate(dataset_id);
        match dataset_id {
            Some(id) => info!("Invalidated cached results for dataset {}", id),
            None => info!("Invalidated all cached results"),
        }
    }

    /// The single-dataset pipeline: load, clean, classify, assemble,
    /// validate, finalize.
    async fn run_single(
        &self,
        dataset_id: &str,
        request: &WordCloudRequest,
    ) -> Result<WordCloudResult> {
        let corpus = self.loader.load(dataset_id, request).await?;
        if corpus.total_matching_rows == 0 {
            return Ok(WordCloudResult::empty(
                vec![dataset_id.to_string()],
                request.mode,
                "no rows match the requested filters",
            ));
        }

        let cleaned = self.noise.clean(
            &corpus.text,
            &corpus.tenant,
            &request.exclude_words,
            request.min_word_length,
        );

        let counts = self.classify(cleaned, request).await?;

        let records = rank_and_tag(counts, request, &self.lexicon);
        let records = self.noise.validate(
            records,
            &corpus.tenant,
            &request.exclude_words,
            request.min_word_length,
        );
        let words = finalize(records, request.max_words);

        Ok(WordCloudResult {
            dataset_ids: vec![dataset_id.to_string()],
            mode: request.mode,
            word_count: words.len(),
            words,
            total_questions_considered: corpus.total_matching_rows,
            filtered_row_count: corpus.contributing_rows,
            skipped_datasets: Vec::new(),
            message: None,
            cache_hit: false,
            generation_time_ms: 0,
        })
    }

    /// Classify the cleaned corpus: partitioned across workers above the
    /// size threshold, inline below it. An inline extractor failure falls
    /// back to the `all` strategy explicitly.
    async fn classify(&self, text: String, request: &WordCloudRequest) -> Result<WordCounts> {
        if text.len() > self.config.parallel_threshold {
            let registry = Arc::clone(&self.registry);
            let mode = request.mode;
            let segments = self.config.segment_count;
            debug!(
                "Partitioned classification: {} chars across {} segments",
                text.len(),
                segments
            );
            return tokio::task::spawn_blocking(move || {
                classify_parallel(&registry, &text, mode, segments)
            })
            .await
            .map_err(|e| Error::Internal(format!("classification worker panicked: {}", e)));
        }

        match self.registry.classify(&text, request.mode) {
            Ok(counts) => Ok(counts),
            Err(e) => {
                warn!(
                    "Classifier for mode {} failed ({}), falling back to all-words",
                    request.mode, e
                );
                self.registry.fallback(&text)
            }
        }
    }

    /// Fan the single-dataset pipeline out per dataset and merge by summed
    /// frequency. Missing or empty datasets are skipped; the call fails only
    /// when no requested dataset exists.
    async fn run_multi(&self, request: &WordCloudRequest) -> Result<WordCloudResult> {
        let per_dataset_cap = (request.max_words * 3).max(MIN_PER_DATASET_CAP);

        let mut merged = WordCounts::new();
        let mut used: Vec<String> = Vec::new();
        let mut skipped: Vec<String> = Vec::new();
        let mut existing = 0usize;
        let mut total_rows = 0u64;
        let mut contributing_rows = 0u64;

        for dataset_id in &request.dataset_ids {
            let sub_request = request.for_dataset(dataset_id, per_dataset_cap);
            match self.cached_single(dataset_id, &sub_request).await {
                Ok(result) => {
                    existing += 1;
                    if result.total_questions_considered == 0 {
                        warn!("Dataset {} matched no rows, skipping", dataset_id);
                        skipped.push(dataset_id.clone());
                        continue;
                    }
                    total_rows += result.total_questions_considered;
                    contributing_rows += result.filtered_row_count;
                    for record in &result.words {
                        merged.add_n(&record.word, record.frequency);
                    }
                    used.push(dataset_id.clone());
                }
                Err(Error::NotFound(_)) => {
                    warn!("Dataset {} not found, skipping", dataset_id);
                    skipped.push(dataset_id.clone());
                }
                Err(e) => return Err(e),
            }
        }

        if existing == 0 {
            return Err(Error::NotFound(
                "none of the requested datasets exist".into(),
            ));
        }

        if merged.is_empty() {
            let mut result = WordCloudResult::empty(
                used,
                request.mode,
                "no rows match the requested filters in any dataset",
            );
            result.skipped_datasets = skipped;
            return Ok(result);
        }

        // Re-rank the merged multiset under the final limit. Tenant-derived
        // noise was already removed per dataset; the final validation pass
        // covers the static and caller blacklists.
        let records = rank_and_tag(merged, request, &self.lexicon);
        let records = self.noise.validate(
            records,
            &TenantInfo::default(),
            &request.exclude_words,
            request.min_word_length,
        );
        let words = finalize(records, request.max_words);

        Ok(WordCloudResult {
            dataset_ids: used,
            mode: request.mode,
            word_count: words.len(),
            words,
            total_questions_considered: total_rows,
            filtered_row_count: contributing_rows,
            skipped_datasets: skipped,
            message: None,
            cache_hit: false,
            generation_time_ms: 0,
        })
    }

    /// Per-dataset pipeline behind the cache, so repeated aggregates reuse
    /// each dataset's widened result.
    async fn cached_single(
        &self,
        dataset_id: &str,
        sub_request: &WordCloudRequest,
    ) -> Result<WordCloudResult> {
        if let Some(hit) = self.cache.get(sub_request) {
            return Ok(hit);
        }
        let result = self.run_single(dataset_id, sub_request).await?;
        self.cache.put(sub_request, result.clone());
        Ok(result)
    }
}
