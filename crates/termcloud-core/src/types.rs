//! Request and result model for word-cloud generation.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Named term-extraction strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    All,
    Verbs,
    Emotions,
    Themes,
    Topics,
    Entities,
}

impl AnalysisMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Verbs => "verbs",
            Self::Emotions => "emotions",
            Self::Themes => "themes",
            Self::Topics => "topics",
            Self::Entities => "entities",
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisMode {
    type Err = std::convert::Infallible;

    /// Unrecognized mode names fall back to `All`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "verbs" | "action" => Self::Verbs,
            "emotions" => Self::Emotions,
            "themes" => Self::Themes,
            "topics" => Self::Topics,
            "entities" => Self::Entities,
            _ => Self::All,
        })
    }
}

/// Sentiment or category tag attached to each output word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentTag {
    Positive,
    Negative,
    Neutral,
    Action,
    Entity,
    Theme,
    Topic,
}

impl SentimentTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
            Self::Action => "action",
            Self::Entity => "entity",
            Self::Theme => "theme",
            Self::Topic => "topic",
        }
    }
}

/// Date constraint on matching rows. An exact date takes precedence over
/// the start/end range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exact: Option<NaiveDate>,
}

/// Organization/user/tenant strings sampled from the first matching row.
/// Used only to derive the self-referential noise blacklist.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TenantInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_name: Option<String>,
}

impl TenantInfo {
    /// Non-empty tenant fields, for blacklist derivation.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        [
            self.org_name.as_deref(),
            self.user_id.as_deref(),
            self.tenant_name.as_deref(),
        ]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
    }
}

/// A word-cloud generation request.
///
/// Immutable once constructed; the cache key is derived verbatim from every
/// field. Set-valued fields are `BTreeSet`s so two requests that differ only
/// in input ordering serialize (and therefore hash) identically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordCloudRequest {
    pub dataset_ids: BTreeSet<String>,
    pub mode: AnalysisMode,
    /// Which text columns to draw from: 1 = question, 2 = response.
    pub selected_columns: BTreeSet<u8>,
    pub exclude_words: BTreeSet<String>,
    /// When non-empty, restricts output to exactly these words.
    pub include_words: BTreeSet<String>,
    pub min_word_length: usize,
    pub max_words: usize,
    pub org_names: BTreeSet<String>,
    pub user_ids: BTreeSet<String>,
    pub tenant_names: BTreeSet<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
    pub sentiments: BTreeSet<SentimentTag>,
}

impl WordCloudRequest {
    /// Request for the given datasets and mode with default filters.
    pub fn new<I, S>(dataset_ids: I, mode: AnalysisMode) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            dataset_ids: dataset_ids.into_iter().map(Into::into).collect(),
            mode,
            selected_columns: BTreeSet::from([1, 2]),
            exclude_words: BTreeSet::new(),
            include_words: BTreeSet::new(),
            min_word_length: 3,
            max_words: 50,
            org_names: BTreeSet::new(),
            user_ids: BTreeSet::new(),
            tenant_names: BTreeSet::new(),
            date_range: None,
            sentiments: BTreeSet::new(),
        }
    }

    /// Request scoped to a single dataset, preserving every other field.
    pub fn for_dataset(&self, dataset_id: &str, max_words: usize) -> Self {
        let mut req = self.clone();
        req.dataset_ids = BTreeSet::from([dataset_id.to_string()]);
        req.max_words = max_words;
        req
    }

    /// Deterministic digest of the full request.
    ///
    /// Serializes to JSON (struct field order is fixed, sets are sorted by
    /// construction) and hashes with SHA-256, so semantically identical
    /// requests always collide.
    pub fn cache_key(&self) -> String {
        let canonical =
            serde_json::to_string(self).unwrap_or_else(|_| format!("{:?}", self));
        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());
        hex::encode(hasher.finalize())
    }
}

/// One ranked output term.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordRecord {
    pub word: String,
    pub frequency: u64,
    /// Frequency divided by the maximum frequency in the result; the top
    /// record is always exactly 1.0.
    pub normalized_frequency: f64,
    pub sentiment: SentimentTag,
    pub mode: AnalysisMode,
}

/// Assembled word-cloud output for one request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordCloudResult {
    pub dataset_ids: Vec<String>,
    pub mode: AnalysisMode,
    /// Descending frequency, ties broken by first-seen order.
    pub words: Vec<WordRecord>,
    pub word_count: usize,
    pub total_questions_considered: u64,
    pub filtered_row_count: u64,
    /// Dataset ids that were requested but skipped (missing or empty).
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub skipped_datasets: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub cache_hit: bool,
    pub generation_time_ms: u64,
}

impl WordCloudResult {
    /// Empty result carrying an explanatory message.
    pub fn empty(dataset_ids: Vec<String>, mode: AnalysisMode, message: impl Into<String>) -> Self {
        Self {
            dataset_ids,
            mode,
            words: Vec::new(),
            word_count: 0,
            total_questions_considered: 0,
            filtered_row_count: 0,
            skipped_datasets: Vec::new(),
            message: Some(message.into()),
            cache_hit: false,
            generation_time_ms: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parse_fallback() {
        assert_eq!("verbs".parse::<AnalysisMode>().unwrap(), AnalysisMode::Verbs);
        assert_eq!("action".parse::<AnalysisMode>().unwrap(), AnalysisMode::Verbs);
        assert_eq!("EMOTIONS".parse::<AnalysisMode>().unwrap(), AnalysisMode::Emotions);
        assert_eq!("bogus".parse::<AnalysisMode>().unwrap(), AnalysisMode::All);
    }

    #[test]
    fn test_cache_key_order_independent() {
        let mut a = WordCloudRequest::new(["d1", "d2"], AnalysisMode::All);
        a.exclude_words = ["alpha", "beta"].iter().map(|s| s.to_string()).collect();

        let mut b = WordCloudRequest::new(["d2", "d1"], AnalysisMode::All);
        b.exclude_words = ["beta", "alpha"].iter().map(|s| s.to_string()).collect();

        assert_eq!(a.cache_key(), b.cache_key());
    }

    #[test]
    fn test_cache_key_sensitive_to_content() {
        let a = WordCloudRequest::new(["d1"], AnalysisMode::All);
        let mut b = a.clone();
        b.max_words = 10;
        assert_ne!(a.cache_key(), b.cache_key());

        let mut c = a.clone();
        c.mode = AnalysisMode::Emotions;
        assert_ne!(a.cache_key(), c.cache_key());
    }

    #[test]
    fn test_for_dataset_narrows_scope() {
        let mut req = WordCloudRequest::new(["d1", "d2"], AnalysisMode::Themes);
        req.min_word_length = 4;
        let single = req.for_dataset("d1", 150);
        assert_eq!(single.dataset_ids.len(), 1);
        assert!(single.dataset_ids.contains("d1"));
        assert_eq!(single.max_words, 150);
        assert_eq!(single.min_word_length, 4);
        assert_eq!(single.mode, AnalysisMode::Themes);
    }

    #[test]
    fn test_tenant_fields_skips_empty() {
        let tenant = TenantInfo {
            org_name: Some("Acme Corp".into()),
            user_id: Some(String::new()),
            tenant_name: None,
        };
        let fields: Vec<&str> = tenant.fields().collect();
        assert_eq!(fields, vec!["Acme Corp"]);
    }
}
