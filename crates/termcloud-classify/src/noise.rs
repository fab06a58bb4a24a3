//! Noise and tenant filtering.
//!
//! Builds a per-request blocklist from three sources — the static noise
//! vocabulary, tokens derived from the dataset's tenant strings, and the
//! caller's exclusions — and applies it twice: once to the raw corpus before
//! classification, and once to the assembled word records afterward so no
//! classifier dictionary can reintroduce a blocked term. Both passes are
//! idempotent.

use std::collections::BTreeSet;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use termcloud_core::types::{TenantInfo, WordRecord};

use crate::lexicon::Lexicon;

static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bhttps?://\S+|\bwww\.\S+").unwrap());
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap());
/// Law-firm-like token heuristic.
static LAW_FIRM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"law|legal|attorney|counsel|firm").unwrap());

/// Maximum fraction of digit characters a token may carry.
const MAX_NUMERIC_RATIO: f64 = 0.7;

/// Token-level noise filter parameterized by the lexicon.
pub struct NoiseFilter {
    lexicon: Arc<Lexicon>,
}

impl NoiseFilter {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    /// Pre-classification pass: strip URLs and emails, then drop blocked
    /// tokens. Checks are case-insensitive; surviving tokens keep their
    /// original casing so capitalization-sensitive classifiers still work.
    pub fn clean(
        &self,
        text: &str,
        tenant: &TenantInfo,
        extra_blacklist: &BTreeSet<String>,
        min_word_length: usize,
    ) -> String {
        let tenant_fields = Self::tenant_fields(tenant);

        let stripped = URL_RE.replace_all(text, " ");
        let stripped = EMAIL_RE.replace_all(&stripped, " ");

        let mut kept: Vec<&str> = Vec::new();
        for raw in stripped.split_whitespace() {
            let token = raw.trim_matches(|c: char| !c.is_alphanumeric());
            if token.is_empty() {
                continue;
            }
            let lowered = token.to_lowercase();
            if !self.is_blocked(&lowered, &tenant_fields, extra_blacklist, min_word_length) {
                kept.push(token);
            }
        }
        kept.join(" ")
    }

    /// Post-assembly pass: the same predicate over finished word records.
    pub fn validate(
        &self,
        records: Vec<WordRecord>,
        tenant: &TenantInfo,
        extra_blacklist: &BTreeSet<String>,
        min_word_length: usize,
    ) -> Vec<WordRecord> {
        let tenant_fields = Self::tenant_fields(tenant);
        records
            .into_iter()
            .filter(|record| {
                let lowered = record.word.to_lowercase();
                !self.is_blocked(&lowered, &tenant_fields, extra_blacklist, min_word_length)
            })
            .collect()
    }

    fn tenant_fields(tenant: &TenantInfo) -> Vec<String> {
        tenant.fields().map(|f| f.to_lowercase()).collect()
    }

    /// The shared block predicate over a lowercased token.
    fn is_blocked(
        &self,
        token: &str,
        tenant_fields: &[String],
        extra_blacklist: &BTreeSet<String>,
        min_word_length: usize,
    ) -> bool {
        if token.len() < min_word_length.max(3) {
            return true;
        }
        if self.lexicon.is_noise(token) || self.lexicon.is_law_firm_suffix(token) {
            return true;
        }
        if LAW_FIRM_RE.is_match(token) {
            return true;
        }
        if tenant_fields.iter().any(|field| field.contains(token)) {
            return true;
        }
        if Self::numeric_heavy(token) {
            return true;
        }
        if extra_blacklist.contains(token) {
            return true;
        }
        false
    }

    /// Pure numeric, or more than 70% digits.
    fn numeric_heavy(token: &str) -> bool {
        let total = token.chars().count();
        if total == 0 {
            return true;
        }
        let digits = token.chars().filter(|c| c.is_ascii_digit()).count();
        digits == total || (digits as f64 / total as f64) > MAX_NUMERIC_RATIO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use termcloud_core::types::{AnalysisMode, SentimentTag};

    fn filter() -> NoiseFilter {
        NoiseFilter::new(Arc::new(Lexicon::builtin()))
    }

    fn record(word: &str) -> WordRecord {
        WordRecord {
            word: word.into(),
            frequency: 1,
            normalized_frequency: 1.0,
            sentiment: SentimentTag::Neutral,
            mode: AnalysisMode::All,
        }
    }

    #[test]
    fn test_clean_strips_urls_and_emails() {
        let cleaned = filter().clean(
            "visit https://example.com/page or mail john@example.com about billing",
            &TenantInfo::default(),
            &BTreeSet::new(),
            3,
        );
        assert!(!cleaned.contains("example"));
        assert!(!cleaned.contains("john"));
        assert!(cleaned.contains("billing"));
        assert!(cleaned.contains("visit"));
    }

    #[test]
    fn test_clean_drops_short_and_numeric_tokens() {
        let cleaned = filter().clean(
            "we paid 1200 on 2025 via a card ab12345",
            &TenantInfo::default(),
            &BTreeSet::new(),
            3,
        );
        assert!(!cleaned.contains("1200"));
        assert!(!cleaned.contains("2025"));
        assert!(!cleaned.contains("ab12345")); // 5 of 7 chars are digits
        assert!(!cleaned.split_whitespace().any(|t| t == "we"));
        assert!(cleaned.contains("paid"));
        assert!(cleaned.contains("card"));
    }

    #[test]
    fn test_tenant_tokens_blocked() {
        let tenant = TenantInfo {
            org_name: Some("Henderson & Ruiz LLP".into()),
            user_id: None,
            tenant_name: None,
        };
        let cleaned = filter().clean(
            "Henderson handled our billing question",
            &tenant,
            &BTreeSet::new(),
            3,
        );
        assert!(!cleaned.to_lowercase().contains("henderson"));
        assert!(cleaned.contains("billing"));
    }

    #[test]
    fn test_law_firm_heuristic() {
        let cleaned = filter().clean(
            "our lawfirm paralegal and the attorneys responded",
            &TenantInfo::default(),
            &BTreeSet::new(),
            3,
        );
        assert!(!cleaned.contains("lawfirm"));
        assert!(!cleaned.contains("paralegal")); // contains "legal"
        assert!(!cleaned.contains("attorneys"));
        assert!(cleaned.contains("responded"));
    }

    #[test]
    fn test_caller_exclusions() {
        let extra: BTreeSet<String> = BTreeSet::from(["service".to_string()]);
        let cleaned = filter().clean(
            "great service overall",
            &TenantInfo::default(),
            &extra,
            3,
        );
        assert!(!cleaned.contains("service"));
        assert!(cleaned.contains("great"));
    }

    #[test]
    fn test_validate_is_idempotent() {
        let tenant = TenantInfo {
            org_name: Some("Acme Corp".into()),
            user_id: None,
            tenant_name: None,
        };
        let extra = BTreeSet::from(["noise".to_string()]);
        let records = vec![
            record("billing"),
            record("acme"),
            record("noise"),
            record("support"),
            record("https"),
        ];

        let f = filter();
        let once = f.validate(records, &tenant, &extra, 3);
        let words_once: Vec<&str> = once.iter().map(|r| r.word.as_str()).collect();
        assert_eq!(words_once, vec!["billing", "support"]);

        let twice = f.validate(once.clone(), &tenant, &extra, 3);
        let words_twice: Vec<&str> = twice.iter().map(|r| r.word.as_str()).collect();
        assert_eq!(words_once, words_twice);
    }

    #[test]
    fn test_clean_preserves_casing_of_kept_tokens() {
        let cleaned = filter().clean(
            "Sarah praised the billing team",
            &TenantInfo::default(),
            &BTreeSet::new(),
            3,
        );
        assert!(cleaned.contains("Sarah"));
    }
}
