//! Result assembly: ranking, filtering, truncation, normalization.
//!
//! Assembly happens in two stages so the final noise pass can run between
//! them: `rank_and_tag` produces the full tagged ranking, and `finalize`
//! truncates and normalizes whatever survives filtering. Normalizing last
//! keeps the invariant that the top surviving record is exactly 1.0.

use termcloud_core::types::{WordCloudRequest, WordRecord};
use termcloud_classify::{tag_word, Lexicon, WordCounts};

/// Rank the multiset (descending frequency, first-seen tie-break), apply the
/// include-words whitelist and the sentiment filter, and tag every entry.
/// The sentiment filter runs before any truncation so a limited result is
/// never under-filled.
pub fn rank_and_tag(
    counts: WordCounts,
    request: &WordCloudRequest,
    lexicon: &Lexicon,
) -> Vec<WordRecord> {
    counts
        .into_ranked()
        .into_iter()
        .filter(|(word, _)| {
            request.include_words.is_empty() || request.include_words.contains(word)
        })
        .map(|(word, frequency)| {
            let sentiment = tag_word(&word, request.mode, lexicon);
            WordRecord {
                word,
                frequency,
                normalized_frequency: 0.0,
                sentiment,
                mode: request.mode,
            }
        })
        .filter(|record| {
            request.sentiments.is_empty() || request.sentiments.contains(&record.sentiment)
        })
        .collect()
}

/// Truncate to the limit and normalize frequencies against the maximum of
/// the truncated set.
pub fn finalize(mut records: Vec<WordRecord>, max_words: usize) -> Vec<WordRecord> {
    records.truncate(max_words);
    let max_frequency = records.iter().map(|r| r.frequency).max().unwrap_or(1);
    for record in &mut records {
        record.normalized_frequency = record.frequency as f64 / max_frequency as f64;
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use termcloud_core::types::{AnalysisMode, SentimentTag};

    fn counts_of(pairs: &[(&str, u64)]) -> WordCounts {
        let mut counts = WordCounts::new();
        for (word, n) in pairs {
            counts.add_n(word, *n);
        }
        counts
    }

    #[test]
    fn test_ranking_and_normalization() {
        let counts = counts_of(&[("billing", 4), ("support", 2), ("intake", 1)]);
        let request = WordCloudRequest::new(["d1"], AnalysisMode::All);
        let records = finalize(rank_and_tag(counts, &request, &Lexicon::builtin()), 50);

        assert_eq!(records[0].word, "billing");
        assert_eq!(records[0].normalized_frequency, 1.0);
        assert_eq!(records[1].normalized_frequency, 0.5);
        assert_eq!(records[2].normalized_frequency, 0.25);
        assert!(records
            .iter()
            .all(|r| r.normalized_frequency > 0.0 && r.normalized_frequency <= 1.0));
    }

    #[test]
    fn test_limit_bound() {
        let counts = counts_of(&[("one", 5), ("two", 4), ("three", 3), ("four", 2)]);
        let mut request = WordCloudRequest::new(["d1"], AnalysisMode::All);
        request.max_words = 2;
        let records = finalize(rank_and_tag(counts, &request, &Lexicon::builtin()), 2);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].word, "one");
        // Normalization runs against the truncated set's own maximum.
        assert_eq!(records[0].normalized_frequency, 1.0);
    }

    #[test]
    fn test_sentiment_filter_before_truncation() {
        // Emotions mode: "okay" is neutral and outranks the positives; with a
        // positive-only filter and limit 2, both positives must still appear.
        let counts = counts_of(&[("okay", 10), ("happy", 3), ("great", 1)]);
        let mut request = WordCloudRequest::new(["d1"], AnalysisMode::Emotions);
        request.max_words = 2;
        request.sentiments = BTreeSet::from([SentimentTag::Positive]);

        let records = finalize(rank_and_tag(counts, &request, &Lexicon::builtin()), 2);
        let words: Vec<&str> = records.iter().map(|r| r.word.as_str()).collect();
        assert_eq!(words, vec!["happy", "great"]);
        assert_eq!(records[0].normalized_frequency, 1.0);
    }

    #[test]
    fn test_include_words_whitelist() {
        let counts = counts_of(&[("billing", 4), ("support", 2)]);
        let mut request = WordCloudRequest::new(["d1"], AnalysisMode::All);
        request.include_words = BTreeSet::from(["support".to_string()]);

        let records = finalize(rank_and_tag(counts, &request, &Lexicon::builtin()), 50);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].word, "support");
        assert_eq!(records[0].normalized_frequency, 1.0);
    }

    #[test]
    fn test_empty_counts() {
        let request = WordCloudRequest::new(["d1"], AnalysisMode::All);
        let records = finalize(
            rank_and_tag(WordCounts::new(), &request, &Lexicon::builtin()),
            50,
        );
        assert!(records.is_empty());
    }
}
