//! Mode classifier registry.
//!
//! Each analysis mode is a strategy value implementing `TermExtractor`;
//! the registry dispatches by mode tag. Adding a mode means adding one
//! registry entry. Extractors are pure and hold only shared immutable
//! lexicon data, so the partitioner can invoke them from worker threads.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use termcloud_core::types::AnalysisMode;
use termcloud_core::Result;

use crate::counts::WordCounts;
use crate::lexicon::Lexicon;

/// Lowercase alphabetic token runs.
static TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z]+").unwrap());

/// Case-preserving alphabetic token runs, for capitalization checks.
static CASED_TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z]+").unwrap());

/// Capitalized word: uppercase initial, at least two lowercase letters.
static CAPITALIZED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z][a-z]{2,}$").unwrap());

/// A term-extraction strategy: text in, word multiset out.
pub trait TermExtractor: Send + Sync {
    fn extract(&self, text: &str) -> Result<WordCounts>;
}

/// `all` mode: every lowercase alphabetic token of length >= 3.
struct AllWords;

impl TermExtractor for AllWords {
    fn extract(&self, text: &str) -> Result<WordCounts> {
        let lowered = text.to_lowercase();
        let mut counts = WordCounts::new();
        for token in TOKEN_RE.find_iter(&lowered) {
            let word = token.as_str();
            if word.len() >= 3 {
                counts.add(word);
            }
        }
        Ok(counts)
    }
}

/// `verbs` mode: verb-suffix pattern unioned with the closed verb dictionary.
struct VerbWords {
    lexicon: Arc<Lexicon>,
}

impl TermExtractor for VerbWords {
    fn extract(&self, text: &str) -> Result<WordCounts> {
        let lowered = text.to_lowercase();
        let mut counts = WordCounts::new();
        for token in TOKEN_RE.find_iter(&lowered) {
            let word = token.as_str();
            if word.len() >= 3
                && (self.lexicon.is_verb(word) || self.lexicon.has_verb_suffix(word))
            {
                counts.add(word);
            }
        }
        Ok(counts)
    }
}

/// `emotions` mode: any token in an emotion bucket.
struct EmotionWords {
    lexicon: Arc<Lexicon>,
}

impl TermExtractor for EmotionWords {
    fn extract(&self, text: &str) -> Result<WordCounts> {
        let lowered = text.to_lowercase();
        let mut counts = WordCounts::new();
        for token in TOKEN_RE.find_iter(&lowered) {
            let word = token.as_str();
            if self.lexicon.emotion_bucket(word).is_some() {
                counts.add(word);
            }
        }
        Ok(counts)
    }
}

/// `themes` mode: any token in a domain theme bucket.
struct ThemeWords {
    lexicon: Arc<Lexicon>,
}

impl TermExtractor for ThemeWords {
    fn extract(&self, text: &str) -> Result<WordCounts> {
        let lowered = text.to_lowercase();
        let mut counts = WordCounts::new();
        for token in TOKEN_RE.find_iter(&lowered) {
            let word = token.as_str();
            if self.lexicon.is_theme_word(word) {
                counts.add(word);
            }
        }
        Ok(counts)
    }
}

/// `topics` mode: topic dictionary unioned with long tokens (jargon
/// heuristic: anything over 8 characters).
struct TopicWords {
    lexicon: Arc<Lexicon>,
}

impl TermExtractor for TopicWords {
    fn extract(&self, text: &str) -> Result<WordCounts> {
        let lowered = text.to_lowercase();
        let mut counts = WordCounts::new();
        for token in TOKEN_RE.find_iter(&lowered) {
            let word = token.as_str();
            if self.lexicon.is_topic_word(word) || word.len() > 8 {
                counts.add(word);
            }
        }
        Ok(counts)
    }
}

/// `entities` mode: capitalized tokens unioned with the entity dictionary,
/// case-folded in output. A single scan over cased tokens keeps the union
/// from counting a capitalized dictionary term twice.
struct EntityWords {
    lexicon: Arc<Lexicon>,
}

impl TermExtractor for EntityWords {
    fn extract(&self, text: &str) -> Result<WordCounts> {
        let mut counts = WordCounts::new();
        for token in CASED_TOKEN_RE.find_iter(text) {
            let cased = token.as_str();
            let folded = cased.to_lowercase();
            if CAPITALIZED_RE.is_match(cased) || self.lexicon.is_entity_term(&folded) {
                counts.add(&folded);
            }
        }
        Ok(counts)
    }
}

/// Registry mapping each analysis mode to its extractor.
pub struct ClassifierRegistry {
    extractors: HashMap<AnalysisMode, Box<dyn TermExtractor>>,
}

impl ClassifierRegistry {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        let mut extractors: HashMap<AnalysisMode, Box<dyn TermExtractor>> = HashMap::new();
        extractors.insert(AnalysisMode::All, Box::new(AllWords));
        extractors.insert(
            AnalysisMode::Verbs,
            Box::new(VerbWords {
                lexicon: Arc::clone(&lexicon),
            }),
        );
        extractors.insert(
            AnalysisMode::Emotions,
            Box::new(EmotionWords {
                lexicon: Arc::clone(&lexicon),
            }),
        );
        extractors.insert(
            AnalysisMode::Themes,
            Box::new(ThemeWords {
                lexicon: Arc::clone(&lexicon),
            }),
        );
        extractors.insert(
            AnalysisMode::Topics,
            Box::new(TopicWords {
                lexicon: Arc::clone(&lexicon),
            }),
        );
        extractors.insert(AnalysisMode::Entities, Box::new(EntityWords { lexicon }));
        Self { extractors }
    }

    /// Run the extractor registered for `mode`. Modes without a registered
    /// extractor use the `all` strategy.
    pub fn classify(&self, text: &str, mode: AnalysisMode) -> Result<WordCounts> {
        match self.extractors.get(&mode) {
            Some(extractor) => extractor.extract(text),
            None => self.fallback(text),
        }
    }

    /// The explicit fallback strategy: `all` extraction. Callers invoke this
    /// when a mode-specific extractor reports failure.
    pub fn fallback(&self, text: &str) -> Result<WordCounts> {
        self.extractors[&AnalysisMode::All].extract(text)
    }
}
