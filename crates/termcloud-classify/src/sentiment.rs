//! Sentiment/category tagging.

use termcloud_core::types::{AnalysisMode, SentimentTag};

use crate::lexicon::Lexicon;

/// Map a (word, mode) pair to its sentiment or category tag.
///
/// Pure dictionary lookup; the word is expected lowercased, as produced by
/// the classifiers.
pub fn tag_word(word: &str, mode: AnalysisMode, lexicon: &Lexicon) -> SentimentTag {
    match mode {
        AnalysisMode::Emotions => lexicon.emotion_bucket(word).unwrap_or(SentimentTag::Neutral),
        AnalysisMode::Themes => {
            if lexicon.themes_positive.contains(word) {
                SentimentTag::Positive
            } else if lexicon.themes_negative.contains(word) {
                SentimentTag::Negative
            } else {
                SentimentTag::Theme
            }
        }
        AnalysisMode::Topics => SentimentTag::Topic,
        AnalysisMode::Entities => SentimentTag::Entity,
        AnalysisMode::Verbs => {
            if lexicon.actions_positive.contains(word) {
                SentimentTag::Positive
            } else if lexicon.actions_negative.contains(word) {
                SentimentTag::Negative
            } else {
                SentimentTag::Action
            }
        }
        AnalysisMode::All => SentimentTag::Neutral,
    }
}
