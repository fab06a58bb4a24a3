//! Term dictionaries supplied as data.
//!
//! Every dictionary the classifiers, tagger, and noise filter consult lives
//! in one serde-deserializable `Lexicon` value, so deployments can swap the
//! vocabulary without code changes. `Lexicon::builtin()` carries the default
//! legal/business-feedback vocabulary.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use termcloud_core::types::SentimentTag;

/// All term dictionaries used across the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Lexicon {
    /// Cross-domain noise: protocol fragments, file extensions, product names.
    pub noise_words: BTreeSet<String>,
    /// Corporate/law-firm suffix tokens.
    pub law_firm_suffixes: BTreeSet<String>,
    /// Verb suffixes matched by the `verbs` mode.
    pub verb_suffixes: Vec<String>,
    /// Closed-class verb dictionary.
    pub verbs: BTreeSet<String>,
    pub emotions_positive: BTreeSet<String>,
    pub emotions_negative: BTreeSet<String>,
    pub emotions_neutral: BTreeSet<String>,
    /// Domain theme buckets (legal, business, technology, ...).
    pub themes: BTreeMap<String, BTreeSet<String>>,
    pub themes_positive: BTreeSet<String>,
    pub themes_negative: BTreeSet<String>,
    pub topics: BTreeSet<String>,
    /// Legal/business/role/organization entity terms.
    pub entities: BTreeSet<String>,
    pub actions_positive: BTreeSet<String>,
    pub actions_negative: BTreeSet<String>,
}

fn set(words: &[&str]) -> BTreeSet<String> {
    words.iter().map(|s| s.to_string()).collect()
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Lexicon {
    /// The built-in default vocabulary.
    pub fn builtin() -> Self {
        let mut themes = BTreeMap::new();
        themes.insert(
            "legal".to_string(),
            set(&[
                "contract", "lawsuit", "litigation", "settlement", "compliance",
                "liability", "dispute", "clause", "statute", "regulation",
                "deposition", "discovery", "verdict", "plaintiff", "defendant",
                "arbitration", "mediation", "hearing", "filing", "motion",
            ]),
        );
        themes.insert(
            "business".to_string(),
            set(&[
                "revenue", "budget", "invoice", "billing", "pricing", "contract",
                "client", "vendor", "partnership", "acquisition", "merger",
                "strategy", "growth", "market", "quarterly", "forecast",
            ]),
        );
        themes.insert(
            "technology".to_string(),
            set(&[
                "software", "platform", "integration", "database", "dashboard",
                "automation", "security", "login", "interface", "upload",
                "download", "export", "import", "sync", "notification", "mobile",
            ]),
        );
        themes.insert(
            "process".to_string(),
            set(&[
                "workflow", "procedure", "onboarding", "training", "review",
                "approval", "escalation", "turnaround", "deadline", "scheduling",
                "intake", "checklist", "template", "documentation",
            ]),
        );
        themes.insert(
            "communication".to_string(),
            set(&[
                "email", "response", "feedback", "meeting", "update", "reminder",
                "notification", "clarity", "transparency", "responsiveness",
                "followup", "communication", "outreach",
            ]),
        );
        themes.insert(
            "service".to_string(),
            set(&[
                "support", "service", "helpdesk", "assistance", "resolution",
                "ticket", "quality", "satisfaction", "experience", "complaint",
                "request", "availability",
            ]),
        );
        themes.insert(
            "healthcare".to_string(),
            set(&[
                "patient", "provider", "insurance", "claim", "diagnosis",
                "treatment", "medical", "clinical", "prescription", "referral",
                "coverage", "billing",
            ]),
        );

        Self {
            noise_words: set(&[
                "http", "https", "www", "com", "org", "net", "html", "htm",
                "pdf", "doc", "docx", "xls", "xlsx", "csv", "jpg", "png", "gif",
                "href", "mailto", "amp", "nbsp", "quot",
                "clio", "mycase", "practicepanther", "smokeball", "filevine",
                "litify", "lawmatics", "casetext", "westlaw", "lexisnexis",
            ]),
            law_firm_suffixes: set(&[
                "llp", "llc", "pllc", "plc", "ltd", "inc", "esq", "esquire",
                "associates", "partners", "chambers", "solicitors", "advocates",
                "barristers", "abogados",
            ]),
            verb_suffixes: vec![
                "ing".to_string(),
                "ed".to_string(),
                "ize".to_string(),
                "ise".to_string(),
                "ate".to_string(),
                "ify".to_string(),
            ],
            verbs: set(&[
                "help", "work", "need", "want", "make", "take", "give", "find",
                "call", "ask", "tell", "know", "think", "feel", "keep", "pay",
                "send", "receive", "provide", "improve", "resolve", "respond",
                "answer", "explain", "support", "handle", "manage", "deliver",
                "fix", "solve", "listen", "follow", "wait", "try", "use",
            ]),
            emotions_positive: set(&[
                "happy", "great", "excellent", "satisfied", "pleased", "love",
                "wonderful", "amazing", "fantastic", "awesome", "good",
                "helpful", "friendly", "professional", "responsive", "reliable",
                "confident", "grateful", "thankful", "impressed", "delighted",
                "reassured", "relieved", "trust", "trustworthy",
            ]),
            emotions_negative: set(&[
                "angry", "frustrated", "disappointed", "unhappy", "terrible",
                "awful", "horrible", "bad", "poor", "slow", "confusing",
                "confused", "annoyed", "upset", "worried", "anxious", "stressed",
                "stressful", "overwhelmed", "ignored", "dissatisfied",
                "unprofessional", "unresponsive", "rude", "dismissive",
                "intimidated", "powerless", "hopeless", "betrayed",
            ]),
            emotions_neutral: set(&[
                "okay", "fine", "average", "expected", "standard", "typical",
                "neutral", "uncertain", "unsure", "curious", "surprised",
                "interested", "cautious", "patient", "calm",
            ]),
            themes,
            themes_positive: set(&[
                "satisfaction", "quality", "clarity", "transparency", "growth",
                "resolution", "responsiveness", "availability",
            ]),
            themes_negative: set(&[
                "complaint", "dispute", "escalation", "liability", "lawsuit",
                "litigation", "deadline",
            ]),
            topics: set(&[
                "billing", "pricing", "onboarding", "communication", "support",
                "contract", "settlement", "intake", "scheduling", "paperwork",
                "insurance", "paralegal", "consultation", "retainer", "invoice",
                "documentation", "compliance", "mediation", "arbitration",
            ]),
            entities: set(&[
                "attorney", "lawyer", "paralegal", "counsel", "judge", "court",
                "clerk", "firm", "client", "plaintiff", "defendant", "witness",
                "mediator", "arbitrator", "notary", "bar", "partner",
                "associate", "office", "department", "agency", "company",
                "insurer", "adjuster",
            ]),
            actions_positive: set(&[
                "helped", "resolved", "improved", "delivered", "responded",
                "answered", "explained", "supported", "fixed", "solved",
                "listened", "communicated", "simplified", "clarified",
            ]),
            actions_negative: set(&[
                "delayed", "ignored", "failed", "missed", "canceled",
                "cancelled", "complicated", "confused", "overcharged",
                "disputed", "escalated", "stalled",
            ]),
        }
    }

    /// Load a lexicon from a JSON document. Absent fields keep the built-in
    /// defaults via `#[serde(default)]`.
    pub fn from_json(json: &str) -> termcloud_core::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn is_noise(&self, word: &str) -> bool {
        self.noise_words.contains(word)
    }

    pub fn is_law_firm_suffix(&self, word: &str) -> bool {
        self.law_firm_suffixes.contains(word)
    }

    /// Whether the token carries one of the configured verb suffixes.
    /// Requires at least one character of stem beyond the suffix.
    pub fn has_verb_suffix(&self, word: &str) -> bool {
        self.verb_suffixes
            .iter()
            .any(|suffix| word.len() > suffix.len() + 1 && word.ends_with(suffix.as_str()))
    }

    pub fn is_verb(&self, word: &str) -> bool {
        self.verbs.contains(word)
    }

    /// Which emotion bucket the word belongs to, if any.
    pub fn emotion_bucket(&self, word: &str) -> Option<SentimentTag> {
        if self.emotions_positive.contains(word) {
            Some(SentimentTag::Positive)
        } else if self.emotions_negative.contains(word) {
            Some(SentimentTag::Negative)
        } else if self.emotions_neutral.contains(word) {
            Some(SentimentTag::Neutral)
        } else {
            None
        }
    }

    pub fn is_theme_word(&self, word: &str) -> bool {
        self.themes.values().any(|bucket| bucket.contains(word))
    }

    pub fn is_topic_word(&self, word: &str) -> bool {
        self.topics.contains(word)
    }

    pub fn is_entity_term(&self, word: &str) -> bool {
        self.entities.contains(word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_buckets() {
        let lex = Lexicon::builtin();
        assert!(lex.is_noise("https"));
        assert!(lex.is_law_firm_suffix("llp"));
        assert!(lex.is_verb("help"));
        assert!(lex.has_verb_suffix("billing"));
        assert!(!lex.has_verb_suffix("ring")); // suffix needs a real stem
        assert_eq!(lex.emotion_bucket("happy"), Some(SentimentTag::Positive));
        assert_eq!(lex.emotion_bucket("angry"), Some(SentimentTag::Negative));
        assert_eq!(lex.emotion_bucket("okay"), Some(SentimentTag::Neutral));
        assert_eq!(lex.emotion_bucket("table"), None);
        assert!(lex.is_theme_word("contract"));
        assert!(lex.is_topic_word("billing"));
        assert!(lex.is_entity_term("attorney"));
    }

    #[test]
    fn test_from_json_partial_override() {
        let lex = Lexicon::from_json(r#"{"topics": ["widgets"]}"#).unwrap();
        assert!(lex.is_topic_word("widgets"));
        assert!(!lex.is_topic_word("billing"));
        // untouched fields keep the defaults
        assert!(lex.is_verb("help"));
    }
}
