//! Termcloud Classify — term extraction strategies, noise filtering, and
//! parallel partitioning over oversized corpora.

pub mod counts;
pub mod lexicon;
pub mod modes;
pub mod noise;
pub mod partition;
pub mod sentiment;

pub use counts::WordCounts;
pub use lexicon::Lexicon;
pub use modes::ClassifierRegistry;
pub use noise::NoiseFilter;
pub use sentiment::tag_word;
