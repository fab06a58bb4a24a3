//! Insertion-ordered word multiset.
//!
//! Tracks first-seen order alongside counts so ranking can break frequency
//! ties deterministically, whether the corpus was counted in one pass or
//! merged from parallel segments.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy)]
struct Entry {
    count: u64,
    order: u64,
}

/// Multiset of words with first-seen ordering.
#[derive(Debug, Clone, Default)]
pub struct WordCounts {
    entries: HashMap<String, Entry>,
    next_order: u64,
}

impl WordCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `word`.
    pub fn add(&mut self, word: &str) {
        self.add_n(word, 1);
    }

    /// Count `n` occurrences of `word`.
    pub fn add_n(&mut self, word: &str, n: u64) {
        if n == 0 {
            return;
        }
        if let Some(entry) = self.entries.get_mut(word) {
            entry.count += n;
        } else {
            let order = self.next_order;
            self.next_order += 1;
            self.entries.insert(word.to_string(), Entry { count: n, order });
        }
    }

    /// Sum another multiset into this one. Words new to `self` keep their
    /// relative order from `other`, appended after everything already seen.
    pub fn merge(&mut self, other: WordCounts) {
        let mut incoming: Vec<(String, Entry)> = other.entries.into_iter().collect();
        incoming.sort_by_key(|(_, e)| e.order);
        for (word, entry) in incoming {
            self.add_n(&word, entry.count);
        }
    }

    pub fn get(&self, word: &str) -> u64 {
        self.entries.get(word).map_or(0, |e| e.count)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total occurrences across all words.
    pub fn total(&self) -> u64 {
        self.entries.values().map(|e| e.count).sum()
    }

    /// Words ranked by descending count, ties broken by first-seen order.
    pub fn into_ranked(self) -> Vec<(String, u64)> {
        let mut items: Vec<(String, Entry)> = self.entries.into_iter().collect();
        items.sort_by(|(_, a), (_, b)| b.count.cmp(&a.count).then(a.order.cmp(&b.order)));
        items.into_iter().map(|(w, e)| (w, e.count)).collect()
    }
}

impl<'a> FromIterator<&'a str> for WordCounts {
    fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
        let mut counts = Self::new();
        for word in iter {
            counts.add(word);
        }
        counts
    }
}
