//! Parallel text partitioner.
//!
//! Splits an oversized corpus into word-boundary-safe segments and
//! classifies them on a fixed set of worker threads, merging the per-segment
//! multisets. For boundary-safe splits the merged result equals a
//! single-threaded pass; a hard cut may split one token (accepted
//! approximation).

use tracing::warn;

use termcloud_core::types::AnalysisMode;

use crate::counts::WordCounts;
use crate::modes::ClassifierRegistry;

/// Fraction of a segment's tail searched for a whitespace split point.
const BOUNDARY_WINDOW: usize = 5; // last 1/5th of the segment

/// Split `text` into up to `n` segments, pulling each cut back to the
/// nearest preceding whitespace when one exists within the trailing window.
/// Cuts always land on char boundaries.
pub fn split_segments(text: &str, n: usize) -> Vec<&str> {
    if n <= 1 || text.len() <= n {
        return vec![text];
    }

    let target = text.len().div_ceil(n);
    let mut segments = Vec::with_capacity(n);
    let mut start = 0;

    while start < text.len() {
        let mut end = (start + target).min(text.len());
        if end == text.len() {
            segments.push(&text[start..]);
            break;
        }

        let window_start = end.saturating_sub(target / BOUNDARY_WINDOW).max(start);
        // Whitespace is ASCII, so a byte scan is safe here.
        let cut = text.as_bytes()[window_start..end]
            .iter()
            .rposition(|b| b.is_ascii_whitespace())
            .map(|pos| window_start + pos);

        match cut {
            Some(ws) => {
                segments.push(&text[start..ws]);
                start = ws + 1;
            }
            None => {
                // Hard cut: back up to a char boundary.
                while !text.is_char_boundary(end) {
                    end -= 1;
                }
                segments.push(&text[start..end]);
                start = end;
            }
        }
    }

    segments
}

/// Classify `text` by dispatching segments to worker threads and merging
/// counts in segment order. A segment whose extractor fails contributes an
/// empty multiset.
pub fn classify_parallel(
    registry: &ClassifierRegistry,
    text: &str,
    mode: AnalysisMode,
    segment_count: usize,
) -> WordCounts {
    let segments = split_segments(text, segment_count);
    if segments.len() == 1 {
        return run_segment(registry, segments[0], mode, 0);
    }

    let results: Vec<WordCounts> = std::thread::scope(|scope| {
        let handles: Vec<_> = segments
            .iter()
            .copied()
            .enumerate()
            .map(|(index, segment)| {
                scope.spawn(move || run_segment(registry, segment, mode, index))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap_or_default()).collect()
    });

    let mut merged = WordCounts::new();
    for counts in results {
        merged.merge(counts);
    }
    merged
}

fn run_segment(
    registry: &ClassifierRegistry,
    segment: &str,
    mode: AnalysisMode,
    index: usize,
) -> WordCounts {
    match registry.classify(segment, mode) {
        Ok(counts) => counts,
        Err(e) => {
            warn!("Classification failed for segment {}: {}", index, e);
            WordCounts::new()
        }
    }
}
