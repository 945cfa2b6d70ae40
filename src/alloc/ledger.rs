//! Per-item bookkeeping of source sub-ranges that have already been cut.
//!
//! The ledger is append-only for the life of an engine: spans are never
//! shrunk or removed, so later picks always see every earlier choice.
use serde::Serialize;
use std::collections::HashMap;

/// Ledger bucket identity: the item key plus its playable length.
///
/// The length is quantised to whole milliseconds so a changed in/out bound
/// lands in a fresh bucket while float noise does not.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct BucketKey {
    pub identity: String,
    pub length_ms: i64,
}

impl BucketKey {
    pub fn new(identity: impl Into<String>, usable_start: f64, usable_end: f64) -> Self {
        Self {
            identity: identity.into(),
            length_ms: ((usable_end - usable_start) * 1000.0).round() as i64,
        }
    }
}

/// A registered sub-range, in the source item's own time base.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UsedSpan {
    pub start: f64,
    pub end: f64,
}

impl UsedSpan {
    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }

    pub fn intersection(&self, start: f64, end: f64) -> f64 {
        (self.end.min(end) - self.start.max(start)).max(0.0)
    }
}

#[derive(Debug, Default)]
pub struct IntervalLedger {
    buckets: HashMap<BucketKey, Vec<UsedSpan>>,
}

impl IntervalLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the candidate intersects any registered span of the bucket
    /// by at least `min_overlap`. Touching spans never collide.
    pub fn has_heavy_overlap(
        &self,
        key: &BucketKey,
        candidate_start: f64,
        candidate_end: f64,
        min_overlap: f64,
    ) -> bool {
        let Some(spans) = self.buckets.get(key) else {
            return false;
        };
        spans.iter().any(|span| {
            let overlap = span.intersection(candidate_start, candidate_end);
            overlap > 0.0 && overlap >= min_overlap
        })
    }

    pub fn register(&mut self, key: &BucketKey, start: f64, end: f64) {
        let (start, end) = if end < start { (end, start) } else { (start, end) };
        self.buckets
            .entry(key.clone())
            .or_default()
            .push(UsedSpan { start, end });
    }

    /// Spans of a bucket ordered by start.
    pub fn spans_for(&self, key: &BucketKey) -> Vec<UsedSpan> {
        let mut spans = self.buckets.get(key).cloned().unwrap_or_default();
        spans.sort_by(|a, b| a.start.total_cmp(&b.start).then(a.end.total_cmp(&b.end)));
        spans
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn span_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> BucketKey {
        BucketKey::new("clip.mp4", 0.0, 10.0)
    }

    #[test]
    fn empty_bucket_never_overlaps() {
        let ledger = IntervalLedger::new();
        assert!(!ledger.has_heavy_overlap(&key(), 0.0, 10.0, 0.0));
    }

    #[test]
    fn overlap_below_threshold_is_tolerated() {
        let mut ledger = IntervalLedger::new();
        ledger.register(&key(), 2.0, 5.0);
        // 1s of intersection against a 1.05s threshold
        assert!(!ledger.has_heavy_overlap(&key(), 4.0, 7.0, 1.05));
        assert!(ledger.has_heavy_overlap(&key(), 3.0, 6.0, 1.05));
    }

    #[test]
    fn touching_spans_do_not_collide_even_with_zero_threshold() {
        let mut ledger = IntervalLedger::new();
        ledger.register(&key(), 2.0, 5.0);
        assert!(!ledger.has_heavy_overlap(&key(), 5.0, 8.0, 0.0));
        assert!(ledger.has_heavy_overlap(&key(), 4.9, 8.0, 0.0));
    }

    #[test]
    fn spans_are_sorted_and_append_only() {
        let mut ledger = IntervalLedger::new();
        ledger.register(&key(), 6.0, 8.0);
        ledger.register(&key(), 1.0, 2.0);
        ledger.register(&key(), 6.0, 8.0);
        let spans = ledger.spans_for(&key());
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[0], UsedSpan { start: 1.0, end: 2.0 });
        assert_eq!(spans[1].start, 6.0);
        assert_eq!(ledger.span_count(), 3);
    }

    #[test]
    fn changed_length_starts_a_fresh_bucket() {
        let mut ledger = IntervalLedger::new();
        ledger.register(&BucketKey::new("clip.mp4", 0.0, 10.0), 0.0, 4.0);
        let trimmed = BucketKey::new("clip.mp4", 0.0, 9.0);
        assert!(!ledger.has_heavy_overlap(&trimmed, 0.0, 4.0, 0.5));
        assert!(ledger.spans_for(&trimmed).is_empty());
        assert_eq!(ledger.bucket_count(), 1);
    }
}
