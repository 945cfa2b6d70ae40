//! Source start selection with bounded reuse.
//!
//! Strategies run in a fixed order and the first success wins:
//! randomized retry, deterministic gap scan, forced accept. The winning
//! strategy is returned with the pick so degraded placements stay visible.
use super::ledger::{BucketKey, IntervalLedger, UsedSpan};
use rand::Rng;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum PickStrategy {
    /// Accepted on the given 1-based random attempt.
    Random { attempt: usize },
    GapScan,
    /// Accepted regardless of overlap after the other strategies failed.
    Forced,
    /// Item shorter than the requested duration; the whole item is used.
    ShortItem,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pick {
    pub start: f64,
    /// Source end, already clamped to the item's usable end.
    pub end: f64,
    pub strategy: PickStrategy,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickerSettings {
    pub max_random_tries: usize,
    pub min_separation_factor: f64,
    pub gap_jitter_fraction: f64,
}

impl Default for PickerSettings {
    fn default() -> Self {
        Self {
            max_random_tries: 12,
            min_separation_factor: 0.35,
            gap_jitter_fraction: 0.15,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PickStats {
    pub random: usize,
    pub gap_scan: usize,
    pub forced: usize,
    pub short_item: usize,
}

#[derive(Debug, Default)]
pub struct SegmentPicker {
    settings: PickerSettings,
    stats: PickStats,
}

impl SegmentPicker {
    pub fn new(settings: PickerSettings) -> Self {
        Self {
            settings,
            stats: PickStats::default(),
        }
    }

    pub fn stats(&self) -> PickStats {
        self.stats
    }

    /// Choose a start inside `[usable_start, usable_end - duration]` and
    /// register the chosen span in the ledger before returning it.
    pub fn pick_start<R: Rng + ?Sized>(
        &mut self,
        ledger: &mut IntervalLedger,
        key: &BucketKey,
        usable_start: f64,
        usable_end: f64,
        duration: f64,
        rng: &mut R,
    ) -> Pick {
        if usable_end - usable_start < duration {
            self.stats.short_item += 1;
            ledger.register(key, usable_start, usable_end);
            return Pick {
                start: usable_start,
                end: usable_end,
                strategy: PickStrategy::ShortItem,
            };
        }

        let latest_start = usable_end - duration;
        let min_overlap = self.settings.min_separation_factor * duration;

        for attempt in 1..=self.settings.max_random_tries {
            let start = uniform(rng, usable_start, latest_start);
            if !ledger.has_heavy_overlap(key, start, start + duration, min_overlap) {
                self.stats.random += 1;
                return accept(ledger, key, start, duration, PickStrategy::Random { attempt });
            }
        }

        if let Some(start) = self.scan_gaps(ledger, key, usable_start, usable_end, duration, rng) {
            self.stats.gap_scan += 1;
            tracing::debug!(identity = %key.identity, start, duration, "gap scan placement");
            return accept(ledger, key, start, duration, PickStrategy::GapScan);
        }

        let start = uniform(rng, usable_start, latest_start);
        self.stats.forced += 1;
        tracing::warn!(
            identity = %key.identity,
            start,
            duration,
            strategy = "forced",
            "no free span left; accepting overlapping placement"
        );
        accept(ledger, key, start, duration, PickStrategy::Forced)
    }

    fn scan_gaps<R: Rng + ?Sized>(
        &self,
        ledger: &IntervalLedger,
        key: &BucketKey,
        usable_start: f64,
        usable_end: f64,
        duration: f64,
        rng: &mut R,
    ) -> Option<f64> {
        let (gap_start, gap_end) = first_gap(
            &ledger.spans_for(key),
            usable_start,
            usable_end,
            duration,
        )?;
        let slack = (gap_end - gap_start - duration).max(0.0);
        let jitter = self.settings.gap_jitter_fraction * slack * rng.gen::<f64>();
        Some(gap_start + jitter)
    }
}

/// First free interval of at least `duration` between the sorted spans,
/// scanning before the first span, between neighbours, then after the last.
pub(crate) fn first_gap(
    spans: &[UsedSpan],
    usable_start: f64,
    usable_end: f64,
    duration: f64,
) -> Option<(f64, f64)> {
    let mut free_from = usable_start;
    for span in spans {
        if span.end <= usable_start || span.start >= usable_end {
            continue;
        }
        let span_start = span.start.max(usable_start);
        if span_start - free_from >= duration {
            return Some((free_from, span_start));
        }
        free_from = free_from.max(span.end.min(usable_end));
    }
    if usable_end - free_from >= duration {
        return Some((free_from, usable_end));
    }
    None
}

fn uniform<R: Rng + ?Sized>(rng: &mut R, low: f64, high: f64) -> f64 {
    if high <= low {
        return low;
    }
    low + rng.gen::<f64>() * (high - low)
}

fn accept(
    ledger: &mut IntervalLedger,
    key: &BucketKey,
    start: f64,
    duration: f64,
    strategy: PickStrategy,
) -> Pick {
    let end = start + duration;
    ledger.register(key, start, end);
    Pick {
        start,
        end,
        strategy,
    }
}

#[cfg(test)]
#[path = "picker_tests.rs"]
mod tests;
