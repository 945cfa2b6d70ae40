//! Packing loop: lays cuts back-to-back across each target window.
use super::ledger::{BucketKey, IntervalLedger};
use super::picker::{PickStats, PickStrategy, PickerSettings, SegmentPicker};
use super::pool::PoolSampler;
use super::AllocError;
use crate::catalog::MediaCatalog;
use crate::timeline::TargetWindow;
use rand::Rng;
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

/// One cut handed to the timeline inserter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacementCommand {
    pub category: String,
    pub item_index: usize,
    /// Catalog identity of the source item.
    pub item: String,
    pub source_start: f64,
    pub source_end: f64,
    pub timeline_insert_time: f64,
    /// Timeline length consumed by this cut.
    pub duration: f64,
    pub strategy: PickStrategy,
}

#[derive(Debug, Clone, Error)]
#[error("insertion failed: {0}")]
pub struct InsertError(pub String);

/// Receives placements one at a time, in emission order.
pub trait TimelineInserter {
    fn insert(&mut self, command: &PlacementCommand) -> Result<(), InsertError>;
}

/// Half-open `[min, max)` range of candidate cut lengths in seconds.
/// A degenerate range (`min == max`) always yields `min`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, serde::Deserialize)]
pub struct DurationRange {
    pub min: f64,
    pub max: f64,
}

impl DurationRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.max <= self.min {
            return self.min;
        }
        self.min + rng.gen::<f64>() * (self.max - self.min)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackerSettings {
    pub durations: DurationRange,
    pub picker: PickerSettings,
}

impl Default for PackerSettings {
    fn default() -> Self {
        Self {
            durations: DurationRange::new(2.0, 4.0),
            picker: PickerSettings::default(),
        }
    }
}

/// Result of a window that reached its end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WindowFill {
    pub placements: usize,
    pub cursor: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedWindow {
    pub row: usize,
    pub category: String,
    pub start: f64,
    pub end: f64,
    pub reason: String,
    pub detail: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunReport {
    pub windows_total: usize,
    pub windows_processed: usize,
    pub placements: usize,
    pub forced_fallbacks: usize,
    pub picks: PickStats,
    /// Source items with at least one used span.
    pub ledger_buckets: usize,
    pub ledger_spans: usize,
    pub skipped: Vec<SkippedWindow>,
}

#[derive(Debug, Error)]
enum StepFailure {
    #[error(transparent)]
    Catalog(#[from] AllocError),
    #[error(transparent)]
    Insert(#[from] InsertError),
}

/// Owns pool order, the interval ledger and the category size cache for a run.
#[derive(Debug)]
pub struct Packer<R> {
    settings: PackerSettings,
    rng: R,
    pools: PoolSampler,
    ledger: IntervalLedger,
    picker: SegmentPicker,
    sizes: HashMap<String, usize>,
    placements: usize,
}

impl<R: Rng> Packer<R> {
    pub fn new(settings: PackerSettings, rng: R) -> Self {
        Self {
            settings,
            rng,
            pools: PoolSampler::new(),
            ledger: IntervalLedger::new(),
            picker: SegmentPicker::new(settings.picker),
            sizes: HashMap::new(),
            placements: 0,
        }
    }

    pub fn ledger(&self) -> &IntervalLedger {
        &self.ledger
    }

    pub fn pick_stats(&self) -> PickStats {
        self.picker.stats()
    }

    /// Fill every window in input order. Failures are recorded per window and
    /// never stop the run; partially filled windows keep their placements.
    pub fn run(
        &mut self,
        windows: &[TargetWindow],
        catalog: &dyn MediaCatalog,
        inserter: &mut dyn TimelineInserter,
    ) -> RunReport {
        let placements_before = self.placements;
        let mut report = RunReport {
            windows_total: windows.len(),
            ..RunReport::default()
        };
        for window in windows {
            match self.fill_window(window, catalog, inserter) {
                Ok(fill) => {
                    report.windows_processed += 1;
                    tracing::debug!(
                        row = window.row,
                        category = %window.category,
                        placements = fill.placements,
                        "window done"
                    );
                }
                Err(err) => {
                    tracing::warn!(
                        row = window.row,
                        category = %window.category,
                        reason = err.code(),
                        "window skipped: {err}"
                    );
                    report.skipped.push(SkippedWindow {
                        row: window.row,
                        category: window.category.clone(),
                        start: window.start,
                        end: window.end,
                        reason: err.code().to_string(),
                        detail: err.to_string(),
                    });
                }
            }
        }
        report.placements = self.placements - placements_before;
        report.picks = self.picker.stats();
        report.forced_fallbacks = report.picks.forced;
        report.ledger_buckets = self.ledger.bucket_count();
        report.ledger_spans = self.ledger.span_count();
        report
    }

    /// Lay cuts from `window.start` until the cursor reaches `window.end`.
    pub fn fill_window(
        &mut self,
        window: &TargetWindow,
        catalog: &dyn MediaCatalog,
        inserter: &mut dyn TimelineInserter,
    ) -> Result<WindowFill, AllocError> {
        let size = self.category_size(&window.category, catalog)?;
        let mut cursor = window.start;
        let mut placements = 0;

        while cursor < window.end {
            let index = self.pools.draw(&window.category, size, &mut self.rng)?;
            let previous = cursor;
            match self.place(window, index, cursor, catalog, inserter) {
                Ok(next) => cursor = next,
                Err(err) => tracing::warn!(
                    row = window.row,
                    category = %window.category,
                    index,
                    cursor,
                    "placement failed: {err}"
                ),
            }
            if cursor <= previous {
                return Err(AllocError::PlacementStuck {
                    cursor,
                    end: window.end,
                });
            }
            placements += 1;
            self.placements += 1;
        }

        Ok(WindowFill { placements, cursor })
    }

    fn category_size(
        &mut self,
        category: &str,
        catalog: &dyn MediaCatalog,
    ) -> Result<usize, AllocError> {
        if let Some(size) = self.sizes.get(category) {
            return Ok(*size);
        }
        let size = catalog
            .category_size(category)
            .ok_or_else(|| AllocError::CategoryNotFound(category.to_string()))?;
        if size == 0 {
            return Err(AllocError::EmptyCategory(category.to_string()));
        }
        self.sizes.insert(category.to_string(), size);
        Ok(size)
    }

    /// Emit one placement at `cursor` and return the advanced cursor.
    fn place(
        &mut self,
        window: &TargetWindow,
        index: usize,
        cursor: f64,
        catalog: &dyn MediaCatalog,
        inserter: &mut dyn TimelineInserter,
    ) -> Result<f64, StepFailure> {
        let (usable_start, usable_end) = catalog.item_usable_range(&window.category, index)?;
        let identity = catalog.item_identity(&window.category, index)?;

        let candidate = self.settings.durations.sample(&mut self.rng);
        let remaining = window.end - cursor;
        let (duration, next) = if remaining <= candidate {
            (remaining, window.end)
        } else {
            (candidate, cursor + candidate)
        };

        let key = BucketKey::new(identity.as_str(), usable_start, usable_end);
        let pick = self.picker.pick_start(
            &mut self.ledger,
            &key,
            usable_start,
            usable_end,
            duration,
            &mut self.rng,
        );

        let command = PlacementCommand {
            category: window.category.clone(),
            item_index: index,
            item: identity,
            source_start: pick.start,
            source_end: pick.end.min(usable_end),
            timeline_insert_time: cursor,
            duration,
            strategy: pick.strategy,
        };
        inserter.insert(&command)?;
        Ok(next)
    }
}

#[cfg(test)]
#[path = "packer_tests.rs"]
mod tests;
