//! Allocation engine: fills target windows with cuts drawn from category pools.
//!
//! All mutable state (pool order, used spans, cached category sizes) is owned
//! by one `Packer`, so independent runs never share bookkeeping.
mod error;
mod ledger;
mod packer;
mod picker;
mod pool;

pub use error::AllocError;
pub use ledger::{BucketKey, IntervalLedger, UsedSpan};
pub use packer::{
    DurationRange, InsertError, Packer, PackerSettings, PlacementCommand, RunReport,
    SkippedWindow, TimelineInserter, WindowFill,
};
pub use picker::{Pick, PickStats, PickStrategy, PickerSettings, SegmentPicker};
pub use pool::PoolSampler;
