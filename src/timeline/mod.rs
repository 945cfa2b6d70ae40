//! Timeline records: the CSV record source and the target windows parsed from it.
mod merge;
mod parse;
mod records;

pub use merge::{default_merged_path, merge_labels, read_labels};
pub use parse::{normalize_category, parse_windows, ParsedWindows, RowRejection};
pub use records::{escape_field, read_record_file, RecordSet};

use serde::Serialize;

/// Column holding the window start, in seconds.
pub const START_COLUMN: &str = "startSeconds";
/// Column holding the window end, in seconds.
pub const END_COLUMN: &str = "endSeconds";
/// Optional display name column.
pub const NAME_COLUMN: &str = "name";
/// Optional free-text label column used for categorization.
pub const LABEL_COLUMN: &str = "textContent";

/// A span of the output timeline to be filled from one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetWindow {
    pub start: f64,
    pub end: f64,
    pub category: String,
    pub name: String,
    /// 1-based data row in the record source (header excluded).
    pub row: usize,
}

impl TargetWindow {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}
