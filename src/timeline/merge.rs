//! Attach one label per row to an exported timeline.
use super::records::RecordSet;
use super::LABEL_COLUMN;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Read a label file: one label per line, line endings stripped.
pub fn read_labels(path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read labels {}", path.display()))?;
    Ok(text
        .lines()
        .map(|line| line.trim_end_matches('\r').to_string())
        .collect())
}

/// Set the label column of row `i` to `labels[i]`, adding the column when
/// absent. Rows past the end of `labels` get an empty label.
pub fn merge_labels(records: &RecordSet, labels: &[String]) -> RecordSet {
    let mut merged = records.clone();
    let label_idx = match merged.column(LABEL_COLUMN) {
        Some(idx) => idx,
        None => {
            merged.header.push(LABEL_COLUMN.to_string());
            merged.header.len() - 1
        }
    };
    let width = merged.header.len();
    for (row_idx, row) in merged.rows.iter_mut().enumerate() {
        if row.len() < width {
            row.resize(width, String::new());
        }
        row[label_idx] = labels.get(row_idx).cloned().unwrap_or_default();
    }
    merged
}

/// `timeline_export.csv` -> `timeline_export_merged.csv`.
pub fn default_merged_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "timeline".to_string());
    input.with_file_name(format!("{stem}_merged.csv"))
}
