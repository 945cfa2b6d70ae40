//! Record set to ordered target windows.
use super::records::RecordSet;
use super::{TargetWindow, END_COLUMN, LABEL_COLUMN, NAME_COLUMN, START_COLUMN};
use anyhow::{anyhow, Result};
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;
use thiserror::Error;

const DEFAULT_WINDOW_NAME: &str = "Clip";

/// Why a data row produced no window. Dropped rows never stop parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[error("row {row}: {reason}")]
pub struct RowRejection {
    pub row: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedWindows {
    pub windows: Vec<TargetWindow>,
    pub rejected: Vec<RowRejection>,
}

fn whitespace_run() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\s+").expect("regex for whitespace runs"))
}

/// Turn a free-text label into a pool key: trim, then join words with `_`.
pub fn normalize_category(label: &str) -> String {
    whitespace_run()
        .replace_all(label.trim(), "_")
        .into_owned()
}

/// Parse windows in input order.
///
/// Only a header without the start/end columns is an error; bad rows are
/// dropped and reported in `rejected`.
pub fn parse_windows(records: &RecordSet) -> Result<ParsedWindows> {
    let start_idx = records
        .column(START_COLUMN)
        .ok_or_else(|| anyhow!("record source is missing the {START_COLUMN} column"))?;
    let end_idx = records
        .column(END_COLUMN)
        .ok_or_else(|| anyhow!("record source is missing the {END_COLUMN} column"))?;
    let name_idx = records.column(NAME_COLUMN);
    let label_idx = records.column(LABEL_COLUMN);

    let mut parsed = ParsedWindows::default();
    for (offset, fields) in records.rows.iter().enumerate() {
        let row = offset + 1;
        match parse_row(fields, records.header.len(), start_idx, end_idx, name_idx, label_idx) {
            Ok((start, end, name, category)) => parsed.windows.push(TargetWindow {
                start,
                end,
                category,
                name,
                row,
            }),
            Err(reason) => {
                tracing::info!(row, %reason, "dropping timeline row");
                parsed.rejected.push(RowRejection { row, reason });
            }
        }
    }
    tracing::debug!(
        windows = parsed.windows.len(),
        rejected = parsed.rejected.len(),
        "parsed timeline records"
    );
    Ok(parsed)
}

fn parse_row(
    fields: &[String],
    width: usize,
    start_idx: usize,
    end_idx: usize,
    name_idx: Option<usize>,
    label_idx: Option<usize>,
) -> Result<(f64, f64, String, String), String> {
    if fields.len() < width {
        return Err(format!("expected {width} fields, found {}", fields.len()));
    }
    let start = parse_seconds(&fields[start_idx], START_COLUMN)?;
    let end = parse_seconds(&fields[end_idx], END_COLUMN)?;
    if start < 0.0 {
        return Err(format!("negative start {start}"));
    }
    if end <= start {
        return Err(format!("end {end} is not after start {start}"));
    }
    let name = name_idx
        .map(|idx| fields[idx].clone())
        .unwrap_or_else(|| DEFAULT_WINDOW_NAME.to_string());
    let label = label_idx.map(|idx| fields[idx].as_str()).unwrap_or_default();
    let category = normalize_category(label);
    if category.is_empty() {
        return Err("empty category".to_string());
    }
    Ok((start, end, name, category))
}

fn parse_seconds(raw: &str, column: &str) -> Result<f64, String> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("{column} is not a number: {raw:?}"))?;
    if !value.is_finite() {
        return Err(format!("{column} is not finite: {raw:?}"));
    }
    Ok(value)
}

#[cfg(test)]
#[path = "parse_tests.rs"]
mod tests;
