//! Minimal CSV record reader for timeline exports.
//!
//! Quoted fields may hold commas, newlines and doubled quotes. The first
//! record is the header.
use anyhow::{anyhow, Context, Result};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSet {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RecordSet {
    pub fn parse(text: &str) -> Self {
        let mut records = split_records(text).into_iter();
        let header = records.next().unwrap_or_default();
        Self {
            header,
            rows: records.collect(),
        }
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|column| column.trim() == name)
    }

    pub fn columns(&self) -> HashMap<&str, usize> {
        self.header
            .iter()
            .enumerate()
            .map(|(index, column)| (column.trim(), index))
            .collect()
    }

    /// Render back to CSV text, quoting fields where needed.
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        push_record(&mut out, &self.header);
        for row in &self.rows {
            push_record(&mut out, row);
        }
        out
    }
}

/// Read the record source. A missing or unreadable file is fatal for a run.
pub fn read_record_file(path: &Path) -> Result<RecordSet> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read record source {}", path.display()))?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(&text);
    let records = RecordSet::parse(text);
    if records.header.iter().all(|column| column.trim().is_empty()) {
        return Err(anyhow!("record source {} has no header", path.display()));
    }
    Ok(records)
}

fn split_records(text: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(ch);
            }
            continue;
        }
        match ch {
            '"' => in_quotes = true,
            ',' => record.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                record.push(std::mem::take(&mut field));
                finish_record(&mut records, std::mem::take(&mut record));
            }
            _ => field.push(ch),
        }
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        finish_record(&mut records, record);
    }
    records
}

fn finish_record(records: &mut Vec<Vec<String>>, record: Vec<String>) {
    // Blank lines carry a single empty field.
    if record.len() == 1 && record[0].is_empty() {
        return;
    }
    records.push(record);
}

fn push_record(out: &mut String, fields: &[String]) {
    let escaped: Vec<String> = fields.iter().map(|field| escape_field(field)).collect();
    out.push_str(&escaped.join(","));
    out.push('\n');
}

/// Quote a field when it holds separators, quotes, line breaks, or
/// leading/trailing whitespace.
pub fn escape_field(value: &str) -> String {
    let needs_quotes = value.contains([',', '"', '\n', '\r'])
        || value.starts_with(char::is_whitespace)
        || value.ends_with(char::is_whitespace);
    if needs_quotes {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
