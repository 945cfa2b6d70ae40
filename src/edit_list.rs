//! Edit list: the file-backed timeline inserter.
//!
//! Placements are recorded in emission order so an editor-side script can
//! replay them as subclip inserts.
use crate::alloc::{InsertError, PickStrategy, PlacementCommand, TimelineInserter};
use crate::timeline::escape_field;
use serde::Serialize;
use std::path::Path;

/// Current schema version for edit list JSON.
pub const EDIT_LIST_SCHEMA_VERSION: u32 = 1;

const CSV_HEADER: &str =
    "category,index,item,subclip,sourceStart,sourceEnd,timelineStart,timelineEnd,strategy";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditEntry {
    pub category: String,
    pub item_index: usize,
    pub item: String,
    pub subclip: String,
    pub source_start: f64,
    pub source_end: f64,
    pub timeline_start: f64,
    pub timeline_end: f64,
    pub strategy: PickStrategy,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditList {
    pub schema_version: u32,
    pub entries: Vec<EditEntry>,
}

impl Default for EditList {
    fn default() -> Self {
        Self {
            schema_version: EDIT_LIST_SCHEMA_VERSION,
            entries: Vec::new(),
        }
    }
}

impl EditList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_csv(&self) -> String {
        let mut out = String::from(CSV_HEADER);
        out.push('\n');
        for entry in &self.entries {
            let fields = [
                escape_field(&entry.category),
                entry.item_index.to_string(),
                escape_field(&entry.item),
                escape_field(&entry.subclip),
                format!("{:.3}", entry.source_start),
                format!("{:.3}", entry.source_end),
                format!("{:.3}", entry.timeline_start),
                format!("{:.3}", entry.timeline_end),
                strategy_label(entry.strategy).to_string(),
            ];
            out.push_str(&fields.join(","));
            out.push('\n');
        }
        out
    }
}

impl TimelineInserter for EditList {
    fn insert(&mut self, command: &PlacementCommand) -> Result<(), InsertError> {
        if command.source_end <= command.source_start {
            return Err(InsertError(format!(
                "empty source range {:.3}..{:.3} for {}",
                command.source_start, command.source_end, command.item
            )));
        }
        self.entries.push(EditEntry {
            category: command.category.clone(),
            item_index: command.item_index,
            item: command.item.clone(),
            subclip: subclip_name(&command.item, command.source_start, command.source_end),
            source_start: command.source_start,
            source_end: command.source_end,
            timeline_start: command.timeline_insert_time,
            timeline_end: command.timeline_insert_time + command.duration,
            strategy: command.strategy,
        });
        Ok(())
    }
}

/// `<file name>_subclip_<start>_<end>` with millisecond precision.
pub fn subclip_name(item: &str, source_start: f64, source_end: f64) -> String {
    let base = Path::new(item)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| item.to_string());
    format!("{base}_subclip_{source_start:.3}_{source_end:.3}")
}

fn strategy_label(strategy: PickStrategy) -> &'static str {
    match strategy {
        PickStrategy::Random { .. } => "random",
        PickStrategy::GapScan => "gap_scan",
        PickStrategy::Forced => "forced",
        PickStrategy::ShortItem => "short_item",
    }
}
