//! Media catalog: named categories of interchangeable source items.
//!
//! The packer only sees the `MediaCatalog` trait; the JSON manifest is the
//! file-backed implementation used by the CLI.
mod scan;

pub use scan::{scan_resource_dir, ScanOptions};

use crate::alloc::AllocError;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Current schema version for catalog manifests.
pub const CATALOG_SCHEMA_VERSION: u32 = 1;

/// Lookup interface the packer uses for categories and their items.
pub trait MediaCatalog {
    /// Number of items in the category, or `None` when it does not exist.
    fn category_size(&self, category: &str) -> Option<usize>;

    /// Playable `(in, out)` range of an item, in the item's own time base.
    fn item_usable_range(&self, category: &str, index: usize) -> Result<(f64, f64), AllocError>;

    /// Stable key used to bucket reuse bookkeeping for the item.
    fn item_identity(&self, category: &str, index: usize) -> Result<String, AllocError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(rename = "in")]
    pub in_point: f64,
    #[serde(rename = "out")]
    pub out_point: f64,
}

impl CatalogItem {
    pub fn identity(&self) -> &str {
        self.path.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogManifest {
    pub schema_version: u32,
    #[serde(default)]
    pub categories: BTreeMap<String, Vec<CatalogItem>>,
}

impl Default for CatalogManifest {
    fn default() -> Self {
        Self {
            schema_version: CATALOG_SCHEMA_VERSION,
            categories: BTreeMap::new(),
        }
    }
}

impl CatalogManifest {
    pub fn item_count(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    fn item(&self, category: &str, index: usize) -> Result<&CatalogItem, AllocError> {
        self.categories
            .get(category)
            .and_then(|items| items.get(index))
            .ok_or_else(|| AllocError::ItemNotFound {
                category: category.to_string(),
                index,
            })
    }
}

impl MediaCatalog for CatalogManifest {
    fn category_size(&self, category: &str) -> Option<usize> {
        self.categories.get(category).map(Vec::len)
    }

    fn item_usable_range(&self, category: &str, index: usize) -> Result<(f64, f64), AllocError> {
        let item = self.item(category, index)?;
        Ok((item.in_point, item.out_point))
    }

    fn item_identity(&self, category: &str, index: usize) -> Result<String, AllocError> {
        Ok(self.item(category, index)?.identity().to_string())
    }
}

/// Check schema version and item ranges (`0 <= in < out`).
pub fn validate_manifest(manifest: &CatalogManifest) -> Result<()> {
    if manifest.schema_version != CATALOG_SCHEMA_VERSION {
        return Err(anyhow!(
            "unsupported catalog schema_version {}",
            manifest.schema_version
        ));
    }
    for (category, items) in &manifest.categories {
        for (index, item) in items.iter().enumerate() {
            let valid = item.in_point.is_finite()
                && item.out_point.is_finite()
                && item.in_point >= 0.0
                && item.out_point > item.in_point;
            if !valid {
                return Err(anyhow!(
                    "catalog item {category}[{index}] ({}) has invalid range {}..{}",
                    item.name,
                    item.in_point,
                    item.out_point
                ));
            }
        }
    }
    Ok(())
}

pub fn load_manifest(path: &Path) -> Result<CatalogManifest> {
    let bytes = std::fs::read(path).with_context(|| format!("read catalog {}", path.display()))?;
    let manifest: CatalogManifest =
        serde_json::from_slice(&bytes).context("parse catalog manifest JSON")?;
    validate_manifest(&manifest)
        .with_context(|| format!("validate catalog {}", path.display()))?;
    tracing::debug!(
        categories = manifest.categories.len(),
        items = manifest.item_count(),
        "catalog loaded"
    );
    Ok(manifest)
}
