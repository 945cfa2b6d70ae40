//! Build a catalog manifest from a resource directory.
//!
//! Each immediate sub-directory becomes a category named after it; regular
//! files directly inside it become items. Files are not probed, so every
//! item spans `[0, default_length)` until the manifest is edited.
use super::{CatalogItem, CatalogManifest};
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq)]
pub struct ScanOptions {
    pub default_length: f64,
    /// Lower-case extensions without the dot; empty accepts every file.
    pub extensions: Vec<String>,
}

pub fn scan_resource_dir(root: &Path, options: &ScanOptions) -> Result<CatalogManifest> {
    if !(options.default_length.is_finite() && options.default_length > 0.0) {
        return Err(anyhow!(
            "default length must be positive (got {})",
            options.default_length
        ));
    }
    if !root.is_dir() {
        return Err(anyhow!("resource dir not found: {}", root.display()));
    }

    let mut manifest = CatalogManifest::default();
    for dir in sorted_entries(root)?.into_iter().filter(|path| path.is_dir()) {
        let Some(category) = dir.file_name().map(|name| name.to_string_lossy().into_owned())
        else {
            continue;
        };
        let mut items = Vec::new();
        for file in sorted_entries(&dir)?.into_iter().filter(|path| path.is_file()) {
            if !extension_allowed(&file, &options.extensions) {
                tracing::debug!(path = %file.display(), "skipping file outside extension filter");
                continue;
            }
            let name = file
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            items.push(CatalogItem {
                name,
                path: Some(file.display().to_string()),
                in_point: 0.0,
                out_point: options.default_length,
            });
        }
        tracing::info!(category = %category, items = items.len(), "scanned category");
        manifest.categories.insert(category, items);
    }
    Ok(manifest)
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("read {}", dir.display()))? {
        let entry = entry.with_context(|| format!("read entry in {}", dir.display()))?;
        entries.push(entry.path());
    }
    entries.sort();
    Ok(entries)
}

fn extension_allowed(path: &Path, extensions: &[String]) -> bool {
    if extensions.is_empty() {
        return true;
    }
    let Some(ext) = path.extension() else {
        return false;
    };
    let ext = ext.to_string_lossy().to_ascii_lowercase();
    extensions
        .iter()
        .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(&ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MediaCatalog;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent directory");
        }
        fs::write(path, b"").expect("write file");
    }

    #[test]
    fn each_subdirectory_becomes_a_sorted_category() {
        let root = tempfile::tempdir().expect("create temp dir");
        touch(&root.path().join("Cat/b.mp4"));
        touch(&root.path().join("Cat/a.mov"));
        touch(&root.path().join("Cat/nested/deep.mp4"));
        touch(&root.path().join("Dog_Park/x.mp4"));
        touch(&root.path().join("loose.mp4"));
        fs::create_dir_all(root.path().join("Empty")).expect("create empty dir");

        let options = ScanOptions {
            default_length: 8.0,
            extensions: Vec::new(),
        };
        let manifest = scan_resource_dir(root.path(), &options).expect("scan");

        let names: Vec<&str> = manifest.categories.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Cat", "Dog_Park", "Empty"]);
        let cat = &manifest.categories["Cat"];
        assert_eq!(cat.len(), 2);
        assert_eq!(cat[0].name, "a.mov");
        assert_eq!(cat[1].name, "b.mp4");
        assert_eq!(manifest.item_usable_range("Cat", 1), Ok((0.0, 8.0)));
        assert_eq!(manifest.category_size("Empty"), Some(0));
    }

    #[test]
    fn extension_filter_is_case_insensitive() {
        let root = tempfile::tempdir().expect("create temp dir");
        touch(&root.path().join("Cat/a.MP4"));
        touch(&root.path().join("Cat/notes.txt"));
        touch(&root.path().join("Cat/README"));

        let options = ScanOptions {
            default_length: 5.0,
            extensions: vec![".mp4".to_string(), "mov".to_string()],
        };
        let manifest = scan_resource_dir(root.path(), &options).expect("scan");
        let items = &manifest.categories["Cat"];
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "a.MP4");
    }

    #[test]
    fn rejects_missing_root_and_bad_length() {
        let root = tempfile::tempdir().expect("create temp dir");
        let ok = ScanOptions {
            default_length: 5.0,
            extensions: Vec::new(),
        };
        assert!(scan_resource_dir(&root.path().join("absent"), &ok).is_err());
        let bad = ScanOptions {
            default_length: 0.0,
            extensions: Vec::new(),
        };
        assert!(scan_resource_dir(root.path(), &bad).is_err());
    }
}
