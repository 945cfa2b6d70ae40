//! Output files are staged next to their destination and renamed into place,
//! so a failed run never leaves a half-written edit list or manifest behind.
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;

pub fn write_output_bytes(dest: &Path, bytes: &[u8]) -> Result<()> {
    let parent = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    let mut staged = tempfile::NamedTempFile::new_in(parent)
        .with_context(|| format!("stage {}", dest.display()))?;
    staged
        .write_all(bytes)
        .with_context(|| format!("write {}", dest.display()))?;
    staged
        .persist(dest)
        .map_err(|err| anyhow!("publish {}: {}", dest.display(), err.error))?;
    Ok(())
}

pub fn write_output_text(dest: &Path, text: &str) -> Result<()> {
    write_output_bytes(dest, text.as_bytes())
}

pub fn write_output_json<T: serde::Serialize>(dest: &Path, value: &T) -> Result<()> {
    let mut bytes = serde_json::to_vec_pretty(value).context("serialize output JSON")?;
    bytes.push(b'\n');
    write_output_bytes(dest, &bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_parent_dirs_and_replaces_existing_file() {
        let root = tempfile::tempdir().expect("create temp dir");
        let dest = root.path().join("out/edit_list.json");

        write_output_text(&dest, "first").expect("write first");
        write_output_json(&dest, &serde_json::json!({"entries": []})).expect("write second");

        let text = fs::read_to_string(&dest).expect("read back");
        let value: serde_json::Value = serde_json::from_str(&text).expect("parse JSON");
        assert_eq!(value["entries"], serde_json::json!([]));
        let leftovers = fs::read_dir(root.path().join("out"))
            .expect("list out dir")
            .count();
        assert_eq!(leftovers, 1);
    }
}
