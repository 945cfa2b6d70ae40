//! Shared test infrastructure for integration tests.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Scratch directory holding fixtures for one `reelpack` invocation or more.
///
/// HOME and XDG_CONFIG_HOME point inside the directory so a user config on
/// the host never leaks into a test run.
pub struct Workspace {
    dir: TempDir,
}

impl Default for Workspace {
    fn default() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    pub fn write(&self, rel: &str, contents: &str) -> PathBuf {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create fixture dir");
        }
        std::fs::write(&path, contents).expect("write fixture");
        path
    }

    pub fn run<I, S>(&self, args: I) -> Output
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        Command::new(env!("CARGO_BIN_EXE_reelpack"))
            .args(args)
            .current_dir(self.dir.path())
            .env("HOME", self.dir.path())
            .env("XDG_CONFIG_HOME", self.path("xdg"))
            .env_remove("RUST_LOG")
            .output()
            .expect("spawn reelpack")
    }

    /// Run and parse stdout as JSON, failing the test on a non-zero exit.
    #[allow(dead_code)]
    pub fn run_json<I, S>(&self, args: I) -> serde_json::Value
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        let output = self.run(args);
        assert!(
            output.status.success(),
            "reelpack failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).expect("stdout is JSON")
    }

    #[allow(dead_code)]
    pub fn read_json(&self, path: &Path) -> serde_json::Value {
        let text = std::fs::read_to_string(path).expect("read output");
        serde_json::from_str(&text).expect("output is JSON")
    }
}

/// Two categories with a mix of long and short items.
#[allow(dead_code)]
pub const CATALOG: &str = r#"{
  "schema_version": 1,
  "categories": {
    "Cat": [
      { "name": "cat_a.mp4", "path": "/media/Cat/cat_a.mp4", "in": 0.0, "out": 30.0 },
      { "name": "cat_b.mp4", "in": 2.0, "out": 12.0 },
      { "name": "cat_c.mp4", "in": 0.0, "out": 1.5 }
    ],
    "Dog_Park": [
      { "name": "dog_a.mp4", "in": 0.0, "out": 20.0 },
      { "name": "dog_b.mp4", "in": 5.0, "out": 45.0 }
    ]
  }
}"#;
