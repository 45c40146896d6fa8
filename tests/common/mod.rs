//! Common fixtures for the integration tests
//!
//! [`TestProject`] lays out a temporary project with a views directory, an
//! optional `viewmodel.toml` and data files, and builds `vmrender` commands that
//! run inside it.

// Not every test module uses every helper
#![allow(dead_code)]

use anyhow::{Context, Result};
use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use viewmodel_cli::view::TeraViewFactory;

/// A temporary project directory.
pub struct TestProject {
    temp_dir: TempDir,
}

impl TestProject {
    /// Create an empty project with a `views/` directory.
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new().context("Failed to create temp directory")?;
        fs::create_dir_all(temp_dir.path().join("views"))?;
        Ok(Self {
            temp_dir,
        })
    }

    /// Project root.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// The default views directory.
    pub fn views_dir(&self) -> PathBuf {
        self.path().join("views")
    }

    /// Write `views/<path>.html`.
    pub fn add_template(&self, path: &str, source: &str) -> Result<PathBuf> {
        self.write_file(&format!("views/{path}.html"), source)
    }

    /// Write `viewmodel.toml` in the project root.
    pub fn write_config(&self, content: &str) -> Result<PathBuf> {
        self.write_file("viewmodel.toml", content)
    }

    /// Write any file relative to the project root, creating parent directories.
    pub fn write_file(&self, relative: &str, content: &str) -> Result<PathBuf> {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    /// Load the views directory through the Tera-backed factory.
    pub fn views(&self) -> Result<TeraViewFactory> {
        TeraViewFactory::from_dir(&self.views_dir(), "html")
    }

    /// A `vmrender` command running in the project root with a clean environment.
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("vmrender").expect("vmrender binary should be built");
        cmd.current_dir(self.path()).env_remove("VIEWMODEL_CONFIG").env_remove("RUST_LOG");
        cmd
    }
}
