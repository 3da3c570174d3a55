//! Shared fixtures for composition tests along with focused submodules.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde_json::Value;
use tempfile::TempDir;

use super::ConfigReader;
use crate::error::ConfigResult;
use crate::node::ConfigTree;


/// Write a fixture file into `dir`, creating parent directories as needed.
pub(super) fn write_file(dir: &Path, name: &str, contents: &str) -> Result<()> {
    let target = dir.join(name);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).context("create fixture directory")?;
    }
    fs::write(&target, contents).with_context(|| format!("write fixture {name}"))?;
    Ok(())
}

/// Read `name` from `dir` with the default reader and root paths.
pub(super) fn read_root(dir: &Path, name: &str) -> ConfigResult<ConfigTree> {
    ConfigReader::new().read(Path::new(name), dir, "/", "/")
}

/// Read `name` from `dir` and project the resolved tree to JSON.
pub(super) fn read_to_json(dir: &Path, name: &str) -> Result<Value> {
    let tree = read_root(dir, name).map_err(|err| anyhow!(err.to_string()))?;
    tree.to_json(tree.root())
        .ok_or_else(|| anyhow!("resolved tree must project to JSON"))
}

/// Fresh fixture directory for one test.
pub(super) fn fixture_dir() -> Result<TempDir> {
    TempDir::new().context("create fixture directory")
}
