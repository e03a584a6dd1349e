//! Reading and writing structures as pretty JSON files.

use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use anyhow::Context;

use crate::{foundation::error::PropTreeResult, tree::structure::PropertyTree};

/// Load a structure saved by [`write_tree`] (or any JSON object of the same shape).
pub fn read_tree(path: &Path) -> PropTreeResult<PropertyTree> {
    let f = File::open(path).with_context(|| format!("open property tree '{}'", path.display()))?;
    let value: serde_json::Value = serde_json::from_reader(BufReader::new(f))?;
    PropertyTree::from_json(&value)
}

/// Save a structure as pretty JSON, creating parent directories as needed.
pub fn write_tree(path: &Path, tree: &PropertyTree) -> PropTreeResult<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("create output dir '{}'", dir.display()))?;
    }
    let f = File::create(path)
        .with_context(|| format!("create property tree '{}'", path.display()))?;
    let mut w = BufWriter::new(f);
    serde_json::to_writer_pretty(&mut w, tree)?;
    w.write_all(b"\n")
        .and_then(|()| w.flush())
        .with_context(|| format!("write property tree '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../tests/unit/io.rs"]
mod tests;
