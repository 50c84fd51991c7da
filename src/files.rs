//! File helpers shared by every command: lossy reads, atomic upsert writes,
//! JSON documents and map directory discovery.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::Value;
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// What an upsert write did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Unchanged,
    Written,
    /// Content differs but this is a dry run.
    WouldWrite,
}

impl WriteOutcome {
    pub fn changed(self) -> bool {
        !matches!(self, WriteOutcome::Unchanged)
    }
}

/// Read a text file, replacing invalid UTF-8 instead of failing.
pub fn read_text(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
    Ok(match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    })
}

/// Read a text file, treating a missing file as empty.
pub fn read_text_or_empty(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    if path.exists() {
        read_text(path)
    } else {
        Ok(String::new())
    }
}

/// Write through a sibling temp file and rename over the target.
pub fn write_atomic(path: impl AsRef<Path>, contents: &str) -> Result<()> {
    let path = path.as_ref();
    let parent = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;

    let mut temp_path = path.to_path_buf();
    let temp_name = match path.file_name() {
        Some(name) => format!(".{}.tmp", name.to_string_lossy()),
        None => ".tmp".to_string(),
    };
    temp_path.set_file_name(temp_name);

    {
        let mut file = File::create(&temp_path).map_err(|e| Error::io(&temp_path, e))?;
        file.write_all(contents.as_bytes())
            .map_err(|e| Error::io(&temp_path, e))?;
        file.sync_all().map_err(|e| Error::io(&temp_path, e))?;
    }

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        Error::io(path, e)
    })
}

/// Write `contents` only if it differs from what is on disk.
pub fn write_if_changed(path: impl AsRef<Path>, contents: &str, dry_run: bool) -> Result<WriteOutcome> {
    let path = path.as_ref();
    if path.exists() && read_text(path)? == contents {
        return Ok(WriteOutcome::Unchanged);
    }
    if dry_run {
        return Ok(WriteOutcome::WouldWrite);
    }
    write_atomic(path, contents)?;
    Ok(WriteOutcome::Written)
}

pub fn read_json(path: impl AsRef<Path>) -> Result<Value> {
    let path = path.as_ref();
    let text = read_text(path)?;
    serde_json::from_str(&text).map_err(|e| Error::json(path, e))
}

/// Two-space indented JSON with a trailing newline.
pub fn to_json_text(value: &Value) -> String {
    let mut text = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
    text.push('\n');
    text
}

pub fn write_json(path: impl AsRef<Path>, value: &Value, dry_run: bool) -> Result<WriteOutcome> {
    write_if_changed(path, &to_json_text(value), dry_run)
}

/// Immediate subdirectories of `maps_dir`, sorted by name.
pub fn map_dirs(maps_dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let maps_dir = maps_dir.as_ref();
    let entries = fs::read_dir(maps_dir).map_err(|e| Error::io(maps_dir, e))?;

    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(maps_dir, e))?;
        let path = entry.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// Directory name of a map folder, e.g. `PetalburgCity`.
pub fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Every regular file named `file_name` below `root`, skipping symlinks.
pub fn find_named(root: impl AsRef<Path>, file_name: &str) -> Vec<PathBuf> {
    let mut found: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && e.file_name().to_string_lossy() == file_name)
        .map(|e| e.into_path())
        .collect();
    found.sort();
    found
}

/// Every regular file below `root` whose extension is one of `extensions`.
pub fn find_with_extensions(root: impl AsRef<Path>, extensions: &[&str]) -> Vec<PathBuf> {
    let mut found: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .and_then(|x| x.to_str())
                .is_some_and(|x| extensions.contains(&x))
        })
        .map(|e| e.into_path())
        .collect();
    found.sort();
    found
}
