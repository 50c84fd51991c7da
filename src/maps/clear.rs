use std::collections::HashSet;
use std::path::{Path, PathBuf};

use glob::Pattern;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::files::{dir_name, map_dirs};

const EVENT_LISTS: &[&str] = &["object_events", "coord_events", "bg_events"];

/// How `clear-maps` picks its targets.
#[derive(Debug, Clone)]
pub enum MapSelection {
    /// Folder name contains a pattern or matches it as a glob.
    Patterns(Vec<String>),
    /// Folders absent from a baseline repository (its root or its `data/maps`).
    Baseline(PathBuf),
}

pub fn matches_any(name: &str, patterns: &[String]) -> bool {
    patterns.iter().any(|pat| {
        name.contains(pat.as_str()) || Pattern::new(pat).map(|p| p.matches(name)).unwrap_or(false)
    })
}

fn baseline_maps_root(baseline: &Path) -> Result<PathBuf> {
    let candidate = baseline.join("data").join("maps");
    if candidate.is_dir() {
        Ok(candidate)
    } else if baseline.is_dir() {
        Ok(baseline.to_path_buf())
    } else {
        Err(Error::invalid(format!(
            "baseline path not found: {}",
            baseline.display()
        )))
    }
}

/// Map folders under `maps_dir` picked by `selection`, sorted.
pub fn select_maps(maps_dir: &Path, selection: &MapSelection) -> Result<Vec<PathBuf>> {
    let current = map_dirs(maps_dir)?;
    match selection {
        MapSelection::Patterns(patterns) => Ok(current
            .into_iter()
            .filter(|d| matches_any(&dir_name(d), patterns))
            .collect()),
        MapSelection::Baseline(baseline) => {
            let known: HashSet<String> = map_dirs(baseline_maps_root(baseline)?)?
                .iter()
                .map(|d| dir_name(d))
                .collect();
            Ok(current
                .into_iter()
                .filter(|d| !known.contains(&dir_name(d)))
                .collect())
        }
    }
}

/// Empty every non-empty event list. Returns true if anything changed.
pub fn clear_events(map: &mut Value) -> bool {
    let Some(obj) = map.as_object_mut() else {
        return false;
    };
    let mut changed = false;
    for key in EVENT_LISTS {
        if let Some(list) = obj.get_mut(*key) {
            if list.as_array().map_or(true, |a| !a.is_empty()) {
                *list = Value::Array(Vec::new());
                changed = true;
            }
        }
    }
    changed
}

/// Minimal `scripts.inc` for a map with no events.
pub fn stub_scripts(map_name: &str) -> String {
    format!("{map_name}_MapScripts::\n\t.byte 0\n")
}
