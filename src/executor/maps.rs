use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::info;

use super::runner::{run_batch, upsert, upsert_json, BatchReport};
use super::PORY_FILE;
use crate::config::Project;
use crate::error::Result;
use crate::files::{dir_name, map_dirs, read_json, read_text};
use crate::maps::{
    clear_events, declared_local_ids, find_sign_scripts, fix_unavailable_music,
    normalize_pokecenter_layout, parse_music_defines, remove_undeclared_local_ids,
    replace_missing_music, restore_scripts, select_maps, sign_script_names, stub_scripts,
    upsert_sign_scripts, MapSelection,
};

pub const MAP_JSON: &str = "map.json";
pub const SCRIPTS_INC: &str = "scripts.inc";

/// Map folders holding every file in `required`.
fn maps_with(project: &Project, required: &[&str]) -> Result<Vec<PathBuf>> {
    Ok(map_dirs(project.maps_dir())?
        .into_iter()
        .filter(|d| required.iter().all(|f| d.join(f).is_file()))
        .collect())
}

/// Load, patch and upsert one `map.json`.
fn patch_map_json<F>(dir: &Path, dry_run: bool, patch: F) -> Result<bool>
where
    F: FnOnce(&mut Value) -> bool,
{
    let path = dir.join(MAP_JSON);
    let mut map = read_json(&path)?;
    if !patch(&mut map) {
        return Ok(false);
    }
    upsert_json(&path, &map, dry_run)
}

pub fn add_sign_scripts(project: &Project, source: &str, dry_run: bool) -> Result<BatchReport> {
    let dirs = maps_with(project, &[MAP_JSON, source, PORY_FILE])?;
    Ok(run_batch("signs", dirs, |dir| {
        let names = sign_script_names(&read_json(dir.join(MAP_JSON))?);
        if names.is_empty() {
            return Ok(false);
        }
        let signs = find_sign_scripts(&read_text(dir.join(source))?, &names);
        let pory_path = dir.join(PORY_FILE);
        let (updated, added) = upsert_sign_scripts(&read_text(&pory_path)?, &signs);
        if added == 0 {
            return Ok(false);
        }
        info!(map = %dir_name(dir), added, "adding sign scripts");
        upsert(&pory_path, &updated, dry_run)
    }))
}

pub fn fix_music(project: &Project, default: Option<&str>, dry_run: bool) -> Result<BatchReport> {
    let known = parse_music_defines(&read_text(project.path(&project.config.songs_header))?);
    let default = default.unwrap_or(&project.config.default_music);
    info!(known = known.len(), default, "checking map music");

    let dirs = maps_with(project, &[MAP_JSON])?;
    Ok(run_batch("fix-music", dirs, |dir| {
        patch_map_json(dir, dry_run, |map| match fix_unavailable_music(map, &known, default) {
            Some(change) => {
                info!(map = %dir_name(dir), from = %change.from, to = %change.to, "music replaced");
                true
            }
            None => false,
        })
    }))
}

/// Replace music ids listed in `missing` (usually from linker output).
pub fn replace_music(
    project: &Project,
    missing: &BTreeSet<String>,
    replacement: Option<&str>,
    dry_run: bool,
) -> Result<BatchReport> {
    let replacement = replacement.unwrap_or(&project.config.replacement_music);
    let dirs = maps_with(project, &[MAP_JSON])?;
    Ok(run_batch("replace-music", dirs, |dir| {
        patch_map_json(dir, dry_run, |map| {
            match replace_missing_music(map, missing, replacement) {
                Some(change) => {
                    info!(map = %dir_name(dir), from = %change.from, to = %change.to, "music replaced");
                    true
                }
                None => false,
            }
        })
    }))
}

pub fn normalize_pokecenters(project: &Project, dry_run: bool) -> Result<BatchReport> {
    let dirs = maps_with(project, &[MAP_JSON])?;
    Ok(run_batch("pokecenter-layouts", dirs, |dir| {
        patch_map_json(dir, dry_run, |map| match normalize_pokecenter_layout(map) {
            Some((old, new)) => {
                info!(map = %dir_name(dir), %old, new, "layout normalized");
                true
            }
            None => false,
        })
    }))
}

pub fn restore_map_scripts(project: &Project, dry_run: bool) -> Result<BatchReport> {
    let default = project.config.restore_script.as_str();
    let dirs = maps_with(project, &[MAP_JSON])?;
    Ok(run_batch("restore-scripts", dirs, |dir| {
        let path = dir.join(MAP_JSON);
        let (updated, modified) = restore_scripts(&read_text(&path)?, default);
        if !modified {
            return Ok(false);
        }
        upsert(&path, &updated, dry_run)
    }))
}

pub fn clean_local_ids(project: &Project, dry_run: bool) -> Result<BatchReport> {
    let dirs = maps_with(project, &[MAP_JSON, SCRIPTS_INC])?;
    Ok(run_batch("clean-localids", dirs, |dir| {
        let declared = declared_local_ids(&read_json(dir.join(MAP_JSON))?);
        let path = dir.join(SCRIPTS_INC);
        let (updated, removed) = remove_undeclared_local_ids(&read_text(&path)?, &declared);
        if removed == 0 {
            return Ok(false);
        }
        info!(map = %dir_name(dir), removed, "dropped lines with undeclared local ids");
        upsert(&path, &updated, dry_run)
    }))
}

fn clear_map(dir: &Path, dry_run: bool) -> Result<bool> {
    let json_path = dir.join(MAP_JSON);
    let mut name = dir_name(dir);
    let mut changed = false;

    if json_path.is_file() {
        let mut map = read_json(&json_path)?;
        if let Some(declared) = map.get("name").and_then(Value::as_str) {
            name = declared.to_string();
        }
        if clear_events(&mut map) {
            changed |= upsert_json(&json_path, &map, dry_run)?;
        }
    }

    let scripts_path = dir.join(SCRIPTS_INC);
    if scripts_path.is_file() {
        changed |= upsert(&scripts_path, &stub_scripts(&name), dry_run)?;
    }
    Ok(changed)
}

pub fn clear_maps(project: &Project, selection: &MapSelection, dry_run: bool) -> Result<BatchReport> {
    let dirs = select_maps(&project.maps_dir(), selection)?;
    info!(maps = dirs.len(), "clearing maps");
    Ok(run_batch("clear-maps", dirs, |dir| clear_map(dir, dry_run)))
}
