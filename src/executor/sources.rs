use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::maps::{MAP_JSON, SCRIPTS_INC};
use super::runner::{run_batch, run_single, upsert, upsert_json, BatchReport};
use crate::build::{
    comment_out_symbols, disable_script_fields, normalize_symbols, parse_undefined_symbols,
    run_make, split_make_args,
};
use crate::config::Project;
use crate::error::Result;
use crate::files::{find_named, find_with_extensions, read_json, read_text, read_text_or_empty};
use crate::maps::dedupe_by_id;
use crate::sources::{
    add_missing_themes, map_section_ids, maps_includes, remove_duplicate_mapscripts,
    strip_non_ascii, SCRIPT_EXTENSIONS, THEME_TABLES,
};

/// Where linker output comes from.
#[derive(Debug, Clone)]
pub enum BuildLog {
    /// A saved build log.
    File(PathBuf),
    /// Run `make`; `None` uses the configured arguments.
    Make(Option<String>),
}

/// Collect the linker output, running `make` when no log file is given.
pub fn build_output(project: &Project, log: &BuildLog) -> Result<String> {
    match log {
        BuildLog::File(path) => read_text(project.path(path)),
        BuildLog::Make(args) => {
            let args = match args {
                Some(args) => split_make_args(args)?,
                None => project.config.make_args.clone(),
            };
            let (code, output) = run_make(&project.root, &args)?;
            if code != 0 {
                warn!(code, "make exited with errors");
            }
            Ok(output)
        }
    }
}

/// Undefined `MUS_*` symbols in linker output.
pub fn missing_music(output: &str) -> BTreeSet<String> {
    parse_undefined_symbols(output)
        .into_iter()
        .filter(|s| s.starts_with("MUS_"))
        .collect()
}

/// Which files `undefined-refs` edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefTarget {
    /// Comment out `scripts.inc` lines.
    Scripts,
    /// Rename `"script"` fields in `map.json`.
    MapJson,
}

pub fn disable_undefined_refs(
    project: &Project,
    output: &str,
    target: RefTarget,
    dry_run: bool,
) -> BatchReport {
    let raw = parse_undefined_symbols(output);
    let symbols = match target {
        RefTarget::Scripts => normalize_symbols(&raw),
        RefTarget::MapJson => raw,
    };
    if symbols.is_empty() {
        info!("no undefined references detected");
        return BatchReport::new("undefined-refs");
    }
    for symbol in &symbols {
        info!(%symbol, "undefined symbol");
    }
    if dry_run {
        println!("undefined symbols:");
        for symbol in &symbols {
            println!("  {symbol}");
        }
    }

    let file_name = match target {
        RefTarget::Scripts => SCRIPTS_INC,
        RefTarget::MapJson => MAP_JSON,
    };
    let files = find_named(&project.root, file_name);
    run_batch("undefined-refs", files, |path| {
        let original = read_text(path)?;
        if !symbols.iter().any(|s| original.contains(s.as_str())) {
            return Ok(false);
        }
        let (updated, touched) = match target {
            RefTarget::Scripts => comment_out_symbols(&original, &symbols),
            RefTarget::MapJson => disable_script_fields(&original, &symbols),
        };
        if touched == 0 {
            return Ok(false);
        }
        upsert(path, &updated, dry_run)
    })
}

/// Which JSON table `dedupe` cleans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupeTarget {
    Layouts,
    MapSections,
}

pub fn dedupe_table(project: &Project, target: DedupeTarget, dry_run: bool) -> BatchReport {
    let (path, key) = match target {
        DedupeTarget::Layouts => (project.path(&project.config.layouts_json), "layouts"),
        DedupeTarget::MapSections => (project.path(&project.config.region_map_sections), "map_sections"),
    };
    run_single("dedupe", &path, |path| {
        let mut doc = read_json(path)?;
        let removed = dedupe_by_id(&mut doc, key)?;
        if removed == 0 {
            return Ok(false);
        }
        info!(removed, key, "removed duplicate entries");
        upsert_json(path, &doc, dry_run)
    })
}

pub fn dedupe_mapscripts(file: &Path, dry_run: bool) -> BatchReport {
    run_single("dedupe-mapscripts", file, |path| {
        let (updated, removed) = remove_duplicate_mapscripts(&read_text(path)?);
        if removed == 0 {
            return Ok(false);
        }
        info!(removed, "removed scripts shadowing mapscripts");
        upsert(path, &updated, dry_run)
    })
}

pub fn write_maps_includes(project: &Project, dry_run: bool) -> BatchReport {
    let target = project.path(&project.config.maps_includes);
    let prefix = project.config.maps_dir.to_string_lossy().replace('\\', "/");
    run_single("includes", &target, |target| {
        let contents = maps_includes(&project.maps_dir(), &prefix)?;
        upsert(target, &contents, dry_run)
    })
}

pub fn add_popup_themes(project: &Project, dry_run: bool) -> BatchReport {
    let source_path = project.path(&project.config.popup_source);
    run_single("popup-themes", &source_path, |path| {
        let sections = map_section_ids(&read_json(project.path(&project.config.region_map_sections))?)?;
        let mut source = read_text_or_empty(path)?;
        let mut added = 0;
        for (table, theme) in THEME_TABLES {
            let missing = add_missing_themes(&mut source, table, theme, &sections);
            if !missing.is_empty() {
                info!(table, added = missing.len(), "added popup themes");
            }
            added += missing.len();
        }
        if added == 0 {
            return Ok(false);
        }
        upsert(path, &source, dry_run)
    })
}

pub fn strip_unicode(project: &Project, dry_run: bool) -> BatchReport {
    let files = find_with_extensions(project.maps_dir(), SCRIPT_EXTENSIONS);
    run_batch("strip-unicode", files, |path| match strip_non_ascii(&read_text(path)?) {
        Some(cleaned) => upsert(path, &cleaned, dry_run),
        None => Ok(false),
    })
}
