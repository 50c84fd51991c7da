use std::path::Path;

use tracing::{debug, info};

use super::runner::{run_batch, run_single, upsert, BatchReport};
use crate::config::Project;
use crate::convert::{convert_inc, extract_texts};
use crate::error::Result;
use crate::files::{dir_name, map_dirs, read_text};

pub const PORY_FILE: &str = "scripts.pory";

/// Which converter a run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvertMode {
    /// Full `scripts.pory` with mapscripts, movements, texts, scripts and `raw`.
    Full,
    /// Text blocks only, as `format(...)`.
    TextsOnly,
}

impl ConvertMode {
    fn command(self) -> &'static str {
        match self {
            ConvertMode::Full => "convert",
            ConvertMode::TextsOnly => "texts",
        }
    }
}

fn map_name_of(inc: &Path) -> String {
    inc.parent().map(dir_name).unwrap_or_default()
}

/// Convert one source file into `pory`. Returns whether `pory` changed.
pub fn convert_file(inc: &Path, pory: &Path, mode: ConvertMode, dry_run: bool) -> Result<bool> {
    let contents = read_text(inc)?;
    let output = match mode {
        ConvertMode::Full => {
            let conversion = convert_inc(&contents, &map_name_of(inc));
            debug!(file = %inc.display(), stats = ?conversion.stats, "converted");
            conversion.output
        }
        ConvertMode::TextsOnly => {
            let (output, count) = extract_texts(&contents);
            if count == 0 {
                debug!(file = %inc.display(), "no text blocks");
                return Ok(false);
            }
            output
        }
    };
    upsert(pory, &output, dry_run)
}

/// Convert `<map>/<source>` into `<map>/scripts.pory` for every map that has the source.
pub fn convert_maps(project: &Project, source: &str, mode: ConvertMode, dry_run: bool) -> Result<BatchReport> {
    let dirs: Vec<_> = map_dirs(project.maps_dir())?
        .into_iter()
        .filter(|d| d.join(source).is_file())
        .collect();
    info!(maps = dirs.len(), source, "converting maps");
    Ok(run_batch(mode.command(), dirs, |dir| {
        convert_file(&dir.join(source), &dir.join(PORY_FILE), mode, dry_run)
    }))
}

pub fn convert_single(inc: &Path, pory: &Path, mode: ConvertMode, dry_run: bool) -> BatchReport {
    run_single(mode.command(), inc, |inc| convert_file(inc, pory, mode, dry_run))
}
