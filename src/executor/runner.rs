use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::error::{Error, Result};
use crate::files::{dir_name, to_json_text, write_if_changed, write_json, WriteOutcome};

/// One item that failed during a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemError {
    pub item: String,
    pub error: String,
}

/// What a command did to each item it visited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub command: String,
    pub processed: usize,
    pub changed: Vec<String>,
    pub failed: Vec<ItemError>,
}

impl BatchReport {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ..Self::default()
        }
    }

    /// Record the outcome of one item. Errors are logged and kept, never raised.
    pub fn record(&mut self, item: &str, outcome: Result<bool>) {
        self.processed += 1;
        match outcome {
            Ok(true) => self.changed.push(item.to_string()),
            Ok(false) => debug!(item, "unchanged"),
            Err(e) => {
                error!(item, error = %e, "item failed");
                self.failed.push(ItemError {
                    item: item.to_string(),
                    error: e.to_string(),
                });
            }
        }
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    pub fn log_summary(&self) {
        let line = format!(
            "{}: {} processed, {} changed, {} failed",
            self.command,
            self.processed,
            self.changed.len(),
            self.failed.len()
        );
        if self.has_failures() {
            warn!("{line}");
        } else {
            info!("{line}");
        }
    }

    /// Write the report as a JSON sidecar.
    pub fn write(&self, path: &Path) -> Result<()> {
        let value = serde_json::to_value(self).map_err(|e| Error::json(path, e))?;
        write_if_changed(path, &to_json_text(&value), false)?;
        Ok(())
    }
}

/// Run `step` over every item, collecting outcomes instead of stopping at the first error.
pub fn run_batch<F>(command: &str, items: Vec<PathBuf>, mut step: F) -> BatchReport
where
    F: FnMut(&Path) -> Result<bool>,
{
    let mut report = BatchReport::new(command);
    info!(command, items = items.len(), "starting batch");
    for item in &items {
        let name = item_name(item);
        report.record(&name, step(item));
    }
    report.log_summary();
    report
}

/// Single-file commands still report through a batch of one.
pub fn run_single<F>(command: &str, path: &Path, step: F) -> BatchReport
where
    F: FnOnce(&Path) -> Result<bool>,
{
    let mut report = BatchReport::new(command);
    report.record(&path.display().to_string(), step(path));
    report.log_summary();
    report
}

fn item_name(path: &Path) -> String {
    if path.is_dir() {
        dir_name(path)
    } else {
        path.display().to_string()
    }
}

fn announce(path: &Path, outcome: WriteOutcome) -> bool {
    match outcome {
        WriteOutcome::Unchanged => debug!(path = %path.display(), "already up to date"),
        WriteOutcome::Written => info!(path = %path.display(), "updated"),
        WriteOutcome::WouldWrite => println!("would update {}", path.display()),
    }
    outcome.changed()
}

/// Upsert a text file; dry runs print what would change.
pub fn upsert(path: &Path, contents: &str, dry_run: bool) -> Result<bool> {
    Ok(announce(path, write_if_changed(path, contents, dry_run)?))
}

pub fn upsert_json(path: &Path, value: &serde_json::Value, dry_run: bool) -> Result<bool> {
    Ok(announce(path, write_json(path, value, dry_run)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn batch_continues_past_failures() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("Good");
        let bad = dir.path().join("Bad");
        fs::create_dir_all(&good).unwrap();
        fs::create_dir_all(&bad).unwrap();

        let report = run_batch("test", vec![bad.clone(), good.clone()], |p| {
            if p == bad {
                Err(Error::invalid("broken map"))
            } else {
                Ok(true)
            }
        });

        assert_eq!(report.processed, 2);
        assert_eq!(report.changed, ["Good"]);
        assert_eq!(
            report.failed,
            [ItemError {
                item: "Bad".into(),
                error: "broken map".into()
            }]
        );
    }

    #[test]
    fn report_sidecar_is_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let mut report = BatchReport::new("fix-music");
        report.record("Route1", Ok(true));
        report.write(&path).unwrap();

        let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["command"], "fix-music");
        assert_eq!(value["changed"][0], "Route1");
    }

    #[test]
    fn upsert_skips_identical_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pory");
        assert!(upsert(&path, "end\n", false).unwrap());
        assert!(!upsert(&path, "end\n", false).unwrap());
        assert!(upsert(&path, "lock\n", true).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "end\n");
    }
}
