use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

static MAPSCRIPTS_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*mapscripts\s+(\w+)\s*\{").expect("mapscripts pattern"));
static SCRIPT_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*script(?:\s*\(\s*\w+\s*\))?\s+(\w+)\s*\{").expect("script pattern"));

/// Remove `script X { … }` blocks that share their name with a `mapscripts X` block.
///
/// A block ends at the first line that is a lone `}`. Returns the new text and the
/// number of removed blocks.
pub fn remove_duplicate_mapscripts(pory: &str) -> (String, usize) {
    let names: HashSet<&str> = pory
        .lines()
        .filter_map(|l| MAPSCRIPTS_OPEN.captures(l))
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect();

    let mut out = String::with_capacity(pory.len());
    let mut removed = 0;
    let mut skipping = false;
    for line in pory.split_inclusive('\n') {
        if skipping {
            if line.trim() == "}" {
                skipping = false;
            }
            continue;
        }
        let duplicate = SCRIPT_OPEN
            .captures(line)
            .and_then(|c| c.get(1))
            .is_some_and(|m| names.contains(m.as_str()));
        if duplicate {
            removed += 1;
            skipping = !line.trim_end().ends_with('}');
            continue;
        }
        out.push_str(line);
    }
    (out, removed)
}
