use std::path::Path;

use crate::error::Result;
use crate::files::{dir_name, map_dirs};

/// `\t.include` lines for every map folder that has a `scripts.inc`, sorted by folder.
pub fn maps_includes(maps_dir: &Path, include_prefix: &str) -> Result<String> {
    let prefix = include_prefix.trim_end_matches('/');
    let mut out = String::new();
    for dir in map_dirs(maps_dir)? {
        if dir.join("scripts.inc").is_file() {
            out.push_str(&format!("\t.include \"{prefix}/{}/scripts.inc\"\n", dir_name(&dir)));
        }
    }
    Ok(out)
}
