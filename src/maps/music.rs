use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static MUSIC_DEFINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*#define\s+(MUS_\w+)").expect("music define pattern"));

/// `MUS_*` names defined in a songs header.
pub fn parse_music_defines(header: &str) -> BTreeSet<String> {
    MUSIC_DEFINE
        .captures_iter(header)
        .map(|c| c[1].to_string())
        .collect()
}

/// A music id swap applied to one map record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MusicChange {
    pub from: String,
    pub to: String,
}

fn music_of(map: &Value) -> Option<&str> {
    map.get("music").and_then(Value::as_str).filter(|m| !m.is_empty())
}

/// Replace a music id missing from `known` with `default`, noting the old id in `comment`.
pub fn fix_unavailable_music(map: &mut Value, known: &BTreeSet<String>, default: &str) -> Option<MusicChange> {
    let current = music_of(map)?;
    if known.contains(current) || current == default {
        return None;
    }
    let change = MusicChange {
        from: current.to_string(),
        to: default.to_string(),
    };

    let obj = map.as_object_mut()?;
    obj.insert("music".to_string(), Value::String(change.to.clone()));
    obj.insert(
        "comment".to_string(),
        Value::String(format!(
            "Changed music from {} to {} because unavailable",
            change.from, change.to
        )),
    );
    Some(change)
}

/// Replace a music id that the linker reported as undefined.
pub fn replace_missing_music(map: &mut Value, missing: &BTreeSet<String>, replacement: &str) -> Option<MusicChange> {
    let current = music_of(map)?;
    if !missing.contains(current) || current == replacement {
        return None;
    }
    let change = MusicChange {
        from: current.to_string(),
        to: replacement.to_string(),
    };
    map.as_object_mut()?
        .insert("music".to_string(), Value::String(change.to.clone()));
    Some(change)
}
