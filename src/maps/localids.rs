use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static LOCALID: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bLOCALID_\w+\b").expect("localid pattern"));

/// `LOCALID_*` names declared by a map's object events.
pub fn declared_local_ids(map: &Value) -> HashSet<String> {
    map.get("object_events")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|obj| obj.get("local_id").and_then(Value::as_str))
        .filter(|id| id.starts_with("LOCALID_"))
        .map(str::to_string)
        .collect()
}

/// Drop script lines that mention a local id the map does not declare.
/// Returns the new text and the number of removed lines.
pub fn remove_undeclared_local_ids(script: &str, declared: &HashSet<String>) -> (String, usize) {
    let mut removed = 0;
    let kept: String = script
        .split_inclusive('\n')
        .filter(|line| {
            let ok = LOCALID
                .find_iter(line)
                .all(|m| declared.contains(m.as_str()));
            if !ok {
                removed += 1;
            }
            ok
        })
        .collect();
    (kept, removed)
}
