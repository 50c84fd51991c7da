use std::collections::HashSet;

use serde_json::Value;

use crate::error::{Error, Result};

/// Drop later entries of `doc[array_key]` whose `id` was already seen.
/// Entries without a string `id` are always kept. Returns how many were removed.
pub fn dedupe_by_id(doc: &mut Value, array_key: &str) -> Result<usize> {
    let items = doc
        .get_mut(array_key)
        .and_then(Value::as_array_mut)
        .ok_or_else(|| Error::invalid(format!("expected a `{array_key}` array")))?;

    let before = items.len();
    let mut seen = HashSet::new();
    items.retain(|item| match item.get("id").and_then(Value::as_str) {
        Some(id) => seen.insert(id.to_string()),
        None => true,
    });
    Ok(before - items.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keeps_first_occurrence_and_idless_entries() {
        let mut doc = json!({
            "layouts_table_label": "gMapLayouts",
            "layouts": [
                {"id": "LAYOUT_A", "width": 1},
                {},
                {"id": "LAYOUT_B"},
                {"id": "LAYOUT_A", "width": 2},
                {}
            ]
        });

        assert_eq!(dedupe_by_id(&mut doc, "layouts").unwrap(), 1);
        assert_eq!(doc["layouts"].as_array().unwrap().len(), 4);
        assert_eq!(doc["layouts"][0]["width"], 1);
        assert_eq!(dedupe_by_id(&mut doc, "layouts").unwrap(), 0);
    }

    #[test]
    fn missing_array_is_an_error() {
        let mut doc = json!({"map_sections": {}});
        assert!(dedupe_by_id(&mut doc, "map_sections").is_err());
    }
}
