use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::error::{Error, Result};

/// Popup theme tables in `map_name_popup.c` and the theme given to missing sections.
pub const THEME_TABLES: &[(&str, &str)] = &[
    ("sMapSectionToThemeId", "MAPPOPUP_THEME_WOOD"),
    ("sRegionMapSectionId_To_PopUpThemeIdMapping_BW", "MAPPOPUP_THEME_BW_DEFAULT"),
];

static MAPSEC_INDEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[(MAPSEC_\w+)\]").expect("mapsec index pattern"));

/// `MAPSEC_*` ids listed in `region_map_sections.json`.
pub fn map_section_ids(doc: &Value) -> Result<BTreeSet<String>> {
    let sections = doc
        .get("map_sections")
        .and_then(Value::as_array)
        .ok_or_else(|| Error::invalid("region map JSON has no \"map_sections\" array"))?;
    Ok(sections
        .iter()
        .filter_map(|s| s.get("id").and_then(Value::as_str))
        .filter(|id| id.starts_with("MAPSEC_"))
        .map(str::to_string)
        .collect())
}

fn table_pattern(table: &str) -> Regex {
    let pattern = format!(r"(?s)static const u8 {}\[[^\]]*\] =\s*\{{(.*?)\}};", regex::escape(table));
    Regex::new(&pattern).expect("escaped table pattern is valid")
}

/// Append `[MAPSEC_X] = theme,` for every section missing from `table`.
///
/// Returns the sections added; an absent table adds nothing.
pub fn add_missing_themes(
    source: &mut String,
    table: &str,
    theme: &str,
    sections: &BTreeSet<String>,
) -> Vec<String> {
    let Some(caps) = table_pattern(table).captures(source) else {
        return Vec::new();
    };
    let Some(body) = caps.get(1) else {
        return Vec::new();
    };

    let insert_at = body.end();
    let present: BTreeSet<&str> = MAPSEC_INDEX
        .captures_iter(body.as_str())
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect();
    let missing: Vec<String> = sections
        .iter()
        .filter(|s| !present.contains(s.as_str()))
        .cloned()
        .collect();
    if missing.is_empty() {
        return missing;
    }

    let additions: String = missing
        .iter()
        .map(|s| format!("    [{s}] = {theme},\n"))
        .collect();
    source.insert_str(insert_at, &additions);
    missing
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SOURCE: &str = "\
static const u8 sMapSectionToThemeId[MAPSEC_COUNT] =
{
    [MAPSEC_ROUTE_101] = MAPPOPUP_THEME_WOOD,
};

static const u8 sRegionMapSectionId_To_PopUpThemeIdMapping_BW[] =
{
    [MAPSEC_ROUTE_101] = MAPPOPUP_THEME_BW_DEFAULT,
    [MAPSEC_ROUTE_102] = MAPPOPUP_THEME_BW_DEFAULT,
};
";

    #[test]
    fn appends_missing_sections_before_close() {
        let doc = json!({"map_sections": [{"id": "MAPSEC_ROUTE_101"}, {"id": "MAPSEC_ROUTE_102"}]});
        let sections = map_section_ids(&doc).unwrap();
        let mut source = SOURCE.to_string();

        let added = add_missing_themes(&mut source, "sMapSectionToThemeId", "MAPPOPUP_THEME_WOOD", &sections);
        assert_eq!(added, ["MAPSEC_ROUTE_102"]);
        assert!(source.contains(
            "    [MAPSEC_ROUTE_101] = MAPPOPUP_THEME_WOOD,\n    [MAPSEC_ROUTE_102] = MAPPOPUP_THEME_WOOD,\n};"
        ));

        let bw = add_missing_themes(
            &mut source,
            "sRegionMapSectionId_To_PopUpThemeIdMapping_BW",
            "MAPPOPUP_THEME_BW_DEFAULT",
            &sections,
        );
        assert!(bw.is_empty());

        let again = add_missing_themes(&mut source, "sMapSectionToThemeId", "MAPPOPUP_THEME_WOOD", &sections);
        assert!(again.is_empty());
    }

    #[test]
    fn missing_sections_array_is_an_error() {
        assert!(map_section_ids(&json!({})).is_err());
    }
}
