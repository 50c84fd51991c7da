use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::parser::{build_label_map, collect_blocks, preprocess_lines, split_args, split_source, LineKind};

/// Commands whose targets are listed next to a sign's generated script.
const REFERENCE_COMMANDS: &[&str] = &[
    "call",
    "goto",
    "goto_if_set",
    "goto_if_unset",
    "call_if_set",
    "call_if_unset",
];

static SCRIPT_DEFINITION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*script(?:\s*\(\s*\w+\s*\))?\s+(\w+)\s*\{").expect("script definition pattern")
});

/// What a sign's event script shows, recovered from the `.inc` source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignScript {
    pub name: String,
    pub text_label: String,
    /// `command target` pairs other than the message box.
    pub other_refs: Vec<String>,
}

/// Script names of `bg_events` entries of type `sign`.
pub fn sign_script_names(map: &Value) -> Vec<String> {
    map.get("bg_events")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter(|ev| ev.get("type").and_then(Value::as_str) == Some("sign"))
        .filter_map(|ev| ev.get("script").and_then(Value::as_str))
        .filter(|s| !s.is_empty() && *s != "0x0")
        .map(str::to_string)
        .collect()
}

/// Look up each named script in `source` and pull out its first `msgbox` label.
/// Scripts that are missing or show no message are skipped.
pub fn find_sign_scripts(source: &str, names: &[String]) -> Vec<SignScript> {
    let physical = split_source(source);
    let pre = preprocess_lines(&physical);
    let blocks = collect_blocks(&pre);
    let labels = build_label_map(&blocks);

    names
        .iter()
        .filter_map(|name| {
            let block = &blocks[*labels.get(name)?];
            let mut text_label = None;
            let mut other_refs = Vec::new();

            for line in &pre.logical[block.payload_range()] {
                let LineKind::Call { command, args } = &line.kind else {
                    continue;
                };
                let first = split_args(args).into_iter().next().unwrap_or_default();
                if command == "msgbox" && text_label.is_none() {
                    text_label = Some(first);
                } else if REFERENCE_COMMANDS.contains(&command.as_str()) {
                    other_refs.push(format!("{command} {first}"));
                }
            }

            Some(SignScript {
                name: name.clone(),
                text_label: text_label.filter(|t| !t.is_empty())?,
                other_refs,
            })
        })
        .collect()
}

pub fn render_sign_script(sign: &SignScript) -> String {
    let mut out = format!("script {} {{\n", sign.name);
    if !sign.other_refs.is_empty() {
        out.push_str(&format!("    // Also calls: {}\n", sign.other_refs.join(", ")));
    }
    out.push_str("    lockall\n");
    out.push_str(&format!("    msgbox({})\n", sign.text_label));
    out.push_str("    releaseall\n}");
    out
}

/// Names of every `script` block already defined in a `.pory` document.
pub fn defined_scripts(pory: &str) -> HashSet<String> {
    SCRIPT_DEFINITION
        .captures_iter(pory)
        .map(|c| c[1].to_string())
        .collect()
}

/// Add the sign scripts not yet defined in `pory`. Returns the new document and
/// how many scripts were added; with nothing to add the input comes back as is.
pub fn upsert_sign_scripts(pory: &str, signs: &[SignScript]) -> (String, usize) {
    let mut defined = defined_scripts(pory);
    let additions: Vec<String> = signs
        .iter()
        .filter(|s| defined.insert(s.name.clone()))
        .map(render_sign_script)
        .collect();

    if additions.is_empty() {
        return (pory.to_string(), 0);
    }

    let mut out = pory.trim_end().to_string();
    if !out.is_empty() {
        out.push_str("\n\n");
    }
    out.push_str(&additions.join("\n\n"));
    out.push('\n');
    (out, additions.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SOURCE: &str = "\
Town_EventScript_Sign::
\tmsgbox Town_Text_Sign, MSGBOX_SIGN
\tend

Town_EventScript_Board::
\tlockall
\tgoto_if_set FLAG_X, Town_EventScript_Other
\tmsgbox Town_Text_Board, MSGBOX_DEFAULT
\treleaseall
\tend

Town_EventScript_Mute::
\tend
";

    #[test]
    fn reads_sign_events() {
        let map = json!({"bg_events": [
            {"type": "sign", "script": "Town_EventScript_Sign"},
            {"type": "hidden_item", "script": "X"},
            {"type": "sign", "script": "0x0"}
        ]});
        assert_eq!(sign_script_names(&map), ["Town_EventScript_Sign"]);
    }

    #[test]
    fn finds_message_and_references() {
        let names: Vec<String> = ["Town_EventScript_Sign", "Town_EventScript_Board", "Town_EventScript_Mute", "Missing"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let signs = find_sign_scripts(SOURCE, &names);

        assert_eq!(signs.len(), 2);
        assert_eq!(signs[0].text_label, "Town_Text_Sign");
        assert_eq!(signs[1].other_refs, ["goto_if_set FLAG_X"]);
        assert_eq!(
            render_sign_script(&signs[1]),
            "script Town_EventScript_Board {\n    // Also calls: goto_if_set FLAG_X\n    lockall\n    msgbox(Town_Text_Board)\n    releaseall\n}"
        );
    }

    #[test]
    fn upsert_does_not_duplicate() {
        let names = vec!["Town_EventScript_Sign".to_string()];
        let signs = find_sign_scripts(SOURCE, &names);
        let existing = "mapscripts Town_MapScripts {}\n";

        let (once, added) = upsert_sign_scripts(existing, &signs);
        assert_eq!(added, 1);
        let (twice, added_again) = upsert_sign_scripts(&once, &signs);
        assert_eq!(added_again, 0);
        assert_eq!(once, twice);
    }

    #[test]
    fn recognizes_scoped_definitions() {
        let defined = defined_scripts("script(local) A {\n}\n  script B{\n}\ntext C {\n}\n");
        assert!(defined.contains("A") && defined.contains("B") && !defined.contains("C"));
    }
}
