use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static SCRIPT_COMMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""script_comment"\s*:\s*"[^"\\]+""#).expect("script_comment pattern")
});

static SCRIPT_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""script"\s*:"#).expect("script key pattern"));

/// Text of the enclosing object from its `{` up to `end`.
fn object_prefix(text: &str, end: usize) -> &str {
    let before = &text[..end];
    match before.rfind('{') {
        Some(i) => &before[i..],
        None => before,
    }
}

/// Put a `"script"` field back in front of every orphaned `"script_comment"`.
///
/// Works on the JSON text so the rest of the file keeps its formatting. A comment on
/// its own line gets the field on the line above; an inline one gets it inline.
pub fn restore_scripts(content: &str, default_script: &str) -> (String, bool) {
    let mut modified = false;
    let updated = SCRIPT_COMMENT.replace_all(content, |caps: &Captures| {
        let start = caps.get(0).map_or(0, |m| m.start());
        let field = &caps[0];
        if SCRIPT_KEY.is_match(object_prefix(content, start)) {
            return field.to_string();
        }
        modified = true;

        let line_start = content[..start].rfind('\n').map_or(0, |i| i + 1);
        let lead = &content[line_start..start];
        if lead.trim().is_empty() {
            format!("\"script\": \"{default_script}\",\n{lead}{field}")
        } else {
            format!("\"script\": \"{default_script}\", {field}")
        }
    });
    (updated.into_owned(), modified)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT: &str = "Common_EventScript_ShowBagIsFull";

    #[test]
    fn restores_orphaned_comment() {
        let src = "{\n  \"x\": 1,\n  \"script_comment\": \"Foo_EventScript\",\n  \"flag\": \"0\"\n}\n";
        let (out, changed) = restore_scripts(src, DEFAULT);
        assert!(changed);
        assert_eq!(
            out,
            "{\n  \"x\": 1,\n  \"script\": \"Common_EventScript_ShowBagIsFull\",\n  \"script_comment\": \"Foo_EventScript\",\n  \"flag\": \"0\"\n}\n"
        );

        let (again, changed_again) = restore_scripts(&out, DEFAULT);
        assert!(!changed_again);
        assert_eq!(again, out);
    }

    #[test]
    fn restores_comment_in_single_line_json() {
        let src = r#"{"bg_events": [{"type": "sign", "script_comment": "Gone"}, {"type": "sign", "script": "Kept", "script_comment": "Kept"}]}"#;
        let (out, changed) = restore_scripts(src, DEFAULT);
        assert!(changed);
        assert_eq!(
            out,
            r#"{"bg_events": [{"type": "sign", "script": "Common_EventScript_ShowBagIsFull", "script_comment": "Gone"}, {"type": "sign", "script": "Kept", "script_comment": "Kept"}]}"#
        );
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["bg_events"][0]["script"], DEFAULT);

        let (again, changed_again) = restore_scripts(&out, DEFAULT);
        assert!(!changed_again);
        assert_eq!(again, out);
    }
}
