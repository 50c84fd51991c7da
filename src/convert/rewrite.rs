use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::trace;

use super::classify::MovementStep;
use crate::parser::{classify_line, is_bare_command, LineKind};

/// Movements longer than this stay as label references.
pub const MAX_INLINE_STEPS: usize = 5;

static APPLY_MOVEMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bapplymovement\s*\(\s*([^,()]+?)\s*,\s*([A-Za-z0-9_]+)\s*\)")
        .expect("applymovement pattern")
});

/// Rewrite one classified line into Poryscript call syntax.
///
/// Returns `None` for label lines, which become block boundaries instead.
pub fn rewrite_kind(kind: &LineKind) -> Option<String> {
    let out = match kind {
        LineKind::Label { .. } => return None,
        LineKind::Blank => String::new(),
        LineKind::Comment { marker: "@", text } => {
            if text.is_empty() {
                "#".to_string()
            } else {
                format!("# {text}")
            }
        }
        LineKind::Comment { marker, text } => {
            if text.is_empty() {
                marker.to_string()
            } else {
                format!("{marker} {text}")
            }
        }
        LineKind::Directive { name, args } => {
            if args.is_empty() {
                format!(".{name}")
            } else {
                format!(".{name} {args}")
            }
        }
        LineKind::Bare(word) => {
            if !is_bare_command(word) {
                trace!(word = %word, "unknown bare command kept as is");
            }
            word.clone()
        }
        LineKind::Other(text) => text.clone(),
        LineKind::Call { command, args } if command == "case" => match args.split_once(',') {
            Some((value, label)) => format!("case {}: {}", value.trim(), label.trim()),
            None => format!("case {args}"),
        },
        LineKind::Call { command, args } => {
            if args.starts_with('(') && args.ends_with(')') {
                format!("{command}{args}")
            } else {
                format!("{command}({args})")
            }
        }
    };
    Some(out)
}

/// Rewrite a single source line. Applying this to its own output is a no-op.
pub fn rewrite_line(line: &str) -> Option<String> {
    rewrite_kind(&classify_line(line))
}

/// Replace `applymovement(obj, Label)` with an inline `moves(...)` list when the
/// movement is short and has no repeat counts.
pub fn inline_movements(line: &str, known: &HashMap<String, Vec<MovementStep>>) -> String {
    APPLY_MOVEMENT
        .replace_all(line, |caps: &Captures| {
            let object = caps[1].trim();
            let label = &caps[2];
            match known.get(label) {
                Some(steps)
                    if !steps.is_empty()
                        && steps.len() <= MAX_INLINE_STEPS
                        && steps.iter().all(|s| s.repeat.is_none() && !s.command.contains('*')) =>
                {
                    let moves: Vec<&str> = steps.iter().map(|s| s.command.as_str()).collect();
                    format!("applymovement({object}, moves({}))", moves.join(" "))
                }
                _ => format!("applymovement({object}, {label})"),
            }
        })
        .into_owned()
}

/// Whether a converted line starts with a command word (`word` or `word(`).
pub fn looks_like_command(line: &str) -> bool {
    let s = line.trim();
    let ident = s
        .char_indices()
        .take_while(|&(i, c)| if i == 0 { c.is_ascii_alphabetic() || c == '_' } else { c.is_ascii_alphanumeric() || c == '_' })
        .count();
    if ident == 0 {
        return false;
    }
    let rest = s[ident..].trim_start();
    rest.is_empty() || rest.starts_with('(')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(command: &str, repeat: Option<u32>) -> MovementStep {
        MovementStep {
            command: command.into(),
            repeat,
        }
    }

    #[test]
    fn wraps_arguments_in_parentheses() {
        assert_eq!(
            rewrite_line("\tmsgbox Text_Hi, MSGBOX_DEFAULT").as_deref(),
            Some("msgbox(Text_Hi, MSGBOX_DEFAULT)")
        );
        assert_eq!(rewrite_line("\tlock").as_deref(), Some("lock"));
        assert_eq!(rewrite_line("\tmystery").as_deref(), Some("mystery"));
        assert_eq!(rewrite_line("\tdelay (16)").as_deref(), Some("delay(16)"));
        assert_eq!(rewrite_line("Label::"), None);
        assert_eq!(rewrite_line("\t.byte 0 @ end").as_deref(), Some(".byte 0"));
    }

    #[test]
    fn case_becomes_switch_shorthand() {
        assert_eq!(
            rewrite_line("\tcase 1, Town_EventScript_One").as_deref(),
            Some("case 1: Town_EventScript_One")
        );
    }

    #[test]
    fn rewriting_is_idempotent() {
        for src in [
            "\tmsgbox Text_Hi, MSGBOX_DEFAULT",
            "\tcase 1, Town_EventScript_One",
            "\tsetflag FLAG_BADGE01_GET",
            "\tapplymovement (OBJ_EVENT_ID_PLAYER, Move)",
            "@ a comment",
            "\treleaseall",
            "\t.2byte 0",
        ] {
            let once = rewrite_line(src).unwrap();
            let twice = rewrite_line(&once).unwrap();
            assert_eq!(once, twice, "not idempotent for {src:?}");
        }
    }

    #[test]
    fn inlines_only_short_plain_movements() {
        let mut known = HashMap::new();
        known.insert("Short".to_string(), vec![step("walk_up", None), step("face_down", None)]);
        known.insert("Repeated".to_string(), vec![step("walk_up", Some(2))]);
        known.insert("Long".to_string(), (0..6).map(|_| step("walk_up", None)).collect());

        assert_eq!(
            inline_movements("applymovement(LOCALID_BOY, Short)", &known),
            "applymovement(LOCALID_BOY, moves(walk_up face_down))"
        );
        assert_eq!(
            inline_movements("applymovement(LOCALID_BOY, Repeated)", &known),
            "applymovement(LOCALID_BOY, Repeated)"
        );
        assert_eq!(
            inline_movements("applymovement(LOCALID_BOY, Long)", &known),
            "applymovement(LOCALID_BOY, Long)"
        );
        assert_eq!(
            inline_movements("applymovement(LOCALID_BOY, Unknown)", &known),
            "applymovement(LOCALID_BOY, Unknown)"
        );
    }

    #[test]
    fn recognizes_command_lines() {
        assert!(looks_like_command("end"));
        assert!(looks_like_command("msgbox(Text, MSGBOX_DEFAULT)"));
        assert!(looks_like_command("switch (var(VAR_RESULT)) {"));
        assert!(!looks_like_command("# comment"));
        assert!(!looks_like_command("case 1: Foo"));
    }
}
