use std::collections::HashMap;

use super::classify::MovementStep;
use super::rewrite::{inline_movements, rewrite_kind};
use crate::parser::{LineKind, LogicalLine};

/// Convert the payload of an event script block into Poryscript body lines.
///
/// A `switch VAR` followed by `case value, Label` rows is regrouped into a
/// `switch (var(VAR)) { case value: goto(Label) }` statement.
///
/// Returns `None` when the block holds assembler or preprocessor directives,
/// which have no Poryscript form.
pub fn convert_script_lines(
    lines: &[LogicalLine],
    known_movements: &HashMap<String, Vec<MovementStep>>,
) -> Option<Vec<String>> {
    let mut out = Vec::new();
    let mut in_switch = false;

    for line in lines {
        match &line.kind {
            LineKind::Blank | LineKind::Label { .. } => continue,
            LineKind::Directive { .. } => return None,
            kind if kind.is_preprocessor() => return None,
            LineKind::Comment { .. } => {
                let indent = if in_switch { "    " } else { "" };
                out.extend(rewrite_kind(&line.kind).map(|c| format!("{indent}{c}")));
                continue;
            }
            LineKind::Call { command, args } if command == "switch" => {
                if in_switch {
                    out.push("}".to_string());
                }
                let var = args.trim().trim_start_matches('(').trim_end_matches(')').trim();
                out.push(format!("switch (var({var})) {{"));
                in_switch = true;
                continue;
            }
            LineKind::Call { command, args } if command == "case" && in_switch => {
                if let Some((value, label)) = args.split_once(',') {
                    out.push(format!("    case {}: goto({})", value.trim(), label.trim()));
                    continue;
                }
            }
            _ => {}
        }

        if in_switch {
            out.push("}".to_string());
            in_switch = false;
        }

        if let Some(converted) = rewrite_kind(&line.kind) {
            out.push(inline_movements(&converted, known_movements));
        }
    }

    if in_switch {
        out.push("}".to_string());
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::preprocess_lines;

    #[test]
    fn converts_plain_script() {
        let pre = preprocess_lines(&[
            "\tlock",
            "\tfaceplayer",
            "\tmsgbox Text_Hi, MSGBOX_DEFAULT @ say hi",
            "",
            "@ done talking",
            "\trelease",
            "\tend",
        ]);
        let body = convert_script_lines(&pre.logical, &HashMap::new()).unwrap();
        assert_eq!(
            body,
            [
                "lock",
                "faceplayer",
                "msgbox(Text_Hi, MSGBOX_DEFAULT)",
                "# done talking",
                "release",
                "end"
            ]
        );
    }

    #[test]
    fn directives_keep_block_unconverted() {
        let pre = preprocess_lines(&["\tlock", ".if MODERN", "\tfaceplayer", ".endif", "\tend"]);
        assert_eq!(convert_script_lines(&pre.logical, &HashMap::new()), None);

        let pre = preprocess_lines(&["\tlock", "#ifdef BUGFIX", "\tfaceplayer", "#endif", "\tend"]);
        assert_eq!(convert_script_lines(&pre.logical, &HashMap::new()), None);
    }

    #[test]
    fn groups_switch_cases() {
        let pre = preprocess_lines(&[
            "\tswitch VAR_RESULT",
            "\tcase 0, Town_EventScript_Zero",
            "@ the only other answer",
            "\tcase 1, Town_EventScript_One",
            "\tend",
        ]);
        let body = convert_script_lines(&pre.logical, &HashMap::new()).unwrap();
        assert_eq!(
            body,
            [
                "switch (var(VAR_RESULT)) {",
                "    case 0: goto(Town_EventScript_Zero)",
                "    # the only other answer",
                "    case 1: goto(Town_EventScript_One)",
                "}",
                "end",
            ]
        );
    }

    #[test]
    fn inlines_known_movement() {
        let mut known = HashMap::new();
        known.insert(
            "Town_Movement_Up".to_string(),
            vec![MovementStep {
                command: "walk_up".into(),
                repeat: None,
            }],
        );
        let pre = preprocess_lines(&["\tapplymovement LOCALID_BOY, Town_Movement_Up", "\twaitmovement 0"]);
        let body = convert_script_lines(&pre.logical, &known).unwrap();
        assert_eq!(
            body,
            ["applymovement(LOCALID_BOY, moves(walk_up))", "waitmovement(0)"]
        );
    }
}
