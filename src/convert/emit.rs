use std::collections::HashMap;

use super::classify::{MovementBlock, MovementLine, TextBlock};
use crate::parser::{MapScriptsHeader, Scope, TableEntry};

const INDENT: &str = "    ";

pub fn emit_mapscripts(header: &MapScriptsHeader, tables: &HashMap<String, Vec<TableEntry>>) -> String {
    let mut lines = vec![format!("mapscripts {} {{", header.label)];

    for (kind, target) in &header.callbacks {
        if kind.ends_with("_TABLE") {
            lines.push(format!("{INDENT}{kind} ["));
            for entry in tables.get(target).into_iter().flatten() {
                lines.push(format!(
                    "{INDENT}{INDENT}{}, {}: {}",
                    entry.var, entry.value, entry.script
                ));
            }
            lines.push(format!("{INDENT}]"));
        } else {
            lines.push(format!("{INDENT}{kind}: {target}"));
        }
    }

    lines.push("}".to_string());
    lines.join("\n")
}

pub fn emit_empty_mapscripts(label: &str) -> String {
    format!("mapscripts {label} {{}}")
}

pub fn emit_movement(name: &str, movement: &MovementBlock, scope: Scope) -> String {
    let mut lines = vec![format!("movement({}) {name} {{", scope.as_str())];
    lines.extend(movement.lines.iter().map(|line| match line {
        MovementLine::Step(step) => format!("{INDENT}{step}"),
        MovementLine::Comment(comment) => format!("{INDENT}{comment}"),
    }));
    lines.push("}".to_string());
    lines.join("\n")
}

pub fn emit_text(name: &str, text: &TextBlock, scope: Scope) -> String {
    let mut lines = vec![format!("text({}) {name} {{", scope.as_str())];
    lines.extend(text.pieces().iter().map(|p| format!("{INDENT}\"{p}\"")));
    lines.push("}".to_string());
    lines.join("\n")
}

/// Single auto-formatted text block used by the text-only extractor.
pub fn emit_format_text(name: &str, content: &str) -> String {
    format!("text {name} {{\n{INDENT}format(\"{content}\")\n}}")
}

pub fn emit_script(name: &str, body: &[String], scope: Scope) -> String {
    let mut lines = vec![format!("script({}) {name} {{", scope.as_str())];
    if body.is_empty() {
        lines.push(format!("{INDENT}end"));
    } else {
        lines.extend(body.iter().map(|l| format!("{INDENT}{l}")));
    }
    lines.push("}".to_string());
    lines.join("\n")
}

pub fn emit_raw(lines: &[String]) -> Option<String> {
    if lines.iter().all(|l| l.trim().is_empty()) {
        return None;
    }
    Some(format!("raw `\n{}\n`", lines.join("\n")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapscripts_with_table() {
        let header = MapScriptsHeader {
            label: "Town_MapScripts".into(),
            start: 0,
            end: 3,
            callbacks: vec![
                ("MAP_SCRIPT_ON_LOAD".into(), "Town_OnLoad".into()),
                ("MAP_SCRIPT_ON_FRAME_TABLE".into(), "Town_OnFrame".into()),
            ],
        };
        let mut tables = HashMap::new();
        tables.insert(
            "Town_OnFrame".to_string(),
            vec![TableEntry {
                var: "VAR_TEMP_1".into(),
                value: "0".into(),
                script: "Town_EventScript_Intro".into(),
            }],
        );

        assert_eq!(
            emit_mapscripts(&header, &tables),
            "mapscripts Town_MapScripts {\n    MAP_SCRIPT_ON_LOAD: Town_OnLoad\n    MAP_SCRIPT_ON_FRAME_TABLE [\n        VAR_TEMP_1, 0: Town_EventScript_Intro\n    ]\n}"
        );
    }

    #[test]
    fn movement_keeps_comment_lines() {
        let movement = MovementBlock {
            lines: vec![
                MovementLine::Step(crate::convert::MovementStep {
                    command: "walk_up".into(),
                    repeat: Some(2),
                }),
                MovementLine::Comment("# then wait".into()),
            ],
            consumed: 3,
        };
        assert_eq!(
            emit_movement("Town_Movement_Up", &movement, Scope::Local),
            "movement(local) Town_Movement_Up {\n    walk_up * 2\n    # then wait\n}"
        );
    }

    #[test]
    fn empty_script_gets_end() {
        assert_eq!(
            emit_script("Foo", &[], Scope::Local),
            "script(local) Foo {\n    end\n}"
        );
    }

    #[test]
    fn whitespace_raw_is_skipped() {
        assert_eq!(emit_raw(&[String::new(), "  ".into()]), None);
        assert_eq!(emit_raw(&[".set X, 1".into()]).as_deref(), Some("raw `\n.set X, 1\n`"));
    }
}
