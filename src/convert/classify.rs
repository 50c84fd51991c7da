use std::fmt;

use super::rewrite::rewrite_kind;
use crate::parser::{string_payload, strip_trailing_comment, LineKind, LogicalLine};

pub const MOVEMENT_TERMINATOR: &str = "step_end";
pub const TEXT_TERMINATOR: char = '$';

/// Tokens that rule out a movement block when they show up near its start.
const MOVEMENT_DISQUALIFIERS: &[&str] = &[".string", "msgbox", "trainerbattle", "if ", "while", "call "];

/// One movement step, e.g. `walk_up` or `walk_up * 3`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovementStep {
    pub command: String,
    pub repeat: Option<u32>,
}

impl fmt::Display for MovementStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.repeat {
            Some(n) => write!(f, "{} * {}", self.command, n),
            None => f.write_str(&self.command),
        }
    }
}

/// A line of a lifted movement: a step or a comment kept in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MovementLine {
    Step(MovementStep),
    Comment(String),
}

/// Movement lines up to the terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovementBlock {
    pub lines: Vec<MovementLine>,
    /// Payload lines taken, through the `step_end` line.
    pub consumed: usize,
}

impl MovementBlock {
    pub fn steps(&self) -> Vec<MovementStep> {
        self.lines
            .iter()
            .filter_map(|l| match l {
                MovementLine::Step(step) => Some(step.clone()),
                MovementLine::Comment(_) => None,
            })
            .collect()
    }
}

/// Consecutive `.string` payloads; the last one carries the terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBlock {
    pub parts: Vec<String>,
    /// Payload lines taken, through the terminated string.
    pub consumed: usize,
}

impl TextBlock {
    /// Parts with the terminator removed from the final one.
    pub fn pieces(&self) -> Vec<&str> {
        let last = self.parts.len().saturating_sub(1);
        self.parts
            .iter()
            .enumerate()
            .map(|(i, p)| {
                if i == last {
                    let t = p.trim_end();
                    t.strip_suffix(TEXT_TERMINATOR).unwrap_or(t)
                } else {
                    p.as_str()
                }
            })
            .collect()
    }

    pub fn joined(&self, separator: &str) -> String {
        self.pieces().join(separator)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockClass {
    Movement(MovementBlock),
    Text(TextBlock),
    Script,
    /// Nothing but blanks, comments or data directives, or a movement that
    /// cannot be lifted without losing lines.
    Unclassified,
}

fn non_empty(lines: &[LogicalLine]) -> impl Iterator<Item = &LogicalLine> {
    lines.iter().filter(|l| l.kind != LineKind::Blank)
}

/// `step_end` near the end and no script or text tokens near the start.
pub fn is_movement_block(lines: &[LogicalLine]) -> bool {
    let filled: Vec<&LogicalLine> = non_empty(lines).collect();
    if filled.is_empty() {
        return false;
    }

    let tail = &filled[filled.len().saturating_sub(3)..];
    if !tail.iter().any(|l| l.text.contains(MOVEMENT_TERMINATOR)) {
        return false;
    }

    let head = filled
        .iter()
        .take(5)
        .map(|l| l.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    !MOVEMENT_DISQUALIFIERS.iter().any(|bad| head.contains(bad))
}

fn parse_step(kind: &LineKind, text: &str) -> MovementStep {
    match kind {
        LineKind::Bare(command) => MovementStep {
            command: command.clone(),
            repeat: None,
        },
        LineKind::Call { command, args } => {
            let repeat = args
                .strip_prefix('*')
                .and_then(|n| n.trim().parse::<u32>().ok());
            match repeat {
                Some(n) => MovementStep {
                    command: command.clone(),
                    repeat: Some(n),
                },
                None => MovementStep {
                    command: text.to_string(),
                    repeat: None,
                },
            }
        }
        _ => MovementStep {
            command: text.to_string(),
            repeat: None,
        },
    }
}

/// Movement lines up to the terminator. `None` when there is no terminator or a
/// directive sits among the steps.
pub fn movement_block(lines: &[LogicalLine]) -> Option<MovementBlock> {
    let mut out = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        match &line.kind {
            LineKind::Blank => continue,
            LineKind::Directive { .. } | LineKind::Label { .. } => return None,
            kind if kind.is_preprocessor() => return None,
            LineKind::Comment { .. } => {
                out.extend(rewrite_kind(&line.kind).map(MovementLine::Comment));
            }
            kind => {
                let text = strip_trailing_comment(line.text.trim());
                if text.starts_with(MOVEMENT_TERMINATOR) {
                    return Some(MovementBlock {
                        lines: out,
                        consumed: i + 1,
                    });
                }
                out.push(MovementLine::Step(parse_step(kind, text)));
            }
        }
    }
    None
}

/// Capture the `.string` run; succeeds only when the last part ends with `$`.
///
/// Blank lines may precede the first string; anything else there rules the block out.
pub fn parse_text_block(lines: &[LogicalLine]) -> Option<TextBlock> {
    let mut parts = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        match string_payload(&line.kind) {
            Some(payload) => {
                parts.push(payload.to_string());
                if payload.trim_end().ends_with(TEXT_TERMINATOR) {
                    return Some(TextBlock {
                        parts,
                        consumed: i + 1,
                    });
                }
            }
            None if parts.is_empty() && line.kind == LineKind::Blank => {}
            None => break,
        }
    }
    None
}

/// Decide what a block's payload (the lines after its label) holds.
pub fn classify_block(payload: &[LogicalLine]) -> BlockClass {
    if is_movement_block(payload) {
        return match movement_block(payload) {
            Some(movement) => BlockClass::Movement(movement),
            None => BlockClass::Unclassified,
        };
    }
    if let Some(text) = parse_text_block(payload) {
        return BlockClass::Text(text);
    }
    if payload.iter().any(|l| l.kind.is_payload()) {
        BlockClass::Script
    } else {
        BlockClass::Unclassified
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::preprocess_lines;

    fn lines(src: &[&str]) -> Vec<LogicalLine> {
        preprocess_lines(src).logical
    }

    #[test]
    fn movement_keeps_repeat_counts() {
        let payload = lines(&["\twalk_up", "\twalk_left * 3 @ around", "", "\tstep_end"]);
        let BlockClass::Movement(movement) = classify_block(&payload) else {
            panic!("expected movement");
        };
        let rendered: Vec<String> = movement.steps().iter().map(ToString::to_string).collect();
        assert_eq!(rendered, ["walk_up", "walk_left * 3"]);
        assert_eq!(movement.consumed, 4);
    }

    #[test]
    fn movement_keeps_comments_and_stops_at_terminator() {
        let payload = lines(&["\twalk_up", "@ turn around", "\tface_down", "\tstep_end", "\twalk_up"]);
        let BlockClass::Movement(movement) = classify_block(&payload) else {
            panic!("expected movement");
        };
        assert_eq!(movement.lines[1], MovementLine::Comment("# turn around".into()));
        assert_eq!(movement.steps().len(), 2);
        assert_eq!(movement.consumed, 4);
    }

    #[test]
    fn movement_with_directive_is_left_alone() {
        let payload = lines(&[
            "\twalk_up",
            "\twalk_up",
            "\twalk_up",
            "\twalk_up",
            ".ifdef BUGFIX",
            "\twalk_down",
            ".endif",
            "\tstep_end",
        ]);
        assert!(is_movement_block(&payload));
        assert_eq!(classify_block(&payload), BlockClass::Unclassified);
    }

    #[test]
    fn movement_rejected_by_script_tokens() {
        let payload = lines(&["\tmsgbox Text_Hi, MSGBOX_DEFAULT", "\twalk_up", "\tstep_end"]);
        assert!(!is_movement_block(&payload));
        assert_eq!(classify_block(&payload), BlockClass::Script);
    }

    #[test]
    fn text_requires_terminator() {
        let ok = lines(&["\t.string \"Hello there,\\n\"", "\t.string \"friend!$\""]);
        let BlockClass::Text(text) = classify_block(&ok) else {
            panic!("expected text");
        };
        assert_eq!(text.joined(" "), "Hello there,\\n friend!");
        assert_eq!(text.consumed, 2);

        let open = lines(&["\t.string \"Hello\"", "\t.string \"there\""]);
        assert_eq!(parse_text_block(&open), None);
    }

    #[test]
    fn text_takes_only_lines_through_terminator() {
        let payload = lines(&["", "\t.string \"Hi$\"", "\t.string \"Bye$\""]);
        let BlockClass::Text(text) = classify_block(&payload) else {
            panic!("expected text");
        };
        assert_eq!(text.parts, ["Hi$"]);
        assert_eq!(text.consumed, 2);

        let aligned = lines(&["\t.align 2", "\t.string \"Hi$\""]);
        assert_eq!(parse_text_block(&aligned), None);
    }

    #[test]
    fn text_stops_at_first_gap() {
        let gapped = lines(&["\t.string \"Hello\"", "", "\t.string \"there$\""]);
        assert_eq!(parse_text_block(&gapped), None);
    }

    #[test]
    fn data_only_block_is_unclassified() {
        let payload = lines(&["\t.byte 0", "@ nothing here", ""]);
        assert_eq!(classify_block(&payload), BlockClass::Unclassified);
        assert_eq!(classify_block(&[]), BlockClass::Unclassified);
    }
}
