use std::ops::Range;

use super::commands::split_args;
use super::types::{LineKind, PreprocessResult, Scope, TableEntry};

/// How far past the header label we look for its `.byte 0` terminator.
const HEADER_SCAN_LIMIT: usize = 2000;

/// The `<Map>_MapScripts::` callback list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapScriptsHeader {
    pub label: String,
    pub start: usize,
    /// Index of the `.byte 0` terminator.
    pub end: usize,
    /// `(MAP_SCRIPT_*, target label)` in source order.
    pub callbacks: Vec<(String, String)>,
}

impl MapScriptsHeader {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end + 1
    }

    /// Labels of the `*_TABLE` callbacks.
    pub fn table_labels(&self) -> impl Iterator<Item = &str> {
        self.callbacks
            .iter()
            .filter(|(kind, _)| kind.ends_with("_TABLE"))
            .map(|(_, label)| label.as_str())
    }
}

fn is_zero_directive(kind: &LineKind, directive: &str) -> bool {
    matches!(kind, LineKind::Directive { name, args } if name == directive && args == "0")
}

/// Locate the first global `*_MapScripts` label and its callback rows.
pub fn find_mapscripts_header(pre: &PreprocessResult) -> Option<MapScriptsHeader> {
    let (start, label) = pre.logical.iter().enumerate().find_map(|(i, line)| {
        match &line.kind {
            LineKind::Label {
                name,
                scope: Scope::Global,
            } if name.ends_with("_MapScripts") && name.len() > "_MapScripts".len() => {
                Some((i, name.clone()))
            }
            _ => None,
        }
    })?;

    let limit = (start + HEADER_SCAN_LIMIT).min(pre.len());
    let end = (start + 1..limit).find(|&j| is_zero_directive(&pre.logical[j].kind, "byte"))?;

    let callbacks = pre.logical[start + 1..end]
        .iter()
        .filter_map(|line| match &line.kind {
            LineKind::Call { command, args } if command == "map_script" => {
                match split_args(args).as_slice() {
                    [kind, target] if kind.starts_with("MAP_SCRIPT_") => {
                        Some((kind.clone(), target.clone()))
                    }
                    _ => None,
                }
            }
            _ => None,
        })
        .collect();

    Some(MapScriptsHeader {
        label,
        start,
        end,
        callbacks,
    })
}

/// Parse the `map_script_2` rows under `label` up to `.2byte 0`.
///
/// Returns the lines the table occupies along with its rows.
pub fn parse_table(pre: &PreprocessResult, label: &str) -> Option<(Range<usize>, Vec<TableEntry>)> {
    let start = pre
        .logical
        .iter()
        .position(|line| matches!(&line.kind, LineKind::Label { name, .. } if name == label))?;

    let mut entries = Vec::new();
    let mut end = pre.len();

    for i in start + 1..pre.len() {
        let kind = &pre.logical[i].kind;
        if matches!(kind, LineKind::Label { .. }) {
            end = i;
            break;
        }
        if is_zero_directive(kind, "2byte") {
            end = i + 1;
            break;
        }
        if let LineKind::Call { command, args } = kind {
            if command == "map_script_2" {
                if let [var, value, script] = split_args(args).as_slice() {
                    entries.push(TableEntry {
                        var: var.clone(),
                        value: value.clone(),
                        script: script.clone(),
                    });
                }
            }
        }
    }

    Some((start..end, entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::preprocess_lines;

    const HEADER: &[&str] = &[
        "Town_MapScripts::",
        "\tmap_script MAP_SCRIPT_ON_TRANSITION, Town_OnTransition",
        "\tmap_script MAP_SCRIPT_ON_FRAME_TABLE, Town_OnFrame",
        "\t.byte 0",
        "",
        "Town_OnFrame:",
        "\tmap_script_2 VAR_TOWN_STATE, 1, Town_EventScript_Intro",
        "\t.2byte 0",
        "",
        "Town_OnTransition:",
        "\tend",
    ];

    #[test]
    fn parses_header_callbacks() {
        let pre = preprocess_lines(HEADER);
        let header = find_mapscripts_header(&pre).expect("header");

        assert_eq!(header.label, "Town_MapScripts");
        assert_eq!(header.range(), 0..4);
        assert_eq!(header.callbacks.len(), 2);
        assert_eq!(header.table_labels().collect::<Vec<_>>(), ["Town_OnFrame"]);
    }

    #[test]
    fn parses_table_rows_until_terminator() {
        let pre = preprocess_lines(HEADER);
        let (range, rows) = parse_table(&pre, "Town_OnFrame").expect("table");

        assert_eq!(range, 5..8);
        assert_eq!(
            rows,
            vec![TableEntry {
                var: "VAR_TOWN_STATE".into(),
                value: "1".into(),
                script: "Town_EventScript_Intro".into(),
            }]
        );
    }

    #[test]
    fn header_without_terminator_is_ignored() {
        let pre = preprocess_lines(&["Town_MapScripts::", "\tmap_script MAP_SCRIPT_ON_LOAD, X"]);
        assert!(find_mapscripts_header(&pre).is_none());
    }
}
