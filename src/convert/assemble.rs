use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use super::classify::{classify_block, BlockClass, MovementStep};
use super::emit::{
    emit_empty_mapscripts, emit_format_text, emit_mapscripts, emit_movement, emit_raw,
    emit_script, emit_text,
};
use super::ranges::RangeSet;
use super::rewrite::looks_like_command;
use super::script::convert_script_lines;
use crate::parser::{
    build_label_map, collect_blocks, find_mapscripts_header, parse_table, preprocess_lines,
    split_source, LineKind, LogicalLine, PreprocessResult, TableEntry,
};

static TEXT_WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\\[nNrR]|\s)+").expect("text whitespace pattern"));

/// Counts of what a conversion lifted.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionStats {
    pub tables: usize,
    pub movements: usize,
    pub texts: usize,
    pub scripts: usize,
    pub raw_lines: usize,
}

#[derive(Debug, Clone)]
pub struct Conversion {
    pub output: String,
    pub stats: ConversionStats,
}

/// A raw-remainder line, or `None` when it would break the surrounding `raw` block.
fn raw_line(line: &LogicalLine) -> Option<String> {
    let trimmed = line.text.trim();
    if trimmed == "}" || trimmed.starts_with('(') || trimmed.contains('`') {
        return None;
    }
    match &line.kind {
        LineKind::Comment { marker: "@", text } => Some(format!("// {text}").trim_end().to_string()),
        _ => Some(line.text.clone()),
    }
}

fn raw_remainder(pre: &PreprocessResult, consumed: &RangeSet) -> Vec<String> {
    consumed
        .complement(pre.len())
        .into_iter()
        .flat_map(|r| pre.logical[r].iter())
        .filter_map(raw_line)
        .collect()
}

/// Convert a `scripts.inc` source into a `scripts.pory` document.
///
/// `map_name` names the empty `mapscripts` block emitted when the source has no header.
pub fn convert_inc(contents: &str, map_name: &str) -> Conversion {
    let physical = split_source(contents);
    let pre = preprocess_lines(&physical);
    let blocks = collect_blocks(&pre);
    let label_map = build_label_map(&blocks);

    let mut stats = ConversionStats::default();
    let mut sections = Vec::new();
    let mut consumed = RangeSet::new();

    let header = find_mapscripts_header(&pre);
    let mut tables: HashMap<String, Vec<TableEntry>> = HashMap::new();
    match &header {
        Some(header) => {
            for label in header.table_labels() {
                if let Some((range, rows)) = parse_table(&pre, label) {
                    consumed.insert(range);
                    tables.insert(label.to_string(), rows);
                    stats.tables += 1;
                }
            }
            sections.push(emit_mapscripts(header, &tables));
            consumed.insert(header.range());
        }
        None => sections.push(emit_empty_mapscripts(&format!("{map_name}_MapScripts"))),
    }

    // Movements and texts first, so scripts can inline the movements they apply.
    let mut known_movements: HashMap<String, Vec<MovementStep>> = HashMap::new();
    let mut lifted: HashSet<String> = HashSet::new();
    let mut deferred = Vec::new();

    for (index, block) in blocks.iter().enumerate() {
        if consumed.covers(&block.range()) {
            continue;
        }
        if label_map.get(&block.name) != Some(&index) {
            debug!(label = %block.name, line = block.start + 1, "duplicate label, leaving in raw");
            continue;
        }
        match classify_block(&pre.logical[block.payload_range()]) {
            BlockClass::Movement(movement) => {
                sections.push(emit_movement(&block.name, &movement, block.scope));
                consumed.insert(block.start..block.start + 1 + movement.consumed);
                known_movements.insert(block.name.clone(), movement.steps());
                lifted.insert(block.name.clone());
                stats.movements += 1;
            }
            BlockClass::Text(text) => {
                sections.push(emit_text(&block.name, &text, block.scope));
                consumed.insert(block.start..block.start + 1 + text.consumed);
                lifted.insert(block.name.clone());
                stats.texts += 1;
            }
            BlockClass::Script => deferred.push(block),
            BlockClass::Unclassified => {
                debug!(label = %block.name, "no payload, leaving in raw");
            }
        }
    }

    for block in deferred {
        let is_header = header.as_ref().is_some_and(|h| h.label == block.name);
        if is_header || tables.contains_key(&block.name) || lifted.contains(&block.name) {
            continue;
        }
        let Some(body) = convert_script_lines(&pre.logical[block.payload_range()], &known_movements)
        else {
            debug!(label = %block.name, "directives in script, leaving in raw");
            continue;
        };
        if body.iter().any(|l| looks_like_command(l)) {
            sections.push(emit_script(&block.name, &body, block.scope));
            consumed.insert(block.range());
            stats.scripts += 1;
        } else {
            debug!(label = %block.name, "no recognizable commands, leaving in raw");
        }
    }

    let raw = raw_remainder(&pre, &consumed);
    if let Some(section) = emit_raw(&raw) {
        stats.raw_lines = raw.iter().filter(|l| !l.trim().is_empty()).count();
        sections.push(section);
    }

    Conversion {
        output: sections.join("\n\n") + "\n",
        stats,
    }
}

/// Collapse escape sequences and whitespace runs for `format("...")` text.
pub fn flatten_text(part: &str) -> String {
    TEXT_WHITESPACE.replace_all(part, " ").trim().to_string()
}

/// Extract only the text blocks of a source as `format(...)` entries.
///
/// Returns the document and the number of blocks it holds.
pub fn extract_texts(contents: &str) -> (String, usize) {
    let physical = split_source(contents);
    let pre = preprocess_lines(&physical);

    let entries: Vec<String> = collect_blocks(&pre)
        .iter()
        .filter_map(|block| match classify_block(&pre.logical[block.payload_range()]) {
            BlockClass::Text(text) => {
                let content = text
                    .pieces()
                    .iter()
                    .map(|p| flatten_text(p))
                    .filter(|p| !p.is_empty())
                    .collect::<Vec<_>>()
                    .join(" ");
                Some(emit_format_text(&block.name, &content))
            }
            _ => None,
        })
        .collect();

    let count = entries.len();
    let mut doc = entries.join("\n\n");
    if !doc.is_empty() {
        doc.push('\n');
    }
    (doc, count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flattens_escapes() {
        assert_eq!(flatten_text("Hello,\\nthere\\p  friend "), "Hello, there\\p friend");
    }

    #[test]
    fn extracts_format_texts() {
        let src = "Town_Text_Hi::\n\t.string \"Hi,\\n\"\n\t.string \"you!$\"\n\nTown_EventScript_X::\n\tend\n";
        let (doc, count) = extract_texts(src);
        assert_eq!(count, 1);
        assert_eq!(doc, "text Town_Text_Hi {\n    format(\"Hi, you!\")\n}\n");
    }
}
