use super::commands::classify_line;
use super::types::{LogicalLine, PreprocessResult};

/// Strip a UTF-8 byte-order mark and split into physical lines.
pub fn split_source(contents: &str) -> Vec<&str> {
    contents
        .strip_prefix('\u{feff}')
        .unwrap_or(contents)
        .lines()
        .collect()
}

/// Classify every physical line. The `.inc` dialect has no line continuations,
/// so logical and physical indices coincide.
pub fn preprocess_lines(physical: &[&str]) -> PreprocessResult {
    let logical = physical
        .iter()
        .map(|line| LogicalLine {
            text: line.trim_end_matches('\r').to_string(),
            kind: classify_line(line),
        })
        .collect();

    PreprocessResult { logical }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::LineKind;

    #[test]
    fn keeps_one_logical_line_per_physical_line() {
        let src = "\u{feff}Foo::\r\n\tlock\r\n\n\tend\r\n";
        let lines = split_source(src);
        let pre = preprocess_lines(&lines);

        assert_eq!(pre.len(), 4);
        assert_eq!(pre.logical[1].text, "\tlock");
        assert_eq!(pre.logical[2].kind, LineKind::Blank);
        assert_eq!(pre.logical[3].text, "\tend");
    }
}
