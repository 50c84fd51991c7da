use std::collections::HashMap;

use super::types::{LabeledBlock, LineKind, PreprocessResult};

/// Split the file into blocks, one per label, each running to the next label or EOF.
pub fn collect_blocks(pre: &PreprocessResult) -> Vec<LabeledBlock> {
    let labels: Vec<_> = pre
        .logical
        .iter()
        .enumerate()
        .filter_map(|(i, line)| match &line.kind {
            LineKind::Label { name, scope } => Some((i, name.clone(), *scope)),
            _ => None,
        })
        .collect();

    labels
        .iter()
        .enumerate()
        .map(|(idx, (start, name, scope))| {
            let end = labels
                .get(idx + 1)
                .map(|(next, _, _)| *next)
                .unwrap_or(pre.len());
            LabeledBlock {
                name: name.clone(),
                scope: *scope,
                start: *start,
                end,
            }
        })
        .collect()
}

/// Label name -> block index. A repeated label keeps its first definition.
pub fn build_label_map(blocks: &[LabeledBlock]) -> HashMap<String, usize> {
    let mut map = HashMap::new();
    for (i, block) in blocks.iter().enumerate() {
        map.entry(block.name.clone()).or_insert(i);
    }
    map
}
