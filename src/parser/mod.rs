mod commands;
mod header;
mod labels;
mod preprocessor;
mod types;

pub use commands::{
    classify_line, is_bare_command, split_args,
    string_payload, strip_trailing_comment, BARE_COMMANDS,
};
pub use header::{find_mapscripts_header, parse_table, MapScriptsHeader};
pub use labels::{build_label_map, collect_blocks};
pub use preprocessor::{preprocess_lines, split_source};
pub use types::{LabeledBlock, LineKind, LogicalLine, PreprocessResult, Scope, TableEntry};
