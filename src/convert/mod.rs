//! `scripts.inc` to Poryscript conversion.
//!
//! Blocks are classified in two passes: movements and texts first, then
//! event scripts (which may inline the movements found earlier). Lines that no
//! block claims are kept in a trailing `raw` section.

mod assemble;
mod classify;
mod emit;
mod ranges;
mod rewrite;
mod script;

pub use assemble::{convert_inc, extract_texts, flatten_text, Conversion, ConversionStats};
pub use classify::{
    classify_block, is_movement_block, movement_block, parse_text_block, BlockClass,
    MovementBlock, MovementLine, MovementStep, TextBlock, MOVEMENT_TERMINATOR, TEXT_TERMINATOR,
};
pub use emit::{emit_format_text, emit_movement, emit_script, emit_text};
pub use ranges::RangeSet;
pub use rewrite::{inline_movements, looks_like_command, rewrite_kind, rewrite_line, MAX_INLINE_STEPS};
pub use script::convert_script_lines;
