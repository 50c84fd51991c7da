//! Command glue: each function resolves paths through a [`Project`](crate::config::Project),
//! applies one transform per item and reports through a [`BatchReport`].

mod convert;
mod maps;
mod runner;
mod sources;

pub use convert::{convert_file, convert_maps, convert_single, ConvertMode, PORY_FILE};
pub use maps::{
    add_sign_scripts, clean_local_ids, clear_maps, fix_music, normalize_pokecenters,
    replace_music, restore_map_scripts, MAP_JSON, SCRIPTS_INC,
};
pub use runner::{run_batch, run_single, upsert, upsert_json, BatchReport, ItemError};
pub use sources::{
    add_popup_themes, build_output, dedupe_mapscripts, dedupe_table, disable_undefined_refs,
    missing_music, strip_unicode, write_maps_includes, BuildLog, DedupeTarget, RefTarget,
};
