//! Transforms over `map.json` records and the files that sit next to them.

mod clear;
mod dedupe;
mod layouts;
mod localids;
mod music;
mod restore;
mod signs;

pub use clear::{clear_events, matches_any, select_maps, stub_scripts, MapSelection};
pub use dedupe::dedupe_by_id;
pub use layouts::{generic_pokecenter_layout, normalize_pokecenter_layout, POKEMON_CENTER_1F, POKEMON_CENTER_2F};
pub use localids::{declared_local_ids, remove_undeclared_local_ids};
pub use music::{fix_unavailable_music, parse_music_defines, replace_missing_music, MusicChange};
pub use restore::restore_scripts;
pub use signs::{
    defined_scripts, find_sign_scripts, render_sign_script, sign_script_names,
    upsert_sign_scripts, SignScript,
};
