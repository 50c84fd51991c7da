//! Transforms over C sources, include lists and generated `.pory` files.

mod includes;
mod mapscripts;
mod popup;
mod unicode;

pub use includes::maps_includes;
pub use mapscripts::remove_duplicate_mapscripts;
pub use popup::{add_missing_themes, map_section_ids, THEME_TABLES};
pub use unicode::{strip_non_ascii, SCRIPT_EXTENSIONS};
