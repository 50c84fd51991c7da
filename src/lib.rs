//! Maintenance tools for Pokémon decomp map data: a `scripts.inc` to Poryscript
//! converter plus JSON and source patchers that keep `data/maps` building.

pub mod build;
pub mod config;
pub mod convert;
pub mod error;
pub mod executor;
pub mod files;
pub mod maps;
pub mod parser;
pub mod sources;

pub use config::{Config, Project};
pub use error::{Error, Result};
