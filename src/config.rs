//! Project configuration, read from `porytools.toml` when present.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

pub const CONFIG_FILE_NAME: &str = "porytools.toml";

/// File locations and default identifiers for a decomp project.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub maps_dir: PathBuf,
    pub songs_header: PathBuf,
    pub default_music: String,
    pub replacement_music: String,
    pub layouts_json: PathBuf,
    pub region_map_sections: PathBuf,
    pub popup_source: PathBuf,
    pub maps_includes: PathBuf,
    pub restore_script: String,
    pub make_args: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            maps_dir: PathBuf::from("data/maps"),
            songs_header: PathBuf::from("include/constants/songs.h"),
            default_music: "MUS_ROUTE101".to_string(),
            replacement_music: "MUS_OLDALE".to_string(),
            layouts_json: PathBuf::from("data/layouts/layouts.json"),
            region_map_sections: PathBuf::from("src/data/region_map/region_map_sections.json"),
            popup_source: PathBuf::from("src/map_name_popup.c"),
            maps_includes: PathBuf::from("data/maps_includes.inc"),
            restore_script: "Common_EventScript_ShowBagIsFull".to_string(),
            make_args: vec!["-j24".to_string()],
        }
    }
}

impl Config {
    pub fn from_toml(text: &str, origin: &Path) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Config {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// A project root plus its configuration; every path a command touches goes through here.
#[derive(Debug, Clone)]
pub struct Project {
    pub root: PathBuf,
    pub config: Config,
}

impl Project {
    pub fn new(root: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    /// Load `explicit`, or `<root>/porytools.toml` if it exists, or fall back to defaults.
    pub fn load(root: impl Into<PathBuf>, explicit: Option<&Path>) -> Result<Self> {
        let root = root.into();
        let path = match explicit {
            Some(p) => Some(p.to_path_buf()),
            None => Some(root.join(CONFIG_FILE_NAME)).filter(|p| p.exists()),
        };

        let config = match path {
            Some(path) => {
                debug!(path = %path.display(), "loading config");
                let text = std::fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
                Config::from_toml(&text, &path)?
            }
            None => Config::default(),
        };

        Ok(Self { root, config })
    }

    /// Resolve a configured path against the project root.
    pub fn path(&self, relative: &Path) -> PathBuf {
        if relative.is_absolute() {
            relative.to_path_buf()
        } else {
            self.root.join(relative)
        }
    }

    pub fn maps_dir(&self) -> PathBuf {
        self.path(&self.config.maps_dir)
    }
}
