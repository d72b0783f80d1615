// Grid settings
// Tunables for the scheduling grid, loaded from the user's config file

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Settings that shape the scheduling grid and its drag behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    /// Height in pixels of one hour row.
    pub cell_height_px: f32,
    /// Coarse snap applied to the drag delta, in minutes.
    pub snap_minutes: i64,
    /// Fine snap applied to the resulting absolute clock time, in minutes.
    pub fine_snap_minutes: i64,
    /// Minimum committed appointment duration, in minutes.
    pub min_duration_minutes: i64,
    /// Maximum committed appointment duration, in minutes.
    pub max_duration_minutes: i64,
    /// First hour row shown on the grid (inclusive).
    pub first_hour: u32,
    /// Last hour row shown on the grid (exclusive).
    pub last_hour: u32,
    /// Touch affordance: require a long-press before a drag session opens.
    /// Consumed by the host platform; the state machine itself is unified.
    pub require_long_press: bool,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            cell_height_px: 120.0,
            snap_minutes: 15,
            fine_snap_minutes: 5,
            min_duration_minutes: 15,
            max_duration_minutes: 240,
            first_hour: 8,
            last_hour: 20,
            require_long_press: false,
        }
    }
}

impl GridSettings {
    /// Number of hour rows on the grid.
    pub fn visible_hours(&self) -> u32 {
        self.last_hour.saturating_sub(self.first_hour)
    }

    /// Path of the user's config file, if a home directory is available.
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "salon-scheduler")
            .map(|dirs| dirs.config_dir().join("grid.toml"))
    }

    /// Load settings from the user's config file, falling back to
    /// defaults when the file is missing or unreadable.
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load settings from a specific TOML file.
    pub fn load_from(path: &Path) -> Self {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(_) => return Self::default(),
        };
        match toml::from_str(&contents) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring malformed grid settings at {:?}: {}", path, e);
                Self::default()
            }
        }
    }
}
