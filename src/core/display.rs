//! Display preferences: highlight edits and area fill
//!
//! Fill mode is persisted as two plain strings. `area-fill` holds the active
//! mode and `area-fill-toggle` remembers the last non-wireframe mode so that
//! leaving wireframe goes back to what the user had before.

use crate::core::constants::{AREA_FILL_KEY, AREA_FILL_TOGGLE_KEY};
use crate::traits::Storage;
use crate::MapError;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaFillMode {
    Full,
    #[default]
    Partial,
    Wireframe,
}

impl AreaFillMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AreaFillMode::Full => "full",
            AreaFillMode::Partial => "partial",
            AreaFillMode::Wireframe => "wireframe",
        }
    }
}

impl fmt::Display for AreaFillMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AreaFillMode {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full" => Ok(AreaFillMode::Full),
            "partial" => Ok(AreaFillMode::Partial),
            "wireframe" => Ok(AreaFillMode::Wireframe),
            other => Err(MapError::NotFound(format!("area fill mode '{}'", other))),
        }
    }
}

/// Current display flags, mutated only through `MapSystem` setters
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayOptions {
    pub highlight_edits: bool,
    pub area_fill: AreaFillMode,
    /// Last non-wireframe fill mode
    pub toggle_fill: AreaFillMode,
}

impl DisplayOptions {
    /// Reads both fill preferences, defaulting to `partial`
    pub fn load(storage: &dyn Storage) -> Self {
        Self {
            highlight_edits: false,
            area_fill: read_fill(storage, AREA_FILL_KEY),
            toggle_fill: read_fill(storage, AREA_FILL_TOGGLE_KEY),
        }
    }

    pub fn wireframe(&self) -> bool {
        self.area_fill == AreaFillMode::Wireframe
    }
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            highlight_edits: false,
            area_fill: AreaFillMode::Partial,
            toggle_fill: AreaFillMode::Partial,
        }
    }
}

fn read_fill(storage: &dyn Storage, key: &str) -> AreaFillMode {
    match storage.get_item(key) {
        Some(value) if !value.is_empty() => value.parse().unwrap_or_else(|_| {
            warn!("ignoring stored {} value '{}'", key, value);
            AreaFillMode::default()
        }),
        _ => AreaFillMode::default(),
    }
}
