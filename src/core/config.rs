//! Configuration for navigation behavior
//!
//! Thresholds that decide when the map reframes, how much screen space the
//! surrounding chrome takes, and how long eased moves last. Presets follow
//! the same profile pattern as the rest of the engine; every field can be
//! overridden from JSON.

use crate::core::constants::EASE_DURATION_MS;
use crate::core::geo::Point;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum NavigationProfile {
    Standard,
    /// Reframes more readily; useful on small screens
    Cautious,
    /// Never eases; every move is applied at once
    Eager,
    Custom(MapSystemConfig),
}

impl NavigationProfile {
    pub fn resolve(&self) -> MapSystemConfig {
        match self {
            Self::Standard => MapSystemConfig::default(),
            Self::Cautious => MapSystemConfig {
                reframe: ReframePolicy {
                    min_visible_fraction: 0.95,
                    max_zoom_deficit: 1.0,
                    ..ReframePolicy::default()
                },
                ..MapSystemConfig::default()
            },
            Self::Eager => MapSystemConfig {
                transitions: TransitionConfig {
                    ease_duration_ms: 0,
                    ..TransitionConfig::default()
                },
                ..MapSystemConfig::default()
            },
            Self::Custom(config) => config.clone(),
        }
    }
}

impl Default for NavigationProfile {
    fn default() -> Self {
        Self::Standard
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSystemConfig {
    pub reframe: ReframePolicy,
    pub chrome: ChromeMargins,
    pub transitions: TransitionConfig,
    /// Used until the renderer reports its own size
    pub initial_dimensions: Point,
}

impl MapSystemConfig {
    /// Parses a config, filling anything missing with defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let fraction = self.reframe.min_visible_fraction;
        if !(0.0..=1.0).contains(&fraction) {
            return Err(crate::MapError::InvalidConfig(format!(
                "min_visible_fraction must be within [0, 1], got {}",
                fraction
            )));
        }
        if self.initial_dimensions.x <= 0.0 || self.initial_dimensions.y <= 0.0 {
            return Err(crate::MapError::InvalidConfig(
                "initial_dimensions must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for MapSystemConfig {
    fn default() -> Self {
        Self {
            reframe: ReframePolicy::default(),
            chrome: ChromeMargins::default(),
            transitions: TransitionConfig::default(),
            initial_dimensions: Point::new(800.0, 600.0),
        }
    }
}

/// When selecting something, decides whether the view must move to show it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReframePolicy {
    /// Reframe when less than this fraction of the target is on screen
    pub min_visible_fraction: f64,
    /// Reframe when the ideal zoom exceeds the current one by more than this
    pub max_zoom_deficit: f64,
    /// Upper bound for zooms computed to fit entities
    pub fit_max_zoom: f64,
}

impl ReframePolicy {
    pub fn should_reframe(&self, visible_fraction: f64, current_zoom: f64, ideal_zoom: f64) -> bool {
        let is_offscreen = visible_fraction < self.min_visible_fraction;
        let is_too_small = current_zoom < ideal_zoom - self.max_zoom_deficit;
        is_offscreen || is_too_small
    }
}

impl Default for ReframePolicy {
    fn default() -> Self {
        Self {
            min_visible_fraction: 0.8,
            max_zoom_deficit: 2.0,
            fit_max_zoom: 20.0,
        }
    }
}

/// Screen space taken by toolbars, footers and panels, in pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChromeMargins {
    /// Total horizontal trim applied when fitting content
    pub trim_width: f64,
    /// Total vertical trim applied when fitting content
    pub trim_height: f64,
    pub header: f64,
    pub footer: f64,
    pub pad: f64,
}

impl ChromeMargins {
    pub fn trimmed(&self, dimensions: Point) -> Point {
        Point::new(
            dimensions.x - self.trim_width,
            dimensions.y - self.trim_height,
        )
    }
}

impl Default for ChromeMargins {
    fn default() -> Self {
        Self {
            trim_width: 140.0,
            trim_height: 240.0,
            header: 72.0,
            footer: 30.0,
            pad: 70.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    pub ease_duration_ms: u64,
    /// Zoom used when jumping to an annotation
    pub note_zoom: f64,
}

impl TransitionConfig {
    pub fn ease_duration(&self) -> Duration {
        Duration::from_millis(self.ease_duration_ms)
    }
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            ease_duration_ms: EASE_DURATION_MS,
            note_zoom: 19.0,
        }
    }
}
