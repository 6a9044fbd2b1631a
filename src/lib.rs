//! # mapnav
//!
//! Navigation core for an interactive map editor.
//!
//! Holds the authoritative viewport transform and funnels every pan, zoom,
//! rotate and fit request through one choke point that keeps zoom and
//! rotation in range. Around it sit the url-hash synchronization, the
//! redraw scheduler and the locate-and-select flow. Rendering, editing
//! history and data services are reached through the traits in [`traits`].

pub mod animation;
pub mod core;
pub mod data;
pub mod headless;
pub mod input;
pub mod prelude;
pub mod rendering;
pub mod runtime;
pub mod traits;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    builder::MapSystemBuilder,
    config::{MapSystemConfig, NavigationProfile},
    geo::{Extent, LatLng, Point},
    map::MapSystem,
    viewport::{Transform, Viewport},
};

pub use crate::input::events::{CollaboratorEvent, EventSource, MapEvent};

pub use crate::rendering::{RedrawScheduler, RedrawUrgency};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("missing dependency: {0}")]
    MissingDependency(&'static str),

    #[error("load error: {0}")]
    Load(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Error type alias for convenience
pub type Error = MapError;
