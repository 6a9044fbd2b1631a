//! Prelude module for common mapnav types and traits
//!
//! `use mapnav::prelude::*;` brings in the controller, its builder and the
//! collaborator traits a host has to implement.

pub use crate::core::{
    builder::MapSystemBuilder,
    config::{ChromeMargins, MapSystemConfig, NavigationProfile, ReframePolicy},
    display::{AreaFillMode, DisplayOptions},
    geo::{Extent, LatLng, Point},
    map::{Collaborators, MapSystem},
    viewport::{Transform, Viewport},
};

pub use crate::data::hash::{HashParams, MapParam, NoteParam};

pub use crate::input::events::{CollaboratorEvent, EventSource, MapEvent};

pub use crate::rendering::{RedrawScheduler, RedrawUrgency};

pub use crate::runtime::{init_runtime, runtime, spawn, AsyncHandle, AsyncSpawner};

pub use crate::traits::{
    Editor, Entity, EntityId, EntityLoader, FeatureFilters, HistoryEdit, ModeContext,
    ModeRequest, Note, NoteId, NoteService, Renderer, Storage, UrlHash,
};

pub use crate::{Error as MapError, Result};

pub use std::{sync::Arc, time::Duration};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
