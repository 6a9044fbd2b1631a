//! Collaborator contracts
//!
//! The navigation core does not draw, store history or talk to the network.
//! Everything it needs from the rest of the editor goes through the traits
//! below. All methods take `&self`; implementations that keep state use
//! interior mutability so a single collaborator can be shared between the
//! controller and whoever else drives it.

use crate::core::geo::{Extent, LatLng, Point};
use crate::core::viewport::Transform;
use crate::Result;
use async_trait::async_trait;
use fxhash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Identifier of an editable map entity (e.g. `w123`)
pub type EntityId = String;

/// Identifier of an annotation
pub type NoteId = i64;

/// The parts of an entity the navigation core cares about
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub extent: Extent,
}

impl Entity {
    pub fn new(id: impl Into<EntityId>, extent: Extent) -> Self {
        Self {
            id: id.into(),
            extent,
        }
    }
}

/// An annotation pinned at a location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub loc: LatLng,
}

/// A snapshot stored with one history entry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryEdit {
    /// The view at the time of the edit, if recorded
    pub transform: Option<Transform>,
    pub selected_ids: Vec<EntityId>,
    /// Ids present in the graph at this point of history
    pub graph: FxHashSet<EntityId>,
}

impl HistoryEdit {
    pub fn has_entity(&self, id: &str) -> bool {
        self.graph.contains(id)
    }
}

/// Interaction modes the core can ask to enter
#[derive(Debug, Clone, PartialEq)]
pub enum ModeRequest {
    Browse,
    SelectOsm(Vec<EntityId>),
    SelectNote(Note),
}

/// Persistent key-value preferences
pub trait Storage: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str);
}

/// The rendering and scene collaborator
pub trait Renderer: Send + Sync {
    fn request_immediate_redraw(&self);
    fn request_deferred_redraw(&self);
    fn mark_layers_dirty(&self, layer_ids: &[&str]);
    /// Marks specific data items of a layer as changed
    fn mark_data_dirty(&self, layer_id: &str, entity_ids: &[EntityId]);
    fn mark_scene_dirty(&self);

    /// Pixel size of the drawing surface, if it has been laid out
    fn dimensions(&self) -> Option<Point>;
    /// Last known pointer position in pixels
    fn pointer(&self) -> Option<Point> {
        None
    }

    fn enable_layers(&self, layer_ids: &[&str]);
    fn disable_layers(&self, layer_ids: &[&str]);
    fn layer_enabled(&self, layer_id: &str) -> bool;

    /// Called with every transform the controller commits
    fn transform_committed(&self, _transform: &Transform, _duration: Duration) {}
}

/// Editing graph and history
pub trait Editor: Send + Sync {
    /// Looks an entity up in the current staging graph
    fn has_entity(&self, id: &str) -> Option<Entity>;
    /// Bumps an entity's version so renderers treat it as changed
    fn touch(&self, id: &str);
    /// The history entry at `index`
    fn edit(&self, index: usize) -> Option<HistoryEdit>;
}

/// Feature filter cache
pub trait FeatureFilters: Send + Sync {
    fn clear_entity(&self, id: &str);
}

/// Url hash publisher
pub trait UrlHash: Send + Sync {
    /// `None` removes the parameter
    fn set_param(&self, key: &str, value: Option<&str>);
}

/// Interaction mode and selection state
pub trait ModeContext: Send + Sync {
    fn mode_id(&self) -> Option<String>;
    fn enter(&self, request: ModeRequest);
    fn selected_ids(&self) -> Vec<EntityId>;
    /// The selected annotation, if the current selection is one
    fn selected_note(&self) -> Option<NoteId>;
}

/// Loads entities that are not yet in the graph
#[async_trait]
pub trait EntityLoader: Send + Sync {
    /// Everything that came back with the request; may or may not include `id`
    async fn load_entity(&self, id: &str) -> Result<Vec<Entity>>;
}

/// Annotation lookup and loading
#[async_trait]
pub trait NoteService: Send + Sync {
    fn get_note(&self, id: NoteId) -> Option<Note>;
    async fn load_note(&self, id: NoteId) -> Result<Note>;
}
