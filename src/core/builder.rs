//! Map system builder
//!
//! Collects the collaborators the controller depends on and validates them
//! before a [`MapSystem`] is created. A missing required collaborator is a
//! startup error; the system is never partially initialized.

use crate::{
    core::{
        config::{MapSystemConfig, NavigationProfile},
        map::{Collaborators, MapSystem},
    },
    runtime::{runtime, AsyncSpawner},
    traits::{
        Editor, EntityLoader, FeatureFilters, ModeContext, NoteService, Renderer, Storage,
        UrlHash,
    },
    MapError, Result,
};
use std::sync::Arc;

/// Builder for creating and configuring MapSystem instances
#[derive(Default)]
pub struct MapSystemBuilder {
    storage: Option<Arc<dyn Storage>>,
    renderer: Option<Arc<dyn Renderer>>,
    editor: Option<Arc<dyn Editor>>,
    filters: Option<Arc<dyn FeatureFilters>>,
    urlhash: Option<Arc<dyn UrlHash>>,
    context: Option<Arc<dyn ModeContext>>,
    entity_loader: Option<Arc<dyn EntityLoader>>,
    notes: Option<Arc<dyn NoteService>>,
    spawner: Option<Arc<dyn AsyncSpawner>>,
    profile: NavigationProfile,
}

impl MapSystemBuilder {
    /// Create a new MapSystemBuilder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_storage(mut self, storage: Arc<dyn Storage>) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn with_editor(mut self, editor: Arc<dyn Editor>) -> Self {
        self.editor = Some(editor);
        self
    }

    pub fn with_filters(mut self, filters: Arc<dyn FeatureFilters>) -> Self {
        self.filters = Some(filters);
        self
    }

    pub fn with_urlhash(mut self, urlhash: Arc<dyn UrlHash>) -> Self {
        self.urlhash = Some(urlhash);
        self
    }

    pub fn with_context(mut self, context: Arc<dyn ModeContext>) -> Self {
        self.context = Some(context);
        self
    }

    pub fn with_entity_loader(mut self, loader: Arc<dyn EntityLoader>) -> Self {
        self.entity_loader = Some(loader);
        self
    }

    /// The annotation service is optional
    pub fn with_notes(mut self, notes: Arc<dyn NoteService>) -> Self {
        self.notes = Some(notes);
        self
    }

    /// Where loads run; defaults to the global runtime
    pub fn with_spawner(mut self, spawner: Arc<dyn AsyncSpawner>) -> Self {
        self.spawner = Some(spawner);
        self
    }

    /// Set the navigation profile
    pub fn with_profile(mut self, profile: NavigationProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Set a custom configuration
    pub fn with_config(mut self, config: MapSystemConfig) -> Self {
        self.profile = NavigationProfile::Custom(config);
        self
    }

    /// Validates the collaborators and creates the map system
    pub fn build(self) -> Result<MapSystem> {
        let config = self.profile.resolve();
        config.validate()?;

        let deps = Collaborators {
            storage: required(self.storage, "storage")?,
            renderer: required(self.renderer, "renderer")?,
            editor: required(self.editor, "editor")?,
            filters: required(self.filters, "filters")?,
            urlhash: required(self.urlhash, "urlhash")?,
            context: required(self.context, "context")?,
            entity_loader: required(self.entity_loader, "entity_loader")?,
            notes: self.notes,
            spawner: self.spawner.unwrap_or_else(runtime),
        };

        Ok(MapSystem::new(deps, config))
    }
}

fn required<T: ?Sized>(value: Option<Arc<T>>, name: &'static str) -> Result<Arc<T>> {
    value.ok_or(MapError::MissingDependency(name))
}
