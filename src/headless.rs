//! In-memory collaborators
//!
//! Lets the navigation core run without a renderer, a real history or a
//! network: demos and tests wire these in and inspect what the controller
//! asked of them.

use crate::{
    core::{
        config::MapSystemConfig,
        geo::Point,
        map::{Collaborators, MapSystem},
        viewport::Transform,
    },
    data::hash::HashParams,
    runtime::spawners::InlineSpawner,
    traits::{
        Editor, Entity, EntityId, EntityLoader, FeatureFilters, HistoryEdit, ModeContext,
        ModeRequest, Note, NoteId, NoteService, Renderer, Storage, UrlHash,
    },
    MapError, Result,
};
use async_trait::async_trait;
use fxhash::{FxHashMap, FxHashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Key-value preferences held in memory
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<FxHashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        lock(&self.items).get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) {
        lock(&self.items).insert(key.to_string(), value.to_string());
    }
}

#[derive(Debug, Default)]
struct RendererState {
    immediate: usize,
    deferred: usize,
    scene_dirty: usize,
    dirty_layers: Vec<String>,
    dirty_data: Vec<(String, EntityId)>,
    enabled_layers: FxHashSet<String>,
    dimensions: Option<Point>,
    pointer: Option<Point>,
    committed: Vec<(Transform, Duration)>,
}

/// Renderer that records every request instead of drawing
#[derive(Debug)]
pub struct RecordingRenderer {
    state: Mutex<RendererState>,
}

impl RecordingRenderer {
    /// An 800x600 surface
    pub fn new() -> Self {
        Self::with_dimensions(Point::new(800.0, 600.0))
    }

    pub fn with_dimensions(dimensions: Point) -> Self {
        Self {
            state: Mutex::new(RendererState {
                dimensions: Some(dimensions),
                ..RendererState::default()
            }),
        }
    }

    pub fn set_pointer(&self, pointer: Option<Point>) {
        lock(&self.state).pointer = pointer;
    }

    pub fn immediate_redraws(&self) -> usize {
        lock(&self.state).immediate
    }

    pub fn deferred_redraws(&self) -> usize {
        lock(&self.state).deferred
    }

    pub fn scene_dirty_count(&self) -> usize {
        lock(&self.state).scene_dirty
    }

    pub fn dirty_layers(&self) -> Vec<String> {
        lock(&self.state).dirty_layers.clone()
    }

    pub fn dirty_data(&self) -> Vec<(String, EntityId)> {
        lock(&self.state).dirty_data.clone()
    }

    pub fn committed_transforms(&self) -> Vec<(Transform, Duration)> {
        lock(&self.state).committed.clone()
    }
}

impl Default for RecordingRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for RecordingRenderer {
    fn request_immediate_redraw(&self) {
        lock(&self.state).immediate += 1;
    }

    fn request_deferred_redraw(&self) {
        lock(&self.state).deferred += 1;
    }

    fn mark_layers_dirty(&self, layer_ids: &[&str]) {
        let mut state = lock(&self.state);
        state
            .dirty_layers
            .extend(layer_ids.iter().map(|id| id.to_string()));
    }

    fn mark_data_dirty(&self, layer_id: &str, entity_ids: &[EntityId]) {
        let mut state = lock(&self.state);
        for id in entity_ids {
            state.dirty_data.push((layer_id.to_string(), id.clone()));
        }
    }

    fn mark_scene_dirty(&self) {
        lock(&self.state).scene_dirty += 1;
    }

    fn dimensions(&self) -> Option<Point> {
        lock(&self.state).dimensions
    }

    fn pointer(&self) -> Option<Point> {
        lock(&self.state).pointer
    }

    fn enable_layers(&self, layer_ids: &[&str]) {
        let mut state = lock(&self.state);
        for id in layer_ids {
            state.enabled_layers.insert(id.to_string());
        }
    }

    fn disable_layers(&self, layer_ids: &[&str]) {
        let mut state = lock(&self.state);
        for id in layer_ids {
            state.enabled_layers.remove(*id);
        }
    }

    fn layer_enabled(&self, layer_id: &str) -> bool {
        lock(&self.state).enabled_layers.contains(layer_id)
    }

    fn transform_committed(&self, transform: &Transform, duration: Duration) {
        lock(&self.state).committed.push((*transform, duration));
    }
}

#[derive(Debug, Default)]
struct EditorState {
    entities: FxHashMap<EntityId, Entity>,
    history: Vec<HistoryEdit>,
    touched: Vec<EntityId>,
}

/// A flat entity graph plus a list of history snapshots
#[derive(Debug, Default)]
pub struct MemoryEditor {
    state: Mutex<EditorState>,
}

impl MemoryEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, entity: Entity) {
        lock(&self.state).entities.insert(entity.id.clone(), entity);
    }

    pub fn remove(&self, id: &str) -> Option<Entity> {
        lock(&self.state).entities.remove(id)
    }

    /// Appends a history entry and returns its index
    pub fn push_edit(&self, edit: HistoryEdit) -> usize {
        let mut state = lock(&self.state);
        state.history.push(edit);
        state.history.len() - 1
    }

    pub fn touched(&self) -> Vec<EntityId> {
        lock(&self.state).touched.clone()
    }
}

impl Editor for MemoryEditor {
    fn has_entity(&self, id: &str) -> Option<Entity> {
        lock(&self.state).entities.get(id).cloned()
    }

    fn touch(&self, id: &str) {
        lock(&self.state).touched.push(id.to_string());
    }

    fn edit(&self, index: usize) -> Option<HistoryEdit> {
        lock(&self.state).history.get(index).cloned()
    }
}

/// Records which entities had their filter cache cleared
#[derive(Debug, Default)]
pub struct MemoryFilters {
    cleared: Mutex<Vec<EntityId>>,
}

impl MemoryFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cleared(&self) -> Vec<EntityId> {
        lock(&self.cleared).clone()
    }
}

impl FeatureFilters for MemoryFilters {
    fn clear_entity(&self, id: &str) {
        lock(&self.cleared).push(id.to_string());
    }
}

/// The published side of the url hash
#[derive(Debug, Default)]
pub struct MemoryUrlHash {
    params: Mutex<HashParams>,
}

impl MemoryUrlHash {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn param(&self, key: &str) -> Option<String> {
        lock(&self.params).get(key).cloned()
    }

    pub fn params(&self) -> HashParams {
        lock(&self.params).clone()
    }
}

impl UrlHash for MemoryUrlHash {
    fn set_param(&self, key: &str, value: Option<&str>) {
        let mut params = lock(&self.params);
        match value {
            Some(value) => {
                params.insert(key.to_string(), value.to_string());
            }
            None => {
                params.remove(key);
            }
        }
    }
}

#[derive(Debug)]
struct ContextState {
    mode: String,
    selected_ids: Vec<EntityId>,
    selected_note: Option<NoteId>,
    requests: Vec<ModeRequest>,
}

/// Mode context that applies and records every `enter`
#[derive(Debug)]
pub struct RecordingContext {
    state: Mutex<ContextState>,
}

impl RecordingContext {
    /// Starts in browse mode with nothing selected
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ContextState {
                mode: "browse".to_string(),
                selected_ids: Vec::new(),
                selected_note: None,
                requests: Vec::new(),
            }),
        }
    }

    /// Puts the context in a mode without recording a request
    pub fn set_mode(&self, mode: &str, selected_ids: Vec<EntityId>) {
        let mut state = lock(&self.state);
        state.mode = mode.to_string();
        state.selected_ids = selected_ids;
        state.selected_note = None;
    }

    pub fn requests(&self) -> Vec<ModeRequest> {
        lock(&self.state).requests.clone()
    }

    pub fn last_request(&self) -> Option<ModeRequest> {
        lock(&self.state).requests.last().cloned()
    }
}

impl Default for RecordingContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ModeContext for RecordingContext {
    fn mode_id(&self) -> Option<String> {
        Some(lock(&self.state).mode.clone())
    }

    fn enter(&self, request: ModeRequest) {
        let mut state = lock(&self.state);
        let (mode, ids, note) = match &request {
            ModeRequest::Browse => ("browse", Vec::new(), None),
            ModeRequest::SelectOsm(ids) => ("select-osm", ids.clone(), None),
            ModeRequest::SelectNote(note) => ("select", Vec::new(), Some(note.id)),
        };
        state.mode = mode.to_string();
        state.selected_ids = ids;
        state.selected_note = note;
        state.requests.push(request);
    }

    fn selected_ids(&self) -> Vec<EntityId> {
        lock(&self.state).selected_ids.clone()
    }

    fn selected_note(&self) -> Option<NoteId> {
        lock(&self.state).selected_note
    }
}

/// Serves entities from a "remote" map, merging them into an editor on load
#[derive(Debug, Default)]
pub struct MemoryEntityLoader {
    remote: Mutex<FxHashMap<EntityId, Entity>>,
    editor: Option<Arc<MemoryEditor>>,
}

impl MemoryEntityLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loaded entities are also inserted into `editor`
    pub fn merging_into(editor: Arc<MemoryEditor>) -> Self {
        Self {
            remote: Mutex::default(),
            editor: Some(editor),
        }
    }

    pub fn insert(&self, entity: Entity) {
        lock(&self.remote).insert(entity.id.clone(), entity);
    }
}

#[async_trait]
impl EntityLoader for MemoryEntityLoader {
    async fn load_entity(&self, id: &str) -> Result<Vec<Entity>> {
        let entity = lock(&self.remote)
            .get(id)
            .cloned()
            .ok_or_else(|| MapError::NotFound(format!("entity {}", id)))?;
        if let Some(editor) = &self.editor {
            editor.insert(entity.clone());
        }
        Ok(vec![entity])
    }
}

#[derive(Debug, Default)]
struct NotesState {
    cached: FxHashMap<NoteId, Note>,
    remote: FxHashMap<NoteId, Note>,
}

/// Annotation service with a local cache and a "remote" store
#[derive(Debug, Default)]
pub struct MemoryNotes {
    state: Mutex<NotesState>,
}

impl MemoryNotes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Already loaded
    pub fn insert(&self, note: Note) {
        lock(&self.state).cached.insert(note.id, note);
    }

    /// Available only after `load_note`
    pub fn insert_remote(&self, note: Note) {
        lock(&self.state).remote.insert(note.id, note);
    }
}

#[async_trait]
impl NoteService for MemoryNotes {
    fn get_note(&self, id: NoteId) -> Option<Note> {
        lock(&self.state).cached.get(&id).cloned()
    }

    async fn load_note(&self, id: NoteId) -> Result<Note> {
        let mut state = lock(&self.state);
        let note = state
            .remote
            .remove(&id)
            .ok_or_else(|| MapError::NotFound(format!("note {}", id)))?;
        state.cached.insert(id, note.clone());
        Ok(note)
    }
}

/// A map system wired to in-memory collaborators, with handles to each
pub struct HeadlessMap {
    pub map: MapSystem,
    pub storage: Arc<MemoryStorage>,
    pub renderer: Arc<RecordingRenderer>,
    pub editor: Arc<MemoryEditor>,
    pub filters: Arc<MemoryFilters>,
    pub urlhash: Arc<MemoryUrlHash>,
    pub context: Arc<RecordingContext>,
    pub loader: Arc<MemoryEntityLoader>,
    pub notes: Arc<MemoryNotes>,
}

impl HeadlessMap {
    pub fn new() -> Self {
        Self::assemble(MapSystemConfig::default(), true)
    }

    /// No annotation service is registered
    pub fn without_notes() -> Self {
        Self::assemble(MapSystemConfig::default(), false)
    }

    pub fn with_config(config: MapSystemConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::assemble(config, true))
    }

    fn assemble(config: MapSystemConfig, with_notes: bool) -> Self {
        let storage = Arc::new(MemoryStorage::new());
        let renderer = Arc::new(RecordingRenderer::new());
        let editor = Arc::new(MemoryEditor::new());
        let filters = Arc::new(MemoryFilters::new());
        let urlhash = Arc::new(MemoryUrlHash::new());
        let context = Arc::new(RecordingContext::new());
        let loader = Arc::new(MemoryEntityLoader::merging_into(editor.clone()));
        let notes = Arc::new(MemoryNotes::new());

        let deps = Collaborators {
            storage: storage.clone(),
            renderer: renderer.clone(),
            editor: editor.clone(),
            filters: filters.clone(),
            urlhash: urlhash.clone(),
            context: context.clone(),
            entity_loader: loader.clone(),
            notes: with_notes.then(|| notes.clone() as Arc<dyn NoteService>),
            spawner: Arc::new(InlineSpawner),
        };

        Self {
            map: MapSystem::new(deps, config),
            storage,
            renderer,
            editor,
            filters,
            urlhash,
            context,
            loader,
            notes,
        }
    }
}

impl Default for HeadlessMap {
    fn default() -> Self {
        Self::new()
    }
}
