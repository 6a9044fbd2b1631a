//! Locate-and-select flows
//!
//! Jumping to an entity or annotation that may not be loaded yet. Cached
//! targets are handled synchronously. Otherwise a load is spawned and its
//! completion comes back over a channel; [`MapSystem::process_loads`] applies
//! it on the controller's thread. The `gfx/draw` registration drains it after
//! every frame; hosts that do not forward draws must call it themselves.
//! Failed or empty loads are dropped quietly since the request may come from
//! a stale link.

use crate::core::constants::{
    DRAW_MODE_PREFIX, MODE_SELECT_OSM, NOTES_LAYER, OSM_LAYER,
};
use crate::core::map::MapSystem;
use crate::traits::{Entity, EntityId, ModeRequest, Note, NoteId};
use crate::Result;
use log::debug;
use std::time::Duration;

/// A finished load, waiting to be applied by the controller
#[derive(Debug)]
pub(crate) enum LoadCompletion {
    Entity {
        id: EntityId,
        fit: bool,
        result: Result<Vec<Entity>>,
    },
    Note {
        id: NoteId,
        result: Result<Note>,
    },
}

impl MapSystem {
    /// Selects an entity, loading it first if needed, and reframes the map
    /// when `fit` is set or the entity is hard to see.
    ///
    /// An empty id enters browse mode.
    pub fn select_entity_id(&mut self, id: &str, fit: bool) {
        if id.is_empty() {
            self.deps.context.enter(ModeRequest::Browse);
            return;
        }

        if let Some(entity) = self.deps.editor.has_entity(id) {
            self.got_entity(&entity, fit);
            return;
        }

        debug!("entity {} not loaded, requesting it", id);
        let loader = self.deps.entity_loader.clone();
        let tx = self.loads_tx.clone();
        let id = id.to_string();
        self.deps.spawner.spawn_boxed(Box::pin(async move {
            let result = loader.load_entity(&id).await;
            let _ = tx.send(LoadCompletion::Entity { id, fit, result });
        }));
    }

    /// Selects an annotation and centers on it, loading it first if needed.
    ///
    /// Without an id or an annotation service this enters browse mode.
    pub fn select_note_id(&mut self, id: Option<NoteId>) {
        let (id, notes) = match (id.filter(|id| *id != 0), self.deps.notes.clone()) {
            (Some(id), Some(notes)) => (id, notes),
            _ => {
                self.deps.context.enter(ModeRequest::Browse);
                return;
            }
        };

        if let Some(note) = notes.get_note(id) {
            self.got_note(note);
            return;
        }

        debug!("note {} not loaded, requesting it", id);
        let tx = self.loads_tx.clone();
        self.deps.spawner.spawn_boxed(Box::pin(async move {
            let result = notes.load_note(id).await;
            let _ = tx.send(LoadCompletion::Note { id, result });
        }));
    }

    /// Applies finished loads. Returns how many ended in a selection.
    pub fn process_loads(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.loads_rx.try_recv() {
            match completion {
                LoadCompletion::Entity { id, fit, result } => match result {
                    Ok(entities) => match entities.into_iter().find(|e| e.id == id) {
                        Some(entity) => {
                            self.got_entity(&entity, fit);
                            applied += 1;
                        }
                        None => debug!("entity {} missing from load result", id),
                    },
                    Err(err) => debug!("loading entity {} failed: {}", id, err),
                },
                LoadCompletion::Note { id, result } => match result {
                    Ok(note) => {
                        self.got_note(note);
                        applied += 1;
                    }
                    Err(err) => debug!("loading note {} failed: {}", id, err),
                },
            }
        }
        applied
    }

    fn got_entity(&mut self, entity: &Entity, fit: bool) {
        let context = self.deps.context.clone();
        let in_select_mode = context.mode_id().as_deref() == Some(MODE_SELECT_OSM);
        if !in_select_mode || !context.selected_ids().contains(&entity.id) {
            self.deps.renderer.enable_layers(&[OSM_LAYER]);
            context.enter(ModeRequest::SelectOsm(vec![entity.id.clone()]));
        }

        // the graph may have changed while loading
        let entity = self
            .deps
            .editor
            .has_entity(&entity.id)
            .unwrap_or_else(|| entity.clone());

        let policy = &self.config.reframe;
        let entity_zoom = self.trimmed_extent_zoom(&entity.extent).min(policy.fit_max_zoom);
        let visible = entity.extent.percent_contained_in(&self.visible_extent());

        if fit || policy.should_reframe(visible, self.zoom(), entity_zoom) {
            debug!(
                "reframing on {} (visible {:.2}, zoom {:.2} vs {:.2})",
                entity.id,
                visible,
                self.zoom(),
                entity_zoom
            );
            self.fit_entities(std::slice::from_ref(&entity), Duration::ZERO);
        }
    }

    fn got_note(&mut self, note: Note) {
        self.deps.renderer.enable_layers(&[NOTES_LAYER]);
        let loc = note.loc;
        self.deps.context.enter(ModeRequest::SelectNote(note));
        let zoom = self.config.transitions.note_zoom;
        self.center_zoom_ease(loc, zoom);
    }

    /// Reacts to undo, redo or restore moving the history cursor.
    ///
    /// When undoing, the snapshot at `prev_index` describes the state being
    /// returned to, so it wins over the one at `curr_index` when present.
    pub fn history_jump(&mut self, prev_index: usize, curr_index: usize) {
        let editor = self.deps.editor.clone();
        let did_undo = prev_index.checked_sub(1) == Some(curr_index);
        let edit = if did_undo {
            editor.edit(prev_index).or_else(|| editor.edit(curr_index))
        } else {
            editor.edit(curr_index)
        };
        let Some(edit) = edit else {
            debug!("history jump to {} has no edit", curr_index);
            return;
        };

        if let Some(t1) = edit.transform {
            if t1 != self.transform() {
                self.transform_ease(t1);
            }
        }

        // draw modes keep their own continuity across history jumps
        let context = self.deps.context.clone();
        if context
            .mode_id()
            .map_or(false, |mode| mode.starts_with(DRAW_MODE_PREFIX))
        {
            return;
        }

        let selected: Vec<EntityId> = edit
            .selected_ids
            .iter()
            .filter(|id| edit.has_entity(id))
            .cloned()
            .collect();
        if selected.is_empty() {
            context.enter(ModeRequest::Browse);
        } else {
            context.enter(ModeRequest::SelectOsm(selected));
        }
    }
}
