//! Collaborator event wiring
//!
//! Every reaction the map has to another subsystem is listed in [`WIRING`].
//! Hosts forward collaborator notifications to [`MapSystem::dispatch`]
//! instead of subscribing handlers one by one.

use crate::core::constants::{OSM_LAYER, RAPID_LAYER, RAPID_OVERLAY_LAYER};
use crate::core::map::MapSystem;
use crate::input::events::{CollaboratorEvent, EventSource, MapEvent};
use log::{debug, trace};

pub type Handler = fn(&mut MapSystem, &CollaboratorEvent);

/// One `(source, event) -> handler` entry
#[derive(Clone, Copy)]
pub struct Registration {
    pub source: EventSource,
    pub event: &'static str,
    pub handler: Handler,
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.source, self.event)
    }
}

const fn on(source: EventSource, event: &'static str, handler: Handler) -> Registration {
    Registration {
        source,
        event,
        handler,
    }
}

pub static WIRING: &[Registration] = &[
    on(EventSource::UrlHash, "hashchange", hash_changed),
    on(EventSource::Gfx, "move", gfx_moved),
    on(EventSource::Gfx, "draw", gfx_drawn),
    on(EventSource::Editor, "merge", data_merged),
    on(EventSource::Editor, "stagingchange", staging_changed),
    on(EventSource::Editor, "historyjump", history_jumped),
    on(EventSource::Filters, "filterchange", filters_changed),
    on(EventSource::Rapid, "datasetchange", datasets_changed),
    on(EventSource::L10n, "localechange", locale_changed),
    on(EventSource::Context, "modechange", redraw_now),
    on(EventSource::Imagery, "imagerychange", redraw_now),
    on(EventSource::Photos, "photochange", redraw_now),
    on(EventSource::Scene, "layerchange", redraw_now),
    on(EventSource::Styles, "stylechange", redraw_now),
    on(EventSource::Osm, "authchange", redraw_now),
];

impl MapSystem {
    /// Runs the handlers registered for `event` from `source`.
    /// Returns false when nothing is registered for it.
    pub fn dispatch(&mut self, source: EventSource, event: &CollaboratorEvent) -> bool {
        let event_type = event.event_type();
        let mut handled = false;
        for registration in WIRING
            .iter()
            .filter(|r| r.source == source && r.event == event_type)
        {
            debug!("dispatch {:?}", registration);
            (registration.handler)(self, event);
            handled = true;
        }
        if !handled {
            trace!("no handler for {}/{}", source, event_type);
        }
        handled
    }
}

fn hash_changed(map: &mut MapSystem, event: &CollaboratorEvent) {
    if let CollaboratorEvent::HashChange { current, previous } = event {
        map.apply_hash_change(current, previous);
    }
}

// only moves the renderer made on its own; committed transforms already emitted
fn gfx_moved(map: &mut MapSystem, _: &CollaboratorEvent) {
    if !std::mem::take(&mut map.move_emitted) {
        map.events.emit(MapEvent::Move);
    }
}

fn gfx_drawn(map: &mut MapSystem, _: &CollaboratorEvent) {
    map.redraw.frame_drawn();
    map.move_emitted = false;
    let applied = map.process_loads();
    if applied > 0 {
        debug!("applied {} load(s) after draw", applied);
    }
    map.update_hash();
    // `full` for legacy receivers
    map.events.emit(MapEvent::Draw { full: true });
}

fn data_merged(map: &mut MapSystem, event: &CollaboratorEvent) {
    if let CollaboratorEvent::Merge {
        entity_ids: Some(ids),
    } = event
    {
        map.deps.renderer.mark_data_dirty(OSM_LAYER, ids);
    }
    map.redraw.deferred();
}

fn staging_changed(map: &mut MapSystem, event: &CollaboratorEvent) {
    if let CollaboratorEvent::StagingChange { entity_ids } = event {
        let editor = map.deps.editor.clone();
        // deleted entities are skipped
        for id in entity_ids {
            if editor.has_entity(id).is_some() {
                editor.touch(id);
                map.deps.filters.clear_entity(id);
            }
        }
    }
    map.redraw.immediate();
}

fn history_jumped(map: &mut MapSystem, event: &CollaboratorEvent) {
    if let CollaboratorEvent::HistoryJump {
        prev_index,
        curr_index,
    } = *event
    {
        map.history_jump(prev_index, curr_index);
    }
}

fn filters_changed(map: &mut MapSystem, _: &CollaboratorEvent) {
    map.deps.renderer.mark_layers_dirty(&[OSM_LAYER]);
    map.redraw.immediate();
}

fn datasets_changed(map: &mut MapSystem, _: &CollaboratorEvent) {
    map.deps
        .renderer
        .mark_layers_dirty(&[RAPID_LAYER, RAPID_OVERLAY_LAYER]);
    map.redraw.immediate();
}

fn locale_changed(map: &mut MapSystem, _: &CollaboratorEvent) {
    // labels can be on any layer
    map.deps.renderer.mark_scene_dirty();
    map.redraw.immediate();
}

fn redraw_now(map: &mut MapSystem, _: &CollaboratorEvent) {
    map.redraw.immediate();
}
