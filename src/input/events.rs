use crate::data::hash::HashParams;
use crate::traits::EntityId;
use std::collections::VecDeque;
use std::fmt;

/// Notifications published by the map
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    /// The transform changed (can fire frequently)
    Move,
    /// A redraw just completed. `full` is always true; kept for legacy receivers.
    Draw { full: bool },
    /// A display option changed (highlight edits, area fill)
    MapChange,
}

impl MapEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            MapEvent::Move => "move",
            MapEvent::Draw { .. } => "draw",
            MapEvent::MapChange => "mapchange",
        }
    }
}

/// Subsystems whose notifications the map reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventSource {
    UrlHash,
    Gfx,
    Editor,
    Filters,
    Rapid,
    L10n,
    Context,
    Imagery,
    Photos,
    Scene,
    Styles,
    Osm,
}

impl fmt::Display for EventSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventSource::UrlHash => "urlhash",
            EventSource::Gfx => "gfx",
            EventSource::Editor => "editor",
            EventSource::Filters => "filters",
            EventSource::Rapid => "rapid",
            EventSource::L10n => "l10n",
            EventSource::Context => "context",
            EventSource::Imagery => "imagery",
            EventSource::Photos => "photos",
            EventSource::Scene => "scene",
            EventSource::Styles => "styles",
            EventSource::Osm => "osm",
        };
        f.write_str(name)
    }
}

/// Notifications emitted by collaborators and delivered to the map
#[derive(Debug, Clone, PartialEq)]
pub enum CollaboratorEvent {
    /// The url hash changed; carries the full current and previous maps
    HashChange {
        current: HashParams,
        previous: HashParams,
    },
    /// The renderer moved the view
    Move,
    /// The renderer finished a frame
    Draw,
    /// Remote data merged into the graph
    Merge { entity_ids: Option<Vec<EntityId>> },
    /// The staging graph changed; ids of every touched entity
    StagingChange { entity_ids: Vec<EntityId> },
    /// Undo, redo or restore moved the history cursor
    HistoryJump { prev_index: usize, curr_index: usize },
    FilterChange,
    DatasetChange,
    LocaleChange,
    ModeChange,
    ImageryChange,
    PhotoChange,
    LayerChange,
    StyleChange,
    AuthChange,
}

impl CollaboratorEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            CollaboratorEvent::HashChange { .. } => "hashchange",
            CollaboratorEvent::Move => "move",
            CollaboratorEvent::Draw => "draw",
            CollaboratorEvent::Merge { .. } => "merge",
            CollaboratorEvent::StagingChange { .. } => "stagingchange",
            CollaboratorEvent::HistoryJump { .. } => "historyjump",
            CollaboratorEvent::FilterChange => "filterchange",
            CollaboratorEvent::DatasetChange => "datasetchange",
            CollaboratorEvent::LocaleChange => "localechange",
            CollaboratorEvent::ModeChange => "modechange",
            CollaboratorEvent::ImageryChange => "imagerychange",
            CollaboratorEvent::PhotoChange => "photochange",
            CollaboratorEvent::LayerChange => "layerchange",
            CollaboratorEvent::StyleChange => "stylechange",
            CollaboratorEvent::AuthChange => "authchange",
        }
    }
}

/// Event callback type
pub type EventCallback = Box<dyn Fn(&MapEvent) + Send + Sync>;

/// Queues published events and fans them out to listeners
#[derive(Default)]
pub struct EventManager {
    /// Event listeners by event type
    listeners: Vec<(&'static str, EventCallback)>,
    /// Event queue for processing
    event_queue: VecDeque<MapEvent>,
}

impl EventManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an event listener
    pub fn on<F>(&mut self, event_type: &'static str, callback: F)
    where
        F: Fn(&MapEvent) + Send + Sync + 'static,
    {
        self.listeners.push((event_type, Box::new(callback)));
    }

    /// Emit an event to the queue
    pub fn emit(&mut self, event: MapEvent) {
        self.event_queue.push_back(event);
    }

    /// Process all queued events
    pub fn process_events(&mut self) -> Vec<MapEvent> {
        let events: Vec<_> = self.event_queue.drain(..).collect();

        for event in &events {
            let event_type = event.event_type();
            for (_, callback) in self.listeners.iter().filter(|(t, _)| *t == event_type) {
                callback(event);
            }
        }

        events
    }

    /// Get number of pending events
    pub fn pending_events(&self) -> usize {
        self.event_queue.len()
    }
}

impl fmt::Debug for EventManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventManager")
            .field("listeners", &self.listeners.len())
            .field("event_queue", &self.event_queue)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_event_types() {
        assert_eq!(MapEvent::Move.event_type(), "move");
        assert_eq!(MapEvent::Draw { full: true }.event_type(), "draw");
        assert_eq!(
            CollaboratorEvent::HistoryJump {
                prev_index: 2,
                curr_index: 1
            }
            .event_type(),
            "historyjump"
        );
        assert_eq!(EventSource::UrlHash.to_string(), "urlhash");
    }

    #[test]
    fn test_listeners_receive_matching_events() {
        let mut manager = EventManager::new();
        let draws = Arc::new(AtomicUsize::new(0));
        let counter = draws.clone();
        manager.on("draw", move |event| {
            assert_eq!(event, &MapEvent::Draw { full: true });
            counter.fetch_add(1, Ordering::SeqCst);
        });

        manager.emit(MapEvent::Move);
        manager.emit(MapEvent::Draw { full: true });
        assert_eq!(manager.pending_events(), 2);

        let processed = manager.process_events();
        assert_eq!(processed.len(), 2);
        assert_eq!(draws.load(Ordering::SeqCst), 1);
        assert_eq!(manager.pending_events(), 0);
    }
}
