pub mod events;
pub mod wiring;

// Re-export the essential types
pub use events::{CollaboratorEvent, EventManager, EventSource, MapEvent};
pub use wiring::{Registration, WIRING};
