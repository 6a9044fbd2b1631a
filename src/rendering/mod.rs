pub mod scheduler;

pub use scheduler::{RedrawScheduler, RedrawUrgency};
