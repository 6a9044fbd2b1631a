pub mod easing;
pub mod transitions;

// Re-export commonly used types
pub use easing::EasingType;
pub use transitions::{TransformTransition, TransitionState};
