use crate::traits::Renderer;
use log::trace;
use std::sync::Arc;

/// How soon a repaint is needed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RedrawUrgency {
    /// Fold into the next animation-aligned frame (streaming data)
    Deferred,
    /// Paint as soon as possible (direct user feedback)
    Immediate,
}

/// Forwards redraw requests to the renderer, dropping ones already covered
/// by a pending request.
///
/// A pending immediate request absorbs everything. A pending deferred
/// request absorbs deferred ones and is upgraded by an immediate one.
pub struct RedrawScheduler {
    renderer: Arc<dyn Renderer>,
    pending: Option<RedrawUrgency>,
}

impl RedrawScheduler {
    pub fn new(renderer: Arc<dyn Renderer>) -> Self {
        Self {
            renderer,
            pending: None,
        }
    }

    /// Returns true when the request reached the renderer
    pub fn request(&mut self, urgency: RedrawUrgency) -> bool {
        if matches!(self.pending, Some(pending) if pending >= urgency) {
            trace!("redraw {:?} coalesced into pending {:?}", urgency, self.pending);
            return false;
        }

        self.pending = Some(urgency);
        match urgency {
            RedrawUrgency::Immediate => self.renderer.request_immediate_redraw(),
            RedrawUrgency::Deferred => self.renderer.request_deferred_redraw(),
        }
        true
    }

    pub fn immediate(&mut self) -> bool {
        self.request(RedrawUrgency::Immediate)
    }

    pub fn deferred(&mut self) -> bool {
        self.request(RedrawUrgency::Deferred)
    }

    /// A frame finished; the next request goes through again
    pub fn frame_drawn(&mut self) {
        self.pending = None;
    }

    pub fn pending(&self) -> Option<RedrawUrgency> {
        self.pending
    }
}

impl std::fmt::Debug for RedrawScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedrawScheduler")
            .field("pending", &self.pending)
            .finish()
    }
}
