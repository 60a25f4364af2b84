//! Adjacency passes deferred to the next tick.

/// Scope of a deferred adjacency pass.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AdjustTarget {
    /// One location, by name.
    Location(String),
    /// Every valid location.
    All,
}

/// Single-slot queue for "recompute on the next tick".
///
/// Requests made before the slot drains replace each other; the last one wins
/// as written, scopes are never merged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeferredAdjust {
    pending: Option<AdjustTarget>,
}

impl DeferredAdjust {
    /// Empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a pass over `target`, replacing any pending request.
    pub fn request(&mut self, target: AdjustTarget) {
        self.pending = Some(target);
    }

    /// Pending target, if any.
    pub fn pending(&self) -> Option<&AdjustTarget> {
        self.pending.as_ref()
    }

    /// Whether a pass is waiting.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Remove and return the pending target. Subsequent calls return `None`
    /// until something new is requested.
    pub fn take(&mut self) -> Option<AdjustTarget> {
        self.pending.take()
    }
}
