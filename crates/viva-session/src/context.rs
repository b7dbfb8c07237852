//! **Context slot** — lets the active interview view annotate outgoing turns.
//!
//! Exactly one provider can be installed at a time (a live-coding view, say,
//! contributing the current editor contents and program output). The slot is
//! owned by the controller, not ambient state, and the provider is invoked
//! fresh at each send — its output is never cached across turns.

use std::sync::Arc;

/// Zero-argument provider returning supplementary text for the next turn, or
/// `None` when there is nothing worth attaching right now.
pub type ContextFn = Arc<dyn Fn() -> Option<String> + Send + Sync>;

/// Single mutable slot for the active view's context provider.
#[derive(Clone, Default)]
pub struct ContextSlot {
    provider: Option<ContextFn>,
}

impl ContextSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `provider`, replacing any previous one.
    pub fn set(&mut self, provider: ContextFn) {
        self.provider = Some(provider);
    }

    /// Remove the provider; subsequent turns carry no context.
    pub fn clear(&mut self) {
        self.provider = None;
    }

    pub fn is_set(&self) -> bool {
        self.provider.is_some()
    }

    /// Ask the provider for its current output. Computed on demand so the
    /// snapshot reflects the view's state at the moment of sending.
    pub fn snapshot(&self) -> Option<String> {
        self.provider.as_ref().and_then(|f| f())
    }
}

impl std::fmt::Debug for ContextSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextSlot")
            .field("provider", &self.provider.is_some())
            .finish()
    }
}
