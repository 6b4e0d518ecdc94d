//! Call-scoped event sink
//!
//! Every participant receives the [`PluginContext`] of the invocation it
//! serves and reports what it did through it. Nothing here is global, so two
//! concurrent invocations never see each other's events.

use std::fmt;
use std::sync::Arc;

/// Something a rewrite rule did (or failed to do) during one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleEvent {
    /// A rule changed a document
    DocumentRewritten {
        rule: &'static str,
        document: String,
    },
    /// No pipeline declares path conditions, so no change set was requested
    ChangeSetSkipped,
    /// Changed files were retrieved for path filtering
    ChangeSetFetched { files: usize },
    /// A rule gave up and produced no result
    Failed { rule: &'static str, error: String },
}

/// Type for event handlers
pub type EventHandler = Arc<dyn Fn(RuleEvent) + Send + Sync>;

/// Per-invocation context handed to every chain participant
#[derive(Clone, Default)]
pub struct PluginContext {
    handlers: Vec<EventHandler>,
}

impl PluginContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an event handler
    pub fn with_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(RuleEvent) + Send + Sync + 'static,
    {
        self.handlers.push(Arc::new(handler));
        self
    }

    /// Emit an event to all handlers
    pub fn emit(&self, event: RuleEvent) {
        for handler in &self.handlers {
            handler(event.clone());
        }
    }
}

impl fmt::Debug for PluginContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginContext")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
