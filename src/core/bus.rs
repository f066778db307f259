use std::collections::VecDeque;

use rustc_hash::FxHashMap;

use crate::catalog::CompilerDescriptor;
use crate::models::{BufferId, Colour, CompileResult, PanelId};

/// Cross-panel events. Panels never call each other directly; everything
/// flows through the hub's queue, which fans each event out to every open
/// panel and then forwards it to the embedding workspace.
#[derive(Debug, Clone)]
pub enum WorkspaceEvent {
    /// A source buffer's text changed.
    EditorChange { buffer: BufferId, text: String },
    /// Per-source-line colours for a buffer (1-based line -> colour).
    Colours {
        buffer: BufferId,
        colours: FxHashMap<u32, Colour>,
    },
    /// A compile panel opened.
    CompilerOpen { panel: PanelId },
    /// A compile panel closed; dependents should unsubscribe.
    CompilerClose { panel: PanelId },
    /// A compile response was applied to a panel's output.
    CompileResult {
        panel: PanelId,
        compiler: CompilerDescriptor,
        result: CompileResult,
    },
}

/// Single-threaded event queue. Publishing while an event is being handled
/// appends; the hub keeps pumping until the queue drains.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<WorkspaceEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&mut self, event: WorkspaceEvent) {
        self.events.push_back(event);
    }

    pub fn pop(&mut self) -> Option<WorkspaceEvent> {
        self.events.pop_front()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
