//! Linear undo/redo over deep graph snapshots.

use crate::config::HistoryConfig;
use crate::graph::{BlockInstance, Connection, Graph};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Pan/zoom state of the canvas, carried along so undo restores the view too.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale: 1.0,
        }
    }
}

/// An owned, deep copy of the graph and view at one point in time.
///
/// Snapshots hold no references into the live graph; mutating the graph after
/// a commit never changes a committed state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryState {
    pub blocks: Vec<BlockInstance>,
    pub connections: Vec<Connection>,
    pub next_block_id: u64,
    pub next_connection_id: u64,
    #[serde(default)]
    pub view: ViewTransform,
}

/// The editor-facing name for a restorable state.
pub type GraphSnapshot = HistoryState;

/// A bounded list of snapshots with a cursor at the current state.
#[derive(Debug, Clone)]
pub struct History {
    states: Vec<HistoryState>,
    cursor: usize,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(HistoryConfig::default().capacity)
    }
}

impl History {
    /// A history retaining at most `capacity` states (at least one).
    pub fn new(capacity: usize) -> Self {
        Self {
            states: Vec::new(),
            cursor: 0,
            capacity: capacity.max(1),
        }
    }

    pub fn from_config(config: &HistoryConfig) -> Self {
        Self::new(config.capacity)
    }

    /// Deep-copies the graph and view into a state ready for `commit`.
    pub fn snapshot(graph: &Graph, view: ViewTransform) -> HistoryState {
        graph.snapshot(view)
    }

    /// Records a new current state.
    ///
    /// Any redo future is discarded. A state equal to the current one is not
    /// pushed again, so calling `commit` at every natural edit boundary is safe.
    pub fn commit(&mut self, state: HistoryState) {
        if !self.states.is_empty() {
            self.states.truncate(self.cursor + 1);
            if self.states[self.cursor] == state {
                trace!(cursor = self.cursor, "commit skipped, state unchanged");
                return;
            }
        }

        self.states.push(state);
        if self.states.len() > self.capacity {
            let overflow = self.states.len() - self.capacity;
            self.states.drain(..overflow);
            debug!(evicted = overflow, "oldest history states evicted");
        }
        self.cursor = self.states.len() - 1;
        debug!(cursor = self.cursor, len = self.states.len(), "history commit");
    }

    /// Snapshots `graph` and commits it.
    pub fn commit_graph(&mut self, graph: &Graph, view: ViewTransform) {
        self.commit(graph.snapshot(view));
    }

    /// Steps back one state. `None` at the oldest retained state.
    pub fn undo(&mut self) -> Option<HistoryState> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        debug!(cursor = self.cursor, "undo");
        self.states.get(self.cursor).cloned()
    }

    /// Steps forward one state. `None` at the newest state.
    pub fn redo(&mut self) -> Option<HistoryState> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        debug!(cursor = self.cursor, "redo");
        self.states.get(self.cursor).cloned()
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        !self.states.is_empty() && self.cursor + 1 < self.states.len()
    }

    pub fn current(&self) -> Option<&HistoryState> {
        self.states.get(self.cursor)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.states.clear();
        self.cursor = 0;
    }
}
