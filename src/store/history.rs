use std::collections::VecDeque;

use tracing::trace;

use crate::graph::WallGraph;

/// Number of snapshots kept by default, including the current one.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Bounded undo/redo stack of committed graph snapshots.
///
/// The entry under the cursor is the current state. Pushing after an undo
/// discards the redo branch; pushing past the limit drops the oldest entry.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<WallGraph>,
    cursor: usize,
    limit: usize,
}

impl History {
    /// Creates a history whose only entry is `initial`.
    #[must_use]
    pub fn new(initial: WallGraph, limit: usize) -> Self {
        let mut entries = VecDeque::new();
        entries.push_back(initial);
        Self {
            entries,
            cursor: 0,
            limit: limit.max(1),
        }
    }

    pub fn push(&mut self, snapshot: WallGraph) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push_back(snapshot);
        let mut dropped = 0_usize;
        while self.entries.len() > self.limit {
            self.entries.pop_front();
            dropped += 1;
        }
        if dropped > 0 {
            trace!(dropped, limit = self.limit, "history trimmed");
        }
        self.cursor = self.entries.len().saturating_sub(1);
    }

    /// Steps back one entry and returns it.
    pub fn undo(&mut self) -> Option<&WallGraph> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.entries.get(self.cursor)
    }

    /// Steps forward one entry and returns it.
    pub fn redo(&mut self) -> Option<&WallGraph> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        self.entries.get(self.cursor)
    }

    #[must_use]
    pub fn current(&self) -> Option<&WallGraph> {
        self.entries.get(self.cursor)
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }
}
