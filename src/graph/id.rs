use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! graph_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

graph_id!(
    /// Unique identifier for a wall node.
    NodeId,
    "n"
);
graph_id!(
    /// Unique identifier for a wall.
    WallId,
    "w"
);
graph_id!(
    /// Unique identifier for an opening.
    OpeningId,
    "o"
);

/// Source of fresh identifiers for graph entities.
///
/// Mutating operations take an `IdSource` instead of minting IDs themselves,
/// so callers control how IDs are allocated across snapshots.
pub trait IdSource {
    /// Returns a raw identifier never handed out before by this source.
    fn next_raw(&mut self) -> u64;

    fn node_id(&mut self) -> NodeId {
        NodeId(self.next_raw())
    }

    fn wall_id(&mut self) -> WallId {
        WallId(self.next_raw())
    }

    fn opening_id(&mut self) -> OpeningId {
        OpeningId(self.next_raw())
    }
}

/// Monotonic counter shared by every entity kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    #[must_use]
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Creates a source whose first ID is greater than `max_used`.
    #[must_use]
    pub fn after(max_used: u64) -> Self {
        Self {
            next: max_used.saturating_add(1),
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdSource for SequentialIds {
    fn next_raw(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_ids_are_unique_across_kinds() {
        let mut ids = SequentialIds::new();
        let n = ids.node_id();
        let w = ids.wall_id();
        let o = ids.opening_id();
        assert_eq!((n.0, w.0, o.0), (1, 2, 3));
    }

    #[test]
    fn after_skips_used_range() {
        let mut ids = SequentialIds::after(41);
        assert_eq!(ids.wall_id(), WallId(42));
    }

    #[test]
    fn display_is_prefixed() {
        assert_eq!(NodeId(7).to_string(), "n7");
        assert_eq!(WallId(3).to_string(), "w3");
    }
}
