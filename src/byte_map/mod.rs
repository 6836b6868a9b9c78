// Per-state outgoing-edge tables keyed by byte (C1, SPEC_FULL.md §4.1).
//
// Two forms are needed: a growable hash map used while the DAWG is being
// built online, and an immutable sorted map used by every query-time
// structure once the graph is frozen.

mod growable;
mod sorted;

pub use growable::GrowableByteMap;
pub use sorted::SortedByteMap;
