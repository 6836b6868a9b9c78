// Query-time index variants (C4, SPEC_FULL.md §4.4). All four share one
// contract: `locate(pattern)` returns the state reached by reading
// `pattern` from the source, or `None` if no such state exists.

mod heavy_path;
mod heavy_tree;
mod heavy_tree_pos;
mod simple;

pub use heavy_path::HeavyPathDawg;
pub use heavy_tree::HeavyTree;
pub use heavy_tree_pos::HeavyTreePos;
pub use simple::SimpleDawg;

use crate::ids::NodeIndex;

pub trait FullTextIndex {
    fn locate(&self, pattern: &[u8]) -> Option<NodeIndex>;
    fn num_bytes(&self) -> u64;
}
