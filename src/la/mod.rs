// Level-ancestor strategies (C4 common interface, SPEC_FULL.md §4.4.4).
//
// `get_anc(x, k)` answers "walk `k` heavy edges forward from `x`", which is
// exactly a level-ancestor query on the heavy-only tree rooted at the sink
// (`heavy_child[x]` is that tree's parent pointer). Every strategy below
// implements this one query differently; `HeavyTree`/`HeavyTreePos` in
// `crate::query` are generic over the trait and don't care which.

mod bp;
mod doubling;
mod hpd;
mod memo;
mod naive;
mod tree;

pub use bp::BpLa;
pub use doubling::DoublingLa;
pub use hpd::HpdLa;
pub use memo::MemoLa;
pub use naive::NaiveLa;
pub(crate) use tree::HeavyOnlyTree;

use crate::heavy::HeavyDecomposition;
use crate::ids::NodeIndex;

/// Answers level-ancestor queries against the heavy-only tree of a
/// `HeavyDecomposition`. `x` and the returned node are expressed in
/// whatever id space this strategy uses internally; callers that hold a
/// renumbering (see `BuildLevelAncestor`) are responsible for translating
/// their own ids into that space first.
pub trait LevelAncestor {
    /// The node reached by following `k` heavy edges forward from `x`.
    /// `k` must not exceed the number of heavy edges between `x` and the
    /// sink; callers (the C4 query structures) never ask for more.
    fn get_anc(&self, x: NodeIndex, k: u32) -> NodeIndex;

    fn num_bytes(&self) -> u64;
}

/// Strategies that renumber states (to make heavy paths contiguous, or to
/// lay out a balanced-parenthesis sequence) return the permutation so the
/// caller can apply it uniformly to every other per-state array: light
/// edges, `source`, `sink`, `head`, `pos` (SPEC_FULL.md §9 open question).
///
/// `perm[old.index()]` is the new id for the state that used to be `old`.
/// Strategies that don't renumber (`NaiveLa`, `DoublingLa`, `MemoLa`) return
/// `None`.
pub trait BuildLevelAncestor: LevelAncestor + Sized {
    fn build(decomp: &HeavyDecomposition) -> (Self, Option<Vec<NodeIndex>>);
}

/// Apply a renumbering permutation to every array a `HeavyTree`/`HeavyTreePos`
/// builder threads through: light-edge tables (whose values are old ids),
/// and any other per-state `NodeIndex`-indexed/valued array.
pub(crate) fn permute_node_index(perm: &[NodeIndex], old: NodeIndex) -> NodeIndex {
    if old.is_end() {
        old
    } else {
        perm[old.index()]
    }
}

/// Reindex a per-state array from old id order into new id order, i.e.
/// `out[perm[i]] = arr[i]` for every old id `i`.
pub(crate) fn reindex<T: Clone>(perm: &[NodeIndex], arr: &[T]) -> Vec<T> {
    let mut out = arr.to_vec();
    for (old, value) in arr.iter().enumerate() {
        out[perm[old].index()] = value.clone();
    }
    out
}
