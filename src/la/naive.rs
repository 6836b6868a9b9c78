// Naive level ancestor: walk the heavy child pointer one hop at a time
// (SPEC_FULL.md §4.4.4, first row of the strategy table). O(k) per query,
// O(N) space, no renumbering.

use super::{BuildLevelAncestor, LevelAncestor};
use crate::heavy::HeavyDecomposition;
use crate::ids::NodeIndex;

pub struct NaiveLa {
    heavy_child: Vec<NodeIndex>,
}

impl LevelAncestor for NaiveLa {
    fn get_anc(&self, x: NodeIndex, k: u32) -> NodeIndex {
        let mut x = x;
        for _ in 0..k {
            x = self.heavy_child[x.index()];
            debug_assert!(!x.is_end(), "get_anc walked past the sink");
        }
        x
    }

    fn num_bytes(&self) -> u64 {
        (self.heavy_child.capacity() * std::mem::size_of::<NodeIndex>()) as u64
    }
}

impl BuildLevelAncestor for NaiveLa {
    fn build(decomp: &HeavyDecomposition) -> (Self, Option<Vec<NodeIndex>>) {
        let heavy_child = decomp.heavy_children().to_vec();
        (NaiveLa { heavy_child }, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dawg::FrozenDawg;

    #[test]
    fn test_zero_steps_is_identity() {
        let dawg = FrozenDawg::build(b"banana");
        let decomp = HeavyDecomposition::compute(&dawg);
        let (la, perm) = NaiveLa::build(&decomp);
        assert!(perm.is_none());
        assert_eq!(la.get_anc(decomp.source(), 0), decomp.source());
    }

    #[test]
    fn test_matches_repeated_heavy_child() {
        let dawg = FrozenDawg::build(b"mississippi");
        let decomp = HeavyDecomposition::compute(&dawg);
        let (la, _) = NaiveLa::build(&decomp);
        let mut x = decomp.source();
        for k in 1..=3u32 {
            x = decomp.heavy_child(x).unwrap();
            assert_eq!(la.get_anc(decomp.source(), k), x);
        }
    }
}
