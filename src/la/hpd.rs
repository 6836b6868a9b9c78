// Heavy-path decomposition ("HPD") level ancestor (SPEC_FULL.md §4.4.4):
// apply a second, ordinary heavy-path decomposition to the heavy-only tree,
// renumber states so each resulting path occupies a contiguous, ascending
// id range (the path's root-ward end gets the largest id in the range), and
// answer `get_anc(x, k)` by either staying on `x`'s path (`x + k`, when `k`
// doesn't leave the path) or jumping to the next path up and recursing.
//
// This is the simpler, path-jumping version of the technique rather than
// the reference implementation's ladder/jump-pointer refinement, which
// pushes the worst case down to true O(1) at the cost of a second doubling
// table per path. The simpler version is amortised O(1) per query and O(N)
// total, and is what SPEC_FULL.md §4.4.4 describes directly (see
// DESIGN.md).

use super::tree::HeavyOnlyTree;
use super::{BuildLevelAncestor, LevelAncestor};
use crate::heavy::HeavyDecomposition;
use crate::ids::NodeIndex;

pub struct HpdLa {
    // Indexed by the *new* id. Distance from this state to the root-ward
    // end of its path.
    path_remain: Vec<u32>,
    // Indexed by the *new* id. Where to continue once `path_remain` is
    // exhausted: the new id of the real tree-parent of this path's
    // root-ward end. `NodeIndex::end()` only at the overall root's path.
    jump: Vec<NodeIndex>,
}

impl LevelAncestor for HpdLa {
    fn get_anc(&self, x: NodeIndex, k: u32) -> NodeIndex {
        let mut x = x;
        let mut k = k;
        loop {
            let remain = self.path_remain[x.index()];
            if k <= remain {
                return NodeIndex::new(x.index() + k as usize);
            }
            k -= remain + 1;
            x = self.jump[x.index()];
            debug_assert!(!x.is_end(), "get_anc walked past the sink");
        }
    }

    fn num_bytes(&self) -> u64 {
        use std::mem::size_of;
        (self.path_remain.capacity() * size_of::<u32>()
            + self.jump.capacity() * size_of::<NodeIndex>()) as u64
    }
}

impl BuildLevelAncestor for HpdLa {
    fn build(decomp: &HeavyDecomposition) -> (Self, Option<Vec<NodeIndex>>) {
        let n = decomp.n();
        let tree = HeavyOnlyTree::build(decomp);

        // Assign new ids by walking each path from its root-ward end down
        // to its leaf-ward end handing out *decreasing* ids, so that
        // within one path a smaller-id descendant plus `k` lands on its
        // size-`k` ancestor.
        let mut new_id = vec![0u32; n];
        let mut path_remain = vec![0u32; n];
        // Old id of the real tree-parent to jump to once a path ends, kept
        // in old-id space until the full permutation is known.
        let mut jump_old = vec![NodeIndex::end(); n];

        let mut counter: i64 = n as i64 - 1;
        let mut worklist = vec![tree.root];
        while let Some(start) = worklist.pop() {
            let head_id = counter;
            // Every node on this chain jumps to the same place once its
            // `path_remain` is exhausted: the real tree-parent of the
            // chain's root-ward end (`start`), not of whichever node the
            // query happened to start from.
            let jump_target = decomp.heavy_child(start).unwrap_or(NodeIndex::end());
            let mut x = start;
            loop {
                new_id[x.index()] = counter as u32;
                path_remain[x.index()] = (head_id - counter) as u32;
                jump_old[x.index()] = jump_target;
                counter -= 1;

                let heaviest = tree.heaviest_child(x);
                for &c in &tree.children[x.index()] {
                    if Some(c) != heaviest {
                        worklist.push(c);
                    }
                }
                match heaviest {
                    Some(next) => x = next,
                    None => break,
                }
            }
        }
        debug_assert_eq!(counter, -1);

        let perm: Vec<NodeIndex> = (0..n).map(|i| NodeIndex::new(new_id[i] as usize)).collect();

        // Reindex path_remain into new-id order, and translate jump
        // targets (only meaningful at path heads, but harmless elsewhere)
        // into new-id space, also reindexed.
        let mut path_remain_new = vec![0u32; n];
        let mut jump_new = vec![NodeIndex::end(); n];
        for old in 0..n {
            let nid = new_id[old] as usize;
            path_remain_new[nid] = path_remain[old];
            jump_new[nid] = super::permute_node_index(&perm, jump_old[old]);
        }

        (
            HpdLa {
                path_remain: path_remain_new,
                jump: jump_new,
            },
            Some(perm),
        )
    }
}
