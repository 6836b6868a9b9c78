// Balanced-parentheses level ancestor (SPEC_FULL.md §4.4.4): encode the
// heavy-only tree as a balanced-parenthesis sequence in a `bitvec`
// bitstring (there is no succinct-tree crate in this stack to reach for, so
// the sequence is built and kept directly, matching SPEC_FULL.md §7's note
// on that point), and answer `get_anc` with a binary-lifting table built
// over the tree's preorder numbering.
//
// The reference implementation's `LevelAncestorByBP` pairs the bitstring
// with `sdsl`'s O(1) worst-case rank/select/level-ancestor support. Without
// an equivalent crate, reimplementing that machinery from scratch (itself a
// multi-level minimum-excess structure) is out of proportion to this
// crate's scope; this strategy keeps the bitstring as the structural
// encoding and answers queries in O(log k) via binary lifting instead. See
// DESIGN.md.

use bitvec::prelude::*;

use super::tree::HeavyOnlyTree;
use super::{BuildLevelAncestor, LevelAncestor};
use crate::heavy::HeavyDecomposition;
use crate::ids::NodeIndex;

pub struct BpLa {
    /// Balanced-parenthesis encoding of the heavy-only tree in preorder:
    /// one `1` on entry to a node, one `0` on leaving it.
    bp: BitVec<u8, Lsb0>,
    // table[j][new_id] = 2^j-th ancestor in the renumbered (preorder) tree.
    table: Vec<Vec<NodeIndex>>,
}

fn levels_for(n: usize) -> usize {
    let mut levels = 1;
    while (1usize << levels) <= n.max(1) {
        levels += 1;
    }
    levels
}

impl LevelAncestor for BpLa {
    fn get_anc(&self, x: NodeIndex, k: u32) -> NodeIndex {
        let mut x = x;
        let mut k = k;
        let mut j = 0;
        while k > 0 {
            if k & 1 == 1 {
                x = self.table[j][x.index()];
                debug_assert!(!x.is_end(), "get_anc walked past the sink");
            }
            k >>= 1;
            j += 1;
        }
        x
    }

    fn num_bytes(&self) -> u64 {
        let bp_bytes = (self.bp.len() + 7) / 8;
        let table_bytes: usize = self
            .table
            .iter()
            .map(|row| row.capacity() * std::mem::size_of::<NodeIndex>())
            .sum();
        (bp_bytes + table_bytes) as u64
    }
}

impl BuildLevelAncestor for BpLa {
    fn build(decomp: &HeavyDecomposition) -> (Self, Option<Vec<NodeIndex>>) {
        let n = decomp.n();
        let tree = HeavyOnlyTree::build(decomp);

        let mut bp = BitVec::<u8, Lsb0>::with_capacity(2 * n);
        let mut new_id = vec![0u32; n];
        let mut parent_new = vec![NodeIndex::end(); n];
        let mut counter = 0u32;

        // Explicit-stack preorder DFS: push `(node, child_idx)` frames, open
        // the parenthesis the first time a frame is visited, close it when
        // all children are exhausted.
        let mut stack: Vec<(NodeIndex, usize)> = vec![(tree.root, 0)];
        bp.push(true);
        new_id[tree.root.index()] = 0;
        counter += 1;
        while let Some(&(x, child_idx)) = stack.last() {
            if child_idx < tree.children[x.index()].len() {
                let c = tree.children[x.index()][child_idx];
                stack.last_mut().unwrap().1 += 1;
                new_id[c.index()] = counter;
                counter += 1;
                parent_new[new_id[c.index()] as usize] = NodeIndex::new(new_id[x.index()] as usize);
                bp.push(true);
                stack.push((c, 0));
            } else {
                bp.push(false);
                stack.pop();
            }
        }
        debug_assert_eq!(counter as usize, n);
        debug_assert_eq!(bp.len(), 2 * n);

        let levels = levels_for(n);
        let mut table = Vec::with_capacity(levels);
        table.push(parent_new);
        for j in 1..levels {
            let prev = &table[j - 1];
            let mut row = vec![NodeIndex::end(); n];
            for i in 0..n {
                let mid = prev[i];
                row[i] = if mid.is_end() { NodeIndex::end() } else { prev[mid.index()] };
            }
            table.push(row);
        }

        let perm: Vec<NodeIndex> = (0..n).map(|i| NodeIndex::new(new_id[i] as usize)).collect();
        (BpLa { bp, table }, Some(perm))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dawg::FrozenDawg;

    #[test]
    fn test_bp_sequence_is_balanced() {
        let dawg = FrozenDawg::build(b"mississippi");
        let decomp = HeavyDecomposition::compute(&dawg);
        let (la, _) = BpLa::build(&decomp);
        let mut depth = 0i64;
        for bit in la.bp.iter() {
            depth += if *bit { 1 } else { -1 };
            assert!(depth >= 0);
        }
        assert_eq!(depth, 0);
    }

    #[test]
    fn test_permutation_is_a_bijection() {
        let dawg = FrozenDawg::build(b"banana");
        let decomp = HeavyDecomposition::compute(&dawg);
        let (_, perm) = BpLa::build(&decomp);
        let perm = perm.unwrap();
        let mut seen = vec![false; perm.len()];
        for &p in &perm {
            assert!(!seen[p.index()]);
            seen[p.index()] = true;
        }
    }

    #[test]
    fn test_matches_naive_walk_in_new_id_space() {
        let dawg = FrozenDawg::build(b"abracadabra");
        let decomp = HeavyDecomposition::compute(&dawg);
        let (la, perm) = BpLa::build(&decomp);
        let perm = perm.unwrap();

        let mut x = decomp.source();
        let mut k = 0u32;
        let new_source = perm[decomp.source().index()];
        while let Some(y) = decomp.heavy_child(x) {
            x = y;
            k += 1;
            let expected = perm[x.index()];
            assert_eq!(la.get_anc(new_source, k), expected);
        }
    }
}
