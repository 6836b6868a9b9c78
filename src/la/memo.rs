// Memoised level ancestor, up to 8 steps (SPEC_FULL.md §4.4.4): table[k][x]
// for k = 0..=8 gives O(1) lookup for k <= 8, the only range the
// packed-head variant (§4.4.2) ever asks for, since its heads are capped at
// 8 bytes. The text-position variant (§4.4.3) can ask for larger `k`; for
// that case `get_anc` falls back to repeated jumps of 8, degrading to
// O(k / 8) rather than O(1). No renumbering.

use super::{BuildLevelAncestor, LevelAncestor};
use crate::heavy::HeavyDecomposition;
use crate::ids::NodeIndex;

const MAX_MEMO: u32 = 8;

pub struct MemoLa {
    // table[k][x] = k-th heavy ancestor of x, k = 0..=MAX_MEMO.
    table: Vec<Vec<NodeIndex>>,
}

impl LevelAncestor for MemoLa {
    fn get_anc(&self, x: NodeIndex, k: u32) -> NodeIndex {
        if k <= MAX_MEMO {
            return self.table[k as usize][x.index()];
        }
        let mut x = x;
        let mut remaining = k;
        while remaining > MAX_MEMO {
            x = self.table[MAX_MEMO as usize][x.index()];
            debug_assert!(!x.is_end(), "get_anc walked past the sink");
            remaining -= MAX_MEMO;
        }
        self.table[remaining as usize][x.index()]
    }

    fn num_bytes(&self) -> u64 {
        self.table
            .iter()
            .map(|row| (row.capacity() * std::mem::size_of::<NodeIndex>()) as u64)
            .sum()
    }
}

impl BuildLevelAncestor for MemoLa {
    fn build(decomp: &HeavyDecomposition) -> (Self, Option<Vec<NodeIndex>>) {
        let n = decomp.n();
        let mut table = Vec::with_capacity(MAX_MEMO as usize + 1);
        table.push((0..n).map(NodeIndex::new).collect::<Vec<_>>());
        table.push(decomp.heavy_children().to_vec());
        for k in 2..=MAX_MEMO as usize {
            let prev = &table[k - 1];
            let one_hop = &table[1];
            let mut row = vec![NodeIndex::end(); n];
            for i in 0..n {
                let mid = prev[i];
                row[i] = if mid.is_end() { NodeIndex::end() } else { one_hop[mid.index()] };
            }
            table.push(row);
        }
        (MemoLa { table }, None)
    }
}
