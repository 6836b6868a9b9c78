// Exponential-doubling (binary-lifting) level ancestor (SPEC_FULL.md
// §4.4.4). The strategy table scopes this to `j = 0..3` for the packed-head
// variant, where `k` never exceeds 8; the text-position variant (§4.4.3)
// can ask for arbitrarily large `k`, so this implementation keeps doubling
// up to `ceil(log2(n))` levels rather than hard-coding 4, which is the
// natural generalization of the same technique and serves both callers with
// one table. No renumbering.

use super::{BuildLevelAncestor, LevelAncestor};
use crate::heavy::HeavyDecomposition;
use crate::ids::NodeIndex;

pub struct DoublingLa {
    // table[j][x] = 2^j-th heavy ancestor of x, or `end()` past the sink.
    table: Vec<Vec<NodeIndex>>,
}

fn levels_for(n: usize) -> usize {
    let mut levels = 1;
    while (1usize << levels) <= n.max(1) {
        levels += 1;
    }
    levels
}

impl LevelAncestor for DoublingLa {
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
        self.table
            .iter()
            .map(|row| (row.capacity() * std::mem::size_of::<NodeIndex>()) as u64)
            .sum()
    }
}

impl BuildLevelAncestor for DoublingLa {
    fn build(decomp: &HeavyDecomposition) -> (Self, Option<Vec<NodeIndex>>) {
        let n = decomp.n();
        let levels = levels_for(n);
        let mut table = Vec::with_capacity(levels);
        table.push(decomp.heavy_children().to_vec());
        for j in 1..levels {
            let prev = &table[j - 1];
            let mut row = vec![NodeIndex::end(); n];
            for i in 0..n {
                let mid = prev[i];
                row[i] = if mid.is_end() { NodeIndex::end() } else { prev[mid.index()] };
            }
            table.push(row);
        }
        (DoublingLa { table }, None)
    }
}
