// Shared scaffolding for the renumbering strategies (`HpdLa`, `BpLa`):
// the heavy-only tree rooted at the sink. Every non-sink state has exactly
// one heavy child, so treating `heavy_child` as a parent pointer turns the
// heavy edges into a tree rather than a DAG, which is exactly what the
// reference implementation's `tree[heavy_edge_to[i]].push_back(i)`
// construction builds before running a second, smaller heavy-path
// decomposition or a DFS over it.

use crate::heavy::HeavyDecomposition;
use crate::ids::NodeIndex;

pub struct HeavyOnlyTree {
    pub root: NodeIndex,
    /// `children[y]` holds every `x` with `heavy_child[x] == y`, ascending
    /// by `x` for determinism.
    pub children: Vec<Vec<NodeIndex>>,
    pub subtree_size: Vec<u32>,
}

impl HeavyOnlyTree {
    pub fn build(decomp: &HeavyDecomposition) -> Self {
        let n = decomp.n();
        let mut children: Vec<Vec<NodeIndex>> = vec![Vec::new(); n];
        for i in 0..n {
            let x = NodeIndex::new(i);
            if let Some(y) = decomp.heavy_child(x) {
                children[y.index()].push(x);
            }
        }

        let root = decomp.sink();
        let mut subtree_size = vec![0u32; n];
        // Iterative post-order over the tree via an explicit stack; the
        // tree can be as deep as the text is long, so recursion is unsafe.
        let mut stack = vec![(root, 0usize)];
        let mut order = Vec::with_capacity(n);
        while let Some((x, child_idx)) = stack.pop() {
            if child_idx < children[x.index()].len() {
                let c = children[x.index()][child_idx];
                stack.push((x, child_idx + 1));
                stack.push((c, 0));
            } else {
                order.push(x);
            }
        }
        for x in order {
            let mut size = 1u32;
            for &c in &children[x.index()] {
                size += subtree_size[c.index()];
            }
            subtree_size[x.index()] = size;
        }

        HeavyOnlyTree {
            root,
            children,
            subtree_size,
        }
    }

    /// The child of `x` with the largest subtree (ties broken by smallest
    /// node id), or `None` if `x` is a leaf of this tree.
    pub fn heaviest_child(&self, x: NodeIndex) -> Option<NodeIndex> {
        self.children[x.index()]
            .iter()
            .copied()
            .max_by_key(|&c| (self.subtree_size[c.index()], std::cmp::Reverse(c.index())))
    }
}
