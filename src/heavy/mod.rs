// Heavy-path decomposition of a frozen DAWG (C3, SPEC_FULL.md §4.3).
//
// Implemented as a single free function over the frozen graph's index
// arrays rather than as a method that mutates state objects, so the
// immutable post-freeze contract (SPEC_FULL.md §5) stays obvious: nothing
// here can write back into a `FrozenDawg`. The reference implementation
// repeats this topological-sort-plus-path-count block once per index
// class; this crate factors it into one routine that every C4 variant
// reads from instead, which is the one place this codebase's structure
// deliberately diverges from the reference it was built against (see
// DESIGN.md).

use std::collections::VecDeque;

use crate::byte_map::SortedByteMap;
use crate::dawg::FrozenDawg;
use crate::ids::NodeIndex;

pub struct HeavyDecomposition {
    n: usize,
    source: NodeIndex,
    sink: NodeIndex,
    /// `end()` at the sink (no heavy child) and nowhere else.
    heavy_child: Vec<NodeIndex>,
    path_cnt: Vec<u64>,
    light_edges: Vec<SortedByteMap<NodeIndex>>,
    /// Packed little-endian heavy-edge labels, up to 8 deep.
    head: Vec<u64>,
    /// Text offset such that `text[pos[x]..]` starts with the heavy path's labels.
    pos: Vec<u64>,
    /// Heavy edges remaining between `x` and the sink, capped at 8 — the
    /// number of `head[x]`'s low bytes that are real labels rather than the
    /// sink's zero padding.
    heavy_remain: Vec<u8>,
}

impl HeavyDecomposition {
    pub fn compute(dawg: &FrozenDawg) -> Self {
        let n = dawg.n_states();
        let source = dawg.initial();
        let text_len = dawg.text().len() as u64;

        let topo_order = topological_order(dawg);
        debug_assert_eq!(topo_order.len(), n, "topological sort dropped states");
        let sink = *topo_order.last().expect("DAWG always has at least one state");
        debug_assert_eq!(sink, dawg.sink(), "topological sink disagrees with build-time sink");

        let mut heavy_child = vec![NodeIndex::end(); n];
        let mut path_cnt = vec![0u64; n];
        let mut light_edges: Vec<SortedByteMap<NodeIndex>> =
            (0..n).map(|_| SortedByteMap::empty()).collect();
        let mut head = vec![0u64; n];
        let mut pos = vec![0u64; n];
        let mut heavy_remain = vec![0u8; n];

        for &x in topo_order.iter().rev() {
            let children = dawg.children(x).items().collect::<Vec<_>>();
            if children.is_empty() {
                path_cnt[x.index()] = 1;
                pos[x.index()] = text_len;
                continue;
            }

            let mut heavy_label = 0u8;
            let mut path_cnt_max = 0u64;
            let mut total = 0u64;
            for &(key, y) in &children {
                total += path_cnt[y.index()];
                if path_cnt[y.index()] > path_cnt_max {
                    path_cnt_max = path_cnt[y.index()];
                    heavy_child[x.index()] = y;
                    heavy_label = key;
                }
            }
            path_cnt[x.index()] = total;
            debug_assert!(path_cnt[x.index()] >= 1 && path_cnt[x.index()] <= n as u64);

            let light: Vec<(u8, NodeIndex)> = children
                .into_iter()
                .filter(|&(key, _)| key != heavy_label)
                .collect();
            light_edges[x.index()] = SortedByteMap::from_sorted_pairs(light);

            let y = heavy_child[x.index()];
            head[x.index()] = heavy_label as u64 | (head[y.index()] << 8);
            pos[x.index()] = pos[y.index()]
                .checked_sub(1)
                .expect("heavy path longer than the text it was built from");
            heavy_remain[x.index()] = (heavy_remain[y.index()] as u32 + 1).min(8) as u8;
        }

        HeavyDecomposition {
            n,
            source,
            sink,
            heavy_child,
            path_cnt,
            light_edges,
            head,
            pos,
            heavy_remain,
        }
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn source(&self) -> NodeIndex {
        self.source
    }

    pub fn sink(&self) -> NodeIndex {
        self.sink
    }

    pub fn heavy_child(&self, x: NodeIndex) -> Option<NodeIndex> {
        let y = self.heavy_child[x.index()];
        if y.is_end() {
            None
        } else {
            Some(y)
        }
    }

    pub fn heavy_children(&self) -> &[NodeIndex] {
        &self.heavy_child
    }

    pub fn path_cnt(&self, x: NodeIndex) -> u64 {
        self.path_cnt[x.index()]
    }

    pub fn light_edges(&self, x: NodeIndex) -> &SortedByteMap<NodeIndex> {
        &self.light_edges[x.index()]
    }

    pub fn into_light_edges(self) -> Vec<SortedByteMap<NodeIndex>> {
        self.light_edges
    }

    pub fn head(&self, x: NodeIndex) -> u64 {
        self.head[x.index()]
    }

    pub fn heads(&self) -> &[u64] {
        &self.head
    }

    pub fn pos(&self, x: NodeIndex) -> u64 {
        self.pos[x.index()]
    }

    pub fn positions(&self) -> &[u64] {
        &self.pos
    }

    /// Number of `head(x)`'s low bytes that are real heavy-edge labels
    /// rather than the sink's zero padding, capped at 8.
    pub fn heavy_remain(&self, x: NodeIndex) -> u8 {
        self.heavy_remain[x.index()]
    }

    pub fn heavy_remains(&self) -> &[u8] {
        &self.heavy_remain
    }
}

fn topological_order(dawg: &FrozenDawg) -> Vec<NodeIndex> {
    let n = dawg.n_states();
    let mut in_degree = vec![0u32; n];
    for i in 0..n {
        for (_, y) in dawg.children(NodeIndex::new(i)).items() {
            in_degree[y.index()] += 1;
        }
    }

    let mut queue: VecDeque<NodeIndex> = VecDeque::new();
    debug_assert_eq!(in_degree[dawg.initial().index()], 0);
    queue.push_back(dawg.initial());

    let mut order = Vec::with_capacity(n);
    while let Some(x) = queue.pop_front() {
        order.push(x);
        for (_, y) in dawg.children(x).items() {
            in_degree[y.index()] -= 1;
            if in_degree[y.index()] == 0 {
                queue.push_back(y);
            }
        }
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_head_matches_heavy_walk() {
        let dawg = FrozenDawg::build(b"aaaaaaaa");
        let decomp = HeavyDecomposition::compute(&dawg);
        let mut x = decomp.source();
        let mut expected = [0u8; 8];
        for slot in expected.iter_mut() {
            if let Some(y) = decomp.heavy_child(x) {
                // Recover the label from the light/heavy split: since this
                // text is all 'a', the heavy edge from any non-sink state
                // is always 'a'.
                *slot = b'a';
                x = y;
            } else {
                break;
            }
        }
        let head = decomp.head(decomp.source());
        let packed = u64::from_le_bytes(expected);
        assert_eq!(head, packed);
    }

    #[test]
    fn test_pos_reaches_text_end_at_sink() {
        let dawg = FrozenDawg::build(b"abcbc");
        let decomp = HeavyDecomposition::compute(&dawg);
        assert_eq!(decomp.pos(decomp.sink()), 5);
    }

    #[test]
    fn test_path_cnt_at_least_one_everywhere() {
        let dawg = FrozenDawg::build(b"mississippi");
        let decomp = HeavyDecomposition::compute(&dawg);
        for i in 0..decomp.n() {
            assert!(decomp.path_cnt(NodeIndex::new(i)) >= 1);
        }
    }

    #[test]
    fn test_heavy_remain_caps_at_eight_for_long_path() {
        let dawg = FrozenDawg::build(b"aaaaaaaa");
        let decomp = HeavyDecomposition::compute(&dawg);
        assert_eq!(decomp.heavy_remain(decomp.source()), 8);
    }

    #[test]
    fn test_heavy_remain_is_zero_at_sink() {
        let dawg = FrozenDawg::build(b"abcbc");
        let decomp = HeavyDecomposition::compute(&dawg);
        assert_eq!(decomp.heavy_remain(decomp.sink()), 0);
    }

    #[test]
    fn test_heavy_remain_counts_true_hops_on_short_path() {
        // "ab": source -(a)-> mid -(b)-> sink is the only path, 2 heavy hops.
        let dawg = FrozenDawg::build(b"ab");
        let decomp = HeavyDecomposition::compute(&dawg);
        assert_eq!(decomp.heavy_remain(decomp.source()), 2);
    }

    #[test]
    fn test_light_edges_exclude_heavy_label() {
        let dawg = FrozenDawg::build(b"abab");
        let decomp = HeavyDecomposition::compute(&dawg);
        for i in 0..decomp.n() {
            let x = NodeIndex::new(i);
            if let Some(heavy) = decomp.heavy_child(x) {
                for (_, y) in decomp.light_edges(x).items() {
                    assert_ne!(y, heavy, "light edge duplicated the heavy target");
                }
            }
        }
    }
}
