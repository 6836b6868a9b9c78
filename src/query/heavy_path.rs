// Heavy-Path DAWG (SPEC_FULL.md §4.4.5): the heavy-only tree is flattened
// into one contiguous byte string `hh_string`, so `get_anc(x, lcp)`
// degenerates to plain array addition `x + lcp` instead of a level-ancestor
// lookup. This reuses the same second-level heavy-path-on-the-heavy-tree
// renumbering as `la::HpdLa`, inlined here rather than shared, because the
// two differ in what they store per path (a level-ancestor jump table vs. a
// flat label string) even though the renumbering itself is identical.

use crate::byte_map::SortedByteMap;
use crate::dawg::FrozenDawg;
use crate::heavy::HeavyDecomposition;
use crate::ids::NodeIndex;
use crate::la::{permute_node_index, HeavyOnlyTree};

use super::FullTextIndex;

pub struct HeavyPathDawg {
    source: NodeIndex,
    sink: NodeIndex,
    hh_string: Box<[u8]>,
    path_remain: Vec<u32>,
    jump: Vec<NodeIndex>,
    light_edges: Vec<SortedByteMap<NodeIndex>>,
}

impl HeavyPathDawg {
    pub fn build(text: &[u8]) -> Self {
        Self::from_dawg(&FrozenDawg::build(text))
    }

    pub fn from_dawg(dawg: &FrozenDawg) -> Self {
        let decomp = HeavyDecomposition::compute(dawg);
        let n = decomp.n();
        let tree = HeavyOnlyTree::build(&decomp);

        let mut new_id = vec![0u32; n];
        let mut path_remain = vec![0u32; n];
        let mut jump_old = vec![NodeIndex::end(); n];

        let mut counter: i64 = n as i64 - 1;
        let mut worklist = vec![tree.root];
        while let Some(start) = worklist.pop() {
            let head_id = counter;
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

        let mut path_remain_new = vec![0u32; n];
        let mut jump_new = vec![NodeIndex::end(); n];
        let mut hh_string = vec![0u8; n];
        for old in 0..n {
            let nid = new_id[old] as usize;
            path_remain_new[nid] = path_remain[old];
            jump_new[nid] = permute_node_index(&perm, jump_old[old]);
            hh_string[nid] = (decomp.head(NodeIndex::new(old)) & 0xFF) as u8;
        }

        let source = permute_node_index(&perm, decomp.source());
        let sink = permute_node_index(&perm, decomp.sink());
        let mut light_edges: Vec<SortedByteMap<NodeIndex>> =
            (0..n).map(|_| SortedByteMap::empty()).collect();
        for i in 0..n {
            let remapped: Vec<(u8, NodeIndex)> = decomp
                .light_edges(NodeIndex::new(i))
                .items()
                .map(|(b, y)| (b, permute_node_index(&perm, y)))
                .collect();
            light_edges[perm[i].index()] = SortedByteMap::from_sorted_pairs(remapped);
        }

        HeavyPathDawg {
            source,
            sink,
            hh_string: hh_string.into_boxed_slice(),
            path_remain: path_remain_new,
            jump: jump_new,
            light_edges,
        }
    }

    pub fn source(&self) -> NodeIndex {
        self.source
    }

    pub fn sink(&self) -> NodeIndex {
        self.sink
    }
}

impl FullTextIndex for HeavyPathDawg {
    fn locate(&self, pattern: &[u8]) -> Option<NodeIndex> {
        let mut x = self.source;
        let mut i = 0usize;
        loop {
            if i == pattern.len() {
                return Some(x);
            }
            let pattern_remaining = pattern.len() - i;
            let path_len = self.path_remain[x.index()] as usize + 1;
            let chunk_len = pattern_remaining.min(8).min(path_len);

            let mut lcp = 0;
            while lcp < chunk_len && self.hh_string[x.index() + lcp] == pattern[i + lcp] {
                lcp += 1;
            }

            if lcp > 0 {
                x = if lcp == path_len {
                    self.jump[x.index()]
                } else {
                    NodeIndex::new(x.index() + lcp)
                };
                i += lcp;
                debug_assert!(!x.is_end(), "locate walked past the sink");
            }
            if i == pattern.len() {
                return Some(x);
            }
            if lcp < chunk_len {
                match self.light_edges[x.index()].find(pattern[i]) {
                    Some(y) => {
                        x = y;
                        i += 1;
                    }
                    None => return None,
                }
            }
        }
    }

    fn num_bytes(&self) -> u64 {
        use std::mem::size_of;
        let mut size = self.hh_string.len() as u64;
        size += (self.path_remain.capacity() * size_of::<u32>()) as u64;
        size += (self.jump.capacity() * size_of::<NodeIndex>()) as u64;
        size += self.light_edges.iter().map(|m| m.num_bytes()).sum::<u64>();
        size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::SimpleDawg;

    #[test]
    fn test_matches_simple_dawg_on_banana() {
        let text = b"banana";
        let heavy = HeavyPathDawg::build(text);
        let simple = SimpleDawg::build(text);
        for start in 0..text.len() {
            for end in start..=text.len() {
                assert_eq!(
                    heavy.locate(&text[start..end]).is_some(),
                    simple.locate(&text[start..end]).is_some()
                );
            }
        }
        for bad in [&b"c"[..], &b"ab"[..], &b"bab"[..]] {
            assert!(heavy.locate(bad).is_none());
        }
    }

    #[test]
    fn test_abcbc_scenario() {
        let heavy = HeavyPathDawg::build(b"abcbc");
        assert!(heavy.locate(b"bcbc").is_some());
        assert!(heavy.locate(b"cbcb").is_none());
    }

    #[test]
    fn test_crosses_a_path_boundary() {
        let text = b"mississippi";
        let heavy = HeavyPathDawg::build(text);
        let simple = SimpleDawg::build(text);
        assert_eq!(
            heavy.locate(b"ississippi").is_some(),
            simple.locate(b"ississippi").is_some()
        );
    }
}
