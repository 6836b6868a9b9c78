// Heavy-Tree DAWG, packed-head variant (SPEC_FULL.md §4.4.2). Generic over
// the level-ancestor strategy so the same query loop serves Naive,
// Doubling, Memo, HPD, and BP without duplication; SPEC_FULL.md §9 settles
// the renumbering question this genericity raises.

use crate::byte_map::SortedByteMap;
use crate::dawg::FrozenDawg;
use crate::heavy::HeavyDecomposition;
use crate::ids::NodeIndex;
use crate::la::{permute_node_index, reindex, BuildLevelAncestor, LevelAncestor};

use super::FullTextIndex;

pub struct HeavyTree<L> {
    source: NodeIndex,
    sink: NodeIndex,
    head: Vec<u64>,
    /// Real heavy-edge labels among `head[x]`'s low bytes, capped at 8; the
    /// rest is the sink's zero padding and must never feed the XOR trick.
    heavy_remain: Vec<u8>,
    light_edges: Vec<SortedByteMap<NodeIndex>>,
    la: L,
}

impl<L: BuildLevelAncestor> HeavyTree<L> {
    pub fn build(text: &[u8]) -> Self {
        Self::from_dawg(&FrozenDawg::build(text))
    }

    pub fn from_dawg(dawg: &FrozenDawg) -> Self {
        let decomp = HeavyDecomposition::compute(dawg);
        let n = decomp.n();
        let (la, perm) = L::build(&decomp);

        let (source, sink, head, heavy_remain, light_edges) = match perm {
            None => {
                let light_edges = (0..n)
                    .map(|i| decomp.light_edges(NodeIndex::new(i)).clone())
                    .collect();
                (
                    decomp.source(),
                    decomp.sink(),
                    decomp.heads().to_vec(),
                    decomp.heavy_remains().to_vec(),
                    light_edges,
                )
            }
            Some(perm) => {
                let source = permute_node_index(&perm, decomp.source());
                let sink = permute_node_index(&perm, decomp.sink());
                let head = reindex(&perm, decomp.heads());
                let heavy_remain = reindex(&perm, decomp.heavy_remains());
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
                (source, sink, head, heavy_remain, light_edges)
            }
        };

        HeavyTree {
            source,
            sink,
            head,
            heavy_remain,
            light_edges,
            la,
        }
    }

    pub fn source(&self) -> NodeIndex {
        self.source
    }

    pub fn sink(&self) -> NodeIndex {
        self.sink
    }
}

impl<L: LevelAncestor> FullTextIndex for HeavyTree<L> {
    fn locate(&self, pattern: &[u8]) -> Option<NodeIndex> {
        let mut x = self.source;
        let mut i = 0usize;
        loop {
            if i == pattern.len() {
                return Some(x);
            }
            let remaining = pattern.len() - i;
            let chunk_len = remaining.min(8).min(self.heavy_remain[x.index()] as usize);
            let mut buf = [0u8; 8];
            buf[..chunk_len].copy_from_slice(&pattern[i..i + chunk_len]);
            let p_word = u64::from_le_bytes(buf);
            let xor = p_word ^ self.head[x.index()];
            let lcp = ((xor.trailing_zeros() / 8) as usize).min(chunk_len);

            if lcp > 0 {
                x = self.la.get_anc(x, lcp as u32);
                i += lcp;
            }
            if i == pattern.len() {
                return Some(x);
            }
            if lcp < 8 {
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
        let mut size = (self.head.capacity() * size_of::<u64>()) as u64;
        size += (self.heavy_remain.capacity() * size_of::<u8>()) as u64;
        size += self.light_edges.iter().map(|m| m.num_bytes()).sum::<u64>();
        size += self.la.num_bytes();
        size
    }
}
