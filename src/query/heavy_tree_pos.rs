// Heavy-Tree DAWG, text-position variant (SPEC_FULL.md §4.4.3). Same query
// structure as the packed-head variant, but the lcp comes from directly
// comparing bytes of T against P instead of an 8-byte XOR trick, so it is
// not limited to 8 bytes per step. Per SPEC_FULL.md §9, this is the
// variant the top-level facade builds by default.
//
// The reference's `get_lcp` performs an unaligned load past the nominal
// bounds of its buffers and relies on implementation-defined behaviour at
// the end of the text; here the comparison length is bounded by
// `min(text-remaining, pattern-remaining)` before any byte is read, so
// there is never an out-of-bounds access to begin with.

use crate::byte_map::SortedByteMap;
use crate::dawg::FrozenDawg;
use crate::heavy::HeavyDecomposition;
use crate::ids::NodeIndex;
use crate::la::{permute_node_index, reindex, BuildLevelAncestor, LevelAncestor};

use super::FullTextIndex;

pub struct HeavyTreePos<L> {
    source: NodeIndex,
    sink: NodeIndex,
    pos: Vec<u64>,
    light_edges: Vec<SortedByteMap<NodeIndex>>,
    la: L,
    text: Box<[u8]>,
}

impl<L: BuildLevelAncestor> HeavyTreePos<L> {
    pub fn build(text: &[u8]) -> Self {
        Self::from_dawg(&FrozenDawg::build(text))
    }

    pub fn from_dawg(dawg: &FrozenDawg) -> Self {
        let decomp = HeavyDecomposition::compute(dawg);
        let n = decomp.n();
        let (la, perm) = L::build(&decomp);

        let (source, sink, pos, light_edges) = match perm {
            None => {
                let light_edges = (0..n)
                    .map(|i| decomp.light_edges(NodeIndex::new(i)).clone())
                    .collect();
                (decomp.source(), decomp.sink(), decomp.positions().to_vec(), light_edges)
            }
            Some(perm) => {
                let source = permute_node_index(&perm, decomp.source());
                let sink = permute_node_index(&perm, decomp.sink());
                let pos = reindex(&perm, decomp.positions());
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
                (source, sink, pos, light_edges)
            }
        };

        HeavyTreePos {
            source,
            sink,
            pos,
            light_edges,
            la,
            text: dawg.text().to_vec().into_boxed_slice(),
        }
    }

    pub fn source(&self) -> NodeIndex {
        self.source
    }

    pub fn sink(&self) -> NodeIndex {
        self.sink
    }

    fn lcp_at(&self, x: NodeIndex, pattern: &[u8], i: usize) -> usize {
        let start = self.pos[x.index()] as usize;
        let text_remaining = self.text.len() - start;
        let pattern_remaining = pattern.len() - i;
        let bound = text_remaining.min(pattern_remaining);
        let mut lcp = 0;
        while lcp < bound && self.text[start + lcp] == pattern[i + lcp] {
            lcp += 1;
        }
        lcp
    }
}

impl<L: LevelAncestor> FullTextIndex for HeavyTreePos<L> {
    fn locate(&self, pattern: &[u8]) -> Option<NodeIndex> {
        let mut x = self.source;
        let mut i = 0usize;
        loop {
            if i == pattern.len() {
                return Some(x);
            }
            let lcp = self.lcp_at(x, pattern, i);

            if lcp > 0 {
                x = self.la.get_anc(x, lcp as u32);
                i += lcp;
            }
            if i == pattern.len() {
                return Some(x);
            }
            // The heavy path from `x` ran out before the pattern did, so a
            // light edge must carry the next byte; if the heavy path still
            // had bytes to offer, `lcp_at` would have consumed them above.
            match self.light_edges[x.index()].find(pattern[i]) {
                Some(y) => {
                    x = y;
                    i += 1;
                }
                None => return None,
            }
        }
    }

    fn num_bytes(&self) -> u64 {
        use std::mem::size_of;
        let mut size = (self.pos.capacity() * size_of::<u64>()) as u64;
        size += self.light_edges.iter().map(|m| m.num_bytes()).sum::<u64>();
        size += self.la.num_bytes();
        size += self.text.len() as u64;
        size
    }
}
