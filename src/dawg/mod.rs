// Online construction of the suffix automaton (DAWG) of a byte string (C2,
// SPEC_FULL.md §4.2) — the canonical Blumer-style algorithm with suffix
// links and node cloning, generalized from the char-based construction this
// crate's lineage previously built to operate over raw bytes.

use anyhow::{bail, Result};
use kdam::tqdm;

use crate::byte_map::{GrowableByteMap, SortedByteMap};
use crate::ids::NodeIndex;

struct BuildState {
    len: u32,
    slink: NodeIndex,
    ch: GrowableByteMap<NodeIndex>,
}

/// Incremental builder. `Dawg::build` is the only entry point most callers
/// need; the step-by-step `extend` API exists so tests can inspect
/// intermediate states.
pub struct DawgBuilder {
    states: Vec<BuildState>,
    last: NodeIndex,
}

impl DawgBuilder {
    pub fn new() -> Self {
        let initial = BuildState {
            len: 0,
            slink: NodeIndex::end(),
            ch: GrowableByteMap::new(),
        };
        DawgBuilder {
            states: vec![initial],
            last: NodeIndex::new(0),
        }
    }

    fn push_state(&mut self, len: u32, slink: NodeIndex) -> NodeIndex {
        let id = NodeIndex::new(self.states.len());
        self.states.push(BuildState {
            len,
            slink,
            ch: GrowableByteMap::new(),
        });
        id
    }

    fn slink_opt(&self, x: NodeIndex) -> Option<NodeIndex> {
        let s = self.states[x.index()].slink;
        if s.is_end() {
            None
        } else {
            Some(s)
        }
    }

    /// Extend the automaton with one more byte of text, following the
    /// current suffix (`last`) forward.
    pub fn extend(&mut self, byte: u8) {
        let cur_len = self.states[self.last.index()].len + 1;
        let cur = self.push_state(cur_len, NodeIndex::end());

        let mut p = Some(self.last);
        while let Some(state) = p {
            if self.states[state.index()].ch.find(byte).is_some() {
                break;
            }
            self.states[state.index()].ch.add(byte, cur);
            p = self.slink_opt(state);
        }

        match p {
            None => {
                self.states[cur.index()].slink = NodeIndex::new(0);
            }
            Some(p_state) => {
                let q = self.states[p_state.index()].ch.find(byte).unwrap();
                if self.states[p_state.index()].len + 1 == self.states[q.index()].len {
                    self.states[cur.index()].slink = q;
                } else {
                    let clone_len = self.states[p_state.index()].len + 1;
                    let q_ch = self.states[q.index()].ch.clone();
                    let q_slink = self.states[q.index()].slink;
                    let clone = self.push_state(clone_len, q_slink);
                    self.states[clone.index()].ch = q_ch;

                    let mut walker = Some(p_state);
                    while let Some(w) = walker {
                        match self.states[w.index()].ch.find(byte) {
                            Some(t) if t == q => {
                                self.states[w.index()].ch.add(byte, clone);
                                walker = self.slink_opt(w);
                            }
                            _ => break,
                        }
                    }

                    self.states[q.index()].slink = clone;
                    self.states[cur.index()].slink = clone;
                }
            }
        }

        self.last = cur;
    }

    fn freeze(self, text: &[u8]) -> FrozenDawg {
        let sink = self.last;
        let n = self.states.len();
        let mut len = Vec::with_capacity(n);
        let mut slink = Vec::with_capacity(n);
        let mut ch = Vec::with_capacity(n);
        for s in self.states {
            len.push(s.len);
            slink.push(s.slink);
            ch.push(SortedByteMap::from_sorted_pairs(s.ch.items()));
        }
        FrozenDawg {
            len,
            slink,
            ch,
            initial: NodeIndex::new(0),
            sink,
            text: text.to_vec().into_boxed_slice(),
        }
    }

    /// Build the automaton for `text` and freeze it into its read-only,
    /// query-ready representation.
    pub fn build(text: &[u8]) -> FrozenDawg {
        let mut builder = DawgBuilder::new();
        for &byte in tqdm!(text.iter()) {
            builder.extend(byte);
        }
        builder.freeze(text)
    }
}

impl Default for DawgBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The frozen, immutable DAWG: read-only arrays indexed by `NodeIndex`.
/// Every query-time structure in `crate::query` is derived from one of
/// these.
pub struct FrozenDawg {
    len: Vec<u32>,
    slink: Vec<NodeIndex>,
    ch: Vec<SortedByteMap<NodeIndex>>,
    initial: NodeIndex,
    sink: NodeIndex,
    text: Box<[u8]>,
}

impl FrozenDawg {
    pub fn build(text: &[u8]) -> Self {
        DawgBuilder::build(text)
    }

    #[inline]
    pub fn n_states(&self) -> usize {
        self.len.len()
    }

    pub fn n_edges(&self) -> usize {
        self.ch.iter().map(|m| m.len()).sum()
    }

    #[inline]
    pub fn initial(&self) -> NodeIndex {
        self.initial
    }

    #[inline]
    pub fn sink(&self) -> NodeIndex {
        self.sink
    }

    #[inline]
    pub fn len(&self, x: NodeIndex) -> u32 {
        self.len[x.index()]
    }

    #[inline]
    pub fn slink(&self, x: NodeIndex) -> Option<NodeIndex> {
        let s = self.slink[x.index()];
        if s.is_end() {
            None
        } else {
            Some(s)
        }
    }

    #[inline]
    pub fn children(&self, x: NodeIndex) -> &SortedByteMap<NodeIndex> {
        &self.ch[x.index()]
    }

    pub fn text(&self) -> &[u8] {
        &self.text
    }

    /// Follow exactly the bytes of `pattern` from the initial state,
    /// ignoring suffix links, failing the moment a transition is absent.
    /// This is the same walk `SimpleDawg` performs; exposed here too so
    /// tests and `check_invariants` can use it without constructing a
    /// query-time index.
    pub fn locate(&self, pattern: &[u8]) -> Option<NodeIndex> {
        let mut node = self.initial;
        for &byte in pattern {
            node = self.children(node).find(byte)?;
        }
        Some(node)
    }

    pub fn num_bytes(&self) -> u64 {
        use std::mem::size_of;
        let mut size = (self.len.capacity() * size_of::<u32>()) as u64;
        size += (self.slink.capacity() * size_of::<NodeIndex>()) as u64;
        size += self.ch.iter().map(|m| m.num_bytes()).sum::<u64>();
        size += self.text.len() as u64;
        size
    }

    /// Explicit, always-compiled validation of the invariants in
    /// SPEC_FULL.md §3 / §8. `debug_assert!`s inline during construction
    /// catch bugs cheaply in development; this is the caller-facing
    /// counterpart for code (and tests) that want a `Result` instead of an
    /// abort.
    pub fn check_invariants(&self) -> Result<()> {
        let n = self.n_states();
        if n == 0 {
            bail!("DAWG has no states");
        }
        if self.len(self.initial) != 0 {
            bail!("initial state has nonzero length");
        }
        if self.slink(self.initial).is_some() {
            bail!("initial state has a suffix link");
        }
        for i in 0..n {
            let x = NodeIndex::new(i);
            if x == self.initial {
                continue;
            }
            match self.slink(x) {
                None => bail!("non-initial state {} has no suffix link", i),
                Some(s) => {
                    if self.len(s) >= self.len(x) {
                        bail!(
                            "suffix link of state {} does not strictly decrease length",
                            i
                        );
                    }
                }
            }
        }
        let text_len = self.text.len();
        if n > 2 * text_len + 1 {
            bail!("state count {} exceeds bound 2n+1={}", n, 2 * text_len + 1);
        }
        let edges = self.n_edges();
        if edges > 3 * text_len {
            bail!("edge count {} exceeds bound 3n={}", edges, 3 * text_len);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_build_bab() {
        let dawg = FrozenDawg::build(b"bab");
        assert_eq!(dawg.len(NodeIndex::new(0)), 0);
        assert!(dawg.check_invariants().is_ok());
        assert!(dawg.locate(b"ab").is_some());
        assert!(dawg.locate(b"ba").is_some());
        assert!(dawg.locate(b"bb").is_none());
    }

    #[test]
    fn test_build_abcbc_matches_spec_scenario() {
        let dawg = FrozenDawg::build(b"abcbc");
        assert!(dawg.locate(b"bcbc").is_some());
        assert!(dawg.locate(b"cbcb").is_none());
    }

    #[test]
    fn test_build_banana_all_substrings() {
        let text = b"banana";
        let dawg = FrozenDawg::build(text);
        for start in 0..text.len() {
            for end in start..=text.len() {
                assert!(dawg.locate(&text[start..end]).is_some());
            }
        }
        for bad in [&b"c"[..], &b"ab"[..], &b"bab"[..]] {
            assert!(dawg.locate(bad).is_none());
        }
    }

    #[test]
    fn test_mississippi_distinguishes_states() {
        let dawg = FrozenDawg::build(b"mississippi");
        let issi = dawg.locate(b"issi").unwrap();
        let issis = dawg.locate(b"issis").unwrap();
        let issip = dawg.locate(b"issip").unwrap();
        assert!(issis != issip);
        // "issi" is a prefix of both more specific occurrences, so its state
        // differs from either of them (it is the clone shared by both).
        assert!(issi != issis || issi != issip);
    }

    #[test]
    fn test_size_bound_holds() {
        let text = b"the quick brown fox jumps over the lazy dog, again and again";
        let dawg = FrozenDawg::build(text);
        assert!(dawg.n_states() <= 2 * text.len() + 1);
        assert!(dawg.n_edges() <= 3 * text.len());
        assert!(dawg.check_invariants().is_ok());
    }

    #[test]
    fn test_idempotent_build() {
        let text = b"abracadabra";
        let a = FrozenDawg::build(text);
        let b = FrozenDawg::build(text);
        assert_eq!(a.n_states(), b.n_states());
        let mut a_lens: Vec<u32> = (0..a.n_states()).map(|i| a.len(NodeIndex::new(i))).collect();
        let mut b_lens: Vec<u32> = (0..b.n_states()).map(|i| b.len(NodeIndex::new(i))).collect();
        a_lens.sort();
        b_lens.sort();
        assert_eq!(a_lens, b_lens);
    }

    #[test]
    fn test_empty_pattern_returns_initial() {
        let dawg = FrozenDawg::build(b"xyz");
        assert_eq!(dawg.locate(b""), Some(dawg.initial()));
    }

    #[test]
    fn test_empty_text() {
        let dawg = FrozenDawg::build(b"");
        assert_eq!(dawg.n_states(), 1);
        assert_eq!(dawg.locate(b""), Some(dawg.initial()));
        assert!(dawg.locate(b"a").is_none());
    }

    proptest! {
        // Testable property 1 (SPEC_FULL.md §8): every substring of T is
        // found, and a pattern built to be guaranteed absent is not.
        #[test]
        fn test_every_substring_is_found(text in prop::collection::vec(0u8..4, 1..64)) {
            let dawg = FrozenDawg::build(&text);
            for start in 0..text.len() {
                for end in start..=text.len() {
                    prop_assert!(dawg.locate(&text[start..end]).is_some());
                }
            }
        }

        #[test]
        fn test_pattern_with_foreign_byte_is_absent(text in prop::collection::vec(0u8..4, 1..64)) {
            let mut pattern = text.clone();
            pattern.push(255);
            let dawg = FrozenDawg::build(&text);
            prop_assert!(dawg.locate(&pattern).is_none());
        }
    }
}
