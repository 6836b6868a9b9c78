use std::cmp::Ordering;
use std::mem::size_of;

/// Immutable byte -> V map over two parallel, ascending-sorted arrays.
/// Used by every query-time structure after the DAWG is frozen; unlike
/// `GrowableByteMap`, it has no sentinel and no probing, so it is free to
/// hold every byte value including 0.
#[derive(Clone)]
pub struct SortedByteMap<V> {
    keys: Vec<u8>,
    values: Vec<V>,
}

// Below this many remaining candidates, a linear scan beats another
// binary-search halving (matches the reference implementation's border).
const LINEAR_SEARCH_BORDER: usize = 3;

impl<V: Copy> SortedByteMap<V> {
    pub fn empty() -> Self {
        SortedByteMap {
            keys: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Build from pairs already sorted ascending by key (e.g. the output of
    /// `GrowableByteMap::items`).
    pub fn from_sorted_pairs(pairs: Vec<(u8, V)>) -> Self {
        debug_assert!(pairs.windows(2).all(|w| w[0].0 < w[1].0));
        let mut keys = Vec::with_capacity(pairs.len());
        let mut values = Vec::with_capacity(pairs.len());
        for (k, v) in pairs {
            keys.push(k);
            values.push(v);
        }
        SortedByteMap { keys, values }
    }

    pub fn find(&self, byte: u8) -> Option<V> {
        let mut l = 0usize;
        let mut r = self.keys.len();
        while r - l > LINEAR_SEARCH_BORDER {
            let mid = l + (r - l) / 2;
            match self.keys[mid].cmp(&byte) {
                Ordering::Equal => return Some(self.values[mid]),
                Ordering::Less => l = mid,
                Ordering::Greater => r = mid,
            }
        }
        for i in l..r {
            match self.keys[i].cmp(&byte) {
                Ordering::Equal => return Some(self.values[i]),
                Ordering::Greater => return None,
                Ordering::Less => {}
            }
        }
        None
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn items(&self) -> impl Iterator<Item = (u8, V)> + '_ {
        self.keys.iter().copied().zip(self.values.iter().copied())
    }

    pub fn num_bytes(&self) -> u64 {
        (self.keys.capacity() * size_of::<u8>()
            + self.values.capacity() * size_of::<V>()
            + size_of::<Self>()) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(pairs: &[(u8, u32)]) -> SortedByteMap<u32> {
        SortedByteMap::from_sorted_pairs(pairs.to_vec())
    }

    #[test]
    fn test_find_hits_and_misses() {
        let m = build(&[(1, 10), (5, 50), (9, 90), (200, 2)]);
        assert_eq!(m.find(5), Some(50));
        assert_eq!(m.find(200), Some(2));
        assert_eq!(m.find(0), None);
        assert_eq!(m.find(6), None);
        assert_eq!(m.find(255), None);
    }

    #[test]
    fn test_empty_map() {
        let m: SortedByteMap<u32> = SortedByteMap::empty();
        assert_eq!(m.find(0), None);
        assert_eq!(m.len(), 0);
    }

    #[test]
    fn test_large_map_binary_search() {
        let pairs: Vec<(u8, u32)> = (0..=255u8).map(|b| (b, b as u32 * 2)).collect();
        let m = build(&pairs);
        for b in 0..=255u8 {
            assert_eq!(m.find(b), Some(b as u32 * 2));
        }
    }
}
