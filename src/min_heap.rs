use alloc::vec::Vec;

#[derive(Clone, Debug)]
struct Node<T, K> {
    elem: T,
    key: K,
}

/// An array-backed binary min-heap of elements ordered by a separate key.
///
/// Each element is inserted together with a priority key; [`pop_min`]
/// removes the element with the smallest key. Elements with equal keys pop
/// in no particular order.
///
/// # Examples
///
/// ```rust
/// use rh_hash::MinHeap;
///
/// let mut heap = MinHeap::new();
/// heap.insert("late", 30u64);
/// heap.insert("early", 10);
/// heap.insert("middle", 20);
///
/// assert_eq!(heap.pop_min(), Some("early"));
/// assert_eq!(heap.pop_min(), Some("middle"));
/// assert_eq!(heap.pop_min(), Some("late"));
/// assert_eq!(heap.pop_min(), None);
/// ```
///
/// [`pop_min`]: MinHeap::pop_min
#[derive(Clone, Debug)]
pub struct MinHeap<T, K = u64> {
    nodes: Vec<Node<T, K>>,
}

impl<T, K> MinHeap<T, K>
where
    K: Ord,
{
    /// Creates an empty heap.
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Creates an empty heap with space for at least `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Returns the number of elements in the heap.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the heap contains no elements.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Inserts an element with the given priority key.
    pub fn insert(&mut self, elem: T, key: K) {
        self.nodes.push(Node { elem, key });
        self.sift_up(self.nodes.len() - 1);
    }

    /// Returns a reference to the element with the smallest key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rh_hash::MinHeap;
    ///
    /// let mut heap = MinHeap::new();
    /// assert_eq!(heap.find_min(), None);
    ///
    /// heap.insert('b', 2u64);
    /// heap.insert('a', 1);
    /// assert_eq!(heap.find_min(), Some(&'a'));
    /// ```
    pub fn find_min(&self) -> Option<&T> {
        self.nodes.first().map(|node| &node.elem)
    }

    /// Removes and returns the element with the smallest key.
    pub fn pop_min(&mut self) -> Option<T> {
        if self.nodes.is_empty() {
            return None;
        }
        let node = self.nodes.swap_remove(0);
        if !self.nodes.is_empty() {
            self.sift_down(0);
        }
        Some(node.elem)
    }

    fn sift_up(&mut self, mut pos: usize) {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if self.nodes[pos].key >= self.nodes[parent].key {
                break;
            }
            self.nodes.swap(pos, parent);
            pos = parent;
        }
    }

    fn sift_down(&mut self, mut pos: usize) {
        let len = self.nodes.len();
        loop {
            let left = 2 * pos + 1;
            let right = left + 1;
            let mut smallest = pos;
            if left < len && self.nodes[left].key < self.nodes[smallest].key {
                smallest = left;
            }
            if right < len && self.nodes[right].key < self.nodes[smallest].key {
                smallest = right;
            }
            if smallest == pos {
                break;
            }
            self.nodes.swap(pos, smallest);
            pos = smallest;
        }
    }
}

impl<T, K> Default for MinHeap<T, K>
where
    K: Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use rand::SeedableRng;
    use rand::TryRngCore;
    use rand::rngs::OsRng;
    use rand::rngs::SmallRng;
    use rand::seq::SliceRandom;

    use super::*;

    #[test]
    fn empty_heap() {
        let mut heap: MinHeap<u64> = MinHeap::new();
        assert!(heap.is_empty());
        assert_eq!(heap.len(), 0);
        assert_eq!(heap.find_min(), None);
        assert_eq!(heap.pop_min(), None);
    }

    #[test]
    fn pops_in_key_order() {
        let mut rng = SmallRng::seed_from_u64(OsRng.try_next_u64().unwrap_or(0));
        let mut keys: Vec<u64> = (0..1000).collect();
        keys.shuffle(&mut rng);

        let mut heap = MinHeap::new();
        for &key in &keys {
            heap.insert(key * 10, key);
        }
        assert_eq!(heap.len(), 1000);

        for expected in 0..1000u64 {
            assert_eq!(heap.find_min(), Some(&(expected * 10)));
            assert_eq!(heap.pop_min(), Some(expected * 10));
        }
        assert!(heap.is_empty());
    }

    #[test]
    fn duplicate_keys_all_surface() {
        let mut heap = MinHeap::new();
        heap.insert("a", 5u64);
        heap.insert("b", 5);
        heap.insert("c", 1);
        heap.insert("d", 5);

        assert_eq!(heap.pop_min(), Some("c"));

        let mut rest = Vec::new();
        while let Some(elem) = heap.pop_min() {
            rest.push(elem);
        }
        rest.sort_unstable();
        assert_eq!(rest, ["a", "b", "d"]);
    }

    #[test]
    fn interleaved_insert_and_pop() {
        let mut heap = MinHeap::with_capacity(8);
        heap.insert(30u32, 30u64);
        heap.insert(10, 10);
        assert_eq!(heap.pop_min(), Some(10));

        heap.insert(20, 20);
        heap.insert(5, 5);
        assert_eq!(heap.pop_min(), Some(5));
        assert_eq!(heap.pop_min(), Some(20));
        assert_eq!(heap.pop_min(), Some(30));
        assert_eq!(heap.pop_min(), None);
    }

    #[test]
    fn non_numeric_keys() {
        let mut heap: MinHeap<u32, &str> = MinHeap::new();
        heap.insert(2, "banana");
        heap.insert(1, "apple");
        heap.insert(3, "cherry");

        assert_eq!(heap.pop_min(), Some(1));
        assert_eq!(heap.pop_min(), Some(2));
        assert_eq!(heap.pop_min(), Some(3));
    }
}
