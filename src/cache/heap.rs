//! Eviction Index Module
//!
//! Indexed binary min-heap over cache keys, ordered by last access.
//!
//! The heap does not own entries. Every time a key changes slot the owning
//! table is told through [`HeapPositions`], so an entry always knows its own
//! slot and can be re-sorted or removed from the middle in O(log n).

use tokio::time::Instant;

// == Recency ==
/// Ordering key of a heap slot: oldest access first.
///
/// `seq` is a monotonically increasing access counter. It only matters when
/// two accesses carry the same `last_used` stamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Recency {
    pub last_used: Instant,
    pub seq: u64,
}

// == Heap Positions ==
/// Receives slot updates for keys held in the index.
pub trait HeapPositions {
    /// Records that `key` now lives at slot `pos`.
    fn set_heap_pos(&mut self, key: &str, pos: usize);
}

#[derive(Debug, Clone)]
struct Slot {
    key: String,
    recency: Recency,
}

// == Eviction Index ==
/// Min-heap of keys by [`Recency`]. The root is the least recently used key.
#[derive(Debug, Default)]
pub struct EvictionIndex {
    slots: Vec<Slot>,
}

impl EvictionIndex {
    // == Constructor ==
    /// Creates a new empty index.
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Creates an empty index with room for `capacity` keys.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
        }
    }

    // == Push ==
    /// Inserts `key` and reports its final slot (and any displaced keys) to `table`.
    pub fn push<P: HeapPositions>(&mut self, key: String, recency: Recency, table: &mut P) {
        let pos = self.slots.len();
        table.set_heap_pos(&key, pos);
        self.slots.push(Slot { key, recency });
        self.sift_up(pos, table);
    }

    // == Pop ==
    /// Removes and returns the least recently used key.
    pub fn pop<P: HeapPositions>(&mut self, table: &mut P) -> Option<String> {
        self.remove(0, table)
    }

    // == Remove ==
    /// Removes the key at slot `pos`, wherever it sits in the heap.
    ///
    /// Returns None if `pos` is out of bounds.
    pub fn remove<P: HeapPositions>(&mut self, pos: usize, table: &mut P) -> Option<String> {
        if pos >= self.slots.len() {
            return None;
        }

        let last = self.slots.len() - 1;
        if pos != last {
            self.swap(pos, last, table);
        }
        let removed = self.slots.pop().map(|slot| slot.key);

        if pos < self.slots.len() {
            self.fix(pos, table);
        }
        removed
    }

    // == Update ==
    /// Changes the recency of the key at slot `pos` and restores heap order.
    pub fn update<P: HeapPositions>(&mut self, pos: usize, recency: Recency, table: &mut P) {
        if let Some(slot) = self.slots.get_mut(pos) {
            slot.recency = recency;
            self.fix(pos, table);
        }
    }

    // == Peek ==
    /// Returns the least recently used key without removing it.
    pub fn peek(&self) -> Option<&str> {
        self.slots.first().map(|slot| slot.key.as_str())
    }

    // == Key At ==
    /// Returns the key stored at slot `pos`.
    pub fn key_at(&self, pos: usize) -> Option<&str> {
        self.slots.get(pos).map(|slot| slot.key.as_str())
    }

    /// Iterates keys in slot order (not eviction order).
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|slot| slot.key.as_str())
    }

    // == Length ==
    /// Returns the number of keys in the index.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Checks the heap property over every parent/child pair.
    pub fn is_heap_ordered(&self) -> bool {
        (1..self.slots.len()).all(|i| self.slots[(i - 1) / 2].recency <= self.slots[i].recency)
    }

    // == Internals ==
    fn fix<P: HeapPositions>(&mut self, pos: usize, table: &mut P) {
        if !self.sift_down(pos, table) {
            self.sift_up(pos, table);
        }
    }

    fn less(&self, i: usize, j: usize) -> bool {
        self.slots[i].recency < self.slots[j].recency
    }

    fn swap<P: HeapPositions>(&mut self, i: usize, j: usize, table: &mut P) {
        self.slots.swap(i, j);
        table.set_heap_pos(&self.slots[i].key, i);
        table.set_heap_pos(&self.slots[j].key, j);
    }

    fn sift_up<P: HeapPositions>(&mut self, mut pos: usize, table: &mut P) {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if !self.less(pos, parent) {
                break;
            }
            self.swap(pos, parent, table);
            pos = parent;
        }
    }

    /// Returns true if the slot moved.
    fn sift_down<P: HeapPositions>(&mut self, start: usize, table: &mut P) -> bool {
        let len = self.slots.len();
        let mut pos = start;
        loop {
            let left = 2 * pos + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let child = if right < len && self.less(right, left) {
                right
            } else {
                left
            };
            if !self.less(child, pos) {
                break;
            }
            self.swap(pos, child, table);
            pos = child;
        }
        pos > start
    }
}
