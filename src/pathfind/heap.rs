//! Indexed binary min-heap with decrease-key
//!
//! Items are dense `usize` handles (vertex slots). A position map tracks where
//! each item sits in the heap array so its key can be lowered in O(log n).

use ordered_float::OrderedFloat;

const ABSENT: usize = usize::MAX;

#[derive(Debug, Clone, Default)]
pub struct IndexedHeap {
    /// Heap array of `(key, item)`
    entries: Vec<(OrderedFloat<f64>, usize)>,
    /// `positions[item]` is the index of `item` in `entries`, or `ABSENT`
    positions: Vec<usize>,
}

impl IndexedHeap {
    /// Create a heap for items in `0..capacity`
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            positions: vec![ABSENT; capacity],
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, item: usize) -> bool {
        self.positions.get(item).is_some_and(|&p| p != ABSENT)
    }

    pub fn key_of(&self, item: usize) -> Option<f64> {
        let pos = *self.positions.get(item)?;
        (pos != ABSENT).then(|| self.entries[pos].0.into_inner())
    }

    pub fn peek(&self) -> Option<(usize, f64)> {
        self.entries
            .first()
            .map(|&(key, item)| (item, key.into_inner()))
    }

    /// Insert `item` with `key`. Returns false if the item is already queued.
    pub fn push(&mut self, item: usize, key: f64) -> bool {
        if self.contains(item) {
            return false;
        }
        if item >= self.positions.len() {
            self.positions.resize(item + 1, ABSENT);
        }
        self.entries.push((OrderedFloat(key), item));
        let last = self.entries.len() - 1;
        self.positions[item] = last;
        self.sift_up(last);
        true
    }

    /// Remove and return the item with the smallest key
    pub fn pop(&mut self) -> Option<(usize, f64)> {
        if self.entries.is_empty() {
            return None;
        }
        let last = self.entries.len() - 1;
        self.swap(0, last);
        let (key, item) = self.entries.pop()?;
        self.positions[item] = ABSENT;
        if !self.entries.is_empty() {
            self.sift_down(0);
        }
        Some((item, key.into_inner()))
    }

    /// Lower the key of a queued item. Returns false if the item is not
    /// queued or `key` is not smaller than its current key.
    pub fn decrease_key(&mut self, item: usize, key: f64) -> bool {
        let Some(&pos) = self.positions.get(item) else {
            return false;
        };
        if pos == ABSENT || OrderedFloat(key) >= self.entries[pos].0 {
            return false;
        }
        self.entries[pos].0 = OrderedFloat(key);
        self.sift_up(pos);
        true
    }

    fn sift_up(&mut self, mut pos: usize) {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if self.entries[pos].0 >= self.entries[parent].0 {
                break;
            }
            self.swap(pos, parent);
            pos = parent;
        }
    }

    fn sift_down(&mut self, mut pos: usize) {
        let len = self.entries.len();
        loop {
            let left = 2 * pos + 1;
            let right = left + 1;
            let mut smallest = pos;
            if left < len && self.entries[left].0 < self.entries[smallest].0 {
                smallest = left;
            }
            if right < len && self.entries[right].0 < self.entries[smallest].0 {
                smallest = right;
            }
            if smallest == pos {
                break;
            }
            self.swap(pos, smallest);
            pos = smallest;
        }
    }

    fn swap(&mut self, i: usize, j: usize) {
        self.entries.swap(i, j);
        self.positions[self.entries[i].1] = i;
        self.positions[self.entries[j].1] = j;
    }
}
