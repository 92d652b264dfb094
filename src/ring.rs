//! Fixed-capacity, newest-first ring.
//!
//! Backs both the event log (15 entries) and the broker message trail
//! (20 messages).  Inserting into a full ring evicts the oldest item; items
//! are never mutated once stored.
//!
//! ```text
//!   append(x) ──▶ [ x | newest … oldest ] ──▶ evicted when full
//!                   ▲ index 0
//! ```

use heapless::Deque;
use serde::{Serialize, Serializer};

#[derive(Debug, Clone)]
pub struct NewestFirstRing<T, const N: usize> {
    items: Deque<T, N>,
}

impl<T, const N: usize> Default for NewestFirstRing<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> NewestFirstRing<T, N> {
    pub const CAPACITY: usize = N;

    pub fn new() -> Self {
        Self { items: Deque::new() }
    }

    /// Insert at the front, evicting the oldest item if full.
    /// Returns the evicted item, if any.
    pub fn append(&mut self, item: T) -> Option<T> {
        let evicted = if self.items.is_full() {
            self.items.pop_back()
        } else {
            None
        };
        // Cannot fail: a slot was just freed if the ring was full.
        let _ = self.items.push_front(item);
        evicted
    }

    /// Items, newest first.
    pub fn entries(&self) -> impl Iterator<Item = &T> + '_ {
        self.items.iter()
    }

    /// Item at `index` (0 = newest).
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.iter().nth(index)
    }

    pub fn newest(&self) -> Option<&T> {
        self.items.front()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<T: Clone, const N: usize> NewestFirstRing<T, N> {
    /// Owned copy of the contents, newest first.
    pub fn to_vec(&self) -> Vec<T> {
        self.items.iter().cloned().collect()
    }
}

/// Serialises as a JSON array, newest first.
impl<T: Serialize, const N: usize> Serialize for NewestFirstRing<T, N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.items.iter())
    }
}
