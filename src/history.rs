//! Bounded error history
//!
//! Fixed-capacity FIFO queue of normalized errors. Inserting into a full
//! queue evicts the oldest entry. Storage is allocated once up front and
//! never grows past the capacity.

use crate::core_types::NormalizedError;
use std::collections::VecDeque;

/// Default number of retained errors.
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

#[derive(Debug, Clone)]
pub struct ErrorHistory {
    entries: VecDeque<NormalizedError>,
    capacity: usize,
}

impl Default for ErrorHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl ErrorHistory {
    /// Create an empty history. A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an entry, returning the evicted oldest entry when full.
    pub fn push(&mut self, entry: NormalizedError) -> Option<NormalizedError> {
        let evicted = if self.entries.len() == self.capacity {
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(entry);
        evicted
    }

    /// Copy of the entries, oldest first.
    pub fn snapshot(&self) -> Vec<NormalizedError> {
        self.entries.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
