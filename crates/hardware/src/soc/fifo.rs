//! Bounded word FIFO.
//!
//! Models the receive and transmit FIFOs between the host link and the
//! controller. Exposes the `full` and `almost_full` flags the controller
//! samples each cycle.

use std::collections::VecDeque;

/// Bounded first-in, first-out queue of protocol words.
#[derive(Clone, Debug)]
pub struct Fifo {
    items: VecDeque<u64>,
    depth: usize,
}

impl Fifo {
    /// Creates an empty FIFO holding at most `depth` words.
    pub fn new(depth: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(depth),
            depth,
        }
    }

    /// Appends `word`. Returns `false`, leaving the FIFO unchanged, when full.
    pub fn push(&mut self, word: u64) -> bool {
        if self.is_full() {
            return false;
        }
        self.items.push_back(word);
        true
    }

    /// Removes and returns the oldest word.
    pub fn pop(&mut self) -> Option<u64> {
        self.items.pop_front()
    }

    /// Oldest word, without removing it.
    pub fn head(&self) -> Option<u64> {
        self.items.front().copied()
    }

    /// Number of words queued.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Maximum number of words.
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// `true` when no words are queued.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// `true` when no further word can be pushed.
    pub fn is_full(&self) -> bool {
        self.items.len() >= self.depth
    }

    /// `true` when at most one free slot remains.
    pub fn is_almost_full(&self) -> bool {
        self.items.len() + 1 >= self.depth
    }

    /// Discards every queued word.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}
