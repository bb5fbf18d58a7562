//! Undo history - bounded ring buffer of pre-move snapshots

use std::collections::VecDeque;

use crate::grid::Grid;
use crate::targets::TargetProgress;

/// State captured immediately before an applied move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub grid: Grid,
    pub score: u32,
    pub moves_used: u32,
    pub targets: TargetProgress,
}

/// Bounded undo stack; the oldest entry is evicted when full
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl History {
    /// A capacity of 0 disables undo
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn pop(&mut self) -> Option<HistoryEntry> {
        self.entries.pop_back()
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

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(score: u32) -> HistoryEntry {
        HistoryEntry {
            grid: Grid::new(),
            score,
            moves_used: score,
            targets: TargetProgress::default(),
        }
    }

    #[test]
    fn test_lifo_order() {
        let mut history = History::new(10);
        history.push(entry(1));
        history.push(entry(2));
        assert_eq!(history.pop().map(|e| e.score), Some(2));
        assert_eq!(history.pop().map(|e| e.score), Some(1));
        assert_eq!(history.pop(), None);
    }

    #[test]
    fn test_oldest_evicted_when_full() {
        let mut history = History::new(3);
        for score in 1..=5 {
            history.push(entry(score));
        }
        assert_eq!(history.len(), 3);
        let scores: Vec<u32> = std::iter::from_fn(|| history.pop().map(|e| e.score)).collect();
        assert_eq!(scores, vec![5, 4, 3]);
    }

    #[test]
    fn test_zero_capacity_keeps_nothing() {
        let mut history = History::new(0);
        history.push(entry(1));
        assert!(history.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut history = History::new(5);
        history.push(entry(1));
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.capacity(), 5);
    }
}
