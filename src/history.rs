//! Trend history
//!
//! Bounded, count-based FIFO of recent history points used for charting.
//! Insertion order is chronological order; the oldest point is dropped first.

use crate::types::HistoryPoint;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default number of history points kept
pub const DEFAULT_HISTORY_CAPACITY: usize = 20;

/// Largest capacity a configuration may request
pub const MAX_HISTORY_CAPACITY: usize = 100_000;

/// Ring buffer of recent history points
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryBuffer {
    points: VecDeque<HistoryPoint>,
    /// Maximum number of points kept
    capacity: usize,
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl HistoryBuffer {
    /// Create an empty buffer holding at most `capacity` points
    pub fn new(capacity: usize) -> Self {
        Self {
            points: VecDeque::new(),
            capacity,
        }
    }

    /// Append a point, evicting from the front while over capacity
    pub fn append(&mut self, point: HistoryPoint) {
        self.points.push_back(point);
        while self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Points in chronological order
    pub fn iter(&self) -> impl Iterator<Item = &HistoryPoint> {
        self.points.iter()
    }

    pub fn to_vec(&self) -> Vec<HistoryPoint> {
        self.points.iter().cloned().collect()
    }
}
