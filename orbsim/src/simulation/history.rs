//! Bounded position history of a single body
//!
//! A FIFO ring with fixed capacity: pushing past capacity evicts the oldest
//! sample. The history is never empty, it starts seeded with one position.

use std::collections::VecDeque;

use crate::simulation::states::NVec3;

#[derive(Debug, Clone, PartialEq)]
pub struct PoseHistory {
    samples: VecDeque<NVec3>,
    capacity: usize,
}

impl PoseHistory {
    /// New history holding only `x`. A zero capacity is treated as one.
    pub fn seeded(capacity: usize, x: NVec3) -> Self {
        let capacity = capacity.max(1);
        let mut samples = VecDeque::with_capacity(capacity);
        samples.push_back(x);
        Self { samples, capacity }
    }

    /// Append the newest sample, evicting the oldest once full
    pub fn push(&mut self, x: NVec3) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(x);
    }

    /// Drop everything and keep only `x`
    pub fn reset_to(&mut self, x: NVec3) {
        self.samples.clear();
        self.samples.push_back(x);
    }

    pub fn oldest(&self) -> NVec3 {
        // seeded on construction and never drained below one sample
        self.samples[0]
    }

    pub fn second_oldest(&self) -> Option<NVec3> {
        self.samples.get(1).copied()
    }

    pub fn newest(&self) -> NVec3 {
        self.samples[self.samples.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Never true once seeded
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.samples.len() == self.capacity
    }

    /// Samples in chronological order, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &NVec3> + '_ {
        self.samples.iter()
    }

    pub fn to_vec(&self) -> Vec<NVec3> {
        self.samples.iter().copied().collect()
    }
}
