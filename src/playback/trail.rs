//! Bounded per-particle position history for the fading trajectory trails.

use std::collections::VecDeque;

use crate::snapshot::states::{NVec3, Snapshot};

/// One fixed-capacity FIFO of recent positions per particle index.
///
/// Recording a snapshot appends every particle's current position and evicts
/// the oldest entry once the capacity is exceeded, so a trail always holds the
/// at most `capacity` most recent positions in chronological order.
#[derive(Debug, Clone)]
pub struct TrailSet {
    trails: Vec<VecDeque<NVec3>>,
    capacity: usize,
}

impl TrailSet {
    /// Default trail length, in frames.
    pub const DEFAULT_LENGTH: usize = 20;

    pub fn new(particles: usize, capacity: usize) -> Self {
        TrailSet {
            trails: vec![VecDeque::with_capacity(capacity + 1); particles],
            capacity,
        }
    }

    pub fn particles(&self) -> usize {
        self.trails.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append every particle's position from `snapshot`, evicting the oldest
    /// entries past capacity.
    pub fn record(&mut self, snapshot: &Snapshot) {
        for (trail, particle) in self.trails.iter_mut().zip(&snapshot.particles) {
            trail.push_back(particle.x);
            if trail.len() > self.capacity {
                trail.pop_front();
            }
        }
    }

    /// Positions of particle `i`, oldest to newest.
    pub fn particle(&self, i: usize) -> impl Iterator<Item = &NVec3> {
        self.trails[i].iter()
    }

    pub fn len(&self, i: usize) -> usize {
        self.trails[i].len()
    }

    /// Drop all history. Only meaningful for a restart from frame 0; the
    /// replay driver never rewinds, so it never calls this mid-run.
    pub fn clear(&mut self) {
        for trail in &mut self.trails {
            trail.clear();
        }
    }
}
