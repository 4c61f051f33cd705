//! Frame-advance state machine of the replay.
//!
//! `Playback` is the part of the animation with behavior worth testing on its
//! own: which frame is current, when the run ends, and how trails accumulate.
//! It knows nothing about windows or timers; the visualization layer ticks it
//! and redraws from whatever it reports as current.

use crate::playback::trail::TrailSet;
use crate::snapshot::states::Snapshot;

/// Replay position within a snapshot sequence, plus the accumulated trails.
///
/// Starts before the first frame (`current()` is `None`, trails empty); each
/// [`advance`](Playback::advance) moves to the next frame and records it into
/// the trails. At the last frame the state goes terminal: further advances
/// return `None` and change nothing, so the final frame stays on screen.
#[derive(Debug)]
pub struct Playback {
    frame: Option<usize>,
    total: usize,
    trails: TrailSet,
}

impl Playback {
    pub fn new(total: usize, particles: usize, trail_length: usize) -> Self {
        Playback {
            frame: None,
            total,
            trails: TrailSet::new(particles, trail_length),
        }
    }

    /// Step to the next frame of `snapshots`, recording it into the trails.
    ///
    /// Returns the index of the frame just entered, or `None` once the
    /// sequence is exhausted. `snapshots` must be the sequence this state was
    /// sized for.
    pub fn advance(&mut self, snapshots: &[Snapshot]) -> Option<usize> {
        let next = match self.frame {
            None => 0,
            Some(f) => f + 1,
        };
        if next >= self.total {
            return None;
        }
        self.trails.record(&snapshots[next]);
        self.frame = Some(next);
        Some(next)
    }

    /// Index of the frame currently shown, `None` before the first advance.
    pub fn current(&self) -> Option<usize> {
        self.frame
    }

    pub fn finished(&self) -> bool {
        self.total == 0 || self.frame == Some(self.total - 1)
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn trails(&self) -> &TrailSet {
        &self.trails
    }
}
