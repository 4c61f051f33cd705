//! One-time bounds and normalization pass over a snapshot sequence.
//!
//! The animation keeps its axis limits and its velocity color scale fixed for
//! the whole run, so both are derived up front by a single fold over every
//! particle of every snapshot.

use crate::error::ReplayError;
use crate::snapshot::states::Snapshot;

/// Closed `[min, max]` interval observed for one quantity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    fn empty() -> Self {
        AxisRange {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    fn fold(&mut self, value: f64) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn center(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    /// Fixed linear mapping of `value` into `[0, 1]`.
    ///
    /// A degenerate range (all samples equal) maps everything to 0 rather
    /// than dividing by zero.
    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.span();
        if span <= 0.0 {
            0.0
        } else {
            ((value - self.min) / span).clamp(0.0, 1.0)
        }
    }
}

/// Fixed plot limits and color normalization for a whole run.
#[derive(Debug, Clone)]
pub struct ReplayBounds {
    /// Per-axis position bounds; the z entry is `[0, 0]` for 2D runs.
    pub axis: [AxisRange; 3],
    /// Velocity magnitude bounds, the color scale's domain.
    pub speed: AxisRange,
}

/// Fold once over all snapshots. Fails with [`ReplayError::EmptyData`] for an
/// empty sequence or zero-particle snapshots, so degenerate `(inf, -inf)`
/// ranges never escape.
pub fn compute_bounds(snapshots: &[Snapshot]) -> Result<ReplayBounds, ReplayError> {
    let mut axis = [AxisRange::empty(); 3];
    let mut speed = AxisRange::empty();
    let mut samples = 0usize;

    for snapshot in snapshots {
        for (particle, &s) in snapshot.particles.iter().zip(&snapshot.speeds) {
            for (range, &coord) in axis.iter_mut().zip(particle.x.iter()) {
                range.fold(coord);
            }
            speed.fold(s);
            samples += 1;
        }
    }

    if samples == 0 {
        return Err(ReplayError::EmptyData);
    }
    Ok(ReplayBounds { axis, speed })
}
