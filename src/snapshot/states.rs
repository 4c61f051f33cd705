//! Core state types for a recorded N-body run.
//!
//! One set of structs serves both 2D and 3D runs: positions and velocities
//! are stored as `NVec3`, with the third component fixed at zero for 2D data.
//! [`Dim`] records which case a run is, decided once by the loader from the
//! first snapshot's columns.

use std::fmt;

use nalgebra::Vector3;

pub type NVec3 = Vector3<f64>;

/// Dimensionality of a run, fixed for the whole snapshot sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dim {
    TwoD,
    ThreeD,
}

impl Dim {
    /// Number of spatial axes that carry data.
    pub fn axes(self) -> usize {
        match self {
            Dim::TwoD => 2,
            Dim::ThreeD => 3,
        }
    }
}

impl fmt::Display for Dim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dim::TwoD => write!(f, "2D"),
            Dim::ThreeD => write!(f, "3D"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Particle {
    pub x: NVec3, // position, z = 0 for 2D runs
    pub v: NVec3, // velocity, z = 0 for 2D runs
    pub m: f64,   // mass
}

/// One timestep's full particle table.
///
/// `speeds[i]` is the Euclidean norm of `particles[i].v`, computed once at
/// construction so per-frame drawing never recomputes it.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub particles: Vec<Particle>,
    pub speeds: Vec<f64>,
    pub t: f64, // simulation time, shared by all rows
}

impl Snapshot {
    pub fn new(t: f64, particles: Vec<Particle>) -> Self {
        let speeds = particles.iter().map(|p| p.v.norm()).collect();
        Snapshot {
            particles,
            speeds,
            t,
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}
