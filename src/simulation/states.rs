//! Core state types for the N-body simulation.
//!
//! A [`System`] holds the full particle set and the current simulation
//! time `t`. Particles are created once at initialization and mutated
//! in place every frame by the integrator; none are ever destroyed
//! during a run.

use nalgebra::Vector3;
pub type NVec3 = Vector3<f64>;

#[derive(Debug, Clone)]
pub struct Particle {
    pub x: NVec3, // position
    pub v: NVec3, // velocity
    pub a: NVec3, // acceleration from the most recent force pass
    pub m: f64,   // mass (strictly positive)
}

#[derive(Debug, Clone)]
pub struct System {
    pub particles: Vec<Particle>,
    pub t: f64, // time
}

impl System {
    /// System at t = 0 from an initial particle set.
    pub fn new(particles: Vec<Particle>) -> Self {
        Self { particles, t: 0.0 }
    }
}
