//! Numerical and physical parameters for the simulation
//!
//! `Parameters` holds runtime settings:
//! - frame count, particle count, and fixed time step,
//! - opening angle `theta` for the tree approximation,
//! - softening and gravitational constant (`eps2`, `g`),
//! - random seed for the initializer

#[derive(Debug, Clone)]
pub struct Parameters {
    pub frames: usize, // number of frames to simulate
    pub n: usize,      // number of particles
    pub dt: f64,       // fixed time step
    pub theta: f64,    // opening-angle threshold (0 = always exact)
    pub eps2: f64,     // softening added to squared separations
    pub g: f64,        // gravitational constant
    pub seed: u64,     // deterministic seed for initial conditions
}
