//! Random initial-condition generation.
//!
//! Samples `n` particles with uniformly distributed positions inside a
//! cube, small random velocities, and strictly positive masses, and
//! returns the bounding accumulator of the sampled positions so the
//! driver can seed the first frame's tree. Deterministic for a given
//! seed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::simulation::bounds::BoundingBox;
use crate::simulation::states::{NVec3, Particle};

/// Half-width of the cube positions are sampled from.
const SPAWN_HALF: f64 = 10.0;
/// Velocity components are sampled from +-VEL_SPREAD.
const VEL_SPREAD: f64 = 0.1;
/// Mass range; the lower bound keeps every mass strictly positive.
const MASS_MIN: f64 = 0.1;
const MASS_MAX: f64 = 1.0;

/// Generate `n` randomized particles and the bounding box of their
/// positions.
pub fn randomize(n: usize, seed: u64) -> (Vec<Particle>, BoundingBox) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut particles = Vec::with_capacity(n);
    let mut bounds = BoundingBox::new();

    for _ in 0..n {
        let x = NVec3::new(
            rng.random_range(-SPAWN_HALF..SPAWN_HALF),
            rng.random_range(-SPAWN_HALF..SPAWN_HALF),
            rng.random_range(-SPAWN_HALF..SPAWN_HALF),
        );
        let v = NVec3::new(
            rng.random_range(-VEL_SPREAD..VEL_SPREAD),
            rng.random_range(-VEL_SPREAD..VEL_SPREAD),
            rng.random_range(-VEL_SPREAD..VEL_SPREAD),
        );
        let m = rng.random_range(MASS_MIN..MASS_MAX);

        bounds.update(&x);
        particles.push(Particle { x, v, a: NVec3::zeros(), m });
    }

    (particles, bounds)
}
