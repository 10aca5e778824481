//! Reference force evaluation and energy diagnostics.
//!
//! [`DirectGravity`] is the exact softened `O(N²)` pairwise sum. The
//! per-frame force pass goes through the octree instead; the direct sum
//! is the accuracy yardstick for the tree approximation and the
//! baseline for the benchmark.

use crate::simulation::states::{NVec3, System};

/// Softened Newtonian gravity evaluated by direct summation over all
/// unordered pairs.
pub struct DirectGravity {
    pub g: f64,    // gravitational constant
    pub eps2: f64, // softening
}

impl DirectGravity {
    /// Fill `out[i]` with the exact acceleration on particle `i`.
    pub fn accelerations(&self, sys: &System, out: &mut [NVec3]) {
        for a in out.iter_mut() {
            *a = NVec3::zeros();
        }

        let n = sys.particles.len();
        for i in 0..n {
            let pi = &sys.particles[i];
            let xi = pi.x;
            let mi = pi.m;

            for j in (i + 1)..n {
                let pj = &sys.particles[j];

                // Displacement from i to j: i is pulled along +r, j
                // along -r, equal and opposite.
                let r = pj.x - xi;
                let d2 = r.dot(&r) + self.eps2;
                let inv_r = d2.sqrt().recip();
                let inv_r3 = inv_r * inv_r * inv_r;
                let coef = self.g * inv_r3;

                out[i] += coef * pj.m * r;
                out[j] -= coef * mi * r;
            }
        }
    }
}

/// Total mechanical energy: kinetic plus softened pairwise potential.
/// Drift in this quantity over a long run is the standard check on the
/// integrator.
pub fn total_energy(sys: &System, g: f64, eps2: f64) -> f64 {
    let mut kinetic = 0.0;
    for p in &sys.particles {
        kinetic += 0.5 * p.m * p.v.dot(&p.v);
    }

    let mut potential = 0.0;
    let n = sys.particles.len();
    for i in 0..n {
        for j in (i + 1)..n {
            let r = sys.particles[j].x - sys.particles[i].x;
            let d = (r.dot(&r) + eps2).sqrt();
            potential -= g * sys.particles[i].m * sys.particles[j].m / d;
        }
    }

    kinetic + potential
}
