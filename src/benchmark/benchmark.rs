//! Direct-sum vs tree scaling report.
//!
//! Runs one acceleration pass with both force evaluators over doubling
//! particle counts and prints the timings, so the crossover where the
//! tree wins is easy to see on a given machine.

use std::time::Instant;

use crate::simulation::bounds::BoundingBox;
use crate::simulation::forces::DirectGravity;
use crate::simulation::octree::Octree;
use crate::simulation::states::{NVec3, Particle, System};

pub fn bench_accel() {
    let ns = [256, 512, 1024, 2048, 4096, 8192];
    let g = 0.1;
    let eps2 = 1e-4;
    let theta = 0.7;

    for n in ns {
        // Deterministic positions, no rng needed.
        let mut particles = Vec::with_capacity(n);
        let mut bounds = BoundingBox::new();
        for i in 0..n {
            let i_f = i as f64;
            let x = NVec3::new(
                (i_f * 0.37).sin() * 5.0,
                (i_f * 0.13).cos() * 5.0,
                (i_f * 0.07).sin() * 5.0,
            );
            bounds.update(&x);
            particles.push(Particle { x, v: NVec3::zeros(), a: NVec3::zeros(), m: 1.0 });
        }
        let sys = System::new(particles);
        let mut out = vec![NVec3::zeros(); n];

        let direct = DirectGravity { g, eps2 };

        // Warm up both paths.
        direct.accelerations(&sys, &mut out);
        let tree = Octree::build(bounds.to_region(), &sys.particles, g, eps2, theta)
            .expect("bench particles are inside their own bounds");
        for (i, a) in out.iter_mut().enumerate() {
            *a = tree.accel_on(i, &sys.particles);
        }

        let t0 = Instant::now();
        direct.accelerations(&sys, &mut out);
        let dt_direct = t0.elapsed().as_secs_f64();

        let t1 = Instant::now();
        let tree = Octree::build(bounds.to_region(), &sys.particles, g, eps2, theta)
            .expect("bench particles are inside their own bounds");
        for (i, a) in out.iter_mut().enumerate() {
            *a = tree.accel_on(i, &sys.particles);
        }
        let dt_tree = t1.elapsed().as_secs_f64();

        println!("N = {n:5}, direct = {dt_direct:8.6} s, tree = {dt_tree:8.6} s");
    }
}
