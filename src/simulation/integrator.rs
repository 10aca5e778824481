//! Fixed-step leapfrog (kick-drift-kick) integration.
//!
//! One call advances the whole system by `dt` using the octree built
//! for this frame. KDK is time-symmetric, which keeps long-run energy
//! drift far below naive Euler stepping.

use crate::simulation::bounds::BoundingBox;
use crate::simulation::octree::Octree;
use crate::simulation::states::System;

/// Advance every particle by one kick-drift-kick step and fold each
/// post-drift position into `bounds` (the accumulator that seeds the
/// next frame's tree).
///
/// Per particle:
/// 1. `v_mid = v + a * dt/2` with the acceleration carried over from
///    the previous frame (zero on the very first step),
/// 2. `a` is recomputed from the tree at the pre-step position,
/// 3. drift: `x += v_mid * dt`,
/// 4. second kick: `v = v_mid + a * dt/2`.
///
/// The integrator does not own the tree; the driver builds one fresh
/// each frame and hands it in read-only.
pub fn leapfrog_step(sys: &mut System, tree: &Octree, dt: f64, bounds: &mut BoundingBox) {
    let half_dt = 0.5 * dt;

    for i in 0..sys.particles.len() {
        // First kick, using last frame's acceleration.
        let v_mid = sys.particles[i].v + sys.particles[i].a * half_dt;

        // This frame's force pass, at the pre-step position.
        let a_new = tree.accel_on(i, &sys.particles);

        let p = &mut sys.particles[i];
        p.a = a_new;
        p.x += v_mid * dt;          // drift
        p.v = v_mid + a_new * half_dt; // second kick

        bounds.update(&p.x);
    }

    sys.t += dt;
}
