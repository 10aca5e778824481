//! Simulation driver: owns the particle storage and runs the per-frame
//! sequence {build tree from last frame's bounds, reset the bounds
//! accumulator, integrate every particle, emit the frame}.
//!
//! Timing is reported through the injected [`Diagnostics`] trait and
//! frames are emitted through the injected [`FrameSink`], so the core
//! stays free of direct console and file I/O and is testable with
//! silent stand-ins.

use std::time::{Duration, Instant};

use thiserror::Error;

use crate::initial;
use crate::output::FrameSink;
use crate::simulation::bounds::BoundingBox;
use crate::simulation::integrator::leapfrog_step;
use crate::simulation::octree::{Octree, OctreeError};
use crate::simulation::params::Parameters;
use crate::simulation::states::System;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("frame {frame}: {source}")]
    Frame {
        frame: usize,
        #[source]
        source: OctreeError,
    },
    #[error("frame {frame}: writing output failed")]
    Output {
        frame: usize,
        #[source]
        source: std::io::Error,
    },
}

/// Observer for the driver's timing side effects.
pub trait Diagnostics {
    fn initialized(&mut self, n: usize, elapsed: Duration);
    fn finished(&mut self, frames: usize, elapsed: Duration);
}

/// Diagnostics backed by the `log` crate; the binary's default.
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn initialized(&mut self, n: usize, elapsed: Duration) {
        log::info!("initialized {} particles in {:.4}s", n, elapsed.as_secs_f64());
    }

    fn finished(&mut self, frames: usize, elapsed: Duration) {
        let secs = elapsed.as_secs_f64();
        log::info!(
            "simulation ended ({} frames in {:.4}s; FPS = {:.2})",
            frames,
            secs,
            frames as f64 / secs
        );
    }
}

/// Diagnostics that discard everything; used by tests.
pub struct NullDiagnostics;

impl Diagnostics for NullDiagnostics {
    fn initialized(&mut self, _n: usize, _elapsed: Duration) {}
    fn finished(&mut self, _frames: usize, _elapsed: Duration) {}
}

pub struct Simulation {
    pub params: Parameters,
    pub system: System,
    bounds: BoundingBox,
}

impl Simulation {
    /// Initialize from randomized initial conditions per `params`,
    /// reporting setup time through `diag`.
    pub fn init(params: Parameters, diag: &mut dyn Diagnostics) -> Self {
        let start = Instant::now();
        let (particles, bounds) = initial::randomize(params.n, params.seed);
        diag.initialized(params.n, start.elapsed());

        Self {
            params,
            system: System::new(particles),
            bounds,
        }
    }

    /// Build a simulation from an explicit particle set and its
    /// bounding accumulator, for callers that supply their own initial
    /// conditions.
    pub fn from_parts(params: Parameters, system: System, bounds: BoundingBox) -> Self {
        Self { params, system, bounds }
    }

    /// Run the configured number of frames, emitting each frame's
    /// particle state to `sink` and reporting run timing to `diag`.
    pub fn run(&mut self, sink: &mut dyn FrameSink, diag: &mut dyn Diagnostics) -> Result<(), SimError> {
        let frames = self.params.frames;
        let start = Instant::now();

        for frame in 0..frames {
            self.step(frame)?;
            sink.write_frame(frame, &self.system)
                .map_err(|source| SimError::Output { frame, source })?;
        }

        diag.finished(frames, start.elapsed());
        Ok(())
    }

    /// Advance the system by one frame.
    ///
    /// The tree is seeded with the bounding region folded during the
    /// previous frame's integration pass (the initializer's bounds on
    /// the first frame). If a particle nevertheless falls outside that
    /// region, the region is regrown once from current positions and
    /// the build retried; a second failure is fatal and carries the
    /// frame index.
    fn step(&mut self, frame: usize) -> Result<(), SimError> {
        let p = &self.params;
        let region = self.bounds.to_region();

        let tree = match Octree::build(region, &self.system.particles, p.g, p.eps2, p.theta) {
            Ok(tree) => tree,
            Err(OctreeError::OutOfBounds { .. }) => {
                let mut regrown = BoundingBox::new();
                for particle in &self.system.particles {
                    regrown.update(&particle.x);
                }
                Octree::build(regrown.to_region(), &self.system.particles, p.g, p.eps2, p.theta)
                    .map_err(|source| SimError::Frame { frame, source })?
            }
        };

        // The accumulator restarts empty each frame; integration folds
        // every post-drift position back in.
        self.bounds.reset();
        leapfrog_step(&mut self.system, &tree, self.params.dt, &mut self.bounds);
        Ok(())
    }
}
