//! Frame output collaborators.
//!
//! The driver emits each frame's particle state through the
//! [`FrameSink`] seam. The VTK writer is the real implementation;
//! [`NullSink`] discards frames for tests and benchmarks.

pub mod vtk;

use crate::simulation::states::System;

/// Receives one immutable snapshot of the particle set per frame.
pub trait FrameSink {
    fn write_frame(&mut self, frame: usize, sys: &System) -> std::io::Result<()>;
}

/// Sink that drops every frame.
pub struct NullSink;

impl FrameSink for NullSink {
    fn write_frame(&mut self, _frame: usize, _sys: &System) -> std::io::Result<()> {
        Ok(())
    }
}
