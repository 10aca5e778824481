pub mod simulation;
pub mod configuration;
pub mod initial;
pub mod output;
pub mod benchmark;

pub use simulation::states::{Particle, System, NVec3};
pub use simulation::params::Parameters;
pub use simulation::bounds::{BoundingBox, Region};
pub use simulation::octree::{Octree, OctreeError, MAX_DEPTH};
pub use simulation::forces::{DirectGravity, total_energy};
pub use simulation::integrator::leapfrog_step;
pub use simulation::driver::{Simulation, SimError, Diagnostics, LogDiagnostics, NullDiagnostics};

pub use configuration::config::{RunConfig, ConfigError};
pub use initial::randomize;
pub use output::{FrameSink, NullSink, vtk::VtkWriter};

pub use benchmark::benchmark::bench_accel;
