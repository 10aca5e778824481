//! Run configuration loaded from YAML.
//!
//! A thin `serde`-deserializable representation of one simulation run,
//! validated up front and then converted into runtime [`Parameters`].
//!
//! # YAML format
//!
//! ```yaml
//! frames: 25          # number of frames to simulate
//! n: 2048             # number of particles
//! dt: 0.01            # fixed time step
//! theta: 0.7          # opening-angle threshold (optional)
//! eps2: 1.0e-4        # softening epsilon^2 (optional)
//! g: 1.0              # gravitational constant (optional)
//! seed: 42            # initializer seed (optional)
//! output_dir: frames  # where .vtk frames go (optional)
//! ```

use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

use crate::simulation::params::Parameters;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("`{field}` must be positive")]
    NonPositive { field: &'static str },
    #[error("`{field}` must not be negative")]
    Negative { field: &'static str },
}

/// Top-level run configuration deserialized from YAML.
#[derive(Deserialize, Debug)]
pub struct RunConfig {
    pub frames: usize, // number of frames to simulate
    pub n: usize,      // number of particles
    pub dt: f64,       // fixed time step

    #[serde(default = "default_theta")]
    pub theta: f64, // opening-angle threshold
    #[serde(default = "default_eps2")]
    pub eps2: f64, // softening
    #[serde(default = "default_g")]
    pub g: f64, // gravitational constant
    #[serde(default = "default_seed")]
    pub seed: u64, // deterministic seed
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf, // frame output directory
}

fn default_theta() -> f64 {
    0.7
}

fn default_eps2() -> f64 {
    1.0e-4
}

fn default_g() -> f64 {
    1.0
}

fn default_seed() -> u64 {
    42
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("frames")
}

impl RunConfig {
    /// Fail fast on configurations the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frames == 0 {
            return Err(ConfigError::NonPositive { field: "frames" });
        }
        if self.n == 0 {
            return Err(ConfigError::NonPositive { field: "n" });
        }
        if !(self.dt > 0.0) {
            return Err(ConfigError::NonPositive { field: "dt" });
        }
        if self.theta < 0.0 {
            return Err(ConfigError::Negative { field: "theta" });
        }
        if self.eps2 < 0.0 {
            return Err(ConfigError::Negative { field: "eps2" });
        }
        Ok(())
    }

    /// Runtime parameters for a validated configuration.
    pub fn to_parameters(&self) -> Parameters {
        Parameters {
            frames: self.frames,
            n: self.n,
            dt: self.dt,
            theta: self.theta,
            eps2: self.eps2,
            g: self.g,
            seed: self.seed,
        }
    }
}
