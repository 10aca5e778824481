//! Legacy-ASCII VTK polydata writer.
//!
//! Writes one `points_NNNN.vtk` file per frame containing particle
//! positions plus velocity vectors and mass scalars as point data, for
//! external rendering (ParaView and friends). Never mutates the
//! particles it is handed.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use crate::output::FrameSink;
use crate::simulation::states::System;

pub struct VtkWriter {
    dir: PathBuf,
}

impl VtkWriter {
    /// Create a writer that places frame files under `dir`, creating
    /// the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }
}

impl FrameSink for VtkWriter {
    fn write_frame(&mut self, frame: usize, sys: &System) -> std::io::Result<()> {
        let path = self.dir.join(format!("points_{frame:04}.vtk"));
        let mut w = BufWriter::new(File::create(path)?);
        let n = sys.particles.len();

        writeln!(w, "# vtk DataFile Version 3.0")?;
        writeln!(w, "octsim frame {frame} t={}", sys.t)?;
        writeln!(w, "ASCII")?;
        writeln!(w, "DATASET POLYDATA")?;

        writeln!(w, "POINTS {n} double")?;
        for p in &sys.particles {
            writeln!(w, "{} {} {}", p.x.x, p.x.y, p.x.z)?;
        }

        writeln!(w, "POINT_DATA {n}")?;
        writeln!(w, "VECTORS velocity double")?;
        for p in &sys.particles {
            writeln!(w, "{} {} {}", p.v.x, p.v.y, p.v.z)?;
        }

        writeln!(w, "SCALARS mass double 1")?;
        writeln!(w, "LOOKUP_TABLE default")?;
        for p in &sys.particles {
            writeln!(w, "{}", p.m)?;
        }

        w.flush()
    }
}
