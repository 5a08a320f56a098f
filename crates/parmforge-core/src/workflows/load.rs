use crate::build::builder::SystemBuilder;
use crate::build::error::BuildError;
use crate::build::options::SystemOptions;
use crate::build::system::System;
use crate::core::io::inpcrd::{InpcrdError, InpcrdFile};
use crate::core::io::prmtop::{PrmtopError, PrmtopFile};
use crate::core::io::traits::AmberFile;
use nalgebra::{Point3, Vector3};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read topology file: {0}")]
    Prmtop(#[from] PrmtopError),

    #[error("Failed to read coordinate file: {0}")]
    Inpcrd(#[from] InpcrdError),

    #[error("System construction failed: {0}")]
    Build(#[from] BuildError),

    #[error(
        "Coordinate file holds {coordinates} atoms but the topology defines {topology}"
    )]
    AtomCountMismatch {
        topology: usize,
        coordinates: usize,
    },
}

/// The product of [`load_system`]: the parsed topology file, the
/// constructed system, and the coordinate data when a coordinate file was
/// supplied.
pub struct LoadedSystem {
    pub prmtop: PrmtopFile,
    pub system: System,
    /// Positions in nm, present when a coordinate file was read.
    pub positions: Option<Vec<Point3<f64>>>,
    /// Velocities in nm/ps, present when the coordinate file was a restart.
    pub velocities: Option<Vec<Vector3<f64>>>,
}

/// Loads a topology file, optionally a coordinate file, and constructs a
/// system from them.
///
/// A periodic cell in the coordinate file takes precedence over the
/// topology's own box record, matching the conventions of the ecosystem
/// the files come from.
pub fn load_system(
    prmtop_path: impl AsRef<Path>,
    inpcrd_path: Option<&Path>,
    options: &SystemOptions,
) -> Result<LoadedSystem, LoadError> {
    let mut prmtop = PrmtopFile::read_from_path(&prmtop_path)?;
    info!(
        atoms = prmtop.topology.num_atoms(),
        residues = prmtop.topology.num_residues(),
        title = %prmtop.title,
        "Loaded topology"
    );

    let mut positions = None;
    let mut velocities = None;
    if let Some(path) = inpcrd_path {
        let coordinates = InpcrdFile::read_from_path(path)?;
        if coordinates.num_atoms() != prmtop.topology.num_atoms() {
            return Err(LoadError::AtomCountMismatch {
                topology: prmtop.topology.num_atoms(),
                coordinates: coordinates.num_atoms(),
            });
        }
        if coordinates.cell.is_some() {
            debug!("Coordinate file cell overrides the topology box record");
            prmtop.topology.set_cell(coordinates.cell);
        }
        positions = Some(coordinates.positions);
        velocities = coordinates.velocities;
    }

    let system = SystemBuilder::new(&prmtop, options).build()?;
    Ok(LoadedSystem {
        prmtop,
        system,
        positions,
        velocities,
    })
}
