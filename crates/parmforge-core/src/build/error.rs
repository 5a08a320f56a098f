use super::options::{NonbondedMethod, OptionsError};
use crate::core::forcefield::gb::GbModel;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum BuildError {
    #[error("Invalid options: {0}")]
    Options(#[from] OptionsError),

    #[error("Nonbonded method {method} requires a periodic box, but the topology declares none")]
    MissingPeriodicBox { method: NonbondedMethod },

    #[error("Nonbonded method {method} cannot be combined with an implicit solvent model")]
    IllegalImplicitSolventMethod { method: NonbondedMethod },

    #[error("Implicit solvent model {model} requested, but the topology carries no Born radii")]
    MissingBornRadii { model: GbModel },

    #[error(
        "Cannot constrain angle over atoms {atoms:?}: bond lengths for its arms are not defined"
    )]
    UnconstrainableAngle { atoms: [usize; 3] },
}
