//! # Force Field Module
//!
//! Parameter tables carried by AMBER topology files, in internal units.
//!
//! ## Key Components
//!
//! - [`params`] - Bond/angle/torsion type tables and the Lennard-Jones pair matrix,
//!   including detection of pairwise overrides (NBFIX) and 12-6-4 coefficient tables
//! - [`gb`] - Implicit solvent (Generalized Born) model definitions: rescaling
//!   coefficients, per-element screening tables, radius offsets, and Debye screening

pub mod gb;
pub mod params;
