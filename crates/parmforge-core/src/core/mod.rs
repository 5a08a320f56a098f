//! # Core Module
//!
//! This module provides the fundamental building blocks for AMBER topology loading
//! and system construction, serving as the data layer of the library.
//!
//! ## Overview
//!
//! The core module implements the data structures and file readers required to
//! represent an AMBER molecular model in memory: atoms, residues, bonded terms,
//! periodic cells, and the force-field parameter tables the topology file carries.
//!
//! ## Architecture
//!
//! The module is organized into specialized submodules:
//!
//! - **Molecular Representation** ([`models`]) - Atoms, residues, bonded-term lists, and unit cells
//! - **Force-Field Parameters** ([`forcefield`]) - Bond/angle/torsion tables, Lennard-Jones pair
//!   matrices, and implicit-solvent parameter sets
//! - **File I/O** ([`io`]) - Readers for the AMBER prmtop and inpcrd formats
//! - **Utilities** ([`utils`]) - Unit conversion constants shared across the crate
//!
//! All quantities are converted to the internal unit system (nm, kJ/mol, amu,
//! elementary charge, ps) at the reader boundary; nothing downstream ever sees
//! raw AMBER units.

pub mod forcefield;
pub mod io;
pub mod models;
pub mod utils;
