//! # Core Models Module
//!
//! Data structures representing an AMBER molecular model in memory.
//!
//! ## Key Components
//!
//! - [`atom`] - Individual atom representation with charge, mass, and type indices
//! - [`residue`] - Residues as contiguous atom runs, the way AMBER pointer arrays define them
//! - [`topology`] - The parsed topology container with bonds, angles, torsions, and adjacency
//! - [`cell`] - Periodic unit cells and their reduction to triclinic box vectors
//! - [`element`] - Static element data for symbol lookup and mass-based inference

pub mod atom;
pub mod cell;
pub mod element;
pub mod residue;
pub mod topology;
