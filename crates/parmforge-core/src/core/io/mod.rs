//! Provides input functionality for the AMBER file formats.
//!
//! This module contains readers for the two text formats the library
//! consumes: the sectioned prmtop/parm7 topology format and the inpcrd/rst7
//! coordinate format. Both convert to internal units (nm, kJ/mol,
//! elementary charge) as they read; nothing downstream handles raw AMBER
//! units. The formats are owned by the AMBER ecosystem and treated as
//! read-only inputs.

pub mod inpcrd;
pub mod prmtop;
pub mod traits;
