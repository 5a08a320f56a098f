//! # parmforge Core Library
//!
//! A library for loading AMBER topology and coordinate files and turning them into
//! fully parameterized molecular simulation systems.
//!
//! ## Architectural Philosophy
//!
//! The library is designed with a strict three-layer architecture to ensure a clear separation
//! of concerns, making it modular, testable, and extensible.
//!
//! - **[`core`]: The Foundation.** Contains stateless data models (`Topology`, `UnitCell`),
//!   force-field parameter tables (`AmberParams`, `LjTables`), and the prmtop/inpcrd readers.
//!
//! - **[`build`]: The Logic Core.** Translates a parsed topology plus user options
//!   (nonbonded method, cutoff, constraints, implicit solvent, hydrogen mass repartitioning)
//!   into a constructed [`build::system::System`] holding particles, constraints, and
//!   typed force terms.
//!
//! - **[`workflows`]: The Public API.** The highest-level, user-facing layer. It ties the
//!   readers and the builder together to execute the complete load-and-construct procedure
//!   in a single entry point.
//!
//! The constructed `System` is a complete *description* of the model. Evaluating or
//! integrating the forces it describes is the business of a downstream simulation engine.

pub mod build;
pub mod core;
pub mod workflows;
