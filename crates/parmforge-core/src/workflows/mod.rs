//! # Workflows Module
//!
//! The highest-level, user-facing layer. It ties the readers and the
//! builder together to execute the complete load-and-construct procedure:
//! topology file in, constructed system (plus coordinates when a
//! coordinate file is supplied) out.

pub mod load;

pub use load::{LoadError, LoadedSystem, load_system};
