use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Defines the interface for reading AMBER input file formats.
///
/// This trait provides a common API for the topology and coordinate
/// readers. The formats are read-only inputs; implementors handle
/// format-specific parsing and unit conversion.
pub trait AmberFile: Sized {
    /// The error type for read operations.
    type Error: Error + From<io::Error>;

    /// Reads and parses the file from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or I/O operations encounter issues.
    fn read_from(reader: &mut impl BufRead) -> Result<Self, Self::Error>;

    /// Reads and parses the file from a path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Self, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }
}
