use super::traits::AmberFile;
use crate::core::models::cell::UnitCell;
use crate::core::utils::units;
use nalgebra::{Point3, Vector3};
use std::io::{self, BufRead};
use thiserror::Error;

/// Field width of the fixed-format coordinate columns (%12.7f).
const FIELD_WIDTH: usize = 12;

#[derive(Debug, Error)]
pub enum InpcrdError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("File is empty")]
    Empty,
    #[error("Missing or invalid atom count line: '{0}'")]
    InvalidHeader(String),
    #[error("Invalid coordinate value '{value}' on line {line}")]
    InvalidValue { line: usize, value: String },
    #[error(
        "File holds {count} values for {natom} atoms; expected coordinates, \
         optionally velocities, and an optional box record"
    )]
    UnexpectedValueCount { natom: usize, count: usize },
}

/// A parsed AMBER coordinate/restart file.
///
/// Positions are in nm, velocities in nm/ps, time in ps. Restart files
/// carry velocities; plain coordinate files do not. The optional box
/// record becomes a [`UnitCell`], with right angles assumed when the file
/// writes only the three lengths.
pub struct InpcrdFile {
    pub title: String,
    pub time: Option<f64>,
    pub positions: Vec<Point3<f64>>,
    pub velocities: Option<Vec<Vector3<f64>>>,
    pub cell: Option<UnitCell>,
}

impl InpcrdFile {
    pub fn num_atoms(&self) -> usize {
        self.positions.len()
    }

    /// Reduced triclinic box vectors for the cell, when the file carries one.
    pub fn box_vectors(&self) -> Option<[Vector3<f64>; 3]> {
        self.cell.map(|cell| cell.box_vectors())
    }
}

/// Splits a data line into numeric fields: fixed 12-wide columns first,
/// falling back to whitespace for any ragged tail. Large negative values
/// can fuse adjacent columns, so whitespace alone is not reliable.
fn split_fields(line: &str) -> Vec<&str> {
    let mut fields = Vec::new();
    let mut pos = 0;
    while pos + FIELD_WIDTH <= line.len() {
        let field = line[pos..pos + FIELD_WIDTH].trim();
        if !field.is_empty() {
            fields.push(field);
        }
        pos += FIELD_WIDTH;
    }
    if pos < line.len() {
        fields.extend(line[pos..].split_whitespace());
    }
    fields
}

impl AmberFile for InpcrdFile {
    type Error = InpcrdError;

    fn read_from(reader: &mut impl BufRead) -> Result<Self, Self::Error> {
        let mut lines = reader.lines();

        let title = lines.next().ok_or(InpcrdError::Empty)??.trim().to_string();

        let header = lines
            .next()
            .ok_or_else(|| InpcrdError::InvalidHeader(String::new()))??;
        let mut header_fields = header.split_whitespace();
        let natom: usize = header_fields
            .next()
            .and_then(|field| field.parse().ok())
            .ok_or_else(|| InpcrdError::InvalidHeader(header.clone()))?;
        let time = header_fields.next().and_then(|field| field.parse().ok());

        let mut values = Vec::with_capacity(natom * 3);
        for (line_index, line) in lines.enumerate() {
            let line = line?;
            for field in split_fields(&line) {
                let value: f64 = field.parse().map_err(|_| InpcrdError::InvalidValue {
                    line: line_index + 3,
                    value: field.to_string(),
                })?;
                values.push(value);
            }
        }

        // The value count determines the layout: coordinates, optionally a
        // velocity block of the same size, optionally a trailing box record
        // of three lengths or three lengths plus three angles. The counts
        // collide for one- and two-atom files; the box reading wins there.
        let ncoord = natom * 3;
        let (has_velocities, box_values) = match values.len() {
            n if n == ncoord => (false, 0),
            n if n == ncoord + 3 => (false, 3),
            n if n == ncoord + 6 => (false, 6),
            n if n == 2 * ncoord => (true, 0),
            n if n == 2 * ncoord + 3 => (true, 3),
            n if n == 2 * ncoord + 6 => (true, 6),
            count => {
                return Err(InpcrdError::UnexpectedValueCount { natom, count });
            }
        };

        let positions = values[..ncoord]
            .chunks_exact(3)
            .map(|c| {
                Point3::new(c[0], c[1], c[2]) * units::ANGSTROM_TO_NM
            })
            .collect();

        let velocities = has_velocities.then(|| {
            values[ncoord..2 * ncoord]
                .chunks_exact(3)
                .map(|c| Vector3::new(c[0], c[1], c[2]) * units::AMBER_VELOCITY_TO_NM_PS)
                .collect()
        });

        let cell = if box_values > 0 {
            let record = &values[values.len() - box_values..];
            let lengths = Vector3::new(record[0], record[1], record[2]) * units::ANGSTROM_TO_NM;
            let angles = if box_values == 6 {
                Vector3::new(record[3], record[4], record[5])
            } else {
                Vector3::new(90.0, 90.0, 90.0)
            };
            Some(UnitCell::new(lengths, angles))
        } else {
            None
        };

        Ok(Self {
            title,
            time,
            positions,
            velocities,
            cell,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufReader;

    fn read(text: &str) -> Result<InpcrdFile, InpcrdError> {
        let mut reader = BufReader::new(text.as_bytes());
        InpcrdFile::read_from(&mut reader)
    }

    const TWO_ATOMS: &str = "\
generated test coordinates
     2
   1.0000000   2.0000000   3.0000000   4.0000000   5.0000000   6.0000000
";

    #[test]
    fn reads_positions_in_nm() {
        let file = read(TWO_ATOMS).unwrap();
        assert_eq!(file.title, "generated test coordinates");
        assert_eq!(file.num_atoms(), 2);
        assert!(file.velocities.is_none());
        assert!(file.cell.is_none());
        assert!((file.positions[0].x - 0.1).abs() < 1e-12);
        assert!((file.positions[1].z - 0.6).abs() < 1e-12);
    }

    #[test]
    fn reads_time_from_the_header_when_present() {
        let text = "\
restart
     2   150.0
   1.0000000   2.0000000   3.0000000   4.0000000   5.0000000   6.0000000
";
        let file = read(text).unwrap();
        assert_eq!(file.time, Some(150.0));
    }

    #[test]
    fn trailing_three_value_record_is_an_orthorhombic_box() {
        let text = "\
periodic
     2
   1.0000000   2.0000000   3.0000000   4.0000000   5.0000000   6.0000000
  20.0000000  30.0000000  40.0000000
";
        let file = read(text).unwrap();
        let cell = file.cell.unwrap();
        assert!(cell.is_orthorhombic());
        assert!((cell.lengths.x - 2.0).abs() < 1e-12);
        let [a, b, c] = file.box_vectors().unwrap();
        assert!((a.x - 2.0).abs() < 1e-12);
        assert!((b.y - 3.0).abs() < 1e-12);
        assert!((c.z - 4.0).abs() < 1e-12);
    }

    #[test]
    fn six_value_record_carries_angles() {
        let text = "\
triclinic
     1
   1.0000000   2.0000000   3.0000000
  20.0000000  20.0000000  20.0000000 109.4712190 109.4712190 109.4712190
";
        let file = read(text).unwrap();
        let cell = file.cell.unwrap();
        assert!(!cell.is_orthorhombic());
        assert!((cell.angles.x - 109.471_219).abs() < 1e-9);
    }

    #[test]
    fn restart_velocity_block_is_scaled_to_nm_per_ps() {
        let text = "\
restart with velocities
     3    10.0
   1.0000000   2.0000000   3.0000000   4.0000000   5.0000000   6.0000000
   7.0000000   8.0000000   9.0000000
   0.5000000   0.0000000   0.0000000   0.0000000   0.2000000   0.0000000
   0.0000000   0.0000000   0.1000000
";
        let file = read(text).unwrap();
        assert_eq!(file.num_atoms(), 3);
        let velocities = file.velocities.as_ref().unwrap();
        assert_eq!(velocities.len(), 3);
        assert!((velocities[0].x - 0.5 * 2.0455).abs() < 1e-12);
        assert!((velocities[1].y - 0.2 * 2.0455).abs() < 1e-12);
        assert!(file.cell.is_none());
    }

    #[test]
    fn value_count_mismatch_is_a_typed_error() {
        let text = "\
truncated
     2
   1.0000000   2.0000000   3.0000000   4.0000000
";
        match read(text) {
            Err(InpcrdError::UnexpectedValueCount { natom, count }) => {
                assert_eq!(natom, 2);
                assert_eq!(count, 4);
            }
            other => panic!("expected UnexpectedValueCount, got {:?}", other.err()),
        }
    }

    #[test]
    fn garbage_header_is_rejected() {
        assert!(matches!(
            read("title\nnot-a-count\n"),
            Err(InpcrdError::InvalidHeader(_))
        ));
        assert!(matches!(read(""), Err(InpcrdError::Empty)));
    }

    #[test]
    fn fused_negative_columns_split_on_fixed_width() {
        let fields = split_fields("-123.4567890-124.5678901   5.0000000");
        assert_eq!(fields, vec!["-123.4567890", "-124.5678901", "5.0000000"]);
    }
}
