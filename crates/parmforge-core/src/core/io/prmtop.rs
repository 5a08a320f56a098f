use super::traits::AmberFile;
use crate::core::forcefield::params::{
    AmberParams, AngleType, BondType, GbInputs, LjTables, TorsionType,
};
use crate::core::models::atom::Atom;
use crate::core::models::cell::UnitCell;
use crate::core::models::element;
use crate::core::models::residue::Residue;
use crate::core::models::topology::{Angle, Bond, Topology, Torsion};
use crate::core::utils::units;
use nalgebra::Vector3;
use std::collections::HashMap;
use std::io::{self, BufRead};
use thiserror::Error;
use tracing::warn;

/// 1-4 electrostatic scale divisor used when the file carries no
/// SCEE_SCALE_FACTOR section.
const DEFAULT_SCEE: f64 = 1.2;

/// 1-4 Lennard-Jones scale divisor used when the file carries no
/// SCNB_SCALE_FACTOR section.
const DEFAULT_SCNB: f64 = 2.0;

/// Item width for fixed-width string sections whose %FORMAT line is absent.
const DEFAULT_STRING_WIDTH: usize = 4;

#[derive(Debug, Error)]
pub enum PrmtopError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error in section {flag}: {kind}")]
    Parse {
        flag: String,
        kind: PrmtopParseErrorKind,
    },
    #[error("Missing required section: {0}")]
    MissingSection(String),
    #[error("Inconsistent data: {0}")]
    Inconsistency(String),
    #[error("CHAMBER-flavored topology files are not supported")]
    ChamberTopology,
    #[error("The 10-12 hydrogen bond potential is not supported")]
    HydrogenBondPotential,
}

#[derive(Debug, Error)]
pub enum PrmtopParseErrorKind {
    #[error("Invalid integer value '{value}'")]
    InvalidInt { value: String },
    #[error("Invalid float value '{value}'")]
    InvalidFloat { value: String },
    #[error("Section has {actual} values, expected at least {expected}")]
    TooShort { expected: usize, actual: usize },
    #[error("Index {value} is out of range (limit {limit})")]
    IndexOutOfRange { value: i64, limit: usize },
}

/// One %FLAG section: its raw data lines plus the item width declared by
/// the %FORMAT line when the field kind is alphanumeric.
struct Section {
    lines: Vec<String>,
    string_width: Option<usize>,
}

/// The sectioned body of an AMBER7 topology file.
struct SectionTable {
    version: Option<String>,
    sections: HashMap<String, Section>,
}

/// Extracts the item width from a %FORMAT descriptor such as
/// "%FORMAT(20a4)". Only alphanumeric field kinds matter; numeric sections
/// are whitespace-separated in every writer in circulation.
fn string_width_of_format(line: &str) -> Option<usize> {
    let inner = line.trim().strip_prefix("%FORMAT(")?.strip_suffix(')')?;
    let rest = inner.trim_start_matches(|c: char| c.is_ascii_digit());
    let mut chars = rest.chars();
    let kind = chars.next()?;
    if !matches!(kind, 'a' | 'A') {
        return None;
    }
    let width: String = chars
        .as_str()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    width.parse().ok()
}

/// Parses a Fortran-formatted float, accepting the D exponent marker some
/// writers emit.
fn parse_fortran_float(value: &str) -> Option<f64> {
    value
        .parse()
        .ok()
        .or_else(|| value.replace(['D', 'd'], "E").parse().ok())
}

impl SectionTable {
    fn read_from(reader: &mut impl BufRead) -> Result<Self, PrmtopError> {
        let mut sections: HashMap<String, Section> = HashMap::new();
        let mut version = None;
        let mut current: Option<(String, Section)> = None;

        for line in reader.lines() {
            let line = line?;
            if let Some(flag) = line.strip_prefix("%FLAG") {
                if let Some((name, section)) = current.take() {
                    sections.insert(name, section);
                }
                current = Some((
                    flag.trim().to_string(),
                    Section {
                        lines: Vec::new(),
                        string_width: None,
                    },
                ));
            } else if line.starts_with("%FORMAT") {
                if let Some((_, section)) = current.as_mut() {
                    section.string_width = string_width_of_format(&line);
                }
            } else if let Some(rest) = line.strip_prefix("%VERSION") {
                version = Some(rest.trim().to_string());
            } else if line.starts_with("%COMMENT") {
                continue;
            } else if let Some((_, section)) = current.as_mut() {
                section.lines.push(line);
            }
        }
        if let Some((name, section)) = current {
            sections.insert(name, section);
        }

        Ok(Self { version, sections })
    }

    fn contains(&self, flag: &str) -> bool {
        self.sections.contains_key(flag)
    }

    fn section(&self, flag: &str) -> Result<&Section, PrmtopError> {
        self.sections
            .get(flag)
            .ok_or_else(|| PrmtopError::MissingSection(flag.to_string()))
    }

    fn integers(&self, flag: &str) -> Result<Vec<i64>, PrmtopError> {
        let section = self.section(flag)?;
        let mut values = Vec::new();
        for line in &section.lines {
            for word in line.split_whitespace() {
                let value = word.parse().map_err(|_| PrmtopError::Parse {
                    flag: flag.to_string(),
                    kind: PrmtopParseErrorKind::InvalidInt { value: word.into() },
                })?;
                values.push(value);
            }
        }
        Ok(values)
    }

    fn floats(&self, flag: &str) -> Result<Vec<f64>, PrmtopError> {
        let section = self.section(flag)?;
        let mut values = Vec::new();
        for line in &section.lines {
            for word in line.split_whitespace() {
                let value = parse_fortran_float(word).ok_or_else(|| PrmtopError::Parse {
                    flag: flag.to_string(),
                    kind: PrmtopParseErrorKind::InvalidFloat { value: word.into() },
                })?;
                values.push(value);
            }
        }
        Ok(values)
    }

    /// Fixed-width string values (atom names may legitimately contain
    /// spaces in their padding, so whitespace splitting does not apply).
    fn strings(&self, flag: &str) -> Result<Vec<String>, PrmtopError> {
        let section = self.section(flag)?;
        let width = section.string_width.unwrap_or(DEFAULT_STRING_WIDTH);
        let mut values = Vec::new();
        for line in &section.lines {
            let mut pos = 0;
            while pos < line.len() {
                let end = (pos + width).min(line.len());
                let item = line[pos..end].trim();
                if !item.is_empty() {
                    values.push(item.to_string());
                }
                pos += width;
            }
        }
        Ok(values)
    }

    fn try_floats(&self, flag: &str) -> Result<Option<Vec<f64>>, PrmtopError> {
        if self.contains(flag) {
            self.floats(flag).map(Some)
        } else {
            Ok(None)
        }
    }

    fn try_integers(&self, flag: &str) -> Result<Option<Vec<i64>>, PrmtopError> {
        if self.contains(flag) {
            self.integers(flag).map(Some)
        } else {
            Ok(None)
        }
    }

    fn try_strings(&self, flag: &str) -> Result<Option<Vec<String>>, PrmtopError> {
        if self.contains(flag) {
            self.strings(flag).map(Some)
        } else {
            Ok(None)
        }
    }

    /// The first data line of a section, trimmed. Free-text sections
    /// (TITLE, RADIUS_SET) are single lines that must not be chopped into
    /// fixed-width items.
    fn first_line(&self, flag: &str) -> Option<String> {
        self.sections
            .get(flag)?
            .lines
            .first()
            .map(|line| line.trim().to_string())
    }
}

fn too_short(flag: &str, expected: usize, actual: usize) -> PrmtopError {
    PrmtopError::Parse {
        flag: flag.to_string(),
        kind: PrmtopParseErrorKind::TooShort { expected, actual },
    }
}

fn require_len<T>(flag: &str, values: &[T], expected: usize) -> Result<(), PrmtopError> {
    if values.len() < expected {
        return Err(too_short(flag, expected, values.len()));
    }
    Ok(())
}

/// Rebases a 1-based file index to 0-based, bounds-checked.
fn rebase_index(flag: &str, value: i64, limit: usize) -> Result<usize, PrmtopError> {
    if value < 1 || value as usize > limit {
        return Err(PrmtopError::Parse {
            flag: flag.to_string(),
            kind: PrmtopParseErrorKind::IndexOutOfRange { value, limit },
        });
    }
    Ok((value - 1) as usize)
}

/// An atom index from a bonded-term list: stored premultiplied by 3 in the
/// file, possibly sign-flagged.
fn bonded_atom_index(flag: &str, value: i64, natom: usize) -> Result<usize, PrmtopError> {
    let index = (value.unsigned_abs() / 3) as usize;
    if index >= natom {
        return Err(PrmtopError::Parse {
            flag: flag.to_string(),
            kind: PrmtopParseErrorKind::IndexOutOfRange {
                value,
                limit: natom * 3,
            },
        });
    }
    Ok(index)
}

/// A parsed AMBER topology file: the molecular topology plus the
/// force-field parameter tables it carries, all in internal units.
pub struct PrmtopFile {
    /// The %VERSION stamp, when present.
    pub version: Option<String>,
    /// The TITLE section's first line.
    pub title: String,
    pub topology: Topology,
    pub params: AmberParams,
}

impl AmberFile for PrmtopFile {
    type Error = PrmtopError;

    fn read_from(reader: &mut impl BufRead) -> Result<Self, Self::Error> {
        let sections = SectionTable::read_from(reader)?;

        if sections.contains("CTITLE") {
            return Err(PrmtopError::ChamberTopology);
        }

        let pointers = sections.integers("POINTERS")?;
        require_len("POINTERS", &pointers, 18)?;
        let natom = pointers[0].max(0) as usize;
        let ntypes = pointers[1].max(0) as usize;
        let nres = pointers[11].max(0) as usize;
        let nptra = pointers[17].max(0) as usize;
        let nphb = pointers.get(19).copied().unwrap_or(0);
        let ifbox = pointers.get(27).copied().unwrap_or(0);

        if nphb > 0 {
            let hbond_a = sections.try_floats("HBOND_ACOEF")?.unwrap_or_default();
            let hbond_b = sections.try_floats("HBOND_BCOEF")?.unwrap_or_default();
            if hbond_a.iter().chain(&hbond_b).any(|&v| v != 0.0) {
                return Err(PrmtopError::HydrogenBondPotential);
            }
        }

        let title = sections.first_line("TITLE").unwrap_or_default();

        let atoms = read_atoms(&sections, natom, ntypes)?;
        let residues = read_residues(&sections, natom, nres)?;
        let atoms = assign_residue_indices(atoms, &residues);

        let bond_types = read_bond_types(&sections)?;
        let angle_types = read_angle_types(&sections)?;
        let torsion_types = read_torsion_types(&sections, nptra)?;

        let bonds = read_bonds(&sections, natom, bond_types.len())?;
        let angles = read_angles(&sections, natom, angle_types.len())?;
        let torsions = read_torsions(&sections, natom, torsion_types.len())?;

        let lj = read_lj_tables(&sections, ntypes)?;
        let gb = read_gb_inputs(&sections, natom)?;
        let cell = read_cell(&sections, ifbox)?;

        let topology = Topology::new(atoms, residues, bonds, angles, torsions, cell);
        let params = AmberParams {
            bond_types,
            angle_types,
            torsion_types,
            lj,
            gb,
        };

        Ok(Self {
            version: sections.version.clone(),
            title,
            topology,
            params,
        })
    }
}

fn read_atoms(
    sections: &SectionTable,
    natom: usize,
    ntypes: usize,
) -> Result<Vec<Atom>, PrmtopError> {
    let names = sections.strings("ATOM_NAME")?;
    require_len("ATOM_NAME", &names, natom)?;

    let charges = sections.floats("CHARGE")?;
    require_len("CHARGE", &charges, natom)?;

    let masses = sections.floats("MASS")?;
    require_len("MASS", &masses, natom)?;

    let type_indices = sections.integers("ATOM_TYPE_INDEX")?;
    require_len("ATOM_TYPE_INDEX", &type_indices, natom)?;

    let amber_types = sections.try_strings("AMBER_ATOM_TYPE")?;
    let atomic_numbers = sections.try_integers("ATOMIC_NUMBER")?;

    let mut atoms = Vec::with_capacity(natom);
    for i in 0..natom {
        let atomic_number = match &atomic_numbers {
            Some(numbers) => {
                let z = numbers.get(i).copied().unwrap_or(-1);
                (z > 0).then(|| z as u8)
            }
            // Old-format files predate the ATOMIC_NUMBER section.
            None => element::atomic_number_from_mass(masses[i]),
        };
        atoms.push(Atom {
            name: names[i].clone(),
            amber_type: amber_types
                .as_ref()
                .and_then(|t| t.get(i).cloned())
                .unwrap_or_default(),
            charge: charges[i] / units::AMBER_CHARGE_FACTOR,
            mass: masses[i],
            atomic_number,
            lj_type: rebase_index("ATOM_TYPE_INDEX", type_indices[i], ntypes)?,
            residue_index: 0,
        });
    }
    Ok(atoms)
}

fn read_residues(
    sections: &SectionTable,
    natom: usize,
    nres: usize,
) -> Result<Vec<Residue>, PrmtopError> {
    let labels = sections.strings("RESIDUE_LABEL")?;
    require_len("RESIDUE_LABEL", &labels, nres)?;

    let pointers = sections.integers("RESIDUE_POINTER")?;
    require_len("RESIDUE_POINTER", &pointers, nres)?;

    let mut residues = Vec::with_capacity(nres);
    for i in 0..nres {
        let first = rebase_index("RESIDUE_POINTER", pointers[i], natom.max(1))?;
        let end = if i + 1 < nres {
            rebase_index("RESIDUE_POINTER", pointers[i + 1], natom.max(1))?
        } else {
            natom
        };
        if end < first {
            return Err(PrmtopError::Inconsistency(format!(
                "RESIDUE_POINTER is not monotonic at residue {}",
                i + 1
            )));
        }
        residues.push(Residue::new(&labels[i], first, end - first));
    }
    Ok(residues)
}

fn assign_residue_indices(mut atoms: Vec<Atom>, residues: &[Residue]) -> Vec<Atom> {
    for (res_index, residue) in residues.iter().enumerate() {
        for atom_index in residue.atom_range() {
            atoms[atom_index].residue_index = res_index;
        }
    }
    atoms
}

fn read_bond_types(sections: &SectionTable) -> Result<Vec<BondType>, PrmtopError> {
    let k = sections.floats("BOND_FORCE_CONSTANT")?;
    let length = sections.floats("BOND_EQUIL_VALUE")?;
    require_len("BOND_EQUIL_VALUE", &length, k.len())?;
    Ok(k.iter()
        .zip(&length)
        .map(|(&k, &r0)| BondType {
            length: r0 * units::ANGSTROM_TO_NM,
            k: k * units::BOND_K_TO_INTERNAL,
        })
        .collect())
}

fn read_angle_types(sections: &SectionTable) -> Result<Vec<AngleType>, PrmtopError> {
    let k = sections.floats("ANGLE_FORCE_CONSTANT")?;
    let theta = sections.floats("ANGLE_EQUIL_VALUE")?;
    require_len("ANGLE_EQUIL_VALUE", &theta, k.len())?;
    Ok(k.iter()
        .zip(&theta)
        .map(|(&k, &theta0)| AngleType {
            angle: theta0,
            k: k * units::ANGLE_K_TO_INTERNAL,
        })
        .collect())
}

fn read_torsion_types(
    sections: &SectionTable,
    nptra: usize,
) -> Result<Vec<TorsionType>, PrmtopError> {
    let k = sections.floats("DIHEDRAL_FORCE_CONSTANT")?;
    let periodicity = sections.floats("DIHEDRAL_PERIODICITY")?;
    let phase = sections.floats("DIHEDRAL_PHASE")?;
    require_len("DIHEDRAL_FORCE_CONSTANT", &k, nptra)?;
    require_len("DIHEDRAL_PERIODICITY", &periodicity, nptra)?;
    require_len("DIHEDRAL_PHASE", &phase, nptra)?;

    let scee = sections.try_floats("SCEE_SCALE_FACTOR")?;
    let scnb = sections.try_floats("SCNB_SCALE_FACTOR")?;

    let scale = |table: &Option<Vec<f64>>, i: usize, default: f64| -> f64 {
        match table.as_ref().and_then(|t| t.get(i)).copied() {
            // A zero scale factor would divide the 1-4 terms away entirely;
            // treat it like the section being absent.
            Some(value) if value > 0.0 => value,
            _ => default,
        }
    };

    Ok((0..nptra)
        .map(|i| TorsionType {
            periodicity: periodicity[i].round() as i32,
            phase: phase[i],
            k: k[i] * units::KCAL_TO_KJ,
            scee: scale(&scee, i, DEFAULT_SCEE),
            scnb: scale(&scnb, i, DEFAULT_SCNB),
        })
        .collect())
}

fn read_bonds(
    sections: &SectionTable,
    natom: usize,
    num_types: usize,
) -> Result<Vec<Bond>, PrmtopError> {
    let mut bonds = Vec::new();
    for flag in ["BONDS_INC_HYDROGEN", "BONDS_WITHOUT_HYDROGEN"] {
        let Some(raw) = sections.try_integers(flag)? else {
            continue;
        };
        for chunk in raw.chunks_exact(3) {
            bonds.push(Bond::new(
                bonded_atom_index(flag, chunk[0], natom)?,
                bonded_atom_index(flag, chunk[1], natom)?,
                rebase_index(flag, chunk[2], num_types)?,
            ));
        }
    }
    Ok(bonds)
}

fn read_angles(
    sections: &SectionTable,
    natom: usize,
    num_types: usize,
) -> Result<Vec<Angle>, PrmtopError> {
    let mut angles = Vec::new();
    for flag in ["ANGLES_INC_HYDROGEN", "ANGLES_WITHOUT_HYDROGEN"] {
        let Some(raw) = sections.try_integers(flag)? else {
            continue;
        };
        for chunk in raw.chunks_exact(4) {
            angles.push(Angle::new(
                bonded_atom_index(flag, chunk[0], natom)?,
                bonded_atom_index(flag, chunk[1], natom)?,
                bonded_atom_index(flag, chunk[2], natom)?,
                rebase_index(flag, chunk[3], num_types)?,
            ));
        }
    }
    Ok(angles)
}

fn read_torsions(
    sections: &SectionTable,
    natom: usize,
    num_types: usize,
) -> Result<Vec<Torsion>, PrmtopError> {
    let mut torsions = Vec::new();
    for flag in ["DIHEDRALS_INC_HYDROGEN", "DIHEDRALS_WITHOUT_HYDROGEN"] {
        let Some(raw) = sections.try_integers(flag)? else {
            continue;
        };
        for chunk in raw.chunks_exact(5) {
            torsions.push(Torsion {
                i: bonded_atom_index(flag, chunk[0], natom)?,
                j: bonded_atom_index(flag, chunk[1], natom)?,
                k: bonded_atom_index(flag, chunk[2], natom)?,
                l: bonded_atom_index(flag, chunk[3], natom)?,
                type_index: rebase_index(flag, chunk[4], num_types)?,
                // Sign flags: negative third atom suppresses the 1-4 pair
                // (rings, multi-term duplicates), negative fourth marks an
                // improper.
                skip_14: chunk[2] < 0,
                improper: chunk[3] < 0,
            });
        }
    }
    Ok(torsions)
}

fn read_lj_tables(sections: &SectionTable, ntypes: usize) -> Result<LjTables, PrmtopError> {
    let parm_index_raw = sections.integers("NONBONDED_PARM_INDEX")?;
    require_len("NONBONDED_PARM_INDEX", &parm_index_raw, ntypes * ntypes)?;

    let acoef: Vec<f64> = sections
        .floats("LENNARD_JONES_ACOEF")?
        .iter()
        .map(|a| a * units::LJ_ACOEF_TO_INTERNAL)
        .collect();
    let bcoef: Vec<f64> = sections
        .floats("LENNARD_JONES_BCOEF")?
        .iter()
        .map(|b| b * units::LJ_BCOEF_TO_INTERNAL)
        .collect();
    let expected = ntypes * (ntypes + 1) / 2;
    require_len("LENNARD_JONES_ACOEF", &acoef, expected)?;
    require_len("LENNARD_JONES_BCOEF", &bcoef, expected)?;

    let ccoef = sections
        .try_floats("LENNARD_JONES_CCOEF")?
        .map(|c| {
            require_len("LENNARD_JONES_CCOEF", &c, expected)?;
            Ok::<_, PrmtopError>(c.iter().map(|v| v * units::LJ_CCOEF_TO_INTERNAL).collect())
        })
        .transpose()?;

    let mut parm_index = Vec::with_capacity(ntypes * ntypes);
    for &raw in parm_index_raw.iter().take(ntypes * ntypes) {
        if raw > 0 {
            let pos = rebase_index("NONBONDED_PARM_INDEX", raw, acoef.len())?;
            parm_index.push(pos as isize);
        } else {
            // Zero or negative entries route to the 10-12 table, which is
            // rejected above when populated; treat as no interaction.
            parm_index.push(-1);
        }
    }

    Ok(LjTables::new(ntypes, parm_index, acoef, bcoef, ccoef))
}

fn read_gb_inputs(sections: &SectionTable, natom: usize) -> Result<Option<GbInputs>, PrmtopError> {
    let radii = sections.try_floats("RADII")?;
    let screen = sections.try_floats("SCREEN")?;
    match (radii, screen) {
        (Some(radii), Some(screen)) => {
            require_len("RADII", &radii, natom)?;
            require_len("SCREEN", &screen, natom)?;
            Ok(Some(GbInputs {
                radii: radii.iter().map(|r| r * units::ANGSTROM_TO_NM).collect(),
                screen,
                radius_set: sections.first_line("RADIUS_SET"),
            }))
        }
        (None, None) => Ok(None),
        _ => Err(PrmtopError::Inconsistency(
            "RADII and SCREEN must be present together".to_string(),
        )),
    }
}

fn read_cell(sections: &SectionTable, ifbox: i64) -> Result<Option<UnitCell>, PrmtopError> {
    let Some(dims) = sections.try_floats("BOX_DIMENSIONS")? else {
        if ifbox > 0 {
            warn!("Topology declares a periodic box but carries no BOX_DIMENSIONS section");
        }
        return Ok(None);
    };
    require_len("BOX_DIMENSIONS", &dims, 4)?;
    // BOX_DIMENSIONS is [beta, a, b, c]; all three cell angles equal beta.
    let beta = dims[0];
    let lengths = Vector3::new(dims[1], dims[2], dims[3]) * units::ANGSTROM_TO_NM;
    Ok(Some(UnitCell::new(
        lengths,
        Vector3::new(beta, beta, beta),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufReader, Write};
    use tempfile::NamedTempFile;

    /// Hydrogen peroxide: four atoms, two LJ types, three bonds, two
    /// angles, one proper torsion. Charges are written premultiplied by
    /// 18.2223 the way the format stores them.
    fn peroxide_prmtop(extra_sections: &str) -> String {
        let mut text = String::from(
            "%VERSION  VERSION_STAMP = V0001.000  DATE = 01/01/20  00:00:00\n\
             %FLAG TITLE\n%FORMAT(20a4)\nHOOH\n\
             %FLAG POINTERS\n%FORMAT(10I8)\n\
                    4       2       2       1       2       0       1       0       0       0\n\
                    6       1       1       0       0       2       1       1       2       0\n\
                    0       0       0       0       0       0       0       0       0       0\n\
                    0\n\
             %FLAG ATOM_NAME\n%FORMAT(20a4)\nH1  O1  O2  H2\n\
             %FLAG CHARGE\n%FORMAT(5E16.8)\n\
               6.37780500E+00 -6.37780500E+00 -6.37780500E+00  6.37780500E+00\n\
             %FLAG MASS\n%FORMAT(5E16.8)\n\
               1.00800000E+00  1.59990000E+01  1.59990000E+01  1.00800000E+00\n\
             %FLAG ATOM_TYPE_INDEX\n%FORMAT(10I8)\n       1       2       2       1\n\
             %FLAG AMBER_ATOM_TYPE\n%FORMAT(20a4)\nHO  OH  OH  HO\n\
             %FLAG ATOMIC_NUMBER\n%FORMAT(10I8)\n       1       8       8       1\n\
             %FLAG RESIDUE_LABEL\n%FORMAT(20a4)\nPER\n\
             %FLAG RESIDUE_POINTER\n%FORMAT(10I8)\n       1\n\
             %FLAG BOND_FORCE_CONSTANT\n%FORMAT(5E16.8)\n  5.53000000E+02  3.00000000E+02\n\
             %FLAG BOND_EQUIL_VALUE\n%FORMAT(5E16.8)\n  9.50000000E-01  1.45000000E+00\n\
             %FLAG ANGLE_FORCE_CONSTANT\n%FORMAT(5E16.8)\n  1.00000000E+02\n\
             %FLAG ANGLE_EQUIL_VALUE\n%FORMAT(5E16.8)\n  1.75000000E+00\n\
             %FLAG DIHEDRAL_FORCE_CONSTANT\n%FORMAT(5E16.8)\n  1.40000000E+00\n\
             %FLAG DIHEDRAL_PERIODICITY\n%FORMAT(5E16.8)\n  2.00000000E+00\n\
             %FLAG DIHEDRAL_PHASE\n%FORMAT(5E16.8)\n  0.00000000E+00\n\
             %FLAG BONDS_INC_HYDROGEN\n%FORMAT(10I8)\n       0       3       1       6       9       1\n\
             %FLAG BONDS_WITHOUT_HYDROGEN\n%FORMAT(10I8)\n       3       6       2\n\
             %FLAG ANGLES_INC_HYDROGEN\n%FORMAT(10I8)\n\
                    0       3       6       1       3       6       9       1\n\
             %FLAG DIHEDRALS_INC_HYDROGEN\n%FORMAT(10I8)\n       0       3       6       9       1\n\
             %FLAG NONBONDED_PARM_INDEX\n%FORMAT(10I8)\n       1       2       2       3\n\
             %FLAG LENNARD_JONES_ACOEF\n%FORMAT(5E16.8)\n\
               1.00000000E+02  2.00000000E+03  6.00000000E+04\n\
             %FLAG LENNARD_JONES_BCOEF\n%FORMAT(5E16.8)\n\
               1.00000000E+01  5.00000000E+01  2.00000000E+02\n",
        );
        text.push_str(extra_sections);
        text
    }

    fn read(text: &str) -> Result<PrmtopFile, PrmtopError> {
        let mut reader = BufReader::new(text.as_bytes());
        PrmtopFile::read_from(&mut reader)
    }

    mod parsing {
        use super::*;

        #[test]
        fn reads_atoms_residues_and_title() {
            let file = read(&peroxide_prmtop("")).unwrap();
            assert_eq!(file.title, "HOOH");
            assert!(file.version.is_some());

            let topology = &file.topology;
            assert_eq!(topology.num_atoms(), 4);
            assert_eq!(topology.num_residues(), 1);
            assert_eq!(topology.atom(0).unwrap().name, "H1");
            assert_eq!(topology.atom(1).unwrap().amber_type, "OH");
            assert_eq!(topology.atom(1).unwrap().atomic_number, Some(8));
            assert_eq!(topology.residue(0).unwrap().name, "PER");
            assert_eq!(topology.residue(0).unwrap().atom_range(), 0..4);
        }

        #[test]
        fn converts_charges_to_elementary_units() {
            let file = read(&peroxide_prmtop("")).unwrap();
            let charge = file.topology.atom(0).unwrap().charge;
            assert!((charge - 0.35).abs() < 1e-6);
        }

        #[test]
        fn converts_bond_parameters_to_internal_units() {
            let file = read(&peroxide_prmtop("")).unwrap();
            let oh = &file.params.bond_types[0];
            assert!((oh.length - 0.095).abs() < 1e-12);
            // 553 kcal/(mol A^2), doubled and rescaled.
            assert!((oh.k - 553.0 * 836.8).abs() < 1e-6);
        }

        #[test]
        fn reads_bonded_term_lists_with_rebased_indices() {
            let file = read(&peroxide_prmtop("")).unwrap();
            let topology = &file.topology;

            assert_eq!(topology.bonds().len(), 3);
            assert_eq!(topology.bonds()[0], Bond::new(0, 1, 0));
            assert_eq!(topology.bonds()[2], Bond::new(1, 2, 1));

            assert_eq!(topology.angles().len(), 2);
            assert_eq!(topology.angles()[0].j, 1);

            assert_eq!(topology.torsions().len(), 1);
            let torsion = topology.torsions()[0];
            assert_eq!((torsion.i, torsion.j, torsion.k, torsion.l), (0, 1, 2, 3));
            assert!(!torsion.improper);
            assert!(!torsion.skip_14);
        }

        #[test]
        fn negative_dihedral_indices_set_the_flags() {
            let text = peroxide_prmtop("").replace(
                "%FLAG DIHEDRALS_INC_HYDROGEN\n%FORMAT(10I8)\n       0       3       6       9       1\n",
                "%FLAG DIHEDRALS_INC_HYDROGEN\n%FORMAT(10I8)\n       0       3      -6      -9       1\n",
            );
            let file = read(&text).unwrap();
            let torsion = file.topology.torsions()[0];
            assert!(torsion.skip_14);
            assert!(torsion.improper);
            assert_eq!((torsion.k, torsion.l), (2, 3));
        }

        #[test]
        fn torsion_scale_factors_default_when_sections_absent() {
            let file = read(&peroxide_prmtop("")).unwrap();
            let torsion_type = &file.params.torsion_types[0];
            assert_eq!(torsion_type.scee, 1.2);
            assert_eq!(torsion_type.scnb, 2.0);
            assert_eq!(torsion_type.periodicity, 2);
            assert!((torsion_type.k - 1.4 * 4.184).abs() < 1e-9);
        }

        #[test]
        fn torsion_scale_factors_read_from_file_when_present() {
            let file = read(&peroxide_prmtop(
                "%FLAG SCEE_SCALE_FACTOR\n%FORMAT(5E16.8)\n  1.00000000E+00\n\
                 %FLAG SCNB_SCALE_FACTOR\n%FORMAT(5E16.8)\n  1.50000000E+00\n",
            ))
            .unwrap();
            let torsion_type = &file.params.torsion_types[0];
            assert_eq!(torsion_type.scee, 1.0);
            assert_eq!(torsion_type.scnb, 1.5);
        }

        #[test]
        fn lj_diagonal_recovers_sigma_epsilon_in_internal_units() {
            let file = read(&peroxide_prmtop("")).unwrap();
            // Type 1 diagonal: A = 100 kcal A^12, B = 10 kcal A^6.
            let (sigma, epsilon) = file.params.lj.diagonal(0);
            let sigma_expected = 10.0f64.powf(1.0 / 6.0) * 0.1;
            let eps_expected = 10.0 * 10.0 / (4.0 * 100.0) * 4.184;
            assert!((sigma - sigma_expected).abs() < 1e-12);
            assert!((epsilon - eps_expected).abs() < 1e-12);
        }

        #[test]
        fn gb_inputs_require_both_radii_and_screen() {
            let with_both = read(&peroxide_prmtop(
                "%FLAG RADII\n%FORMAT(5E16.8)\n\
                   8.00000000E-01  1.50000000E+00  1.50000000E+00  8.00000000E-01\n\
                 %FLAG SCREEN\n%FORMAT(5E16.8)\n\
                   8.50000000E-01  7.20000000E-01  7.20000000E-01  8.50000000E-01\n\
                 %FLAG RADIUS_SET\n%FORMAT(1a80)\nmodified Bondi radii (mbondi)\n",
            ))
            .unwrap();
            let gb = with_both.params.gb.as_ref().unwrap();
            assert!((gb.radii[0] - 0.08).abs() < 1e-12);
            assert_eq!(gb.screen[1], 0.72);
            assert_eq!(gb.radius_set.as_deref(), Some("modified Bondi radii (mbondi)"));

            let only_radii = read(&peroxide_prmtop(
                "%FLAG RADII\n%FORMAT(5E16.8)\n\
                   8.00000000E-01  1.50000000E+00  1.50000000E+00  8.00000000E-01\n",
            ));
            assert!(matches!(only_radii, Err(PrmtopError::Inconsistency(_))));
        }

        #[test]
        fn box_dimensions_build_a_cell_with_uniform_angles() {
            let file = read(&peroxide_prmtop(
                "%FLAG BOX_DIMENSIONS\n%FORMAT(5E16.8)\n\
                   1.09471219E+02  4.48903851E+01  4.48903851E+01  4.48903851E+01\n",
            ))
            .unwrap();
            let cell = file.topology.cell().unwrap();
            assert!((cell.lengths.x - 4.489_038_51).abs() < 1e-9);
            assert!((cell.angles.x - 109.471_219).abs() < 1e-9);
            assert_eq!(cell.angles.x, cell.angles.z);
        }

        #[test]
        fn missing_box_section_leaves_cell_unset() {
            let file = read(&peroxide_prmtop("")).unwrap();
            assert!(file.topology.cell().is_none());
        }

        #[test]
        fn reads_from_a_real_file_on_disk() {
            let mut file = NamedTempFile::new().unwrap();
            file.write_all(peroxide_prmtop("").as_bytes()).unwrap();
            let parsed = PrmtopFile::read_from_path(file.path()).unwrap();
            assert_eq!(parsed.topology.num_atoms(), 4);
        }
    }

    mod rejection {
        use super::*;

        #[test]
        fn missing_required_section_is_reported_by_name() {
            let text = peroxide_prmtop("").replace("%FLAG CHARGE\n", "%FLAG CHARGES\n");
            match read(&text) {
                Err(PrmtopError::MissingSection(flag)) => assert_eq!(flag, "CHARGE"),
                other => panic!("expected MissingSection, got {:?}", other.err()),
            }
        }

        #[test]
        fn chamber_topologies_are_rejected() {
            let text = peroxide_prmtop("%FLAG CTITLE\n%FORMAT(20a4)\nchamber\n");
            assert!(matches!(read(&text), Err(PrmtopError::ChamberTopology)));
        }

        #[test]
        fn populated_hbond_tables_are_rejected() {
            // Flip NPHB (POINTERS index 19) to one and populate the tables.
            let text = peroxide_prmtop(
                "%FLAG HBOND_ACOEF\n%FORMAT(5E16.8)\n  1.00000000E+03\n\
                 %FLAG HBOND_BCOEF\n%FORMAT(5E16.8)\n  2.00000000E+02\n",
            )
            .replace(
                "6       1       1       0       0       2       1       1       2       0\n",
                "6       1       1       0       0       2       1       1       2       1\n",
            );
            assert!(matches!(
                read(&text),
                Err(PrmtopError::HydrogenBondPotential)
            ));
        }

        #[test]
        fn unparsable_number_names_the_section() {
            let text = peroxide_prmtop("").replace("1.00800000E+00", "not-a-number");
            match read(&text) {
                Err(PrmtopError::Parse { flag, .. }) => assert_eq!(flag, "MASS"),
                other => panic!("expected Parse error, got {:?}", other.err()),
            }
        }

        #[test]
        fn out_of_range_bond_index_is_rejected() {
            let text = peroxide_prmtop("").replace(
                "%FLAG BONDS_WITHOUT_HYDROGEN\n%FORMAT(10I8)\n       3       6       2\n",
                "%FLAG BONDS_WITHOUT_HYDROGEN\n%FORMAT(10I8)\n       3      12       2\n",
            );
            assert!(matches!(read(&text), Err(PrmtopError::Parse { .. })));
        }

        #[test]
        fn short_section_reports_expected_count() {
            let text = peroxide_prmtop("").replace(
                "%FLAG MASS\n%FORMAT(5E16.8)\n\
               1.00800000E+00  1.59990000E+01  1.59990000E+01  1.00800000E+00\n",
                "%FLAG MASS\n%FORMAT(5E16.8)\n  1.00800000E+00\n",
            );
            match read(&text) {
                Err(PrmtopError::Parse {
                    flag,
                    kind: PrmtopParseErrorKind::TooShort { expected, actual },
                }) => {
                    assert_eq!(flag, "MASS");
                    assert_eq!(expected, 4);
                    assert_eq!(actual, 1);
                }
                other => panic!("expected TooShort, got {:?}", other.err()),
            }
        }
    }

    mod formats {
        use super::*;

        #[test]
        fn fortran_d_exponents_parse() {
            assert_eq!(parse_fortran_float("1.5D+01"), Some(15.0));
            assert_eq!(parse_fortran_float("1.5E+01"), Some(15.0));
            assert_eq!(parse_fortran_float("abc"), None);
        }

        #[test]
        fn format_width_extraction_handles_alpha_kinds_only() {
            assert_eq!(string_width_of_format("%FORMAT(20a4)"), Some(4));
            assert_eq!(string_width_of_format("%FORMAT(1a80)"), Some(80));
            assert_eq!(string_width_of_format("%FORMAT(5E16.8)"), None);
            assert_eq!(string_width_of_format("%FORMAT(10I8)"), None);
        }

        #[test]
        fn old_format_files_infer_atomic_numbers_from_mass() {
            let text = peroxide_prmtop("").replace(
                "%FLAG ATOMIC_NUMBER\n%FORMAT(10I8)\n       1       8       8       1\n",
                "",
            );
            let file = read(&text).unwrap();
            assert_eq!(file.topology.atom(0).unwrap().atomic_number, Some(1));
            assert_eq!(file.topology.atom(1).unwrap().atomic_number, Some(8));
        }
    }
}
