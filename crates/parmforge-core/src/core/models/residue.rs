use std::ops::Range;

/// Residue labels AMBER uses for water models.
const WATER_RESIDUE_NAMES: &[&str] = &["WAT", "HOH", "TIP3", "TIP4", "TIP5", "SPC", "SOL"];

/// Represents a residue as a contiguous run of atoms.
///
/// AMBER topologies define residues by a pointer array: each residue owns
/// the dense atom index range from its pointer up to the next residue's
/// pointer, so a start/length pair is the whole representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Residue {
    /// The residue label (e.g., "ALA", "WAT").
    pub name: String,
    /// 0-based index of the first atom in this residue.
    pub first_atom: usize,
    /// Number of atoms in this residue.
    pub num_atoms: usize,
}

impl Residue {
    pub fn new(name: &str, first_atom: usize, num_atoms: usize) -> Self {
        Self {
            name: name.to_string(),
            first_atom,
            num_atoms,
        }
    }

    /// The atom index range this residue owns.
    #[inline]
    pub fn atom_range(&self) -> Range<usize> {
        self.first_atom..self.first_atom + self.num_atoms
    }

    /// True when the residue label names a water model.
    pub fn is_water(&self) -> bool {
        WATER_RESIDUE_NAMES.contains(&self.name.as_str())
    }
}
