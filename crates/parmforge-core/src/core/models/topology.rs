use super::atom::Atom;
use super::cell::UnitCell;
use super::residue::Residue;

/// A bonded pair with its type index into the bond parameter table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bond {
    pub i: usize,
    pub j: usize,
    pub type_index: usize,
}

impl Bond {
    pub fn new(i: usize, j: usize, type_index: usize) -> Self {
        Self { i, j, type_index }
    }

    pub fn contains(&self, atom: usize) -> bool {
        self.i == atom || self.j == atom
    }
}

/// An angle triple (j is the central atom) with its parameter type index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Angle {
    pub i: usize,
    pub j: usize,
    pub k: usize,
    pub type_index: usize,
}

impl Angle {
    pub fn new(i: usize, j: usize, k: usize, type_index: usize) -> Self {
        Self {
            i,
            j,
            k,
            type_index,
        }
    }
}

/// A torsion quadruple with its parameter type index.
///
/// The flags mirror the sign conventions of the AMBER dihedral lists:
/// a negative third atom marks a term whose 1-4 pair must not generate a
/// nonbonded exception (rings and multi-term duplicates), a negative fourth
/// atom marks an improper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Torsion {
    pub i: usize,
    pub j: usize,
    pub k: usize,
    pub l: usize,
    pub type_index: usize,
    pub improper: bool,
    pub skip_14: bool,
}

/// The parsed molecular topology: atoms, residues, bonded-term lists, and
/// the periodic cell when the file declares one.
///
/// Atoms are stored densely in file order; residues own contiguous runs of
/// them. A bond adjacency list is built once at construction for the
/// neighbor queries the constraint and mass-repartitioning passes need.
#[derive(Debug, Clone, PartialEq)]
pub struct Topology {
    atoms: Vec<Atom>,
    residues: Vec<Residue>,
    bonds: Vec<Bond>,
    angles: Vec<Angle>,
    torsions: Vec<Torsion>,
    cell: Option<UnitCell>,
    bond_adjacency: Vec<Vec<usize>>,
}

impl Topology {
    pub fn new(
        atoms: Vec<Atom>,
        residues: Vec<Residue>,
        bonds: Vec<Bond>,
        angles: Vec<Angle>,
        torsions: Vec<Torsion>,
        cell: Option<UnitCell>,
    ) -> Self {
        let mut bond_adjacency = vec![Vec::new(); atoms.len()];
        for bond in &bonds {
            bond_adjacency[bond.i].push(bond.j);
            bond_adjacency[bond.j].push(bond.i);
        }
        Self {
            atoms,
            residues,
            bonds,
            angles,
            torsions,
            cell,
            bond_adjacency,
        }
    }

    pub fn num_atoms(&self) -> usize {
        self.atoms.len()
    }

    pub fn num_residues(&self) -> usize {
        self.residues.len()
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn atom(&self, index: usize) -> Option<&Atom> {
        self.atoms.get(index)
    }

    pub fn residues(&self) -> &[Residue] {
        &self.residues
    }

    pub fn residue(&self, index: usize) -> Option<&Residue> {
        self.residues.get(index)
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    pub fn angles(&self) -> &[Angle] {
        &self.angles
    }

    pub fn torsions(&self) -> &[Torsion] {
        &self.torsions
    }

    pub fn cell(&self) -> Option<&UnitCell> {
        self.cell.as_ref()
    }

    /// Overrides the periodic cell (coordinate files take precedence over
    /// the topology's own box record).
    pub fn set_cell(&mut self, cell: Option<UnitCell>) {
        self.cell = cell;
    }

    /// The atoms directly bonded to `atom`.
    pub fn bonded_neighbors(&self, atom: usize) -> &[usize] {
        &self.bond_adjacency[atom]
    }

    /// The residue owning `atom`.
    pub fn residue_of(&self, atom: usize) -> &Residue {
        &self.residues[self.atoms[atom].residue_index]
    }

    /// True when the residue is a water molecule, judged by its label or,
    /// failing that, by a composition of one oxygen and two hydrogens
    /// (extra points do not disqualify a four- or five-site model).
    pub fn residue_is_water(&self, residue_index: usize) -> bool {
        let residue = &self.residues[residue_index];
        if residue.is_water() {
            return true;
        }
        let mut hydrogens = 0;
        let mut oxygens = 0;
        let mut heavy_others = 0;
        for atom in &self.atoms[residue.atom_range()] {
            match atom.atomic_number {
                Some(1) => hydrogens += 1,
                Some(8) => oxygens += 1,
                Some(_) => heavy_others += 1,
                None => {}
            }
        }
        hydrogens == 2 && oxygens == 1 && heavy_others == 0
    }

    /// True when `atom` belongs to a water molecule.
    pub fn atom_is_water(&self, atom: usize) -> bool {
        self.residue_is_water(self.atoms[atom].residue_index)
    }
}
