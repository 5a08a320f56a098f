/// Relative tolerance for deciding that an off-diagonal Lennard-Jones pair
/// deviates from the Lorentz-Berthelot combination of its diagonals.
const NBFIX_RELATIVE_TOLERANCE: f64 = 1e-5;

/// A harmonic bond type: equilibrium length in nm, force constant in
/// kJ/(mol nm^2) under the (k/2)(r-r0)^2 convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BondType {
    pub length: f64,
    pub k: f64,
}

/// A harmonic angle type: equilibrium angle in radians, force constant in
/// kJ/(mol rad^2) under the (k/2)(theta-theta0)^2 convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleType {
    pub angle: f64,
    pub k: f64,
}

/// A periodic torsion type, with the 1-4 scale factors AMBER attaches per
/// dihedral type (SCEE for electrostatics, SCNB for Lennard-Jones).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TorsionType {
    pub periodicity: i32,
    /// Phase offset in radians.
    pub phase: f64,
    /// Barrier height in kJ/mol.
    pub k: f64,
    pub scee: f64,
    pub scnb: f64,
}

/// One entry of the Lennard-Jones pair matrix in internal units:
/// A in kJ nm^12, B in kJ nm^6, and the optional 12-6-4 C4 term in kJ nm^4.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LjPair {
    pub a: f64,
    pub b: f64,
    pub c4: f64,
}

/// The type-pair Lennard-Jones matrix backed by the packed coefficient
/// arrays and the NONBONDED_PARM_INDEX lookup from the topology file.
///
/// `parm_index` is stored rebased to 0; entries below zero mark pairs that
/// have no 12-6 parameters (the historical 10-12 hydrogen-bond table, which
/// the reader rejects before this structure is built).
#[derive(Debug, Clone, PartialEq)]
pub struct LjTables {
    num_types: usize,
    parm_index: Vec<isize>,
    acoef: Vec<f64>,
    bcoef: Vec<f64>,
    ccoef: Option<Vec<f64>>,
}

impl LjTables {
    pub fn new(
        num_types: usize,
        parm_index: Vec<isize>,
        acoef: Vec<f64>,
        bcoef: Vec<f64>,
        ccoef: Option<Vec<f64>>,
    ) -> Self {
        Self {
            num_types,
            parm_index,
            acoef,
            bcoef,
            ccoef,
        }
    }

    pub fn num_types(&self) -> usize {
        self.num_types
    }

    /// True when the file carries a 12-6-4 C-coefficient table with any
    /// nonzero entry.
    pub fn has_c4_terms(&self) -> bool {
        self.ccoef
            .as_ref()
            .is_some_and(|c| c.iter().any(|&v| v != 0.0))
    }

    /// The packed-array position for a type pair, if the pair has 12-6
    /// parameters.
    fn pair_position(&self, type_i: usize, type_j: usize) -> Option<usize> {
        let idx = self.parm_index[self.num_types * type_i + type_j];
        usize::try_from(idx).ok()
    }

    /// The coefficients for a type pair. Pairs without parameters read as
    /// all-zero, which downstream force construction treats as no
    /// interaction.
    pub fn pair(&self, type_i: usize, type_j: usize) -> LjPair {
        match self.pair_position(type_i, type_j) {
            Some(pos) => LjPair {
                a: self.acoef[pos],
                b: self.bcoef[pos],
                c4: self.ccoef.as_ref().map_or(0.0, |c| c[pos]),
            },
            None => LjPair::default(),
        }
    }

    /// Extracts (sigma, epsilon) in (nm, kJ/mol) from a type's
    /// self-interaction entry. Types with vanishing coefficients (extra
    /// points) read as epsilon zero with a unit sigma placeholder.
    pub fn diagonal(&self, type_i: usize) -> (f64, f64) {
        let pair = self.pair(type_i, type_i);
        if pair.a == 0.0 || pair.b == 0.0 {
            return (1.0, 0.0);
        }
        let sigma6 = pair.a / pair.b;
        let sigma = sigma6.powf(1.0 / 6.0);
        let epsilon = pair.b * pair.b / (4.0 * pair.a);
        (sigma, epsilon)
    }

    /// True when any off-diagonal pair deviates from the Lorentz-Berthelot
    /// combination of the diagonal parameters, i.e. the file carries NBFIX
    /// overrides that a single per-particle (sigma, epsilon) assignment
    /// cannot represent.
    pub fn has_nbfix_terms(&self) -> bool {
        let diagonals: Vec<(f64, f64)> = (0..self.num_types).map(|t| self.diagonal(t)).collect();
        for i in 0..self.num_types {
            for j in (i + 1)..self.num_types {
                let actual = self.pair(i, j);
                let (sigma_i, eps_i) = diagonals[i];
                let (sigma_j, eps_j) = diagonals[j];
                let sigma = 0.5 * (sigma_i + sigma_j);
                let epsilon = (eps_i * eps_j).sqrt();
                let sigma6 = sigma.powi(6);
                let expected_b = 4.0 * epsilon * sigma6;
                let expected_a = expected_b * sigma6;
                if !within_tolerance(actual.a, expected_a)
                    || !within_tolerance(actual.b, expected_b)
                {
                    return true;
                }
            }
        }
        false
    }
}

fn within_tolerance(actual: f64, expected: f64) -> bool {
    let scale = actual.abs().max(expected.abs());
    scale == 0.0 || (actual - expected).abs() <= NBFIX_RELATIVE_TOLERANCE * scale
}

/// Per-atom Generalized Born inputs carried by the topology file.
#[derive(Debug, Clone, PartialEq)]
pub struct GbInputs {
    /// Intrinsic Born radii in nm.
    pub radii: Vec<f64>,
    /// HCT screening factors (dimensionless).
    pub screen: Vec<f64>,
    /// The radius set name declared by the file, when present.
    pub radius_set: Option<String>,
}

/// All force-field parameter tables carried by a topology file, in internal
/// units, indexed by the type indices stored on the topology's bonded terms.
#[derive(Debug, Clone, PartialEq)]
pub struct AmberParams {
    pub bond_types: Vec<BondType>,
    pub angle_types: Vec<AngleType>,
    pub torsion_types: Vec<TorsionType>,
    pub lj: LjTables,
    pub gb: Option<GbInputs>,
}
