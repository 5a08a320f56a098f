use super::options::NonbondedMethod;
use crate::core::forcefield::gb::{GbModel, RescaleCoefficients};

/// A harmonic bond term: equilibrium length in nm, force constant in
/// kJ/(mol nm^2) under the (k/2)(r-r0)^2 convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HarmonicBond {
    pub i: usize,
    pub j: usize,
    pub length: f64,
    pub k: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HarmonicBondForce {
    pub bonds: Vec<HarmonicBond>,
}

/// A harmonic angle term over three atoms (center second), equilibrium in
/// radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HarmonicAngle {
    pub atoms: [usize; 3],
    pub angle: f64,
    pub k: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HarmonicAngleForce {
    pub angles: Vec<HarmonicAngle>,
}

/// A periodic torsion term over four atoms; impropers share the functional
/// form and live in the same list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodicTorsion {
    pub atoms: [usize; 4],
    pub periodicity: i32,
    /// Phase offset in radians.
    pub phase: f64,
    /// Barrier height in kJ/mol.
    pub k: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PeriodicTorsionForce {
    pub torsions: Vec<PeriodicTorsion>,
}

/// Per-particle nonbonded parameters: charge in elementary units, sigma in
/// nm, epsilon in kJ/mol.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NonbondedParticle {
    pub charge: f64,
    pub sigma: f64,
    pub epsilon: f64,
}

/// An exception overriding the default pair interaction: fully excluded
/// pairs carry zero charge product and epsilon, 1-4 pairs carry the scaled
/// values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NonbondedException {
    pub i: usize,
    pub j: usize,
    pub charge_product: f64,
    pub sigma: f64,
    pub epsilon: f64,
}

/// The standard charge + Lennard-Jones force over all particle pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct NonbondedForce {
    pub method: NonbondedMethod,
    /// Direct-space cutoff in nm; meaningful for every method but NoCutoff.
    pub cutoff: f64,
    pub ewald_error_tolerance: f64,
    pub reaction_field_dielectric: f64,
    pub use_dispersion_correction: bool,
    pub particles: Vec<NonbondedParticle>,
    pub exceptions: Vec<NonbondedException>,
}

impl NonbondedForce {
    pub fn num_exceptions(&self) -> usize {
        self.exceptions.len()
    }
}

/// A tabulated per-type-pair Lennard-Jones force.
///
/// Emitted only when the topology carries pairwise overrides (NBFIX) or
/// 12-6-4 C coefficients that a per-particle (sigma, epsilon) assignment
/// cannot represent. Coefficient matrices are dense, row-major over
/// `num_types`; the exclusion list mirrors the companion NonbondedForce's
/// exception list pair-for-pair.
#[derive(Debug, Clone, PartialEq)]
pub struct LennardJonesPairForce {
    pub method: NonbondedMethod,
    pub cutoff: f64,
    pub num_types: usize,
    /// A coefficients in kJ nm^12, dense num_types x num_types.
    pub acoef: Vec<f64>,
    /// B coefficients in kJ nm^6, dense num_types x num_types.
    pub bcoef: Vec<f64>,
    /// Optional 12-6-4 C coefficients in kJ nm^4, dense when present.
    pub c4coef: Option<Vec<f64>>,
    /// Each particle's row/column in the coefficient matrices.
    pub particle_types: Vec<usize>,
    pub exclusions: Vec<(usize, usize)>,
    pub use_long_range_correction: bool,
}

impl LennardJonesPairForce {
    pub fn num_exclusions(&self) -> usize {
        self.exclusions.len()
    }

    /// The (A, B, C4) coefficients for a pair of type indices.
    pub fn coefficients(&self, type_i: usize, type_j: usize) -> (f64, f64, f64) {
        let index = type_i * self.num_types + type_j;
        (
            self.acoef[index],
            self.bcoef[index],
            self.c4coef.as_ref().map_or(0.0, |c| c[index]),
        )
    }
}

/// Per-particle inputs of the dedicated OBC-II solvation force.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GbsaObcParticle {
    pub charge: f64,
    /// Intrinsic Born radius in nm, offset not yet applied.
    pub radius: f64,
    /// HCT screening factor.
    pub scale: f64,
}

/// The dedicated OBC-II implicit solvent force.
#[derive(Debug, Clone, PartialEq)]
pub struct GbsaObcForce {
    pub method: NonbondedMethod,
    pub cutoff: f64,
    pub solute_dielectric: f64,
    pub solvent_dielectric: f64,
    /// Debye screening parameter in nm^-1; zero without salt.
    pub kappa: f64,
    pub particles: Vec<GbsaObcParticle>,
}

/// Per-particle inputs of the generic tabulated Born force. The rescaling
/// coefficients are per-particle because GBn2 assigns them by element;
/// HCT carries none.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneralizedBornParticle {
    pub charge: f64,
    /// Intrinsic Born radius in nm, offset not yet applied.
    pub radius: f64,
    /// Model-resolved screening factor.
    pub scale: f64,
    pub rescale: Option<RescaleCoefficients>,
}

/// The generic Generalized Born force serving HCT, OBC-I, GBn, and GBn2.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneralizedBornForce {
    pub model: GbModel,
    pub method: NonbondedMethod,
    pub cutoff: f64,
    pub solute_dielectric: f64,
    pub solvent_dielectric: f64,
    /// Debye screening parameter in nm^-1; zero without salt.
    pub kappa: f64,
    /// Dielectric offset subtracted from the intrinsic radii, in nm.
    pub radius_offset: f64,
    pub particles: Vec<GeneralizedBornParticle>,
}

/// Removes center-of-mass motion every `frequency` steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CmMotionRemover {
    pub frequency: usize,
}

impl Default for CmMotionRemover {
    fn default() -> Self {
        Self { frequency: 1 }
    }
}

/// A typed force term of a constructed system.
#[derive(Debug, Clone, PartialEq)]
pub enum Force {
    HarmonicBond(HarmonicBondForce),
    HarmonicAngle(HarmonicAngleForce),
    PeriodicTorsion(PeriodicTorsionForce),
    Nonbonded(NonbondedForce),
    LennardJonesPair(LennardJonesPairForce),
    GbsaObc(GbsaObcForce),
    GeneralizedBorn(GeneralizedBornForce),
    CmMotionRemover(CmMotionRemover),
}

impl Force {
    pub fn name(&self) -> &'static str {
        match self {
            Force::HarmonicBond(_) => "HarmonicBondForce",
            Force::HarmonicAngle(_) => "HarmonicAngleForce",
            Force::PeriodicTorsion(_) => "PeriodicTorsionForce",
            Force::Nonbonded(_) => "NonbondedForce",
            Force::LennardJonesPair(_) => "LennardJonesPairForce",
            Force::GbsaObc(_) => "GbsaObcForce",
            Force::GeneralizedBorn(_) => "GeneralizedBornForce",
            Force::CmMotionRemover(_) => "CmMotionRemover",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_force_coefficient_lookup_is_row_major() {
        let force = LennardJonesPairForce {
            method: NonbondedMethod::Pme,
            cutoff: 0.8,
            num_types: 2,
            acoef: vec![1.0, 2.0, 2.0, 3.0],
            bcoef: vec![0.1, 0.2, 0.2, 0.3],
            c4coef: Some(vec![0.0, 5.0, 5.0, 0.0]),
            particle_types: vec![0, 1],
            exclusions: vec![(0, 1)],
            use_long_range_correction: true,
        };
        assert_eq!(force.coefficients(0, 1), (2.0, 0.2, 5.0));
        assert_eq!(force.coefficients(1, 1), (3.0, 0.3, 0.0));
        assert_eq!(force.num_exclusions(), 1);
    }

    #[test]
    fn pair_force_without_c4_reads_zero() {
        let force = LennardJonesPairForce {
            method: NonbondedMethod::NoCutoff,
            cutoff: 1.0,
            num_types: 1,
            acoef: vec![1.0],
            bcoef: vec![0.5],
            c4coef: None,
            particle_types: vec![0],
            exclusions: Vec::new(),
            use_long_range_correction: true,
        };
        assert_eq!(force.coefficients(0, 0), (1.0, 0.5, 0.0));
    }

    #[test]
    fn cm_motion_remover_defaults_to_every_step() {
        assert_eq!(CmMotionRemover::default().frequency, 1);
    }

    #[test]
    fn force_names_are_stable() {
        let force = Force::CmMotionRemover(CmMotionRemover::default());
        assert_eq!(force.name(), "CmMotionRemover");
        let bonds = Force::HarmonicBond(HarmonicBondForce::default());
        assert_eq!(bonds.name(), "HarmonicBondForce");
    }
}
