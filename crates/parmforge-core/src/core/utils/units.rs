//! Unit conversion constants applied at the file-reader boundary.
//!
//! AMBER files store charges multiplied by 18.2223, lengths in Angstroms,
//! energies in kcal/mol, and velocities in Angstroms per 1/20.455 ps. The
//! internal unit system is nm, kJ/mol, amu, elementary charge, and ps.

/// AMBER charge to elementary charge: q_e = q_amber / 18.2223.
pub const AMBER_CHARGE_FACTOR: f64 = 18.2223;

/// kcal/mol to kJ/mol.
pub const KCAL_TO_KJ: f64 = 4.184;

/// Angstrom to nm.
pub const ANGSTROM_TO_NM: f64 = 0.1;

/// AMBER velocity unit (Angstrom per 1/20.455 ps) to nm/ps.
pub const AMBER_VELOCITY_TO_NM_PS: f64 = ANGSTROM_TO_NM * 20.455;

/// Bond force constants: kcal/(mol A^2) to kJ/(mol nm^2), doubled because AMBER
/// tabulates k(r-r0)^2 while the internal convention is (k/2)(r-r0)^2.
pub const BOND_K_TO_INTERNAL: f64 = 2.0 * KCAL_TO_KJ * 100.0;

/// Angle force constants: kcal/(mol rad^2) to kJ/(mol rad^2), doubled for the
/// same harmonic-convention reason as bonds.
pub const ANGLE_K_TO_INTERNAL: f64 = 2.0 * KCAL_TO_KJ;

/// Lennard-Jones A coefficients: kcal A^12 to kJ nm^12.
pub const LJ_ACOEF_TO_INTERNAL: f64 = KCAL_TO_KJ * 1e-12;

/// Lennard-Jones B coefficients: kcal A^6 to kJ nm^6.
pub const LJ_BCOEF_TO_INTERNAL: f64 = KCAL_TO_KJ * 1e-6;

/// 12-6-4 C coefficients: kcal A^4 to kJ nm^4.
pub const LJ_CCOEF_TO_INTERNAL: f64 = KCAL_TO_KJ * 1e-4;
