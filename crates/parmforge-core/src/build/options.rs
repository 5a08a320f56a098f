use crate::core::forcefield::gb::GbModel;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Default direct-space cutoff in nm.
const DEFAULT_CUTOFF: f64 = 1.0;

/// Default Ewald/PME error tolerance.
const DEFAULT_EWALD_ERROR_TOLERANCE: f64 = 5e-4;

/// Default solvent dielectric constant for implicit solvent.
const DEFAULT_SOLVENT_DIELECTRIC: f64 = 78.5;

#[derive(Debug, Error, PartialEq)]
pub enum OptionsError {
    #[error("Option '{name}' must be positive (got {value})")]
    NotPositive { name: &'static str, value: f64 },
    #[error("Option 'ewald_error_tolerance' must lie in (0, 1) (got {0})")]
    InvalidErrorTolerance(f64),
}

/// The treatment of long-range nonbonded interactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NonbondedMethod {
    /// Every pair interacts; no cutoff, no periodicity.
    NoCutoff,
    /// Truncated interactions without periodic boundary conditions.
    CutoffNonPeriodic,
    /// Truncated interactions under periodic boundary conditions.
    CutoffPeriodic,
    /// Classical Ewald summation.
    Ewald,
    /// Particle Mesh Ewald.
    Pme,
}

impl NonbondedMethod {
    /// True for the methods that require a periodic box.
    pub fn is_periodic(&self) -> bool {
        matches!(
            self,
            NonbondedMethod::CutoffPeriodic | NonbondedMethod::Ewald | NonbondedMethod::Pme
        )
    }

    /// True for every method except NoCutoff.
    pub fn uses_cutoff(&self) -> bool {
        !matches!(self, NonbondedMethod::NoCutoff)
    }
}

impl fmt::Display for NonbondedMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NonbondedMethod::NoCutoff => "NoCutoff",
            NonbondedMethod::CutoffNonPeriodic => "CutoffNonPeriodic",
            NonbondedMethod::CutoffPeriodic => "CutoffPeriodic",
            NonbondedMethod::Ewald => "Ewald",
            NonbondedMethod::Pme => "PME",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown nonbonded method name")]
pub struct ParseNonbondedMethodError;

impl FromStr for NonbondedMethod {
    type Err = ParseNonbondedMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "").as_str() {
            "nocutoff" => Ok(NonbondedMethod::NoCutoff),
            "cutoffnonperiodic" => Ok(NonbondedMethod::CutoffNonPeriodic),
            "cutoffperiodic" => Ok(NonbondedMethod::CutoffPeriodic),
            "ewald" => Ok(NonbondedMethod::Ewald),
            "pme" => Ok(NonbondedMethod::Pme),
            _ => Err(ParseNonbondedMethodError),
        }
    }
}

/// Which bonded degrees of freedom are replaced by rigid constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConstraintPolicy {
    /// Constrain bonds that involve a hydrogen.
    HBonds,
    /// Constrain every bond.
    AllBonds,
    /// Constrain every bond, and close hydrogen-bearing angles into
    /// distance constraints.
    HAngles,
}

/// Options controlling system construction.
///
/// Deserializable so a TOML options file maps onto it directly; every field
/// has a sensible default, and [`SystemOptions::validate`] checks the
/// numeric ranges regardless of how the value was produced.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SystemOptions {
    pub nonbonded_method: NonbondedMethod,
    /// Direct-space cutoff in nm, used by every method except NoCutoff.
    pub cutoff: f64,
    /// Error tolerance for Ewald and PME.
    pub ewald_error_tolerance: f64,
    pub constraints: Option<ConstraintPolicy>,
    /// Constrain water internal geometry regardless of the constraint policy.
    pub rigid_water: bool,
    pub implicit_solvent: Option<GbModel>,
    pub solute_dielectric: f64,
    pub solvent_dielectric: f64,
    /// Monovalent salt concentration (mol/L) for Debye screening in
    /// implicit solvent.
    pub implicit_solvent_salt_conc: f64,
    /// Temperature (K) entering the Debye screening length.
    pub temperature: f64,
    pub remove_cm_motion: bool,
    /// Target hydrogen mass (amu) for hydrogen mass repartitioning; `None`
    /// leaves masses as the topology states them.
    pub hydrogen_mass: Option<f64>,
}

impl Default for SystemOptions {
    fn default() -> Self {
        Self {
            nonbonded_method: NonbondedMethod::NoCutoff,
            cutoff: DEFAULT_CUTOFF,
            ewald_error_tolerance: DEFAULT_EWALD_ERROR_TOLERANCE,
            constraints: None,
            rigid_water: true,
            implicit_solvent: None,
            solute_dielectric: 1.0,
            solvent_dielectric: DEFAULT_SOLVENT_DIELECTRIC,
            implicit_solvent_salt_conc: 0.0,
            temperature: 300.0,
            remove_cm_motion: true,
            hydrogen_mass: None,
        }
    }
}

impl SystemOptions {
    pub fn builder() -> SystemOptionsBuilder {
        SystemOptionsBuilder::default()
    }

    /// Checks the numeric ranges. Construction refuses invalid options no
    /// matter whether they came from the builder or a config file.
    pub fn validate(&self) -> Result<(), OptionsError> {
        let positive = |name: &'static str, value: f64| {
            if value > 0.0 {
                Ok(())
            } else {
                Err(OptionsError::NotPositive { name, value })
            }
        };
        positive("cutoff", self.cutoff)?;
        positive("solute_dielectric", self.solute_dielectric)?;
        positive("solvent_dielectric", self.solvent_dielectric)?;
        positive("temperature", self.temperature)?;
        if let Some(mass) = self.hydrogen_mass {
            positive("hydrogen_mass", mass)?;
        }
        if !(self.ewald_error_tolerance > 0.0 && self.ewald_error_tolerance < 1.0) {
            return Err(OptionsError::InvalidErrorTolerance(
                self.ewald_error_tolerance,
            ));
        }
        Ok(())
    }
}

/// Fluent construction for [`SystemOptions`], validating on `build`.
#[derive(Debug, Default)]
pub struct SystemOptionsBuilder {
    options: SystemOptions,
}

impl SystemOptionsBuilder {
    pub fn nonbonded_method(mut self, method: NonbondedMethod) -> Self {
        self.options.nonbonded_method = method;
        self
    }

    pub fn cutoff(mut self, cutoff: f64) -> Self {
        self.options.cutoff = cutoff;
        self
    }

    pub fn ewald_error_tolerance(mut self, tolerance: f64) -> Self {
        self.options.ewald_error_tolerance = tolerance;
        self
    }

    pub fn constraints(mut self, policy: Option<ConstraintPolicy>) -> Self {
        self.options.constraints = policy;
        self
    }

    pub fn rigid_water(mut self, rigid: bool) -> Self {
        self.options.rigid_water = rigid;
        self
    }

    pub fn implicit_solvent(mut self, model: Option<GbModel>) -> Self {
        self.options.implicit_solvent = model;
        self
    }

    pub fn solute_dielectric(mut self, dielectric: f64) -> Self {
        self.options.solute_dielectric = dielectric;
        self
    }

    pub fn solvent_dielectric(mut self, dielectric: f64) -> Self {
        self.options.solvent_dielectric = dielectric;
        self
    }

    pub fn implicit_solvent_salt_conc(mut self, concentration: f64) -> Self {
        self.options.implicit_solvent_salt_conc = concentration;
        self
    }

    pub fn temperature(mut self, temperature: f64) -> Self {
        self.options.temperature = temperature;
        self
    }

    pub fn remove_cm_motion(mut self, remove: bool) -> Self {
        self.options.remove_cm_motion = remove;
        self
    }

    pub fn hydrogen_mass(mut self, mass: Option<f64>) -> Self {
        self.options.hydrogen_mass = mass;
        self
    }

    pub fn build(self) -> Result<SystemOptions, OptionsError> {
        self.options.validate()?;
        Ok(self.options)
    }
}
