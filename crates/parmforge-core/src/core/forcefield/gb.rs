use phf::{Map, phf_map};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Dielectric offset subtracted from intrinsic Born radii, in nm.
const BORN_RADIUS_OFFSET: f64 = 0.009;

/// GBn2 uses its own, larger radius offset (nm).
const GBN2_RADIUS_OFFSET: f64 = 0.019_514_1;

/// Coulomb constant in kcal A / (mol e^2), used by the Debye screening length.
const COULOMB_KCAL_ANGSTROM: f64 = 332.0522;

/// Boltzmann constant in kcal/(mol K).
const BOLTZMANN_KCAL: f64 = 0.001_986_88;

/// Avogadro's number times 1e-27, converting mol/L to particles per cubic Angstrom.
const AVOGADRO_PER_CUBIC_ANGSTROM: f64 = 6.022e-4;

/// Per-element screening factors for the GBn model, keyed by atomic number.
/// GBn ignores the SCREEN section of the topology file in favor of these.
static GBN_SCREENING: Map<u8, f64> = phf_map! {
    1u8 => 1.090_854_136_33,
    6u8 => 0.484_353_823_30,
    7u8 => 0.700_147_318_409,
    8u8 => 1.065_574_011_32,
    16u8 => 0.602_256_336_067,
};

/// Per-element screening factors for the GBn2 model.
static GBN2_SCREENING: Map<u8, f64> = phf_map! {
    1u8 => 1.425_952,
    6u8 => 1.058_554,
    7u8 => 0.733_599,
    8u8 => 1.061_039,
    16u8 => -0.703_469,
};

/// Fallback screening factor for elements outside the GBn/GBn2 tables.
const GBN_DEFAULT_SCREENING: f64 = 0.5;

/// Implicit solvent models supported by system construction.
///
/// The variants mirror AMBER's igb numbering: HCT (igb=1), OBC-I (igb=2),
/// OBC-II (igb=5), GBn (igb=7), and GBn2 (igb=8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GbModel {
    Hct,
    Obc1,
    Obc2,
    Gbn,
    Gbn2,
}

/// Effective-radius rescaling coefficients (alpha, beta, gamma) of the
/// tanh correction applied on top of the HCT descreening sum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RescaleCoefficients {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

impl GbModel {
    /// The model-level tanh rescaling coefficients. HCT applies no
    /// correction; GBn2's coefficients vary per element and come from
    /// [`GbModel::gbn2_coefficients`] instead.
    pub fn rescale_coefficients(&self) -> Option<RescaleCoefficients> {
        match self {
            GbModel::Hct => None,
            GbModel::Obc1 => Some(RescaleCoefficients {
                alpha: 0.8,
                beta: 0.0,
                gamma: 2.909_125,
            }),
            GbModel::Obc2 => Some(RescaleCoefficients {
                alpha: 1.0,
                beta: 0.8,
                gamma: 4.85,
            }),
            GbModel::Gbn => Some(RescaleCoefficients {
                alpha: 1.095_112_84,
                beta: 1.907_929_38,
                gamma: 2.507_982_45,
            }),
            GbModel::Gbn2 => None,
        }
    }

    /// GBn2's per-element rescaling coefficients.
    pub fn gbn2_coefficients(atomic_number: Option<u8>) -> RescaleCoefficients {
        match atomic_number {
            Some(1) => RescaleCoefficients {
                alpha: 0.788_440,
                beta: 0.798_699,
                gamma: 0.437_334,
            },
            Some(6) => RescaleCoefficients {
                alpha: 0.733_756,
                beta: 0.506_378,
                gamma: 0.205_844,
            },
            Some(7) => RescaleCoefficients {
                alpha: 0.503_364,
                beta: 0.316_828,
                gamma: 0.192_915,
            },
            Some(8) | Some(16) => RescaleCoefficients {
                alpha: 0.867_814,
                beta: 0.876_635,
                gamma: 0.387_882,
            },
            _ => RescaleCoefficients {
                alpha: 1.0,
                beta: 0.8,
                gamma: 4.85,
            },
        }
    }

    /// The screening factor for an atom: the file's SCREEN value for the
    /// HCT/OBC family, the per-element tables for GBn and GBn2.
    pub fn screening(&self, atomic_number: Option<u8>, file_screen: f64) -> f64 {
        let table = match self {
            GbModel::Hct | GbModel::Obc1 | GbModel::Obc2 => return file_screen,
            GbModel::Gbn => &GBN_SCREENING,
            GbModel::Gbn2 => &GBN2_SCREENING,
        };
        atomic_number
            .and_then(|z| table.get(&z).copied())
            .unwrap_or(GBN_DEFAULT_SCREENING)
    }

    /// The dielectric offset subtracted from intrinsic radii, in nm.
    pub fn radius_offset(&self) -> f64 {
        match self {
            GbModel::Gbn2 => GBN2_RADIUS_OFFSET,
            _ => BORN_RADIUS_OFFSET,
        }
    }

    /// OBC-II is served by the dedicated pairwise OBC force; every other
    /// model goes through the generic tabulated Born force.
    pub fn uses_dedicated_obc_force(&self) -> bool {
        matches!(self, GbModel::Obc2)
    }
}

impl fmt::Display for GbModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GbModel::Hct => "HCT",
            GbModel::Obc1 => "OBC1",
            GbModel::Obc2 => "OBC2",
            GbModel::Gbn => "GBn",
            GbModel::Gbn2 => "GBn2",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown implicit solvent model name")]
pub struct ParseGbModelError;

impl FromStr for GbModel {
    type Err = ParseGbModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hct" => Ok(GbModel::Hct),
            "obc1" => Ok(GbModel::Obc1),
            "obc2" => Ok(GbModel::Obc2),
            "gbn" => Ok(GbModel::Gbn),
            "gbn2" => Ok(GbModel::Gbn2),
            _ => Err(ParseGbModelError),
        }
    }
}

/// Computes the Debye-Hueckel screening parameter kappa in nm^-1 from a
/// monovalent salt concentration (mol/L), the solvent dielectric constant,
/// and the temperature (K).
///
/// kappa^2 = 8 pi l_B N_A c, with the Bjerrum length l_B evaluated in the
/// solvent dielectric at the given temperature.
pub fn debye_kappa(salt_concentration: f64, solvent_dielectric: f64, temperature: f64) -> f64 {
    if salt_concentration <= 0.0 {
        return 0.0;
    }
    let factor =
        8.0 * std::f64::consts::PI * COULOMB_KCAL_ANGSTROM * AVOGADRO_PER_CUBIC_ANGSTROM;
    let kappa_per_angstrom =
        (factor * salt_concentration / (solvent_dielectric * BOLTZMANN_KCAL * temperature)).sqrt();
    kappa_per_angstrom * 10.0
}
