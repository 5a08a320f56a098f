use phf::{Map, phf_map};

/// Symbols for the elements that occur in biomolecular force fields,
/// keyed by atomic number.
pub static ELEMENT_SYMBOLS: Map<u8, &'static str> = phf_map! {
    1u8 => "H",
    2u8 => "He",
    3u8 => "Li",
    5u8 => "B",
    6u8 => "C",
    7u8 => "N",
    8u8 => "O",
    9u8 => "F",
    11u8 => "Na",
    12u8 => "Mg",
    14u8 => "Si",
    15u8 => "P",
    16u8 => "S",
    17u8 => "Cl",
    19u8 => "K",
    20u8 => "Ca",
    25u8 => "Mn",
    26u8 => "Fe",
    27u8 => "Co",
    29u8 => "Cu",
    30u8 => "Zn",
    34u8 => "Se",
    35u8 => "Br",
    37u8 => "Rb",
    38u8 => "Sr",
    48u8 => "Cd",
    53u8 => "I",
    55u8 => "Cs",
    56u8 => "Ba",
};

/// Standard atomic masses (amu) for the same element set, ordered by atomic number.
/// Used to recover atomic numbers from old-format topology files that predate
/// the ATOMIC_NUMBER section.
const STANDARD_MASSES: &[(u8, f64)] = &[
    (1, 1.008),
    (2, 4.0026),
    (3, 6.94),
    (5, 10.81),
    (6, 12.011),
    (7, 14.007),
    (8, 15.999),
    (9, 18.998),
    (11, 22.990),
    (12, 24.305),
    (14, 28.085),
    (15, 30.974),
    (16, 32.06),
    (17, 35.45),
    (19, 39.098),
    (20, 40.078),
    (25, 54.938),
    (26, 55.845),
    (27, 58.933),
    (29, 63.546),
    (30, 65.38),
    (34, 78.971),
    (35, 79.904),
    (37, 85.468),
    (38, 87.62),
    (48, 112.414),
    (53, 126.904),
    (55, 132.905),
    (56, 137.327),
];

/// Returns the symbol for an atomic number, if it is in the supported set.
pub fn symbol(atomic_number: u8) -> Option<&'static str> {
    ELEMENT_SYMBOLS.get(&atomic_number).copied()
}

/// Guesses the atomic number from an atomic mass.
///
/// Picks the element whose standard mass is nearest to the given value,
/// requiring the match to be within 0.6 amu. Repartitioned hydrogen masses
/// (up to ~4 amu) are not resolved here; callers should prefer the explicit
/// ATOMIC_NUMBER section whenever the file carries one.
///
/// # Return
///
/// Returns `Some(atomic_number)` on a confident match, otherwise `None`
/// (virtual sites and lone pairs have mass 0 and intentionally map to `None`).
pub fn atomic_number_from_mass(mass: f64) -> Option<u8> {
    if mass <= 0.0 {
        return None;
    }
    let (z, delta) = STANDARD_MASSES
        .iter()
        .map(|&(z, m)| (z, (m - mass).abs()))
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap())?;
    (delta < 0.6).then_some(z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_lookup_covers_common_elements() {
        assert_eq!(symbol(1), Some("H"));
        assert_eq!(symbol(6), Some("C"));
        assert_eq!(symbol(12), Some("Mg"));
        assert_eq!(symbol(118), None);
    }

    #[test]
    fn mass_guess_recovers_common_elements() {
        assert_eq!(atomic_number_from_mass(1.008), Some(1));
        assert_eq!(atomic_number_from_mass(12.01), Some(6));
        assert_eq!(atomic_number_from_mass(15.9994), Some(8));
        assert_eq!(atomic_number_from_mass(32.066), Some(16));
        assert_eq!(atomic_number_from_mass(24.305), Some(12));
    }

    #[test]
    fn mass_guess_rejects_zero_mass_virtual_sites() {
        assert_eq!(atomic_number_from_mass(0.0), None);
    }

    #[test]
    fn mass_guess_rejects_values_far_from_any_element() {
        assert_eq!(atomic_number_from_mass(3.02), None);
    }
}
