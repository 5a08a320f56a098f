use super::element;

/// Represents an atom parsed from an AMBER topology file.
///
/// All fields are in internal units: charge in elementary charge units,
/// mass in amu. The Lennard-Jones type index points into the pair tables
/// held by the force-field parameter set, not into any per-atom storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The atom name (e.g., "CA", "HW1").
    pub name: String,
    /// The AMBER atom type label (e.g., "CT", "HW"); empty if the file omits it.
    pub amber_type: String,
    /// Partial charge in elementary charge units.
    pub charge: f64,
    /// Mass in amu.
    pub mass: f64,
    /// Atomic number; `None` for extra points and virtual sites.
    pub atomic_number: Option<u8>,
    /// 0-based Lennard-Jones type index into the pair tables.
    pub lj_type: usize,
    /// 0-based index of the parent residue.
    pub residue_index: usize,
}

impl Atom {
    /// True for hydrogen atoms, the class targeted by HBonds/HAngles
    /// constraints and hydrogen mass repartitioning.
    #[inline]
    pub fn is_hydrogen(&self) -> bool {
        self.atomic_number == Some(1)
    }

    /// The element symbol, when the atomic number is known and supported.
    pub fn element_symbol(&self) -> Option<&'static str> {
        self.atomic_number.and_then(element::symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom(atomic_number: Option<u8>) -> Atom {
        Atom {
            name: "X".to_string(),
            amber_type: String::new(),
            charge: 0.0,
            mass: 1.008,
            atomic_number,
            lj_type: 0,
            residue_index: 0,
        }
    }

    #[test]
    fn hydrogen_detection_uses_atomic_number() {
        assert!(atom(Some(1)).is_hydrogen());
        assert!(!atom(Some(6)).is_hydrogen());
        assert!(!atom(None).is_hydrogen());
    }

    #[test]
    fn element_symbol_resolves_known_elements() {
        assert_eq!(atom(Some(8)).element_symbol(), Some("O"));
        assert_eq!(atom(None).element_symbol(), None);
    }
}
