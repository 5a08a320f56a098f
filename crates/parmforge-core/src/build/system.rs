use super::forces::{Force, GbsaObcForce, GeneralizedBornForce, LennardJonesPairForce, NonbondedForce};
use nalgebra::Vector3;

/// A rigid distance constraint between two particles, in nm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constraint {
    pub i: usize,
    pub j: usize,
    pub distance: f64,
}

/// A constructed simulation system: particle masses, rigid constraints,
/// typed force terms, and the default periodic box when the model is
/// periodic.
///
/// The system is a complete description of the model; evaluating or
/// integrating the forces it holds is the business of a downstream engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct System {
    particle_masses: Vec<f64>,
    constraints: Vec<Constraint>,
    forces: Vec<Force>,
    default_box: Option<[Vector3<f64>; 3]>,
}

impl System {
    pub fn new(particle_masses: Vec<f64>) -> Self {
        Self {
            particle_masses,
            ..Self::default()
        }
    }

    pub fn num_particles(&self) -> usize {
        self.particle_masses.len()
    }

    pub fn particle_mass(&self, index: usize) -> Option<f64> {
        self.particle_masses.get(index).copied()
    }

    pub fn particle_masses(&self) -> &[f64] {
        &self.particle_masses
    }

    pub fn total_mass(&self) -> f64 {
        self.particle_masses.iter().sum()
    }

    pub fn set_particle_mass(&mut self, index: usize, mass: f64) {
        self.particle_masses[index] = mass;
    }

    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn add_force(&mut self, force: Force) {
        self.forces.push(force);
    }

    pub fn forces(&self) -> &[Force] {
        &self.forces
    }

    pub fn set_default_box(&mut self, vectors: Option<[Vector3<f64>; 3]>) {
        self.default_box = vectors;
    }

    /// The default periodic box vectors, present when the topology declared
    /// a cell.
    pub fn default_periodic_box_vectors(&self) -> Option<&[Vector3<f64>; 3]> {
        self.default_box.as_ref()
    }

    /// The standard nonbonded force, when the system holds one.
    pub fn nonbonded(&self) -> Option<&NonbondedForce> {
        self.forces.iter().find_map(|force| match force {
            Force::Nonbonded(f) => Some(f),
            _ => None,
        })
    }

    /// The tabulated pair force, present only for NBFIX/12-6-4 topologies.
    pub fn lennard_jones_pairs(&self) -> Option<&LennardJonesPairForce> {
        self.forces.iter().find_map(|force| match force {
            Force::LennardJonesPair(f) => Some(f),
            _ => None,
        })
    }

    pub fn gbsa_obc(&self) -> Option<&GbsaObcForce> {
        self.forces.iter().find_map(|force| match force {
            Force::GbsaObc(f) => Some(f),
            _ => None,
        })
    }

    pub fn generalized_born(&self) -> Option<&GeneralizedBornForce> {
        self.forces.iter().find_map(|force| match force {
            Force::GeneralizedBorn(f) => Some(f),
            _ => None,
        })
    }

    pub fn has_cm_motion_remover(&self) -> bool {
        self.forces
            .iter()
            .any(|force| matches!(force, Force::CmMotionRemover(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::forces::CmMotionRemover;

    #[test]
    fn mass_accounting() {
        let mut system = System::new(vec![1.0, 12.0, 16.0]);
        assert_eq!(system.num_particles(), 3);
        assert_eq!(system.particle_mass(0), Some(1.0));
        assert_eq!(system.particle_mass(3), None);
        assert_eq!(system.total_mass(), 29.0);

        system.set_particle_mass(0, 4.0);
        assert_eq!(system.total_mass(), 32.0);
    }

    #[test]
    fn constraint_storage() {
        let mut system = System::new(vec![1.0, 1.0]);
        system.add_constraint(Constraint {
            i: 0,
            j: 1,
            distance: 0.1,
        });
        assert_eq!(system.constraints().len(), 1);
        assert_eq!(system.constraints()[0].distance, 0.1);
    }

    #[test]
    fn typed_force_lookup() {
        let mut system = System::new(vec![1.0]);
        assert!(system.nonbonded().is_none());
        assert!(!system.has_cm_motion_remover());

        system.add_force(Force::CmMotionRemover(CmMotionRemover::default()));
        assert!(system.has_cm_motion_remover());
        assert!(system.lennard_jones_pairs().is_none());
    }

    #[test]
    fn default_box_round_trips() {
        let mut system = System::new(Vec::new());
        assert!(system.default_periodic_box_vectors().is_none());
        let vectors = [
            Vector3::new(3.0, 0.0, 0.0),
            Vector3::new(0.0, 3.0, 0.0),
            Vector3::new(0.0, 0.0, 3.0),
        ];
        system.set_default_box(Some(vectors));
        assert_eq!(system.default_periodic_box_vectors(), Some(&vectors));
    }
}
