use super::error::BuildError;
use super::forces::{
    CmMotionRemover, Force, GbsaObcForce, GbsaObcParticle, GeneralizedBornForce,
    GeneralizedBornParticle, HarmonicAngle, HarmonicAngleForce, HarmonicBond, HarmonicBondForce,
    LennardJonesPairForce, NonbondedException, NonbondedForce, NonbondedParticle, PeriodicTorsion,
    PeriodicTorsionForce,
};
use super::options::{ConstraintPolicy, SystemOptions};
use super::system::{Constraint, System};
use crate::core::forcefield::gb::{self, GbModel};
use crate::core::io::prmtop::PrmtopFile;
use std::collections::{BTreeMap, HashSet};
use tracing::warn;

/// Reaction-field dielectric used when no implicit solvent is active.
const DEFAULT_REACTION_FIELD_DIELECTRIC: f64 = 78.5;

/// Fallback O-H bond length (nm) for rigid water when the topology holds
/// no parameters for it.
const DEFAULT_WATER_OH_LENGTH: f64 = 0.095_72;

/// Fallback H-O-H angle (degrees) for rigid water.
const DEFAULT_WATER_ANGLE_DEG: f64 = 104.52;

/// Translates a parsed topology plus construction options into a [`System`].
///
/// The builder is cheap to create and borrows its inputs; all the work
/// happens in [`SystemBuilder::build`].
pub struct SystemBuilder<'a> {
    prmtop: &'a PrmtopFile,
    options: &'a SystemOptions,
}

/// Orders a pair so it can key exclusion and dedup sets.
fn ordered(i: usize, j: usize) -> (usize, usize) {
    if i < j { (i, j) } else { (j, i) }
}

/// Closes an angle into the distance between its outer atoms.
fn law_of_cosines(arm1: f64, arm2: f64, angle: f64) -> f64 {
    (arm1 * arm1 + arm2 * arm2 - 2.0 * arm1 * arm2 * angle.cos()).sqrt()
}

/// Collects constraints while deduplicating pairs; rigid-water and the
/// bond policy routinely both claim the same water bonds.
#[derive(Default)]
struct ConstraintSet {
    seen: HashSet<(usize, usize)>,
    list: Vec<Constraint>,
}

impl ConstraintSet {
    fn add(&mut self, i: usize, j: usize, distance: f64) {
        if self.seen.insert(ordered(i, j)) {
            self.list.push(Constraint { i, j, distance });
        }
    }
}

impl<'a> SystemBuilder<'a> {
    pub fn new(prmtop: &'a PrmtopFile, options: &'a SystemOptions) -> Self {
        Self { prmtop, options }
    }

    pub fn build(&self) -> Result<System, BuildError> {
        self.options.validate()?;
        self.check_compatibility()?;

        let mut system = System::new(self.repartitioned_masses());
        self.apply_constraints(&mut system)?;
        self.add_bonded_forces(&mut system);
        self.add_nonbonded_forces(&mut system);
        if let Some(model) = self.options.implicit_solvent {
            self.add_implicit_solvent(&mut system, model)?;
        }
        if self.options.remove_cm_motion {
            system.add_force(Force::CmMotionRemover(CmMotionRemover::default()));
        }
        system.set_default_box(
            self.prmtop
                .topology
                .cell()
                .map(|cell| cell.box_vectors()),
        );
        Ok(system)
    }

    fn check_compatibility(&self) -> Result<(), BuildError> {
        let method = self.options.nonbonded_method;
        if method.is_periodic() && self.prmtop.topology.cell().is_none() {
            return Err(BuildError::MissingPeriodicBox { method });
        }
        if let Some(model) = self.options.implicit_solvent {
            if method.is_periodic() {
                return Err(BuildError::IllegalImplicitSolventMethod { method });
            }
            if self.prmtop.params.gb.is_none() {
                return Err(BuildError::MissingBornRadii { model });
            }
        }
        Ok(())
    }

    /// Particle masses, with hydrogen mass repartitioning applied when
    /// requested: each non-water hydrogen is set to the target mass and the
    /// difference is borrowed from its bonded heavy atom, leaving the total
    /// system mass unchanged.
    fn repartitioned_masses(&self) -> Vec<f64> {
        let topology = &self.prmtop.topology;
        let mut masses: Vec<f64> = topology.atoms().iter().map(|atom| atom.mass).collect();
        let Some(target) = self.options.hydrogen_mass else {
            return masses;
        };

        for (index, atom) in topology.atoms().iter().enumerate() {
            if !atom.is_hydrogen() || topology.atom_is_water(index) {
                continue;
            }
            let heavy = topology
                .bonded_neighbors(index)
                .iter()
                .copied()
                .find(|&neighbor| !topology.atoms()[neighbor].is_hydrogen());
            match heavy {
                Some(heavy) => {
                    let transfer = target - masses[index];
                    masses[index] = target;
                    masses[heavy] -= transfer;
                    if masses[heavy] <= 0.0 {
                        warn!(
                            atom = heavy,
                            mass = masses[heavy],
                            "Hydrogen mass repartitioning drove a heavy atom mass non-positive"
                        );
                    }
                }
                None => {
                    warn!(
                        atom = index,
                        "Hydrogen has no bonded heavy atom; mass left unchanged"
                    );
                }
            }
        }
        masses
    }

    /// Equilibrium bond lengths keyed by ordered atom pair, for constraint
    /// distance lookups.
    fn bond_lengths(&self) -> BTreeMap<(usize, usize), f64> {
        self.prmtop
            .topology
            .bonds()
            .iter()
            .map(|bond| {
                (
                    ordered(bond.i, bond.j),
                    self.prmtop.params.bond_types[bond.type_index].length,
                )
            })
            .collect()
    }

    fn apply_constraints(&self, system: &mut System) -> Result<(), BuildError> {
        let topology = &self.prmtop.topology;
        let params = &self.prmtop.params;
        let atoms = topology.atoms();
        let lengths = self.bond_lengths();
        let mut set = ConstraintSet::default();

        let policy = self.options.constraints;
        for bond in topology.bonds() {
            let involves_hydrogen = atoms[bond.i].is_hydrogen() || atoms[bond.j].is_hydrogen();
            let constrain = match policy {
                None => false,
                Some(ConstraintPolicy::HBonds) => involves_hydrogen,
                Some(ConstraintPolicy::AllBonds | ConstraintPolicy::HAngles) => true,
            };
            if constrain {
                set.add(bond.i, bond.j, params.bond_types[bond.type_index].length);
            }
        }

        if policy == Some(ConstraintPolicy::HAngles) {
            for angle in topology.angles() {
                let hydrogens = usize::from(atoms[angle.i].is_hydrogen())
                    + usize::from(atoms[angle.k].is_hydrogen());
                let central_oxygen = atoms[angle.j].atomic_number == Some(8);
                if hydrogens == 2 || (hydrogens >= 1 && central_oxygen) {
                    let arms = (
                        lengths.get(&ordered(angle.i, angle.j)),
                        lengths.get(&ordered(angle.j, angle.k)),
                    );
                    let (Some(&arm1), Some(&arm2)) = arms else {
                        return Err(BuildError::UnconstrainableAngle {
                            atoms: [angle.i, angle.j, angle.k],
                        });
                    };
                    let theta = params.angle_types[angle.type_index].angle;
                    set.add(angle.i, angle.k, law_of_cosines(arm1, arm2, theta));
                }
            }
        }

        if self.options.rigid_water {
            self.constrain_water(&lengths, &mut set);
        }

        for constraint in set.list {
            system.add_constraint(constraint);
        }
        Ok(())
    }

    /// Rigid water: constrain both O-H bonds and close the H-O-H angle
    /// into an H-H distance. Applies regardless of the constraint policy.
    fn constrain_water(&self, lengths: &BTreeMap<(usize, usize), f64>, set: &mut ConstraintSet) {
        let topology = &self.prmtop.topology;
        let atoms = topology.atoms();

        for (res_index, residue) in topology.residues().iter().enumerate() {
            if !topology.residue_is_water(res_index) {
                continue;
            }
            let range = residue.atom_range();
            let oxygen = range.clone().find(|&a| atoms[a].atomic_number == Some(8));
            let hydrogens: Vec<usize> = range.filter(|&a| atoms[a].is_hydrogen()).collect();
            let (Some(oxygen), [h1, h2]) = (oxygen, hydrogens.as_slice()) else {
                continue;
            };

            let oh = |h: usize| {
                lengths
                    .get(&ordered(oxygen, h))
                    .copied()
                    .unwrap_or(DEFAULT_WATER_OH_LENGTH)
            };
            let theta = topology
                .angles()
                .iter()
                .find(|angle| angle.j == oxygen && ordered(angle.i, angle.k) == ordered(*h1, *h2))
                .map(|angle| self.prmtop.params.angle_types[angle.type_index].angle)
                .unwrap_or(DEFAULT_WATER_ANGLE_DEG.to_radians());

            set.add(oxygen, *h1, oh(*h1));
            set.add(oxygen, *h2, oh(*h2));
            set.add(*h1, *h2, law_of_cosines(oh(*h1), oh(*h2), theta));
        }
    }

    /// Bonded force terms, straight from the topology lists and the
    /// parameter tables. Constrained bonds and angles stay in the lists;
    /// the constraints simply freeze those degrees of freedom.
    fn add_bonded_forces(&self, system: &mut System) {
        let topology = &self.prmtop.topology;
        let params = &self.prmtop.params;

        let bonds = topology
            .bonds()
            .iter()
            .map(|bond| {
                let bond_type = &params.bond_types[bond.type_index];
                HarmonicBond {
                    i: bond.i,
                    j: bond.j,
                    length: bond_type.length,
                    k: bond_type.k,
                }
            })
            .collect();
        system.add_force(Force::HarmonicBond(HarmonicBondForce { bonds }));

        let angles = topology
            .angles()
            .iter()
            .map(|angle| {
                let angle_type = &params.angle_types[angle.type_index];
                HarmonicAngle {
                    atoms: [angle.i, angle.j, angle.k],
                    angle: angle_type.angle,
                    k: angle_type.k,
                }
            })
            .collect();
        system.add_force(Force::HarmonicAngle(HarmonicAngleForce { angles }));

        let torsions = topology
            .torsions()
            .iter()
            .map(|torsion| {
                let torsion_type = &params.torsion_types[torsion.type_index];
                PeriodicTorsion {
                    atoms: [torsion.i, torsion.j, torsion.k, torsion.l],
                    periodicity: torsion_type.periodicity,
                    phase: torsion_type.phase,
                    k: torsion_type.k,
                }
            })
            .collect();
        system.add_force(Force::PeriodicTorsion(PeriodicTorsionForce { torsions }));
    }

    fn add_nonbonded_forces(&self, system: &mut System) {
        let topology = &self.prmtop.topology;
        let lj = &self.prmtop.params.lj;
        let options = self.options;

        // Pairwise overrides force the Lennard-Jones part out of the plain
        // nonbonded force and into a tabulated pair force.
        let pair_tables_active = lj.has_nbfix_terms() || lj.has_c4_terms();
        let diagonals: Vec<(f64, f64)> = (0..lj.num_types()).map(|t| lj.diagonal(t)).collect();

        let particles: Vec<NonbondedParticle> = topology
            .atoms()
            .iter()
            .map(|atom| {
                let (sigma, epsilon) = diagonals[atom.lj_type];
                NonbondedParticle {
                    charge: atom.charge,
                    sigma,
                    epsilon: if pair_tables_active { 0.0 } else { epsilon },
                }
            })
            .collect();

        let exceptions = self.build_exceptions(&diagonals);

        let reaction_field_dielectric = if options.implicit_solvent.is_some() {
            1.0
        } else {
            DEFAULT_REACTION_FIELD_DIELECTRIC
        };

        if pair_tables_active {
            let n = lj.num_types();
            let mut acoef = Vec::with_capacity(n * n);
            let mut bcoef = Vec::with_capacity(n * n);
            let mut c4coef = Vec::with_capacity(n * n);
            for type_i in 0..n {
                for type_j in 0..n {
                    let pair = lj.pair(type_i, type_j);
                    acoef.push(pair.a);
                    bcoef.push(pair.b);
                    c4coef.push(pair.c4);
                }
            }
            system.add_force(Force::LennardJonesPair(LennardJonesPairForce {
                method: options.nonbonded_method,
                cutoff: options.cutoff,
                num_types: n,
                acoef,
                bcoef,
                c4coef: lj.has_c4_terms().then_some(c4coef),
                particle_types: topology.atoms().iter().map(|atom| atom.lj_type).collect(),
                // The pair force must skip exactly the pairs the plain
                // force handles through exceptions.
                exclusions: exceptions.iter().map(|e| (e.i, e.j)).collect(),
                use_long_range_correction: true,
            }));
        }

        system.add_force(Force::Nonbonded(NonbondedForce {
            method: options.nonbonded_method,
            cutoff: options.cutoff,
            ewald_error_tolerance: options.ewald_error_tolerance,
            reaction_field_dielectric,
            use_dispersion_correction: true,
            particles,
            exceptions,
        }));
    }

    /// The exception list: 1-2 and 1-3 pairs fully excluded, 1-4 pairs
    /// scaled by the per-type SCEE/SCNB divisors of the torsion that
    /// generated them.
    fn build_exceptions(&self, diagonals: &[(f64, f64)]) -> Vec<NonbondedException> {
        let topology = &self.prmtop.topology;
        let atoms = topology.atoms();

        let mut excluded: HashSet<(usize, usize)> = HashSet::new();
        for bond in topology.bonds() {
            excluded.insert(ordered(bond.i, bond.j));
        }
        for angle in topology.angles() {
            excluded.insert(ordered(angle.i, angle.k));
        }

        let mut pairs: Vec<(usize, usize)> = excluded.iter().copied().collect();
        pairs.sort_unstable();

        let mut exceptions: Vec<NonbondedException> = pairs
            .into_iter()
            .map(|(i, j)| NonbondedException {
                i,
                j,
                charge_product: 0.0,
                sigma: 0.5 * (diagonals[atoms[i].lj_type].0 + diagonals[atoms[j].lj_type].0),
                epsilon: 0.0,
            })
            .collect();

        let mut seen_14 = HashSet::new();
        for torsion in topology.torsions() {
            if torsion.skip_14 || torsion.improper {
                continue;
            }
            let pair = ordered(torsion.i, torsion.l);
            if excluded.contains(&pair) || !seen_14.insert(pair) {
                continue;
            }
            let torsion_type = &self.prmtop.params.torsion_types[torsion.type_index];
            let (sigma_i, eps_i) = diagonals[atoms[torsion.i].lj_type];
            let (sigma_l, eps_l) = diagonals[atoms[torsion.l].lj_type];
            exceptions.push(NonbondedException {
                i: pair.0,
                j: pair.1,
                charge_product: atoms[torsion.i].charge * atoms[torsion.l].charge
                    / torsion_type.scee,
                sigma: 0.5 * (sigma_i + sigma_l),
                epsilon: (eps_i * eps_l).sqrt() / torsion_type.scnb,
            });
        }
        exceptions
    }

    fn add_implicit_solvent(&self, system: &mut System, model: GbModel) -> Result<(), BuildError> {
        let topology = &self.prmtop.topology;
        let options = self.options;
        let inputs = self
            .prmtop
            .params
            .gb
            .as_ref()
            .ok_or(BuildError::MissingBornRadii { model })?;

        let kappa = gb::debye_kappa(
            options.implicit_solvent_salt_conc,
            options.solvent_dielectric,
            options.temperature,
        );

        if model.uses_dedicated_obc_force() {
            let particles = topology
                .atoms()
                .iter()
                .enumerate()
                .map(|(i, atom)| GbsaObcParticle {
                    charge: atom.charge,
                    radius: inputs.radii[i],
                    scale: inputs.screen[i],
                })
                .collect();
            system.add_force(Force::GbsaObc(GbsaObcForce {
                method: options.nonbonded_method,
                cutoff: options.cutoff,
                solute_dielectric: options.solute_dielectric,
                solvent_dielectric: options.solvent_dielectric,
                kappa,
                particles,
            }));
        } else {
            let uniform = model.rescale_coefficients();
            let particles = topology
                .atoms()
                .iter()
                .enumerate()
                .map(|(i, atom)| GeneralizedBornParticle {
                    charge: atom.charge,
                    radius: inputs.radii[i],
                    scale: model.screening(atom.atomic_number, inputs.screen[i]),
                    rescale: match model {
                        GbModel::Gbn2 => Some(GbModel::gbn2_coefficients(atom.atomic_number)),
                        _ => uniform,
                    },
                })
                .collect();
            system.add_force(Force::GeneralizedBorn(GeneralizedBornForce {
                model,
                method: options.nonbonded_method,
                cutoff: options.cutoff,
                solute_dielectric: options.solute_dielectric,
                solvent_dielectric: options.solvent_dielectric,
                kappa,
                radius_offset: model.radius_offset(),
                particles,
            }));
        }
        Ok(())
    }
}
