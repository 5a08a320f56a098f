use crate::cli::BuildArgs;
use crate::config;
use crate::error::Result;
use parmforge::build::forces::Force;
use parmforge::workflows::load_system;
use tracing::info;

pub fn run(args: BuildArgs) -> Result<()> {
    let options = config::apply_overrides(config::load_options(args.options.as_deref())?, &args)?;
    info!(?options, "Constructing system");

    let loaded = load_system(&args.prmtop, args.coordinates.as_deref(), &options)?;
    let system = &loaded.system;

    println!("System constructed from {}", args.prmtop.display());
    println!();
    println!("Particles:   {}", system.num_particles());
    println!("Total mass:  {:.3} amu", system.total_mass());
    println!("Constraints: {}", system.constraints().len());
    if let Some([a, b, c]) = system.default_periodic_box_vectors() {
        println!(
            "Box vectors: ({:.4}, {:.4}, {:.4}) / ({:.4}, {:.4}, {:.4}) / ({:.4}, {:.4}, {:.4}) nm",
            a.x, a.y, a.z, b.x, b.y, b.z, c.x, c.y, c.z
        );
    }
    if let Some(positions) = &loaded.positions {
        println!("Positions:   {} read from coordinate file", positions.len());
    }
    if loaded.velocities.is_some() {
        println!("Velocities:  present (restart file)");
    }

    println!();
    println!("Forces:");
    for force in system.forces() {
        match force {
            Force::HarmonicBond(f) => println!("  {:<22} {} terms", force.name(), f.bonds.len()),
            Force::HarmonicAngle(f) => println!("  {:<22} {} terms", force.name(), f.angles.len()),
            Force::PeriodicTorsion(f) => {
                println!("  {:<22} {} terms", force.name(), f.torsions.len())
            }
            Force::Nonbonded(f) => println!(
                "  {:<22} {} particles, {} exceptions, {} at {:.2} nm",
                force.name(),
                f.particles.len(),
                f.num_exceptions(),
                f.method,
                f.cutoff
            ),
            Force::LennardJonesPair(f) => println!(
                "  {:<22} {} types, {} exclusions",
                force.name(),
                f.num_types,
                f.num_exclusions()
            ),
            Force::GbsaObc(f) => println!(
                "  {:<22} {} particles, dielectrics {:.1}/{:.1}",
                force.name(),
                f.particles.len(),
                f.solute_dielectric,
                f.solvent_dielectric
            ),
            Force::GeneralizedBorn(f) => println!(
                "  {:<22} {} model, {} particles",
                force.name(),
                f.model,
                f.particles.len()
            ),
            Force::CmMotionRemover(f) => {
                println!("  {:<22} every {} steps", force.name(), f.frequency)
            }
        }
    }

    Ok(())
}
