use crate::cli::InspectArgs;
use crate::error::Result;
use parmforge::core::io::prmtop::PrmtopFile;
use parmforge::core::io::traits::AmberFile;
use tracing::info;

pub fn run(args: InspectArgs) -> Result<()> {
    let file = PrmtopFile::read_from_path(&args.input)?;
    info!(path = %args.input.display(), "Parsed topology file");

    let topology = &file.topology;
    let params = &file.params;

    println!("Topology: {}", args.input.display());
    if !file.title.is_empty() {
        println!("Title:    {}", file.title);
    }
    if let Some(version) = &file.version {
        println!("Version:  {}", version);
    }
    println!();
    println!("Atoms:    {}", topology.num_atoms());
    println!("Residues: {}", topology.num_residues());
    println!("Bonds:    {}", topology.bonds().len());
    println!("Angles:   {}", topology.angles().len());
    println!("Torsions: {}", topology.torsions().len());

    let waters = (0..topology.num_residues())
        .filter(|&i| topology.residue_is_water(i))
        .count();
    if waters > 0 {
        println!("Waters:   {}", waters);
    }

    match topology.cell() {
        Some(cell) => {
            let shape = if cell.is_orthorhombic() {
                "orthorhombic"
            } else {
                "triclinic"
            };
            println!(
                "Box:      {} ({:.4} x {:.4} x {:.4} nm)",
                shape, cell.lengths.x, cell.lengths.y, cell.lengths.z
            );
        }
        None => println!("Box:      none"),
    }

    println!();
    println!("Lennard-Jones types:   {}", params.lj.num_types());
    println!(
        "Pairwise overrides:    {}",
        if params.lj.has_nbfix_terms() { "yes (NBFIX)" } else { "no" }
    );
    println!(
        "12-6-4 C coefficients: {}",
        if params.lj.has_c4_terms() { "yes" } else { "no" }
    );
    match &params.gb {
        Some(gb) => println!(
            "Born radii:            present ({})",
            gb.radius_set.as_deref().unwrap_or("unnamed set")
        ),
        None => println!("Born radii:            absent"),
    }

    Ok(())
}
