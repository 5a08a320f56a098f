use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "parmforge CLI - Load AMBER topology/coordinate files and construct fully parameterized simulation systems.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Summarize the contents of an AMBER topology file.
    Inspect(InspectArgs),
    /// Construct a simulation system and report its force terms.
    Build(BuildArgs),
}

/// Arguments for the `inspect` subcommand.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Path to the topology (prmtop/parm7) file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,
}

/// Arguments for the `build` subcommand.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Path to the topology (prmtop/parm7) file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub prmtop: PathBuf,

    /// Path to a coordinate/restart (inpcrd/rst7) file.
    #[arg(short = 'c', long, value_name = "PATH")]
    pub coordinates: Option<PathBuf>,

    /// Path to a construction options file in TOML format.
    #[arg(short = 'o', long, value_name = "PATH")]
    pub options: Option<PathBuf>,

    // --- Option Overrides ---
    /// Override the nonbonded method (no-cutoff, cutoff-non-periodic,
    /// cutoff-periodic, ewald, pme).
    #[arg(long, value_name = "METHOD")]
    pub nonbonded_method: Option<String>,

    /// Override the direct-space cutoff in nm.
    #[arg(long, value_name = "FLOAT")]
    pub cutoff: Option<f64>,

    /// Override the implicit solvent model (hct, obc1, obc2, gbn, gbn2).
    #[arg(long, value_name = "MODEL")]
    pub implicit_solvent: Option<String>,

    /// Override the target hydrogen mass in amu for mass repartitioning.
    #[arg(long, value_name = "FLOAT")]
    pub hydrogen_mass: Option<f64>,
}
