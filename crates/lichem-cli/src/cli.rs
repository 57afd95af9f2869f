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
    about = "lichemprep - Partition a solvated system into QM/MM regions and write LICHEM regions and Gaussian BASIS inputs.",
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
    /// Partition the system and write regions.inp, BASIS, and the verification listing.
    Prepare(PrepareArgs),
    /// Resolve every selection and report region counts without writing any file.
    Check(PrepareArgs),
}

/// Arguments shared by `prepare` and `check`.
#[derive(Args, Debug, Clone)]
pub struct PrepareArgs {
    // --- Core Arguments ---
    /// Path to the run configuration file in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub config: PathBuf,

    /// Path to the PDB topology (overrides `input.structure`).
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// TINKER XYZ file whose coordinates replace the PDB positions (overrides `input.coordinates`).
    #[arg(short = 'x', long, value_name = "PATH")]
    pub coordinates: Option<PathBuf>,

    /// Directory the output files are written to (overrides `output.directory`).
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    // --- Calculation Overrides ---
    /// Override the QM method (e.g. B3LYP, wB97XD).
    #[arg(short, long, value_name = "NAME")]
    pub method: Option<String>,

    /// Override the total charge of the QM region.
    #[arg(long, value_name = "INT", allow_hyphen_values = true)]
    pub charge: Option<i32>,

    /// Override the spin multiplicity of the QM region.
    #[arg(long, value_name = "INT")]
    pub spin: Option<u32>,

    /// Override the electrostatics model (charges, amber, or amoeba).
    #[arg(short, long, value_name = "MODEL")]
    pub electrostatics: Option<String>,

    /// Override the convergence tier (loose, medium, or tight).
    #[arg(long, value_name = "TIER")]
    pub convergence: Option<String>,

    // --- Partition Overrides ---
    /// Override the active sphere radius in Angstroms.
    #[arg(short, long, value_name = "FLOAT")]
    pub radius: Option<f64>,

    /// Fail when a named selection matches no atoms instead of warning.
    #[arg(long)]
    pub strict: bool,

    /// Skip writing the BASIS verification listing.
    #[arg(long)]
    pub no_listing: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S sphere.radius=18.0
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}
