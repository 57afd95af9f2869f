use super::{load_system, print_warnings};
use crate::cli::PrepareArgs;
use crate::config::PartialPreparationConfig;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use lichemprep::engine::progress::ProgressReporter;
use lichemprep::workflows;
use tracing::info;

pub fn run(args: PrepareArgs, show_progress: bool) -> Result<()> {
    let partial_config = PartialPreparationConfig::from_file(&args.config)?;
    info!("Merging configuration from file and CLI arguments...");
    let app = partial_config.merge_with_cli(&args)?;

    let system = load_system(&app.structure_path, app.coordinates_path.as_deref())?;

    let progress_handler = CliProgressHandler::new(show_progress);
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Preparing QM/MM inputs for {} atoms in {} residues...",
        system.atom_count(),
        system.residues().len()
    );
    let report = workflows::prepare::run(&system, &app.core_config, &reporter)?;

    let partition = &report.plan.partition;
    println!(
        "Regions: {} QM, {} pseudobond, {} boundary, {} frozen ({} in the active sphere).",
        partition.qm, partition.pseudobond, partition.boundary, partition.frozen, partition.active
    );
    println!(
        "BASIS: {} standard, {} elevated, {} pseudobond.",
        report.basis_file.standard, report.basis_file.elevated, report.basis_file.pseudobond
    );
    for path in &report.written {
        println!("✓ Wrote {}", path.display());
    }
    print_warnings(&report.plan.warnings);

    Ok(())
}
