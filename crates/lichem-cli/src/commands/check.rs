use super::{load_system, print_warnings};
use crate::cli::PrepareArgs;
use crate::config::PartialPreparationConfig;
use crate::error::Result;
use lichemprep::engine::progress::ProgressReporter;
use lichemprep::workflows;
use tracing::info;

/// Resolves and partitions without writing, then prints what `prepare` would produce.
pub fn run(args: PrepareArgs) -> Result<()> {
    let app = PartialPreparationConfig::from_file(&args.config)?.merge_with_cli(&args)?;
    let system = load_system(&app.structure_path, app.coordinates_path.as_deref())?;

    info!("Planning preparation without writing outputs.");
    let plan = workflows::prepare::plan(&system, &app.core_config, &ProgressReporter::new())?;
    let partition = &plan.partition;

    println!("Atoms:        {}", system.atom_count());
    println!("QM:           {}", partition.qm);
    println!("Pseudobond:   {}", partition.pseudobond);
    println!("Boundary:     {}", partition.boundary);
    println!("Active:       {}", partition.active);
    println!("Frozen:       {}", partition.frozen);
    for center in &partition.centers {
        println!(
            "Sphere center: {} {} {} (native index {})",
            center.res_name, center.res_id, center.atom_name, center.native_index
        );
    }
    println!(
        "BASIS ids:    1..={} ({} standard, {} elevated, {} pseudobond)",
        plan.records.len(),
        plan.basis.standard,
        plan.basis.elevated,
        plan.basis.pseudobond
    );
    print_warnings(&plan.warnings);

    Ok(())
}
