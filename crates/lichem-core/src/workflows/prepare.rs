use crate::core::io::basis::{BasisFileSummary, BasisFileWriter};
use crate::core::io::layout::PSEUDOBOND_IDS_PER_BLOCK;
use crate::core::io::listing::VerificationListingWriter;
use crate::core::io::regions::RegionFileWriter;
use crate::core::models::basis::BasisRecord;
use crate::core::models::region::{RegionAssignment, RegionCategory};
use crate::core::models::system::MolecularSystem;
use crate::core::selection::resolver::SystemResolver;
use crate::engine::basis::{BasisMapper, BasisSummary};
use crate::engine::config::PreparationConfig;
use crate::engine::error::EngineError;
use crate::engine::partition::{PartitionSummary, RegionPartitioner};
use crate::engine::progress::{Progress, ProgressReporter};
use std::fmt;
use std::path::PathBuf;
use tracing::{info, instrument, warn};

/// A non-fatal condition the operator should look at before launching the calculation.
#[derive(Debug, Clone, PartialEq)]
pub enum PreparationWarning {
    /// The structure has no periodic box; `Box_size` is written as zeros.
    MissingBox,
    /// A named sub-selection matched no atoms.
    EmptySelection {
        category: RegionCategory,
        name: String,
    },
    /// Higher-basis atoms outside QM ∪ PB, which get no basis.
    HigherBasisOutsideQm { atoms: Vec<usize> },
    /// More pseudobond atoms than fit on one BASIS line.
    PseudobondOverflow { count: usize },
}

impl fmt::Display for PreparationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreparationWarning::MissingBox => {
                write!(f, "no periodic box found; Box_size written as 0.000000 0.000000 0.000000")
            }
            PreparationWarning::EmptySelection { category, name } => {
                write!(f, "{category} selection '{name}' matched no atoms")
            }
            PreparationWarning::HigherBasisOutsideQm { atoms } => write!(
                f,
                "{} higher-basis atoms are not QM or pseudobond atoms and were ignored",
                atoms.len()
            ),
            PreparationWarning::PseudobondOverflow { count } => write!(
                f,
                "{count} pseudobond atoms span several BASIS lines; check the pseudobond section"
            ),
        }
    }
}

/// Everything computed before any file is written.
#[derive(Debug, Clone)]
pub struct PreparationPlan {
    pub regions: RegionAssignment,
    pub records: Vec<BasisRecord>,
    pub partition: PartitionSummary,
    pub basis: BasisSummary,
    pub warnings: Vec<PreparationWarning>,
}

#[derive(Debug, Clone)]
pub struct PreparationReport {
    pub plan: PreparationPlan,
    pub basis_file: BasisFileSummary,
    pub written: Vec<PathBuf>,
}

/// Partitions the system and assigns BASIS ids without touching the filesystem.
#[instrument(skip_all, name = "preparation_plan")]
pub fn plan(
    system: &MolecularSystem,
    config: &PreparationConfig,
    reporter: &ProgressReporter,
) -> Result<PreparationPlan, EngineError> {
    let resolver = SystemResolver::new(system);

    let (regions, partition) = reporter.phase("Partitioning regions", || {
        RegionPartitioner::new(&resolver, system, &config.partition).partition()
    })?;

    let (records, basis) = reporter.phase("Assigning basis sets", || {
        BasisMapper::new(&resolver, &config.basis).map(&regions)
    })?;

    let mut warnings = Vec::new();
    if system.box_dimensions().is_none() {
        warnings.push(PreparationWarning::MissingBox);
    }
    warnings.extend(
        partition
            .empty_selections
            .iter()
            .map(|empty| PreparationWarning::EmptySelection {
                category: empty.category,
                name: empty.name.clone(),
            }),
    );
    if !basis.ignored_higher_basis.is_empty() {
        warnings.push(PreparationWarning::HigherBasisOutsideQm {
            atoms: basis.ignored_higher_basis.clone(),
        });
    }
    if basis.pseudobond > PSEUDOBOND_IDS_PER_BLOCK {
        warnings.push(PreparationWarning::PseudobondOverflow {
            count: basis.pseudobond,
        });
    }

    Ok(PreparationPlan {
        regions,
        records,
        partition,
        basis,
        warnings,
    })
}

/// Runs the full preparation and writes every output file.
///
/// Nothing is written unless partitioning and basis mapping both succeed, and each file is
/// replaced atomically.
#[instrument(skip_all, name = "preparation_workflow")]
pub fn run(
    system: &MolecularSystem,
    config: &PreparationConfig,
    reporter: &ProgressReporter,
) -> Result<PreparationReport, EngineError> {
    info!(
        atoms = system.atom_count(),
        residues = system.residues().len(),
        "Starting QM/MM preparation."
    );
    let plan = plan(system, config, reporter)?;
    let output = &config.output;

    reporter.report(Progress::PhaseStart {
        name: "Writing outputs",
    });
    let total_steps = if output.listing_path.is_some() { 3 } else { 2 };
    reporter.report(Progress::TaskStart { total_steps });

    let mut written = Vec::with_capacity(total_steps as usize);

    RegionFileWriter::write_to_path(
        &output.regions_path,
        &config.header,
        system.box_dimensions(),
        &plan.regions,
    )
    .map_err(|e| EngineError::io(&output.regions_path, e))?;
    info!("Wrote regions file to {:?}", output.regions_path);
    written.push(output.regions_path.clone());
    reporter.report(Progress::TaskIncrement);

    let basis_file =
        BasisFileWriter::write_to_path(&output.basis_path, &plan.records, &config.basis.names)
            .map_err(|e| EngineError::io(&output.basis_path, e))?;
    info!("Wrote BASIS file to {:?}", output.basis_path);
    written.push(output.basis_path.clone());
    reporter.report(Progress::TaskIncrement);

    if let Some(listing_path) = &output.listing_path {
        VerificationListingWriter::write_to_path(listing_path, &plan.records, system)
            .map_err(|e| EngineError::io(listing_path, e))?;
        info!("Wrote verification listing to {:?}", listing_path);
        written.push(listing_path.clone());
        reporter.report(Progress::TaskIncrement);
    }

    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);

    if !plan.warnings.is_empty() {
        warn!(
            "Preparation finished with {} warning(s).",
            plan.warnings.len()
        );
    }

    Ok(PreparationReport {
        plan,
        basis_file,
        written,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::builder::MolecularSystemBuilder;
    use crate::core::selection::query::Selection;
    use crate::engine::config::{OutputConfig, PreparationConfigBuilder};
    use nalgebra::Point3;
    use std::sync::{Arc, Mutex};

    fn small_system(with_box: bool) -> MolecularSystem {
        let mut builder = MolecularSystemBuilder::new();
        builder.start_residue('A', 1, "LIG");
        builder.add_atom("C1", Point3::new(0.0, 0.0, 0.0));
        builder.add_atom("C2", Point3::new(1.5, 0.0, 0.0));
        builder.start_residue('A', 2, "WAT");
        builder.add_atom("O", Point3::new(30.0, 0.0, 0.0));
        if with_box {
            builder.box_dimensions([40.0, 40.0, 40.0]);
        }
        builder.build()
    }

    fn config_in(dir: &std::path::Path) -> PreparationConfig {
        PreparationConfigBuilder::new()
            .qm_selection("ligand", Selection::residue_names(["LIG"]))
            .output(OutputConfig {
                regions_path: dir.join("regions.inp"),
                basis_path: dir.join("BASIS"),
                listing_path: Some(dir.join("BASIS_verification.txt")),
            })
            .build()
            .unwrap()
    }

    #[test]
    fn run_writes_all_outputs_and_reports_progress() {
        let dir = tempfile::tempdir().unwrap();
        let system = small_system(true);
        let config = config_in(dir.path());

        let events = Arc::new(Mutex::new(0usize));
        let sink = events.clone();
        let reporter = ProgressReporter::with_callback(Box::new(move |p| {
            if matches!(p, Progress::TaskIncrement) {
                *sink.lock().unwrap() += 1;
            }
        }));

        let report = run(&system, &config, &reporter).unwrap();

        assert_eq!(report.written.len(), 3);
        assert!(report.written.iter().all(|p| p.exists()));
        assert_eq!(*events.lock().unwrap(), 3);
        assert!(report.plan.warnings.is_empty());
        assert_eq!(report.plan.regions.frozen.as_slice(), &[2]);
        assert_eq!(report.basis_file.standard, 2);

        let basis = std::fs::read_to_string(dir.path().join("BASIS")).unwrap();
        assert_eq!(basis, "1 2  0\n6-31G*\n****\n");
    }

    #[test]
    fn plan_flags_missing_box() {
        let dir = tempfile::tempdir().unwrap();
        let plan = plan(&small_system(false), &config_in(dir.path()), &ProgressReporter::new())
            .unwrap();
        assert_eq!(plan.warnings, [PreparationWarning::MissingBox]);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn plan_flags_pseudobond_overflow_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let mut builder = MolecularSystemBuilder::new();
        builder.start_residue('A', 1, "LIG");
        builder.add_atom("C1", Point3::new(0.0, 0.0, 0.0));
        builder.start_residue('A', 2, "CUT");
        for i in 0..13 {
            builder.add_atom(&format!("C{}", i + 2), Point3::new(1.5 * (i + 1) as f64, 0.0, 0.0));
        }
        builder.box_dimensions([40.0, 40.0, 40.0]);
        let system = builder.build();

        let config = PreparationConfigBuilder::new()
            .qm_selection("ligand", Selection::residue_names(["LIG"]))
            .pseudobond_selection("cut", Selection::residue_names(["CUT"]))
            .output(OutputConfig {
                regions_path: dir.path().join("regions.inp"),
                basis_path: dir.path().join("BASIS"),
                listing_path: None,
            })
            .build()
            .unwrap();

        let plan = plan(&system, &config, &ProgressReporter::new()).unwrap();
        assert_eq!(
            plan.warnings,
            [PreparationWarning::PseudobondOverflow { count: 13 }]
        );
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);

        let report = run(&system, &config, &ProgressReporter::new()).unwrap();
        let overflow_warnings = report
            .plan
            .warnings
            .iter()
            .filter(|w| matches!(w, PreparationWarning::PseudobondOverflow { .. }))
            .count();
        assert_eq!(overflow_warnings, 1);
        assert!(report.basis_file.pseudobond_overflow());
    }

    #[test]
    fn selection_failure_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = PreparationConfigBuilder::new()
            .qm_selection("missing", Selection::residue_names(["XXX"]))
            .output(OutputConfig {
                regions_path: dir.path().join("regions.inp"),
                basis_path: dir.path().join("BASIS"),
                listing_path: None,
            })
            .build()
            .unwrap();

        let err = run(&small_system(true), &config, &ProgressReporter::new()).unwrap_err();
        assert!(matches!(err, EngineError::Selection { .. }));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn unwritable_output_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no-such-dir");
        let config = PreparationConfigBuilder::new()
            .qm_selection("ligand", Selection::residue_names(["LIG"]))
            .output(OutputConfig {
                regions_path: missing.join("regions.inp"),
                basis_path: missing.join("BASIS"),
                listing_path: None,
            })
            .build()
            .unwrap();

        let err = run(&small_system(true), &config, &ProgressReporter::new()).unwrap_err();
        match err {
            EngineError::Io { path, .. } => assert_eq!(path, missing.join("regions.inp")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
