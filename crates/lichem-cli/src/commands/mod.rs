pub mod check;
pub mod prepare;

use crate::error::{CliError, Result};
use lichemprep::core::io::pdb::PdbFile;
use lichemprep::core::io::tinker_xyz::TinkerXyzFile;
use lichemprep::core::io::traits::StructureFile;
use lichemprep::core::models::system::MolecularSystem;
use lichemprep::workflows::prepare::PreparationWarning;
use std::path::Path;
use tracing::{info, warn};

/// Reads the PDB topology and, when given, overlays the TINKER XYZ coordinates onto it.
///
/// A box on the XYZ frame replaces the one from CRYST1.
pub fn load_system(structure: &Path, coordinates: Option<&Path>) -> Result<MolecularSystem> {
    info!("Loading input structure from {:?}", structure);
    let (mut system, metadata) =
        PdbFile::read_from_path(structure).map_err(|e| CliError::FileParsing {
            path: structure.to_path_buf(),
            source: e.into(),
        })?;
    if metadata.models_seen > 1 {
        warn!(
            "{:?} holds {} models; only the first one was read.",
            structure, metadata.models_seen
        );
    }

    let Some(coordinates) = coordinates else {
        return Ok(system);
    };

    info!("Overlaying coordinates from {:?}", coordinates);
    let frame = TinkerXyzFile::read_from_path(coordinates).map_err(|e| CliError::FileParsing {
        path: coordinates.to_path_buf(),
        source: e.into(),
    })?;
    system
        .overlay_positions(&frame.positions)
        .ok_or_else(|| CliError::FileParsing {
            path: coordinates.to_path_buf(),
            source: anyhow::anyhow!(
                "holds {} atoms but the structure has {}",
                frame.positions.len(),
                system.atom_count()
            ),
        })?;
    if frame.box_dimensions.is_some() {
        system.set_box_dimensions(frame.box_dimensions);
    }
    Ok(system)
}

pub(crate) fn print_warnings(warnings: &[PreparationWarning]) {
    for warning in warnings {
        println!("  ⚠ {}", warning);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const PDB: &str = "\
CRYST1   50.000   50.000   50.000  90.00  90.00  90.00 P 1           1
ATOM      1  O   WAT A   1       0.000   0.000   0.000  1.00  0.00           O
ATOM      2  H1  WAT A   1       0.957   0.000   0.000  1.00  0.00           H
END
";

    #[test]
    fn loads_pdb_and_overlays_xyz_frame() {
        let dir = tempdir().unwrap();
        let pdb = dir.path().join("system.pdb");
        let xyz = dir.path().join("system.xyz");
        fs::write(&pdb, PDB).unwrap();
        fs::write(
            &xyz,
            "2 water\n 60.0 60.0 60.0 90.0 90.0 90.0\n 1 O 1.0 2.0 3.0 1 2\n 2 H 1.5 2.0 3.0 2 1\n",
        )
        .unwrap();

        let plain = load_system(&pdb, None).unwrap();
        assert_eq!(plain.box_dimensions(), Some([50.0, 50.0, 50.0]));

        let system = load_system(&pdb, Some(&xyz)).unwrap();
        assert_eq!(system.atom(0).unwrap().position.y, 2.0);
        assert_eq!(system.box_dimensions(), Some([60.0, 60.0, 60.0]));
    }

    #[test]
    fn mismatched_xyz_frame_is_rejected() {
        let dir = tempdir().unwrap();
        let pdb = dir.path().join("system.pdb");
        let xyz = dir.path().join("short.xyz");
        fs::write(&pdb, PDB).unwrap();
        fs::write(&xyz, "1 one atom\n 1 O 1.0 2.0 3.0 1\n").unwrap();

        let err = load_system(&pdb, Some(&xyz)).unwrap_err();
        assert!(matches!(err, CliError::FileParsing { ref path, .. } if path == &xyz));
    }
}
