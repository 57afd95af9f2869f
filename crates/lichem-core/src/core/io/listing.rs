use super::atomic::write_atomically;
use crate::core::models::basis::BasisRecord;
use crate::core::models::system::MolecularSystem;
use std::io::{self, Write};
use std::path::Path;

const HEADER: &str = "BASIS_ID Regions_ID TINKER_ID ResName ResNum AtomName Type";

/// Writes the audit table mapping BASIS ids back to atoms (`BASIS_verification.txt`).
pub struct VerificationListingWriter;

impl VerificationListingWriter {
    pub fn write_to(
        writer: &mut impl Write,
        records: &[BasisRecord],
        system: &MolecularSystem,
    ) -> io::Result<()> {
        writeln!(writer, "{HEADER}")?;
        for record in records {
            let atom = system.atom(record.region_id).ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!(
                        "BASIS id {} refers to atom {} which is not in the system",
                        record.basis_id, record.region_id
                    ),
                )
            })?;
            writeln!(
                writer,
                "{:<8} {:<10} {:<9} {:<7} {:<6} {:<8} {:<5}",
                record.basis_id,
                record.region_id,
                record.tinker_id(),
                atom.res_name,
                atom.res_id,
                atom.name,
                record.tier.label()
            )?;
        }
        Ok(())
    }

    pub fn write_to_path(
        path: &Path,
        records: &[BasisRecord],
        system: &MolecularSystem,
    ) -> io::Result<()> {
        write_atomically(path, |writer| Self::write_to(writer, records, system))
    }
}
