use super::atomic::write_atomically;
use super::layout::{BASIS_IDS_PER_BLOCK, PSEUDOBOND_IDS_PER_BLOCK, join_ids};
use crate::core::models::basis::{BasisRecord, BasisTier};
use std::io::{self, Write};
use std::path::Path;
use tracing::warn;

pub const DEFAULT_STANDARD_BASIS: &str = "6-31G*";
pub const DEFAULT_ELEVATED_BASIS: &str = "6-31+G(d,p)";
pub const DEFAULT_PSEUDOBOND_BLOCK_1: &str =
    "STO-2G\nSP 2 1.00\n0.9034 1.00 1.00\n0.21310 1.90904 0.57864";
pub const DEFAULT_PSEUDOBOND_BLOCK_2: &str =
    "try1 1 2\nS Component\n1\n1 7.75 16.49\nP\n1\n1 1.0 0.0";

/// Basis names and pseudobond parameter blocks written into the BASIS file.
#[derive(Debug, Clone, PartialEq)]
pub struct BasisSetNames {
    pub standard: String,
    pub elevated: String,
    /// Appended after the ids on the first pseudobond pass.
    pub pseudobond_block_1: String,
    /// Written under the ids on the second pseudobond pass.
    pub pseudobond_block_2: String,
}

impl Default for BasisSetNames {
    fn default() -> Self {
        Self {
            standard: DEFAULT_STANDARD_BASIS.to_string(),
            elevated: DEFAULT_ELEVATED_BASIS.to_string(),
            pseudobond_block_1: DEFAULT_PSEUDOBOND_BLOCK_1.to_string(),
            pseudobond_block_2: DEFAULT_PSEUDOBOND_BLOCK_2.to_string(),
        }
    }
}

/// Per-tier counts of what was written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BasisFileSummary {
    pub standard: usize,
    pub elevated: usize,
    pub pseudobond: usize,
}

impl BasisFileSummary {
    /// More pseudobond atoms than fit on one line; the split blocks should be checked by hand.
    pub fn pseudobond_overflow(&self) -> bool {
        self.pseudobond > PSEUDOBOND_IDS_PER_BLOCK
    }
}

/// BASIS ids of the given tier, ascending.
fn ids_of(records: &[BasisRecord], tier: BasisTier) -> Vec<usize> {
    let mut ids: Vec<usize> = records
        .iter()
        .filter(|record| record.tier == tier)
        .map(|record| record.basis_id)
        .collect();
    ids.sort_unstable();
    ids
}

/// Writes the Gaussian `GEN` basis description (`BASIS`).
pub struct BasisFileWriter;

impl BasisFileWriter {
    pub fn write_to(
        writer: &mut impl Write,
        records: &[BasisRecord],
        names: &BasisSetNames,
    ) -> io::Result<BasisFileSummary> {
        let standard = ids_of(records, BasisTier::Standard);
        let elevated = ids_of(records, BasisTier::Elevated);
        let pseudobond = ids_of(records, BasisTier::Pseudobond);

        for (ids, basis_name) in [(&standard, &names.standard), (&elevated, &names.elevated)] {
            for chunk in ids.chunks(BASIS_IDS_PER_BLOCK) {
                writeln!(writer, "{}  0", join_ids(chunk))?;
                writeln!(writer, "{basis_name}")?;
                writeln!(writer, "****")?;
            }
        }

        let block_1 = names.pseudobond_block_1.trim_end();
        let block_2 = names.pseudobond_block_2.trim_end();
        for chunk in pseudobond.chunks(PSEUDOBOND_IDS_PER_BLOCK) {
            writeln!(writer, "{}  0 {block_1}", join_ids(chunk))?;
            writeln!(writer, "****")?;
            writeln!(writer)?;
        }
        for chunk in pseudobond.chunks(PSEUDOBOND_IDS_PER_BLOCK) {
            writeln!(writer, "{}  0", join_ids(chunk))?;
            writeln!(writer, "{block_2}")?;
            writeln!(writer)?;
        }

        let summary = BasisFileSummary {
            standard: standard.len(),
            elevated: elevated.len(),
            pseudobond: pseudobond.len(),
        };
        if summary.pseudobond_overflow() {
            warn!(
                "{} pseudobond atoms were split into blocks of {}; check the pseudobond section of the BASIS file.",
                summary.pseudobond, PSEUDOBOND_IDS_PER_BLOCK
            );
        }
        Ok(summary)
    }

    pub fn write_to_path(
        path: &Path,
        records: &[BasisRecord],
        names: &BasisSetNames,
    ) -> io::Result<BasisFileSummary> {
        let mut summary = BasisFileSummary::default();
        write_atomically(path, |writer| {
            summary = Self::write_to(writer, records, names)?;
            Ok(())
        })?;
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(tiers: &[BasisTier]) -> Vec<BasisRecord> {
        tiers
            .iter()
            .enumerate()
            .map(|(i, &tier)| BasisRecord {
                basis_id: i + 1,
                region_id: 100 + i,
                tier,
            })
            .collect()
    }

    fn render(records: &[BasisRecord], names: &BasisSetNames) -> (String, BasisFileSummary) {
        let mut out = Vec::new();
        let summary = BasisFileWriter::write_to(&mut out, records, names).unwrap();
        (String::from_utf8(out).unwrap(), summary)
    }

    #[test]
    fn eight_standard_atoms_make_a_single_block() {
        let (text, summary) = render(
            &records(&[BasisTier::Standard; 8]),
            &BasisSetNames::default(),
        );
        assert_eq!(text, "1 2 3 4 5 6 7 8  0\n6-31G*\n****\n");
        assert_eq!(summary.standard, 8);
        assert_eq!(summary.elevated, 0);
        assert!(!summary.pseudobond_overflow());
    }

    #[test]
    fn standard_then_elevated_then_pseudobond_passes() {
        let tiers = [
            BasisTier::Standard,
            BasisTier::Elevated,
            BasisTier::Standard,
            BasisTier::Pseudobond,
        ];
        let names = BasisSetNames {
            pseudobond_block_1: "PB1 line\n\n".into(),
            pseudobond_block_2: "PB2 a\nPB2 b   \n".into(),
            ..Default::default()
        };
        let (text, _) = render(&records(&tiers), &names);
        assert_eq!(
            text,
            "1 3  0\n6-31G*\n****\n\
             2  0\n6-31+G(d,p)\n****\n\
             4  0 PB1 line\n****\n\n\
             4  0\nPB2 a\nPB2 b\n\n"
        );
    }

    #[test]
    fn thirteen_pseudobond_atoms_split_twelve_and_one_in_both_passes() {
        let (text, summary) = render(
            &records(&[BasisTier::Pseudobond; 13]),
            &BasisSetNames::default(),
        );
        assert!(summary.pseudobond_overflow());

        let first_pass: Vec<&str> = text.lines().filter(|l| l.contains("  0 STO-2G")).collect();
        assert_eq!(
            first_pass,
            ["1 2 3 4 5 6 7 8 9 10 11 12  0 STO-2G", "13  0 STO-2G"]
        );
        let second_pass: Vec<&str> = text.lines().filter(|l| l.ends_with("  0")).collect();
        assert_eq!(second_pass, ["1 2 3 4 5 6 7 8 9 10 11 12  0", "13  0"]);
        assert_eq!(text.matches("try1 1 2").count(), 2);
    }

    #[test]
    fn exact_multiple_of_block_size_has_no_empty_block() {
        let (text, _) = render(
            &records(&[BasisTier::Elevated; 16]),
            &BasisSetNames::default(),
        );
        assert_eq!(text.matches("****").count(), 2);
        assert!(!text.contains("\n  0"));
    }

    #[test]
    fn no_records_writes_empty_file() {
        let (text, summary) = render(&[], &BasisSetNames::default());
        assert!(text.is_empty());
        assert_eq!(summary, BasisFileSummary::default());
    }
}
