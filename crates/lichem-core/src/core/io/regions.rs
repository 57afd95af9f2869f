use super::atomic::write_atomically;
use super::layout::{REGION_IDS_PER_LINE, write_wrapped};
use crate::core::models::region::{RegionAssignment, RegionCategory};
use std::fmt;
use std::io::{self, Write};
use std::path::Path;
use std::str::FromStr;
use tracing::warn;

/// How the MM environment polarizes the QM region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ElectrostaticsModel {
    /// Fixed point charges (AMBER-style force fields).
    #[default]
    Charges,
    /// Polarizable multipoles (AMOEBA).
    Amoeba,
}

impl ElectrostaticsModel {
    pub fn keyword(self) -> &'static str {
        match self {
            ElectrostaticsModel::Charges => "CHARGES",
            ElectrostaticsModel::Amoeba => "AMOEBA",
        }
    }

    pub fn lrec_exponent(self) -> u32 {
        match self {
            ElectrostaticsModel::Charges => 2,
            ElectrostaticsModel::Amoeba => 3,
        }
    }
}

impl FromStr for ElectrostaticsModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CHARGES" | "AMBER" => Ok(ElectrostaticsModel::Charges),
            "AMOEBA" => Ok(ElectrostaticsModel::Amoeba),
            other => Err(format!(
                "unknown electrostatics model '{other}' (expected 'charges', 'amber' or 'amoeba')"
            )),
        }
    }
}

impl fmt::Display for ElectrostaticsModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Optimization convergence tolerances, kept as the literal strings LICHEM expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvergenceTolerances {
    pub qm_opt_tolerance: &'static str,
    pub qm_rms_force_tol: &'static str,
    pub qm_max_force_tol: &'static str,
    pub mm_opt_tolerance: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConvergenceTier {
    Loose,
    #[default]
    Medium,
    Tight,
}

impl ConvergenceTier {
    pub fn tolerances(self) -> ConvergenceTolerances {
        match self {
            ConvergenceTier::Loose => ConvergenceTolerances {
                qm_opt_tolerance: "0.15",
                qm_rms_force_tol: "0.10",
                qm_max_force_tol: "0.020",
                mm_opt_tolerance: "0.20",
            },
            ConvergenceTier::Medium => ConvergenceTolerances {
                qm_opt_tolerance: "0.05",
                qm_rms_force_tol: "0.010",
                qm_max_force_tol: "0.015",
                mm_opt_tolerance: "0.05",
            },
            ConvergenceTier::Tight => ConvergenceTolerances {
                qm_opt_tolerance: "0.001",
                qm_rms_force_tol: "0.005",
                qm_max_force_tol: "0.015",
                mm_opt_tolerance: "0.01",
            },
        }
    }
}

impl FromStr for ConvergenceTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "loose" => Ok(ConvergenceTier::Loose),
            "medium" => Ok(ConvergenceTier::Medium),
            "tight" => Ok(ConvergenceTier::Tight),
            other => Err(format!(
                "unknown convergence tier '{other}' (expected 'loose', 'medium' or 'tight')"
            )),
        }
    }
}

impl fmt::Display for ConvergenceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConvergenceTier::Loose => "loose",
            ConvergenceTier::Medium => "medium",
            ConvergenceTier::Tight => "tight",
        };
        f.write_str(name)
    }
}

/// Every `Key: value` line of the regions file header except the box.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionFileHeader {
    pub qm_type: String,
    pub qm_method: String,
    pub qm_basis: String,
    pub qm_memory: String,
    pub qm_charge: i32,
    pub qm_spin: u32,
    pub mm_type: String,
    pub electrostatics: ElectrostaticsModel,
    pub calculation_type: String,
    pub opt_stepsize: f64,
    pub max_stepsize: f64,
    pub convergence: ConvergenceTier,
    pub max_opt_steps: u32,
    pub max_qm_steps: u32,
    pub pbc: bool,
    pub use_lrec: bool,
    pub lrec_cut: f64,
    pub use_ewald: bool,
    pub keep_files: bool,
}

impl Default for RegionFileHeader {
    fn default() -> Self {
        Self {
            qm_type: "g16".to_string(),
            qm_method: "B3LYP".to_string(),
            qm_basis: "GEN".to_string(),
            qm_memory: "16 GB".to_string(),
            qm_charge: 0,
            qm_spin: 1,
            mm_type: "TINKER".to_string(),
            electrostatics: ElectrostaticsModel::Charges,
            calculation_type: "SP".to_string(),
            opt_stepsize: 0.5,
            max_stepsize: 0.1,
            convergence: ConvergenceTier::Medium,
            max_opt_steps: 30,
            max_qm_steps: 15,
            pbc: true,
            use_lrec: true,
            lrec_cut: 25.0,
            use_ewald: true,
            keep_files: true,
        }
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

/// Writes the LICHEM regions file (`regions.inp`).
pub struct RegionFileWriter;

impl RegionFileWriter {
    /// Writes the header and the four category sections.
    ///
    /// A missing box is written as `0.000000 0.000000 0.000000` and logged as a warning.
    pub fn write_to(
        writer: &mut impl Write,
        header: &RegionFileHeader,
        box_dimensions: Option<[f64; 3]>,
        regions: &RegionAssignment,
    ) -> io::Result<()> {
        let [bx, by, bz] = box_dimensions.unwrap_or_else(|| {
            warn!("No periodic box available; writing Box_size as 0.000000 0.000000 0.000000.");
            [0.0; 3]
        });
        let tolerances = header.convergence.tolerances();

        writeln!(writer, "Potential_type: QMMM")?;
        writeln!(writer, "QM_type: {}", header.qm_type)?;
        writeln!(writer, "QM_method: {}", header.qm_method)?;
        writeln!(writer, "QM_basis: {}", header.qm_basis)?;
        writeln!(writer, "QM_memory: {}", header.qm_memory)?;
        writeln!(writer, "QM_charge: {}", header.qm_charge)?;
        writeln!(writer, "QM_spin: {}", header.qm_spin)?;
        writeln!(writer, "MM_type: {}", header.mm_type)?;
        writeln!(writer, "Electrostatics: {}", header.electrostatics.keyword())?;
        writeln!(writer, "Calculation_type: {}", header.calculation_type)?;
        writeln!(writer, "Opt_stepsize: {:.2}", header.opt_stepsize)?;
        writeln!(writer, "Max_stepsize: {:.2}", header.max_stepsize)?;
        writeln!(writer, "qm_opt_tolerance: {}", tolerances.qm_opt_tolerance)?;
        writeln!(writer, "qm_rms_force_tol: {}", tolerances.qm_rms_force_tol)?;
        writeln!(writer, "qm_max_force_tol: {}", tolerances.qm_max_force_tol)?;
        writeln!(writer, "mm_opt_tolerance: {}", tolerances.mm_opt_tolerance)?;
        writeln!(writer, "max_opt_steps: {}", header.max_opt_steps)?;
        writeln!(writer, "max_qm_steps: {}", header.max_qm_steps)?;
        writeln!(writer, "PBC: {}", yes_no(header.pbc))?;
        writeln!(writer, "Box_size: {bx:.6} {by:.6} {bz:.6}")?;
        writeln!(writer, "Use_LREC: {}", yes_no(header.use_lrec))?;
        writeln!(writer, "LREC_cut: {:.1}", header.lrec_cut)?;
        writeln!(
            writer,
            "LREC_exponent: {}",
            header.electrostatics.lrec_exponent()
        )?;
        writeln!(writer, "Use_Ewald: {}", yes_no(header.use_ewald))?;
        writeln!(writer, "Keep_files: {}", yes_no(header.keep_files))?;

        for category in RegionCategory::ALL {
            let members = regions.category(category);
            writeln!(writer, "{}: {}", category.section_key(), members.len())?;
            write_wrapped(writer, members.as_slice(), REGION_IDS_PER_LINE)?;
        }
        Ok(())
    }

    pub fn write_to_path(
        path: &Path,
        header: &RegionFileHeader,
        box_dimensions: Option<[f64; 3]>,
        regions: &RegionAssignment,
    ) -> io::Result<()> {
        write_atomically(path, |writer| {
            Self::write_to(writer, header, box_dimensions, regions)
        })
    }
}
