use crate::core::io::basis::BasisSetNames;
use crate::core::io::regions::{ConvergenceTier, ElectrostaticsModel, RegionFileHeader};
use crate::core::selection::index::AtomIndex;
use crate::core::selection::query::Selection;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_SPHERE_RADIUS: f64 = 20.0;
pub const DEFAULT_REGIONS_FILE: &str = "regions.inp";
pub const DEFAULT_BASIS_FILE: &str = "BASIS";
pub const DEFAULT_LISTING_FILE: &str = "BASIS_verification.txt";

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// A selection together with the label it is reported under.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedSelection {
    pub name: String,
    pub selection: Selection,
}

impl NamedSelection {
    pub fn new(name: impl Into<String>, selection: Selection) -> Self {
        Self {
            name: name.into(),
            selection,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActiveSphereConfig {
    pub centers: Vec<AtomIndex>,
    pub radius: f64,
    /// Widen every sphere hit to its whole residue.
    pub by_residue: bool,
}

impl Default for ActiveSphereConfig {
    fn default() -> Self {
        Self {
            centers: Vec::new(),
            radius: DEFAULT_SPHERE_RADIUS,
            by_residue: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PartitionConfig {
    pub qm: Vec<NamedSelection>,
    pub pseudobond: Vec<NamedSelection>,
    pub boundary: Vec<NamedSelection>,
    pub sphere: ActiveSphereConfig,
    /// Treat an empty named sub-selection as an error instead of a warning.
    pub strict_selections: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BasisConfig {
    /// QM atoms that receive the elevated basis set.
    pub higher_basis: Vec<NamedSelection>,
    pub names: BasisSetNames,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutputConfig {
    pub regions_path: PathBuf,
    pub basis_path: PathBuf,
    /// The verification listing is skipped when `None`.
    pub listing_path: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            regions_path: PathBuf::from(DEFAULT_REGIONS_FILE),
            basis_path: PathBuf::from(DEFAULT_BASIS_FILE),
            listing_path: Some(PathBuf::from(DEFAULT_LISTING_FILE)),
        }
    }
}

/// Everything one preparation run needs, fixed before the run starts.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparationConfig {
    pub partition: PartitionConfig,
    pub basis: BasisConfig,
    pub header: RegionFileHeader,
    pub output: OutputConfig,
}

#[derive(Default)]
pub struct PreparationConfigBuilder {
    qm: Vec<NamedSelection>,
    pseudobond: Vec<NamedSelection>,
    boundary: Vec<NamedSelection>,
    higher_basis: Vec<NamedSelection>,
    sphere_centers: Vec<AtomIndex>,
    sphere_radius: Option<f64>,
    sphere_by_residue: bool,
    strict_selections: bool,
    header: Option<RegionFileHeader>,
    qm_method: Option<String>,
    qm_memory: Option<String>,
    qm_charge: Option<i32>,
    qm_spin: Option<u32>,
    electrostatics: Option<ElectrostaticsModel>,
    convergence: Option<ConvergenceTier>,
    basis_names: Option<BasisSetNames>,
    output: Option<OutputConfig>,
}

impl PreparationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn qm_selection(mut self, name: impl Into<String>, selection: Selection) -> Self {
        self.qm.push(NamedSelection::new(name, selection));
        self
    }
    pub fn pseudobond_selection(mut self, name: impl Into<String>, selection: Selection) -> Self {
        self.pseudobond.push(NamedSelection::new(name, selection));
        self
    }
    pub fn boundary_selection(mut self, name: impl Into<String>, selection: Selection) -> Self {
        self.boundary.push(NamedSelection::new(name, selection));
        self
    }
    pub fn higher_basis_selection(mut self, name: impl Into<String>, selection: Selection) -> Self {
        self.higher_basis.push(NamedSelection::new(name, selection));
        self
    }
    pub fn sphere_center(mut self, center: AtomIndex) -> Self {
        self.sphere_centers.push(center);
        self
    }
    pub fn sphere_centers(mut self, centers: impl IntoIterator<Item = AtomIndex>) -> Self {
        self.sphere_centers.extend(centers);
        self
    }
    pub fn sphere_radius(mut self, radius: f64) -> Self {
        self.sphere_radius = Some(radius);
        self
    }
    pub fn sphere_by_residue(mut self, by_residue: bool) -> Self {
        self.sphere_by_residue = by_residue;
        self
    }
    pub fn strict_selections(mut self, strict: bool) -> Self {
        self.strict_selections = strict;
        self
    }
    /// Replaces the whole header; the individual setters below still apply on top of it.
    pub fn header(mut self, header: RegionFileHeader) -> Self {
        self.header = Some(header);
        self
    }
    pub fn qm_method(mut self, method: impl Into<String>) -> Self {
        self.qm_method = Some(method.into());
        self
    }
    pub fn qm_memory(mut self, memory: impl Into<String>) -> Self {
        self.qm_memory = Some(memory.into());
        self
    }
    pub fn qm_charge(mut self, charge: i32) -> Self {
        self.qm_charge = Some(charge);
        self
    }
    pub fn qm_spin(mut self, spin: u32) -> Self {
        self.qm_spin = Some(spin);
        self
    }
    pub fn electrostatics(mut self, model: ElectrostaticsModel) -> Self {
        self.electrostatics = Some(model);
        self
    }
    pub fn convergence(mut self, tier: ConvergenceTier) -> Self {
        self.convergence = Some(tier);
        self
    }
    pub fn basis_names(mut self, names: BasisSetNames) -> Self {
        self.basis_names = Some(names);
        self
    }
    pub fn output(mut self, output: OutputConfig) -> Self {
        self.output = Some(output);
        self
    }

    pub fn build(self) -> Result<PreparationConfig, ConfigError> {
        if self.qm.is_empty() {
            return Err(ConfigError::MissingParameter("qm selections"));
        }

        let radius = self.sphere_radius.unwrap_or(DEFAULT_SPHERE_RADIUS);
        if !radius.is_finite() || radius < 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "sphere radius",
                reason: format!("must be a finite, non-negative distance (got {radius})"),
            });
        }

        let mut header = self.header.unwrap_or_default();
        if let Some(method) = self.qm_method {
            header.qm_method = method;
        }
        if let Some(memory) = self.qm_memory {
            header.qm_memory = memory;
        }
        if let Some(charge) = self.qm_charge {
            header.qm_charge = charge;
        }
        if let Some(spin) = self.qm_spin {
            header.qm_spin = spin;
        }
        if let Some(model) = self.electrostatics {
            header.electrostatics = model;
        }
        if let Some(tier) = self.convergence {
            header.convergence = tier;
        }
        if header.qm_method.trim().is_empty() {
            return Err(ConfigError::InvalidParameter {
                name: "qm method",
                reason: "must not be empty".to_string(),
            });
        }
        if header.qm_spin == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "qm spin",
                reason: "spin multiplicity starts at 1".to_string(),
            });
        }

        let names = self.basis_names.unwrap_or_default();
        if names.standard.trim().is_empty() || names.elevated.trim().is_empty() {
            return Err(ConfigError::InvalidParameter {
                name: "basis names",
                reason: "standard and elevated basis names must not be empty".to_string(),
            });
        }

        Ok(PreparationConfig {
            partition: PartitionConfig {
                qm: self.qm,
                pseudobond: self.pseudobond,
                boundary: self.boundary,
                sphere: ActiveSphereConfig {
                    centers: self.sphere_centers,
                    radius,
                    by_residue: self.sphere_by_residue,
                },
                strict_selections: self.strict_selections,
            },
            basis: BasisConfig {
                higher_basis: self.higher_basis,
                names,
            },
            header,
            output: self.output.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> PreparationConfigBuilder {
        PreparationConfigBuilder::new().qm_selection("core", Selection::residue(1))
    }

    #[test]
    fn build_applies_defaults() {
        let config = minimal().build().unwrap();
        assert_eq!(config.partition.sphere.radius, DEFAULT_SPHERE_RADIUS);
        assert!(config.partition.sphere.centers.is_empty());
        assert!(!config.partition.strict_selections);
        assert_eq!(config.header, RegionFileHeader::default());
        assert_eq!(config.basis.names, BasisSetNames::default());
        assert_eq!(config.output, OutputConfig::default());
    }

    #[test]
    fn individual_header_setters_override_replaced_header() {
        let header = RegionFileHeader {
            qm_method: "HF".into(),
            qm_charge: -1,
            ..Default::default()
        };
        let config = minimal()
            .header(header)
            .qm_method("wB97XD")
            .electrostatics(ElectrostaticsModel::Amoeba)
            .convergence(ConvergenceTier::Tight)
            .build()
            .unwrap();
        assert_eq!(config.header.qm_method, "wB97XD");
        assert_eq!(config.header.qm_charge, -1);
        assert_eq!(config.header.electrostatics, ElectrostaticsModel::Amoeba);
        assert_eq!(config.header.convergence, ConvergenceTier::Tight);
    }

    #[test]
    fn selections_keep_their_order() {
        let config = minimal()
            .qm_selection("ligand", Selection::residue_names(["LIG"]))
            .sphere_centers([AtomIndex::one_based(10), AtomIndex::native(3)])
            .build()
            .unwrap();
        let names: Vec<_> = config.partition.qm.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["core", "ligand"]);
        assert_eq!(
            config.partition.sphere.centers,
            [AtomIndex::one_based(10), AtomIndex::native(3)]
        );
    }

    #[test]
    fn missing_qm_selection_is_rejected() {
        let result = PreparationConfigBuilder::new().build();
        assert_eq!(result, Err(ConfigError::MissingParameter("qm selections")));
    }

    #[test]
    fn negative_radius_and_zero_spin_are_rejected() {
        assert!(matches!(
            minimal().sphere_radius(-1.0).build(),
            Err(ConfigError::InvalidParameter { name: "sphere radius", .. })
        ));
        assert!(matches!(
            minimal().qm_spin(0).build(),
            Err(ConfigError::InvalidParameter { name: "qm spin", .. })
        ));
    }
}
