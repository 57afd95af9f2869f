use crate::cli::PrepareArgs;
use crate::error::{CliError, Result};
use lichemprep::core::io::basis::BasisSetNames;
use lichemprep::core::io::regions::{ConvergenceTier, ElectrostaticsModel, RegionFileHeader};
use lichemprep::core::selection::index::AtomIndex;
use lichemprep::core::selection::query::Selection;
use lichemprep::engine::config::{self as core_config, OutputConfig, PreparationConfigBuilder};
use lichemprep::engine::error::EngineError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
struct PartialNamedSelection {
    name: String,
    select: Selection,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialInputConfig {
    structure: Option<PathBuf>,
    coordinates: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialOutputConfig {
    directory: Option<PathBuf>,
    regions: Option<PathBuf>,
    basis: Option<PathBuf>,
    listing: Option<PathBuf>,
    #[serde(rename = "write-listing")]
    write_listing: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialQmConfig {
    method: Option<String>,
    memory: Option<String>,
    charge: Option<i32>,
    spin: Option<u32>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialCalculationConfig {
    electrostatics: Option<String>,
    convergence: Option<String>,
    qm_type: Option<String>,
    qm_basis: Option<String>,
    mm_type: Option<String>,
    calculation_type: Option<String>,
    opt_stepsize: Option<f64>,
    max_stepsize: Option<f64>,
    max_opt_steps: Option<u32>,
    max_qm_steps: Option<u32>,
    pbc: Option<bool>,
    use_lrec: Option<bool>,
    lrec_cut: Option<f64>,
    use_ewald: Option<bool>,
    keep_files: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialBasisConfig {
    standard: Option<String>,
    elevated: Option<String>,
    pseudobond_block_1: Option<String>,
    pseudobond_block_2: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialSphereConfig {
    #[serde(default)]
    centers: Vec<AtomIndex>,
    radius: Option<f64>,
    by_residue: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialSelectionOptions {
    strict: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct PartialPreparationConfig {
    input: Option<PartialInputConfig>,
    output: Option<PartialOutputConfig>,
    qm: Option<PartialQmConfig>,
    calculation: Option<PartialCalculationConfig>,
    basis: Option<PartialBasisConfig>,
    sphere: Option<PartialSphereConfig>,
    selection: Option<PartialSelectionOptions>,
    #[serde(default)]
    qm_region: Vec<PartialNamedSelection>,
    #[serde(default)]
    pseudobond: Vec<PartialNamedSelection>,
    #[serde(default)]
    boundary: Vec<PartialNamedSelection>,
    #[serde(default)]
    higher_basis: Vec<PartialNamedSelection>,
}

/// Fully merged settings for one CLI invocation.
#[derive(Debug)]
pub struct AppConfig {
    pub structure_path: PathBuf,
    pub coordinates_path: Option<PathBuf>,
    pub core_config: core_config::PreparationConfig,
}

fn parse_value<T: FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value)))
}

fn parse_named<T>(what: &str, value: &str) -> Result<T>
where
    T: FromStr<Err = String>,
{
    value
        .parse()
        .map_err(|e| CliError::Config(format!("Invalid {}: {}", what, e)))
}

impl PartialPreparationConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn merge_with_cli(mut self, args: &PrepareArgs) -> Result<AppConfig> {
        self.apply_set_values(&args.set_values)?;

        let input = self.input.take().unwrap_or_default();
        let output = self.output.take().unwrap_or_default();
        let qm = self.qm.take().unwrap_or_default();
        let calculation = self.calculation.take().unwrap_or_default();
        let basis = self.basis.take().unwrap_or_default();
        let sphere = self.sphere.take().unwrap_or_default();
        let selection = self.selection.take().unwrap_or_default();

        let structure_path = args
            .input
            .clone()
            .or(input.structure)
            .ok_or_else(|| {
                CliError::Config(
                    "A structure file is required either as `input.structure` or via --input."
                        .to_string(),
                )
            })?;
        let coordinates_path = args.coordinates.clone().or(input.coordinates);

        if self.qm_region.is_empty() {
            return Err(CliError::Config(
                "At least one `[[qm-region]]` selection is required.".to_string(),
            ));
        }

        let header = Self::merge_header(calculation, args)?;
        let names = Self::merge_basis_names(basis);
        let output_config = Self::merge_output(output, args);

        let mut builder = PreparationConfigBuilder::new()
            .header(header)
            .basis_names(names)
            .output(output_config)
            .sphere_centers(sphere.centers)
            .sphere_by_residue(sphere.by_residue.unwrap_or(false))
            .strict_selections(args.strict || selection.strict.unwrap_or(false));

        if let Some(radius) = args.radius.or(sphere.radius) {
            builder = builder.sphere_radius(radius);
        }
        if let Some(method) = args.method.clone().or(qm.method) {
            builder = builder.qm_method(method);
        }
        if let Some(memory) = qm.memory {
            builder = builder.qm_memory(memory);
        }
        if let Some(charge) = args.charge.or(qm.charge) {
            builder = builder.qm_charge(charge);
        }
        if let Some(spin) = args.spin.or(qm.spin) {
            builder = builder.qm_spin(spin);
        }

        for named in self.qm_region {
            builder = builder.qm_selection(named.name, named.select);
        }
        for named in self.pseudobond {
            builder = builder.pseudobond_selection(named.name, named.select);
        }
        for named in self.boundary {
            builder = builder.boundary_selection(named.name, named.select);
        }
        for named in self.higher_basis {
            builder = builder.higher_basis_selection(named.name, named.select);
        }

        let core_config = builder.build().map_err(EngineError::from)?;

        Ok(AppConfig {
            structure_path,
            coordinates_path,
            core_config,
        })
    }

    fn merge_header(
        partial: PartialCalculationConfig,
        args: &PrepareArgs,
    ) -> Result<RegionFileHeader> {
        let mut header = RegionFileHeader::default();

        if let Some(model) = args.electrostatics.as_ref().or(partial.electrostatics.as_ref()) {
            header.electrostatics = parse_named::<ElectrostaticsModel>("electrostatics", model)?;
        }
        if let Some(tier) = args.convergence.as_ref().or(partial.convergence.as_ref()) {
            header.convergence = parse_named::<ConvergenceTier>("convergence", tier)?;
        }
        if let Some(value) = partial.qm_type {
            header.qm_type = value;
        }
        if let Some(value) = partial.qm_basis {
            header.qm_basis = value;
        }
        if let Some(value) = partial.mm_type {
            header.mm_type = value;
        }
        if let Some(value) = partial.calculation_type {
            header.calculation_type = value;
        }
        header.opt_stepsize = partial.opt_stepsize.unwrap_or(header.opt_stepsize);
        header.max_stepsize = partial.max_stepsize.unwrap_or(header.max_stepsize);
        header.max_opt_steps = partial.max_opt_steps.unwrap_or(header.max_opt_steps);
        header.max_qm_steps = partial.max_qm_steps.unwrap_or(header.max_qm_steps);
        header.pbc = partial.pbc.unwrap_or(header.pbc);
        header.use_lrec = partial.use_lrec.unwrap_or(header.use_lrec);
        header.lrec_cut = partial.lrec_cut.unwrap_or(header.lrec_cut);
        header.use_ewald = partial.use_ewald.unwrap_or(header.use_ewald);
        header.keep_files = partial.keep_files.unwrap_or(header.keep_files);
        Ok(header)
    }

    fn merge_basis_names(partial: PartialBasisConfig) -> BasisSetNames {
        let defaults = BasisSetNames::default();
        BasisSetNames {
            standard: partial.standard.unwrap_or(defaults.standard),
            elevated: partial.elevated.unwrap_or(defaults.elevated),
            pseudobond_block_1: partial
                .pseudobond_block_1
                .unwrap_or(defaults.pseudobond_block_1),
            pseudobond_block_2: partial
                .pseudobond_block_2
                .unwrap_or(defaults.pseudobond_block_2),
        }
    }

    fn merge_output(partial: PartialOutputConfig, args: &PrepareArgs) -> OutputConfig {
        let defaults = OutputConfig::default();
        let directory = args.output_dir.clone().or(partial.directory);
        let place = |path: PathBuf| match &directory {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path,
        };

        let write_listing = !args.no_listing && partial.write_listing.unwrap_or(true);
        OutputConfig {
            regions_path: place(partial.regions.unwrap_or(defaults.regions_path)),
            basis_path: place(partial.basis.unwrap_or(defaults.basis_path)),
            listing_path: if write_listing {
                partial.listing.or(defaults.listing_path).map(place)
            } else {
                None
            },
        }
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let (key, value) = kv_pair.split_once('=').ok_or_else(|| {
                CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                ))
            })?;

            match key {
                "qm.method" => {
                    self.qm.get_or_insert_with(Default::default).method = Some(value.to_string())
                }
                "qm.memory" => {
                    self.qm.get_or_insert_with(Default::default).memory = Some(value.to_string())
                }
                "qm.charge" => {
                    self.qm.get_or_insert_with(Default::default).charge =
                        Some(parse_value(key, value, "integer")?)
                }
                "qm.spin" => {
                    self.qm.get_or_insert_with(Default::default).spin =
                        Some(parse_value(key, value, "integer")?)
                }
                "calculation.electrostatics" => {
                    self.calculation
                        .get_or_insert_with(Default::default)
                        .electrostatics = Some(value.to_string())
                }
                "calculation.convergence" => {
                    self.calculation
                        .get_or_insert_with(Default::default)
                        .convergence = Some(value.to_string())
                }
                "calculation.max-opt-steps" => {
                    self.calculation
                        .get_or_insert_with(Default::default)
                        .max_opt_steps = Some(parse_value(key, value, "integer")?)
                }
                "calculation.max-qm-steps" => {
                    self.calculation
                        .get_or_insert_with(Default::default)
                        .max_qm_steps = Some(parse_value(key, value, "integer")?)
                }
                "calculation.lrec-cut" => {
                    self.calculation.get_or_insert_with(Default::default).lrec_cut =
                        Some(parse_value(key, value, "float")?)
                }
                "sphere.radius" => {
                    self.sphere.get_or_insert_with(Default::default).radius =
                        Some(parse_value(key, value, "float")?)
                }
                "sphere.by-residue" => {
                    self.sphere.get_or_insert_with(Default::default).by_residue =
                        Some(parse_value(key, value, "boolean")?)
                }
                "selection.strict" => {
                    self.selection.get_or_insert_with(Default::default).strict =
                        Some(parse_value(key, value, "boolean")?)
                }
                "basis.standard" => {
                    self.basis.get_or_insert_with(Default::default).standard =
                        Some(value.to_string())
                }
                "basis.elevated" => {
                    self.basis.get_or_insert_with(Default::default).elevated =
                        Some(value.to_string())
                }
                "output.directory" => {
                    self.output.get_or_insert_with(Default::default).directory =
                        Some(PathBuf::from(value))
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}
