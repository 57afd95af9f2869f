use super::config::{NamedSelection, PartitionConfig};
use super::error::EngineError;
use crate::core::models::region::{RegionAssignment, RegionCategory};
use crate::core::models::system::MolecularSystem;
use crate::core::selection::atom_set::AtomSet;
use crate::core::selection::query::Selection;
use crate::core::selection::resolver::SelectionResolver;
use tracing::{debug, info, warn};

/// Identity of an atom the active sphere was grown around.
#[derive(Debug, Clone, PartialEq)]
pub struct SphereCenter {
    pub native_index: usize,
    pub atom_name: String,
    pub res_name: String,
    pub res_id: isize,
}

/// A named sub-selection that matched no atom.
#[derive(Debug, Clone, PartialEq)]
pub struct EmptySelection {
    pub category: RegionCategory,
    pub name: String,
}

/// Counts and diagnostics produced while partitioning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartitionSummary {
    pub qm: usize,
    pub pseudobond: usize,
    pub boundary: usize,
    pub active: usize,
    pub frozen: usize,
    pub centers: Vec<SphereCenter>,
    pub empty_selections: Vec<EmptySelection>,
}

/// Classifies every atom of the universe into the QM/MM region categories.
pub struct RegionPartitioner<'a, R: SelectionResolver> {
    resolver: &'a R,
    system: &'a MolecularSystem,
    config: &'a PartitionConfig,
}

impl<'a, R: SelectionResolver> RegionPartitioner<'a, R> {
    pub fn new(resolver: &'a R, system: &'a MolecularSystem, config: &'a PartitionConfig) -> Self {
        Self {
            resolver,
            system,
            config,
        }
    }

    /// Computes QM, pseudobond, boundary, the active sphere, and the frozen complement.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Selection`] if the QM category ends up empty, if a named
    /// sub-selection is empty under strict checking, or if the resolver rejects a selection.
    /// Returns [`EngineError::IndexConvention`] if a sphere center is out of range for its
    /// numbering convention.
    pub fn partition(&self) -> Result<(RegionAssignment, PartitionSummary), EngineError> {
        let mut summary = PartitionSummary::default();

        let qm = self.union_category(RegionCategory::Qm, &self.config.qm, &mut summary)?;
        if qm.is_empty() {
            return Err(EngineError::Selection {
                name: RegionCategory::Qm.to_string(),
                reason: "the QM region matched no atoms".to_string(),
            });
        }
        let pseudobond = self.union_category(
            RegionCategory::Pseudobond,
            &self.config.pseudobond,
            &mut summary,
        )?;
        let boundary =
            self.union_category(RegionCategory::Boundary, &self.config.boundary, &mut summary)?;
        let sphere = self.active_sphere(&mut summary)?;

        let mut assignment = RegionAssignment {
            qm,
            pseudobond,
            boundary,
            frozen: AtomSet::new(),
            sphere,
        };
        let unfrozen = assignment.unfrozen();
        assignment.frozen = self.resolver.universe().difference(&unfrozen);

        summary.qm = assignment.qm.len();
        summary.pseudobond = assignment.pseudobond.len();
        summary.boundary = assignment.boundary.len();
        summary.active = assignment.sphere.len();
        summary.frozen = assignment.frozen.len();

        info!(
            qm = summary.qm,
            pseudobond = summary.pseudobond,
            boundary = summary.boundary,
            active = summary.active,
            frozen = summary.frozen,
            "Partitioned {} atoms.",
            self.resolver.atom_count()
        );

        Ok((assignment, summary))
    }

    fn union_category(
        &self,
        category: RegionCategory,
        selections: &[NamedSelection],
        summary: &mut PartitionSummary,
    ) -> Result<AtomSet, EngineError> {
        let mut members = AtomSet::new();
        for named in selections {
            let label = format!("{category}.{}", named.name);
            let hits = self
                .resolver
                .resolve(&named.selection)
                .map_err(|e| EngineError::from_selection(&label, e))?;
            debug!("Selection '{}' matched {} atoms.", label, hits.len());

            if hits.is_empty() {
                if self.config.strict_selections {
                    return Err(EngineError::Selection {
                        name: label,
                        reason: "matched no atoms".to_string(),
                    });
                }
                warn!("Selection '{}' matched no atoms.", label);
                summary.empty_selections.push(EmptySelection {
                    category,
                    name: named.name.clone(),
                });
            }
            members.union_with(&hits);
        }
        Ok(members)
    }

    fn active_sphere(&self, summary: &mut PartitionSummary) -> Result<AtomSet, EngineError> {
        let sphere_config = &self.config.sphere;
        let mut sphere = AtomSet::new();

        for center in &sphere_config.centers {
            let native = center
                .to_native(self.resolver.atom_count())
                .map_err(|e| EngineError::from_selection("sphere center", e))?;

            let mut query = Selection::Sphere {
                radius: sphere_config.radius,
                center: *center,
            };
            if sphere_config.by_residue {
                query = Selection::by_residue(query);
            }
            let hits = self
                .resolver
                .resolve(&query)
                .map_err(|e| EngineError::from_selection("sphere", e))?;

            if let Some(atom) = self.system.atom(native) {
                info!(
                    "Active sphere of {:.1} A around atom {} ({} {} {}, native index {}) holds {} atoms.",
                    sphere_config.radius,
                    center,
                    atom.res_name,
                    atom.res_id,
                    atom.name,
                    native,
                    hits.len()
                );
                summary.centers.push(SphereCenter {
                    native_index: native,
                    atom_name: atom.name.clone(),
                    res_name: atom.res_name.clone(),
                    res_id: atom.res_id,
                });
            }
            sphere.union_with(&hits);
        }
        Ok(sphere)
    }
}
