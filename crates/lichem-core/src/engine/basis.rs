use super::config::BasisConfig;
use super::error::EngineError;
use crate::core::models::basis::{BasisRecord, BasisTier};
use crate::core::models::region::RegionAssignment;
use crate::core::selection::atom_set::AtomSet;
use crate::core::selection::resolver::SelectionResolver;
use tracing::{debug, info, warn};

/// Tier of a single atom: pseudobond beats elevated beats standard.
///
/// Returns `None` for an atom that is neither QM nor pseudobond.
pub fn tier_of(
    index: usize,
    qm: &AtomSet,
    pseudobond: &AtomSet,
    higher_basis: &AtomSet,
) -> Option<BasisTier> {
    if pseudobond.contains(index) {
        Some(BasisTier::Pseudobond)
    } else if higher_basis.contains(index) {
        Some(BasisTier::Elevated)
    } else if qm.contains(index) {
        Some(BasisTier::Standard)
    } else {
        None
    }
}

/// Numbers QM ∪ PB from 1 in union order and gives every atom exactly one tier.
///
/// # Errors
///
/// Returns [`EngineError::UnassignedAtom`] if an atom of QM ∪ PB receives no tier.
pub fn build_basis(
    qm: &AtomSet,
    pseudobond: &AtomSet,
    higher_basis: &AtomSet,
) -> Result<Vec<BasisRecord>, EngineError> {
    qm.union(pseudobond)
        .iter()
        .enumerate()
        .map(|(i, region_id)| {
            let basis_id = i + 1;
            let tier = tier_of(region_id, qm, pseudobond, higher_basis).ok_or(
                EngineError::UnassignedAtom {
                    basis_id,
                    region_id,
                },
            )?;
            Ok(BasisRecord {
                basis_id,
                region_id,
                tier,
            })
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasisSummary {
    pub standard: usize,
    pub elevated: usize,
    pub pseudobond: usize,
    /// Higher-basis atoms that are neither QM nor pseudobond and therefore get no basis.
    pub ignored_higher_basis: Vec<usize>,
}

/// Resolves the higher-basis selections and maps QM ∪ PB onto BASIS records.
pub struct BasisMapper<'a, R: SelectionResolver> {
    resolver: &'a R,
    config: &'a BasisConfig,
}

impl<'a, R: SelectionResolver> BasisMapper<'a, R> {
    pub fn new(resolver: &'a R, config: &'a BasisConfig) -> Self {
        Self { resolver, config }
    }

    pub fn map(
        &self,
        regions: &RegionAssignment,
    ) -> Result<(Vec<BasisRecord>, BasisSummary), EngineError> {
        let mut higher_basis = AtomSet::new();
        for named in &self.config.higher_basis {
            let label = format!("higher-basis.{}", named.name);
            let hits = self
                .resolver
                .resolve(&named.selection)
                .map_err(|e| EngineError::from_selection(&label, e))?;
            debug!("Selection '{}' matched {} atoms.", label, hits.len());
            if hits.is_empty() {
                warn!("Selection '{}' matched no atoms.", label);
            }
            higher_basis.union_with(&hits);
        }

        let records = build_basis(&regions.qm, &regions.pseudobond, &higher_basis)?;

        let mut summary = BasisSummary::default();
        for record in &records {
            match record.tier {
                BasisTier::Standard => summary.standard += 1,
                BasisTier::Elevated => summary.elevated += 1,
                BasisTier::Pseudobond => summary.pseudobond += 1,
            }
        }
        summary.ignored_higher_basis = higher_basis
            .iter()
            .filter(|&i| !regions.qm.contains(i) && !regions.pseudobond.contains(i))
            .collect();
        if !summary.ignored_higher_basis.is_empty() {
            warn!(
                "{} higher-basis atoms are outside the QM and pseudobond regions and were ignored: {:?}",
                summary.ignored_higher_basis.len(),
                summary.ignored_higher_basis
            );
        }

        info!(
            standard = summary.standard,
            elevated = summary.elevated,
            pseudobond = summary.pseudobond,
            "Assigned BASIS ids 1..={}.",
            records.len()
        );
        Ok((records, summary))
    }
}
