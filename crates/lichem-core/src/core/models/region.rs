use crate::core::selection::atom_set::AtomSet;
use std::fmt;

/// The four categories every atom of a QM/MM system is reported under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionCategory {
    Qm,
    Pseudobond,
    Boundary,
    Frozen,
}

impl RegionCategory {
    pub const ALL: [RegionCategory; 4] = [
        RegionCategory::Qm,
        RegionCategory::Pseudobond,
        RegionCategory::Boundary,
        RegionCategory::Frozen,
    ];

    /// Section key used in the LICHEM regions file.
    pub fn section_key(self) -> &'static str {
        match self {
            RegionCategory::Qm => "QM_atoms",
            RegionCategory::Pseudobond => "Pseudobond_atoms",
            RegionCategory::Boundary => "Boundary_atoms",
            RegionCategory::Frozen => "Frozen_atoms",
        }
    }
}

impl fmt::Display for RegionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RegionCategory::Qm => "QM",
            RegionCategory::Pseudobond => "pseudobond",
            RegionCategory::Boundary => "boundary",
            RegionCategory::Frozen => "frozen",
        };
        f.write_str(label)
    }
}

/// The result of partitioning a system.
///
/// QM, pseudobond and boundary sets may overlap each other; `frozen` is the complement of
/// their union with the active sphere, so it never shares an atom with any other set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionAssignment {
    pub qm: AtomSet,
    pub pseudobond: AtomSet,
    pub boundary: AtomSet,
    pub frozen: AtomSet,
    /// Atoms inside the active sphere. Auxiliary; not written as a section.
    pub sphere: AtomSet,
}

impl RegionAssignment {
    pub fn category(&self, category: RegionCategory) -> &AtomSet {
        match category {
            RegionCategory::Qm => &self.qm,
            RegionCategory::Pseudobond => &self.pseudobond,
            RegionCategory::Boundary => &self.boundary,
            RegionCategory::Frozen => &self.frozen,
        }
    }

    /// Atoms that move during the calculation: sphere ∪ QM ∪ PB ∪ BA.
    pub fn unfrozen(&self) -> AtomSet {
        let mut unfrozen = self.sphere.clone();
        unfrozen.union_with(&self.qm);
        unfrozen.union_with(&self.pseudobond);
        unfrozen.union_with(&self.boundary);
        unfrozen
    }
}
