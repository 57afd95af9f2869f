use std::fmt;

/// The basis-set tier an atom receives in the Gaussian `GEN` basis block.
///
/// Variants are declared in increasing priority: when an atom qualifies for several tiers the
/// greatest one wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BasisTier {
    Standard,
    Elevated,
    Pseudobond,
}

impl BasisTier {
    pub const ALL: [BasisTier; 3] = [BasisTier::Standard, BasisTier::Elevated, BasisTier::Pseudobond];

    /// Short label used in the verification listing.
    pub fn label(self) -> &'static str {
        match self {
            BasisTier::Standard => "REG",
            BasisTier::Elevated => "HIGH",
            BasisTier::Pseudobond => "PB",
        }
    }
}

impl fmt::Display for BasisTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BasisTier::Standard => "standard",
            BasisTier::Elevated => "elevated",
            BasisTier::Pseudobond => "pseudobond",
        };
        f.write_str(name)
    }
}

/// One atom of the QM ∪ PB universe as numbered in the BASIS file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BasisRecord {
    /// 1-based, contiguous over QM ∪ PB.
    pub basis_id: usize,
    /// Native (0-based) atom index.
    pub region_id: usize,
    pub tier: BasisTier,
}

impl BasisRecord {
    /// The TINKER (1-based) id of the atom.
    pub fn tinker_id(&self) -> usize {
        self.region_id + 1
    }
}
