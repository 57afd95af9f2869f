use super::error::SelectionError;
use serde::Deserialize;
use std::fmt;

/// The numbering scheme a raw atom index was written in.
///
/// Native indices (and VMD's "index") count from 0; TINKER XYZ ids and most display tools
/// count from 1. Raw indices accepted from a run file always carry their convention and are
/// converted to native indices exactly once, when they enter the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IndexConvention {
    #[serde(alias = "native", alias = "vmd")]
    ZeroBased,
    #[serde(alias = "tinker", alias = "display")]
    OneBased,
}

impl IndexConvention {
    fn offset(self) -> usize {
        match self {
            IndexConvention::ZeroBased => 0,
            IndexConvention::OneBased => 1,
        }
    }
}

impl fmt::Display for IndexConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexConvention::ZeroBased => write!(f, "zero-based"),
            IndexConvention::OneBased => write!(f, "one-based"),
        }
    }
}

/// A raw atom index together with the convention it was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AtomIndex {
    pub index: usize,
    pub convention: IndexConvention,
}

impl AtomIndex {
    pub fn new(index: usize, convention: IndexConvention) -> Self {
        Self { index, convention }
    }

    pub fn native(index: usize) -> Self {
        Self::new(index, IndexConvention::ZeroBased)
    }

    pub fn one_based(index: usize) -> Self {
        Self::new(index, IndexConvention::OneBased)
    }

    /// Converts to a native (0-based) index, checking it against the system size.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::IndexOutOfRange`] if the index is below the convention's
    /// first valid value (0 under one-based numbering) or past the last atom.
    pub fn to_native(self, atom_count: usize) -> Result<usize, SelectionError> {
        let out_of_range = || SelectionError::IndexOutOfRange {
            index: self.index,
            convention: self.convention,
            atom_count,
        };
        let native = self
            .index
            .checked_sub(self.convention.offset())
            .ok_or_else(out_of_range)?;
        if native >= atom_count {
            return Err(out_of_range());
        }
        Ok(native)
    }
}

impl fmt::Display for AtomIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.index, self.convention)
    }
}
