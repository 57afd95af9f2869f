use super::index::IndexConvention;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum SelectionError {
    #[error(
        "Atom index {index} is out of range under the {convention} convention (system has {atom_count} atoms)"
    )]
    IndexOutOfRange {
        index: usize,
        convention: IndexConvention,
        atom_count: usize,
    },

    #[error("Invalid range: start {start} is greater than end {end}")]
    InvalidRange { start: i64, end: i64 },

    #[error("Radius must be a finite, non-negative number of Angstroms (got {0})")]
    InvalidRadius(f64),
}
