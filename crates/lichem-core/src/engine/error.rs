use super::config::ConfigError;
use crate::core::selection::error::SelectionError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Selection '{name}' failed: {reason}")]
    Selection { name: String, reason: String },

    #[error("Atom index in '{name}' does not fit its numbering convention: {source}")]
    IndexConvention {
        name: String,
        #[source]
        source: SelectionError,
    },

    #[error("Atom {region_id} (BASIS id {basis_id}) matches no basis tier")]
    UnassignedAtom { basis_id: usize, region_id: usize },

    #[error("I/O error on '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

impl EngineError {
    /// Attaches the name of the offending selection to a resolver error.
    ///
    /// Out-of-range indices become [`EngineError::IndexConvention`]; every other resolver
    /// failure is a [`EngineError::Selection`].
    pub fn from_selection(name: impl Into<String>, error: SelectionError) -> Self {
        match error {
            SelectionError::IndexOutOfRange { .. } => EngineError::IndexConvention {
                name: name.into(),
                source: error,
            },
            other => EngineError::Selection {
                name: name.into(),
                reason: other.to_string(),
            },
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        EngineError::Io {
            path: path.into(),
            source,
        }
    }
}
