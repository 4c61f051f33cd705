//! Failure modes of a replay run.
//!
//! Every variant is fatal for the whole run: snapshot data is either loaded
//! completely or not at all, and there is nothing to retry. "Directory exists
//! but no files match" is deliberately not represented here; it is a graceful
//! no-op handled at the CLI boundary.

use std::path::PathBuf;

use thiserror::Error;

use crate::snapshot::states::Dim;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("input directory '{0}' does not exist")]
    PathNotFound(PathBuf),

    #[error("failed to read '{path}'")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse snapshot '{path}'")]
    Parse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("snapshot '{path}' is missing required column '{column}'")]
    MissingColumn { path: PathBuf, column: &'static str },

    #[error("snapshot '{path}' is {got}, but the run was detected as {expected}")]
    DimensionMismatch {
        path: PathBuf,
        expected: Dim,
        got: Dim,
    },

    #[error("snapshot '{path}' holds {got} particles, expected {expected}")]
    ParticleCountMismatch {
        path: PathBuf,
        expected: usize,
        got: usize,
    },

    #[error("no particle data to animate")]
    EmptyData,
}
