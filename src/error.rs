use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced while loading or saving study data.
///
/// Malformed ledger lines are not represented here: they are skipped during
/// parsing (with a debug log) rather than failing the whole load.
#[derive(Debug, Error)]
pub enum StudyError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, StudyError>;
