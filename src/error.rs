use std::path::PathBuf;

use thiserror::Error;

/// Short entity context carried inside fatal errors so the operator can find
/// the offending source record.
#[derive(Debug, Clone)]
pub struct EntityRef {
    pub nid: i64,
    pub title: String,
}

impl std::fmt::Display for EntityRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "nid {} ({:?})", self.nid, self.title)
    }
}

/// Fatal conditions. Any of these aborts the whole run; the source snapshot
/// needs a human fix-up pass before a retry.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("{entity}: field '{field}' has {found} values, expected {expected}")]
    Cardinality {
        entity: EntityRef,
        field: &'static str,
        expected: &'static str,
        found: usize,
    },

    #[error("{entity}: field '{field}' has unrecognized value {value:?}")]
    UnrecognizedEnum {
        entity: EntityRef,
        field: &'static str,
        value: String,
    },

    #[error("source file for {uri:?} does not exist at {path}")]
    MissingSource { uri: String, path: PathBuf },

    #[error("destination file {path} already exists")]
    DestinationCollision { path: PathBuf },

    #[error("{path} hash mismatch: expected {expected}, computed {actual}")]
    Integrity {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("vocabulary table inconsistency: {0}")]
    Vocab(String),

    #[error("database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("log write failed: {0}")]
    Log(#[from] csv::Error),
}
