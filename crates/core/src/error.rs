//! Error types surfaced by the staffing core.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Failure to turn tabular input into a staffing model.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The row source had no header line at all.
    #[error("input is empty: no header row found")]
    MissingHeader,
    /// The strict schema requires columns the header does not declare.
    #[error("missing required column(s): {}", missing.join(", "))]
    MissingColumns {
        /// Required column names absent from the header.
        missing: Vec<String>,
    },
    /// The source file could not be read.
    #[error("failed to read {}", path.display())]
    Io {
        /// File that failed to read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
}

/// Failure to read or write a persisted snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The blob is not parseable as structured data.
    #[error("stored state is corrupt: {0}")]
    Corrupt(#[source] serde_json::Error),
    /// The model could not be encoded.
    #[error("failed to encode state: {0}")]
    Encode(#[source] serde_json::Error),
    /// The blob store collaborator failed.
    #[error("blob store failure for key '{key}'")]
    Store {
        /// Key being read or written.
        key: String,
        /// Underlying store failure.
        #[source]
        source: anyhow::Error,
    },
}
