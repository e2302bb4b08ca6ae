use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the `pvs-api` crate.
///
/// Covers every failure mode at the record source boundary: reading a
/// snapshot, rejecting a malformed record, and provider calls that failed.
/// `pvs-core` maps these into build-level errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Snapshot I/O ────────────────────────────────────────────────
    /// The snapshot document could not be read from disk.
    #[error("Failed to read record snapshot {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// A record did not match its expected shape (missing required field,
    /// wrong type). `context` names the document or call that produced it.
    #[error("Deserialization error in {context}: {message}")]
    Deserialization { message: String, context: String },

    // ── Provider ────────────────────────────────────────────────────
    /// A bulk listing or point lookup failed at the provider.
    #[error("Provider request for {resource} failed: {message}")]
    Request { resource: String, message: String },
}

impl Error {
    pub(crate) fn deserialization(err: &serde_json::Error, context: impl Into<String>) -> Self {
        Self::Deserialization {
            message: err.to_string(),
            context: context.into(),
        }
    }

    /// Returns `true` if the error came from a malformed record rather
    /// than a failed fetch.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Deserialization { .. })
    }
}
