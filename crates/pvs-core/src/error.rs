// ── Core error types ──
//
// Failures that abort an inventory refresh. Missing optional data is never
// an error here; builders tolerate it. The `pvs_api::Error` translation
// keeps which pass was running when the record source failed.

use thiserror::Error;

use crate::builder::Pass;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Record source errors ─────────────────────────────────────────
    #[error("Record source failed during the {pass} pass: {source}")]
    Source {
        pass: Pass,
        #[source]
        source: pvs_api::Error,
    },

    #[error("Malformed {pass} record: {source}")]
    MalformedRecord {
        pass: Pass,
        #[source]
        source: pvs_api::Error,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Attribute a record source failure to the pass that triggered it.
    pub fn from_source(pass: Pass, err: pvs_api::Error) -> Self {
        if err.is_malformed() {
            Self::MalformedRecord { pass, source: err }
        } else {
            Self::Source { pass, source: err }
        }
    }

    /// The pass that failed, if any.
    pub fn pass(&self) -> Option<Pass> {
        match self {
            Self::Source { pass, .. } | Self::MalformedRecord { pass, .. } => Some(*pass),
            Self::Config { .. } => None,
        }
    }
}
