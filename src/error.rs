//! Error types for butterfly-load
//!
//! Every fatal condition a loader can hit maps to one `LoadError` variant, so a
//! caller can tell a stale file from a corrupt one from a truncated one.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::validate::EdgeDefect;

/// Coarse grouping of [`LoadError`] variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Built by an incompatible producer
    StaleFormat,
    /// File missing, unreadable, or cut short
    Io,
    /// Bytes readable but outside the documented layout
    CorruptData,
    /// Producer emitted a graph that breaks the loader's contract
    Contract,
}

/// Main error type for graph loading
#[derive(Debug, Error)]
pub enum LoadError {
    /// Strict fingerprint verification rejected the file
    #[error("{origin} was prepared with an incompatible build (found {found}, expected {expected})")]
    IncompatibleFingerprint {
        origin: String,
        found: String,
        expected: String,
    },

    /// File could not be opened
    #[error("failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Read failure other than a short read
    #[error("I/O error while reading {context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: io::Error,
    },

    /// Stream ended before the declared data was read
    #[error("truncated input: stream ended while reading {context}")]
    Truncated { context: &'static str },

    /// A record field holds a value outside its documented domain
    #[error("malformed {record} record #{index}: {reason}")]
    Malformed {
        record: &'static str,
        index: usize,
        reason: String,
    },

    /// Edge count of zero
    #[error("graph has no edges")]
    EmptyGraph,

    /// Edge set failed validation
    #[error("loaded edges violate graph invariant: {0}")]
    InvariantViolation(#[from] EdgeDefect),
}

impl LoadError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            LoadError::IncompatibleFingerprint { .. } => ErrorCategory::StaleFormat,
            LoadError::Open { .. } | LoadError::Io { .. } | LoadError::Truncated { .. } => {
                ErrorCategory::Io
            }
            LoadError::Malformed { .. } => ErrorCategory::CorruptData,
            LoadError::EmptyGraph | LoadError::InvariantViolation(_) => ErrorCategory::Contract,
        }
    }

    pub(crate) fn read(context: &'static str, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::UnexpectedEof {
            LoadError::Truncated { context }
        } else {
            LoadError::Io { context, source }
        }
    }

    pub(crate) fn malformed<T: Into<String>>(record: &'static str, index: usize, reason: T) -> Self {
        LoadError::Malformed {
            record,
            index,
            reason: reason.into(),
        }
    }
}

/// Convenience result type for loader operations
pub type Result<T> = std::result::Result<T, LoadError>;
