//! Fatal build errors

use std::path::PathBuf;
use sx_ast::AstError;

/// Conditions that abort a build
///
/// Per-module problems never end up here; they are reported in the
/// [`BuildReport`](crate::BuildReport).
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// Reading or writing outside the corpus failed
    #[error("failed to access {}: {source}", path.display())]
    Io {
        /// Path being accessed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Another build owns the output directory
    #[error("output directory {} is in use by another build (remove {} if it is stale)", dir.display(), lock.display())]
    Locked {
        /// Output directory
        dir: PathBuf,
        /// Lock file found in it
        lock: PathBuf,
    },

    /// The configuration file could not be decoded
    #[error("invalid configuration {}: {reason}", path.display())]
    Config {
        /// Path of the configuration file
        path: PathBuf,
        /// Decoder message
        reason: String,
    },

    /// Payload file names would clash or leave the output directory
    #[error("invalid output file names: {reason}")]
    Output {
        /// First offending name
        reason: String,
    },

    /// The corpus could not be read
    #[error(transparent)]
    Ast(#[from] AstError),

    /// A payload could not be serialized
    #[error("failed to encode payload `{key}`: {source}")]
    Encode {
        /// Payload key
        key: String,
        /// Serializer error
        #[source]
        source: serde_json::Error,
    },
}

impl DriverError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
