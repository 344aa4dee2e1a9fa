//! Errors raised while reading module trees

use std::path::PathBuf;

/// Errors produced by an AST provider or the package lookup
#[derive(Debug, thiserror::Error)]
pub enum AstError {
    /// Reading the corpus failed; the build cannot continue
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File or directory being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A single module tree lacks the structure needed to classify it
    #[error("malformed AST for `{identifier}`: {reason}")]
    Malformed {
        /// Identifier the provider knows the module by
        identifier: String,
        /// What was wrong with it
        reason: String,
    },

    /// The provider has no tree for the requested identifier
    #[error("no AST available for `{identifier}`")]
    Missing {
        /// Identifier that was requested
        identifier: String,
    },

    /// The package grouping file could not be decoded
    #[error("invalid package file {}: {reason}", path.display())]
    Packages {
        /// Path of the package file
        path: PathBuf,
        /// Decoder message
        reason: String,
    },
}

impl AstError {
    /// Whether this error has to abort the whole build
    ///
    /// Only problems local to one module are recoverable; everything else means
    /// the corpus cannot be seen in full.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Malformed { .. })
    }

    pub(crate) fn malformed(identifier: &str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            identifier: identifier.to_string(),
            reason: reason.into(),
        }
    }
}
