//! Conditions found while resolving the corpus
//!
//! None of these abort a build. They are collected next to the result and
//! shown to the operator.

/// A recoverable resolution problem
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionDiagnostic {
    /// A re-export chain came back to a module already on the path
    #[error("import cycle resolving `{symbol}` for `{module}`: {}", path.join(" -> "))]
    ImportCycle {
        /// Module whose import map was being built
        module: String,
        /// Name being resolved when the cycle closed
        symbol: String,
        /// Modules on the path, ending with the revisited one
        path: Vec<String>,
    },

    /// An explicit import names a symbol its source module does not export
    #[error("`{source_module}` does not export `{symbol}` (imported by `{importer}`)")]
    SymbolNotExported {
        /// Module containing the import
        importer: String,
        /// Module the chain ended in
        source_module: String,
        /// Requested symbol
        symbol: String,
    },

    /// Two trees describe a module with the same canonical name
    #[error("module `{name}` is defined more than once; `{identifier}` ignored")]
    DuplicateModule {
        /// Canonical module name
        name: String,
        /// Identifier of the tree that was dropped
        identifier: String,
    },
}

impl ResolutionDiagnostic {
    /// Whether the condition deserves operator attention
    ///
    /// Unexported symbols are common in partial corpora and only informative.
    #[must_use]
    pub fn is_warning(&self) -> bool {
        !matches!(self, Self::SymbolNotExported { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_message_lists_path() {
        let diagnostic = ResolutionDiagnostic::ImportCycle {
            module: "c".to_string(),
            symbol: "x".to_string(),
            path: vec!["a".to_string(), "b".to_string(), "a".to_string()],
        };
        assert_eq!(
            diagnostic.to_string(),
            "import cycle resolving `x` for `c`: a -> b -> a"
        );
        assert!(diagnostic.is_warning());
    }

    #[test]
    fn test_not_exported_is_informational() {
        let diagnostic = ResolutionDiagnostic::SymbolNotExported {
            importer: "a".to_string(),
            source_module: "b".to_string(),
            symbol: "x".to_string(),
        };
        assert!(!diagnostic.is_warning());
    }
}
