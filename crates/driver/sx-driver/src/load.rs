//! Reading the corpus through an AST provider

use serde::{Deserialize, Serialize};
use sx_ast::{AstProvider, LoadedAst};
use sx_intern::Interner;
use sx_resolve::Corpus;
use tracing::{debug, info, warn};

use crate::DriverError;

/// A module left out of the index, and why
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedModule {
    /// Identifier the provider knows the module by
    pub identifier: String,

    /// Human readable reason
    pub reason: String,
}

/// A corpus as read from a provider
#[derive(Debug, Clone)]
pub struct LoadedCorpus {
    /// Every module that could be classified
    pub corpus: Corpus,

    /// Malformed and duplicate modules
    pub skipped: Vec<SkippedModule>,

    /// Trees that do not describe a module (programs and the like)
    pub ignored: Vec<String>,
}

/// Load every tree `provider` knows about
///
/// Trees are read in the order the provider lists them, which fixes the
/// discovery order of modules.
///
/// # Errors
///
/// Fails on the first fatal provider error. Malformed trees and duplicate
/// module names only end up in [`LoadedCorpus::skipped`].
pub fn load_corpus(provider: &dyn AstProvider) -> Result<LoadedCorpus, DriverError> {
    let mut corpus = Corpus::new(Interner::new());
    let mut skipped = Vec::new();
    let mut ignored = Vec::new();

    for identifier in provider.identifiers()? {
        match provider.load(&identifier) {
            Ok(LoadedAst::Module(ast)) => {
                if let Err(diagnostic) = corpus.add_module(&identifier, &ast) {
                    warn!(identifier = %identifier, "{diagnostic}");
                    skipped.push(SkippedModule {
                        identifier,
                        reason: diagnostic.to_string(),
                    });
                }
            }
            Ok(LoadedAst::Other { tag }) => {
                debug!(identifier = %identifier, tag = %tag, "not a module, ignored");
                ignored.push(identifier);
            }
            Err(err) if err.is_fatal() => return Err(err.into()),
            Err(err) => {
                warn!(identifier = %identifier, "{err}");
                skipped.push(SkippedModule {
                    identifier,
                    reason: err.to_string(),
                });
            }
        }
    }

    info!(
        modules = corpus.len(),
        skipped = skipped.len(),
        ignored = ignored.len(),
        "loaded corpus"
    );
    Ok(LoadedCorpus {
        corpus,
        skipped,
        ignored,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sx_ast::MemoryProvider;

    #[test]
    fn test_malformed_and_duplicate_are_skipped() {
        let provider = MemoryProvider::new()
            .with("a", r#"{"name": "A", "publics": ["foo"], "imports": []}"#)
            .with("broken", r#"{"name": "broken", "imports": []}"#)
            .with("a_again", r#"{"name": "a", "publics": [], "imports": []}"#)
            .with("main", r#"{"tag": "program", "name": "main"}"#);

        let loaded = load_corpus(&provider).unwrap();
        assert_eq!(loaded.corpus.len(), 1);
        let skipped: Vec<&str> = loaded.skipped.iter().map(|module| module.identifier.as_str()).collect();
        assert_eq!(skipped, vec!["broken", "a_again"]);
        assert_eq!(loaded.ignored, vec!["main".to_string()]);
    }

    #[test]
    fn test_missing_directory_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let provider = sx_ast::JsonDirProvider::new(dir.path().join("nowhere"));

        let err = load_corpus(&provider).unwrap_err();
        assert!(matches!(err, DriverError::Ast(sx_ast::AstError::Io { .. })));
    }
}
