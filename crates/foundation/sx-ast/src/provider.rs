//! Sources of module trees

use crate::error::AstError;
use crate::module::{LoadedAst, parse_module_ast};
use indexmap::IndexMap;
use std::path::PathBuf;

/// Default file extension of stored module trees
pub const DEFAULT_AST_EXTENSION: &str = "ast";

/// Something that can hand out one structured tree per module
pub trait AstProvider {
    /// Identifiers of every available tree, in the order they should be loaded
    ///
    /// # Errors
    ///
    /// Fails when the corpus cannot be enumerated at all.
    fn identifiers(&self) -> Result<Vec<String>, AstError>;

    /// Load the tree stored under `identifier`
    ///
    /// # Errors
    ///
    /// [`AstError::Malformed`] for a broken tree, anything else when the
    /// corpus itself could not be read.
    fn load(&self, identifier: &str) -> Result<LoadedAst, AstError>;
}

/// Provider backed by a directory of `<module>.<extension>` JSON files
#[derive(Debug, Clone)]
pub struct JsonDirProvider {
    dir: PathBuf,
    extension: String,
}

impl JsonDirProvider {
    /// Read trees with the default extension from `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_extension(dir, DEFAULT_AST_EXTENSION)
    }

    /// Read trees with a custom extension from `dir`
    pub fn with_extension(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        let extension: String = extension.into();
        Self {
            dir: dir.into(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    fn path_of(&self, identifier: &str) -> PathBuf {
        self.dir.join(format!("{identifier}.{}", self.extension))
    }
}

impl AstProvider for JsonDirProvider {
    fn identifiers(&self) -> Result<Vec<String>, AstError> {
        let io_error = |source| AstError::Io {
            path: self.dir.clone(),
            source,
        };

        let mut identifiers = Vec::new();
        for entry in std::fs::read_dir(&self.dir).map_err(io_error)? {
            let path = entry.map_err(io_error)?.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().is_none_or(|ext| ext != self.extension.as_str()) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                identifiers.push(stem.to_string());
            }
        }

        identifiers.sort();
        tracing::debug!(dir = %self.dir.display(), count = identifiers.len(), "listed module trees");
        Ok(identifiers)
    }

    fn load(&self, identifier: &str) -> Result<LoadedAst, AstError> {
        let path = self.path_of(identifier);
        let text = std::fs::read_to_string(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                AstError::Missing {
                    identifier: identifier.to_string(),
                }
            } else {
                AstError::Io { path, source }
            }
        })?;
        parse_module_ast(identifier, &text)
    }
}

/// Provider over trees held in memory, keyed by identifier
#[derive(Debug, Clone, Default)]
pub struct MemoryProvider {
    sources: IndexMap<String, String>,
}

impl MemoryProvider {
    /// Create an empty provider
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the JSON text of one tree
    pub fn insert(&mut self, identifier: impl Into<String>, text: impl Into<String>) {
        self.sources.insert(identifier.into(), text.into());
    }

    /// Builder-style [`MemoryProvider::insert`]
    #[must_use]
    pub fn with(mut self, identifier: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(identifier, text);
        self
    }
}

impl AstProvider for MemoryProvider {
    fn identifiers(&self) -> Result<Vec<String>, AstError> {
        Ok(self.sources.keys().cloned().collect())
    }

    fn load(&self, identifier: &str) -> Result<LoadedAst, AstError> {
        let text = self.sources.get(identifier).ok_or_else(|| AstError::Missing {
            identifier: identifier.to_string(),
        })?;
        parse_module_ast(identifier, text)
    }
}
