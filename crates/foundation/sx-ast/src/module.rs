//! Validated module trees

use crate::error::AstError;
use serde::Deserialize;

/// Tag the provider puts on trees that describe a module
const MODULE_TAG: &str = "module";

/// One import statement of a module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportStmt {
    /// Name of the module the symbols come from
    pub module: String,
    /// What the statement pulls in
    pub kind: ImportKind,
}

/// What an import statement pulls in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportKind {
    /// A single symbol, optionally bound under another local name
    Symbol {
        /// Name of the symbol inside the source module
        name: String,
        /// Local name, when the import renames it
        rename: Option<String>,
    },
    /// Every public symbol of the source module
    Everything,
}

impl ImportStmt {
    /// Explicit import of `name` from `module`
    pub fn symbol(module: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            kind: ImportKind::Symbol {
                name: name.into(),
                rename: None,
            },
        }
    }

    /// Explicit import of `name` from `module`, bound locally as `rename`
    pub fn renamed(
        module: impl Into<String>,
        name: impl Into<String>,
        rename: impl Into<String>,
    ) -> Self {
        Self {
            module: module.into(),
            kind: ImportKind::Symbol {
                name: name.into(),
                rename: Some(rename.into()),
            },
        }
    }

    /// Catch-all import of everything `module` exports
    pub fn everything(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            kind: ImportKind::Everything,
        }
    }
}

/// Structured description of one module
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModuleAst {
    /// Module name as written in the source
    pub name: String,
    /// Names the module exports
    pub publics: Vec<String>,
    /// Unexported names the module refers to itself
    pub privates: Vec<String>,
    /// Import statements in source order
    pub imports: Vec<ImportStmt>,
}

impl ModuleAst {
    /// Create an empty module tree
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add exported names
    #[must_use]
    pub fn with_publics<I, S>(mut self, publics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.publics.extend(publics.into_iter().map(Into::into));
        self
    }

    /// Add private names referenced by the module
    #[must_use]
    pub fn with_privates<I, S>(mut self, privates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.privates.extend(privates.into_iter().map(Into::into));
        self
    }

    /// Append an import statement
    #[must_use]
    pub fn with_import(mut self, import: ImportStmt) -> Self {
        self.imports.push(import);
        self
    }
}

/// Outcome of loading one tree from a provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadedAst {
    /// The tree describes a module
    Module(ModuleAst),
    /// Some other kind of tree (a program, say) that is not indexed
    Other {
        /// Tag the provider gave it
        tag: String,
    },
}

#[derive(Deserialize)]
struct RawModule {
    #[serde(default)]
    tag: Option<String>,
    name: Option<String>,
    publics: Option<Vec<String>>,
    #[serde(default)]
    privates: Vec<String>,
    imports: Option<Vec<RawImport>>,
}

#[derive(Deserialize)]
struct RawImport {
    module: Option<String>,
    #[serde(default)]
    symbol: Option<String>,
    #[serde(default)]
    rename: Option<String>,
    #[serde(default)]
    all: bool,
}

/// Decode and validate the JSON tree the provider stored for `identifier`
///
/// # Errors
///
/// Returns [`AstError::Malformed`] when the text is not JSON or lacks the
/// export/import structure a module needs.
pub fn parse_module_ast(identifier: &str, text: &str) -> Result<LoadedAst, AstError> {
    let raw: RawModule = serde_json::from_str(text)
        .map_err(|err| AstError::malformed(identifier, err.to_string()))?;

    let tag = raw.tag.unwrap_or_else(|| MODULE_TAG.to_string());
    if !tag.eq_ignore_ascii_case(MODULE_TAG) {
        return Ok(LoadedAst::Other { tag });
    }

    let name = raw
        .name
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| AstError::malformed(identifier, "missing module name"))?;
    let publics = raw
        .publics
        .ok_or_else(|| AstError::malformed(identifier, "missing export list"))?;
    let raw_imports = raw
        .imports
        .ok_or_else(|| AstError::malformed(identifier, "missing import list"))?;

    let mut imports = Vec::with_capacity(raw_imports.len());
    for (position, import) in raw_imports.into_iter().enumerate() {
        imports.push(validate_import(identifier, position, import)?);
    }

    Ok(LoadedAst::Module(ModuleAst {
        name,
        publics,
        privates: raw.privates,
        imports,
    }))
}

fn validate_import(
    identifier: &str,
    position: usize,
    import: RawImport,
) -> Result<ImportStmt, AstError> {
    let module = import.module.filter(|module| !module.trim().is_empty()).ok_or_else(|| {
        AstError::malformed(identifier, format!("import #{position} has no source module"))
    })?;

    let kind = match (import.all, import.symbol) {
        (true, None) => ImportKind::Everything,
        (true, Some(symbol)) => {
            return Err(AstError::malformed(
                identifier,
                format!("import #{position} from `{module}` is catch-all but names `{symbol}`"),
            ));
        }
        (false, Some(name)) => ImportKind::Symbol {
            name,
            rename: import.rename,
        },
        (false, None) => {
            return Err(AstError::malformed(
                identifier,
                format!("import #{position} from `{module}` names no symbol"),
            ));
        }
    };

    Ok(ImportStmt { module, kind })
}
